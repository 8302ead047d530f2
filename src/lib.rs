#![allow(warnings)]
#![allow(dead_code)]

#[macro_use]
extern crate num_derive;

#[macro_use]
extern crate lazy_static;

pub mod api;
pub mod recon;

mod dec;
mod def;
mod lf;
mod picman;
mod plane;
mod plane_region;

#[cfg(feature = "bench")]
pub mod bench {
    pub mod frame {
        pub use crate::api::frame::*;
    }
    pub mod plane {
        pub use crate::plane::*;
        pub use crate::plane_region::*;
    }
    pub mod lf {
        pub use crate::lf::filter::filter_block_plane;
        pub use crate::lf::mask::{setup_mask, LoopFilterMask};
        pub use crate::lf::{LoopFilterInfo, LoopFilterThresh};
    }
    pub mod def {
        pub use crate::def::*;
    }
}
