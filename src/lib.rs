#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use bg_bridge as bridge;
pub use bg_cfg as cfg;
pub use bg_ptr as ptr;
pub use bg_utils as utils;

pub use bg_bridge::{bg_native, bg_no_wrap, bg_wrap};
