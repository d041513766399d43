//! Utility functions for DSP operations

mod gray;
mod math;

pub use gray::{binary_to_gray, gray_to_binary};
pub use math::*;
