//! Output-side tasks: the mode-driven LED loop and the toggle variant.

pub mod actuation;
pub mod toggle;
