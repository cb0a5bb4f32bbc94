//! Common types used across the application.

pub mod duration;
pub mod id;

pub use duration::Minutes;
pub use id::*;
