//! Foundation module - Core utilities and types
//!
//! - Rectangle and clipping math
//! - Frame timing
//! - Logging and error reporting

pub mod geometry;
pub mod logging;
pub mod time;
