//! Utility modules shared by the catalog, guide and detection code
//!
//! - Text: case-insensitive matching

pub mod text;

pub use text::{contains_ignore_case, eq_ignore_case};
