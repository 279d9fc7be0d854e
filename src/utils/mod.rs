//! Utility modules

pub mod filename;
pub mod mime;
pub mod url;
