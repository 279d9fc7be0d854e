//! Core pipeline functionality

pub mod pipeline;
pub mod progress;

pub use pipeline::Pipeline;
pub use progress::Progress;
