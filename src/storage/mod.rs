pub mod engine;
pub mod local;
pub mod metadata;
pub mod source;

pub use engine::*;
pub use metadata::*;
pub use source::*;
