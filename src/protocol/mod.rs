pub mod archive;
pub mod constants;
pub mod error;

pub use archive::{Archive, ArchiveBody, ArchiveHeader};
pub use error::FormatError;
