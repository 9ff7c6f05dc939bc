pub mod error;
pub mod source;

pub use error::FetchError;
pub use source::{FileSource, HttpSource, PostSource, build_source};
