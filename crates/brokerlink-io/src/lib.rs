pub mod delimited;
pub mod error;
pub mod output;
pub mod source;
pub mod xlsx;

pub use error::{IoError, Result};
