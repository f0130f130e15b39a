pub mod domain;
pub mod error;
pub mod link;
pub mod rules;
pub mod time;

pub use domain::*;
pub use error::CoreError;
pub use link::{encode, EncodedMessage};
pub use rules::*;
