//! Core client infrastructure: error types shared by every front end.

pub mod error;

pub use error::{ClientError, ClientResult};
