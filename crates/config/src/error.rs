//! Configuration error types.

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A source could not be read or did not match the expected shape.
    #[display("could not load configuration")]
    Load,
    /// Loaded, but a value is unusable.
    #[display("invalid configuration value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
impl ErrorKind {
    pub fn is_retryable(&self) -> bool {
        false
    }
}
