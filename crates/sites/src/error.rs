//! Site metadata error types.

use derive_more::{Display, Error};
use std::path::PathBuf;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The site table does not exist at the expected location.
    #[display("radar site list not found at {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// The site table exists but could not be read as CSV.
    #[display("could not read radar site list")]
    Csv,
    /// No configuration in the table carries this id.
    #[display("no radar found with id {_0}")]
    UnknownRadar(#[error(not(source))] u32),
    /// A single row could not be parsed. Rows like this are skipped.
    #[display("malformed radar site row at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },
}
impl ErrorKind {
    pub fn is_retryable(&self) -> bool {
        false
    }
}
