//! Entry name validation.
//!
//! Zip entry names are untrusted input: an entry called `../../etc/passwd`
//! must never be written outside of the extraction directory.

use std::path::PathBuf;

use crate::error::{ErrorKind, Result};
use exn::OptionExt;

/// Turn a zip entry name into a relative path that stays inside whatever
/// directory it is joined onto.
///
/// Both `/` and `\` separate segments, since archives written on Windows
/// sometimes use the latter. Empty and `.` segments are dropped and `..`
/// pops the previous segment. Fails with
/// [`InvalidPath`](crate::error::ErrorKind::InvalidPath) when a `..` would
/// climb out, when a segment carries a drive or stream marker (`:`) or a NUL
/// byte, or when nothing is left.
///
/// ```
/// use std::path::Path;
/// use aura_storage::validate_path;
/// assert!(validate_path("2_20251016_000000.pvol.h5").is_ok());
/// assert!(validate_path("../2_20251016_000000.pvol.h5").is_err());
/// assert_eq!(
///     validate_path("./scans//2_20251016_000000.pvol.h5").unwrap(),
///     Path::new("scans/2_20251016_000000.pvol.h5")
/// );
/// ```
pub fn validate(entry: &str) -> Result<PathBuf> {
    let invalid = || ErrorKind::InvalidPath(PathBuf::from(entry));
    let mut segments: Vec<&str> = Vec::new();
    for segment in entry.split(['/', '\\']) {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop().ok_or_raise(invalid)?;
            },
            _ if segment.contains([':', '\0']) => exn::bail!(invalid()),
            _ => segments.push(segment),
        }
    }
    if segments.is_empty() {
        exn::bail!(invalid());
    }
    Ok(segments.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::Path;

    #[rstest]
    #[case("2_20251016_000000.pvol.h5", "2_20251016_000000.pvol.h5")]
    #[case("vol/2_20251016_000000.pvol.h5", "vol/2_20251016_000000.pvol.h5")]
    #[case("vol\\2_20251016_000000.pvol.h5", "vol/2_20251016_000000.pvol.h5")]
    #[case("a//b/./c.h5", "a/b/c.h5")]
    #[case("/absolute/entry.h5", "absolute/entry.h5")]
    #[case("a/b/../c.h5", "a/c.h5")]
    #[case("entry.h5/", "entry.h5")]
    fn test_valid_entries(#[case] entry: &str, #[case] expected: &str) {
        assert_eq!(validate(entry).unwrap(), Path::new(expected));
    }

    #[rstest]
    #[case("../escape.h5")]
    #[case("a/../../escape.h5")]
    #[case("a\\..\\..\\escape.h5")]
    #[case("C:/Windows/escape.h5")]
    #[case("entry.h5:stream")]
    #[case("..")]
    #[case("")]
    #[case(".")]
    #[case("//")]
    #[case("a\0b")]
    fn test_invalid_entries(#[case] entry: &str) {
        let err = validate(entry).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(path) if path == Path::new(entry)));
    }
}
