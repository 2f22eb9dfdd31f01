//! The boundary between archive access and scientific decoding.
//!
//! Turning ODIM HDF5 bytes into a dataset is somebody else's job. Implement
//! [`Decoder`] for whatever does it, and pass it to
//! [`LazyVolumeRef::read`](crate::LazyVolumeRef::read).

/// Options forwarded verbatim to the [`Decoder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Read a single sweep by index instead of the whole volume.
    pub sweep: Option<usize>,
    pub include_fields: Vec<String>,
    pub exclude_fields: Vec<String>,
}
impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sweep(mut self, index: usize) -> Self {
        self.sweep = Some(index);
        self
    }

    pub fn include<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.include_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn exclude<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.exclude_fields.extend(fields.into_iter().map(Into::into));
        self
    }
}

/// What a decoder produced: one dataset, or one per sweep.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<D> {
    Dataset(D),
    Sweeps(Vec<D>),
}
impl<D> Decoded<D> {
    /// Flatten into a list of sweeps; a single dataset becomes a list of one.
    pub fn into_sweeps(self) -> Vec<D> {
        match self {
            Self::Dataset(dataset) => vec![dataset],
            Self::Sweeps(sweeps) => sweeps,
        }
    }
}

pub trait Decoder {
    type Dataset;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Decode the in-memory bytes of the entry called `name`.
    fn decode(&self, name: &str, bytes: &[u8], options: &ReadOptions) -> Result<Decoded<Self::Dataset>, Self::Error>;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Treats the entry bytes as text; with a sweep selected, returns just
    /// that character.
    pub(crate) struct Utf8Decoder;
    impl Decoder for Utf8Decoder {
        type Dataset = String;
        type Error = std::str::Utf8Error;

        fn decode(&self, _name: &str, bytes: &[u8], options: &ReadOptions) -> Result<Decoded<String>, Self::Error> {
            let text = std::str::from_utf8(bytes)?;
            Ok(match options.sweep {
                Some(index) => Decoded::Dataset(text.chars().nth(index).map(String::from).unwrap_or_default()),
                None => Decoded::Sweeps(text.split('_').map(String::from).collect()),
            })
        }
    }

    #[test]
    fn test_read_options_builder() {
        let options = ReadOptions::new().sweep(2).include(["DBZH", "VRADH"]).exclude(vec!["TH".to_string()]);
        assert_eq!(options.sweep, Some(2));
        assert_eq!(options.include_fields, vec!["DBZH", "VRADH"]);
        assert_eq!(options.exclude_fields, vec!["TH"]);
    }

    #[test]
    fn test_into_sweeps() {
        assert_eq!(Decoded::Dataset(1).into_sweeps(), vec![1]);
        assert_eq!(Decoded::Sweeps(vec![1, 2]).into_sweeps(), vec![1, 2]);
    }
}
