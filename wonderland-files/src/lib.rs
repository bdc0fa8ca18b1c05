use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("The document is violating the expected format, because: {reason}")]
    FormatError { reason: &'static str },

    /// An index stored in the document points past the end of the array it refers to.
    #[error("The document references {kind} #{index}, but only {len} exist")]
    DanglingIndex {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    /// Represents an empty source, e.g. a zero byte file.
    #[error("Source contains no data")]
    EmptySource,

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}

pub mod gltf;
