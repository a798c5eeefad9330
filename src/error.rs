use bstr::BString;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DynarrError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Index {index} out of range for array of {count} elements")]
    IndexOutOfRange { index: i64, count: usize },

    #[error("Element not found: {0}")]
    NotFound(BString),

    #[error("Cannot grow array beyond {capacity} slots")]
    CapacityOverflow { capacity: usize },

    #[error("{0}")]
    Syntax(String),

    #[error("{origin}:{line}: {source}")]
    AtLine {
        origin: String,
        line: usize,
        #[source]
        source: Box<DynarrError>,
    },
}

impl DynarrError {
    /// Attach a script location to an error
    pub fn at_line(origin: &str, line: usize, source: DynarrError) -> Self {
        DynarrError::AtLine {
            origin: origin.to_string(),
            line,
            source: Box::new(source),
        }
    }

    /// Out-of-range error for an unsigned index
    pub fn out_of_range(index: usize, count: usize) -> Self {
        DynarrError::IndexOutOfRange {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            count,
        }
    }
}

pub type Result<T> = std::result::Result<T, DynarrError>;
