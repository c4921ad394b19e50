use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to open dataset {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read CSV from {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("dataset {} is missing required columns: {}", path.display(), columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },
    #[error("dataset {} has no numeric loss columns", path.display())]
    NoNumericColumns { path: PathBuf },
    #[error("line {line}: unknown lost_by value {value:?} (expected russia or ukraine)")]
    UnknownSide { line: u64, value: String },
    #[error("line {line}: column {column:?} holds {value:?}, expected a non-negative integer")]
    InvalidCount {
        line: u64,
        column: String,
        value: String,
    },
}

/// An axis name that is not one of the schema's axis options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown axis column {name:?}; expected one of: {}", allowed.join(", "))]
pub struct UnknownAxis {
    pub name: String,
    pub allowed: Vec<String>,
}

#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("failed to open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to process CSV {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{}: cannot drop column at position {position}, header has {width} columns", path.display())]
    PositionOutOfRange {
        path: PathBuf,
        position: usize,
        width: usize,
    },
}
