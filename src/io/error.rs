use thiserror::Error;

/// Problems found while reading a field back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldIoError {
    #[error("cannot read field: the stored field has {stored} dimensions, the field being read into has {expected}")]
    DimensionMismatch { stored: usize, expected: usize },

    #[error("cannot read field: axis {axis} has {axis_len} values but the field has {field_len} along it")]
    AxisLengthMismatch {
        axis: usize,
        axis_len: usize,
        field_len: usize,
    },

    #[error("dataset not found: {0}")]
    MissingDataset(String),

    #[error("group not found: {0}")]
    MissingGroup(String),

    #[error("dataset {name} holds {len} values, its shape {shape:?} needs {expected}")]
    CorruptDataset {
        name: String,
        shape: Vec<usize>,
        len: usize,
        expected: usize,
    },

    #[error("dataset {0} holds values that do not fit the requested type")]
    Cast(String),

    #[error("line {line}: expected two columns, found {found}")]
    MissingColumn { line: usize, found: usize },

    #[error("line {line}: cannot parse '{token}'")]
    Parse { line: usize, token: String },
}
