//! Error types for the sort pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SortError {
    /// An `--order` name is not one of the input fields
    #[error("order field name \"{field}\" not found in input fields \"{fields}\"")]
    OrderFieldNotFound { field: String, fields: String },

    #[error("invalid binary layout \"{layout}\": {reason}")]
    InvalidLayout { layout: String, reason: String },

    /// A numeric key field does not hold a number
    #[error("record {record}: cannot read field {field} value \"{value}\" as a number")]
    BadField {
        record: usize,
        field: usize,
        value: String,
    },

    #[error("record {record}: expected at least {expected} field(s), got {found}")]
    MissingField {
        record: usize,
        expected: usize,
        found: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_field_message() {
        let err = SortError::OrderFieldNotFound {
            field: "c".to_string(),
            fields: "a,b".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "order field name \"c\" not found in input fields \"a,b\""
        );
    }
}
