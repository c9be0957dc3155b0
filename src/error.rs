use argshape_engine::ConfigError;
use thiserror::Error;

/// A defect in a shape declaration, detected before any input is parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeclarationError {
    /// A callable parameter without a type annotation.
    #[error("Invalid - parameter '{0}' must have a type annotation.")]
    MissingAnnotation(String),

    /// More than one positional field on a shape that does not allow it.
    #[error("Invalid - shape cannot have multiple positional fields: '{first}' and '{second}'.")]
    MultiplePositionalFields {
        /// The first positional field.
        first: String,
        /// The positional field which conflicts with `first`.
        second: String,
    },

    /// A positional field which also requests a short flag.
    #[error("Invalid - field '{0}' cannot be both positional and have a short flag.")]
    PositionalWithShortFlag(String),

    /// A boolean field placed positionally.
    #[error("Invalid - boolean field '{0}' cannot be positional.")]
    PositionalToggle(String),

    /// A field whose (element) type is itself a shape.
    #[error("Invalid - field '{field}' has nested shape type '{type_name}', which is not supported.")]
    UnsupportedNestedShape {
        /// The offending field.
        field: String,
        /// The nested shape's type name.
        type_name: String,
    },

    /// A field whose type has no command line representation (ex: `Vec<Vec<T>>`).
    #[error("Invalid - field '{field}' has type '{type_name}', which cannot be parsed from the command line.")]
    UnsupportedType {
        /// The offending field.
        field: String,
        /// The field's declared type name.
        type_name: String,
    },

    /// A declared field which shadows an inherited field of a different type.
    #[error("Invalid - field '{field}' of type '{type_name}' cannot shadow the inherited field of type '{inherited}'.")]
    ShadowTypeMismatch {
        /// The shadowing field.
        field: String,
        /// The shadowing field's declared type name.
        type_name: String,
        /// The inherited field's declared type name.
        inherited: String,
    },

    /// The declared type is not a record shape.
    #[error("Invalid - type '{0}' is not a record shape.")]
    NotARecordShape(String),

    /// A recognized metadata key with a value of the wrong kind.
    #[error("Invalid - field '{field}' has metadata '{key}' which must be {expected}.")]
    InvalidMetadata {
        /// The offending field.
        field: String,
        /// The metadata key.
        key: String,
        /// A description of the accepted values.
        expected: String,
    },

    /// A default (or default factory result) whose type differs from the field's declared type.
    #[error("Invalid - field '{field}' has a default which is not a '{type_name}'.")]
    InvalidDefault {
        /// The offending field.
        field: String,
        /// The field's declared type name.
        type_name: String,
    },

    /// The parsing engine rejected the derived rules (ex: two fields with the same flag).
    #[error(transparent)]
    Engine(#[from] ConfigError),
}

/// A failure to reconstruct a shape from the parsed values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    /// No value was parsed for the field, and it has no default.
    #[error("Shape error: '{shape}' is missing a value for field '{field}'.")]
    MissingField {
        /// The shape being constructed.
        shape: String,
        /// The field without a value.
        field: String,
    },

    /// A value was parsed for a key which is not a field of the shape.
    #[error("Shape error: '{shape}' has no field '{field}'.")]
    UnexpectedField {
        /// The shape being constructed.
        shape: String,
        /// The unknown key.
        field: String,
    },

    /// The parsed value does not have the field's type.
    #[error("Shape error: '{shape}' field '{field}' expects a '{expected}'.")]
    TypeMismatch {
        /// The shape being constructed.
        shape: String,
        /// The field with the mismatched value.
        field: String,
        /// The type the field expects.
        expected: String,
    },
}

/// Any failure from building, parsing, and materializing a shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// See [`DeclarationError`].
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    /// See [`ShapeError`].
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// The parse ended early with an exit code: `0` after printing help, `1` after a user input error.
    #[error("Exit with code {0}.")]
    Exit(i32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        DeclarationError::MultiplePositionalFields { first: "input".to_string(), second: "output".to_string() },
        "Invalid - shape cannot have multiple positional fields: 'input' and 'output'."
    )]
    #[case(
        DeclarationError::MissingAnnotation("count".to_string()),
        "Invalid - parameter 'count' must have a type annotation."
    )]
    #[case(
        DeclarationError::InvalidMetadata { field: "x".to_string(), key: "positional".to_string(), expected: "a bool".to_string() },
        "Invalid - field 'x' has metadata 'positional' which must be a bool."
    )]
    fn declaration_display(#[case] error: DeclarationError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn error_from() {
        let error = Error::from(ShapeError::MissingField {
            shape: "Ls".to_string(),
            field: "path".to_string(),
        });
        assert_matches!(error, Error::Shape(ShapeError::MissingField { .. }));
        assert_eq!(
            error.to_string(),
            "Shape error: 'Ls' is missing a value for field 'path'."
        );
    }
}
