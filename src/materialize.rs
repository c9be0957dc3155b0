use argshape_engine::{Entry, Namespace};

use crate::error::ShapeError;
use crate::reflect::{Shape, Values};
use crate::schema::Schema;
use crate::types::TypeKind;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Convert the raw namespace of a parse into field values.
///
/// 1. Positional entries stored under a key other than their field name move to the field name.
/// 2. Entries which were not supplied are dropped, so that the field falls back to its own default.
/// 3. Sequences are joined into the field's declared collection type.
pub fn materialize(schema: &Schema, mut namespace: Namespace) -> Result<Values, ShapeError> {
    let shape = schema.shape();

    for (storage_key, field) in schema.positional_keys() {
        if storage_key != field {
            if let Some(entry) = namespace.remove(storage_key) {
                namespace.insert(field, entry);
            }
        }
    }

    namespace.retain(|_, entry| entry.is_supplied());
    let mut values = Values::new(shape.name());

    for (key, entry) in namespace {
        let field = shape
            .get(&key)
            .ok_or_else(|| ShapeError::UnexpectedField {
                shape: shape.name().to_string(),
                field: key.clone(),
            })?;
        let mismatch = || ShapeError::TypeMismatch {
            shape: shape.name().to_string(),
            field: key.clone(),
            expected: field.declared_type().name().to_string(),
        };

        let value = match entry {
            Entry::Single(value) => value,
            Entry::Multiple(items) => match field.declared_type().kind() {
                TypeKind::Repeated { join, .. } => join(items).map_err(|_| mismatch())?,
                _ => return Err(mismatch()),
            },
            Entry::NotSupplied => unreachable!("internal error - unsupplied entries were dropped"),
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Materialized {key}: {value:?}.");
        }

        values.insert(key, value);
    }

    Ok(values)
}

/// Materialize the namespace, and construct the shape from it.
pub fn construct<S: Shape>(schema: &Schema, namespace: Namespace) -> Result<S, ShapeError> {
    let mut values = materialize(schema, namespace)?;
    S::from_values(&mut values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{FieldDescriptor, Metadata, ShapeInfo};
    use crate::schema::SchemaBuilder;
    use argshape_engine::Value;

    fn schema() -> Schema {
        let shape = ShapeInfo::new("Ln")
            .multiple_positionals(true)
            .field(
                FieldDescriptor::of::<String>("input")
                    .with_metadata(Metadata::default().with("args", ["source"])),
            )
            .field(
                FieldDescriptor::of::<Vec<u32>>("my_special")
                    .with_metadata(Metadata::default().with("positional", true)),
            )
            .field(FieldDescriptor::of::<bool>("force"));
        SchemaBuilder::new("ln").build(&shape).unwrap()
    }

    #[test]
    fn materialize_rekeys() {
        // Setup
        let schema = schema();
        let namespace = schema.parse_tokens(&["a", "2", "4", "--force"]).unwrap();

        // Execute
        let mut values = materialize(&schema, namespace).unwrap();

        // Verify
        assert_eq!(values.len(), 3);
        assert_eq!(values.take::<String>("input").unwrap(), Some("a".to_string()));
        assert_eq!(
            values.take::<Vec<u32>>("my_special").unwrap(),
            Some(vec![2, 4])
        );
        assert_eq!(values.take::<bool>("force").unwrap(), Some(true));
        assert!(!values.contains("source"));
        assert!(!values.contains("my-special"));
    }

    #[test]
    fn materialize_drops_unsupplied() {
        // Setup
        let schema = schema();
        let namespace = schema.parse_tokens(&[]).unwrap();

        // Execute
        let values = materialize(&schema, namespace).unwrap();

        // Verify
        assert!(!values.contains("input"));
        assert!(values.contains("my_special"));
        assert!(values.contains("force"));
    }

    #[test]
    fn materialize_unexpected() {
        // Setup
        let schema = schema();
        let mut namespace = schema.parse_tokens(&[]).unwrap();
        namespace.insert("other", Entry::Single(Value::new(1u8)));

        // Execute
        let error = materialize(&schema, namespace).unwrap_err();

        // Verify
        assert_eq!(
            error,
            ShapeError::UnexpectedField {
                shape: "Ln".to_string(),
                field: "other".to_string(),
            }
        );
    }

    #[test]
    fn materialize_mismatch() {
        // Setup
        let schema = schema();
        let mut namespace = schema.parse_tokens(&[]).unwrap();
        namespace.insert("my-special", Entry::Multiple(vec![Value::new("x".to_string())]));

        // Execute
        let error = materialize(&schema, namespace).unwrap_err();

        // Verify
        assert_eq!(
            error,
            ShapeError::TypeMismatch {
                shape: "Ln".to_string(),
                field: "my_special".to_string(),
                expected: "Vec<u32>".to_string(),
            }
        );
    }
}
