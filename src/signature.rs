use std::any::Any;
use std::fmt::Debug;

use argshape_engine::Value;

use crate::error::{DeclarationError, ShapeError};
use crate::reflect::{FieldDescriptor, Metadata, ShapeInfo, Values};
use crate::types::{FieldType, TypeExpr};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// One parameter of a [`Signature`].
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    annotation: Option<TypeExpr>,
    default: Option<Value>,
    metadata: Metadata,
}

impl Param {
    /// Declare a parameter without a type annotation.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            default: None,
            metadata: Metadata::default(),
        }
    }

    /// Annotate the parameter as a `T`.
    pub fn typed<T: FieldType>(self) -> Self {
        self.annotated(T::describe())
    }

    /// Annotate the parameter with an explicit type description.
    pub fn annotated(mut self, annotation: TypeExpr) -> Self {
        self.annotation.replace(annotation);
        self
    }

    /// Set the default.
    /// Every parse receives its own copy.
    pub fn default<T: Any + Clone + PartialEq + Debug>(mut self, value: T) -> Self {
        self.default.replace(Value::new(value));
        self
    }

    /// Set the metadata.
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// The parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The parameter list of a callable, described at runtime.
///
/// ### Example
/// ```
/// use argshape::{Param, Signature};
///
/// let shape = Signature::new("ls")
///     .param(Param::new("paths").typed::<Vec<String>>())
///     .param(Param::new("all").typed::<bool>().default(false))
///     .shape()
///     .unwrap();
///
/// assert_eq!(shape.name(), "LsArgs");
/// assert_eq!(shape.fields().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Signature {
    name: String,
    params: Vec<Param>,
}

impl Signature {
    /// Describe the callable with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::default(),
        }
    }

    /// Add the next parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// The callable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parameters, in order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Synthesize the shape of the parameter list.
    ///
    /// When the first parameter is itself a record shape, that shape is used as is.
    pub fn shape(&self) -> Result<ShapeInfo, DeclarationError> {
        let mut annotations = Vec::with_capacity(self.params.len());

        for param in &self.params {
            match &param.annotation {
                Some(annotation) => annotations.push(annotation),
                None => return Err(DeclarationError::MissingAnnotation(param.name.clone())),
            }
        }

        if let Some(shape) = annotations.first().and_then(|a| a.record_shape()) {
            return Ok(shape);
        }

        let mut shape = ShapeInfo::new(format!("{}Args", capitalize(&self.name)));

        for (param, annotation) in self.params.iter().zip(annotations) {
            let mut field = FieldDescriptor::new(param.name.clone(), annotation.clone())
                .with_metadata(param.metadata.clone());

            if let Some(default) = &param.default {
                let default = default.clone();
                field = field.with_default_factory(move || default.clone());
            }

            shape = shape.field(field);
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Synthesized {} from the signature of {}.", shape.name(), self.name);
        }

        Ok(shape)
    }
}

fn capitalize(name: &str) -> String {
    let mut characters = name.chars();

    match characters.next() {
        Some(first) => first
            .to_uppercase()
            .chain(characters.flat_map(char::to_lowercase))
            .collect(),
        None => String::default(),
    }
}

/// A dynamically constructed instance of a shape, used where no Rust type backs the shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    shape: String,
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Construct the record, in field order.
    ///
    /// A field without a value takes its fallback (see [`FieldDescriptor::fallback`]), else fails with [`ShapeError::MissingField`].
    pub fn from_values(shape: &ShapeInfo, values: &mut Values) -> Result<Self, ShapeError> {
        let mut fields = Vec::with_capacity(shape.fields().len());

        for field in shape.fields() {
            let value = match values.remove(field.name()) {
                Some(value) => value,
                None => field.fallback().ok_or_else(|| ShapeError::MissingField {
                    shape: shape.name().to_string(),
                    field: field.name().to_string(),
                })?,
            };
            fields.push((field.name().to_string(), value));
        }

        Ok(Self {
            shape: shape.name().to_string(),
            fields,
        })
    }

    /// The name of the shape.
    pub fn shape(&self) -> &str {
        &self.shape
    }

    /// The type erased value of `field`.
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// The value of `field` as a `T`.
    pub fn get<T: Any>(&self, field: &str) -> Option<&T> {
        self.value(field).and_then(Value::downcast_ref::<T>)
    }

    /// The field names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}
