use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;
use std::rc::Rc;

use argshape_engine::{short_type_name, Value};

use crate::error::{DeclarationError, ShapeError};
use crate::types::{FieldType, TypeExpr};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The declared default of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDefault {
    /// The field defaults to this value (which may itself be `None`).
    Value(Value),
    /// The field declares no default.
    Missing,
}

/// A producer which computes a fresh default on every call.
#[derive(Clone)]
pub enum DefaultFactory {
    /// The producer.
    Producer(Rc<dyn Fn() -> Value>),
    /// The field declares no default factory.
    Missing,
}

impl Debug for DefaultFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefaultFactory::Producer(_) => write!(f, "Producer(..)"),
            DefaultFactory::Missing => write!(f, "Missing"),
        }
    }
}

/// One metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    /// A switch (ex: `positional`).
    Bool(bool),
    /// A string (ex: `help`).
    Text(String),
    /// An ordered list of strings (ex: `args`, `choices`).
    List(Vec<String>),
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        MetaValue::Bool(value)
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Text(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Text(value)
    }
}

impl From<char> for MetaValue {
    fn from(value: char) -> Self {
        MetaValue::Text(value.to_string())
    }
}

impl From<Vec<String>> for MetaValue {
    fn from(value: Vec<String>) -> Self {
        MetaValue::List(value)
    }
}

impl<const N: usize> From<[&str; N]> for MetaValue {
    fn from(value: [&str; N]) -> Self {
        MetaValue::List(value.iter().map(|s| s.to_string()).collect())
    }
}

/// The per-field annotations.
///
/// Recognized keys: `positional`, `args`, `help`, `choices`, `cmdline`, `allow_short_flag`, `short_flag`.
/// Any other key is carried along but ignored.
///
/// ### Example
/// ```
/// use argshape::{MetaValue, Metadata};
///
/// let metadata = Metadata::default()
///     .with("help", "Patterns to skip.")
///     .with("allow_short_flag", true);
///
/// assert_eq!(metadata.get("allow_short_flag"), Some(&MetaValue::Bool(true)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: HashMap<String, MetaValue>,
}

impl Metadata {
    /// Set `key`, replacing any previous value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Look up the value of `key`.
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.get(key)
    }

    pub(crate) fn flag(&self, field: &str, key: &str) -> Result<Option<bool>, DeclarationError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(MetaValue::Bool(value)) => Ok(Some(*value)),
            Some(_) => Err(invalid(field, key, "a bool")),
        }
    }

    pub(crate) fn text(&self, field: &str, key: &str) -> Result<Option<&str>, DeclarationError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(MetaValue::Text(value)) => Ok(Some(value)),
            Some(_) => Err(invalid(field, key, "a string")),
        }
    }

    pub(crate) fn list(
        &self,
        field: &str,
        key: &str,
    ) -> Result<Option<&[String]>, DeclarationError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(MetaValue::List(values)) if !values.is_empty() => Ok(Some(values)),
            Some(_) => Err(invalid(field, key, "a non-empty list of strings")),
        }
    }
}

pub(crate) fn invalid(field: &str, key: &str, expected: &str) -> DeclarationError {
    DeclarationError::InvalidMetadata {
        field: field.to_string(),
        key: key.to_string(),
        expected: expected.to_string(),
    }
}

/// The introspected description of one field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    declared_type: TypeExpr,
    default: FieldDefault,
    default_factory: DefaultFactory,
    metadata: Metadata,
}

impl FieldDescriptor {
    /// Describe a field without any default or metadata.
    pub fn new(name: impl Into<String>, declared_type: TypeExpr) -> Self {
        Self {
            name: name.into(),
            declared_type,
            default: FieldDefault::Missing,
            default_factory: DefaultFactory::Missing,
            metadata: Metadata::default(),
        }
    }

    /// Describe a field of type `T`.
    pub fn of<T: FieldType>(name: impl Into<String>) -> Self {
        Self::new(name, T::describe())
    }

    /// Set the default.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = FieldDefault::Value(value);
        self
    }

    /// Set the default factory.
    pub fn with_default_factory(mut self, factory: impl Fn() -> Value + 'static) -> Self {
        self.default_factory = DefaultFactory::Producer(Rc::new(factory));
        self
    }

    /// Set the metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type.
    pub fn declared_type(&self) -> &TypeExpr {
        &self.declared_type
    }

    /// The declared default.
    pub fn default(&self) -> &FieldDefault {
        &self.default
    }

    /// The declared default factory.
    pub fn default_factory(&self) -> &DefaultFactory {
        &self.default_factory
    }

    /// The metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The value this field takes when none is supplied: the factory result, else the default, else the type's implicit value.
    pub fn fallback(&self) -> Option<Value> {
        match (&self.default_factory, &self.default) {
            (DefaultFactory::Producer(factory), _) => Some(factory()),
            (DefaultFactory::Missing, FieldDefault::Value(value)) => Some(value.clone()),
            (DefaultFactory::Missing, FieldDefault::Missing) => {
                self.declared_type.implicit().cloned()
            }
        }
    }
}

/// The description of a declared shape: its ordered fields.
#[derive(Debug, Clone)]
pub struct ShapeInfo {
    name: String,
    about: Option<String>,
    fields: Vec<FieldDescriptor>,
    inherited: usize,
    multiple_positionals: bool,
    shadow_mismatches: Vec<(String, String, String)>,
}

impl ShapeInfo {
    /// Describe an empty shape.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            fields: Vec::default(),
            inherited: 0,
            multiple_positionals: false,
            shadow_mismatches: Vec::default(),
        }
    }

    /// Describe the shape backing the type, which must be a record shape.
    pub fn of_type(declared: &TypeExpr) -> Result<Self, DeclarationError> {
        declared
            .record_shape()
            .ok_or_else(|| DeclarationError::NotARecordShape(declared.name().to_string()))
    }

    /// Document the shape, for the help message.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// Allow more than one positional field; positionals consume tokens in declaration order.
    pub fn multiple_positionals(mut self, allow: bool) -> Self {
        self.multiple_positionals = allow;
        self
    }

    /// Inherit the fields of `base`.
    ///
    /// Inherited fields come before the fields declared directly on this shape.
    /// A declared field shadowing an inherited one must have the same type (see [`ShapeInfo::validate`]).
    pub fn inherit(mut self, base: ShapeInfo) -> Self {
        self.shadow_mismatches.extend(base.shadow_mismatches);

        for field in base.fields {
            match self.fields.iter().position(|f| f.name == field.name) {
                // Shadowed: the declared field takes over the inherited position.
                Some(index) if index >= self.inherited => {
                    if self.fields[index].declared_type != field.declared_type {
                        self.shadow_mismatches.push((
                            field.name.clone(),
                            self.fields[index].declared_type.name().to_string(),
                            field.declared_type.name().to_string(),
                        ));
                    }

                    let shadow = self.fields.remove(index);
                    self.fields.insert(self.inherited, shadow);
                    self.inherited += 1;
                }
                Some(index) => self.fields[index] = field,
                None => {
                    self.fields.insert(self.inherited, field);
                    self.inherited += 1;
                }
            }
        }

        if self.multiple_positionals || base.multiple_positionals {
            self.multiple_positionals = true;
        }

        if self.about.is_none() {
            self.about = base.about;
        }

        self
    }

    /// Check the declaration for defects which the builder methods defer.
    pub fn validate(&self) -> Result<(), DeclarationError> {
        match self.shadow_mismatches.first() {
            Some((field, type_name, inherited)) => Err(DeclarationError::ShadowTypeMismatch {
                field: field.clone(),
                type_name: type_name.clone(),
                inherited: inherited.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Add a field.
    ///
    /// A field with the same name as an existing one replaces it in place.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        match self.fields.iter().position(|f| f.name == field.name) {
            Some(index) => {
                if index < self.inherited && self.fields[index].declared_type != field.declared_type {
                    self.shadow_mismatches.push((
                        field.name.clone(),
                        field.declared_type.name().to_string(),
                        self.fields[index].declared_type.name().to_string(),
                    ));
                }

                self.fields[index] = field;
            }
            None => self.fields.push(field),
        }

        self
    }

    /// The shape name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The about message.
    pub fn about_message(&self) -> Option<&str> {
        self.about.as_deref()
    }

    /// Whether more than one positional field is allowed.
    pub fn allows_multiple_positionals(&self) -> bool {
        self.multiple_positionals
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The ordered fields.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

/// The ordered field descriptors of a shape, including inherited fields.
pub fn fields_of(shape: &ShapeInfo) -> &[FieldDescriptor] {
    #[cfg(feature = "tracing_debug")]
    {
        debug!(
            "Fields of {}: {:?}.",
            shape.name,
            shape.fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>()
        );
    }

    shape.fields()
}

/// A record type which describes its own fields, and can be reconstructed from parsed values.
///
/// Usually implemented via `#[derive(Shape)]`.
pub trait Shape: Sized + 'static {
    /// Describe the shape.
    fn shape() -> ShapeInfo;

    /// Construct an instance, taking the field values from `values`.
    ///
    /// A field without a value falls back to its own default, else fails with [`ShapeError::MissingField`].
    fn from_values(values: &mut Values) -> Result<Self, ShapeError>;
}

/// The materialized field values of one parse, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Values {
    shape: String,
    entries: HashMap<String, Value>,
    shadows: HashMap<String, Value>,
}

impl Values {
    /// Create empty values for the named shape.
    pub fn new(shape: impl Into<String>) -> Self {
        Self {
            shape: shape.into(),
            entries: HashMap::default(),
            shadows: HashMap::default(),
        }
    }

    /// The name of the shape these values belong to.
    pub fn shape(&self) -> &str {
        &self.shape
    }

    /// Set the value of `field`.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.entries.insert(field.into(), value);
    }

    /// Whether `field` has a value.
    pub fn contains(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    /// The fields with values.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// The number of fields with values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no field has a value.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove the type erased value of `field`, if present.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.entries.remove(field)
    }

    /// Offer the resolved value of a field which shadows a field of an inherited shape.
    ///
    /// The inherited shape takes it only when the field types agree; otherwise it falls back to its own default.
    pub fn shadow(&mut self, field: impl Into<String>, value: Value) {
        self.shadows.insert(field.into(), value);
    }

    /// Take the value of `field`, if present.
    pub fn take<T: Any>(&mut self, field: &str) -> Result<Option<T>, ShapeError> {
        match self.entries.remove(field) {
            Some(value) => value.downcast::<T>().map(Some).map_err(|_| {
                ShapeError::TypeMismatch {
                    shape: self.shape.clone(),
                    field: field.to_string(),
                    expected: short_type_name::<T>(),
                }
            }),
            None => Ok(self
                .shadows
                .remove(field)
                .and_then(|value| value.downcast::<T>().ok())),
        }
    }

    /// Take the value of `field`, falling back to the type's implicit value (ex: `None` for `Option<T>`).
    pub fn require<T: FieldType>(&mut self, field: &str) -> Result<T, ShapeError> {
        match self.take::<T>(field)? {
            Some(value) => Ok(value),
            None => T::implicit().ok_or_else(|| ShapeError::MissingField {
                shape: self.shape.clone(),
                field: field.to_string(),
            }),
        }
    }
}
