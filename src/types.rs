use std::any::Any;
use std::fmt::Debug;
use std::rc::Rc;

use argshape_engine::{coerce_from_str, short_type_name, Coercion, InvalidCapture, Value};

use crate::reflect::{Shape, ShapeInfo};

/// A named constant of an enumeration, as it is spelled on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    name: String,
    value: Value,
}

impl Member {
    /// The declared name of the member.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The member itself.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// The closed set of field type kinds, determined once when the type is described.
#[derive(Clone)]
pub enum TypeKind {
    /// `bool`: parsed as a toggle flag.
    Toggle,
    /// Any single-token type.
    Scalar(Coercion),
    /// `Option<T>`.
    Optional {
        /// The wrapped type `T`.
        inner: Box<TypeExpr>,
        /// Convert a `T` value into a `Some(T)` value.
        wrap: fn(Value) -> Result<Value, Value>,
    },
    /// `Vec<T>`.
    Repeated {
        /// The element type `T`.
        element: Box<TypeExpr>,
        /// Split a `Vec<T>` value into its `T` values.
        split: fn(&Value) -> Option<Vec<Value>>,
        /// Join `T` values into a `Vec<T>` value.
        join: fn(Vec<Value>) -> Result<Value, Value>,
    },
    /// A `#[derive(ShapeEnum)]` type.
    Enumeration(Vec<Member>),
    /// A `#[derive(Shape)]` type.
    Shape(fn() -> ShapeInfo),
}

/// The description of a declared field type.
#[derive(Clone)]
pub struct TypeExpr {
    name: String,
    kind: TypeKind,
    implicit: Option<Value>,
}

impl Debug for TypeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeExpr[{}]", self.name)
    }
}

impl PartialEq for TypeExpr {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl TypeExpr {
    /// Describe a type parsed via [`std::str::FromStr`].
    pub fn scalar<T>() -> Self
    where
        T: std::str::FromStr + Clone + PartialEq + Debug + 'static,
    {
        Self {
            name: short_type_name::<T>(),
            kind: TypeKind::Scalar(coerce_from_str::<T>()),
            implicit: None,
        }
    }

    /// Describe `bool`.
    pub fn toggle() -> Self {
        Self {
            name: "bool".to_string(),
            kind: TypeKind::Toggle,
            implicit: None,
        }
    }

    /// Describe `Option<T>`, which implicitly defaults to `None`.
    pub fn optional<T>() -> Self
    where
        T: FieldType + Clone + PartialEq + Debug,
    {
        let inner = T::describe();
        Self {
            name: format!("Option<{}>", inner.name),
            kind: TypeKind::Optional {
                inner: Box::new(inner),
                wrap: wrap_some::<T>,
            },
            implicit: Some(Value::new(None::<T>)),
        }
    }

    /// Describe `Vec<T>`.
    pub fn repeated<T>() -> Self
    where
        T: FieldType + Clone + PartialEq + Debug,
    {
        let element = T::describe();
        Self {
            name: format!("Vec<{}>", element.name),
            kind: TypeKind::Repeated {
                element: Box::new(element),
                split: split_vec::<T>,
                join: join_vec::<T>,
            },
            implicit: None,
        }
    }

    /// Describe an enumeration.
    pub fn enumeration<E>() -> Self
    where
        E: ShapeEnum + Clone + PartialEq + Debug + 'static,
    {
        Self {
            name: short_type_name::<E>(),
            kind: TypeKind::Enumeration(
                E::members()
                    .into_iter()
                    .map(|(name, member)| Member {
                        name: name.to_string(),
                        value: Value::new(member),
                    })
                    .collect(),
            ),
            implicit: None,
        }
    }

    /// Describe a record shape.
    pub fn shape<S: Shape>() -> Self {
        Self {
            name: short_type_name::<S>(),
            kind: TypeKind::Shape(S::shape),
            implicit: None,
        }
    }

    /// The type name (ex: `Vec<String>`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind of type.
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// The value a field of this type takes when nothing else supplies one (ex: `None` for `Option<T>`).
    pub fn implicit(&self) -> Option<&Value> {
        self.implicit.as_ref()
    }

    /// Whether this type is a record shape.
    pub fn is_record_shape(&self) -> bool {
        matches!(self.kind, TypeKind::Shape(_))
    }

    /// The shape description, for record shapes.
    pub fn record_shape(&self) -> Option<ShapeInfo> {
        match self.kind {
            TypeKind::Shape(shape) => Some(shape()),
            _ => None,
        }
    }

    /// The conversion from one command line token into a value of this type.
    ///
    /// `None` for types which cannot be represented by a single token.
    pub fn coercion(&self) -> Option<Coercion> {
        match &self.kind {
            TypeKind::Toggle => Some(coerce_from_str::<bool>()),
            TypeKind::Scalar(coercion) => Some(coercion.clone()),
            TypeKind::Optional { inner, wrap } => {
                let inner_coercion = inner.coercion()?;
                let wrap = *wrap;
                let type_name = self.name.clone();
                Some(Rc::new(move |token: &str| {
                    wrap(inner_coercion(token)?).map_err(|_| InvalidCapture::InvalidConversion {
                        token: token.to_string(),
                        type_name: type_name.clone(),
                    })
                }))
            }
            TypeKind::Enumeration(members) => {
                let members = members.clone();
                let type_name = self.name.clone();
                Some(Rc::new(move |token: &str| {
                    members
                        .iter()
                        .find(|member| member.name == token)
                        .map(|member| member.value.clone())
                        .ok_or_else(|| InvalidCapture::InvalidConversion {
                            token: token.to_string(),
                            type_name: type_name.clone(),
                        })
                }))
            }
            TypeKind::Repeated { .. } | TypeKind::Shape(_) => None,
        }
    }

    /// The enumeration members, seeing through `Option<E>`.
    pub fn members(&self) -> Option<&[Member]> {
        match &self.kind {
            TypeKind::Enumeration(members) => Some(members),
            TypeKind::Optional { inner, .. } => inner.members(),
            _ => None,
        }
    }
}

fn wrap_some<T: Any + Clone + PartialEq + Debug>(value: Value) -> Result<Value, Value> {
    value.downcast::<T>().map(|inner| Value::new(Some(inner)))
}

fn split_vec<T: Any + Clone + PartialEq + Debug>(value: &Value) -> Option<Vec<Value>> {
    value
        .downcast_ref::<Vec<T>>()
        .map(|items| items.iter().cloned().map(Value::new).collect())
}

fn join_vec<T: Any + Clone + PartialEq + Debug>(values: Vec<Value>) -> Result<Value, Value> {
    let mut items: Vec<T> = Vec::with_capacity(values.len());

    for value in values {
        items.push(value.downcast::<T>()?);
    }

    Ok(Value::new(items))
}

/// A type which may be declared as a field of a shape.
///
/// Implemented for the primitives, `String`, `PathBuf`, `OsString`, `Option<T>` and `Vec<T>`.
/// The derive macros implement it for shapes and enumerations.
/// Any other [`std::str::FromStr`] type may opt in via [`impl_field_type!`](crate::impl_field_type).
pub trait FieldType: Sized + 'static {
    /// Describe the type.
    fn describe() -> TypeExpr;

    /// The value a field of this type takes when nothing else supplies one.
    fn implicit() -> Option<Self> {
        None
    }
}

/// A closed set of named constants.
///
/// Usually implemented via `#[derive(ShapeEnum)]`.
pub trait ShapeEnum: Sized {
    /// Every member with its command line name, in declaration order.
    fn members() -> Vec<(&'static str, Self)>;
}

/// Implement [`FieldType`] for a type parsed via [`std::str::FromStr`].
///
/// ### Example
/// ```
/// use argshape::{impl_field_type, FieldType};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Port(u16);
///
/// impl std::str::FromStr for Port {
///     type Err = std::num::ParseIntError;
///
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         s.parse().map(Port)
///     }
/// }
///
/// impl_field_type!(Port);
/// assert_eq!(Port::describe().name(), "Port");
/// ```
#[macro_export]
macro_rules! impl_field_type {
    ($($t:ty),+ $(,)?) => {
        $(
            impl $crate::FieldType for $t {
                fn describe() -> $crate::TypeExpr {
                    $crate::TypeExpr::scalar::<$t>()
                }
            }
        )+
    };
}

impl_field_type!(
    char,
    String,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    std::path::PathBuf,
    std::ffi::OsString,
);

impl FieldType for bool {
    fn describe() -> TypeExpr {
        TypeExpr::toggle()
    }
}

impl<T: FieldType + Clone + PartialEq + Debug> FieldType for Option<T> {
    fn describe() -> TypeExpr {
        TypeExpr::optional::<T>()
    }

    fn implicit() -> Option<Self> {
        Some(None)
    }
}

impl<T: FieldType + Clone + PartialEq + Debug> FieldType for Vec<T> {
    fn describe() -> TypeExpr {
        TypeExpr::repeated::<T>()
    }
}

/// Split a declared type into its element type and whether it is repeated.
pub fn classify(declared: &TypeExpr) -> (&TypeExpr, bool) {
    match &declared.kind {
        TypeKind::Repeated { element, .. } => (element, true),
        _ => (declared, false),
    }
}

/// Whether the type is an enumeration (or an optional enumeration).
pub fn is_enum(declared: &TypeExpr) -> bool {
    declared.members().is_some()
}

/// Whether the (element) type is itself a record shape.
pub fn is_nested_shape(declared: &TypeExpr) -> bool {
    let (element, _) = classify(declared);

    match &element.kind {
        TypeKind::Optional { inner, .. } => inner.is_record_shape(),
        _ => element.is_record_shape(),
    }
}
