use std::any::{type_name, Any};
use std::fmt::Debug;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

/// Behaviour for any type which may be stored in a [`Namespace`](crate::Namespace).
///
/// This is blanket implemented for every `T: Any + Clone + PartialEq + Debug`.
#[doc(hidden)]
pub trait Storable: Any + Debug {
    /// Clone behind the box.
    fn clone_boxed(&self) -> Box<dyn Storable>;
    /// Equality across erased types; values of different types are never equal.
    fn eq_dyn(&self, other: &dyn Storable) -> bool;
    /// Borrow as `Any`.
    fn as_any(&self) -> &dyn Any;
    /// Convert into a boxed `Any`.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any + Clone + PartialEq + Debug> Storable for T {
    fn clone_boxed(&self) -> Box<dyn Storable> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn Storable) -> bool {
        match other.as_any().downcast_ref::<T>() {
            Some(other) => self == other,
            None => false,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A type erased value produced by a [`Coercion`], or supplied as a rule default.
///
/// ### Example
/// ```
/// use argshape_engine::Value;
///
/// let value = Value::new(5u32);
/// assert_eq!(value.downcast_ref::<u32>(), Some(&5));
/// assert!(value.clone().downcast::<i64>().is_err());
/// assert_eq!(value.downcast::<u32>().unwrap(), 5);
/// ```
pub struct Value(Box<dyn Storable>);

impl Value {
    /// Wrap a concrete value.
    pub fn new<T: Any + Clone + PartialEq + Debug>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Whether the wrapped value is of type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.0.as_any().is::<T>()
    }

    /// Borrow the wrapped value as a `T`, if that is its type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Take the wrapped value as a `T`.
    /// When the value is of some other type, it is handed back unchanged.
    pub fn downcast<T: Any>(self) -> Result<T, Value> {
        if !self.is::<T>() {
            return Err(self);
        }

        match self.0.into_any().downcast::<T>() {
            Ok(inner) => Ok(*inner),
            Err(_) => unreachable!("internal error - type check must agree with downcast"),
        }
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        Self(self.0.clone_boxed())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_dyn(&*other.0)
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&*self.0, f)
    }
}

/// Conversion from a single input token to a [`Value`].
pub type Coercion = Rc<dyn Fn(&str) -> Result<Value, InvalidCapture>>;

/// Build a [`Coercion`] for any `T` which implements [`FromStr`].
///
/// ### Example
/// ```
/// use argshape_engine::{coerce_from_str, Value};
///
/// let coercion = coerce_from_str::<i8>();
/// assert_eq!(coercion("-3").unwrap(), Value::new(-3i8));
/// assert!(coercion("300").is_err());
/// ```
pub fn coerce_from_str<T>() -> Coercion
where
    T: FromStr + Clone + PartialEq + Debug + 'static,
{
    Rc::new(|token: &str| match T::from_str(token) {
        Ok(value) => Ok(Value::new(value)),
        Err(_) => Err(InvalidCapture::InvalidConversion {
            token: token.to_string(),
            type_name: short_type_name::<T>(),
        }),
    })
}

/// The name of `T` without its module path (ex: `std::path::PathBuf` becomes `PathBuf`).
pub fn short_type_name<T: ?Sized>() -> String {
    let full = type_name::<T>();
    let mut out = String::default();
    let mut segment = String::default();

    for c in full.chars() {
        match c {
            ':' => segment.clear(),
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | ';' => {
                out.push_str(&segment);
                segment.clear();
                out.push(c);
            }
            _ => segment.push(c),
        }
    }

    out.push_str(&segment);
    out
}

/// The reasons a token may fail to become a [`Value`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidCapture {
    /// The token cannot be converted to the target type.
    #[error("'{token}' cannot convert to {type_name}.")]
    InvalidConversion {
        /// The offending token.
        token: String,
        /// The target type.
        type_name: String,
    },
}

/// One allowed value for a rule, paired with the label it is displayed and matched by.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    label: String,
    value: Value,
}

impl Choice {
    /// Create a choice with an explicit label.
    pub fn new(label: impl Into<String>, value: Value) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    /// Create a choice labelled by its value.
    /// Text values are labelled verbatim, all others by their `Debug` form.
    ///
    /// ### Example
    /// ```
    /// use argshape_engine::{Choice, Value};
    ///
    /// assert_eq!(Choice::of("red").label(), "red");
    /// assert_eq!(Choice::of("red").value(), &Value::new("red".to_string()));
    /// assert_eq!(Choice::of(7u8).label(), "7");
    /// ```
    pub fn of<T: Any + Clone + PartialEq + Debug>(value: T) -> Self {
        let any: &dyn Any = &value;

        if let Some(text) = any.downcast_ref::<&'static str>() {
            Self::new(*text, Value::new(text.to_string()))
        } else if let Some(text) = any.downcast_ref::<String>() {
            Self::new(text.clone(), Value::new(text.clone()))
        } else {
            Self::new(format!("{value:?}"), Value::new(value))
        }
    }

    /// The display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The underlying value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}
