use argshape_engine::Namespace;

use crate::error::{DeclarationError, Error, ShapeError};
use crate::materialize::materialize;
use crate::reflect::{Shape, ShapeInfo, Values};
use crate::schema::{Schema, SchemaBuilder};
use crate::signature::{Record, Signature};

/// A shape which invokes its entry function with its fields spread as arguments.
///
/// Usually generated by `#[command]`.
pub trait Invocation: Shape {
    /// The entry function's return type.
    type Output;

    /// Call the entry function.
    fn invoke(self) -> Self::Output;
}

type Declare<'a> = Box<dyn FnOnce() -> Result<ShapeInfo, DeclarationError> + 'a>;
type Invoke<'a, R> = Box<dyn FnOnce(&ShapeInfo, &mut Values) -> Result<R, ShapeError> + 'a>;

/// Runs one entry function against the command line.
///
/// The schema is built once, the input parsed once, and the entry invoked once.
///
/// ### Example
/// ```
/// use argshape::prelude::*;
///
/// #[derive(Shape)]
/// struct Args {
///     #[argshape(positional)]
///     values: Vec<u32>,
/// }
///
/// let total = App::new("sum", |args: Args| args.values.iter().sum::<u32>())
///     .run_tokens(&["1", "2", "3"])
///     .unwrap();
/// assert_eq!(total, 6);
/// ```
pub struct App<'a, R> {
    builder: SchemaBuilder,
    declare: Declare<'a>,
    invoke: Invoke<'a, R>,
}

impl<'a, R> std::fmt::Debug for App<'a, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("builder", &self.builder)
            .finish()
    }
}

impl<'a, R> App<'a, R> {
    /// Invoke `entry` with one instance of the shape `S`.
    pub fn new<S, F>(program: impl Into<String>, entry: F) -> Self
    where
        S: Shape,
        F: FnOnce(S) -> R + 'a,
    {
        Self {
            builder: SchemaBuilder::new(program),
            declare: Box::new(|| Ok(S::shape())),
            invoke: Box::new(move |_, values| Ok(entry(S::from_values(values)?))),
        }
    }

    /// Invoke the entry function of `S` with the fields spread as arguments.
    pub fn expanded<S>(program: impl Into<String>) -> Self
    where
        S: Invocation<Output = R>,
    {
        Self {
            builder: SchemaBuilder::new(program),
            declare: Box::new(|| Ok(S::shape())),
            invoke: Box::new(|_, values| Ok(S::from_values(values)?.invoke())),
        }
    }

    /// Invoke `entry` with the [`Record`] of a runtime signature.
    pub fn signature<F>(program: impl Into<String>, signature: Signature, entry: F) -> Self
    where
        F: FnOnce(Record) -> R + 'a,
    {
        Self {
            builder: SchemaBuilder::new(program),
            declare: Box::new(move || signature.shape()),
            invoke: Box::new(move |shape, values| Ok(entry(Record::from_values(shape, values)?))),
        }
    }

    /// Document the program.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.builder = self.builder.about(description);
        self
    }

    /// Whether repeated field names drop their trailing `s` in the flag (default: `true`).
    pub fn deplural(mut self, deplural: bool) -> Self {
        self.builder = self.builder.deplural(deplural);
        self
    }

    fn schema(builder: &SchemaBuilder, declare: Declare<'a>) -> Result<Schema, DeclarationError> {
        builder.build(&declare()?)
    }

    fn finish(schema: &Schema, namespace: Namespace, invoke: Invoke<'a, R>) -> Result<R, Error> {
        let mut values = materialize(schema, namespace)?;
        Ok(invoke(schema.shape(), &mut values)?)
    }

    /// Run against the process arguments.
    ///
    /// Help and user input errors are reported, and exit the process.
    pub fn run(self) -> Result<R, Error> {
        let schema = Self::schema(&self.builder, self.declare)?;
        let namespace = schema.parse();
        Self::finish(&schema, namespace, self.invoke)
    }

    /// Run against explicit tokens.
    ///
    /// Help and user input errors are reported, and returned as [`Error::Exit`].
    pub fn run_tokens(self, tokens: &[&str]) -> Result<R, Error> {
        let schema = Self::schema(&self.builder, self.declare)?;
        let namespace = schema.parse_tokens(tokens).map_err(Error::Exit)?;
        Self::finish(&schema, namespace, self.invoke)
    }
}
