use std::marker::PhantomData;

use crate::error::{DeclarationError, Error, ShapeError};
use crate::materialize::construct;
use crate::reflect::Shape;
use crate::schema::{Schema, SchemaBuilder};

/// The command line parser of a shape `S`.
///
/// ### Example
/// ```
/// use argshape::prelude::*;
///
/// #[derive(Debug, PartialEq, Shape)]
/// struct Ls {
///     #[argshape(default_factory = Vec::new)]
///     excludes: Vec<String>,
///     #[argshape(positional)]
///     paths: Vec<String>,
/// }
///
/// let parser = ArgumentParser::<Ls>::new("ls").unwrap();
/// let ls = parser.parse_tokens(&["--exclude", "a", "x"]).unwrap();
///
/// assert_eq!(ls, Ls { excludes: vec!["a".to_string()], paths: vec!["x".to_string()] });
/// ```
#[derive(Debug)]
pub struct ArgumentParser<S> {
    schema: Schema,
    _shape: PhantomData<S>,
}

impl<S: Shape> ArgumentParser<S> {
    /// Build the parser of `S` for the named program.
    pub fn new(program: impl Into<String>) -> Result<Self, DeclarationError> {
        Self::from_builder(SchemaBuilder::new(program))
    }

    /// Build the parser of `S` with an explicitly configured builder.
    pub fn from_builder(builder: SchemaBuilder) -> Result<Self, DeclarationError> {
        Ok(Self {
            schema: builder.build(&S::shape())?,
            _shape: PhantomData,
        })
    }

    /// The derived schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Parse the tokens into an instance of `S`.
    ///
    /// Help and user input errors are reported by the parser, and returned as [`Error::Exit`].
    pub fn parse_tokens(&self, tokens: &[&str]) -> Result<S, Error> {
        let namespace = self.schema.parse_tokens(tokens).map_err(Error::Exit)?;
        Ok(construct(&self.schema, namespace)?)
    }

    /// Parse the process arguments into an instance of `S`.
    ///
    /// Help and user input errors are reported, and exit the process.
    pub fn parse(&self) -> Result<S, ShapeError> {
        construct(&self.schema, self.schema.parse())
    }

    /// Render the help message.
    pub fn help(&self) -> String {
        self.schema.help()
    }
}
