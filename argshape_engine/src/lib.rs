//! Parsing engine for `argshape`.
//!
//! Rules are registered on a [`CommandLineParser`], which builds into a [`GeneralParser`].
//! Parsing produces a [`Namespace`] of type-erased [`Value`]s keyed by rule.
//! See the [documentation root](https://docs.rs/argshape/latest/argshape/index.html) for the shape-driven interface built on top.
#![deny(missing_docs)]
mod api;
mod constant;
mod matcher;
mod model;
mod namespace;
mod parser;
mod value;

pub use api::*;
pub use model::*;
pub use namespace::*;
pub use parser::{ConfigError, GeneralParser};
pub use value::*;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
