//! `argshape` derives a command line parser from the shape of a struct, or from the signature of a function.
//!
//! The fields of the shape are the parameters of the program.
//! Each field's type decides how it appears on the command line, while per-field metadata refines the result.
//! `argshape` prioritizes the following:
//! * *Declarations, not configuration*:
//! The user describes the data the program needs; the flags follow from it.
//! * *Type safe results*:
//! The parse result is an instance of the declared shape, never a bag of strings.
//! * *Early failure*:
//! Inconsistent declarations fail when the parser is built, before any input is seen.
//!
//! # Usage
//! via [derive Api](./derive/index.html):
//! ```no_run
#![doc = include_str!("../demos/demo_ls.rs")]
//! ```
//!
//! This generates the following Cli program:
//! ```console
//! $ ls -h
//! usage: ls [-h] [--exclude EXCLUDE] [--print-format PRINT_FORMAT] [--long] [PATHS ...]
//! List directory contents.
//!
//! positional arguments:
//!  PATHS ...                     type: String  default: []
//!
//! options:
//!  -h, --help                   Show this help message and exit.
//!  --exclude EXCLUDE            Patterns to skip.  type: String  default: []
//!  --print-format PRINT_FORMAT  {LINE_PER_ENTRY, PRETTY}  type: PrintFormat  default: LINE_PER_ENTRY
//!  --long
//!
//! $ ls --exclude a --exclude b x1 x2
//! Ls { excludes: ["a", "b"], print_format: LinePerEntry, long: false, paths: ["x1", "x2"] }
//! ```
//!
//! via [`command`](./derive/attr.command.html):
//! ```no_run
#![doc = include_str!("../demos/demo_command.rs")]
//! ```
//!
//! via [`Signature`], when the parameters are only known at runtime:
//! ```no_run
#![doc = include_str!("../demos/demo_signature.rs")]
//! ```
//!
//! # Type Classification
//! Each field type `T` maps onto the command line as follows:
//! ```console
//! Type             | Rule
//! ------------------------------------------------------------------------
//! bool             | --NAME (or --no-NAME when defaulted to true)
//! Option<T>        | as T; defaults to None
//! Vec<T>           | --NAME VALUE, repeatable (append)
//! enum E           | --NAME VALUE, restricted to the member names of E
//! T                | --NAME VALUE, converted via std::str::FromStr
//! ```
//!
//! A field marked `positional` becomes a positional argument instead.
//! Nested shapes are not supported as field types; use `#[argshape(base)]` to inherit the fields of another shape.
//!
//! # Metadata
//! * `positional`: the field is a positional argument.
//! * `args = [..]`: explicit flag names, replacing the derived ones.
//! * `help = ".."`: the help text.
//! * `choices = [..]`: the allowed values.
//! * `cmdline = false`: the field never appears on the command line.
//! * `allow_short_flag`: also derive the short flag `-x` from the first character.
//! * `short_flag = 'x'`: also use the short flag `-x`.
//!
//! # Features
//! * `tracing_debug`: Emit debug traces during schema construction and parsing (via the `tracing` crate).
extern crate self as argshape;

mod app;
pub mod derive;
mod error;
mod materialize;
mod parser;
mod reflect;
mod schema;
mod signature;
mod types;

pub use app::*;
pub use argshape_engine::{
    coerce_from_str, short_type_name, Choice, Coercion, ConfigError, Entry, GeneralParser,
    InvalidCapture, Namespace, Value,
};
pub use error::*;
pub use materialize::*;
pub use parser::*;
pub use reflect::*;
pub use schema::*;
pub use signature::*;
pub use types::*;

/// The common imports for declaring and running shapes.
pub mod prelude {
    pub use crate::derive::{command, Shape, ShapeEnum};
    pub use crate::{
        App, ArgumentParser, Error, FieldType, Invocation, Metadata, Param, Record, Shape,
        ShapeEnum, Signature, Value,
    };
}

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
