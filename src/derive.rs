//! Derive Api for `argshape` declarations.
//!
//! ### Getting Started
//! Instrument a struct `S` with `#[derive(Shape)]`, then parse it via [`ArgumentParser<S>`](../struct.ArgumentParser.html) or [`App`](../struct.App.html).
//! Field types used on the struct must implement [`FieldType`](../trait.FieldType.html); enumerations get theirs via `#[derive(ShapeEnum)]`.
//!
//! ```no_run
#![doc = include_str!("../demos/demo_ln.rs")]
//! ```
//!
//! This generates the following Cli program:
//! ```console
//! $ ln -h
//! usage: ln [-h] [-f] [-s] TARGET LINK_NAME
//! Make links between files.
//!
//! positional arguments:
//!  TARGET                 type: String
//!  LINK_NAME              type: String
//!
//! options:
//!  -h, --help   Show this help message and exit.
//!  -f, --force  Remove existing destination files.
//!  -s, --symbolic
//! ```
//!
//! ### Container Attributes
//! * `#[argshape(about = "..")]`: the program description shown in the help message.
//! * `#[argshape(multiple_positionals)]`: allow more than one positional field.
//!
//! ### Field Attributes
//! * `#[argshape(base)]`: inherit the fields of another shape (shadowed by same-named fields declared here).
//! * `#[argshape(default = expr)]` or `#[argshape(default_factory = path)]`: the field's default.
//! Only one of these may be used on the same field.
//! * The [metadata](../index.html#metadata) keys.
//!
//! ### Enumeration Attributes
//! * `#[argshape(rename_all = "..")]`: rename every member (`lowercase`, `UPPERCASE`, `snake_case`, `SCREAMING_SNAKE_CASE`, `kebab-case`, `SCREAMING-KEBAB-CASE`).
//! * `#[argshape(name = "..")]` on a variant: the member name of that variant.
//!
//! Without either, the variant identifier is the member name.
pub use argshape_derive::{command, Shape, ShapeEnum};
