//! Derive macros for `argshape`.
//!
//! These are re-exported through `argshape::derive` and `argshape::prelude`; depend on `argshape` rather than this crate directly.
extern crate proc_macro;

mod generate;
mod load;
mod model;

use crate::model::{DeriveEnumeration, DeriveShape};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;

/// Implements `argshape::Shape` and `argshape::FieldType` for a struct with named fields.
///
/// Container attributes: `about = ".."`, `multiple_positionals`.
/// Field attributes: `base`, `positional`, `args = [..]`, `help = ".."`, `choices = [..]`, `cmdline = bool`,
/// `allow_short_flag`, `short_flag = 'x'`, `default = expr`, `default_factory = path`.
#[proc_macro_derive(Shape, attributes(argshape))]
pub fn shape(input: TokenStream) -> TokenStream {
    let derive_input = syn::parse_macro_input!(input as syn::DeriveInput);

    match DeriveShape::try_from(derive_input) {
        Ok(shape) => TokenStream2::from(shape).into(),
        Err(error) => error.to_compile_error().into(),
    }
}

/// Implements `argshape::ShapeEnum`, `argshape::FieldType` and `Display` for an enum of unit variants.
///
/// Container attribute: `rename_all = ".."`.
/// Variant attribute: `name = ".."`.
#[proc_macro_derive(ShapeEnum, attributes(argshape))]
pub fn shape_enum(input: TokenStream) -> TokenStream {
    let derive_input = syn::parse_macro_input!(input as syn::DeriveInput);

    match DeriveEnumeration::try_from(derive_input) {
        Ok(enumeration) => TokenStream2::from(enumeration).into(),
        Err(error) => error.to_compile_error().into(),
    }
}

/// Declares a function as a command.
///
/// Generates a `{Name}Args` struct carrying one field per parameter, which implements `argshape::Shape` and `argshape::Invocation`.
/// Parameters accept the same attributes as the fields of `#[derive(Shape)]`, while the macro arguments accept the container attributes.
#[proc_macro_attribute]
pub fn command(arguments: TokenStream, item: TokenStream) -> TokenStream {
    let function = syn::parse_macro_input!(item as syn::ItemFn);

    match load::load_command(arguments.into(), function) {
        Ok(command) => TokenStream2::from(command).into(),
        Err(error) => error.to_compile_error().into(),
    }
}
