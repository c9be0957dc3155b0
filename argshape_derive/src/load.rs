mod attribute;
mod command;
mod enumeration;
mod field;
mod shape;

pub(crate) use command::load_command;

pub(self) fn incompatible_error(
    context: &str,
    name: &syn::Ident,
    left: impl Into<String>,
    right: impl Into<String>,
) -> syn::Error {
    syn::Error::new(
        name.span(),
        format!(
            "Invalid - {context} '{name}' cannot be both `{}` and `{}`.",
            left.into(),
            right.into(),
        ),
    )
}

pub(self) fn capitalize(name: &str) -> String {
    let mut characters = name.chars();

    match characters.next() {
        Some(first) => first
            .to_uppercase()
            .chain(characters.flat_map(char::to_lowercase))
            .collect(),
        None => String::default(),
    }
}
