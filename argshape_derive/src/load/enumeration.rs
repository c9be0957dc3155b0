use crate::model::{DeriveEnumeration, DeriveMember, IntermediateAttributes};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenameRule {
    Lower,
    Upper,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn parse(rule: &str) -> Option<Self> {
        match rule {
            "lowercase" => Some(RenameRule::Lower),
            "UPPERCASE" => Some(RenameRule::Upper),
            "snake_case" => Some(RenameRule::Snake),
            "SCREAMING_SNAKE_CASE" => Some(RenameRule::ScreamingSnake),
            "kebab-case" => Some(RenameRule::Kebab),
            "SCREAMING-KEBAB-CASE" => Some(RenameRule::ScreamingKebab),
            _ => None,
        }
    }

    fn apply(&self, variant: &str) -> String {
        let words = words(variant);

        match self {
            RenameRule::Lower => words.concat().to_lowercase(),
            RenameRule::Upper => words.concat().to_uppercase(),
            RenameRule::Snake => words.join("_").to_lowercase(),
            RenameRule::ScreamingSnake => words.join("_").to_uppercase(),
            RenameRule::Kebab => words.join("-").to_lowercase(),
            RenameRule::ScreamingKebab => words.join("-").to_uppercase(),
        }
    }
}

// Split an identifier at case boundaries (ex: `HTTPServer2Go` -> `HTTP`, `Server2`, `Go`).
fn words(identifier: &str) -> Vec<String> {
    let characters: Vec<char> = identifier.chars().collect();
    let mut words = Vec::default();
    let mut current = String::default();

    for (i, c) in characters.iter().enumerate() {
        if *c == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }

            continue;
        }

        let boundary = c.is_uppercase()
            && i > 0
            && (characters[i - 1].is_lowercase()
                || characters[i - 1].is_ascii_digit()
                || (characters[i - 1].is_uppercase()
                    && characters.get(i + 1).map_or(false, |n| n.is_lowercase())));

        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }

        current.push(*c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

fn string_literal(
    context: &str,
    name: &syn::Ident,
    key: &str,
    tokens: &proc_macro2::TokenStream,
) -> Result<String, syn::Error> {
    syn::parse2::<syn::LitStr>(tokens.clone())
        .map(|literal| literal.value())
        .map_err(|_| {
            syn::Error::new(
                name.span(),
                format!("Invalid - {context} '{name}' attribute `{key}` must be a string literal."),
            )
        })
}

impl TryFrom<syn::DeriveInput> for DeriveEnumeration {
    type Error = syn::Error;

    fn try_from(value: syn::DeriveInput) -> Result<Self, Self::Error> {
        let enum_name = value.ident.clone();
        let attributes = IntermediateAttributes::collect(&value.attrs)?;
        attributes.restrict("enumeration", &enum_name, &[], &["rename_all"])?;
        let rename_rule = match attributes.single("enumeration", &enum_name, "rename_all")? {
            Some(value) => {
                let rule = string_literal("enumeration", &enum_name, "rename_all", &value.tokens)?;
                Some(RenameRule::parse(&rule).ok_or_else(|| {
                    syn::Error::new(
                        enum_name.span(),
                        format!("Invalid - enumeration '{enum_name}' has unknown rename rule '{rule}'."),
                    )
                })?)
            }
            None => None,
        };

        let variants = match &value.data {
            syn::Data::Enum(de) => &de.variants,
            _ => {
                return Err(syn::Error::new(
                    enum_name.span(),
                    format!("Invalid - enumeration '{enum_name}' must be an enum."),
                ));
            }
        };
        let mut members = Vec::default();
        let mut names = HashSet::new();

        for variant in variants {
            let variant_name = variant.ident.clone();

            if !matches!(variant.fields, syn::Fields::Unit) {
                return Err(syn::Error::new(
                    variant_name.span(),
                    format!("Invalid - enumeration variant '{variant_name}' must be a unit variant."),
                ));
            }

            let variant_attributes = IntermediateAttributes::collect(&variant.attrs)?;
            variant_attributes.restrict("enumeration variant", &variant_name, &[], &["name"])?;
            let name = match variant_attributes.single("enumeration variant", &variant_name, "name")? {
                Some(value) => {
                    string_literal("enumeration variant", &variant_name, "name", &value.tokens)?
                }
                None => match rename_rule {
                    Some(rule) => rule.apply(&variant_name.to_string()),
                    None => variant_name.to_string(),
                },
            };

            if !names.insert(name.clone()) {
                return Err(syn::Error::new(
                    variant_name.span(),
                    format!("Invalid - enumeration '{enum_name}' has duplicate member name '{name}'."),
                ));
            }

            members.push(DeriveMember { variant_name, name });
        }

        Ok(DeriveEnumeration { enum_name, members })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::Span;
    use rstest::rstest;

    #[rstest]
    #[case("LinePerEntry", vec!["Line", "Per", "Entry"])]
    #[case("HTTPServer", vec!["HTTP", "Server"])]
    #[case("Json2Yaml", vec!["Json2", "Yaml"])]
    #[case("already_snake", vec!["already", "snake"])]
    #[case("A", vec!["A"])]
    fn split_words(#[case] identifier: &str, #[case] expected: Vec<&str>) {
        assert_eq!(words(identifier), expected);
    }

    #[rstest]
    #[case("lowercase", "lineperentry")]
    #[case("UPPERCASE", "LINEPERENTRY")]
    #[case("snake_case", "line_per_entry")]
    #[case("SCREAMING_SNAKE_CASE", "LINE_PER_ENTRY")]
    #[case("kebab-case", "line-per-entry")]
    #[case("SCREAMING-KEBAB-CASE", "LINE-PER-ENTRY")]
    fn rename(#[case] rule: &str, #[case] expected: &str) {
        assert_eq!(RenameRule::parse(rule).unwrap().apply("LinePerEntry"), expected);
    }

    #[test]
    fn construct_enumeration() {
        // Setup
        let input: syn::DeriveInput = syn::parse_str(
            r#"
                #[derive(ShapeEnum)]
                #[argshape(rename_all = "SCREAMING_SNAKE_CASE")]
                enum PrintFormat {
                    LinePerEntry,
                    #[argshape(name = "fancy")]
                    Pretty,
                }
            "#,
        )
        .unwrap();

        // Execute
        let derive_enumeration = DeriveEnumeration::try_from(input).unwrap();

        // Verify
        assert_eq!(
            derive_enumeration,
            DeriveEnumeration {
                enum_name: ident("PrintFormat"),
                members: vec![
                    DeriveMember {
                        variant_name: ident("LinePerEntry"),
                        name: "LINE_PER_ENTRY".to_string(),
                    },
                    DeriveMember {
                        variant_name: ident("Pretty"),
                        name: "fancy".to_string(),
                    },
                ],
            }
        );
    }

    #[test]
    fn construct_enumeration_verbatim() {
        // Setup
        let input: syn::DeriveInput = syn::parse_str("enum Colour { Red, Blue }").unwrap();

        // Execute
        let derive_enumeration = DeriveEnumeration::try_from(input).unwrap();

        // Verify
        let names: Vec<&str> = derive_enumeration
            .members
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["Red", "Blue"]);
    }

    #[rstest]
    #[case("struct Colour { }", "Invalid - enumeration 'Colour' must be an enum.")]
    #[case("enum Colour { Red(u8) }", "Invalid - enumeration variant 'Red' must be a unit variant.")]
    #[case(
        "#[argshape(rename_all = \"camelCase\")] enum Colour { Red }",
        "Invalid - enumeration 'Colour' has unknown rename rule 'camelCase'."
    )]
    #[case(
        "#[argshape(rename_all = lowercase)] enum Colour { Red }",
        "Invalid - enumeration 'Colour' attribute `rename_all` must be a string literal."
    )]
    #[case(
        "#[argshape(rename_all = \"lowercase\")] enum Colour { Red, #[argshape(name = \"red\")] Crimson }",
        "Invalid - enumeration 'Colour' has duplicate member name 'red'."
    )]
    fn construct_enumeration_invalid(#[case] source: &str, #[case] expected: &str) {
        // Setup
        let input: syn::DeriveInput = syn::parse_str(source).unwrap();

        // Execute
        let error = DeriveEnumeration::try_from(input).unwrap_err();

        // Verify
        assert_eq!(error.to_string(), expected);
    }

    fn ident(name: &str) -> syn::Ident {
        syn::Ident::new(name, Span::call_site())
    }
}
