use crate::load::incompatible_error;
use crate::model::{DeriveDefault, DeriveField, DeriveMeta, DeriveValue, FieldRole, IntermediateAttributes};
use quote::ToTokens;

const SINGLETONS: [&str; 4] = ["base", "positional", "allow_short_flag", "short_flag"];
const PAIRS: [&str; 9] = [
    "positional",
    "args",
    "help",
    "choices",
    "cmdline",
    "allow_short_flag",
    "short_flag",
    "default",
    "default_factory",
];
// The metadata keys, in generation order.
const METADATA: [&str; 7] = [
    "positional",
    "args",
    "help",
    "choices",
    "cmdline",
    "allow_short_flag",
    "short_flag",
];

impl TryFrom<&syn::Field> for DeriveField {
    type Error = syn::Error;

    fn try_from(value: &syn::Field) -> Result<Self, Self::Error> {
        let field_name = value
            .ident
            .clone()
            .expect("internal error - named fields must have an ident");
        load_field(field_name, &value.ty, &value.attrs)
    }
}

pub(crate) fn load_field(
    field_name: syn::Ident,
    field_type: &syn::Type,
    attrs: &[syn::Attribute],
) -> Result<DeriveField, syn::Error> {
    let attributes = IntermediateAttributes::collect(attrs)?;
    attributes.restrict("field", &field_name, &SINGLETONS, &PAIRS)?;
    let field_type = DeriveValue {
        tokens: field_type.to_token_stream(),
    };

    if attributes.singletons.contains("base") {
        let mut others: Vec<&String> = attributes
            .singletons
            .iter()
            .filter(|key| key.as_str() != "base")
            .chain(attributes.pairs.keys())
            .collect();
        others.sort();

        if let Some(other) = others.first() {
            return Err(incompatible_error(
                "field",
                &field_name,
                "#[argshape(base)]",
                format!("#[argshape({other})]"),
            ));
        }

        return Ok(DeriveField {
            field_name,
            field_type,
            role: FieldRole::Base,
        });
    }

    let default = match (
        attributes.single("field", &field_name, "default")?,
        attributes.single("field", &field_name, "default_factory")?,
    ) {
        (Some(_), Some(_)) => {
            return Err(incompatible_error(
                "field",
                &field_name,
                "#[argshape(default = ..)]",
                "#[argshape(default_factory = ..)]",
            ));
        }
        (Some(value), None) => DeriveDefault::Value(value.clone()),
        (None, Some(factory)) => DeriveDefault::Factory(factory.clone()),
        (None, None) => DeriveDefault::Missing,
    };
    let mut metadata = Vec::default();

    for key in METADATA {
        let singleton = attributes.singletons.contains(key);
        let pair = attributes.single("field", &field_name, key)?;

        match (singleton, pair) {
            (true, Some(_)) => {
                return Err(incompatible_error(
                    "field",
                    &field_name,
                    format!("#[argshape({key})]"),
                    format!("#[argshape({key} = ..)]"),
                ));
            }
            (true, None) => metadata.push(DeriveMeta::Flag(key.to_string())),
            (false, Some(value)) if key == "choices" || key == "args" => {
                let array: syn::ExprArray = syn::parse2(value.tokens.clone()).map_err(|_| {
                    syn::Error::new(
                        field_name.span(),
                        format!(
                            "Invalid - field '{field_name}' attribute `{key}` must be an array (ex: `{key} = [..]`)."
                        ),
                    )
                })?;

                if key == "choices" {
                    metadata.push(DeriveMeta::Choices(
                        array
                            .elems
                            .iter()
                            .map(|element| DeriveValue {
                                tokens: element.to_token_stream(),
                            })
                            .collect(),
                    ));
                } else {
                    metadata.push(DeriveMeta::Pair(key.to_string(), value.clone()));
                }
            }
            (false, Some(value)) => metadata.push(DeriveMeta::Pair(key.to_string(), value.clone())),
            (false, None) => {}
        }
    }

    Ok(DeriveField {
        field_name,
        field_type,
        role: FieldRole::Declared { default, metadata },
    })
}
