use crate::model::{DeriveField, DeriveShape, IntermediateAttributes};

pub(crate) const CONTAINER_SINGLETONS: [&str; 1] = ["multiple_positionals"];
pub(crate) const CONTAINER_PAIRS: [&str; 1] = ["about"];

impl TryFrom<syn::DeriveInput> for DeriveShape {
    type Error = syn::Error;

    fn try_from(value: syn::DeriveInput) -> Result<Self, Self::Error> {
        let struct_name = value.ident.clone();
        let attributes = IntermediateAttributes::collect(&value.attrs)?;

        if !value.generics.params.is_empty() {
            return Err(syn::Error::new(
                struct_name.span(),
                format!("Invalid - shape '{struct_name}' cannot be generic."),
            ));
        }

        let fields = match &value.data {
            syn::Data::Struct(ds) => match &ds.fields {
                syn::Fields::Named(fields) => fields
                    .named
                    .iter()
                    .map(DeriveField::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
                syn::Fields::Unit => Vec::default(),
                syn::Fields::Unnamed(_) => {
                    return Err(syn::Error::new(
                        struct_name.span(),
                        format!("Invalid - shape '{struct_name}' must have named fields."),
                    ));
                }
            },
            _ => {
                return Err(syn::Error::new(
                    struct_name.span(),
                    format!("Invalid - shape '{struct_name}' must be a struct."),
                ));
            }
        };

        load_shape(struct_name, attributes, fields)
    }
}

pub(crate) fn load_shape(
    struct_name: syn::Ident,
    attributes: IntermediateAttributes,
    fields: Vec<DeriveField>,
) -> Result<DeriveShape, syn::Error> {
    attributes.restrict("shape", &struct_name, &CONTAINER_SINGLETONS, &CONTAINER_PAIRS)?;
    let about = attributes
        .single("shape", &struct_name, "about")?
        .cloned();

    Ok(DeriveShape {
        multiple_positionals: attributes.singletons.contains("multiple_positionals"),
        struct_name,
        about,
        fields,
    })
}
