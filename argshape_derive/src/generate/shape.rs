use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;

use crate::model::{DeriveDefault, DeriveField, DeriveMeta, DeriveShape, FieldRole};

impl From<DeriveShape> for TokenStream2 {
    fn from(value: DeriveShape) -> Self {
        shape_impls(&value)
    }
}

fn local(field_name: &syn::Ident) -> syn::Ident {
    format_ident!("{}_value", field_name.unraw())
}

fn describe(field: &DeriveField) -> TokenStream2 {
    let DeriveField {
        field_name,
        field_type,
        role,
    } = field;
    let name = field_name.unraw().to_string();
    let ty = &field_type.tokens;

    match role {
        FieldRole::Base => quote! {
            .inherit(<#ty as argshape::Shape>::shape())
        },
        FieldRole::Declared { default, metadata } => {
            let default = match default {
                DeriveDefault::Missing => quote! {},
                DeriveDefault::Value(value) => {
                    let value = &value.tokens;
                    quote! { .with_default(argshape::Value::new::<#ty>(#value)) }
                }
                DeriveDefault::Factory(factory) => {
                    let factory = &factory.tokens;
                    quote! { .with_default_factory(|| argshape::Value::new::<#ty>((#factory)())) }
                }
            };
            let metadata = if metadata.is_empty() {
                quote! {}
            } else {
                let entries = metadata.iter().map(|meta| match meta {
                    DeriveMeta::Flag(key) => quote! { .with(#key, true) },
                    DeriveMeta::Pair(key, value) => {
                        let value = &value.tokens;
                        quote! { .with(#key, #value) }
                    }
                    DeriveMeta::Choices(values) => {
                        let values = values.iter().map(|v| &v.tokens);
                        quote! {
                            .with("choices", <::std::vec::Vec<::std::string::String>>::from([
                                #( ::std::string::ToString::to_string(&(#values)) ),*
                            ]))
                        }
                    }
                });
                quote! { .with_metadata(argshape::Metadata::default() #( #entries )*) }
            };

            quote! {
                .field(argshape::FieldDescriptor::of::<#ty>(#name) #default #metadata)
            }
        }
    }
}

fn resolve(field: &DeriveField) -> Option<TokenStream2> {
    let DeriveField {
        field_name,
        field_type,
        role,
    } = field;
    let name = field_name.unraw().to_string();
    let local = local(field_name);
    let ty = &field_type.tokens;

    match role {
        FieldRole::Base => None,
        FieldRole::Declared { default, .. } => Some(match default {
            DeriveDefault::Missing => quote! {
                let #local: #ty = values.require::<#ty>(#name)?;
            },
            DeriveDefault::Value(value) => {
                let value = &value.tokens;
                quote! {
                    let #local: #ty = match values.take::<#ty>(#name)? {
                        ::std::option::Option::Some(value) => value,
                        ::std::option::Option::None => #value,
                    };
                }
            }
            DeriveDefault::Factory(factory) => {
                let factory = &factory.tokens;
                quote! {
                    let #local: #ty = match values.take::<#ty>(#name)? {
                        ::std::option::Option::Some(value) => value,
                        ::std::option::Option::None => (#factory)(),
                    };
                }
            }
        }),
    }
}

pub(crate) fn shape_impls(value: &DeriveShape) -> TokenStream2 {
    let DeriveShape {
        struct_name,
        about,
        multiple_positionals,
        fields,
    } = value;
    let shape_name = struct_name.unraw().to_string();
    let about = match about {
        Some(about) => {
            let about = &about.tokens;
            quote! { .about(#about) }
        }
        None => quote! {},
    };
    let multiple_positionals = if *multiple_positionals {
        quote! { .multiple_positionals(true) }
    } else {
        quote! {}
    };
    let descriptions = fields.iter().map(describe);
    let resolutions = fields.iter().filter_map(resolve);
    let bases: Vec<&DeriveField> = fields
        .iter()
        .filter(|f| f.role == FieldRole::Base)
        .collect();
    // Declared fields shadow the fields of the same name on the bases.
    let shadows = fields.iter().filter(|_| !bases.is_empty()).filter_map(|f| match f.role {
        FieldRole::Base => None,
        FieldRole::Declared { .. } => {
            let name = f.field_name.unraw().to_string();
            let local = local(&f.field_name);
            let ty = &f.field_type.tokens;
            Some(quote! {
                values.shadow(#name, argshape::Value::new::<#ty>(::std::clone::Clone::clone(&#local)));
            })
        }
    });
    let base_resolutions = bases.iter().map(|f| {
        let local = local(&f.field_name);
        let ty = &f.field_type.tokens;
        quote! {
            let #local: #ty = <#ty as argshape::Shape>::from_values(values)?;
        }
    });
    let assignments = fields.iter().map(|f| {
        let field_name = &f.field_name;
        let local = local(field_name);
        quote! { #field_name: #local }
    });
    let allow_unused = if fields.is_empty() {
        quote! { #[allow(unused_variables)] }
    } else {
        quote! {}
    };

    quote! {
        impl argshape::Shape for #struct_name {
            fn shape() -> argshape::ShapeInfo {
                argshape::ShapeInfo::new(#shape_name)
                    #about
                    #multiple_positionals
                    #( #descriptions )*
            }

            #allow_unused
            fn from_values(values: &mut argshape::Values) -> ::std::result::Result<Self, argshape::ShapeError> {
                #( #resolutions )*
                #( #shadows )*
                #( #base_resolutions )*
                ::std::result::Result::Ok(Self {
                    #( #assignments ),*
                })
            }
        }

        impl argshape::FieldType for #struct_name {
            fn describe() -> argshape::TypeExpr {
                argshape::TypeExpr::shape::<Self>()
            }
        }
    }
}
