use crate::load::attribute::ATTRIBUTE_NAME;
use crate::load::capitalize;
use crate::load::field::load_field;
use crate::load::shape::load_shape;
use crate::model::{
    DeriveCommand, DeriveDefault, DeriveValue, FieldRole, IntermediateAttributes,
};
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote, ToTokens};

pub(crate) fn load_command(
    arguments: TokenStream2,
    mut function: syn::ItemFn,
) -> Result<DeriveCommand, syn::Error> {
    let function_name = function.sig.ident.clone();
    let attribute: syn::Attribute = syn::parse_quote! {
        #[argshape(#arguments)]
    };
    let attributes = IntermediateAttributes::try_from(&attribute)?;

    if !function.sig.generics.params.is_empty() {
        return Err(syn::Error::new(
            function_name.span(),
            format!("Invalid - command '{function_name}' cannot be generic."),
        ));
    }

    if function.sig.asyncness.is_some() {
        return Err(syn::Error::new(
            function_name.span(),
            format!("Invalid - command '{function_name}' cannot be async."),
        ));
    }

    let mut fields = Vec::default();

    for input in function.sig.inputs.iter_mut() {
        let parameter = match input {
            syn::FnArg::Typed(parameter) => parameter,
            syn::FnArg::Receiver(_) => {
                return Err(syn::Error::new(
                    function_name.span(),
                    format!("Invalid - command '{function_name}' cannot take `self`."),
                ));
            }
        };
        let parameter_name = match parameter.pat.as_ref() {
            syn::Pat::Ident(pattern) => pattern.ident.clone(),
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    format!(
                        "Invalid - command '{function_name}' parameter `{}` must be a plain identifier.",
                        other.to_token_stream()
                    ),
                ));
            }
        };

        if matches!(parameter.ty.as_ref(), syn::Type::Infer(_)) {
            return Err(syn::Error::new(
                parameter_name.span(),
                format!("Invalid - parameter '{parameter_name}' must have a type annotation."),
            ));
        }

        let mut field = load_field(parameter_name, &parameter.ty, &parameter.attrs)?;

        // Parameter defaults are recomputed on every call.
        if let FieldRole::Declared { default, .. } = &mut field.role {
            if let DeriveDefault::Value(value) = default {
                let tokens = value.tokens.clone();
                *default = DeriveDefault::Factory(DeriveValue {
                    tokens: quote! { || #tokens },
                });
            }
        }

        parameter
            .attrs
            .retain(|attribute| !attribute.path().is_ident(ATTRIBUTE_NAME));
        fields.push(field);
    }

    let struct_name = format_ident!("{}Args", capitalize(&function_name.to_string()));
    let shape = load_shape(struct_name, attributes, fields)?;
    let output = match &function.sig.output {
        syn::ReturnType::Default => quote! { () },
        syn::ReturnType::Type(_, output) => output.to_token_stream(),
    };

    Ok(DeriveCommand {
        function_name,
        visibility: DeriveValue {
            tokens: function.vis.to_token_stream(),
        },
        function: DeriveValue {
            tokens: function.to_token_stream(),
        },
        output: DeriveValue { tokens: output },
        shape,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeriveField, DeriveMeta};
    use proc_macro2::Span;
    use rstest::rstest;

    #[test]
    fn construct_command() {
        // Setup
        let function: syn::ItemFn = syn::parse_quote! {
            pub fn ls(
                #[argshape(default = 2)] depth: u8,
                #[argshape(positional)] paths: Vec<String>,
            ) -> usize {
                paths.len()
            }
        };

        // Execute
        let command = load_command(quote! { about = "List." }, function).unwrap();

        // Verify
        assert_eq!(command.function_name, ident("ls"));
        assert_eq!(command.shape.struct_name, ident("LsArgs"));
        assert_eq!(command.output, DeriveValue { tokens: quote! { usize } });
        assert_eq!(command.visibility, DeriveValue { tokens: quote! { pub } });
        assert!(command.shape.about.is_some());
        assert_eq!(
            command.shape.fields,
            vec![
                DeriveField {
                    field_name: ident("depth"),
                    field_type: DeriveValue { tokens: quote! { u8 } },
                    role: FieldRole::Declared {
                        default: DeriveDefault::Factory(DeriveValue {
                            tokens: quote! { || 2 },
                        }),
                        metadata: Vec::default(),
                    },
                },
                DeriveField {
                    field_name: ident("paths"),
                    field_type: DeriveValue {
                        tokens: quote! { Vec<String> },
                    },
                    role: FieldRole::Declared {
                        default: DeriveDefault::Missing,
                        metadata: vec![DeriveMeta::Flag("positional".to_string())],
                    },
                },
            ]
        );
        // The parameter attributes are stripped from the function itself.
        assert_eq!(
            command.function,
            DeriveValue {
                tokens: quote! {
                    pub fn ls(depth: u8, paths: Vec<String>,) -> usize {
                        paths.len()
                    }
                }
            }
        );
    }

    #[test]
    fn construct_command_unit() {
        // Setup
        let function: syn::ItemFn = syn::parse_quote! {
            fn noop() {}
        };

        // Execute
        let command = load_command(TokenStream2::new(), function).unwrap();

        // Verify
        assert_eq!(command.shape.struct_name, ident("NoopArgs"));
        assert_eq!(command.output, DeriveValue { tokens: quote! { () } });
        assert!(command.shape.fields.is_empty());
    }

    #[rstest]
    #[case(
        syn::parse_quote! { fn ls(depth: _) {} },
        "Invalid - parameter 'depth' must have a type annotation."
    )]
    #[case(
        syn::parse_quote! { fn ls<T>(depth: T) {} },
        "Invalid - command 'ls' cannot be generic."
    )]
    #[case(
        syn::parse_quote! { async fn ls(depth: u8) {} },
        "Invalid - command 'ls' cannot be async."
    )]
    #[case(
        syn::parse_quote! { fn ls((a, b): (u8, u8)) {} },
        "Invalid - command 'ls' parameter `(a , b)` must be a plain identifier."
    )]
    fn construct_command_invalid(#[case] function: syn::ItemFn, #[case] expected: &str) {
        // Execute
        let error = load_command(TokenStream2::new(), function).unwrap_err();

        // Verify
        assert_eq!(error.to_string(), expected);
    }

    fn ident(name: &str) -> syn::Ident {
        syn::Ident::new(name, Span::call_site())
    }
}
