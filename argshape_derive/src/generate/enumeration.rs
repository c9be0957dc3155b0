use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

use crate::model::DeriveEnumeration;

impl From<DeriveEnumeration> for TokenStream2 {
    fn from(value: DeriveEnumeration) -> Self {
        let DeriveEnumeration { enum_name, members } = value;
        let entries = members.iter().map(|m| {
            let variant_name = &m.variant_name;
            let name = &m.name;
            quote! { (#name, #enum_name::#variant_name) }
        });
        let arms = members.iter().map(|m| {
            let variant_name = &m.variant_name;
            let name = &m.name;
            quote! { #enum_name::#variant_name => f.write_str(#name), }
        });

        quote! {
            impl argshape::ShapeEnum for #enum_name {
                fn members() -> ::std::vec::Vec<(&'static str, Self)> {
                    ::std::vec![#( #entries ),*]
                }
            }

            impl argshape::FieldType for #enum_name {
                fn describe() -> argshape::TypeExpr {
                    argshape::TypeExpr::enumeration::<Self>()
                }
            }

            impl ::std::fmt::Display for #enum_name {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    match *self {
                        #( #arms )*
                    }
                }
            }
        }
    }
}
