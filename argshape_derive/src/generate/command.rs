use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

use crate::generate::shape::shape_impls;
use crate::model::DeriveCommand;

impl From<DeriveCommand> for TokenStream2 {
    fn from(value: DeriveCommand) -> Self {
        let DeriveCommand {
            function_name,
            function,
            visibility,
            output,
            shape,
        } = value;
        let function = &function.tokens;
        let visibility = &visibility.tokens;
        let output = &output.tokens;
        let struct_name = &shape.struct_name;
        let field_names: Vec<&syn::Ident> = shape.fields.iter().map(|f| &f.field_name).collect();
        let field_types = shape.fields.iter().map(|f| &f.field_type.tokens);
        let impls = shape_impls(&shape);

        quote! {
            #function

            #[allow(non_camel_case_types)]
            #visibility struct #struct_name {
                #( #visibility #field_names: #field_types, )*
            }

            #impls

            impl argshape::Invocation for #struct_name {
                type Output = #output;

                fn invoke(self) -> Self::Output {
                    #function_name(#( self.#field_names ),*)
                }
            }
        }
    }
}
