use crate::model::{DeriveValue, IntermediateAttributes};
use quote::ToTokens;
use std::collections::{HashMap, HashSet};
use syn::spanned::Spanned;

pub(crate) const ATTRIBUTE_NAME: &str = "argshape";

impl TryFrom<&syn::Attribute> for IntermediateAttributes {
    type Error = syn::Error;

    fn try_from(value: &syn::Attribute) -> Result<Self, Self::Error> {
        let attributes_parser =
            syn::punctuated::Punctuated::<syn::Expr, syn::Token![,]>::parse_terminated;
        let expressions = value.parse_args_with(attributes_parser)?;
        let mut singletons = HashSet::default();
        let mut pairs: HashMap<String, Vec<DeriveValue>> = HashMap::default();

        for expression in expressions {
            match expression {
                syn::Expr::Assign(assignment) => {
                    let left = assignment.left.to_token_stream();
                    let values = pairs.entry(left.to_string()).or_default();
                    values.push(DeriveValue {
                        tokens: assignment.right.to_token_stream(),
                    });
                }
                syn::Expr::Path(path) if path.path.get_ident().is_some() => {
                    if let Some(ident) = path.path.get_ident() {
                        singletons.insert(ident.to_string());
                    }
                }
                _ => {
                    return Err(syn::Error::new(
                        expression.span(),
                        format!(
                            "Invalid - unparseable attribute `{}`.",
                            expression.to_token_stream()
                        ),
                    ));
                }
            };
        }

        Ok(Self { singletons, pairs })
    }
}

impl IntermediateAttributes {
    /// Merge every `#[argshape(..)]` attribute in `attributes`.
    pub(crate) fn collect(attributes: &[syn::Attribute]) -> Result<Self, syn::Error> {
        let mut out = IntermediateAttributes::default();

        for attribute in attributes {
            if attribute.path().is_ident(ATTRIBUTE_NAME) {
                let IntermediateAttributes { singletons, pairs } =
                    IntermediateAttributes::try_from(attribute)?;
                out.singletons.extend(singletons);

                for (key, values) in pairs {
                    out.pairs.entry(key).or_default().extend(values);
                }
            }
        }

        Ok(out)
    }

    /// Fail on any singleton outside of `singletons`, or pair outside of `pairs`.
    pub(crate) fn restrict(
        &self,
        context: &str,
        name: &syn::Ident,
        singletons: &[&str],
        pairs: &[&str],
    ) -> Result<(), syn::Error> {
        let mut unknown: Vec<String> = self
            .singletons
            .iter()
            .filter(|key| !singletons.contains(&key.as_str()))
            .cloned()
            .chain(
                self.pairs
                    .keys()
                    .filter(|key| !pairs.contains(&key.as_str()))
                    .map(|key| format!("{key} = .."))
            )
            .collect();
        unknown.sort();

        match unknown.first() {
            Some(key) => Err(syn::Error::new(
                name.span(),
                format!("Invalid - {context} '{name}' has unknown attribute `{key}`."),
            )),
            None => Ok(()),
        }
    }

    /// The single value of the pair `key`.
    pub(crate) fn single(
        &self,
        context: &str,
        name: &syn::Ident,
        key: &str,
    ) -> Result<Option<&DeriveValue>, syn::Error> {
        match self.pairs.get(key).map(Vec::as_slice) {
            None | Some([]) => Ok(None),
            Some([value]) => Ok(Some(value)),
            Some(_) => Err(syn::Error::new(
                name.span(),
                format!("Invalid - {context} '{name}' cannot repeat attribute `{key}`."),
            )),
        }
    }
}
