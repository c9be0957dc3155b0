use proc_macro2::TokenStream as TokenStream2;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct DeriveValue {
    pub tokens: TokenStream2,
}

impl PartialEq for DeriveValue {
    fn eq(&self, other: &Self) -> bool {
        let st = &self.tokens.to_string();
        let ot = &other.tokens.to_string();
        st == ot
    }
}

impl Eq for DeriveValue {}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct IntermediateAttributes {
    pub singletons: HashSet<String>,
    pub pairs: HashMap<String, Vec<DeriveValue>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeriveDefault {
    Missing,
    Value(DeriveValue),
    Factory(DeriveValue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeriveMeta {
    Flag(String),
    Pair(String, DeriveValue),
    Choices(Vec<DeriveValue>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRole {
    Base,
    Declared {
        default: DeriveDefault,
        metadata: Vec<DeriveMeta>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeriveField {
    pub field_name: syn::Ident,
    pub field_type: DeriveValue,
    pub role: FieldRole,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveShape {
    pub struct_name: syn::Ident,
    pub about: Option<DeriveValue>,
    pub multiple_positionals: bool,
    pub fields: Vec<DeriveField>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveMember {
    pub variant_name: syn::Ident,
    pub name: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveEnumeration {
    pub enum_name: syn::Ident,
    pub members: Vec<DeriveMember>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveCommand {
    pub function_name: syn::Ident,
    pub function: DeriveValue,
    pub visibility: DeriveValue,
    pub output: DeriveValue,
    pub shape: DeriveShape,
}
