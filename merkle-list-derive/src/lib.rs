//! This crate provides a derive macro for the `ListElement` trait.
//!
//! Example usage:
//! ```no_compile
//! #[derive(Clone, BFieldCodec, ListElement)]
//! struct Payment {
//!     recipient: Digest,
//!     amount: u64,
//! }
//! ```
//!
//! notes:
//!  1. An implementation of `BFieldCodec` and `Clone` is required, else
//!     compilation will fail. It is recommended to derive both.
//!  2. Every field must implement `ListElement`. The dummy is the struct of
//!     field-wise dummies, and selection happens field by field.

extern crate proc_macro;

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse_quote;
use syn::DeriveInput;

/// Derives `ListElement` for structs.
#[proc_macro_derive(ListElement)]
pub fn list_element_derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = syn::parse(input).unwrap();
    impl_list_element_derive_macro(ast).into()
}

struct ParseResult {
    members: Vec<syn::Member>,
    field_types: Vec<syn::Type>,
}

fn impl_list_element_derive_macro(ast: DeriveInput) -> TokenStream {
    let ParseResult {
        members,
        field_types,
    } = generate_parse_result(&ast);
    let name = &ast.ident;

    let mut generics = ast.generics.clone();
    let where_clause = generics.make_where_clause();
    for field_type in &field_types {
        where_clause
            .predicates
            .push(parse_quote!(#field_type: ::merkle_list::provable::ListElement));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let dummies = members.iter().zip(&field_types).map(|(member, field_type)| {
        quote! {
            #member: <#field_type as ::merkle_list::provable::ListElement>::dummy()
        }
    });
    let selections = members.iter().zip(&field_types).map(|(member, field_type)| {
        quote! {
            #member: <#field_type as ::merkle_list::provable::ListElement>::select(
                condition,
                if_true.#member,
                if_false.#member,
            )
        }
    });

    quote! {
        impl #impl_generics ::merkle_list::provable::ListElement
        for #name #ty_generics #where_clause {
            fn dummy() -> Self {
                Self { #( #dummies ,)* }
            }

            fn select(condition: bool, if_true: Self, if_false: Self) -> Self {
                Self { #( #selections ,)* }
            }
        }
    }
}

fn generate_parse_result(ast: &DeriveInput) -> ParseResult {
    match &ast.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(fields),
            ..
        }) => generate_tokens_for_struct_with_named_fields(fields),
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Unnamed(fields),
            ..
        }) => generate_tokens_for_struct_with_unnamed_fields(fields),
        _ => panic!("expected a struct with named fields, or with unnamed fields"),
    }
}

fn generate_tokens_for_struct_with_named_fields(fields: &syn::FieldsNamed) -> ParseResult {
    let members = fields
        .named
        .iter()
        .filter_map(|field| field.ident.clone())
        .map(syn::Member::Named)
        .collect();
    let field_types = fields.named.iter().map(|field| field.ty.clone()).collect();

    ParseResult {
        members,
        field_types,
    }
}

fn generate_tokens_for_struct_with_unnamed_fields(fields: &syn::FieldsUnnamed) -> ParseResult {
    let members = (0..fields.unnamed.len())
        .map(|i| syn::Member::Unnamed(syn::Index::from(i)))
        .collect();
    let field_types = fields.unnamed.iter().map(|field| field.ty.clone()).collect();

    ParseResult {
        members,
        field_types,
    }
}
