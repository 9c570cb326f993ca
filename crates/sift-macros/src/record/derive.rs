//! Implementation of the `#[derive(Record)]` macro.
//!
//! This macro generates implementations of the `Record` and `Schematic`
//! traits and field name constants for building queries.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::parse_field_attrs;

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut field_refs: Vec<TokenStream> = Vec::new();
    let mut id_field: Option<String> = None;

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_field_attrs(&field.attrs)?;

        if attrs.skip || (!attrs.id && attrs.kind.is_none()) {
            continue;
        }

        let query_name = attrs.rename.unwrap_or_else(|| field_name.to_string());

        if attrs.id {
            if id_field.is_some() {
                return Err(Error::new(
                    attrs.span,
                    "only one field can be marked #[field(id)]",
                ));
            }
            id_field = Some(query_name.clone());
        }

        let const_ident = format_ident!("{}", const_name(&query_name));
        field_constants.push(quote! {
            /// Field name constant for building queries.
            pub const #const_ident: &'static str = #query_name;
        });

        field_matches.push(quote! {
            #query_name => ::sift::AsValue::as_value(&self.#field_name),
        });

        if let Some(kind) = attrs.kind {
            let variant = format_ident!("{}", kind.variant());
            field_refs.push(quote! {
                ::sift::FieldRef::new(#query_name, ::sift::FieldType::#variant)
            });
        }
    }

    let id_field = id_field.ok_or_else(|| {
        Error::new(
            input.ident.span(),
            "Record requires exactly one field marked #[field(id)]",
        )
    })?;

    let expanded = quote! {
        impl #struct_name {
            #(#field_constants)*
        }

        impl ::sift::Record for #struct_name {
            fn field_value(&self, path: &str) -> ::sift::Value<'_> {
                match path {
                    #(#field_matches)*
                    _ => ::sift::Value::None,
                }
            }
        }

        impl ::sift::Schematic for #struct_name {
            fn schema() -> ::sift::Schema {
                ::sift::Schema::new(#id_field, ::std::vec![#(#field_refs),*])
            }
        }
    };

    Ok(expanded)
}

/// Constant name for a query field: `monthlyPremium` becomes
/// `MONTHLY_PREMIUM`, `address.city` becomes `ADDRESS_CITY`.
fn const_name(query_name: &str) -> String {
    let mut out = String::with_capacity(query_name.len() + 4);
    let mut after_word_char = false;

    for c in query_name.chars() {
        match c {
            '_' | '-' | '.' => {
                out.push('_');
                after_word_char = false;
            }
            c if c.is_uppercase() => {
                if after_word_char {
                    out.push('_');
                }
                out.push(c);
                after_word_char = false;
            }
            c => {
                out.extend(c.to_uppercase());
                after_word_char = c.is_alphanumeric();
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(source: &str) -> Result<String> {
        let input: DeriveInput = syn::parse_str(source)?;
        record_derive_impl(input).map(|tokens| tokens.to_string().replace(' ', ""))
    }

    #[test]
    fn test_const_names() {
        assert_eq!(const_name("type"), "TYPE");
        assert_eq!(const_name("monthlyPremium"), "MONTHLY_PREMIUM");
        assert_eq!(const_name("received_at"), "RECEIVED_AT");
        assert_eq!(const_name("address.city"), "ADDRESS_CITY");
        assert_eq!(const_name("sq-ft"), "SQ_FT");
        assert_eq!(const_name("unit2Beds"), "UNIT2_BEDS");
    }

    #[test]
    fn test_expands_schema_and_accessor() {
        let out = expand(
            r#"
            struct Plan {
                #[field(id)]
                id: String,
                #[field(Currency, rename = "monthlyPremium")]
                monthly_premium: f64,
                #[field(skip)]
                cache: Vec<u8>,
                notes: String,
            }
            "#,
        )
        .unwrap();

        assert!(out.contains("MONTHLY_PREMIUM"));
        assert!(out.contains("\"monthlyPremium\"=>::sift::AsValue::as_value(&self.monthly_premium)"));
        assert!(out.contains("::sift::FieldType::Currency"));
        assert!(out.contains("::sift::Schema::new(\"id\""));
        assert!(!out.contains("cache"));
        assert!(!out.contains("notes"));
    }

    #[test]
    fn test_requires_an_id_field() {
        let err = expand("struct Plan { #[field(Text)] name: String }").unwrap_err();
        assert!(err.to_string().contains("#[field(id)]"));
    }

    #[test]
    fn test_rejects_two_id_fields() {
        let err = expand("struct Plan { #[field(id)] a: String, #[field(id)] b: String }")
            .unwrap_err();
        assert!(err.to_string().contains("only one field"));
    }

    #[test]
    fn test_rejects_non_structs() {
        let err = expand("enum Plan { A, B }").unwrap_err();
        assert!(err.to_string().contains("only be derived for structs"));

        let err = expand("struct Plan(String);").unwrap_err();
        assert!(err.to_string().contains("named fields"));
    }
}
