//! Attribute parsing for the Record derive macro.
//!
//! This module provides the parser for the `#[field(...)]` attributes used
//! by the `Record` derive macro.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

const EXPECTED_TYPES: &str = "Text, Numeric, Currency, Enum, Date";

/// The semantic type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `#[field(Text)]`
    Text,
    /// `#[field(Numeric)]`
    Numeric,
    /// `#[field(Currency)]`
    Currency,
    /// `#[field(Enum)]`, or `#[field(ty = "enum")]`
    Enum,
    /// `#[field(Date)]`
    Date,
}

impl FieldKind {
    fn parse(name: &str, span: Span) -> Result<Self> {
        match name {
            "Text" | "text" | "String" | "string" => Ok(FieldKind::Text),
            "Numeric" | "numeric" | "Number" | "number" => Ok(FieldKind::Numeric),
            "Currency" | "currency" => Ok(FieldKind::Currency),
            "Enum" | "enum" | "enumeration" => Ok(FieldKind::Enum),
            "Date" | "date" | "Timestamp" | "timestamp" => Ok(FieldKind::Date),
            other => Err(Error::new(
                span,
                format!(
                    "unknown field type: '{}'. Expected one of: {}",
                    other, EXPECTED_TYPES
                ),
            )),
        }
    }

    /// Parse a field type from an identifier.
    pub fn from_ident(ident: &Ident) -> Result<Self> {
        FieldKind::parse(&ident.to_string(), ident.span())
    }

    /// The `sift::FieldType` variant this kind maps to.
    pub fn variant(self) -> &'static str {
        match self {
            FieldKind::Text => "Text",
            FieldKind::Numeric => "Numeric",
            FieldKind::Currency => "Currency",
            FieldKind::Enum => "Enum",
            FieldKind::Date => "Date",
        }
    }
}

/// Field-level attributes from `#[field(...)]`.
#[derive(Debug, Clone)]
pub struct FieldAttr {
    /// The semantic type, if the field is queryable.
    pub kind: Option<FieldKind>,
    /// This field holds the record's identifier.
    pub id: bool,
    /// Leave this field out entirely.
    pub skip: bool,
    /// Name used in queries (default: the Rust field name).
    pub rename: Option<String>,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for FieldAttr {
    fn default() -> Self {
        FieldAttr {
            kind: None,
            id: false,
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

fn string_literal(expr: &syn::Expr, what: &str) -> Result<syn::LitStr> {
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.clone()),
        other => Err(Error::new(
            other.span(),
            format!("{} must be a string literal", what),
        )),
    }
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                // field(id), field(skip), field(Text), ...
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if p.is_ident("id") {
                        attr.id = true;
                        attr.span = p.span();
                    } else if let Some(ident) = p.get_ident() {
                        attr.kind = Some(FieldKind::from_ident(ident)?);
                        attr.span = ident.span();
                    } else {
                        return Err(Error::new(
                            p.span(),
                            format!("expected field type ({}), id, or skip", EXPECTED_TYPES),
                        ));
                    }
                }

                // rename = "monthlyPremium" or ty = "enum"
                Meta::NameValue(nv) => {
                    if nv.path.is_ident("rename") {
                        attr.rename = Some(string_literal(&nv.value, "rename")?.value());
                    } else if nv.path.is_ident("ty") {
                        let s = string_literal(&nv.value, "ty")?;
                        attr.kind = Some(FieldKind::parse(&s.value(), s.span())?);
                        attr.span = s.span();
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: rename or ty",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        format!(
                            "unknown field attribute. Expected: {}, id, skip, rename = \"...\", or ty = \"...\"",
                            EXPECTED_TYPES
                        ),
                    ));
                }
            }
        }

        if attr.skip && (attr.id || attr.kind.is_some()) {
            return Err(Error::new(
                attr.span,
                "a skipped field cannot also be an id or have a type",
            ));
        }

        Ok(attr)
    }
}

/// Extract `#[field(...)]` attributes from a field's attributes.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    for attr in attrs {
        if attr.path().is_ident("field") {
            return attr.parse_args::<FieldAttr>();
        }
    }
    Ok(FieldAttr::default())
}
