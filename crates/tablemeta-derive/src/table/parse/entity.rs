// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

//! Entity-level attribute parsing.
//!
//! Parses `#[table(...)]` with darling and combines the result with the
//! parsed field definitions into [`TableDef`], the structure handed to the
//! code generator.

use darling::FromDeriveInput;
use syn::{DeriveInput, Ident};

use super::field::FieldDef;

/// Raw `#[table(...)]` values as darling extracts them.
///
/// Internal parsing structure; the public API is [`TableDef`].
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(table), supports(struct_named))]
struct RawTableAttrs {
    /// Struct identifier (e.g. `User`).
    ident: Ident,

    /// Explicit table name. Absent means "derive from the type name" at
    /// resolution time.
    #[darling(default)]
    name: Option<String>,

    /// Per-entity schema override.
    #[darling(default)]
    schema: Option<String>,

    /// Explicit result-map identifier.
    #[darling(default)]
    result_map: Option<String>,

    /// Mint a result map when the entity registers and no explicit
    /// identifier is given.
    #[darling(default)]
    auto_result_map: bool,

    /// Apply the global table prefix even though `name` is explicit.
    #[darling(default)]
    keep_global_prefix: bool,

    /// Properties excluded from classification. Repeatable:
    /// `exclude = "a", exclude = "b"`.
    #[darling(multiple)]
    exclude: Vec<String>,

    /// Sequence name for generator-backed keys.
    #[darling(default)]
    key_sequence: Option<String>,

    /// Ancestor entity whose fields are inherited.
    #[darling(default)]
    extends: Option<syn::Path>
}

/// Entity-level attribute values carried verbatim into the generated record.
#[derive(Debug)]
pub struct TableAttrsDef {
    /// Explicit table name.
    pub name: Option<String>,
    /// Per-entity schema override.
    pub schema: Option<String>,
    /// Explicit result-map identifier.
    pub result_map: Option<String>,
    /// Mint a result map on registration.
    pub auto_result_map: bool,
    /// Apply the global prefix to the explicit name.
    pub keep_global_prefix: bool,
    /// Excluded property names.
    pub exclude: Vec<String>,
    /// Sequence name for generated keys.
    pub key_sequence: Option<String>
}

/// Complete parsed table definition.
///
/// This is the structure passed to the code generator. `attrs` is `Some`
/// only when the struct actually carries a `#[table(...)]` attribute, so
/// the generated record distinguishes "no attribute" from "attribute with
/// defaults".
#[derive(Debug)]
pub struct TableDef {
    /// Struct identifier.
    pub ident: Ident,
    /// Entity-level attribute values, when `#[table(...)]` is present.
    pub attrs: Option<TableAttrsDef>,
    /// Ancestor entity path from `extends = "..."`.
    pub extends: Option<syn::Path>,
    /// Field definitions in declaration order.
    pub fields: Vec<FieldDef>
}

impl TableDef {
    /// Parse the full definition from syn's `DeriveInput`.
    ///
    /// # Errors
    ///
    /// - Applied to a non-struct or a struct without named fields
    /// - Invalid entity-level attribute values
    /// - Invalid field-level attribute values (all collected, not just the
    ///   first)
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let raw = RawTableAttrs::from_derive_input(input)?;

        let mut errors = darling::Error::accumulator();
        let fields = match &input.data {
            syn::Data::Struct(data) => match &data.fields {
                syn::Fields::Named(named) => named
                    .named
                    .iter()
                    .filter_map(|f| errors.handle(FieldDef::from_field(f).map_err(Into::into)))
                    .collect(),
                _ => {
                    return Err(darling::Error::custom("Table requires named fields")
                        .with_span(&input.ident));
                }
            },
            _ => {
                return Err(darling::Error::custom("Table can only be derived for structs")
                    .with_span(&input.ident));
            }
        };
        errors.finish()?;

        let has_table_attr = input.attrs.iter().any(|a| a.path().is_ident("table"));
        let attrs = has_table_attr.then(|| TableAttrsDef {
            name: raw.name,
            schema: raw.schema,
            result_map: raw.result_map,
            auto_result_map: raw.auto_result_map,
            keep_global_prefix: raw.keep_global_prefix,
            exclude: raw.exclude,
            key_sequence: raw.key_sequence
        });

        Ok(Self {
            ident: raw.ident,
            attrs,
            extends: raw.extends,
            fields
        })
    }

    /// Entity name as a string.
    pub fn name_str(&self) -> String {
        self.ident.to_string()
    }
}
