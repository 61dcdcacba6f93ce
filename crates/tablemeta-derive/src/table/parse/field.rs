// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

//! Field-level attribute parsing.
//!
//! Handles `#[table_id]`, `#[table_field]`, `#[logic_delete]` and
//! `#[version]`. All four are marker attributes with optional key-value
//! arguments, so they are parsed by hand via `parse_nested_meta` rather than
//! darling.

use syn::{Attribute, Field, Ident, LitBool, LitStr, Meta, Type, meta::ParseNestedMeta};

/// Primary-key strategy value of `id_type = "..."`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdTypeDef {
    /// Defer to the global default.
    #[default]
    None,
    /// Database auto-increment.
    Auto,
    /// Caller-supplied key.
    Input,
    /// Sequence-backed key generator.
    Generator
}

impl IdTypeDef {
    fn parse(meta: &ParseNestedMeta<'_>) -> syn::Result<Self> {
        let value: LitStr = meta.value()?.parse()?;
        match value.value().as_str() {
            "none" => Ok(Self::None),
            "auto" => Ok(Self::Auto),
            "input" => Ok(Self::Input),
            "generator" => Ok(Self::Generator),
            other => Err(syn::Error::new(
                value.span(),
                format!("unknown id_type `{other}`, expected none | auto | input | generator")
            ))
        }
    }
}

/// Conditional-SQL strategy value of `strategy = "..."`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyDef {
    /// No guard.
    Ignored,
    /// `!= null` guard.
    NotNull,
    /// `!= null` plus `!= ''` for textual fields.
    NotEmpty,
    /// Never emitted in generated SQL.
    Never
}

impl StrategyDef {
    fn parse(meta: &ParseNestedMeta<'_>) -> syn::Result<Self> {
        let value: LitStr = meta.value()?.parse()?;
        match value.value().as_str() {
            "ignored" => Ok(Self::Ignored),
            "not_null" => Ok(Self::NotNull),
            "not_empty" => Ok(Self::NotEmpty),
            "never" => Ok(Self::Never),
            other => Err(syn::Error::new(
                value.span(),
                format!("unknown strategy `{other}`, expected ignored | not_null | not_empty | never")
            ))
        }
    }
}

/// Automatic fill value of `fill = "..."`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillDef {
    /// No automatic fill.
    #[default]
    Default,
    /// Fill before INSERT.
    Insert,
    /// Fill before UPDATE.
    Update,
    /// Fill before both.
    InsertUpdate
}

impl FillDef {
    fn parse(meta: &ParseNestedMeta<'_>) -> syn::Result<Self> {
        let value: LitStr = meta.value()?.parse()?;
        match value.value().as_str() {
            "insert" => Ok(Self::Insert),
            "update" => Ok(Self::Update),
            "insert_update" => Ok(Self::InsertUpdate),
            other => Err(syn::Error::new(
                value.span(),
                format!("unknown fill `{other}`, expected insert | update | insert_update")
            ))
        }
    }
}

/// Parsed `#[table_id(...)]` values.
#[derive(Debug, Default)]
pub struct IdDef {
    /// Explicit key column name.
    pub column: Option<String>,
    /// Declared key strategy.
    pub id_type: IdTypeDef
}

/// Parsed ordinary-field values, merged from `#[table_field]`,
/// `#[logic_delete]` and `#[version]`.
#[derive(Debug)]
pub struct FieldAttrsDef {
    /// Explicit column name.
    pub column: Option<String>,
    /// Whether the property maps to a table column at all.
    pub exist: bool,
    /// Include in generated SELECT lists.
    pub select: bool,
    /// Conditional-SQL strategy override.
    pub strategy: Option<StrategyDef>,
    /// Automatic fill policy.
    pub fill: FillDef,
    /// Soft-delete flag column.
    pub logic_delete: bool,
    /// Literal written when marking a row deleted.
    pub logic_delete_value: Option<String>,
    /// Literal a live row carries.
    pub logic_not_delete_value: Option<String>,
    /// Optimistic-lock version column.
    pub version: bool
}

impl Default for FieldAttrsDef {
    fn default() -> Self {
        Self {
            column: None,
            exist: true,
            select: true,
            strategy: None,
            fill: FillDef::Default,
            logic_delete: false,
            logic_delete_value: None,
            logic_not_delete_value: None,
            version: false
        }
    }
}

/// Field definition with all parsed attributes.
#[derive(Debug)]
pub struct FieldDef {
    /// Property identifier.
    pub ident: Ident,
    /// Declared type.
    pub ty: Type,
    /// `#[table_id]` values, when present.
    pub id: Option<IdDef>,
    /// Merged field-level values, when any field attribute is present.
    pub field: Option<FieldAttrsDef>
}

impl FieldDef {
    /// Parse one named field.
    ///
    /// `#[table_id]` combined with field-level attributes is accepted here;
    /// the classifier warns and ignores the field-level record when the
    /// field ends up as the key.
    ///
    /// # Errors
    ///
    /// Unknown argument names or unknown enum values.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let ident = field.ident.clone().ok_or_else(|| {
            syn::Error::new_spanned(field, "Table requires named fields")
        })?;
        let ty = field.ty.clone();

        let mut id: Option<IdDef> = None;
        let mut attrs: Option<FieldAttrsDef> = None;

        for attr in &field.attrs {
            if attr.path().is_ident("table_id") {
                id = Some(parse_table_id(attr)?);
            } else if attr.path().is_ident("table_field") {
                parse_table_field(attr, attrs.get_or_insert_with(FieldAttrsDef::default))?;
            } else if attr.path().is_ident("logic_delete") {
                parse_logic_delete(attr, attrs.get_or_insert_with(FieldAttrsDef::default))?;
            } else if attr.path().is_ident("version") {
                attrs.get_or_insert_with(FieldAttrsDef::default).version = true;
            }
        }

        Ok(Self {
            ident,
            ty,
            id,
            field: attrs
        })
    }

    /// Property name as a string.
    pub fn name_str(&self) -> String {
        self.ident.to_string()
    }
}

/// Parse `#[table_id]` / `#[table_id(column = "...", id_type = "...")]`.
fn parse_table_id(attr: &Attribute) -> syn::Result<IdDef> {
    let mut def = IdDef::default();
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(def);
    }
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("column") {
            def.column = Some(lit_str(&meta)?);
        } else if meta.path.is_ident("id_type") {
            def.id_type = IdTypeDef::parse(&meta)?;
        } else {
            return Err(meta.error("unknown table_id argument"));
        }
        Ok(())
    })?;
    Ok(def)
}

/// Parse `#[table_field(...)]` into the merged attribute record.
fn parse_table_field(attr: &Attribute, def: &mut FieldAttrsDef) -> syn::Result<()> {
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(());
    }
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("column") {
            def.column = Some(lit_str(&meta)?);
        } else if meta.path.is_ident("exist") {
            def.exist = lit_bool(&meta)?;
        } else if meta.path.is_ident("select") {
            def.select = lit_bool(&meta)?;
        } else if meta.path.is_ident("strategy") {
            def.strategy = Some(StrategyDef::parse(&meta)?);
        } else if meta.path.is_ident("fill") {
            def.fill = FillDef::parse(&meta)?;
        } else {
            return Err(meta.error("unknown table_field argument"));
        }
        Ok(())
    })
}

/// Parse `#[logic_delete]` / `#[logic_delete(value = "1", not_value = "0")]`.
fn parse_logic_delete(attr: &Attribute, def: &mut FieldAttrsDef) -> syn::Result<()> {
    def.logic_delete = true;
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(());
    }
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("value") {
            def.logic_delete_value = Some(lit_str(&meta)?);
        } else if meta.path.is_ident("not_value") {
            def.logic_not_delete_value = Some(lit_str(&meta)?);
        } else {
            return Err(meta.error("unknown logic_delete argument"));
        }
        Ok(())
    })
}

fn lit_str(meta: &ParseNestedMeta<'_>) -> syn::Result<String> {
    let value: LitStr = meta.value()?.parse()?;
    Ok(value.value())
}

fn lit_bool(meta: &ParseNestedMeta<'_>) -> syn::Result<bool> {
    let value: LitBool = meta.value()?.parse()?;
    Ok(value.value)
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn named_field(tokens: syn::Field) -> FieldDef {
        FieldDef::from_field(&tokens).unwrap()
    }

    #[test]
    fn plain_field_has_no_records() {
        let field: Field = parse_quote! { pub user_name: String };
        let def = named_field(field);
        assert_eq!(def.name_str(), "user_name");
        assert!(def.id.is_none());
        assert!(def.field.is_none());
    }

    #[test]
    fn table_id_marker_and_arguments() {
        let field: Field = parse_quote! {
            #[table_id]
            pub id: u64
        };
        let def = named_field(field);
        let id = def.id.unwrap();
        assert!(id.column.is_none());
        assert_eq!(id.id_type, IdTypeDef::None);

        let field: Field = parse_quote! {
            #[table_id(column = "uid", id_type = "auto")]
            pub id: u64
        };
        let id = named_field(field).id.unwrap();
        assert_eq!(id.column.as_deref(), Some("uid"));
        assert_eq!(id.id_type, IdTypeDef::Auto);
    }

    #[test]
    fn table_field_arguments() {
        let field: Field = parse_quote! {
            #[table_field(column = "nick", exist = false, select = false, strategy = "not_empty", fill = "insert")]
            pub name: String
        };
        let attrs = named_field(field).field.unwrap();
        assert_eq!(attrs.column.as_deref(), Some("nick"));
        assert!(!attrs.exist);
        assert!(!attrs.select);
        assert_eq!(attrs.strategy, Some(StrategyDef::NotEmpty));
        assert_eq!(attrs.fill, FillDef::Insert);
    }

    #[test]
    fn logic_delete_merges_with_table_field() {
        let field: Field = parse_quote! {
            #[table_field(column = "del_flag")]
            #[logic_delete(value = "9", not_value = "3")]
            pub deleted: bool
        };
        let attrs = named_field(field).field.unwrap();
        assert_eq!(attrs.column.as_deref(), Some("del_flag"));
        assert!(attrs.logic_delete);
        assert_eq!(attrs.logic_delete_value.as_deref(), Some("9"));
        assert_eq!(attrs.logic_not_delete_value.as_deref(), Some("3"));
    }

    #[test]
    fn version_marker() {
        let field: Field = parse_quote! {
            #[version]
            pub revision: u32
        };
        assert!(named_field(field).field.unwrap().version);
    }

    #[test]
    fn unknown_argument_rejected() {
        let field: Field = parse_quote! {
            #[table_field(colour = "red")]
            pub name: String
        };
        assert!(FieldDef::from_field(&field).is_err());
    }

    #[test]
    fn unknown_id_type_rejected() {
        let field: Field = parse_quote! {
            #[table_id(id_type = "uuid")]
            pub id: u64
        };
        assert!(FieldDef::from_field(&field).is_err());
    }

    #[test]
    fn table_id_with_table_field_keeps_both_records() {
        let field: Field = parse_quote! {
            #[table_id]
            #[table_field(select = false)]
            pub id: u64
        };
        let def = named_field(field);
        assert!(def.id.is_some());
        assert!(def.field.is_some());
    }
}
