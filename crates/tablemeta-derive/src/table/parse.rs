// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

//! Attribute parsing for the Table derive macro.
//!
//! Entity-level attributes like `#[table(name = "t_user", schema = "crm")]`
//! are parsed with darling's `FromDeriveInput`, which validates the struct
//! shape and supplies defaults. Field-level attributes (`#[table_id]`,
//! `#[table_field]`, `#[logic_delete]`, `#[version]`) are parsed by hand:
//! they are marker-style with optional key-value arguments and do not fit
//! darling's model well.
//!
//! # Data Structures
//!
//! ```text
//! TableDef
//! ├── ident: Ident                  (struct name, e.g. "User")
//! ├── attrs: Option<TableAttrsDef>  (#[table(...)] values, verbatim)
//! ├── extends: Option<syn::Path>    (ancestor entity)
//! └── fields: Vec<FieldDef>
//!     └── FieldDef
//!         ├── ident: Ident               (property name)
//!         ├── ty: Type                   (declared type)
//!         ├── id: Option<IdDef>          (#[table_id] values)
//!         └── field: Option<FieldAttrsDef>
//! ```

mod entity;
mod field;

pub use entity::{TableAttrsDef, TableDef};
pub use field::{FieldAttrsDef, FieldDef, FillDef, IdDef, IdTypeDef, StrategyDef};
