// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

//! Derive macro turning an annotated struct into a normalized entity record.
//!
//! The macro itself resolves nothing: it only extracts declarative metadata
//! and emits an `impl tablemeta_core::Entity` whose `model()` returns the
//! fully populated record. All precedence rules, naming conventions and SQL
//! synthesis live in `tablemeta-core` and run against the registry's global
//! configuration, so one compiled entity works under any configuration.
//!
//! # Attribute Quick Reference
//!
//! ## Entity-Level `#[table(...)]`
//!
//! ```rust,ignore
//! #[derive(Table)]
//! #[table(
//!     name = "t_user",            // Optional: explicit table name
//!     schema = "crm",             // Optional: per-entity schema override
//!     result_map = "userMap",     // Optional: explicit result-map id
//!     auto_result_map,            // Optional: mint a result map on registration
//!     keep_global_prefix,         // Optional: prefix explicit names too
//!     exclude = "secret",         // Optional, repeatable: drop a property
//!     key_sequence = "seq_user",  // Optional: sequence for generated keys
//!     extends = "BaseEntity"      // Optional: inherit fields from an ancestor
//! )]
//! pub struct User { /* ... */ }
//! ```
//!
//! ## Field-Level Attributes
//!
//! ```rust,ignore
//! pub struct User {
//!     #[table_id(id_type = "auto")]       // Primary key
//!     pub id: u64,
//!
//!     #[table_field(column = "nick_name", strategy = "not_empty")]
//!     pub name: String,
//!
//!     #[table_field(exist = false)]       // Not a table column
//!     pub cached_score: i64,
//!
//!     #[table_field(fill = "insert")]     // Engine-managed value
//!     pub created_at: i64,
//!
//!     #[logic_delete]                     // Soft-delete flag column
//!     pub deleted: bool,
//!
//!     #[version]                          // Optimistic-lock column
//!     pub revision: u32,
//! }
//! ```

mod table;

use proc_macro::TokenStream;

/// Derive macro implementing `tablemeta_core::Entity` for a named struct.
///
/// # Entity Attributes
///
/// | Attribute | Default | Description |
/// |-----------|---------|-------------|
/// | `name` | derived from type name | Explicit table name |
/// | `schema` | global schema | Per-entity schema override |
/// | `result_map` | — | Explicit result-map identifier |
/// | `auto_result_map` | off | Mint a result map on registration |
/// | `keep_global_prefix` | off | Apply the global prefix to explicit names too |
/// | `exclude` | — | Property excluded from classification (repeatable) |
/// | `key_sequence` | — | Sequence name for generated keys |
/// | `extends` | — | Ancestor entity whose fields are inherited |
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[table_id]` | Primary key. Accepts `column` and `id_type` (`"none"`, `"auto"`, `"input"`, `"generator"`). |
/// | `#[table_field]` | Ordinary column. Accepts `column`, `exist`, `select`, `strategy` (`"ignored"`, `"not_null"`, `"not_empty"`, `"never"`) and `fill` (`"insert"`, `"update"`, `"insert_update"`). |
/// | `#[logic_delete]` | Soft-delete flag. Accepts `value` and `not_value` literals. |
/// | `#[version]` | Optimistic-lock version column. |
///
/// # Example
///
/// ```rust,ignore
/// use tablemeta::Table;
///
/// #[derive(Table)]
/// #[table(name = "t_user", auto_result_map)]
/// pub struct User {
///     #[table_id(id_type = "auto")]
///     pub id: u64,
///     pub user_name: String,
///     #[logic_delete]
///     pub deleted: bool,
/// }
/// ```
#[proc_macro_derive(Table, attributes(table, table_id, table_field, logic_delete, version))]
pub fn derive_table(input: TokenStream) -> TokenStream {
    table::derive(input)
}
