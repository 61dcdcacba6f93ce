// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

//! Table derive macro implementation.
//!
//! This module orchestrates parsing of the annotated struct and delegates the
//! `impl Entity` generation to [`expand`].
//!
//! # Architecture
//!
//! ```text
//! table.rs (orchestrator)
//! │
//! ├── parse/       → Attribute parsing (TableDef, FieldDef)
//! │
//! └── expand.rs    → impl tablemeta_core::Entity generation
//! ```
//!
//! The generated code carries attribute values verbatim; nothing is resolved
//! at macro time. Resolution happens in `tablemeta-core` against the
//! registry's global configuration.

mod expand;
pub mod parse;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

use self::parse::TableDef;

/// Main entry point for the Table derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match TableDef::from_derive_input(&input) {
        Ok(table) => expand::generate(&table).into(),
        Err(err) => err.write_errors().into()
    }
}
