// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

//! Core metadata resolution and SQL fragment synthesis for tablemeta.
//!
//! This crate turns normalized entity records into immutable [`TableInfo`]
//! descriptors and caches them in a process-wide [`TableRegistry`]. It can be
//! used standalone with hand-written [`Entity`] implementations; most users
//! reach it through the `tablemeta` facade and its `#[derive(Table)]` macro.
//!
//! # Overview
//!
//! - [`model`] — normalized attribute records every extraction mechanism
//!   funnels into
//! - [`config`] — global conventions and defaults
//! - [`registry`] — the cached descriptor store and execution-context seam
//! - [`table`] / [`field`] — resolved descriptors and their SQL fragments
//! - [`prelude`] — convenient re-exports
//!
//! # Usage
//!
//! ```rust,ignore
//! use tablemeta_core::prelude::*;
//!
//! let registry = TableRegistry::default();
//! let info = registry.init::<User>(None)?;
//! println!("{}", info.all_sql_select());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod classify;
pub mod config;
pub mod error;
pub mod field;
pub mod model;
pub mod naming;
pub mod prelude;
pub mod registry;
pub mod script;
pub mod table;

pub use classify::{Classified, Diagnostic, classify};
pub use config::{DbConfig, GlobalConfig, KeyGenerator};
pub use error::MetaError;
pub use field::FieldInfo;
pub use model::{
    Entity, EntityModel, EntityType, FieldAttrs, FieldFill, FieldModel, FieldStrategy, IdAttrs,
    IdType, TableAttrs
};
pub use registry::{
    ExecutionContext, KeyStatement, ResultMap, ResultMapping, SELECT_KEY_SUFFIX, TableRegistry
};
pub use table::{KeyInfo, TableInfo};
