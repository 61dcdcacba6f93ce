// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! # tablemeta
//!
//! One crate, all features. Re-exports:
//! - [`Table`] derive macro from `tablemeta-derive`
//! - All types from `tablemeta-core` ([`TableRegistry`], [`TableInfo`],
//!   [`GlobalConfig`], ...)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tablemeta::{Table, TableRegistry};
//!
//! #[derive(Table)]
//! #[table(name = "t_user")]
//! pub struct User {
//!     #[table_id(id_type = "auto")]
//!     pub id: u64,
//!     pub user_name: String,
//!     #[logic_delete]
//!     pub deleted: bool,
//! }
//!
//! let registry = TableRegistry::default();
//! let info = registry.init::<User>(None)?;
//! assert_eq!(info.table_name(), "t_user");
//! ```

// Re-export derive macro
// Re-export all core types
pub use tablemeta_core::*;
pub use tablemeta_derive::Table;
