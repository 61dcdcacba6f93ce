// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tablemeta_core::prelude::*;
//! ```

pub use crate::{
    config::{DbConfig, GlobalConfig, KeyGenerator},
    error::MetaError,
    field::FieldInfo,
    model::{
        Entity, EntityModel, EntityType, FieldAttrs, FieldFill, FieldModel, FieldStrategy,
        IdAttrs, IdType, TableAttrs
    },
    registry::{ExecutionContext, TableRegistry},
    table::{KeyInfo, TableInfo}
};
