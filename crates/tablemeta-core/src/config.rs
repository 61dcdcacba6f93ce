// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

//! Global configuration.
//!
//! Conventions and defaults that apply when an entity carries no overriding
//! attribute. Precedence everywhere is attribute > convention > global
//! default; this module only supplies the last layer.

use std::{fmt, sync::Arc};

use crate::model::{FieldStrategy, IdType};

/// External key generator: given a sequence name, produces the SQL that
/// fetches the next key value.
///
/// Invoked by the registry only when a [`IdType::Generator`] key is actually
/// configured; supplying no generator is an error at that point, not before.
pub trait KeyGenerator: Send + Sync {
    /// SQL that selects the next value of `sequence`.
    fn execute_sql(&self, sequence: &str) -> String;
}

/// Database-facing conventions and defaults.
#[derive(Clone)]
pub struct DbConfig {
    /// Prefix prepended to derived and (opt-in) explicit table names.
    pub table_prefix: String,
    /// Schema qualifying every table name, unless overridden per entity.
    pub schema: String,
    /// Convert camel-cased type names to underscore table names.
    pub table_underline: bool,
    /// Upper-case generated table and column names.
    pub capital_mode: bool,
    /// Default primary-key strategy when an entity declares none.
    pub id_type: IdType,
    /// Default conditional-SQL strategy for fields that declare none.
    pub field_strategy: FieldStrategy,
    /// Global literal written when marking a row logically deleted.
    pub logic_delete_value: String,
    /// Global literal a live row carries.
    pub logic_not_delete_value: String,
    /// External key generator for [`IdType::Generator`] keys.
    pub key_generator: Option<Arc<dyn KeyGenerator>>
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            table_prefix: String::new(),
            schema: String::new(),
            table_underline: true,
            capital_mode: false,
            id_type: IdType::None,
            field_strategy: FieldStrategy::NotNull,
            logic_delete_value: "1".to_string(),
            logic_not_delete_value: "0".to_string(),
            key_generator: None
        }
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("table_prefix", &self.table_prefix)
            .field("schema", &self.schema)
            .field("table_underline", &self.table_underline)
            .field("capital_mode", &self.capital_mode)
            .field("id_type", &self.id_type)
            .field("field_strategy", &self.field_strategy)
            .field("logic_delete_value", &self.logic_delete_value)
            .field("logic_not_delete_value", &self.logic_not_delete_value)
            .field("key_generator", &self.key_generator.as_ref().map(|_| "<dyn KeyGenerator>"))
            .finish()
    }
}

/// Top-level configuration injected into a
/// [`TableRegistry`](crate::registry::TableRegistry).
#[derive(Clone, Debug)]
pub struct GlobalConfig {
    /// Map underscore column names back to camel-cased properties. Governs
    /// column-name derivation and the relatedness (aliasing) check. On by
    /// default.
    pub under_camel: bool,
    /// Database conventions and defaults.
    pub db: DbConfig
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            under_camel: true,
            db: DbConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GlobalConfig::default();
        assert!(config.under_camel);
        assert!(config.db.table_underline);
        assert!(!config.db.capital_mode);
        assert_eq!(config.db.id_type, IdType::None);
        assert_eq!(config.db.field_strategy, FieldStrategy::NotNull);
        assert_eq!(config.db.logic_delete_value, "1");
        assert_eq!(config.db.logic_not_delete_value, "0");
        assert!(config.db.key_generator.is_none());
    }
}
