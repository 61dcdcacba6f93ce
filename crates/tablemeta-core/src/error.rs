// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

//! Fatal metadata errors.
//!
//! Everything here aborts resolution for the offending entity and surfaces to
//! the caller that triggered it; nothing is cached on failure, so a later
//! call with fixed inputs resolves cleanly. Non-fatal findings go through
//! [`Diagnostic`](crate::classify::Diagnostic) instead.

use thiserror::Error;

/// Errors raised while resolving entity metadata or synthesizing fragments.
#[derive(Debug, Error)]
pub enum MetaError {
    /// More than one field carries a `#[table_id]` record.
    #[error("more than one #[table_id] field in entity `{entity}`")]
    MultipleTableId {
        /// Offending entity type name.
        entity: String
    },

    /// More than one field is marked as the logical-delete flag.
    #[error("more than one #[logic_delete] field in entity `{entity}`")]
    MultipleLogicDelete {
        /// Offending entity type name.
        entity: String
    },

    /// More than one field is marked as the optimistic-lock version.
    #[error("more than one #[version] field in entity `{entity}`")]
    MultipleVersion {
        /// Offending entity type name.
        entity: String
    },

    /// The logical-delete flag is set on the table but no field backs it.
    /// Unreachable through the classifier; kept as a defensive check on the
    /// fragment path.
    #[error("no logic-delete field configured for table `{table}`")]
    MissingLogicDeleteField {
        /// Qualified table name.
        table: String
    },

    /// A [`IdType::Generator`](crate::model::IdType::Generator) key is in
    /// play but no [`KeyGenerator`](crate::config::KeyGenerator) was
    /// configured. Raised only when the generator is actually needed.
    #[error("no KeyGenerator implementation configured")]
    MissingKeyGenerator,

    /// A generator-backed key has no `key_sequence` to draw from.
    #[error("entity `{entity}` uses a generated key but declares no key_sequence")]
    MissingKeySequence {
        /// Offending entity type name.
        entity: String
    },

    /// A key-dependent operation was requested for an entity that resolved
    /// without a primary key.
    #[error("entity `{entity}` has no primary key")]
    MissingPrimaryKey {
        /// Offending entity type name.
        entity: String
    }
}
