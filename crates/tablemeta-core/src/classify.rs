// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

//! Field classification.
//!
//! Walks an entity's normalized field records in declaration order and
//! decides, per field: excluded, primary key, or ordinary. Attribute records
//! always win over naming convention; the global configuration is the last
//! fallback. Non-fatal findings are collected as [`Diagnostic`] values and
//! logged, never raised.

use std::fmt;

use tracing::warn;

use crate::{
    config::GlobalConfig,
    error::MetaError,
    field::FieldInfo,
    model::{EntityModel, FieldModel, IdAttrs, IdType},
    naming::{check_related, to_column_name},
    table::KeyInfo
};

/// Conventional primary-key property name, matched case-insensitively.
const DEFAULT_ID_NAME: &str = "id";

/// Non-fatal classification finding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// No field qualified as the primary key. The entity still resolves but
    /// cannot serve key-dependent operations later.
    NoPrimaryKey {
        /// Entity type name.
        entity: String
    },
    /// A primary-key field also carried a `#[table_field]` record; the
    /// field-level record is ignored.
    FieldAttrsIgnored {
        /// Entity type name.
        entity: String,
        /// Property whose field-level record was ignored.
        property: String
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPrimaryKey { entity } => {
                write!(f, "cannot find table primary key in entity `{entity}`")
            }
            Self::FieldAttrsIgnored { entity, property } => write!(
                f,
                "`{property}` is the table primary key in entity `{entity}`, so its #[table_field] record is ignored"
            )
        }
    }
}

/// Classifier output: the optional key, the ordered ordinary fields, and the
/// findings collected along the way.
#[derive(Debug)]
pub struct Classified {
    /// Primary-key descriptor, when one was resolved.
    pub key: Option<KeyInfo>,
    /// Ordinary field descriptors in declaration order.
    pub fields: Vec<FieldInfo>,
    /// Non-fatal findings.
    pub diagnostics: Vec<Diagnostic>
}

/// Classify every field of `model`.
///
/// `exclude` holds property names dropped before any other rule applies.
/// Primary-key mode: when any field carries an [`IdAttrs`] record, only
/// annotated fields may become the key; otherwise a field named `id`
/// (case-insensitive) is picked by convention.
///
/// # Errors
///
/// [`MetaError::MultipleTableId`], [`MetaError::MultipleLogicDelete`] or
/// [`MetaError::MultipleVersion`] when the respective at-most-one invariant
/// is violated.
pub fn classify(
    config: &GlobalConfig,
    model: &EntityModel,
    exclude: &[String]
) -> Result<Classified, MetaError> {
    let entity = model.entity.name();
    let included: Vec<&FieldModel> = model
        .fields
        .iter()
        .filter(|f| !exclude.contains(&f.property))
        .filter(|f| f.field.as_ref().is_none_or(|attrs| attrs.exist))
        .collect();
    // Annotation-driven key mode is decided over the whole entity up front.
    let exist_table_id = included.iter().any(|f| f.id.is_some());

    let mut key: Option<KeyInfo> = None;
    let mut fields = Vec::with_capacity(included.len());
    let mut diagnostics = Vec::new();

    for field in included {
        if exist_table_id {
            if let Some(id_attrs) = &field.id {
                if key.is_some() {
                    return Err(MetaError::MultipleTableId {
                        entity: entity.to_string()
                    });
                }
                note_shadowed_attrs(entity, field, &mut diagnostics);
                key = Some(key_with_annotation(config, field, id_attrs));
                continue;
            }
        } else if key.is_none() && field.property.eq_ignore_ascii_case(DEFAULT_ID_NAME) {
            note_shadowed_attrs(entity, field, &mut diagnostics);
            key = Some(key_without_annotation(config, field));
            continue;
        }

        fields.push(FieldInfo::new(&config.db, config.under_camel, field));
    }

    if fields.iter().filter(|f| f.is_logic_delete()).count() > 1 {
        return Err(MetaError::MultipleLogicDelete {
            entity: entity.to_string()
        });
    }
    if fields.iter().filter(|f| f.is_version()).count() > 1 {
        return Err(MetaError::MultipleVersion {
            entity: entity.to_string()
        });
    }

    if key.is_none() {
        let diagnostic = Diagnostic::NoPrimaryKey {
            entity: entity.to_string()
        };
        warn!("{diagnostic}");
        diagnostics.push(diagnostic);
    }

    Ok(Classified {
        key,
        fields,
        diagnostics
    })
}

/// Build the key descriptor from an explicit `#[table_id]` record.
///
/// Key policy precedence: the record's [`IdType`] unless it is
/// [`IdType::None`], then the global default. Column precedence: record
/// value, then the naming resolver.
fn key_with_annotation(config: &GlobalConfig, field: &FieldModel, attrs: &IdAttrs) -> KeyInfo {
    let id_type = if attrs.id_type == IdType::None {
        config.db.id_type
    } else {
        attrs.id_type
    };
    let column = match &attrs.column {
        Some(value) if !value.trim().is_empty() => value.clone(),
        _ => to_column_name(&field.property, config.under_camel, config.db.capital_mode)
    };
    KeyInfo::new(
        field.property.clone(),
        column.clone(),
        field.type_name,
        id_type,
        check_related(config.under_camel, &field.property, &column)
    )
}

/// Build the key descriptor for a conventionally named `id` field.
fn key_without_annotation(config: &GlobalConfig, field: &FieldModel) -> KeyInfo {
    // `id` has no case humps, only capital mode can change its spelling.
    let column = if config.db.capital_mode {
        field.property.to_ascii_uppercase()
    } else {
        field.property.clone()
    };
    KeyInfo::new(
        field.property.clone(),
        column.clone(),
        field.type_name,
        config.db.id_type,
        check_related(config.under_camel, &field.property, &column)
    )
}

/// Warn when a key field also carries a field-level record.
fn note_shadowed_attrs(entity: &str, field: &FieldModel, diagnostics: &mut Vec<Diagnostic>) {
    if field.field.is_some() {
        let diagnostic = Diagnostic::FieldAttrsIgnored {
            entity: entity.to_string(),
            property: field.property.clone()
        };
        warn!("{diagnostic}");
        diagnostics.push(diagnostic);
    }
}
