// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

//! Per-entity table descriptor.
//!
//! A [`TableInfo`] is the frozen aggregate the rest of the system keys off:
//! qualified table name, primary-key data, the ordered field descriptors, and
//! every derived SQL fragment. It is built once by the registry, cached for
//! the process lifetime, and is immutable afterwards — the only sanctioned
//! post-publish mutation is the execution-context handle swap, which goes
//! through a synchronized setter.

use std::{
    collections::HashMap,
    sync::{Arc, OnceLock, RwLock}
};

use crate::{
    classify::{Diagnostic, classify},
    config::GlobalConfig,
    error::MetaError,
    field::FieldInfo,
    model::{EntityModel, EntityType, IdType},
    naming::{qualify, to_column_name},
    registry::ExecutionContext,
    script::{COMMA, EQUALS, NEWLINE, convert_if, not_null_test, quoted_literal, safe_param}
};

/// Primary-key descriptor.
#[derive(Clone, Debug)]
pub struct KeyInfo {
    property: String,
    column: String,
    type_name: &'static str,
    id_type: IdType,
    related: bool
}

impl KeyInfo {
    pub(crate) fn new(
        property: String,
        column: String,
        type_name: &'static str,
        id_type: IdType,
        related: bool
    ) -> Self {
        Self {
            property,
            column,
            type_name,
            id_type,
            related
        }
    }

    /// Key property name.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Key column name.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Short name of the key's value type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Key-generation policy in effect.
    pub fn id_type(&self) -> IdType {
        self.id_type
    }

    /// Whether generated SELECT text must alias the key column.
    pub fn is_related(&self) -> bool {
        self.related
    }
}

/// Frozen per-entity metadata aggregate.
pub struct TableInfo {
    entity: EntityType,
    table_name: String,
    key: Option<KeyInfo>,
    key_sequence: Option<String>,
    fields: Vec<FieldInfo>,
    result_map: Option<String>,
    auto_init_result_map: bool,
    generated_result_map: bool,
    namespace: Option<String>,
    logic_delete: bool,
    with_insert_fill: bool,
    with_update_fill: bool,
    version_index: Option<usize>,
    diagnostics: Vec<Diagnostic>,
    property_index: HashMap<String, usize>,
    key_sql_select: OnceLock<String>,
    all_sql_select: OnceLock<String>,
    context: RwLock<Option<Arc<dyn ExecutionContext>>>
}

impl std::fmt::Debug for TableInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // `context` holds a `dyn ExecutionContext`, which has no `Debug`
        // bound, so the handle is elided from the output.
        f.debug_struct("TableInfo")
            .field("entity", &self.entity)
            .field("table_name", &self.table_name)
            .field("key", &self.key)
            .field("key_sequence", &self.key_sequence)
            .field("fields", &self.fields)
            .field("result_map", &self.result_map)
            .field("auto_init_result_map", &self.auto_init_result_map)
            .field("generated_result_map", &self.generated_result_map)
            .field("namespace", &self.namespace)
            .field("logic_delete", &self.logic_delete)
            .field("with_insert_fill", &self.with_insert_fill)
            .field("with_update_fill", &self.with_update_fill)
            .field("version_index", &self.version_index)
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}

impl TableInfo {
    /// Resolve a descriptor from a normalized entity model: table-name
    /// derivation, field classification, derived flags, auxiliary index.
    ///
    /// # Errors
    ///
    /// Propagates the classifier's configuration errors; nothing is cached on
    /// failure, so a later attempt with fixed inputs resolves cleanly.
    pub(crate) fn resolve(
        config: &GlobalConfig,
        model: &EntityModel,
        namespace: Option<String>
    ) -> Result<Self, MetaError> {
        let attrs = model.table.clone().unwrap_or_default();
        let db = &config.db;

        // Table name precedence: explicit attribute > convention. An explicit
        // name drops the global prefix unless the entity opts back in.
        let mut prefix_effect = true;
        let base_name = match &attrs.name {
            Some(explicit) if !explicit.trim().is_empty() => {
                if !db.table_prefix.is_empty() && !attrs.keep_global_prefix {
                    prefix_effect = false;
                }
                explicit.clone()
            }
            _ => to_column_name(model.entity.name(), db.table_underline, db.capital_mode)
        };
        let schema = match &attrs.schema {
            Some(explicit) if !explicit.trim().is_empty() => explicit.clone(),
            _ => db.schema.clone()
        };
        let prefix = if prefix_effect { db.table_prefix.as_str() } else { "" };
        let table_name = qualify(&base_name, prefix, &schema);

        // A key sequence only matters once a custom generator is configured.
        let key_sequence = if db.key_generator.is_some() { attrs.key_sequence.clone() } else { None };

        let classified = classify(config, model, &attrs.exclude)?;

        // Auto result-map ids are minted here so the descriptor can freeze
        // with them; the registry performs the actual registration.
        let mut generated_result_map = false;
        let result_map = match &attrs.result_map {
            Some(explicit) if !explicit.trim().is_empty() => Some(explicit.clone()),
            _ => match (&namespace, attrs.auto_result_map) {
                (Some(ns), true) => {
                    generated_result_map = true;
                    Some(format!("{ns}.tablemeta_{}", model.entity.name()))
                }
                _ => None
            }
        };

        let builder = TableInfoBuilder {
            entity: model.entity,
            table_name,
            key: classified.key,
            key_sequence,
            fields: classified.fields,
            result_map,
            auto_init_result_map: attrs.auto_result_map,
            generated_result_map,
            namespace,
            diagnostics: classified.diagnostics
        };
        Ok(builder.freeze())
    }

    /// Entity type this descriptor maps.
    pub fn entity_type(&self) -> EntityType {
        self.entity
    }

    /// Fully qualified table name (schema + prefix applied).
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Primary-key descriptor, when one was resolved.
    pub fn key(&self) -> Option<&KeyInfo> {
        self.key.as_ref()
    }

    /// Sequence backing a generator-based key.
    pub fn key_sequence(&self) -> Option<&str> {
        self.key_sequence.as_deref()
    }

    /// Ordinary field descriptors in classification order.
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Result-map identifier (explicit, or installed by auto-generation).
    pub fn result_map(&self) -> Option<&str> {
        self.result_map.as_deref()
    }

    /// Whether a result map should be auto-generated when none is named.
    pub fn auto_init_result_map(&self) -> bool {
        self.auto_init_result_map
    }

    /// Whether [`result_map`](Self::result_map) holds an auto-minted id that
    /// the registry must register with the execution context.
    pub fn generated_result_map(&self) -> bool {
        self.generated_result_map
    }

    /// Statement namespace recorded at first resolution.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Findings collected during classification.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether a primary key was resolved.
    pub fn have_pk(&self) -> bool {
        self.key.is_some()
    }

    /// Whether a logical-delete field is configured.
    pub fn is_logic_delete(&self) -> bool {
        self.logic_delete
    }

    /// Whether any field fills on insert.
    pub fn with_insert_fill(&self) -> bool {
        self.with_insert_fill
    }

    /// Whether any field fills on update.
    pub fn with_update_fill(&self) -> bool {
        self.with_update_fill
    }

    /// Whether an optimistic-lock version field is configured.
    pub fn with_version(&self) -> bool {
        self.version_index.is_some()
    }

    /// The optimistic-lock version field, when configured.
    pub fn version_field(&self) -> Option<&FieldInfo> {
        self.version_index.map(|i| &self.fields[i])
    }

    /// Fast single-field lookup by property name (ordinary fields only).
    pub fn field_by_property(&self, property: &str) -> Option<&FieldInfo> {
        self.property_index.get(property).map(|&i| &self.fields[i])
    }

    /// Fully qualified statement identifier: `namespace.method`.
    pub fn sql_statement(&self, method: &str) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}.{method}"),
            None => method.to_string()
        }
    }

    /// Execution-context handle attached at resolution time.
    pub fn context(&self) -> Option<Arc<dyn ExecutionContext>> {
        self.context.read().ok().and_then(|guard| guard.clone())
    }

    /// Swap the execution-context handle. The single sanctioned
    /// post-publish mutation; field metadata is never rebuilt.
    pub(crate) fn set_context(&self, context: Arc<dyn ExecutionContext>) {
        if let Ok(mut guard) = self.context.write() {
            *guard = Some(context);
        }
    }

    /// Key SELECT fragment: `column` or `column AS property`. Cached.
    pub fn key_sql_select(&self) -> &str {
        self.key_sql_select.get_or_init(|| match &self.key {
            Some(key) if key.related => format!("{} AS {}", key.column, key.property),
            Some(key) => key.column.clone(),
            None => String::new()
        })
    }

    /// SELECT list covering the key and all selectable fields, key first,
    /// comma-joined. Cached after the first computation; sound because the
    /// descriptor is immutable after classification.
    pub fn all_sql_select(&self) -> &str {
        self.all_sql_select.get_or_init(|| self.choose_select(FieldInfo::is_select))
    }

    /// SELECT list for the key plus the fields matching `predicate`,
    /// key first.
    pub fn choose_select(&self, predicate: impl Fn(&FieldInfo) -> bool) -> String {
        let key_select = self.key_sql_select();
        let field_select = self
            .fields
            .iter()
            .filter(|f| predicate(f))
            .map(FieldInfo::sql_select)
            .collect::<Vec<_>>()
            .join(COMMA);
        if !key_select.is_empty() && !field_select.is_empty() {
            format!("{key_select}{COMMA}{field_select}")
        } else if !field_select.is_empty() {
            field_select
        } else {
            key_select.to_string()
        }
    }

    /// Key part of the INSERT value list: `#{prefix+property},`. Empty for
    /// auto-increment keys, which must never appear in INSERT text.
    pub fn key_insert_sql_property(&self, prefix: &str, newline: bool) -> String {
        match &self.key {
            Some(key) if key.id_type == IdType::Auto => String::new(),
            Some(key) => format!(
                "{}{COMMA}{}",
                safe_param(&format!("{prefix}{}", key.property)),
                if newline { NEWLINE } else { "" }
            ),
            None => String::new()
        }
    }

    /// Key part of the INSERT column list: `column,`. Empty for
    /// auto-increment keys.
    pub fn key_insert_sql_column(&self, newline: bool) -> String {
        match &self.key {
            Some(key) if key.id_type == IdType::Auto => String::new(),
            Some(key) => format!("{}{COMMA}{}", key.column, if newline { NEWLINE } else { "" }),
            None => String::new()
        }
    }

    /// Full INSERT value list: key first, then every eligible field's guarded
    /// value fragment, newline-joined for embedding in a templated statement.
    pub fn all_insert_sql_property_maybe_if(&self, prefix: &str) -> String {
        let field_script = self
            .fields
            .iter()
            .filter_map(|f| f.insert_sql_property_maybe_if(prefix))
            .collect::<Vec<_>>()
            .join(NEWLINE);
        format!("{}{field_script}", self.key_insert_sql_property(prefix, true))
    }

    /// Full INSERT column list: key first, then every eligible field's
    /// guarded column fragment, newline-joined.
    pub fn all_insert_sql_column_maybe_if(&self) -> String {
        let field_script = self
            .fields
            .iter()
            .filter_map(|f| f.insert_sql_column_maybe_if(""))
            .collect::<Vec<_>>()
            .join(NEWLINE);
        format!("{}{field_script}", self.key_insert_sql_column(true))
    }

    /// WHERE fragments for every eligible field, newline-joined.
    ///
    /// `ignore_logic_delete` drops the logical-delete field (used when the
    /// caller supplies an explicit deletion filter). With `with_id`, the
    /// key's equality fragment is placed first under its own null guard.
    pub fn all_sql_where(&self, ignore_logic_delete: bool, with_id: bool, prefix: &str) -> String {
        let field_script = self
            .fields
            .iter()
            .filter(|f| !(ignore_logic_delete && self.logic_delete && f.is_logic_delete()))
            .filter_map(|f| f.sql_where(prefix))
            .collect::<Vec<_>>()
            .join(NEWLINE);

        let Some(key) = self.key.as_ref().filter(|_| with_id) else {
            return field_script;
        };
        let bound = format!("{prefix}{}", key.property);
        let key_script = format!("{}{EQUALS}{}", key.column, safe_param(&bound));
        format!(
            "{}{NEWLINE}{field_script}",
            convert_if(&key_script, &not_null_test(&bound), false)
        )
    }

    /// SET fragments for every eligible field, newline-joined. Keys are
    /// never updated.
    pub fn all_sql_set(&self, ignore_logic_delete: bool, prefix: &str) -> String {
        self.fields
            .iter()
            .filter(|f| !(ignore_logic_delete && self.logic_delete && f.is_logic_delete()))
            .filter_map(|f| f.sql_set(prefix))
            .collect::<Vec<_>>()
            .join(NEWLINE)
    }

    /// Logical-delete predicate.
    ///
    /// `is_where` selects the not-deleted literal (filtering live rows);
    /// otherwise the deleted literal is used (marking rows). A configured
    /// literal `null` (case-insensitive) renders as `IS NULL` / `= NULL`.
    /// `start_with_and` prepends `" AND "`.
    ///
    /// # Errors
    ///
    /// [`MetaError::MissingLogicDeleteField`] when the table-level flag is
    /// set without a backing field — unreachable through the classifier,
    /// kept as a defensive check.
    pub fn logic_delete_sql(&self, start_with_and: bool, is_where: bool) -> Result<String, MetaError> {
        if !self.logic_delete {
            return Ok(String::new());
        }
        let field = self
            .fields
            .iter()
            .find(|f| f.is_logic_delete())
            .ok_or_else(|| MetaError::MissingLogicDeleteField {
                table: self.table_name.clone()
            })?;
        let mut script = Self::format_logic_delete_sql(field, is_where);
        if start_with_and {
            script = format!(" AND {script}");
        }
        Ok(script)
    }

    fn format_logic_delete_sql(field: &FieldInfo, is_where: bool) -> String {
        let value = if is_where { field.logic_not_delete_value() } else { field.logic_delete_value() };
        if value.eq_ignore_ascii_case("null") {
            if is_where {
                format!("{} IS NULL", field.column())
            } else {
                format!("{}{EQUALS}NULL", field.column())
            }
        } else {
            format!(
                "{}{EQUALS}{}",
                field.column(),
                quoted_literal(value, field.is_char_sequence())
            )
        }
    }
}

/// Accumulates a descriptor during resolution and freezes it, deriving the
/// table-level flags and the property lookup index in one pass.
struct TableInfoBuilder {
    entity: EntityType,
    table_name: String,
    key: Option<KeyInfo>,
    key_sequence: Option<String>,
    fields: Vec<FieldInfo>,
    result_map: Option<String>,
    auto_init_result_map: bool,
    generated_result_map: bool,
    namespace: Option<String>,
    diagnostics: Vec<Diagnostic>
}

impl TableInfoBuilder {
    fn freeze(self) -> TableInfo {
        let mut logic_delete = false;
        let mut with_insert_fill = false;
        let mut with_update_fill = false;
        let mut version_index = None;
        let mut property_index = HashMap::with_capacity(self.fields.len());
        for (index, field) in self.fields.iter().enumerate() {
            logic_delete |= field.is_logic_delete();
            with_insert_fill |= field.with_insert_fill();
            with_update_fill |= field.with_update_fill();
            if field.is_version() {
                version_index = Some(index);
            }
            property_index.insert(field.property().to_string(), index);
        }

        TableInfo {
            entity: self.entity,
            table_name: self.table_name,
            key: self.key,
            key_sequence: self.key_sequence,
            fields: self.fields,
            result_map: self.result_map,
            auto_init_result_map: self.auto_init_result_map,
            generated_result_map: self.generated_result_map,
            namespace: self.namespace,
            logic_delete,
            with_insert_fill,
            with_update_fill,
            version_index,
            diagnostics: self.diagnostics,
            property_index,
            key_sql_select: OnceLock::new(),
            all_sql_select: OnceLock::new(),
            context: RwLock::new(None)
        }
    }
}
