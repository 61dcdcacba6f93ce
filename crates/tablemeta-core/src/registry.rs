// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

//! Process-wide metadata registry.
//!
//! Maps entity types to their frozen [`TableInfo`] descriptors with
//! at-most-once initialization per type. The registry is an explicit object
//! rather than ambient global state: inject one per process for production,
//! one per test for isolation.
//!
//! Concurrency: one coarse lock guards the whole resolve-or-create path.
//! Resolution is one-time, CPU-only string work per distinct entity type, so
//! contention is bounded by the (small, stable) number of entity types — a
//! second concurrent requester for an unresolved type blocks until the first
//! finishes, then receives the now-cached descriptor.

use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard}
};

use tracing::debug;

use crate::{
    config::GlobalConfig,
    error::MetaError,
    model::{Entity, EntityModel, EntityType, is_simple_type},
    table::TableInfo
};

/// Suffix appended to generated key-lookup statement identifiers.
pub const SELECT_KEY_SUFFIX: &str = "!selectKey";

/// One property-to-column binding of a registered result map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultMapping {
    /// Entity property name.
    pub property: String,
    /// Database column name.
    pub column: String,
    /// Whether this binding is the primary key.
    pub id_flag: bool
}

/// Auto-generated result mapping handed to the execution engine.
#[derive(Clone, Debug)]
pub struct ResultMap {
    /// Registry-minted identifier, `{namespace}.tablemeta_{EntityName}`.
    pub id: String,
    /// Entity type name the mapping materializes.
    pub entity: &'static str,
    /// Property-to-column bindings, primary key first.
    pub mappings: Vec<ResultMapping>
}

/// Generated key-lookup execution plan: a single-column SELECT the engine
/// runs to populate the key property after an insert.
#[derive(Clone, Debug)]
pub struct KeyStatement {
    /// Statement identifier, `{namespace}.{base}!selectKey`.
    pub id: String,
    /// Property the fetched key is written back to.
    pub key_property: String,
    /// Short name of the key's value type.
    pub key_type_name: &'static str,
    /// SQL produced by the configured [`KeyGenerator`](crate::config::KeyGenerator).
    pub sql: String
}

/// The slice of the SQL execution engine the metadata layer talks to.
///
/// Supplies the statement namespace and accepts the auto-generated artifacts
/// (result maps, key-lookup statements) the engine owns from then on.
pub trait ExecutionContext: Send + Sync {
    /// Statement namespace (the mapper's fully qualified name).
    fn namespace(&self) -> &str;

    /// Install an auto-generated result mapping.
    fn register_result_map(&self, result_map: ResultMap);

    /// Install a generated key-lookup statement.
    fn register_key_statement(&self, statement: KeyStatement);
}

/// Entity-type → descriptor cache with single-flight initialization.
#[derive(Default)]
pub struct TableRegistry {
    config: GlobalConfig,
    tables: Mutex<HashMap<TypeId, Arc<TableInfo>>>
}

impl TableRegistry {
    /// Registry with the given global configuration.
    pub fn new(config: GlobalConfig) -> Self {
        Self {
            config,
            tables: Mutex::new(HashMap::new())
        }
    }

    /// The injected global configuration.
    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    /// Resolve-or-create the descriptor for `E`.
    ///
    /// A cache hit only swaps the lightweight execution-context handle on
    /// the existing descriptor (a second engine instance sharing entity
    /// types must not rebuild field metadata). A miss classifies, freezes,
    /// registers the auto result map when configured, and publishes — all
    /// under the single registry lock, so concurrent first requesters for
    /// the same type never duplicate the work or its side effects.
    ///
    /// # Errors
    ///
    /// Classification errors ([`MetaError`]) abort initialization for this
    /// entity. Failures are not cached: a later call retries resolution.
    pub fn init<E: Entity>(
        &self,
        context: Option<Arc<dyn ExecutionContext>>
    ) -> Result<Arc<TableInfo>, MetaError> {
        self.init_model(context, E::model())
    }

    /// Non-generic core of [`init`](Self::init), for models produced by
    /// mechanisms other than the derive macro.
    pub fn init_model(
        &self,
        context: Option<Arc<dyn ExecutionContext>>,
        model: EntityModel
    ) -> Result<Arc<TableInfo>, MetaError> {
        let mut tables = self.lock();
        if let Some(existing) = tables.get(&model.entity.id()) {
            if let Some(context) = context {
                existing.set_context(context);
            }
            return Ok(Arc::clone(existing));
        }

        let namespace = context.as_ref().map(|c| c.namespace().to_string());
        let info = Arc::new(TableInfo::resolve(&self.config, &model, namespace)?);
        if let Some(context) = &context {
            info.set_context(Arc::clone(context));
            if info.generated_result_map() {
                context.register_result_map(build_result_map(&info));
            }
        }
        debug!(
            entity = model.entity.name(),
            table = info.table_name(),
            "table metadata resolved"
        );
        tables.insert(model.entity.id(), Arc::clone(&info));
        Ok(info)
    }

    /// Cached descriptor for `E`, if any.
    ///
    /// Never initializes. On a miss the ancestor chain is walked toward the
    /// root; a hit on an ancestor is re-cached under `E` itself so the walk
    /// happens at most once per subtype. Primitive and string-like types are
    /// never entities and always resolve to `None`.
    pub fn resolve<E: Entity>(&self) -> Option<Arc<TableInfo>> {
        self.resolve_type(E::entity_type())
    }

    /// Non-generic core of [`resolve`](Self::resolve).
    pub fn resolve_type(&self, entity: EntityType) -> Option<Arc<TableInfo>> {
        if is_simple_type(entity.id()) {
            return None;
        }
        let mut tables = self.lock();
        if let Some(info) = tables.get(&entity.id()) {
            return Some(Arc::clone(info));
        }
        let mut current = entity.parent();
        while let Some(ancestor) = current {
            if let Some(info) = tables.get(&ancestor.id()) {
                // Subtype inherits the ancestor's table mapping.
                let info = Arc::clone(info);
                tables.insert(entity.id(), Arc::clone(&info));
                return Some(info);
            }
            current = ancestor.parent();
        }
        None
    }

    /// All resolved descriptors, in no particular order.
    pub fn tables(&self) -> Vec<Arc<TableInfo>> {
        self.lock().values().map(Arc::clone).collect()
    }

    /// Number of resolved entity types.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every cached descriptor. Test hook.
    pub fn reset(&self) {
        self.lock().clear();
    }

    /// Build and register the key-lookup statement for a generator-backed
    /// key: `{namespace}.{base_statement_id}!selectKey` selecting the next
    /// sequence value into the key property.
    ///
    /// # Errors
    ///
    /// [`MetaError::MissingKeyGenerator`] when no generator is configured
    /// (raised here, when actually needed — never at classification time),
    /// [`MetaError::MissingPrimaryKey`] / [`MetaError::MissingKeySequence`]
    /// when the entity lacks the key or sequence to generate from.
    pub fn key_statement(
        &self,
        base_statement_id: &str,
        info: &TableInfo,
        context: &dyn ExecutionContext
    ) -> Result<KeyStatement, MetaError> {
        let generator =
            self.config.db.key_generator.as_ref().ok_or(MetaError::MissingKeyGenerator)?;
        let key = info.key().ok_or_else(|| MetaError::MissingPrimaryKey {
            entity: info.entity_type().name().to_string()
        })?;
        let sequence = info.key_sequence().ok_or_else(|| MetaError::MissingKeySequence {
            entity: info.entity_type().name().to_string()
        })?;
        let statement = KeyStatement {
            id: format!("{}.{base_statement_id}{SELECT_KEY_SUFFIX}", context.namespace()),
            key_property: key.property().to_string(),
            key_type_name: key.type_name(),
            sql: generator.execute_sql(sequence)
        };
        context.register_key_statement(statement.clone());
        Ok(statement)
    }

    /// Acquire the registry lock, recovering the map from a poisoned guard.
    fn lock(&self) -> MutexGuard<'_, HashMap<TypeId, Arc<TableInfo>>> {
        match self.tables.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner()
        }
    }
}

/// Property-to-column bindings for an auto-generated result map, primary
/// key first.
fn build_result_map(info: &TableInfo) -> ResultMap {
    let mut mappings = Vec::with_capacity(info.fields().len() + 1);
    if let Some(key) = info.key() {
        mappings.push(ResultMapping {
            property: key.property().to_string(),
            column: key.column().to_string(),
            id_flag: true
        });
    }
    for field in info.fields() {
        mappings.push(ResultMapping {
            property: field.property().to_string(),
            column: field.column().to_string(),
            id_flag: false
        });
    }
    ResultMap {
        id: info.result_map().unwrap_or_default().to_string(),
        entity: info.entity_type().name(),
        mappings
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{
        config::{DbConfig, KeyGenerator},
        model::{FieldModel, IdAttrs, IdType, TableAttrs}
    };

    struct User;

    impl Entity for User {
        fn entity_type() -> EntityType {
            EntityType::of::<User>("User")
        }

        fn model() -> EntityModel {
            EntityModel::new(Self::entity_type())
                .with_table(TableAttrs {
                    auto_result_map: true,
                    key_sequence: Some("seq_user".to_string()),
                    ..TableAttrs::default()
                })
                .with_field(FieldModel::new("id", "u64", false).with_id(IdAttrs {
                    column: None,
                    id_type: IdType::Generator
                }))
                .with_field(FieldModel::new("userName", "String", true))
        }
    }

    struct AdminUser;

    impl Entity for AdminUser {
        fn entity_type() -> EntityType {
            EntityType::of::<AdminUser>("AdminUser").with_parent(User::entity_type)
        }

        fn model() -> EntityModel {
            EntityModel::new(Self::entity_type())
        }
    }

    #[derive(Default)]
    struct CountingContext {
        result_maps: AtomicUsize,
        key_statements: AtomicUsize
    }

    impl ExecutionContext for CountingContext {
        fn namespace(&self) -> &str {
            "app.mapper.UserMapper"
        }

        fn register_result_map(&self, _result_map: ResultMap) {
            self.result_maps.fetch_add(1, Ordering::SeqCst);
        }

        fn register_key_statement(&self, _statement: KeyStatement) {
            self.key_statements.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct SeqGenerator;

    impl KeyGenerator for SeqGenerator {
        fn execute_sql(&self, sequence: &str) -> String {
            format!("SELECT {sequence}.NEXTVAL FROM DUAL")
        }
    }

    fn registry_with_generator() -> TableRegistry {
        TableRegistry::new(GlobalConfig {
            db: DbConfig {
                key_generator: Some(Arc::new(SeqGenerator)),
                ..DbConfig::default()
            },
            ..GlobalConfig::default()
        })
    }

    #[test]
    fn init_caches_and_reuses() {
        let registry = TableRegistry::default();
        let first = registry.init::<User>(None).unwrap();
        let second = registry.init::<User>(None).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn concurrent_first_resolution_is_single_flight() {
        let registry = TableRegistry::default();
        let context: Arc<CountingContext> = Arc::new(CountingContext::default());
        std::thread::scope(|scope| {
            for _ in 0..8 {
                let context: Arc<dyn ExecutionContext> = context.clone();
                let registry = &registry;
                scope.spawn(move || registry.init::<User>(Some(context)).unwrap());
            }
        });
        // exactly one resolution registered the auto result map
        assert_eq!(context.result_maps.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn cache_hit_swaps_context_only() {
        let registry = TableRegistry::default();
        let first_ctx: Arc<dyn ExecutionContext> = Arc::new(CountingContext::default());
        let info = registry.init::<User>(Some(first_ctx)).unwrap();

        let second_ctx = Arc::new(CountingContext::default());
        let swapped: Arc<dyn ExecutionContext> = second_ctx.clone();
        let again = registry.init::<User>(Some(swapped)).unwrap();
        assert!(Arc::ptr_eq(&info, &again));
        // no re-registration on the swap
        assert_eq!(second_ctx.result_maps.load(Ordering::SeqCst), 0);
        assert!(info.context().is_some());
    }

    #[test]
    fn resolve_walks_ancestor_chain_and_recaches() {
        let registry = TableRegistry::default();
        registry.init::<User>(None).unwrap();

        let inherited = registry.resolve::<AdminUser>().unwrap();
        assert_eq!(inherited.table_name(), "user");
        // the walk result is cached under the subtype
        assert_eq!(registry.len(), 2);
        let again = registry.resolve::<AdminUser>().unwrap();
        assert!(Arc::ptr_eq(&inherited, &again));
    }

    #[test]
    fn resolve_refuses_simple_types() {
        let registry = TableRegistry::default();
        assert!(registry.resolve_type(EntityType::of::<String>("String")).is_none());
        assert!(registry.resolve_type(EntityType::of::<i64>("i64")).is_none());
    }

    #[test]
    fn failed_resolution_is_not_cached() {
        struct Broken;
        impl Entity for Broken {
            fn entity_type() -> EntityType {
                EntityType::of::<Broken>("Broken")
            }

            fn model() -> EntityModel {
                EntityModel::new(Self::entity_type())
                    .with_field(FieldModel::new("a", "u64", false).with_id(IdAttrs::default()))
                    .with_field(FieldModel::new("b", "u64", false).with_id(IdAttrs::default()))
            }
        }

        let registry = TableRegistry::default();
        assert!(registry.init::<Broken>(None).is_err());
        assert!(registry.is_empty());
        // idempotent retry: same inputs, same error, still nothing cached
        assert!(registry.init::<Broken>(None).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn reset_clears_cache() {
        let registry = TableRegistry::default();
        registry.init::<User>(None).unwrap();
        registry.reset();
        assert!(registry.is_empty());
        assert!(registry.resolve::<User>().is_none());
    }

    #[test]
    fn key_statement_requires_generator() {
        let registry = TableRegistry::default();
        let info = registry.init::<User>(None).unwrap();
        let context = CountingContext::default();
        let err = registry.key_statement("insert", &info, &context).unwrap_err();
        assert!(matches!(err, MetaError::MissingKeyGenerator));
    }

    #[test]
    fn key_statement_registers_select_key() {
        let registry = registry_with_generator();
        let context = Arc::new(CountingContext::default());
        let shared: Arc<dyn ExecutionContext> = context.clone();
        let info = registry.init::<User>(Some(shared)).unwrap();

        let statement = registry.key_statement("insert", &info, context.as_ref()).unwrap();
        assert_eq!(statement.id, "app.mapper.UserMapper.insert!selectKey");
        assert_eq!(statement.key_property, "id");
        assert_eq!(statement.sql, "SELECT seq_user.NEXTVAL FROM DUAL");
        assert_eq!(context.key_statements.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn auto_result_map_bindings() {
        let registry = TableRegistry::default();
        let context: Arc<dyn ExecutionContext> = Arc::new(CountingContext::default());
        let info = registry.init::<User>(Some(context)).unwrap();
        assert_eq!(
            info.result_map(),
            Some("app.mapper.UserMapper.tablemeta_User")
        );

        let result_map = build_result_map(&info);
        assert_eq!(result_map.mappings.len(), 2);
        assert!(result_map.mappings[0].id_flag);
        assert_eq!(result_map.mappings[0].column, "id");
        assert_eq!(result_map.mappings[1].property, "userName");
        assert_eq!(result_map.mappings[1].column, "user_name");
    }
}
