// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

//! Normalized entity models consumed by the classifier.
//!
//! Whatever mechanism extracts declarative metadata — the `tablemeta-derive`
//! macro, a schema file, hand-written impls — it all funnels into the fully
//! populated records in this module. The classifier and registry operate only
//! on these records and never on the extraction mechanism's types.

use std::any::TypeId;

/// A type that maps to a database table.
///
/// Usually implemented by `#[derive(Table)]`. Manual implementations are
/// supported and must uphold the documented field ordering of
/// [`EntityModel::fields`].
pub trait Entity: 'static {
    /// The type handle used as the registry cache key.
    fn entity_type() -> EntityType;

    /// The normalized attribute record describing this entity.
    fn model() -> EntityModel;
}

/// Opaque handle for an entity type: cache identity plus the ancestor link.
///
/// The parent link models metadata inheritance (`#[table(extends = "Base")]`):
/// a subtype without its own cached descriptor resolves to its nearest
/// cached ancestor. The chain simply ends at `None`.
#[derive(Clone, Copy, Debug)]
pub struct EntityType {
    id: TypeId,
    name: &'static str,
    parent: Option<fn() -> EntityType>
}

impl EntityType {
    /// Build a handle for `T`, keyed by its [`TypeId`].
    pub fn of<T: 'static>(name: &'static str) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name,
            parent: None
        }
    }

    /// Attach the ancestor link.
    #[must_use]
    pub fn with_parent(mut self, parent: fn() -> EntityType) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Cache key.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Short type name, used for table-name derivation and diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The next handle up the ancestor chain, if any.
    pub fn parent(&self) -> Option<EntityType> {
        self.parent.map(|f| f())
    }
}

/// Types that are never entities: the registry refuses to resolve them.
pub(crate) fn is_simple_type(id: TypeId) -> bool {
    id == TypeId::of::<bool>()
        || id == TypeId::of::<char>()
        || id == TypeId::of::<i8>()
        || id == TypeId::of::<i16>()
        || id == TypeId::of::<i32>()
        || id == TypeId::of::<i64>()
        || id == TypeId::of::<i128>()
        || id == TypeId::of::<isize>()
        || id == TypeId::of::<u8>()
        || id == TypeId::of::<u16>()
        || id == TypeId::of::<u32>()
        || id == TypeId::of::<u64>()
        || id == TypeId::of::<u128>()
        || id == TypeId::of::<usize>()
        || id == TypeId::of::<f32>()
        || id == TypeId::of::<f64>()
        || id == TypeId::of::<String>()
        || id == TypeId::of::<&'static str>()
}

/// Primary-key population strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdType {
    /// No declared strategy; the global default applies.
    #[default]
    None,
    /// Database auto-increment. The key column never appears in INSERT text.
    Auto,
    /// Caller supplies the key value.
    Input,
    /// An external [`KeyGenerator`](crate::config::KeyGenerator) produces the
    /// key from a configured sequence.
    Generator
}

/// When a field participates in generated conditional SQL.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldStrategy {
    /// Emit the fragment unconditionally, with no null guard.
    Ignored,
    /// Guard the fragment with a `!= null` test.
    #[default]
    NotNull,
    /// Guard with `!= null` and, for char-sequence fields, `!= ''`.
    NotEmpty,
    /// Never emit the fragment: the field is ineligible for generated
    /// INSERT/WHERE/SET text.
    Never
}

/// Automatic value-fill policy.
///
/// The filler itself is supplied by the execution engine; the metadata layer
/// only records when it must run, and emits unguarded fragments for filled
/// fields so the filler always fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldFill {
    /// No automatic fill.
    #[default]
    Default,
    /// Fill before INSERT.
    Insert,
    /// Fill before UPDATE.
    Update,
    /// Fill before both.
    InsertUpdate
}

impl FieldFill {
    /// Fill runs on insert.
    pub const fn on_insert(&self) -> bool {
        matches!(self, Self::Insert | Self::InsertUpdate)
    }

    /// Fill runs on update.
    pub const fn on_update(&self) -> bool {
        matches!(self, Self::Update | Self::InsertUpdate)
    }
}

/// Entity-level attribute record (`#[table(...)]`).
#[derive(Clone, Debug, Default)]
pub struct TableAttrs {
    /// Explicit table name. Blank means "derive from the type name".
    pub name: Option<String>,
    /// Explicit schema, overriding the global one.
    pub schema: Option<String>,
    /// Explicit result-map identifier.
    pub result_map: Option<String>,
    /// Auto-generate a result map when no explicit identifier is given.
    pub auto_result_map: bool,
    /// Keep the global table prefix even when the name is explicit.
    pub keep_global_prefix: bool,
    /// Property names excluded from classification.
    pub exclude: Vec<String>,
    /// Sequence name for [`IdType::Generator`] keys.
    pub key_sequence: Option<String>
}

/// Primary-key attribute record (`#[table_id(...)]`).
#[derive(Clone, Debug, Default)]
pub struct IdAttrs {
    /// Explicit key column name.
    pub column: Option<String>,
    /// Declared key strategy; [`IdType::None`] defers to the global default.
    pub id_type: IdType
}

/// Field-level attribute record (`#[table_field(...)]` and friends).
#[derive(Clone, Debug)]
pub struct FieldAttrs {
    /// Explicit column name.
    pub column: Option<String>,
    /// Whether the property exists in the table at all.
    pub exist: bool,
    /// Include in generated SELECT lists.
    pub select: bool,
    /// Conditional-SQL strategy; `None` defers to the global default.
    pub strategy: Option<FieldStrategy>,
    /// Automatic fill policy.
    pub fill: FieldFill,
    /// Marks the logical-delete flag column.
    pub logic_delete: bool,
    /// Literal written when marking a row deleted; `None` defers to the
    /// global default.
    pub logic_delete_value: Option<String>,
    /// Literal a live row carries; `None` defers to the global default.
    pub logic_not_delete_value: Option<String>,
    /// Marks the optimistic-lock version column.
    pub version: bool
}

impl Default for FieldAttrs {
    fn default() -> Self {
        Self {
            column: None,
            exist: true,
            select: true,
            strategy: None,
            fill: FieldFill::Default,
            logic_delete: false,
            logic_delete_value: None,
            logic_not_delete_value: None,
            version: false
        }
    }
}

/// One declared property of an entity, with its attribute records.
#[derive(Clone, Debug)]
pub struct FieldModel {
    /// Property name as declared on the struct.
    pub property: String,
    /// Short name of the declared value type, for diagnostics and key typing.
    pub type_name: &'static str,
    /// Whether the declared type is textual (`String`, `&str`, `Cow<str>`).
    /// Drives literal quoting and the non-empty guard.
    pub char_sequence: bool,
    /// Primary-key attribute record, when present.
    pub id: Option<IdAttrs>,
    /// Ordinary field attribute record, when present.
    pub field: Option<FieldAttrs>
}

impl FieldModel {
    /// Plain field with no attribute records.
    pub fn new(property: impl Into<String>, type_name: &'static str, char_sequence: bool) -> Self {
        Self {
            property: property.into(),
            type_name,
            char_sequence,
            id: None,
            field: None
        }
    }

    /// Attach a primary-key record.
    #[must_use]
    pub fn with_id(mut self, id: IdAttrs) -> Self {
        self.id = Some(id);
        self
    }

    /// Attach an ordinary-field record.
    #[must_use]
    pub fn with_field(mut self, field: FieldAttrs) -> Self {
        self.field = Some(field);
        self
    }
}

/// The normalized record for one entity type.
#[derive(Clone, Debug)]
pub struct EntityModel {
    /// Type handle, including the ancestor link.
    pub entity: EntityType,
    /// Entity-level attributes, when declared.
    pub table: Option<TableAttrs>,
    /// Declared properties in classification order: ancestor-declared fields
    /// first, then the entity's own fields in declaration order. Generated
    /// SQL column order follows this order exactly.
    pub fields: Vec<FieldModel>
}

impl EntityModel {
    /// Model with no entity-level attributes and no fields yet.
    pub fn new(entity: EntityType) -> Self {
        Self {
            entity,
            table: None,
            fields: Vec::new()
        }
    }

    /// Set the entity-level attribute record.
    #[must_use]
    pub fn with_table(mut self, table: TableAttrs) -> Self {
        self.table = Some(table);
        self
    }

    /// Append a field, preserving declaration order.
    #[must_use]
    pub fn with_field(mut self, field: FieldModel) -> Self {
        self.fields.push(field);
        self
    }

    /// Splice a parent model's fields in front of the ones declared so far
    /// and record the ancestor link.
    #[must_use]
    pub fn extends(mut self, parent: &EntityModel, link: fn() -> EntityType) -> Self {
        let mut fields = parent.fields.clone();
        fields.append(&mut self.fields);
        self.fields = fields;
        self.entity = self.entity.with_parent(link);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Base;
    struct Child;

    #[test]
    fn entity_type_parent_chain() {
        fn base() -> EntityType {
            EntityType::of::<Base>("Base")
        }
        let child = EntityType::of::<Child>("Child").with_parent(base);
        let parent = child.parent().unwrap();
        assert_eq!(parent.id(), TypeId::of::<Base>());
        assert!(parent.parent().is_none());
    }

    #[test]
    fn simple_types_are_not_entities() {
        assert!(is_simple_type(TypeId::of::<i64>()));
        assert!(is_simple_type(TypeId::of::<String>()));
        assert!(!is_simple_type(TypeId::of::<Base>()));
    }

    #[test]
    fn extends_orders_parent_fields_first() {
        fn base() -> EntityType {
            EntityType::of::<Base>("Base")
        }
        let parent = EntityModel::new(base()).with_field(FieldModel::new("id", "u64", false));
        let child = EntityModel::new(EntityType::of::<Child>("Child"))
            .with_field(FieldModel::new("name", "String", true))
            .extends(&parent, base);
        let order: Vec<&str> = child.fields.iter().map(|f| f.property.as_str()).collect();
        assert_eq!(order, ["id", "name"]);
        assert!(child.entity.parent().is_some());
    }

    #[test]
    fn fill_predicates() {
        assert!(FieldFill::Insert.on_insert());
        assert!(!FieldFill::Insert.on_update());
        assert!(FieldFill::InsertUpdate.on_insert());
        assert!(FieldFill::InsertUpdate.on_update());
        assert!(!FieldFill::Default.on_insert());
    }
}
