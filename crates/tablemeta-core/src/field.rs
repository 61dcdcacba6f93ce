// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

//! Per-field descriptor and its SQL fragment synthesis.
//!
//! A [`FieldInfo`] is built once during classification and is immutable
//! afterwards. Every fragment method takes the variable-binding `prefix` used
//! for nested and batch parameter scoping (e.g. `et.`), so the same
//! descriptor serves plain and wrapped statements alike.

use crate::{
    config::DbConfig,
    model::{FieldFill, FieldModel, FieldStrategy},
    naming::{check_related, to_column_name},
    script::{COMMA, EQUALS, convert_if, not_empty_test, not_null_test, safe_param}
};

/// Immutable descriptor for one included, non-key field.
#[derive(Clone, Debug)]
pub struct FieldInfo {
    property: String,
    column: String,
    type_name: &'static str,
    char_sequence: bool,
    related: bool,
    select: bool,
    strategy: FieldStrategy,
    fill: FieldFill,
    logic_delete: bool,
    logic_delete_value: String,
    logic_not_delete_value: String,
    version: bool
}

impl FieldInfo {
    /// Build a descriptor from a normalized field record.
    ///
    /// Column name precedence: explicit attribute value, then the naming
    /// resolver under the active conventions. The logical-delete literals
    /// fall back to the global defaults.
    pub fn new(db: &DbConfig, under_camel: bool, model: &FieldModel) -> Self {
        let attrs = model.field.clone().unwrap_or_default();
        let column = match &attrs.column {
            Some(value) if !value.trim().is_empty() => value.clone(),
            _ => to_column_name(&model.property, under_camel, db.capital_mode)
        };
        let related = check_related(under_camel, &model.property, &column);
        let (delete_value, not_delete_value) = if attrs.logic_delete {
            (
                attrs.logic_delete_value.clone().unwrap_or_else(|| db.logic_delete_value.clone()),
                attrs
                    .logic_not_delete_value
                    .clone()
                    .unwrap_or_else(|| db.logic_not_delete_value.clone())
            )
        } else {
            (String::new(), String::new())
        };

        Self {
            property: model.property.clone(),
            column,
            type_name: model.type_name,
            char_sequence: model.char_sequence,
            related,
            select: attrs.select,
            strategy: attrs.strategy.unwrap_or(db.field_strategy),
            fill: attrs.fill,
            logic_delete: attrs.logic_delete,
            logic_delete_value: delete_value,
            logic_not_delete_value: not_delete_value,
            version: attrs.version
        }
    }

    /// Property name as declared on the entity.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Resolved column name.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Short name of the declared value type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the declared type is textual.
    pub fn is_char_sequence(&self) -> bool {
        self.char_sequence
    }

    /// Whether generated SELECT text must alias the column.
    pub fn is_related(&self) -> bool {
        self.related
    }

    /// Include in generated SELECT lists.
    pub fn is_select(&self) -> bool {
        self.select
    }

    /// Conditional-SQL strategy in effect (attribute or global default).
    pub fn strategy(&self) -> FieldStrategy {
        self.strategy
    }

    /// Automatic fill policy.
    pub fn fill(&self) -> FieldFill {
        self.fill
    }

    /// Whether this field is the logical-delete flag column.
    pub fn is_logic_delete(&self) -> bool {
        self.logic_delete
    }

    /// Literal written when marking a row deleted.
    pub fn logic_delete_value(&self) -> &str {
        &self.logic_delete_value
    }

    /// Literal a live row carries.
    pub fn logic_not_delete_value(&self) -> &str {
        &self.logic_not_delete_value
    }

    /// Whether this field is the optimistic-lock version column.
    pub fn is_version(&self) -> bool {
        self.version
    }

    /// Fill runs before INSERT.
    pub fn with_insert_fill(&self) -> bool {
        self.fill.on_insert()
    }

    /// Fill runs before UPDATE.
    pub fn with_update_fill(&self) -> bool {
        self.fill.on_update()
    }

    /// SELECT list fragment: `column`, or `column AS property` when an alias
    /// is required. Selectability is filtered by the table aggregate.
    pub fn sql_select(&self) -> String {
        if self.related {
            format!("{} AS {}", self.column, self.property)
        } else {
            self.column.clone()
        }
    }

    /// INSERT value fragment, guarded per strategy: `#{prefix+property},`,
    /// possibly wrapped in an `<if>` guard. Fill-on-insert fields are
    /// emitted unguarded so the filler always runs. `None` when the field
    /// never participates in INSERT text.
    pub fn insert_sql_property_maybe_if(&self, prefix: &str) -> Option<String> {
        if self.strategy == FieldStrategy::Never {
            return None;
        }
        let script = format!("{}{COMMA}", safe_param(&self.bound(prefix)));
        if self.fill.on_insert() {
            return Some(script);
        }
        Some(self.wrap_if(script, prefix))
    }

    /// INSERT column fragment: `column,` under the same guard as the value
    /// fragment, keeping the two lists aligned.
    pub fn insert_sql_column_maybe_if(&self, prefix: &str) -> Option<String> {
        if self.strategy == FieldStrategy::Never {
            return None;
        }
        let script = format!("{}{COMMA}", self.column);
        if self.fill.on_insert() {
            return Some(script);
        }
        Some(self.wrap_if(script, prefix))
    }

    /// WHERE fragment: `" AND column = #{prefix+property}"` under the null
    /// guard. The leading `AND` is stripped by the external `<where>`
    /// trimmer when the fragment ends up first. `None` when the field is not
    /// eligible for generated WHERE text.
    pub fn sql_where(&self, prefix: &str) -> Option<String> {
        if self.strategy == FieldStrategy::Never {
            return None;
        }
        let script = format!(" AND {}{EQUALS}{}", self.column, safe_param(&self.bound(prefix)));
        Some(self.wrap_if(script, prefix))
    }

    /// SET fragment: `column = #{prefix+property},` under the null guard.
    /// Fill-on-update fields are emitted unguarded so the filler always
    /// runs. `None` when the field never participates in UPDATE text.
    pub fn sql_set(&self, prefix: &str) -> Option<String> {
        if self.strategy == FieldStrategy::Never {
            return None;
        }
        let script = format!("{}{EQUALS}{}{COMMA}", self.column, safe_param(&self.bound(prefix)));
        if self.fill.on_update() {
            return Some(script);
        }
        Some(self.wrap_if(script, prefix))
    }

    /// Bound parameter name for this field under `prefix`.
    fn bound(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.property)
    }

    /// Apply the strategy's guard to a fragment.
    fn wrap_if(&self, script: String, prefix: &str) -> String {
        let param = self.bound(prefix);
        match self.strategy {
            FieldStrategy::Ignored => script,
            FieldStrategy::NotEmpty if self.char_sequence => {
                convert_if(&script, &not_empty_test(&param), false)
            }
            _ => convert_if(&script, &not_null_test(&param), false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldAttrs;

    fn field(model: FieldModel) -> FieldInfo {
        FieldInfo::new(&DbConfig::default(), true, &model)
    }

    #[test]
    fn column_from_convention() {
        let info = field(FieldModel::new("userName", "String", true));
        assert_eq!(info.column(), "user_name");
        assert!(!info.is_related());
        assert_eq!(info.sql_select(), "user_name");
    }

    #[test]
    fn column_from_attribute_requires_alias() {
        let attrs = FieldAttrs {
            column: Some("nick".to_string()),
            ..FieldAttrs::default()
        };
        let info = field(FieldModel::new("userName", "String", true).with_field(attrs));
        assert!(info.is_related());
        assert_eq!(info.sql_select(), "nick AS userName");
    }

    #[test]
    fn insert_property_guarded_not_null() {
        let info = field(FieldModel::new("age", "i32", false));
        assert_eq!(
            info.insert_sql_property_maybe_if("").as_deref(),
            Some("<if test=\"age != null\">#{age},</if>")
        );
    }

    #[test]
    fn insert_property_not_empty_for_text() {
        let attrs = FieldAttrs {
            strategy: Some(FieldStrategy::NotEmpty),
            ..FieldAttrs::default()
        };
        let info = field(FieldModel::new("name", "String", true).with_field(attrs));
        assert_eq!(
            info.insert_sql_property_maybe_if("et.").as_deref(),
            Some("<if test=\"et.name != null and et.name != ''\">#{et.name},</if>")
        );
    }

    #[test]
    fn insert_unguarded_when_ignored_or_filled() {
        let ignored = FieldAttrs {
            strategy: Some(FieldStrategy::Ignored),
            ..FieldAttrs::default()
        };
        let info = field(FieldModel::new("name", "String", true).with_field(ignored));
        assert_eq!(info.insert_sql_property_maybe_if("").as_deref(), Some("#{name},"));

        let filled = FieldAttrs {
            fill: FieldFill::Insert,
            ..FieldAttrs::default()
        };
        let info = field(FieldModel::new("createdAt", "i64", false).with_field(filled));
        assert_eq!(info.insert_sql_property_maybe_if("").as_deref(), Some("#{createdAt},"));
        assert_eq!(
            info.insert_sql_column_maybe_if("").as_deref(),
            Some("created_at,")
        );
    }

    #[test]
    fn never_strategy_excluded_everywhere() {
        let attrs = FieldAttrs {
            strategy: Some(FieldStrategy::Never),
            ..FieldAttrs::default()
        };
        let info = field(FieldModel::new("secret", "String", true).with_field(attrs));
        assert!(info.insert_sql_property_maybe_if("").is_none());
        assert!(info.insert_sql_column_maybe_if("").is_none());
        assert!(info.sql_where("").is_none());
        assert!(info.sql_set("").is_none());
    }

    #[test]
    fn where_and_set_fragments() {
        let info = field(FieldModel::new("userName", "String", true));
        assert_eq!(
            info.sql_where("et.").as_deref(),
            Some("<if test=\"et.userName != null\"> AND user_name = #{et.userName}</if>")
        );
        assert_eq!(
            info.sql_set("").as_deref(),
            Some("<if test=\"userName != null\">user_name = #{userName},</if>")
        );
    }

    #[test]
    fn set_unguarded_on_update_fill() {
        let attrs = FieldAttrs {
            fill: FieldFill::InsertUpdate,
            ..FieldAttrs::default()
        };
        let info = field(FieldModel::new("updatedAt", "i64", false).with_field(attrs));
        assert_eq!(info.sql_set("").as_deref(), Some("updated_at = #{updatedAt},"));
    }

    #[test]
    fn logic_delete_values_fall_back_to_global() {
        let attrs = FieldAttrs {
            logic_delete: true,
            ..FieldAttrs::default()
        };
        let info = field(FieldModel::new("deleted", "bool", false).with_field(attrs));
        assert!(info.is_logic_delete());
        assert_eq!(info.logic_delete_value(), "1");
        assert_eq!(info.logic_not_delete_value(), "0");
    }
}
