// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

//! `impl Entity` generation.
//!
//! Emits a single `impl ::tablemeta_core::Entity` block. Attribute values
//! are carried into the generated record verbatim; the only macro-time
//! decisions are the char-sequence heuristic and the short type name, both
//! of which need the declared Rust type and are unavailable later.

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::{FieldAttrsDef, FieldDef, FillDef, IdTypeDef, StrategyDef, TableAttrsDef, TableDef};

/// Generate the `impl Entity` block for a parsed definition.
pub fn generate(table: &TableDef) -> TokenStream {
    let ident = &table.ident;
    let name = table.name_str();

    let entity_type = match &table.extends {
        Some(parent) => quote! {
            ::tablemeta_core::EntityType::of::<Self>(#name)
                .with_parent(<#parent as ::tablemeta_core::Entity>::entity_type)
        },
        None => quote! { ::tablemeta_core::EntityType::of::<Self>(#name) }
    };

    let with_table = table.attrs.as_ref().map(table_attrs_tokens);
    let with_fields = table.fields.iter().map(field_tokens);
    let own_model = quote! {
        ::tablemeta_core::EntityModel::new(Self::entity_type())
            #with_table
            #(#with_fields)*
    };
    let model = match &table.extends {
        Some(parent) => quote! {
            #own_model.extends(
                &<#parent as ::tablemeta_core::Entity>::model(),
                <#parent as ::tablemeta_core::Entity>::entity_type
            )
        },
        None => own_model
    };

    quote! {
        #[automatically_derived]
        impl ::tablemeta_core::Entity for #ident {
            fn entity_type() -> ::tablemeta_core::EntityType {
                #entity_type
            }

            fn model() -> ::tablemeta_core::EntityModel {
                #model
            }
        }
    }
}

/// `.with_table(TableAttrs { ... })` call from the entity-level record.
fn table_attrs_tokens(attrs: &TableAttrsDef) -> TokenStream {
    let name = opt_string(&attrs.name);
    let schema = opt_string(&attrs.schema);
    let result_map = opt_string(&attrs.result_map);
    let auto_result_map = attrs.auto_result_map;
    let keep_global_prefix = attrs.keep_global_prefix;
    let exclude = attrs.exclude.iter();
    let key_sequence = opt_string(&attrs.key_sequence);

    quote! {
        .with_table(::tablemeta_core::TableAttrs {
            name: #name,
            schema: #schema,
            result_map: #result_map,
            auto_result_map: #auto_result_map,
            keep_global_prefix: #keep_global_prefix,
            exclude: ::std::vec![#(::std::string::String::from(#exclude)),*],
            key_sequence: #key_sequence
        })
    }
}

/// `.with_field(FieldModel::new(...)...)` call for one declared field.
fn field_tokens(field: &FieldDef) -> TokenStream {
    let property = field.name_str();
    let value_ty = value_type(&field.ty);
    let type_name = type_short_name(value_ty);
    let char_sequence = is_char_sequence(value_ty);

    let id = field.id.as_ref().map(|id| {
        let column = opt_string(&id.column);
        let id_type = id_type_tokens(id.id_type);
        quote! {
            .with_id(::tablemeta_core::IdAttrs {
                column: #column,
                id_type: #id_type
            })
        }
    });
    let attrs = field.field.as_ref().map(field_attrs_tokens);

    quote! {
        .with_field(
            ::tablemeta_core::FieldModel::new(#property, #type_name, #char_sequence)
                #id
                #attrs
        )
    }
}

/// `.with_field(FieldAttrs { ... })` call from the merged field record.
fn field_attrs_tokens(attrs: &FieldAttrsDef) -> TokenStream {
    let column = opt_string(&attrs.column);
    let exist = attrs.exist;
    let select = attrs.select;
    let strategy = match attrs.strategy {
        Some(value) => {
            let tokens = strategy_tokens(value);
            quote! { ::core::option::Option::Some(#tokens) }
        }
        None => quote! { ::core::option::Option::None }
    };
    let fill = fill_tokens(attrs.fill);
    let logic_delete = attrs.logic_delete;
    let logic_delete_value = opt_string(&attrs.logic_delete_value);
    let logic_not_delete_value = opt_string(&attrs.logic_not_delete_value);
    let version = attrs.version;

    quote! {
        .with_field(::tablemeta_core::FieldAttrs {
            column: #column,
            exist: #exist,
            select: #select,
            strategy: #strategy,
            fill: #fill,
            logic_delete: #logic_delete,
            logic_delete_value: #logic_delete_value,
            logic_not_delete_value: #logic_not_delete_value,
            version: #version
        })
    }
}

fn id_type_tokens(value: IdTypeDef) -> TokenStream {
    match value {
        IdTypeDef::None => quote! { ::tablemeta_core::IdType::None },
        IdTypeDef::Auto => quote! { ::tablemeta_core::IdType::Auto },
        IdTypeDef::Input => quote! { ::tablemeta_core::IdType::Input },
        IdTypeDef::Generator => quote! { ::tablemeta_core::IdType::Generator }
    }
}

fn strategy_tokens(value: StrategyDef) -> TokenStream {
    match value {
        StrategyDef::Ignored => quote! { ::tablemeta_core::FieldStrategy::Ignored },
        StrategyDef::NotNull => quote! { ::tablemeta_core::FieldStrategy::NotNull },
        StrategyDef::NotEmpty => quote! { ::tablemeta_core::FieldStrategy::NotEmpty },
        StrategyDef::Never => quote! { ::tablemeta_core::FieldStrategy::Never }
    }
}

fn fill_tokens(value: FillDef) -> TokenStream {
    match value {
        FillDef::Default => quote! { ::tablemeta_core::FieldFill::Default },
        FillDef::Insert => quote! { ::tablemeta_core::FieldFill::Insert },
        FillDef::Update => quote! { ::tablemeta_core::FieldFill::Update },
        FillDef::InsertUpdate => quote! { ::tablemeta_core::FieldFill::InsertUpdate }
    }
}

fn opt_string(value: &Option<String>) -> TokenStream {
    match value {
        Some(value) => {
            quote! { ::core::option::Option::Some(::std::string::String::from(#value)) }
        }
        None => quote! { ::core::option::Option::None }
    }
}

/// Unwrap `Option<T>` down to the value type.
///
/// Same last-segment heuristic the rest of the ecosystem uses; a custom
/// type named `Option` would be misread.
fn value_type(ty: &syn::Type) -> &syn::Type {
    if let syn::Type::Path(path) = ty
        && let Some(segment) = path.path.segments.last()
        && segment.ident == "Option"
        && let syn::PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(syn::GenericArgument::Type(inner)) = args.args.first()
    {
        return inner;
    }
    ty
}

/// Short name of the declared type, e.g. `u64`, `String`, `Cow`.
fn type_short_name(ty: &syn::Type) -> String {
    match ty {
        syn::Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .unwrap_or_default(),
        syn::Type::Reference(reference) => type_short_name(&reference.elem),
        other => quote!(#other).to_string()
    }
}

/// Whether the value type is textual and should get the non-empty guard and
/// quoted logic-delete literals.
fn is_char_sequence(ty: &syn::Type) -> bool {
    matches!(type_short_name(ty).as_str(), "String" | "str" | "Cow")
}

#[cfg(test)]
mod tests {
    use syn::{DeriveInput, parse_quote};

    use super::*;
    use crate::table::parse::TableDef;

    fn expand(input: DeriveInput) -> String {
        let def = TableDef::from_derive_input(&input).unwrap();
        generate(&def).to_string()
    }

    #[test]
    fn generates_entity_impl() {
        let output = expand(parse_quote! {
            pub struct User {
                pub id: u64,
                pub user_name: String,
            }
        });
        assert!(output.contains("impl :: tablemeta_core :: Entity for User"));
        assert!(output.contains("EntityType :: of :: < Self > (\"User\")"));
        assert!(output.contains("\"user_name\""));
        assert!(!output.contains("with_table"));
    }

    #[test]
    fn generates_table_attrs() {
        let output = expand(parse_quote! {
            #[table(name = "t_user", auto_result_map, exclude = "secret")]
            pub struct User {
                pub id: u64,
            }
        });
        assert!(output.contains("with_table"));
        assert!(output.contains("\"t_user\""));
        assert!(output.contains("auto_result_map : true"));
        assert!(output.contains("\"secret\""));
    }

    #[test]
    fn generates_id_record() {
        let output = expand(parse_quote! {
            pub struct User {
                #[table_id(column = "uid", id_type = "auto")]
                pub id: u64,
            }
        });
        assert!(output.contains("with_id"));
        assert!(output.contains("\"uid\""));
        assert!(output.contains("IdType :: Auto"));
    }

    #[test]
    fn generates_field_record() {
        let output = expand(parse_quote! {
            pub struct User {
                #[table_field(strategy = "not_empty", fill = "insert")]
                pub name: String,
                #[logic_delete]
                pub deleted: bool,
            }
        });
        assert!(output.contains("FieldStrategy :: NotEmpty"));
        assert!(output.contains("FieldFill :: Insert"));
        assert!(output.contains("logic_delete : true"));
    }

    #[test]
    fn generates_extends_splice() {
        let output = expand(parse_quote! {
            #[table(extends = "BaseEntity")]
            pub struct AdminUser {
                pub role: String,
            }
        });
        assert!(output.contains("with_parent"));
        assert!(output.contains("extends"));
        assert!(output.contains("< BaseEntity as :: tablemeta_core :: Entity >"));
    }

    #[test]
    fn option_unwraps_to_value_type() {
        let output = expand(parse_quote! {
            pub struct User {
                pub nick: Option<String>,
            }
        });
        assert!(output.contains("(\"nick\" , \"String\" , true)"));
    }

    #[test]
    fn char_sequence_heuristic() {
        let string: syn::Type = parse_quote!(String);
        let cow: syn::Type = parse_quote!(Cow<'static, str>);
        let str_ref: syn::Type = parse_quote!(&'static str);
        let number: syn::Type = parse_quote!(u64);
        assert!(is_char_sequence(&string));
        assert!(is_char_sequence(&cow));
        assert!(is_char_sequence(&str_ref));
        assert!(!is_char_sequence(&number));
    }
}
