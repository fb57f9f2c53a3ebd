//! Code generation for model schemas
//!
//! This module turns parsed column metadata into the `ModelSchema`
//! implementation: the property descriptor table, the column mapping, the
//! primary key set and the column definitions.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Ident;

use crate::parsing::{ColumnField, RowInfo};

/// Class name of an object property: the last path segment of its type,
/// without generics or an `Option` wrapper
fn object_class_name(rust_type: &str) -> String {
    let inner = rust_type
        .strip_prefix("Option<")
        .and_then(|inner| inner.strip_suffix('>'))
        .unwrap_or(rust_type);
    let base = inner.split('<').next().unwrap_or(inner);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

fn uses_object_bridge(field: &ColumnField) -> bool {
    field.object || !type_mapping::supports_direct_value_conversion(&field.rust_type)
}

fn repr_tokens(field: &ColumnField) -> TokenStream {
    if uses_object_bridge(field) {
        let class = object_class_name(&field.rust_type);
        return quote! { ::rowhaus::type_mapping::PropertyRepr::Object(#class) };
    }

    let variant = format_ident!("{}", type_mapping::rust_type_to_repr(&field.rust_type));
    quote! { ::rowhaus::type_mapping::PropertyRepr::#variant }
}

/// Column definition used when the field declares none
fn default_definition(field: &ColumnField, single_primary_key: bool) -> String {
    let mut definition = type_mapping::rust_type_to_sqlite_type(&field.rust_type).to_string();
    if field.primary_key && single_primary_key {
        definition.push_str(" PRIMARY KEY");
    }
    if !type_mapping::is_optional_type(&field.rust_type) {
        definition.push_str(" NOT NULL");
    }
    definition
}

/// `PRIMARY KEY (a, b)` when more than one column forms the key; a single
/// key column carries `PRIMARY KEY` in its own definition instead
fn composite_primary_key_constraint(fields: &[ColumnField]) -> Option<String> {
    let columns: Vec<_> = fields
        .iter()
        .filter(|f| f.primary_key)
        .map(|f| f.column.as_str())
        .collect();
    (columns.len() > 1).then(|| format!("PRIMARY KEY ({})", columns.join(", ")))
}

fn property_tokens(field: &ColumnField) -> TokenStream {
    let ident = &field.ident;
    let key = &field.key;
    let repr = repr_tokens(field);

    let property = if uses_object_bridge(field) {
        quote! {
            ::rowhaus::row_adapter::Property::fallible(
                #key,
                #repr,
                |model: &Self| ::rowhaus::type_mapping::to_object_value(&model.#ident),
                |model: &mut Self, value: ::rowhaus::type_mapping::Value| {
                    model.#ident = ::rowhaus::type_mapping::from_object_value(value)?;
                    ::std::result::Result::Ok(())
                },
            )
        }
    } else {
        quote! {
            ::rowhaus::row_adapter::Property::new(
                #key,
                #repr,
                |model: &Self| ::rowhaus::type_mapping::ToValue::to_value(&model.#ident),
                |model: &mut Self, value: ::rowhaus::type_mapping::Value| {
                    model.#ident = ::rowhaus::type_mapping::FromValue::from_value(value)?;
                    ::std::result::Result::Ok(())
                },
            )
        }
    };

    match &field.transformer {
        Some(path) => quote! { #property.with_transformer(#path()) },
        None => property,
    }
}

pub fn generate_model_schema_impl(
    name: &Ident,
    row_info: &RowInfo,
    fields: &[ColumnField],
) -> TokenStream {
    let model_type = row_info
        .model_type
        .clone()
        .unwrap_or_else(|| name.to_string());

    let properties: Vec<_> = fields.iter().map(property_tokens).collect();
    let keys: Vec<_> = fields.iter().map(|f| f.key.as_str()).collect();
    let columns: Vec<_> = fields.iter().map(|f| f.column.as_str()).collect();
    let primary_keys: Vec<_> = fields
        .iter()
        .filter(|f| f.primary_key)
        .map(|f| f.key.as_str())
        .collect();

    let single_primary_key = primary_keys.len() == 1;
    let table_constraints = composite_primary_key_constraint(fields)
        .map(|constraint| {
            quote! {
                fn table_constraints() -> ::std::vec::Vec<::std::string::String> {
                    ::std::vec![::std::string::String::from(#constraint)]
                }
            }
        });
    let definitions: Vec<_> = fields
        .iter()
        .map(|f| {
            f.definition
                .clone()
                .unwrap_or_else(|| default_definition(f, single_primary_key))
        })
        .collect();

    quote! {
        impl ::rowhaus::row_adapter::ModelSchema for #name {
            fn model_type() -> ::rowhaus::row_adapter::ModelType {
                ::rowhaus::row_adapter::ModelType::new(#model_type)
            }

            fn properties() -> ::std::vec::Vec<::rowhaus::row_adapter::Property<Self>> {
                ::std::vec![#(#properties),*]
            }

            fn column_names_by_property_key(
            ) -> ::rowhaus::row_adapter::indexmap::IndexMap<&'static str, &'static str> {
                ::rowhaus::row_adapter::indexmap::IndexMap::from([#((#keys, #columns)),*])
            }

            fn primary_key_property_keys() -> ::rowhaus::row_adapter::PropertyKeys {
                ::rowhaus::row_adapter::PropertyKeys::from([#(#primary_keys),*])
            }

            fn column_definitions_by_property_key(
            ) -> ::rowhaus::row_adapter::indexmap::IndexMap<&'static str, ::std::string::String> {
                ::rowhaus::row_adapter::indexmap::IndexMap::from([
                    #((#keys, ::std::string::String::from(#definitions))),*
                ])
            }

            #table_constraints
        }
    }
}

pub fn generate_serializing_impl(name: &Ident) -> TokenStream {
    quote! {
        impl ::rowhaus::row_adapter::Serializing for #name {}
    }
}
