//! Schema descriptor resolution
//!
//! [`SchemaDescriptor::resolve`] queries a model type's declared capabilities
//! once and checks them for configuration errors. [`ResolvedModel`] pairs a
//! descriptor with the transformer resolved for each mapped property.

use crate::errors::SchemaError;
use crate::model::{ModelType, Property, PropertyKeys, Serializing};
use crate::transformer::{resolve_transformer, Transformer, TransformerRegistry};
use crate::RowMapping;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

/// Selects the concrete class a row decodes into
pub type ClassSelector = fn(&RowMapping) -> Option<ModelType>;

/// Resolved mapping configuration of one model type
pub struct SchemaDescriptor<M> {
    model_type: ModelType,
    column_names_by_property_key: IndexMap<&'static str, &'static str>,
    primary_key_property_keys: PropertyKeys,
    column_definitions_by_property_key: IndexMap<&'static str, String>,
    table_constraints: Vec<String>,
    class_selector: ClassSelector,
    property_transformer_overrides: HashMap<&'static str, Transformer>,
    properties: IndexMap<&'static str, Property<M>>,
}

impl<M: Serializing> SchemaDescriptor<M> {
    /// Resolve the descriptor of `M`. Pure: resolving twice yields equal descriptors.
    pub fn resolve() -> Result<Self, SchemaError> {
        let model_type = M::model_type();

        let column_names_by_property_key = M::column_names_by_property_key();
        if column_names_by_property_key.is_empty() {
            return Err(SchemaError::MissingColumnMapping { model: model_type });
        }

        let mut properties = IndexMap::new();
        for property in M::properties() {
            let key = property.key();
            if properties.insert(key, property).is_some() {
                return Err(SchemaError::DuplicateProperty {
                    model: model_type,
                    key,
                });
            }
        }

        let mut keys_by_column: HashMap<&'static str, &'static str> = HashMap::new();
        for (&key, &column) in &column_names_by_property_key {
            if !properties.contains_key(key) {
                return Err(SchemaError::UnknownProperty {
                    model: model_type,
                    key,
                });
            }
            if let Some(first) = keys_by_column.insert(column, key) {
                return Err(SchemaError::DuplicateColumn {
                    model: model_type,
                    column,
                    first,
                    second: key,
                });
            }
        }

        let primary_key_property_keys = M::primary_key_property_keys();
        if let Some(&key) = primary_key_property_keys
            .iter()
            .find(|key| !column_names_by_property_key.contains_key(*key))
        {
            return Err(SchemaError::UnknownPrimaryKey {
                model: model_type,
                key,
            });
        }

        let column_definitions_by_property_key = M::column_definitions_by_property_key();
        if let Some(&key) = column_definitions_by_property_key
            .keys()
            .find(|key| !column_names_by_property_key.contains_key(*key))
        {
            return Err(SchemaError::UnmappedDefinition {
                model: model_type,
                key,
            });
        }

        let property_transformer_overrides = column_names_by_property_key
            .keys()
            .filter_map(|&key| M::column_transformer_for_key(key).map(|t| (key, t)))
            .collect();

        debug_log!(
            "resolved schema for {}: {} columns, {} primary keys",
            model_type,
            column_names_by_property_key.len(),
            primary_key_property_keys.len()
        );

        Ok(Self {
            model_type,
            column_names_by_property_key,
            primary_key_property_keys,
            column_definitions_by_property_key,
            table_constraints: M::table_constraints(),
            class_selector: M::class_for_row,
            property_transformer_overrides,
            properties,
        })
    }
}

impl<M> SchemaDescriptor<M> {
    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    pub fn column_names_by_property_key(&self) -> &IndexMap<&'static str, &'static str> {
        &self.column_names_by_property_key
    }

    pub fn column_name(&self, key: &str) -> Option<&'static str> {
        self.column_names_by_property_key.get(key).copied()
    }

    pub fn property_keys(&self) -> PropertyKeys {
        self.column_names_by_property_key.keys().copied().collect()
    }

    pub fn primary_key_property_keys(&self) -> &PropertyKeys {
        &self.primary_key_property_keys
    }

    /// Primary key columns, in column mapping order
    pub fn primary_key_columns(&self) -> Vec<&'static str> {
        self.column_names_by_property_key
            .iter()
            .filter(|(key, _)| self.primary_key_property_keys.contains(*key))
            .map(|(_, column)| *column)
            .collect()
    }

    pub fn column_definitions_by_property_key(&self) -> &IndexMap<&'static str, String> {
        &self.column_definitions_by_property_key
    }

    /// Column definitions keyed by column name, in declaration order
    pub fn column_definitions(&self) -> Vec<(&'static str, &str)> {
        self.column_definitions_by_property_key
            .iter()
            .filter_map(|(key, definition)| {
                self.column_name(key)
                    .map(|column| (column, definition.as_str()))
            })
            .collect()
    }

    pub fn table_constraints(&self) -> &[String] {
        &self.table_constraints
    }

    pub fn select_class(&self, row: &RowMapping) -> Option<ModelType> {
        (self.class_selector)(row)
    }

    pub fn property_transformer_overrides(&self) -> &HashMap<&'static str, Transformer> {
        &self.property_transformer_overrides
    }

    pub fn property(&self, key: &str) -> Option<&Property<M>> {
        self.properties.get(key)
    }
}

impl<M> PartialEq for SchemaDescriptor<M> {
    /// Structural equality: everything but the function slots
    fn eq(&self, other: &Self) -> bool {
        let override_keys = |d: &Self| {
            let mut keys: Vec<_> = d.property_transformer_overrides.keys().copied().collect();
            keys.sort_unstable();
            keys
        };
        let property_shapes = |d: &Self| {
            d.properties
                .values()
                .map(|p| (p.key(), p.repr()))
                .collect::<Vec<_>>()
        };

        self.model_type == other.model_type
            && self.column_names_by_property_key == other.column_names_by_property_key
            && self.primary_key_property_keys == other.primary_key_property_keys
            && self.column_definitions_by_property_key == other.column_definitions_by_property_key
            && self.table_constraints == other.table_constraints
            && override_keys(self) == override_keys(other)
            && property_shapes(self) == property_shapes(other)
    }
}

impl<M> fmt::Debug for SchemaDescriptor<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDescriptor")
            .field("model_type", &self.model_type)
            .field("columns", &self.column_names_by_property_key)
            .field("primary_keys", &self.primary_key_property_keys)
            .field("definitions", &self.column_definitions_by_property_key)
            .field("constraints", &self.table_constraints)
            .field(
                "overrides",
                &self.property_transformer_overrides.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// A descriptor together with the transformer of every mapped property
pub(crate) struct ResolvedModel<M> {
    pub(crate) descriptor: SchemaDescriptor<M>,
    transformers: HashMap<&'static str, Transformer>,
}

impl<M: Serializing> ResolvedModel<M> {
    pub(crate) fn resolve(registry: &TransformerRegistry) -> Result<Self, SchemaError> {
        let descriptor = SchemaDescriptor::<M>::resolve()?;

        let mut transformers = HashMap::new();
        for &key in descriptor.column_names_by_property_key.keys() {
            if let Some(property) = descriptor.property(key) {
                let resolved = resolve_transformer(
                    property,
                    &descriptor.property_transformer_overrides,
                    registry,
                );
                trace_log!(
                    "{}.{} uses transformer {} ({:?})",
                    descriptor.model_type,
                    key,
                    resolved.transformer.name(),
                    resolved.source
                );
                transformers.insert(key, resolved.transformer);
            }
        }

        Ok(Self {
            descriptor,
            transformers,
        })
    }
}

impl<M> ResolvedModel<M> {
    /// Mapped properties in column mapping order, with column and transformer
    pub(crate) fn mapped(
        &self,
    ) -> impl Iterator<Item = (&Property<M>, &'static str, &Transformer)> + '_ {
        self.descriptor
            .column_names_by_property_key
            .iter()
            .filter_map(move |(key, column)| {
                let property = self.descriptor.properties.get(key)?;
                let transformer = self.transformers.get(key)?;
                Some((property, *column, transformer))
            })
    }
}
