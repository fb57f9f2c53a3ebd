//! Adapter facade
//!
//! An [`Adapter`] binds one model type to its resolved schema. The schema,
//! the per-property transformers and the registered classes are resolved on
//! first use and cached for the adapter's lifetime.

use crate::decoder::RowDecoder;
use crate::encoder::{self, EncodedModel};
use crate::errors::{AdapterError, BuildError, DecodeError, SchemaError};
use crate::model::{ModelType, Serializing};
use crate::schema::{ResolvedModel, SchemaDescriptor};
use crate::statement::{Intent, StatementBuilder};
use crate::transformer::TransformerRegistry;
use crate::RowMapping;
use config::StatementConfig;
use indexmap::IndexMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

enum ClassEntry<M> {
    Base,
    Variant(Arc<dyn RowDecoder<M>>),
}

struct AdapterState<M> {
    model: ResolvedModel<M>,
    classes: IndexMap<ModelType, ClassEntry<M>>,
}

impl<M: Serializing> AdapterState<M> {
    fn resolve(registry: &TransformerRegistry) -> Result<Self, SchemaError> {
        let model = ResolvedModel::<M>::resolve(registry)?;

        let mut classes = IndexMap::new();
        for class in M::classes() {
            let entry = match class.prepare() {
                Some(prepare) => ClassEntry::Variant(prepare(registry)?),
                None => ClassEntry::Base,
            };
            classes.insert(class.model_type(), entry);
        }
        // The bound type always decodes as itself
        classes
            .entry(model.descriptor.model_type())
            .or_insert(ClassEntry::Base);

        debug_log!(
            "adapter for {} ready with {} classes",
            model.descriptor.model_type(),
            classes.len()
        );

        Ok(Self { model, classes })
    }
}

/// Encodes, decodes and renders statements for model type `M`
pub struct Adapter<M> {
    registry: TransformerRegistry,
    builder: StatementBuilder,
    state: OnceLock<Result<AdapterState<M>, SchemaError>>,
}

impl<M: Serializing> Default for Adapter<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Serializing> Adapter<M> {
    /// Adapter with the default transformer registry and statement builder
    pub fn new() -> Self {
        Self::with_parts(TransformerRegistry::default(), StatementBuilder::default())
    }

    pub fn with_registry(registry: TransformerRegistry) -> Self {
        Self::with_parts(registry, StatementBuilder::default())
    }

    pub fn with_parts(registry: TransformerRegistry, builder: StatementBuilder) -> Self {
        Self {
            registry,
            builder,
            state: OnceLock::new(),
        }
    }

    pub fn from_config(config: &StatementConfig) -> Self {
        Self::with_parts(
            TransformerRegistry::default(),
            StatementBuilder::from_config(config),
        )
    }

    pub fn registry(&self) -> &TransformerRegistry {
        &self.registry
    }

    pub fn builder(&self) -> &StatementBuilder {
        &self.builder
    }

    fn state(&self) -> Result<&AdapterState<M>, SchemaError> {
        self.state
            .get_or_init(|| AdapterState::resolve(&self.registry))
            .as_ref()
            .map_err(|e| e.clone())
    }

    /// Resolved schema of `M`
    pub fn descriptor(&self) -> Result<&SchemaDescriptor<M>, AdapterError> {
        Ok(&self.state()?.model.descriptor)
    }

    /// Encode `model` for `intent` against `table`
    pub fn encode(&self, model: &M, intent: Intent, table: &str) -> Result<EncodedModel, AdapterError> {
        let state = self.state()?;
        Ok(encoder::encode(&state.model, &self.builder, model, intent, table)?)
    }

    pub fn encode_insert(&self, model: &M, table: &str) -> Result<EncodedModel, AdapterError> {
        self.encode(model, Intent::Insert, table)
    }

    pub fn encode_update(&self, model: &M, table: &str) -> Result<EncodedModel, AdapterError> {
        self.encode(model, Intent::Update, table)
    }

    pub fn encode_delete(&self, model: &M, table: &str) -> Result<EncodedModel, AdapterError> {
        self.encode(model, Intent::Delete, table)
    }

    /// Decode one row, selecting the concrete class from the row first
    pub fn decode(&self, row: &RowMapping) -> Result<M, AdapterError> {
        let state = self.state()?;
        let model_type = state.model.descriptor.model_type();

        let selected = state
            .model
            .descriptor
            .select_class(row)
            .ok_or(DecodeError::NoClassFound { model: model_type })?;

        let decoded = match state.classes.get(&selected) {
            Some(ClassEntry::Base) => state.model.decode_row(row),
            Some(ClassEntry::Variant(decoder)) => decoder.decode_row(row),
            None => Err(DecodeError::UnregisteredClass {
                model: model_type,
                selected,
            }),
        };
        Ok(decoded?)
    }

    /// Decode every row, stopping at the first failure
    pub fn decode_all(&self, rows: &[RowMapping]) -> Result<Vec<M>, AdapterError> {
        rows.iter().map(|row| self.decode(row)).collect()
    }

    /// `<column> <definition>, ...` clause of the model's declared
    /// definitions, followed by its table constraints
    pub fn column_definitions(&self) -> Result<String, AdapterError> {
        let descriptor = self.descriptor()?;
        let definitions = descriptor.column_definitions();
        if definitions.is_empty() {
            return Err(BuildError::NoDefinitions.into());
        }

        let mut clause = self.builder.column_definitions(definitions)?;
        for constraint in descriptor.table_constraints() {
            clause.push_str(", ");
            clause.push_str(constraint);
        }
        Ok(clause)
    }
}

impl<M> fmt::Debug for Adapter<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("model", &std::any::type_name::<M>())
            .field("builder", &self.builder)
            .field("resolved", &self.state.get().is_some())
            .finish()
    }
}

/// One-shot encode with a freshly resolved default adapter
pub fn encode_model<M: Serializing>(
    model: &M,
    intent: Intent,
    table: &str,
) -> Result<EncodedModel, AdapterError> {
    Adapter::<M>::new().encode(model, intent, table)
}

/// One-shot decode with a freshly resolved default adapter
pub fn decode_model<M: Serializing>(row: &RowMapping) -> Result<M, AdapterError> {
    Adapter::<M>::new().decode(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::model::{ModelClass, ModelSchema, Property, PropertyKeys};
    use crate::transformer::Transformer;
    use type_mapping::{FromValue, PropertyRepr, ToValue, Value};

    #[derive(Debug, Default, Clone, PartialEq)]
    struct User {
        id: i64,
        name: String,
    }

    impl ModelSchema for User {
        fn model_type() -> ModelType {
            ModelType::new("User")
        }

        fn properties() -> Vec<Property<Self>> {
            vec![
                Property::new(
                    "id",
                    PropertyRepr::Integer,
                    |u: &User| u.id.to_value(),
                    |u: &mut User, v| {
                        u.id = FromValue::from_value(v)?;
                        Ok(())
                    },
                ),
                Property::new(
                    "name",
                    PropertyRepr::Text,
                    |u: &User| u.name.to_value(),
                    |u: &mut User, v| {
                        u.name = FromValue::from_value(v)?;
                        Ok(())
                    },
                ),
            ]
        }

        fn column_names_by_property_key() -> IndexMap<&'static str, &'static str> {
            IndexMap::from([("id", "id"), ("name", "full_name")])
        }

        fn primary_key_property_keys() -> PropertyKeys {
            PropertyKeys::from(["id"])
        }

        fn column_definitions_by_property_key() -> IndexMap<&'static str, String> {
            IndexMap::from([
                ("id", "INTEGER PRIMARY KEY".to_string()),
                ("name", "TEXT NOT NULL".to_string()),
            ])
        }
    }

    impl Serializing for User {
        fn validate(&self) -> Result<(), String> {
            if self.name == "invalid" {
                return Err("name is reserved".to_string());
            }
            Ok(())
        }
    }

    // Polymorphic family: rows carry a `kind` column selecting the class
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Circle {
        id: i64,
        radius: f64,
    }

    impl ModelSchema for Circle {
        fn model_type() -> ModelType {
            ModelType::new("Circle")
        }

        fn properties() -> Vec<Property<Self>> {
            vec![
                Property::new(
                    "id",
                    PropertyRepr::Integer,
                    |c: &Circle| c.id.to_value(),
                    |c: &mut Circle, v| {
                        c.id = FromValue::from_value(v)?;
                        Ok(())
                    },
                ),
                Property::new(
                    "radius",
                    PropertyRepr::Real,
                    |c: &Circle| c.radius.to_value(),
                    |c: &mut Circle, v| {
                        c.radius = FromValue::from_value(v)?;
                        Ok(())
                    },
                ),
            ]
        }

        fn column_names_by_property_key() -> IndexMap<&'static str, &'static str> {
            IndexMap::from([("id", "id"), ("radius", "size")])
        }
    }

    impl Serializing for Circle {}

    #[derive(Debug, Clone, PartialEq)]
    enum Shape {
        Plain { id: i64, kind: String },
        Circle(Circle),
    }

    impl Default for Shape {
        fn default() -> Self {
            Shape::Plain {
                id: 0,
                kind: String::new(),
            }
        }
    }

    impl ModelSchema for Shape {
        fn model_type() -> ModelType {
            ModelType::new("Shape")
        }

        fn properties() -> Vec<Property<Self>> {
            vec![
                Property::new(
                    "id",
                    PropertyRepr::Integer,
                    |s: &Shape| match s {
                        Shape::Plain { id, .. } => id.to_value(),
                        Shape::Circle(c) => c.id.to_value(),
                    },
                    |s: &mut Shape, v| {
                        if let Shape::Plain { id, .. } = s {
                            *id = FromValue::from_value(v)?;
                        }
                        Ok(())
                    },
                ),
                Property::new(
                    "kind",
                    PropertyRepr::Text,
                    |s: &Shape| match s {
                        Shape::Plain { kind, .. } => kind.to_value(),
                        Shape::Circle(_) => Value::Text("circle".to_string()),
                    },
                    |s: &mut Shape, v| {
                        if let Shape::Plain { kind, .. } = s {
                            *kind = FromValue::from_value(v)?;
                        }
                        Ok(())
                    },
                ),
            ]
        }

        fn column_names_by_property_key() -> IndexMap<&'static str, &'static str> {
            IndexMap::from([("id", "id"), ("kind", "kind")])
        }

        fn primary_key_property_keys() -> PropertyKeys {
            PropertyKeys::from(["id"])
        }
    }

    impl Serializing for Shape {
        fn classes() -> Vec<ModelClass<Self>> {
            vec![ModelClass::base(), ModelClass::variant(Shape::Circle)]
        }

        fn class_for_row(row: &RowMapping) -> Option<ModelType> {
            match row.get("kind") {
                Some(Value::Text(kind)) if kind == "circle" => Some(Circle::model_type()),
                Some(Value::Text(kind)) if kind == "square" => Some(ModelType::new("Square")),
                Some(Value::Text(_)) => Some(Self::model_type()),
                _ => None,
            }
        }
    }

    fn row(pairs: &[(&str, Value)]) -> RowMapping {
        pairs
            .iter()
            .map(|(column, value)| (column.to_string(), value.clone()))
            .collect()
    }

    fn ada() -> User {
        User {
            id: 7,
            name: "Ada".to_string(),
        }
    }

    #[test]
    fn test_update_scenario() {
        let encoded = Adapter::<User>::new().encode_update(&ada(), "t").unwrap();

        assert_eq!(
            encoded.parameters,
            row(&[("full_name", Value::Text("Ada".to_string()))])
        );
        assert_eq!(encoded.statement.sql, "UPDATE t SET full_name=? WHERE id=?");
        assert_eq!(
            encoded.statement.bindings,
            vec![Value::Text("Ada".to_string()), Value::Integer(7)]
        );
    }

    #[test]
    fn test_delete_scenario() {
        let encoded = Adapter::<User>::new().encode_delete(&ada(), "t").unwrap();

        assert_eq!(encoded.parameters, row(&[("id", Value::Integer(7))]));
        assert_eq!(encoded.statement.sql, "DELETE FROM t WHERE id=?");
        assert_eq!(encoded.statement.bindings, vec![Value::Integer(7)]);
    }

    #[test]
    fn test_decode_scenarios() {
        let adapter = Adapter::<User>::new();

        let full = adapter
            .decode(&row(&[
                ("id", Value::Integer(7)),
                ("full_name", Value::Text("Ada".to_string())),
            ]))
            .unwrap();
        assert_eq!(full, ada());

        let partial = adapter.decode(&row(&[("id", Value::Integer(7))])).unwrap();
        assert_eq!(
            partial,
            User {
                id: 7,
                name: String::new(),
            }
        );
    }

    #[test]
    fn test_round_trip_through_insert_parameters() {
        let adapter = Adapter::<User>::new();
        let encoded = adapter.encode_insert(&ada(), "t").unwrap();
        assert_eq!(adapter.decode(&encoded.parameters).unwrap(), ada());
    }

    #[test]
    fn test_validation_gating() {
        let adapter = Adapter::<User>::new();
        let err = adapter
            .decode(&row(&[
                ("id", Value::Integer(1)),
                ("full_name", Value::Text("invalid".to_string())),
            ]))
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(err.validation_reason(), Some("name is reserved"));
    }

    #[test]
    fn test_column_definitions() {
        let adapter = Adapter::<User>::new();
        assert_eq!(
            adapter.column_definitions().unwrap(),
            "id INTEGER PRIMARY KEY, full_name TEXT NOT NULL"
        );

        let err = Adapter::<Circle>::new().column_definitions().unwrap_err();
        assert_eq!(err.code(), ErrorCode::NoDefinitions);
    }

    #[test]
    fn test_polymorphic_decode() {
        let adapter = Adapter::<Shape>::new();

        let circle = adapter
            .decode(&row(&[
                ("id", Value::Integer(2)),
                ("kind", Value::Text("circle".to_string())),
                ("size", Value::Real(1.5)),
            ]))
            .unwrap();
        assert_eq!(circle, Shape::Circle(Circle { id: 2, radius: 1.5 }));

        let plain = adapter
            .decode(&row(&[
                ("id", Value::Integer(3)),
                ("kind", Value::Text("blob".to_string())),
            ]))
            .unwrap();
        assert_eq!(
            plain,
            Shape::Plain {
                id: 3,
                kind: "blob".to_string()
            }
        );
    }

    #[test]
    fn test_no_class_found_is_deterministic() {
        let adapter = Adapter::<Shape>::new();
        let untagged = row(&[("id", Value::Integer(3))]);

        for _ in 0..3 {
            let err = adapter.decode(&untagged).unwrap_err();
            assert_eq!(
                err,
                AdapterError::Decode(DecodeError::NoClassFound {
                    model: ModelType::new("Shape")
                })
            );
            assert_eq!(err.code(), ErrorCode::NoClassFound);
        }
    }

    #[test]
    fn test_unregistered_class() {
        let err = Adapter::<Shape>::new()
            .decode(&row(&[("kind", Value::Text("square".to_string()))]))
            .unwrap_err();
        assert_eq!(
            err,
            AdapterError::Decode(DecodeError::UnregisteredClass {
                model: ModelType::new("Shape"),
                selected: ModelType::new("Square"),
            })
        );
    }

    #[test]
    fn test_no_primary_key_failure() {
        let adapter = Adapter::<Circle>::new();
        let circle = Circle { id: 1, radius: 2.0 };

        for intent in [Intent::Update, Intent::Delete] {
            let err = adapter.encode(&circle, intent, "circles").unwrap_err();
            assert_eq!(err.code(), ErrorCode::NoPrimaryKey);
        }
    }

    #[test]
    fn test_custom_registry_applies() {
        let registry = TransformerRegistry::default().with_repr(
            PropertyRepr::Text,
            Transformer::new(
                "upper",
                |v| match v {
                    Value::Text(s) => Ok(Value::Text(s.to_uppercase())),
                    other => Ok(other),
                },
                |v| match v {
                    Value::Text(s) => Ok(Value::Text(s.to_lowercase())),
                    other => Ok(other),
                },
            ),
        );
        let adapter = Adapter::<User>::with_registry(registry);

        let encoded = adapter.encode_insert(&ada(), "t").unwrap();
        assert_eq!(
            encoded.parameters["full_name"],
            Value::Text("ADA".to_string())
        );
        let decoded = adapter.decode(&encoded.parameters).unwrap();
        assert_eq!(decoded.name, "ada");
    }

    #[test]
    fn test_free_functions() {
        let encoded = encode_model(&ada(), Intent::Insert, "t").unwrap();
        assert_eq!(encoded.statement.sql, "INSERT INTO t (id, full_name) VALUES (?, ?)");

        let decoded: User = decode_model(&encoded.parameters).unwrap();
        assert_eq!(decoded, ada());
    }

    #[test]
    fn test_descriptor_is_cached() {
        let adapter = Adapter::<User>::new();
        let first = adapter.descriptor().unwrap() as *const _;
        let second = adapter.descriptor().unwrap() as *const _;
        assert_eq!(first, second);
    }
}
