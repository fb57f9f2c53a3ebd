//! Row decoding
//!
//! Turns a [`RowMapping`] into a model instance: reverse-transforms every
//! mapped column present in the row, writes it through the property setter
//! and gates the result on the model's validation capability. A failure at
//! any step discards the instance.

use crate::errors::DecodeError;
use crate::model::Serializing;
use crate::schema::ResolvedModel;
use crate::RowMapping;

/// Builds a model of type `M` from one row
pub trait RowDecoder<M>: Send + Sync {
    fn decode_row(&self, row: &RowMapping) -> Result<M, DecodeError>;
}

impl<M: Serializing> RowDecoder<M> for ResolvedModel<M> {
    fn decode_row(&self, row: &RowMapping) -> Result<M, DecodeError> {
        let mut model = M::default();

        for (property, column, transformer) in self.mapped() {
            // Missing columns leave the property at its default
            let Some(raw) = row.get(column) else {
                continue;
            };

            let value = transformer.from_storage(raw.clone()).map_err(|e| {
                DecodeError::TransformFailure {
                    key: property.key(),
                    column: column.to_string(),
                    reason: e.reason().to_string(),
                }
            })?;

            property
                .write(&mut model, value)
                .map_err(|source| DecodeError::PropertyMismatch {
                    key: property.key(),
                    column: column.to_string(),
                    source,
                })?;
        }

        if let Err(reason) = model.validate() {
            debug_log!(
                "decoded {} rejected by validation: {}",
                self.descriptor.model_type(),
                reason
            );
            return Err(DecodeError::ValidationFailed {
                model: self.descriptor.model_type(),
                reason,
            });
        }

        Ok(model)
    }
}

/// Decodes rows as the variant type `V` and wraps the result into `M`
pub(crate) struct VariantDecoder<V, M> {
    inner: ResolvedModel<V>,
    wrap: fn(V) -> M,
}

impl<V, M> VariantDecoder<V, M> {
    pub(crate) fn new(inner: ResolvedModel<V>, wrap: fn(V) -> M) -> Self {
        Self { inner, wrap }
    }
}

impl<V: Serializing, M: Send + Sync> RowDecoder<M> for VariantDecoder<V, M> {
    fn decode_row(&self, row: &RowMapping) -> Result<M, DecodeError> {
        self.inner.decode_row(row).map(self.wrap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::model::{ModelSchema, ModelType, Property, PropertyKeys};
    use crate::transformer::{Transformer, TransformerRegistry};
    use indexmap::IndexMap;
    use type_mapping::{FromValue, PropertyRepr, ToValue, Value};

    #[derive(Debug, Default, PartialEq)]
    struct Person {
        id: i64,
        name: String,
        nickname: Option<String>,
        active: bool,
    }

    impl ModelSchema for Person {
        fn model_type() -> ModelType {
            ModelType::new("Person")
        }

        fn properties() -> Vec<Property<Self>> {
            vec![
                Property::new(
                    "id",
                    PropertyRepr::Integer,
                    |p: &Person| p.id.to_value(),
                    |p: &mut Person, v| {
                        p.id = FromValue::from_value(v)?;
                        Ok(())
                    },
                ),
                Property::new(
                    "name",
                    PropertyRepr::Text,
                    |p: &Person| p.name.to_value(),
                    |p: &mut Person, v| {
                        p.name = FromValue::from_value(v)?;
                        Ok(())
                    },
                ),
                Property::new(
                    "nickname",
                    PropertyRepr::Text,
                    |p: &Person| p.nickname.to_value(),
                    |p: &mut Person, v| {
                        p.nickname = FromValue::from_value(v)?;
                        Ok(())
                    },
                ),
                Property::new(
                    "active",
                    PropertyRepr::Bool,
                    |p: &Person| p.active.to_value(),
                    |p: &mut Person, v| {
                        p.active = FromValue::from_value(v)?;
                        Ok(())
                    },
                ),
            ]
        }

        fn column_names_by_property_key() -> IndexMap<&'static str, &'static str> {
            IndexMap::from([
                ("id", "id"),
                ("name", "full_name"),
                ("nickname", "nickname"),
                ("active", "active"),
            ])
        }

        fn primary_key_property_keys() -> PropertyKeys {
            PropertyKeys::from(["id"])
        }
    }

    impl Serializing for Person {
        fn column_transformer_for_key(key: &str) -> Option<Transformer> {
            (key == "nickname").then(|| {
                Transformer::forward_only("lowercase", |v| match v {
                    Value::Text(s) => Ok(Value::Text(s.to_lowercase())),
                    other => Ok(other),
                })
            })
        }

        fn validate(&self) -> Result<(), String> {
            if self.id < 0 {
                return Err(format!("id {} must not be negative", self.id));
            }
            Ok(())
        }
    }

    fn resolved() -> ResolvedModel<Person> {
        ResolvedModel::resolve(&TransformerRegistry::default()).unwrap()
    }

    fn row(pairs: &[(&str, Value)]) -> RowMapping {
        pairs
            .iter()
            .map(|(column, value)| (column.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_decode_full_row() {
        let person = resolved()
            .decode_row(&row(&[
                ("id", Value::Integer(7)),
                ("full_name", Value::Text("Ada".to_string())),
                ("nickname", Value::Text("Countess".to_string())),
                ("active", Value::Integer(1)),
            ]))
            .unwrap();

        // Forward-only transformers read back unchanged
        assert_eq!(
            person,
            Person {
                id: 7,
                name: "Ada".to_string(),
                nickname: Some("Countess".to_string()),
                active: true,
            }
        );
    }

    #[test]
    fn test_missing_columns_keep_defaults() {
        let person = resolved()
            .decode_row(&row(&[("id", Value::Integer(7))]))
            .unwrap();
        assert_eq!(
            person,
            Person {
                id: 7,
                ..Person::default()
            }
        );
    }

    #[test]
    fn test_unmapped_columns_are_ignored() {
        let person = resolved()
            .decode_row(&row(&[
                ("id", Value::Integer(1)),
                ("rowid", Value::Integer(99)),
            ]))
            .unwrap();
        assert_eq!(person.id, 1);
    }

    #[test]
    fn test_null_into_optional_and_required() {
        let person = resolved()
            .decode_row(&row(&[
                ("id", Value::Integer(3)),
                ("nickname", Value::Null),
            ]))
            .unwrap();
        assert_eq!(person.nickname, None);

        let err = resolved()
            .decode_row(&row(&[("id", Value::Null)]))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::PropertyMismatch);
    }

    #[test]
    fn test_transform_failure_aborts() {
        let err = resolved()
            .decode_row(&row(&[
                ("id", Value::Integer(3)),
                ("active", Value::Text("sometimes".to_string())),
            ]))
            .unwrap_err();

        match err {
            DecodeError::TransformFailure { key, column, .. } => {
                assert_eq!(key, "active");
                assert_eq!(column, "active");
            }
            other => panic!("expected TransformFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_gates_result() {
        let err = resolved()
            .decode_row(&row(&[("id", Value::Integer(-1))]))
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::ValidationFailed {
                model: ModelType::new("Person"),
                reason: "id -1 must not be negative".to_string(),
            }
        );
    }

    #[test]
    fn test_variant_decoder_wraps() {
        let decoder = VariantDecoder::new(resolved(), |p: Person| Some(p.id));
        let wrapped = decoder
            .decode_row(&row(&[("id", Value::Integer(11))]))
            .unwrap();
        assert_eq!(wrapped, Some(11));
    }
}
