//! Model encoding
//!
//! Turns a model instance into the [`ParameterMapping`] for one intent and
//! hands it to the [`StatementBuilder`]. Reading properties never mutates
//! the model.

use crate::errors::EncodeError;
use crate::model::{PropertyKeys, Serializing};
use crate::schema::ResolvedModel;
use crate::statement::{Intent, Statement, StatementBuilder};
use crate::ParameterMapping;

/// Parameters of one encoded model and the statement that writes them
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedModel {
    pub parameters: ParameterMapping,
    pub statement: Statement,
}

/// Property keys written by `intent`.
///
/// Filter hooks can only narrow the candidate set: their result is
/// intersected with it.
fn selected_keys<M: Serializing>(
    resolved: &ResolvedModel<M>,
    model: &M,
    intent: Intent,
) -> Result<PropertyKeys, EncodeError> {
    let descriptor = &resolved.descriptor;
    let primary_keys = descriptor.primary_key_property_keys();

    if intent.requires_primary_key() && primary_keys.is_empty() {
        return Err(EncodeError::NoPrimaryKey {
            model: descriptor.model_type(),
            intent,
        });
    }

    let keys = match intent {
        Intent::Insert => {
            let candidates = descriptor.property_keys();
            let filtered = model.insertable_property_keys(candidates.clone());
            filtered.intersection(&candidates).copied().collect()
        }
        Intent::Update => {
            let candidates: PropertyKeys = descriptor
                .property_keys()
                .difference(primary_keys)
                .copied()
                .collect();
            let filtered = model.updatable_property_keys(candidates.clone());
            filtered.intersection(&candidates).copied().collect()
        }
        Intent::Delete => primary_keys.clone(),
    };

    Ok(keys)
}

/// Read and forward-transform the properties named in `keys`, in column mapping order
fn serialize<M: Serializing>(
    resolved: &ResolvedModel<M>,
    model: &M,
    keys: &PropertyKeys,
) -> Result<ParameterMapping, EncodeError> {
    let mut parameters = ParameterMapping::new();

    for (property, column, transformer) in resolved.mapped() {
        if !keys.contains(property.key()) {
            continue;
        }

        let raw = property
            .read(model)
            .map_err(|e| EncodeError::TransformFailure {
                key: property.key(),
                reason: e.to_string(),
            })?;
        let value = transformer
            .to_storage(raw)
            .map_err(|e| EncodeError::TransformFailure {
                key: property.key(),
                reason: e.reason().to_string(),
            })?;
        parameters.insert(column.to_string(), value);
    }

    Ok(parameters)
}

pub(crate) fn encode<M: Serializing>(
    resolved: &ResolvedModel<M>,
    builder: &StatementBuilder,
    model: &M,
    intent: Intent,
    table: &str,
) -> Result<EncodedModel, EncodeError> {
    if table.trim().is_empty() {
        return Err(EncodeError::NilTable);
    }

    let keys = selected_keys(resolved, model, intent)?;
    let parameters = serialize(resolved, model, &keys)?;

    let primary_key = match intent {
        Intent::Insert => ParameterMapping::new(),
        Intent::Update => serialize(
            resolved,
            model,
            resolved.descriptor.primary_key_property_keys(),
        )?,
        Intent::Delete => parameters.clone(),
    };

    trace_log!(
        "encoding {} for {} into {}: {} parameters",
        resolved.descriptor.model_type(),
        intent,
        table,
        parameters.len()
    );

    let statement = builder.build(table, intent, &parameters, &primary_key)?;
    Ok(EncodedModel {
        parameters,
        statement,
    })
}
