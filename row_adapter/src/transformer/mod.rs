//! Value transformers
//!
//! A [`Transformer`] converts between a property's in-memory [`Value`] and
//! the value stored in SQLite. The transformer applied to a property is
//! picked by [`resolve_transformer`] from, highest first:
//!
//! 1. the property's dedicated transformer
//! 2. the model's per-key override (`Serializing::column_transformer_for_key`)
//! 3. the registry's per-class transformer, for object properties
//! 4. the registry's per-representation transformer, for primitive properties
//! 5. identity

pub mod builtin;

use crate::model::Property;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use type_mapping::{PropertyRepr, Value};

/// Rejection of a value by a transformer
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct TransformError(String);

impl TransformError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    pub fn reason(&self) -> &str {
        &self.0
    }
}

pub type TransformFn = Arc<dyn Fn(Value) -> Result<Value, TransformError> + Send + Sync>;

/// Bidirectional (or forward-only) conversion between in-memory and stored values
///
/// A missing slot behaves as identity. A transformer without `from_storage`
/// is forward-only: stored values are read back unchanged.
#[derive(Clone)]
pub struct Transformer {
    name: &'static str,
    to_storage: Option<TransformFn>,
    from_storage: Option<TransformFn>,
}

impl Transformer {
    pub fn new<F, R>(name: &'static str, to_storage: F, from_storage: R) -> Self
    where
        F: Fn(Value) -> Result<Value, TransformError> + Send + Sync + 'static,
        R: Fn(Value) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        Self {
            name,
            to_storage: Some(Arc::new(to_storage)),
            from_storage: Some(Arc::new(from_storage)),
        }
    }

    pub fn forward_only<F>(name: &'static str, to_storage: F) -> Self
    where
        F: Fn(Value) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        Self {
            name,
            to_storage: Some(Arc::new(to_storage)),
            from_storage: None,
        }
    }

    pub fn identity() -> Self {
        Self {
            name: "identity",
            to_storage: None,
            from_storage: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_reversible(&self) -> bool {
        self.from_storage.is_some()
    }

    pub fn is_identity(&self) -> bool {
        self.to_storage.is_none() && self.from_storage.is_none()
    }

    /// Convert an in-memory value into its stored form
    pub fn to_storage(&self, value: Value) -> Result<Value, TransformError> {
        match &self.to_storage {
            Some(transform) => transform(value),
            None => Ok(value),
        }
    }

    /// Convert a stored value back into its in-memory form
    pub fn from_storage(&self, value: Value) -> Result<Value, TransformError> {
        match &self.from_storage {
            Some(transform) => transform(value),
            None => Ok(value),
        }
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer")
            .field("name", &self.name)
            .field("reversible", &self.is_reversible())
            .finish()
    }
}

/// Per-class and per-representation transformer tables
#[derive(Clone, Debug)]
pub struct TransformerRegistry {
    by_class: HashMap<String, Transformer>,
    by_repr: HashMap<PropertyRepr, Transformer>,
}

impl Default for TransformerRegistry {
    /// Registry with the canonical primitive transformers installed
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register_repr(PropertyRepr::Bool, builtin::boolean())
            .register_repr(PropertyRepr::Uuid, builtin::uuid_text())
            .register_repr(PropertyRepr::Timestamp, builtin::timestamp_rfc3339())
            .register_repr(PropertyRepr::Json, builtin::json_text());
        registry
    }
}

impl TransformerRegistry {
    /// Registry without any transformer, every property passes through unchanged
    pub fn empty() -> Self {
        Self {
            by_class: HashMap::new(),
            by_repr: HashMap::new(),
        }
    }

    /// Register the transformer for object properties of `class`
    pub fn register_class(
        &mut self,
        class: impl Into<String>,
        transformer: Transformer,
    ) -> &mut Self {
        self.by_class.insert(class.into(), transformer);
        self
    }

    /// Register the transformer for a primitive representation.
    /// Object representations are registered by class name.
    pub fn register_repr(&mut self, repr: PropertyRepr, transformer: Transformer) -> &mut Self {
        match repr {
            PropertyRepr::Object(class) => {
                self.by_class.insert(class.to_string(), transformer);
            }
            primitive => {
                self.by_repr.insert(primitive, transformer);
            }
        }
        self
    }

    pub fn with_class(mut self, class: impl Into<String>, transformer: Transformer) -> Self {
        self.register_class(class, transformer);
        self
    }

    pub fn with_repr(mut self, repr: PropertyRepr, transformer: Transformer) -> Self {
        self.register_repr(repr, transformer);
        self
    }

    pub fn for_class(&self, class: &str) -> Option<&Transformer> {
        self.by_class.get(class)
    }

    pub fn for_repr(&self, repr: PropertyRepr) -> Option<&Transformer> {
        match repr {
            PropertyRepr::Object(_) => None,
            primitive => self.by_repr.get(&primitive),
        }
    }
}

/// Where a resolved transformer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformerSource {
    Property,
    KeyOverride,
    Class,
    Representation,
    Identity,
}

/// Outcome of transformer resolution for one property
#[derive(Debug, Clone)]
pub struct ResolvedTransformer {
    pub transformer: Transformer,
    pub source: TransformerSource,
}

/// Resolve the transformer for `property`. Never fails: the absence of any
/// transformer resolves to identity.
pub fn resolve_transformer<M>(
    property: &Property<M>,
    overrides: &HashMap<&'static str, Transformer>,
    registry: &TransformerRegistry,
) -> ResolvedTransformer {
    if let Some(transformer) = property.transformer() {
        return ResolvedTransformer {
            transformer: transformer.clone(),
            source: TransformerSource::Property,
        };
    }

    if let Some(transformer) = overrides.get(property.key()) {
        return ResolvedTransformer {
            transformer: transformer.clone(),
            source: TransformerSource::KeyOverride,
        };
    }

    // Object properties consult the class table only; primitives the representation table only
    let by_type = match property.repr() {
        PropertyRepr::Object(class) => registry
            .for_class(class)
            .map(|t| (t, TransformerSource::Class)),
        repr => registry
            .for_repr(repr)
            .map(|t| (t, TransformerSource::Representation)),
    };

    match by_type {
        Some((transformer, source)) => ResolvedTransformer {
            transformer: transformer.clone(),
            source,
        },
        None => ResolvedTransformer {
            transformer: Transformer::identity(),
            source: TransformerSource::Identity,
        },
    }
}
