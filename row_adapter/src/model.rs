//! Model capability traits
//!
//! A model type exposes its schema through [`ModelSchema`] (usually derived
//! with `#[derive(RowModel)]`) and its optional behaviours through
//! [`Serializing`], whose methods all have defaults.

use crate::decoder::{RowDecoder, VariantDecoder};
use crate::errors::SchemaError;
use crate::schema::ResolvedModel;
use crate::transformer::{Transformer, TransformerRegistry};
use crate::RowMapping;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use type_mapping::{PropertyRepr, Value, ValueError};

/// Set of property keys, as passed through the key filters
pub type PropertyKeys = BTreeSet<&'static str>;

/// Opaque identifier of a family of model instances sharing one schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelType(&'static str);

impl ModelType {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn of<T: ?Sized>() -> Self {
        Self(std::any::type_name::<T>())
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

pub type PropertyGetter<M> = fn(&M) -> Value;
/// Getter for properties whose in-memory value may not be representable,
/// such as objects serde cannot turn into JSON
pub type PropertyTryGetter<M> = fn(&M) -> Result<Value, ValueError>;
pub type PropertySetter<M> = fn(&mut M, Value) -> Result<(), ValueError>;

enum Getter<M> {
    Infallible(PropertyGetter<M>),
    Fallible(PropertyTryGetter<M>),
}

impl<M> Clone for Getter<M> {
    fn clone(&self) -> Self {
        match self {
            Getter::Infallible(get) => Getter::Infallible(*get),
            Getter::Fallible(get) => Getter::Fallible(*get),
        }
    }
}

/// One row of a model's property descriptor table
pub struct Property<M> {
    key: &'static str,
    repr: PropertyRepr,
    get: Getter<M>,
    set: PropertySetter<M>,
    transformer: Option<Transformer>,
}

impl<M> Property<M> {
    pub fn new(
        key: &'static str,
        repr: PropertyRepr,
        get: PropertyGetter<M>,
        set: PropertySetter<M>,
    ) -> Self {
        Self {
            key,
            repr,
            get: Getter::Infallible(get),
            set,
            transformer: None,
        }
    }

    /// Property whose read can fail; the failure surfaces as an encode error
    pub fn fallible(
        key: &'static str,
        repr: PropertyRepr,
        get: PropertyTryGetter<M>,
        set: PropertySetter<M>,
    ) -> Self {
        Self {
            key,
            repr,
            get: Getter::Fallible(get),
            set,
            transformer: None,
        }
    }

    /// Attach the property's dedicated transformer, which outranks every
    /// other transformer source
    pub fn with_transformer(mut self, transformer: Transformer) -> Self {
        self.transformer = Some(transformer);
        self
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn repr(&self) -> PropertyRepr {
        self.repr
    }

    pub fn transformer(&self) -> Option<&Transformer> {
        self.transformer.as_ref()
    }

    pub fn read(&self, model: &M) -> Result<Value, ValueError> {
        match &self.get {
            Getter::Infallible(get) => Ok(get(model)),
            Getter::Fallible(get) => get(model),
        }
    }

    pub fn write(&self, model: &mut M, value: Value) -> Result<(), ValueError> {
        (self.set)(model, value)
    }
}

impl<M> Clone for Property<M> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            repr: self.repr,
            get: self.get.clone(),
            set: self.set,
            transformer: self.transformer.clone(),
        }
    }
}

impl<M> fmt::Debug for Property<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("key", &self.key)
            .field("repr", &self.repr)
            .field("transformer", &self.transformer.as_ref().map(|t| t.name()))
            .finish()
    }
}

/// Schema declared by a model type
///
/// Derived by `#[derive(RowModel)]`:
/// ```ignore
/// #[derive(Debug, Clone, Default, PartialEq, RowModel)]
/// pub struct User {
///     #[primary_key]
///     pub id: i64,
///
///     #[column(name = "full_name")]
///     pub name: String,
///
///     #[column(skip)]
///     pub cached_score: Option<f64>,
/// }
/// ```
pub trait ModelSchema: Default + Send + Sync + Sized + 'static {
    /// Identifier of this model type
    fn model_type() -> ModelType {
        ModelType::of::<Self>()
    }

    /// Property descriptor table
    fn properties() -> Vec<Property<Self>>;

    /// How property keys map to column names. Keys omitted here never take
    /// part in serialization.
    fn column_names_by_property_key() -> IndexMap<&'static str, &'static str>;

    /// Property keys identifying a row
    fn primary_key_property_keys() -> PropertyKeys {
        PropertyKeys::new()
    }

    /// SQL type/constraint fragment per property key
    fn column_definitions_by_property_key() -> IndexMap<&'static str, String> {
        IndexMap::new()
    }

    /// Table-level constraints appended after the column definitions, such
    /// as `PRIMARY KEY (a, b)` for a composite key
    fn table_constraints() -> Vec<String> {
        Vec::new()
    }
}

/// Optional serialization capabilities of a model type
pub trait Serializing: ModelSchema {
    /// Transformer override for a mapped property key
    fn column_transformer_for_key(_key: &str) -> Option<Transformer> {
        None
    }

    /// Concrete classes a row may decode into
    fn classes() -> Vec<ModelClass<Self>> {
        vec![ModelClass::base()]
    }

    /// Pick the class to decode `row` as, or `None` to abort decoding
    fn class_for_row(_row: &RowMapping) -> Option<ModelType> {
        Some(Self::model_type())
    }

    /// Filter the keys written by an INSERT of this model
    fn insertable_property_keys(&self, keys: PropertyKeys) -> PropertyKeys {
        keys
    }

    /// Filter the non-primary keys written by an UPDATE of this model
    fn updatable_property_keys(&self, keys: PropertyKeys) -> PropertyKeys {
        keys
    }

    /// Check a freshly decoded model, returning the failure reason
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

pub(crate) type PrepareClass<M> = Arc<
    dyn Fn(&TransformerRegistry) -> Result<Arc<dyn RowDecoder<M>>, SchemaError> + Send + Sync,
>;

/// A concrete class a row can be decoded into
pub struct ModelClass<M> {
    model_type: ModelType,
    prepare: Option<PrepareClass<M>>,
}

impl<M: Serializing> ModelClass<M> {
    /// The bound model type itself
    pub fn base() -> Self {
        Self {
            model_type: M::model_type(),
            prepare: None,
        }
    }

    /// A separately described model type wrapped into `M`
    pub fn variant<V: Serializing>(wrap: fn(V) -> M) -> Self {
        Self {
            model_type: V::model_type(),
            prepare: Some(Arc::new(move |registry: &TransformerRegistry| {
                let inner = ResolvedModel::<V>::resolve(registry)?;
                let decoder: Arc<dyn RowDecoder<M>> = Arc::new(VariantDecoder::new(inner, wrap));
                Ok(decoder)
            })),
        }
    }
}

impl<M> ModelClass<M> {
    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    pub fn is_base(&self) -> bool {
        self.prepare.is_none()
    }

    pub(crate) fn prepare(&self) -> Option<&PrepareClass<M>> {
        self.prepare.as_ref()
    }
}

impl<M> fmt::Debug for ModelClass<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelClass")
            .field("model_type", &self.model_type)
            .field("base", &self.is_base())
            .finish()
    }
}
