//! Convenience re-exports for common row-adapter usage

// Model capabilities
pub use crate::model::{ModelClass, ModelSchema, ModelType, Property, PropertyKeys, Serializing};

// Adapter facade
pub use crate::adapter::{decode_model, encode_model, Adapter};
pub use crate::encoder::EncodedModel;
pub use crate::schema::SchemaDescriptor;
pub use crate::statement::{Intent, Statement, StatementBuilder};
pub use crate::{ParameterMapping, RowMapping};

// Transformers
pub use crate::transformer::{builtin, TransformError, Transformer, TransformerRegistry};

// Error types
pub use crate::errors::{AdapterError, BuildError, DecodeError, EncodeError, ErrorCode, SchemaError};

// Execution
pub use crate::executor::{SqliteExecutor, StatementExecutor};
pub use crate::store::{RowStore, StoreError};

// Value model
pub use type_mapping::{FromValue, PropertyRepr, ToValue, Value};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use indexmap::IndexMap;
pub use sqlx::SqlitePool;
