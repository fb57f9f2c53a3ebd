//! Row Adapter - model/row mapping engine for RowHaus
//!
//! This crate converts typed model instances to and from SQLite rows:
//! schema descriptor resolution, value transformers, the encoder and
//! decoder, statement generation, and the executor seam that runs the
//! generated statements.

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod adapter;
pub mod decoder;
pub mod encoder;
pub mod errors;
pub mod executor;
pub mod identifier;
pub mod model;
pub mod prelude;
pub mod schema;
pub mod statement;
pub mod store;
pub mod transformer;

use indexmap::IndexMap;
use type_mapping::Value;

/// Column name to storable value, in statement binding order
pub type ParameterMapping = IndexMap<String, Value>;

/// Column name to raw stored value, as returned for one row
pub type RowMapping = IndexMap<String, Value>;

pub use adapter::{decode_model, encode_model, Adapter};
pub use decoder::RowDecoder;
pub use encoder::EncodedModel;
pub use errors::{AdapterError, BuildError, DecodeError, EncodeError, ErrorCode, SchemaError};
pub use executor::{SqliteExecutor, StatementExecutor};
pub use identifier::{IdentifierError, ValidatedIdentifier};
pub use model::{
    ModelClass, ModelSchema, ModelType, Property, PropertyGetter, PropertyKeys, PropertySetter,
    PropertyTryGetter,
    Serializing,
};
pub use schema::{ClassSelector, SchemaDescriptor};
pub use statement::{Intent, Statement, StatementBuilder};
pub use store::{RowStore, StoreError};
pub use transformer::{
    builtin, resolve_transformer, ResolvedTransformer, TransformError, Transformer,
    TransformerRegistry, TransformerSource,
};

// Re-exported for code generated by `#[derive(RowModel)]`
pub use indexmap;
pub use type_mapping;
