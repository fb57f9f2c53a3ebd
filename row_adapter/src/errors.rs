//! Error types for the row adapter
//!
//! Every layer reports its own typed failure; [`AdapterError`] is the single
//! domain the public facade returns, and [`ErrorCode`] the distinguishable
//! code callers branch on.

use crate::identifier::IdentifierError;
use crate::model::ModelType;
use crate::statement::Intent;
use thiserror::Error;
use type_mapping::ValueError;

/// Configuration errors in a model type's declared schema
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("model {model} declares no column mapping")]
    MissingColumnMapping { model: ModelType },

    #[error("model {model} maps both '{first}' and '{second}' to column '{column}'")]
    DuplicateColumn {
        model: ModelType,
        column: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("primary key '{key}' of model {model} has no column mapping")]
    UnknownPrimaryKey { model: ModelType, key: &'static str },

    #[error("property '{key}' of model {model} is mapped to a column but not declared")]
    UnknownProperty { model: ModelType, key: &'static str },

    #[error("column definition for '{key}' of model {model} has no column mapping")]
    UnmappedDefinition { model: ModelType, key: &'static str },

    #[error("property '{key}' is declared more than once by model {model}")]
    DuplicateProperty { model: ModelType, key: &'static str },
}

/// Failures rendering statement text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("table name is empty")]
    MissingTable,

    #[error("{intent} statement requires at least one primary key column")]
    NoPrimaryKey { intent: Intent },

    #[error("{intent} statement has no columns to write")]
    NoColumns { intent: Intent },

    #[error("model declares no column definitions")]
    NoDefinitions,

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierError),
}

/// Failures converting a model into statement parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("table name is missing")]
    NilTable,

    #[error("model {model} has no primary key, refusing to build an unconditional {intent}")]
    NoPrimaryKey { model: ModelType, intent: Intent },

    #[error("cannot transform property '{key}' for storage: {reason}")]
    TransformFailure { key: &'static str, reason: String },

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Failures converting a row into a model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("no class found to decode row as {model}")]
    NoClassFound { model: ModelType },

    #[error("row selected class {selected}, which {model} does not register")]
    UnregisteredClass {
        model: ModelType,
        selected: ModelType,
    },

    #[error("cannot transform column '{column}' into property '{key}': {reason}")]
    TransformFailure {
        key: &'static str,
        column: String,
        reason: String,
    },

    #[error("column '{column}' does not fit property '{key}': {source}")]
    PropertyMismatch {
        key: &'static str,
        column: String,
        #[source]
        source: ValueError,
    },

    #[error("{model} failed validation: {reason}")]
    ValidationFailed { model: ModelType, reason: String },
}

/// Distinguishable error codes of the adapter's error domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    MissingColumnMapping,
    InvalidSchema,
    NilTable,
    NoPrimaryKey,
    NoColumns,
    NoDefinitions,
    InvalidIdentifier,
    TransformFailure,
    NoClassFound,
    PropertyMismatch,
    ValidationFailed,
}

/// Single error domain returned by [`Adapter`](crate::Adapter)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdapterError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

impl SchemaError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SchemaError::MissingColumnMapping { .. } => ErrorCode::MissingColumnMapping,
            _ => ErrorCode::InvalidSchema,
        }
    }
}

impl BuildError {
    pub fn code(&self) -> ErrorCode {
        match self {
            BuildError::MissingTable => ErrorCode::NilTable,
            BuildError::NoPrimaryKey { .. } => ErrorCode::NoPrimaryKey,
            BuildError::NoColumns { .. } => ErrorCode::NoColumns,
            BuildError::NoDefinitions => ErrorCode::NoDefinitions,
            BuildError::InvalidIdentifier(_) => ErrorCode::InvalidIdentifier,
        }
    }
}

impl EncodeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            EncodeError::Schema(e) => e.code(),
            EncodeError::NilTable => ErrorCode::NilTable,
            EncodeError::NoPrimaryKey { .. } => ErrorCode::NoPrimaryKey,
            EncodeError::TransformFailure { .. } => ErrorCode::TransformFailure,
            EncodeError::Build(e) => e.code(),
        }
    }
}

impl DecodeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::Schema(e) => e.code(),
            DecodeError::NoClassFound { .. } | DecodeError::UnregisteredClass { .. } => {
                ErrorCode::NoClassFound
            }
            DecodeError::TransformFailure { .. } => ErrorCode::TransformFailure,
            DecodeError::PropertyMismatch { .. } => ErrorCode::PropertyMismatch,
            DecodeError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
        }
    }
}

impl AdapterError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AdapterError::Schema(e) => e.code(),
            AdapterError::Encode(e) => e.code(),
            AdapterError::Decode(e) => e.code(),
            AdapterError::Build(e) => e.code(),
        }
    }

    /// Reason reported by the model's validation capability, if that is what failed
    pub fn validation_reason(&self) -> Option<&str> {
        match self {
            AdapterError::Decode(DecodeError::ValidationFailed { reason, .. }) => Some(reason),
            _ => None,
        }
    }
}
