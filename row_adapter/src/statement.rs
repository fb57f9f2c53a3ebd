//! SQL statement generation
//!
//! Renders INSERT/UPDATE/DELETE text and column-definition clauses. Values
//! always travel as placeholders; identifiers are taken verbatim from the
//! model's schema unless identifier validation is switched on.

use crate::errors::BuildError;
use crate::identifier::ValidatedIdentifier;
use crate::ParameterMapping;
use config::{PlaceholderStyle, StatementConfig};
use std::fmt;
use type_mapping::Value;

/// What an encoded statement does to its row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Insert,
    Update,
    Delete,
}

impl Intent {
    pub fn requires_primary_key(&self) -> bool {
        matches!(self, Intent::Update | Intent::Delete)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Intent::Insert => "INSERT",
            Intent::Update => "UPDATE",
            Intent::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Statement text plus the values bound to its placeholders, in order
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub bindings: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            bindings,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Renders statement text from a table name and parameter mappings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatementBuilder {
    placeholder_style: PlaceholderStyle,
    validate_identifiers: bool,
}

impl StatementBuilder {
    pub fn new(placeholder_style: PlaceholderStyle, validate_identifiers: bool) -> Self {
        Self {
            placeholder_style,
            validate_identifiers,
        }
    }

    pub fn from_config(config: &StatementConfig) -> Self {
        Self::new(config.placeholder_style, config.validate_identifiers)
    }

    pub fn placeholder_style(&self) -> PlaceholderStyle {
        self.placeholder_style
    }

    /// Render the statement for `intent`.
    ///
    /// `parameters` are the written columns (INSERT column list, UPDATE SET
    /// list); `primary_key` the identifying columns of the WHERE clause.
    /// UPDATE and DELETE never render without a WHERE clause.
    pub fn build(
        &self,
        table: &str,
        intent: Intent,
        parameters: &ParameterMapping,
        primary_key: &ParameterMapping,
    ) -> Result<Statement, BuildError> {
        if table.trim().is_empty() {
            return Err(BuildError::MissingTable);
        }
        if intent.requires_primary_key() && primary_key.is_empty() {
            return Err(BuildError::NoPrimaryKey { intent });
        }
        if self.validate_identifiers {
            ValidatedIdentifier::new(table)?;
            for column in parameters.keys().chain(primary_key.keys()) {
                ValidatedIdentifier::new(column)?;
            }
        }

        let statement = match intent {
            Intent::Insert => self.insert(table, parameters),
            Intent::Update => self.update(table, parameters, primary_key)?,
            Intent::Delete => self.delete(table, primary_key),
        };

        debug_log!("built {} statement: {}", intent, statement.sql);
        Ok(statement)
    }

    /// Render `<column> <definition>, ...` for the given pairs
    pub fn column_definitions<'a, I>(&self, definitions: I) -> Result<String, BuildError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut clauses = Vec::new();
        for (column, definition) in definitions {
            if self.validate_identifiers {
                ValidatedIdentifier::new(column)?;
            }
            let definition = definition.trim();
            if definition.is_empty() {
                clauses.push(column.to_string());
            } else {
                clauses.push(format!("{} {}", column, definition));
            }
        }

        if clauses.is_empty() {
            return Err(BuildError::NoDefinitions);
        }
        Ok(clauses.join(", "))
    }

    fn placeholder(&self, column: &str) -> String {
        match self.placeholder_style {
            PlaceholderStyle::Positional => "?".to_string(),
            PlaceholderStyle::Named => format!(":{}", column),
        }
    }

    fn assignments(&self, columns: &ParameterMapping, separator: &str) -> String {
        columns
            .keys()
            .map(|column| format!("{}={}", column, self.placeholder(column)))
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn insert(&self, table: &str, parameters: &ParameterMapping) -> Statement {
        if parameters.is_empty() {
            return Statement::new(format!("INSERT INTO {} DEFAULT VALUES", table), Vec::new());
        }

        let columns: Vec<&str> = parameters.keys().map(String::as_str).collect();
        let placeholders: Vec<String> = columns.iter().map(|c| self.placeholder(c)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders.join(", ")
        );
        Statement::new(sql, parameters.values().cloned().collect())
    }

    fn update(
        &self,
        table: &str,
        parameters: &ParameterMapping,
        primary_key: &ParameterMapping,
    ) -> Result<Statement, BuildError> {
        if parameters.is_empty() {
            return Err(BuildError::NoColumns {
                intent: Intent::Update,
            });
        }

        let sql = format!(
            "UPDATE {} SET {} WHERE {}",
            table,
            self.assignments(parameters, ", "),
            self.assignments(primary_key, " AND ")
        );
        let bindings = parameters
            .values()
            .chain(primary_key.values())
            .cloned()
            .collect();
        Ok(Statement::new(sql, bindings))
    }

    fn delete(&self, table: &str, primary_key: &ParameterMapping) -> Statement {
        let sql = format!(
            "DELETE FROM {} WHERE {}",
            table,
            self.assignments(primary_key, " AND ")
        );
        Statement::new(sql, primary_key.values().cloned().collect())
    }
}
