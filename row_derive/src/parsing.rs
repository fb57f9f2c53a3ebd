//! Parsing utilities for row and column attributes
//!
//! This module handles the parsing of `#[row(...)]`, `#[primary_key]` and
//! `#[column(...)]` attributes and the compile-time validation of column names.

use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, Attribute, Data, Error, Fields, Ident, Lit, Result, Token,
};

/// Validate column name and return syn::Error for better proc macro error handling
pub fn validate_column_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid column name '{}': {}", name, e)))
}

/// Same rules the runtime identifier validation applies
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed", name));
    }

    if type_mapping::is_reserved_keyword(name) {
        return Err(format!("Name '{}' is a reserved SQLite keyword", name));
    }

    Ok(())
}

/// One `key` or `key = "value"` entry of an attribute list
#[derive(Debug)]
struct AttributeOption {
    key: Ident,
    value: Option<Lit>,
}

#[derive(Debug)]
struct AttributeOptions {
    options: Vec<AttributeOption>,
}

impl Parse for AttributeOptions {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut options = Vec::new();

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            let value = if input.peek(Token![=]) {
                let _: Token![=] = input.parse()?;
                Some(input.parse::<Lit>()?)
            } else {
                None
            };
            options.push(AttributeOption { key, value });

            if input.peek(Token![,]) {
                let _: Token![,] = input.parse()?;
            }
        }

        Ok(AttributeOptions { options })
    }
}

fn string_value(option: &AttributeOption) -> Result<String> {
    match &option.value {
        Some(Lit::Str(s)) => Ok(s.value()),
        Some(other) => Err(Error::new_spanned(
            other,
            format!("'{}' expects a string literal", option.key),
        )),
        None => Err(Error::new_spanned(
            &option.key,
            format!("'{}' expects a value: {} = \"...\"", option.key, option.key),
        )),
    }
}

fn parse_options(attr: &Attribute) -> Result<Vec<AttributeOption>> {
    match &attr.meta {
        syn::Meta::Path(_) => Ok(Vec::new()),
        syn::Meta::List(meta_list) => Ok(meta_list.parse_args::<AttributeOptions>()?.options),
        syn::Meta::NameValue(nv) => Err(Error::new_spanned(
            nv,
            "expected a list of options, e.g. #[column(name = \"...\")]",
        )),
    }
}

#[derive(Debug, Default)]
pub struct RowInfo {
    /// `#[row(model_type = "...")]`, defaults to the struct name
    pub model_type: Option<String>,
    /// `#[row(serializing)]` also emits an empty `Serializing` impl
    pub default_serializing: bool,
}

#[derive(Debug)]
pub struct ColumnField {
    pub ident: Ident,
    pub key: String,
    pub column: String,
    pub rust_type: String,
    pub primary_key: bool,
    pub definition: Option<String>,
    pub transformer: Option<syn::Path>,
    /// Force the serde object bridge even for directly convertible types
    pub object: bool,
}

pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

pub fn parse_row_attributes(attrs: &[Attribute]) -> Result<RowInfo> {
    let mut info = RowInfo::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("row")) {
        for option in parse_options(attr)? {
            match option.key.to_string().as_str() {
                "model_type" => info.model_type = Some(string_value(&option)?),
                "serializing" => info.default_serializing = true,
                other => {
                    return Err(Error::new_spanned(
                        &option.key,
                        format!("unknown row option '{}'", other),
                    ))
                }
            }
        }
    }

    Ok(info)
}

pub fn parse_column_fields(data: &Data) -> Result<Vec<ColumnField>> {
    let Data::Struct(data_struct) = data else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "RowModel can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(fields_named) = &data_struct.fields else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "RowModel can only be derived for structs with named fields",
        ));
    };

    let mut fields = Vec::new();

    for field in &fields_named.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;
        let key = ident.to_string();

        let mut column = None;
        let mut definition = None;
        let mut transformer = None;
        let mut object = false;
        let mut skip = false;

        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("column")) {
            for option in parse_options(attr)? {
                match option.key.to_string().as_str() {
                    "name" => column = Some(string_value(&option)?),
                    "definition" => definition = Some(string_value(&option)?),
                    "transformer" => {
                        let path = string_value(&option)?;
                        transformer = Some(syn::parse_str::<syn::Path>(&path).map_err(|e| {
                            Error::new_spanned(&option.key, format!("invalid transformer path '{}': {}", path, e))
                        })?);
                    }
                    "object" => object = true,
                    "skip" => skip = true,
                    other => {
                        return Err(Error::new_spanned(
                            &option.key,
                            format!("unknown column option '{}'", other),
                        ))
                    }
                }
            }
        }

        let primary_key = has_attribute(&field.attrs, "primary_key");
        if skip {
            if primary_key {
                return Err(Error::new_spanned(
                    &ident,
                    "a skipped field cannot be part of the primary key",
                ));
            }
            continue;
        }

        let column = column.unwrap_or_else(|| key.clone());
        validate_column_name_syn(&column, ident.span())?;

        if let Some(previous) = fields.iter().find(|f: &&ColumnField| f.column == column) {
            return Err(Error::new_spanned(
                &ident,
                format!("column '{}' is already mapped by field '{}'", column, previous.key),
            ));
        }

        let ty = &field.ty;
        // Normalize type string by removing all whitespace for consistent matching
        let rust_type = quote!(#ty).to_string().replace(' ', "");

        fields.push(ColumnField {
            ident,
            key,
            column,
            rust_type,
            primary_key,
            definition,
            transformer,
            object,
        });
    }

    Ok(fields)
}
