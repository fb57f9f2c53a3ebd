//! Procedural macros for generating model schemas
//!
//! This crate provides the `RowModel` derive, which generates the
//! `ModelSchema` implementation (property descriptor table, column mapping,
//! primary keys and column definitions) for a struct with named fields.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod code_generation;
mod parsing;

use code_generation::{generate_model_schema_impl, generate_serializing_impl};
use parsing::{parse_column_fields, parse_row_attributes};

/// Derive macro for the `ModelSchema` trait
///
/// The struct must implement `Default`; decoding starts from the default
/// instance and leaves unmapped or missing columns untouched.
///
/// ```rust,ignore
/// use rowhaus::prelude::*;
///
/// #[derive(Debug, Clone, Default, PartialEq, RowModel)]
/// #[row(serializing)]
/// pub struct User {
///     #[primary_key]
///     pub id: i64,
///
///     #[column(name = "full_name", definition = "TEXT NOT NULL")]
///     pub name: String,
///
///     pub address: Option<Address>,
///
///     #[column(skip)]
///     pub cached_score: f64,
/// }
/// ```
///
/// Struct options, `#[row(...)]`:
/// - `model_type = "..."`: model type name, defaults to the struct name
/// - `serializing`: also emit an empty `Serializing` impl
///
/// Field options, `#[column(...)]`:
/// - `name = "..."`: column name, defaults to the field name
/// - `definition = "..."`: column definition, derived from the field type otherwise
/// - `transformer = "path::to::fn"`: dedicated transformer constructor
/// - `object`: convert through serde even if the type converts directly
/// - `skip`: leave the field out of the mapping
#[proc_macro_derive(RowModel, attributes(row, primary_key, column))]
pub fn derive_row_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    let row_info = match parse_row_attributes(&input.attrs) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    let fields = match parse_column_fields(&input.data) {
        Ok(fields) => fields,
        Err(e) => return e.to_compile_error().into(),
    };

    let model_schema_impl = generate_model_schema_impl(name, &row_info, &fields);
    let serializing_impl = row_info
        .default_serializing
        .then(|| generate_serializing_impl(name));

    let expanded = quote::quote! {
        #model_schema_impl
        #serializing_impl
    };

    TokenStream::from(expanded)
}
