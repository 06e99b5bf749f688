// SPDX-License-Identifier: Apache-2.0

//! Single-pass, character-at-a-time parser for a flat-object subset of JSON.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

// Compile-time configuration validation
mod config_check;

mod field;
pub use field::{Field, FieldType, FieldValue};

mod field_store;
pub use field_store::{FieldStore, DEFAULT_MAX_FIELDS};

mod number_parser;
pub use number_parser::FieldInt;

mod parse_error;
pub use parse_error::ParseError;

mod push_parser;
pub use push_parser::PushParser;
