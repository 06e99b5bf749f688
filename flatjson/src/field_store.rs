// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use alloc::vec::Vec;

use log::warn;

use crate::field::{Field, FieldType};
use crate::number_parser::FieldInt;
use crate::parse_error::ParseError;

/// Field limit used by [`FieldStore::new`].
pub const DEFAULT_MAX_FIELDS: u16 = 32;

/// Insertion-ordered, append-only collection of committed fields.
///
/// The store exclusively owns its fields. Duplicate names are permitted;
/// retrieval is by position, `0..count()`. Capacity is a hard limit fixed
/// at construction: commits past it are rejected with
/// [`ParseError::StoreFull`] rather than wrapping an index somewhere.
#[derive(Debug)]
pub struct FieldStore {
    fields: Vec<Field>,
    max_fields: u16,
}

impl FieldStore {
    /// An empty store holding at most [`DEFAULT_MAX_FIELDS`] fields.
    pub fn new() -> Self {
        Self::with_max_fields(DEFAULT_MAX_FIELDS)
    }

    /// An empty store holding at most `max_fields` fields.
    pub fn with_max_fields(max_fields: u16) -> Self {
        FieldStore {
            fields: Vec::new(),
            max_fields,
        }
    }

    pub(crate) fn append(&mut self, field: Field) -> Result<(), ParseError> {
        if self.fields.len() >= self.max_fields as usize {
            warn!("store full, dropping field {:?}", field.name());
            return Err(ParseError::StoreFull {
                max_fields: self.max_fields,
            });
        }
        self.fields.push(field);
        Ok(())
    }

    /// Number of committed fields.
    pub fn count(&self) -> u16 {
        self.fields.len() as u16
    }

    /// The configured field limit.
    pub fn max_fields(&self) -> u16 {
        self.max_fields
    }

    /// All committed fields, in input order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The field at `index`, bounds-checked.
    pub fn field(&self, index: u16) -> Result<&Field, ParseError> {
        self.fields
            .get(index as usize)
            .ok_or(ParseError::IndexOutOfRange {
                index,
                count: self.count(),
            })
    }

    /// The field at `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`count()`](Self::count).
    pub unsafe fn field_unchecked(&self, index: u16) -> &Field {
        unsafe { self.fields.get_unchecked(index as usize) }
    }

    /// The name of the field at `index`.
    pub fn name(&self, index: u16) -> Result<&str, ParseError> {
        Ok(self.field(index)?.name())
    }

    /// The type tag of the field at `index`.
    pub fn field_type(&self, index: u16) -> Result<FieldType, ParseError> {
        Ok(self.field(index)?.field_type())
    }

    /// The numeric value of the [`FieldType::Number`] field at `index`.
    pub fn number_value(&self, index: u16) -> Result<FieldInt, ParseError> {
        let field = self.field(index)?;
        field
            .value()
            .as_number()
            .ok_or(self.mismatch(field, FieldType::Number))
    }

    /// The string value of the [`FieldType::String`] field at `index`.
    pub fn string_value(&self, index: u16) -> Result<&str, ParseError> {
        let field = self.field(index)?;
        field
            .value()
            .as_str()
            .ok_or(self.mismatch(field, FieldType::String))
    }

    /// A deep copy of the [`FieldType::NumberArray`] field at `index`.
    pub fn number_array(&self, index: u16) -> Result<Vec<FieldInt>, ParseError> {
        let field = self.field(index)?;
        field
            .value()
            .as_number_array()
            .map(<[FieldInt]>::to_vec)
            .ok_or(self.mismatch(field, FieldType::NumberArray))
    }

    /// A deep copy of the [`FieldType::StringArray`] field at `index`.
    pub fn string_array(&self, index: u16) -> Result<Vec<String>, ParseError> {
        let field = self.field(index)?;
        field
            .value()
            .as_string_array()
            .map(<[String]>::to_vec)
            .ok_or(self.mismatch(field, FieldType::StringArray))
    }

    /// Element count of the array field at `index`, 0 for scalar fields.
    pub fn array_len(&self, index: u16) -> Result<u16, ParseError> {
        Ok(self.field(index)?.array_len())
    }

    fn mismatch(&self, field: &Field, expected: FieldType) -> ParseError {
        ParseError::TypeMismatch {
            expected,
            actual: field.field_type(),
        }
    }
}

impl Default for FieldStore {
    fn default() -> Self {
        Self::new()
    }
}
