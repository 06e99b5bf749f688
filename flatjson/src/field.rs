// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use alloc::vec::Vec;

use crate::number_parser::FieldInt;

/// Type tag of a committed field. Fixed at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// A signed integer value (e.g., `"a":42`).
    Number,
    /// A string value (e.g., `"a":"b"`).
    String,
    /// A homogeneous array of signed integers (e.g., `"a":[1,2]`).
    NumberArray,
    /// A homogeneous array of strings (e.g., `"a":["b","c"]`).
    StringArray,
}

/// The payload of a committed field. Exactly one variant is live per field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Payload of a [`FieldType::Number`] field.
    Number(FieldInt),
    /// Payload of a [`FieldType::String`] field.
    String(String),
    /// Payload of a [`FieldType::NumberArray`] field.
    NumberArray(Vec<FieldInt>),
    /// Payload of a [`FieldType::StringArray`] field.
    StringArray(Vec<String>),
}

impl FieldValue {
    /// The type tag matching the live variant.
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Number(_) => FieldType::Number,
            FieldValue::String(_) => FieldType::String,
            FieldValue::NumberArray(_) => FieldType::NumberArray,
            FieldValue::StringArray(_) => FieldType::StringArray,
        }
    }

    /// The numeric value, if this is a number payload.
    pub fn as_number(&self) -> Option<FieldInt> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string value, if this is a string payload.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The stored elements, if this is a number array payload.
    pub fn as_number_array(&self) -> Option<&[FieldInt]> {
        match self {
            FieldValue::NumberArray(items) => Some(items),
            _ => None,
        }
    }

    /// The stored elements, if this is a string array payload.
    pub fn as_string_array(&self) -> Option<&[String]> {
        match self {
            FieldValue::StringArray(items) => Some(items),
            _ => None,
        }
    }
}

/// One parsed key/value pair. Immutable once committed to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    value: FieldValue,
}

impl Field {
    pub(crate) fn new(name: String, value: FieldValue) -> Self {
        Field { name, value }
    }

    /// The JSON key of this field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type tag, fixed at commit time.
    pub fn field_type(&self) -> FieldType {
        self.value.field_type()
    }

    /// The typed payload.
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Element count for array fields, 0 for scalars.
    ///
    /// Lengths saturate at `u16::MAX`.
    pub fn array_len(&self) -> u16 {
        let len = match &self.value {
            FieldValue::NumberArray(items) => items.len(),
            FieldValue::StringArray(items) => items.len(),
            _ => 0,
        };
        u16::try_from(len).unwrap_or(u16::MAX)
    }
}
