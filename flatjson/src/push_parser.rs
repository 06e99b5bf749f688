// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use log::{debug, info};

use crate::field::{Field, FieldType, FieldValue};
use crate::field_store::FieldStore;
use crate::number_parser::{FieldInt, NumberAccumulator};
use crate::parse_error::ParseError;

/// Parse position, one variant per grammar region. Each variant owns the
/// scratch accumulators for the value being built, so a commit moves them
/// out exactly once and dropping the parser mid-value releases them.
#[derive(Debug)]
enum State {
    /// Between fields, no field in progress.
    Ready,
    /// Inside the quotes of a field name.
    FieldName { name: String },
    /// Name closed, value not yet typed.
    AwaitingValue { name: String },
    /// Accumulating a scalar number.
    Number {
        name: String,
        acc: NumberAccumulator,
    },
    /// Inside the quotes of a scalar string.
    Str { name: String, buf: String },
    /// Just saw `[`, element type not yet known.
    ArrayStart { name: String },
    /// Accumulating one number array element.
    NumberArray {
        name: String,
        items: Vec<FieldInt>,
        acc: NumberAccumulator,
    },
    /// Accumulating one string array element. `,` and `]` are structural
    /// only while outside the element's quotes.
    StringArray {
        name: String,
        items: Vec<String>,
        buf: String,
        in_quotes: bool,
    },
}

/// Character-at-a-time parser for flat JSON objects.
///
/// Feed one character per [`feed`](Self::feed) call, in stream order. The
/// input is a sequence of `"name": value` pairs where a value is a signed
/// decimal integer, a double-quoted string (no escapes), or a bracketed
/// homogeneous array of either. The enclosing object braces are optional:
/// `{` is skipped, and `}` only acts as a scalar number terminator.
/// Nested objects, booleans and null are not recognized.
///
/// A character that fits no transition for the current state is dropped
/// without a state change; there is no error channel on `feed`. Call
/// [`finish`](Self::finish) at end of input to commit a trailing number.
///
/// ```
/// use flatjson::{FieldType, PushParser};
///
/// let mut parser = PushParser::new();
/// for c in "\"speed\":-12,\"tags\":[\"a\",\"b\"]".chars() {
///     parser.feed(c);
/// }
/// parser.finish();
///
/// assert_eq!(parser.field_count(), 2);
/// assert_eq!(parser.number_value(0), Ok(-12));
/// assert_eq!(parser.field_type(1), Ok(FieldType::StringArray));
/// ```
pub struct PushParser {
    state: State,
    store: FieldStore,
    fields_dropped: u16,
}

impl PushParser {
    /// A parser whose store holds at most
    /// [`DEFAULT_MAX_FIELDS`](crate::DEFAULT_MAX_FIELDS) fields.
    pub fn new() -> Self {
        Self::with_store(FieldStore::new())
    }

    /// A parser whose store holds at most `max_fields` fields.
    pub fn with_max_fields(max_fields: u16) -> Self {
        Self::with_store(FieldStore::with_max_fields(max_fields))
    }

    fn with_store(store: FieldStore) -> Self {
        PushParser {
            state: State::Ready,
            store,
            fields_dropped: 0,
        }
    }

    /// Advance the parser by one input character.
    pub fn feed(&mut self, c: char) {
        // Whitespace is insignificant everywhere except inside a quoted run.
        if matches!(c, ' ' | '\t' | '\n' | '\r') && !self.in_quoted_run() {
            return;
        }
        debug!("char {:?}, state {:?}", c, self.state);

        self.state = match (mem::replace(&mut self.state, State::Ready), c) {
            (State::Ready, '"') => State::FieldName {
                name: String::new(),
            },
            // `{`, `}`, `,` between fields, or garbage
            (State::Ready, _) => State::Ready,

            (State::FieldName { name }, '"') => State::AwaitingValue { name },
            (State::FieldName { mut name }, c) => {
                name.push(c);
                State::FieldName { name }
            }

            (State::AwaitingValue { name }, '"') => State::Str {
                name,
                buf: String::new(),
            },
            (State::AwaitingValue { name }, c @ '0'..='9') => {
                let mut acc = NumberAccumulator::new();
                acc.push_digit(c);
                State::Number { name, acc }
            }
            (State::AwaitingValue { name }, '-') => {
                let mut acc = NumberAccumulator::new();
                acc.mark_negative();
                State::Number { name, acc }
            }
            (State::AwaitingValue { name }, '[') => State::ArrayStart { name },
            // `:` and garbage
            (State::AwaitingValue { name }, _) => State::AwaitingValue { name },

            (State::Number { name, mut acc }, c @ '0'..='9') => {
                acc.push_digit(c);
                State::Number { name, acc }
            }
            (State::Number { name, acc }, ',' | '}') => {
                self.commit(Field::new(name, FieldValue::Number(acc.finish())));
                State::Ready
            }
            (State::Number { name, acc }, _) => State::Number { name, acc },

            (State::Str { name, buf }, '"') => {
                self.commit(Field::new(name, FieldValue::String(buf)));
                State::Ready
            }
            (State::Str { name, mut buf }, c) => {
                buf.push(c);
                State::Str { name, buf }
            }

            (State::ArrayStart { name }, '"') => State::StringArray {
                name,
                items: Vec::new(),
                buf: String::new(),
                in_quotes: true,
            },
            (State::ArrayStart { name }, c @ '0'..='9') => {
                let mut acc = NumberAccumulator::new();
                acc.push_digit(c);
                State::NumberArray {
                    name,
                    items: Vec::new(),
                    acc,
                }
            }
            (State::ArrayStart { name }, '-') => {
                let mut acc = NumberAccumulator::new();
                acc.mark_negative();
                State::NumberArray {
                    name,
                    items: Vec::new(),
                    acc,
                }
            }
            // An array closed before its first element commits empty, with
            // the numeric element type.
            (State::ArrayStart { name }, ']') => {
                self.commit(Field::new(name, FieldValue::NumberArray(Vec::new())));
                State::Ready
            }
            (State::ArrayStart { name }, _) => State::ArrayStart { name },

            (State::NumberArray {
                name,
                items,
                mut acc,
            }, c @ '0'..='9') => {
                acc.push_digit(c);
                State::NumberArray { name, items, acc }
            }
            (State::NumberArray {
                name,
                items,
                mut acc,
            }, '-') => {
                acc.mark_negative();
                State::NumberArray { name, items, acc }
            }
            (State::NumberArray {
                name,
                mut items,
                acc,
            }, ',') => {
                items.push(acc.finish());
                State::NumberArray {
                    name,
                    items,
                    acc: NumberAccumulator::new(),
                }
            }
            (State::NumberArray {
                name,
                mut items,
                acc,
            }, ']') => {
                items.push(acc.finish());
                self.commit(Field::new(name, FieldValue::NumberArray(items)));
                State::Ready
            }
            (State::NumberArray { name, items, acc }, _) => {
                State::NumberArray { name, items, acc }
            }

            (State::StringArray {
                name,
                items,
                buf,
                in_quotes: true,
            }, '"') => State::StringArray {
                name,
                items,
                buf,
                in_quotes: false,
            },
            (State::StringArray {
                name,
                items,
                mut buf,
                in_quotes: true,
            }, c) => {
                buf.push(c);
                State::StringArray {
                    name,
                    items,
                    buf,
                    in_quotes: true,
                }
            }
            (State::StringArray {
                name,
                items,
                buf,
                in_quotes: false,
            }, '"') => State::StringArray {
                name,
                items,
                buf,
                in_quotes: true,
            },
            (State::StringArray {
                name,
                mut items,
                buf,
                in_quotes: false,
            }, ',') => {
                items.push(buf);
                State::StringArray {
                    name,
                    items,
                    buf: String::new(),
                    in_quotes: false,
                }
            }
            (State::StringArray {
                name,
                mut items,
                buf,
                in_quotes: false,
            }, ']') => {
                items.push(buf);
                self.commit(Field::new(name, FieldValue::StringArray(items)));
                State::Ready
            }
            (State::StringArray {
                name,
                items,
                buf,
                in_quotes: false,
            }, _) => State::StringArray {
                name,
                items,
                buf,
                in_quotes: false,
            },
        };
    }

    /// Feed every character of `s`, in order. Exactly equivalent to calling
    /// [`feed`](Self::feed) once per character.
    pub fn feed_str(&mut self, s: &str) {
        for c in s.chars() {
            self.feed(c);
        }
    }

    /// Signal end of input.
    ///
    /// A number is the only value with no closing delimiter of its own, so
    /// a trailing in-flight number commits here. Any other partial field is
    /// incomplete and is discarded.
    pub fn finish(&mut self) {
        if let State::Number { name, acc } = mem::replace(&mut self.state, State::Ready) {
            self.commit(Field::new(name, FieldValue::Number(acc.finish())));
        }
    }

    fn commit(&mut self, field: Field) {
        // A committed field always has a name; `"":...` is malformed input.
        if field.name().is_empty() {
            debug!("dropping field with empty name");
            return;
        }
        info!(
            "committed field {:?} ({:?})",
            field.name(),
            field.field_type()
        );
        if self.store.append(field).is_err() {
            self.fields_dropped = self.fields_dropped.saturating_add(1);
        }
    }

    fn in_quoted_run(&self) -> bool {
        matches!(
            self.state,
            State::FieldName { .. }
                | State::Str { .. }
                | State::StringArray {
                    in_quotes: true,
                    ..
                }
        )
    }

    /// The store of committed fields.
    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    /// Consume the parser, keeping the committed fields.
    pub fn into_store(self) -> FieldStore {
        self.store
    }

    /// Number of field commits dropped because the store was full.
    pub fn fields_dropped(&self) -> u16 {
        self.fields_dropped
    }

    /// Number of committed fields.
    pub fn field_count(&self) -> u16 {
        self.store.count()
    }

    /// The name of the field at `index`.
    pub fn field_name(&self, index: u16) -> Result<&str, ParseError> {
        self.store.name(index)
    }

    /// The type tag of the field at `index`.
    pub fn field_type(&self, index: u16) -> Result<FieldType, ParseError> {
        self.store.field_type(index)
    }

    /// The numeric value of the number field at `index`.
    pub fn number_value(&self, index: u16) -> Result<FieldInt, ParseError> {
        self.store.number_value(index)
    }

    /// The string value of the string field at `index`.
    pub fn string_value(&self, index: u16) -> Result<&str, ParseError> {
        self.store.string_value(index)
    }

    /// A deep copy of the number array field at `index`.
    pub fn number_array(&self, index: u16) -> Result<Vec<FieldInt>, ParseError> {
        self.store.number_array(index)
    }

    /// A deep copy of the string array field at `index`.
    pub fn string_array(&self, index: u16) -> Result<Vec<String>, ParseError> {
        self.store.string_array(index)
    }

    /// Element count of the array field at `index`, 0 for scalar fields.
    pub fn array_len(&self, index: u16) -> Result<u16, ParseError> {
        self.store.array_len(index)
    }
}

impl Default for PushParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn parse(input: &str) -> PushParser {
        let mut parser = PushParser::new();
        parser.feed_str(input);
        parser.finish();
        parser
    }

    #[test]
    fn test_scalar_number() {
        let parser = parse("\"x\":42");
        assert_eq!(parser.field_count(), 1);
        assert_eq!(parser.field_name(0), Ok("x"));
        assert_eq!(parser.field_type(0), Ok(FieldType::Number));
        assert_eq!(parser.number_value(0), Ok(42));
    }

    #[test]
    fn test_scalar_negative_number() {
        let parser = parse("\"x\":-7");
        assert_eq!(parser.number_value(0), Ok(-7));
    }

    #[test]
    fn test_number_terminated_by_brace() {
        let parser = parse("{\"x\":42}");
        assert_eq!(parser.field_count(), 1);
        assert_eq!(parser.number_value(0), Ok(42));
    }

    #[test]
    fn test_scalar_string() {
        let parser = parse("\"name\":\"ab c\"");
        assert_eq!(parser.field_count(), 1);
        assert_eq!(parser.field_type(0), Ok(FieldType::String));
        assert_eq!(parser.string_value(0), Ok("ab c"));
    }

    #[test]
    fn test_multiple_fields_in_order() {
        let parser = parse("\"a\":1,\"b\":2");
        assert_eq!(parser.field_count(), 2);
        assert_eq!(parser.field_name(0), Ok("a"));
        assert_eq!(parser.field_name(1), Ok("b"));
        assert_eq!(parser.number_value(0), Ok(1));
        assert_eq!(parser.number_value(1), Ok(2));
    }

    #[test]
    fn test_number_array() {
        let parser = parse("\"a\":[1,2,3]");
        assert_eq!(parser.field_count(), 1);
        assert_eq!(parser.field_type(0), Ok(FieldType::NumberArray));
        assert_eq!(parser.array_len(0), Ok(3));
        assert_eq!(parser.number_array(0), Ok(vec![1, 2, 3]));
    }

    #[test]
    fn test_number_array_negative_elements() {
        let parser = parse("\"a\":[-1,2,-3]");
        assert_eq!(parser.number_array(0), Ok(vec![-1, 2, -3]));
    }

    #[test]
    fn test_empty_array_is_zero_length_number_array() {
        let parser = parse("\"a\":[]");
        assert_eq!(parser.field_count(), 1);
        assert_eq!(parser.field_type(0), Ok(FieldType::NumberArray));
        assert_eq!(parser.array_len(0), Ok(0));
        assert_eq!(parser.number_array(0), Ok(vec![]));
    }

    #[test]
    fn test_string_array() {
        let parser = parse("\"a\":[\"x\",\"y\"]");
        assert_eq!(parser.field_type(0), Ok(FieldType::StringArray));
        assert_eq!(parser.array_len(0), Ok(2));
        assert_eq!(
            parser.string_array(0),
            Ok(vec!["x".to_string(), "y".to_string()])
        );
    }

    #[test]
    fn test_string_array_element_may_contain_separators() {
        let parser = parse("\"a\":[\"x,y\",\"b]c\"]");
        assert_eq!(
            parser.string_array(0),
            Ok(vec!["x,y".to_string(), "b]c".to_string()])
        );
    }

    #[test]
    fn test_whitespace_between_tokens_ignored() {
        let spaced = parse("\"a\" : 1 , \"b\" : [ 2 , 3 ]");
        let dense = parse("\"a\":1,\"b\":[2,3]");
        assert_eq!(spaced.store().fields(), dense.store().fields());
    }

    #[test]
    fn test_whitespace_inside_strings_preserved() {
        let parser = parse("\"a\":\"x y\",\"b\":[\"p q\"]");
        assert_eq!(parser.string_value(0), Ok("x y"));
        assert_eq!(parser.string_array(1), Ok(vec!["p q".to_string()]));
    }

    #[test]
    fn test_whitespace_inside_field_name_preserved() {
        let parser = parse("\"a b\":1,");
        assert_eq!(parser.field_name(0), Ok("a b"));
    }

    #[test]
    fn test_outer_braces_optional() {
        let braced = parse("{\"a\":1,\"b\":\"x\"}");
        let bare = parse("\"a\":1,\"b\":\"x\"");
        assert_eq!(braced.store().fields(), bare.store().fields());
    }

    #[test]
    fn test_garbage_between_fields_dropped() {
        let parser = parse("true null \"a\":1,");
        assert_eq!(parser.field_count(), 1);
        assert_eq!(parser.field_name(0), Ok("a"));
    }

    #[test]
    fn test_garbage_inside_number_dropped() {
        let parser = parse("\"a\":4x2,");
        assert_eq!(parser.number_value(0), Ok(42));
    }

    #[test]
    fn test_minus_after_digits_dropped() {
        let parser = parse("\"a\":[1-2,3]");
        assert_eq!(parser.number_array(0), Ok(vec![12, 3]));
    }

    #[test]
    fn test_finish_commits_trailing_number_only_once() {
        let mut parser = PushParser::new();
        parser.feed_str("\"a\":1");
        parser.finish();
        parser.finish();
        assert_eq!(parser.field_count(), 1);
    }

    #[test]
    fn test_finish_discards_incomplete_string() {
        let parser = parse("\"a\":\"unterminated");
        assert_eq!(parser.field_count(), 0);
    }

    #[test]
    fn test_finish_discards_incomplete_array() {
        let parser = parse("\"a\":[1,2");
        assert_eq!(parser.field_count(), 0);
    }

    #[test]
    fn test_store_full_drops_and_counts() {
        let mut parser = PushParser::with_max_fields(1);
        parser.feed_str("\"a\":1,\"b\":2,\"c\":3,");
        assert_eq!(parser.field_count(), 1);
        assert_eq!(parser.field_name(0), Ok("a"));
        assert_eq!(parser.fields_dropped(), 2);
    }

    #[test]
    fn test_duplicate_field_names_kept_in_order() {
        let parser = parse("\"a\":1,\"a\":2");
        assert_eq!(parser.field_count(), 2);
        assert_eq!(parser.number_value(0), Ok(1));
        assert_eq!(parser.number_value(1), Ok(2));
    }

    #[test]
    fn test_empty_name_not_committed() {
        let parser = parse("\"\":1,\"a\":2,");
        assert_eq!(parser.field_count(), 1);
        assert_eq!(parser.field_name(0), Ok("a"));
    }

    #[test]
    fn test_empty_input() {
        let parser = parse("");
        assert_eq!(parser.field_count(), 0);
    }

    #[test]
    fn test_braces_only() {
        let parser = parse("{}");
        assert_eq!(parser.field_count(), 0);
    }

    #[test]
    fn test_into_store_keeps_fields() {
        let store = parse("\"a\":1,").into_store();
        assert_eq!(store.count(), 1);
        assert_eq!(store.number_value(0), Ok(1));
    }
}
