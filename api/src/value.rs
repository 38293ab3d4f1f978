//! The textual record/value grammar exchanged between the broker and a node, and used verbatim in
//! the bulk data file.
//!
//! A full record is `"top_key" : VALUE`, where `VALUE` is a quoted string, an unquoted integer, an
//! unquoted two-fractional-digit decimal, or an object `{ "k1" : V1 ; "k2" : V2 ; … }` (or `{}`).
//! The member separator inside an object is `;`, not `,`, so a naive line-oriented transport can
//! tell record-level structure from member-level structure without quoting.

use crate::error::ProtocolError;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// A structured value: a scalar leaf or a nested object of further values.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// A quoted string leaf. The admitted grammar only emits `[A-Za-z0-9]` characters.
	String(String),
	/// An unquoted integer leaf.
	Int(i64),
	/// An unquoted decimal leaf with exactly two fractional digits on the wire.
	Float(f64),
	/// A nested mapping from child key to value. May be empty.
	Object(BTreeMap<String, Value>),
}

/// Parses a full record of the form `"top_key" : VALUE`.
///
/// Fails with [`ProtocolError::InvalidFormat`] if there is no `:`, the key is empty after
/// trimming whitespace and one layer of surrounding quotes, or the value half does not parse.
pub fn parse_record(text: &str) -> Result<(String, Value), ProtocolError> {
	let colon = text
		.find(':')
		.ok_or_else(|| ProtocolError::InvalidFormat("record missing ':' separator".to_string()))?;
	let (key_part, value_part) = text.split_at(colon);
	let value_part = &value_part[1..];

	let key = strip_quotes(key_part.trim());
	if key.is_empty() {
		return Err(ProtocolError::InvalidFormat("record key is empty".to_string()));
	}

	let value = parse_value(value_part.trim())?;
	Ok((key.to_string(), value))
}

/// Parses a bare `VALUE` (no surrounding `"key" :`).
pub fn parse_value(text: &str) -> Result<Value, ProtocolError> {
	let mut cursor = Cursor::new(text);
	let value = cursor.parse_value()?;
	cursor.skip_whitespace();
	if !cursor.is_empty() {
		return Err(ProtocolError::InvalidFormat(format!(
			"trailing characters after value: {:?}",
			cursor.remaining()
		)));
	}
	Ok(value)
}

/// Encodes a full record as `"top_key" : VALUE`.
pub fn emit_record(key: &str, value: &Value) -> String {
	format!("\"{}\" : {}", key, emit_value(value))
}

/// Encodes a bare `VALUE` in the wire grammar.
pub fn emit_value(value: &Value) -> String {
	match value {
		Value::String(s) => format!("\"{}\"", s),
		Value::Int(i) => i.to_string(),
		Value::Float(f) => format!("{:.2}", f),
		Value::Object(members) => {
			if members.is_empty() {
				return "{}".to_string();
			}
			let mut out = String::from("{ ");
			for (i, (k, v)) in members.iter().enumerate() {
				if i > 0 {
					out.push_str(" ; ");
				}
				let _ = write!(out, "\"{}\" : {}", k, emit_value(v));
			}
			out.push_str(" }");
			out
		},
	}
}

fn strip_quotes(s: &str) -> &str {
	s.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(s)
}

/// Minimal recursive-descent parser over the `VALUE` grammar. Not a general JSON parser: the
/// admitted grammar is narrower (no string escaping, `;` member separator, fixed two-digit decimals
/// are tolerated but not required on parse) and this keeps the int/float distinction explicit
/// rather than inferred from a third-party `Number` type.
struct Cursor<'a> {
	text: &'a str,
	pos: usize,
}

impl<'a> Cursor<'a> {
	fn new(text: &'a str) -> Self {
		Self { text, pos: 0 }
	}

	fn remaining(&self) -> &'a str {
		&self.text[self.pos..]
	}

	fn is_empty(&self) -> bool {
		self.remaining().is_empty()
	}

	fn skip_whitespace(&mut self) {
		let skip = self.remaining().chars().take_while(|c| c.is_whitespace()).map(|c| c.len_utf8()).sum::<usize>();
		self.pos += skip;
	}

	fn peek(&self) -> Option<char> {
		self.remaining().chars().next()
	}

	fn bump(&mut self) -> Option<char> {
		let c = self.peek()?;
		self.pos += c.len_utf8();
		Some(c)
	}

	fn expect(&mut self, expected: char) -> Result<(), ProtocolError> {
		match self.bump() {
			Some(c) if c == expected => Ok(()),
			Some(c) => Err(ProtocolError::InvalidFormat(format!(
				"expected '{}', found '{}'",
				expected, c
			))),
			None => Err(ProtocolError::InvalidFormat(format!(
				"expected '{}', found end of input",
				expected
			))),
		}
	}

	fn parse_value(&mut self) -> Result<Value, ProtocolError> {
		self.skip_whitespace();
		match self.peek() {
			Some('"') => self.parse_string(),
			Some('{') => self.parse_object(),
			Some(c) if c.is_ascii_digit() || c == '-' => self.parse_number(),
			Some(c) => {
				Err(ProtocolError::InvalidFormat(format!("unexpected character '{}' in value", c)))
			},
			None => Err(ProtocolError::InvalidFormat("unexpected end of input in value".to_string())),
		}
	}

	fn parse_string(&mut self) -> Result<Value, ProtocolError> {
		self.expect('"')?;
		let start = self.pos;
		loop {
			match self.bump() {
				Some('"') => {
					let s = &self.text[start..self.pos - 1];
					return Ok(Value::String(s.to_string()));
				},
				Some(_) => continue,
				None => {
					return Err(ProtocolError::InvalidFormat("unterminated quoted string".to_string()))
				},
			}
		}
	}

	fn parse_number(&mut self) -> Result<Value, ProtocolError> {
		let start = self.pos;
		if self.peek() == Some('-') {
			self.bump();
		}
		let mut saw_dot = false;
		loop {
			match self.peek() {
				Some(c) if c.is_ascii_digit() => {
					self.bump();
				},
				Some('.') if !saw_dot => {
					saw_dot = true;
					self.bump();
				},
				_ => break,
			}
		}
		let literal = &self.text[start..self.pos];
		if saw_dot {
			literal
				.parse::<f64>()
				.map(Value::Float)
				.map_err(|_| ProtocolError::InvalidFormat(format!("invalid float literal '{}'", literal)))
		} else {
			literal
				.parse::<i64>()
				.map(Value::Int)
				.map_err(|_| ProtocolError::InvalidFormat(format!("invalid integer literal '{}'", literal)))
		}
	}

	fn parse_object(&mut self) -> Result<Value, ProtocolError> {
		self.expect('{')?;
		self.skip_whitespace();
		let mut members = BTreeMap::new();
		if self.peek() == Some('}') {
			self.bump();
			return Ok(Value::Object(members));
		}
		loop {
			self.skip_whitespace();
			let key = match self.parse_string()? {
				Value::String(s) => s,
				_ => unreachable!("parse_string always returns Value::String"),
			};
			self.skip_whitespace();
			self.expect(':')?;
			let value = self.parse_value()?;
			members.insert(key, value);

			self.skip_whitespace();
			match self.bump() {
				Some(';') => continue,
				Some('}') => break,
				Some(c) => {
					return Err(ProtocolError::InvalidFormat(format!(
						"expected ';' or '}}' in object, found '{}'",
						c
					)))
				},
				None => {
					return Err(ProtocolError::InvalidFormat("unterminated object".to_string()))
				},
			}
		}
		Ok(Value::Object(members))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_scalar_values() {
		assert_eq!(parse_value("\"abc123\"").unwrap(), Value::String("abc123".to_string()));
		assert_eq!(parse_value("42").unwrap(), Value::Int(42));
		assert_eq!(parse_value("3.14").unwrap(), Value::Float(3.14));
	}

	#[test]
	fn parses_empty_object() {
		assert_eq!(parse_value("{}").unwrap(), Value::Object(BTreeMap::new()));
		assert_eq!(parse_value("{ }").unwrap(), Value::Object(BTreeMap::new()));
	}

	#[test]
	fn parses_nested_object() {
		let value = parse_value("{ \"x\" : 1 ; \"y\" : { \"z\" : \"hi\" } }").unwrap();
		let Value::Object(top) = &value else { panic!("expected object") };
		assert_eq!(top.get("x"), Some(&Value::Int(1)));
		let Some(Value::Object(inner)) = top.get("y") else { panic!("expected nested object") };
		assert_eq!(inner.get("z"), Some(&Value::String("hi".to_string())));
	}

	#[test]
	fn parses_full_record() {
		let (key, value) = parse_record("\"a\" : 5").unwrap();
		assert_eq!(key, "a");
		assert_eq!(value, Value::Int(5));
	}

	#[test]
	fn round_trips_through_emit_and_parse() {
		let mut members = BTreeMap::new();
		members.insert("x".to_string(), Value::Int(1));
		let mut nested = BTreeMap::new();
		nested.insert("z".to_string(), Value::String("hi".to_string()));
		members.insert("y".to_string(), Value::Object(nested));
		let value = Value::Object(members);

		let text = emit_value(&value);
		let parsed = parse_value(&text).unwrap();
		assert_eq!(parsed, value);
	}

	#[test]
	fn missing_colon_is_invalid_format() {
		assert!(matches!(parse_record("\"a\" 5"), Err(ProtocolError::InvalidFormat(_))));
	}

	#[test]
	fn empty_key_is_invalid_format() {
		assert!(matches!(parse_record("\"\" : 5"), Err(ProtocolError::InvalidFormat(_))));
	}

	#[test]
	fn trailing_garbage_is_invalid_format() {
		assert!(matches!(parse_value("5 6"), Err(ProtocolError::InvalidFormat(_))));
	}
}
