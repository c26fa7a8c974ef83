//! Dynamic JSON documents.
//!
//! `null` is an absent value, arrays are sequences and objects are maps, so
//! key order in the source document never affects the digest. Numbers hash
//! as `i64` when they fit, then `u64`, then `f64`; `1` and `1.0` differ.

use serde_json::{Map, Number, Value};

use crate::error::DeepHashError;
use crate::visitor::{DeepHash, Visitor};

impl DeepHash for Number {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        if let Some(n) = self.as_i64() {
            visitor.visit(&n, path)
        } else if let Some(n) = self.as_u64() {
            visitor.visit(&n, path)
        } else if let Some(n) = self.as_f64() {
            visitor.visit(&n, path)
        } else {
            Ok(())
        }
    }

    fn key_label(&self) -> String {
        self.to_string()
    }
}

impl DeepHash for Map<String, Value> {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.map(path, self)
    }
}

impl DeepHash for Value {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => visitor.visit(b, path),
            Value::Number(n) => visitor.visit(n, path),
            Value::String(s) => visitor.visit(s, path),
            Value::Array(items) => visitor.visit(items, path),
            Value::Object(map) => visitor.visit(map, path),
        }
    }

    fn key_label(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
