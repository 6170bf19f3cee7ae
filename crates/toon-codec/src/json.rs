//! JSON bridge — converts between `serde_json::Value` and [`Document`].
//!
//! Only the JSON shapes that the flat TOON grammar can carry are accepted:
//! a top-level object whose values are booleans, integers, strings, arrays of
//! those, or arrays of objects holding those. Nulls, floats and deeper nesting
//! are rejected with [`ToonError::Encode`].

use serde_json::{Map, Value};

use crate::encoder::{encode_with, EncodeOptions};
use crate::error::{Result, ToonError};
use crate::types::{Document, Row, Scalar, ToonValue};

/// Encode a JSON string into TOON.
pub fn encode_json(json: &str, options: &EncodeOptions) -> Result<String> {
    let value: Value = serde_json::from_str(json)?;
    let doc = from_json(&value)?;
    encode_with(&doc, options)
}

/// Decode TOON into compact JSON text.
pub fn decode_to_json(toon: &str) -> Result<String> {
    let doc = crate::decoder::decode(toon)?;
    Ok(serde_json::to_string(&to_json(&doc))?)
}

/// Convert a document into a JSON object, preserving field order.
pub fn to_json(doc: &Document) -> Value {
    let mut map = Map::new();
    for (key, value) in doc.iter() {
        let json = match value {
            ToonValue::Scalar(s) => scalar_to_json(s),
            ToonValue::List(items) => Value::Array(items.iter().map(scalar_to_json).collect()),
            ToonValue::Table(rows) => Value::Array(rows.iter().map(row_to_json).collect()),
        };
        map.insert(key.to_string(), json);
    }
    Value::Object(map)
}

fn row_to_json(row: &Row) -> Value {
    Value::Object(
        row.iter()
            .map(|(k, v)| (k.to_string(), scalar_to_json(v)))
            .collect(),
    )
}

fn scalar_to_json(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Integer(n) => Value::Number((*n).into()),
        Scalar::Str(s) => Value::String(s.clone()),
    }
}

/// Convert a JSON object into a document.
///
/// Arrays are classified by their elements: all primitives → list, all
/// objects → table, empty → empty list. Mixed arrays are rejected.
pub fn from_json(value: &Value) -> Result<Document> {
    let Value::Object(map) = value else {
        return Err(ToonError::Encode(
            "top-level JSON value must be an object".to_string(),
        ));
    };

    let mut doc = Document::new();
    for (key, value) in map {
        let toon = match value {
            Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
                let rows = items
                    .iter()
                    .map(|item| json_to_row(key, item))
                    .collect::<Result<Vec<_>>>()?;
                ToonValue::Table(rows)
            }
            Value::Array(items) => {
                let list = items
                    .iter()
                    .map(|item| json_to_scalar(key, item))
                    .collect::<Result<Vec<_>>>()?;
                ToonValue::List(list)
            }
            other => ToonValue::Scalar(json_to_scalar(key, other)?),
        };
        doc.insert(key.clone(), toon);
    }
    Ok(doc)
}

fn json_to_row(key: &str, value: &Value) -> Result<Row> {
    let mut row = Row::new();
    if let Value::Object(map) = value {
        for (field, cell) in map {
            row.insert(field.clone(), json_to_scalar(&format!("{key}.{field}"), cell)?);
        }
    }
    Ok(row)
}

fn json_to_scalar(path: &str, value: &Value) -> Result<Scalar> {
    match value {
        Value::Bool(b) => Ok(Scalar::Bool(*b)),
        Value::String(s) => Ok(Scalar::Str(s.clone())),
        Value::Number(n) => n.as_i64().map(Scalar::Integer).ok_or_else(|| {
            ToonError::Encode(format!("`{path}`: only integers fitting in i64 are supported, got {n}"))
        }),
        Value::Null => Err(ToonError::Encode(format!("`{path}`: null has no TOON form"))),
        Value::Array(_) | Value::Object(_) => Err(ToonError::Encode(format!(
            "`{path}`: nesting deeper than one table level is not supported"
        ))),
    }
}
