//! Turning raw JSON objects into typed entities.
//!
//! # Design
//! Each entity lists its attributes explicitly in `Hydrate::assign`, reading
//! every key through `Attributes::read` into a field of a declared type. The
//! field's `Coerce` impl decides what the raw value may look like. This
//! gives the API's forgiving semantics without a derive:
//!
//! - missing keys leave the field at its zero value,
//! - unknown keys are ignored,
//! - `null` resets the field to its zero value,
//! - a value of the wrong shape fails with `ApiError::Hydration`, naming
//!   the full path to the field (`accounts[0].id`).
//!
//! Hydration is all-or-nothing: `refresh` stages the changes on a copy and
//! only commits them when every attribute coerced.

use serde_json::{Map, Value};

use crate::error::ApiError;

const ROOT: &str = "<root>";

pub trait Hydrate: Default + Clone {
    /// Overwrite the attributes present in `attrs`.
    fn assign(&mut self, attrs: &Attributes<'_>) -> Result<(), ApiError>;

    /// Build a fresh entity from a raw JSON object.
    fn hydrate(raw: &Value) -> Result<Self, ApiError> {
        build(raw).map_err(at_root)
    }

    /// Overwrite, in place, only the attributes present in `raw`.
    fn refresh(&mut self, raw: &Value) -> Result<(), ApiError> {
        let attrs = Attributes::new(raw)?;
        let mut staged = self.clone();
        staged.assign(&attrs)?;
        *self = staged;
        Ok(())
    }
}

/// Read-only view over a raw JSON object.
#[derive(Debug, Clone, Copy)]
pub struct Attributes<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Attributes<'a> {
    pub fn new(raw: &'a Value) -> Result<Self, ApiError> {
        match raw {
            Value::Object(map) => Ok(Self { map }),
            other => Err(at_root(mismatch("object", other))),
        }
    }

    /// Assign the nested object under `key` onto `target`, if present.
    pub fn read_into<T: Hydrate>(&self, key: &str, target: &mut T) -> Result<(), ApiError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(()),
            Some(value) => {
                let nested = Attributes::new(value).map_err(|e| nest(e, key))?;
                target.assign(&nested).map_err(|e| nest(e, key))
            }
        }
    }

    /// Coerce `key` into `slot` if present.
    pub fn read<T: Coerce>(&self, key: &str, slot: &mut T) -> Result<(), ApiError> {
        match self.map.get(key) {
            None => Ok(()),
            Some(Value::Null) => {
                *slot = T::default();
                Ok(())
            }
            Some(value) => {
                *slot = T::coerce(value).map_err(|e| nest(e, key))?;
                Ok(())
            }
        }
    }
}

/// Conversion of one raw JSON value into an attribute type.
pub trait Coerce: Sized + Default {
    fn coerce(value: &Value) -> Result<Self, ApiError>;
}

impl Coerce for i64 {
    fn coerce(value: &Value) -> Result<Self, ApiError> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64).map(|f| f as i64))
                .ok_or_else(|| mismatch("integer", value)),
            Value::String(s) => s.trim().parse().map_err(|_| mismatch("integer", value)),
            other => Err(mismatch("integer", other)),
        }
    }
}

impl Coerce for String {
    fn coerce(value: &Value) -> Result<Self, ApiError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(mismatch("string", other)),
        }
    }
}

impl Coerce for bool {
    fn coerce(value: &Value) -> Result<Self, ApiError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) if s == "true" => Ok(true),
            Value::String(s) if s == "false" => Ok(false),
            other => Err(mismatch("boolean", other)),
        }
    }
}

impl Coerce for Option<String> {
    fn coerce(value: &Value) -> Result<Self, ApiError> {
        String::coerce(value).map(Some)
    }
}

impl<T: Hydrate> Coerce for Vec<T> {
    fn coerce(value: &Value) -> Result<Self, ApiError> {
        match value {
            Value::Array(items) => hydrate_items(items),
            other => Err(mismatch("array", other)),
        }
    }
}

/// The object under `key` when the response wraps its entity
/// (`{"user": {...}}`), otherwise `raw` itself.
pub fn unwrap_entity<'a>(raw: &'a Value, key: &str) -> &'a Value {
    match raw.get(key) {
        Some(inner @ Value::Object(_)) => inner,
        _ => raw,
    }
}

/// Hydrate a collection response that is either a bare array or an object
/// holding the array under `key`. A missing or null `key` is an empty list.
pub fn hydrate_collection<T: Hydrate>(raw: &Value, key: &str) -> Result<Vec<T>, ApiError> {
    match raw {
        Value::Array(items) => hydrate_items(items).map_err(at_root),
        Value::Object(map) => match map.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => hydrate_items(items).map_err(|e| nest(e, key)),
            Some(other) => Err(nest(mismatch("array", other), key)),
        },
        other => Err(at_root(mismatch("array", other))),
    }
}

fn build<T: Hydrate>(raw: &Value) -> Result<T, ApiError> {
    let attrs = Attributes::new(raw)?;
    let mut entity = T::default();
    entity.assign(&attrs)?;
    Ok(entity)
}

fn hydrate_items<T: Hydrate>(items: &[Value]) -> Result<Vec<T>, ApiError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| build(item).map_err(|e| nest(e, &format!("[{i}]"))))
        .collect()
}

fn mismatch(expected_type: &'static str, value: &Value) -> ApiError {
    ApiError::Hydration {
        field: String::new(),
        expected_type,
        actual_value: value.to_string(),
    }
}

/// Prefix the field path of a hydration error with `segment`.
fn nest(err: ApiError, segment: &str) -> ApiError {
    match err {
        ApiError::Hydration {
            field,
            expected_type,
            actual_value,
        } => {
            let field = if field.is_empty() || field == ROOT {
                segment.to_string()
            } else if field.starts_with('[') {
                format!("{segment}{field}")
            } else {
                format!("{segment}.{field}")
            };
            ApiError::Hydration {
                field,
                expected_type,
                actual_value,
            }
        }
        other => other,
    }
}

fn at_root(err: ApiError) -> ApiError {
    match err {
        ApiError::Hydration {
            field,
            expected_type,
            actual_value,
        } if field.is_empty() => ApiError::Hydration {
            field: ROOT.to_string(),
            expected_type,
            actual_value,
        },
        other => other,
    }
}
