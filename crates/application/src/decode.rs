//! Decode targets for response bodies.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A caller-owned value the response body is decoded into.
///
/// Implemented for every type that can be deserialized from and serialized
/// back to JSON; the serialized form is what a [`Schema`] inspects.
///
/// [`Schema`]: supertest_domain::Schema
pub trait DecodeTarget {
    /// Merges the JSON in `body` into the current value.
    ///
    /// Keys present in the body overwrite the matching fields (recursively
    /// for nested objects); fields the body leaves out keep their current
    /// value.
    ///
    /// # Errors
    ///
    /// Returns the codec error for malformed or type-mismatched input; the
    /// current value is left untouched in that case.
    fn decode_json(&mut self, body: &[u8]) -> Result<(), serde_json::Error>;

    /// Renders the current value as JSON.
    ///
    /// # Errors
    ///
    /// Returns the codec error if the value cannot be serialized.
    fn to_json(&self) -> Result<Value, serde_json::Error>;
}

impl<T> DecodeTarget for T
where
    T: DeserializeOwned + Serialize,
{
    fn decode_json(&mut self, body: &[u8]) -> Result<(), serde_json::Error> {
        let incoming: Value = serde_json::from_slice(body)?;
        let mut merged = serde_json::to_value(&*self)?;
        overlay(&mut merged, incoming);
        *self = serde_json::from_value(merged)?;
        Ok(())
    }

    fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Writes `incoming` over `base`, descending into objects present on both sides.
fn overlay(base: &mut Value, incoming: Value) {
    match (base, incoming) {
        (Value::Object(base), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match base.get_mut(&key) {
                    Some(existing) => overlay(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, incoming) => *base = incoming,
    }
}
