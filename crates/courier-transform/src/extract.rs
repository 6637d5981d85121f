//! JSON top-level field extraction.
//!
//! Replaces an event body with the string value stored under one configured
//! top-level field of a JSON object, dropping every event that does not match
//! that shape. The walk is a single forward pass over the token stream driven
//! through [`serde::de::DeserializeSeed`]; nested values are skipped with
//! [`IgnoredAny`] so no document tree is ever built and a nested occurrence
//! of the wanted name is never mistaken for a top-level field.

use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use thiserror::Error;
use tracing::{debug, warn};

use courier_core::{Event, Transform};

/// Construction-time failures for transforms.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A required configuration value is missing or unusable.
    #[error("invalid transform configuration: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },
}

impl TransformError {
    /// Creates a configuration error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }
}

/// Extracts a single top-level string field from a JSON event body.
///
/// The original body is discarded and replaced with the extracted value's
/// raw text (no JSON quoting). Events with invalid JSON, a non-object top
/// level, a missing field, or a non-string value under the field are dropped.
/// Headers travel through untouched.
#[derive(Debug, Clone)]
pub struct JsonFieldExtractor {
    field: String,
}

impl JsonFieldExtractor {
    /// Creates an extractor for the given top-level field name.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Config`] if the field name is empty; the
    /// field is required configuration and cannot be defaulted.
    pub fn new(field: impl Into<String>) -> Result<Self, TransformError> {
        let field = field.into();
        if field.is_empty() {
            return Err(TransformError::config("extraction field name must not be empty"));
        }
        Ok(Self { field })
    }

    /// Returns the configured field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Applies the extraction to one event.
    ///
    /// Returns the transformed event on a match, or `None` to drop the event.
    /// Parse and shape failures never escape; they are logged and become a
    /// drop decision.
    pub fn extract(&self, mut event: Event) -> Option<Event> {
        if event.is_empty() {
            debug!("discarding event with empty body");
            return None;
        }

        match capture_field(event.body(), &self.field) {
            Ok(Capture::Text(value)) => {
                event.set_body(value.into_bytes());
                Some(event)
            },
            Ok(Capture::NonString) => {
                warn!(field = %self.field, "discarding event with non-string property value");
                None
            },
            Ok(Capture::NoMatch) => {
                debug!(field = %self.field, "field not present at top level, dropping event");
                None
            },
            Err(error) => {
                warn!(%error, "discarding event with invalid JSON formatting");
                None
            },
        }
    }
}

impl Transform for JsonFieldExtractor {
    fn apply(&self, event: Event) -> Option<Event> {
        self.extract(event)
    }
}

/// Result of walking the top-level object for the wanted field.
enum Capture {
    /// The field was present with a string value.
    Text(String),
    /// The field was present but held an array, object, number, boolean, or
    /// null. Terminal for the event.
    NonString,
    /// The top-level object ended without the field appearing.
    NoMatch,
}

/// Runs the streaming walk over a JSON body.
///
/// Bytes after the closing brace of the top-level object are never inspected,
/// matching the early-exit behavior of the walk.
fn capture_field(body: &[u8], field: &str) -> Result<Capture, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    FieldSeed { field }.deserialize(&mut deserializer)
}

struct FieldSeed<'a> {
    field: &'a str,
}

impl<'de> DeserializeSeed<'de> for FieldSeed<'_> {
    type Value = Capture;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for FieldSeed<'_> {
    type Value = Capture;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a JSON object with top-level fields")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while let Some(key) = map.next_key::<String>()? {
            if key == self.field {
                let capture = map.next_value_seed(StringValue)?;
                // First top-level match wins; the remaining entries are
                // skipped through the tokenizer so the map access is left in
                // a consistent state, never materialized or consulted.
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                return Ok(capture);
            }
            map.next_value::<IgnoredAny>()?;
        }
        Ok(Capture::NoMatch)
    }
}

/// Accepts a string value and classifies everything else as [`Capture::NonString`].
///
/// Array and object values are drained through [`IgnoredAny`] so the outer
/// walk stays positioned on the token stream.
struct StringValue;

impl<'de> DeserializeSeed<'de> for StringValue {
    type Value = Capture;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for StringValue {
    type Value = Capture;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a JSON value")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Capture::Text(value.to_owned()))
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Capture::Text(value))
    }

    fn visit_bool<E>(self, _: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Capture::NonString)
    }

    fn visit_i64<E>(self, _: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Capture::NonString)
    }

    fn visit_u64<E>(self, _: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Capture::NonString)
    }

    fn visit_f64<E>(self, _: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Capture::NonString)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Capture::NonString)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Capture::NonString)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Capture::NonString)
    }
}
