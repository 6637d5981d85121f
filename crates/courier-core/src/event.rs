//! Event payload moving through the pipeline.

use std::collections::HashMap;

use bytes::Bytes;

/// A unit of data moving through the pipeline.
///
/// An event is an opaque byte payload plus optional string-keyed header
/// metadata. The body is produced by an upstream source, possibly replaced by
/// a transform, and finally consumed by a sink. Headers travel with the event
/// untouched by transforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    body: Bytes,
    headers: HashMap<String, String>,
}

impl Event {
    /// Creates an event from a body with no headers.
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self { body: body.into(), headers: HashMap::new() }
    }

    /// Creates an event with both body and headers.
    pub fn with_headers(body: impl Into<Bytes>, headers: HashMap<String, String>) -> Self {
        Self { body: body.into(), headers }
    }

    /// Returns the event body.
    ///
    /// `Bytes` clones are reference-counted, so callers can hold onto the
    /// body cheaply.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Replaces the event body in place, keeping headers.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    /// Returns true if the body holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Looks up a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Sets a header, replacing any previous value under the same name.
    pub fn insert_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Returns all headers.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}
