//! The boundary between the reconciler and the API server.

use super::resource::ResourceRef;
use crate::value::Value;
use std::fmt;
use thiserror::Error;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// Whether a request addresses the kind's collection or one named object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Collection,
    Object,
}

/// Patch body formats and their content types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PatchKind {
    #[default]
    StrategicMerge,
    Merge,
    Json,
}

impl PatchKind {
    pub fn content_type(&self) -> &'static str {
        match self {
            PatchKind::StrategicMerge => "application/strategic-merge-patch+json",
            PatchKind::Merge => "application/merge-patch+json",
            PatchKind::Json => "application/json-patch+json",
        }
    }
}

/// Request is one call to the API server.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub resource: ResourceRef,
    pub scope: Scope,
    pub body: Option<Value>,
    pub patch_kind: Option<PatchKind>,
}

impl Request {
    pub fn new(method: Method, resource: ResourceRef, scope: Scope) -> Self {
        Request {
            method,
            resource,
            scope,
            body: None,
            patch_kind: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_patch_kind(mut self, kind: PatchKind) -> Self {
        self.patch_kind = Some(kind);
        self
    }
}

/// Response is the status code and decoded body returned by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    pub fn new(status: u16, body: Value) -> Self {
        Response { status, body }
    }

    /// The `message` of a `Status` body, if the server sent one.
    pub fn message(&self) -> Option<&str> {
        self.body.lookup(&["message"]).and_then(Value::as_str)
    }
}

/// TransportError is a failure to exchange a request with the server at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        TransportError {
            message: message.into(),
        }
    }
}

/// Transport sends requests to the API server.
///
/// Implementations own the session, credentials and resource discovery; they
/// report every HTTP status back in the [`Response`] and only fail for
/// connection-level problems.
pub trait Transport {
    fn request(&self, request: Request) -> Result<Response, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn request(&self, request: Request) -> Result<Response, TransportError> {
        (**self).request(request)
    }
}
