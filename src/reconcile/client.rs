//! Create, update and delete workflows over a [`Transport`].

use super::resource::{ResourceError, ResourceRef, DEFAULT_NAMESPACE};
use super::transport::{Method, PatchKind, Request, Response, Scope, Transport, TransportError};
use crate::patch::{form_patch, MergeMode, PatchError};
use crate::value::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, instrument, Span};

/// ClientError represents a failed workflow operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("cannot form patch: {0}")]
    Patch(#[from] PatchError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("error from server ({status}) for {method} {resource}: {message}")]
    Request {
        status: u16,
        method: Method,
        resource: String,
        message: String,
    },
}

/// Outcome of an ensure or update operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Body of the last server response.
    pub response: Value,
    /// Whether the server object was modified.
    pub changed: bool,
}

impl Outcome {
    fn changed(response: Value) -> Self {
        Outcome { response, changed: true }
    }

    fn unchanged(response: Value) -> Self {
        Outcome { response, changed: false }
    }
}

/// ClientBuilder is a builder for creating a Client.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    merge_mode: MergeMode,
    default_namespace: String,
    patch_kind: PatchKind,
    ensure_namespace: bool,
    scale_before_delete: Vec<String>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        ClientBuilder {
            merge_mode: MergeMode::default(),
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            patch_kind: PatchKind::default(),
            ensure_namespace: false,
            scale_before_delete: vec!["ReplicationController".to_string()],
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        ClientBuilder::default()
    }

    /// Sets how list fields are patched on update.
    pub fn merge_mode(mut self, mode: MergeMode) -> Self {
        self.merge_mode = mode;
        self
    }

    /// Sets the namespace used for resources that do not name a valid one.
    pub fn default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = namespace.into();
        self
    }

    /// Sets the content type used when sending update patches.
    pub fn patch_kind(mut self, kind: PatchKind) -> Self {
        self.patch_kind = kind;
        self
    }

    /// Makes `ensure_present` create the resource's namespace first.
    pub fn ensure_namespace(mut self, value: bool) -> Self {
        self.ensure_namespace = value;
        self
    }

    /// Sets the kinds that are scaled to zero replicas before deletion.
    pub fn scale_before_delete<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scale_before_delete = kinds.into_iter().map(Into::into).collect();
        self
    }

    /// Builds the Client around `transport`.
    pub fn build<T: Transport>(self, transport: T) -> Client<T> {
        Client {
            transport,
            merge_mode: self.merge_mode,
            default_namespace: self.default_namespace,
            patch_kind: self.patch_kind,
            ensure_namespace: self.ensure_namespace,
            scale_before_delete: self.scale_before_delete,
        }
    }
}

/// Client runs reconciliation workflows against one API server.
pub struct Client<T> {
    transport: T,
    merge_mode: MergeMode,
    default_namespace: String,
    patch_kind: PatchKind,
    ensure_namespace: bool,
    scale_before_delete: Vec<String>,
}

impl<T: Transport> Client<T> {
    /// Creates a Client with the default configuration.
    pub fn new(transport: T) -> Self {
        ClientBuilder::new().build(transport)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn merge_mode(&self) -> MergeMode {
        self.merge_mode
    }

    fn resource(&self, obj: &Value) -> Result<ResourceRef, ClientError> {
        Ok(ResourceRef::from_object(obj, &self.default_namespace)?)
    }

    /// Sends a request and interprets its status code.
    ///
    /// 200 and 201 succeed, as do 409 for a POST and 404 for a DELETE, which
    /// callers inspect themselves. Every other status is an error.
    fn send(&self, request: Request) -> Result<Response, ClientError> {
        let method = request.method;
        let resource = request.resource.to_string();
        debug!(%method, %resource, body = request.body.is_some(), "sending request");

        let response = self.transport.request(request)?;
        debug!(%method, %resource, status = response.status, "received response");

        match (response.status, method) {
            (200 | 201, _) | (409, Method::Post) | (404, Method::Delete) => Ok(response),
            (status, _) => Err(ClientError::Request {
                status,
                method,
                resource,
                message: response.message().unwrap_or("no message").to_string(),
            }),
        }
    }

    /// Creates `obj`. A 409 response is returned, not raised.
    pub fn create(&self, obj: &Value) -> Result<Response, ClientError> {
        let resource = self.resource(obj)?;
        let request = Request::new(Method::Post, resource, Scope::Collection).with_body(obj.clone());
        self.send(request)
    }

    /// Fetches the server's copy of `obj`.
    pub fn get(&self, obj: &Value) -> Result<Value, ClientError> {
        let resource = self.resource(obj)?;
        Ok(self.send(Request::new(Method::Get, resource, Scope::Object))?.body)
    }

    /// Deletes `obj`, first scaling it to zero if its kind requires that.
    ///
    /// A 404 response is returned, not raised.
    pub fn delete(&self, obj: &Value) -> Result<Response, ClientError> {
        let resource = self.resource(obj)?;
        if self.scale_before_delete.contains(&resource.kind) {
            self.scale(obj, 0)?;
        }
        let response = self.send(Request::new(Method::Delete, resource.clone(), Scope::Object))?;
        info!(%resource, "deleted");
        Ok(response)
    }

    /// Replaces the server object with `obj` as a whole.
    pub fn replace(&self, obj: &Value) -> Result<Value, ClientError> {
        let resource = self.resource(obj)?;
        let request = Request::new(Method::Put, resource.clone(), Scope::Object).with_body(obj.clone());
        let response = self.send(request)?;
        info!(%resource, "replaced");
        Ok(response.body)
    }

    /// Sends `patch` for the object identified by `obj`.
    pub fn modify(&self, obj: &Value, patch: &Value) -> Result<Value, ClientError> {
        let resource = self.resource(obj)?;
        let request = Request::new(Method::Patch, resource.clone(), Scope::Object)
            .with_body(patch.clone())
            .with_patch_kind(self.patch_kind);
        let response = self.send(request)?;
        info!(%resource, "modified");
        Ok(response.body)
    }

    /// Sets `spec.replicas` of the server object through a JSON patch.
    pub fn scale(&self, obj: &Value, replicas: i64) -> Result<Value, ClientError> {
        let resource = self.resource(obj)?;
        let mut op = Map::new();
        op.set("op", Value::from("replace"));
        op.set("path", Value::from("/spec/replicas"));
        op.set("value", Value::Int(replicas));
        let request = Request::new(Method::Patch, resource.clone(), Scope::Object)
            .with_body(Value::List(vec![Value::Map(op)]))
            .with_patch_kind(PatchKind::Json);
        let response = self.send(request)?;
        info!(%resource, replicas, "scaled");
        Ok(response.body)
    }

    /// Patches the server object toward `obj`, skipping the request when the
    /// two already match.
    #[instrument(skip_all, fields(resource))]
    pub fn update(&self, obj: &Value) -> Result<Outcome, ClientError> {
        let resource = self.resource(obj)?;
        Span::current().record("resource", tracing::field::display(&resource));

        let server = self.get(obj)?;
        let patch = form_patch(obj, &server, self.merge_mode)?;
        if patch.is_empty_patch() {
            info!("matches what was requested");
            return Ok(Outcome::unchanged(server));
        }

        debug!(patch = ?patch, "patch constructed");
        Ok(Outcome::changed(self.modify(obj, &patch)?))
    }

    /// Creates `obj`, or updates the existing object if one already exists.
    #[instrument(skip_all, fields(resource))]
    pub fn ensure_present(&self, obj: &Value) -> Result<Outcome, ClientError> {
        let resource = self.resource(obj)?;
        Span::current().record("resource", tracing::field::display(&resource));

        if self.ensure_namespace && resource.kind != "Namespace" {
            self.ensure_present(&namespace_object(&resource.namespace))?;
        }

        let response = self.create(obj)?;
        if response.status == 409 {
            info!("object with same name already exists");
            return self.update(obj);
        }

        info!("created");
        Ok(Outcome::changed(response.body))
    }

    /// Deletes `obj`; an object that is already gone is not an error.
    #[instrument(skip_all, fields(resource))]
    pub fn ensure_absent(&self, obj: &Value) -> Result<Outcome, ClientError> {
        let resource = self.resource(obj)?;
        Span::current().record("resource", tracing::field::display(&resource));

        let response = self.send(Request::new(Method::Delete, resource, Scope::Object))?;
        if response.status == 404 {
            info!("already absent");
            return Ok(Outcome::unchanged(response.body));
        }

        info!("deleted");
        Ok(Outcome::changed(response.body))
    }
}

fn namespace_object(name: &str) -> Value {
    let mut metadata = Map::new();
    metadata.set("name", Value::from(name));

    let mut obj = Map::new();
    obj.set("apiVersion", Value::from("v1"));
    obj.set("kind", Value::from("Namespace"));
    obj.set("metadata", Value::Map(metadata));
    Value::Map(obj)
}
