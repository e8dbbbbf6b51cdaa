// Dispatcher: turns one named invocation plus arguments into one API call
// and maps the outcome back into a structured result.

use crate::catalog::{BodyRule, Catalog, OperationDescriptor};
use anyhow::Result;
use coolify_client::config::{ENV_API_TOKEN, ENV_BASE_URL};
use coolify_client::{ApiTransport, ClientError, Method};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Classified invocation failures, returned as values to the caller.
///
/// Anything outside these kinds (unreachable host, malformed response)
/// propagates as an error so the host reports it as a protocol fault
/// rather than a tool result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport configuration was never established.
    NotConfigured,
    /// Operation name not present in the catalog.
    UnknownOperation,
    /// A required argument was omitted.
    InvalidArguments,
    /// The upstream API responded with a failure.
    RemoteError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotConfigured => "not configured",
            Self::UnknownOperation => "unknown operation",
            Self::InvalidArguments => "invalid arguments",
            Self::RemoteError => "remote error",
        };
        f.write_str(s)
    }
}

/// Outcome of one invocation: a JSON payload or a classified failure,
/// never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationResult {
    Success { payload: String },
    Failure { kind: ErrorKind, message: String },
}

impl InvocationResult {
    fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }
}

/// Translates invocations into transport calls.
///
/// Stateless apart from the immutable catalog and the shared transport,
/// so concurrent invocations need no coordination. Every call is one
/// independent round trip: no retries, no caching, no pre/post-condition
/// checks on start/stop/restart sequencing.
pub struct Dispatcher {
    catalog: Catalog,
    transport: Option<Arc<dyn ApiTransport>>,
}

impl Dispatcher {
    /// Create a dispatcher backed by the given transport.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            catalog: Catalog::new(),
            transport: Some(transport),
        }
    }

    /// Create a dispatcher with no transport; every invocation fails
    /// closed with [`ErrorKind::NotConfigured`].
    pub fn unconfigured() -> Self {
        Self {
            catalog: Catalog::new(),
            transport: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Execute one operation.
    ///
    /// Classified failures come back as [`InvocationResult::Failure`];
    /// only unclassified faults use the `Err` channel.
    pub async fn invoke(&self, name: &str, arguments: Value) -> Result<InvocationResult> {
        let Some(transport) = &self.transport else {
            return Ok(InvocationResult::failure(
                ErrorKind::NotConfigured,
                format!(
                    "Coolify API is not configured: set {} and {}",
                    ENV_BASE_URL, ENV_API_TOKEN
                ),
            ));
        };

        let Some(op) = self.catalog.lookup(name) else {
            return Ok(InvocationResult::failure(
                ErrorKind::UnknownOperation,
                format!("unknown operation: {}", name),
            ));
        };

        let args = arguments.as_object().cloned().unwrap_or_default();

        // Fail on the first missing required argument, in declaration order.
        for required in op.required_args() {
            if !is_present(&args, required) {
                return Ok(InvocationResult::failure(
                    ErrorKind::InvalidArguments,
                    format!("{} is required", required),
                ));
            }
        }

        let path = resolve_path(op.path, &args);
        let body = request_body(op, &args);

        debug!(operation = name, method = %op.method, path = %path, "dispatching");

        match transport.send(op.method, &path, body.as_ref()).await {
            Ok(payload) => Ok(InvocationResult::Success {
                payload: serde_json::to_string_pretty(&payload)?,
            }),
            Err(ClientError::Api { message, .. }) => {
                Ok(InvocationResult::failure(ErrorKind::RemoteError, message))
            }
            Err(other) => Err(other.into()),
        }
    }
}

/// A required argument must be present and not an explicit null.
fn is_present(args: &Map<String, Value>, name: &str) -> bool {
    args.get(name).is_some_and(|value| !value.is_null())
}

/// Substitute every `{placeholder}` with the matching argument's value.
fn resolve_path(template: &str, args: &Map<String, Value>) -> String {
    let mut path = template.to_string();
    for (name, value) in args {
        let token = format!("{{{}}}", name);
        if path.contains(&token) {
            path = path.replace(&token, &path_segment(value));
        }
    }
    path
}

fn path_segment(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// GET operations carry no body; POST bodies follow the descriptor's rule.
fn request_body(op: &OperationDescriptor, args: &Map<String, Value>) -> Option<Value> {
    match op.method {
        Method::Get => None,
        Method::Post => Some(match op.body {
            BodyRule::FullArguments => Value::Object(args.clone()),
            BodyRule::Fields(fields) => {
                let mut body = Map::new();
                for field in fields {
                    if let Some(value) = args.get(*field) {
                        body.insert((*field).to_string(), value.clone());
                    }
                }
                Value::Object(body)
            }
        }),
    }
}
