//! Client-side proxies: callable stand-ins for remote functions.

use crate::envelope::{self, EnvelopeError, Fault};
use crate::params::{IntoParams, ParamsError};
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use std::future::Future;
use thiserror::Error;
use tracing::debug;

/// Boxed transport-level error, surfaced to proxy callers unmodified.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The caller-supplied primitive that physically carries one serialized
/// request and obtains one serialized response.
///
/// Any `Fn(String) -> impl Future<Output = Result<String, E>>` closure is a
/// transport, so wiring a proxy straight to an in-process dispatcher or to
/// whatever I/O the application already has is a one-liner.
pub trait Transport {
    fn send(&self, request: String) -> BoxFuture<'_, Result<String, BoxError>>;
}

impl<F, Fut, E> Transport for F
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<String, E>> + Send + 'static,
    E: Into<BoxError>,
{
    fn send(&self, request: String) -> BoxFuture<'_, Result<String, BoxError>> {
        let fut = (self)(request);
        Box::pin(async move { fut.await.map_err(Into::into) })
    }
}

/// Why a proxy call failed.
#[derive(Debug, Error)]
pub enum CallError {
    /// The arguments could not be serialized into JSON parameters.
    #[error("encoding parameters: {0}")]
    Params(#[from] ParamsError),

    /// The response payload was not a well-formed envelope.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// The server declared a failure; message and stack are its own.
    #[error(transparent)]
    Remote(#[from] Fault),

    /// The result value did not match the requested type.
    #[error("decoding result: {0}")]
    Decode(#[source] serde_json::Error),

    /// The transport itself failed. Carries the transport's original
    /// error, never re-wrapped into a [`Fault`].
    #[error("{0}")]
    Transport(BoxError),
}

/// A callable stand-in for one remote function, bound to a method name and
/// a transport.
///
/// Calls are independent; the proxy holds no per-call state, so one proxy
/// can serve any number of concurrent calls. Clone it (or the transport)
/// to fan out over several methods.
#[derive(Debug, Clone)]
pub struct Proxy<T> {
    transport: T,
    method: String,
}

impl<T> Proxy<T>
where
    T: Transport,
{
    pub fn new(transport: T, method: impl Into<String>) -> Self {
        Self {
            transport,
            method: method.into(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Calls the remote function.
    ///
    /// Resolves with the decoded result, or fails with the server-declared
    /// fault, a malformed-response error, or the transport's own error.
    /// Ask for [`serde_json::Value`] to get the result undecoded.
    pub async fn call<P, R>(&self, params: P) -> Result<R, CallError>
    where
        P: IntoParams,
        R: DeserializeOwned,
    {
        let params = params.into_params()?;
        let request = envelope::encode_request(&self.method, &params)?;
        debug!(method = %self.method, "sending request");
        let raw = self
            .transport
            .send(request)
            .await
            .map_err(CallError::Transport)?;
        let value = envelope::decode_response(&raw)?.into_outcome()?;
        serde_json::from_value(value).map_err(CallError::Decode)
    }
}
