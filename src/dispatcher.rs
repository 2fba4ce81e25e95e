//! Routes request envelopes to named handlers and encodes their outcomes.

use crate::envelope::{self, Fault};
use crate::params::FromParams;
use crate::RpcFunction;
use futures::future::BoxFuture;
use serde_json::Value;
use std::{collections::BTreeMap, sync::Arc};
use tracing::{debug, warn};

/// Maps method names to handlers and turns one complete request payload
/// into one response payload.
///
/// The registry is populated with [`insert`](Self::insert) up front and is
/// read-only once dispatching begins, so concurrent requests share it
/// without locking.
#[derive(Default)]
pub struct Dispatcher {
    handlers: BTreeMap<String, Arc<dyn DynamicHandler + Send + Sync>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `rfn` under `name`, replacing any previous handler with
    /// that name.
    pub fn insert<RFn>(&mut self, name: impl Into<String>, rfn: RFn)
    where
        RFn: RpcFunction + Send + Sync + 'static,
    {
        self.handlers
            .insert(name.into(), Arc::new(TypedHandler { rfn }));
    }

    /// Invokes a handler by name, normalizing every outcome into a single
    /// value-or-fault result.
    ///
    /// An unknown method is an expected outcome, reported as a fault whose
    /// message names the method.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, Fault> {
        let handler = self
            .handlers
            .get(method)
            .ok_or_else(|| Fault::new(format!("No such function: {method}")))?;
        handler.call(params).await
    }

    /// Turns one complete request payload into one response payload.
    ///
    /// Every failure along the way, from a payload that will not decode to
    /// a fault raised by the handler, is reported through the returned
    /// envelope. This function itself never fails and produces exactly one
    /// envelope per payload.
    pub async fn handle(&self, payload: &[u8]) -> String {
        let request = match envelope::decode_request(payload) {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "rejecting malformed request");
                return envelope::encode_failure(Fault::from_error(&err));
            }
        };
        debug!(method = %request.method, params = request.params.len(), "dispatching");
        match self.call(&request.method, request.params).await {
            Ok(result) => envelope::encode_success(result),
            Err(fault) => {
                debug!(method = %request.method, error = %fault.message, "handler fault");
                envelope::encode_failure(fault)
            }
        }
    }
}

struct TypedHandler<RFn> {
    rfn: RFn,
}

impl<RFn> TypedHandler<RFn>
where
    RFn: RpcFunction,
{
    async fn call(&self, params: Vec<Value>) -> Result<Value, Fault> {
        let args = RFn::Params::from_params(params).map_err(|err| Fault::from_error(&err))?;
        let reply = self.rfn.call(args).await?;
        serde_json::to_value(reply).map_err(|err| Fault::from_error(&err))
    }
}

/// Object-safe face of [`RpcFunction`], boxed behind the registry.
trait DynamicHandler {
    fn call(&self, params: Vec<Value>) -> BoxFuture<'_, Result<Value, Fault>>;
}

impl<RFn> DynamicHandler for TypedHandler<RFn>
where
    RFn: RpcFunction + Send + Sync,
{
    fn call(&self, params: Vec<Value>) -> BoxFuture<'_, Result<Value, Fault>> {
        Box::pin(self.call(params))
    }
}
