//! A minimal JSON-RPC layer: per-method client proxies over a pluggable
//! transport, and a server-side dispatcher that routes request envelopes to
//! named handlers. The wire format is plain JSON text; transports and
//! sockets are the caller's business.

pub mod client;
pub mod dispatcher;
pub mod envelope;
pub mod net;
pub mod params;

pub use client::{BoxError, CallError, Proxy, Transport};
pub use dispatcher::Dispatcher;
pub use envelope::{EnvelopeError, Fault, Request, Response};
pub use params::{FromParams, IntoParams, ParamsError};

use futures::future::{ready, Ready};
use serde::Serialize;
use std::future::Future;
use std::marker::PhantomData;

/// One remote-callable function.
///
/// `ReplyFut` is what unifies synchronous and asynchronous handlers: an
/// async handler returns its own future, a sync handler returns
/// [`futures::future::Ready`] and never suspends. The dispatcher treats
/// both identically, so the caller cannot tell them apart.
pub trait RpcFunction {
    type Params: FromParams;
    type Reply: Serialize;
    type ReplyFut: Future<Output = Result<Self::Reply, Fault>> + Send;

    fn call(&self, params: Self::Params) -> Self::ReplyFut;
}

/// A plain function wrapped as a synchronous [`RpcFunction`].
pub struct SyncFn<F, P, R> {
    f: F,
    _marker: PhantomData<fn(P) -> R>,
}

/// Wraps a plain function as a handler that completes immediately.
///
/// ```
/// use rpclite::{sync_fn, Dispatcher};
///
/// let mut dispatcher = Dispatcher::new();
/// dispatcher.insert("sum", sync_fn(|(a, b): (i64, i64)| Ok(a + b)));
/// ```
pub fn sync_fn<F, P, R>(f: F) -> SyncFn<F, P, R>
where
    F: Fn(P) -> Result<R, Fault>,
    P: FromParams,
    R: Serialize + Send,
{
    SyncFn {
        f,
        _marker: PhantomData,
    }
}

impl<F, P, R> RpcFunction for SyncFn<F, P, R>
where
    F: Fn(P) -> Result<R, Fault>,
    P: FromParams,
    R: Serialize + Send,
{
    type Params = P;
    type Reply = R;
    type ReplyFut = Ready<Result<R, Fault>>;

    fn call(&self, params: P) -> Self::ReplyFut {
        ready((self.f)(params))
    }
}

/// A future-returning function wrapped as an [`RpcFunction`].
pub struct AsyncFn<F, P> {
    f: F,
    _marker: PhantomData<fn(P)>,
}

/// Wraps a future-returning function as a handler.
///
/// ```
/// use rpclite::{async_fn, Dispatcher};
///
/// let mut dispatcher = Dispatcher::new();
/// dispatcher.insert(
///     "sum",
///     async_fn(|(a, b): (i64, i64)| async move { Ok(a + b) }),
/// );
/// ```
pub fn async_fn<F, P, Fut, R>(f: F) -> AsyncFn<F, P>
where
    F: Fn(P) -> Fut,
    Fut: Future<Output = Result<R, Fault>> + Send,
    P: FromParams,
    R: Serialize,
{
    AsyncFn {
        f,
        _marker: PhantomData,
    }
}

impl<F, P, Fut, R> RpcFunction for AsyncFn<F, P>
where
    F: Fn(P) -> Fut,
    Fut: Future<Output = Result<R, Fault>> + Send,
    P: FromParams,
    R: Serialize,
{
    type Params = P;
    type Reply = R;
    type ReplyFut = Fut;

    fn call(&self, params: P) -> Self::ReplyFut {
        (self.f)(params)
    }
}
