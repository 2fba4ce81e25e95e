//! Accept-loop server feeding complete payloads to a dispatcher.

use super::{read_frame, write_frame, FrameError};
use crate::Dispatcher;
use std::{io, sync::Arc};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::task;
use tracing::{debug, info, warn};

/// Binds `addr` and serves `dispatcher` over TCP until the listener fails.
pub async fn serve(addr: impl ToSocketAddrs, dispatcher: Arc<Dispatcher>) -> io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_listener(listener, dispatcher).await
}

/// Serves on an already-bound listener.
///
/// One task per connection; each frame on a connection is dispatched in
/// order and answered with exactly one response frame.
pub async fn serve_listener(listener: TcpListener, dispatcher: Arc<Dispatcher>) -> io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "rpc server listening");
    }
    loop {
        let (stream, peer) = listener.accept().await?;
        let dispatcher = Arc::clone(&dispatcher);
        task::spawn(async move {
            debug!(%peer, "connection open");
            match serve_connection(stream, dispatcher).await {
                Ok(()) => debug!(%peer, "connection closed"),
                Err(err) => warn!(%peer, error = %err, "connection error"),
            }
        });
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    dispatcher: Arc<Dispatcher>,
) -> Result<(), FrameError> {
    loop {
        let payload = match read_frame(&mut stream).await? {
            Some(payload) => payload,
            None => return Ok(()),
        };
        let response = dispatcher.handle(&payload).await;
        write_frame(&mut stream, response.as_bytes()).await?;
    }
}
