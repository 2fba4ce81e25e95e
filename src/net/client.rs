//! TCP transport for proxies.

use super::{read_frame, write_frame};
use crate::client::{BoxError, Transport};
use futures::future::BoxFuture;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tracing::debug;

/// A [`Transport`] that opens one TCP connection per call.
#[derive(Debug, Clone, Copy)]
pub struct Connector(pub SocketAddr);

impl Connector {
    async fn exchange(&self, request: String) -> Result<String, BoxError> {
        debug!(addr = %self.0, "connecting");
        let mut stream = TcpStream::connect(self.0).await?;
        write_frame(&mut stream, request.as_bytes()).await?;
        let payload = read_frame(&mut stream).await?.ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "No response from server")
        })?;
        Ok(String::from_utf8(payload)?)
    }
}

impl Transport for Connector {
    fn send(&self, request: String) -> BoxFuture<'_, Result<String, BoxError>> {
        Box::pin(self.exchange(request))
    }
}
