use rpclite::net::client::Connector;
use rpclite::{net, sync_fn, Dispatcher, Proxy};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut dispatcher = Dispatcher::new();
    dispatcher.insert(
        "Hello",
        sync_fn(|(name,): (String,)| Ok(format!("Hello, {name}!"))),
    );

    task::spawn(net::server::serve("127.0.0.1:8888", Arc::new(dispatcher)));
    tokio::time::sleep(Duration::from_secs_f32(0.01)).await;

    let addr = SocketAddr::from_str("127.0.0.1:8888").unwrap();
    let hello = Proxy::new(Connector(addr), "Hello");
    let greeting: String = hello.call(("world".to_string(),)).await.unwrap();
    println!("{greeting}");
}
