use rpclite::net::client::Connector;
use rpclite::net::server::serve_listener;
use rpclite::{async_fn, sync_fn, CallError, Dispatcher, Proxy};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task;

async fn spawn_server(dispatcher: Dispatcher) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    task::spawn(serve_listener(listener, Arc::new(dispatcher)));
    addr
}

#[tokio::test]
async fn hello_over_tcp() {
    let mut dispatcher = Dispatcher::new();
    dispatcher.insert(
        "Hello",
        sync_fn(|(name,): (String,)| Ok(format!("Hello, {name}!"))),
    );
    let addr = spawn_server(dispatcher).await;

    let hello = Proxy::new(Connector(addr), "Hello");
    let greeting: String = hello.call(("world".to_string(),)).await.unwrap();
    assert_eq!(greeting, "Hello, world!");
}

#[tokio::test]
async fn remote_faults_cross_the_wire() {
    let mut dispatcher = Dispatcher::new();
    dispatcher.insert(
        "explode",
        async_fn(|_: ()| async { Err::<i64, _>(rpclite::Fault::new("kaboom")) }),
    );
    let addr = spawn_server(dispatcher).await;

    let explode = Proxy::new(Connector(addr), "explode");
    let err = explode.call::<_, i64>(()).await.unwrap_err();
    match err {
        CallError::Remote(fault) => assert_eq!(fault.message, "kaboom"),
        other => panic!("expected a remote fault, got: {other}"),
    }

    let missing = Proxy::new(Connector(addr), "vanish");
    let err = missing.call::<_, i64>(()).await.unwrap_err();
    match err {
        CallError::Remote(fault) => assert_eq!(fault.message, "No such function: vanish"),
        other => panic!("expected a remote fault, got: {other}"),
    }
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let sum = Proxy::new(Connector(addr), "sum");
    let err = sum.call::<_, i64>((1, 2)).await.unwrap_err();
    match err {
        CallError::Transport(inner) => {
            assert!(inner.downcast_ref::<std::io::Error>().is_some());
        }
        other => panic!("expected a transport error, got: {other}"),
    }
}

#[tokio::test]
async fn many_calls_on_one_proxy() {
    let mut dispatcher = Dispatcher::new();
    dispatcher.insert("sum", sync_fn(|(a, b): (i64, i64)| Ok(a + b)));
    let addr = spawn_server(dispatcher).await;

    let sum = Proxy::new(Connector(addr), "sum");
    let calls = (0..8_i64).map(|n| sum.call::<_, i64>((n, n)));
    let totals = futures::future::join_all(calls).await;
    for (n, total) in totals.into_iter().enumerate() {
        assert_eq!(total.unwrap(), 2 * n as i64);
    }
}
