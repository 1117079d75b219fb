//! Test harness: in-process server nodes and WebSocket clients.
//!
//! Nodes built from the same repository and bus behave like server processes sharing one
//! database: each has its own connection registry, countdowns and subscription loop.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use rps_server::{
    infrastructure::{notification::InMemoryNotificationBus, repository::InMemoryGameRepository},
    ui::{AppState, Server},
    usecase::CountdownConfig,
};
use serde_json::{Value, json};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
    task::JoinHandle,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Countdown long enough never to fire during a test.
pub const NO_COUNTDOWN: Duration = Duration::from_secs(600);

pub fn init_logger() {
    rps_shared::logger::try_setup_test_logger(&["rps_server"], "debug");
}

/// Storage and bus shared by every node of one test.
#[derive(Clone, Default)]
pub struct Cluster {
    pub repository: Arc<InMemoryGameRepository>,
    pub bus: InMemoryNotificationBus,
}

impl Cluster {
    pub fn new() -> Self {
        init_logger();
        Self::default()
    }

    pub async fn start_node(&self, countdown_interval: Duration) -> TestNode {
        TestNode::start(self, countdown_interval).await
    }
}

pub struct TestNode {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestNode {
    async fn start(cluster: &Cluster, countdown_interval: Duration) -> Self {
        let subscriber = cluster.bus.subscribe();
        let state = AppState::build(
            cluster.repository.clone(),
            Arc::new(cluster.bus.clone()),
            CountdownConfig {
                interval: countdown_interval,
                start_value: 3,
            },
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = Server::new(state).run(listener, subscriber, shutdown).await {
                panic!("test node failed: {e}");
            }
        });

        Self {
            addr,
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn connect(&self) -> TestClient {
        TestClient::connect(&self.ws_url()).await
    }
}

impl Drop for TestNode {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.handle.abort();
    }
}

pub struct TestClient {
    /// Id from the `players.registered` greeting.
    pub id: String,
    /// Payload of the `games.available` greeting.
    pub initially_available: Value,
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn connect(url: &str) -> Self {
        let (ws, _) = connect_async(url).await.unwrap();
        let mut client = Self {
            id: String::new(),
            initially_available: Value::Null,
            ws,
        };

        let registered = client.recv().await;
        assert_eq!(registered["topic"], "players");
        assert_eq!(registered["event"], "registered");
        client.id = registered["payload"]["id"].as_str().unwrap().to_string();

        let available = client.recv().await;
        assert_eq!(available["event"], "available");
        client.initially_available = available["payload"].clone();

        client
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.ws.send(Message::text(text.to_string())).await.unwrap();
    }

    pub async fn send(&mut self, event: &str, payload: Value) {
        let frame = json!({"topic": "games", "event": event, "payload": payload});
        self.send_raw(&frame.to_string()).await;
    }

    pub async fn create(&mut self, player_name: &str) -> String {
        self.send("create", json!({"playerName": player_name})).await;
        let created = self.expect("created").await;
        created["payload"]["id"].as_str().unwrap().to_string()
    }

    pub async fn join(&mut self, game_id: &str, player_name: &str) {
        self.send("join", json!({"id": game_id, "playerName": player_name}))
            .await;
    }

    pub async fn play(&mut self, game_id: &str, mv: &str) {
        self.send("play", json!({"id": game_id, "move": mv})).await;
    }

    /// Next frame, failing the test after [`RECV_TIMEOUT`].
    pub async fn recv(&mut self) -> Value {
        self.try_recv(RECV_TIMEOUT)
            .await
            .expect("timed out waiting for a frame")
    }

    /// Next text frame within `timeout`, or `None`.
    pub async fn try_recv(&mut self, timeout: Duration) -> Option<Value> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let message = tokio::time::timeout_at(deadline, self.ws.next())
                .await
                .ok()?
                .expect("connection closed")
                .unwrap();
            if let Message::Text(text) = message {
                return Some(serde_json::from_str(text.as_str()).unwrap());
            }
        }
    }

    /// Next frame, which must be `event`.
    pub async fn expect(&mut self, event: &str) -> Value {
        let frame = self.recv().await;
        assert_eq!(frame["event"], event, "unexpected frame {frame}");
        frame
    }

    /// Next frame that is not a countdown tick, which must be `event`.
    pub async fn expect_skipping_countdown(&mut self, event: &str) -> Value {
        loop {
            let frame = self.recv().await;
            if frame["event"] != "countdown" {
                assert_eq!(frame["event"], event, "unexpected frame {frame}");
                return frame;
            }
        }
    }

    /// Fail if any frame arrives within `duration`.
    pub async fn assert_silent(&mut self, duration: Duration) {
        if let Some(frame) = self.try_recv(duration).await {
            panic!("expected no frame, got {frame}");
        }
    }

    pub async fn close(mut self) {
        self.ws.close(None).await.unwrap();
    }
}
