//! WebSocket session channel adapter.
//!
//! Implements [`ChannelPort`] on the ESP-IDF WebSocket client.  The
//! client delivers events from its own task context via a callback;
//! this adapter funnels them through an mpsc queue so the application
//! core consumes them single-threaded from [`poll`](ChannelPort::poll).
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real `esp_idf_svc::ws::client` transport
//!   with TCP keepalive configured from [`SystemConfig`].
//! - **all other targets**: loopback simulation — `connect` reports a
//!   connection immediately and sends are logged, which is enough to run
//!   the full control loop on a workstation.

use log::info;

use crate::app::ports::{ChannelEvent, ChannelPort};
use crate::config::SystemConfig;
use crate::error::ChannelError;

#[cfg(target_os = "espidf")]
use std::sync::mpsc;

pub struct WsChannel {
    url: String,
    reconnect_interval_secs: u32,
    keepalive_interval_secs: u32,
    keepalive_timeout_secs: u32,
    keepalive_retries: u8,
    connected: bool,
    #[cfg(target_os = "espidf")]
    client: Option<esp_idf_svc::ws::client::EspWebSocketClient<'static>>,
    #[cfg(target_os = "espidf")]
    events: Option<mpsc::Receiver<ChannelEvent>>,
    #[cfg(not(target_os = "espidf"))]
    sim_queue: std::collections::VecDeque<ChannelEvent>,
    #[cfg(not(target_os = "espidf"))]
    sim_sent: Vec<String>,
}

impl WsChannel {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            url: format!(
                "wss://{}:{}{}",
                config.server_host, config.server_port, config.server_path
            ),
            reconnect_interval_secs: config.reconnect_interval_secs,
            keepalive_interval_secs: config.keepalive_interval_secs,
            keepalive_timeout_secs: config.keepalive_timeout_secs,
            keepalive_retries: config.keepalive_retries,
            connected: false,
            #[cfg(target_os = "espidf")]
            client: None,
            #[cfg(target_os = "espidf")]
            events: None,
            #[cfg(not(target_os = "espidf"))]
            sim_queue: std::collections::VecDeque::new(),
            #[cfg(not(target_os = "espidf"))]
            sim_sent: Vec::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Messages sent so far (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sent(&self) -> &[String] {
        &self.sim_sent
    }

    /// Inject an inbound frame (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn inject(&mut self, event: ChannelEvent) {
        self.sim_queue.push_back(event);
    }
}

#[cfg(target_os = "espidf")]
impl ChannelPort for WsChannel {
    fn connect(&mut self) -> Result<(), ChannelError> {
        use esp_idf_svc::ws::client::{
            EspWebSocketClient, EspWebSocketClientConfig, WebSocketEventType,
        };
        use std::time::Duration;

        // Drop any stale client first; the ESP-IDF client closes on drop.
        self.client = None;
        self.connected = false;

        let (tx, rx) = mpsc::channel::<ChannelEvent>();
        self.events = Some(rx);

        let ws_config = EspWebSocketClientConfig {
            // The ESP-IDF client reconnects on its own at this interval;
            // the session layer only reacts to the resulting events.
            reconnect_timeout_ms: Some(Duration::from_secs(u64::from(
                self.reconnect_interval_secs,
            ))),
            keep_alive_idle: Some(Duration::from_secs(u64::from(
                self.keepalive_interval_secs,
            ))),
            keep_alive_interval: Some(Duration::from_secs(u64::from(
                self.keepalive_timeout_secs,
            ))),
            keep_alive_count: Some(self.keepalive_retries as usize),
            ..Default::default()
        };

        info!("channel: connecting to {}", self.url);
        let client = EspWebSocketClient::new(
            &self.url,
            &ws_config,
            Duration::from_secs(10),
            move |event| match event {
                Ok(event) => match event.event_type {
                    WebSocketEventType::Connected => {
                        let _ = tx.send(ChannelEvent::Connected);
                    }
                    WebSocketEventType::Disconnected | WebSocketEventType::Closed => {
                        let _ = tx.send(ChannelEvent::Disconnected);
                    }
                    WebSocketEventType::Text(text) => {
                        let _ = tx.send(ChannelEvent::Text(text.to_string()));
                    }
                    _ => {}
                },
                Err(e) => {
                    warn!("channel: transport error: {:?}", e);
                }
            },
        )
        .map_err(|_| ChannelError::ConnectFailed)?;

        self.client = Some(client);
        Ok(())
    }

    fn send_text(&mut self, text: &str) -> Result<(), ChannelError> {
        use esp_idf_svc::ws::FrameType;

        let client = self.client.as_mut().ok_or(ChannelError::NotConnected)?;
        if !self.connected {
            return Err(ChannelError::NotConnected);
        }
        client
            .send(FrameType::Text(false), text.as_bytes())
            .map_err(|_| ChannelError::SendFailed)
    }

    fn poll(&mut self) -> Option<ChannelEvent> {
        let event = self.events.as_ref()?.try_recv().ok()?;
        match event {
            ChannelEvent::Connected => self.connected = true,
            ChannelEvent::Disconnected => self.connected = false,
            ChannelEvent::Text(_) => {}
        }
        Some(event)
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(not(target_os = "espidf"))]
impl ChannelPort for WsChannel {
    fn connect(&mut self) -> Result<(), ChannelError> {
        info!(
            "channel(sim): connecting to {} (reconnect {}s, keepalive {}s/{}s x{})",
            self.url,
            self.reconnect_interval_secs,
            self.keepalive_interval_secs,
            self.keepalive_timeout_secs,
            self.keepalive_retries
        );
        self.sim_queue.push_back(ChannelEvent::Connected);
        Ok(())
    }

    fn send_text(&mut self, text: &str) -> Result<(), ChannelError> {
        if !self.connected {
            return Err(ChannelError::NotConnected);
        }
        info!("channel(sim): send {}", text);
        self.sim_sent.push(text.to_string());
        Ok(())
    }

    fn poll(&mut self) -> Option<ChannelEvent> {
        let event = self.sim_queue.pop_front()?;
        match event {
            ChannelEvent::Connected => self.connected = true,
            ChannelEvent::Disconnected => self.connected = false,
            ChannelEvent::Text(_) => {}
        }
        Some(event)
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
