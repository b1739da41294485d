//! Connectivity monitor — debounced WiFi status polling.
//!
//! Samples the connectivity port at a fixed interval (first sample
//! immediately, so a network that is already up at boot triggers the
//! channel connect straight away).  Only *transitions* act: a rising
//! edge (re-)establishes the channel session, a falling edge forces
//! de-authentication and extinguishes the indicators.  While the state
//! is stable nothing is re-triggered.

use log::info;

use crate::app::ports::{ChannelPort, ConnectivityPort, IndicatorPort};
use crate::session::SessionController;

pub struct ConnectivityMonitor {
    poll_interval_ms: u64,
    last_poll_ms: Option<u64>,
    link_up: bool,
}

impl ConnectivityMonitor {
    pub fn new(poll_interval_secs: u32) -> Self {
        Self {
            poll_interval_ms: u64::from(poll_interval_secs) * 1000,
            last_poll_ms: None,
            link_up: false,
        }
    }

    /// Last observed link state.
    pub fn link_up(&self) -> bool {
        self.link_up
    }

    /// Poll if the interval elapsed.  Returns `Some(new_state)` on a
    /// debounced transition, `None` otherwise.
    pub fn tick(
        &mut self,
        now_ms: u64,
        net: &impl ConnectivityPort,
        session: &mut SessionController,
        channel: &mut impl ChannelPort,
        indicators: &mut impl IndicatorPort,
    ) -> Option<bool> {
        if let Some(last) = self.last_poll_ms {
            if now_ms.saturating_sub(last) < self.poll_interval_ms {
                return None;
            }
        }
        self.last_poll_ms = Some(now_ms);

        let up = net.is_connected();
        if up {
            info!(
                "wifi: connected, rssi {} dBm",
                net.rssi().map_or_else(|| "?".into(), |r| r.to_string())
            );
        } else {
            info!("wifi: disconnected");
        }

        if up == self.link_up {
            return None;
        }
        self.link_up = up;

        if up {
            session.connect(channel);
        } else {
            session.on_channel_disconnected(indicators);
        }
        Some(up)
    }
}
