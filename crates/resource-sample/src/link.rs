//! # Simulated Device Link
//!
//! In-memory stand-in for a protocol link (a ZigBee coordinator, a BLE
//! central, ...). Adapters subscribe to device addresses and send commands;
//! the test or demo holds the receiving end and plays the devices.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Outbound command addressed to one device.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    SetPower { address: String, on: bool },
    Poll { address: String },
}

impl DeviceCommand {
    pub fn address(&self) -> &str {
        match self {
            DeviceCommand::SetPower { address, .. } => address,
            DeviceCommand::Poll { address } => address,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinkError {
    #[error("Link disconnected")]
    Disconnected,
    #[error("Device not subscribed: {0}")]
    NotSubscribed(String),
}

/// Shared handle to the link. Clones share subscriptions and the command channel.
#[derive(Debug, Clone)]
pub struct SimulatedLink {
    commands: mpsc::UnboundedSender<DeviceCommand>,
    subscriptions: Arc<Mutex<HashSet<String>>>,
}

impl SimulatedLink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DeviceCommand>) {
        let (commands, receiver) = mpsc::unbounded_channel();
        let link = Self {
            commands,
            subscriptions: Arc::new(Mutex::new(HashSet::new())),
        };
        (link, receiver)
    }

    pub fn subscribe(&self, address: &str) {
        debug!(address, "Subscribe");
        self.subscriptions.lock().insert(address.to_string());
    }

    /// Returns false if `address` was not subscribed.
    pub fn unsubscribe(&self, address: &str) -> bool {
        debug!(address, "Unsubscribe");
        self.subscriptions.lock().remove(address)
    }

    pub fn is_subscribed(&self, address: &str) -> bool {
        self.subscriptions.lock().contains(address)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.lock().len()
    }

    /// Sends `command` to its device. Only subscribed devices are reachable.
    pub fn send(&self, command: DeviceCommand) -> Result<(), LinkError> {
        if !self.is_subscribed(command.address()) {
            return Err(LinkError::NotSubscribed(command.address().to_string()));
        }
        debug!(?command, "Send");
        self.commands
            .send(command)
            .map_err(|_| LinkError::Disconnected)
    }
}
