//! A simulated database client used by the demo and the HTTP collaborator.

use async_trait::async_trait;
use rescope_core::{Error, Result};
use rescope_scope::{Resource, ResourceSpec};
use std::time::Duration;
use tracing::info;

/// Failure injection for a [`SimulatedDatabase`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Faults {
    pub open: bool,
    pub query: bool,
    pub close: bool,
}

/// Stand-in for a real connection: every open and close takes `latency`,
/// queries only succeed while connected
#[derive(Debug)]
pub struct SimulatedDatabase {
    name: String,
    latency: Duration,
    connected: bool,
    faults: Faults,
}

impl SimulatedDatabase {
    pub fn new(name: impl Into<String>, latency: Duration) -> Self {
        Self {
            name: name.into(),
            latency,
            connected: false,
            faults: Faults::default(),
        }
    }

    #[must_use]
    pub fn with_faults(mut self, faults: Faults) -> Self {
        self.faults = faults;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wrap this database in a spec keyed by `key`
    pub fn into_spec(self, key: impl Into<String>) -> ResourceSpec<Self, Error> {
        ResourceSpec::from_resource(key, self)
    }

    pub async fn query(&self, sql: &str) -> Result<String> {
        if !self.connected {
            return Err(Error::not_connected(&self.name));
        }
        if self.faults.query {
            return Err(Error::internal(format!("{} rejected query: {sql}", self.name)));
        }
        Ok(format!("[{}] result: {sql}", self.name))
    }
}

#[async_trait]
impl Resource for SimulatedDatabase {
    type Error = Error;

    async fn open(&mut self) -> Result<()> {
        tokio::time::sleep(self.latency).await;
        if self.faults.open {
            return Err(Error::connection(&self.name, "connection refused"));
        }
        self.connected = true;
        info!(database = %self.name, "connected");
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        tokio::time::sleep(self.latency).await;
        self.connected = false;
        if self.faults.close {
            return Err(Error::connection(&self.name, "disconnect failed"));
        }
        info!(database = %self.name, "disconnected");
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.connected
    }
}
