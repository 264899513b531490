//! Host name reported in the greeting and `version` line.

use std::fs;

/// Source of the host name.
pub trait Hostname: Send + Sync {
    fn hostname(&self) -> String;
}

/// Fixed host name, typically from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticHostname(String);

impl StaticHostname {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self(hostname.into())
    }
}

impl Hostname for StaticHostname {
    fn hostname(&self) -> String {
        self.0.clone()
    }
}

/// Host name of the machine, resolved once at construction.
///
/// Tries `/etc/hostname`, then `$HOSTNAME`, then falls back to `localhost`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemHostname(String);

impl SystemHostname {
    pub fn resolve() -> Self {
        Self(detect())
    }
}

impl Default for SystemHostname {
    fn default() -> Self {
        Self::resolve()
    }
}

impl Hostname for SystemHostname {
    fn hostname(&self) -> String {
        self.0.clone()
    }
}

fn detect() -> String {
    let from_file = fs::read_to_string("/etc/hostname")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(name) = from_file {
        return name;
    }
    match std::env::var("HOSTNAME") {
        Ok(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => {
            tracing::debug!("host name not found, using localhost");
            "localhost".to_string()
        }
    }
}
