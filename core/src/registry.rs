//! Scheme-keyed table of client constructors.
//!
//! The composition root owns a `Registry`, registers the transports it wants,
//! and lets generic code instantiate a client by scheme name.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::client::Client;
use crate::config::ConfigMap;
use crate::error::{Error, Result};

/// Builds a client for `host` from a construction-time option map.
pub type Constructor = Box<dyn Fn(&str, &ConfigMap) -> Result<Box<dyn Client>> + Send + Sync>;

#[derive(Default)]
pub struct Registry {
    constructors: HashMap<String, Constructor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `constructor` under `scheme`, replacing any previous entry.
    pub fn register<F>(&mut self, scheme: impl Into<String>, constructor: F)
    where
        F: Fn(&str, &ConfigMap) -> Result<Box<dyn Client>> + Send + Sync + 'static,
    {
        let scheme = scheme.into();
        debug!(%scheme, "client constructor registered");
        self.constructors.insert(scheme, Box::new(constructor));
    }

    pub fn contains(&self, scheme: &str) -> bool {
        self.constructors.contains_key(scheme)
    }

    /// Registered schemes, sorted.
    pub fn schemes(&self) -> Vec<&str> {
        let mut schemes: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        schemes
    }

    /// Build a client for `host` with the constructor registered as `scheme`.
    pub fn connect(&self, scheme: &str, host: &str, config: &ConfigMap) -> Result<Box<dyn Client>> {
        let constructor = self
            .constructors
            .get(scheme)
            .ok_or_else(|| Error::UnknownScheme(scheme.to_string()))?;
        constructor(host, config)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("schemes", &self.schemes())
            .finish()
    }
}
