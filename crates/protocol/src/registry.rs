//! # Version Registry
//!
//! Maps client build numbers to adapter prototypes. Resolving a build hands
//! out a fresh, unattached copy of the newest adapter that is not newer than
//! the client.

use std::collections::BTreeMap;

use crate::io::BanchoIo;
use crate::options::AdapterOptions;
use crate::versions::B291;

pub struct ProtocolRegistry {
    adapters: BTreeMap<u32, Box<dyn BanchoIo>>,
}

impl ProtocolRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            adapters: BTreeMap::new(),
        }
    }

    /// Registry holding every adapter this crate ships
    pub fn with_defaults(options: AdapterOptions) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(B291::new(options)));
        registry
    }

    /// Add a prototype, replacing any adapter with the same build number
    pub fn register(&mut self, adapter: Box<dyn BanchoIo>) {
        let version = adapter.version();
        if self.adapters.insert(version, adapter).is_some() {
            tracing::debug!("registry: replaced adapter for b{}", version);
        }
    }

    /// Fresh adapter for the highest registered build `<= version`
    pub fn resolve(&self, version: u32) -> Option<Box<dyn BanchoIo>> {
        let (&build, prototype) = self.adapters.range(..=version).next_back()?;
        if build != version {
            tracing::debug!("registry: b{} served by b{} adapter", version, build);
        }
        Some(prototype.clone_fresh())
    }

    /// Registered build numbers, oldest first
    pub fn versions(&self) -> Vec<u32> {
        self.adapters.keys().copied().collect()
    }
}

impl Default for ProtocolRegistry {
    fn default() -> Self {
        Self::with_defaults(AdapterOptions::default())
    }
}
