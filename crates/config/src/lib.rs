//! Bancho Gateway Configuration
//!
//! Loads gateway settings from a `key = value` options file.
//!
//! ```text
//! # gateway.txt
//! defaultversion = 291
//! compressionlevel = 6
//! maxpayloadsize = 1048576
//! unsupportedpackets = discard
//! loglevel = debug
//! ```

use bancho_core::Result;
use bancho_protocol::{AdapterOptions, UnsupportedPacketPolicy, DEFAULT_COMPRESSION_LEVEL, DEFAULT_MAX_PAYLOAD_SIZE};
use std::fs;
use std::path::Path;

/// Build used when a client's version is not known
pub const DEFAULT_VERSION: u32 = 291;

/// Gateway configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Client build to resolve when none is given (from "defaultversion", default: 291)
    pub default_version: u32,
    /// Gzip level for outbound frames (from "compressionlevel", default: 6)
    pub compression_level: u32,
    /// Largest inbound payload accepted (from "maxpayloadsize", default: 1 MiB)
    pub max_payload_size: usize,
    /// Handling of unsupported inbound packets (from "unsupportedpackets", default: leave)
    pub unsupported_policy: UnsupportedPacketPolicy,
    /// Tracing filter directive (from "loglevel", default: info)
    pub log_level: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            default_version: DEFAULT_VERSION,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
            unsupported_policy: UnsupportedPacketPolicy::LeaveUnread,
            log_level: "info".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from an options file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Parse options file content
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(eq_pos) = line.find('=') {
                let key = line[..eq_pos].trim();
                let value = line[eq_pos + 1..].trim();

                config.parse_option(key, value);
            }
        }

        config
    }

    fn parse_option(&mut self, key: &str, value: &str) {
        match key.to_lowercase().as_str() {
            "defaultversion" => {
                self.default_version = value.parse().unwrap_or(DEFAULT_VERSION);
            }
            "compressionlevel" => {
                self.compression_level = value.parse::<u32>().unwrap_or(DEFAULT_COMPRESSION_LEVEL).min(9);
            }
            "maxpayloadsize" => {
                self.max_payload_size = value.parse().unwrap_or(DEFAULT_MAX_PAYLOAD_SIZE);
            }
            "unsupportedpackets" => {
                self.unsupported_policy = value.parse().unwrap_or_else(|e| {
                    tracing::warn!("{}, using leave", e);
                    UnsupportedPacketPolicy::LeaveUnread
                });
            }
            "loglevel" => {
                self.log_level = value.to_string();
            }
            _ => {
                tracing::warn!("Unknown config option: {} = {}", key, value);
            }
        }
    }

    /// Options handed to every adapter the registry builds
    pub fn adapter_options(&self) -> AdapterOptions {
        AdapterOptions {
            compression_level: self.compression_level,
            max_payload_size: self.max_payload_size,
            unsupported_policy: self.unsupported_policy,
        }
    }

    pub fn display(&self) {
        tracing::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        tracing::info!("Gateway Configuration:");
        tracing::info!("  Default version: b{}", self.default_version);
        tracing::info!("  Compression level: {}", self.compression_level);
        tracing::info!("  Max payload size: {} bytes", self.max_payload_size);
        tracing::info!("  Unsupported packets: {}", self.unsupported_policy.as_str());
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }
}
