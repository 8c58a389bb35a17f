//! Command-line argument parsing for the capture inspector.

use std::path::PathBuf;

use bancho_config::GatewayConfig;
use bancho_protocol::UnsupportedPacketPolicy;
use clap::Parser;

/// Decode a capture of client-to-server Bancho frames.
///
/// CLI values override settings loaded from the options file.
#[derive(Parser, Debug)]
#[command(name = "bancho-inspect", about = "Bancho capture inspector")]
pub struct CliArgs {
    /// Raw capture of frames as sent by the client.
    pub capture: PathBuf,

    /// Client build the capture was recorded from.
    #[arg(long)]
    pub build: Option<u32>,

    /// Unsupported packet handling (leave, discard).
    #[arg(long)]
    pub unsupported: Option<UnsupportedPacketPolicy>,

    /// Log level or tracing filter directive.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to a gateway options file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Apply CLI overrides to a loaded config.
pub fn apply_cli_overrides(config: &mut GatewayConfig, args: &CliArgs) {
    if let Some(build) = args.build {
        config.default_version = build;
    }
    if let Some(policy) = args.unsupported {
        config.unsupported_policy = policy;
    }
    if let Some(ref level) = args.log_level {
        config.log_level = level.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = GatewayConfig::default();
        let args = CliArgs::try_parse_from([
            "bancho-inspect",
            "capture.bin",
            "--build",
            "300",
            "--unsupported",
            "discard",
        ])
        .unwrap();

        apply_cli_overrides(&mut config, &args);
        assert_eq!(config.default_version, 300);
        assert_eq!(config.unsupported_policy, UnsupportedPacketPolicy::Discard);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let err = CliArgs::try_parse_from(["bancho-inspect", "capture.bin", "--unsupported", "maybe"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_capture_is_required() {
        assert!(CliArgs::try_parse_from(["bancho-inspect"]).is_err());
    }
}
