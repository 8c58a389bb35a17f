//! Bancho capture inspector
//!
//! Decodes a raw capture of client frames with the adapter for the given
//! build and prints one JSON document per packet.

mod cli;

use anyhow::{bail, Context, Result};
use bancho_config::GatewayConfig;
use bancho_protocol::{BanchoIo, ProtocolRegistry, UnsupportedPacketPolicy};
use clap::Parser;
use std::io::Write;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{apply_cli_overrides, CliArgs};

/// Totals for one inspected capture
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    decoded: usize,
    unsupported: usize,
    /// Stopped at an unsupported packet instead of end of stream
    truncated: bool,
}

/// Read packets until the stream ends, writing each as a JSON line
async fn inspect<W: Write>(
    adapter: &mut dyn BanchoIo,
    policy: UnsupportedPacketPolicy,
    out: &mut W,
) -> Result<Summary> {
    let mut summary = Summary::default();

    loop {
        let packet = match adapter.read_packet().await {
            Ok(packet) => packet,
            // Only a stream that ends between frames is a clean finish
            Err(e) if e.is_eof() => break,
            Err(e) => return Err(e).context(format!("after {} packets", summary.decoded)),
        };

        match packet {
            Some(packet) => {
                summary.decoded += 1;
                writeln!(out, "{}", serde_json::to_string(&packet)?)?;
            }
            None => {
                summary.unsupported += 1;
                if policy == UnsupportedPacketPolicy::LeaveUnread {
                    // The rest of the frame is still in the stream
                    warn!("Stopping at unsupported packet; rerun with --unsupported discard to skip");
                    summary.truncated = true;
                    break;
                }
            }
        }
    }

    Ok(summary)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    let mut config = match args.config {
        Some(ref path) => GatewayConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GatewayConfig::default(),
    };
    apply_cli_overrides(&mut config, &args);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    config.display();

    let registry = ProtocolRegistry::with_defaults(config.adapter_options());
    let Some(mut adapter) = registry.resolve(config.default_version) else {
        bail!(
            "no adapter for b{} (registered: {:?})",
            config.default_version,
            registry.versions()
        );
    };

    let file = tokio::fs::File::open(&args.capture)
        .await
        .with_context(|| format!("opening {}", args.capture.display()))?;
    adapter.attach(Box::new(BufReader::new(file)));

    info!("Inspecting {} as b{}", args.capture.display(), adapter.version());

    let stdout = std::io::stdout();
    let summary = inspect(adapter.as_mut(), config.unsupported_policy, &mut stdout.lock()).await?;

    info!(
        "Done: {} packets decoded, {} unsupported{}",
        summary.decoded,
        summary.unsupported,
        if summary.truncated { " (stopped early)" } else { "" }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bancho_protocol::frame::encode_frame;
    use bancho_protocol::{AdapterOptions, B291, DEFAULT_COMPRESSION_LEVEL};
    use tokio::io::AsyncWriteExt;

    async fn capture(frames: Vec<(u16, Vec<u8>)>) -> tokio::io::DuplexStream {
        let (mut client, server) = tokio::io::duplex(64 * 1024);
        for (wire_id, payload) in frames {
            let frame = encode_frame(wire_id, &payload, DEFAULT_COMPRESSION_LEVEL).unwrap();
            client.write_all(&frame).await.unwrap();
        }
        drop(client);
        server
    }

    #[tokio::test]
    async fn test_inspect_prints_each_packet() {
        let stream = capture(vec![(4, vec![]), (2, vec![])]).await;
        let mut adapter = B291::default();
        adapter.attach(Box::new(stream));

        let mut out = Vec::new();
        let summary = inspect(&mut adapter, UnsupportedPacketPolicy::LeaveUnread, &mut out).await.unwrap();

        assert_eq!(summary, Summary { decoded: 2, unsupported: 0, truncated: false });
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().next().unwrap().contains("OsuPong"));
    }

    #[tokio::test]
    async fn test_inspect_stops_at_unsupported_when_leaving_unread() {
        let stream = capture(vec![(4, vec![]), (26, b"pm".to_vec()), (4, vec![])]).await;
        let mut adapter = B291::default();
        adapter.attach(Box::new(stream));

        let mut out = Vec::new();
        let summary = inspect(&mut adapter, UnsupportedPacketPolicy::LeaveUnread, &mut out).await.unwrap();

        assert_eq!(summary, Summary { decoded: 1, unsupported: 1, truncated: true });
    }

    #[tokio::test]
    async fn test_inspect_reports_cut_off_frame() {
        let (mut client, server) = tokio::io::duplex(1024);
        let frame = encode_frame(4, &[], DEFAULT_COMPRESSION_LEVEL).unwrap();
        client.write_all(&frame).await.unwrap();
        // A pong ID followed by half a length field
        client.write_all(&[0x04, 0x00, 0x01, 0x02]).await.unwrap();
        drop(client);

        let mut adapter = B291::default();
        adapter.attach(Box::new(server));

        let mut out = Vec::new();
        let result = inspect(&mut adapter, UnsupportedPacketPolicy::LeaveUnread, &mut out).await;

        assert!(result.is_err());
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[tokio::test]
    async fn test_inspect_continues_when_discarding() {
        let stream = capture(vec![(4, vec![]), (26, b"pm".to_vec()), (4, vec![])]).await;
        let mut adapter = B291::new(AdapterOptions {
            unsupported_policy: UnsupportedPacketPolicy::Discard,
            ..Default::default()
        });
        adapter.attach(Box::new(stream));

        let mut out = Vec::new();
        let summary = inspect(&mut adapter, UnsupportedPacketPolicy::Discard, &mut out).await.unwrap();

        assert_eq!(summary, Summary { decoded: 2, unsupported: 1, truncated: false });
    }
}
