//! # Build 291 Adapter
//!
//! One of the oldest clients still able to log in. Notable quirks:
//!
//! - Wire slot 11 is reserved for the IRC join notice; every canonical ID
//!   from 11 upwards is shifted by one on the wire.
//! - There is no presence packet. Timezone and city ride at the end of the
//!   stats broadcast, and IRC users are announced by name only.
//! - Chat only knows `#osu`. Inbound messages carry just the text.
//! - Replay frames hold two mouse booleans instead of a button bitmask.
//! - Status action 10 means "refresh this user's stats".
//!
//! Everything else (multiplayer, channels, moderation) is gated.

use async_trait::async_trait;
use bytes::BytesMut;
use bancho_core::{BanchoError, ErrorCollection, Result};
use std::collections::HashSet;
use std::io;

use crate::codecs::*;
use crate::frame::{discard_frame_body, read_frame_body, read_wire_id, write_frame};
use crate::io::{BanchoIo, BoxedStream};
use crate::options::{AdapterOptions, UnsupportedPacketPolicy};
use crate::packet_structures::{Packet, Payload};
use crate::packet_types::*;
use crate::packets::PacketId;
use crate::remap::PacketIdMap;

/// Client build number
pub const VERSION: u32 = 291;

/// Wire numbering: IRC join occupies slot 11
pub const ID_MAP: PacketIdMap = PacketIdMap::with_reserved_slot(11);

/// Legacy action byte that makes the client refresh a user's stats
pub const STATS_UPDATE: u8 = 10;

/// Highest status action this build understands
pub const MAX_ACTION: StatusAction = StatusAction::Submitting;

/// Bytes per replay frame on the wire
const FRAME_SIZE: usize = 14;

const SUPPORTED_PACKETS: &[PacketId] = &[
    PacketId::OsuSendUserStatus,
    PacketId::OsuSendIrcMessage,
    PacketId::OsuExit,
    PacketId::OsuRequestStatusUpdate,
    PacketId::OsuPong,
    PacketId::BanchoLoginReply,
    PacketId::BanchoCommandError,
    PacketId::BanchoSendMessage,
    PacketId::BanchoPing,
    PacketId::BanchoHandleIrcChangeUsername,
    PacketId::BanchoHandleIrcQuit,
    PacketId::BanchoHandleOsuUpdate,
    PacketId::BanchoHandleOsuQuit,
    PacketId::BanchoSpectatorJoined,
    PacketId::BanchoSpectatorLeft,
    PacketId::BanchoSpectateFrames,
    PacketId::OsuStartSpectating,
    PacketId::OsuStopSpectating,
    PacketId::OsuSpectateFrames,
    PacketId::BanchoVersionUpdate,
    PacketId::OsuErrorReport,
    PacketId::OsuCantSpectate,
    PacketId::BanchoSpectatorCantSpectate,
    PacketId::BanchoGetAttention,
    PacketId::BanchoAnnounce,
];

/// Protocol adapter for build 291 clients
pub struct B291 {
    stream: Option<BoxedStream>,
    options: AdapterOptions,
    supported: HashSet<PacketId>,
}

impl B291 {
    pub fn new(options: AdapterOptions) -> Self {
        Self {
            stream: None,
            options,
            supported: SUPPORTED_PACKETS.iter().copied().collect(),
        }
    }

    fn stream_mut(&mut self) -> Result<&mut BoxedStream> {
        self.stream.as_mut().ok_or_else(not_attached)
    }
}

impl Default for B291 {
    fn default() -> Self {
        Self::new(AdapterOptions::default())
    }
}

fn not_attached() -> BanchoError {
    BanchoError::Io(io::Error::new(io::ErrorKind::NotConnected, "no stream attached"))
}

// ============================================================================
// ENCODERS
// ============================================================================

/// Status as the server sends it
///
/// # Format
/// ```text
/// {u8 action}{string text}{string checksum}{u32 mods}
/// ```
fn write_status(buf: &mut BytesMut, status: &UserStatus) {
    let action = if status.action > MAX_ACTION {
        StatusAction::Unknown
    } else {
        status.action
    };

    // The stats refresh flag wins over whatever the user is doing
    let raw = if status.update_stats {
        STATS_UPDATE
    } else {
        action.as_u8()
    };

    write_u8(buf, raw);
    write_string(buf, &status.text);
    write_string(buf, &status.beatmap_checksum);
    write_u32(buf, status.mods);
}

/// Stats broadcast, also used for the quit notice
///
/// # Format
/// ```text
/// {i32 id}{string name}{u64 ranked}{f64 accuracy}{i32 plays}{u64 total}{i32 rank}
/// {string avatar}{status}{u8 timezone+24}{string city}
/// ```
fn write_stats(buf: &mut BytesMut, info: &UserInfo) {
    write_i32(buf, info.id);
    write_string(buf, &info.name);
    write_u64(buf, info.stats.ranked_score);
    write_f64(buf, info.stats.accuracy);
    write_i32(buf, info.stats.play_count);
    write_u64(buf, info.stats.total_score);
    write_i32(buf, info.stats.rank);
    // Avatar file name, which is the user id
    write_string(buf, &info.id.to_string());
    write_status(buf, &info.status);
    write_u8(buf, info.presence.timezone_byte());
    write_string(buf, &info.presence.city);
}

/// Replay bundle; only the primary button of each hand survives
fn write_frame_bundle(buf: &mut BytesMut, bundle: &ReplayFrameBundle) {
    let count = bundle.frames.len().min(u16::MAX as usize);
    write_u16(buf, count as u16);

    for frame in bundle.frames.iter().take(count) {
        write_bool(buf, frame.button_state.contains(ButtonState::LEFT1));
        write_bool(buf, frame.button_state.contains(ButtonState::RIGHT1));
        write_f32(buf, frame.mouse_x);
        write_f32(buf, frame.mouse_y);
        write_i32(buf, frame.time);
    }

    write_u8(buf, bundle.action);
}

// ============================================================================
// DECODERS
// ============================================================================

/// Status as the client sends it
///
/// # Format
/// ```text
/// {u8 action}[{string text}{string checksum}{u16 mods}]
/// ```
/// The bracketed fields are absent when the action is `Unknown`.
fn read_status(buf: &mut BytesMut) -> Result<UserStatus> {
    let mut errors = ErrorCollection::new();
    let mut status = UserStatus::default();

    let raw = errors.add(read_u8(buf)).unwrap_or_default();
    status.update_stats = raw == STATS_UPDATE;
    status.action = if raw > MAX_ACTION.as_u8() {
        StatusAction::Unknown
    } else {
        StatusAction::from_u8(raw)
    };

    if raw != StatusAction::Unknown.as_u8() {
        status.text = errors.add(read_string(buf)).unwrap_or_default();
        status.beatmap_checksum = errors.add(read_string(buf)).unwrap_or_default();
        status.mods = errors.add(read_u16(buf)).map(u32::from).unwrap_or_default();
    }

    errors.resolve()?;
    Ok(status)
}

/// Chat message; this build has no channels or private messages
fn read_message(buf: &mut BytesMut) -> Result<Message> {
    let content = read_string(buf)?;
    Ok(Message {
        sender: String::new(),
        content,
        target: DEFAULT_CHANNEL.to_string(),
        sender_id: 0,
    })
}

fn read_replay_frame(buf: &mut BytesMut) -> Result<ReplayFrame> {
    let mut errors = ErrorCollection::new();
    let mouse_left = errors.add(read_bool(buf)).unwrap_or_default();
    let mouse_right = errors.add(read_bool(buf)).unwrap_or_default();
    let mouse_x = errors.add(read_f32(buf)).unwrap_or_default();
    let mouse_y = errors.add(read_f32(buf)).unwrap_or_default();
    let time = errors.add(read_i32(buf)).unwrap_or_default();
    errors.resolve()?;

    let mut button_state = ButtonState::NONE;
    if mouse_left {
        button_state.insert(ButtonState::LEFT1);
    }
    if mouse_right {
        button_state.insert(ButtonState::RIGHT1);
    }

    Ok(ReplayFrame {
        button_state,
        legacy_byte: 0,
        mouse_x,
        mouse_y,
        time,
    })
}

fn read_frame_bundle(buf: &mut BytesMut) -> Result<ReplayFrameBundle> {
    let count = read_u16(buf)? as usize;

    let mut frames = Vec::with_capacity(count.min(buf.len() / FRAME_SIZE));
    for _ in 0..count {
        frames.push(read_replay_frame(buf)?);
    }

    let action = read_u8(buf)?;
    Ok(ReplayFrameBundle {
        frames,
        action,
        ..Default::default()
    })
}

fn decode_payload(id: PacketId, body: &[u8]) -> Result<Payload> {
    let mut buf = BytesMut::from(body);
    let payload = match id {
        PacketId::OsuSendUserStatus => Payload::Status(read_status(&mut buf)?),
        PacketId::OsuSendIrcMessage => Payload::Message(read_message(&mut buf)?),
        PacketId::OsuStartSpectating => Payload::UserId(read_u32(&mut buf)?),
        PacketId::OsuSpectateFrames => Payload::FrameBundle(read_frame_bundle(&mut buf)?),
        PacketId::OsuErrorReport => Payload::Text(read_string(&mut buf)?),
        _ => Payload::None,
    };
    Ok(payload)
}

// ============================================================================
// CAPABILITY INTERFACE
// ============================================================================

#[async_trait]
impl BanchoIo for B291 {
    fn version(&self) -> u32 {
        VERSION
    }

    fn attach(&mut self, stream: BoxedStream) {
        self.stream = Some(stream);
    }

    fn detach(&mut self) -> Option<BoxedStream> {
        self.stream.take()
    }

    fn is_attached(&self) -> bool {
        self.stream.is_some()
    }

    fn clone_fresh(&self) -> Box<dyn BanchoIo> {
        Box::new(B291::new(self.options.clone()))
    }

    fn supported_packets(&self) -> &HashSet<PacketId> {
        &self.supported
    }

    async fn write_packet(&mut self, id: PacketId, payload: &[u8]) -> Result<()> {
        let wire_id = ID_MAP.encode(id);
        let level = self.options.compression_level;
        let stream = self.stream_mut()?;

        let written = write_frame(stream, wire_id, payload, level).await?;
        tracing::trace!(
            "b291: wrote {} as wire id {} ({} payload bytes, {} on wire)",
            id, wire_id, payload.len(), written
        );
        Ok(())
    }

    async fn read_packet(&mut self) -> Result<Option<Packet>> {
        let max = self.options.max_payload_size;
        let policy = self.options.unsupported_policy;
        let stream = self.stream.as_mut().ok_or_else(not_attached)?;

        let wire_id = read_wire_id(stream).await?;
        let id = match ID_MAP.decode(wire_id) {
            Some(id) if self.supported.contains(&id) => id,
            other => {
                tracing::warn!(
                    "b291: unsupported inbound packet (wire id {}, canonical {:?}), policy {}",
                    wire_id, other, policy.as_str()
                );
                if policy == UnsupportedPacketPolicy::Discard {
                    discard_frame_body(stream, max).await?;
                }
                return Ok(None);
            }
        };

        let body = read_frame_body(stream, max).await?;
        tracing::trace!("b291: read {} ({} bytes decompressed)", id, body.len());

        let payload = decode_payload(id, &body).map_err(|e| BanchoError::decode(id.name(), e))?;
        Ok(Some(Packet::new(id, payload)))
    }

    async fn write_login_reply(&mut self, reply: i32) -> Result<()> {
        let mut buf = BytesMut::new();
        write_i32(&mut buf, reply);
        self.write_packet(PacketId::BanchoLoginReply, &buf).await
    }

    async fn write_message(&mut self, message: &Message) -> Result<()> {
        if message.target != DEFAULT_CHANNEL {
            tracing::debug!("b291: dropping message to {} (only {} exists)", message.target, DEFAULT_CHANNEL);
            return Ok(());
        }

        let mut buf = BytesMut::new();
        write_string(&mut buf, &message.sender);
        write_string(&mut buf, &message.content);
        self.write_packet(PacketId::BanchoSendMessage, &buf).await
    }

    async fn write_ping(&mut self) -> Result<()> {
        self.write_packet(PacketId::BanchoPing, &[]).await
    }

    async fn write_irc_change_username(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        let mut buf = BytesMut::new();
        write_string(&mut buf, &format!("{}>>>>{}", old_name, new_name));
        self.write_packet(PacketId::BanchoHandleIrcChangeUsername, &buf).await
    }

    async fn write_user_stats(&mut self, info: &UserInfo) -> Result<()> {
        let mut buf = BytesMut::new();

        if info.presence.is_irc {
            write_string(&mut buf, &info.name);
            return self.write_packet(PacketId::IrcJoin, &buf).await;
        }

        write_stats(&mut buf, info);
        self.write_packet(PacketId::BanchoHandleOsuUpdate, &buf).await
    }

    async fn write_user_quit(&mut self, quit: &UserQuit) -> Result<()> {
        let irc_leave = match quit.quit_state {
            QuitState::RemainsOnGameClient => {
                tracing::debug!("b291: {} still on game client, no quit sent", quit.info.name);
                return Ok(());
            }
            QuitState::RemainsOnLegacyTextChannel => true,
            QuitState::NormalQuit => quit.info.presence.is_irc,
        };

        let mut buf = BytesMut::new();
        if irc_leave {
            write_string(&mut buf, &quit.info.name);
            return self.write_packet(PacketId::BanchoHandleIrcQuit, &buf).await;
        }

        write_stats(&mut buf, &quit.info);
        self.write_packet(PacketId::BanchoHandleOsuQuit, &buf).await
    }

    async fn write_user_presence(&mut self, info: &UserInfo) -> Result<()> {
        self.write_user_stats(info).await
    }

    async fn write_user_presence_single(&mut self, info: &UserInfo) -> Result<()> {
        self.write_user_stats(info).await
    }

    async fn write_user_presence_bundle(&mut self, infos: &[UserInfo]) -> Result<()> {
        for info in infos {
            self.write_user_stats(info).await?;
        }
        Ok(())
    }

    async fn write_spectator_joined(&mut self, user_id: i32) -> Result<()> {
        let mut buf = BytesMut::new();
        write_i32(&mut buf, user_id);
        self.write_packet(PacketId::BanchoSpectatorJoined, &buf).await
    }

    async fn write_spectator_left(&mut self, user_id: i32) -> Result<()> {
        let mut buf = BytesMut::new();
        write_i32(&mut buf, user_id);
        self.write_packet(PacketId::BanchoSpectatorLeft, &buf).await
    }

    async fn write_spectate_frames(&mut self, bundle: &ReplayFrameBundle) -> Result<()> {
        let mut buf = BytesMut::new();
        write_frame_bundle(&mut buf, bundle);
        self.write_packet(PacketId::BanchoSpectateFrames, &buf).await
    }

    async fn write_spectator_cant_spectate(&mut self, user_id: i32) -> Result<()> {
        let mut buf = BytesMut::new();
        write_i32(&mut buf, user_id);
        self.write_packet(PacketId::BanchoSpectatorCantSpectate, &buf).await
    }

    async fn write_version_update(&mut self) -> Result<()> {
        self.write_packet(PacketId::BanchoVersionUpdate, &[]).await
    }

    async fn write_get_attention(&mut self) -> Result<()> {
        self.write_packet(PacketId::BanchoGetAttention, &[]).await
    }

    async fn write_announcement(&mut self, message: &str) -> Result<()> {
        let mut buf = BytesMut::new();
        write_string(&mut buf, message);
        self.write_packet(PacketId::BanchoAnnounce, &buf).await
    }
}
