//! # Capability Interface
//!
//! [`BanchoIo`] is the contract between the dispatcher and a version
//! adapter. It names every operation the canonical model can express.
//!
//! ## Capability Gating
//!
//! Each `write_*` method has a default body that does nothing and returns
//! `Ok(())`. A version overrides only the operations its clients understand,
//! so asking an old client to do something it cannot express is never an
//! error. Whether a version supports a packet is queryable up front through
//! [`BanchoIo::implements`].
//!
//! ## Threading
//!
//! One adapter serves one connection. Methods take `&mut self`; the
//! dispatcher serialises reads and writes per adapter. Adapters are `Send` so
//! they can move between Tokio tasks.
//!
//! # Example
//!
//! ```rust,no_run
//! use bancho_protocol::{BanchoIo, ProtocolRegistry, AdapterOptions};
//!
//! # async fn run(socket: tokio::net::TcpStream) -> bancho_core::Result<()> {
//! let registry = ProtocolRegistry::with_defaults(AdapterOptions::default());
//! let mut adapter = registry.resolve(291).expect("b291 is registered");
//! adapter.attach(Box::new(socket));
//!
//! adapter.write_login_reply(1000).await?;
//! while let Some(packet) = adapter.read_packet().await? {
//!     println!("{:?}", packet);
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bancho_core::Result;
use std::collections::HashSet;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::packet_structures::Packet;
use crate::packet_types::*;
use crate::packets::PacketId;

/// Duplex byte stream an adapter can be attached to
pub trait BanchoStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> BanchoStream for T {}

pub type BoxedStream = Box<dyn BanchoStream>;

#[inline]
fn gated(version: u32, id: PacketId) -> Result<()> {
    tracing::trace!("b{}: {} not expressible, skipping", version, id);
    Ok(())
}

/// Operations every protocol version adapter offers
#[async_trait]
pub trait BanchoIo: Send {
    /// Client build number this adapter speaks
    fn version(&self) -> u32;

    /// Attach the connection's stream, replacing any previous one
    fn attach(&mut self, stream: BoxedStream);

    /// Detach and return the current stream
    fn detach(&mut self) -> Option<BoxedStream>;

    fn is_attached(&self) -> bool;

    /// Fresh, unattached adapter for the same version and options
    fn clone_fresh(&self) -> Box<dyn BanchoIo>;

    /// Canonical packets this version can express, fixed at construction
    fn supported_packets(&self) -> &HashSet<PacketId>;

    fn implements(&self, id: PacketId) -> bool {
        self.supported_packets().contains(&id)
    }

    /// Remap, compress and write one frame
    async fn write_packet(&mut self, id: PacketId, payload: &[u8]) -> Result<()>;

    /// Read one frame
    ///
    /// # Returns
    /// - `Ok(Some(packet))` - decoded packet
    /// - `Ok(None)` - the version does not support the packet ID; not an error
    /// - `Err(e)` - transport, framing or decoding failure
    async fn read_packet(&mut self) -> Result<Option<Packet>>;

    //=== Login & Chat ===//

    async fn write_login_reply(&mut self, _reply: i32) -> Result<()> {
        gated(self.version(), PacketId::BanchoLoginReply)
    }

    async fn write_message(&mut self, _message: &Message) -> Result<()> {
        gated(self.version(), PacketId::BanchoSendMessage)
    }

    async fn write_ping(&mut self) -> Result<()> {
        gated(self.version(), PacketId::BanchoPing)
    }

    async fn write_irc_change_username(&mut self, _old_name: &str, _new_name: &str) -> Result<()> {
        gated(self.version(), PacketId::BanchoHandleIrcChangeUsername)
    }

    //=== Users & Presence ===//

    async fn write_user_stats(&mut self, _info: &UserInfo) -> Result<()> {
        gated(self.version(), PacketId::BanchoHandleOsuUpdate)
    }

    async fn write_user_quit(&mut self, _quit: &UserQuit) -> Result<()> {
        gated(self.version(), PacketId::BanchoHandleOsuQuit)
    }

    async fn write_user_presence(&mut self, _info: &UserInfo) -> Result<()> {
        gated(self.version(), PacketId::BanchoUserPresence)
    }

    async fn write_user_presence_single(&mut self, _info: &UserInfo) -> Result<()> {
        gated(self.version(), PacketId::BanchoUserPresenceSingle)
    }

    async fn write_user_presence_bundle(&mut self, _infos: &[UserInfo]) -> Result<()> {
        gated(self.version(), PacketId::BanchoUserPresenceBundle)
    }

    //=== Spectating ===//

    async fn write_spectator_joined(&mut self, _user_id: i32) -> Result<()> {
        gated(self.version(), PacketId::BanchoSpectatorJoined)
    }

    async fn write_spectator_left(&mut self, _user_id: i32) -> Result<()> {
        gated(self.version(), PacketId::BanchoSpectatorLeft)
    }

    async fn write_spectate_frames(&mut self, _bundle: &ReplayFrameBundle) -> Result<()> {
        gated(self.version(), PacketId::BanchoSpectateFrames)
    }

    async fn write_spectator_cant_spectate(&mut self, _user_id: i32) -> Result<()> {
        gated(self.version(), PacketId::BanchoSpectatorCantSpectate)
    }

    async fn write_fellow_spectator_joined(&mut self, _user_id: i32) -> Result<()> {
        gated(self.version(), PacketId::BanchoFellowSpectatorJoined)
    }

    async fn write_fellow_spectator_left(&mut self, _user_id: i32) -> Result<()> {
        gated(self.version(), PacketId::BanchoFellowSpectatorLeft)
    }

    //=== Notifications ===//

    async fn write_version_update(&mut self) -> Result<()> {
        gated(self.version(), PacketId::BanchoVersionUpdate)
    }

    async fn write_version_update_forced(&mut self) -> Result<()> {
        gated(self.version(), PacketId::BanchoVersionUpdateForced)
    }

    async fn write_get_attention(&mut self) -> Result<()> {
        gated(self.version(), PacketId::BanchoGetAttention)
    }

    async fn write_announcement(&mut self, _message: &str) -> Result<()> {
        gated(self.version(), PacketId::BanchoAnnounce)
    }

    async fn write_title_update(&mut self, _update: &TitleUpdate) -> Result<()> {
        gated(self.version(), PacketId::BanchoTitleUpdate)
    }

    async fn write_monitor(&mut self) -> Result<()> {
        gated(self.version(), PacketId::BanchoMonitor)
    }

    async fn write_restart(&mut self, _retry_ms: i32) -> Result<()> {
        gated(self.version(), PacketId::BanchoRestart)
    }

    async fn write_rtx(&mut self, _message: &str) -> Result<()> {
        gated(self.version(), PacketId::BanchoRtx)
    }

    //=== Multiplayer ===//

    async fn write_match_update(&mut self, _m: &Match) -> Result<()> {
        gated(self.version(), PacketId::BanchoMatchUpdate)
    }

    async fn write_match_new(&mut self, _m: &Match) -> Result<()> {
        gated(self.version(), PacketId::BanchoMatchNew)
    }

    async fn write_match_disband(&mut self, _match_id: u32) -> Result<()> {
        gated(self.version(), PacketId::BanchoMatchDisband)
    }

    async fn write_lobby_join(&mut self, _user_id: i32) -> Result<()> {
        gated(self.version(), PacketId::BanchoLobbyJoin)
    }

    async fn write_lobby_part(&mut self, _user_id: i32) -> Result<()> {
        gated(self.version(), PacketId::BanchoLobbyPart)
    }

    async fn write_match_join_success(&mut self, _m: &Match) -> Result<()> {
        gated(self.version(), PacketId::BanchoMatchJoinSuccess)
    }

    async fn write_match_join_fail(&mut self) -> Result<()> {
        gated(self.version(), PacketId::BanchoMatchJoinFail)
    }

    async fn write_match_start(&mut self, _m: &Match) -> Result<()> {
        gated(self.version(), PacketId::BanchoMatchStart)
    }

    async fn write_match_score_update(&mut self, _frame: &ScoreFrame) -> Result<()> {
        gated(self.version(), PacketId::BanchoMatchScoreUpdate)
    }

    async fn write_match_transfer_host(&mut self) -> Result<()> {
        gated(self.version(), PacketId::BanchoMatchTransferHost)
    }

    async fn write_match_all_players_loaded(&mut self) -> Result<()> {
        gated(self.version(), PacketId::BanchoMatchAllPlayersLoaded)
    }

    async fn write_match_player_failed(&mut self, _slot_id: u32) -> Result<()> {
        gated(self.version(), PacketId::BanchoMatchPlayerFailed)
    }

    async fn write_match_player_skipped(&mut self, _slot_id: i32) -> Result<()> {
        gated(self.version(), PacketId::BanchoMatchPlayerSkipped)
    }

    async fn write_match_complete(&mut self) -> Result<()> {
        gated(self.version(), PacketId::BanchoMatchComplete)
    }

    async fn write_match_skip(&mut self) -> Result<()> {
        gated(self.version(), PacketId::BanchoMatchSkip)
    }

    async fn write_match_change_password(&mut self, _password: &str) -> Result<()> {
        gated(self.version(), PacketId::BanchoMatchChangePassword)
    }

    async fn write_match_abort(&mut self) -> Result<()> {
        gated(self.version(), PacketId::BanchoMatchAbort)
    }

    async fn write_invite(&mut self, _message: &Message) -> Result<()> {
        gated(self.version(), PacketId::BanchoInvite)
    }

    //=== Channels ===//

    async fn write_channel_join_success(&mut self, _channel: &str) -> Result<()> {
        gated(self.version(), PacketId::BanchoChannelJoinSuccess)
    }

    async fn write_channel_revoked(&mut self, _channel: &str) -> Result<()> {
        gated(self.version(), PacketId::BanchoChannelRevoked)
    }

    async fn write_channel_available(&mut self, _channel: &Channel) -> Result<()> {
        gated(self.version(), PacketId::BanchoChannelAvailable)
    }

    async fn write_channel_available_autojoin(&mut self, _channel: &Channel) -> Result<()> {
        gated(self.version(), PacketId::BanchoChannelAvailableAutojoin)
    }

    async fn write_channel_info_complete(&mut self) -> Result<()> {
        gated(self.version(), PacketId::BanchoChannelInfoComplete)
    }

    //=== Account & Social ===//

    async fn write_unauthorized(&mut self) -> Result<()> {
        gated(self.version(), PacketId::BanchoUnauthorized)
    }

    async fn write_beatmap_info_reply(&mut self, _reply: &BeatmapInfoReply) -> Result<()> {
        gated(self.version(), PacketId::BanchoBeatmapInfoReply)
    }

    async fn write_login_permissions(&mut self, _permissions: u32) -> Result<()> {
        gated(self.version(), PacketId::BanchoLoginPermissions)
    }

    async fn write_friends_list(&mut self, _user_ids: &[i32]) -> Result<()> {
        gated(self.version(), PacketId::BanchoFriendsList)
    }

    async fn write_protocol_negotiation(&mut self, _version: i32) -> Result<()> {
        gated(self.version(), PacketId::BanchoProtocolNegotiation)
    }

    async fn write_account_restricted(&mut self) -> Result<()> {
        gated(self.version(), PacketId::BanchoAccountRestricted)
    }

    async fn write_switch_server(&mut self, _target: i32) -> Result<()> {
        gated(self.version(), PacketId::BanchoSwitchServer)
    }

    async fn write_switch_tournament_server(&mut self, _ip: &str) -> Result<()> {
        gated(self.version(), PacketId::BanchoSwitchTournamentServer)
    }

    //=== Moderation ===//

    async fn write_silence_info(&mut self, _time_remaining: i32) -> Result<()> {
        gated(self.version(), PacketId::BanchoSilenceInfo)
    }

    async fn write_user_silenced(&mut self, _user_id: u32) -> Result<()> {
        gated(self.version(), PacketId::BanchoUserSilenced)
    }

    async fn write_user_dms_blocked(&mut self, _target_name: &str) -> Result<()> {
        gated(self.version(), PacketId::BanchoUserDmsBlocked)
    }

    async fn write_target_is_silenced(&mut self, _target_name: &str) -> Result<()> {
        gated(self.version(), PacketId::BanchoTargetIsSilenced)
    }
}
