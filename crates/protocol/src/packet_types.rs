//! # Canonical Packet Structures
//!
//! Version-independent payload types. Adapters borrow these for the duration
//! of one encode call and build fresh ones when decoding.
//!
//! Fields a given client version cannot express are dropped (or inferred) by
//! that version's adapter, never by these types.

use serde::{Deserialize, Serialize};

/// The only public channel legacy clients know about
pub const DEFAULT_CHANNEL: &str = "#osu";

// ============================================================================
// STATUS
// ============================================================================

/// What a user is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum StatusAction {
    #[default]
    Idle = 0,
    Afk = 1,
    Playing = 2,
    Editing = 3,
    Modding = 4,
    Multiplayer = 5,
    Watching = 6,
    Unknown = 7,
    Testing = 8,
    Submitting = 9,
    Paused = 10,
    Lobby = 11,
    Multiplaying = 12,
    OsuDirect = 13,
}

impl StatusAction {
    /// Map a raw action byte; values without a meaning become `Unknown`
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Afk,
            2 => Self::Playing,
            3 => Self::Editing,
            4 => Self::Modding,
            5 => Self::Multiplayer,
            6 => Self::Watching,
            8 => Self::Testing,
            9 => Self::Submitting,
            10 => Self::Paused,
            11 => Self::Lobby,
            12 => Self::Multiplaying,
            13 => Self::OsuDirect,
            _ => Self::Unknown,
        }
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// A user's current activity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserStatus {
    pub action: StatusAction,
    /// Free text shown next to the action (usually the beatmap title)
    pub text: String,
    pub beatmap_checksum: String,
    /// Enabled gameplay mods bitmask
    pub mods: u32,
    pub mode: u8,
    pub beatmap_id: i32,
    /// Ask legacy clients to refresh this user's stats
    pub update_stats: bool,
}

// ============================================================================
// USERS
// ============================================================================

/// Ranked statistics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserStats {
    pub ranked_score: u64,
    /// Accuracy in the range 0.0-1.0
    pub accuracy: f64,
    pub play_count: i32,
    pub total_score: u64,
    pub rank: i32,
    pub pp: u16,
}

/// Per-user metadata broadcast alongside statistics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserPresence {
    /// Connected through the IRC gateway rather than the game client
    pub is_irc: bool,
    /// UTC offset in hours (-24..=24)
    pub timezone: i8,
    pub city: String,
    pub country_code: u8,
    pub latitude: f32,
    pub longitude: f32,
    pub permissions: u8,
}

impl UserPresence {
    /// Timezone shifted into the unsigned 0-48 wire range
    pub fn timezone_byte(&self) -> u8 {
        (self.timezone.clamp(-24, 24) + 24) as u8
    }
}

/// Everything the session registry knows about a user
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i32,
    pub name: String,
    pub stats: UserStats,
    pub status: UserStatus,
    pub presence: UserPresence,
}

/// Which connections a quitting user still has open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QuitState {
    /// Fully gone
    #[default]
    NormalQuit = 0,
    /// Still online through the game client
    RemainsOnGameClient = 1,
    /// Still online through the IRC gateway
    RemainsOnLegacyTextChannel = 2,
}

/// User quit notification
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserQuit {
    pub info: UserInfo,
    pub quit_state: QuitState,
}

// ============================================================================
// CHAT
// ============================================================================

/// Chat message
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub content: String,
    /// Channel name (`#...`) or user name
    pub target: String,
    pub sender_id: i32,
}

impl Message {
    pub fn new(sender: impl Into<String>, content: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            target: target.into(),
            sender_id: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub topic: String,
    pub owner: String,
    pub user_count: u16,
}

// ============================================================================
// SPECTATING
// ============================================================================

/// Held buttons bitmask of a replay frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ButtonState(pub u8);

impl ButtonState {
    pub const NONE: ButtonState = ButtonState(0);
    pub const LEFT1: ButtonState = ButtonState(1);
    pub const RIGHT1: ButtonState = ButtonState(2);
    pub const LEFT2: ButtonState = ButtonState(4);
    pub const RIGHT2: ButtonState = ButtonState(8);
    pub const SMOKE: ButtonState = ButtonState(16);

    #[inline]
    pub fn contains(self, other: ButtonState) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    #[inline]
    pub fn insert(&mut self, other: ButtonState) {
        self.0 |= other.0;
    }
}

impl std::ops::BitOr for ButtonState {
    type Output = ButtonState;

    fn bitor(self, rhs: ButtonState) -> ButtonState {
        ButtonState(self.0 | rhs.0)
    }
}

/// One input snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub button_state: ButtonState,
    /// Older clients' separate button byte
    pub legacy_byte: u8,
    pub mouse_x: f32,
    pub mouse_y: f32,
    /// Elapsed time in milliseconds
    pub time: i32,
}

/// Live score snapshot, used by multiplayer and newer spectator frames
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreFrame {
    pub time: i32,
    pub id: u8,
    pub total_300: u16,
    pub total_100: u16,
    pub total_50: u16,
    pub total_geki: u16,
    pub total_katu: u16,
    pub total_miss: u16,
    pub total_score: u32,
    pub max_combo: u16,
    pub current_combo: u16,
    pub perfect: bool,
    pub hp: u8,
    pub tag_byte: u8,
}

/// Batch of frames relayed to spectators
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReplayFrameBundle {
    pub frames: Vec<ReplayFrame>,
    pub action: u8,
    pub extra: i32,
    pub score_frame: Option<ScoreFrame>,
}

// ============================================================================
// MULTIPLAYER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchSlot {
    pub status: u8,
    pub team: u8,
    pub user_id: i32,
    pub mods: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Match {
    pub id: u16,
    pub in_progress: bool,
    pub match_type: u8,
    pub mods: u32,
    pub name: String,
    pub password: String,
    pub beatmap_text: String,
    pub beatmap_id: i32,
    pub beatmap_checksum: String,
    pub slots: Vec<MatchSlot>,
    pub host_id: i32,
    pub mode: u8,
    pub scoring_type: u8,
    pub team_type: u8,
    pub freemod: bool,
    pub seed: i32,
}

// ============================================================================
// MISC
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BeatmapInfo {
    pub index: i16,
    pub beatmap_id: i32,
    pub beatmapset_id: i32,
    pub thread_id: i32,
    pub ranked: u8,
    pub checksum: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BeatmapInfoReply {
    pub beatmaps: Vec<BeatmapInfo>,
}

/// Main menu banner
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TitleUpdate {
    pub image_url: String,
    pub redirect_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_action_from_u8() {
        assert_eq!(StatusAction::from_u8(2), StatusAction::Playing);
        assert_eq!(StatusAction::from_u8(7), StatusAction::Unknown);
        assert_eq!(StatusAction::from_u8(13), StatusAction::OsuDirect);
        assert_eq!(StatusAction::from_u8(200), StatusAction::Unknown);
    }

    #[test]
    fn test_timezone_byte() {
        let mut presence = UserPresence::default();
        assert_eq!(presence.timezone_byte(), 24);

        presence.timezone = -24;
        assert_eq!(presence.timezone_byte(), 0);

        presence.timezone = 24;
        assert_eq!(presence.timezone_byte(), 48);

        presence.timezone = 100;
        assert_eq!(presence.timezone_byte(), 48);
    }

    #[test]
    fn test_button_state() {
        let state = ButtonState::LEFT1 | ButtonState::RIGHT2;
        assert!(state.contains(ButtonState::LEFT1));
        assert!(state.contains(ButtonState::RIGHT2));
        assert!(!state.contains(ButtonState::RIGHT1));
        assert!(!state.contains(ButtonState::NONE));
    }
}
