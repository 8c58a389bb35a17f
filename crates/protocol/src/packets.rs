//! # Canonical Bancho Packet Identifiers
//!
//! Every adapter speaks in terms of these version-independent IDs. Each
//! client version remaps them to its own wire numbering (see [`crate::remap`]).
//!
//! ## Naming Convention
//!
//! - `Osu*` = client-to-server packets
//! - `Bancho*` = server-to-client packets
//!
//! ## Sentinel
//!
//! [`PacketId::IrcJoin`] sits outside the dense ID range (`0xFFFF`). Older
//! clients reserve a wire slot for it; modern clients have no such packet.

use serde::{Deserialize, Serialize};

macro_rules! packet_ids {
    ($( $(#[$meta:meta])* $name:ident = $value:literal, )*) => {
        /// Canonical packet identifier shared by all version adapters
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(u16)]
        pub enum PacketId {
            $( $(#[$meta])* $name = $value, )*
        }

        impl PacketId {
            /// Every canonical packet ID, in ascending order
            pub const ALL: &'static [PacketId] = &[ $( PacketId::$name, )* ];

            /// Map a raw canonical value to its packet ID
            ///
            /// Returns `None` for values no packet is assigned to (e.g. 84).
            pub fn from_u16(value: u16) -> Option<Self> {
                match value {
                    $( $value => Some(PacketId::$name), )*
                    _ => None,
                }
            }

            /// Packet name as used in logs and error messages
            pub fn name(self) -> &'static str {
                match self {
                    $( PacketId::$name => stringify!($name), )*
                }
            }
        }
    };
}

packet_ids! {
    //=== Presence & Chat ===//

    /// Client reports its current activity
    OsuSendUserStatus = 0,
    /// Client sends a message to a public channel
    OsuSendIrcMessage = 1,
    /// Client is logging out
    OsuExit = 2,
    /// Client asks for its own stats to be re-sent
    OsuRequestStatusUpdate = 3,
    /// Client answers a ping
    OsuPong = 4,
    /// Login result (user id, or a negative failure code)
    BanchoLoginReply = 5,
    BanchoCommandError = 6,
    /// Chat message relayed to the client
    BanchoSendMessage = 7,
    BanchoPing = 8,
    /// IRC user renamed (`old>>>>new`)
    BanchoHandleIrcChangeUsername = 9,
    /// IRC user left
    BanchoHandleIrcQuit = 10,
    /// Stats broadcast for one user
    BanchoHandleOsuUpdate = 11,
    /// Game client user left
    BanchoHandleOsuQuit = 12,

    //=== Spectating ===//

    BanchoSpectatorJoined = 13,
    BanchoSpectatorLeft = 14,
    /// Replay frames relayed to a spectator
    BanchoSpectateFrames = 15,
    OsuStartSpectating = 16,
    OsuStopSpectating = 17,
    /// Replay frames sent by the spectated player
    OsuSpectateFrames = 18,
    /// Tell the client a newer build is available
    BanchoVersionUpdate = 19,
    /// Client-side exception report
    OsuErrorReport = 20,
    OsuCantSpectate = 21,
    BanchoSpectatorCantSpectate = 22,
    /// Flash the client window
    BanchoGetAttention = 23,
    /// Server-wide notification
    BanchoAnnounce = 24,
    OsuSendIrcMessagePrivate = 25,

    //=== Multiplayer ===//

    BanchoMatchUpdate = 26,
    BanchoMatchNew = 27,
    BanchoMatchDisband = 28,
    OsuLobbyPart = 29,
    OsuLobbyJoin = 30,
    OsuMatchCreate = 31,
    OsuMatchJoin = 32,
    OsuMatchPart = 33,
    BanchoLobbyJoin = 34,
    BanchoLobbyPart = 35,
    BanchoMatchJoinSuccess = 36,
    BanchoMatchJoinFail = 37,
    OsuMatchChangeSlot = 38,
    OsuMatchReady = 39,
    OsuMatchLock = 40,
    OsuMatchChangeSettings = 41,
    BanchoFellowSpectatorJoined = 42,
    BanchoFellowSpectatorLeft = 43,
    OsuMatchStart = 44,
    AllPlayersLoaded = 45,
    BanchoMatchStart = 46,
    OsuMatchScoreUpdate = 47,
    BanchoMatchScoreUpdate = 48,
    OsuMatchComplete = 49,
    BanchoMatchTransferHost = 50,
    OsuMatchChangeMods = 51,
    OsuMatchLoadComplete = 52,
    BanchoMatchAllPlayersLoaded = 53,
    OsuMatchNoBeatmap = 54,
    OsuMatchNotReady = 55,
    OsuMatchFailed = 56,
    BanchoMatchPlayerFailed = 57,
    BanchoMatchComplete = 58,
    OsuMatchHasBeatmap = 59,
    OsuMatchSkipRequest = 60,
    BanchoMatchSkip = 61,
    BanchoUnauthorized = 62,

    //=== Channels & Social ===//

    OsuChannelJoin = 63,
    BanchoChannelJoinSuccess = 64,
    BanchoChannelAvailable = 65,
    BanchoChannelRevoked = 66,
    BanchoChannelAvailableAutojoin = 67,
    OsuBeatmapInfoRequest = 68,
    BanchoBeatmapInfoReply = 69,
    OsuMatchTransferHost = 70,
    BanchoLoginPermissions = 71,
    BanchoFriendsList = 72,
    OsuFriendsAdd = 73,
    OsuFriendsRemove = 74,
    BanchoProtocolNegotiation = 75,
    BanchoTitleUpdate = 76,
    OsuMatchChangeTeam = 77,
    OsuChannelLeave = 78,
    OsuReceiveUpdates = 79,
    BanchoMonitor = 80,
    BanchoMatchPlayerSkipped = 81,
    OsuSetIrcAwayMessage = 82,
    BanchoUserPresence = 83,
    OsuUserStatsRequest = 85,
    BanchoRestart = 86,
    OsuInvite = 87,
    BanchoInvite = 88,
    BanchoChannelInfoComplete = 89,
    OsuMatchChangePassword = 90,
    BanchoMatchChangePassword = 91,

    //=== Moderation & Tournaments ===//

    BanchoSilenceInfo = 92,
    OsuTournamentMatchInfo = 93,
    BanchoUserSilenced = 94,
    BanchoUserPresenceSingle = 95,
    BanchoUserPresenceBundle = 96,
    OsuPresenceRequest = 97,
    OsuPresenceRequestAll = 98,
    OsuChangeFriendOnlyDms = 99,
    BanchoUserDmsBlocked = 100,
    BanchoTargetIsSilenced = 101,
    BanchoVersionUpdateForced = 102,
    BanchoSwitchServer = 103,
    BanchoAccountRestricted = 104,
    BanchoRtx = 105,
    BanchoMatchAbort = 106,
    BanchoSwitchTournamentServer = 107,
    OsuTournamentJoinMatchChannel = 108,
    OsuTournamentLeaveMatchChannel = 109,

    //=== Legacy ===//

    /// IRC user joined (legacy clients only)
    IrcJoin = 0xFFFF,
}

impl PacketId {
    /// Raw canonical value
    #[inline]
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Whether this is the out-of-range legacy sentinel
    #[inline]
    pub fn is_sentinel(self) -> bool {
        self == PacketId::IrcJoin
    }
}

impl std::fmt::Display for PacketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name(), self.as_u16())
    }
}
