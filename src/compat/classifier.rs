//! Compatibility classification between vanilla, FX and the custom lobby

use crate::compat::extractor::VersionPair;

/// Status of the FX client relative to vanilla
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientStatus {
    /// At least one version could not be extracted
    Unknown,
    /// Game versions are equal
    UpToDate,
    /// Game versions differ but the protocol is the same, so multiplayer still works
    OutdatedCompatible,
    /// Protocol versions differ
    OutdatedIncompatible,
}

impl ClientStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ClientStatus::Unknown => "Unknown (Failed to parse version)",
            ClientStatus::UpToDate => "Up to date",
            ClientStatus::OutdatedCompatible => "Outdated, usable for multiplayer",
            ClientStatus::OutdatedIncompatible => "Outdated",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ClientStatus::Unknown => "⭕",
            ClientStatus::UpToDate => "🟢",
            ClientStatus::OutdatedCompatible => "🟡",
            ClientStatus::OutdatedIncompatible => "🟠",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ClientStatus::UpToDate => Severity::Success,
            ClientStatus::OutdatedCompatible => Severity::Warning,
            ClientStatus::Unknown | ClientStatus::OutdatedIncompatible => Severity::Alert,
        }
    }
}

/// Status of the third-party lobby server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyStatus {
    /// No version could be read from the server
    Offline,
    /// Server speaks the vanilla protocol
    UpToDateVanilla,
    /// Server speaks the FX protocol
    UpToDateMod,
    /// Server is reachable but matches neither client
    OnlineUnverified,
}

impl LobbyStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LobbyStatus::Offline => "Offline",
            LobbyStatus::UpToDateVanilla => "Up to date",
            LobbyStatus::UpToDateMod => "Up to date with FX",
            LobbyStatus::OnlineUnverified => "Online, compatibility unverified",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            LobbyStatus::Offline => "⚫",
            LobbyStatus::UpToDateVanilla => "🟢",
            LobbyStatus::UpToDateMod => "🔵",
            LobbyStatus::OnlineUnverified => "🟡",
        }
    }
}

/// Overall severity, used for the status board accent color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Alert,
}

impl Severity {
    pub fn color(&self) -> u32 {
        match self {
            Severity::Success => 0x66bb6a,
            Severity::Warning => 0xff8d01,
            Severity::Alert => 0xef5250,
        }
    }
}

/// Result of classifying one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub parsing_failed: bool,
    pub game_versions_match: bool,
    pub protocol_versions_match: bool,
    pub client: ClientStatus,
    pub lobby: LobbyStatus,
}

impl Classification {
    pub fn severity(&self) -> Severity {
        self.client.severity()
    }

    /// Whether FX lags behind vanilla on game version and a rebuild should be attempted
    pub fn needs_rebuild(&self) -> bool {
        !self.parsing_failed && !self.game_versions_match
    }
}

/// Classify the FX client and the custom lobby against vanilla
pub fn classify(
    vanilla: Option<&VersionPair>,
    fx: Option<&VersionPair>,
    custom_lobby_protocol: Option<&str>,
) -> Classification {
    let (parsing_failed, game_versions_match, protocol_versions_match) = match (vanilla, fx) {
        (Some(vanilla), Some(fx)) => (
            false,
            vanilla.game == fx.game,
            vanilla.protocol == fx.protocol,
        ),
        _ => (true, false, false),
    };

    let client = if parsing_failed {
        ClientStatus::Unknown
    } else if game_versions_match {
        ClientStatus::UpToDate
    } else if protocol_versions_match {
        ClientStatus::OutdatedCompatible
    } else {
        ClientStatus::OutdatedIncompatible
    };

    let lobby = match custom_lobby_protocol {
        None => LobbyStatus::Offline,
        Some(p) if vanilla.is_some_and(|v| v.protocol == p) => LobbyStatus::UpToDateVanilla,
        Some(p) if fx.is_some_and(|f| f.protocol == p) => LobbyStatus::UpToDateMod,
        Some(_) => LobbyStatus::OnlineUnverified,
    };

    Classification {
        parsing_failed,
        game_versions_match,
        protocol_versions_match,
        client,
        lobby,
    }
}
