//! Rendering of the status board embed and change notifications

use chrono::{DateTime, SecondsFormat, Utc};

use crate::clients::discord::{Embed, EmbedField, EmbedFooter};
use crate::compat::classifier::{Classification, classify};
use crate::compat::extractor::VersionPair;
use crate::compat::format::format_version;
use crate::compat::snapshot::VersionSnapshot;

const TITLE: &str = "FX Client Status";
const FOOTER: &str = "Last checked";

/// `1.23.4 (protocol 123)`, or `Unknown` when the pair is missing
pub fn describe_pair(pair: Option<&VersionPair>) -> String {
    match pair {
        Some(pair) => format!(
            "{} (protocol {})",
            format_version(Some(&pair.game)),
            pair.protocol
        ),
        None => format_version(None),
    }
}

fn describe_client(classification: &Classification) -> String {
    format!(
        "{} {}",
        classification.client.emoji(),
        classification.client.label()
    )
}

fn describe_lobby(snapshot: &VersionSnapshot, classification: &Classification) -> String {
    let status = format!(
        "{} {}",
        classification.lobby.emoji(),
        classification.lobby.label()
    );
    match &snapshot.custom_lobby {
        Some(protocol) => format!("{status} (protocol {protocol})"),
        None => status,
    }
}

/// Build the embed that replaces the status board message
///
/// The custom lobby field is only shown when a lobby is configured.
pub fn render_status_embed(
    snapshot: &VersionSnapshot,
    classification: &Classification,
    show_lobby: bool,
    now: DateTime<Utc>,
) -> Embed {
    let mut fields = vec![
        EmbedField {
            name: "Vanilla version".to_string(),
            value: describe_pair(snapshot.vanilla.as_ref()),
            inline: true,
        },
        EmbedField {
            name: "FX version".to_string(),
            value: describe_pair(snapshot.fx.as_ref()),
            inline: true,
        },
    ];

    if show_lobby {
        fields.push(EmbedField {
            name: "Custom lobby".to_string(),
            value: describe_lobby(snapshot, classification),
            inline: false,
        });
    }

    Embed {
        title: TITLE.to_string(),
        description: describe_client(classification),
        color: classification.severity().color(),
        fields,
        footer: EmbedFooter {
            text: FOOTER.to_string(),
        },
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

fn describe_snapshot(snapshot: &VersionSnapshot, show_lobby: bool) -> String {
    let classification = classify(
        snapshot.vanilla.as_ref(),
        snapshot.fx.as_ref(),
        snapshot.custom_lobby.as_deref(),
    );
    let mut text = format!(
        "{}\nVanilla: {} | FX: {}",
        describe_client(&classification),
        describe_pair(snapshot.vanilla.as_ref()),
        describe_pair(snapshot.fx.as_ref())
    );
    if show_lobby {
        text.push_str(&format!(
            "\nCustom lobby: {}",
            describe_lobby(snapshot, &classification)
        ));
    }
    text
}

/// Text of the notification sent when the snapshot changed
pub fn change_notification(
    previous: Option<&VersionSnapshot>,
    current: &VersionSnapshot,
    show_lobby: bool,
) -> String {
    let old = previous
        .map(|snapshot| describe_snapshot(snapshot, show_lobby))
        .unwrap_or_else(|| "none recorded".to_string());

    format!(
        "Status changed\nOld status: {}\nNew status: {}",
        old,
        describe_snapshot(current, show_lobby)
    )
}

/// Text of the alert sent when a rebuild could not be started
pub const MANUAL_UPDATE_ALERT: &str =
    "FX is outdated and the latest rebuild workflow run did not succeed; a manual update is needed.";
