//! One monitoring cycle
//!
//! Fetch sources, classify, notify on change, refresh the status board, then
//! attempt a rebuild when FX is behind.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::clients::discord::{ChatApi, DiscordClient};
use crate::clients::github::{GitHubActionsClient, WorkflowApi};
use crate::clients::page::{HttpPageFetcher, PageFetcher, fetch_optional};
use crate::compat::classifier::{Classification, classify};
use crate::compat::extractor::VersionExtractor;
use crate::compat::snapshot::{VersionSnapshot, reconcile};
use crate::config::Config;
use crate::monitor::error::MonitorError;
use crate::monitor::rebuild::{RebuildContext, RebuildOutcome, coordinate_rebuild};
use crate::monitor::status_board::{change_notification, render_status_embed};
use crate::store::{SqliteStore, StateStore, VERSION_INFO_KEY};

/// Summary of a completed cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub snapshot: VersionSnapshot,
    pub classification: Classification,
    pub notified: bool,
    pub rebuild: RebuildOutcome,
}

pub struct Monitor<S: StateStore> {
    config: Config,
    extractor: VersionExtractor,
    pages: Arc<dyn PageFetcher>,
    chat: Arc<dyn ChatApi>,
    workflows: Arc<dyn WorkflowApi>,
    store: Arc<S>,
}

impl Monitor<SqliteStore> {
    /// Build a monitor talking to the real services configured in `config`
    pub fn new(config: Config) -> Result<Self, MonitorError> {
        let db_path = config.database_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store = Arc::new(SqliteStore::new(&db_path)?);

        let pages = Arc::new(HttpPageFetcher::new()?);
        let chat = Arc::new(DiscordClient::new(
            &config.api.discord_base_url,
            &config.chat_bot_token,
        )?);
        let workflows = Arc::new(GitHubActionsClient::new(
            &config.api.github_base_url,
            &config.workflow_api_token,
            config.workflow.clone(),
        )?);

        Ok(Self::build(config, pages, chat, workflows, store))
    }
}

impl<S: StateStore> Monitor<S> {
    /// Build a monitor with custom collaborators
    pub fn build(
        config: Config,
        pages: Arc<dyn PageFetcher>,
        chat: Arc<dyn ChatApi>,
        workflows: Arc<dyn WorkflowApi>,
        store: Arc<S>,
    ) -> Self {
        Self {
            config,
            extractor: VersionExtractor::new(),
            pages,
            chat,
            workflows,
            store,
        }
    }

    /// Run one cycle, reporting any failure to the notification channel
    ///
    /// Never fails: errors are logged and a best-effort error notification is
    /// sent. The next scheduled run retries everything.
    pub async fn run(&self) -> Option<CycleReport> {
        match self.run_cycle().await {
            Ok(report) => Some(report),
            Err(e) => {
                error!("Status check failed: {}", e);
                let _ = self
                    .chat
                    .send_notification(
                        &self.config.notification_channel_id,
                        &format!("Error: {e}"),
                    )
                    .await
                    .inspect_err(|e| warn!("Failed to report error: {}", e));
                None
            }
        }
    }

    /// Run one cycle, propagating chat, workflow and store failures
    pub async fn run_cycle(&self) -> Result<CycleReport, MonitorError> {
        let snapshot = self.observe().await;
        let classification = classify(
            snapshot.vanilla.as_ref(),
            snapshot.fx.as_ref(),
            snapshot.custom_lobby.as_deref(),
        );
        info!(
            "Client: {:?}, lobby: {:?}, vanilla: {:?}, fx: {:?}",
            classification.client, classification.lobby, snapshot.vanilla, snapshot.fx
        );

        let show_lobby = self.config.custom_lobby_version_url().is_some();
        let channel = &self.config.notification_channel_id;

        let persisted = self.store.get(VERSION_INFO_KEY)?;
        let reconciliation = reconcile(&snapshot, persisted.as_deref());
        if reconciliation.should_notify {
            info!("Version info changed, notifying");
            let text =
                change_notification(reconciliation.previous.as_ref(), &snapshot, show_lobby);
            self.chat.send_notification(channel, &text).await?;
            self.store.put(VERSION_INFO_KEY, &reconciliation.canonical)?;
        }

        let embed = render_status_embed(&snapshot, &classification, show_lobby, Utc::now());
        self.chat
            .edit_embed(
                &self.config.status_channel_id,
                &self.config.status_message_id,
                &embed,
            )
            .await?;

        let ctx = RebuildContext {
            workflows: self.workflows.as_ref(),
            chat: self.chat.as_ref(),
            store: self.store.as_ref(),
            notification_channel_id: channel,
        };
        let rebuild = coordinate_rebuild(&ctx, &classification).await?;

        Ok(CycleReport {
            snapshot,
            classification,
            notified: reconciliation.should_notify,
            rebuild,
        })
    }

    /// Fetch all sources concurrently and extract versions
    async fn observe(&self) -> VersionSnapshot {
        let pages = self.pages.as_ref();
        let lobby_url = self.config.custom_lobby_version_url();

        let (vanilla_text, fx_text, lobby_text) = futures::join!(
            fetch_optional(pages, &self.config.sources.vanilla_url),
            fetch_optional(pages, &self.config.sources.fx_url),
            async {
                match &lobby_url {
                    Some(url) => fetch_optional(pages, url).await,
                    None => None,
                }
            }
        );

        let vanilla = self.extractor.extract(vanilla_text.as_deref());
        let fx = self.extractor.extract(fx_text.as_deref());
        if vanilla.is_none() {
            warn!("Could not extract vanilla version");
        }
        if fx.is_none() {
            warn!("Could not extract FX version");
        }

        let custom_lobby = lobby_text
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        VersionSnapshot::new(vanilla, fx, custom_lobby)
    }
}
