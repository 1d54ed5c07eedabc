use crate::{
    data::Observation,
    detect::{detect, ChangeReport},
    error::MonitorError,
    notify::Issue,
    report::{issue_title, render},
    store::SnapshotStore,
    utils, Extractor, Notifier, PageSource,
};
use chrono::FixedOffset;
use scraper::Html;
use std::{fmt, path::PathBuf};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub url: String,
    pub data_file: PathBuf,
    pub project_name: String,
    pub labels: Vec<String>,
    /// Offset the capture timestamp is recorded and reported in.
    pub utc_offset: FixedOffset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Detecting,
    Rendering,
    Notifying,
    Saving,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Fetching => "fetching",
            Stage::Detecting => "detecting",
            Stage::Rendering => "rendering",
            Stage::Notifying => "notifying",
            Stage::Saving => "saving",
            Stage::Done => "done",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Created(String),
    /// No notifier configured.
    Skipped,
    Unchanged,
    Failed(String),
}

#[derive(Debug)]
pub struct RunOutcome {
    pub observation: Observation,
    pub report: ChangeReport,
    pub body: Option<String>,
    pub notification: Notification,
    pub saved: bool,
}

/// One fetch, diff, notify and save cycle.
pub struct Monitor<P, E> {
    config: Config,
    source: P,
    extractor: E,
    store: SnapshotStore,
    notifier: Option<Box<dyn Notifier + Send + Sync>>,
}

impl<P, E> Monitor<P, E>
where
    P: PageSource,
    E: Extractor,
{
    pub fn new(config: Config, source: P, extractor: E) -> Self {
        let store = SnapshotStore::new(config.data_file.clone());
        Monitor {
            config,
            source,
            extractor,
            store,
            notifier: None,
        }
    }

    pub fn with_notifier<N: Notifier + Send + Sync + 'static>(mut self, notifier: N) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    /// Fails only when the page cannot be fetched. Snapshot and notification
    /// problems are logged and reflected in the outcome.
    pub async fn run(&self) -> Result<RunOutcome, MonitorError> {
        info!(stage = %Stage::Fetching, "Checking {}", self.config.url);
        let observation = self.observe().await?;
        debug!("Observed\n{}", observation);

        info!(stage = %Stage::Detecting, "Comparing with {}", self.store.path().display());
        let previous = match self.store.load().await {
            Ok(previous) => previous,
            Err(e) => {
                warn!("Ignoring unreadable snapshot: {}", e);
                None
            }
        };
        let report = detect(previous.as_ref(), &observation);

        let (body, notification) = if report.changed {
            info!(stage = %Stage::Rendering, "Changes detected");
            for change in &report.changes {
                info!("{}", change.rendered);
            }
            let body = render(&observation, &report);
            let notification = self.notify(&observation, &body).await;
            (Some(body), notification)
        } else {
            info!("No changes detected");
            (None, Notification::Unchanged)
        };

        info!(stage = %Stage::Saving, "Saving snapshot");
        let saved = match self.store.save(&observation).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to save snapshot: {}", e);
                false
            }
        };

        info!(stage = %Stage::Done, "Check completed");
        Ok(RunOutcome {
            observation,
            report,
            body,
            notification,
            saved,
        })
    }

    async fn observe(&self) -> Result<Observation, MonitorError> {
        let html = self.source.fetch(&self.config.url).await?;
        let fields = {
            let doc = Html::parse_document(&html);
            self.extractor.extract(&doc)
        };
        let timestamp = utils::now_in(self.config.utc_offset);
        Ok(Observation::new(fields, self.config.url.as_str(), timestamp))
    }

    async fn notify(&self, observation: &Observation, body: &str) -> Notification {
        let Some(notifier) = self.notifier.as_ref() else {
            info!("No issue credentials, skipping notification");
            return Notification::Skipped;
        };

        info!(stage = %Stage::Notifying, "Creating issue");
        let issue = Issue {
            title: issue_title(&self.config.project_name, observation),
            body: body.to_string(),
            labels: self.config.labels.clone(),
        };
        match notifier.notify(&issue).await {
            Ok(url) => {
                info!("Issue created: {}", url);
                Notification::Created(url)
            }
            Err(e) => {
                error!("Failed to create issue: {}", e);
                Notification::Failed(e.to_string())
            }
        }
    }
}
