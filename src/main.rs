use chrono::{FixedOffset, Offset, Utc};
use clap::{Parser, ValueEnum};
use crowdfund_watch::{
    fetch::{HttpSource, DESKTOP_USER_AGENT},
    kibidango::{self, KibidangoExtractor},
    notify::{GithubNotifier, GITHUB_API},
    Config, Monitor, MonitorError, PageSource,
};
use std::{path::PathBuf, process::ExitCode, time::Duration};
use tracing::{error, info, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Fetcher {
    /// Plain HTTP GET
    Http,
    /// Headless Chromium render (needs the `browser` feature)
    Browser,
}

/// Checks a crowdfunding project page and reports what changed since the last run.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[arg(long, env = "WATCH_URL", default_value = kibidango::DEFAULT_PROJECT_URL)]
    url: String,

    /// Snapshot of the previous run
    #[arg(long, env = "WATCH_DATA_FILE", default_value = "data.json")]
    data_file: PathBuf,

    #[arg(long, env = "WATCH_PROJECT_NAME", default_value = kibidango::DEFAULT_PROJECT_NAME)]
    project_name: String,

    #[arg(long, env = "WATCH_FETCHER", value_enum, default_value_t = Fetcher::Http)]
    fetcher: Fetcher,

    /// Upper bound for fetching or rendering the page
    #[arg(long, env = "WATCH_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    #[arg(long, env = "WATCH_USER_AGENT", default_value = DESKTOP_USER_AGENT)]
    user_agent: String,

    /// Issue label, repeatable
    #[arg(long = "label", env = "WATCH_LABELS", value_delimiter = ',')]
    labels: Vec<String>,

    /// Offset used for the capture timestamp
    #[arg(
        long,
        env = "WATCH_UTC_OFFSET_HOURS",
        default_value_t = 9,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i32).range(-23..=23)
    )]
    utc_offset_hours: i32,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// owner/repo the issue is filed in
    #[arg(long, env = "GITHUB_REPOSITORY")]
    github_repository: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", default_value = GITHUB_API)]
    github_api: String,

    /// Never file an issue
    #[arg(long)]
    no_notify: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let utc_offset = FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| {
            warn!("Offset {}h out of range, using UTC", self.utc_offset_hours);
            Utc.fix()
        });
        let labels = if self.labels.is_empty() {
            kibidango::DEFAULT_LABELS.iter().map(ToString::to_string).collect()
        } else {
            self.labels.clone()
        };
        Config {
            url: self.url.clone(),
            data_file: self.data_file.clone(),
            project_name: self.project_name.clone(),
            labels,
            utc_offset,
        }
    }

    fn notifier(&self) -> Result<Option<GithubNotifier>, MonitorError> {
        if self.no_notify {
            return Ok(None);
        }
        match (&self.github_token, &self.github_repository) {
            (Some(token), Some(repository)) => Ok(Some(GithubNotifier::new(
                &self.github_api,
                token,
                repository,
            )?)),
            _ => Ok(None),
        }
    }
}

async fn run_with<P: PageSource>(cli: &Cli, source: P) -> Result<(), MonitorError> {
    let mut monitor = Monitor::new(cli.config(), source, KibidangoExtractor);
    match cli.notifier() {
        Ok(Some(notifier)) => monitor = monitor.with_notifier(notifier),
        Ok(None) => {}
        Err(e) => error!("Issue notifier disabled: {}", e),
    }
    monitor.run().await?;
    Ok(())
}

async fn run(cli: Cli) -> Result<(), MonitorError> {
    let timeout = Duration::from_secs(cli.timeout_secs);
    match cli.fetcher {
        Fetcher::Http => run_with(&cli, HttpSource::new(&cli.user_agent, timeout)?).await,
        #[cfg(feature = "browser")]
        Fetcher::Browser => {
            let source = crowdfund_watch::fetch::BrowserSource::new(&cli.user_agent, timeout);
            run_with(&cli, source).await
        }
        #[cfg(not(feature = "browser"))]
        Fetcher::Browser => Err(MonitorError::Browser(
            "built without the `browser` feature".to_string(),
        )),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| {
                "info,html5ever=error,selectors=error,hyper=warn,reqwest=info".into()
            }),
        )
        .with(ErrorLayer::default())
        .init();

    let cli = Cli::parse();
    info!("URL: {}", cli.url);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
