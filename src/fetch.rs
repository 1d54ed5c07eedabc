use crate::{error::MonitorError, PageSource};
use std::time::Duration;
use tracing::debug;

pub const DESKTOP_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Plain GET of the page with a desktop browser user agent.
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<HttpSource, MonitorError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(HttpSource { client })
    }
}

#[async_trait::async_trait]
impl PageSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<String, MonitorError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.text().await?)
    }
}

/// Renders the page in headless Chromium before handing back the DOM, for
/// pages whose figures are filled in by scripts.
#[cfg(feature = "browser")]
pub struct BrowserSource {
    user_agent: String,
    timeout: Duration,
}

#[cfg(feature = "browser")]
impl BrowserSource {
    pub fn new(user_agent: &str, timeout: Duration) -> BrowserSource {
        BrowserSource {
            user_agent: user_agent.to_string(),
            timeout,
        }
    }

    async fn render(&self, url: &str) -> Result<String, MonitorError> {
        use chromiumoxide::browser::{Browser, BrowserConfig};
        use futures::StreamExt;

        let config = BrowserConfig::builder()
            .arg(format!("--user-agent={}", self.user_agent))
            .build()
            .map_err(MonitorError::Browser)?;
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| MonitorError::Browser(e.to_string()))?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = async {
            let page = browser.new_page(url).await?;
            page.wait_for_navigation().await?;
            page.content().await
        }
        .await
        .map_err(|e| MonitorError::Browser(e.to_string()));

        if let Err(e) = browser.close().await {
            debug!("Closing browser failed: {}", e);
        }
        handler.abort();
        result
    }
}

#[cfg(feature = "browser")]
#[async_trait::async_trait]
impl PageSource for BrowserSource {
    async fn fetch(&self, url: &str) -> Result<String, MonitorError> {
        debug!("Render {}", url);
        tokio::time::timeout(self.timeout, self.render(url))
            .await
            .map_err(|_| MonitorError::Timeout(self.timeout))?
    }
}
