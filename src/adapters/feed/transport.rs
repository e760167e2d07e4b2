use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::types::SyncConfig;
use crate::error::{Result, StaySyncError};
use crate::ports::feed_transport::FeedTransport;

/// Fetches feed bodies over HTTP(S) with a bounded timeout and a
/// descriptive client identity.
pub struct HttpFeedTransport {
    http: Client,
    min_body_len: usize,
}

impl HttpFeedTransport {
    pub fn new(config: &SyncConfig) -> std::result::Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            min_body_len: config.min_feed_body_len,
        })
    }
}

#[async_trait]
impl FeedTransport for HttpFeedTransport {
    async fn fetch(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url)?;
        debug!(url, "Fetching calendar feed");

        let response = self
            .http
            .get(parsed)
            .header(reqwest::header::ACCEPT, "text/calendar, text/plain, */*")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StaySyncError::InvalidFeed {
                url: url.to_string(),
                reason: format!("HTTP {status}"),
            });
        }

        let body = response.text().await?;
        if body.trim().len() < self.min_body_len {
            return Err(StaySyncError::InvalidFeed {
                url: url.to_string(),
                reason: format!("body too short ({} bytes)", body.len()),
            });
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport() -> HttpFeedTransport {
        HttpFeedTransport::new(&SyncConfig {
            request_timeout_secs: 5,
            ..SyncConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn fetch_returns_body_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cal.ics"))
            .and(header("accept", "text/calendar, text/plain, */*"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n"),
            )
            .mount(&server)
            .await;

        let body = transport()
            .fetch(&format!("{}/cal.ics", server.uri()))
            .await
            .unwrap();
        assert!(body.starts_with("BEGIN:VCALENDAR"));
    }

    #[tokio::test]
    async fn fetch_rejects_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = transport()
            .fetch(&format!("{}/cal.ics", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, StaySyncError::InvalidFeed { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn fetch_rejects_unparseable_url() {
        let err = transport().fetch("host-only/cal.ics").await.unwrap_err();
        assert!(matches!(err, StaySyncError::Url(_)));
    }

    #[tokio::test]
    async fn fetch_rejects_implausibly_short_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  \n"))
            .mount(&server)
            .await;

        let err = transport()
            .fetch(&format!("{}/cal.ics", server.uri()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("body too short"));
    }
}
