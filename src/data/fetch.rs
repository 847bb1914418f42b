//! Sciensano open-data feeds over HTTP.

use encoding_rs::mem::decode_latin1;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::info;

use crate::domain::Feed;
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://epistat.sciensano.be/Data";

pub struct SciensanoClient {
    client: Client,
    base_url: String,
}

impl SciensanoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn feed_url(&self, feed: Feed) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), feed.file_name())
    }

    /// Download one feed and parse it as JSON.
    pub fn fetch_feed(&self, feed: Feed) -> Result<Value, AppError> {
        let url = self.feed_url(feed);
        info!(%url, "fetching feed");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AppError::upstream(format!("Request for {} failed: {e}", feed.file_name())))?;

        if !resp.status().is_success() {
            return Err(AppError::upstream(
                format!("Request for {} failed with status {}.", feed.file_name(), resp.status()),
            ));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| AppError::upstream(format!("Failed to read {} body: {e}", feed.file_name())))?;
        let value = decode_feed(&bytes)
            .map_err(|e| AppError::upstream(format!("Failed to parse {}: {e}", feed.file_name())))?;
        info!(feed = feed.cache_key(), bytes = bytes.len(), "feed fetched");
        Ok(value)
    }
}

/// Parse a feed body. Bodies that are not valid UTF-8 JSON are retried as latin-1.
pub fn decode_feed(bytes: &[u8]) -> Result<Value, serde_json::Error> {
    serde_json::from_slice(bytes).or_else(|_| serde_json::from_str(decode_latin1(bytes).as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_url_joins_base_and_file() {
        let client = SciensanoClient::new("https://example.test/Data/");
        assert_eq!(
            client.feed_url(Feed::Hospitalizations),
            "https://example.test/Data/COVID19BE_HOSP.json"
        );
    }

    #[test]
    fn decode_feed_accepts_latin1() {
        let mut body = b"[{\"PROVINCE\":\"Li".to_vec();
        body.push(0xE8);
        body.extend_from_slice(b"ge\"}]");
        let value = decode_feed(&body).unwrap();
        assert_eq!(value[0]["PROVINCE"], "Liège");
    }

    #[test]
    fn decode_feed_prefers_utf8() {
        let value = decode_feed("[{\"PROVINCE\":\"Liège\"}]".as_bytes()).unwrap();
        assert_eq!(value[0]["PROVINCE"], "Liège");
        assert!(decode_feed(b"not json").is_err());
    }
}
