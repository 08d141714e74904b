//! Headline acquisition. One bounded HTTP call to the NewsAPI top-headlines
//! endpoint when an API key is configured; a fixed fallback list otherwise.
//! Fetching never fails from the caller's perspective: every upstream
//! problem (transport error, non-2xx status, unparseable body, no usable
//! titles) degrades to the fallback list and is logged rather than
//! propagated or retried.

use rand::seq::SliceRandom;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

const ENDPOINT: &str = "https://newsapi.org/v2/top-headlines";
const COUNTRY: &str = "us";
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Only the first few upstream entries are considered before sampling.
const MAX_CANDIDATES: usize = 10;

/// Deterministic stand-ins for offline operation and tests.
pub const FALLBACK_HEADLINES: [&str; 2] = ["Cat Elected Mayor", "Man Wins Lottery"];

/// One upstream headline. `image` and `url` are whatever the payload
/// carried; both survive into the rendered article when present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Headline {
    pub title: String,
    pub image: Option<String>,
    pub url: Option<String>,
}

#[derive(Deserialize)]
struct TopHeadlines {
    #[serde(default)]
    articles: Vec<UpstreamArticle>,
}

#[derive(Deserialize)]
struct UpstreamArticle {
    title: Option<String>,

    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,

    url: Option<String>,
}

/// Produces the small batch of headlines a run works from.
pub struct HeadlineSource {
    api_key: Option<String>,
    sample_size: usize,
    endpoint: String,
}

impl HeadlineSource {
    /// An empty API key counts as no key at all, matching the environment
    /// variable convention (`NEWS_API_KEY=""` means offline).
    pub fn new(api_key: Option<String>, sample_size: usize) -> HeadlineSource {
        HeadlineSource {
            api_key: api_key.filter(|key| !key.is_empty()),
            sample_size,
            endpoint: ENDPOINT.to_owned(),
        }
    }

    /// Replaces the top-headlines endpoint, for tests and for pointing a
    /// deployment at a mirror.
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> HeadlineSource {
        self.endpoint = endpoint.into();
        self
    }

    /// Returns between 1 and [`MAX_CANDIDATES`] headlines. Without an API
    /// key this returns [`FALLBACK_HEADLINES`] without touching the
    /// network; with one, it fetches, filters out entries with empty
    /// titles, and uniformly samples `sample_size` of the first ten (all
    /// of them when fewer are available).
    pub fn fetch(&self) -> Vec<Headline> {
        let api_key = match &self.api_key {
            None => {
                info!("no API key configured, using fallback headlines");
                return fallback();
            }
            Some(key) => key,
        };

        match self.fetch_upstream(api_key) {
            Ok(headlines) if !headlines.is_empty() => headlines,
            Ok(_) => {
                warn!("upstream returned no usable headlines, using fallback");
                fallback()
            }
            Err(err) => {
                warn!(error = %err, "headline fetch failed, using fallback");
                fallback()
            }
        }
    }

    fn fetch_upstream(&self, api_key: &str) -> anyhow::Result<Vec<Headline>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;
        let response: TopHeadlines = client
            .get(&self.endpoint)
            .query(&[("country", COUNTRY), ("apiKey", api_key)])
            .send()?
            .error_for_status()?
            .json()?;

        let candidates: Vec<Headline> = response
            .articles
            .into_iter()
            .take(MAX_CANDIDATES)
            .filter_map(|article| match article.title {
                Some(title) if !title.trim().is_empty() => Some(Headline {
                    title,
                    image: article.url_to_image,
                    url: article.url,
                }),
                _ => None,
            })
            .collect();

        let mut rng = rand::thread_rng();
        Ok(candidates
            .choose_multiple(&mut rng, self.sample_size)
            .cloned()
            .collect())
    }
}

fn fallback() -> Vec<Headline> {
    FALLBACK_HEADLINES
        .iter()
        .map(|title| Headline {
            title: (*title).to_owned(),
            image: None,
            url: None,
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_no_key_returns_fallback_in_order() {
        let source = HeadlineSource::new(None, 2);
        let headlines = source.fetch();
        let titles: Vec<&str> = headlines.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, FALLBACK_HEADLINES);
    }

    #[test]
    fn test_empty_key_counts_as_no_key() {
        let source = HeadlineSource::new(Some(String::new()), 2);
        let titles: Vec<String> = source.fetch().into_iter().map(|h| h.title).collect();
        assert_eq!(titles, FALLBACK_HEADLINES);
    }

    #[test]
    fn test_unreachable_endpoint_falls_back() {
        // Nothing listens on port 1, so the request fails immediately and
        // the run continues on the fallback list.
        let source = HeadlineSource::new(Some("key".to_owned()), 2)
            .with_endpoint("http://127.0.0.1:1/v2/top-headlines");
        let titles: Vec<String> = source.fetch().into_iter().map(|h| h.title).collect();
        assert_eq!(titles, FALLBACK_HEADLINES);
    }

    #[test]
    fn test_fallback_headlines_carry_no_upstream_metadata() {
        for headline in fallback() {
            assert!(headline.image.is_none());
            assert!(headline.url.is_none());
        }
    }

    #[test]
    fn test_upstream_payload_shape() {
        let payload = r#"{
            "status": "ok",
            "articles": [
                {"title": "First", "urlToImage": "https://example.org/a.jpg", "url": "https://example.org/a"},
                {"title": null},
                {"title": ""},
                {"title": "Second"}
            ]
        }"#;
        let parsed: TopHeadlines = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.articles.len(), 4);
        assert_eq!(parsed.articles[0].title.as_deref(), Some("First"));
        assert_eq!(
            parsed.articles[0].url_to_image.as_deref(),
            Some("https://example.org/a.jpg")
        );
    }

    #[test]
    fn test_missing_articles_field_parses_empty() {
        let parsed: TopHeadlines = serde_json::from_str(r#"{"status": "error"}"#).unwrap();
        assert!(parsed.articles.is_empty());
    }
}
