//! HTTP client for bgp.he.net search and ASN prefix pages.

use super::cache::PageCache;
use super::scan::PrefixSource;
use super::scrape::{extract_asns, extract_prefixes};
use crate::config;
use colored::Colorize;
use reqwest::Url;
use std::error::Error;
use std::time::Duration;

/// Default site root.
pub const HE_BASE_URL: &str = "https://bgp.he.net/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Search page URL for an organisation name.
pub fn search_url(base: &str, query: &str) -> Result<Url, Box<dyn Error>> {
    let url = Url::parse(base)?.join("search")?;
    let url = Url::parse_with_params(
        url.as_str(),
        &[("search[search]", query), ("commit", "Search")],
    )?;
    Ok(url)
}

/// Prefixes page URL for an ASN such as `AS45102`.
pub fn asn_url(base: &str, asn: &str) -> Result<Url, Box<dyn Error>> {
    let digits = asn
        .strip_prefix("AS")
        .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| format!("Not an ASN: '{asn}'"))?;
    let mut url = Url::parse(base)?.join(&format!("AS{digits}"))?;
    url.set_fragment(Some("_prefixes"));
    Ok(url)
}

/// [`PrefixSource`] backed by bgp.he.net, with prefix pages cached on disk.
///
/// Search pages are always fetched. Failed requests are retried with a
/// linearly growing pause; a prefix page that still cannot be fetched falls
/// back to a stale cached copy when one exists.
#[derive(Debug, Clone)]
pub struct HeNetClient {
    http: reqwest::Client,
    cache: PageCache,
    base_url: String,
    retries: u32,
}

impl HeNetClient {
    pub fn new(cache: PageCache, retries: u32) -> Result<HeNetClient, Box<dyn Error>> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(HeNetClient {
            http,
            cache,
            base_url: HE_BASE_URL.to_string(),
            retries,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> HeNetClient {
        self.base_url = base_url.to_string();
        self
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    async fn fetch(&self, url: &Url) -> Result<String, Box<dyn Error>> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once(url).await {
                Ok(body) => {
                    log::debug!("GET {url} -> {} bytes", body.len());
                    return Ok(body);
                }
                Err(e) if attempt <= self.retries => {
                    log::warn!(
                        "{failed} GET {url} (attempt {attempt}): {e}",
                        failed = "failed".on_red()
                    );
                    let pause = config::SLEEP_MSEC * 5 * u64::from(attempt);
                    tokio::time::sleep(Duration::from_millis(pause)).await;
                }
                Err(e) => {
                    return Err(format!("GET {url} failed after {attempt} attempts: {e}").into())
                }
            }
        }
    }

    async fn fetch_once(&self, url: &Url) -> Result<String, reqwest::Error> {
        self.http
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

impl PrefixSource for HeNetClient {
    async fn search_asns(&self, query: &str) -> Result<Vec<String>, Box<dyn Error>> {
        let url = search_url(&self.base_url, query)?;
        let html = self.fetch(&url).await?;
        tokio::time::sleep(Duration::from_millis(config::SLEEP_MSEC)).await;
        Ok(extract_asns(&html))
    }

    async fn asn_prefixes(&self, asn: &str) -> Result<Vec<String>, Box<dyn Error>> {
        if let Some(html) = self.cache.read_fresh(asn) {
            return Ok(extract_prefixes(&html));
        }

        log::info!("Downloading prefixes page for {}", asn.on_blue());
        let url = asn_url(&self.base_url, asn)?;
        let html = match self.fetch(&url).await {
            Ok(html) => {
                if let Err(e) = self.cache.write(asn, &html) {
                    log::warn!("Could not cache page for {asn}: {e}");
                }
                html
            }
            Err(e) => match self.cache.read_any(asn) {
                Some(html) => {
                    log::warn!("{e}; using stale cached page for {asn}");
                    html
                }
                None => return Err(e),
            },
        };
        tokio::time::sleep(Duration::from_millis(config::SLEEP_MSEC)).await;
        Ok(extract_prefixes(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        let url = search_url(HE_BASE_URL, "alibaba").unwrap();
        assert_eq!(
            url.as_str(),
            "https://bgp.he.net/search?search%5Bsearch%5D=alibaba&commit=Search"
        );
        let url = search_url(HE_BASE_URL, "digital ocean&co").unwrap();
        assert_eq!(
            url.query(),
            Some("search%5Bsearch%5D=digital+ocean%26co&commit=Search")
        );
    }

    #[test]
    fn test_asn_url() {
        assert_eq!(
            asn_url(HE_BASE_URL, "AS45102").unwrap().as_str(),
            "https://bgp.he.net/AS45102#_prefixes"
        );
        assert!(asn_url(HE_BASE_URL, "AS").is_err());
        assert!(asn_url(HE_BASE_URL, "45102").is_err());
        assert!(asn_url(HE_BASE_URL, "AS1/../evil").is_err());
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_network() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = PageCache::new(tmp.path(), Duration::from_secs(3600)).unwrap();
        cache
            .write("AS45102", include_str!("../tests/test_data/AS45102_prefixes.html"))
            .unwrap();
        // Unroutable base: any network access would fail the test.
        let client = HeNetClient::new(cache, 0)
            .unwrap()
            .with_base_url("http://127.0.0.1:9/");
        let prefixes = client.asn_prefixes("AS45102").await.unwrap();
        assert_eq!(prefixes.len(), 8);
        assert_eq!(prefixes[0], "47.74.0.0/15");
    }

    #[tokio::test]
    async fn test_failed_fetch_uses_stale_page() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = PageCache::new(tmp.path(), Duration::ZERO).unwrap();
        cache
            .write("AS45102", include_str!("../tests/test_data/AS45102_prefixes.html"))
            .unwrap();
        assert!(cache.read_fresh("AS45102").is_none());
        let client = HeNetClient::new(cache, 0)
            .unwrap()
            .with_base_url("http://127.0.0.1:9/");
        let prefixes = client.asn_prefixes("AS45102").await.unwrap();
        assert_eq!(prefixes.len(), 8);
    }

    #[tokio::test]
    async fn test_failed_fetch_without_cache_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = PageCache::new(tmp.path(), Duration::ZERO).unwrap();
        let client = HeNetClient::new(cache, 0)
            .unwrap()
            .with_base_url("http://127.0.0.1:9/");
        assert!(client.asn_prefixes("AS45102").await.is_err());
    }

    #[tokio::test]
    async fn test_cache_write_failure_keeps_page() {
        let server = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/", server.local_addr().unwrap());
        tokio::spawn(async move {
            use tokio::io::{AsyncReadExt, AsyncWriteExt};
            let body = include_str!("../tests/test_data/AS45102_prefixes.html");
            let (mut socket, _) = server.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });

        let tmp = tempfile::tempdir().unwrap();
        let cache = PageCache::new(&tmp.path().join("cache"), Duration::from_secs(3600)).unwrap();
        // Cache directory gone: writes fail, the download must still count.
        std::fs::remove_dir_all(cache.dir()).unwrap();
        let client = HeNetClient::new(cache, 0).unwrap().with_base_url(&base);
        let prefixes = client.asn_prefixes("AS45102").await.unwrap();
        assert_eq!(prefixes.len(), 8);
    }
}
