// src/scrape/fetcher.rs
use std::collections::HashSet;
use std::time::Duration;

use chrono::Local;
use log::{info, warn};
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};

use crate::listing::Listing;
use crate::scrape::parse::parse_page;
use crate::scrape::ScrapeError;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0 Safari/537.36";

const MAX_ATTEMPTS: u64 = 3;
const BACKOFF_MS: u64 = 500;
const JITTER_MAX_MS: u64 = 250;

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("lt-LT,lt;q=0.9,en;q=0.8"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ScrapeError::Network(e.to_string()))?;

        Ok(Self { client })
    }

    /// Fetch one page, retrying transport errors and non-2xx statuses
    /// with a growing backoff plus jitter.
    pub fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let mut last_err = None;

        for attempt in 1..=MAX_ATTEMPTS {
            match self.try_fetch(url) {
                Ok(html) => return Ok(html),
                Err(e) => {
                    warn!("attempt {attempt} failed for {url}: {e}");
                    last_err = Some(e);
                    if attempt < MAX_ATTEMPTS {
                        let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_MS);
                        std::thread::sleep(Duration::from_millis(BACKOFF_MS * attempt + jitter));
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| ScrapeError::Network("retry loop exhausted".into())))
    }

    fn try_fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| ScrapeError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp.text().map_err(|e| ScrapeError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ScrapeError::Status(format!("HTTP {status} for {url}")));
        }
        Ok(text)
    }
}

pub struct CrawlOptions {
    /// 0 = unlimited.
    pub max_pages: usize,
    /// 0 = unlimited.
    pub max_items: usize,
    /// Uniform random sleep between pages, seconds.
    pub delay_secs: (f64, f64),
}

#[derive(Debug, Default)]
pub struct CrawlTotals {
    pub pages_fetched: usize,
    pub listings_collected: usize,
}

/// Walk the result pages from `start_url`, handing each page's batch of
/// new listings to `on_page`. Stops on a repeated page URL, a missing or
/// unchanged next link, or a budget; a page failing `fetch` ends the
/// crawl with a warning unless it was the first one. Every listing gets
/// the same `scraped_at` stamp, computed once per run, and listing URLs
/// already seen in this run are skipped.
///
/// `fetch` is a function so the loop can be driven without a network;
/// the run modes pass in `Fetcher::fetch`.
pub fn crawl<F, P>(
    mut fetch: F,
    start_url: &str,
    opts: &CrawlOptions,
    mut on_page: P,
) -> Result<CrawlTotals, ScrapeError>
where
    F: FnMut(&str) -> Result<String, ScrapeError>,
    P: FnMut(Vec<Listing>) -> Result<(), ScrapeError>,
{
    let stamp = Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();

    let mut seen_pages = HashSet::new();
    let mut seen_listings = HashSet::new();
    let mut totals = CrawlTotals::default();
    let mut url = start_url.to_string();

    loop {
        if !seen_pages.insert(url.clone()) {
            info!("stop: page URL repeats: {url}");
            break;
        }
        if opts.max_pages > 0 && totals.pages_fetched >= opts.max_pages {
            break;
        }

        info!("[{}] GET {url}", totals.pages_fetched + 1);
        let html = match fetch(&url) {
            Ok(html) => html,
            Err(e) if totals.pages_fetched == 0 => return Err(e),
            Err(e) => {
                warn!("stopping after {} pages: {e}", totals.pages_fetched);
                break;
            }
        };
        totals.pages_fetched += 1;

        let page = parse_page(&html, &url);
        let found = page.listings.len();
        let batch = take_new(
            page.listings,
            &mut seen_listings,
            &stamp,
            opts.max_items,
            totals.listings_collected,
        );
        totals.listings_collected += batch.len();
        info!(
            "  found: {found} | new: {} | collected: {}",
            batch.len(),
            totals.listings_collected
        );

        if !batch.is_empty() {
            on_page(batch)?;
        }

        if opts.max_items > 0 && totals.listings_collected >= opts.max_items {
            break;
        }
        match page.next_url {
            Some(next) if next != url => url = next,
            _ => break,
        }

        let (lo, hi) = opts.delay_secs;
        if hi > 0.0 {
            let secs = rand::thread_rng().gen_range(lo..=hi);
            std::thread::sleep(Duration::from_secs_f64(secs));
        }
    }

    Ok(totals)
}

/// Drop listings already seen this run, stamp the rest, respect the
/// remaining item budget.
fn take_new(
    items: Vec<Listing>,
    seen: &mut HashSet<String>,
    stamp: &str,
    max_items: usize,
    collected: usize,
) -> Vec<Listing> {
    let mut out = Vec::new();
    for mut item in items {
        if max_items > 0 && collected + out.len() >= max_items {
            break;
        }
        if !seen.insert(item.url.clone()) {
            continue;
        }
        item.scraped_at = Some(stamp.to_string());
        out.push(item);
    }
    out
}
