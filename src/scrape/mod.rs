mod fetcher;
pub mod parse;
mod scrape_error;

pub use fetcher::{crawl, CrawlOptions, CrawlTotals, Fetcher};
pub use scrape_error::ScrapeError;

use std::time::Duration;

use log::info;

use crate::cli::ScrapeArgs;
use crate::csv::append_listings;
use crate::errors::AppError;

/// The scrape mode: crawl result pages and append every new listing to
/// the market CSV. Collecting nothing is not an error here.
pub fn run(args: &ScrapeArgs) -> Result<(), AppError> {
    let fetcher = Fetcher::new(Duration::from_millis(args.timeout))?;
    let opts = CrawlOptions {
        max_pages: args.max_pages,
        max_items: 0,
        delay_secs: (args.delay.lo, args.delay.hi),
    };

    let out_csv = args.out_csv.clone();
    let totals = crawl(|url| fetcher.fetch(url), &args.url, &opts, |batch| {
        append_listings(&out_csv, &batch).map_err(|e| ScrapeError::Io(e.to_string()))
    })?;

    info!(
        "done: {} pages | {} listings appended to {}",
        totals.pages_fetched,
        totals.listings_collected,
        args.out_csv.display()
    );
    Ok(())
}
