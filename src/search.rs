// src/search.rs
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use log::{info, warn};

use crate::analyze::aggregate::build_median_table;
use crate::analyze::report::{write_report, ReportParams};
use crate::analyze::score::{score_listing, TopDeals};
use crate::cli::SearchArgs;
use crate::csv::append_listings;
use crate::errors::AppError;
use crate::listing::Listing;
use crate::scrape::{crawl, CrawlOptions, Fetcher, ScrapeError};

/// The search mode: crawl, append the rows page by page, fold them into
/// the market CSV, then rank this run's listings against the street
/// medians. The market append happens before aggregation on purpose, so
/// today's candidates take part in their own baselines.
pub fn run(args: &SearchArgs) -> Result<(), AppError> {
    let min_street_n = args.min_street_n.max(1);
    let top_n = args.top.max(1);

    let fetcher = Fetcher::new(Duration::from_millis(args.timeout))?;
    let opts = CrawlOptions {
        max_pages: args.max_pages,
        max_items: args.max_items,
        delay_secs: (args.delay.lo, args.delay.hi),
    };

    let mut collected: Vec<Listing> = Vec::new();
    let out_csv = args.out_csv.clone();
    let totals = crawl(|url| fetcher.fetch(url), &args.url, &opts, |batch| {
        append_listings(&out_csv, &batch).map_err(|e| ScrapeError::Io(e.to_string()))?;
        collected.extend(batch);
        Ok(())
    })?;
    info!(
        "crawl done: {} pages | {} listings | appended to {}",
        totals.pages_fetched,
        totals.listings_collected,
        args.out_csv.display()
    );

    if collected.is_empty() {
        return Err(AppError::NoListingsCollected);
    }

    if args.append_to_market() && !same_file(&args.out_csv, &args.market_csv) {
        if let Err(e) = append_listings(&args.market_csv, &collected) {
            warn!("market CSV append failed, scoring continues: {e}");
        }
    }

    let market_path = args.market_csv.display().to_string();
    let file = File::open(&args.market_csv)
        .map_err(|e| AppError::MarketCsvMissing(format!("{market_path}: {e}")))?;
    let (table, market_rows) = build_median_table(
        BufReader::new(file),
        &market_path,
        args.street_only,
        min_street_n,
    )?;
    info!(
        "market rows={market_rows} | streets_with_median={} | min_street_n={min_street_n}",
        table.len()
    );

    let mut top = TopDeals::new(top_n);
    let mut scored_rows: u64 = 0;
    let seen = collected.len();
    for listing in collected {
        if let Some(scored) = score_listing(listing, &table, args.street_only) {
            top.offer(scored);
            scored_rows += 1;
        }
    }
    if top.is_empty() {
        return Err(AppError::NoRankedResults);
    }

    let params = ReportParams {
        market_csv: &market_path,
        min_street_n,
        street_only: args.street_only,
        top_n,
    };
    let ranked = top.into_ranked();
    write_report(&args.out, &ranked, &params)?;
    info!(
        "listings={seen} | scored={scored_rows} | wrote={}",
        args.out.display()
    );
    Ok(())
}

/// The page-by-page CSV and the market CSV both default to kainos.csv;
/// appending the same rows twice would double-count them.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(x), Ok(y)) => x == y,
        _ => a == b,
    }
}
