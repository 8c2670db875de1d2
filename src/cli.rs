// src/cli.rs
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aruodas-deals", version, about = "Find underpriced m.aruodas.lt listings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Score candidate listings from stdin against street medians
    Analyze(AnalyzeArgs),
    /// Crawl a result-list URL and append listings to the market CSV
    Scrape(ScrapeArgs),
    /// Crawl a search URL, append the rows, then rank the fresh listings
    Search(SearchArgs),
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Market CSV the medians are computed from
    #[arg(long = "csv", default_value = "kainos.csv")]
    pub market_csv: PathBuf,

    /// Report output path
    #[arg(long, default_value = "deals_top3.txt")]
    pub out: PathBuf,

    /// Minimum observations a street needs before its median is trusted
    #[arg(long, default_value_t = 5)]
    pub min_street_n: usize,

    /// Group by street alone instead of location+street
    #[arg(long)]
    pub street_only: bool,

    /// How many deals to report
    #[arg(long, default_value_t = 3)]
    pub top: usize,
}

#[derive(Args)]
pub struct ScrapeArgs {
    /// Start URL on m.aruodas.lt
    pub url: String,

    /// CSV to append collected listings to
    #[arg(long, default_value = "kainos.csv")]
    pub out_csv: PathBuf,

    /// Page budget, 0 = unlimited
    #[arg(long, default_value_t = 0)]
    pub max_pages: usize,

    /// Random delay between pages, seconds: min,max
    #[arg(long, default_value = "0.10,0.25", value_parser = parse_delay)]
    pub delay: DelayRange,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value_t = 25_000)]
    pub timeout: u64,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Start URL on m.aruodas.lt
    pub url: String,

    /// CSV the collected listings are appended to page by page
    #[arg(long, default_value = "kainos.csv")]
    pub out_csv: PathBuf,

    /// Market CSV the medians are computed from
    #[arg(long, default_value = "kainos.csv")]
    pub market_csv: PathBuf,

    /// Report output path
    #[arg(long, default_value = "deals_top3.txt")]
    pub out: PathBuf,

    /// How many deals to report
    #[arg(long, default_value_t = 3)]
    pub top: usize,

    /// Minimum observations a street needs before its median is trusted
    #[arg(long, default_value_t = 5)]
    pub min_street_n: usize,

    /// Group by street alone instead of location+street
    #[arg(long)]
    pub street_only: bool,

    /// Page budget, 0 = unlimited
    #[arg(long, default_value_t = 0)]
    pub max_pages: usize,

    /// Listing budget, 0 = unlimited
    #[arg(long, default_value_t = 0)]
    pub max_items: usize,

    /// Random delay between pages, seconds: min,max
    #[arg(long, default_value = "0.10,0.25", value_parser = parse_delay)]
    pub delay: DelayRange,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value_t = 25_000)]
    pub timeout: u64,

    /// Also append collected rows to the market CSV before scoring (default)
    #[arg(long, overrides_with = "no_append_to_market")]
    pub append_to_market: bool,

    /// Skip the market CSV append
    #[arg(long, overrides_with = "append_to_market")]
    pub no_append_to_market: bool,
}

impl SearchArgs {
    pub fn append_to_market(&self) -> bool {
        !self.no_append_to_market
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DelayRange {
    pub lo: f64,
    pub hi: f64,
}

fn parse_delay(s: &str) -> Result<DelayRange, String> {
    let bad = || format!("bad delay {s:?}, expected min,max like 0.10,0.25");
    let (lo_s, hi_s) = s.split_once(',').ok_or_else(bad)?;
    let lo: f64 = lo_s.trim().parse().map_err(|_| bad())?;
    let hi: f64 = hi_s.trim().parse().map_err(|_| bad())?;
    if !lo.is_finite() || !hi.is_finite() || lo < 0.0 || hi < lo {
        return Err(bad());
    }
    Ok(DelayRange { lo, hi })
}
