pub mod aggregate;
pub mod report;
pub mod score;

use std::fs::File;
use std::io::{self, BufReader};

use log::info;

use crate::cli::AnalyzeArgs;
use crate::errors::AppError;
use report::ReportParams;

/// The analyze mode: market pass first, then a streaming candidate pass
/// over stdin, then one report write.
pub fn run(args: &AnalyzeArgs) -> Result<(), AppError> {
    let min_street_n = args.min_street_n.max(1);
    let top_n = args.top.max(1);
    let market_path = args.market_csv.display().to_string();

    let file = File::open(&args.market_csv)
        .map_err(|e| AppError::MarketCsvMissing(format!("{market_path}: {e}")))?;
    let (table, market_rows) = aggregate::build_median_table(
        BufReader::new(file),
        &market_path,
        args.street_only,
        min_street_n,
    )?;
    info!(
        "market rows={market_rows} | streets_with_median={} | min_street_n={min_street_n} | top={top_n}",
        table.len()
    );

    let stdin = io::stdin();
    let (ranked, totals) =
        score::score_stream(stdin.lock(), &table, args.street_only, top_n)?;
    if ranked.is_empty() {
        return Err(AppError::NoRankedResults);
    }

    let params = ReportParams {
        market_csv: &market_path,
        min_street_n,
        street_only: args.street_only,
        top_n,
    };
    report::write_report(&args.out, &ranked, &params)?;
    info!(
        "in_rows={} | scored={} | wrote={}",
        totals.rows_seen,
        totals.rows_scored,
        args.out.display()
    );
    Ok(())
}
