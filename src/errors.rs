// errors.rs
use std::fmt;

use crate::scrape::ScrapeError;

/// Fatal configuration/structural errors. Each variant maps to a stable
/// process exit status; row-level data problems never surface here.
#[derive(Debug)]
pub enum AppError {
    Io(String),
    MarketCsvMissing(String),
    MarketCsvEmpty(String),
    NoListingsCollected,
    MarketHeader(String),
    CandidatesEmpty,
    CandidateHeader(String),
    NoRankedResults,
    ReportWrite(String),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Io(_) => 1,
            AppError::MarketCsvMissing(_) => 3,
            AppError::MarketCsvEmpty(_) | AppError::NoListingsCollected => 4,
            AppError::MarketHeader(_) => 5,
            AppError::CandidatesEmpty => 6,
            AppError::CandidateHeader(_) => 7,
            AppError::NoRankedResults => 8,
            AppError::ReportWrite(_) => 9,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(msg) => write!(f, "I/O error: {msg}"),
            AppError::MarketCsvMissing(msg) => write!(f, "market CSV not readable: {msg}"),
            AppError::MarketCsvEmpty(path) => write!(f, "market CSV is empty: {path}"),
            AppError::NoListingsCollected => write!(f, "no listings collected"),
            AppError::MarketHeader(path) => write!(
                f,
                "market CSV {path} is missing required columns (need eur_per_m2, location, street)"
            ),
            AppError::CandidatesEmpty => write!(f, "candidate stream on stdin is empty"),
            AppError::CandidateHeader(_) => write!(
                f,
                "candidate header is missing required columns (need url, eur_per_m2, location, street)"
            ),
            AppError::NoRankedResults => {
                write!(f, "no ranked results (no candidate matched a group with enough samples)")
            }
            AppError::ReportWrite(msg) => write!(f, "failed to write report: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ScrapeError> for AppError {
    fn from(e: ScrapeError) -> Self {
        AppError::Io(e.to_string())
    }
}
