// src/analyze/score.rs
use std::cmp::Ordering;
use std::io::BufRead;

use crate::analyze::aggregate::MedianTable;
use crate::csv::{split_line, Header};
use crate::errors::AppError;
use crate::listing::Listing;
use crate::text::{norm_space, parse_f64, parse_round_i64};

/// A candidate that found a baseline. `deal` is the group median divided
/// by the listing's €/m², so anything above 1 is priced below its
/// street. Never mutated after creation, only displaced from the buffer.
#[derive(Debug, Clone)]
pub struct Scored {
    pub deal: f64,
    pub street_median: f64,
    pub street_n: usize,
    pub listing: Listing,
    pub key: String,
}

/// Bounded ranked buffer of the best deals seen so far: at most `cap`
/// entries, always sorted by descending deal ratio. Re-sorting on every
/// offer is fine for single-digit caps.
#[derive(Debug)]
pub struct TopDeals {
    entries: Vec<Scored>,
    cap: usize,
}

impl TopDeals {
    pub fn new(cap: usize) -> Self {
        TopDeals { entries: Vec::with_capacity(cap + 1), cap }
    }

    pub fn offer(&mut self, scored: Scored) {
        self.entries.push(scored);
        self.entries
            .sort_by(|a, b| b.deal.partial_cmp(&a.deal).unwrap_or(Ordering::Equal));
        self.entries.truncate(self.cap);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_ranked(self) -> Vec<Scored> {
        self.entries
    }

    #[cfg(test)]
    pub fn deals(&self) -> Vec<f64> {
        self.entries.iter().map(|s| s.deal).collect()
    }
}

/// Diagnostic tallies for one candidate pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScoreTotals {
    pub rows_seen: u64,
    pub rows_scored: u64,
}

struct CandidateColumns {
    url: usize,
    eur: usize,
    loc: usize,
    st: usize,
    span: usize,
    scraped_at: Option<usize>,
    price: Option<usize>,
    rooms: Option<usize>,
    area: Option<usize>,
    irengtas: Option<usize>,
}

impl CandidateColumns {
    fn resolve(header: &Header) -> Option<Self> {
        let url = header.find("url")?;
        let eur = header.find("eur_per_m2")?;
        let loc = header.find("location")?;
        let st = header.find("street")?;
        Some(CandidateColumns {
            url,
            eur,
            loc,
            st,
            span: url.max(eur).max(loc).max(st),
            scraped_at: header.find("scraped_at"),
            price: header.find("price_eur"),
            rooms: header.find("rooms"),
            area: header.find("area_m2"),
            irengtas: header.find("irengtas"),
        })
    }
}

/// Build a listing from one tokenized candidate row. `None` when a
/// required field is missing or unusable; optional fields fail softly
/// into `None`/false without dropping the row.
fn parse_candidate_row(fields: &[String], cols: &CandidateColumns) -> Option<Listing> {
    let eur = match parse_f64(&fields[cols.eur]) {
        Some(v) if v > 0.0 => v,
        _ => return None,
    };
    let street = norm_space(&fields[cols.st]);
    if street.is_empty() {
        return None;
    }

    let opt = |idx: Option<usize>| idx.and_then(|i| fields.get(i)).map(String::as_str);

    Some(Listing {
        scraped_at: opt(cols.scraped_at)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        url: fields[cols.url].clone(),
        price_eur: opt(cols.price).and_then(parse_round_i64),
        eur_per_m2: eur,
        rooms: opt(cols.rooms).and_then(parse_round_i64),
        area_m2: opt(cols.area).and_then(parse_f64),
        irengtas: opt(cols.irengtas)
            .and_then(parse_round_i64)
            .map(|v| v != 0)
            .unwrap_or(false),
        location: norm_space(&fields[cols.loc]),
        street,
    })
}

/// Score one already-structured listing against the baseline table.
/// `None` when the listing is unusable or its key has no baseline.
pub fn score_listing(listing: Listing, table: &MedianTable, street_only: bool) -> Option<Scored> {
    if listing.eur_per_m2 <= 0.0 || listing.street.is_empty() {
        return None;
    }
    let key = listing.grouping_key(street_only);
    let stats = table.get(&key)?;
    Some(Scored {
        deal: stats.median / listing.eur_per_m2,
        street_median: stats.median,
        street_n: stats.n,
        listing,
        key,
    })
}

/// Streaming pass over the candidate CSV: one row in memory at a time,
/// bounded top-N buffer, nothing else retained. The ranked result comes
/// back already sorted descending by deal ratio.
pub fn score_stream<R: BufRead>(
    input: R,
    table: &MedianTable,
    street_only: bool,
    top_n: usize,
) -> Result<(Vec<Scored>, ScoreTotals), AppError> {
    let mut lines = input.lines();

    let header_line = match lines.next() {
        Some(line) => line.map_err(|e| AppError::Io(e.to_string()))?,
        None => return Err(AppError::CandidatesEmpty),
    };
    let header = Header::parse(&header_line);
    let cols = CandidateColumns::resolve(&header)
        .ok_or_else(|| AppError::CandidateHeader(header_line.clone()))?;

    let mut top = TopDeals::new(top_n);
    let mut totals = ScoreTotals::default();

    for line in lines {
        let line = line.map_err(|e| AppError::Io(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_line(&line);
        if fields.len() <= cols.span {
            continue;
        }
        totals.rows_seen += 1;

        let Some(listing) = parse_candidate_row(&fields, &cols) else {
            continue;
        };
        let Some(scored) = score_listing(listing, table, street_only) else {
            continue;
        };
        top.offer(scored);
        totals.rows_scored += 1;
    }

    Ok((top.into_ranked(), totals))
}
