// src/analyze/aggregate.rs
use std::collections::HashMap;
use std::io::BufRead;

use log::debug;

use crate::csv::{split_line, Header};
use crate::errors::AppError;
use crate::text::{norm_space, parse_f64};

/// Baseline for one grouping key: median €/m² over the market
/// observations and how many of them there were.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupStats {
    pub median: f64,
    pub n: usize,
}

/// Grouping key → baseline. Only groups that met the minimum sample
/// count make it in here; a failed lookup means "no baseline".
#[derive(Debug, Default)]
pub struct MedianTable {
    groups: HashMap<String, GroupStats>,
}

impl MedianTable {
    pub fn get(&self, key: &str) -> Option<GroupStats> {
        self.groups.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Median of a slice, sorting in place. Even count averages the two
/// central values.
pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

/// Full pass over the market CSV: group €/m² by street (or
/// location+street), keep the median of every group with at least
/// `min_group_n` observations. Returns the table and the number of rows
/// that contributed. `source` is only used in error messages.
pub fn build_median_table<R: BufRead>(
    input: R,
    source: &str,
    street_only: bool,
    min_group_n: usize,
) -> Result<(MedianTable, u64), AppError> {
    let mut lines = input.lines();

    let header_line = match lines.next() {
        Some(line) => line.map_err(|e| AppError::MarketCsvMissing(format!("{source}: {e}")))?,
        None => return Err(AppError::MarketCsvEmpty(source.to_string())),
    };
    let header = Header::parse(&header_line);

    let (i_eur, i_loc, i_st) = match (
        header.find("eur_per_m2"),
        header.find("location"),
        header.find("street"),
    ) {
        (Some(e), Some(l), Some(s)) => (e, l, s),
        _ => return Err(AppError::MarketHeader(source.to_string())),
    };
    let span = i_eur.max(i_loc).max(i_st);

    let mut by_key: HashMap<String, Vec<f64>> = HashMap::new();
    let mut rows: u64 = 0;

    for line in lines {
        let line = line.map_err(|e| AppError::MarketCsvMissing(format!("{source}: {e}")))?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_line(&line);
        if fields.len() <= span {
            continue;
        }

        let eur = match parse_f64(&fields[i_eur]) {
            Some(v) if v > 0.0 => v,
            _ => continue,
        };
        let street = norm_space(&fields[i_st]);
        if street.is_empty() {
            continue;
        }
        let location = norm_space(&fields[i_loc]);

        let key = if street_only {
            street
        } else {
            format!("{location} | {street}")
        };
        by_key.entry(key).or_default().push(eur);
        rows += 1;
    }

    let mut table = MedianTable::default();
    for (key, mut values) in by_key {
        let n = values.len();
        if n < min_group_n {
            debug!("dropping group {key:?}: only {n} samples");
            continue;
        }
        let med = median(&mut values);
        table.groups.insert(key, GroupStats { median: med, n });
    }

    Ok((table, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&mut [10.0, 20.0, 30.0]), 20.0);
        assert_eq!(median(&mut [10.0, 20.0, 30.0, 40.0]), 25.0);
        assert_eq!(median(&mut [30.0, 10.0, 20.0]), 20.0);
        assert_eq!(median(&mut []), 0.0);
    }

    #[test]
    fn groups_below_threshold_are_dropped() {
        let csv = "eur_per_m2,location,street\n\
                   1000,Town,Oak\n\
                   1100,Town,Oak\n\
                   1200,Town,Oak\n\
                   2000,Town,Elm\n";
        let (table, rows) = build_median_table(Cursor::new(csv), "test.csv", false, 3).unwrap();
        assert_eq!(rows, 4);
        assert_eq!(table.len(), 1);
        let oak = table.get("Town | Oak").unwrap();
        assert_eq!(oak.median, 1100.0);
        assert_eq!(oak.n, 3);
        assert!(table.get("Town | Elm").is_none());
    }

    #[test]
    fn street_only_mode_merges_locations() {
        let csv = "eur_per_m2,location,street\n\
                   1000,Town,Oak\n\
                   1200,Village,Oak\n";
        let (table, _) = build_median_table(Cursor::new(csv), "test.csv", true, 2).unwrap();
        assert_eq!(table.get("Oak").unwrap(), GroupStats { median: 1100.0, n: 2 });
    }

    #[test]
    fn bad_rows_are_skipped_silently() {
        let csv = "eur_per_m2,location,street\n\
                   \n\
                   abc,Town,Oak\n\
                   -5,Town,Oak\n\
                   0,Town,Oak\n\
                   1000,Town,   \n\
                   1000,Town\n\
                   1000,Town,Oak\n";
        let (table, rows) = build_median_table(Cursor::new(csv), "test.csv", false, 1).unwrap();
        assert_eq!(rows, 1);
        assert_eq!(table.get("Town | Oak").unwrap().n, 1);
    }

    #[test]
    fn normalized_streets_share_a_group() {
        let csv = "eur_per_m2,location,street\n\
                   1000,Town,Oak\u{a0} st\n\
                   1200,Town,  Oak   st \n";
        let (table, _) = build_median_table(Cursor::new(csv), "test.csv", false, 2).unwrap();
        assert_eq!(table.get("Town | Oak st").unwrap().n, 2);
    }

    #[test]
    fn column_order_does_not_matter() {
        let csv = "street,eur_per_m2,location\nOak,1000,Town\n";
        let (table, _) = build_median_table(Cursor::new(csv), "test.csv", false, 1).unwrap();
        assert!(table.get("Town | Oak").is_some());
    }

    #[test]
    fn missing_column_is_a_header_error() {
        let csv = "eur_per_m2,location\n1000,Town\n";
        let err = build_median_table(Cursor::new(csv), "test.csv", false, 1).unwrap_err();
        assert!(matches!(err, AppError::MarketHeader(_)));
    }

    #[test]
    fn empty_input_is_an_empty_csv_error() {
        let err = build_median_table(Cursor::new(""), "test.csv", false, 1).unwrap_err();
        assert!(matches!(err, AppError::MarketCsvEmpty(_)));
    }

    #[test]
    fn header_only_yields_an_empty_table() {
        let csv = "eur_per_m2,location,street\n";
        let (table, rows) = build_median_table(Cursor::new(csv), "test.csv", false, 1).unwrap();
        assert!(table.is_empty());
        assert_eq!(rows, 0);
    }
}
