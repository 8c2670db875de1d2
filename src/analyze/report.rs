// src/analyze/report.rs
use std::fs;
use std::path::Path;

use crate::analyze::score::Scored;
use crate::errors::AppError;

/// Run parameters echoed into the report header.
pub struct ReportParams<'a> {
    pub market_csv: &'a str,
    pub min_street_n: usize,
    pub street_only: bool,
    pub top_n: usize,
}

const RULE_HEAVY: &str =
    "======================================================================";
const RULE_LIGHT: &str =
    "----------------------------------------------------------------------";

/// Render the ranked list as the final plain-text report. Pure
/// formatting; the ranking is taken as given.
pub fn render_report(ranked: &[Scored], params: &ReportParams) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "TOP {} by (street median €/m² from market CSV) / (listing €/m²)\n",
        params.top_n
    ));
    out.push_str(&format!(
        "CSV: {} | min_street_n={} | key={}\n",
        params.market_csv,
        params.min_street_n,
        if params.street_only { "street" } else { "location+street" }
    ));
    out.push_str(RULE_HEAVY);
    out.push_str("\n\n");

    for (i, s) in ranked.iter().enumerate() {
        let l = &s.listing;

        // negative room counts are the CSV's "unknown" sentinel
        let rooms = match l.rooms {
            Some(r) if r >= 0 => format!("{r}k"),
            _ => "k: n/a".to_string(),
        };
        let area = match l.area_m2 {
            Some(a) if a > 0.0 => format!("{a:.1} m²"),
            _ => "m²: n/a".to_string(),
        };
        let state = if l.irengtas { "įrengtas" } else { "neįrengtas" };
        let price = match l.price_eur {
            Some(p) if p > 0 => format!("{p} €"),
            _ => "kaina: n/a".to_string(),
        };

        out.push_str(&format!(
            "#{} deal={:.3}  street_median={} €/m² (n={})  listing={} €/m²\n",
            i + 1,
            s.deal,
            s.street_median.round() as i64,
            s.street_n,
            l.eur_per_m2.round() as i64,
        ));
        out.push_str(&format!(
            "{}, {} | {} | {} | {} | {}\n",
            l.location, l.street, rooms, area, state, price
        ));
        out.push_str(&l.url);
        out.push('\n');
        out.push_str(RULE_LIGHT);
        out.push('\n');
    }

    out
}

pub fn write_report(path: &Path, ranked: &[Scored], params: &ReportParams) -> Result<(), AppError> {
    fs::write(path, render_report(ranked, params))
        .map_err(|e| AppError::ReportWrite(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::Listing;

    fn entry(deal: f64, listing: Listing) -> Scored {
        Scored {
            deal,
            street_median: 1200.0,
            street_n: 5,
            key: format!("{} | {}", listing.location, listing.street),
            listing,
        }
    }

    fn full_listing() -> Listing {
        Listing {
            scraped_at: Some("2026-08-29T12:00:00".to_string()),
            url: "https://m.aruodas.lt/1-123".to_string(),
            price_eur: Some(52000),
            eur_per_m2: 800.0,
            rooms: Some(3),
            area_m2: Some(62.5),
            irengtas: true,
            location: "Town".to_string(),
            street: "Oak".to_string(),
        }
    }

    fn params() -> ReportParams<'static> {
        ReportParams { market_csv: "kainos.csv", min_street_n: 5, street_only: false, top_n: 3 }
    }

    #[test]
    fn header_names_formula_and_parameters() {
        let text = render_report(&[], &params());
        assert!(text.starts_with("TOP 3 by (street median €/m² from market CSV) / (listing €/m²)\n"));
        assert!(text.contains("CSV: kainos.csv | min_street_n=5 | key=location+street\n"));
        assert!(text.contains(RULE_HEAVY));
    }

    #[test]
    fn street_only_key_is_reported() {
        let p = ReportParams { street_only: true, ..params() };
        assert!(render_report(&[], &p).contains("key=street"));
    }

    #[test]
    fn entry_block_is_rendered_in_rank_order() {
        let text = render_report(&[entry(1.5, full_listing())], &params());
        assert!(text.contains("#1 deal=1.500  street_median=1200 €/m² (n=5)  listing=800 €/m²\n"));
        assert!(text.contains("Town, Oak | 3k | 62.5 m² | įrengtas | 52000 €\n"));
        assert!(text.contains("https://m.aruodas.lt/1-123\n"));
        assert!(text.contains(RULE_LIGHT));
    }

    #[test]
    fn unknown_fields_use_na_labels() {
        let mut l = full_listing();
        l.price_eur = None;
        l.rooms = None;
        l.area_m2 = None;
        l.irengtas = false;
        let text = render_report(&[entry(1.2, l)], &params());
        assert!(text.contains("Town, Oak | k: n/a | m²: n/a | neįrengtas | kaina: n/a\n"));
    }

    #[test]
    fn negative_rooms_sentinel_renders_unknown() {
        let mut l = full_listing();
        l.rooms = Some(-1);
        let text = render_report(&[entry(1.2, l)], &params());
        assert!(text.contains("| k: n/a |"));
        assert!(!text.contains("-1k"));

        let mut l = full_listing();
        l.rooms = Some(0);
        assert!(render_report(&[entry(1.2, l)], &params()).contains("| 0k |"));
    }

    #[test]
    fn ranks_are_one_based_and_sequential() {
        let ranked = vec![entry(1.5, full_listing()), entry(1.1, full_listing())];
        let text = render_report(&ranked, &params());
        assert!(text.contains("#1 deal=1.500"));
        assert!(text.contains("#2 deal=1.100"));
    }
}
