// src/text.rs

/// Canonical comparison form for scraped text: NBSP becomes an ordinary
/// space, every whitespace run collapses to one space, ends are trimmed.
/// Grouping keys are built from this, so it must stay idempotent.
pub fn norm_space(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for c in s.chars() {
        let c = if c == '\u{a0}' { ' ' } else { c };
        if c.is_whitespace() {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Best-effort float parse. Empty or unparseable input is `None`,
/// never an error that kills the row.
pub fn parse_f64(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer fields are read as floats and rounded half-away-from-zero,
/// so "3.0" and "3" both give 3.
pub fn parse_round_i64(s: &str) -> Option<i64> {
    parse_f64(s).map(|v| v.round() as i64)
}
