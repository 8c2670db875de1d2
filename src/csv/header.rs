use std::collections::HashMap;

use crate::csv::split_line;

/// Column lookup for a header row. Names are matched exactly after
/// trimming; column order in the file is irrelevant.
pub struct Header {
    index: HashMap<String, usize>,
}

impl Header {
    pub fn parse(line: &str) -> Self {
        let mut index = HashMap::new();
        for (i, name) in split_line(line).into_iter().enumerate() {
            index.insert(name.trim().to_string(), i);
        }
        Header { index }
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_columns_by_trimmed_name() {
        let h = Header::parse(" url , eur_per_m2,street");
        assert_eq!(h.find("url"), Some(0));
        assert_eq!(h.find("eur_per_m2"), Some(1));
        assert_eq!(h.find("street"), Some(2));
        assert_eq!(h.find("rooms"), None);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let h = Header::parse("Url,EUR_PER_M2");
        assert_eq!(h.find("url"), None);
        assert_eq!(h.find("Url"), Some(0));
    }
}
