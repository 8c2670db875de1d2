// src/listing.rs

/// Column order of the listing CSV shared by the scraper output and the
/// analyzer input. Readers resolve columns by name; the writer always
/// emits this order.
pub const CSV_COLUMNS: [&str; 9] = [
    "scraped_at",
    "url",
    "price_eur",
    "eur_per_m2",
    "rooms",
    "area_m2",
    "irengtas",
    "location",
    "street",
];

/// One apartment listing. `url` and a positive `eur_per_m2` are the only
/// hard requirements; everything else is best-effort and may be absent.
/// `location` and `street` are stored already normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub scraped_at: Option<String>,
    pub url: String,
    pub price_eur: Option<i64>,
    pub eur_per_m2: f64,
    pub rooms: Option<i64>,
    pub area_m2: Option<f64>,
    pub irengtas: bool,
    pub location: String,
    pub street: String,
}

impl Listing {
    /// The bucket this listing belongs to when looking up a price
    /// baseline. Streets repeat across districts, so the default key
    /// includes the location part.
    pub fn grouping_key(&self, street_only: bool) -> String {
        if street_only {
            self.street.clone()
        } else {
            format!("{} | {}", self.location, self.street)
        }
    }

    /// Fields in `CSV_COLUMNS` order, absent values rendered empty.
    pub fn csv_record(&self) -> [String; 9] {
        [
            self.scraped_at.clone().unwrap_or_default(),
            self.url.clone(),
            self.price_eur.map(|p| p.to_string()).unwrap_or_default(),
            self.eur_per_m2.to_string(),
            self.rooms.map(|r| r.to_string()).unwrap_or_default(),
            self.area_m2.map(|a| a.to_string()).unwrap_or_default(),
            if self.irengtas { "1" } else { "0" }.to_string(),
            self.location.clone(),
            self.street.clone(),
        ]
    }
}
