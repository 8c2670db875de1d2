// src/scrape/parse.rs
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::listing::Listing;
use crate::text::norm_space;

static SEL_CARD: Lazy<Selector> = Lazy::new(|| sel("li.result-item-big-thumb"));
static SEL_LINK_MAIN: Lazy<Selector> = Lazy::new(|| sel("a.object-image-link-big_thumbs[href]"));
static SEL_LINK_ANY: Lazy<Selector> = Lazy::new(|| sel("a[href]"));
static SEL_PRICE: Lazy<Selector> = Lazy::new(|| sel(".price-main-v2"));
static SEL_PPM: Lazy<Selector> = Lazy::new(|| sel(".price-per-v2"));
static SEL_ADDRESS: Lazy<Selector> = Lazy::new(|| sel(".addressPiece"));
static SEL_ROOMS: Lazy<Selector> = Lazy::new(|| sel(".description-item.desc-RoomNum .desc-img-txt"));
static SEL_AREA: Lazy<Selector> = Lazy::new(|| sel(".description-item.desc-AreaOverall .desc-img-txt"));
static SEL_STATE: Lazy<Selector> = Lazy::new(|| sel(".description-item.desc-HouseState .desc-img-txt"));
static SEL_NEXT: Lazy<Selector> = Lazy::new(|| sel("div.nav-toolbar-v2 div.button-next-v2 a[href]"));
static SEL_NEXT_REL: Lazy<Selector> = Lazy::new(|| sel(r#"link[rel~="next"]"#));

static RE_ROOMS: Lazy<Regex> = Lazy::new(|| re(r"(\d+)"));
static RE_AREA: Lazy<Regex> = Lazy::new(|| re(r"(\d+(?:\.\d+)?)"));
static RE_ROOMS_FALLBACK: Lazy<Regex> = Lazy::new(|| re(r"(?i)(\d+)\s*(?:kamb\.|kamb|k\.)"));
static RE_AREA_FALLBACK: Lazy<Regex> = Lazy::new(|| re(r"(?i)(\d+(?:[.,]\d+)?)\s*m²"));

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static regex")
}

/// One parsed result page: the listing cards that survived extraction
/// and the absolute next-page URL, when the page has one.
#[derive(Debug)]
pub struct ParsedPage {
    pub listings: Vec<Listing>,
    pub next_url: Option<String>,
}

/// Extract all listing cards and the pagination link from one page of
/// HTML. Bad cards are dropped individually; the page itself never
/// fails.
pub fn parse_page(html: &str, page_url: &str) -> ParsedPage {
    let doc = Html::parse_document(html);

    let listings = doc
        .select(&SEL_CARD)
        .filter_map(|card| parse_card(card, page_url))
        .collect();

    ParsedPage { listings, next_url: parse_next_url(&doc, page_url) }
}

fn parse_card(card: ElementRef, page_url: &str) -> Option<Listing> {
    let link = card
        .select(&SEL_LINK_MAIN)
        .next()
        .or_else(|| card.select(&SEL_LINK_ANY).next())?;
    let href = link.value().attr("href")?.trim();
    if href.is_empty() {
        return None;
    }
    let url = resolve_href(page_url, href)?;

    let price_eur = first_text(card, &SEL_PRICE).as_deref().and_then(parse_money_eur);
    let eur_per_m2 = first_text(card, &SEL_PPM).as_deref().and_then(parse_eur_per_m2);

    let address: Vec<String> = card.select(&SEL_ADDRESS).map(element_text).collect();
    let location = address.first().cloned().unwrap_or_default();
    let street = address.get(1).cloned().unwrap_or_default();

    let mut rooms = first_text(card, &SEL_ROOMS).as_deref().and_then(parse_rooms);
    let mut area_m2 = first_text(card, &SEL_AREA).as_deref().and_then(parse_area_m2);
    let mut irengtas = first_text(card, &SEL_STATE).as_deref() == Some("Įrengtas");

    // Cards on some result layouts lack the structured description
    // nodes; scan the card's whole text instead.
    let raw = element_text(card);
    if rooms.is_none() {
        rooms = RE_ROOMS_FALLBACK
            .captures(&raw)
            .and_then(|c| c[1].parse().ok());
    }
    if area_m2.is_none() {
        area_m2 = RE_AREA_FALLBACK
            .captures(&raw)
            .and_then(|c| c[1].replace(',', ".").parse().ok());
    }
    if !irengtas && raw.contains("Įrengtas") {
        irengtas = true;
    }

    let eur_per_m2 = eur_per_m2.filter(|v| *v > 0.0)?;

    Some(Listing {
        scraped_at: None,
        url,
        price_eur,
        eur_per_m2,
        rooms,
        area_m2,
        irengtas,
        location,
        street,
    })
}

fn parse_next_url(doc: &Html, page_url: &str) -> Option<String> {
    let href = doc
        .select(&SEL_NEXT)
        .next()
        .and_then(|a| a.value().attr("href"))
        .or_else(|| doc.select(&SEL_NEXT_REL).next().and_then(|l| l.value().attr("href")))?
        .trim();
    if href.is_empty() {
        return None;
    }
    resolve_href(page_url, href)
}

fn resolve_href(base: &str, href: &str) -> Option<String> {
    if href.starts_with("http") {
        return Some(href.to_string());
    }
    Url::parse(base).ok()?.join(href).ok().map(String::from)
}

fn element_text(el: ElementRef) -> String {
    let joined = el.text().collect::<Vec<_>>().join(" ");
    norm_space(&joined)
}

fn first_text(card: ElementRef, selector: &Selector) -> Option<String> {
    card.select(selector).next().map(element_text)
}

/// Digits-only euro amount: "52 000 €" → 52000.
pub fn parse_money_eur(text: &str) -> Option<i64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Digits-only €/m²: "1 234 €/m²" → 1234.0.
pub fn parse_eur_per_m2(text: &str) -> Option<f64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// First integer run: "3 kamb." → 3.
pub fn parse_rooms(text: &str) -> Option<i64> {
    RE_ROOMS.captures(text).and_then(|c| c[1].parse().ok())
}

/// First decimal number, comma decimals tolerated: "62,5 m²" → 62.5.
pub fn parse_area_m2(text: &str) -> Option<f64> {
    let t = text.replace(',', ".");
    RE_AREA.captures(&t).and_then(|c| c[1].parse().ok())
}
