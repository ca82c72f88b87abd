use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::defaults::{FETCH_FAILURE_FALLBACK, GENERAL_FALLBACK};
use crate::prices::PriceTable;

// Matches listing lines like "Молоко 2.5% - 89,5 ₽" or "Хлеб по цене 40 руб".
// A fat-content percentage belongs to the product name; the currency marker
// varies and is often missing entirely.
static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([А-Яа-я\s]+(?:[\d.,]+%)?)\s*(?:-|по цене)\s*([\d.,]+)(?:\s*₽|\s*руб)?").unwrap()
});

const MAX_PRICE: f64 = 10_000.0;

/// Scan page text for product/price pairs and build the price table.
///
/// `fetch_succeeded = false` short-circuits to the fetch-failure fallback;
/// a reachable page yielding zero valid pairs falls back to the general
/// table instead, so the two degradation causes stay distinguishable.
/// A repeated product name keeps the last price seen.
pub fn extract(text: &str, fetch_succeeded: bool) -> PriceTable {
    if !fetch_succeeded {
        return FETCH_FAILURE_FALLBACK.clone();
    }

    let mut prices = PriceTable::new();
    for caps in PRICE_RE.captures_iter(text) {
        let product = caps[1].trim();
        if product.is_empty() {
            continue;
        }

        let price: f64 = match caps[2].replace(',', ".").parse() {
            Ok(p) => p,
            Err(_) => {
                debug!("Discarding unparseable price {:?} for {:?}", &caps[2], product);
                continue;
            }
        };

        // Guard against mis-parsed matches: percentages, years, phone digits
        if price <= 0.0 || price > MAX_PRICE {
            debug!("Discarding out-of-range price {} for {:?}", price, product);
            continue;
        }

        prices.insert(product.to_string(), price);
    }

    if prices.is_empty() {
        warn!("No prices recognized in page text, serving general fallback");
        return GENERAL_FALLBACK.clone();
    }

    debug!("Extracted {} products", prices.len());
    prices
}

// ── Tests ──
