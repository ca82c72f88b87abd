use std::collections::HashMap;

use tracing::warn;

use crate::extractor;
use crate::fetcher::Fetcher;

/// Product name → price in rubles.
pub type PriceTable = HashMap<String, f64>;

/// Two-stage pipeline: fetch the listing page, extract prices from its text.
///
/// Never fails. A fetch error degrades to the fetch-failure fallback table;
/// a reachable page with no recognizable prices degrades to the general one
/// inside the extractor.
pub async fn current_prices(fetcher: &Fetcher) -> PriceTable {
    match fetcher.fetch().await {
        Ok(text) => extractor::extract(&text, true),
        Err(e) => {
            warn!("Fetch failed, serving fallback prices: {:#}", e);
            extractor::extract("", false)
        }
    }
}

// ── Tests ──
