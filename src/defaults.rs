use std::sync::LazyLock;

use crate::prices::PriceTable;

/// Served when the page was reachable but no price pattern matched,
/// which usually means the upstream layout changed.
pub static GENERAL_FALLBACK: LazyLock<PriceTable> = LazyLock::new(|| {
    table(&[
        ("Хлеб белый", 40.0),
        ("Хлеб ржаной", 45.0),
        ("Молоко 2.5%", 89.0),
        ("Молоко 3.2%", 95.0),
        ("Яйца С1", 85.0),
        ("Яйца С0", 95.0),
        ("Сыр российский", 320.0),
        ("Сыр голландский", 340.0),
        ("Масло сливочное", 150.0),
        ("Масло подсолнечное", 120.0),
        ("Говядина", 400.0),
        ("Свинина", 380.0),
        ("Курица", 280.0),
        ("Минтай", 350.0),
        ("Треска", 420.0),
        ("Картофель", 45.0),
        ("Морковь", 35.0),
        ("Лук репчатый", 30.0),
        ("Капуста", 25.0),
    ])
});

/// Served when the network call itself failed.
pub static FETCH_FAILURE_FALLBACK: LazyLock<PriceTable> = LazyLock::new(|| {
    table(&[
        ("Хлеб белый", 40.0),
        ("Хлеб ржаной", 45.0),
        ("Молоко 2.5%", 89.0),
        ("Молоко 3.2%", 95.0),
        ("Яйца С1", 85.0),
        ("Картофель", 45.0),
        ("Морковь", 35.0),
    ])
});

fn table(entries: &[(&str, f64)]) -> PriceTable {
    entries
        .iter()
        .map(|(name, price)| (name.to_string(), *price))
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_sizes() {
        assert_eq!(GENERAL_FALLBACK.len(), 19);
        assert_eq!(FETCH_FAILURE_FALLBACK.len(), 7);
    }

    #[test]
    fn fetch_failure_set_is_subset_of_general() {
        for (name, price) in FETCH_FAILURE_FALLBACK.iter() {
            assert_eq!(GENERAL_FALLBACK.get(name), Some(price));
        }
    }

    #[test]
    fn all_prices_in_valid_range() {
        for price in GENERAL_FALLBACK.values() {
            assert!(*price > 0.0 && *price <= 10_000.0);
        }
    }
}
