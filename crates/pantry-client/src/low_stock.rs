//! Read-side views over the item list: the running-low list and its
//! notification text, name suggestions, and recently added items.
//!
//! Everything here is a pure function of a fetched `Vec<Item>`, so views can
//! recompute after each change notification without touching the store.

use std::cmp::Ordering;

use chrono::{Duration, NaiveDateTime};
use pantry_shared::constants::{
    LOW_STOCK_MESSAGE_LIMIT, MAX_NAME_SUGGESTIONS, NOTHING_LOW_MESSAGE, RECENT_ITEMS_DAYS,
};
use pantry_store::Item;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockFilter {
    #[default]
    All,
    /// Only items with nothing left.
    Empty,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationFilter {
    #[default]
    All,
    Unassigned,
    At(i64),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    /// Largest shortfall first, then by name.
    #[default]
    Deficit,
    Name,
    /// By location name (unassigned first), then by name.
    Location,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockQuery {
    pub stock: StockFilter,
    pub location: LocationFilter,
    pub sort: SortKey,
}

/// Items below their threshold that match `query`, in `query.sort` order.
pub fn low_stock_items(items: &[Item], query: &LowStockQuery) -> Vec<Item> {
    let mut low: Vec<Item> = items
        .iter()
        .filter(|item| item.is_low_stock())
        .filter(|item| match query.stock {
            StockFilter::All => true,
            StockFilter::Empty => item.qty == 0,
        })
        .filter(|item| match query.location {
            LocationFilter::All => true,
            LocationFilter::Unassigned => item.location_id.is_none(),
            LocationFilter::At(id) => item.location_id == Some(id),
        })
        .cloned()
        .collect();

    match query.sort {
        SortKey::Deficit => low.sort_by(|a, b| {
            b.deficit()
                .cmp(&a.deficit())
                .then_with(|| by_name(&a.name, &b.name))
        }),
        SortKey::Name => low.sort_by(|a, b| by_name(&a.name, &b.name)),
        SortKey::Location => low.sort_by(|a, b| {
            let la = a.location_name.as_deref().unwrap_or("");
            let lb = b.location_name.as_deref().unwrap_or("");
            by_name(la, lb).then_with(|| by_name(&a.name, &b.name))
        }),
    }
    low
}

/// Body for an on-demand "what's running low" notification.
///
/// Lists up to five items as `name qty/min`; a longer list ends with the
/// total count.
pub fn low_stock_message(low: &[Item]) -> String {
    if low.is_empty() {
        return NOTHING_LOW_MESSAGE.to_string();
    }

    let mut parts: Vec<String> = low
        .iter()
        .take(LOW_STOCK_MESSAGE_LIMIT)
        .map(|item| format!("{} {}/{}", item.name, item.qty, item.min_qty))
        .collect();
    if low.len() > LOW_STOCK_MESSAGE_LIMIT {
        parts.push(format!("...{} items in total", low.len()));
    }
    parts.join(", ")
}

/// Existing items whose name contains `query`, ignoring case. Used to offer
/// completions while a name is typed; a blank query suggests nothing.
pub fn suggest_items(items: &[Item], query: &str) -> Vec<Item> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .take(MAX_NAME_SUGGESTIONS)
        .cloned()
        .collect()
}

/// Items created within the last week of `now`, newest first.
pub fn recent_items(items: &[Item], now: NaiveDateTime) -> Vec<Item> {
    let cutoff = now - Duration::days(RECENT_ITEMS_DAYS);
    let mut recent: Vec<Item> = items
        .iter()
        .filter(|item| item.created_at >= cutoff)
        .cloned()
        .collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent
}

fn by_name(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn item(id: i64, name: &str, qty: u32, min_qty: u32, location: Option<(i64, &str)>) -> Item {
        Item {
            id,
            name: name.to_string(),
            qty,
            min_qty,
            location_id: location.map(|(id, _)| id),
            location_name: location.map(|(_, name)| name.to_string()),
            created_at: ts("2026-01-10 12:00:00"),
            updated_at: ts("2026-01-10 12:00:00"),
        }
    }

    fn names(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    fn sample() -> Vec<Item> {
        vec![
            item(1, "rice", 1, 2, Some((1, "Pantry"))),
            item(2, "Eggs", 0, 6, Some((2, "Fridge"))),
            item(3, "Soap", 0, 1, None),
            item(4, "Milk", 1, 4, Some((2, "Fridge"))),
            item(5, "Salt", 3, 0, None),
            item(6, "Tea", 5, 2, None),
        ]
    }

    #[test]
    fn test_only_low_items_by_deficit() {
        let low = low_stock_items(&sample(), &LowStockQuery::default());
        assert_eq!(names(&low), vec!["Eggs", "Milk", "rice", "Soap"]);
    }

    #[test]
    fn test_filters() {
        let empty_only = LowStockQuery {
            stock: StockFilter::Empty,
            ..Default::default()
        };
        assert_eq!(names(&low_stock_items(&sample(), &empty_only)), vec!["Eggs", "Soap"]);

        let unassigned = LowStockQuery {
            location: LocationFilter::Unassigned,
            ..Default::default()
        };
        assert_eq!(names(&low_stock_items(&sample(), &unassigned)), vec!["Soap"]);

        let fridge = LowStockQuery {
            location: LocationFilter::At(2),
            sort: SortKey::Name,
            ..Default::default()
        };
        assert_eq!(names(&low_stock_items(&sample(), &fridge)), vec!["Eggs", "Milk"]);
    }

    #[test]
    fn test_sort_by_location_then_name() {
        let query = LowStockQuery {
            sort: SortKey::Location,
            ..Default::default()
        };
        let low = low_stock_items(&sample(), &query);
        assert_eq!(names(&low), vec!["Soap", "Eggs", "Milk", "rice"]);
    }

    #[test]
    fn test_message() {
        assert_eq!(low_stock_message(&[]), NOTHING_LOW_MESSAGE);

        let low = low_stock_items(&sample(), &LowStockQuery::default());
        assert_eq!(
            low_stock_message(&low),
            "Eggs 0/6, Milk 1/4, rice 1/2, Soap 0/1"
        );

        let many: Vec<Item> = (0..7).map(|i| item(i, &format!("I{i}"), 0, 1, None)).collect();
        let message = low_stock_message(&many);
        assert!(message.starts_with("I0 0/1, I1 0/1"));
        assert!(message.ends_with("I4 0/1, ...7 items in total"));
    }

    #[test]
    fn test_suggestions() {
        let items = sample();
        assert_eq!(names(&suggest_items(&items, " S ")), vec!["Eggs", "Soap", "Salt"]);
        assert_eq!(names(&suggest_items(&items, "RIC")), vec!["rice"]);
        assert!(suggest_items(&items, "   ").is_empty());

        let many: Vec<Item> = (0..10).map(|i| item(i, &format!("Can {i}"), 1, 0, None)).collect();
        assert_eq!(suggest_items(&many, "can").len(), MAX_NAME_SUGGESTIONS);
    }

    #[test]
    fn test_recent_items() {
        let mut old = item(1, "Old", 1, 0, None);
        old.created_at = ts("2026-01-01 09:00:00");
        let mut newer = item(2, "Newer", 1, 0, None);
        newer.created_at = ts("2026-01-09 09:00:00");
        let mut newest = item(3, "Newest", 1, 0, None);
        newest.created_at = ts("2026-01-12 09:00:00");

        let recent = recent_items(&[old, newer, newest], ts("2026-01-13 10:00:00"));
        assert_eq!(names(&recent), vec!["Newest", "Newer"]);
    }
}
