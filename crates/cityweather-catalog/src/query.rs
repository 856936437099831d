//! Client-side search and ordering over the loaded city list.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::types::{CityRecord, FilterOption, SortDirection, SortField};

/// A header-click sort applied on top of the filter ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSort {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Base letters only: decomposed, combining marks dropped, lowercased.
fn folded(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn lowered(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().flat_map(char::to_lowercase)
}

/// Lexicographic order ignoring accents and case, then case-insensitive with
/// accents, then raw order. Identical strings are the only ties.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    folded(a)
        .cmp(folded(b))
        .then_with(|| lowered(a).cmp(lowered(b)))
        .then_with(|| a.cmp(b))
}

/// Stable sort by one column; equal values keep their input order.
pub fn sort_cities(cities: &mut [CityRecord], field: SortField, direction: SortDirection) {
    cities.sort_by(|a, b| {
        let ordering = compare_text(field.value(a), field.value(b));
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Displayed ordering: the filter re-sorts the whole list, then each column
/// sort since the last filter change re-sorts the result in turn.
pub fn derive_view(
    cities: &[CityRecord],
    filter: Option<FilterOption>,
    column_sorts: &[ColumnSort],
) -> Vec<CityRecord> {
    let mut view = cities.to_vec();
    if let Some(option) = filter {
        sort_cities(&mut view, option.field, option.direction);
    }
    for sort in column_sorts {
        sort_cities(&mut view, sort.field, sort.direction);
    }
    view
}

/// Cities whose name starts with `query`, ignoring case, in list order.
///
/// Only the loaded cities are searched.
pub fn suggest(query: &str, cities: &[CityRecord]) -> Vec<CityRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    cities
        .iter()
        .filter(|city| city.name.to_lowercase().starts_with(&needle))
        .cloned()
        .collect()
}
