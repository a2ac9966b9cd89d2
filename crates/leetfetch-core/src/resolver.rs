//! Query resolution: numeric id, literal slug, or fuzzy title match.

use crate::catalog::CatalogEntry;

/// Outcome of resolving a user query against the catalog.
///
/// `Ambiguous` is not a failure; it asks the caller to disambiguate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Slug(String),
    Ambiguous(Vec<CatalogEntry>),
    NotFound,
}

/// Resolve `query` to a problem slug. First applicable rule wins:
///
/// 1. all digits → look up by frontend id; a miss is final (no fuzzy
///    fallthrough);
/// 2. contains a hyphen and no whitespace → taken as a literal slug,
///    without consulting the catalog;
/// 3. otherwise a case- and whitespace-insensitive substring match over
///    titles and slugs.
pub fn resolve(query: &str, catalog: &[CatalogEntry]) -> Resolution {
    let query = query.trim();
    if !query.is_empty() && query.chars().all(|c| c.is_ascii_digit()) {
        return match catalog.iter().find(|e| e.frontend_id == query) {
            Some(entry) => Resolution::Slug(entry.slug.clone()),
            None => Resolution::NotFound,
        };
    }
    if query.contains('-') && !query.contains(char::is_whitespace) {
        return Resolution::Slug(query.to_string());
    }
    let matches = find_matches(catalog, query);
    match matches.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Slug(matches[0].slug.clone()),
        _ => Resolution::Ambiguous(matches.into_iter().cloned().collect()),
    }
}

/// All catalog entries whose normalized title or slug contains the
/// normalized query, in catalog order.
pub fn find_matches<'a>(catalog: &'a [CatalogEntry], query: &str) -> Vec<&'a CatalogEntry> {
    let query = normalize(query);
    catalog
        .iter()
        .filter(|entry| normalize(&entry.title).contains(&query) || normalize(&entry.slug).contains(&query))
        .collect()
}

/// Trim, lowercase, and collapse internal whitespace to single spaces.
fn normalize(text: &str) -> String {
    text.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}
