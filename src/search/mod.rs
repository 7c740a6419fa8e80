//! City and time-zone lookup.
//!
//! Queries go through three tiers: a substring match on the zone catalog, a
//! [`Geocoder`] for place names, then a word match on humanized zone names.

mod debounce;
mod geocoder;

pub use debounce::*;
pub use geocoder::*;

use chrono_tz::TZ_VARIANTS;

/// Default number of results per lookup.
pub const DEFAULT_LIMIT: usize = 20;

/// Which tier produced a lookup result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LookupTier {
    Catalog,
    Geocoder,
    Broad,
    Empty,
}

/// Result of one lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    pub query: String,
    pub zones: Vec<String>,
    pub tier: Option<LookupTier>,
}

/// Every identifier in the bundled zone database.
pub fn catalog() -> impl Iterator<Item = &'static str> {
    TZ_VARIANTS.iter().map(|tz| tz.name())
}

/// Tier 1: identifiers containing `query`, case-insensitively.
pub fn match_identifiers(query: &str, limit: usize) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    catalog()
        .filter(|name| name.to_lowercase().contains(&needle))
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// Tier 3: identifiers whose humanized form contains every query word.
///
/// `"sao paulo"` finds `America/Sao_Paulo`; `"america argentina"` finds every
/// Argentinian zone.
pub fn broad_match(query: &str, limit: usize) -> Vec<String> {
    let words: Vec<String> = query
        .split(|c: char| c.is_whitespace() || c == ',' || c == '/')
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect();
    if words.is_empty() {
        return Vec::new();
    }

    catalog()
        .filter(|name| {
            let humanized = humanize(name);
            words.iter().all(|word| humanized.contains(word.as_str()))
        })
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// `America/Port_of_Spain` → `america port of spain`.
fn humanize(identifier: &str) -> String {
    identifier
        .chars()
        .map(|c| match c {
            '_' | '/' | '-' => ' ',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

/// Tiered zone lookup over a geocoder.
pub struct ZoneLookup<G> {
    geocoder: G,
    limit: usize,
}

impl<G: Geocoder> ZoneLookup<G> {
    pub fn new(geocoder: G, limit: usize) -> Self {
        Self {
            geocoder,
            limit: limit.max(1),
        }
    }

    /// Resolve `query` to candidate zone identifiers.
    ///
    /// Geocoder failures are logged and fall through to the next tier.
    pub async fn lookup(&self, query: &str) -> LookupResult {
        let query = query.trim();
        let mut result = LookupResult {
            query: query.to_string(),
            ..LookupResult::default()
        };
        if query.is_empty() {
            result.tier = Some(LookupTier::Empty);
            return result;
        }

        let direct = match_identifiers(query, self.limit);
        if !direct.is_empty() {
            result.zones = direct;
            result.tier = Some(LookupTier::Catalog);
            return result;
        }

        match self.geocoder.time_zone_for(query).await {
            Ok(Some(zone)) => {
                tracing::debug!("Geocoder resolved {:?} to {}", query, zone);
                result.zones = vec![zone];
                result.tier = Some(LookupTier::Geocoder);
                return result;
            }
            Ok(None) => tracing::debug!("Geocoder has no match for {:?}", query),
            Err(e) => tracing::warn!("Geocoder failed for {:?}: {}", query, e),
        }

        result.zones = broad_match(query, self.limit);
        result.tier = Some(if result.zones.is_empty() {
            LookupTier::Empty
        } else {
            LookupTier::Broad
        });
        result
    }
}
