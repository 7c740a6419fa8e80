//! Place-name to time-zone resolution.

use std::collections::HashMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::errors::AppError;

/// Resolves a free-text place name to an IANA zone identifier.
///
/// Implementations may be slow; callers debounce through
/// [`super::DebouncedLookup`].
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn time_zone_for(&self, place: &str) -> Result<Option<String>, AppError>;
}

/// Well-known cities whose zone identifier does not contain the city name.
static CITIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("san francisco", "America/Los_Angeles"),
        ("seattle", "America/Los_Angeles"),
        ("portland", "America/Los_Angeles"),
        ("san diego", "America/Los_Angeles"),
        ("las vegas", "America/Los_Angeles"),
        ("austin", "America/Chicago"),
        ("dallas", "America/Chicago"),
        ("houston", "America/Chicago"),
        ("minneapolis", "America/Chicago"),
        ("atlanta", "America/New_York"),
        ("boston", "America/New_York"),
        ("miami", "America/New_York"),
        ("washington", "America/New_York"),
        ("philadelphia", "America/New_York"),
        ("montreal", "America/Toronto"),
        ("ottawa", "America/Toronto"),
        ("calgary", "America/Edmonton"),
        ("salt lake city", "America/Denver"),
        ("rio de janeiro", "America/Sao_Paulo"),
        ("manchester", "Europe/London"),
        ("edinburgh", "Europe/London"),
        ("barcelona", "Europe/Madrid"),
        ("munich", "Europe/Berlin"),
        ("hamburg", "Europe/Berlin"),
        ("frankfurt", "Europe/Berlin"),
        ("milan", "Europe/Rome"),
        ("geneva", "Europe/Zurich"),
        ("krakow", "Europe/Warsaw"),
        ("st petersburg", "Europe/Moscow"),
        ("tel aviv", "Asia/Jerusalem"),
        ("abu dhabi", "Asia/Dubai"),
        ("bangalore", "Asia/Kolkata"),
        ("bengaluru", "Asia/Kolkata"),
        ("mumbai", "Asia/Kolkata"),
        ("delhi", "Asia/Kolkata"),
        ("new delhi", "Asia/Kolkata"),
        ("hyderabad", "Asia/Kolkata"),
        ("chennai", "Asia/Kolkata"),
        ("beijing", "Asia/Shanghai"),
        ("shenzhen", "Asia/Shanghai"),
        ("osaka", "Asia/Tokyo"),
        ("kyoto", "Asia/Tokyo"),
        ("hanoi", "Asia/Bangkok"),
        ("canberra", "Australia/Sydney"),
        ("wellington", "Pacific/Auckland"),
        ("cape town", "Africa/Johannesburg"),
    ])
});

/// Resolves well-known city names from a built-in table. Never touches the
/// network.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGeocoder;

impl OfflineGeocoder {
    fn resolve(place: &str) -> Option<&'static str> {
        // "Munich, Germany" → "munich"
        let city = place.split(',').next().unwrap_or(place);
        let key = city
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
            .replace('.', "");
        CITIES.get(key.as_str()).copied()
    }
}

#[async_trait]
impl Geocoder for OfflineGeocoder {
    async fn time_zone_for(&self, place: &str) -> Result<Option<String>, AppError> {
        Ok(Self::resolve(place).map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timezone;

    #[test]
    fn test_table_entries_are_valid_zones() {
        for (city, zone) in CITIES.iter() {
            assert!(timezone::resolve(zone).is_some(), "{} -> {}", city, zone);
        }
    }

    #[tokio::test]
    async fn test_city_country_form() {
        let zone = OfflineGeocoder.time_zone_for("Munich, Germany").await.unwrap();
        assert_eq!(zone.as_deref(), Some("Europe/Berlin"));

        let zone = OfflineGeocoder.time_zone_for("  St. Petersburg ").await.unwrap();
        assert_eq!(zone.as_deref(), Some("Europe/Moscow"));
    }

    #[tokio::test]
    async fn test_unknown_place() {
        let zone = OfflineGeocoder.time_zone_for("Atlantis").await.unwrap();
        assert!(zone.is_none());
    }
}
