//! Geolocation to timezone resolution.
//!
//! Capture times in EXIF are local civil time; correcting them to UTC needs
//! the timezone at the capture position. Lookup failures degrade through a
//! short fallback list and finally to UTC, so the resolver never fails.

use chrono::{NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use tracing::warn;
use tzf_rs::DefaultFinder;

/// Zone identifiers tried when the primary candidate cannot be resolved.
const FALLBACK_ZONES: &[&str] = &["Etc/UTC", "UTC"];

/// Resolves geographic positions to timezones.
///
/// Construct once at process start and pass by reference; building the
/// boundary index is not free.
pub struct TimezoneResolver {
    finder: DefaultFinder,
}

impl std::fmt::Debug for TimezoneResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimezoneResolver").finish()
    }
}

impl Default for TimezoneResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneResolver {
    /// Build a resolver over the bundled timezone boundary dataset.
    pub fn new() -> Self {
        Self {
            finder: DefaultFinder::new(),
        }
    }

    /// The timezone at a geographic position.
    ///
    /// Never fails: an unresolvable candidate falls through the fallback
    /// list and settles on UTC.
    pub fn lookup(&self, lat: f64, lon: f64) -> Tz {
        let primary = self.finder.get_tz_name(lon, lat);
        for candidate in std::iter::once(primary).chain(FALLBACK_ZONES.iter().copied()) {
            if candidate.is_empty() {
                continue;
            }
            match candidate.parse::<Tz>() {
                Ok(tz) => return tz,
                Err(_) => {
                    warn!(zone = candidate, "unresolvable timezone candidate");
                }
            }
        }
        Tz::UTC
    }

    /// Convert a civil date/time in `tz` plus a sub-second offset to epoch
    /// milliseconds.
    ///
    /// Ambiguous local times (DST transitions) resolve to the earlier
    /// instant; nonexistent local times yield `None`.
    pub fn to_utc_epoch_millis(
        &self,
        local: NaiveDateTime,
        fractional_millis: u32,
        tz: Tz,
    ) -> Option<i64> {
        tz.from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.timestamp_millis() + fractional_millis as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_lookup_known_positions() {
        let resolver = TimezoneResolver::new();
        assert_eq!(resolver.lookup(45.46, 9.19), Tz::Europe__Rome);
        assert_eq!(resolver.lookup(47.6062, -122.3321), Tz::America__Los_Angeles);
    }

    #[test]
    fn test_open_ocean_falls_back_to_a_usable_zone() {
        let resolver = TimezoneResolver::new();
        // Middle of the Pacific: whatever the finder answers must parse
        let tz = resolver.lookup(-40.0, -140.0);
        let _ = tz.name();
    }

    #[test]
    fn test_civil_to_utc_conversion() {
        let resolver = TimezoneResolver::new();
        // 2021-06-15 12:00:00 in Rome is 10:00:00 UTC (CEST, +2)
        let local = NaiveDate::from_ymd_opt(2021, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let millis = resolver
            .to_utc_epoch_millis(local, 250, Tz::Europe__Rome)
            .unwrap();
        assert_eq!(millis, 1_623_751_200_000 + 250);
    }

    #[test]
    fn test_utc_passthrough() {
        let resolver = TimezoneResolver::new();
        let local = NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 1)
            .unwrap();
        assert_eq!(
            resolver.to_utc_epoch_millis(local, 0, Tz::UTC),
            Some(1000)
        );
    }
}
