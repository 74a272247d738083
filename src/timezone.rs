//! Conversions from IANA timezone names to UTC offsets.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone, timezones};

/// The current UTC offset of `canonical_timezone`, e.g. "Pacific/Auckland".
///
/// Returns `None` if the name is not in the timezone database. The offset
/// follows daylight saving, so it should be looked up per request rather
/// than once at startup.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    let timezone = timezones::get_by_name(canonical_timezone)?;

    Some(timezone.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Today's date in `canonical_timezone`, or `None` for an unknown timezone.
pub fn local_today(canonical_timezone: &str) -> Option<Date> {
    let offset = get_local_offset(canonical_timezone)?;

    Some(OffsetDateTime::now_utc().to_offset(offset).date())
}

#[cfg(test)]
mod tests {
    use time::{OffsetDateTime, UtcOffset};

    use super::{get_local_offset, local_today};

    #[test]
    fn utc_has_no_offset() {
        assert_eq!(get_local_offset("Etc/UTC"), Some(UtcOffset::UTC));
    }

    #[test]
    fn fixed_offset_zone() {
        // The Etc zones have inverted signs and no daylight saving.
        assert_eq!(get_local_offset("Etc/GMT-12"), UtcOffset::from_hms(12, 0, 0).ok());
    }

    #[test]
    fn unknown_zone_is_none() {
        assert_eq!(get_local_offset("Not/AZone"), None);
        assert_eq!(local_today("Not/AZone"), None);
    }

    #[test]
    fn today_in_utc() {
        let before = OffsetDateTime::now_utc().date();
        let today = local_today("Etc/UTC").unwrap();
        let after = OffsetDateTime::now_utc().date();

        assert!(today == before || today == after);
    }
}
