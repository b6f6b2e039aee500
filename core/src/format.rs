//! Display formatters for dates, times and phone numbers.
//!
//! All functions are pure apart from `format_date` reading the process
//! locale. Input they cannot interpret comes back unchanged so a view can
//! always render something.

use chrono::{DateTime, Locale, NaiveDate};

/// Locale used when the environment names none that chrono knows.
pub const FALLBACK_LOCALE: Locale = Locale::en_US;

/// Short date in the process locale (`LC_ALL`, `LC_TIME`, then `LANG`).
/// See `format_date_in`.
pub fn format_date(date: &str) -> String {
    format_date_in(date, process_locale())
}

/// Two-digit day, abbreviated month and full year in `locale`'s order and
/// month names: `"2025-03-05"` is `"Mar 05, 2025"` in `en_US` and
/// `"05 Mar 2025"` in `en_GB`. Also accepts RFC 3339 timestamps.
pub fn format_date_in(date: &str, locale: Locale) -> String {
    let trimmed = date.trim();
    let parsed = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(trimmed).ok().map(|dt| dt.date_naive()));
    let pattern = if month_first(locale) { "%b %d, %Y" } else { "%d %b %Y" };
    match parsed {
        Some(day) => day.format_localized(pattern, locale).to_string(),
        None => date.to_string(),
    }
}

fn month_first(locale: Locale) -> bool {
    matches!(locale, Locale::en_US | Locale::en_CA)
}

fn process_locale() -> Locale {
    ["LC_ALL", "LC_TIME", "LANG"]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|tag| !tag.trim().is_empty())
        .and_then(|tag| locale_from_tag(&tag))
        .unwrap_or(FALLBACK_LOCALE)
}

/// `"de_DE.UTF-8"`, `"de-DE"` and `"de_DE@euro"` all name `de_DE`. `C` and
/// unknown tags give `None`.
fn locale_from_tag(tag: &str) -> Option<Locale> {
    let name = tag.trim().split(['.', '@']).next()?.replace('-', "_");
    Locale::try_from(name.as_str()).ok()
}

/// 24-hour `"HH:MM"` to 12-hour with an AM/PM suffix. Seconds, if present,
/// are dropped.
pub fn format_time(time: &str) -> String {
    let mut parts = time.trim().split(':');
    let (Some(hours), Some(minutes)) = (parts.next(), parts.next()) else {
        return time.to_string();
    };
    let hour = match hours.parse::<u32>() {
        Ok(hour) if hour < 24 && !minutes.is_empty() => hour,
        _ => return time.to_string(),
    };
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display_hour}:{minutes} {period}")
}

/// North American numbers as `+1-XXX-XXX-XXXX`. Accepts 10 digits, or 11 with
/// a leading `1`, after stripping everything that is not a digit.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let local = match digits.len() {
        10 => digits.as_str(),
        11 if digits.starts_with('1') => &digits[1..],
        _ => return phone.to_string(),
    };
    format!("+1-{}-{}-{}", &local[..3], &local[3..6], &local[6..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn us_date_puts_month_first() {
        assert_eq!(format_date_in("2025-03-05", Locale::en_US), "Mar 05, 2025");
        assert_eq!(format_date_in("2024-12-31", Locale::en_US), "Dec 31, 2024");
    }

    #[test]
    fn british_date_puts_day_first() {
        assert_eq!(format_date_in("2025-03-05", Locale::en_GB), "05 Mar 2025");
    }

    #[test]
    fn month_names_follow_the_locale() {
        assert_eq!(format_date_in("2024-12-31", Locale::de_DE), "31 Dez 2024");
        assert_eq!(format_date_in("2025-10-02", Locale::de_DE), "02 Okt 2025");
    }

    #[test]
    fn date_accepts_rfc3339() {
        assert_eq!(format_date_in("2025-07-14T09:30:00Z", Locale::en_GB), "14 Jul 2025");
    }

    #[test]
    fn date_returns_garbage_unchanged() {
        assert_eq!(format_date("next tuesday"), "next tuesday");
        assert_eq!(format_date_in("2025-02-30", Locale::en_US), "2025-02-30");
    }

    #[test]
    fn default_date_uses_process_locale() {
        assert_eq!(format_date("2025-03-05"), format_date_in("2025-03-05", process_locale()));
    }

    #[test]
    fn locale_tags_drop_encoding_and_modifier() {
        assert_eq!(locale_from_tag("de_DE.UTF-8"), Some(Locale::de_DE));
        assert_eq!(locale_from_tag("en-GB"), Some(Locale::en_GB));
        assert_eq!(locale_from_tag("de_DE@euro"), Some(Locale::de_DE));
        assert_eq!(locale_from_tag("C"), None);
        assert_eq!(locale_from_tag("xx_YY"), None);
    }

    #[test]
    fn midnight_hour_reads_as_twelve_am() {
        assert_eq!(format_time("00:15"), "12:15 AM");
    }

    #[test]
    fn afternoon_drops_to_twelve_hour_clock() {
        assert_eq!(format_time("13:05"), "1:05 PM");
        assert_eq!(format_time("12:00"), "12:00 PM");
        assert_eq!(format_time("09:45"), "9:45 AM");
    }

    #[test]
    fn time_ignores_seconds() {
        assert_eq!(format_time("23:59:59"), "11:59 PM");
    }

    #[test]
    fn time_returns_unparseable_input_unchanged() {
        assert_eq!(format_time("noon"), "noon");
        assert_eq!(format_time("25:00"), "25:00");
        assert_eq!(format_time("7"), "7");
    }

    #[test]
    fn ten_digit_phone_gets_country_code() {
        assert_eq!(format_phone("8091234567"), "+1-809-123-4567");
        assert_eq!(format_phone("(809) 123-4567"), "+1-809-123-4567");
    }

    #[test]
    fn eleven_digit_phone_with_leading_one() {
        assert_eq!(format_phone("18091234567"), "+1-809-123-4567");
        assert_eq!(format_phone("+1 809 123 4567"), "+1-809-123-4567");
    }

    #[test]
    fn other_phone_lengths_are_left_alone() {
        assert_eq!(format_phone("123"), "123");
        assert_eq!(format_phone("28091234567"), "28091234567");
        assert_eq!(format_phone(""), "");
    }
}
