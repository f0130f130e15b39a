use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Patterns tried in order when reading a license date. Each pattern is tried
/// as a date-time first and then as a plain date.
pub const DEFAULT_DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%b-%Y",
];

pub fn default_date_formats() -> Vec<String> {
    DEFAULT_DATE_FORMATS
        .iter()
        .map(|fmt| fmt.to_string())
        .collect()
}

pub fn parse_license_date(raw: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.naive_local())
}

pub fn parse_cutoff_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

pub fn format_license_date(value: NaiveDateTime) -> String {
    if value.hour() == 0 && value.minute() == 0 && value.second() == 0 {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{default_date_formats, format_license_date, parse_cutoff_date, parse_license_date};
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_license_date_accepts_supported_formats() {
        let formats = default_date_formats();
        let expected = ymd(2024, 3, 5).and_hms_opt(0, 0, 0).unwrap();
        for raw in [
            "2024-03-05",
            " 2024-03-05 ",
            "2024/03/05",
            "03/05/2024",
            "05-Mar-2024",
            "2024-03-05 00:00:00",
            "2024-03-05T00:00",
        ] {
            assert_eq!(parse_license_date(raw, &formats), Some(expected), "{raw}");
        }
    }

    #[test]
    fn parse_license_date_keeps_time_of_day() {
        let formats = default_date_formats();
        let parsed = parse_license_date("2024-03-05 13:45:10.250", &formats).unwrap();
        assert_eq!(
            parsed,
            ymd(2024, 3, 5).and_hms_milli_opt(13, 45, 10, 250).unwrap()
        );
        assert_eq!(format_license_date(parsed), "2024-03-05 13:45:10");
    }

    #[test]
    fn parse_license_date_accepts_rfc3339() {
        let formats = default_date_formats();
        let parsed = parse_license_date("2024-03-05T08:30:00+04:00", &formats).unwrap();
        assert_eq!(format_license_date(parsed), "2024-03-05 08:30:00");
    }

    #[test]
    fn parse_license_date_rejects_garbage() {
        let formats = default_date_formats();
        for raw in ["", "   ", "not a date", "2024-13-01", "31/12/2024"] {
            assert_eq!(parse_license_date(raw, &formats), None, "{raw}");
        }
    }

    #[test]
    fn parse_license_date_uses_custom_formats() {
        let formats = vec!["%d.%m.%Y".to_string()];
        assert_eq!(
            parse_license_date("31.12.2024", &formats).map(|dt| dt.date()),
            Some(ymd(2024, 12, 31))
        );
        assert_eq!(parse_license_date("2024-12-31", &formats), None);
    }

    #[test]
    fn parse_cutoff_date_expects_iso() {
        assert_eq!(parse_cutoff_date("2025-01-31"), Some(ymd(2025, 1, 31)));
        assert_eq!(parse_cutoff_date("31/01/2025"), None);
    }

    #[test]
    fn format_license_date_drops_midnight() {
        let value = ymd(2024, 1, 2).and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(format_license_date(value), "2024-01-02");
    }
}
