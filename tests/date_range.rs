use chrono::NaiveDate;

use ads_analyzer::meta_api::DateRange;

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn presets_parse() {
    assert_eq!(DateRange::parse("last_7d").unwrap(), DateRange::Last7d);
    assert_eq!(DateRange::parse(" last_30d ").unwrap(), DateRange::Last30d);
}

#[test]
fn custom_ranges_parse() {
    let range = DateRange::parse("2024-01-01_to_2024-02-01").unwrap();
    assert_eq!(
        range,
        DateRange::Custom {
            since: day(2024, 1, 1),
            until: day(2024, 2, 1),
        }
    );
}

#[test]
fn malformed_ranges_are_rejected() {
    let err = DateRange::parse("yesterday").unwrap_err();
    assert!(err.contains("invalid date range"));

    let err = DateRange::parse("2024-01-01..2024-02-01").unwrap_err();
    assert!(err.contains("invalid date range"));

    let err = DateRange::parse("2024-13-01_to_2024-02-01").unwrap_err();
    assert!(err.contains("invalid range start"));
}

#[test]
fn presets_resolve_against_the_reference_day() {
    let reference = day(2024, 6, 30);

    let (since, until) = DateRange::Last7d.resolve(reference).unwrap();
    assert_eq!(since, day(2024, 6, 23));
    assert_eq!(until, reference);

    let (since, until) = DateRange::Last30d.resolve(reference).unwrap();
    assert_eq!(since, day(2024, 5, 31));
    assert_eq!(until, reference);
}

#[test]
fn short_custom_ranges_pass_through() {
    let range = DateRange::Custom {
        since: day(2024, 1, 1),
        until: day(2024, 1, 31),
    };

    let (since, until) = range.resolve(day(2024, 6, 30)).unwrap();
    assert_eq!(since, day(2024, 1, 1));
    assert_eq!(until, day(2024, 1, 31));
}

#[test]
fn long_custom_ranges_are_clamped() {
    let range = DateRange::Custom {
        since: day(2020, 1, 1),
        until: day(2024, 1, 1),
    };

    let (since, until) = range.resolve(day(2024, 6, 30)).unwrap();
    assert_eq!(since, day(2020, 12, 17));
    assert_eq!(until, day(2024, 1, 1));
}

#[test]
fn inverted_ranges_fail_to_resolve() {
    let range = DateRange::Custom {
        since: day(2024, 2, 1),
        until: day(2024, 1, 1),
    };

    let err = range.resolve(day(2024, 6, 30)).unwrap_err();
    assert!(err.to_string().contains("starts after it ends"));
}
