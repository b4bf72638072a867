use serde_json::{json, Value};

use ads_analyzer::series::build_daily_series;

fn day(date: &str) -> Value {
    json!({
        "date_start": date,
        "impressions": 1000,
        "reach": 800,
        "spend": 50.0,
        "clicks": 20,
        "ctr": 0.02,
        "frequency": 1.25,
        "cpm": 50.0,
        "unique_clicks": 18,
        "actions": [{ "action_type": "conversion", "value": 4 }]
    })
}

#[test]
fn rows_are_sorted_by_date() {
    let records = vec![day("2024-01-03"), day("2024-01-01"), day("2024-01-02")];
    let series = build_daily_series(&records).unwrap();

    let dates: Vec<String> = series.rows.iter().map(|row| row.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
}

#[test]
fn unparseable_dates_are_dropped() {
    let mut bad = day("2024-01-01");
    bad["date_start"] = json!("January 1st");
    let mut missing = day("2024-01-02");
    missing.as_object_mut().unwrap().remove("date_start");

    let records = vec![bad, missing, day("2024-01-03")];
    let series = build_daily_series(&records).unwrap();

    assert_eq!(series.len(), 1);
    assert_eq!(series.rows[0].date.to_string(), "2024-01-03");
}

#[test]
fn empty_or_unusable_input_yields_none() {
    assert!(build_daily_series(&[]).is_none());

    let mut bad = day("2024-01-01");
    bad["date_start"] = json!(20240101);
    assert!(build_daily_series(&[bad]).is_none());
}

#[test]
fn duplicate_dates_keep_the_first_row() {
    let first = day("2024-01-01");
    let mut second = day("2024-01-01");
    second["impressions"] = json!(9999);

    let series = build_daily_series(&[first, second]).unwrap();

    assert_eq!(series.len(), 1);
    assert!((series.rows[0].impressions - 1000.0).abs() < 1e-6);
}

#[test]
fn derived_metrics_follow_the_raw_fields() {
    let series = build_daily_series(&[day("2024-01-01")]).unwrap();
    let row = &series.rows[0];

    assert!((row.ctr - 2.0).abs() < 1e-6);
    assert!((row.conversions - 4.0).abs() < 1e-6);
    assert!((row.cpc - 2.5).abs() < 1e-6);
    assert!((row.conversion_rate - 20.0).abs() < 1e-6);
    assert!((row.cost_per_conversion - 12.5).abs() < 1e-6);
}

#[test]
fn zero_denominators_yield_zero_derived_metrics() {
    let mut record = day("2024-01-01");
    record["clicks"] = json!(0);
    record["actions"] = json!([]);

    let series = build_daily_series(&[record]).unwrap();
    let row = &series.rows[0];

    assert!((row.cpc - 0.0).abs() < 1e-6);
    assert!((row.conversion_rate - 0.0).abs() < 1e-6);
    assert!((row.conversions - 0.0).abs() < 1e-6);
    assert!((row.cost_per_conversion - 0.0).abs() < 1e-6);
}

#[test]
fn conversions_count_only_conversion_actions() {
    let mut record = day("2024-01-01");
    record["conversions"] = json!(99);
    record["actions"] = json!([
        { "action_type": "conversion", "value": 4 },
        { "action_type": "conversion", "value": "2" },
        { "action_type": "purchase", "value": 9 }
    ]);

    let series = build_daily_series(&[record]).unwrap();
    assert!((series.rows[0].conversions - 6.0).abs() < 1e-6);
}

#[test]
fn mean_frequency_averages_every_row() {
    let mut low = day("2024-01-01");
    low["frequency"] = json!(1.0);
    let mut mid = day("2024-01-02");
    mid["frequency"] = json!(2.0);
    let mut high = day("2024-01-03");
    high["frequency"] = json!(3.0);

    let series = build_daily_series(&[low, mid, high]).unwrap();
    assert!((series.mean_frequency() - 2.0).abs() < 1e-6);
}

#[test]
fn growth_rates_require_two_rows() {
    let series = build_daily_series(&[day("2024-01-01")]).unwrap();
    assert!(series.growth_rates().is_none());
}

#[test]
fn growth_rates_average_day_over_day_changes() {
    let mut first = day("2024-01-01");
    first["impressions"] = json!(100);
    let mut second = day("2024-01-02");
    second["impressions"] = json!(110);
    let mut third = day("2024-01-03");
    third["impressions"] = json!(121);

    let series = build_daily_series(&[first, second, third]).unwrap();
    let growth = series.growth_rates().unwrap();

    assert!((growth.impressions - 10.0).abs() < 1e-6);
    assert!((growth.ctr - 0.0).abs() < 1e-6);
    assert!((growth.conversions - 0.0).abs() < 1e-6);
}

#[test]
fn growth_skips_changes_from_a_zero_baseline() {
    let mut first = day("2024-01-01");
    first["impressions"] = json!(0);
    let mut second = day("2024-01-02");
    second["impressions"] = json!(50);
    let mut third = day("2024-01-03");
    third["impressions"] = json!(100);

    let series = build_daily_series(&[first, second, third]).unwrap();
    let growth = series.growth_rates().unwrap();

    assert!((growth.impressions - 100.0).abs() < 1e-6);
}

#[test]
fn csv_export_has_a_header_and_one_line_per_day() {
    let series = build_daily_series(&[day("2024-01-01"), day("2024-01-02")]).unwrap();
    let csv = series.to_csv();

    assert!(csv.starts_with("date_start,impressions,reach,spend,clicks,ctr,frequency,cpm"));
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("2024-01-01"));
    assert!(csv.contains("2024-01-02"));
}
