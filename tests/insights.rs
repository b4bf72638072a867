use serde_json::{json, Value};

use ads_analyzer::{
    format_float, format_money, format_number, format_percent, normalize_insight, safe_f64,
    safe_i64, text_or,
};

fn insight_record() -> Value {
    json!({
        "impressions": "12000",
        "reach": 9000,
        "frequency": "1.33",
        "spend": "240.50",
        "cpm": 20.04,
        "ctr": "0.0185",
        "clicks": 222,
        "unique_clicks": "180",
        "conversions": 14,
        "cost_per_conversion": "17.18",
        "actions": [
            { "action_type": "purchase", "value": "9" },
            { "action_type": "purchase", "value": 5 },
            { "action_type": "lead", "value": "3" }
        ],
        "action_values": [
            { "action_type": "purchase", "value": "420.0" }
        ]
    })
}

#[test]
fn safe_f64_never_fails_on_malformed_input() {
    assert!((safe_f64(None, 0.0) - 0.0).abs() < 1e-6);
    assert!((safe_f64(Some(&json!(null)), 0.0) - 0.0).abs() < 1e-6);
    assert!((safe_f64(Some(&json!("")), 0.0) - 0.0).abs() < 1e-6);
    assert!((safe_f64(Some(&json!("not a number")), 2.5) - 2.5).abs() < 1e-6);
    assert!((safe_f64(Some(&json!([1, 2])), 1.0) - 1.0).abs() < 1e-6);
    assert!((safe_f64(Some(&json!({"nested": 1})), 1.0) - 1.0).abs() < 1e-6);
}

#[test]
fn safe_f64_parses_numbers_strings_and_bools() {
    assert!((safe_f64(Some(&json!(12.5)), 0.0) - 12.5).abs() < 1e-6);
    assert!((safe_f64(Some(&json!("12.5")), 0.0) - 12.5).abs() < 1e-6);
    assert!((safe_f64(Some(&json!("  7 ")), 0.0) - 7.0).abs() < 1e-6);
    assert!((safe_f64(Some(&json!(true)), 0.0) - 1.0).abs() < 1e-6);
    assert!((safe_f64(Some(&json!(false)), 3.0) - 0.0).abs() < 1e-6);
}

#[test]
fn safe_i64_truncates_toward_zero() {
    assert_eq!(safe_i64(Some(&json!("7.9")), 0), 7);
    assert_eq!(safe_i64(Some(&json!(-3.2)), 0), -3);
    assert_eq!(safe_i64(Some(&json!("")), 4), 4);
    assert_eq!(safe_i64(None, 4), 4);
}

#[test]
fn text_or_trims_and_falls_back() {
    let record = json!({
        "name": "  Summer push  ",
        "id": 4215,
        "status": ""
    });

    assert_eq!(text_or(&record, "name", "Unnamed"), "Summer push");
    assert_eq!(text_or(&record, "id", "N/A"), "4215");
    assert_eq!(text_or(&record, "status", "N/A"), "N/A");
    assert_eq!(text_or(&record, "objective", "N/A"), "N/A");
}

#[test]
fn normalize_returns_none_without_a_record() {
    assert!(normalize_insight(None).is_none());
    assert!(normalize_insight(Some(&json!("plain text"))).is_none());
    assert!(normalize_insight(Some(&json!([1, 2, 3]))).is_none());
}

#[test]
fn normalize_flattens_scalar_fields() {
    let record = insight_record();
    let insight = normalize_insight(Some(&record)).unwrap();

    assert!((insight.impressions - 12000.0).abs() < 1e-6);
    assert!((insight.reach - 9000.0).abs() < 1e-6);
    assert!((insight.frequency - 1.33).abs() < 1e-6);
    assert!((insight.spend - 240.5).abs() < 1e-6);
    assert!((insight.ctr - 0.0185).abs() < 1e-6);
    assert!((insight.clicks - 222.0).abs() < 1e-6);
    assert!((insight.cost_per_conversion - 17.18).abs() < 1e-6);
}

#[test]
fn normalize_sums_entries_sharing_an_action_type() {
    let record = insight_record();
    let insight = normalize_insight(Some(&record)).unwrap();

    assert_eq!(insight.actions.len(), 2);
    assert!((insight.action("purchase") - 14.0).abs() < 1e-6);
    assert!((insight.action("lead") - 3.0).abs() < 1e-6);
    assert!((insight.action_value("purchase") - 420.0).abs() < 1e-6);
    assert!((insight.action("missing") - 0.0).abs() < 1e-6);
}

#[test]
fn normalize_skips_entries_without_an_action_type() {
    let record = json!({
        "impressions": 10,
        "actions": [
            { "value": 5 },
            { "action_type": "", "value": 2 },
            { "action_type": "  ", "value": 2 },
            { "action_type": "purchase", "value": 1 }
        ]
    });
    let insight = normalize_insight(Some(&record)).unwrap();

    assert_eq!(insight.actions.len(), 1);
    assert!((insight.action("purchase") - 1.0).abs() < 1e-6);
}

#[test]
fn normalize_clamps_negative_and_malformed_scalars() {
    let record = json!({
        "impressions": "-50",
        "spend": "garbage",
        "ctr": [0.1],
        "clicks": null
    });
    let insight = normalize_insight(Some(&record)).unwrap();

    assert!((insight.impressions - 0.0).abs() < 1e-6);
    assert!((insight.spend - 0.0).abs() < 1e-6);
    assert!((insight.ctr - 0.0).abs() < 1e-6);
    assert!((insight.clicks - 0.0).abs() < 1e-6);
}

#[test]
fn ctr_percent_scales_the_stored_fraction() {
    let record = json!({ "ctr": "0.0123" });
    let insight = normalize_insight(Some(&record)).unwrap();

    assert!((insight.ctr_percent() - 1.23).abs() < 1e-6);
}

#[test]
fn format_helpers_group_and_round() {
    assert_eq!(format_number(1234567.0), "1,234,567");
    assert_eq!(format_number(999.4), "999");
    assert_eq!(format_number(-5.0), "0");
    assert_eq!(format_money(1234.5), "$1,234.50");
    assert_eq!(format_money(0.994), "$0.99");
    assert_eq!(format_percent(2.456), "2.46%");
    assert_eq!(format_float(1.26, 1), "1.3");
}
