use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::safe_f64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMetricRow {
    pub date: NaiveDate,
    pub impressions: f64,
    pub reach: f64,
    pub spend: f64,
    pub clicks: f64,
    pub ctr: f64,
    pub frequency: f64,
    pub cpm: f64,
    pub conversions: f64,
    pub cost_per_conversion: f64,
    pub unique_clicks: f64,
    pub cpc: f64,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalSeries {
    pub rows: Vec<DailyMetricRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthRates {
    pub impressions: f64,
    pub ctr: f64,
    pub conversions: f64,
}

pub fn build_daily_series(records: &[Value]) -> Option<TemporalSeries> {
    let mut rows: Vec<DailyMetricRow> = records.iter().filter_map(daily_row).collect();
    if rows.is_empty() {
        return None;
    }

    rows.sort_by_key(|row| row.date);
    rows.dedup_by_key(|row| row.date);

    Some(TemporalSeries { rows })
}

impl TemporalSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn mean_frequency(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        let total: f64 = self.rows.iter().map(|row| row.frequency).sum();
        total / self.rows.len() as f64
    }

    pub fn growth_rates(&self) -> Option<GrowthRates> {
        if self.rows.len() < 2 {
            return None;
        }
        let start = self.rows.len().saturating_sub(7);
        let window = &self.rows[start..];

        Some(GrowthRates {
            impressions: mean_pct_change(window, |row| row.impressions),
            ctr: mean_pct_change(window, |row| row.ctr),
            conversions: mean_pct_change(window, |row| row.conversions),
        })
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::from(
            "date_start,impressions,reach,spend,clicks,ctr,frequency,cpm,conversions,cost_per_conversion,unique_clicks,cpc,conversion_rate\n",
        );
        for row in &self.rows {
            out.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
                row.date,
                row.impressions,
                row.reach,
                row.spend,
                row.clicks,
                row.ctr,
                row.frequency,
                row.cpm,
                row.conversions,
                row.cost_per_conversion,
                row.unique_clicks,
                row.cpc,
                row.conversion_rate
            ));
        }
        out
    }
}

fn daily_row(record: &Value) -> Option<DailyMetricRow> {
    let date_text = record.get("date_start").and_then(Value::as_str)?;
    let date = NaiveDate::parse_from_str(date_text.trim(), "%Y-%m-%d").ok()?;

    let impressions = safe_f64(record.get("impressions"), 0.0);
    let reach = safe_f64(record.get("reach"), 0.0);
    let spend = safe_f64(record.get("spend"), 0.0);
    let clicks = safe_f64(record.get("clicks"), 0.0);
    let ctr = safe_f64(record.get("ctr"), 0.0) * 100.0;
    let frequency = safe_f64(record.get("frequency"), 0.0);
    let cpm = safe_f64(record.get("cpm"), 0.0);
    let unique_clicks = safe_f64(record.get("unique_clicks"), 0.0);
    let conversions = conversion_actions_total(record.get("actions"));

    let cpc = if clicks > 0.0 { spend / clicks } else { 0.0 };
    let conversion_rate = if clicks > 0.0 {
        conversions / clicks * 100.0
    } else {
        0.0
    };
    let cost_per_conversion = if conversions > 0.0 {
        spend / conversions
    } else {
        0.0
    };

    Some(DailyMetricRow {
        date,
        impressions,
        reach,
        spend,
        clicks,
        ctr,
        frequency,
        cpm,
        conversions,
        cost_per_conversion,
        unique_clicks,
        cpc,
        conversion_rate,
    })
}

fn conversion_actions_total(list: Option<&Value>) -> f64 {
    let entries = match list.and_then(Value::as_array) {
        Some(entries) => entries,
        None => return 0.0,
    };

    entries
        .iter()
        .filter(|entry| entry.get("action_type").and_then(Value::as_str) == Some("conversion"))
        .map(|entry| safe_f64(entry.get("value"), 0.0))
        .sum()
}

fn mean_pct_change<F>(rows: &[DailyMetricRow], metric: F) -> f64
where
    F: Fn(&DailyMetricRow) -> f64,
{
    let mut changes = Vec::new();
    for pair in rows.windows(2) {
        let previous = metric(&pair[0]);
        if previous > 0.0 {
            changes.push((metric(&pair[1]) - previous) / previous * 100.0);
        }
    }

    if changes.is_empty() {
        return 0.0;
    }
    changes.iter().sum::<f64>() / changes.len() as f64
}
