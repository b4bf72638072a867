pub mod config;
pub mod demographics;
pub mod estimate;
pub mod meta_api;
pub mod recommend;
pub mod scraper;
pub mod series;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::config::AnalyzerConfig;
use crate::demographics::{aggregate_demographics, DemographicBreakdown};
use crate::recommend::{build_strategic_analysis, evaluate_rules, Recommendation, StrategicAnalysis};
use crate::series::{build_daily_series, TemporalSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Facebook,
    Instagram,
}

impl Platform {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "facebook" | "fb" => Some(Platform::Facebook),
            "instagram" | "ig" => Some(Platform::Instagram),
            _ => None,
        }
    }

    pub fn from_url(url: &str) -> Self {
        if url.to_lowercase().contains("facebook.com") {
            Platform::Facebook
        } else {
            Platform::Instagram
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdType {
    Video,
    Carousel,
    Stories,
    Image,
}

impl AdType {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "video" | "vid" => Some(AdType::Video),
            "carousel" => Some(AdType::Carousel),
            "story" | "stories" => Some(AdType::Stories),
            "image" | "photo" | "pic" => Some(AdType::Image),
            _ => None,
        }
    }

    pub fn classify(page_text: &str) -> Self {
        let lowered = page_text.to_lowercase();
        if lowered.contains("video") {
            AdType::Video
        } else if lowered.contains("carousel") {
            AdType::Carousel
        } else if lowered.contains("story") {
            AdType::Stories
        } else {
            AdType::Image
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AdType::Video => "Video",
            AdType::Carousel => "Carousel",
            AdType::Stories => "Stories",
            AdType::Image => "Image",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdMetadata {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub platform: Platform,
    pub ad_type: AdType,
    pub url: String,
}

impl AdMetadata {
    pub fn fallback(url: &str) -> Self {
        Self {
            title: "N/A".to_string(),
            description: "N/A".to_string(),
            image_url: String::new(),
            platform: Platform::from_url(url),
            ad_type: AdType::classify(url),
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizedInsight {
    pub impressions: f64,
    pub reach: f64,
    pub frequency: f64,
    pub spend: f64,
    pub cpm: f64,
    pub cpp: f64,
    pub ctr: f64,
    pub clicks: f64,
    pub unique_clicks: f64,
    pub conversions: f64,
    pub cost_per_conversion: f64,
    pub cost_per_unique_click: f64,
    pub actions: BTreeMap<String, f64>,
    pub action_values: BTreeMap<String, f64>,
}

impl NormalizedInsight {
    pub fn ctr_percent(&self) -> f64 {
        self.ctr * 100.0
    }

    pub fn action(&self, action_type: &str) -> f64 {
        self.actions.get(action_type).copied().unwrap_or(0.0)
    }

    pub fn action_value(&self, action_type: &str) -> f64 {
        self.action_values.get(action_type).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct AdAnalysis {
    pub insight: NormalizedInsight,
    pub series: Option<TemporalSeries>,
    pub demographics: DemographicBreakdown,
    pub recommendations: Vec<Recommendation>,
    pub strategic: StrategicAnalysis,
}

pub fn normalize_insight(record: Option<&Value>) -> Option<NormalizedInsight> {
    let record = record?;
    record.as_object()?;

    Some(NormalizedInsight {
        impressions: scalar_field(record, "impressions"),
        reach: scalar_field(record, "reach"),
        frequency: scalar_field(record, "frequency"),
        spend: scalar_field(record, "spend"),
        cpm: scalar_field(record, "cpm"),
        cpp: scalar_field(record, "cpp"),
        ctr: scalar_field(record, "ctr"),
        clicks: scalar_field(record, "clicks"),
        unique_clicks: scalar_field(record, "unique_clicks"),
        conversions: scalar_field(record, "conversions"),
        cost_per_conversion: scalar_field(record, "cost_per_conversion"),
        cost_per_unique_click: scalar_field(record, "cost_per_unique_click"),
        actions: sum_action_entries(record.get("actions")),
        action_values: sum_action_entries(record.get("action_values")),
    })
}

pub fn analyze(
    insight: Option<&Value>,
    daily: &[Value],
    breakdowns: &[Value],
) -> Option<AdAnalysis> {
    let config = load_analyzer_config();
    analyze_with_config(insight, daily, breakdowns, &config)
}

pub fn analyze_with_config(
    insight: Option<&Value>,
    daily: &[Value],
    breakdowns: &[Value],
    config: &AnalyzerConfig,
) -> Option<AdAnalysis> {
    let insight = normalize_insight(insight)?;
    let series = build_daily_series(daily);
    let demographics = aggregate_demographics(breakdowns);
    let recommendations = evaluate_rules(&insight, series.as_ref(), &config.rules);
    let strategic = build_strategic_analysis(&insight, series.as_ref(), &demographics, config);

    Some(AdAnalysis {
        insight,
        series,
        demographics,
        recommendations,
        strategic,
    })
}

fn load_analyzer_config() -> AnalyzerConfig {
    AnalyzerConfig::load(None)
        .map(|(config, _)| config)
        .unwrap_or_default()
}

fn scalar_field(record: &Value, key: &str) -> f64 {
    safe_f64(record.get(key), 0.0).max(0.0)
}

fn sum_action_entries(list: Option<&Value>) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    let entries = match list.and_then(Value::as_array) {
        Some(entries) => entries,
        None => return totals,
    };

    for entry in entries {
        let action_type = match entry.get("action_type").and_then(Value::as_str) {
            Some(value) if !value.trim().is_empty() => value.trim(),
            _ => continue,
        };
        let value = safe_f64(entry.get("value"), 0.0).max(0.0);
        *totals.entry(action_type.to_string()).or_insert(0.0) += value;
    }

    totals
}

pub fn safe_f64(value: Option<&Value>, default: f64) -> f64 {
    match value {
        Some(Value::Bool(flag)) => {
            if *flag {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Number(number)) => match number.as_f64() {
            Some(parsed) if parsed.is_finite() => parsed,
            _ => default,
        },
        Some(Value::String(text)) => match text.trim().parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => parsed,
            _ => default,
        },
        _ => default,
    }
}

pub fn safe_i64(value: Option<&Value>, default: i64) -> i64 {
    safe_f64(value, default as f64).trunc() as i64
}

pub fn text_or(record: &Value, key: &str, default: &str) -> String {
    match record.get(key) {
        Some(Value::String(text)) if !text.trim().is_empty() => text.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        _ => default.to_string(),
    }
}

pub fn format_number(value: f64) -> String {
    group_digits(value.round().max(0.0) as i64)
}

pub fn format_money(value: f64) -> String {
    let cents = (value.max(0.0) * 100.0).round() as i64;
    format!("${}.{:02}", group_digits(cents / 100), cents % 100)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}

fn group_digits(value: i64) -> String {
    let mut chars: Vec<char> = value.to_string().chars().collect();
    let mut result = String::new();
    let mut count = 0usize;

    while let Some(ch) = chars.pop() {
        if ch.is_ascii_digit() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            count += 1;
        }
        result.push(ch);
    }

    result.chars().rev().collect()
}
