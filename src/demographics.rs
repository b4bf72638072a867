use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::{safe_f64, text_or};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeGenderSegment {
    pub age: String,
    pub gender: String,
    pub impressions: f64,
    pub clicks: f64,
    pub spend: f64,
    pub conversions: f64,
    pub ctr: f64,
    pub cpm: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountrySegment {
    pub country: String,
    pub impressions: f64,
    pub clicks: f64,
    pub spend: f64,
    pub conversions: f64,
    pub cpm: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DemographicBreakdown {
    pub age_gender: Vec<AgeGenderSegment>,
    pub countries: Vec<CountrySegment>,
}

pub fn aggregate_demographics(records: &[Value]) -> DemographicBreakdown {
    let mut breakdown = DemographicBreakdown::default();

    for record in records {
        if record.get("age").is_some() && record.get("gender").is_some() {
            breakdown.age_gender.push(age_gender_segment(record));
        } else if record.get("country").is_some() {
            breakdown.countries.push(country_segment(record));
        }
    }

    breakdown
}

impl DemographicBreakdown {
    pub fn is_empty(&self) -> bool {
        self.age_gender.is_empty() && self.countries.is_empty()
    }

    pub fn impressions_by_age_gender(&self) -> BTreeMap<(String, String), f64> {
        let mut totals = BTreeMap::new();
        for segment in &self.age_gender {
            let key = (segment.age.clone(), segment.gender.clone());
            *totals.entry(key).or_insert(0.0) += segment.impressions;
        }
        totals
    }

    pub fn top_countries(&self, limit: usize) -> Vec<CountrySegment> {
        let mut totals: BTreeMap<String, CountrySegment> = BTreeMap::new();
        for segment in &self.countries {
            let entry = totals
                .entry(segment.country.clone())
                .or_insert_with(|| CountrySegment {
                    country: segment.country.clone(),
                    impressions: 0.0,
                    clicks: 0.0,
                    spend: 0.0,
                    conversions: 0.0,
                    cpm: 0.0,
                });
            entry.impressions += segment.impressions;
            entry.clicks += segment.clicks;
            entry.spend += segment.spend;
            entry.conversions += segment.conversions;
        }

        let mut grouped: Vec<CountrySegment> = totals
            .into_values()
            .map(|mut segment| {
                segment.cpm = segment.spend / segment.impressions.max(1.0) * 1000.0;
                segment
            })
            .collect();

        grouped.sort_by(|a, b| {
            b.impressions
                .partial_cmp(&a.impressions)
                .unwrap_or(Ordering::Equal)
        });
        grouped.truncate(limit);
        grouped
    }

    pub fn top_segment(&self) -> Option<&AgeGenderSegment> {
        let mut best: Option<&AgeGenderSegment> = None;
        for segment in &self.age_gender {
            let beats = match best {
                Some(current) => segment.ctr > current.ctr,
                None => true,
            };
            if beats {
                best = Some(segment);
            }
        }
        best
    }
}

fn age_gender_segment(record: &Value) -> AgeGenderSegment {
    let impressions = safe_f64(record.get("impressions"), 0.0);
    let clicks = safe_f64(record.get("clicks"), 0.0);
    let spend = safe_f64(record.get("spend"), 0.0);
    let conversions = safe_f64(record.get("conversions"), 0.0);

    AgeGenderSegment {
        age: text_or(record, "age", "N/A"),
        gender: text_or(record, "gender", "N/A"),
        impressions,
        clicks,
        spend,
        conversions,
        ctr: clicks / impressions.max(1.0) * 100.0,
        cpm: spend / impressions.max(1.0) * 1000.0,
    }
}

fn country_segment(record: &Value) -> CountrySegment {
    let impressions = safe_f64(record.get("impressions"), 0.0);
    let clicks = safe_f64(record.get("clicks"), 0.0);
    let spend = safe_f64(record.get("spend"), 0.0);
    let conversions = safe_f64(record.get("conversions"), 0.0);

    CountrySegment {
        country: text_or(record, "country", "N/A"),
        impressions,
        clicks,
        spend,
        conversions,
        cpm: spend / impressions.max(1.0) * 1000.0,
    }
}
