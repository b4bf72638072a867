use serde::{Deserialize, Serialize};

use crate::config::RuleThresholds;
use crate::series::TemporalSeries;
use crate::NormalizedInsight;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Alert,
    Warning,
    Ok,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Alert => "alert",
            Severity::Warning => "warning",
            Severity::Ok => "ok",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub actions: Vec<String>,
}

pub fn evaluate_rules(
    insight: &NormalizedInsight,
    series: Option<&TemporalSeries>,
    thresholds: &RuleThresholds,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    let ctr = insight.ctr_percent();

    if ctr < thresholds.low_ctr {
        recommendations.push(Recommendation {
            severity: Severity::Alert,
            title: "Low CTR".to_string(),
            message: format!(
                "CTR of {:.2}% is below the recommended range of 1-2%",
                ctr
            ),
            actions: vec![
                "Test different images or thumbnails".to_string(),
                "Rewrite the primary text and keep it under 125 characters".to_string(),
                "Make the call to action more prominent".to_string(),
                "Try another headline angle".to_string(),
            ],
        });
    }

    if ctr > thresholds.high_ctr {
        recommendations.push(Recommendation {
            severity: Severity::Ok,
            title: "High CTR".to_string(),
            message: format!("Excellent CTR of {:.2}%", ctr),
            actions: vec![
                "Raise the budget to scale this performance".to_string(),
                "Replicate the creative strategy for similar audiences".to_string(),
                "Document what makes this ad resonate".to_string(),
            ],
        });
    }

    if insight.cost_per_conversion > thresholds.max_cost_per_conversion {
        recommendations.push(Recommendation {
            severity: Severity::Alert,
            title: "High cost per conversion".to_string(),
            message: format!(
                "${:.2} per conversion is above the acceptable ceiling",
                insight.cost_per_conversion
            ),
            actions: vec![
                "Review the landing page, the conversion rate may be the bottleneck".to_string(),
                "Narrow targeting toward more qualified audiences".to_string(),
                "Test a different campaign objective".to_string(),
                "Audit the quality of the incoming traffic".to_string(),
            ],
        });
    }

    if let Some(series) = series {
        let frequency = series.mean_frequency();
        if frequency > thresholds.max_frequency {
            recommendations.push(Recommendation {
                severity: Severity::Warning,
                title: "High frequency".to_string(),
                message: format!(
                    "An average of {:.1} impressions per user risks ad fatigue",
                    frequency
                ),
                actions: vec![
                    "Lower the budget or pause the ad for a few days".to_string(),
                    "Refresh the creatives to avoid saturation".to_string(),
                    "Expand the target audience".to_string(),
                ],
            });
        }
    }

    recommendations
}
