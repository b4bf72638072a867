use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfig;
use crate::demographics::DemographicBreakdown;
use crate::series::{GrowthRates, TemporalSeries};
use crate::NormalizedInsight;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Optimization,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Optimization => "Optimization",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionPlanEntry {
    pub priority: Priority,
    pub action: String,
    pub tasks: Vec<String>,
    pub timeframe: String,
    pub target: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DiagnosticMetrics {
    pub ctr: f64,
    pub conversion_rate: f64,
    pub cost_per_conversion: f64,
    pub cpm: f64,
    pub cpc: f64,
}

impl DiagnosticMetrics {
    pub fn from_insight(insight: &NormalizedInsight) -> Self {
        let impressions = insight.impressions;
        let clicks = insight.clicks;
        let conversions = insight.conversions;
        let spend = insight.spend;

        Self {
            ctr: if impressions > 0.0 { insight.ctr * 100.0 } else { 0.0 },
            conversion_rate: if clicks > 0.0 {
                conversions / clicks * 100.0
            } else {
                0.0
            },
            cost_per_conversion: if conversions > 0.0 { spend / conversions } else { 0.0 },
            cpm: if impressions > 0.0 {
                spend / impressions * 1000.0
            } else {
                0.0
            },
            cpc: if clicks > 0.0 { spend / clicks } else { 0.0 },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProjectedScenario {
    pub impressions: f64,
    pub conversions: f64,
    pub spend: f64,
    pub roi_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projections {
    pub conservative: ProjectedScenario,
    pub optimistic: ProjectedScenario,
    pub pessimistic: ProjectedScenario,
    pub growth: Option<GrowthRates>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategicAnalysis {
    pub diagnostics: DiagnosticMetrics,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub action_plan: Vec<ActionPlanEntry>,
    pub projections: Option<Projections>,
}

pub fn build_strategic_analysis(
    insight: &NormalizedInsight,
    series: Option<&TemporalSeries>,
    demographics: &DemographicBreakdown,
    config: &AnalyzerConfig,
) -> StrategicAnalysis {
    let benchmarks = &config.benchmarks;
    let diagnostics = DiagnosticMetrics::from_insight(insight);
    let mean_frequency = series.map(TemporalSeries::mean_frequency).unwrap_or(0.0);

    let mut strengths = Vec::new();
    if diagnostics.ctr > benchmarks.ctr * 1.2 {
        strengths.push(format!(
            "Excellent CTR ({:.2}%), {:.1}x the {:.1}% benchmark",
            diagnostics.ctr,
            diagnostics.ctr / benchmarks.ctr,
            benchmarks.ctr
        ));
    }
    if diagnostics.conversion_rate > benchmarks.conversion_rate * 1.2 {
        strengths.push(format!(
            "High conversion rate ({:.2}%) points to an efficient funnel",
            diagnostics.conversion_rate
        ));
    }
    if diagnostics.cost_per_conversion < benchmarks.cost_per_conversion * 0.8 {
        strengths.push(format!(
            "Low cost per conversion (${:.2}) leaves room to scale",
            diagnostics.cost_per_conversion
        ));
    }
    if diagnostics.cpm < benchmarks.cpm * 0.8 {
        strengths.push(format!(
            "Cheap impressions (CPM ${:.2}) against a ${:.2} benchmark",
            diagnostics.cpm, benchmarks.cpm
        ));
    }
    if diagnostics.cpc < benchmarks.cpc * 0.8 {
        strengths.push(format!(
            "Cheap clicks (CPC ${:.2}) against a ${:.2} benchmark",
            diagnostics.cpc, benchmarks.cpc
        ));
    }
    if let Some(segment) = demographics.top_segment() {
        if segment.ctr > benchmarks.ctr * 1.5 {
            strengths.push(format!(
                "Standout segment: {} {} with a {:.2}% CTR",
                segment.gender, segment.age, segment.ctr
            ));
        }
    }

    let mut improvements = Vec::new();
    if diagnostics.ctr < benchmarks.ctr * 0.8 {
        improvements.push(format!(
            "Low CTR ({:.2}%), test new creatives and calls to action",
            diagnostics.ctr
        ));
    }
    if diagnostics.conversion_rate < benchmarks.conversion_rate * 0.8 {
        improvements.push(format!(
            "Low conversion rate ({:.2}%), optimize the landing page and checkout flow",
            diagnostics.conversion_rate
        ));
    }
    if diagnostics.cost_per_conversion > benchmarks.cost_per_conversion * 1.2 {
        improvements.push(format!(
            "High cost per conversion (${:.2}), refine audience targeting",
            diagnostics.cost_per_conversion
        ));
    }
    if diagnostics.cpm > benchmarks.cpm * 1.2 {
        improvements.push(format!(
            "Expensive impressions (CPM ${:.2}), revisit placements and audience overlap",
            diagnostics.cpm
        ));
    }
    if diagnostics.cpc > benchmarks.cpc * 1.2 {
        improvements.push(format!(
            "Expensive clicks (CPC ${:.2}), tighten the bidding strategy",
            diagnostics.cpc
        ));
    }
    if mean_frequency > config.rules.max_frequency {
        improvements.push(format!(
            "High frequency ({:.1}x) risks saturation, rotate creatives or widen the audience",
            mean_frequency
        ));
    }

    let mut action_plan = Vec::new();
    if diagnostics.ctr < benchmarks.ctr * 0.8 {
        action_plan.push(ActionPlanEntry {
            priority: Priority::High,
            action: "Improve CTR".to_string(),
            tasks: vec![
                "Produce 3 image or thumbnail variations".to_string(),
                "Test shorter primary texts, 125 characters at most".to_string(),
                "Move the call to action above the fold".to_string(),
            ],
            timeframe: "3 days".to_string(),
            target: format!("Lift CTR to at least {:.1}%", benchmarks.ctr),
        });
    }
    if diagnostics.conversion_rate < benchmarks.conversion_rate * 0.8 {
        action_plan.push(ActionPlanEntry {
            priority: Priority::High,
            action: "Improve conversion rate".to_string(),
            tasks: vec![
                "Cut landing page load time below 3 seconds".to_string(),
                "Simplify the conversion form".to_string(),
                "Align the page headline with the ad promise".to_string(),
            ],
            timeframe: "5 days".to_string(),
            target: format!(
                "Lift conversion rate to at least {:.1}%",
                benchmarks.conversion_rate
            ),
        });
    }
    if mean_frequency > config.rules.max_frequency {
        action_plan.push(ActionPlanEntry {
            priority: Priority::Medium,
            action: "Reduce saturation".to_string(),
            tasks: vec![
                "Swap in fresh creatives".to_string(),
                "Expand the target audience".to_string(),
                "Spread delivery across more hours of the day".to_string(),
            ],
            timeframe: "2 days".to_string(),
            target: format!(
                "Bring frequency down to {:.1}x or less",
                config.rules.max_frequency
            ),
        });
    }
    if action_plan.is_empty() {
        action_plan.push(ActionPlanEntry {
            priority: Priority::Optimization,
            action: "Scale what works".to_string(),
            tasks: vec![
                "Raise the budget 20% on the best performers".to_string(),
                "Build lookalike audiences from recent converters".to_string(),
                "Test new creative formats against the current winner".to_string(),
            ],
            timeframe: "Ongoing".to_string(),
            target: "Hold ROAS at 2.0 or better while scaling".to_string(),
        });
    }

    let projections = series.map(|series| Projections {
        conservative: project_scenario(insight, 0.9, 0.9, 0.9),
        optimistic: project_scenario(insight, 1.3, 1.5, 1.5),
        pessimistic: project_scenario(insight, 0.7, 0.6, 0.7),
        growth: series.growth_rates(),
    });

    StrategicAnalysis {
        diagnostics,
        strengths,
        improvements,
        action_plan,
        projections,
    }
}

pub fn objective_guidance(objective: &str) -> Vec<String> {
    let lowered = objective.to_lowercase();
    let tips: [&str; 3] = if lowered.contains("conversion") || lowered.contains("sales") {
        [
            "Test different calls to action on the landing page",
            "Track secondary conversion events to widen the optimization signal",
            "Shift delivery toward audiences that resemble past converters",
        ]
    } else if lowered.contains("awareness") || lowered.contains("reach") {
        [
            "Lean on video formats to extend reach",
            "Enable audience expansion and let delivery explore",
            "Watch frequency closely to avoid early saturation",
        ]
    } else {
        [
            "Run at least 3 creative variations side by side",
            "Experiment with different delivery schedules",
            "Adjust bids based on per-segment performance",
        ]
    };
    tips.iter().map(|tip| (*tip).to_string()).collect()
}

fn project_scenario(
    insight: &NormalizedInsight,
    impressions_factor: f64,
    conversions_factor: f64,
    spend_factor: f64,
) -> ProjectedScenario {
    let impressions = insight.impressions * impressions_factor;
    let conversions = insight.conversions * conversions_factor;
    let spend = insight.spend * spend_factor;
    ProjectedScenario {
        impressions,
        conversions,
        spend,
        roi_percent: conversions * 100.0 / spend.max(1.0),
    }
}
