pub mod rules;
pub mod strategic;

pub use rules::{evaluate_rules, Recommendation, Severity};
pub use strategic::{
    build_strategic_analysis, objective_guidance, ActionPlanEntry, DiagnosticMetrics, Priority,
    ProjectedScenario, Projections, StrategicAnalysis,
};
