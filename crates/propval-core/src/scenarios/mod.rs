//! Conservative / moderate / optimistic re-runs of the investment analysis.

pub mod generator;
pub mod overlay;

pub use generator::{
    generate_scenarios, generate_scenarios_with, ScenarioRow, ScenarioSet, ScenarioSummary,
};
pub use overlay::{
    ScenarioAssumptions, ScenarioKind, ScenarioOverlay, ScenarioWeights, DEFAULT_HORIZON_YEARS,
    WEIGHT_TOLERANCE,
};
