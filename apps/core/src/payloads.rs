//! Module payloads.
//!
//! Each module carries one structured payload whose shape depends on the
//! module. Field names follow the camelCase wire format the AI path produces,
//! so the same types decode model output and persisted snapshots.

use serde::{Deserialize, Serialize};

use crate::catalog::PayloadKind;

/// Structured content attached to one selected module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ModuleData {
    Structure(StructureData),
    Market(MarketData),
    Trends(TrendData),
    Sales(SalesData),
    BusinessPlan(BusinessPlanData),
    Operations(OperationsData),
    Content(ContentData),
    App(AppData),
    Simulation(SimulationData),
    Custom(CustomData),
}

impl ModuleData {
    pub fn kind(&self) -> PayloadKind {
        match self {
            ModuleData::Structure(_) => PayloadKind::Structure,
            ModuleData::Market(_) => PayloadKind::Market,
            ModuleData::Trends(_) => PayloadKind::Trends,
            ModuleData::Sales(_) => PayloadKind::Sales,
            ModuleData::BusinessPlan(_) => PayloadKind::BusinessPlan,
            ModuleData::Operations(_) => PayloadKind::Operations,
            ModuleData::Content(_) => PayloadKind::Content,
            ModuleData::App(_) => PayloadKind::App,
            ModuleData::Simulation(_) => PayloadKind::Simulation,
            ModuleData::Custom(_) => PayloadKind::Custom,
        }
    }

    /// Serializes only the variant body, without the kind tag.
    pub(crate) fn body_to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            ModuleData::Structure(d) => serde_json::to_value(d),
            ModuleData::Market(d) => serde_json::to_value(d),
            ModuleData::Trends(d) => serde_json::to_value(d),
            ModuleData::Sales(d) => serde_json::to_value(d),
            ModuleData::BusinessPlan(d) => serde_json::to_value(d),
            ModuleData::Operations(d) => serde_json::to_value(d),
            ModuleData::Content(d) => serde_json::to_value(d),
            ModuleData::App(d) => serde_json::to_value(d),
            ModuleData::Simulation(d) => serde_json::to_value(d),
            ModuleData::Custom(d) => serde_json::to_value(d),
        }
    }

    /// Rebuilds a payload of the given kind from a variant body.
    pub(crate) fn body_from_value(
        kind: PayloadKind,
        value: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            PayloadKind::Structure => ModuleData::Structure(serde_json::from_value(value)?),
            PayloadKind::Market => ModuleData::Market(serde_json::from_value(value)?),
            PayloadKind::Trends => ModuleData::Trends(serde_json::from_value(value)?),
            PayloadKind::Sales => ModuleData::Sales(serde_json::from_value(value)?),
            PayloadKind::BusinessPlan => ModuleData::BusinessPlan(serde_json::from_value(value)?),
            PayloadKind::Operations => ModuleData::Operations(serde_json::from_value(value)?),
            PayloadKind::Content => ModuleData::Content(serde_json::from_value(value)?),
            PayloadKind::App => ModuleData::App(serde_json::from_value(value)?),
            PayloadKind::Simulation => ModuleData::Simulation(serde_json::from_value(value)?),
            PayloadKind::Custom => ModuleData::Custom(serde_json::from_value(value)?),
        })
    }
}

/// M00: problems, goals, constraints and assumptions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StructureData {
    pub problems: Vec<String>,
    pub goals: Vec<String>,
    pub constraints: Vec<String>,
    pub assumptions: Vec<String>,
}

/// M10/M11: market size, competitors and trends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketData {
    pub market_size: String,
    pub growth_rate: String,
    pub competitors: Vec<Competitor>,
    pub trends: Vec<String>,
    /// Sources backing the figures. Empty when the content is generic.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<Evidence>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Competitor {
    pub name: String,
    /// Market share in percent.
    pub share: f64,
    pub strength: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Evidence {
    pub source: String,
    pub url: String,
}

/// M12: search trends and platform plays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrendData {
    pub trending_keywords: Vec<TrendingKeyword>,
    pub related_queries: Vec<String>,
    pub platform_strategy: Vec<PlatformStrategy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingKeyword {
    pub word: String,
    pub volume: String,
    pub growth: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformStrategy {
    pub platform: String,
    pub approach: String,
}

/// M20: persona, value proposition, channels and actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SalesData {
    pub target_persona: String,
    pub core_value: String,
    pub channels: Vec<String>,
    pub action_plans: Vec<ActionPlan>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionPlan {
    pub task: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Mid,
    Low,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Mid => "Mid",
            Priority::Low => "Low",
        }
    }
}

/// M30/M31: P/L projection, milestones and funding needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BusinessPlanData {
    pub pl_simulation: Vec<PlYear>,
    pub milestones: Vec<Milestone>,
    pub funding_needs: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlYear {
    pub year: u32,
    pub revenue: i64,
    pub profit: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Milestone {
    pub phase: String,
    pub date: String,
    pub event: String,
}

impl BusinessPlanData {
    /// Re-projects the P/L table under revenue and cost multipliers.
    ///
    /// Cost is taken as `revenue - profit` of the base year and scaled
    /// independently of revenue. Computed in `f64`; results outside the
    /// `i64` range saturate.
    pub fn what_if(&self, revenue_multiplier: f64, cost_multiplier: f64) -> Vec<PlYear> {
        self.pl_simulation
            .iter()
            .map(|row| {
                let revenue = row.revenue as f64 * revenue_multiplier;
                let cost = (row.revenue as f64 - row.profit as f64) * cost_multiplier;
                PlYear {
                    year: row.year,
                    revenue: revenue.round() as i64,
                    profit: (revenue - cost).round() as i64,
                }
            })
            .collect()
    }
}

/// M40: current flow, bottlenecks and improvements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OperationsData {
    pub current_flow: Vec<String>,
    pub bottlenecks: Vec<String>,
    pub improvement_plan: Vec<String>,
}

/// M50: content themes, cadence and KPIs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentData {
    pub themes: Vec<String>,
    pub schedule: Vec<String>,
    pub kpis: Vec<Kpi>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Kpi {
    pub metric: String,
    pub target: String,
}

/// M60/M61: product concept, features and stack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppData {
    pub concept: String,
    pub features: Vec<String>,
    pub tech_stack: Vec<String>,
}

/// M91: scenario outcomes and the parameters behind them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationData {
    pub scenarios: Vec<ScenarioOutcome>,
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioOutcome {
    pub name: String,
    pub result: String,
    pub probability: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

/// M99: free-form user defined module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomData {
    pub overview: String,
    pub details: Vec<String>,
}
