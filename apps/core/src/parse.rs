//! Decoding of the model's analysis reply.
//!
//! The model answers with prose, code fences or bare JSON. The first
//! balanced `{...}` span is taken and mapped from the flat wire shape
//! (`m00Data`, `m10Data`, ...) into an [`AnalysisResult`].

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::warn;

use crate::actors::messages::ActorError;
use crate::catalog::{ModuleId, PayloadKind, MANDATORY_MODULE};
use crate::fallback::rules::{dedupe_and_cap, MANDATORY_REASON};
use crate::models::{AnalysisResult, ResultSource, SelectedModule};
use crate::payloads::{
    AppData, BusinessPlanData, ContentData, MarketData, ModuleData, OperationsData, SalesData,
    StructureData,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAnalysis {
    refined_goal: String,
    #[serde(default)]
    problem_structure: String,
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    selected_modules: Vec<WireModule>,
    m00_data: Option<StructureData>,
    m10_data: Option<MarketData>,
    m20_data: Option<SalesData>,
    m30_data: Option<BusinessPlanData>,
    m40_data: Option<OperationsData>,
    m50_data: Option<ContentData>,
    m60_data: Option<AppData>,
    #[serde(default)]
    ai_note: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WireModule {
    id: String,
    #[serde(default)]
    reason: String,
}

/// Returns the first top-level brace-delimited span of `raw`.
///
/// Braces inside JSON strings are ignored. `None` when no span closes.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in raw[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses a model reply into a result.
///
/// Unknown module ids are dropped, the mandatory module is moved to the
/// front and the list is capped. A reply without a refined goal or without
/// structured content for the mandatory module is rejected.
pub fn parse_analysis(raw: &str) -> Result<AnalysisResult, ActorError> {
    let json = extract_json_object(raw)
        .ok_or_else(|| ActorError::Parse("no JSON object in model output".to_string()))?;
    let wire: WireAnalysis =
        serde_json::from_str(json).map_err(|e| ActorError::Parse(e.to_string()))?;

    if wire.refined_goal.trim().is_empty() {
        return Err(ActorError::Parse("refinedGoal is empty".to_string()));
    }
    let structure = wire
        .m00_data
        .filter(|s| !s.problems.is_empty())
        .ok_or_else(|| ActorError::Parse("m00Data is missing or has no problems".to_string()))?;

    let selected_modules = normalize_modules(wire.selected_modules);

    let mut module_data = BTreeMap::new();
    for module in &selected_modules {
        let payload = match module.id.payload_kind() {
            Some(PayloadKind::Structure) => Some(ModuleData::Structure(structure.clone())),
            Some(PayloadKind::Market) => wire.m10_data.clone().map(ModuleData::Market),
            Some(PayloadKind::Sales) => wire.m20_data.clone().map(ModuleData::Sales),
            Some(PayloadKind::BusinessPlan) => wire.m30_data.clone().map(ModuleData::BusinessPlan),
            Some(PayloadKind::Operations) => wire.m40_data.clone().map(ModuleData::Operations),
            Some(PayloadKind::Content) => wire.m50_data.clone().map(ModuleData::Content),
            Some(PayloadKind::App) => wire.m60_data.clone().map(ModuleData::App),
            _ => None,
        };
        if let Some(payload) = payload {
            module_data.insert(module.id, payload);
        }
    }

    Ok(AnalysisResult {
        refined_goal: wire.refined_goal,
        problem_structure: wire.problem_structure,
        selected_modules,
        module_data,
        theme: wire.theme.filter(|t| !t.trim().is_empty()),
        ai_note: wire.ai_note,
        tags: wire.tags,
        source: ResultSource::Ai,
    })
}

fn normalize_modules(wire: Vec<WireModule>) -> Vec<SelectedModule> {
    let mut mandatory = SelectedModule::new(MANDATORY_MODULE, MANDATORY_REASON);
    let mut others = Vec::with_capacity(wire.len());

    for module in wire {
        let id = match module.id.parse::<ModuleId>() {
            Ok(id) => id,
            Err(e) => {
                warn!("Dropping module from model output: {}", e);
                continue;
            }
        };
        if id == MANDATORY_MODULE {
            if !module.reason.trim().is_empty() {
                mandatory.reason = module.reason;
            }
        } else {
            others.push(SelectedModule::new(id, module.reason));
        }
    }

    let mut modules = Vec::with_capacity(others.len() + 1);
    modules.push(mandatory);
    modules.extend(others);
    dedupe_and_cap(modules)
}
