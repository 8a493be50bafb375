//! Result assembly and on-demand detail generation.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{ModuleId, MANDATORY_MODULE, MAX_SELECTED_MODULES};
use crate::error::AppError;
use crate::models::{AnalysisRequest, AnalysisResult, ResultSource, SelectedModule};

use super::fixtures::{self, DEFAULT_PROBLEM_STRUCTURE, DEFAULT_REFINED_GOAL, DEFAULT_THEME};
use super::signals::SignalProfile;
use super::{generator, rules, signals};

/// Reason attached to the custom module when the user adds it.
pub const CUSTOM_MODULE_REASON: &str = "ユーザー追加";

/// Reason attached to a catalog module the user picks from the sidebar.
pub const ADDED_MODULE_REASON: &str = "個別リサーチ対象に追加";

/// Modules that are actions rather than research topics and cannot be picked.
const NOT_ADDABLE: [ModuleId; 3] = [ModuleId::M90, ModuleId::M91, ModuleId::M92];

/// Shown when detail is requested before the structuring module is filled in.
pub const MISSING_STRUCTURE_MESSAGE: &str = "『構造化整理モジュール（M00）』の情報が不足しています。サイドバーで対象のモジュールを選択し、コアの問題とゴールを確定させてください。";

const REFINED_GOAL_CHARS: usize = 30;
const REFINED_GOAL_MIN_CHARS: usize = 5;

/// Deterministic stand-in for the AI path.
///
/// Stateless. Calling [`FallbackAnalyzer::analyze`] twice with the same request
/// yields identical results.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackAnalyzer;

impl FallbackAnalyzer {
    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        let profile = signals::extract(request);
        let selected_modules = rules::select(request, &profile);
        debug!(
            signals = ?profile.active(),
            modules = ?selected_modules.iter().map(|m| m.id).collect::<Vec<_>>(),
            "Fallback selection"
        );

        let module_data: BTreeMap<_, _> = selected_modules
            .iter()
            .filter(|m| m.id.is_eager())
            .filter_map(|m| generator::generate(m.id, &profile).map(|data| (m.id, data)))
            .collect();

        let text = request.free_text.as_str();
        let (ai_note, tags) = fixtures::note(generator::note_variant(&profile));

        AnalysisResult {
            refined_goal: refined_goal(text),
            problem_structure: non_empty_or(text, DEFAULT_PROBLEM_STRUCTURE),
            selected_modules,
            module_data,
            theme: Some(non_empty_or(text, DEFAULT_THEME)),
            ai_note: ai_note.to_string(),
            tags,
            source: ResultSource::Fallback,
        }
    }
}

fn non_empty_or(text: &str, default: &str) -> String {
    if text.is_empty() {
        default.to_string()
    } else {
        text.to_string()
    }
}

/// First 30 characters plus an ellipsis for texts longer than five
/// characters, otherwise a fixed default.
pub fn refined_goal(text: &str) -> String {
    if text.chars().count() > REFINED_GOAL_MIN_CHARS {
        let head: String = text.chars().take(REFINED_GOAL_CHARS).collect();
        format!("{head}...")
    } else {
        DEFAULT_REFINED_GOAL.to_string()
    }
}

/// What a detail request did to the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailOutcome {
    /// A payload was created.
    Generated,
    /// A payload already existed and was left untouched.
    AlreadyPresent,
    /// The module has no payload schema.
    NoPayload,
}

/// Fills in the payload of one selected module from the result's own
/// characteristics. Never overwrites an existing payload.
pub fn generate_detail(
    result: &mut AnalysisResult,
    module: ModuleId,
) -> Result<DetailOutcome, AppError> {
    let structure_ready = result
        .structure()
        .map(|s| !s.problems.is_empty())
        .unwrap_or(false);
    if !structure_ready {
        return Err(AppError::MissingPrerequisite {
            module: MANDATORY_MODULE,
            message: MISSING_STRUCTURE_MESSAGE.to_string(),
        });
    }
    if !result.is_selected(module) {
        return Err(AppError::Validation(format!(
            "{module} is not part of this result"
        )));
    }
    if result.has_payload(module) {
        return Ok(DetailOutcome::AlreadyPresent);
    }

    let profile = signals::extract_from_result(result);
    match generator::generate(module, &profile) {
        Some(data) => {
            result.module_data.insert(module, data);
            info!(%module, "Generated module detail");
            Ok(DetailOutcome::Generated)
        }
        None => Ok(DetailOutcome::NoPayload),
    }
}

/// Fills eager payloads that a result from elsewhere left out, using the
/// request's profile. Existing payloads are kept.
pub fn complete_eager_payloads(result: &mut AnalysisResult, profile: &SignalProfile) {
    for module in result.module_ids() {
        if module.is_eager() && !result.has_payload(module) {
            if let Some(data) = generator::generate(module, profile) {
                debug!(%module, "Filled missing payload");
                result.module_data.insert(module, data);
            }
        }
    }
}

/// Appends the custom module. Returns `false` when it is already selected.
pub fn add_custom_module(result: &mut AnalysisResult) -> Result<bool, AppError> {
    push_module(result, ModuleId::M99, CUSTOM_MODULE_REASON)
}

/// Appends any catalog module the result does not hold yet, so its detail can
/// be generated. Returns `false` when it is already selected.
pub fn add_module(result: &mut AnalysisResult, module: ModuleId) -> Result<bool, AppError> {
    if NOT_ADDABLE.contains(&module) {
        return Err(AppError::Validation(format!(
            "{module} cannot be added as a research topic"
        )));
    }
    push_module(result, module, ADDED_MODULE_REASON)
}

fn push_module(
    result: &mut AnalysisResult,
    module: ModuleId,
    reason: &str,
) -> Result<bool, AppError> {
    if result.is_selected(module) {
        return Ok(false);
    }
    if result.selected_modules.len() >= MAX_SELECTED_MODULES {
        return Err(AppError::Validation(format!(
            "a result holds at most {MAX_SELECTED_MODULES} modules"
        )));
    }
    result
        .selected_modules
        .push(SelectedModule::new(module, reason));
    debug!(%module, "Module added to result");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Goal;
    use crate::payloads::ModuleData;

    fn analyze(goals: Vec<Goal>, text: &str) -> AnalysisResult {
        FallbackAnalyzer.analyze(&AnalysisRequest::new(goals, vec![], text))
    }

    #[test]
    fn refined_goal_truncates_long_text() {
        assert_eq!(refined_goal("短い"), DEFAULT_REFINED_GOAL);
        assert_eq!(refined_goal("12345"), DEFAULT_REFINED_GOAL);
        assert_eq!(refined_goal("123456"), "123456...");
        let long = "あ".repeat(40);
        assert_eq!(refined_goal(&long), format!("{}...", "あ".repeat(30)));
    }

    #[test]
    fn empty_request_yields_mandatory_module_only() {
        let result = analyze(vec![], "");
        assert_eq!(result.module_ids(), vec![ModuleId::M00]);
        assert_eq!(result.module_data.len(), 1);
        assert_eq!(result.refined_goal, DEFAULT_REFINED_GOAL);
        assert_eq!(result.problem_structure, DEFAULT_PROBLEM_STRUCTURE);
        assert_eq!(result.theme.as_deref(), Some(DEFAULT_THEME));
        assert_eq!(result.source, ResultSource::Fallback);
    }

    #[test]
    fn eager_modules_are_populated_and_lazy_ones_are_not() {
        let result = analyze(vec![Goal::Strategy], "競合分析と収支シミュレーション");
        assert!(result.is_selected(ModuleId::M91));
        for module in &result.selected_modules {
            assert_eq!(
                result.has_payload(module.id),
                module.id.is_eager(),
                "{}",
                module.id
            );
        }
        assert!(result.module_data.keys().all(|id| result.is_selected(*id)));
    }

    #[test]
    fn startup_scenario() {
        let result = analyze(vec![Goal::Finance, Goal::Bizplan], "創業したいが資金が足りない");
        let ids = result.module_ids();
        assert_eq!(ids[0], ModuleId::M00);
        assert!(ids.contains(&ModuleId::M30) && ids.contains(&ModuleId::M31));
        let plan = result.business_plan(ModuleId::M30).unwrap();
        assert!(plan.pl_simulation[0].profit < 0);
        assert!(result.tags.iter().any(|t| t == "急成長"));
    }

    #[test]
    fn detail_requires_structure() {
        let mut result = analyze(vec![Goal::Strategy], "競合と収支の数値");
        result.module_data.remove(&ModuleId::M00);
        let err = generate_detail(&mut result, ModuleId::M91).unwrap_err();
        assert!(matches!(
            err,
            AppError::MissingPrerequisite { module: ModuleId::M00, .. }
        ));

        let mut emptied = analyze(vec![], "収支の計算");
        if let Some(ModuleData::Structure(s)) = emptied.module_data.get_mut(&ModuleId::M00) {
            s.problems.clear();
        }
        assert!(generate_detail(&mut emptied, ModuleId::M91).is_err());
    }

    #[test]
    fn detail_is_idempotent() {
        let mut result = analyze(vec![], "収支シミュレーションをしたい");
        assert_eq!(
            generate_detail(&mut result, ModuleId::M91).unwrap(),
            DetailOutcome::Generated
        );
        if let Some(ModuleData::Simulation(sim)) = result.module_data.get_mut(&ModuleId::M91) {
            sim.scenarios[0].name = "編集済み".to_string();
        }
        assert_eq!(
            generate_detail(&mut result, ModuleId::M91).unwrap(),
            DetailOutcome::AlreadyPresent
        );
        let Some(ModuleData::Simulation(sim)) = result.payload(ModuleId::M91) else {
            panic!("simulation payload missing");
        };
        assert_eq!(sim.scenarios[0].name, "編集済み");
    }

    #[test]
    fn detail_for_unselected_module_is_rejected() {
        let mut result = analyze(vec![], "");
        assert!(matches!(
            generate_detail(&mut result, ModuleId::M12),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn detail_for_module_without_schema() {
        let mut result = analyze(vec![], "");
        result
            .selected_modules
            .push(SelectedModule::new(ModuleId::M90, "export"));
        assert_eq!(
            generate_detail(&mut result, ModuleId::M90).unwrap(),
            DetailOutcome::NoPayload
        );
        assert!(!result.has_payload(ModuleId::M90));
    }

    #[test]
    fn missing_eager_payloads_are_filled() {
        let mut result = analyze(vec![Goal::Sns], "副業でSNS発信");
        result.module_data.remove(&ModuleId::M50);
        if let Some(ModuleData::Structure(s)) = result.module_data.get_mut(&ModuleId::M00) {
            s.problems = vec!["自分で書いた課題".to_string()];
        }
        let profile = SignalProfile {
            personal: true,
            ..Default::default()
        };
        complete_eager_payloads(&mut result, &profile);
        assert!(matches!(
            result.payload(ModuleId::M50),
            Some(ModuleData::Content(c)) if c.themes[0] == "副業の始め方"
        ));
        assert_eq!(result.structure().unwrap().problems, vec!["自分で書いた課題"]);
    }

    #[test]
    fn custom_module_is_added_once_and_capped() {
        let mut result = analyze(vec![], "");
        assert!(add_custom_module(&mut result).unwrap());
        assert!(!add_custom_module(&mut result).unwrap());
        assert_eq!(result.selected_modules.last().unwrap().reason, CUSTOM_MODULE_REASON);
        assert_eq!(
            generate_detail(&mut result, ModuleId::M99).unwrap(),
            DetailOutcome::Generated
        );

        let mut full = analyze(
            vec![Goal::Revenue, Goal::Strategy, Goal::Bizplan],
            "",
        );
        assert_eq!(full.selected_modules.len(), MAX_SELECTED_MODULES);
        assert!(add_custom_module(&mut full).is_err());
    }

    #[test]
    fn catalog_module_can_be_added_then_detailed() {
        let mut result = analyze(vec![], "");
        assert!(matches!(
            generate_detail(&mut result, ModuleId::M12),
            Err(AppError::Validation(_))
        ));

        assert!(add_module(&mut result, ModuleId::M12).unwrap());
        assert!(!add_module(&mut result, ModuleId::M12).unwrap());
        let added = result.selected_modules.last().unwrap();
        assert_eq!(added.id, ModuleId::M12);
        assert_eq!(added.reason, ADDED_MODULE_REASON);

        assert_eq!(
            generate_detail(&mut result, ModuleId::M12).unwrap(),
            DetailOutcome::Generated
        );
        assert!(matches!(
            result.payload(ModuleId::M12),
            Some(ModuleData::Trends(_))
        ));
    }

    #[test]
    fn action_modules_cannot_be_added() {
        let mut result = analyze(vec![], "");
        for module in [ModuleId::M90, ModuleId::M91, ModuleId::M92] {
            assert!(matches!(
                add_module(&mut result, module),
                Err(AppError::Validation(_))
            ));
        }
        assert_eq!(result.module_ids(), vec![ModuleId::M00]);
    }

    #[test]
    fn added_modules_respect_the_cap() {
        let mut full = analyze(
            vec![Goal::Revenue, Goal::Strategy, Goal::Bizplan],
            "",
        );
        let before = full.clone();
        let missing = [ModuleId::M12, ModuleId::M40, ModuleId::M60]
            .into_iter()
            .find(|id| !full.is_selected(*id))
            .unwrap();
        assert!(add_module(&mut full, missing).is_err());
        assert_eq!(full, before);
        // already selected modules are still reported as present
        assert!(!add_module(&mut full, ModuleId::M00).unwrap());
    }
}
