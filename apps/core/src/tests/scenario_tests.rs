//! Scenario Tests
//!
//! Properties of the deterministic path that must hold for every request.

use crate::catalog::{ModuleId, MANDATORY_MODULE, MAX_SELECTED_MODULES};
use crate::fallback::rules::{self, MANDATORY_REASON};
use crate::fallback::{generator, signals, FallbackAnalyzer, Signal};
use crate::models::{AnalysisRequest, Goal};

// ============================================================================
// Test Fixtures
// ============================================================================

const TEXTS: &[&str] = &[
    "",
    "創業したいが資金が足りない",
    "競合が多い市場で勝ちたい",
    "副業でSNS発信とアプリ開発、収支シミュレーションもしたい",
    "法人の業務効率化とDX、売上と集客の改善、事業計画と融資",
    "まだ何も決まっていません",
];

/// Every subset of the goal vocabulary.
fn goal_subsets() -> impl Iterator<Item = Vec<Goal>> {
    (0u32..1 << Goal::ALL.len()).map(|mask| {
        Goal::ALL
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, goal)| *goal)
            .collect()
    })
}

fn requests() -> impl Iterator<Item = AnalysisRequest> {
    goal_subsets().flat_map(|goals| {
        TEXTS
            .iter()
            .map(move |text| AnalysisRequest::new(goals.clone(), vec![], *text))
    })
}

// ============================================================================
// Selector Invariants
// ============================================================================

#[test]
fn test_selection_is_bounded_and_starts_with_mandatory_module() {
    for request in requests() {
        let selected = rules::select(&request, &signals::extract(&request));
        assert!(
            (1..=MAX_SELECTED_MODULES).contains(&selected.len()),
            "{request:?} selected {} modules",
            selected.len()
        );
        assert_eq!(selected[0].id, MANDATORY_MODULE);
        assert_eq!(selected[0].reason, MANDATORY_REASON);
    }
}

#[test]
fn test_selection_has_no_duplicates() {
    for request in requests() {
        let selected = rules::select(&request, &signals::extract(&request));
        for (i, module) in selected.iter().enumerate() {
            assert!(
                !selected[i + 1..].iter().any(|m| m.id == module.id),
                "{request:?} selected {} twice",
                module.id
            );
        }
    }
}

// ============================================================================
// Determinism and Payload Population
// ============================================================================

#[test]
fn test_fallback_is_deterministic() {
    for request in requests().step_by(7) {
        let first = serde_json::to_string(&FallbackAnalyzer.analyze(&request)).unwrap();
        let second = serde_json::to_string(&FallbackAnalyzer.analyze(&request)).unwrap();
        assert_eq!(first, second);

        let profile = signals::extract(&request);
        for module in ModuleId::ALL {
            assert_eq!(
                generator::generate(module, &profile),
                generator::generate(module, &profile)
            );
        }
    }
}

#[test]
fn test_eager_modules_have_payloads_and_lazy_ones_do_not() {
    for request in requests().step_by(5) {
        let result = FallbackAnalyzer.analyze(&request);
        assert!(result.structure().is_some());
        for module in &result.selected_modules {
            assert_eq!(result.has_payload(module.id), module.id.is_eager());
        }
        assert!(result.module_data.keys().all(|id| result.is_selected(*id)));
    }
}

// ============================================================================
// Reference Scenarios
// ============================================================================

#[test]
fn test_startup_funding_scenario() {
    let request = AnalysisRequest::new(
        vec![Goal::Finance, Goal::Bizplan],
        vec![],
        "創業したいが資金が足りない",
    );
    assert!(signals::extract(&request).is(Signal::Startup));

    let result = FallbackAnalyzer.analyze(&request);
    let ids = result.module_ids();
    assert_eq!(ids[0], ModuleId::M00);
    assert!(ids.contains(&ModuleId::M30));
    assert!(ids.contains(&ModuleId::M31));

    let plan = result.business_plan(ModuleId::M30).unwrap();
    assert!(plan.pl_simulation[0].profit < 0);
    for pair in plan.pl_simulation.windows(2) {
        assert!(pair[1].revenue > pair[0].revenue);
        assert!(pair[1].profit > pair[0].profit);
    }
}

#[test]
fn test_empty_request_scenario() {
    let result = FallbackAnalyzer.analyze(&AnalysisRequest::default());
    assert_eq!(result.module_ids(), vec![ModuleId::M00]);
    assert!(result.structure().is_some());
}

#[test]
fn test_market_scenario() {
    let request = AnalysisRequest::new(vec![], vec![], "競合が多い市場で勝ちたい");
    let ids = FallbackAnalyzer.analyze(&request).module_ids();
    assert_eq!(ids[0], ModuleId::M00);
    assert!(ids.contains(&ModuleId::M10) || ids.contains(&ModuleId::M11));
}
