//! Export Tests
//!
//! Rendered reports must give back the modules and sections of their result.

use chrono::NaiveDate;

use crate::catalog::ModuleId;
use crate::export::{heading, read_outline, render};
use crate::fallback::{add_custom_module, generate_detail, FallbackAnalyzer};
use crate::models::{AnalysisRequest, AnalysisResult, Goal};

fn fully_generated(request: &AnalysisRequest) -> AnalysisResult {
    let mut result = FallbackAnalyzer.analyze(request);
    if result.selected_modules.len() < 5 {
        add_custom_module(&mut result).unwrap();
    }
    for module in result.module_ids() {
        generate_detail(&mut result, module).unwrap();
    }
    result
}

#[test]
fn test_outline_round_trip() {
    let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
    let requests = [
        AnalysisRequest::default(),
        AnalysisRequest::new(
            vec![Goal::Finance, Goal::Bizplan],
            vec![],
            "創業したいが資金が足りない",
        ),
        AnalysisRequest::new(vec![Goal::Sns, Goal::App], vec![], "副業でSNSとアプリ"),
        AnalysisRequest::new(vec![Goal::Efficiency], vec![], "法人の業務効率と収支の計算"),
        AnalysisRequest::new(vec![], vec![], "競合と市場のトレンド分析"),
    ];

    for request in &requests {
        let result = fully_generated(request);
        let outline = read_outline(&render(&result, date));

        assert_eq!(outline.modules, result.module_ids(), "{request:?}");
        let sections: Vec<_> = outline.sections.iter().map(|(id, _)| *id).collect();
        let populated: Vec<_> = result
            .module_ids()
            .into_iter()
            .filter(|id| result.has_payload(*id))
            .collect();
        assert_eq!(sections, populated, "{request:?}");
        for (id, title) in &outline.sections {
            assert_eq!(title, heading(result.payload(*id).unwrap()));
        }
    }
}

#[test]
fn test_custom_module_section() {
    let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
    let result = fully_generated(&AnalysisRequest::default());
    assert!(result.has_payload(ModuleId::M99));

    let text = render(&result, date);
    assert!(text.contains("Date: 2026-01-02\n"));
    assert!(text.contains("## M99: Custom\n"));
}
