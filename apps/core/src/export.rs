//! Markdown report export.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::catalog::ModuleId;
use crate::models::AnalysisResult;
use crate::payloads::ModuleData;

pub const REPORT_TITLE: &str = "# AI Business Strategy Report";

const MODULES_HEADING: &str = "## Selected Modules";

// NOTE: expect() is acceptable here: the patterns are constants.
static SECTION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^## (M\d{2}): (.+)$").expect("Invalid regex: section heading")
});
static MODULE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^- (M\d{2}) ").expect("Invalid regex: module line")
});

/// Free text on one line. Line breaks inside user or model text would
/// otherwise start new headings or list items.
fn inline(text: &str) -> String {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`inline`], with a leading heading or list marker escaped for text that
/// starts its own line.
fn paragraph(text: &str) -> String {
    let flat = inline(text);
    if flat.starts_with(['#', '-']) {
        format!("\\{flat}")
    } else {
        flat
    }
}

/// Section heading for a payload.
pub fn heading(data: &ModuleData) -> &'static str {
    match data {
        ModuleData::Structure(_) => "Structure",
        ModuleData::Market(_) => "Market Analysis",
        ModuleData::Trends(_) => "Trends & Keywords",
        ModuleData::Sales(_) => "Sales Strategy",
        ModuleData::BusinessPlan(_) => "Business & Financing",
        ModuleData::Operations(_) => "Operations",
        ModuleData::Content(_) => "SNS & Content",
        ModuleData::App(_) => "Product Concept",
        ModuleData::Simulation(_) => "Simulation",
        ModuleData::Custom(_) => "Custom",
    }
}

#[derive(Default)]
struct Report {
    out: String,
}

impl Report {
    fn line(&mut self, text: impl AsRef<str>) {
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn field(&mut self, label: &str, value: &str) {
        if !value.is_empty() {
            self.line(format!("{label}: {}", inline(value)));
        }
    }

    /// A `###` block of list items. Skipped when there is nothing to list.
    fn list<I, S>(&mut self, title: &str, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut items = items.into_iter().peekable();
        if items.peek().is_none() {
            return;
        }
        self.line(format!("### {title}"));
        for item in items {
            self.line(format!("- {}", inline(item.as_ref())));
        }
    }
}

/// Renders a result as a Markdown report dated `date`.
pub fn render(result: &AnalysisResult, date: NaiveDate) -> String {
    let mut report = Report::default();
    report.line(REPORT_TITLE);
    report.line(format!("Date: {}", date.format("%Y-%m-%d")));
    report.line(format!("Project: {}", inline(&result.refined_goal)));
    report.blank();

    report.line("## AI Advisor Note");
    report.line(paragraph(&result.ai_note));
    report.blank();

    report.line(MODULES_HEADING);
    for module in &result.selected_modules {
        report.line(format!(
            "- {} {}: {}",
            module.id,
            module.name,
            inline(&module.reason)
        ));
    }

    // Payloads follow the selection order, not the map order.
    for module in &result.selected_modules {
        if let Some(data) = result.payload(module.id) {
            report.blank();
            report.line(format!("## {}: {}", module.id, heading(data)));
            render_payload(&mut report, data);
        }
    }

    report.out
}

fn render_payload(report: &mut Report, data: &ModuleData) {
    match data {
        ModuleData::Structure(d) => {
            report.list("Problems", &d.problems);
            report.list("Goals", &d.goals);
            report.list("Constraints", &d.constraints);
            report.list("Assumptions", &d.assumptions);
        }
        ModuleData::Market(d) => {
            report.field("Market Size", &d.market_size);
            report.field("Growth Rate", &d.growth_rate);
            report.list(
                "Competitors",
                d.competitors
                    .iter()
                    .map(|c| format!("{} ({}%): {}", c.name, c.share, c.strength)),
            );
            report.list("Trends", &d.trends);
            report.list(
                "Evidence",
                d.evidence.iter().map(|e| format!("{} <{}>", e.source, e.url)),
            );
        }
        ModuleData::Trends(d) => {
            report.list(
                "Trending Keywords",
                d.trending_keywords
                    .iter()
                    .map(|k| format!("{} ({}, {})", k.word, k.volume, k.growth)),
            );
            report.list("Related Queries", &d.related_queries);
            report.list(
                "Platform Strategy",
                d.platform_strategy
                    .iter()
                    .map(|p| format!("{}: {}", p.platform, p.approach)),
            );
        }
        ModuleData::Sales(d) => {
            report.field("Target", &d.target_persona);
            report.field("Core Value", &d.core_value);
            report.list("Channels", &d.channels);
            report.list(
                "Action Plans",
                d.action_plans
                    .iter()
                    .map(|a| format!("[{}] {}", a.priority.label(), a.task)),
            );
        }
        ModuleData::BusinessPlan(d) => {
            report.field("Funding Needs", &d.funding_needs);
            report.list(
                "P/L Simulation",
                d.pl_simulation.iter().map(|row| {
                    format!(
                        "Year {}: revenue {}, profit {}",
                        row.year, row.revenue, row.profit
                    )
                }),
            );
            report.list(
                "Milestones",
                d.milestones
                    .iter()
                    .map(|m| format!("{}: {} ({})", m.date, m.event, m.phase)),
            );
        }
        ModuleData::Operations(d) => {
            report.list("Current Flow", &d.current_flow);
            report.list("Bottlenecks", &d.bottlenecks);
            report.list(
                "Improvement Plan",
                d.improvement_plan
                    .iter()
                    .enumerate()
                    .map(|(i, step)| format!("{}. {}", i + 1, step)),
            );
        }
        ModuleData::Content(d) => {
            report.list("Themes", &d.themes);
            report.list("Schedule", &d.schedule);
            report.list(
                "KPIs",
                d.kpis.iter().map(|k| format!("{}: {}", k.metric, k.target)),
            );
        }
        ModuleData::App(d) => {
            report.field("Concept", &d.concept);
            report.list("Features", &d.features);
            report.list("Tech Stack", &d.tech_stack);
        }
        ModuleData::Simulation(d) => {
            report.list(
                "Scenarios",
                d.scenarios
                    .iter()
                    .map(|s| format!("{}: {} ({})", s.name, s.result, s.probability)),
            );
            report.list(
                "Parameters",
                d.parameters.iter().map(|p| format!("{}: {}", p.name, p.value)),
            );
        }
        ModuleData::Custom(d) => {
            report.field("Overview", &d.overview);
            report.list("Details", &d.details);
        }
    }
}

/// What can be recovered from a rendered report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOutline {
    pub project: Option<String>,
    /// Module ids from the selected-modules list, in order.
    pub modules: Vec<ModuleId>,
    /// `(id, heading)` of every payload section, in order.
    pub sections: Vec<(ModuleId, String)>,
}

/// Reads the outline back out of a report. Unknown module codes are skipped.
///
/// The project comes from the header above the first `##` heading and module
/// ids only from the selected-modules block.
pub fn read_outline(text: &str) -> ReportOutline {
    let mut outline = ReportOutline::default();
    let mut in_header = true;
    let mut in_modules = false;

    for line in text.lines() {
        if line.starts_with("## ") {
            in_header = false;
            in_modules = line == MODULES_HEADING;
            if let Some(caps) = SECTION_HEADING.captures(line) {
                if let Ok(id) = caps[1].parse() {
                    outline.sections.push((id, caps[2].trim().to_string()));
                }
            }
            continue;
        }
        if in_header {
            if let Some(project) = line.strip_prefix("Project: ") {
                outline.project.get_or_insert_with(|| project.to_string());
            }
        } else if in_modules {
            if let Some(caps) = MODULE_LINE.captures(line) {
                if let Ok(id) = caps[1].parse() {
                    outline.modules.push(id);
                }
            }
        }
    }
    outline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::edit_payload;
    use crate::fallback::{generate_detail, FallbackAnalyzer};
    use crate::models::{AnalysisRequest, Goal};
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn report_header_and_module_list() {
        let result = FallbackAnalyzer.analyze(&AnalysisRequest::new(
            vec![Goal::Finance, Goal::Bizplan],
            vec![],
            "創業したいが資金が足りない",
        ));
        let text = render(&result, date());

        assert!(text.starts_with(REPORT_TITLE));
        assert!(text.contains("Date: 2026-10-16\n"));
        assert!(text.contains(&format!("Project: {}\n", result.refined_goal)));
        assert!(text.contains(&result.ai_note));
        assert!(text.contains("- M00 構造化整理: "));
        assert!(text.contains("## M30: Business & Financing\n"));
        assert!(text.contains("- Year 1: revenue 0, profit -800\n"));
    }

    #[test]
    fn outline_matches_the_result() {
        let mut result = FallbackAnalyzer.analyze(&AnalysisRequest::new(
            vec![Goal::Strategy],
            vec![],
            "競合と収支シミュレーション",
        ));
        generate_detail(&mut result, ModuleId::M91).unwrap();
        let outline = read_outline(&render(&result, date()));

        assert_eq!(outline.project.as_deref(), Some(result.refined_goal.as_str()));
        assert_eq!(outline.modules, result.module_ids());
        let expected: Vec<_> = result
            .selected_modules
            .iter()
            .filter_map(|m| {
                result
                    .payload(m.id)
                    .map(|data| (m.id, heading(data).to_string()))
            })
            .collect();
        assert_eq!(outline.sections, expected);
        assert!(outline.sections.iter().any(|(id, _)| *id == ModuleId::M91));
    }

    #[test]
    fn lazy_modules_without_payload_have_no_section() {
        let result = FallbackAnalyzer.analyze(&AnalysisRequest::new(
            vec![],
            vec![],
            "収支シミュレーションが必要",
        ));
        assert!(result.is_selected(ModuleId::M91));
        let outline = read_outline(&render(&result, date()));
        assert!(outline.modules.contains(&ModuleId::M91));
        assert!(!outline.sections.iter().any(|(id, _)| *id == ModuleId::M91));
    }

    #[test]
    fn outline_ignores_unknown_codes() {
        let outline = read_outline(
            "## Selected Modules\n- M77 謎: x\n## M77: Nothing\n## M00: Structure\n",
        );
        assert!(outline.modules.is_empty());
        assert_eq!(outline.sections, vec![(ModuleId::M00, "Structure".to_string())]);
        assert_eq!(outline.project, None);
    }

    #[test]
    fn free_text_cannot_forge_modules_or_sections() {
        let mut result = FallbackAnalyzer.analyze(&AnalysisRequest::new(
            vec![Goal::Finance, Goal::Bizplan],
            vec![],
            "創業したいが資金が足りない",
        ));
        edit_payload(
            &mut result,
            ModuleId::M00,
            "/problems/0",
            json!("M40 の業務改善が先"),
        )
        .unwrap();
        result.ai_note = "方針:\n## M10: 市場を先に".to_string();
        result.selected_modules[0].reason = "必須\n- M20 営業".to_string();

        let text = render(&result, date());
        let outline = read_outline(&text);

        assert_eq!(outline.modules, result.module_ids());
        let populated: Vec<_> = result
            .module_ids()
            .into_iter()
            .filter(|id| result.has_payload(*id))
            .collect();
        let sections: Vec<_> = outline.sections.iter().map(|(id, _)| *id).collect();
        assert_eq!(sections, populated);
        assert!(text.contains("方針: ## M10: 市場を先に\n"));
        assert!(text.contains("- M00 構造化整理: 必須 - M20 営業\n"));
        assert!(text.contains("- M40 の業務改善が先\n"));
    }

    #[test]
    fn note_starting_with_a_marker_is_escaped() {
        let mut result = FallbackAnalyzer.analyze(&AnalysisRequest::default());
        result.ai_note = "## M91: 収支\n次へ".to_string();
        let text = render(&result, date());
        assert!(text.contains("\\## M91: 収支 次へ\n"));
        assert!(!read_outline(&text).sections.iter().any(|(id, _)| *id == ModuleId::M91));
    }
}
