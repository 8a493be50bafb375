use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use crate::catalog::{ModuleId, MANDATORY_MODULE};
use crate::payloads::{BusinessPlanData, ModuleData, StructureData};

/// Maximum number of characters accepted in the free-form consultation text.
pub const MAX_FREE_TEXT_CHARS: u64 = 10_000;

/// A goal the client ticks on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Revenue,
    Strategy,
    Bizplan,
    Finance,
    Product,
    Sns,
    Efficiency,
    App,
    Spec,
    Unknown,
}

impl Goal {
    pub const ALL: [Goal; 10] = [
        Goal::Revenue,
        Goal::Strategy,
        Goal::Bizplan,
        Goal::Finance,
        Goal::Product,
        Goal::Sns,
        Goal::Efficiency,
        Goal::App,
        Goal::Spec,
        Goal::Unknown,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Goal::Revenue => "revenue",
            Goal::Strategy => "strategy",
            Goal::Bizplan => "bizplan",
            Goal::Finance => "finance",
            Goal::Product => "product",
            Goal::Sns => "sns",
            Goal::Efficiency => "efficiency",
            Goal::App => "app",
            Goal::Spec => "spec",
            Goal::Unknown => "unknown",
        }
    }

    /// Label shown on the intake form and sent to the model.
    pub fn label(&self) -> &'static str {
        match self {
            Goal::Revenue => "売上を改善したい",
            Goal::Strategy => "販売戦略／新しい方針を考えたい",
            Goal::Bizplan => "事業計画を整理したい",
            Goal::Finance => "資金調達・融資を考えたい",
            Goal::Product => "商品・サービスの方向性を考えたい",
            Goal::Sns => "SNS／記事／発信内容を作りたい",
            Goal::Efficiency => "業務効率・経理を改善したい",
            Goal::App => "アプリを作りたい",
            Goal::Spec => "仕様書を作りたい",
            Goal::Unknown => "まだ整理できていない",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Goal::ALL
            .into_iter()
            .find(|goal| goal.id() == s)
            .ok_or_else(|| format!("unknown goal: {s}"))
    }
}

/// Input of one analysis: ticked goals, client-type labels and free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub goals: Vec<Goal>,
    #[validate(length(max = 16), custom(function = "validate_client_types"))]
    pub client_types: Vec<String>,
    #[validate(length(max = MAX_FREE_TEXT_CHARS))]
    pub free_text: String,
}

fn validate_client_types(labels: &Vec<String>) -> Result<(), ValidationError> {
    let in_range = |label: &String| (1..=64).contains(&label.chars().count());
    if labels.iter().all(in_range) {
        Ok(())
    } else {
        Err(ValidationError::new("client_type_length"))
    }
}

impl AnalysisRequest {
    pub fn new(goals: Vec<Goal>, client_types: Vec<String>, free_text: impl Into<String>) -> Self {
        Self {
            goals,
            client_types,
            free_text: free_text.into(),
        }
        .normalized()
    }

    /// Applies set semantics to both tag lists, keeping first occurrences.
    pub fn normalized(mut self) -> Self {
        let mut seen_goals = Vec::with_capacity(self.goals.len());
        self.goals.retain(|goal| {
            if seen_goals.contains(goal) {
                false
            } else {
                seen_goals.push(*goal);
                true
            }
        });
        let mut seen_types: Vec<String> = Vec::with_capacity(self.client_types.len());
        self.client_types.retain(|label| {
            if seen_types.contains(label) {
                false
            } else {
                seen_types.push(label.clone());
                true
            }
        });
        self
    }

    pub fn has_goal(&self, goal: Goal) -> bool {
        self.goals.contains(&goal)
    }

    /// The intake form refuses to start with neither goals nor text.
    pub fn is_blank(&self) -> bool {
        self.goals.is_empty() && self.free_text.trim().is_empty()
    }
}

/// A module chosen for a result, with the reason it was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedModule {
    pub id: ModuleId,
    pub name: String,
    pub reason: String,
}

impl SelectedModule {
    pub fn new(id: ModuleId, reason: impl Into<String>) -> Self {
        Self {
            id,
            name: id.name().to_string(),
            reason: reason.into(),
        }
    }
}

/// Which path produced a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Ai,
    #[default]
    Fallback,
}

/// The aggregate output of an analysis, editable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub refined_goal: String,
    pub problem_structure: String,
    pub selected_modules: Vec<SelectedModule>,
    /// Payload per module. A module appears here only once its content exists.
    #[serde(default)]
    pub module_data: BTreeMap<ModuleId, ModuleData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub ai_note: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source: ResultSource,
}

impl AnalysisResult {
    pub fn is_selected(&self, id: ModuleId) -> bool {
        self.selected_modules.iter().any(|m| m.id == id)
    }

    pub fn payload(&self, id: ModuleId) -> Option<&ModuleData> {
        self.module_data.get(&id)
    }

    pub fn has_payload(&self, id: ModuleId) -> bool {
        self.module_data.contains_key(&id)
    }

    /// The mandatory module's structured content, if present.
    pub fn structure(&self) -> Option<&StructureData> {
        match self.module_data.get(&MANDATORY_MODULE) {
            Some(ModuleData::Structure(data)) => Some(data),
            _ => None,
        }
    }

    pub fn business_plan(&self, id: ModuleId) -> Option<&BusinessPlanData> {
        match self.module_data.get(&id) {
            Some(ModuleData::BusinessPlan(data)) => Some(data),
            _ => None,
        }
    }

    pub fn module_ids(&self) -> Vec<ModuleId> {
        self.selected_modules.iter().map(|m| m.id).collect()
    }
}

/// A saved snapshot of a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The unique identifier for the entry (UUID).
    pub id: String,
    /// Creation date, `YYYY-MM-DD`.
    pub date: String,
    /// Title shown in the history list, taken from the refined goal.
    pub title: String,
    /// The full result as it was when saved.
    pub data: AnalysisResult,
}

impl HistoryEntry {
    pub fn created_on(&self) -> Result<chrono::NaiveDate, chrono::ParseError> {
        chrono::NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
    }
}

/// The in-progress intake form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormDraft {
    pub selected_goals: Vec<Goal>,
    pub client_types: Vec<String>,
    pub free_text: String,
}

impl From<&AnalysisRequest> for FormDraft {
    fn from(request: &AnalysisRequest) -> Self {
        Self {
            selected_goals: request.goals.clone(),
            client_types: request.client_types.clone(),
            free_text: request.free_text.clone(),
        }
    }
}

impl From<FormDraft> for AnalysisRequest {
    fn from(draft: FormDraft) -> Self {
        AnalysisRequest::new(draft.selected_goals, draft.client_types, draft.free_text)
    }
}

/// Speaker of one conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_applies_set_semantics() {
        let request = AnalysisRequest::new(
            vec![Goal::Finance, Goal::Bizplan, Goal::Finance],
            vec!["法人".to_string(), "法人".to_string()],
            "",
        );
        assert_eq!(request.goals, vec![Goal::Finance, Goal::Bizplan]);
        assert_eq!(request.client_types, vec!["法人".to_string()]);
    }

    #[test]
    fn request_validation() {
        let ok = AnalysisRequest::new(vec![], vec!["個人".to_string()], "副業");
        assert!(ok.validate().is_ok());

        let long_text = AnalysisRequest::new(vec![], vec![], "あ".repeat(10_001));
        assert!(long_text.validate().is_err());

        let empty_label = AnalysisRequest::new(vec![], vec![String::new()], "");
        assert!(empty_label.validate().is_err());
    }

    #[test]
    fn free_text_limit_counts_characters() {
        let limit = MAX_FREE_TEXT_CHARS as usize;
        let at_limit = AnalysisRequest::new(vec![], vec![], "あ".repeat(limit));
        assert!(at_limit.validate().is_ok());

        let over = AnalysisRequest::new(vec![], vec![], "a".repeat(limit + 1));
        let errors = over.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("free_text"));
    }

    #[test]
    fn goals_decode_from_ids() {
        let request: AnalysisRequest =
            serde_json::from_str(r#"{"goals":["finance","bizplan"],"freeText":"創業"}"#).unwrap();
        assert_eq!(request.goals, vec![Goal::Finance, Goal::Bizplan]);
        assert!(request.client_types.is_empty());
        assert!(serde_json::from_str::<AnalysisRequest>(r#"{"goals":["事務"]}"#).is_err());
    }

    #[test]
    fn blank_request() {
        assert!(AnalysisRequest::default().is_blank());
        assert!(!AnalysisRequest::new(vec![Goal::Unknown], vec![], "").is_blank());
    }

    #[test]
    fn draft_uses_form_field_names() {
        let draft = FormDraft {
            selected_goals: vec![Goal::Sns],
            client_types: vec!["個人".to_string()],
            free_text: "副業".to_string(),
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["selectedGoals"][0], "sns");
        assert_eq!(json["freeText"], "副業");
    }

    #[test]
    fn history_date_parses() {
        let entry = HistoryEntry {
            id: "x".to_string(),
            date: "2026-10-16".to_string(),
            title: "t".to_string(),
            data: AnalysisResult {
                refined_goal: "t".to_string(),
                problem_structure: String::new(),
                selected_modules: vec![SelectedModule::new(ModuleId::M00, "base")],
                module_data: BTreeMap::new(),
                theme: None,
                ai_note: String::new(),
                tags: vec![],
                source: ResultSource::Fallback,
            },
        };
        assert_eq!(
            entry.created_on().unwrap(),
            chrono::NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
        );
    }
}
