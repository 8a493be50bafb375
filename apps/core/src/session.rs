//! The in-memory working state of one user: the current result, its chat and
//! the request currently in flight.

use serde_json::Value;
use tracing::{debug, info};

use crate::catalog::ModuleId;
use crate::edit;
use crate::error::AppError;
use crate::fallback::{self, DetailOutcome};
use crate::models::{AnalysisResult, ChatTurn};
use crate::payloads::PlYear;

/// Identifies one analysis request. Only the most recent ticket is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct Workspace {
    current: Option<AnalysisResult>,
    chat: Vec<ChatTurn>,
    issued: u64,
    pending: Option<u64>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request. Any earlier ticket becomes stale.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.pending = Some(self.issued);
        Ticket(self.issued)
    }

    /// Installs a result delivered for `ticket`. Returns `false`, leaving the
    /// workspace untouched, when the ticket is stale: a newer request was
    /// started, the flow was restarted, or the user edited the result since.
    pub fn accept(&mut self, ticket: Ticket, result: AnalysisResult) -> bool {
        if self.pending != Some(ticket.0) {
            info!(ticket = ticket.0, "Discarding stale analysis result");
            return false;
        }
        self.pending = None;
        self.current = Some(result);
        self.chat.clear();
        true
    }

    /// Drops all state. In-flight requests are left to finish and discarded.
    pub fn restart(&mut self) {
        self.pending = None;
        self.current = None;
        self.chat.clear();
    }

    /// Opens a previously saved result for further editing.
    pub fn open(&mut self, result: AnalysisResult) {
        self.pending = None;
        self.current = Some(result);
        self.chat.clear();
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn current(&self) -> Option<&AnalysisResult> {
        self.current.as_ref()
    }

    pub fn chat_history(&self) -> &[ChatTurn] {
        &self.chat
    }

    pub fn record_chat(&mut self, message: impl Into<String>, reply: impl Into<String>) {
        self.chat.push(ChatTurn::user(message));
        self.chat.push(ChatTurn::model(reply));
    }

    /// Applies a user edit to the open result. A successful edit means the
    /// user has moved on from anything still in flight; a rejected one leaves
    /// the pending ticket alone.
    fn edit<T>(
        &mut self,
        apply: impl FnOnce(&mut AnalysisResult) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let current = self
            .current
            .as_mut()
            .ok_or_else(|| AppError::Validation("no analysis is open".to_string()))?;
        let value = apply(current)?;
        self.pending = None;
        Ok(value)
    }

    pub fn generate_detail(&mut self, module: ModuleId) -> Result<DetailOutcome, AppError> {
        let outcome = self.edit(|result| fallback::generate_detail(result, module))?;
        debug!(%module, ?outcome, "Detail requested");
        Ok(outcome)
    }

    pub fn add_custom_module(&mut self) -> Result<bool, AppError> {
        self.edit(fallback::add_custom_module)
    }

    /// Adds a catalog module picked by the user to the open result.
    pub fn add_module(&mut self, module: ModuleId) -> Result<bool, AppError> {
        self.edit(|result| fallback::add_module(result, module))
    }

    pub fn set_refined_goal(&mut self, goal: &str) -> Result<(), AppError> {
        self.edit(|result| edit::set_refined_goal(result, goal))
    }

    pub fn edit_payload(
        &mut self,
        module: ModuleId,
        pointer: &str,
        value: Value,
    ) -> Result<(), AppError> {
        self.edit(|result| edit::edit_payload(result, module, pointer, value))
    }

    pub fn what_if(
        &self,
        module: ModuleId,
        revenue_multiplier: f64,
        cost_multiplier: f64,
    ) -> Result<Vec<PlYear>, AppError> {
        let current = self
            .current
            .as_ref()
            .ok_or_else(|| AppError::Validation("no analysis is open".to_string()))?;
        edit::what_if(current, module, revenue_multiplier, cost_multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::FallbackAnalyzer;
    use crate::models::AnalysisRequest;
    use serde_json::json;

    fn result(text: &str) -> AnalysisResult {
        FallbackAnalyzer.analyze(&AnalysisRequest::new(vec![], vec![], text))
    }

    #[test]
    fn latest_ticket_wins() {
        let mut workspace = Workspace::new();
        let first = workspace.begin();
        let second = workspace.begin();
        assert!(!workspace.accept(first, result("古い依頼です")));
        assert!(workspace.current().is_none());
        assert!(workspace.accept(second, result("新しい依頼です")));
        assert_eq!(workspace.current().unwrap().refined_goal, "新しい依頼です...");
        // a ticket is honoured once
        assert!(!workspace.accept(second, result("重複した配信です")));
    }

    #[test]
    fn restart_discards_in_flight_result() {
        let mut workspace = Workspace::new();
        let ticket = workspace.begin();
        workspace.restart();
        assert!(!workspace.is_pending());
        assert!(!workspace.accept(ticket, result("再開前の依頼")));
        assert!(workspace.current().is_none());
    }

    #[test]
    fn late_result_does_not_overwrite_edits() {
        let mut workspace = Workspace::new();
        workspace.open(result("既存の分析結果です"));
        let ticket = workspace.begin();
        workspace.set_refined_goal("手で直したタイトル").unwrap();
        assert!(!workspace.accept(ticket, result("遅れて届いた結果")));
        assert_eq!(workspace.current().unwrap().refined_goal, "手で直したタイトル");
    }

    #[test]
    fn edits_require_an_open_result() {
        let mut workspace = Workspace::new();
        assert!(workspace.generate_detail(ModuleId::M91).is_err());
        assert!(workspace.edit_payload(ModuleId::M00, "/problems/0", json!("x")).is_err());
        assert!(workspace.what_if(ModuleId::M30, 1.0, 1.0).is_err());
    }

    #[test]
    fn detail_and_custom_module_through_workspace() {
        let mut workspace = Workspace::new();
        workspace.open(result("収支シミュレーションを作りたい"));
        assert_eq!(workspace.generate_detail(ModuleId::M91).unwrap(), DetailOutcome::Generated);
        assert_eq!(
            workspace.generate_detail(ModuleId::M91).unwrap(),
            DetailOutcome::AlreadyPresent
        );
        assert!(workspace.add_custom_module().unwrap());
        assert!(workspace.current().unwrap().is_selected(ModuleId::M99));
    }

    #[test]
    fn chat_is_cleared_by_new_result() {
        let mut workspace = Workspace::new();
        workspace.open(result("テスト用の相談内容"));
        workspace.record_chat("質問", "回答");
        assert_eq!(workspace.chat_history().len(), 2);
        let ticket = workspace.begin();
        assert!(workspace.accept(ticket, result("別の相談内容です")));
        assert!(workspace.chat_history().is_empty());
    }

    #[test]
    fn rejected_edit_keeps_the_pending_request() {
        let mut workspace = Workspace::new();
        workspace.open(result("既存の分析結果です"));
        let ticket = workspace.begin();

        assert!(workspace.set_refined_goal("   ").is_err());
        assert!(workspace
            .edit_payload(ModuleId::M00, "/problems/0", json!(1))
            .is_err());
        assert!(workspace.add_module(ModuleId::M91).is_err());
        assert!(workspace.is_pending());

        assert!(workspace.accept(ticket, result("新しい分析結果です")));
        assert_eq!(workspace.current().unwrap().refined_goal, "新しい分析結果です...");
    }

    #[test]
    fn added_module_gets_detail_through_workspace() {
        let mut workspace = Workspace::new();
        workspace.open(result("業務の効率を上げたい"));
        let ticket = workspace.begin();
        assert!(workspace.add_module(ModuleId::M12).unwrap());
        assert!(!workspace.is_pending());
        assert!(!workspace.accept(ticket, result("遅れて届いた結果")));
        assert_eq!(workspace.generate_detail(ModuleId::M12).unwrap(), DetailOutcome::Generated);
        assert!(workspace.current().unwrap().has_payload(ModuleId::M12));
    }
}
