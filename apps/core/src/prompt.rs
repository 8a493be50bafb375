//! Prompts sent to the hosted model.

use chrono::NaiveDate;

use crate::catalog::CATALOG;
use crate::models::{AnalysisRequest, AnalysisResult, ChatTurn};

/// Fixed acknowledgement placed after the chat preamble.
pub const CHAT_ACKNOWLEDGEMENT: &str = "承知いたしました。プロジェクトの背景と現状の分析結果を全てのモジュールについて理解しました。どのような観点でもアドバイス可能です。";

const OUTPUT_SHAPE: &str = r#"{
  "refinedGoal": "再定義された具体的なゴール",
  "problemStructure": "課題の構造化サマリ（150文字程度）",
  "theme": "プロジェクトのテーマ（短く）",
  "selectedModules": [
    { "id": "Mxx", "name": "モジュール名", "reason": "選定した具体的な理由" }
  ],
  "m00Data": {
    "problems": ["課題1", "課題2"],
    "goals": ["ゴール1", "ゴール2"],
    "constraints": ["制限1", "制限2"],
    "assumptions": ["前提1", "前提2"]
  },
  "m10Data": {
    "marketSize": "市場規模",
    "growthRate": "成長率",
    "competitors": [{ "name": "競合A", "share": 30, "strength": "強み" }],
    "trends": ["トレンド1"]
  },
  "m20Data": {
    "targetPersona": "人物像",
    "coreValue": "強み",
    "channels": ["媒体"],
    "actionPlans": [{ "task": "タスク", "priority": "High" }]
  },
  "m30Data": {
    "plSimulation": [{ "year": 1, "revenue": 100, "profit": 10 }],
    "milestones": [{ "phase": "開発", "date": "Q1", "event": "マイルストーン" }],
    "fundingNeeds": "資金ニーズ"
  },
  "m40Data": {
    "currentFlow": ["現状1", "現状2"],
    "bottlenecks": ["課題1", "課題2"],
    "improvementPlan": ["改善策1", "改善策2"]
  },
  "m50Data": {
    "themes": ["テーマ1", "テーマ2"],
    "schedule": ["投稿頻度など"],
    "kpis": [{ "metric": "指標名", "target": "目標値" }]
  },
  "m60Data": {
    "concept": "アプリのコンセプト",
    "features": ["機能1", "機能2"],
    "techStack": ["技術1"]
  },
  "aiNote": "AIからの判断の背景やアドバイス",
  "tags": ["タグ1", "タグ2"]
}"#;

/// Builds the analysis prompt. `today` is passed in so the text is
/// reproducible.
pub fn analysis_prompt(request: &AnalysisRequest, today: NaiveDate) -> String {
    let goals = request
        .goals
        .iter()
        .map(|goal| goal.label())
        .collect::<Vec<_>>()
        .join(", ");
    let client_types = request.client_types.join(", ");
    let modules = CATALOG
        .iter()
        .map(|m| format!("- {}: {} ({})", m.id, m.name, m.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"あなたはエリート戦略コンサルタントです。日本のクライアントに対して、最高レベルの戦略案を提示してください。

## 前提条件
- 現在日付: {date} (この時点での最新トレンドや市場状況を考慮すること)
- 言語: 日本語

## 入力データ
- 明示されたゴール: {goals}
- クライアント性質: {client_types}
- 相談内容詳細: "{free_text}"

## 搭載モジュール一覧 (キー: 名前)
{modules}

## 思考ルール
1. M00(構造化)は必須。
2. 自由入力から「意図」を読み取り、スコアリングして優先順位を決定。
3. 全項目を出すのは禁止。本質的に必要と思われるものだけに絞る（3〜5個）。
4. ゴールが明確ならM10(探索)は抑制する。

## 出力形式 (JSON)
以下の構造でJSONのみを返してください。
{shape}
"#,
        date = today.format("%Y/%m/%d"),
        free_text = request.free_text,
        shape = OUTPUT_SHAPE,
    )
}

/// Conversation sent for a follow-up question: a preamble carrying the
/// result, the fixed acknowledgement, the prior turns, then the new message.
pub fn chat_turns(
    result: &AnalysisResult,
    history: &[ChatTurn],
    message: &str,
) -> Result<Vec<ChatTurn>, serde_json::Error> {
    let snapshot = serde_json::to_string(result)?;
    let mut turns = Vec::with_capacity(history.len() + 3);
    turns.push(ChatTurn::user(format!(
        "あなたは戦略コンサルタントです。以下のプロジェクト分析結果を前提に、ユーザーの質問に答えてください。回答は必ず日本語で行ってください。\n\n{snapshot}"
    )));
    turns.push(ChatTurn::model(CHAT_ACKNOWLEDGEMENT));
    turns.extend(history.iter().cloned());
    turns.push(ChatTurn::user(message));
    Ok(turns)
}
