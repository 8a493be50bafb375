//! Module selection.
//!
//! An ordered table of `(trigger, module, reason)` rules. The mandatory
//! structuring module is always first; every rule whose trigger holds appends
//! its module, then the list is deduplicated and capped.

use crate::catalog::{ModuleId, MANDATORY_MODULE, MAX_SELECTED_MODULES};
use crate::models::{AnalysisRequest, Goal, SelectedModule};

use super::signals::{Signal, SignalProfile};

/// Reason attached to the mandatory module.
pub const MANDATORY_REASON: &str = "全てのプロジェクトの基盤となる構造化のため";

/// Any-of condition over the free text, goal tags and signals.
#[derive(Debug, Clone, Copy)]
pub struct Trigger {
    pub text_markers: &'static [&'static str],
    pub goals: &'static [Goal],
    pub signals: &'static [Signal],
}

impl Trigger {
    pub fn holds(&self, request: &AnalysisRequest, profile: &SignalProfile) -> bool {
        self.text_markers
            .iter()
            .any(|marker| request.free_text.contains(marker))
            || self.goals.iter().any(|goal| request.has_goal(*goal))
            || self.signals.iter().any(|signal| profile.is(*signal))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModuleRule {
    pub module: ModuleId,
    pub reason: &'static str,
    pub trigger: Trigger,
}

const MARKET_TRIGGER: Trigger = Trigger {
    text_markers: &["競合", "市場", "PEST", "分析"],
    goals: &[Goal::Strategy],
    signals: &[],
};

const FUNDING_TRIGGER: Trigger = Trigger {
    text_markers: &["事業計画", "融資"],
    goals: &[Goal::Bizplan],
    signals: &[Signal::Startup],
};

/// Selection rules in evaluation order.
pub const RULES: &[ModuleRule] = &[
    ModuleRule {
        module: ModuleId::M20,
        reason: "売上不振の直接的な打開策を立案するための戦略策定モジュール",
        trigger: Trigger {
            text_markers: &["売上", "集客", "顧客"],
            goals: &[Goal::Revenue, Goal::Strategy],
            signals: &[],
        },
    },
    ModuleRule {
        module: ModuleId::M11,
        reason: "市場環境と競合状況の客観的な把握が必要なため",
        trigger: MARKET_TRIGGER,
    },
    ModuleRule {
        module: ModuleId::M10,
        reason: "広範な市場トレンドとセグメント探索のため",
        trigger: MARKET_TRIGGER,
    },
    ModuleRule {
        module: ModuleId::M30,
        reason: "公的機関や金融機関への提出を見据えた事業計画の整理",
        trigger: FUNDING_TRIGGER,
    },
    ModuleRule {
        module: ModuleId::M31,
        reason: "最適な資金調達手段の選定と制度の整理",
        trigger: FUNDING_TRIGGER,
    },
    ModuleRule {
        module: ModuleId::M50,
        reason: "発信内容の具体化と運用設計の支援",
        trigger: Trigger {
            text_markers: &["コンテンツ", "記事", "SNS", "LINE"],
            goals: &[Goal::Sns],
            signals: &[],
        },
    },
    ModuleRule {
        module: ModuleId::M60,
        reason: "開発要件と画面構成の定義支援",
        trigger: Trigger {
            text_markers: &["アプリ", "システム", "仕様"],
            goals: &[Goal::App, Goal::Spec],
            signals: &[],
        },
    },
    ModuleRule {
        module: ModuleId::M40,
        reason: "業務プロセスの棚卸しと効率化案の提示",
        trigger: Trigger {
            text_markers: &["効率", "DX"],
            goals: &[Goal::Efficiency],
            signals: &[Signal::Corporate],
        },
    },
    ModuleRule {
        module: ModuleId::M91,
        reason: "数値シミュレーションによる妥当性検証のため",
        trigger: Trigger {
            text_markers: &["シミュレーション", "数値", "計算", "収支"],
            goals: &[],
            signals: &[],
        },
    },
];

/// Selects modules for a request. The result always starts with the
/// mandatory module and holds between 1 and `MAX_SELECTED_MODULES` entries.
pub fn select(request: &AnalysisRequest, profile: &SignalProfile) -> Vec<SelectedModule> {
    let mut selected = vec![SelectedModule::new(MANDATORY_MODULE, MANDATORY_REASON)];
    for rule in RULES {
        if rule.trigger.holds(request, profile) {
            selected.push(SelectedModule::new(rule.module, rule.reason));
        }
    }
    dedupe_and_cap(selected)
}

/// Drops repeated ids keeping the first occurrence, then truncates.
pub fn dedupe_and_cap(modules: Vec<SelectedModule>) -> Vec<SelectedModule> {
    let mut unique: Vec<SelectedModule> = Vec::with_capacity(modules.len());
    for module in modules {
        if !unique.iter().any(|m| m.id == module.id) {
            unique.push(module);
        }
    }
    unique.truncate(MAX_SELECTED_MODULES);
    unique
}
