//! Module catalog.
//!
//! The closed set of analysis modules a result can be made of. The table is
//! static reference data shared read-only by every request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of an analysis module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModuleId {
    M00,
    M10,
    M11,
    M12,
    M20,
    M30,
    M31,
    M40,
    M50,
    M60,
    M61,
    M90,
    M91,
    M92,
    M99,
}

/// Broad grouping used by the dashboard sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Structure,
    Analysis,
    Strategy,
    Execution,
    Dev,
    Utility,
}

/// Payload schema a module's content is stored under.
///
/// Several modules share a schema (M10/M11, M30/M31, M60/M61).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    Structure,
    Market,
    Trends,
    Sales,
    BusinessPlan,
    Operations,
    Content,
    App,
    Simulation,
    Custom,
}

/// Static description of one module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    pub id: ModuleId,
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
}

/// The mandatory structuring module every result starts with.
pub const MANDATORY_MODULE: ModuleId = ModuleId::M00;

/// Upper bound on the number of modules attached to one result.
pub const MAX_SELECTED_MODULES: usize = 5;

pub const CATALOG: &[ModuleDescriptor] = &[
    ModuleDescriptor {
        id: ModuleId::M00,
        name: "構造化整理",
        description: "課題/ゴール/前提/制約の整理",
        category: Category::Structure,
    },
    ModuleDescriptor {
        id: ModuleId::M10,
        name: "探索分析",
        description: "PEST/SWOT等を用いた広範な探索",
        category: Category::Analysis,
    },
    ModuleDescriptor {
        id: ModuleId::M11,
        name: "市場・競合・ターゲット",
        description: "3C/競合ベンチ/ペルソナ",
        category: Category::Analysis,
    },
    ModuleDescriptor {
        id: ModuleId::M12,
        name: "トレンド・キーワード",
        description: "SNS・記事向けトレンド解析",
        category: Category::Analysis,
    },
    ModuleDescriptor {
        id: ModuleId::M20,
        name: "販売戦略・方針転換",
        description: "売上不振の打開策提言",
        category: Category::Strategy,
    },
    ModuleDescriptor {
        id: ModuleId::M30,
        name: "事業計画書",
        description: "公的/金融向けテンプレ生成",
        category: Category::Strategy,
    },
    ModuleDescriptor {
        id: ModuleId::M31,
        name: "資金調達支援",
        description: "融資/補助金/制度整理",
        category: Category::Strategy,
    },
    ModuleDescriptor {
        id: ModuleId::M40,
        name: "業務改善・経理",
        description: "業務棚卸し/効率化",
        category: Category::Execution,
    },
    ModuleDescriptor {
        id: ModuleId::M50,
        name: "SNS・記事・発信",
        description: "コンテンツ企画/運用設計",
        category: Category::Execution,
    },
    ModuleDescriptor {
        id: ModuleId::M60,
        name: "アプリ開発支援",
        description: "要件/画面/機能定義",
        category: Category::Dev,
    },
    ModuleDescriptor {
        id: ModuleId::M61,
        name: "システム仕様書",
        description: "技術仕様/画面構成詳細",
        category: Category::Dev,
    },
    ModuleDescriptor {
        id: ModuleId::M90,
        name: "出力オーケストレーター",
        description: "PDF/Word/MD生成",
        category: Category::Utility,
    },
    ModuleDescriptor {
        id: ModuleId::M91,
        name: "シミュレーション生成",
        description: "計算式入りSpreadsheet生成",
        category: Category::Utility,
    },
    ModuleDescriptor {
        id: ModuleId::M92,
        name: "履歴管理",
        description: "保存/再編集",
        category: Category::Utility,
    },
    ModuleDescriptor {
        id: ModuleId::M99,
        name: "カスタムモジュール",
        description: "ユーザー定義の汎用モジュール",
        category: Category::Utility,
    },
];

impl ModuleId {
    pub const ALL: [ModuleId; 15] = [
        ModuleId::M00,
        ModuleId::M10,
        ModuleId::M11,
        ModuleId::M12,
        ModuleId::M20,
        ModuleId::M30,
        ModuleId::M31,
        ModuleId::M40,
        ModuleId::M50,
        ModuleId::M60,
        ModuleId::M61,
        ModuleId::M90,
        ModuleId::M91,
        ModuleId::M92,
        ModuleId::M99,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ModuleId::M00 => "M00",
            ModuleId::M10 => "M10",
            ModuleId::M11 => "M11",
            ModuleId::M12 => "M12",
            ModuleId::M20 => "M20",
            ModuleId::M30 => "M30",
            ModuleId::M31 => "M31",
            ModuleId::M40 => "M40",
            ModuleId::M50 => "M50",
            ModuleId::M60 => "M60",
            ModuleId::M61 => "M61",
            ModuleId::M90 => "M90",
            ModuleId::M91 => "M91",
            ModuleId::M92 => "M92",
            ModuleId::M99 => "M99",
        }
    }

    pub fn descriptor(&self) -> &'static ModuleDescriptor {
        // CATALOG lists every variant in declaration order.
        &CATALOG[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }

    /// Schema of this module's payload, `None` for modules that only drive
    /// the surrounding application (export, history).
    pub fn payload_kind(&self) -> Option<PayloadKind> {
        match self {
            ModuleId::M00 => Some(PayloadKind::Structure),
            ModuleId::M10 | ModuleId::M11 => Some(PayloadKind::Market),
            ModuleId::M12 => Some(PayloadKind::Trends),
            ModuleId::M20 => Some(PayloadKind::Sales),
            ModuleId::M30 | ModuleId::M31 => Some(PayloadKind::BusinessPlan),
            ModuleId::M40 => Some(PayloadKind::Operations),
            ModuleId::M50 => Some(PayloadKind::Content),
            ModuleId::M60 | ModuleId::M61 => Some(PayloadKind::App),
            ModuleId::M91 => Some(PayloadKind::Simulation),
            ModuleId::M99 => Some(PayloadKind::Custom),
            ModuleId::M90 | ModuleId::M92 => None,
        }
    }

    /// Whether the payload is produced together with the result rather than
    /// on first view.
    pub fn is_eager(&self) -> bool {
        matches!(
            self.payload_kind(),
            Some(
                PayloadKind::Structure
                    | PayloadKind::Market
                    | PayloadKind::Sales
                    | PayloadKind::BusinessPlan
                    | PayloadKind::Operations
                    | PayloadKind::Content
                    | PayloadKind::App
            )
        )
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ModuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        ModuleId::ALL
            .into_iter()
            .find(|id| id.code() == code)
            .ok_or_else(|| format!("unknown module id: {code}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_in_declaration_order() {
        assert_eq!(CATALOG.len(), ModuleId::ALL.len());
        for (index, id) in ModuleId::ALL.iter().enumerate() {
            assert_eq!(CATALOG[index].id, *id);
            assert_eq!(id.descriptor().id, *id);
        }
    }

    #[test]
    fn parses_codes() {
        assert_eq!("M31".parse::<ModuleId>(), Ok(ModuleId::M31));
        assert_eq!(" M00 ".parse::<ModuleId>(), Ok(ModuleId::M00));
        assert!("M21".parse::<ModuleId>().is_err());
    }

    #[test]
    fn serializes_as_code() {
        assert_eq!(serde_json::to_string(&ModuleId::M12).unwrap(), "\"M12\"");
    }

    #[test]
    fn utility_modules_have_no_payload() {
        assert_eq!(ModuleId::M90.payload_kind(), None);
        assert_eq!(ModuleId::M92.payload_kind(), None);
        assert!(!ModuleId::M90.is_eager());
    }

    #[test]
    fn lazy_modules() {
        for id in [ModuleId::M12, ModuleId::M91, ModuleId::M99] {
            assert!(id.payload_kind().is_some());
            assert!(!id.is_eager(), "{id} should be lazy");
        }
        assert!(MANDATORY_MODULE.is_eager());
    }
}
