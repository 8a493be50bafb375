//! Canned example content for the fallback generator.
//!
//! Each function returns one hand-written payload for one variant. Nothing
//! here branches on the request; the choice of variant lives in
//! [`super::generator`].

use crate::payloads::{
    ActionPlan, AppData, BusinessPlanData, Competitor, ContentData, CustomData, Evidence, Kpi,
    MarketData, Milestone, OperationsData, Parameter, PlYear, PlatformStrategy, Priority,
    SalesData, ScenarioOutcome, SimulationData, StructureData, TrendData, TrendingKeyword,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureVariant {
    Startup,
    Established,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketVariant {
    Startup,
    Personal,
    Established,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesAudience {
    Individual,
    Business,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuePitch {
    Disruptive,
    Heritage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanVariant {
    /// Loss in year 1, rapid growth afterwards.
    Startup,
    /// Small home-based business, profitable from the start.
    SideBusiness,
    /// Steady modest growth.
    Established,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationsVariant {
    Corporate,
    SmallBusiness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentVariant {
    Personal,
    Business,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppVariant {
    Startup,
    Established,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteVariant {
    Startup,
    Established,
}

pub const DEFAULT_REFINED_GOAL: &str = "プロジェクトの構造化と戦略立案";
pub const DEFAULT_PROBLEM_STRUCTURE: &str = "現状の課題は、リソースの分散と優先順位の不明確さにあります。AIによる構造化を通じて、最もインパクトの大きい施策に集中できる環境を整えます。";
pub const DEFAULT_THEME: &str = "事業構想";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn competitor(name: &str, share: f64, strength: &str) -> Competitor {
    Competitor {
        name: name.to_string(),
        share,
        strength: strength.to_string(),
    }
}

fn milestone(phase: &str, date: &str, event: &str) -> Milestone {
    Milestone {
        phase: phase.to_string(),
        date: date.to_string(),
        event: event.to_string(),
    }
}

fn pl(year: u32, revenue: i64, profit: i64) -> PlYear {
    PlYear { year, revenue, profit }
}

pub fn structure(variant: StructureVariant) -> StructureData {
    let (problems, goals) = match variant {
        StructureVariant::Startup => (
            ["PMF（市場適合）未達成", "ランウェイ（資金）の枯渇懸念", "開発リソース不足"],
            ["月次成長率20%の達成", "次回ラウンドでの資金調達", "コアファンの獲得"],
        ),
        StructureVariant::Established => (
            ["既存事業の成長鈍化", "アナログ業務による非効率", "新規客の獲得コスト増"],
            ["業務時間30%削減", "粗利率の5pt改善", "既存顧客単価アップ"],
        ),
    };
    StructureData {
        problems: strings(&problems),
        goals: strings(&goals),
        constraints: strings(&["限られた予算", "即効性が求められる", "人的リソースの制約"]),
        assumptions: strings(&["潜在需要は確実に存在する", "競合はまだ本格参入していない"]),
    }
}

pub fn market(variant: MarketVariant) -> MarketData {
    match variant {
        MarketVariant::Startup => MarketData {
            market_size: "2,500億円 (年平均成長率 15.2%)".to_string(),
            growth_rate: "+120% (YoY)".to_string(),
            competitors: vec![
                competitor("Unicorn A", 45.0, "ネットワーク効果"),
                competitor("Incumbent B", 30.0, "顧客基盤"),
                competitor("New Entry C", 5.0, "低価格"),
            ],
            trends: strings(&["AIによる自動化の加速", "CtoC取引の拡大", "法規制の緩和"]),
            evidence: vec![],
        },
        MarketVariant::Personal => MarketData {
            market_size: "500億円".to_string(),
            growth_rate: "105%".to_string(),
            competitors: vec![
                competitor("既存プラットフォーム", 70.0, "集客力"),
                competitor("個人発信者", 20.0, "親近感"),
            ],
            trends: strings(&["リモートワークの定着", "個のスキルの収益化", "マイクロ法人"]),
            evidence: vec![
                Evidence {
                    source: "フリーランス実態調査 2024".to_string(),
                    url: "https://www.lancers.co.jp/news/pr/21568/".to_string(),
                },
                Evidence {
                    source: "総務省: 労働力調査報告".to_string(),
                    url: "https://www.stat.go.jp/data/roudou/index.html".to_string(),
                },
            ],
        },
        MarketVariant::Established => MarketData {
            market_size: "1,200億円 (安定推移)".to_string(),
            growth_rate: "+2.5% (YoY)".to_string(),
            competitors: vec![
                competitor("大手A社", 60.0, "ブランド力"),
                competitor("地場B社", 20.0, "地域密着"),
                competitor("ネット専業C", 10.0, "価格競争力"),
            ],
            trends: strings(&["高齢化による需要変化", "原材料費の高騰", "職人不足"]),
            evidence: vec![],
        },
    }
}

pub fn trends() -> TrendData {
    let keyword = |word: &str, volume: &str, growth: &str| TrendingKeyword {
        word: word.to_string(),
        volume: volume.to_string(),
        growth: growth.to_string(),
    };
    TrendData {
        trending_keywords: vec![
            keyword("生成AI 活用事例", "24,000", "+150%"),
            keyword("DX 伴走支援", "12,500", "+85%"),
            keyword("AIエージェント 開発", "8,200", "+320%"),
        ],
        related_queries: strings(&[
            "AI 導入 費用",
            "中小企業 生成AI 補助金",
            "ChatGPT 業務効率化 事例",
        ]),
        platform_strategy: vec![
            PlatformStrategy {
                platform: "X (Twitter)".to_string(),
                approach: "最新のAIニュース解説と、現場での『具体的な失敗談』の共有で信頼を獲得。"
                    .to_string(),
            },
            PlatformStrategy {
                platform: "Note / 記事".to_string(),
                approach: "『1ヶ月で100時間削減した具体的な方法』といった図解入りの詳細実装ガイド。"
                    .to_string(),
            },
        ],
    }
}

pub fn sales(audience: SalesAudience, pitch: ValuePitch) -> SalesData {
    let (persona, channels) = match audience {
        SalesAudience::Individual => (
            "「なんとなく不安」を抱える20代後半",
            ["Instagramリール", "note", "YouTube Shorts"],
        ),
        SalesAudience::Business => (
            "決裁権を持つ中小企業経営者",
            ["展示会", "業界紙", "代理店営業"],
        ),
    };
    let core_value = match pitch {
        ValuePitch::Disruptive => "業界を破壊する圧倒的なユーザー体験",
        ValuePitch::Heritage => "創業50年の信頼と確かな技術力",
    };
    let plan = |task: &str, priority: Priority| ActionPlan {
        task: task.to_string(),
        priority,
    };
    SalesData {
        target_persona: persona.to_string(),
        core_value: core_value.to_string(),
        channels: strings(&channels),
        action_plans: vec![
            plan("ターゲットへのヒアリング（N=5）", Priority::High),
            plan("競合サービスの徹底分析と比較表作成", Priority::High),
            plan("MVP（最小機能版）の仕様策定", Priority::Mid),
        ],
    }
}

pub fn business_plan(variant: PlanVariant) -> BusinessPlanData {
    match variant {
        PlanVariant::Startup => BusinessPlanData {
            pl_simulation: vec![pl(1, 0, -800), pl(2, 5000, -200), pl(3, 12000, 3000)],
            milestones: vec![
                milestone("Seed", "2024/Q2", "MVPリリース・検証"),
                milestone("Series A", "2025/Q1", "PMF達成・組織拡大"),
                milestone("Series B", "2026/Q3", "全国展開・黒字化"),
            ],
            funding_needs: "向こう18ヶ月で3,000万円（人件費: 1,500万、マーケ: 1,000万、その他: 500万）"
                .to_string(),
        },
        PlanVariant::SideBusiness => BusinessPlanData {
            pl_simulation: vec![
                pl(1, 1_200_000, 1_000_000),
                pl(2, 1_800_000, 1_500_000),
                pl(3, 2_400_000, 2_000_000),
                pl(4, 3_000_000, 2_500_000),
                pl(5, 4_000_000, 3_200_000),
            ],
            milestones: vec![
                milestone("集客開始", "1ヶ月目", "サービス設計・SNS開設"),
                milestone("検証", "3ヶ月目", "初収益達成 (3-5万円)"),
                milestone("安定", "6ヶ月目", "月収10万円達成"),
            ],
            funding_needs: "初期投資として5万円（機材・ツール代）程度を想定。自宅作業のため、大きな固定費は発生せず、初月から黒字化を目指す構成。"
                .to_string(),
        },
        PlanVariant::Established => BusinessPlanData {
            pl_simulation: vec![pl(1, 3000, 300), pl(2, 3500, 500), pl(3, 4200, 800)],
            milestones: vec![
                milestone("基盤強化", "3ヶ月後", "新システム安定稼働"),
                milestone("販路拡大", "6ヶ月後", "新規エリアへの出店"),
                milestone("多角化", "1年後", "新商品ラインナップ追加"),
            ],
            funding_needs: "設備投資として500万円（自己資金＋公庫融資）".to_string(),
        },
    }
}

pub fn operations(variant: OperationsVariant) -> OperationsData {
    match variant {
        OperationsVariant::Corporate => OperationsData {
            current_flow: strings(&[
                "FAX受注",
                "基幹システム手入力",
                "在庫確認(電話)",
                "出荷指示書作成",
            ]),
            bottlenecks: strings(&[
                "手入力による誤発注(月3件)",
                "電話確認の待機時間",
                "紙ベースの保管コスト",
            ]),
            improvement_plan: strings(&[
                "Web受発注システムの導入",
                "在庫連携APIの実装",
                "完全ペーパーレス化",
            ]),
        },
        OperationsVariant::SmallBusiness => OperationsData {
            current_flow: strings(&[
                "問い合わせ確認",
                "個別メール返信",
                "入金確認",
                "サービス提供",
            ]),
            bottlenecks: strings(&["返信漏れ", "入金消し込みの手間", "リマインド忘れ"]),
            improvement_plan: strings(&[
                "自動送信ツールの活用",
                "決済リンクの自動発行",
                "タスク管理一元化",
            ]),
        },
    }
}

pub fn content(variant: ContentVariant) -> ContentData {
    let themes = match variant {
        ContentVariant::Personal => ["副業の始め方", "失敗談", "収益公開"],
        ContentVariant::Business => ["専門知識の解説", "お客様の声", "開発裏話"],
    };
    let kpi = |metric: &str, target: &str| Kpi {
        metric: metric.to_string(),
        target: target.to_string(),
    };
    ContentData {
        themes: strings(&themes),
        schedule: strings(&["毎日 20:00", "土日は朝・夜 2回"]),
        kpis: vec![
            kpi("フォロワー増加数", "+500/月"),
            kpi("エンゲージメント率", "5.0%"),
            kpi("CV数", "10件/月"),
        ],
    }
}

pub fn app(variant: AppVariant) -> AppData {
    let (concept, signature_feature) = match variant {
        AppVariant::Startup => ("業界初のAIマッチングアプリ", "AIマッチング"),
        AppVariant::Established => ("既存会員向け会員証アプリ", "ポイント管理"),
    };
    AppData {
        concept: concept.to_string(),
        features: strings(&[
            "ログイン/認証",
            "プッシュ通知",
            "マイページ",
            signature_feature,
            "決済機能",
        ]),
        tech_stack: strings(&[
            "Flutter (Cross Platform)",
            "Firebase (Backend)",
            "Stripe (Payment)",
        ]),
    }
}

pub fn simulation() -> SimulationData {
    let scenario = |name: &str, result: &str, probability: &str| ScenarioOutcome {
        name: name.to_string(),
        result: result.to_string(),
        probability: probability.to_string(),
    };
    let parameter = |name: &str, value: &str| Parameter {
        name: name.to_string(),
        value: value.to_string(),
    };
    SimulationData {
        scenarios: vec![
            scenario("楽観ケース (Best)", "利益率 25%達成", "20%"),
            scenario("基本ケース (Base)", "利益率 15%達成", "60%"),
            scenario("保守ケース (Worst)", "利益率 5%確保", "20%"),
        ],
        parameters: vec![
            parameter("顧客獲得単価 (CPA)", "15,000円"),
            parameter("LTV (ライフタイムバリュー)", "120,000円"),
            parameter("月間成約数", "30件"),
        ],
    }
}

pub fn custom() -> CustomData {
    CustomData {
        overview: "カスタムモジュールの分析結果".to_string(),
        details: strings(&[
            "ユーザー定義の要件に基づく詳細分析",
            "課題解決のためのステップ案",
            "必要なリソースの定義",
        ]),
    }
}

/// Advisor note and tags for the whole result.
pub fn note(variant: NoteVariant) -> (&'static str, Vec<String>) {
    match variant {
        NoteVariant::Startup => (
            "スタートアップにおいてはスピードが命です。M30で資金計画を固めつつ、M50で認知を広げる同時並行アプローチを推奨します。",
            strings(&["急成長", "資金調達", "ピボット"]),
        ),
        NoteVariant::Established => (
            "既存の強みを活かしつつ、M40での業務効率化で利益体質を作り、生まれた余力をM20の新規開拓に回すのが定石です。",
            strings(&["業務改善", "利益率向上", "DX"]),
        ),
    }
}
