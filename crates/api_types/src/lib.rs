use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Lkr,
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterUser {
        pub username: String,
        pub password: String,
        pub currency: Option<Currency>,
    }
}

pub mod wallet {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Deposit,
        Expense,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum WalletKind {
        Pocket,
        Vault,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        /// Must be > 0. The kind defines which way the balance moves.
        pub amount_minor: i64,
        pub kind: TransactionKind,
        pub wallet: WalletKind,
        pub category: String,
        pub note: Option<String>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        /// If absent, the server uses now().
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub wallet: WalletKind,
        pub amount_minor: i64,
        pub category: String,
        pub note: Option<String>,
        /// RFC3339 timestamp, including timezone offset.
        pub occurred_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct QuickAddItemView {
        pub name: String,
        pub amount_minor: i64,
        pub icon: String,
    }

    /// Full wallet screen payload: balances plus the derived views, read
    /// from one consistent snapshot.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletSnapshot {
        pub pocket_balance_minor: i64,
        pub vault_balance_minor: i64,
        pub daily_limit_minor: i64,
        pub spent_today_minor: i64,
        pub currency: Currency,
        pub quick_add_items: Vec<QuickAddItemView>,
        /// Most-recent-first, bounded.
        pub transactions: Vec<TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyLimitUpdate {
        pub limit_minor: i64,
    }

    /// Ledger header fields without the derived views, as returned by the
    /// limit/reset endpoints.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerView {
        pub pocket_balance_minor: i64,
        pub vault_balance_minor: i64,
        pub daily_limit_minor: i64,
        pub spent_today_minor: i64,
        pub currency: Currency,
    }
}

pub mod goal {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ReorderDirection {
        Up,
        Down,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        pub name: String,
        /// Must be > 0.
        pub target_amount_minor: i64,
        pub deadline: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalCompletedUpdate {
        pub is_completed: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalReorder {
        pub goal_id: Uuid,
        pub direction: ReorderDirection,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub name: String,
        pub target_amount_minor: i64,
        /// 1 is the highest priority; lists are sorted ascending.
        pub priority: i32,
        pub is_completed: bool,
        pub deadline: Option<NaiveDate>,
    }

    /// A goal plus its waterfall share of the vault, recomputed per request.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalFundingView {
        pub id: Uuid,
        pub name: String,
        pub target_amount_minor: i64,
        pub saved_amount_minor: i64,
        pub priority: i32,
        pub is_completed: bool,
        pub deadline: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalListResponse {
        pub goals: Vec<GoalView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalFundingResponse {
        pub goals: Vec<GoalFundingView>,
    }
}
