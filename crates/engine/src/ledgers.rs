//! The module contains the `Ledger` struct and its persistence model.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError, QuickAddItem, Transaction};

/// Daily pocket ceiling a fresh ledger starts with, in minor units.
pub const DEFAULT_DAILY_LIMIT_MINOR: i64 = 200_000;

/// A user's ledger.
///
/// One row per user, holding both wallet balances and the daily spend
/// counter. Balances are signed minor units and may go negative: the ledger
/// tracks intent, not a real account with overdraft protection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub user_id: String,
    /// Everyday spending money ("pocket").
    pub pocket_balance_minor: i64,
    /// Pooled savings ("vault"), the sole funding source for goals.
    pub vault_balance_minor: i64,
    /// Configured daily pocket spend ceiling.
    pub daily_limit_minor: i64,
    /// Cumulative pocket expenses for the current period. Only
    /// `reset_daily_spend` zeroes it; nothing resets it implicitly.
    pub spent_today_minor: i64,
    pub currency: Currency,
}

impl Ledger {
    pub fn new(user_id: String, currency: Currency) -> Self {
        Self {
            user_id,
            pocket_balance_minor: 0,
            vault_balance_minor: 0,
            daily_limit_minor: DEFAULT_DAILY_LIMIT_MINOR,
            spent_today_minor: 0,
            currency,
        }
    }
}

/// A ledger together with its derived views, read at a single point.
#[derive(Clone, Debug)]
pub struct LedgerSnapshot {
    pub ledger: Ledger,
    /// Quick-add shortcuts, position ascending.
    pub quick_add_items: Vec<QuickAddItem>,
    /// Most-recent-first, bounded by the caller's limit.
    pub recent_transactions: Vec<Transaction>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ledgers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub pocket_balance_minor: i64,
    pub vault_balance_minor: i64,
    pub daily_limit_minor: i64,
    pub spent_today_minor: i64,
    pub currency: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Ledger> for ActiveModel {
    fn from(ledger: &Ledger) -> Self {
        Self {
            user_id: ActiveValue::Set(ledger.user_id.clone()),
            pocket_balance_minor: ActiveValue::Set(ledger.pocket_balance_minor),
            vault_balance_minor: ActiveValue::Set(ledger.vault_balance_minor),
            daily_limit_minor: ActiveValue::Set(ledger.daily_limit_minor),
            spent_today_minor: ActiveValue::Set(ledger.spent_today_minor),
            currency: ActiveValue::Set(ledger.currency.code().to_string()),
        }
    }
}

impl TryFrom<Model> for Ledger {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: model.user_id,
            pocket_balance_minor: model.pocket_balance_minor,
            vault_balance_minor: model.vault_balance_minor,
            daily_limit_minor: model.daily_limit_minor,
            spent_today_minor: model.spent_today_minor,
            currency: Currency::try_from(model.currency.as_str())?,
        })
    }
}
