//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use chrono::{DateTime, NaiveDate, Utc};

use crate::{TransactionKind, WalletKind};

/// Record a deposit or expense against one of the two wallets.
#[derive(Clone, Debug)]
pub struct TransactionCmd {
    pub user_id: String,
    pub amount_minor: i64,
    pub kind: TransactionKind,
    pub wallet: WalletKind,
    pub category: String,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl TransactionCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        amount_minor: i64,
        kind: TransactionKind,
        wallet: WalletKind,
        category: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            amount_minor,
            kind,
            wallet,
            category: category.into(),
            note: None,
            occurred_at,
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Create a savings goal; the priority is assigned by the registry.
#[derive(Clone, Debug)]
pub struct GoalNewCmd {
    pub user_id: String,
    pub name: String,
    pub target_amount_minor: i64,
    pub deadline: Option<NaiveDate>,
}

impl GoalNewCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, target_amount_minor: i64) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            target_amount_minor,
            deadline: None,
        }
    }

    #[must_use]
    pub fn deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }
}
