//! Core ledger and goal-funding engine.
//!
//! The engine owns four things:
//!
//! - the per-user **ledger** (pocket/vault balances, daily spend counter)
//! - the append-only **transaction log**
//! - the **goal registry** with its strict priority ranking
//! - the pure **funding allocator** that maps the pooled vault balance onto
//!   goals by greedy waterfall
//!
//! Everything else (auth, transport, rendering) lives outside this crate.

pub use commands::{GoalNewCmd, TransactionCmd};
pub use currency::Currency;
pub use error::EngineError;
pub use funding::FundedGoal;
pub use goals::{Goal, ReorderDirection};
pub use ledgers::{DEFAULT_DAILY_LIMIT_MINOR, Ledger, LedgerSnapshot};
pub use ops::{Engine, EngineBuilder};
pub use quick_add::{DEFAULT_QUICK_ADD_ICON, QuickAddItem};
pub use transactions::{Transaction, TransactionKind, WalletKind};

mod commands;
mod currency;
mod error;
pub mod funding;
mod goals;
mod ledgers;
mod ops;
mod quick_add;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;
