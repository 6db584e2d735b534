//! Settlement engine for shared expenses.
//!
//! Given the participants of a bill and the expenses they shared, the engine
//! computes each participant's fair share, their net balance and a list of
//! transfers that settles every debt. Everything is a pure function of an
//! in-memory snapshot: no I/O, no state carried between calls.
//!
//! ```rust
//! use engine::{Expense, Money, Participant, SettlementMode, settle};
//!
//! let alice = Participant::new("Alice");
//! let bob = Participant::new("Bob");
//! let dinner = Expense::new("Dinner", Money::from_units(300))
//!     .paid_by(Some(alice.id))
//!     .including([alice.id, bob.id]);
//!
//! let settlement = settle(&[alice.clone(), bob.clone()], &[dinner], SettlementMode::Pairwise);
//! assert_eq!(settlement.balance_of(alice.id), Money::from_units(150));
//! assert_eq!(settlement.transfers[0].from, bob.id);
//! ```

pub use allocation::{Allocations, ExpenseShares, allocate};
pub use balances::{Balance, compute_balances};
pub use cache::SettlementCache;
pub use currency::Currency;
pub use error::EngineError;
pub use expenses::{Expense, Inclusion};
pub use ledger::{Give, Ledger, LedgerAccount, Take, build_ledger};
pub use money::{MAX_UNITS, Money};
pub use participants::{Participant, UNNAMED_LABEL};
pub use session::Session;
pub use settlement::{ParticipantSummary, Settlement, SettlementMode, settle};
pub use transfers::{Transfer, flatten};

mod allocation;
mod balances;
mod cache;
mod currency;
mod error;
mod expenses;
mod ledger;
mod money;
mod participants;
mod session;
mod settlement;
mod transfers;

pub type ResultEngine<T> = Result<T, EngineError>;
