//! Crash-game simulation core
//!
//! Pure game logic: crash-point sampling, the AI crowd, human bet slots,
//! and the round state machine that drives them. Nothing in this module
//! performs I/O beyond balance persistence, and nothing renders.

pub mod betting;
pub mod crash_point;
pub mod players;
pub mod round;

pub use betting::{BetSlot, BettingSession};
pub use crash_point::{BucketCrashGenerator, CrashSampler, FixedCrashSampler};
pub use players::{AiPlayer, PlayerPool};
pub use round::{CashoutReceipt, RoundEngine, RoundSnapshot, RoundStartedInfo, RoundState, TickOutcome};
