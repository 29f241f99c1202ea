pub mod biweekly;
pub mod schedule;

pub use biweekly::{compare_schedules, ScheduleComparison, StrategyOutcome};
pub use schedule::{amortize, AmortizationResult, AmortizationRow};
