pub mod comparison;

pub use comparison::{
    analyze_refinance, compare_refinance, remaining_balance, CurrentLoan, NewLoan,
    RefinanceAnalysis, RefinanceComparison, RefinanceInput,
};
