pub mod estimator;

pub use estimator::{
    analyze_closing_costs, estimate_closing_costs, ClosingCostBreakdown, ClosingCostInput,
    ClosingCostLineItem, ClosingCostSection, FEE_TABLE,
};
