pub mod analysis;
pub mod dti;
pub mod monthly_cost;
pub mod params;
pub mod prequalification;

pub use analysis::{analyze_mortgage, MortgageAnalysis, MortgageInput};
pub use dti::{calculate_dti, DtiSnapshot, DtiStatus};
pub use monthly_cost::{calculate_monthly_cost, MonthlyCostBreakdown};
pub use params::{CostRates, TaxProfile};
pub use prequalification::{estimate_pre_qualification, ConfidenceTier, PreQualificationResult};
