pub mod amortization;
pub mod closing_costs;
pub mod mortgage;
pub mod refinance;
