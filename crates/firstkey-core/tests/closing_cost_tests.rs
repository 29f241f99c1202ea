use firstkey_core::closing_costs::{
    analyze_closing_costs, estimate_closing_costs, ClosingCostInput, ClosingCostSection,
    FEE_TABLE,
};
use firstkey_core::defaults::MortgageDefaults;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_default_cash_to_close() {
    let d = MortgageDefaults::default().cash_to_close;
    let out = analyze_closing_costs(&ClosingCostInput {
        home_price: d.home_price,
        down_payment: d.down_payment,
    })
    .unwrap();
    let b = out.result;
    assert_eq!(b.total_closing_costs, dec!(26346.168));
    assert_eq!(b.total_cash_to_close, dec!(134346.168));
    assert_eq!(b.lender_credits, dec!(-860.76));
}

#[test]
fn test_lender_credit_is_only_negative_line() {
    let b = estimate_closing_costs(dec!(400000), dec!(80000));
    let negatives: Vec<&str> = b
        .line_items
        .iter()
        .filter(|i| i.amount < Decimal::ZERO)
        .map(|i| i.key.as_str())
        .collect();
    assert_eq!(negatives, vec!["lender_credits"]);
}

#[test]
fn test_cash_to_close_is_down_payment_plus_costs() {
    for (price, down) in [(dec!(250000), dec!(12500)), (dec!(1000000), dec!(250000))] {
        let b = estimate_closing_costs(price, down);
        assert_eq!(b.total_cash_to_close, down + b.total_closing_costs);
        assert_eq!(
            b.total_closing_costs,
            b.total_loan_costs + b.total_other_costs + b.lender_credits
        );
    }
}

#[test]
fn test_section_titles_cover_table() {
    let mut sections: Vec<ClosingCostSection> = FEE_TABLE.iter().map(|f| f.section).collect();
    sections.dedup();
    let titles: Vec<&str> = sections.iter().map(|s| s.title()).collect();
    assert_eq!(
        titles,
        vec![
            "A. Origination Charges",
            "B. Services You Cannot Shop For",
            "C. Services You Can Shop For",
            "E. Taxes and Other Government Fees",
            "F. Prepaids",
            "G. Initial Escrow Payment at Closing",
            "H. Other",
            "Lender Credits",
        ]
    );
}

#[test]
fn test_costs_scale_linearly_with_price() {
    let a = estimate_closing_costs(dec!(300000), Decimal::ZERO);
    let b = estimate_closing_costs(dec!(600000), Decimal::ZERO);
    assert_eq!(b.total_closing_costs, a.total_closing_costs * dec!(2));
    assert_eq!(a.closing_costs_pct, b.closing_costs_pct);
}
