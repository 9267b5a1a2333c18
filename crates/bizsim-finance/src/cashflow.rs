//! Cash-flow waterfall with the short-term borrowing plug.

use bizsim_core::{CashFlowStatement, DecisionSnapshot, FinancialReport, ReferenceParams};
use rust_decimal::Decimal;
use tracing::debug;

/// Resolve the single global cash-flow statement for a round.
///
/// The short-term plug borrows exactly enough to keep ending cash at or above
/// the minimum-cash floor. It never goes negative: excess cash is retained,
/// never swept into a forced paydown.
pub fn cash_flow(
    snapshot: &DecisionSnapshot,
    params: &ReferenceParams,
    financials: &FinancialReport,
) -> CashFlowStatement {
    let ebitda = financials.global.taxable + params.depreciation_addback;
    let tax_paid = financials.global.tax;
    let investment = snapshot
        .investment
        .iter()
        .fold(Decimal::ZERO, |acc, (_, v)| acc + *v);

    let fin = &snapshot.financing;
    let financing_flow_excl_short_term = fin.long_term_loan_change + fin.share_issue_proceeds
        - fin.buyback_cost
        - fin.dividend;

    let net_before_short_term = ebitda + params.working_capital_change
        + params.net_financing_costs
        - tax_paid
        - investment
        + financing_flow_excl_short_term;

    let preliminary_cash = params.beginning_cash + net_before_short_term;
    let short_term_loan_plug = (params.minimum_cash - preliminary_cash).max(Decimal::ZERO);
    if short_term_loan_plug > Decimal::ZERO {
        debug!(%short_term_loan_plug, "drawing short-term debt to hold the cash floor");
    }

    CashFlowStatement {
        ebitda,
        tax_paid,
        investment,
        working_capital_change: params.working_capital_change,
        net_financing_costs: params.net_financing_costs,
        financing_flow_excl_short_term,
        financing_flow: financing_flow_excl_short_term + short_term_loan_plug,
        beginning_cash: params.beginning_cash,
        short_term_loan_plug,
        ending_cash: preliminary_cash + short_term_loan_plug,
        net_cash_flow: net_before_short_term + short_term_loan_plug,
    }
}
