#![deny(warnings)]

//! Round evaluation pipeline.
//!
//! Composes the projector, allocator, and finance stages into one pure
//! function from a decision snapshot plus reference parameters to the full
//! round outcome. Same inputs, same outcome, no hidden state.

use bizsim_core::{
    AllocationTable, CashFlowStatement, DecisionSnapshot, FinancialReport, Grid, MarginReport,
    ReferenceParams,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything one evaluation produces, stage by stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub demand: Grid<Decimal>,
    pub allocation: AllocationTable,
    pub financials: FinancialReport,
    pub margins: MarginReport,
    pub cash_flow: CashFlowStatement,
}

/// Evaluate one round from scratch: project demand, allocate supply, then
/// settle the books.
pub fn evaluate(snapshot: &DecisionSnapshot, params: &ReferenceParams) -> RoundOutcome {
    let demand = bizsim_alloc::demand_table(snapshot, params);
    evaluate_with_demand(snapshot, params, demand)
}

/// Evaluate against a caller-supplied demand table, e.g. a noisy scenario
/// from [`bizsim_alloc::demand_table_with_noise`].
pub fn evaluate_with_demand(
    snapshot: &DecisionSnapshot,
    params: &ReferenceParams,
    demand: Grid<Decimal>,
) -> RoundOutcome {
    let allocation = bizsim_alloc::allocate(snapshot, &demand);
    let financials = bizsim_finance::financial_report(snapshot, params, &allocation);
    let margins = bizsim_finance::margin_report(snapshot, params, &allocation);
    let cash_flow = bizsim_finance::cash_flow(snapshot, params, &financials);
    debug!(
        global_net = %financials.global.net,
        ending_cash = %cash_flow.ending_cash,
        "round evaluated"
    );
    RoundOutcome {
        demand,
        allocation,
        financials,
        margins,
        cash_flow,
    }
}
