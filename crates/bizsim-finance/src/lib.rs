#![deny(warnings)]

//! Tax and cash-flow engine.
//!
//! Consumes the allocator's output: derives per-region taxable profit from
//! local operating margin plus transfer-pricing income shifts, then resolves
//! a cash-flow waterfall that balances to the minimum-cash floor via an
//! implicit short-term borrowing plug.

mod cashflow;
mod tax;

pub use cashflow::cash_flow;
pub use tax::{financial_report, margin_report, unit_cost};
