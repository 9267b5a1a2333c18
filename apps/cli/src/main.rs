#![deny(warnings)]

//! Headless CLI: evaluate one round from a decision file and print the
//! resulting tables.

use anyhow::{Context, Result};
use bizsim_core::{DecisionSnapshot, Grid, ReferenceParams, Region, Technology};
use tracing::info;
use tracing_subscriber::EnvFilter;

struct Args {
    decisions: Option<String>,
    params: Option<String>,
    json: bool,
    noise: Option<f64>,
    seed: u64,
}

fn parse_args() -> Args {
    let mut args = Args {
        decisions: None,
        params: None,
        json: false,
        noise: None,
        seed: 0,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--decisions" => args.decisions = it.next(),
            "--params" => args.params = it.next(),
            "--json" => args.json = true,
            "--noise" => args.noise = it.next().and_then(|s| s.parse().ok()),
            "--seed" => args.seed = it.next().and_then(|s| s.parse().ok()).unwrap_or(0),
            _ => {}
        }
    }
    args
}

fn load_snapshot(path: Option<&str>) -> Result<DecisionSnapshot> {
    match path {
        Some(p) => {
            let raw = std::fs::read_to_string(p).with_context(|| format!("reading {p}"))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {p}"))
        }
        None => Ok(DecisionSnapshot::baseline()),
    }
}

fn load_params(path: Option<&str>) -> Result<ReferenceParams> {
    match path {
        Some(p) => {
            let raw = std::fs::read_to_string(p).with_context(|| format!("reading {p}"))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {p}"))
        }
        None => Ok(ReferenceParams::baseline()),
    }
}

fn print_tables(outcome: &bizsim_runtime::RoundOutcome) {
    println!("Logistics");
    for &region in &Region::ALL {
        for &tech in &Technology::ALL {
            let cell = outcome.allocation[(region, tech)];
            if cell.demand == rust_decimal::Decimal::ZERO
                && cell.sold == rust_decimal::Decimal::ZERO
                && cell.buffer == rust_decimal::Decimal::ZERO
            {
                continue;
            }
            println!(
                "  {region} / {tech} | demand: {} | sold: {} | exported: {} | imported: {} | buffer: {} | unmet: {}",
                cell.demand, cell.sold, cell.exported, cell.imported, cell.buffer, cell.unmet
            );
        }
    }

    println!("Margins");
    for ((region, tech), m) in outcome.margins.iter() {
        if m.sales == rust_decimal::Decimal::ZERO {
            continue;
        }
        let pct = m
            .margin_pct
            .map_or_else(|| "-".to_string(), |p| format!("{p}%"));
        println!(
            "  {region} / {tech} | sales: {} | variable: {} | promotion: {} | gross: {} | margin: {pct}",
            m.sales, m.variable_costs, m.promotion, m.gross_profit
        );
    }

    println!("Financials");
    for (region, line) in outcome.financials.regions.iter() {
        println!(
            "  {region} | revenue: {} | cost: {} | taxable: {} | tax: {} | net: {}",
            line.revenue, line.cost, line.taxable, line.tax, line.net
        );
    }
    let g = &outcome.financials.global;
    println!(
        "  Global | revenue: {} | taxable: {} | tax: {} | net: {}",
        g.revenue, g.taxable, g.tax, g.net
    );

    let cf = &outcome.cash_flow;
    println!("Cash flow");
    println!(
        "  EBITDA: {} | tax paid: {} | investment: {} | financing: {}",
        cf.ebitda, cf.tax_paid, cf.investment, cf.financing_flow
    );
    println!(
        "  beginning: {} | short-term plug: {} | ending: {}",
        cf.beginning_cash, cf.short_term_loan_plug, cf.ending_cash
    );
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = parse_args();
    info!(
        git_sha = env!("GIT_SHA"),
        build_date = env!("BUILD_DATE"),
        "starting round evaluation"
    );

    let snapshot = load_snapshot(args.decisions.as_deref())?;
    let params = load_params(args.params.as_deref())?;
    bizsim_core::validate_snapshot(&snapshot).context("invalid decision snapshot")?;

    let demand: Grid<rust_decimal::Decimal> = match args.noise {
        Some(frac) => bizsim_alloc::demand_table_with_noise(&snapshot, &params, frac, args.seed)?,
        None => bizsim_alloc::demand_table(&snapshot, &params),
    };
    let outcome = bizsim_runtime::evaluate_with_demand(&snapshot, &params, demand);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_tables(&outcome);
    }
    Ok(())
}
