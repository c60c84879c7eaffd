//! Solar IRR CLI
//!
//! Command-line interface for running IRR calculations from request files

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use solar_irr::{
    calculator::CalculationResponse,
    inputs::{load_request, EquipmentParams},
    projection::SolverConfig,
    ScenarioRunner,
};

#[derive(Debug, Parser)]
#[command(name = "solar_irr", version, about = "Cash-flow projection and IRR for solar equipment financing")]
struct Cli {
    /// Request JSON files to evaluate
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Print full responses as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Write the cash-flow statement of each request to CSV (suffixed per input when several)
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Treat inputs as equipment parameters and only quote the equipment cost
    #[arg(long)]
    equipment_only: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let runner = ScenarioRunner::with_config(SolverConfig::from_env());

    if cli.equipment_only {
        return quote_equipment(&runner, &cli.inputs, cli.json);
    }

    let requests = cli
        .inputs
        .iter()
        .map(|path| load_request(path).with_context(|| format!("Failed to load {}", path.display())))
        .collect::<Result<Vec<_>>>()?;

    let responses = runner.run_batch(&requests);

    for (index, (path, response)) in cli.inputs.iter().zip(&responses).enumerate() {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(response)?);
        } else {
            print_report(path, response);
        }

        if let Some(csv_path) = &cli.csv {
            let target = if responses.len() > 1 {
                suffixed(csv_path, index + 1)
            } else {
                csv_path.clone()
            };
            write_statement_csv(&target, response)?;
            if !cli.json {
                println!("Cash-flow statement written to: {}", target.display());
            }
        }
    }

    if responses.iter().any(|r| !r.success) {
        bail!("{} of {} calculations failed", responses.iter().filter(|r| !r.success).count(), responses.len());
    }
    Ok(())
}

fn quote_equipment(runner: &ScenarioRunner, inputs: &[PathBuf], json: bool) -> Result<()> {
    for path in inputs {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let params: EquipmentParams = serde_json::from_reader(file)
            .with_context(|| format!("Invalid equipment parameters in {}", path.display()))?;
        let response = runner.calculator().equipment_cost(&params);

        if json {
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else if let Some(formatted) = &response.formatted_cost {
            println!("{}: {} ({:.2})", path.display(), formatted, response.equipment_cost);
        } else {
            println!("{}: {}", path.display(), response.error.as_deref().unwrap_or("unknown error"));
        }
    }
    Ok(())
}

fn print_report(path: &Path, response: &CalculationResponse) {
    println!("Request: {}", path.display());

    if !response.success {
        println!("  {}", response.error.as_deref().unwrap_or("Calculation failed"));
        println!();
        return;
    }

    println!("  Equipment cost: {:.2}", response.equipment_cost);
    println!();
    println!(
        "{:>6} {:>14} {:>14} {:>12} {:>14} {:>12} {:>14} {:>14}",
        "Year", "Income", "Depreciation", "Interest", "Pretax", "Tax", "Aftertax", "IRR CF"
    );
    println!("{}", "-".repeat(108));
    for record in &response.cash_flows {
        println!(
            "{:>6} {:>14.2} {:>14.2} {:>12.2} {:>14.2} {:>12.2} {:>14.2} {:>14.2}",
            record.year,
            record.income,
            record.equipment_depreciation,
            record.interest,
            record.pretax_net_profit,
            record.display_tax,
            record.aftertax_net_profit,
            record.irr_cash_flow,
        );
    }

    println!();
    println!(
        "{:>6} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Year", "Operating", "Dividend", "Reduction", "Closing", "Loan Bal"
    );
    println!("{}", "-".repeat(82));
    for row in &response.cash_flow_statement {
        println!(
            "{:>6} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
            row.year,
            row.operating_cash_flow,
            row.cash_dividend,
            row.capital_reduction,
            row.closing_cash_flow,
            row.loan_balance,
        );
    }

    let analysis = &response.irr_analysis;
    println!();
    println!("  Project IRR:       {}", format_rate(response.irr));
    println!("  Cost-method IRR:   {}", format_rate(analysis.cost_method_irr));
    println!("  Equity-method IRR: {}", format_rate(analysis.equity_method_irr));
    println!();
}

fn format_rate(rate: Option<f64>) -> String {
    rate.map_or_else(|| "n/a".to_string(), |r| format!("{:.4}%", r))
}

fn suffixed(path: &Path, index: usize) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("statement");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("csv");
    path.with_file_name(format!("{}_{}.{}", stem, index, ext))
}

fn write_statement_csv(path: &Path, response: &CalculationResponse) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Unable to create {}", path.display()))?;
    for row in &response.cash_flow_statement {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
