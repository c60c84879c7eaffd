//! Cash-flow statement with operating, investing and financing sections
//!
//! Rows are built strictly left to right: each row reads only the previous
//! row's closing balance and loan balance.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::cashflows::YearRecord;
use super::irr::{IrrResult, SolverConfig};
use crate::error::{CalcError, CalcResult};
use crate::inputs::{CashFlowStatementParams, InterestInput};

/// One statement year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    pub year: i32,

    // Operating activities
    pub aftertax_net_profit: f64,
    pub equipment_depreciation: f64,
    pub operating_cash_flow: f64,

    // Investing activities
    pub equipment_expenditure: f64,

    // Financing activities
    pub loan_financing: f64,
    pub loan_repayment: f64,
    pub cash_capital_increase: f64,
    pub cash_dividend: f64,
    pub capital_reduction: f64,

    // Totals
    pub net_cash_inflow: f64,
    pub opening_cash_flow: f64,
    pub closing_cash_flow: f64,

    // Investor return series contributions
    pub cost_method_cash_flow: f64,
    pub equity_method_cash_flow: f64,

    /// Outstanding loan principal
    pub loan_balance: f64,
}

/// Financing amounts derived once per request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancingPlan {
    pub loan_amount: f64,
    pub repayment_years: u32,
    pub annual_repayment: f64,
    /// Equity contributed in cash (equipment cost not covered by the loan)
    pub cash_capital_increase: f64,
    pub annual_capital_reduction: f64,
    pub capital_reduction_period: u32,
    pub dividend_ratio: f64,
}

impl FinancingPlan {
    pub fn new(
        equipment_cost: f64,
        interest: &InterestInput,
        params: &CashFlowStatementParams,
    ) -> CalcResult<Self> {
        if params.capital_reduction_period == 0 {
            return Err(CalcError::config("capital_reduction_period must be greater than zero"));
        }

        let (loan_amount, repayment_years) = match interest.loan_terms() {
            Some(terms) => (terms.loan_amount(equipment_cost), terms.repayment_years),
            None => (0.0, 0),
        };
        let annual_repayment = if repayment_years > 0 {
            loan_amount / repayment_years as f64
        } else {
            0.0
        };
        let cash_capital_increase = equipment_cost - loan_amount;

        Ok(Self {
            loan_amount,
            repayment_years,
            annual_repayment,
            cash_capital_increase,
            annual_capital_reduction: cash_capital_increase / params.capital_reduction_period as f64,
            capital_reduction_period: params.capital_reduction_period,
            dividend_ratio: params.dividend_ratio,
        })
    }

    /// Build row `i` of a `horizon`-year statement from its predecessor
    fn row(
        &self,
        i: usize,
        horizon: usize,
        equipment_cost: f64,
        record: &YearRecord,
        prior_record: Option<&YearRecord>,
        prior_row: Option<&StatementRow>,
    ) -> StatementRow {
        let first = i == 0;
        let aftertax_net_profit = record.aftertax_net_profit;
        let operating_cash_flow = aftertax_net_profit + record.equipment_depreciation;

        let equipment_expenditure = if first { -equipment_cost } else { 0.0 };
        let loan_financing = if first { self.loan_amount } else { 0.0 };
        let loan_repayment = if !first && i <= self.repayment_years as usize {
            -self.annual_repayment
        } else {
            0.0
        };
        let cash_capital_increase = if first { self.cash_capital_increase } else { 0.0 };

        // Paid out of last year's profit, so nothing in the first year
        let cash_dividend = match prior_record {
            Some(prior) if !first => -(prior.aftertax_net_profit * self.dividend_ratio / 100.0),
            _ => 0.0,
        };

        let capital_reduction = if i + self.capital_reduction_period as usize >= horizon {
            -self.annual_capital_reduction
        } else {
            0.0
        };

        let net_cash_inflow = operating_cash_flow
            + equipment_expenditure
            + loan_financing
            + loan_repayment
            + cash_capital_increase
            + cash_dividend
            + capital_reduction;
        let opening_cash_flow = prior_row.map_or(0.0, |r| r.closing_cash_flow);

        let (cost_method_cash_flow, equity_method_cash_flow) = if first {
            (
                -self.cash_capital_increase,
                aftertax_net_profit - self.cash_capital_increase,
            )
        } else {
            (
                -cash_dividend - capital_reduction,
                aftertax_net_profit + capital_reduction.abs(),
            )
        };

        let loan_balance = match prior_row {
            Some(prior) => prior.loan_balance + loan_repayment,
            None => self.loan_amount,
        };

        StatementRow {
            year: record.year,
            aftertax_net_profit,
            equipment_depreciation: record.equipment_depreciation,
            operating_cash_flow,
            equipment_expenditure,
            loan_financing,
            loan_repayment,
            cash_capital_increase,
            cash_dividend,
            capital_reduction,
            net_cash_inflow,
            opening_cash_flow,
            closing_cash_flow: opening_cash_flow + net_cash_inflow,
            cost_method_cash_flow,
            equity_method_cash_flow,
            loan_balance,
        }
    }
}

/// Investor-level return analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IrrAnalysis {
    pub cost_method_irr: Option<f64>,
    pub equity_method_irr: Option<f64>,
    /// Statement contributions plus a terminal closing-balance term
    pub cost_method_cash_flows: Vec<f64>,
    pub equity_method_cash_flows: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_method_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equity_method_error: Option<String>,
}

impl IrrAnalysis {
    fn solve(
        cost_method_cash_flows: Vec<f64>,
        equity_method_cash_flows: Vec<f64>,
        config: &SolverConfig,
    ) -> Self {
        let cost = IrrResult::from_cash_flows(&cost_method_cash_flows, config);
        let equity = IrrResult::from_cash_flows(&equity_method_cash_flows, config);

        if let Some(message) = &cost.message {
            warn!("Cost-method IRR unavailable: {}", message);
        }
        if let Some(message) = &equity.message {
            warn!("Equity-method IRR unavailable: {}", message);
        }

        Self {
            cost_method_irr: cost.rate(),
            equity_method_irr: equity.rate(),
            cost_method_cash_flows,
            equity_method_cash_flows,
            cost_method_error: cost.message,
            equity_method_error: equity.message,
        }
    }
}

/// Complete statement and its return analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    pub rows: Vec<StatementRow>,
    pub analysis: IrrAnalysis,
}

impl CashFlowStatement {
    pub fn summary(&self) -> StatementSummary {
        StatementSummary {
            total_operating_cash_flow: self.rows.iter().map(|r| r.operating_cash_flow).sum(),
            total_dividends: self.rows.iter().map(|r| r.cash_dividend).sum(),
            total_capital_reduction: self.rows.iter().map(|r| r.capital_reduction).sum(),
            final_closing_cash_flow: self.rows.last().map_or(0.0, |r| r.closing_cash_flow),
            final_loan_balance: self.rows.last().map_or(0.0, |r| r.loan_balance),
        }
    }
}

/// Totals across the statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementSummary {
    pub total_operating_cash_flow: f64,
    pub total_dividends: f64,
    pub total_capital_reduction: f64,
    pub final_closing_cash_flow: f64,
    pub final_loan_balance: f64,
}

/// Build the statement from projected years and solve both investor series
pub fn build_statement(
    records: &[YearRecord],
    equipment_cost: f64,
    years: &[i32],
    params: &CashFlowStatementParams,
    interest: &InterestInput,
    config: &SolverConfig,
) -> CalcResult<CashFlowStatement> {
    if records.len() != years.len() {
        return Err(CalcError::config(format!(
            "{} projected years for a {}-year statement",
            records.len(),
            years.len()
        )));
    }

    let plan = FinancingPlan::new(equipment_cost, interest, params)?;
    debug!(
        "Statement financing: loan {:.2}, cash capital {:.2}, annual reduction {:.2}",
        plan.loan_amount, plan.cash_capital_increase, plan.annual_capital_reduction
    );

    let horizon = records.len();
    let rows = records
        .iter()
        .enumerate()
        .fold(Vec::with_capacity(horizon), |mut rows: Vec<StatementRow>, (i, record)| {
            let prior_record = i.checked_sub(1).map(|p| &records[p]);
            let row = plan.row(i, horizon, equipment_cost, record, prior_record, rows.last());
            rows.push(row);
            rows
        });

    let mut cost_method_cash_flows: Vec<f64> = rows.iter().map(|r| r.cost_method_cash_flow).collect();
    if let Some(last) = rows.last() {
        // Terminal liquidation of the remaining cash balance
        cost_method_cash_flows.push(last.closing_cash_flow);
    }
    let equity_method_cash_flows: Vec<f64> = rows.iter().map(|r| r.equity_method_cash_flow).collect();

    let analysis = IrrAnalysis::solve(cost_method_cash_flows, equity_method_cash_flows, config);
    Ok(CashFlowStatement { rows, analysis })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::LoanTerms;
    use crate::projection::cashflows::YearInputs;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const COST: f64 = 1_000_000.0;

    fn records(horizon: usize) -> Vec<YearRecord> {
        let inputs = YearInputs {
            income: 300_000.0,
            interest: 0.0,
            rent: 20_000.0,
            maintenance: 10_000.0,
            insurance: 5_000.0,
            recycling: 0.0,
        };
        let depreciation = COST / horizon as f64;
        (0..horizon)
            .map(|i| YearRecord::compute(2025 + i as i32, inputs, depreciation, 20.0))
            .collect()
    }

    fn years(horizon: usize) -> Vec<i32> {
        (0..horizon).map(|i| 2025 + i as i32).collect()
    }

    fn params(dividend_ratio: f64, capital_reduction_period: u32) -> CashFlowStatementParams {
        CashFlowStatementParams { dividend_ratio, capital_reduction_period }
    }

    fn bank_loan(repayment_years: u32) -> InterestInput {
        InterestInput::BankLoan(LoanTerms { loan_ratio: 60.0, annual_rate: 3.0, repayment_years })
    }

    fn build(horizon: usize, interest: &InterestInput, p: CashFlowStatementParams) -> CashFlowStatement {
        build_statement(&records(horizon), COST, &years(horizon), &p, interest, &SolverConfig::default())
            .unwrap()
    }

    #[test]
    fn test_series_lengths() {
        let statement = build(8, &InterestInput::NoInterest, params(50.0, 3));
        assert_eq!(statement.rows.len(), 8);
        assert_eq!(statement.analysis.cost_method_cash_flows.len(), 9);
        assert_eq!(statement.analysis.equity_method_cash_flows.len(), 8);
    }

    #[test]
    fn test_first_year_flows() {
        let statement = build(5, &bank_loan(3), params(40.0, 2));
        let first = &statement.rows[0];

        assert_eq!(first.cash_dividend, 0.0);
        assert_eq!(first.loan_repayment, 0.0);
        assert_relative_eq!(first.equipment_expenditure, -COST);
        assert_relative_eq!(first.loan_financing, 600_000.0);
        assert_relative_eq!(first.cash_capital_increase, 400_000.0);
        assert_relative_eq!(first.loan_balance, 600_000.0);
        assert_eq!(first.opening_cash_flow, 0.0);
        assert_relative_eq!(first.cost_method_cash_flow, -400_000.0);
        assert_relative_eq!(first.equity_method_cash_flow, first.aftertax_net_profit - 400_000.0);
    }

    #[test]
    fn test_dividend_lags_one_year() {
        let statement = build(5, &InterestInput::NoInterest, params(40.0, 2));
        for i in 1..5 {
            let expected = -(statement.rows[i - 1].aftertax_net_profit * 0.40);
            assert_relative_eq!(statement.rows[i].cash_dividend, expected);
        }
    }

    #[test]
    fn test_capital_reduction_in_final_years() {
        let statement = build(6, &InterestInput::NoInterest, params(0.0, 2));
        let reductions: Vec<f64> = statement.rows.iter().map(|r| r.capital_reduction).collect();
        assert_eq!(&reductions[..4], &[0.0; 4]);
        assert_relative_eq!(reductions[4], -500_000.0);
        assert_relative_eq!(reductions[5], -500_000.0);
        assert_relative_eq!(statement.summary().total_capital_reduction, -COST);
    }

    #[test]
    fn test_reduction_period_longer_than_horizon_covers_every_year() {
        let statement = build(3, &InterestInput::NoInterest, params(0.0, 5));
        assert!(statement.rows.iter().all(|r| r.capital_reduction < 0.0));
    }

    #[test]
    fn test_loan_balance_amortizes_to_zero() {
        let statement = build(6, &bank_loan(4), params(30.0, 2));
        let balances: Vec<f64> = statement.rows.iter().map(|r| r.loan_balance).collect();

        assert_relative_eq!(balances[0], 600_000.0);
        assert_relative_eq!(balances[1], 450_000.0);
        assert_abs_diff_eq!(balances[4], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(balances[5], 0.0, epsilon = 1e-6);
        assert_eq!(statement.rows[5].loan_repayment, 0.0);
    }

    #[test]
    fn test_balances_chain_and_terminal_term() {
        let statement = build(5, &bank_loan(5), params(50.0, 3));
        for pair in statement.rows.windows(2) {
            assert_eq!(pair[1].opening_cash_flow, pair[0].closing_cash_flow);
        }
        for row in &statement.rows {
            assert_relative_eq!(row.closing_cash_flow, row.opening_cash_flow + row.net_cash_inflow);
        }

        let last_closing = statement.rows.last().unwrap().closing_cash_flow;
        assert_eq!(statement.analysis.cost_method_cash_flows.last().copied(), Some(last_closing));
        assert_relative_eq!(statement.summary().final_closing_cash_flow, last_closing);
    }

    #[test]
    fn test_investor_series_signs() {
        let statement = build(6, &InterestInput::NoInterest, params(50.0, 3));
        let row = &statement.rows[4];
        assert_relative_eq!(
            row.cost_method_cash_flow,
            -row.cash_dividend - row.capital_reduction
        );
        assert_relative_eq!(
            row.equity_method_cash_flow,
            row.aftertax_net_profit + row.capital_reduction.abs()
        );
        assert!(statement.analysis.cost_method_irr.is_some());
        assert!(statement.analysis.equity_method_irr.is_some());
    }

    #[test]
    fn test_mismatched_years_rejected() {
        let err = build_statement(
            &records(3),
            COST,
            &years(4),
            &params(10.0, 1),
            &InterestInput::NoInterest,
            &SolverConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CalcError::Configuration(_)));
    }
}
