//! Financing schedule for straight-line bank loans
//!
//! Principal is repaid in equal annual parts; interest each year is simple
//! interest on the principal outstanding at the start of that year.

use crate::error::{CalcError, CalcResult};
use crate::inputs::{InterestInput, LoanTerms};

impl LoanTerms {
    /// Amount borrowed against the equipment cost
    pub fn loan_amount(&self, equipment_cost: f64) -> f64 {
        equipment_cost * self.loan_ratio / 100.0
    }

    /// Equal principal repayment per year
    pub fn annual_principal(&self, equipment_cost: f64) -> f64 {
        if self.repayment_years == 0 {
            return 0.0;
        }
        self.loan_amount(equipment_cost) / self.repayment_years as f64
    }
}

/// Interest owed for each year of the horizon
pub fn interest_schedule(
    input: &InterestInput,
    equipment_cost: f64,
    horizon: usize,
) -> CalcResult<Vec<f64>> {
    let terms = match input {
        InterestInput::NoInterest => return Ok(vec![0.0; horizon]),
        InterestInput::BankLoan(terms) => terms,
    };
    if terms.repayment_years == 0 {
        return Err(CalcError::config("repayment_period must be greater than zero"));
    }

    let loan_amount = terms.loan_amount(equipment_cost);
    let annual_principal = terms.annual_principal(equipment_cost);
    let repayment_years = terms.repayment_years as usize;

    let schedule = (1..=horizon)
        .map(|year_index| {
            if year_index <= repayment_years {
                let remaining_principal = loan_amount - (year_index - 1) as f64 * annual_principal;
                remaining_principal * terms.annual_rate / 100.0
            } else {
                0.0
            }
        })
        .collect();

    Ok(schedule)
}
