//! Calculation request model

mod interest;
mod series;
pub mod loader;

pub use interest::{InterestInput, LoanTerms};
pub use series::{pad_values, CategorySeries, KwBasedData, RangeData, YearlyData};
pub use loader::{load_request, load_request_from_reader, parse_request};

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};

/// Longest year range accepted for the horizon or a spread range
pub const MAX_SPAN_YEARS: i64 = 200;

/// Parameters for the equipment cost formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquipmentParams {
    /// Installed capacity (kW)
    pub capacity: f64,
    pub price_per_kw: f64,
    /// Profit margin on the per-kW price (%)
    pub profit_rate: f64,
    /// Development fee per kW
    pub development_fee: f64,
}

/// Parameters for the cash-flow statement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatementParams {
    /// Share of the prior year's after-tax profit paid out (%)
    pub dividend_ratio: f64,
    /// Number of final years over which the cash capital is returned
    pub capital_reduction_period: u32,
}

/// Full input bundle for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub start_year: i32,
    pub end_year: i32,
    pub equipment_params: EquipmentParams,
    pub income: CategorySeries,
    pub interest: InterestInput,
    pub rent: CategorySeries,
    pub maintenance: CategorySeries,
    pub insurance: CategorySeries,
    pub recycling: CategorySeries,
    /// Display-convention income tax rate (%)
    pub tax_rate: f64,
    pub cash_flow_params: CashFlowStatementParams,
}

impl CalculationRequest {
    /// Calendar years covered, ascending and inclusive
    pub fn years(&self) -> Vec<i32> {
        (self.start_year..=self.end_year).collect()
    }

    /// Enforce the value-level invariants a schema cannot express
    pub fn validate(&self) -> CalcResult<()> {
        if self.end_year <= self.start_year {
            return Err(CalcError::config(format!(
                "end_year ({}) must be greater than start_year ({})",
                self.end_year, self.start_year
            )));
        }
        let span = i64::from(self.end_year) - i64::from(self.start_year) + 1;
        if span > MAX_SPAN_YEARS {
            return Err(CalcError::config(format!(
                "{}-{} covers {} years, more than the {} allowed",
                self.start_year, self.end_year, span, MAX_SPAN_YEARS
            )));
        }
        if self.equipment_params.profit_rate >= 100.0 {
            return Err(CalcError::config(format!(
                "profit_rate must be below 100, got {}",
                self.equipment_params.profit_rate
            )));
        }
        if !(0.0..=100.0).contains(&self.tax_rate) {
            return Err(CalcError::config(format!(
                "tax_rate must be within 0-100, got {}",
                self.tax_rate
            )));
        }
        if !(0.0..=100.0).contains(&self.cash_flow_params.dividend_ratio) {
            return Err(CalcError::config(format!(
                "dividend_ratio must be within 0-100, got {}",
                self.cash_flow_params.dividend_ratio
            )));
        }
        if self.cash_flow_params.capital_reduction_period == 0 {
            return Err(CalcError::config("capital_reduction_period must be greater than zero"));
        }
        if let Some(terms) = self.interest.loan_terms() {
            terms.validate()?;
        }
        for series in self.categories() {
            series.validate()?;
        }
        Ok(())
    }

    fn categories(&self) -> [&CategorySeries; 5] {
        [&self.income, &self.rent, &self.maintenance, &self.insurance, &self.recycling]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Six-year no-interest request used across the crate's tests
    pub(crate) fn sample_request() -> CalculationRequest {
        CalculationRequest {
            start_year: 2025,
            end_year: 2030,
            equipment_params: EquipmentParams {
                capacity: 100.0,
                price_per_kw: 45_000.0,
                profit_rate: 15.0,
                development_fee: 50_000.0,
            },
            income: CategorySeries::yearly(vec![3_000_000.0]),
            interest: InterestInput::NoInterest,
            rent: CategorySeries::yearly(vec![100_000.0]),
            maintenance: CategorySeries::range(900_000.0, 2025, 2030),
            insurance: CategorySeries::kw_based(500.0, 2025, 2030),
            recycling: CategorySeries::range(60_000.0, 2029, 2030),
            tax_rate: 20.0,
            cash_flow_params: CashFlowStatementParams {
                dividend_ratio: 50.0,
                capital_reduction_period: 3,
            },
        }
    }

    #[test]
    fn test_years_inclusive() {
        assert_eq!(sample_request().years(), vec![2025, 2026, 2027, 2028, 2029, 2030]);
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample_request().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_year_range() {
        let mut request = sample_request();
        request.end_year = request.start_year;
        assert!(matches!(request.validate(), Err(CalcError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_oversized_horizon() {
        let mut request = sample_request();
        request.start_year = i32::MIN;
        let err = request.validate().unwrap_err();
        assert!(matches!(err, CalcError::Configuration(_)));
        assert!(err.to_string().contains("more than the 200 allowed"));

        let mut request = sample_request();
        request.end_year = request.start_year + 199;
        assert!(request.validate().is_ok());
        request.end_year += 1;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_denominators() {
        let mut request = sample_request();
        request.equipment_params.profit_rate = 100.0;
        assert!(request.validate().is_err());

        let mut request = sample_request();
        request.cash_flow_params.capital_reduction_period = 0;
        assert!(request.validate().is_err());

        let mut request = sample_request();
        request.interest = InterestInput::BankLoan(LoanTerms {
            loan_ratio: 70.0,
            annual_rate: 2.0,
            repayment_years: 0,
        });
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_category_range() {
        let mut request = sample_request();
        request.recycling = CategorySeries::range(60_000.0, 2030, 2029);
        assert!(request.validate().is_err());
    }
}
