//! Year-by-year projection of operating results

use log::debug;

use super::cashflows::{ProjectionResult, YearInputs, YearRecord};
use crate::error::{CalcError, CalcResult};
use crate::financing::interest_schedule;
use crate::inputs::CalculationRequest;

/// Normalized per-year vectors for every category, aligned with `years`
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryVectors {
    pub income: Vec<f64>,
    pub rent: Vec<f64>,
    pub maintenance: Vec<f64>,
    pub insurance: Vec<f64>,
    pub recycling: Vec<f64>,
}

impl CategoryVectors {
    /// Expand every category of the request over `years`
    pub fn from_request(request: &CalculationRequest, years: &[i32]) -> CalcResult<Self> {
        let capacity = request.equipment_params.capacity;
        Ok(Self {
            income: request.income.normalize(years, capacity)?,
            rent: request.rent.normalize(years, capacity)?,
            maintenance: request.maintenance.normalize(years, capacity)?,
            insurance: request.insurance.normalize(years, capacity)?,
            recycling: request.recycling.normalize(years, capacity)?,
        })
    }

    fn year_inputs(&self, i: usize, interest: f64) -> YearInputs {
        YearInputs {
            income: self.income[i],
            interest,
            rent: self.rent[i],
            maintenance: self.maintenance[i],
            insurance: self.insurance[i],
            recycling: self.recycling[i],
        }
    }

    fn check_len(&self, horizon: usize) -> CalcResult<()> {
        let lengths = [
            self.income.len(),
            self.rent.len(),
            self.maintenance.len(),
            self.insurance.len(),
            self.recycling.len(),
        ];
        if lengths.iter().any(|&len| len != horizon) {
            return Err(CalcError::config(format!(
                "category vectors {:?} do not match horizon {}",
                lengths, horizon
            )));
        }
        Ok(())
    }
}

/// Project every year of the horizon.
///
/// Depreciation is straight-line: `equipment_cost / horizon` each year.
pub fn project(
    years: &[i32],
    equipment_cost: f64,
    categories: &CategoryVectors,
    interest: &[f64],
    tax_rate_pct: f64,
) -> CalcResult<ProjectionResult> {
    let horizon = years.len();
    if horizon == 0 {
        return Err(CalcError::config("projection horizon must contain at least one year"));
    }
    categories.check_len(horizon)?;
    if interest.len() != horizon {
        return Err(CalcError::config(format!(
            "interest vector has {} entries for a {}-year horizon",
            interest.len(),
            horizon
        )));
    }

    let depreciation = equipment_cost / horizon as f64;
    debug!("Projecting {} years, depreciation {:.2} per year", horizon, depreciation);

    let records: Vec<YearRecord> = years
        .iter()
        .enumerate()
        .map(|(i, &year)| {
            YearRecord::compute(year, categories.year_inputs(i, interest[i]), depreciation, tax_rate_pct)
        })
        .collect();

    let cash_flows = std::iter::once(-equipment_cost)
        .chain(records.iter().map(|r| r.irr_cash_flow))
        .collect();

    Ok(ProjectionResult { records, cash_flows })
}

/// Normalize the request's inputs and run the projection
pub fn project_request(
    request: &CalculationRequest,
    years: &[i32],
    equipment_cost: f64,
) -> CalcResult<ProjectionResult> {
    let categories = CategoryVectors::from_request(request, years)?;
    let interest = interest_schedule(&request.interest, equipment_cost, years.len())?;
    project(years, equipment_cost, &categories, &interest, request.tax_rate)
}
