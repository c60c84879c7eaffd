//! Per-category time series and their expansion into yearly vectors
//!
//! On the wire a category arrives as a `mode` string with one matching
//! payload object. It is converted into the closed `CategorySeries` enum at
//! deserialization time, so a mode without its payload never reaches the
//! projection.

use serde::{Deserialize, Serialize};

use super::MAX_SPAN_YEARS;
use crate::error::{CalcError, CalcResult};

/// Explicit per-year values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyData {
    pub yearly_values: Vec<f64>,
}

/// Total amount spread evenly over an inclusive calendar-year range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeData {
    pub total_amount: f64,
    pub start_year: i32,
    pub end_year: i32,
}

/// Per-kW rate, multiplied by installed capacity, then spread like `RangeData`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KwBasedData {
    pub price_per_kw: f64,
    pub start_year: i32,
    pub end_year: i32,
}

/// Input series for one revenue or expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCategorySeries", into = "RawCategorySeries")]
pub enum CategorySeries {
    Yearly(YearlyData),
    Range(RangeData),
    KwBased(KwBasedData),
}

/// Wire shape: mode string plus optional sibling payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawCategorySeries {
    mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    yearly_data: Option<YearlyData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range_data: Option<RangeData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kw_based_data: Option<KwBasedData>,
}

impl TryFrom<RawCategorySeries> for CategorySeries {
    type Error = CalcError;

    fn try_from(raw: RawCategorySeries) -> CalcResult<Self> {
        match raw.mode.as_str() {
            "yearly" => raw
                .yearly_data
                .map(CategorySeries::Yearly)
                .ok_or_else(|| CalcError::config("yearly mode requires yearly_data")),
            "range" => raw
                .range_data
                .map(CategorySeries::Range)
                .ok_or_else(|| CalcError::config("range mode requires range_data")),
            "kw_based" => raw
                .kw_based_data
                .map(CategorySeries::KwBased)
                .ok_or_else(|| CalcError::config("kw_based mode requires kw_based_data")),
            other => Err(CalcError::config(format!("Unsupported mode: {}", other))),
        }
    }
}

impl From<CategorySeries> for RawCategorySeries {
    fn from(series: CategorySeries) -> Self {
        let mut raw = RawCategorySeries {
            mode: series.mode().to_string(),
            yearly_data: None,
            range_data: None,
            kw_based_data: None,
        };
        match series {
            CategorySeries::Yearly(data) => raw.yearly_data = Some(data),
            CategorySeries::Range(data) => raw.range_data = Some(data),
            CategorySeries::KwBased(data) => raw.kw_based_data = Some(data),
        }
        raw
    }
}

impl CategorySeries {
    /// Convenience constructor for explicit yearly values
    pub fn yearly(values: Vec<f64>) -> Self {
        CategorySeries::Yearly(YearlyData { yearly_values: values })
    }

    pub fn range(total_amount: f64, start_year: i32, end_year: i32) -> Self {
        CategorySeries::Range(RangeData { total_amount, start_year, end_year })
    }

    pub fn kw_based(price_per_kw: f64, start_year: i32, end_year: i32) -> Self {
        CategorySeries::KwBased(KwBasedData { price_per_kw, start_year, end_year })
    }

    /// Wire name of the variant
    pub fn mode(&self) -> &'static str {
        match self {
            CategorySeries::Yearly(_) => "yearly",
            CategorySeries::Range(_) => "range",
            CategorySeries::KwBased(_) => "kw_based",
        }
    }

    /// Expand into one value per entry of `years`.
    ///
    /// `capacity` is only used by `KwBased`.
    pub fn normalize(&self, years: &[i32], capacity: f64) -> CalcResult<Vec<f64>> {
        match self {
            CategorySeries::Yearly(data) => Ok(pad_values(&data.yearly_values, years.len())),
            CategorySeries::Range(data) => {
                spread_over_range(data.total_amount, data.start_year, data.end_year, years)
            }
            CategorySeries::KwBased(data) => spread_over_range(
                data.price_per_kw * capacity,
                data.start_year,
                data.end_year,
                years,
            ),
        }
    }

    /// Validate the payload without expanding it
    pub fn validate(&self) -> CalcResult<()> {
        match self {
            CategorySeries::Yearly(_) => Ok(()),
            CategorySeries::Range(RangeData { start_year, end_year, .. })
            | CategorySeries::KwBased(KwBasedData { start_year, end_year, .. }) => {
                range_span(*start_year, *end_year).map(|_| ())
            }
        }
    }
}

/// Truncate to `horizon`, or forward-fill with the last value (0.0 if empty)
pub fn pad_values(values: &[f64], horizon: usize) -> Vec<f64> {
    let fill = values.last().copied().unwrap_or(0.0);
    values
        .iter()
        .copied()
        .chain(std::iter::repeat(fill))
        .take(horizon)
        .collect()
}

fn range_span(start_year: i32, end_year: i32) -> CalcResult<u32> {
    if end_year < start_year {
        return Err(CalcError::config(format!(
            "Spread range end year {} is before start year {}",
            end_year, start_year
        )));
    }
    let span = i64::from(end_year) - i64::from(start_year) + 1;
    if span > MAX_SPAN_YEARS {
        return Err(CalcError::config(format!(
            "Spread range {}-{} covers {} years, more than the {} allowed",
            start_year, end_year, span, MAX_SPAN_YEARS
        )));
    }
    Ok(span as u32)
}

fn spread_over_range(
    total_amount: f64,
    start_year: i32,
    end_year: i32,
    years: &[i32],
) -> CalcResult<Vec<f64>> {
    let span = range_span(start_year, end_year)?;
    let amount_per_year = total_amount / span as f64;

    Ok(years
        .iter()
        .map(|&year| {
            if (start_year..=end_year).contains(&year) {
                amount_per_year
            } else {
                0.0
            }
        })
        .collect())
}
