//! Interest category input: either no financing or a straight-line bank loan

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};

/// Bank loan terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Share of equipment cost financed by the loan (%)
    pub loan_ratio: f64,
    /// Simple annual interest rate on the outstanding principal (%)
    #[serde(rename = "bank_rate")]
    pub annual_rate: f64,
    /// Number of years over which principal is repaid in equal parts
    #[serde(rename = "repayment_period")]
    pub repayment_years: u32,
}

impl LoanTerms {
    pub fn validate(&self) -> CalcResult<()> {
        if self.repayment_years == 0 {
            return Err(CalcError::config("repayment_period must be greater than zero"));
        }
        if !(0.0..=100.0).contains(&self.loan_ratio) {
            return Err(CalcError::config(format!(
                "loan_ratio must be within 0-100, got {}",
                self.loan_ratio
            )));
        }
        if self.annual_rate < 0.0 {
            return Err(CalcError::config("bank_rate must not be negative"));
        }
        Ok(())
    }
}

/// Interest category input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInterestInput", into = "RawInterestInput")]
pub enum InterestInput {
    NoInterest,
    BankLoan(LoanTerms),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawInterestInput {
    #[serde(default)]
    no_interest: bool,
    #[serde(default)]
    bank_loan_data: Option<LoanTerms>,
}

impl TryFrom<RawInterestInput> for InterestInput {
    type Error = CalcError;

    fn try_from(raw: RawInterestInput) -> CalcResult<Self> {
        if raw.no_interest {
            return Ok(InterestInput::NoInterest);
        }
        raw.bank_loan_data
            .map(InterestInput::BankLoan)
            .ok_or_else(|| CalcError::config("bank_loan_data is required unless no_interest is set"))
    }
}

impl From<InterestInput> for RawInterestInput {
    fn from(input: InterestInput) -> Self {
        match input {
            InterestInput::NoInterest => RawInterestInput { no_interest: true, bank_loan_data: None },
            InterestInput::BankLoan(terms) => RawInterestInput {
                no_interest: false,
                bank_loan_data: Some(terms),
            },
        }
    }
}

impl InterestInput {
    pub fn loan_terms(&self) -> Option<&LoanTerms> {
        match self {
            InterestInput::NoInterest => None,
            InterestInput::BankLoan(terms) => Some(terms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bank_loan() {
        let json = r#"{"no_interest":false,"bank_loan_data":{"loan_ratio":70,"bank_rate":2.5,"repayment_period":10}}"#;
        let input: InterestInput = serde_json::from_str(json).unwrap();
        let terms = input.loan_terms().unwrap();
        assert_eq!(terms.repayment_years, 10);
        assert_eq!(terms.annual_rate, 2.5);
    }

    #[test]
    fn test_no_interest_ignores_loan_payload() {
        let json = r#"{"no_interest":true,"bank_loan_data":{"loan_ratio":70,"bank_rate":2.5,"repayment_period":10}}"#;
        let input: InterestInput = serde_json::from_str(json).unwrap();
        assert_eq!(input, InterestInput::NoInterest);
    }

    #[test]
    fn test_missing_loan_payload_rejected() {
        let err = serde_json::from_str::<InterestInput>(r#"{"no_interest":false}"#).unwrap_err();
        assert!(err.to_string().contains("bank_loan_data is required"));
    }

    #[test]
    fn test_zero_repayment_period_invalid() {
        let terms = LoanTerms { loan_ratio: 60.0, annual_rate: 3.0, repayment_years: 0 };
        assert!(matches!(terms.validate(), Err(CalcError::Configuration(_))));
    }
}
