//! Equipment cost model
//!
//! Quoted total = ((price per kW / (1 - profit rate)) + development fee) * capacity

use crate::error::{CalcError, CalcResult};
use crate::inputs::EquipmentParams;

/// Total quoted equipment cost
pub fn equipment_cost(
    capacity: f64,
    price_per_kw: f64,
    profit_rate_pct: f64,
    development_fee: f64,
) -> CalcResult<f64> {
    let margin_divisor = 1.0 - profit_rate_pct / 100.0;
    if margin_divisor <= 0.0 {
        return Err(CalcError::config(format!(
            "profit_rate of {}% leaves no price base",
            profit_rate_pct
        )));
    }

    let adjusted_price_per_kw = price_per_kw / margin_divisor;
    Ok((adjusted_price_per_kw + development_fee) * capacity)
}

impl EquipmentParams {
    pub fn total_cost(&self) -> CalcResult<f64> {
        equipment_cost(self.capacity, self.price_per_kw, self.profit_rate, self.development_fee)
    }
}

/// Format an amount the way quotes are presented, e.g. `NT$ 10,294,118`
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("NT$ {}{}", sign, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_quote() {
        let cost = equipment_cost(100.0, 45_000.0, 15.0, 50_000.0).unwrap();
        assert_relative_eq!(cost, (45_000.0 / 0.85 + 50_000.0) * 100.0, max_relative = 1e-12);
        assert_relative_eq!(cost, 10_294_117.647, epsilon = 1e-3);
    }

    #[test]
    fn test_zero_margin() {
        let params = EquipmentParams {
            capacity: 10.0,
            price_per_kw: 1_000.0,
            profit_rate: 0.0,
            development_fee: 0.0,
        };
        assert_relative_eq!(params.total_cost().unwrap(), 10_000.0);
    }

    #[test]
    fn test_full_margin_is_configuration_error() {
        let err = equipment_cost(100.0, 45_000.0, 100.0, 50_000.0).unwrap_err();
        assert!(matches!(err, CalcError::Configuration(_)));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(10_294_117.647), "NT$ 10,294,118");
        assert_eq!(format_currency(999.4), "NT$ 999");
        assert_eq!(format_currency(1_000.0), "NT$ 1,000");
        assert_eq!(format_currency(-2_500.0), "NT$ -2,500");
    }
}
