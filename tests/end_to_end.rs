use approx::{assert_abs_diff_eq, assert_relative_eq};
use solar_irr::{
    calculator::{route, IrrCalculator},
    inputs::{load_request, parse_request},
    projection::{npv_at_rate, solve_irr},
    CalcError, ScenarioRunner,
};

const NO_INTEREST_REQUEST: &str = r#"{
    "start_year": 2025,
    "end_year": 2030,
    "equipment_params": {"capacity": 100, "price_per_kw": 45000, "profit_rate": 15, "development_fee": 50000},
    "income": {"mode": "yearly", "yearly_data": {"yearly_values": [2800000]}},
    "interest": {"no_interest": true},
    "rent": {"mode": "yearly", "yearly_data": {"yearly_values": [120000]}},
    "maintenance": {"mode": "kw_based", "kw_based_data": {"price_per_kw": 1200, "start_year": 2025, "end_year": 2030}},
    "insurance": {"mode": "range", "range_data": {"total_amount": 180000, "start_year": 2025, "end_year": 2030}},
    "recycling": {"mode": "range", "range_data": {"total_amount": 50000, "start_year": 2030, "end_year": 2030}},
    "tax_rate": 20,
    "cash_flow_params": {"dividend_ratio": 60, "capital_reduction_period": 2}
}"#;

#[test]
fn no_interest_six_year_scenario() {
    let request = parse_request(NO_INTEREST_REQUEST).unwrap();
    let response = IrrCalculator::default().calculate(&request);

    assert!(response.success, "error: {:?}", response.error);
    assert_eq!(response.years, vec![2025, 2026, 2027, 2028, 2029, 2030]);
    assert_eq!(response.cash_flow_statement.len(), 6);
    assert!(response.cash_flow_statement.iter().all(|row| row.loan_balance == 0.0));
    assert_eq!(response.cash_flow_statement[0].cash_dividend, 0.0);
    assert_relative_eq!(response.equipment_cost, 10_294_117.647, epsilon = 1e-3);

    let analysis = &response.irr_analysis;
    assert_eq!(analysis.cost_method_cash_flows.len(), 7);
    assert_eq!(analysis.equity_method_cash_flows.len(), 6);

    // Project IRR zeroes NPV of [-cost, irr cash flows...]
    let mut project_flows = vec![-response.equipment_cost];
    project_flows.extend(response.cash_flows.iter().map(|r| r.irr_cash_flow));
    let rate = response.irr.unwrap() / 100.0;
    assert_abs_diff_eq!(npv_at_rate(&project_flows, rate), 0.0, epsilon = 1e-2);
}

#[test]
fn bank_loan_sample_file() {
    let request = load_request("data/sample_request.json").unwrap();
    let response = IrrCalculator::default().calculate(&request);

    assert!(response.success, "error: {:?}", response.error);
    assert_eq!(response.years.len(), 20);

    // Interest stops after the 15-year repayment period
    let interest: Vec<f64> = response.cash_flows.iter().map(|r| r.interest).collect();
    assert!(interest.windows(2).all(|w| w[1] <= w[0]));
    assert!(interest[15..].iter().all(|&i| i == 0.0));

    let balances: Vec<f64> = response.cash_flow_statement.iter().map(|r| r.loan_balance).collect();
    assert_abs_diff_eq!(balances[15], 0.0, epsilon = 1e-6);
    assert!(balances[..15].iter().all(|&b| b > 0.0));
}

#[test]
fn failures_keep_uniform_shape() {
    let mut request = parse_request(NO_INTEREST_REQUEST).unwrap();
    request.equipment_params.profit_rate = 100.0;
    let response = IrrCalculator::default().calculate(&request);

    assert!(!response.success);
    assert!(response.irr.is_none());
    assert!(response.error.is_some());
    assert_eq!(response.equipment_cost, 0.0);
    assert!(response.cash_flows.is_empty());
    assert!(response.years.is_empty());
}

#[test]
fn solver_reference_points() {
    assert_abs_diff_eq!(solve_irr(&[-100.0, 60.0, 60.0]).unwrap(), 13.07, epsilon = 0.01);
    assert!(matches!(solve_irr(&[100.0, 100.0]), Err(CalcError::InsufficientSignal(_))));
}

#[test]
fn routes_and_batches() {
    let calculator = IrrCalculator::default();
    let reply = route(&calculator, "POST", "/api/irr/calculate", Some(NO_INTEREST_REQUEST));
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body["years"].as_array().map(Vec::len), Some(6));

    let request = parse_request(NO_INTEREST_REQUEST).unwrap();
    let responses = ScenarioRunner::new().run_batch(&[request.clone(), request]);
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0], responses[1]);
}
