//! Formatting of search results.

use hybrid_limit::output::{format_limit, format_limit_line, to_json};
use hybrid_limit::testing::LinearOracle;
use hybrid_limit::{Config, LimitResult, LimitSearch, ParameterPoint};

fn worked_example(config: Config) -> LimitResult {
    LimitSearch::new(config)
        .unwrap()
        .run_unobserved(LinearOracle::new(5.0), ParameterPoint::new(0.0, 1.0), None)
        .unwrap()
}

#[test]
fn summary_line() {
    let result = worked_example(Config::default());
    assert_eq!(
        format_limit_line(&result),
        "Limit: r < 4.75 +/- 0.25 @ 95% CL"
    );
}

#[test]
fn terminal_report_mentions_interval() {
    colored::control::set_override(false);
    let result = worked_example(Config::default().compute_interval(true));
    let report = format_limit(&result);
    assert!(report.contains("Limit: r < 4.75 +/- 0.0625 @ 95% CL"));
    assert!(report.contains("Interval: [4.6875, 4.8125]"));
}

#[test]
fn json_report_is_parseable() {
    let result = worked_example(Config::default());
    let json = to_json(&result).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["limit"], 4.75);
    assert_eq!(value["termination"], "DirectHit");
    assert_eq!(value["statistic"], "Cls");
    assert!(value["interval"].is_null());
}
