// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use spendlens::aggregate::{Aggregator, average, percentage, shares};
use spendlens::error::AggregateError;
use spendlens::models::{DateRange, Expense, Income};

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn expense(id: i64, amount: &str, category: &str, date: &str) -> Expense {
    Expense {
        id,
        user_id: 1,
        amount: d(amount),
        category: category.into(),
        description: String::new(),
        date: day(date),
        created_at: None,
        updated_at: None,
    }
}

fn income(id: i64, amount: &str, source: &str, date: &str) -> Income {
    Income {
        id,
        user_id: 1,
        amount: d(amount),
        source: source.into(),
        date: day(date),
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn trend_buckets_two_months_with_missing_side_as_zero() {
    let expenses = vec![
        expense(1, "100", "Food", "2025-01-05"),
        expense(2, "50", "Food", "2025-02-03"),
    ];
    let income = vec![income(1, "200", "Salary", "2025-01-10")];
    let trend = Aggregator::new(&expenses, &income)
        .monthly_trend(&DateRange::all())
        .unwrap();

    assert_eq!(trend.len(), 2);
    assert_eq!(trend[0].month, "2025-01");
    assert_eq!(trend[0].expenses, d("100"));
    assert_eq!(trend[0].income, d("200"));
    assert_eq!(trend[0].net, d("100"));
    assert_eq!(trend[1].month, "2025-02");
    assert_eq!(trend[1].expenses, d("50"));
    assert_eq!(trend[1].income, Decimal::ZERO);
    assert_eq!(trend[1].net, d("-50"));
}

#[test]
fn trend_is_chronological_across_years_without_duplicates() {
    let expenses = vec![
        expense(1, "5", "A", "2025-03-01"),
        expense(2, "5", "A", "2024-12-31"),
        expense(3, "5", "A", "2025-03-31"),
    ];
    let income = vec![income(1, "9", "Job", "2025-01-15")];
    let trend = Aggregator::new(&expenses, &income)
        .monthly_trend(&DateRange::all())
        .unwrap();
    let months: Vec<&str> = trend.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(months, ["2024-12", "2025-01", "2025-03"]);
    assert_eq!(trend[1].expenses, Decimal::ZERO);
    assert_eq!(trend[1].net, d("9"));
    assert_eq!(trend[2].expenses, d("10"));
}

#[test]
fn empty_input_yields_zeroes_not_errors() {
    let agg = Aggregator::new(&[], &[]);
    let stats = agg.expense_stats(&DateRange::all()).unwrap();
    assert_eq!(stats.total_amount, Decimal::ZERO);
    assert_eq!(stats.average_amount, Decimal::ZERO);
    assert!(stats.category_breakdown.is_empty());
    assert!(stats.top_categories.is_empty());
    assert!(stats.monthly_trend.is_empty());

    let stats = agg.income_stats(&DateRange::all()).unwrap();
    assert_eq!(stats.total_amount, Decimal::ZERO);
    assert_eq!(stats.average_amount, Decimal::ZERO);
    assert!(stats.source_breakdown.is_empty());
    assert!(stats.top_sources.is_empty());
    assert!(stats.monthly_trend.is_empty());
}

#[test]
fn breakdown_sums_to_total() {
    let expenses = vec![
        expense(1, "0.10", "Coffee", "2025-01-01"),
        expense(2, "0.20", "Coffee", "2025-01-02"),
        expense(3, "12.35", "Books", "2025-01-03"),
        expense(4, "1000.01", "Rent", "2025-01-04"),
    ];
    let stats = Aggregator::new(&expenses, &[])
        .expense_stats(&DateRange::all())
        .unwrap();
    let sum: Decimal = stats.category_breakdown.values().copied().sum();
    assert_eq!(sum, stats.total_amount);
    assert_eq!(stats.total_amount, d("1012.66"));
    // exact decimal, no binary float drift
    assert_eq!(stats.category_breakdown["Coffee"], d("0.30"));
}

#[test]
fn percentages_sum_to_one_hundred() {
    let expenses = vec![
        expense(1, "10", "A", "2025-01-01"),
        expense(2, "10", "B", "2025-01-01"),
        expense(3, "10", "C", "2025-01-01"),
    ];
    let stats = Aggregator::new(&expenses, &[])
        .expense_stats(&DateRange::all())
        .unwrap();
    let pcts: Vec<f64> = stats.top_categories.iter().map(|c| c.percentage).collect();
    assert_eq!(pcts, [33.34, 33.33, 33.33]);

    let income = vec![
        income(1, "1", "Gift", "2025-01-01"),
        income(2, "2", "Job", "2025-01-01"),
    ];
    let stats = Aggregator::new(&[], &income)
        .income_stats(&DateRange::all())
        .unwrap();
    let sum: f64 = stats.top_sources.iter().map(|s| s.percentage).sum();
    assert!((sum - 100.0).abs() <= 0.01, "sum was {}", sum);
    assert_eq!(stats.top_sources[0].source, "Job");
    assert!(approx(stats.top_sources[0].percentage, 66.67));
}

#[test]
fn seven_equal_categories_still_sum_to_one_hundred() {
    let expenses: Vec<Expense> = ["A", "B", "C", "D", "E", "F", "G"]
        .iter()
        .enumerate()
        .map(|(i, c)| expense(i as i64 + 1, "10", c, "2025-01-01"))
        .collect();
    let stats = Aggregator::new(&expenses, &[])
        .expense_stats(&DateRange::all())
        .unwrap();
    let pcts: Vec<f64> = stats.top_categories.iter().map(|c| c.percentage).collect();
    assert_eq!(pcts, [14.29, 14.29, 14.29, 14.29, 14.28, 14.28, 14.28]);
    let sum: f64 = pcts.iter().sum();
    assert!((sum - 100.0).abs() <= 0.01, "sum was {}", sum);
}

#[test]
fn shares_go_to_largest_remainders() {
    // 1/6 = 16.666.., 5/6 = 83.333..
    let pcts = shares(&[d("5"), d("1")], d("6")).unwrap();
    assert_eq!(pcts, [83.33, 16.67]);
    assert_eq!(shares(&[d("1"), d("2")], Decimal::ZERO).unwrap(), [0.0, 0.0]);
    assert!(shares(&[], d("1")).unwrap().is_empty());
}

#[test]
fn huge_amounts_overflow_instead_of_panicking() {
    let expenses = vec![
        expense(1, "50000000000000000000000000000", "A", "2025-01-01"),
        expense(2, "50000000000000000000000000000", "B", "2025-01-02"),
    ];
    let agg = Aggregator::new(&expenses, &[]);
    assert!(matches!(
        agg.expense_stats(&DateRange::all()),
        Err(AggregateError::Overflow(_))
    ));
    assert!(matches!(
        agg.monthly_trend(&DateRange::all()),
        Err(AggregateError::Overflow(_))
    ));
    assert!(matches!(
        agg.dashboard_for(&DateRange::all(), 5),
        Err(AggregateError::Overflow(_))
    ));
    assert!(matches!(
        agg.summary(&DateRange::all()),
        Err(AggregateError::Overflow(_))
    ));
    assert!(!AggregateError::Overflow("total").is_client_error());
}

#[test]
fn tiny_income_against_large_spending_is_an_error() {
    let expenses = vec![expense(1, "10000000000000000000000", "A", "2025-01-01")];
    let income = vec![income(1, "0.00000001", "Job", "2025-01-01")];
    let err = Aggregator::new(&expenses, &income)
        .summary(&DateRange::all())
        .unwrap_err();
    assert_eq!(err, AggregateError::Overflow("percentage"));
}

#[test]
fn top_categories_sorted_by_amount_then_label() {
    let expenses = vec![
        expense(1, "20", "Travel", "2025-01-01"),
        expense(2, "50", "Rent", "2025-01-02"),
        expense(3, "20", "Dining", "2025-01-03"),
        expense(4, "5", "Books", "2025-01-04"),
        expense(5, "15", "Travel", "2025-01-05"),
    ];
    let stats = Aggregator::new(&expenses, &[])
        .expense_stats(&DateRange::all())
        .unwrap();
    let order: Vec<&str> = stats
        .top_categories
        .iter()
        .map(|c| c.category.as_str())
        .collect();
    assert_eq!(order, ["Rent", "Travel", "Dining", "Books"]);
    assert_eq!(stats.top_categories[1].count, 2);
    assert_eq!(stats.top_categories[1].amount, d("35"));
}

#[test]
fn equal_amounts_break_ties_lexically() {
    let expenses = vec![
        expense(1, "20", "Zoo", "2025-01-01"),
        expense(2, "20", "Apples", "2025-01-02"),
    ];
    let stats = Aggregator::new(&expenses, &[])
        .expense_stats(&DateRange::all())
        .unwrap();
    assert_eq!(stats.top_categories[0].category, "Apples");
    assert_eq!(stats.top_categories[1].category, "Zoo");
}

#[test]
fn identical_records_are_not_deduplicated() {
    let expenses = vec![
        expense(1, "9.99", "Streaming", "2025-01-01"),
        expense(1, "9.99", "Streaming", "2025-01-01"),
    ];
    let stats = Aggregator::new(&expenses, &[])
        .expense_stats(&DateRange::all())
        .unwrap();
    assert_eq!(stats.total_amount, d("19.98"));
    assert_eq!(stats.top_categories[0].count, 2);
}

#[test]
fn inverted_range_fails_everywhere() {
    let expenses = vec![expense(1, "10", "A", "2025-01-01")];
    let income = vec![income(1, "10", "B", "2025-01-01")];
    let agg = Aggregator::new(&expenses, &income);
    let range = DateRange {
        start: Some(day("2025-02-01")),
        end: Some(day("2025-01-01")),
    };
    let expected = AggregateError::InvalidRange {
        start: day("2025-02-01"),
        end: day("2025-01-01"),
    };
    assert_eq!(agg.expense_stats(&range).unwrap_err(), expected);
    assert_eq!(agg.income_stats(&range).unwrap_err(), expected);
    assert_eq!(agg.monthly_trend(&range).unwrap_err(), expected);
    assert_eq!(agg.dashboard_for(&range, 5).unwrap_err(), expected);
    assert_eq!(agg.summary(&range).unwrap_err(), expected);
    assert!(DateRange::new(range.start, range.end).is_err());
}

#[test]
fn single_day_range_is_valid_and_inclusive() {
    let expenses = vec![
        expense(1, "10", "A", "2025-01-01"),
        expense(2, "20", "A", "2025-01-02"),
        expense(3, "40", "A", "2025-01-03"),
    ];
    let range = DateRange::new(Some(day("2025-01-02")), Some(day("2025-01-02"))).unwrap();
    let stats = Aggregator::new(&expenses, &[]).expense_stats(&range).unwrap();
    assert_eq!(stats.total_amount, d("20"));

    let open_end = DateRange::new(Some(day("2025-01-02")), None).unwrap();
    let stats = Aggregator::new(&expenses, &[])
        .expense_stats(&open_end)
        .unwrap();
    assert_eq!(stats.total_amount, d("60"));
}

#[test]
fn expense_stats_trend_carries_income_side() {
    let expenses = vec![expense(1, "30", "A", "2025-01-01")];
    let income = vec![income(1, "100", "Job", "2025-02-01")];
    let stats = Aggregator::new(&expenses, &income)
        .expense_stats(&DateRange::all())
        .unwrap();
    assert_eq!(stats.monthly_trend.len(), 2);
    assert_eq!(stats.monthly_trend[1].income, d("100"));
    assert!(!stats.category_breakdown.contains_key("Job"));
}

#[test]
fn average_rounds_half_away_from_zero() {
    assert_eq!(average(d("25"), 3), d("8.33"));
    assert_eq!(average(d("0.03"), 2), d("0.02"));
    assert_eq!(average(d("100"), 0), Decimal::ZERO);
}

#[test]
fn percentage_rounds_half_away_from_zero() {
    assert!(approx(percentage(d("1"), d("800")).unwrap(), 0.13));
    assert!(approx(percentage(d("-1"), d("800")).unwrap(), -0.13));
    assert_eq!(percentage(d("5"), Decimal::ZERO).unwrap(), 0.0);
    assert!(approx(percentage(d("1"), d("3")).unwrap(), 33.33));
}

#[test]
fn summary_reports_savings_rate_and_leaders() {
    let expenses = vec![
        expense(1, "300", "Rent", "2025-01-01"),
        expense(2, "100", "Food", "2025-01-02"),
        expense(3, "100", "Food", "2025-01-03"),
    ];
    let income = vec![
        income(1, "800", "Salary", "2025-01-01"),
        income(2, "200", "Bonus", "2025-01-15"),
    ];
    let s = Aggregator::new(&expenses, &income)
        .summary(&DateRange::all())
        .unwrap();
    assert_eq!(s.total_expenses, d("500"));
    assert_eq!(s.total_income, d("1000"));
    assert_eq!(s.net_amount, d("500"));
    assert!(approx(s.savings_rate, 50.0));
    assert_eq!(s.expense_count, 3);
    assert_eq!(s.income_count, 2);
    assert_eq!(s.top_category.as_deref(), Some("Rent"));
    assert_eq!(s.top_source.as_deref(), Some("Salary"));
}

#[test]
fn summary_without_income_has_zero_savings_rate() {
    let expenses = vec![expense(1, "42", "Food", "2025-01-01")];
    let s = Aggregator::new(&expenses, &[])
        .summary(&DateRange::all())
        .unwrap();
    assert_eq!(s.savings_rate, 0.0);
    assert_eq!(s.net_amount, d("-42"));
    assert_eq!(s.top_source, None);

    let s = Aggregator::new(&[], &[]).summary(&DateRange::all()).unwrap();
    assert_eq!(s.top_category, None);
    assert_eq!(s.expense_count, 0);
}

#[test]
fn stats_serialize_with_response_field_names() {
    let expenses = vec![expense(1, "12.50", "Food", "2025-01-05")];
    let stats = Aggregator::new(&expenses, &[])
        .expense_stats(&DateRange::all())
        .unwrap();
    let v = serde_json::to_value(&stats).unwrap();
    for key in [
        "total_amount",
        "average_amount",
        "category_breakdown",
        "monthly_trend",
        "top_categories",
    ] {
        assert!(v.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(v["top_categories"][0]["category"], "Food");
    assert_eq!(v["top_categories"][0]["percentage"], 100.0);
    assert_eq!(v["total_amount"], 12.5);
    assert_eq!(v["category_breakdown"]["Food"], 12.5);
    assert_eq!(v["monthly_trend"][0]["net"], -12.5);
    assert!(v["top_categories"][0]["amount"].is_number());
}
