//! Analytics report
//!
//! Pure reduction of a user's complete transaction history into KPIs and
//! chart-ready series. Kept free of storage so the math is testable on
//! plain record slices.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::{Direction, TransactionRecord};

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub total_transactions: u64,
    /// Sum of all record amounts regardless of direction
    pub total_amount_moved: Decimal,
    pub received_amount: Decimal,
    pub sent_amount: Decimal,
    pub current_balance: Decimal,
}

/// Income vs expense totals for the comparison chart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionTotals {
    pub income: Decimal,
    pub expense: Decimal,
}

/// Count and share of one direction over the whole history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionSlice {
    pub direction: Direction,
    pub count: u64,
    /// Share of the total record count, two decimals, 0.00 on empty history
    pub percentage: Decimal,
}

/// One month's income and expense flows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyFlow {
    /// Human-readable label, e.g. "Jan 2026"
    pub month: String,
    /// First day of the bucket's month
    pub date: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
}

/// The full analytics payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub kpis: Kpis,
    pub direction_totals: DirectionTotals,
    pub direction_breakdown: Vec<DirectionSlice>,
    pub monthly_flow: Vec<MonthlyFlow>,
}

/// Reduce a user's complete history into the report. `current_balance` is
/// looked up separately by the caller.
pub fn build_report(records: &[TransactionRecord], current_balance: Decimal) -> AnalyticsReport {
    let mut sent_count: u64 = 0;
    let mut received_count: u64 = 0;
    let mut sent_amount = Decimal::ZERO;
    let mut received_amount = Decimal::ZERO;
    let mut buckets: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();

    for record in records {
        match record.direction {
            Direction::Sent => {
                sent_count += 1;
                sent_amount += record.amount;
            }
            Direction::Received => {
                received_count += 1;
                received_amount += record.amount;
            }
        }

        let Some(first_of_month) = record.date.date_naive().with_day(1) else {
            continue;
        };
        let (income, expense) = buckets.entry(first_of_month).or_default();
        match record.direction {
            Direction::Sent => *expense += record.amount,
            Direction::Received => *income += record.amount,
        }
    }

    let total = sent_count + received_count;

    let monthly_flow = buckets
        .into_iter()
        .map(|(date, (income, expense))| MonthlyFlow {
            month: date.format("%b %Y").to_string(),
            date,
            income,
            expense,
        })
        .collect();

    AnalyticsReport {
        kpis: Kpis {
            total_transactions: total,
            total_amount_moved: sent_amount + received_amount,
            received_amount,
            sent_amount,
            current_balance,
        },
        direction_totals: DirectionTotals {
            income: received_amount,
            expense: sent_amount,
        },
        direction_breakdown: vec![
            DirectionSlice {
                direction: Direction::Sent,
                count: sent_count,
                percentage: percentage_of(sent_count, total),
            },
            DirectionSlice {
                direction: Direction::Received,
                count: received_count,
                percentage: percentage_of(received_count, total),
            },
        ],
        monthly_flow,
    }
}

/// `count / total * 100`, rounded to two decimals; 0.00 when `total` is 0.
fn percentage_of(count: u64, total: u64) -> Decimal {
    if total == 0 {
        return Decimal::new(0, 2);
    }
    (Decimal::from(count) * Decimal::ONE_HUNDRED / Decimal::from(total)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn record(direction: Direction, amount: Decimal, date: &str) -> TransactionRecord {
        let date: DateTime<Utc> = date.parse().unwrap();
        TransactionRecord {
            id: Uuid::new_v4(),
            user_id: "subject-1".to_string(),
            from_account_id: Uuid::new_v4(),
            to_account_id: Uuid::new_v4(),
            amount,
            direction,
            category: "misc".to_string(),
            counterparty: "Other".to_string(),
            attachment: None,
            date,
            created_at: date,
        }
    }

    #[test]
    fn test_empty_history() {
        let report = build_report(&[], dec!(42));

        assert_eq!(report.kpis.total_transactions, 0);
        assert_eq!(report.kpis.total_amount_moved, Decimal::ZERO);
        assert_eq!(report.kpis.current_balance, dec!(42));
        assert!(report.monthly_flow.is_empty());
        for slice in &report.direction_breakdown {
            assert_eq!(slice.percentage, dec!(0.00));
        }
    }

    #[test]
    fn test_kpi_conservation() {
        let records = vec![
            record(Direction::Sent, dec!(30), "2026-01-05T10:00:00Z"),
            record(Direction::Received, dec!(80), "2026-01-20T10:00:00Z"),
            record(Direction::Sent, dec!(15.50), "2026-02-01T10:00:00Z"),
        ];

        let report = build_report(&records, dec!(100));

        assert_eq!(report.kpis.total_transactions, 3);
        assert_eq!(report.kpis.total_amount_moved, dec!(125.50));
        assert_eq!(report.kpis.sent_amount, dec!(45.50));
        assert_eq!(report.kpis.received_amount, dec!(80));

        // Monthly flows sum back to the per-direction KPI totals
        let income: Decimal = report.monthly_flow.iter().map(|m| m.income).sum();
        let expense: Decimal = report.monthly_flow.iter().map(|m| m.expense).sum();
        assert_eq!(income, report.kpis.received_amount);
        assert_eq!(expense, report.kpis.sent_amount);
    }

    #[test]
    fn test_direction_percentages_round_to_two_decimals() {
        let records = vec![
            record(Direction::Sent, dec!(1), "2026-01-01T00:00:00Z"),
            record(Direction::Sent, dec!(1), "2026-01-02T00:00:00Z"),
            record(Direction::Received, dec!(1), "2026-01-03T00:00:00Z"),
        ];

        let report = build_report(&records, Decimal::ZERO);

        let sent = &report.direction_breakdown[0];
        let received = &report.direction_breakdown[1];
        assert_eq!(sent.direction, Direction::Sent);
        assert_eq!(sent.count, 2);
        assert_eq!(sent.percentage, dec!(66.67));
        assert_eq!(received.count, 1);
        assert_eq!(received.percentage, dec!(33.33));
    }

    #[test]
    fn test_monthly_buckets_sorted_ascending_with_labels() {
        let records = vec![
            record(Direction::Received, dec!(10), "2026-03-15T08:00:00Z"),
            record(Direction::Sent, dec!(5), "2025-12-31T23:59:59Z"),
            record(Direction::Received, dec!(20), "2026-03-01T00:00:00Z"),
        ];

        let report = build_report(&records, Decimal::ZERO);

        assert_eq!(report.monthly_flow.len(), 2);
        assert_eq!(report.monthly_flow[0].month, "Dec 2025");
        assert_eq!(
            report.monthly_flow[0].date,
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
        );
        assert_eq!(report.monthly_flow[0].expense, dec!(5));
        assert_eq!(report.monthly_flow[1].month, "Mar 2026");
        assert_eq!(report.monthly_flow[1].income, dec!(30));
    }
}
