//! Analytics module
//!
//! Derived KPIs and time-bucketed series over the transaction log.

mod report;
mod service;

pub use report::{
    build_report, AnalyticsReport, DirectionSlice, DirectionTotals, Kpis, MonthlyFlow,
};
pub use service::AnalyticsService;
