//! # Financial Reporting
//!
//! Derived reporting over the sales history: revenue, cost of goods sold,
//! proportionally-allocated payment fees and the resulting margins, plus a
//! per-product breakdown and a daily revenue series for charting.
//!
//! ## Fee Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A sale can mix categories; its payment fee cannot.                     │
//! │                                                                         │
//! │  Sale 000017: total R$ 100.00, fee R$ 3.50 (crédito)                   │
//! │    ├── Ração lines ........ R$ 60.00                                   │
//! │    └── Higiene lines ...... R$ 40.00                                   │
//! │                                                                         │
//! │  Report filtered to "Ração" attributes                                  │
//! │    fee share = 3.50 × (60.00 / 100.00) = R$ 2.10                       │
//! │                                                                         │
//! │  The fee is assumed to apply uniformly across the whole sale, so a     │
//! │  filter takes its proportional slice of it.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure fold over `&[Sale]`; nothing is cached or
//! persisted. Per-product stats are keyed by product id (name is carried
//! for display only).

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{CartItem, Sale};

// =============================================================================
// Filter
// =============================================================================

/// Which slice of the history a report covers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    /// First calendar day included.
    pub start: NaiveDate,
    /// Last calendar day included.
    pub end: NaiveDate,
    /// Restrict to one category; `None` means all ("Todos").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Restrict to one subgroup (brand); `None` means all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subgroup: Option<String>,
}

impl ReportFilter {
    /// All categories over an inclusive day range.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Self {
        ReportFilter {
            start,
            end,
            category: None,
            subgroup: None,
        }
    }

    /// Restricts the filter to a category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restricts the filter to a subgroup.
    pub fn with_subgroup(mut self, subgroup: impl Into<String>) -> Self {
        self.subgroup = Some(subgroup.into());
        self
    }

    fn includes_day(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }

    fn matches_item(&self, item: &CartItem) -> bool {
        if let Some(category) = &self.category {
            if &item.category != category {
                return false;
            }
        }
        if let Some(subgroup) = &self.subgroup {
            if item.subgroup.as_deref() != Some(subgroup.as_str()) {
                return false;
            }
        }
        true
    }
}

// =============================================================================
// Output
// =============================================================================

/// Accumulated figures for one product across the filtered sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStat {
    /// Catalog id the lines referenced (stats are keyed by this).
    pub product_id: String,
    /// Display name (from the most recent matching line snapshot).
    pub name: String,
    pub category: String,
    /// Units or kilos sold.
    pub quantity: f64,
    pub revenue_cents: i64,
    pub cost_cents: i64,
}

impl ProductStat {
    /// Revenue as Money.
    #[inline]
    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }

    /// Estimated profit: revenue − cost.
    #[inline]
    pub fn estimated_profit(&self) -> Money {
        Money::from_cents(self.revenue_cents - self.cost_cents)
    }
}

/// One day of filtered revenue. Days with no matching revenue are omitted
/// from the series entirely (not reported as zero).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue_cents: i64,
}

/// The full financial picture for a filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub revenue_cents: i64,
    /// Cost of goods sold over the matching lines.
    pub cogs_cents: i64,
    /// Payment fees, allocated proportionally to the filtered revenue.
    pub financial_fees_cents: i64,
    /// revenue − COGS.
    pub gross_profit_cents: i64,
    /// gross profit − financial fees.
    pub net_operating_profit_cents: i64,
    /// net operating profit ÷ revenue × 100; zero when revenue is zero.
    pub net_margin: f64,
    /// Per-product breakdown, highest revenue first.
    pub product_stats: Vec<ProductStat>,
    /// Chronological daily series of filtered revenue.
    pub daily_revenue: Vec<DailyRevenue>,
}

impl FinancialReport {
    /// Revenue as Money.
    #[inline]
    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }

    /// Net operating profit as Money.
    #[inline]
    pub fn net_operating_profit(&self) -> Money {
        Money::from_cents(self.net_operating_profit_cents)
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Builds the financial report for a date range and category/subgroup filter.
///
/// ## Algorithm
/// 1. Keep sales whose timestamp falls on a day inside the range.
/// 2. Within each sale, keep lines matching the filter; a sale with no
///    matching line contributes nothing.
/// 3. Revenue and COGS accumulate over matching lines; the sale's total fee
///    contributes its `filtered revenue / sale total` slice.
/// 4. Margins derive at the end; days bucket by UTC calendar date.
pub fn build_report(sales: &[Sale], filter: &ReportFilter) -> FinancialReport {
    let mut revenue = Money::zero();
    let mut cogs = Money::zero();
    let mut fees = Money::zero();
    let mut stats: HashMap<String, ProductStat> = HashMap::new();
    let mut daily: HashMap<NaiveDate, i64> = HashMap::new();

    for sale in sales {
        let day = sale.timestamp.date_naive();
        if !filter.includes_day(day) {
            continue;
        }

        let matching: Vec<&CartItem> = sale
            .items
            .iter()
            .filter(|item| filter.matches_item(item))
            .collect();
        if matching.is_empty() {
            continue;
        }

        let sale_filtered_revenue: Money = matching.iter().map(|i| i.line_total()).sum();
        revenue += sale_filtered_revenue;

        // This sale's slice of its own payment fees.
        fees += sale
            .total_fee()
            .prorate(sale_filtered_revenue, sale.total());

        for item in &matching {
            cogs += item.line_cost();

            let stat = stats
                .entry(item.product_id.clone())
                .or_insert_with(|| ProductStat {
                    product_id: item.product_id.clone(),
                    name: item.name.clone(),
                    category: item.category.clone(),
                    quantity: 0.0,
                    revenue_cents: 0,
                    cost_cents: 0,
                });
            stat.quantity += item.quantity;
            stat.revenue_cents += item.line_total().cents();
            stat.cost_cents += item.line_cost().cents();
        }

        if sale_filtered_revenue.is_positive() {
            *daily.entry(day).or_insert(0) += sale_filtered_revenue.cents();
        }
    }

    let gross_profit = revenue - cogs;
    let net_operating_profit = gross_profit - fees;
    let net_margin = if revenue.is_zero() {
        0.0
    } else {
        net_operating_profit.cents() as f64 / revenue.cents() as f64 * 100.0
    };

    let mut product_stats: Vec<ProductStat> = stats.into_values().collect();
    product_stats.sort_by(|a, b| {
        b.revenue_cents
            .cmp(&a.revenue_cents)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut daily_revenue: Vec<DailyRevenue> = daily
        .into_iter()
        .map(|(date, revenue_cents)| DailyRevenue {
            date,
            revenue_cents,
        })
        .collect();
    daily_revenue.sort_by_key(|d| d.date);

    FinancialReport {
        revenue_cents: revenue.cents(),
        cogs_cents: cogs.cents(),
        financial_fees_cents: fees.cents(),
        gross_profit_cents: gross_profit.cents(),
        net_operating_profit_cents: net_operating_profit.cents(),
        net_margin,
        product_stats,
        daily_revenue,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
