//! # Report Commands
//!
//! The results panel: DRE-style summary, per-product table and the daily
//! revenue series, over a date range and optional category/subgroup filter.

use pawshop_core::money::Money;
use pawshop_core::report::{build_report, ReportFilter};

use super::CommandResult;
use crate::state::AppContext;

/// Runs the financial report and renders it for the terminal.
pub fn run(ctx: &AppContext, filter: ReportFilter) -> CommandResult {
    let report = build_report(&ctx.shop.sales, &filter);

    let scope = match (&filter.category, &filter.subgroup) {
        (Some(c), Some(s)) => format!("{} / {}", c, s),
        (Some(c), None) => c.clone(),
        (None, Some(s)) => s.clone(),
        (None, None) => "Todos".to_string(),
    };

    let mut out = String::new();
    out.push_str(&format!(
        "RESULTADOS {} a {} ({})\n",
        filter.start.format("%d/%m/%Y"),
        filter.end.format("%d/%m/%Y"),
        scope
    ));
    out.push_str(&format!(
        "  Receita Bruta          {:>12}\n",
        report.revenue().to_string()
    ));
    out.push_str(&format!(
        "  (-) CMV                {:>12}\n",
        Money::from_cents(report.cogs_cents).to_string()
    ));
    out.push_str(&format!(
        "  (-) Taxas Financeiras  {:>12}\n",
        Money::from_cents(report.financial_fees_cents).to_string()
    ));
    out.push_str(&format!(
        "  Lucro Bruto            {:>12}\n",
        Money::from_cents(report.gross_profit_cents).to_string()
    ));
    out.push_str(&format!(
        "  Resultado Líquido      {:>12}\n",
        report.net_operating_profit().to_string()
    ));
    out.push_str(&format!("  Margem Final           {:>11.1}%\n", report.net_margin));

    if !report.product_stats.is_empty() {
        out.push_str("\nPRODUTOS\n");
        for stat in &report.product_stats {
            out.push_str(&format!(
                "  {:<42} {:>9.3}  {:>10}  lucro {:>10}\n",
                stat.name,
                stat.quantity,
                stat.revenue().to_string(),
                stat.estimated_profit().to_string()
            ));
        }
    }

    if !report.daily_revenue.is_empty() {
        out.push_str("\nVENDAS DIÁRIAS\n");
        for day in &report.daily_revenue {
            out.push_str(&format!(
                "  {}  {:>10}\n",
                day.date.format("%d/%m"),
                Money::from_cents(day.revenue_cents).to_string()
            ));
        }
    }

    Ok(out)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppContext;
    use chrono::{Datelike, NaiveDate, Utc};
    use pawshop_core::money::Money;
    use pawshop_core::types::{Product, UnitType};
    use pawshop_store::Store;

    fn today_range() -> (NaiveDate, NaiveDate) {
        let today = Utc::now().date_naive();
        (today.with_day(1).unwrap(), today)
    }

    #[test]
    fn test_report_renders_sections() {
        let store = Store::in_memory();
        let products = vec![Product {
            id: "1".to_string(),
            code: "ACE001".to_string(),
            name: "Coleira".to_string(),
            category: "Acessórios".to_string(),
            subgroup: None,
            cost_price_cents: 1500,
            price_cents: 3500,
            stock: 10.0,
            unit_type: UnitType::Un,
            color: None,
        }];
        store
            .save(pawshop_store::keys::PRODUCTS, &products)
            .unwrap();

        let mut ctx = AppContext::new(store);
        super::super::cart::add(&mut ctx, "ACE001", 2.0).unwrap();
        super::super::sale::add_tender(&mut ctx, "Pix", Money::from_cents(7000)).unwrap();
        super::super::sale::finalize(&mut ctx, &mut crate::printer::ConsolePrinter::new())
            .unwrap();

        let (start, end) = today_range();
        let out = run(&ctx, ReportFilter::range(start, end)).unwrap();

        assert!(out.contains("Receita Bruta"));
        assert!(out.contains("R$ 70.00"));
        assert!(out.contains("Coleira"));
        assert!(out.contains("VENDAS DIÁRIAS"));
    }

    #[test]
    fn test_empty_report_has_no_tables() {
        let ctx = AppContext::new(Store::in_memory());
        let (start, end) = today_range();
        let out = run(&ctx, ReportFilter::range(start, end)).unwrap();

        assert!(out.contains("Margem Final"));
        assert!(!out.contains("PRODUTOS"));
        assert!(!out.contains("VENDAS DIÁRIAS"));
    }
}
