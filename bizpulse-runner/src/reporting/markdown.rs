//! Markdown dashboard generator.

use std::fmt::Write as _;

use bizpulse_core::aggregate::{recent_margin, weekly_margin, weekly_revenue};
use bizpulse_core::narrative::summary_line;
use bizpulse_core::{HealthStatus, Severity};
use chrono::NaiveDateTime;

use crate::config::ReportConfig;
use crate::data_loader::LoadedData;
use crate::pipeline::Analysis;

/// Fixed action list shown under every dashboard, independent of signals.
pub const STANDING_ACTIONS: [&str; 4] = [
    "Investigate sharp revenue declines and identify demand drivers",
    "Review pricing and cost structures for margin improvement",
    "Launch retention programs for high churn-risk segments",
    "Conduct regional performance audits to address profitability gaps",
];

pub struct MarkdownReportGenerator {
    pub recent_margin_rows: usize,
    pub raw_row_limit: Option<usize>,
}

impl Default for MarkdownReportGenerator {
    fn default() -> Self {
        Self::from_config(&ReportConfig::default())
    }
}

impl MarkdownReportGenerator {
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            recent_margin_rows: config.recent_margin_rows,
            raw_row_limit: config.raw_row_limit,
        }
    }

    pub fn generate(&self, data: &LoadedData, analysis: &Analysis, generated_at: NaiveDateTime) -> String {
        let rows = &data.transactions;
        let mut report = format!(
            "# Business Decision Intelligence Report\n\n\
_Automated performance analysis • Last updated: {}_\n\n\
Dataset: `{}` ({} rows, hash `{}`)\n",
            generated_at.format("%d %b %Y, %H:%M"),
            data.source_path.display(),
            rows.len(),
            data.short_hash()
        );

        // Health snapshot
        let (icon, heading, caption) = health_banner(analysis.health);
        report.push_str("\n## Business Health Snapshot\n\n");
        let _ = writeln!(report, "#### {icon} {heading}\n\n_{caption}_\n");
        match recent_margin(rows, self.recent_margin_rows) {
            Some(margin) => {
                let _ = writeln!(report, "- Avg profit margin (recent): **{:.1}%**", margin * 100.0);
            }
            None => report.push_str("- Avg profit margin (recent): **n/a**\n"),
        }

        // Trend tables
        report.push_str("\n### Revenue Trend\n\n");
        report.push_str("| Week | Revenue |\n");
        report.push_str("|------|---------|\n");
        for week in weekly_revenue(rows) {
            let _ = writeln!(report, "| {} | {:.2} |", week.week, week.revenue);
        }

        report.push_str("\n### Profit Margin Trend\n\n");
        report.push_str("| Week | Avg Margin |\n");
        report.push_str("|------|------------|\n");
        for (week, margin) in weekly_margin(rows) {
            let _ = writeln!(report, "| {} | {:.1}% |", week, margin * 100.0);
        }

        // Signals
        report.push_str("\n## Key Business Signals\n\n");
        if analysis.signals.is_empty() {
            report.push_str("_No significant risk signals detected._\n");
        }
        for signal in &analysis.signals {
            let icon = match signal.severity() {
                Severity::High => "🔴",
                Severity::Medium => "🟠",
            };
            let _ = writeln!(report, "- {icon} {}", summary_line(signal));
        }

        // Narrative as a block quote
        report.push_str("\n## Executive Insight\n\n");
        for line in analysis.narrative.lines() {
            if line.is_empty() {
                report.push_str(">\n");
            } else {
                let _ = writeln!(report, "> {line}");
            }
        }

        report.push_str("\n## Recommended Actions\n\n");
        for action in STANDING_ACTIONS {
            let _ = writeln!(report, "- {action}");
        }

        if !analysis.rule_errors.is_empty() {
            report.push_str("\n## Rule Evaluation Errors\n\n");
            for err in &analysis.rule_errors {
                let _ = writeln!(report, "- {err}");
            }
        }

        if !data.data_quality_warnings.is_empty() {
            report.push_str("\n## Data Quality Warnings\n\n");
            let _ = writeln!(
                report,
                "{} supplied derived values disagreed with recomputed ones.\n",
                data.data_quality_warnings.len()
            );
            for warning in data.data_quality_warnings.iter().take(20) {
                let _ = writeln!(report, "- {warning}");
            }
        }

        self.push_raw_rows(&mut report, data);
        report
    }

    fn push_raw_rows(&self, report: &mut String, data: &LoadedData) {
        let rows = &data.transactions;
        if rows.is_empty() {
            return;
        }
        let shown = self.raw_row_limit.unwrap_or(rows.len()).min(rows.len());

        report.push_str("\n## Underlying Data\n\n");
        if shown < rows.len() {
            let _ = writeln!(report, "_Showing {shown} of {} rows._\n", rows.len());
        }
        report.push_str(
            "| Date | Product | Region | Segment | Qty | Revenue | Cost | Profit | Margin | Week | Month | Churn |\n",
        );
        report.push_str(
            "|------|---------|--------|---------|-----|---------|------|--------|--------|------|-------|-------|\n",
        );
        for tx in rows.iter().take(shown) {
            let _ = writeln!(
                report,
                "| {} | {} | {} | {} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {} | {} | {} |",
                tx.date(),
                tx.product(),
                tx.region(),
                tx.customer_segment(),
                tx.quantity(),
                tx.revenue(),
                tx.cost(),
                tx.profit(),
                tx.profit_margin(),
                tx.week(),
                tx.month(),
                tx.churn_risk()
            );
        }
    }
}

fn health_banner(health: HealthStatus) -> (&'static str, &'static str, &'static str) {
    match health {
        HealthStatus::NeedsAttention => (
            "🔴",
            "Needs Attention",
            "High-severity risks detected despite healthy margins",
        ),
        HealthStatus::Monitor => ("🟠", "Monitor Closely", "Moderate risks detected, watch trends"),
        HealthStatus::Stable => ("🟢", "Stable", "No significant risk signals detected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analyze;
    use bizpulse_core::domain::ChurnRisk;
    use bizpulse_core::{RuleConfig, Transaction};
    use chrono::NaiveDate;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn dataset(n: usize) -> LoadedData {
        let rows = (0..n)
            .map(|i| {
                let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64);
                let region = if i % 2 == 0 { "North" } else { "West" };
                Transaction::new(date, "Product_A", region, "New", 1, 100.0, 60.0, ChurnRisk::Low)
            })
            .collect();
        LoadedData::from_transactions(rows, "data/processed/business_data_processed.csv")
    }

    #[test]
    fn sections_in_order() {
        let data = dataset(10);
        let analysis = analyze(&data.transactions, &RuleConfig::default());
        let md = MarkdownReportGenerator::default().generate(&data, &analysis, stamp());

        let order = [
            "# Business Decision Intelligence Report",
            "Last updated: 01 Jul 2024, 09:30",
            "## Business Health Snapshot",
            "#### 🟠 Monitor Closely",
            "- Avg profit margin (recent): **40.0%**",
            "### Revenue Trend",
            "### Profit Margin Trend",
            "## Key Business Signals",
            "- 🟠 North region is underperforming in total profit.",
            "## Executive Insight",
            "> ⚠️ Overall Business Health: Monitor Closely",
            "## Recommended Actions",
            "## Underlying Data",
        ];
        let mut cursor = 0;
        for needle in order {
            let found = md[cursor..]
                .find(needle)
                .unwrap_or_else(|| panic!("missing or out of order: {needle}"));
            cursor += found + needle.len();
        }
        assert!(!md.contains("## Rule Evaluation Errors"));
    }

    #[test]
    fn raw_rows_are_truncated() {
        let data = dataset(30);
        let analysis = analyze(&data.transactions, &RuleConfig::default());
        let generator = MarkdownReportGenerator {
            recent_margin_rows: 50,
            raw_row_limit: Some(5),
        };
        let md = generator.generate(&data, &analysis, stamp());
        assert!(md.contains("_Showing 5 of 30 rows._"));
        let data_rows = md
            .split("## Underlying Data")
            .nth(1)
            .unwrap()
            .lines()
            .filter(|l| l.starts_with("| 2024-"))
            .count();
        assert_eq!(data_rows, 5);
    }

    #[test]
    fn empty_dataset_lists_rule_errors() {
        let data = LoadedData::from_transactions(Vec::new(), "empty.csv");
        let analysis = analyze(&data.transactions, &RuleConfig::default());
        let md = MarkdownReportGenerator::default().generate(&data, &analysis, stamp());
        assert!(md.contains("#### 🟢 Stable"));
        assert!(md.contains("**n/a**"));
        assert!(md.contains("_No significant risk signals detected._"));
        assert!(md.contains("## Rule Evaluation Errors"));
        assert!(md.contains("- low_margin: dataset is empty"));
        assert!(!md.contains("## Underlying Data"));
    }
}
