//! Report rendering
//!
//! Turns a [`PricingSummary`] and the input it was computed from into the
//! comparison table, input-parameter tables, and per-region costs, as plain
//! text, Markdown, or JSON.

use chrono::{DateTime, Local};
use clap::ValueEnum;
use comfy_table::presets::{ASCII_MARKDOWN, UTF8_FULL};
use comfy_table::{Cell, CellAlignment, Table};
use domain_pricing::{CapacityMode, Consistency, EstimateInput, PricingSummary, RegionPriceSheet};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use strum::{Display, EnumString};

pub const REPORT_TITLE: &str = "Amazon Keyspaces Pricing Calculator Results";

/// Report output format
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    /// Box-drawn text tables
    #[default]
    Table,
    Markdown,
    Json,
}

/// One metric row of the comparison table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostRow {
    pub metric: &'static str,
    pub provisioned_strong: f64,
    pub on_demand_strong: f64,
    pub provisioned_eventual: f64,
    pub on_demand_eventual: f64,
}

/// Everything a rendered report contains
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub title: &'static str,
    pub generated_at: DateTime<Local>,
    pub input: &'a EstimateInput,
    pub summary: &'a PricingSummary,
    pub rows: Vec<CostRow>,
}

fn cost_row(metric: &'static str, value: impl Fn(CapacityMode, Consistency) -> f64) -> CostRow {
    CostRow {
        metric,
        provisioned_strong: value(CapacityMode::Provisioned, Consistency::Strong),
        on_demand_strong: value(CapacityMode::OnDemand, Consistency::Strong),
        provisioned_eventual: value(CapacityMode::Provisioned, Consistency::Eventual),
        on_demand_eventual: value(CapacityMode::OnDemand, Consistency::Eventual),
    }
}

/// Comparison table rows. The backup row only appears when PITR is enabled.
pub fn cost_rows(summary: &PricingSummary) -> Vec<CostRow> {
    let mut rows = vec![
        cost_row("Read Request Price", |m, c| summary.pricing(m).reads(c)),
        cost_row("Write Request Price", |m, c| summary.pricing(m).writes(c)),
        cost_row("Storage Price", |m, _| summary.pricing(m).storage),
    ];
    if summary.include_backup {
        rows.push(cost_row("Backup Price", |m, _| summary.pricing(m).backup));
    }
    rows.push(cost_row("TTL Deletes Price", |m, _| summary.pricing(m).ttl_deletes));
    rows.push(cost_row("Total", |m, c| summary.total(m, c)));
    rows
}

/// Whole US dollars with thousands separators, e.g. `$1,235`.
pub fn format_price(value: f64) -> String {
    let dollars = value.round();
    let digits = format!("{:.0}", dollars.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if dollars < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

impl<'a> Report<'a> {
    pub fn new(
        input: &'a EstimateInput,
        summary: &'a PricingSummary,
        generated_at: DateTime<Local>,
    ) -> Self {
        Self {
            title: REPORT_TITLE,
            generated_at,
            input,
            summary,
            rows: cost_rows(summary),
        }
    }

    /// Render in `format`. Strong-consistency columns are shown only when
    /// `show_strong` is set; JSON always carries every value.
    pub fn render(&self, format: OutputFormat, show_strong: bool) -> eyre::Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Table => Ok(self.render_text(false, show_strong)),
            OutputFormat::Markdown => Ok(self.render_text(true, show_strong)),
        }
    }

    fn render_text(&self, markdown: bool, show_strong: bool) -> String {
        let heading = |level: usize, text: &str| {
            if markdown {
                format!("{} {text}\n\n", "#".repeat(level))
            } else {
                format!("{text}\n")
            }
        };

        let mut out = String::new();
        out.push_str(&heading(1, self.title));
        let _ = writeln!(
            out,
            "Generated on: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        );
        if markdown {
            out.push('\n');
        }
        let _ = writeln!(out, "Primary Region: {}", self.input.primary().region);
        if !self.input.replicas().is_empty() {
            if markdown {
                out.push('\n');
            }
            out.push_str("Additional Regions:\n");
            for replica in self.input.replicas() {
                let _ = writeln!(out, "- {}", replica.region);
            }
        }
        out.push('\n');

        let _ = writeln!(out, "{}", self.cost_table(markdown, show_strong));
        out.push('\n');

        out.push_str(&heading(2, "Input Parameters"));
        let _ = writeln!(out, "{}", self.input_table(markdown));
        out.push('\n');

        if !self.input.replicas().is_empty() {
            out.push_str(&heading(2, "Additional Regions - Read Requests/sec"));
            let _ = writeln!(out, "{}", self.replica_table(markdown));
            out.push('\n');
        }

        out.push_str(&heading(2, "Cost by Region (Eventual)"));
        let _ = writeln!(out, "{}", self.region_table(markdown));
        out.push_str(
            "Per-region write costs exclude the cross-region replication multiplier.\n",
        );

        if !self.summary.unpriced_regions.is_empty() {
            let _ = writeln!(
                out,
                "\nNo pricing available for: {}",
                self.summary.unpriced_regions.join(", ")
            );
        }

        out
    }

    fn cost_table(&self, markdown: bool, show_strong: bool) -> Table {
        let mut table = new_table(markdown);
        let mut header = vec!["Metric"];
        if show_strong {
            header.extend(["Provisioned (Strong)", "On-Demand (Strong)"]);
        }
        header.extend(["Provisioned (Eventual)", "On-Demand (Eventual)"]);
        table.set_header(header);

        for row in &self.rows {
            let mut cells = vec![Cell::new(row.metric)];
            if show_strong {
                cells.push(money_cell(row.provisioned_strong));
                cells.push(money_cell(row.on_demand_strong));
            }
            cells.push(money_cell(row.provisioned_eventual));
            cells.push(money_cell(row.on_demand_eventual));
            table.add_row(cells);
        }
        table
    }

    fn input_table(&self, markdown: bool) -> Table {
        let workload = &self.input.primary().workload;
        let pitr = if workload.point_in_time_recovery_enabled {
            "Enabled"
        } else {
            "Disabled"
        };

        let mut table = new_table(markdown);
        table.set_header(vec!["Parameter", "Primary Region Value"]);
        table.add_row(vec![
            "Average Read Requests/sec".to_string(),
            workload.average_read_requests_per_second.to_string(),
        ]);
        table.add_row(vec![
            "Average Write Requests/sec".to_string(),
            workload.average_write_requests_per_second.to_string(),
        ]);
        table.add_row(vec![
            "Average Row Size (bytes)".to_string(),
            workload.average_row_size_bytes.to_string(),
        ]);
        table.add_row(vec!["Storage (GB)".to_string(), workload.storage_gb.to_string()]);
        table.add_row(vec!["Point-in-Time Recovery".to_string(), pitr.to_string()]);
        table.add_row(vec![
            "TTL Deletes (daily)".to_string(),
            workload.ttl_deletes_per_second.to_string(),
        ]);
        table
    }

    fn replica_table(&self, markdown: bool) -> Table {
        let mut table = new_table(markdown);
        table.set_header(vec!["Region", "Read Requests/sec"]);
        for replica in self.input.replicas() {
            table.add_row(vec![
                replica.region.clone(),
                replica.workload.average_read_requests_per_second.to_string(),
            ]);
        }
        table
    }

    fn region_table(&self, markdown: bool) -> Table {
        let include_backup = self.summary.include_backup;
        let mut table = new_table(markdown);
        table.set_header(vec!["Region", "Provisioned", "On-Demand"]);
        for region in &self.summary.regions {
            table.add_row(vec![
                Cell::new(&region.region),
                money_cell(region.provisioned.total(Consistency::Eventual, include_backup)),
                money_cell(region.on_demand.total(Consistency::Eventual, include_backup)),
            ]);
        }
        table
    }
}

/// Unit prices of one or more regions, one column per region.
pub fn price_table(
    sheets: &[(String, RegionPriceSheet)],
    format: OutputFormat,
) -> eyre::Result<String> {
    if format == OutputFormat::Json {
        let map: BTreeMap<&str, &RegionPriceSheet> =
            sheets.iter().map(|(region, sheet)| (region.as_str(), sheet)).collect();
        return Ok(serde_json::to_string_pretty(&map)?);
    }

    let mut table = new_table(format == OutputFormat::Markdown);
    let mut header = vec!["Price (USD)".to_string()];
    header.extend(sheets.iter().map(|(region, _)| region.clone()));
    table.set_header(header);

    let Some((_, first)) = sheets.first() else {
        return Ok(table.to_string());
    };
    for (i, (name, _)) in first.entries().iter().enumerate() {
        let mut cells = vec![Cell::new(name)];
        cells.extend(sheets.iter().map(|(_, sheet)| {
            Cell::new(sheet.entries()[i].1).set_alignment(CellAlignment::Right)
        }));
        table.add_row(cells);
    }
    Ok(table.to_string())
}

fn new_table(markdown: bool) -> Table {
    let mut table = Table::new();
    table.load_preset(if markdown { ASCII_MARKDOWN } else { UTF8_FULL });
    table
}

fn money_cell(value: f64) -> Cell {
    Cell::new(format_price(value)).set_alignment(CellAlignment::Right)
}
