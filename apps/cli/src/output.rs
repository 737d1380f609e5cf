//! Rendering of computed ledger reports.

use std::io::Write;

use clap::ValueEnum;
use pumpdesk_core::constants::{DISPLAY_DECIMAL_PRECISION, QUERY_DATE_FORMAT};
use pumpdesk_core::{LedgerReport, MovementTotals};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

pub fn render<W: Write>(report: &LedgerReport, format: OutputFormat, out: W) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => render_text(report, out),
        OutputFormat::Csv => render_csv(report, out),
        OutputFormat::Json => render_json(report, out),
    }
}

fn money(value: Decimal) -> String {
    value.round_dp(DISPLAY_DECIMAL_PRECISION).to_string()
}

fn title_case(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn write_totals<W: Write>(
    out: &mut W,
    label: &str,
    totals: &MovementTotals,
) -> std::io::Result<()> {
    writeln!(out, "{:<24}{:>16}", format!("{} increases:", label), money(totals.increase))?;
    writeln!(out, "{:<24}{:>16}", format!("{} decreases:", label), money(totals.decrease))
}

fn render_text<W: Write>(report: &LedgerReport, mut out: W) -> anyhow::Result<()> {
    let summary = &report.summary;

    writeln!(
        out,
        "{} ledger: {}",
        title_case(report.entity_kind.label()),
        report.entity_id
    )?;
    writeln!(
        out,
        "Period: {} to {}",
        report.query.from_date.format(QUERY_DATE_FORMAT),
        report.query.to_date.format(QUERY_DATE_FORMAT)
    )?;
    writeln!(out)?;

    writeln!(out, "{:<24}{:>16}", "Opening balance:", money(summary.opening_balance))?;
    if let Some(prior) = &summary.prior_totals {
        write_totals(&mut out, "Prior", prior)?;
    }
    writeln!(out, "{:<24}{:>16}", "Balance before range:", money(summary.balance_before_range))?;
    write_totals(&mut out, "Range", &summary.totals_in_range())?;
    if let Some(till_date) = &summary.till_date_totals {
        write_totals(&mut out, "Till-date", till_date)?;
    }
    writeln!(out, "{:<24}{:>16}", "Closing balance:", money(summary.closing_balance))?;
    writeln!(out)?;

    if report.entries.is_empty() {
        writeln!(out, "No transactions in this period.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<12}{:<10}{:>16}{:>16}  {}",
        "Date", "Type", "Amount", "Balance", "Details"
    )?;
    for entry in &report.entries {
        let details = [entry.description.as_deref(), entry.counterparty_reference.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" | ");
        writeln!(
            out,
            "{:<12}{:<10}{:>16}{:>16}  {}",
            entry.date.format(QUERY_DATE_FORMAT).to_string(),
            entry.direction.as_str(),
            money(entry.amount),
            money(entry.running_balance),
            details
        )?;
    }
    Ok(())
}

fn render_csv<W: Write>(report: &LedgerReport, out: W) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "date",
        "direction",
        "amount",
        "running_balance",
        "description",
        "counterparty_reference",
        "source_id",
    ])?;

    for entry in &report.entries {
        writer.write_record([
            entry.date.to_rfc3339(),
            entry.direction.as_str().to_string(),
            entry.amount.to_string(),
            entry.running_balance.to_string(),
            entry.description.clone().unwrap_or_default(),
            entry.counterparty_reference.clone().unwrap_or_default(),
            entry.source_id.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn render_json<W: Write>(report: &LedgerReport, mut out: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut out, report)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pumpdesk_core::utils::time_utils::parse_ledger_date;
    use pumpdesk_core::{compute_ledger, Direction, EntityKind, LedgerQuery, NewLedgerEntry};
    use rust_decimal_macros::dec;

    fn sample_report() -> LedgerReport {
        let entries = vec![
            NewLedgerEntry::new(
                parse_ledger_date("2024-01-05").unwrap(),
                Direction::Increase,
                dec!(500),
            )
            .with_description("Cash deposit"),
            NewLedgerEntry::new(
                parse_ledger_date("2024-01-03").unwrap(),
                Direction::Decrease,
                dec!(200),
            )
            .with_counterparty_reference("CHQ-881"),
        ];
        let computation = compute_ledger(entries, dec!(1000), dec!(250)).unwrap();
        LedgerReport::new(
            EntityKind::BankAccount,
            "acc-1",
            LedgerQuery::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            ),
            computation,
        )
    }

    fn rendered(format: OutputFormat) -> String {
        let mut buffer = Vec::new();
        render(&sample_report(), format, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_text_output() {
        let text = rendered(OutputFormat::Text);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Bank account ledger: acc-1");
        assert_eq!(lines[1], "Period: 2024-01-01 to 2024-01-31");
        assert!(text.contains("Closing balance:"));
        assert!(text.contains("1300"));
        assert!(!text.contains("Prior increases"));

        let rows: Vec<&&str> = lines.iter().filter(|l| l.starts_with("2024-")).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("2024-01-03"));
        assert!(rows[0].contains("CHQ-881"));
        assert!(rows[1].contains("Cash deposit"));
    }

    #[test]
    fn test_text_output_for_empty_period() {
        let mut report = sample_report();
        report.entries.clear();

        let mut buffer = Vec::new();
        render(&report, OutputFormat::Text, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("No transactions in this period."));
    }

    #[test]
    fn test_csv_output() {
        let csv = rendered(OutputFormat::Csv);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "date,direction,amount,running_balance,description,counterparty_reference,source_id"
        );
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("DECREASE,200,800"));
        assert!(lines[2].contains("INCREASE,500,1300,Cash deposit"));
    }

    #[test]
    fn test_json_output() {
        let json = rendered(OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["entityKind"], "BANK_ACCOUNT");
        assert_eq!(value["entityId"], "acc-1");
        assert_eq!(value["entries"].as_array().unwrap().len(), 2);
        assert_eq!(value["entries"][0]["direction"], "DECREASE");
        assert_eq!(value["entries"][1]["runningBalance"], "1300");
        assert_eq!(value["summary"]["closingBalance"], "1300");
        assert!(value["summary"].get("priorTotals").is_none());
    }

    #[test]
    fn test_json_output_keeps_every_digit() {
        let mut report = sample_report();
        report.summary.closing_balance = dec!(12345678901234567890.123456789);

        let mut buffer = Vec::new();
        render(&report, OutputFormat::Json, &mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(
            value["summary"]["closingBalance"],
            "12345678901234567890.123456789"
        );
    }
}
