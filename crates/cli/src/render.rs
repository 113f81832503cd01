//! Terminal rendering of tenders and stats.

use tenderdesk_core::Entity;
use tenderdesk_tenders::{TenderRecord, TenderStats, TenderValue};

const HEADERS: [&str; 6] = ["NAME", "ID", "STATUS", "VALUE", "DEADLINE", "ORG"];

/// `₹ 12,34,567` (Indian digit grouping, up to three decimals), or `₹ -` for zero.
pub fn format_inr(value: TenderValue) -> String {
    if value.is_zero() {
        return "₹ -".to_string();
    }

    let fixed = format!("{:.3}", value.amount());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::from("₹ ");
    out.push_str(&group_indian(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Group digits as lakhs/crores: the last three together, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);

    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    let mut out = groups.join(",");
    out.push(',');
    out.push_str(tail);
    out
}

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() { "-" } else { s }
}

/// A padded table, one row per tender, or a short notice when empty.
pub fn render_table<'a>(records: impl IntoIterator<Item = &'a TenderRecord>) -> String {
    let rows: Vec<[String; 6]> = records
        .into_iter()
        .map(|r| {
            [
                r.name().to_string(),
                r.id().to_string(),
                r.status().to_string(),
                format_inr(r.value()),
                or_dash(r.deadline()).to_string(),
                or_dash(r.org()).to_string(),
            ]
        })
        .collect();

    if rows.is_empty() {
        return "No tenders match.\n".to_string();
    }

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, w)| format!("{cell:<w$}", w = *w))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// One-line summary in the order of the dashboard counters.
pub fn render_stats(stats: &TenderStats) -> String {
    format!(
        "Total: {}  Submitted: {}  Pending: {}  Awarded: {}\n",
        stats.total(),
        stats.submitted(),
        stats.pending(),
        stats.awarded()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenderdesk_tenders::{TenderFields, TenderStatus};

    fn value(amount: f64) -> TenderValue {
        TenderValue::new(amount).unwrap()
    }

    #[test]
    fn inr_uses_lakh_crore_grouping() {
        assert_eq!(format_inr(value(0.0)), "₹ -");
        assert_eq!(format_inr(value(999.0)), "₹ 999");
        assert_eq!(format_inr(value(1_000.0)), "₹ 1,000");
        assert_eq!(format_inr(value(123_456.0)), "₹ 1,23,456");
        assert_eq!(format_inr(value(12_600_000.0)), "₹ 1,26,00,000");
        assert_eq!(format_inr(value(1_234_567.5)), "₹ 12,34,567.5");
        assert_eq!(format_inr(value(10.12345)), "₹ 10.123");
    }

    #[test]
    fn table_pads_columns_and_dashes_empty_cells() {
        let records = vec![
            TenderRecord::restore(
                "CP1".parse().unwrap(),
                TenderFields {
                    status: TenderStatus::MissingDocs,
                    value: value(5_000.0),
                    ..TenderFields::named("Bridge")
                },
            ),
            TenderRecord::restore(
                "CP22".parse().unwrap(),
                TenderFields {
                    org: "Port Trust".to_string(),
                    deadline: "2025-04-01".to_string(),
                    ..TenderFields::named("Harbour Dredging")
                },
            ),
        ];

        let table = render_table(&records);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("NAME              ID    STATUS"));
        assert_eq!(
            lines[1],
            "Bridge            CP1   Missing Docs  ₹ 5,000  -           -"
        );
        assert_eq!(
            lines[2],
            "Harbour Dredging  CP22  Draft         ₹ -      2025-04-01  Port Trust"
        );
    }

    #[test]
    fn empty_table_says_so() {
        assert_eq!(render_table(std::iter::empty()), "No tenders match.\n");
    }

    #[test]
    fn stats_line_shows_dashboard_counters() {
        let records = vec![TenderRecord::restore(
            "CP1".parse().unwrap(),
            TenderFields {
                status: TenderStatus::Awarded,
                ..TenderFields::named("x")
            },
        )];
        assert_eq!(
            render_stats(&TenderStats::from_records(&records)),
            "Total: 1  Submitted: 0  Pending: 0  Awarded: 1\n"
        );
    }
}
