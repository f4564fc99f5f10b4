//! Plain-text rendering of a projection: currency formatting, the yearly
//! breakdown table and the multi-page proposal document.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{proposal::Proposal, simulator::YearRecord, summary::ProjectionSummary};

const PAGE_BREAK: char = '\u{000C}';
const PAGE_WIDTH: usize = 96;

fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    grouped
}

/// `R 1 234 567.89`; negatives read `-R 1 234.00`.
pub fn format_currency(value: f64) -> String {
    let text = format!("{:.2}", value.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let nonzero = text.bytes().any(|b| matches!(b, b'1'..=b'9'));
    let sign = if value < 0.0 && nonzero { "-" } else { "" };
    format!("{sign}R {}.{fraction}", group_digits(whole))
}

pub fn format_count(value: u64) -> String {
    group_digits(&value.to_string())
}

/// Fixed-width breakdown of herd size and cash flow per year.
pub fn financial_table(financials: &[YearRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:>10} {:>17} {:>17} {:>19} {:>20}",
        "Year", "Herd Size", "Income", "Expenses", "Net Cash Flow", "Cumulative Cash Flow"
    );
    let _ = writeln!(out, "{}", "-".repeat(PAGE_WIDTH));
    for year in financials {
        let _ = writeln!(
            out,
            "{:<8} {:>10} {:>17} {:>17} {:>19} {:>20}",
            year.name,
            format_count(year.herd_size),
            format_currency(year.income),
            format_currency(year.expenses),
            format_currency(year.net_cash_flow),
            format_currency(year.cumulative_cash_flow),
        );
    }
    out
}

/// Headline figures shown alongside a proposal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyFigures {
    pub farm_name: String,
    pub farm_location: String,
    pub grazing_area_ha: f64,
    pub conservation_area_ha: f64,
    pub max_lsu: f64,
    pub initial_outlay: f64,
    pub break_even: String,
    pub year10_profit: f64,
    pub total_income: f64,
    pub total_expenses: f64,
}

impl KeyFigures {
    pub fn new(proposal: &Proposal, summary: &ProjectionSummary) -> Self {
        Self {
            farm_name: proposal.farm_name.clone(),
            farm_location: proposal.farm_location.clone(),
            grazing_area_ha: summary.grazing_area_ha,
            conservation_area_ha: summary.conservation_area_ha,
            max_lsu: summary.max_lsu,
            initial_outlay: proposal.input.initial_outlay(),
            break_even: summary.break_even.to_string(),
            year10_profit: summary.year10_profit,
            total_income: summary.total_income,
            total_expenses: summary.total_expenses,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} ({})", self.farm_name, self.farm_location);
        let _ = writeln!(out, "  Grazing area:        {:.0} ha", self.grazing_area_ha);
        let _ = writeln!(out, "  Conservation area:   {:.0} ha", self.conservation_area_ha);
        let _ = writeln!(out, "  Max capacity:        {:.0} LSU", self.max_lsu);
        let _ = writeln!(out, "  Initial outlay:      {}", format_currency(self.initial_outlay));
        let _ = writeln!(out, "  Break-even:          {}", self.break_even);
        let _ = writeln!(out, "  Year 10 profit:      {}", format_currency(self.year10_profit));
        let _ = writeln!(out, "  10-year income:      {}", format_currency(self.total_income));
        let _ = writeln!(out, "  10-year expenses:    {}", format_currency(self.total_expenses));
        out
    }
}

/// Printable proposal: cover page, narrative and the financial breakdown.
pub struct ProposalDocument<'a> {
    pub farm_name: &'a str,
    pub narrative: &'a str,
    pub financials: &'a [YearRecord],
    pub key_figures: Option<&'a KeyFigures>,
    pub generated_on: NaiveDate,
}

impl<'a> ProposalDocument<'a> {
    pub fn render(&self) -> String {
        let mut pages = vec![self.cover_page()];

        let mut body = String::new();
        if let Some(figures) = self.key_figures {
            body.push_str("Summary\n\n");
            body.push_str(&figures.render());
            body.push('\n');
        }
        body.push_str("Investment Narrative\n\n");
        let narrative = self.narrative.trim();
        if narrative.is_empty() {
            body.push_str("(No narrative provided.)\n");
        } else {
            for paragraph in narrative.split("\n\n") {
                body.push_str(&wrap(paragraph.trim(), PAGE_WIDTH));
                body.push('\n');
            }
        }
        pages.push(self.page(2, &body));

        let table = format!(
            "Financial & Herd Breakdown\n\n{}",
            financial_table(self.financials)
        );
        pages.push(self.page(3, &table));

        pages.join(&PAGE_BREAK.to_string())
    }

    fn cover_page(&self) -> String {
        let date = self.generated_on.format("%-d %B %Y").to_string();
        let mut out = String::new();
        let _ = writeln!(out, "\n\n\n{:^width$}", "Cattle Stud Farm Proposal", width = PAGE_WIDTH);
        let _ = writeln!(out);
        let _ = writeln!(out, "{:^width$}", self.farm_name, width = PAGE_WIDTH);
        let _ = writeln!(out, "\n\n{:^width$}", date, width = PAGE_WIDTH);
        out
    }

    fn page(&self, number: usize, body: &str) -> String {
        let title = format!("{} Proposal", self.farm_name);
        let label = format!("Page {number}");
        let gap = PAGE_WIDTH.saturating_sub(title.chars().count() + label.len()).max(1);
        format!(
            "{title}{}{label}\n{}\n\n{body}",
            " ".repeat(gap),
            "=".repeat(PAGE_WIDTH)
        )
    }
}

fn wrap(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut line_len = 0;
    for word in text.split_whitespace() {
        let len = word.chars().count();
        if line_len > 0 && line_len + 1 + len > width {
            out.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(word);
        line_len += len;
    }
    out.push('\n');
    out
}
