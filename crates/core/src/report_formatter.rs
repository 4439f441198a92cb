#![allow(clippy::format_push_string)]

use crate::currency::Currency;
use crate::fees::FeeBreakdown;
use crate::pipeline::PipelineReport;
use crate::solver::{PriceSolution, SolveOutcome};

pub struct ReportFormatter;

impl ReportFormatter {
    #[must_use]
    pub fn format(report: &PipelineReport) -> String {
        let currency = report.currency;
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        if report.dry_run {
            output.push_str("                 SELL PLAN (DRY RUN)                           \n");
        } else {
            output.push_str("                    SELL RESULTS                               \n");
        }
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("Listings\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        if report.listed.is_empty() {
            output.push_str("(none)\n");
        }
        for listing in &report.listed {
            let request = &listing.request;
            let flag = match request.outcome {
                SolveOutcome::Exact => "",
                SolveOutcome::Corrected => " (corrected)",
                SolveOutcome::Approximate => " (approximate)",
            };
            output.push_str(&format!(
                "{:>3}x {:<34} buyer {:>12}  you {:>12}{}\n",
                request.quantity,
                truncate(&request.item.name, 34),
                currency.format_cents(request.buyer_price()),
                currency.format_cents(request.price()),
                flag
            ));
            if listing
                .confirmation
                .as_ref()
                .is_some_and(|c| c.requires_confirmation)
            {
                output.push_str("     awaiting confirmation\n");
            }
        }
        output.push('\n');

        output.push_str("Summary\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("Items Looked Up:       {}\n", report.looked_up));
        output.push_str(&format!("Listings:              {}\n", report.listed.len()));
        output.push_str(&format!(
            "Total You Receive:     {}\n",
            currency.format_cents(report.total_received())
        ));
        push_names(&mut output, "No Listings:          ", &report.no_listings);
        push_names(&mut output, "Zero Payout:          ", &report.unprofitable);
        push_names(&mut output, "Approximate Price:    ", &report.approximate);
        push_names(&mut output, "Invalid Fee:          ", &report.invalid_fee);

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");

        output
    }

    /// One solved price, as printed by the `quote` command.
    #[must_use]
    pub fn format_solution(solution: &PriceSolution, currency: Currency) -> String {
        let mut output = Self::format_breakdown(&solution.breakdown, currency);
        output.push_str(&format!(
            "Requested Buyer Price: {}\n",
            currency.format_cents(solution.target)
        ));
        output.push_str(&format!("Outcome:               {:?}\n", solution.outcome));
        output.push_str(&format!("Refinement Steps:      {}\n", solution.iterations));
        output
    }

    #[must_use]
    pub fn format_breakdown(breakdown: &FeeBreakdown, currency: Currency) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "You Receive:           {}\n",
            currency.format_cents(breakdown.received_amount)
        ));
        output.push_str(&format!(
            "Marketplace Fee:       {}\n",
            currency.format_cents(breakdown.marketplace_fee)
        ));
        output.push_str(&format!(
            "Publisher Fee:         {}\n",
            currency.format_cents(breakdown.publisher_fee)
        ));
        output.push_str(&format!(
            "Total Fees:            {}\n",
            currency.format_cents(breakdown.total_fees)
        ));
        output.push_str(&format!(
            "Buyer Pays:            {}\n",
            currency.format_cents(breakdown.buyer_paid_amount)
        ));
        output
    }
}

fn push_names(output: &mut String, label: &str, names: &[String]) {
    if names.is_empty() {
        return;
    }
    output.push_str(&format!("{} {}\n", label, names.len()));
    for name in names {
        output.push_str(&format!("  - {name}\n"));
    }
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let cut: String = name.chars().take(max - 1).collect();
        format!("{cut}…")
    }
}
