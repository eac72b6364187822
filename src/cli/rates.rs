use super::ui;
use crate::core::{CurrencyPair, FetchResult};
use comfy_table::Cell;
use std::path::Path;

pub fn format_supported_pairs(pairs: &[CurrencyPair]) -> String {
    let codes: Vec<&str> = pairs.iter().map(CurrencyPair::as_str).collect();
    format!("Supported currency pairs: {}", codes.join(", "))
}

impl FetchResult {
    pub fn display_as_table(&self) -> String {
        if self.rates.is_empty() {
            return ui::style_text("No rates available.", ui::StyleType::Subtle);
        }

        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Pair"), ui::header_cell("Rate")]);

        for (pair, entry) in &self.rates {
            table.add_row(vec![Cell::new(pair.as_str()), ui::rate_cell(entry.rate)]);
        }

        table.to_string()
    }
}

/// Prints the report location and the fetched rates to stdout.
pub fn display_summary(result: &FetchResult, report_path: &Path) {
    let shown = std::path::absolute(report_path).unwrap_or_else(|_| report_path.to_path_buf());
    println!(
        "\n{} {}",
        ui::style_text("Report generated successfully:", ui::StyleType::Success),
        shown.display()
    );

    println!("\n{}", ui::style_text("Current Rates:", ui::StyleType::Title));
    println!("{}", result.display_as_table());
}
