//! The `rates` subcommand: current rate table joined with metadata.

use crate::cli::ui::{StyleType, header_cell, new_styled_table, rate_cell, style_text};
use crate::error::ConvertError;
use crate::service::ConversionService;
use anyhow::Result;
use comfy_table::Cell;

pub async fn run(service: &ConversionService) -> Result<()> {
    let table_rows = match service.rates_table().await {
        Ok(rows) => rows,
        Err(ConvertError::RatesUnavailable) => {
            println!(
                "{}",
                style_text(
                    "Rates unavailable: no snapshot fetched yet",
                    StyleType::Error
                )
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", style_text("Exchange rates", StyleType::Title));

    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Currency"),
        header_cell("Symbol"),
        header_cell("Rate"),
    ]);
    for row in table_rows {
        table.add_row(vec![
            Cell::new(row.code),
            Cell::new(row.name),
            Cell::new(row.symbol),
            rate_cell(row.rate),
        ]);
    }
    println!("{table}");

    if let Some(updated) = service.last_updated().await {
        println!(
            "{}",
            style_text(
                &format!("Rates last updated {}", updated.format("%B %-d, %Y %H:%M UTC")),
                StyleType::Subtle
            )
        );
    }

    Ok(())
}
