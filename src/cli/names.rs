//! The `names` subcommand: list known currency codes and display names.

use crate::cli::ui::{StyleType, header_cell, new_styled_table, style_text};
use crate::service::ConversionService;
use anyhow::Result;

pub fn run(service: &ConversionService) -> Result<()> {
    println!("{}", style_text("Currencies", StyleType::Title));

    let mut table = new_styled_table();
    table.set_header(vec![header_cell("Code"), header_cell("Currency")]);
    for (code, name) in service.names() {
        table.add_row(vec![code, name]);
    }
    println!("{table}");

    Ok(())
}
