//! The `convert` subcommand: one conversion, formatted for the terminal.

use crate::cli::ui::{StyleType, style_text};
use crate::error::ConvertError;
use crate::service::ConversionService;
use anyhow::Result;

pub async fn run(service: &ConversionService, from: &str, to: &str, amount: f64) -> Result<()> {
    match service.convert(from, to, amount).await {
        Ok(converted) => {
            // Round for presentation only; the engine itself never rounds.
            let converted = (converted * 100.0).round() / 100.0;
            let from_symbol = service.symbol(from).unwrap_or(from);
            let to_symbol = service.symbol(to).unwrap_or(to);
            let from_name = service.name(from).unwrap_or(from);
            let to_name = service.name(to).unwrap_or(to);

            println!(
                "{} {} {} = {}",
                from_symbol,
                amount,
                from_name,
                style_text(
                    &format!("{to_symbol} {converted} {to_name}"),
                    StyleType::ResultValue
                )
            );

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
        Err(ConvertError::UnknownCurrency(code)) => {
            println!(
                "{}",
                style_text(&format!("Unknown currency: {code}"), StyleType::Error)
            );
            Ok(())
        }
        Err(ConvertError::InvalidAmount(amount)) => {
            println!(
                "{}",
                style_text(&format!("Invalid amount: {amount}"), StyleType::Error)
            );
            Ok(())
        }
        Err(ConvertError::RatesUnavailable) => {
            println!(
                "{}",
                style_text(
                    "Conversion unavailable: no exchange rates fetched yet",
                    StyleType::Error
                )
            );
            Ok(())
        }
    }
}
