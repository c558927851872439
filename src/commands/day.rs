use clap::Args;

use super::food::print_food_table;
use super::reading::{print_reading_table, ReadingView};
use super::{resolve_date, OutputFormat};
use glucon::ledger::{DayAggregator, DayLedger};

/// Show food and blood sugar side by side for one day
#[derive(Args)]
pub struct DayCommand {
    /// Date (YYYY-MM-DD), defaults to today
    #[arg(long, short)]
    pub date: Option<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl DayCommand {
    pub async fn run(
        &self,
        aggregator: &mut DayAggregator,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let ledger = aggregator.load_date(resolve_date(&self.date)?).await;

        match self.format {
            OutputFormat::Json => print_json(&ledger)?,
            OutputFormat::Text => print_text(&ledger),
        }
        Ok(())
    }
}

fn print_json(ledger: &DayLedger) -> Result<(), serde_json::Error> {
    let readings: Vec<_> = ledger.readings.iter().map(ReadingView::from).collect();
    let value = serde_json::json!({
        "date": ledger.date,
        "foods": ledger.foods,
        "readings": readings,
        "totals": ledger.nutrition_totals(),
        "reading_summary": ledger.reading_summary(),
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_text(ledger: &DayLedger) {
    println!("{}", ledger.date);
    println!("{}", "=".repeat(60));

    println!("\nFood");
    if ledger.foods.is_empty() {
        println!("  No food logged for this date");
    } else {
        print_food_table(&ledger.foods);
    }

    println!("\nBlood Sugar");
    if ledger.readings.is_empty() {
        println!("  No readings for this date");
    } else {
        print_reading_table(&ledger.readings);
    }

    if let Some(summary) = ledger.reading_summary() {
        println!(
            "\n{} reading(s): low {} | high {} | average {:.1} mg/dL",
            summary.count, summary.min, summary.max, summary.average
        );
    }
}
