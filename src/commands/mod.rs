mod config_cmd;
mod day;
mod food;
mod reading;

pub use config_cmd::ConfigCommand;
pub use day::DayCommand;
pub use food::FoodCommand;
pub use reading::ReadingCommand;

use clap::ValueEnum;
use std::io::{self, Write};

use glucon::models::{parse_date, today};
use glucon::ValidationError;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Use the given `--date` or fall back to today
fn resolve_date(date: &Option<String>) -> Result<String, ValidationError> {
    match date {
        Some(d) => parse_date(d),
        None => Ok(today()),
    }
}

/// Ask a yes/no question on stdin; anything but "y" is a no.
fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
