use clap::{Args, Subcommand};

use super::{confirm, resolve_date, OutputFormat};
use glucon::db::ReadingRepository;
use glucon::models::{current_time, normalize_time, parse_level, BloodSugarReading};

#[derive(Args)]
pub struct ReadingCommand {
    #[command(subcommand)]
    pub command: ReadingSubcommand,
}

#[derive(Subcommand)]
pub enum ReadingSubcommand {
    /// Record a blood sugar reading
    Add {
        /// Blood sugar level in mg/dL
        level: String,

        /// Time of the reading (HH:MM), defaults to now
        #[arg(long, short)]
        time: Option<String>,

        /// Free-form notes
        #[arg(long, short)]
        notes: Option<String>,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// List readings for a day
    List {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Change a recorded reading
    Edit {
        /// Reading ID
        id: String,

        /// Blood sugar level in mg/dL
        #[arg(long)]
        level: Option<String>,

        /// Time of the reading (HH:MM)
        #[arg(long, short)]
        time: Option<String>,

        /// Notes (pass an empty string to clear)
        #[arg(long, short)]
        notes: Option<String>,
    },

    /// Delete a reading
    Delete {
        /// Reading ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl ReadingCommand {
    pub async fn run(&self, repo: &ReadingRepository) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ReadingSubcommand::Add {
                level,
                time,
                notes,
                date,
            } => {
                let level = parse_level(level)?;
                let time = match time {
                    Some(t) => normalize_time(t)?,
                    None => current_time(),
                };
                let date = resolve_date(date)?;

                let mut reading = BloodSugarReading::new(level, time, date);
                if let Some(n) = notes {
                    reading = reading.with_notes(n);
                }
                reading.validate()?;

                repo.create(&reading).await?;
                println!("Recorded reading on {}:", reading.date);
                println!("  {}", reading);
                println!("\nReading ID: {}", reading.id);
                Ok(())
            }

            ReadingSubcommand::List { date, format } => {
                let date = resolve_date(date)?;
                let readings = repo.list_by_date(&date).await;

                match format {
                    OutputFormat::Json => {
                        let rows: Vec<_> = readings.iter().map(ReadingView::from).collect();
                        println!("{}", serde_json::to_string_pretty(&rows)?);
                    }
                    OutputFormat::Text => {
                        if readings.is_empty() {
                            println!("No readings for {}", date);
                            return Ok(());
                        }
                        print_reading_table(&readings);
                    }
                }
                Ok(())
            }

            ReadingSubcommand::Edit {
                id,
                level,
                time,
                notes,
            } => {
                if level.is_none() && time.is_none() && notes.is_none() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let mut reading = repo
                    .get_by_id(id)
                    .await?
                    .ok_or_else(|| format!("Reading not found: {}", id))?;

                if let Some(l) = level {
                    reading.level = parse_level(l)?;
                }
                if let Some(t) = time {
                    reading.time = normalize_time(t)?;
                }
                if let Some(n) = notes {
                    reading = reading.with_notes(n);
                }
                reading.validate()?;

                if !repo.update(&reading).await? {
                    return Err(format!("Reading not found: {}", id).into());
                }
                println!("Updated reading:");
                println!("  {}", reading);
                Ok(())
            }

            ReadingSubcommand::Delete { id, force } => {
                let reading = match repo.get_by_id(id).await? {
                    Some(r) => r,
                    None => {
                        println!("No reading with ID {}", id);
                        return Ok(());
                    }
                };

                if !force
                    && !confirm(&format!(
                        "Delete the {} reading from {}?",
                        reading.time, reading.date
                    ))?
                {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                repo.delete(&reading.id).await?;
                println!("Deleted reading: {}", reading);
                Ok(())
            }
        }
    }
}

/// Reading plus its derived status, for JSON output
#[derive(serde::Serialize)]
pub(crate) struct ReadingView<'a> {
    #[serde(flatten)]
    reading: &'a BloodSugarReading,
    status: String,
    color: &'static str,
}

impl<'a> From<&'a BloodSugarReading> for ReadingView<'a> {
    fn from(reading: &'a BloodSugarReading) -> Self {
        let status = reading.status();
        Self {
            reading,
            status: status.to_string(),
            color: status.color(),
        }
    }
}

pub(crate) fn print_reading_table(readings: &[BloodSugarReading]) {
    println!(
        "{:<36}  {:<5}  {:>8}  {:<9}  NOTES",
        "ID", "TIME", "MG/DL", "STATUS"
    );
    println!("{}", "-".repeat(80));
    for reading in readings {
        println!(
            "{:<36}  {:<5}  {:>8}  {:<9}  {}",
            reading.id,
            reading.time,
            reading.level,
            reading.status().to_string(),
            reading.notes.as_deref().unwrap_or("")
        );
    }
}
