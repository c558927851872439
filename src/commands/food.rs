use clap::{Args, Subcommand};

use super::{confirm, resolve_date, OutputFormat};
use glucon::db::FoodEntryRepository;
use glucon::models::{coerce_amount, FoodEntry, NutritionTotals};

#[derive(Args)]
pub struct FoodCommand {
    #[command(subcommand)]
    pub command: FoodSubcommand,
}

#[derive(Subcommand)]
pub enum FoodSubcommand {
    /// Log something you ate
    Add {
        /// Name of the food
        name: String,

        /// Calories (kcal)
        #[arg(long)]
        calories: Option<String>,

        /// Carbohydrates in grams
        #[arg(long)]
        carbs: Option<String>,

        /// Protein in grams
        #[arg(long)]
        protein: Option<String>,

        /// Fat in grams
        #[arg(long)]
        fat: Option<String>,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// List food logged on a day
    List {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Change a logged food entry
    Edit {
        /// Entry ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// Calories (kcal)
        #[arg(long)]
        calories: Option<String>,

        /// Carbohydrates in grams
        #[arg(long)]
        carbs: Option<String>,

        /// Protein in grams
        #[arg(long)]
        protein: Option<String>,

        /// Fat in grams
        #[arg(long)]
        fat: Option<String>,
    },

    /// Delete a food entry
    Delete {
        /// Entry ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl FoodCommand {
    pub async fn run(&self, repo: &FoodEntryRepository) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            FoodSubcommand::Add {
                name,
                calories,
                carbs,
                protein,
                fat,
                date,
            } => {
                let date = resolve_date(date)?;
                let entry = FoodEntry::new(name.trim(), date)
                    .with_calories(coerce_amount(calories.as_deref()))
                    .with_carbs(coerce_amount(carbs.as_deref()))
                    .with_protein(coerce_amount(protein.as_deref()))
                    .with_fat(coerce_amount(fat.as_deref()));
                entry.validate()?;

                repo.create(&entry).await?;
                println!("Logged food on {}:", entry.date);
                println!("  {}", entry);
                println!("\nEntry ID: {}", entry.id);
                Ok(())
            }

            FoodSubcommand::List { date, format } => {
                let date = resolve_date(date)?;
                let entries = repo.list_by_date(&date).await;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&entries)?);
                    }
                    OutputFormat::Text => {
                        if entries.is_empty() {
                            println!("No food logged for {}", date);
                            return Ok(());
                        }
                        print_food_table(&entries);
                    }
                }
                Ok(())
            }

            FoodSubcommand::Edit {
                id,
                name,
                calories,
                carbs,
                protein,
                fat,
            } => {
                let has_updates = name.is_some()
                    || calories.is_some()
                    || carbs.is_some()
                    || protein.is_some()
                    || fat.is_some();

                if !has_updates {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let mut entry = repo
                    .get_by_id(id)
                    .await?
                    .ok_or_else(|| format!("Food entry not found: {}", id))?;

                if let Some(new_name) = name {
                    entry.name = new_name.trim().to_string();
                }
                if calories.is_some() {
                    entry.calories = coerce_amount(calories.as_deref());
                }
                if carbs.is_some() {
                    entry.carbs = coerce_amount(carbs.as_deref());
                }
                if protein.is_some() {
                    entry.protein = coerce_amount(protein.as_deref());
                }
                if fat.is_some() {
                    entry.fat = coerce_amount(fat.as_deref());
                }
                entry.validate()?;

                if !repo.update(&entry).await? {
                    return Err(format!("Food entry not found: {}", id).into());
                }
                println!("Updated food entry:");
                println!("  {}", entry);
                Ok(())
            }

            FoodSubcommand::Delete { id, force } => {
                let entry = match repo.get_by_id(id).await? {
                    Some(entry) => entry,
                    None => {
                        println!("No food entry with ID {}", id);
                        return Ok(());
                    }
                };

                if !force && !confirm(&format!("Delete '{}' from {}?", entry.name, entry.date))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                repo.delete(&entry.id).await?;
                println!("Deleted food entry: {}", entry.name);
                Ok(())
            }
        }
    }
}

pub(crate) fn print_food_table(entries: &[FoodEntry]) {
    println!(
        "{:<36}  {:<24}  {:>8}  {:>7}  {:>7}  {:>7}",
        "ID", "NAME", "KCAL", "CARBS", "PROTEIN", "FAT"
    );
    println!("{}", "-".repeat(98));
    for entry in entries {
        println!(
            "{:<36}  {:<24}  {:>8.0}  {:>6.1}g  {:>6.1}g  {:>6.1}g",
            entry.id,
            truncate(&entry.name, 24),
            entry.calories,
            entry.carbs,
            entry.protein,
            entry.fat
        );
    }
    let totals: NutritionTotals = entries.iter().collect();
    println!("{}", "-".repeat(98));
    println!("Daily Total: {}", totals);
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let cut: String = s.chars().take(width - 3).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}
