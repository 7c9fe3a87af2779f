mod commands;
mod config;
mod mealdb;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    cmd_backup, cmd_browse, cmd_categories, cmd_note_clear, cmd_note_clear_all, cmd_note_set,
    cmd_note_show, cmd_random, cmd_recipe_add, cmd_recipe_delete, cmd_recipe_list,
    cmd_recipe_update, cmd_restore, cmd_search, cmd_show, cmd_storage_clear, cmd_theme_contrast,
    cmd_theme_dark, cmd_theme_show, cmd_vault_clear, cmd_vault_list, cmd_vault_toggle,
};
use crate::config::Config;
use crate::mealdb::TheMealDbClient;
use tastytabs_core::service::{SearchKind, TastyService};

#[derive(Parser)]
#[command(
    name = "tastytabs",
    version,
    about = "A local-first recipe browser and vault",
    long_about = "\n\n  ████████╗ █████╗ ███████╗████████╗██╗   ██╗
  ╚══██╔══╝██╔══██╗██╔════╝╚══██╔══╝╚██╗ ██╔╝
     ██║   ███████║███████╗   ██║    ╚████╔╝
     ██║   ██╔══██║╚════██║   ██║     ╚██╔╝
     ██║   ██║  ██║███████║   ██║      ██║
     ╚═╝   ╚═╝  ╚═╝╚══════╝   ╚═╝      ╚═╝
          browse it, vault it, cook it.
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SearchBy {
    Name,
    Ingredient,
    Category,
    Area,
    Letter,
}

impl From<SearchBy> for SearchKind {
    fn from(by: SearchBy) -> Self {
        match by {
            SearchBy::Name => SearchKind::Name,
            SearchBy::Ingredient => SearchKind::Ingredient,
            SearchBy::Category => SearchKind::Category,
            SearchBy::Area => SearchKind::Area,
            SearchBy::Letter => SearchKind::FirstLetter,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the meal feed (one page per starting letter, deduplicated)
    Browse {
        /// Only show meals in this category
        #[arg(short, long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search the recipe service
    Search {
        /// Search query
        query: String,
        /// How to interpret the query
        #[arg(long, value_enum, default_value = "name")]
        by: SearchBy,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one meal in full (personal recipes resolve locally)
    Show {
        /// Meal id
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch a random meal
    Random {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List meal categories
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage your saved-recipe vault
    Vault {
        #[command(subcommand)]
        command: VaultCommands,
    },
    /// Manage your personal recipes
    Recipe {
        #[command(subcommand)]
        command: RecipeCommands,
    },
    /// Attach private notes to meals
    Note {
        #[command(subcommand)]
        command: NoteCommands,
    },
    /// Theme preferences
    Theme {
        #[command(subcommand)]
        command: ThemeCommands,
    },
    /// Write a backup of your local data to a file
    Backup {
        /// Destination file, or a directory to receive a dated filename
        dest: PathBuf,
        /// Include personal recipes
        #[arg(long)]
        recipes: bool,
        /// Include the vault
        #[arg(long)]
        vault: bool,
        /// Include notes
        #[arg(long)]
        notes: bool,
        /// Embed local recipe images into the backup (portable, larger)
        #[arg(long)]
        include_images: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Restore local data from a backup file
    Restore {
        /// Path to the backup JSON file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage local storage
    Storage {
        #[command(subcommand)]
        command: StorageCommands,
    },
}

#[derive(Subcommand)]
enum VaultCommands {
    /// Add a meal to the vault, or remove it if already saved
    Toggle {
        /// Meal id
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List saved meals
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove every saved meal
    Clear {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum RecipeCommands {
    /// Author a new personal recipe
    Add {
        /// Recipe name
        name: String,
        /// Category (freeform)
        #[arg(long)]
        category: Option<String>,
        /// Area/region (freeform)
        #[arg(long)]
        area: Option<String>,
        /// Cooking instructions
        #[arg(long)]
        instructions: Option<String>,
        /// Ingredient as "name:measure" (repeatable)
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
        /// Attach a photo (copied into the app's image store)
        #[arg(long)]
        image: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update an existing personal recipe
    Update {
        /// Recipe id
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New category
        #[arg(long)]
        category: Option<String>,
        /// New area/region
        #[arg(long)]
        area: Option<String>,
        /// New instructions
        #[arg(long)]
        instructions: Option<String>,
        /// Replace the ingredient list with "name:measure" entries (repeatable)
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
        /// Replace the photo
        #[arg(long)]
        image: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a personal recipe (and its stored photos)
    Delete {
        /// Recipe id
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List personal recipes, most recent first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum NoteCommands {
    /// Save (or overwrite) the note for a meal
    Set {
        /// Meal id
        id: String,
        /// Note text (an empty string is a valid note)
        text: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the note for a meal
    Show {
        /// Meal id
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove the note for a meal
    Clear {
        /// Meal id
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove every note
    ClearAll {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ThemeCommands {
    /// Toggle dark mode
    Dark {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle the maximum-contrast dark variant
    Contrast {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show current theme flags
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum StorageCommands {
    /// Delete local data (asks for confirmation)
    Clear {
        /// Clear personal recipes (their stored photos are deleted too)
        #[arg(long)]
        recipes: bool,
        /// Clear the vault
        #[arg(long)]
        vault: bool,
        /// Clear notes
        #[arg(long)]
        notes: bool,
        /// Clear everything
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[allow(clippy::too_many_lines)]
async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let mut svc = TastyService::new(&config.db_path, &config.images_dir)?;
    let client = TheMealDbClient::new();

    match cli.command {
        Commands::Browse { category, json } => {
            cmd_browse(&mut svc, &client, category.as_deref(), json).await
        }
        Commands::Search { query, by, json } => {
            cmd_search(&mut svc, &client, &query, by.into(), json).await
        }
        Commands::Show { id, json } => cmd_show(&mut svc, &client, &id, json).await,
        Commands::Random { json } => cmd_random(&mut svc, &client, json).await,
        Commands::Categories { json } => cmd_categories(&client, json).await,
        Commands::Vault { command } => match command {
            VaultCommands::Toggle { id, json } => {
                cmd_vault_toggle(&mut svc, &client, &id, json).await
            }
            VaultCommands::List { json } => cmd_vault_list(&svc, json),
            VaultCommands::Clear { json } => cmd_vault_clear(&mut svc, json),
        },
        Commands::Recipe { command } => match command {
            RecipeCommands::Add {
                name,
                category,
                area,
                instructions,
                ingredients,
                image,
                json,
            } => cmd_recipe_add(
                &mut svc,
                &name,
                category,
                area,
                instructions,
                &ingredients,
                image.as_deref(),
                json,
            ),
            RecipeCommands::Update {
                id,
                name,
                category,
                area,
                instructions,
                ingredients,
                image,
                json,
            } => cmd_recipe_update(
                &mut svc,
                &id,
                name,
                category,
                area,
                instructions,
                &ingredients,
                image.as_deref(),
                json,
            ),
            RecipeCommands::Delete { id, json } => cmd_recipe_delete(&mut svc, &id, json),
            RecipeCommands::List { json } => cmd_recipe_list(&svc, json),
        },
        Commands::Note { command } => match command {
            NoteCommands::Set { id, text, json } => cmd_note_set(&mut svc, &id, &text, json),
            NoteCommands::Show { id, json } => cmd_note_show(&svc, &id, json),
            NoteCommands::Clear { id, json } => cmd_note_clear(&mut svc, &id, json),
            NoteCommands::ClearAll { json } => cmd_note_clear_all(&mut svc, json),
        },
        Commands::Theme { command } => match command {
            ThemeCommands::Dark { json } => cmd_theme_dark(&mut svc, json),
            ThemeCommands::Contrast { json } => cmd_theme_contrast(&mut svc, json),
            ThemeCommands::Show { json } => cmd_theme_show(&svc, json),
        },
        Commands::Backup {
            dest,
            recipes,
            vault,
            notes,
            include_images,
            json,
        } => cmd_backup(&svc, &dest, recipes, vault, notes, include_images, json),
        Commands::Restore { file, json } => cmd_restore(&mut svc, &file, json),
        Commands::Storage { command } => match command {
            StorageCommands::Clear {
                recipes,
                vault,
                notes,
                all,
                json,
            } => cmd_storage_clear(&mut svc, recipes, vault, notes, all, json),
        },
    }
}
