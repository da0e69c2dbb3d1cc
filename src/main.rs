//! Streetfood Chef CLI - Michelin-style tips for street food at home

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use streetfood_chef::{
    config::{Config, ConfigError},
    tui::{renderer::TerminalRenderer, spinner::ThinkingSpinner, ChefChat},
    ChefService, RecipeClient, TipsRequest,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "streetfood-chef")]
#[command(about = "Michelin-style cooking tips for street food dishes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream chef tips for a dish
    Tips(DishArgs),

    /// Show a tip card with key ingredients, pairing and difficulty
    Card {
        #[command(flatten)]
        dish: DishArgs,

        /// Print the card as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search recipes by name
    Search {
        /// Search text, e.g. "tacos"
        query: String,
    },

    /// Show a recipe by its TheMealDB id
    Recipe {
        /// Meal id from a search result
        id: String,

        /// Also stream chef tips for the recipe
        #[arg(long)]
        tips: bool,
    },

    /// Interactive chef chat
    Chat,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args)]
struct DishArgs {
    /// Dish name, e.g. "Pad Thai"
    dish: String,

    /// Ingredient to mention (repeatable)
    #[arg(short, long = "ingredient")]
    ingredients: Vec<String>,

    /// Cuisine of the dish
    #[arg(short, long)]
    cuisine: Option<String>,
}

impl DishArgs {
    fn into_request(self) -> TipsRequest {
        let request = TipsRequest::new(self.dish).with_ingredients(self.ingredients);
        match self.cuisine {
            Some(cuisine) => request.with_cuisine(cuisine),
            None => request,
        }
    }
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Initialize configuration file with defaults
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration
    Show {
        /// Show only one section (chef, recipes)
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Show configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Tips(dish) => {
            let config = Config::load()?;
            run_tips(&config, dish.into_request()).await?;
        }
        Commands::Card { dish, json } => {
            let config = Config::load()?;
            run_card(&config, dish.into_request(), json).await?;
        }
        Commands::Search { query } => {
            let config = Config::load()?;
            run_search(&config, &query).await?;
        }
        Commands::Recipe { id, tips } => {
            let config = Config::load()?;
            run_recipe(&config, &id, tips).await?;
        }
        Commands::Chat => {
            let config = Config::load()?;
            ChefChat::new(&config)?.run().await?;
        }
        Commands::Config(cmd) => {
            run_config_command(cmd)?;
        }
    }

    Ok(())
}

async fn run_tips(config: &Config, request: TipsRequest) -> Result<()> {
    let chef = ChefService::from_config(config)?;
    info!(
        "Asking for tips on \"{}\" ({})",
        request.dish_name,
        if chef.is_live() { chef.model() } else { "offline" }
    );

    let mut tips = chef.stream_tips(&request);
    let mut spinner = ThinkingSpinner::new();
    spinner.start("The chef is thinking...");

    let mut stdout = std::io::stdout();
    let mut mid_line = false;
    while let Some(delta) = tips.next_delta().await {
        spinner.stop();
        if tips.used_fallback() {
            if mid_line {
                writeln!(stdout)?;
                mid_line = false;
            }
            writeln!(stdout, "{}", delta)?;
        } else {
            write!(stdout, "{}", delta)?;
            stdout.flush()?;
            mid_line = true;
        }
    }
    spinner.stop();

    if mid_line {
        writeln!(stdout)?;
    }
    Ok(())
}

async fn run_card(config: &Config, request: TipsRequest, json: bool) -> Result<()> {
    let chef = ChefService::from_config(config)?;

    let mut spinner = ThinkingSpinner::new();
    if !json {
        spinner.start("The chef is writing a tip card...");
    }
    let card = chef.chef_tips(&request).await;
    spinner.stop();

    if json {
        println!("{}", serde_json::to_string_pretty(&card)?);
    } else {
        TerminalRenderer::new().render_card(&request.dish_name, &card);
    }
    Ok(())
}

async fn run_search(config: &Config, query: &str) -> Result<()> {
    let recipes = RecipeClient::new(config.recipes.clone())?;
    let meals = recipes.search(query).await?;
    TerminalRenderer::new().render_meals(&meals);
    Ok(())
}

async fn run_recipe(config: &Config, id: &str, with_tips: bool) -> Result<()> {
    let recipes = RecipeClient::new(config.recipes.clone())?;
    let renderer = TerminalRenderer::new();

    let Some(meal) = recipes.lookup(id).await? else {
        renderer.render_error(&format!("No recipe with id {}", id));
        return Ok(());
    };
    renderer.render_meal(&meal);

    if with_tips {
        run_tips(config, meal.tips_request()).await?;
    }
    Ok(())
}

fn run_config_command(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Init { force } => config_init(force)?,
        ConfigCommands::Show { section } => config_show(section)?,
        ConfigCommands::Path => println!("{}", Config::default_path().display()),
    }
    Ok(())
}

fn config_init(force: bool) -> Result<()> {
    let path = Config::default_path();

    if path.exists() && !force {
        println!("Configuration file already exists at: {}", path.display());
        println!("Use --force to overwrite");
        return Ok(());
    }

    Config::default().save()?;

    println!("Configuration file created at: {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Add your Groq API key under [chef] in the config file, or");
    println!("  2. Set the environment variable:");
    println!("     export GROQ_API_KEY=your_groq_key");
    println!();
    println!("Without a key the chef serves house tips.");

    Ok(())
}

fn config_show(section: Option<String>) -> Result<()> {
    let config = Config::load()?;

    match config.render(section.as_deref().map(str::to_lowercase).as_deref()) {
        Ok(display) => println!("{}", display),
        Err(ConfigError::UnknownSection(sec)) => {
            println!("Unknown section: {}", sec);
            println!("Available: chef, recipes");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
