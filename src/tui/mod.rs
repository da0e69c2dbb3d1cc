//! Interactive chef chat for the terminal
//!
//! Name a dish and the chef streams tips for it. Slash commands switch to
//! tip cards and recipe search. Nothing is kept after the session ends.

pub mod commands;
pub mod prompt;
pub mod renderer;
pub mod spinner;
pub mod theme;

use crate::api::TipsRequest;
use crate::config::Config;
use crate::recipes::RecipeClient;
use crate::tips::{ChefService, TipStream};

use commands::{parse_command, render_help, SlashCommand};
use prompt::PromptHandler;
use renderer::TerminalRenderer;
use spinner::ThinkingSpinner;

use anyhow::Result;

enum CommandResult {
    Continue,
    Quit,
}

/// Chat loop around one [`ChefService`]
pub struct ChefChat {
    chef: ChefService,
    recipes: RecipeClient,
    renderer: TerminalRenderer,
    prompt_handler: PromptHandler,
    /// Dish the chef is currently talking about
    current: Option<TipsRequest>,
    turn_count: usize,
}

impl ChefChat {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            chef: ChefService::from_config(config)?,
            recipes: RecipeClient::new(config.recipes.clone())?,
            renderer: TerminalRenderer::new(),
            prompt_handler: PromptHandler::new(),
            current: None,
            turn_count: 0,
        })
    }

    /// Run the chat main loop
    pub async fn run(&mut self) -> Result<()> {
        let model = self.chef.is_live().then(|| self.chef.model().to_string());
        self.renderer
            .render_banner(env!("CARGO_PKG_VERSION"), model.as_deref());

        loop {
            let input = match self.prompt_handler.read_line(self.renderer.prompt_color()) {
                Some(input) => input,
                None => break,
            };

            if input.is_empty() {
                continue;
            }

            if let Some(cmd) = parse_command(&input) {
                match self.handle_command(cmd).await {
                    CommandResult::Continue => continue,
                    CommandResult::Quit => break,
                }
            } else {
                self.current = Some(TipsRequest::new(input));
                self.ask_current().await;
            }
        }

        self.renderer
            .render_info(&format!("Bon appétit! ({} dishes discussed)", self.turn_count));
        Ok(())
    }

    async fn handle_command(&mut self, cmd: SlashCommand) -> CommandResult {
        match cmd {
            SlashCommand::Help => render_help(&self.renderer),
            SlashCommand::Quit => return CommandResult::Quit,
            SlashCommand::Clear => {
                self.current = None;
                self.renderer.render_success("Current dish cleared.");
            }
            SlashCommand::Tips => self.ask_current().await,
            SlashCommand::Card => self.show_card().await,
            SlashCommand::Cuisine(cuisine) => self.set_cuisine(cuisine),
            SlashCommand::Search(query) => self.search(&query).await,
            SlashCommand::Recipe(id) => self.load_recipe(&id).await,
            SlashCommand::Status => self.render_status(),
            SlashCommand::Unknown(msg) => self.renderer.render_error(&msg),
        }
        CommandResult::Continue
    }

    /// Stream tips for the current dish
    async fn ask_current(&mut self) {
        let Some(request) = self.current.clone() else {
            self.renderer.render_info("Name a dish first, e.g. \"Pad Thai\".");
            return;
        };

        let tips = self.chef.stream_tips(&request);
        self.render_stream(tips).await;
        self.turn_count += 1;
    }

    async fn render_stream(&self, mut tips: TipStream) {
        let mut spinner = ThinkingSpinner::new();
        spinner.start("The chef is thinking...");

        let mut first = true;
        // Chef text still open on the current line
        let mut mid_line = false;
        while let Some(delta) = tips.next_delta().await {
            if first {
                spinner.stop();
                println!();
                first = false;
            }
            if tips.used_fallback() {
                if mid_line {
                    println!();
                    mid_line = false;
                }
                self.renderer.render_tip_line(&delta);
            } else {
                self.renderer.render_delta(&delta);
                mid_line = true;
            }
        }
        spinner.stop();
        if mid_line {
            println!();
        }

        if tips.used_fallback() {
            self.renderer
                .render_info("(house tips, the chef could not be reached)");
        }
        println!();
    }

    async fn show_card(&self) {
        let Some(request) = &self.current else {
            self.renderer.render_info("Name a dish first, e.g. \"Coq au Vin\".");
            return;
        };

        let mut spinner = ThinkingSpinner::new();
        spinner.start("The chef is writing a tip card...");
        let card = self.chef.chef_tips(request).await;
        spinner.stop();

        self.renderer.render_card(&request.dish_name, &card);
    }

    fn set_cuisine(&mut self, cuisine: Option<String>) {
        match (cuisine, self.current.as_mut()) {
            (None, Some(request)) => {
                let shown = request.cuisine.as_deref().unwrap_or("not set");
                self.renderer.render_info(&format!("Cuisine: {}", shown));
            }
            (Some(cuisine), Some(request)) => {
                request.cuisine = Some(cuisine.clone());
                self.renderer
                    .render_success(&format!("Cuisine set to: {}", cuisine));
            }
            (_, None) => self.renderer.render_info("Name a dish first."),
        }
    }

    async fn search(&self, query: &str) {
        match self.recipes.search(query).await {
            Ok(meals) => self.renderer.render_meals(&meals),
            Err(e) => self
                .renderer
                .render_error(&format!("Error fetching recipes: {}", e)),
        }
    }

    async fn load_recipe(&mut self, id: &str) {
        match self.recipes.lookup(id).await {
            Ok(Some(meal)) => {
                self.renderer.render_meal(&meal);
                self.current = Some(meal.tips_request());
                self.ask_current().await;
            }
            Ok(None) => self
                .renderer
                .render_error(&format!("No recipe with id {}", id)),
            Err(e) => self
                .renderer
                .render_error(&format!("Error fetching recipe: {}", e)),
        }
    }

    fn render_status(&self) {
        let chef = if self.chef.is_live() {
            format!("live ({})", self.chef.model())
        } else {
            "offline, house tips only".to_string()
        };
        self.renderer.render_system(&format!("Chef: {}", chef));

        match &self.current {
            Some(request) => {
                self.renderer
                    .render_info(&format!("Dish: {}", request.dish_name));
                if let Some(cuisine) = &request.cuisine {
                    self.renderer.render_info(&format!("Cuisine: {}", cuisine));
                }
                if !request.ingredients.is_empty() {
                    self.renderer.render_info(&format!(
                        "Ingredients: {}",
                        request.ingredients.join(", ")
                    ));
                }
            }
            None => self.renderer.render_info("No dish selected."),
        }
    }
}
