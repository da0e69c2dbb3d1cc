//! Terminal rendering with markdown support

use crossterm::style::{Color, Stylize};
use termimad::crossterm::style::Color as MadColor;
use termimad::MadSkin;

use super::theme::Theme;
use crate::recipes::{Meal, MealSummary};
use crate::tips::{ChefTips, TipSource};

/// Terminal renderer with markdown and styled output
pub struct TerminalRenderer {
    theme: Theme,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        let theme = Theme::kitchen();
        let skin = Self::build_skin(&theme);
        Self { theme, skin }
    }

    fn build_skin(theme: &Theme) -> MadSkin {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(mad_color(theme.heading));
        skin.bold.set_fg(mad_color(theme.chef));
        skin.italic.set_fg(mad_color(theme.notice));
        skin.bullet.set_fg(mad_color(theme.house));
        skin
    }

    /// Render the welcome banner
    pub fn render_banner(&self, version: &str, chef: Option<&str>) {
        println!();
        println!("{}", "  Streetfood for Home: Chef Chat".with(self.theme.heading));
        println!(
            "  {} {}",
            "v".with(self.theme.muted),
            version.with(self.theme.muted)
        );

        match chef {
            Some(model) => println!(
                "  {} {}",
                "Chef:".with(self.theme.muted),
                model.with(self.theme.accent)
            ),
            None => println!(
                "  {}",
                "Chef: offline (no GROQ_API_KEY), serving house tips".with(self.theme.muted)
            ),
        }

        println!(
            "  {}",
            "Type a dish name, /help for commands, /quit to exit".with(self.theme.muted)
        );
        println!();
    }

    /// Render a streamed text fragment as it arrives
    pub fn render_delta(&self, text: &str) {
        use std::io::Write;
        print!("{}", text.with(self.theme.chef));
        let _ = std::io::stdout().flush();
    }

    /// Fallback tips arrive as whole sentences; give each its own line
    pub fn render_tip_line(&self, tip: &str) {
        println!("  {}", tip.with(self.theme.house));
    }

    /// Render the structured tip card
    pub fn render_card(&self, dish: &str, card: &ChefTips) {
        self.skin.print_text(&card_markdown(dish, card));
        if card.source == TipSource::Fallback {
            self.render_info("(house tips, the chef is offline)");
        }
        println!();
    }

    /// Render a recipe search result list
    pub fn render_meals(&self, meals: &[MealSummary]) {
        if meals.is_empty() {
            self.render_info("No recipes found. Try a different search!");
            return;
        }

        for meal in meals {
            let origin = [meal.area.as_deref(), meal.category.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "  {:>6}  {} {}",
                meal.id.as_str().with(self.theme.accent),
                meal.title.as_str().with(self.theme.chef),
                format!("({})", origin).with(self.theme.muted),
            );
        }
        println!();
    }

    /// Render one full recipe
    pub fn render_meal(&self, meal: &Meal) {
        self.skin.print_text(&meal_markdown(meal));
        println!();
    }

    /// Render a system message
    pub fn render_system(&self, msg: &str) {
        println!(
            "  {} {}",
            "\u{25b6}".with(self.theme.notice),
            msg.with(self.theme.notice)
        );
    }

    /// Render an error message
    pub fn render_error(&self, msg: &str) {
        println!(
            "  {} {}",
            "\u{2717}".with(self.theme.error),
            msg.with(self.theme.error)
        );
    }

    /// Render a success message
    pub fn render_success(&self, msg: &str) {
        println!(
            "  {} {}",
            "\u{2713}".with(self.theme.success),
            msg.with(self.theme.success)
        );
    }

    /// Render info text
    pub fn render_info(&self, msg: &str) {
        println!("  {}", msg.with(self.theme.muted));
    }

    pub fn prompt_color(&self) -> Color {
        self.theme.prompt
    }

    pub fn command_color(&self) -> Color {
        self.theme.accent
    }

    pub fn muted_color(&self) -> Color {
        self.theme.muted
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Markdown for a tip card
pub fn card_markdown(dish: &str, card: &ChefTips) -> String {
    let mut md = format!("## Michelin Chef Tips: {}\n\n", dish);
    for tip in &card.tips {
        md.push_str(&format!("- {}\n", tip));
    }
    if !card.ingredients.is_empty() {
        md.push_str(&format!(
            "\n**Key ingredients:** {}\n",
            card.ingredients.join(", ")
        ));
    }
    md.push_str(&format!("\n**Pairing:** {}\n", card.pairing));
    md.push_str(&format!("\n**Difficulty:** {}\n", card.difficulty));
    md
}

/// Markdown for a full recipe
pub fn meal_markdown(meal: &Meal) -> String {
    let mut md = format!("## {}\n\n", meal.title);

    let tags: Vec<&str> = [meal.category.as_deref(), meal.area.as_deref()]
        .into_iter()
        .flatten()
        .chain(meal.tags.iter().map(String::as_str))
        .collect();
    if !tags.is_empty() {
        md.push_str(&format!("*{}*\n\n", tags.join(" · ")));
    }

    if !meal.ingredients.is_empty() {
        md.push_str("### Ingredients\n\n");
        for ingredient in &meal.ingredients {
            if ingredient.measure.is_empty() {
                md.push_str(&format!("- {}\n", ingredient.name));
            } else {
                md.push_str(&format!("- {} {}\n", ingredient.measure, ingredient.name));
            }
        }
        md.push('\n');
    }

    if !meal.instructions.is_empty() {
        md.push_str("### Instructions\n\n");
        md.push_str(&meal.instructions.replace("\r\n", "\n"));
        md.push('\n');
    }

    if let Some(video) = &meal.youtube {
        md.push_str(&format!("\nVideo: {}\n", video));
    }

    md
}

/// termimad carries its own crossterm; map the few palette colors across
fn mad_color(color: Color) -> MadColor {
    match color {
        Color::White => MadColor::White,
        Color::Grey => MadColor::Grey,
        Color::DarkGrey => MadColor::DarkGrey,
        Color::Red => MadColor::Red,
        Color::Green => MadColor::Green,
        Color::Yellow => MadColor::Yellow,
        Color::DarkYellow => MadColor::DarkYellow,
        Color::Blue => MadColor::Blue,
        Color::Magenta => MadColor::Magenta,
        Color::Cyan => MadColor::Cyan,
        _ => MadColor::Reset,
    }
}
