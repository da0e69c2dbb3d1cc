//! Slash command parsing and definitions

use crossterm::style::Stylize;

/// Available slash commands
#[derive(Debug, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    Quit,
    /// Forget the current dish
    Clear,
    /// Stream tips again for the current dish
    Tips,
    /// Structured tip card for the current dish
    Card,
    /// Show or set the cuisine hint
    Cuisine(Option<String>),
    Search(String),
    /// Load a recipe by id and make it the current dish
    Recipe(String),
    Status,
    Unknown(String),
}

/// Parse a slash command from user input.
/// Returns None if the input is not a slash command.
pub fn parse_command(input: &str) -> Option<SlashCommand> {
    let input = input.trim();
    if !input.starts_with('/') {
        return None;
    }

    let (cmd, rest) = match input.split_once(' ') {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (input, ""),
    };
    let arg = (!rest.is_empty()).then(|| rest.to_string());

    let command = match cmd.to_lowercase().as_str() {
        "/help" | "/h" | "/?" => SlashCommand::Help,
        "/quit" | "/q" | "/exit" => SlashCommand::Quit,
        "/clear" | "/cls" => SlashCommand::Clear,
        "/tips" | "/t" => SlashCommand::Tips,
        "/card" | "/c" => SlashCommand::Card,
        "/cuisine" => SlashCommand::Cuisine(arg),
        "/search" | "/s" => match arg {
            Some(query) => SlashCommand::Search(query),
            None => SlashCommand::Unknown("/search needs a query".to_string()),
        },
        "/recipe" | "/r" => match arg {
            Some(id) => SlashCommand::Recipe(id),
            None => SlashCommand::Unknown("/recipe needs a meal id".to_string()),
        },
        "/status" => SlashCommand::Status,
        other => SlashCommand::Unknown(format!("Unknown command: {}", other)),
    };

    Some(command)
}

/// Render help text for all slash commands
pub fn render_help(renderer: &super::renderer::TerminalRenderer) {
    let cmd_color = renderer.command_color();
    let muted = renderer.muted_color();

    println!();
    renderer.render_system("Type a dish name to get tips, or use a command:");
    println!();

    let commands = [
        ("/help", "Show this help message"),
        ("/quit", "Exit the chat"),
        ("/tips", "Ask again about the current dish"),
        ("/card", "Tip card with ingredients, pairing and difficulty"),
        ("/cuisine [name]", "Show or set the cuisine of the current dish"),
        ("/search <query>", "Search recipes by name"),
        ("/recipe <id>", "Load a recipe and ask about it"),
        ("/clear", "Forget the current dish"),
        ("/status", "Show the current dish and chef connection"),
    ];

    for (cmd, desc) in &commands {
        println!("  {:<25} {}", cmd.with(cmd_color), desc.with(muted));
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(parse_command("Pad Thai"), None);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(parse_command("/q"), Some(SlashCommand::Quit));
        assert_eq!(parse_command("  /HELP "), Some(SlashCommand::Help));
        assert_eq!(parse_command("/c"), Some(SlashCommand::Card));
    }

    #[test]
    fn test_arguments_keep_spaces() {
        assert_eq!(
            parse_command("/search  fish tacos "),
            Some(SlashCommand::Search("fish tacos".to_string()))
        );
        assert_eq!(
            parse_command("/cuisine"),
            Some(SlashCommand::Cuisine(None))
        );
        assert_eq!(
            parse_command("/cuisine South Indian"),
            Some(SlashCommand::Cuisine(Some("South Indian".to_string())))
        );
    }

    #[test]
    fn test_missing_argument_and_unknown() {
        assert!(matches!(parse_command("/recipe"), Some(SlashCommand::Unknown(_))));
        assert!(matches!(parse_command("/model gpt"), Some(SlashCommand::Unknown(_))));
    }
}
