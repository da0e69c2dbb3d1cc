//! Line input for the chef chat

use crossterm::style::{Color, Stylize};
use std::io::{self, BufRead, Write};

/// Reads one line per turn behind a styled prompt
pub struct PromptHandler;

impl PromptHandler {
    pub fn new() -> Self {
        Self
    }

    /// Display the prompt and read a trimmed line.
    /// Returns None on EOF (Ctrl+D).
    pub fn read_line(&mut self, prompt_color: Color) -> Option<String> {
        print!("{} ", ">".with(prompt_color));
        io::stdout().flush().ok()?;

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(_) => None,
        }
    }
}

impl Default for PromptHandler {
    fn default() -> Self {
        Self::new()
    }
}
