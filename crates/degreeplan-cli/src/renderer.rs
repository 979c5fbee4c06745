//! Terminal output for the Markdown produced by the core's Display impls.
//!
//! Rich mode goes through termimad so plan tables and course cards get
//! styled; plain mode prints the Markdown as is.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();

        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::DarkGrey);
        skin.inline_code.set_fg(Color::Cyan);
        skin.inline_code.set_bg(Color::AnsiValue(236));

        Self { rich_enabled, skin }
    }

    /// Prints `markdown`, always ending on a fresh line.
    pub fn render(&self, markdown: &str) -> Result<()> {
        if self.rich_enabled {
            self.skin.print_text(markdown);
        } else {
            print!("{}", Self::terminated(markdown));
        }
        Ok(())
    }

    fn terminated(markdown: &str) -> String {
        if markdown.ends_with('\n') {
            markdown.to_string()
        } else {
            format!("{markdown}\n")
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
