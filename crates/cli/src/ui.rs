//! Terminal rendering for the conversation view.

use std::io::{self, Write};

use minichat_model::{Role, Turn};
use owo_colors::OwoColorize;

const BAR_CHAR: &str = "▎";
const CURSOR_MARKER: &str = "▌";
// Moves the cursor one column left and clears to the end of the line,
// which removes the previously printed cursor marker.
const ERASE_MARKER: &str = "\u{1b}[1D\u{1b}[K";

/// Renders one turn, tagged by role.
pub fn render_turn(w: &mut impl Write, turn: &Turn) -> io::Result<()> {
    match turn.role {
        Role::User => {
            writeln!(w, "{}{}", BAR_CHAR.bright_green(), turn.content)
        }
        Role::Assistant => {
            writeln!(w, "{}🤖 {}", BAR_CHAR.bright_cyan(), turn.content)
        }
    }
}

/// Prints the generic failure banner.
pub fn render_error_banner(w: &mut impl Write) -> io::Result<()> {
    writeln!(
        w,
        "{}",
        "Something went wrong while generating the reply.".red()
    )?;
    writeln!(w, "{}", "Please check your API keys and try again.".red())
}

/// Incremental writer for a streaming assistant reply.
///
/// The in-progress text is shown with a trailing cursor marker. The marker
/// is erased before each new fragment and again on finalization, so the
/// finalized line carries no marker artifact.
pub struct StreamPrinter<W: Write> {
    w: W,
    started: bool,
}

impl<W: Write> StreamPrinter<W> {
    pub fn new(w: W) -> Self {
        Self { w, started: false }
    }

    /// Appends a fragment to the display.
    pub fn push(&mut self, fragment: &str) -> io::Result<()> {
        if self.started {
            write!(self.w, "{ERASE_MARKER}")?;
        } else {
            write!(self.w, "{}🤖 ", BAR_CHAR.bright_cyan())?;
            self.started = true;
        }
        write!(self.w, "{fragment}{CURSOR_MARKER}")?;
        self.w.flush()
    }

    /// Finalizes the display, removing the cursor marker.
    ///
    /// Prints nothing if no fragment was ever pushed.
    pub fn finish(mut self) -> io::Result<()> {
        if !self.started {
            return Ok(());
        }
        writeln!(self.w, "{ERASE_MARKER}")?;
        self.w.flush()
    }
}
