//! Console output for rene
//!
//! Batch reports go to stdout, errors to stderr. Styling comes from
//! `console`, which drops colours when the stream is not a terminal.

use console::{Term, style};
use std::io::{self, Write};

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    /// Create a new output handler
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Print a report line as-is
    pub fn line(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }

    /// Print a planned rename
    pub fn rename(&self, old: &str, new: &str) {
        if !self.quiet {
            println!("Rename {} to {}", old, style(new).green());
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        // Errors are always shown, even in quiet mode
        eprintln!("{} {}", style("✖").red(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("Warning:").yellow(), message);
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    /// Print the directory a recursive run is working in
    pub fn directory(&self, display: &str) {
        if !self.quiet {
            println!("{}", style(display).bold().cyan());
        }
    }

    /// Ask a yes/no question. Anything starting with `y` or `Y` is yes.
    ///
    /// Reads one key press unless `line_input` is set or stdin is not a
    /// terminal, in which case a whole line is read.
    pub fn confirm(&self, message: &str, line_input: bool) -> io::Result<bool> {
        print!("{} {} ", style("❯").cyan(), message);
        io::stdout().flush()?;

        let term = Term::stdout();
        let answer = if !line_input && term.is_term() {
            let key = term.read_char()?;
            println!("{key}");
            key.to_string()
        } else {
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            input
        };

        Ok(matches!(answer.trim_start().chars().next(), Some('y' | 'Y')))
    }
}
