use anyhow::Result;
use clap::Parser;

use super::args::{self, Prefilter, Tweaks, UndoScope};
use super::output::Output;
use crate::config::{ActionMode, ConfigFormat, Overrides, ReneConfig};
use crate::engine::SortOrder;

pub mod config;
pub mod rename;
pub mod undo;

#[derive(Parser)]
#[command(
    name = "rene",
    version = env!("CARGO_PKG_VERSION"),
    about = "Batch rename files with positional wildcard patterns",
    long_about = "rene matches names against a FILTER of literals and wildcards (* any run, \
                  ? one character) and builds each new name from a REPLACEMENT in which \
                  * copies a floater, / drops one, ? feeds one to the next S or B rule and \
                  : inserts the next I rule's value.\n\n\
                  Option values are attached: -XM,{$}  -R4/+/bak  -Fd/*.lnk  -TSI",
    after_help = "Examples:\n  \
                  rene '08*-0*' '/hap*' -AR\n  \
                  rene '*.jpg' 'img:.jpg' I/1/1/3/R -R -AS\n  \
                  rene -SL -R\n  \
                  rene -U"
)]
pub struct Cli {
    /// Filter pattern, optionally followed by /clause/... per ?
    pub filter: Option<String>,

    /// Replacement pattern
    pub replacement: Option<String>,

    /// Rules for the ? and : replacement variables, in order (S/..., B/..., I/...)
    pub rules: Vec<String>,

    /// Collision scheme: S stop, C continue, M merge, start token, decoration
    #[arg(short = 'X', long = "collision", value_name = "SCHEME")]
    pub collision: Option<String>,

    /// Floater order, comma separated indices
    #[arg(short = 'O', long = "order", value_name = "INDICES")]
    pub order: Option<String>,

    /// Pre-filter: C case-sensitive, d add directories, D only directories, else exclude glob
    #[arg(short = 'F', long = "prefilter", value_name = "SPEC")]
    pub prefilter: Option<String>,

    /// Recurse into subdirectories: depth, + include / - exclude, directory globs
    #[arg(
        short = 'R',
        long = "recurse",
        value_name = "SPEC",
        num_args = 0..=1,
        default_missing_value = ""
    )]
    pub recurse: Option<String>,

    /// Action: A ask, S show only, R rename
    #[arg(short = 'A', long = "action", value_name = "MODE")]
    pub action: Option<String>,

    /// Print mask: 1 renames, 2 collisions, 4 skipped, 8 unchanged (bare = all)
    #[arg(
        short = 'P',
        long = "print",
        value_name = "MASK",
        num_args = 0..=1,
        default_missing_value = "0xFFFF"
    )]
    pub print: Option<String>,

    /// Tweaks: S case-insensitive ordering, I line input for confirmation
    #[arg(short = 'T', long = "tweak", value_name = "FLAGS")]
    pub tweaks: Option<String>,

    /// Substitution ops instead of filter and replacement: U, L, ab, aa
    #[arg(short = 'S', long = "substitute", value_name = "OPS")]
    pub substitute: Option<String>,

    /// Treat FILTER as a regular expression and REPLACEMENT as its template
    #[arg(short = 'E', long = "regex")]
    pub regex: bool,

    /// Undo the last run here; -UR follows a recursive run
    #[arg(
        short = 'U',
        long = "undo",
        value_name = "R",
        num_args = 0..=1,
        default_missing_value = ""
    )]
    pub undo: Option<String>,

    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory")]
    pub directory: Option<String>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long)]
    pub config: Option<String>,

    /// Print the merged configuration and exit
    #[arg(
        long,
        value_enum,
        value_name = "FORMAT",
        num_args = 0..=1,
        default_missing_value = "toml"
    )]
    pub show_config: Option<ConfigFormat>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        // Change directory if specified
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        // Set up logging based on verbosity
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);
        let overrides = self.overrides()?;
        let config = ReneConfig::load(self.config.as_deref(), Some(&overrides))?;

        if let Some(format) = self.show_config {
            return config::execute(&config, format);
        }

        let mut settings = config.settings()?;
        if settings.action != ActionMode::Rename && settings.print == 0 {
            settings.print = args::PRINT_RENAMES;
        }
        tracing::debug!("settings: {settings:?}");

        if let Some(scope) = self.undo.as_deref() {
            let scope: UndoScope = args::parse_undo(scope)?;
            return undo::execute(scope, &settings, &output);
        }

        let request = rename::RenameRequest::from_cli(self)?;
        rename::execute(request, &settings, &output)
    }

    /// Command-line values that take part in configuration layering.
    fn overrides(&self) -> Result<Overrides> {
        let mut overrides = Overrides::default();
        if let Some(action) = &self.action {
            overrides.action = Some(args::parse_action(action)?);
        }
        if let Some(print) = &self.print {
            overrides.print = Some(args::parse_print_mask(print)?);
        }
        overrides.collision = self.collision.clone();
        if let Some(spec) = &self.prefilter {
            if Prefilter::parse(spec)?.case_sensitive {
                overrides.case_sensitive = Some(true);
            }
        }
        if let Some(flags) = &self.tweaks {
            let tweaks = Tweaks::parse(flags)?;
            if tweaks.case_insensitive_sort {
                overrides.sort = Some(SortOrder::CaseInsensitive);
            }
            if tweaks.line_input {
                overrides.line_input = Some(true);
            }
        }
        Ok(overrides)
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,globset=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,globset=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // Reports own stdout; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("rene").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_positionals_and_rules() {
        let cli = parse(&["hap*.txt", "hap?.txt", "S/0/2", "-AR"]);
        assert_eq!(cli.filter.as_deref(), Some("hap*.txt"));
        assert_eq!(cli.replacement.as_deref(), Some("hap?.txt"));
        assert_eq!(cli.rules, vec!["S/0/2"]);
        assert_eq!(cli.action.as_deref(), Some("R"));
    }

    #[test]
    fn test_attached_values() {
        let cli = parse(&["*", "*", "-XM,{$}", "-R4/+/bak", "-Fd/*.lnk", "-TSI"]);
        assert_eq!(cli.collision.as_deref(), Some("M,{$}"));
        assert_eq!(cli.recurse.as_deref(), Some("4/+/bak"));
        assert_eq!(cli.prefilter.as_deref(), Some("d/*.lnk"));
        assert_eq!(cli.tweaks.as_deref(), Some("SI"));
    }

    #[test]
    fn test_bare_optional_values() {
        let cli = parse(&["*", "*", "-R", "-P"]);
        assert_eq!(cli.recurse.as_deref(), Some(""));
        assert_eq!(cli.print.as_deref(), Some("0xFFFF"));

        let cli = parse(&["-UR"]);
        assert_eq!(cli.undo.as_deref(), Some("R"));
        let cli = parse(&["-U"]);
        assert_eq!(cli.undo.as_deref(), Some(""));
    }

    #[test]
    fn test_overrides_from_flags() {
        let cli = parse(&["*", "*", "-AS", "-P5", "-FC", "-TS", "-XS"]);
        let overrides = cli.overrides().unwrap();
        assert_eq!(overrides.action, Some(ActionMode::Show));
        assert_eq!(overrides.print, Some(5));
        assert_eq!(overrides.case_sensitive, Some(true));
        assert_eq!(overrides.sort, Some(SortOrder::CaseInsensitive));
        assert_eq!(overrides.collision.as_deref(), Some("S"));
        assert_eq!(overrides.line_input, None);
    }

    #[test]
    fn test_show_config_format() {
        let cli = parse(&["--show-config"]);
        assert_eq!(cli.show_config, Some(ConfigFormat::Toml));
        let cli = parse(&["--show-config", "json"]);
        assert_eq!(cli.show_config, Some(ConfigFormat::Json));
    }
}
