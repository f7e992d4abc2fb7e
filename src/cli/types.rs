use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI parser structure
#[derive(Parser)]
#[command(name = "pagetoc")]
#[command(about = "Adds an in-page table of contents, scroll highlighting and chapter labels to a rendered mdBook", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Rendered book directory (defaults to ./book)
    #[arg(short, long, value_name = "DIR", global = true)]
    pub source: Option<PathBuf>,

    /// Output directory (defaults to ./book-enhanced)
    #[arg(short, long, value_name = "DIR", global = true)]
    pub destination: Option<PathBuf>,

    /// Custom configuration file, may be repeated
    #[arg(short, long, value_name = "CONFIG_FILE", global = true)]
    pub config: Vec<PathBuf>,

    /// Show the full backtrace when an error occurs
    #[arg(short, long, default_value_t = false, global = true)]
    pub trace: bool,

    /// Enable verbose debugging
    #[arg(short = 'g', long, default_value_t = false, global = true)]
    pub debug: bool,
}

/// Subcommands for the CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Enhance every page of a rendered book
    #[command(alias = "e")]
    Enhance(EnhanceArgs),

    /// Print the table of contents a page would get
    Toc {
        /// HTML page to inspect
        #[arg(value_name = "PAGE")]
        page: PathBuf,

        /// Print entries as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print which table of contents entry is active at a scroll position
    Highlight {
        /// HTML page to inspect, with `data-offset-top` on its headings
        #[arg(value_name = "PAGE")]
        page: PathBuf,

        /// Vertical scroll offset of the viewport
        #[arg(long, default_value_t = 0.0)]
        scroll_y: f64,

        /// Height of the viewport
        #[arg(long, default_value_t = 800.0)]
        viewport_height: f64,

        /// Full height of the document
        #[arg(long)]
        document_height: f64,
    },

    /// Print the effective configuration
    Config {
        /// Dotted key to print, e.g. `toc.title`
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
}

/// Options for the enhance command
#[derive(Args, Default)]
pub struct EnhanceArgs {
    /// Watch for changes and enhance again
    #[arg(short = 'w', long, default_value_t = false)]
    pub watch: bool,

    /// Run every navigation label attempt at once instead of on the retry schedule
    #[arg(long, default_value_t = false)]
    pub no_wait: bool,

    /// Silence output
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Print verbose output
    #[arg(short = 'V', long, default_value_t = false)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::parse_from(["pagetoc", "enhance", "--watch", "-s", "out/book", "-c", "a.yml", "-c", "b.toml"]);
        assert_eq!(cli.source, Some(PathBuf::from("out/book")));
        assert_eq!(cli.config, vec![PathBuf::from("a.yml"), PathBuf::from("b.toml")]);
        match cli.command {
            Some(Commands::Enhance(args)) => assert!(args.watch && !args.no_wait),
            _ => panic!("expected enhance"),
        }
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::parse_from(["pagetoc", "-g"]);
        assert!(cli.debug);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_highlight_metrics() {
        let cli = Cli::parse_from([
            "pagetoc", "highlight", "page.html", "--scroll-y", "350", "--document-height", "3000",
        ]);
        match cli.command {
            Some(Commands::Highlight { scroll_y, viewport_height, document_height, .. }) => {
                assert_eq!((scroll_y, viewport_height, document_height), (350.0, 800.0, 3000.0));
            }
            _ => panic!("expected highlight"),
        }
    }
}
