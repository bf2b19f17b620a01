use clap::{Parser, Subcommand};
use pressroom::{articles, config, notes, output, site};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pressroom")]
#[command(version)]
#[command(about = "Static site generator for article and notes blogs")]
#[command(long_about = "\
Static site generator for article and notes blogs

Your filesystem is the data source. One directory per article, metadata
embedded in the document or in a sibling metadata.json, and multi-note
markdown files split on ---- fences.

Site structure:

  my-site/
  ├── build-configuration.json     # { content, theme, dist }
  ├── site.json                    # Title, socials, free-form view data
  └── content/
      ├── articles/
      │   ├── gradle-sharing/
      │   │   ├── ReadMe.md        # Markdown article
      │   │   └── metadata.json    # Sidecar metadata (or embed it)
      │   └── queues/
      │       └── ReadMe.adoc      # AsciiDoc article, embedded //// block
      └── notes/
          └── daily.md             # Many dated notes, ---- between them

Metadata resolution (first available wins):
  embedded block (//// JSON //// or <!-- JSON -->) → metadata.json

A multi-site setup adds sites.json at the top level and builds each site
with its own configuration, plus an optional launch page over them all.")]
struct Cli {
    /// Base directory containing the configuration files
    #[arg(long, short = 'b', default_value = ".", global = true)]
    base: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: copy → articles → notes → compose
    Build,
    /// Build every site listed in sites.json, plus the launch page
    Sites,
    /// Transform article sources in dist and write articles.json only
    Articles,
    /// Parse note files and write notes.json only
    Notes,
    /// Report what a build would process, without mutating anything
    Check,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            println!("==> Building {}", cli.base.display());
            let outcome = site::build(&cli.base)?;
            output::print_site_output(&outcome);
            println!("==> Site built at {}", outcome.dist.display());
        }
        Command::Sites => {
            let outcomes = site::build_all(&cli.base)?;
            for outcome in &outcomes {
                println!("==> {}", outcome.base_dir.display());
                output::print_site_output(outcome);
                println!();
            }
            println!("==> Built {} site(s)", outcomes.len());
        }
        Command::Articles => {
            let build_config = config::load_build_configuration(&cli.base)?;
            let dist = cli.base.join(&build_config.dist);
            let outcome = articles::run(&dist)?;
            output::print_lines(&output::format_article_output(&outcome));
        }
        Command::Notes => {
            let build_config = config::load_build_configuration(&cli.base)?;
            let content = cli.base.join(&build_config.content);
            let dist = cli.base.join(&build_config.dist);
            let outcome = notes::run(&content.join(site::NOTES_DIR), &dist)?;
            output::print_lines(&output::format_notes_output(&outcome));
        }
        Command::Check => {
            println!("==> Checking {}", cli.base.display());
            let report = site::check(&cli.base)?;
            output::print_lines(&output::format_check_output(&report));
            println!("==> Content is valid");
        }
    }

    Ok(())
}
