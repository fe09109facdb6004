use clap::{Parser, Subcommand};
use folio::catalog::Catalog;
use folio::typewriter::Typewriter;
use folio::{catalog, config, generate, output};
use std::path::PathBuf;
use std::time::Duration;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Single-page portfolio generator")]
#[command(long_about = "\
Single-page portfolio generator

The page is rendered from a catalog of clients, skills and experience. Client
panels open one at a time, each with an image and video gallery; sections
reveal as they scroll into view; the headline types and erases phrases after
your name.

Content structure:

  content/
  ├── catalog.toml                 # Everything the page shows
  ├── config.toml                  # Timings, colors, theme (optional)
  └── public/                      # Media, copied verbatim to the output root
      └── images/
          ├── accor/1.jpg          # Referenced as /images/accor/1.jpg
          └── accor/2.mp4

Run 'folio gen-catalog' for a starter catalog.toml and 'folio gen-config'
for a documented config.toml.

Logging goes to stderr; set RUST_LOG=debug for preload and playback detail.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the page and copy media into the output directory
    Build {
        /// Ignore the build stamp and rebuild everything
        #[arg(long)]
        no_cache: bool,
    },
    /// Validate the catalog and media without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Print a starter catalog.toml
    GenCatalog,
    /// Print the headline animation schedule for the catalog's phrases
    Typewriter {
        /// How much of the animation to simulate
        #[arg(long, default_value_t = 30)]
        seconds: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Build { no_cache } => {
            println!("==> Building {} → {}", cli.source.display(), cli.output.display());
            let report = generate::build(&cli.source, &cli.output, !no_cache)?;
            output::print_build_output(&report);
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let report = generate::check(&cli.source)?;
            let catalog = Catalog::load(&cli.source)?;
            output::print_check_output(&catalog, &report);
            if !report.missing_media.is_empty() {
                return Err(format!("{} media files missing", report.missing_media.len()).into());
            }
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::GenCatalog => {
            print!("{}", catalog::stock_catalog_toml());
        }
        Command::Typewriter { seconds } => {
            let catalog = Catalog::load(&cli.source)?;
            let site_config = config::load_config(&cli.source)?;
            let mut typewriter = Typewriter::new(
                catalog.intro.name.clone(),
                catalog.intro.phrases.clone(),
                site_config.typewriter,
            );
            let frames = typewriter.advance(Duration::from_secs(seconds));
            output::print_typewriter_frames(&catalog.intro.name, &frames);
        }
    }

    Ok(())
}
