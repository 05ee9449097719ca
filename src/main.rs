use clap::{ArgAction, Parser, Subcommand};
use responsive_images::attributes::Attributes;
use responsive_images::descriptor::DescriptorBuilder;
use responsive_images::pipeline::Pipeline;
use responsive_images::render::ImageRenderer;
use responsive_images::{config, generate, output, scan};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "responsive-images")]
#[command(about = "Responsive image metadata and <img> rewriting for static sites")]
#[command(long_about = "\
Responsive image metadata and <img> rewriting for static sites

Documents declare the images they use; every image gets a srcset built from
the configured widths, and <img> elements in rendered HTML are rewritten to
carry src, srcset and sizes. Only names and URLs are computed: producing the
resized files is left to your image tooling.

Content structure:

  content/
  ├── config.toml          # Optional, overrides stock defaults
  ├── example.md           # +++ front matter +++ with images = [...]
  ├── gallery.html         # <img src> elements are rewritten
  └── blog/
      └── trip.md

Run 'responsive-images gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: scan → metadata → markdown → rewrite → write
    Build,
    /// Render one <img> element from `path` or `path|title`
    Render {
        /// Image shorthand, e.g. "images/koh-rong.jpg|A beach"
        text: String,
        /// Extra attribute as name=value (repeatable, wins over computed ones)
        #[arg(long = "attr", value_name = "NAME=VALUE")]
        attrs: Vec<String>,
    },
    /// Validate config and content without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Build => {
            let config = config::load_config(&cli.source)?;
            let pipeline = Pipeline::from_config(&config)?;

            println!("==> Scanning {}", cli.source.display());
            let mut documents = scan::scan(&cli.source)?;

            let reports = futures::executor::block_on(pipeline.run(&mut documents))?;

            let summary = generate::generate(&documents, &cli.output)?;
            output::print_build_output(&reports, &summary, &cli.output);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Render { text, attrs } => {
            let config = config::load_config(&cli.source)?;
            let renderer = ImageRenderer::new(DescriptorBuilder::new(&config.images)?);
            let attrs: Attributes = attrs.iter().map(|a| Attributes::parse_pair(a)).collect();
            println!("{}", renderer.render_text_with(&text, &attrs));
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let config = config::load_config(&cli.source)?;
            Pipeline::from_config(&config)?;
            let documents = scan::scan(&cli.source)?;
            output::print_check_output(&config, &documents);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Logs go to stderr so `render` output stays pipeable.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
