use clap::{Parser, Subcommand};
use responsive_sets::imaging::params::parse_arg;
use responsive_sets::imaging::{FocusPoint, ResampleBackend, SourceImage};
use responsive_sets::{
    MaudTemplates, Requirements, ResponsiveImage, SetRegistry, config, logging, output, render,
};
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_CONFIG: &str = "responsive-sets.toml";

#[derive(Parser)]
#[command(name = "responsive-sets")]
#[command(about = "Named responsive image sets for templates")]
#[command(long_about = "\
Named responsive image sets for templates

Sets are declared once in TOML: a resize method, media-query breakpoints in
order of precedence, and the arguments for each rendition.

  [sets.ArticleHero]
  method = \"CroppedImage\"
  default_arguments = [1200, 600]

  [sets.ArticleHero.arguments]
  \"(min-width: 1200px)\" = [1600, 800]
  \"(min-width: 800px)\" = [1200, 600]

Set names are case-insensitive. Rendering a set produces a <picture> with one
<source> per breakpoint and an <img> for the default rendition.

Run 'responsive-sets gen-config' to generate a documented config file.")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Config file; repeat to layer, later files override earlier ones
    /// [default: responsive-sets.toml]
    #[arg(long = "config", global = true)]
    config: Vec<PathBuf>,

    /// Log progress at info level (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List configured sets with their method and breakpoints
    List,
    /// Build every set against a placeholder image and report errors
    Check,
    /// Render one set for an image
    Render(RenderArgs),
    /// Print a stock config file with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Set name (case-insensitive)
    set: String,

    /// Source image path, used to build rendition URLs
    #[arg(long)]
    image: String,

    /// Source image width in pixels
    #[arg(long)]
    width: u32,

    /// Source image height in pixels
    #[arg(long)]
    height: u32,

    /// Alt text for the default <img>
    #[arg(long)]
    title: Option<String>,

    /// Focus point as X,Y in -1..1 (0,0 is the centre, Y=1 the top edge)
    #[arg(long, allow_hyphen_values = true)]
    focus: Option<String>,

    /// Wrap the markup in a preview page with its <script> tags
    #[arg(long, conflicts_with_all = ["json", "plan"])]
    page: bool,

    /// Print the render payload as JSON instead of markup
    #[arg(long, conflicts_with = "plan")]
    json: bool,

    /// Print the planned renditions instead of markup
    #[arg(long)]
    plan: bool,

    /// Arguments overriding the set's default rendition
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let paths = if cli.config.is_empty() {
        vec![PathBuf::from(DEFAULT_CONFIG)]
    } else {
        cli.config
    };

    match cli.command {
        Command::List => {
            let registry = SetRegistry::new(config::load_config(&paths)?);
            output::print_set_list(&registry);
        }
        Command::Check => {
            let registry = SetRegistry::new(config::load_config(&paths)?);
            let checks = registry.check_all();
            output::print_check_report(&checks);
            if checks.iter().any(|c| c.result.is_err()) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Render(args) => {
            let registry = SetRegistry::new(config::load_config(&paths)?);
            return render_set(&registry, args);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn render_set(
    registry: &SetRegistry,
    args: RenderArgs,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    if registry.handler(&args.set).is_none() {
        eprintln!(
            "error: no responsive set named '{}' (available: {})",
            args.set,
            registry.method_names().join(", ")
        );
        return Ok(ExitCode::FAILURE);
    }

    let source = SourceImage::new(args.image, args.width, args.height);
    let focus = match args.focus.as_deref() {
        Some(raw) => Some(
            FocusPoint::parse(raw, source.dimensions())
                .ok_or_else(|| format!("invalid --focus '{raw}', expected X,Y"))?,
        ),
        None => None,
    };
    let formatter = ResampleBackend::new(source);
    let call_args: Vec<_> = args.args.iter().map(|a| parse_arg(a)).collect();

    let mut image = ResponsiveImage::new(registry, &formatter, &MaudTemplates);
    if let Some(focus) = focus.as_ref() {
        image = image.with_focal_crop(focus);
    }
    if let Some(title) = args.title {
        image = image.with_title(title);
    }

    let mut requirements = Requirements::new();
    if args.json || args.plan {
        let Some(payload) = image.payload(&args.set, &call_args, &mut requirements) else {
            return Ok(ExitCode::FAILURE);
        };
        let payload = payload?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&payload)?);
        } else {
            output::print_payload(&payload);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let Some(markup) = image.call(&args.set, &call_args, &mut requirements) else {
        return Ok(ExitCode::FAILURE);
    };
    let markup = markup?;
    if args.page {
        let page = render::preview_page(&args.set, markup, &requirements);
        println!("{}", page.into_string());
    } else {
        println!("{}", markup.into_string());
    }
    Ok(ExitCode::SUCCESS)
}
