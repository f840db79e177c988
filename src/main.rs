use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use copywriter::{
    generate_copy, infer_product_name, Config, CopyError, CopyVariant, ErrorKind, GeminiGateway,
    GenerationRequest, ImagePayload, Trigger,
};

/// Persuasive marketing copy generator backed by Gemini
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Gemini model identifier (overrides config and COPYWRITER_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Model endpoint base URL (overrides config and COPYWRITER_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Path to a JSON config file (default: ~/.copywriter/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available persuasion triggers
    Triggers,

    /// Infer a catalog-style product name from an image
    Name {
        /// Product image (PNG, JPEG or WEBP, up to 4MB)
        #[arg(short, long)]
        image: PathBuf,
    },

    /// Generate persuasive copy variants
    Generate {
        /// Product or service name
        #[arg(short, long)]
        product: Option<String>,

        /// Persuasion trigger token (see `triggers`)
        #[arg(short, long, default_value_t = Trigger::default())]
        trigger: Trigger,

        /// Landing page URL of the ad
        #[arg(short, long)]
        url: Option<String>,

        /// Ad image (PNG, JPEG or WEBP, up to 4MB)
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Infer the product name from --image when --product is omitted
        #[arg(long)]
        name_from_image: bool,

        /// Print the variants as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&args)?;

    match args.command {
        Command::Triggers => {
            print_triggers();
            Ok(())
        }
        Command::Name { image } => {
            let gateway = GeminiGateway::new(config)?;
            let data_uri = load_image(&image)?;
            let name = infer_product_name(&gateway, &data_uri)
                .await
                .map_err(report)?;
            println!("{}", name);
            Ok(())
        }
        Command::Generate {
            product,
            trigger,
            url,
            image,
            name_from_image,
            json,
        } => {
            let gateway = GeminiGateway::new(config)?;
            let ad_image = image.as_deref().map(load_image).transpose()?;

            let product_name = match (product, name_from_image, ad_image.as_deref()) {
                (Some(product), _, _) => product,
                (None, true, Some(data_uri)) => {
                    let name = infer_product_name(&gateway, data_uri)
                        .await
                        .map_err(report)?;
                    info!("Using inferred product name: {}", name);
                    name
                }
                (None, true, None) => bail!("Please provide an image first to generate a name."),
                (None, false, _) => {
                    bail!("Please provide the product name and choose a trigger.")
                }
            };

            let mut request = GenerationRequest::new(product_name, trigger);
            if let Some(url) = url {
                request = request.with_url(url);
            }
            if let Some(data_uri) = ad_image {
                request = request.with_image(data_uri);
            }

            let variants = generate_copy(&gateway, &request).await.map_err(report)?;
            print_variants(&variants, json)?;
            Ok(())
        }
    }
}

/// Config file, then environment, then command-line overrides
fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load_from(args.config.as_deref())?.with_env();
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    Ok(config)
}

fn load_image(path: &Path) -> Result<String> {
    let payload = ImagePayload::from_file(path)
        .with_context(|| format!("Failed to load image {}", path.display()))?;
    Ok(payload.to_data_uri())
}

fn failure_category(err: &CopyError) -> &'static str {
    match err.root_kind() {
        ErrorKind::Configuration => "Configuration error",
        ErrorKind::InvalidInput => "Invalid input",
        ErrorKind::MalformedResponse => "The model service responded in an unexpected shape",
        ErrorKind::Upstream | ErrorKind::Generation => "Could not reach the model service",
    }
}

/// Log the failure category before handing the error to anyhow
fn report(err: CopyError) -> anyhow::Error {
    match std::error::Error::source(&err) {
        Some(cause) => error!("{}: {} ({})", failure_category(&err), err, cause),
        None => error!("{}: {}", failure_category(&err), err),
    }
    err.into()
}

fn print_triggers() {
    for trigger in Trigger::ALL {
        println!(
            "{:<24} {:<24} {}",
            trigger.token(),
            trigger.label(),
            trigger.description()
        );
    }
}

fn print_variants(variants: &[CopyVariant], json: bool) -> Result<()> {
    if json {
        let output =
            serde_json::to_string_pretty(variants).context("Failed to serialize copy variants")?;
        println!("{}", output);
        return Ok(());
    }

    for (i, variant) in variants.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}. {}", i + 1, variant.title);
        println!("   {}", variant.copy);
    }
    Ok(())
}
