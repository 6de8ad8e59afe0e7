use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lqip::models::AppConfig;
use lqip::services::Encoder;
use lqip_core::{find_oklab_bits, Lqip, Oklab, Srgb};

#[derive(Parser)]
#[command(name = "lqip")]
#[command(about = "Encode images into single-integer low quality image placeholders")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode image files and print one placeholder per file
    Encode {
        /// Image files to encode
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Skip images that have any transparent pixel
        #[arg(long)]
        opaque_check: bool,

        /// Use every n-th pixel for the dominant color
        #[arg(long)]
        sample_rate: Option<u32>,

        /// Palette size for dominant color extraction (2-20)
        #[arg(long)]
        palette_size: Option<u8>,

        /// YAML config file (falls back to $LQIP_CONFIG)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print a JSON object keyed by path
        #[arg(long)]
        json: bool,
    },
    /// Unpack a placeholder value and show its fields
    Decode {
        /// Placeholder integer, e.g. -413347
        #[arg(allow_hyphen_values = true)]
        value: i32,

        /// Print the fields as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the OkLab coordinate and lattice point of one color
    Color {
        /// Hex color, e.g. "#4a7ab0"
        hex: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lqip=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Some(Commands::Encode {
            files,
            opaque_check,
            sample_rate,
            palette_size,
            config,
            json,
        }) => {
            run_encode_command(files, opaque_check, sample_rate, palette_size, config, json).await
        }
        Some(Commands::Decode { value, json }) => run_decode_command(value, json),
        Some(Commands::Color { hex }) => run_color_command(&hex),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Encode files; a file that cannot be encoded prints `null`
async fn run_encode_command(
    files: Vec<PathBuf>,
    opaque_check: bool,
    sample_rate: Option<u32>,
    palette_size: Option<u8>,
    config: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let mut options = AppConfig::resolve(config.as_deref())?.options;
    if opaque_check {
        options = options.enable_opaque_check(true);
    }
    if let Some(rate) = sample_rate {
        options = options.sample_rate(rate);
    }
    if let Some(size) = palette_size {
        options = options.palette_size(size);
    }

    let encoder = Arc::new(Encoder::new(options));
    let results = encoder.encode_batch(files).await;

    if json {
        let object: serde_json::Map<String, serde_json::Value> = results
            .into_iter()
            .map(|(path, value)| (path.display().to_string(), value.into()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&object)?);
    } else {
        for (path, value) in results {
            match value {
                Some(v) => println!("{}\t{v}", path.display()),
                None => println!("{}\tnull", path.display()),
            }
        }
    }

    Ok(())
}

/// Fields of an unpacked placeholder, as printed by `decode --json`
#[derive(Serialize)]
struct DecodedValue {
    value: i32,
    word: u32,
    ll: u8,
    aaa: u8,
    bbb: u8,
    oklab: [f64; 3],
    offsets: [u8; 6],
    lightness: [f64; 6],
}

fn run_decode_command(value: i32, json: bool) -> anyhow::Result<()> {
    let lqip = Lqip::unpack(value)?;
    let base = lqip.base();
    let oklab = lqip.base_oklab();

    if json {
        let decoded = DecodedValue {
            value,
            word: lqip.word(),
            ll: base.ll(),
            aaa: base.aaa(),
            bbb: base.bbb(),
            oklab: [oklab.l, oklab.a, oklab.b],
            offsets: lqip.offsets(),
            lightness: lqip.sample_lightness(),
        };
        println!("{}", serde_json::to_string_pretty(&decoded)?);
        return Ok(());
    }

    println!("Value:   {value}");
    println!("Word:    {:#07x}", lqip.word());
    println!("Base:    {base}");
    println!("OkLab:   L={:.4} a={:.4} b={:.4}", oklab.l, oklab.a, oklab.b);
    println!("Offsets: {:?}", lqip.offsets());

    let lightness = lqip.sample_lightness();
    println!("Preview lightness:");
    for row in lightness.chunks(3) {
        let cells: Vec<String> = row.iter().map(|l| format!("{l:.3}")).collect();
        println!("  {}", cells.join("  "));
    }

    Ok(())
}

fn run_color_command(hex: &str) -> anyhow::Result<()> {
    let color: Srgb = hex.parse()?;
    let oklab = Oklab::from_srgb(color);
    let point = find_oklab_bits(oklab);
    let snapped = point.to_oklab();

    println!("Color:   {color}");
    println!(
        "OkLab:   L={:.4} a={:.4} b={:.4} (chroma {:.4})",
        oklab.l,
        oklab.a,
        oklab.b,
        oklab.chroma()
    );
    println!("Lattice: {point} (bits {:#04x})", point.bits());
    println!(
        "Snapped: L={:.4} a={:.4} b={:.4}",
        snapped.l, snapped.a, snapped.b
    );

    Ok(())
}

/// Display version and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = std::env::var("LQIP_CONFIG").ok();

    println!("lqip v{VERSION} - single-integer image placeholders\n");

    println!("Environment Variables:");
    println!(
        "  LQIP_CONFIG = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  RUST_LOG    = {}",
        std::env::var("RUST_LOG").as_deref().unwrap_or("lqip=warn (default)")
    );

    match AppConfig::resolve(None) {
        Ok(config) => {
            let options = config.options.normalized();
            println!("\nEncode Options:");
            println!("  opaque check = {}", options.enable_opaque_check);
            println!("  sample rate  = {}", options.sample_rate);
            println!("  palette size = {}", options.palette_size);
        }
        Err(e) => println!("\nConfig error: {e}"),
    }

    println!("\nCommands:");
    println!("  lqip encode    Encode image files to placeholder integers");
    println!("  lqip decode    Show the fields of a placeholder integer");
    println!("  lqip color     Show how one color is quantized");
    println!("\nRun 'lqip --help' for more details.");
}
