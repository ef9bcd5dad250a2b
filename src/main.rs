//! homolumo_plot - command-line entry point
//!
//! Renders the HOMO/LUMO energy-level chart of a spreadsheet.
//! Settings come from the embedded property defaults, then an optional JSON
//! config file, then command-line flags.

use anyhow::Context;
use clap::Parser;
use homolumo_plot::properties::PropertyReader;
use homolumo_plot::{HomoLumoPlot, PlotConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "jemalloc")]
use tikv_jemallocator::Jemalloc;

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "homolumo_plot", version, about = "HOMO/LUMO energy-level bar chart")]
struct Args {
    /// Spreadsheet with IP, EA and a label column (.xlsx, .xls, .ods)
    data_path: PathBuf,

    /// Label column; also the x-axis title
    #[arg(long)]
    xlabels: String,

    #[arg(long)]
    homo_colour: Option<String>,

    #[arg(long)]
    lumo_colour: Option<String>,

    /// Output image; .png, .svg or .jpg
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Figure width in inches
    #[arg(long)]
    width: Option<f64>,

    /// Figure height in inches
    #[arg(long)]
    height: Option<f64>,

    /// Draw the TEA reference line
    #[arg(long)]
    redox_tea: bool,

    /// Draw the H+/H2 reference line
    #[arg(long)]
    redox_h2: bool,

    /// Offset strategy: adaptive or fixed
    #[arg(long)]
    strategy: Option<String>,

    /// Offset used by the fixed strategy
    #[arg(long)]
    fixed_offset: Option<f64>,

    #[arg(long)]
    dpi: Option<u32>,

    /// JSON object of property name to value
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    /// Merge the config file (if any) and the command-line flags
    fn properties(&self) -> anyhow::Result<PropertyReader> {
        let mut props = match &self.config {
            Some(path) => PropertyReader::from_json_file(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?,
            None => PropertyReader::new(),
        };

        if let Some(c) = &self.homo_colour {
            props.set("homo.colour", c.as_str());
        }
        if let Some(c) = &self.lumo_colour {
            props.set("lumo.colour", c.as_str());
        }
        if let Some(out) = &self.output {
            props.set("filename", out.to_string_lossy());
        }
        if let Some(w) = self.width {
            props.set("figure.width", w.to_string());
        }
        if let Some(h) = self.height {
            props.set("figure.height", h.to_string());
        }
        if self.redox_tea {
            props.set("redox.tea", "true");
        }
        if self.redox_h2 {
            props.set("redox.h2", "true");
        }
        if let Some(s) = &self.strategy {
            props.set("offset.strategy", s.as_str());
        }
        if let Some(v) = self.fixed_offset {
            props.set("offset.fixed", v.to_string());
        }
        if let Some(dpi) = self.dpi {
            props.set("dpi", dpi.to_string());
        }
        Ok(props)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("\n✗ Plot failed: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let props = args.properties()?;
    let config = PlotConfig::from_properties(&args.data_path, &args.xlabels, &props);

    println!("homolumo_plot v{}", env!("CARGO_PKG_VERSION"));
    println!("  Data: {}", config.data_path.display());
    println!("  Labels: {}", config.xlabels);
    println!("  Strategy: {:?}", config.offset_strategy);
    println!(
        "  Figure: {} × {} in @ {} dpi",
        config.figsize.0, config.figsize.1, config.dpi
    );

    let plot = HomoLumoPlot::new(config);

    println!("\n[1/3] Loading data...");
    let (table, offsets) = plot
        .load_data()
        .with_context(|| format!("Failed to load {}", args.data_path.display()))?;
    println!("✓ Loaded {} rows", table.height());

    println!("\n[2/3] Normalized energies");
    println!("  ip_maxval: {}", offsets.ip_maxval);
    println!("  ea_maxval: {}", offsets.ea_maxval);

    println!("\n[3/3] Rendering...");
    let bytes = plot
        .render(&table, &offsets)
        .context("Failed to render plot")?;
    println!(
        "✓ Wrote {} ({} bytes)",
        plot.config().filename.display(),
        bytes
    );

    Ok(())
}
