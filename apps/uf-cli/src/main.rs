use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uf_catalog::CatalogResult;
use uf_convert::{Quantity, SystemOfUnits};

#[derive(Parser)]
#[command(name = "uf")]
#[command(about = "Units of measure: parse, canonicalize and convert UCUM quantities", long_about = None)]
struct Cli {
    /// Catalog file (YAML or JSON) replacing the embedded UCUM core set
    #[arg(long, global = true)]
    units: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the axes and dimension of a unit expression
    Metric {
        /// Unit expression, e.g. kg.m/s2
        expression: String,
    },
    /// Parse a quantity
    Quantity {
        /// Number followed by units, e.g. 4.0[lbf_av]
        expression: String,
    },
    /// Rewrite a quantity in base units
    Canonical {
        /// Number followed by units
        expression: String,
    },
    /// Convert a quantity to a (possibly prefixed) base-unit metric
    Convert {
        /// Number followed by units
        expression: String,
        /// Target metric, e.g. kg.m.s-2
        target: String,
    },
}

fn main() -> CatalogResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let system = load_system(cli.units.as_deref())?;

    match cli.command {
        Commands::Metric { expression } => cmd_metric(&system, &expression),
        Commands::Quantity { expression } => cmd_quantity(&system, &expression),
        Commands::Canonical { expression } => cmd_canonical(&system, &expression),
        Commands::Convert { expression, target } => cmd_convert(&system, &expression, &target),
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_system(path: Option<&Path>) -> CatalogResult<SystemOfUnits> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "using catalog file");
            uf_catalog::load(path)
        }
        None => uf_catalog::builtin(),
    }
}

fn print_quantity(label: &str, quantity: &Quantity) {
    println!("{label}: {quantity}");
    println!("  value:     {}", quantity.value.to_f64());
    println!("  metric:    {}", quantity.metric.symbols());
    if !quantity.is_dimless() {
        println!("  dimension: {}", quantity.metric.dimension_text());
    }
}

fn cmd_metric(system: &SystemOfUnits, expression: &str) -> CatalogResult<()> {
    let metric = system.metric(expression)?;
    println!("Metric: {}", metric.symbols());
    for axis in metric.axes() {
        let prefix = axis
            .prefix
            .as_ref()
            .map(|p| format!("{} ({}) ", p.name, p.factor))
            .unwrap_or_default();
        let kind = axis.unit.dimension.as_deref().unwrap_or("derived");
        println!(
            "  {prefix}{} [{}] ^{}  {kind}",
            axis.unit.name, axis.unit.symbol, axis.exponent
        );
    }
    println!("Reduced:   {}", metric.reduced().symbols());
    println!("Dimension: {}", metric.dimension_text());
    Ok(())
}

fn cmd_quantity(system: &SystemOfUnits, expression: &str) -> CatalogResult<()> {
    let quantity = system.quantity(expression)?;
    print_quantity("Quantity", &quantity);
    Ok(())
}

fn cmd_canonical(system: &SystemOfUnits, expression: &str) -> CatalogResult<()> {
    let canonical = system.canonical_str(expression)?;
    print_quantity("Canonical", &canonical);
    Ok(())
}

fn cmd_convert(system: &SystemOfUnits, expression: &str, target: &str) -> CatalogResult<()> {
    let converted = system.convert_str(expression, target)?;
    print_quantity("Converted", &converted);
    Ok(())
}
