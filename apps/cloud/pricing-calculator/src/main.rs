//! Pricing Calculator
//!
//! Estimates the monthly cost of an Amazon Keyspaces table under provisioned
//! and on-demand capacity, for a primary region and optional replicas.

use chrono::Local;
use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::FromEnv;
use domain_pricing::{PriceCatalog, PricingCalculator, StaticPriceCatalog};
use eyre::{Result, WrapErr};
use tracing::info;

mod config;
mod input;
mod report;

use config::Config;
use input::EstimateArgs;
use report::{price_table, Report};

#[derive(Parser)]
#[command(name = "pricing-calculator")]
#[command(about = "Estimate monthly Amazon Keyspaces costs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate monthly cost for a workload
    Estimate(EstimateArgs),

    /// List regions with pricing
    Regions,

    /// Show unit prices
    Prices {
        /// Region to show. Defaults to all.
        #[arg(short = 'R', long)]
        region: Option<String>,
    },
}

fn main() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let cli = Cli::parse();
    let catalog = config.load_catalog()?;

    match cli.command {
        Commands::Estimate(args) => run_estimate(&config, catalog, &args)?,

        Commands::Regions => {
            for region in catalog.regions() {
                println!("{region}");
            }
        }

        Commands::Prices { region } => {
            let regions = match region {
                Some(region) => vec![region],
                None => catalog.regions(),
            };
            let calculator = PricingCalculator::new(catalog);
            let sheets = regions
                .into_iter()
                .map(|region| {
                    let sheet = calculator.price_sheet(&region)?;
                    Ok((region, sheet))
                })
                .collect::<Result<Vec<_>>>()?;
            println!("{}", price_table(&sheets, config.output_format)?);
        }
    }

    Ok(())
}

fn run_estimate(config: &Config, catalog: StaticPriceCatalog, args: &EstimateArgs) -> Result<()> {
    let input = args.to_input(&config.default_region)?;
    let calculator = PricingCalculator::new(catalog);
    let summary = calculator.estimate(&input)?;

    let format = args.format.unwrap_or(config.output_format);
    // Saved reports always carry the full comparison.
    let show_strong = args.show_strong || args.output.is_some();
    let rendered = Report::new(&input, &summary, Local::now()).render(format, show_strong)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .wrap_err_with(|| format!("Failed to write report {}", path.display()))?;
            info!(path = %path.display(), %format, "Report written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
