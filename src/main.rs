//! Combo CLI
//!
//! Prices a wanted list against a catalog and prints the cheapest order found.
//!
//! ```text
//! combo --strategy search DoubleCheese BigBurger "Fries(M)" "Cola(M)"
//! ```

use std::{io, path::PathBuf, time::Instant};

use anyhow::Result;
use clap::Parser;
use tracing::info;

use combo::{
    fixtures::load_catalog,
    logging::{self, LoggingConfig},
    receipt::Receipt,
    solvers::{SolverConfig, Strategy},
};

/// Cover the wanted foods at the lowest price
#[derive(Debug, Parser)]
#[command(name = "combo", version, about)]
struct Cli {
    /// Catalog YAML file
    #[arg(short, long, default_value = "fixtures/catalogs/fastfood.yml")]
    catalog: PathBuf,

    /// Optimisation strategy
    #[arg(short, long, value_enum, default_value_t = Strategy::Ilp)]
    strategy: Strategy,

    #[command(flatten)]
    solver: SolverConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    /// Names of the wanted items
    wanted: Vec<String>,
}

#[expect(clippy::print_stdout, reason = "CLI output")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_subscriber(&cli.logging)?;

    let catalog = load_catalog(&cli.catalog)?;
    let wanted = catalog.get(&cli.wanted)?;
    let maker = cli.strategy.build(&catalog, &cli.solver);

    let start = Instant::now();
    let order = maker.order(&wanted);
    let elapsed = start.elapsed().as_secs_f32();

    info!(
        strategy = maker.name(),
        wanted = wanted.len(),
        items = order.len(),
        "order made"
    );

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Receipt::new(&catalog, &wanted, &order).write_to(&mut handle)?;

    println!("Strategy: {} ({elapsed}s)", maker.name());

    Ok(())
}
