use clap::{Args, Parser, Subcommand, builder::RangedU64ValueParser};

use order_normalizer::{
    config::{AppConfig, GeneratorSettings},
    db::create_orm_conn,
    logging::init_tracing,
    normalize::RELATIONSHIPS,
    pipeline::{
        analyze_stage, generate_stage, load_stage, normalize_stage, schema_stage, verify_stage,
    },
    server::serve,
    state::AppState,
};

/// Generate a denormalized order table, normalize it, load it into Postgres
/// and verify the result.
#[derive(Parser, Debug)]
#[command(name = "order-normalizer", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write denormalized_orders.csv with synthetic orders.
    Generate(GenerateArgs),
    /// Report the redundancy in the flat file.
    Analyze,
    /// Split the flat file into the four normalized CSV files.
    Normalize,
    /// Drop and recreate the normalized tables.
    Schema,
    /// Load the normalized CSV files into the database.
    Load,
    /// Probe constraints and check joins against the flat file.
    Verify,
    /// Every stage in order.
    Run(GenerateArgs),
    /// Serve the read-only report API.
    Serve,
}

#[derive(Args, Debug, Clone, Default)]
struct GenerateArgs {
    /// Number of orders to generate.
    #[arg(long)]
    count: Option<usize>,

    /// Most products on one order (at least 1).
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    max_lines: Option<usize>,

    /// Fixed RNG seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
}

impl GenerateArgs {
    fn apply(&self, mut settings: GeneratorSettings) -> GeneratorSettings {
        if let Some(count) = self.count {
            settings.order_count = count;
        }
        if let Some(max_lines) = self.max_lines {
            settings.max_lines_per_order = max_lines;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        settings
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.cmd {
        Command::Generate(args) => generate(&config, &args)?,
        Command::Analyze => analyze(&config)?,
        Command::Normalize => normalize(&config)?,
        Command::Schema => schema(&connect(&config).await?).await?,
        Command::Load => load(&config, &connect(&config).await?).await?,
        Command::Verify => verify(&config, &connect(&config).await?).await?,
        Command::Run(args) => {
            generate(&config, &args)?;
            analyze(&config)?;
            normalize(&config)?;
            let state = connect(&config).await?;
            schema(&state).await?;
            load(&config, &state).await?;
            verify(&config, &state).await?;
        }
        Command::Serve => serve(&config, connect(&config).await?).await?,
    }

    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(&config.database_url).await?;
    Ok(AppState::new(orm))
}

fn generate(config: &AppConfig, args: &GenerateArgs) -> anyhow::Result<()> {
    let settings = args.apply(config.generator.clone());
    let rows = generate_stage(config, &settings)?;
    println!("Created {} denormalized order rows", rows.len());
    println!("\nSample of denormalized data:");
    for row in rows.iter().take(5) {
        println!(
            "{} {} {} {} x{} = {}",
            row.order_id, row.order_date, row.customer_name, row.product_name, row.quantity,
            row.total_amount
        );
    }
    Ok(())
}

fn analyze(config: &AppConfig) -> anyhow::Result<()> {
    let report = analyze_stage(config)?;
    println!("\n{report}");
    Ok(())
}

fn normalize(config: &AppConfig) -> anyhow::Result<()> {
    let tables = normalize_stage(config)?;
    println!("\n=== NORMALIZATION PROCESS ===");
    println!("Customers table: {} unique customers", tables.customers.len());
    println!("Products table: {} unique products", tables.products.len());
    println!("Orders table: {} orders", tables.orders.len());
    println!("Order_Items table: {} line items", tables.order_items.len());
    println!("\n=== RELATIONSHIPS ===");
    for (fk, pk) in RELATIONSHIPS {
        println!("{pk} (PK) -> {fk} (FK)");
    }
    Ok(())
}

async fn schema(state: &AppState) -> anyhow::Result<()> {
    let columns = schema_stage(state).await?;
    println!("\nDatabase Schema:");
    for c in columns {
        println!(
            "{}.{} - {} - Nullable: {}",
            c.table_name, c.column_name, c.data_type, c.is_nullable
        );
    }
    Ok(())
}

async fn load(config: &AppConfig, state: &AppState) -> anyhow::Result<()> {
    let summary = load_stage(config, &state.orm).await?;
    println!(
        "\nLoaded {} customers, {} products, {} orders, {} order items",
        summary.customers, summary.products, summary.orders, summary.order_items
    );
    Ok(())
}

async fn verify(config: &AppConfig, state: &AppState) -> anyhow::Result<()> {
    let report = verify_stage(config, state).await?;
    println!("\n{report}");
    if !report.all_passed() {
        anyhow::bail!("verification failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_args(argv: &[&str]) -> Result<GenerateArgs, clap::Error> {
        let cli = Cli::try_parse_from(argv)?;
        match cli.cmd {
            Command::Generate(args) | Command::Run(args) => Ok(args),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn zero_max_lines_is_rejected() {
        let err = generate_args(&["order-normalizer", "generate", "--max-lines", "0"])
            .expect_err("0 must not parse");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn generate_flags_override_settings() {
        let args = generate_args(&[
            "order-normalizer",
            "run",
            "--count",
            "7",
            "--max-lines",
            "3",
            "--seed",
            "42",
        ])
        .expect("parse");
        let settings = args.apply(GeneratorSettings::default());
        assert_eq!(settings.order_count, 7);
        assert_eq!(settings.max_lines_per_order, 3);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.first_order_id, 1000);
    }
}
