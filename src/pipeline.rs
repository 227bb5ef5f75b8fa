//! The stages of the demonstration, each reading its input from the previous
//! stage's CSV files or from the database.

use std::fmt;

use chrono::Utc;
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    analysis::{RedundancyReport, analyze_redundancy},
    config::{AppConfig, GeneratorSettings},
    csv_store::DataFiles,
    db::OrmConn,
    error::AppResult,
    generate::generate_flat_orders,
    models::FlatOrder,
    normalize::{NormalizedTables, check_referential_integrity, normalize},
    schema::{ColumnInfo, apply_schema, describe_schema},
    services::{
        integrity::{ProbeOutcome, run_probes},
        loader::{LoadSummary, load_normalized},
        reports::{fetch_customer_spend, fetch_reconstructed_view},
        tables::fetch_tables,
    },
    state::AppState,
    verify::{
        LineTotalCheck, ProjectionCheck, ReconstructionCheck, SpendCheck, verify_customer_spend,
        verify_line_totals, verify_projections, verify_reconstruction,
    },
};

pub fn generate_stage(config: &AppConfig, settings: &GeneratorSettings) -> AppResult<Vec<FlatOrder>> {
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let rows = generate_flat_orders(&mut rng, settings, Utc::now().naive_utc())?;
    let files = DataFiles::new(&config.data_dir);
    files.write_flat(&rows)?;
    tracing::info!(
        rows = rows.len(),
        path = %files.flat_orders().display(),
        "created denormalized orders"
    );
    Ok(rows)
}

pub fn analyze_stage(config: &AppConfig) -> AppResult<RedundancyReport> {
    let rows = DataFiles::new(&config.data_dir).read_flat()?;
    Ok(analyze_redundancy(&rows))
}

pub fn normalize_stage(config: &AppConfig) -> AppResult<NormalizedTables> {
    let files = DataFiles::new(&config.data_dir);
    let rows = files.read_flat()?;
    let tables = normalize(&rows)?;
    files.write_normalized(&tables)?;
    tracing::info!(dir = %files.dir().display(), "normalized files saved");
    Ok(tables)
}

pub async fn schema_stage(state: &AppState) -> AppResult<Vec<ColumnInfo>> {
    apply_schema(&state.orm).await?;
    describe_schema(&state.pool).await
}

pub async fn load_stage(config: &AppConfig, conn: &OrmConn) -> AppResult<LoadSummary> {
    let tables = DataFiles::new(&config.data_dir).read_normalized()?;
    check_referential_integrity(&tables)?;
    load_normalized(conn, &tables).await
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VerificationReport {
    pub probes: Vec<ProbeOutcome>,
    pub projections: ProjectionCheck,
    pub reconstruction: ReconstructionCheck,
    pub line_totals: LineTotalCheck,
    pub customer_spend: SpendCheck,
}

impl VerificationReport {
    pub fn all_passed(&self) -> bool {
        self.probes.iter().all(ProbeOutcome::passed)
            && self.projections.is_exact()
            && self.reconstruction.is_exact()
            && self.line_totals.is_exact()
            && self.customer_spend.is_exact()
    }
}

/// Probes the constraints, then checks the loaded tables, the reconstruction
/// join and the per-customer aggregation against the flat CSV. Joined line
/// totals are also checked against quantity and unit price.
pub async fn verify_stage(config: &AppConfig, state: &AppState) -> AppResult<VerificationReport> {
    let flat = DataFiles::new(&config.data_dir).read_flat()?;

    let probes = run_probes(&state.orm).await?;
    let tables = fetch_tables(&state.orm).await?;
    let reconstructed = fetch_reconstructed_view(&state.pool, None).await?;
    let spend = fetch_customer_spend(&state.pool).await?;

    let report = VerificationReport {
        probes,
        projections: verify_projections(&flat, &tables),
        reconstruction: verify_reconstruction(&flat, &reconstructed),
        line_totals: verify_line_totals(&reconstructed),
        customer_spend: verify_customer_spend(&flat, &spend),
    };
    if report.all_passed() {
        tracing::info!("all verification checks passed");
    } else {
        tracing::warn!(
            mismatched_tables = ?report.projections.mismatched_tables,
            "verification found differences"
        );
    }
    Ok(report)
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Constraint probes ===")?;
        for probe in &self.probes {
            writeln!(f, "{probe}")?;
        }
        writeln!(f)?;
        writeln!(f, "=== Checks against the flat source ===")?;
        if self.projections.is_exact() {
            writeln!(f, "projections: all four tables match")?;
        } else {
            writeln!(f, "projections: mismatched {:?}", self.projections.mismatched_tables)?;
        }
        writeln!(f, "{}", self.reconstruction)?;
        writeln!(f, "{}", self.line_totals)?;
        write!(f, "{}", self.customer_spend)
    }
}
