use order_normalizer::{
    config::AppConfig,
    db::create_orm_conn,
    logging::init_tracing,
    schema::{apply_schema, list_indexes},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let state = AppState::new(create_orm_conn(&config.database_url).await?);
    apply_schema(&state.orm).await?;

    for index in list_indexes(&state.pool).await? {
        println!("{} on {}", index.index_name, index.table_name);
    }
    println!("Schema applied");
    Ok(())
}
