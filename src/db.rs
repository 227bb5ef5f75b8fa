use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement, TransactionTrait};

use crate::error::AppResult;

pub type DbPool = sqlx::PgPool;
pub type OrmConn = DatabaseConnection;

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> AppResult<OrmConn> {
    let conn = Database::connect(database_url).await?;
    tracing::debug!("database connection established");
    Ok(conn)
}

/// Splits a SQL script into its individual statements.
pub fn split_statements(sql: &str) -> impl Iterator<Item = &str> {
    sql.split(';').map(str::trim).filter(|stmt| !stmt.is_empty())
}

/// Runs every statement of `sql` inside one transaction. On the first failure
/// the transaction is rolled back and the error returned.
pub async fn execute_script(conn: &OrmConn, sql: &str) -> AppResult<usize> {
    let backend = conn.get_database_backend();
    let txn = conn.begin().await?;
    let mut executed = 0;

    // Postgres prepared statements cannot contain multiple commands,
    // so the script runs one statement at a time.
    for stmt in split_statements(sql) {
        let statement = Statement::from_string(backend, format!("{stmt};"));
        if let Err(err) = txn.execute(statement).await {
            tracing::error!(error = %err, statement = stmt, "statement failed, rolling back");
            txn.rollback().await?;
            return Err(err.into());
        }
        executed += 1;
    }

    txn.commit().await?;
    Ok(executed)
}
