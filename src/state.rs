use crate::db::{DbPool, OrmConn};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
}

impl AppState {
    /// Report queries go through the sqlx pool that backs the ORM connection.
    pub fn new(orm: OrmConn) -> Self {
        let pool = orm.get_postgres_connection_pool().clone();
        Self { pool, orm }
    }
}
