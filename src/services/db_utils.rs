use actix::{Actor, Addr, SyncContext};
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;

use crate::types::PoolInitializationError;

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Actor owning the connection pool; runs on a SyncArbiter so blocking
/// diesel calls never stall the HTTP workers.
pub struct DbActor(pub SqlitePool);

pub struct AppState {
    pub db: Addr<DbActor>,
}

impl Actor for DbActor {
    type Context = SyncContext<Self>;
}

/// SQLite leaves foreign keys off per connection unless asked; the cascade
/// and set-null semantics of the catalog depend on them.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn get_db_pool(db_url: &str) -> Result<SqlitePool, PoolInitializationError> {
    let manager: ConnectionManager<SqliteConnection> = ConnectionManager::new(db_url);
    Pool::builder()
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)
        .map_err(|err| PoolInitializationError(err.to_string()))
}
