//! The shared relational store.
//!
//! [`Store`] is a cheaply cloneable handle around a pool of SQLite connections. Every component
//! receives its own clone; writes go through [`Store::write`] and reads through [`Store::read`].

use crate::config::DatabaseSettings;
use crate::error::Result;
use crate::schema::SCHEMA_SQL;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use std::time::Duration;
use tracing::{debug, info};

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Per-connection settings. SQLite forgets these whenever a new connection is opened.
#[derive(Debug)]
struct ConnectionPragmas {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens (creating if needed) the SQLite database described by `settings` and provisions the
    /// schema.
    pub fn open(settings: &DatabaseSettings) -> Result<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(&settings.url);
        let pool = Pool::builder()
            .max_size(settings.pool_size.max(1))
            .connection_customizer(Box::new(ConnectionPragmas {
                busy_timeout: Duration::from_millis(settings.busy_timeout_ms),
            }))
            .build(manager)?;

        let store = Self { pool };

        // WAL lets report queries read a consistent snapshot while a writer holds the lock.
        store.pool.get()?.batch_execute("PRAGMA journal_mode = WAL;")?;
        store.provision()?;

        info!(url = %settings.url, "opened store");
        Ok(store)
    }

    /// Creates a private in-memory store, mostly useful for tests.
    ///
    /// The pool holds exactly one connection that never expires, since every SQLite `:memory:`
    /// connection is its own database.
    pub fn in_memory() -> Result<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
        let pool = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_customizer(Box::new(ConnectionPragmas {
                busy_timeout: Duration::from_millis(5000),
            }))
            .build(manager)?;

        let store = Self { pool };
        store.provision()?;
        Ok(store)
    }

    /// Creates any missing tables and indexes.
    fn provision(&self) -> Result<()> {
        self.pool.get()?.batch_execute(SCHEMA_SQL)?;
        debug!("schema provisioned");
        Ok(())
    }

    /// Runs `f` inside a single `BEGIN IMMEDIATE` transaction.
    ///
    /// The write lock is taken up front, so checks made inside `f` still hold when its insert
    /// commits. If `f` fails nothing is applied.
    pub fn write<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T>,
    {
        let mut pooled = self.pool.get()?;
        let conn: &mut SqliteConnection = &mut pooled;
        conn.immediate_transaction(f)
    }

    /// Runs `f` inside a deferred transaction so that it sees one snapshot. `f` should only read;
    /// nothing here stops it from writing.
    pub fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> QueryResult<T>,
    {
        let mut pooled = self.pool.get()?;
        let conn: &mut SqliteConnection = &mut pooled;
        Ok(conn.transaction(f)?)
    }
}
