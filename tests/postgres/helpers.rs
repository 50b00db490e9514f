//! Shared fixtures for `PostgreSQL` task integration tests.
//!
//! Each fixture creates its own database on the configured server, applies
//! the migrations to it and drops it again once the fixture goes out of
//! scope.

use crate::test_helpers::PinnedClock;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use rstest::fixture;
use std::sync::Arc;
use taskdeck::task::{
    adapters::postgres::{PostgresTaskRepository, TaskPgPool},
    services::{TaskLifecycleService, TaskQueryService},
};
use uuid::Uuid;

/// Environment variable holding a server URL with `CREATEDB` rights.
pub const DATABASE_URL_VAR: &str = "TASKDECK_TEST_DATABASE_URL";

/// SQL creating the task table and its indexes.
pub const CREATE_TASKS_SQL: &str =
    include_str!("../../migrations/2026-03-01-000000_create_tasks/up.sql");

/// Lifecycle service over a `PostgreSQL` repository.
pub type Lifecycle = TaskLifecycleService<PostgresTaskRepository, PinnedClock>;

/// Query service over a `PostgreSQL` repository.
pub type Queries = TaskQueryService<PostgresTaskRepository, PinnedClock>;

/// A migrated database that is dropped with this value.
pub struct TemporaryDatabase {
    server_url: String,
    name: String,
    url: String,
}

impl TemporaryDatabase {
    /// Creates a uniquely named database and applies the migrations.
    ///
    /// Blocks on the server round-trips.
    ///
    /// # Errors
    ///
    /// Returns an error when the server refuses the connection, the database
    /// cannot be created, or a migration fails.
    pub fn create(server_url: &str) -> eyre::Result<Self> {
        let name = format!("taskdeck_test_{}", Uuid::new_v4().simple());
        let mut admin = PgConnection::establish(server_url)?;
        admin.batch_execute(&format!("CREATE DATABASE {}", quote_identifier(&name)))?;

        let database = Self {
            server_url: server_url.to_owned(),
            url: database_url(server_url, &name),
            name,
        };
        let mut connection = PgConnection::establish(&database.url)?;
        connection.batch_execute(CREATE_TASKS_SQL)?;
        Ok(database)
    }

    /// Connection URL of the database.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        let statement = format!(
            "DROP DATABASE IF EXISTS {} WITH (FORCE)",
            quote_identifier(&self.name)
        );
        let outcome = PgConnection::establish(&self.server_url)
            .map_err(eyre::Report::from)
            .and_then(|mut admin| admin.batch_execute(&statement).map_err(eyre::Report::from));
        if let Err(err) = outcome {
            tracing::warn!(database = %self.name, error = %err, "failed to drop test database");
        }
    }
}

/// Both task services over one migrated database, plus the raw repository.
pub struct PgDeck {
    /// Write side.
    pub lifecycle: Lifecycle,
    /// Read side.
    pub queries: Queries,
    /// The repository both services share.
    pub repository: Arc<PostgresTaskRepository>,
    /// Clock shared by both services.
    pub clock: Arc<PinnedClock>,
    // Declared last so the pool closes before the database is dropped.
    _database: TemporaryDatabase,
}

/// Provides services over a fresh database with the clock at midweek, or
/// `None` when no server is configured.
///
/// # Errors
///
/// Returns an error when the database cannot be prepared.
#[fixture]
pub async fn pg_deck() -> eyre::Result<Option<PgDeck>> {
    let Ok(server_url) = std::env::var(DATABASE_URL_VAR) else {
        return Ok(None);
    };
    let database =
        tokio::task::spawn_blocking(move || TemporaryDatabase::create(&server_url)).await??;

    let manager = ConnectionManager::<PgConnection>::new(database.url());
    let pool: TaskPgPool = Pool::builder().max_size(1).build(manager)?;
    let repository = Arc::new(PostgresTaskRepository::new(pool));
    let clock = Arc::new(PinnedClock::midweek());

    Ok(Some(PgDeck {
        lifecycle: TaskLifecycleService::new(Arc::clone(&repository), Arc::clone(&clock)),
        queries: TaskQueryService::new(Arc::clone(&repository), Arc::clone(&clock)),
        repository,
        clock,
        _database: database,
    }))
}

/// Replaces the database path of `server_url` with `name`, keeping any
/// query string.
fn database_url(server_url: &str, name: &str) -> String {
    let (base, query) = server_url
        .split_once('?')
        .map_or((server_url, None), |(base, query)| (base, Some(query)));
    let (scheme, rest) = base.split_once("://").unwrap_or(("postgres", base));
    let authority = rest.split_once('/').map_or(rest, |(authority, _)| authority);

    let mut url = format!("{scheme}://{authority}/{name}");
    if let Some(query) = query {
        url.push('?');
        url.push_str(query);
    }
    url
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
