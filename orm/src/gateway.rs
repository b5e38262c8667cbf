//! Persistence gateway: generic CRUD and transaction control over a single
//! owned SQLite connection.
//!
//! The connection lives behind a `tokio::sync::Mutex`, so a `Gateway` can be
//! shared through an `Arc` while statements still run one at a time. Each
//! statement is prepared, bound and finalized inside one call; nothing is held
//! open between calls except an explicit transaction.
//!
//! Transactions are connection-wide and not reentrant: [`Gateway::begin_transaction`]
//! while one is already open silently joins it, and [`Gateway::commit`] /
//! [`Gateway::rollback`] do nothing when none is open.

use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnection};
use sqlx::{Connection, Sqlite};
use tokio::sync::Mutex;

use crate::descriptor::describe;
use crate::entity::Entity;
use crate::error::PersistenceError;
use crate::mapper;
use crate::statement;
use crate::value::SqlValue;

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

fn bind_value<'q>(query: SqliteQuery<'q>, value: &SqlValue) -> SqliteQuery<'q> {
    match value {
        SqlValue::Null => query.bind(Option::<String>::None),
        SqlValue::Integer(v) => query.bind(*v),
        SqlValue::Float(v) => query.bind(*v),
        SqlValue::Boolean(v) => query.bind(*v),
        SqlValue::Date(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.clone()),
    }
}

fn prepare<'q>(sql: &'q str, params: &[SqlValue]) -> SqliteQuery<'q> {
    params
        .iter()
        .fold(sqlx::query(sql), |query, value| bind_value(query, value))
}

struct Session {
    conn: SqliteConnection,
    in_transaction: bool,
}

/// Owns the connection and exposes the generic persistence surface.
pub struct Gateway {
    session: Mutex<Session>,
}

impl Gateway {
    pub fn new(conn: SqliteConnection) -> Self {
        Self {
            session: Mutex::new(Session {
                conn,
                in_transaction: false,
            }),
        }
    }

    /// Insert `record` and return the identity the store assigned to it.
    ///
    /// The record itself is not modified; callers that need the identity on
    /// the record set it from the returned value.
    pub async fn create<E: Entity>(&self, record: &E) -> Result<i64, PersistenceError> {
        let descriptor = describe::<E>()?;
        let sql = statement::insert_statement(descriptor);
        let params = mapper::to_row(record)?;
        tracing::debug!(binds = params.len(), "{sql}");

        let mut session = self.session.lock().await;
        let result = prepare(&sql, &params).execute(&mut session.conn).await?;
        Ok(result.last_insert_rowid())
    }

    /// Fetch by identity. Zero matching rows is `Ok(None)`.
    pub async fn find<E: Entity>(&self, id: i64) -> Result<Option<E>, PersistenceError> {
        let descriptor = describe::<E>()?;
        let sql = statement::select_by_id_statement(descriptor);
        tracing::debug!(id, "{sql}");

        let mut session = self.session.lock().await;
        let row = prepare(&sql, &[SqlValue::Integer(id)])
            .fetch_optional(&mut session.conn)
            .await?;
        Ok(row.map(|row| mapper::from_row::<E>(&row)).transpose()?)
    }

    /// Overwrite every persisted column of the row keyed by `record`'s
    /// identity. There is no version check: the last writer wins.
    pub async fn update<E: Entity>(&self, record: &E) -> Result<(), PersistenceError> {
        let descriptor = describe::<E>()?;
        let sql = statement::update_statement(descriptor);
        let params = mapper::to_row_without_identity(record)?;
        tracing::debug!(binds = params.len(), "{sql}");

        let mut session = self.session.lock().await;
        let result = prepare(&sql, &params).execute(&mut session.conn).await?;
        tracing::debug!(rows = result.rows_affected(), "update applied");
        Ok(())
    }

    /// Delete by identity. Succeeds even when no row matched.
    pub async fn delete<E: Entity>(&self, id: i64) -> Result<(), PersistenceError> {
        let descriptor = describe::<E>()?;
        let sql = statement::delete_by_id_statement(descriptor);
        tracing::debug!(id, "{sql}");

        let mut session = self.session.lock().await;
        prepare(&sql, &[SqlValue::Integer(id)])
            .execute(&mut session.conn)
            .await?;
        Ok(())
    }

    /// Run an arbitrary parameterised read and map every returned row to `E`.
    pub async fn query<E: Entity>(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<E>, PersistenceError> {
        tracing::debug!(binds = params.len(), "{sql}");

        let mut session = self.session.lock().await;
        let rows = prepare(sql, params).fetch_all(&mut session.conn).await?;
        drop(session);

        let records = rows
            .iter()
            .map(mapper::from_row::<E>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Run an arbitrary parameterised write and return the affected row count.
    pub async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, PersistenceError> {
        tracing::debug!(binds = params.len(), "{sql}");

        let mut session = self.session.lock().await;
        let result = prepare(sql, params).execute(&mut session.conn).await?;
        Ok(result.rows_affected())
    }

    /// Leave auto-commit mode. Joins the open transaction if there is one.
    pub async fn begin_transaction(&self) -> Result<(), PersistenceError> {
        let mut session = self.session.lock().await;
        if session.in_transaction {
            tracing::debug!("transaction already open, reusing it");
            return Ok(());
        }
        sqlx::query("BEGIN").execute(&mut session.conn).await?;
        session.in_transaction = true;
        tracing::debug!("transaction started");
        Ok(())
    }

    /// Commit and return to auto-commit mode. No-op without a transaction.
    pub async fn commit(&self) -> Result<(), PersistenceError> {
        let mut session = self.session.lock().await;
        if !session.in_transaction {
            return Ok(());
        }
        // Stays open on failure so the caller can still roll back.
        sqlx::query("COMMIT").execute(&mut session.conn).await?;
        session.in_transaction = false;
        tracing::debug!("transaction committed");
        Ok(())
    }

    /// Roll back and return to auto-commit mode. No-op without a transaction.
    pub async fn rollback(&self) -> Result<(), PersistenceError> {
        let mut session = self.session.lock().await;
        if !session.in_transaction {
            return Ok(());
        }
        sqlx::query("ROLLBACK").execute(&mut session.conn).await?;
        session.in_transaction = false;
        tracing::debug!("transaction rolled back");
        Ok(())
    }

    pub async fn is_in_transaction(&self) -> bool {
        self.session.lock().await.in_transaction
    }

    /// Close the connection. An open transaction is rolled back first.
    pub async fn close(self) -> Result<(), PersistenceError> {
        let mut session = self.session.into_inner();
        if session.in_transaction {
            tracing::warn!("closing connection with an open transaction, rolling back");
            sqlx::query("ROLLBACK").execute(&mut session.conn).await?;
        }
        session.conn.close().await?;
        Ok(())
    }
}
