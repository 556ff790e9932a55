//! Attributed database connection wrapper.

use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DatabaseTransaction, DbBackend, DbErr, ExecResult, IsolationLevel, QueryResult, Statement,
    StreamTrait, TransactionError, TransactionTrait,
};

use crate::callsite::resolve_call_site;
use crate::config::AttributionConfig;
use crate::marker::decorate;

/// An attributing wrapper around a SeaORM connection.
///
/// The wrapper implements `ConnectionTrait`, `StreamTrait`, and
/// `TransactionTrait`, making it a drop-in replacement for the wrapped
/// connection. Every statement that passes through it gets the caller's code
/// location appended as an inline SQL comment, so the query text arriving at
/// the server reads:
///
/// ```sql
/// SELECT * FROM users WHERE id = $1 /*func_name=api::load_user,file=src/handlers/user.rs,line=42*/
/// ```
///
/// The call site is resolved fresh per statement by walking the stack, so the
/// marker always names the code that issued *this* query, whether it went
/// through the pool handle or through a connection acquired from it.
///
/// # Example
///
/// ```rust,ignore
/// use sea_orm::Database;
/// use sea_orm_callsite::AttributedConnection;
///
/// let db = Database::connect("postgres://localhost/mydb").await?;
/// let db = AttributedConnection::from(db);
///
/// // Every query now carries its call site.
/// let users = Users::find().all(&db).await?;
/// ```
#[derive(Debug, Clone)]
pub struct AttributedConnection<C = DatabaseConnection> {
    inner: C,
    config: Arc<AttributionConfig>,
}

impl<C> AttributedConnection<C> {
    /// Wrap a connection with the given configuration.
    pub fn new(connection: C, config: AttributionConfig) -> Self {
        Self {
            inner: connection,
            config: Arc::new(config),
        }
    }

    /// Wrap a connection with default configuration.
    pub fn wrap(connection: C) -> Self {
        Self::new(connection, AttributionConfig::default())
    }

    /// Get a reference to the wrapped connection.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Get the attribution configuration.
    pub fn config(&self) -> &AttributionConfig {
        &self.config
    }

    /// Consume the wrapper and return the wrapped connection.
    pub fn into_inner(self) -> C {
        self.inner
    }

    /// Decorated SQL for the current invocation, or `None` when the text must
    /// pass through unchanged (no call site, or already decorated).
    fn attributed_sql(&self, sql: &str) -> Option<String> {
        let site = resolve_call_site(&self.config);
        if site.is_none() {
            tracing::trace!("no call site resolved; statement left unannotated");
        }
        match decorate(sql, site.as_ref(), &self.config) {
            Cow::Owned(decorated) => Some(decorated),
            Cow::Borrowed(_) => None,
        }
    }

    /// Rewrite a statement's SQL text; values and backend pass through as-is.
    fn attribute(&self, mut stmt: Statement) -> Statement {
        if let Some(sql) = self.attributed_sql(&stmt.sql) {
            stmt.sql = sql;
        }
        stmt
    }
}

impl AttributedConnection<DatabaseConnection> {
    /// Connect to a database and wrap the pooled connection.
    ///
    /// Accepts exactly what [`sea_orm::Database::connect`] accepts; this layer
    /// adds no connection options of its own.
    pub async fn connect<O>(options: O) -> Result<Self, DbErr>
    where
        O: Into<ConnectOptions>,
    {
        Ok(Self::wrap(Database::connect(options).await?))
    }

    /// Close the underlying pool. Pure passthrough.
    pub async fn close(self) -> Result<(), DbErr> {
        self.inner.close().await
    }
}

impl<C: TransactionTrait> AttributedConnection<C> {
    /// Check a dedicated connection out of the pool.
    ///
    /// SeaORM pins a pooled connection by opening a transaction on it; the
    /// returned handle wraps that transaction and decorates every statement
    /// issued on it, each with its own freshly resolved call site. Hand the
    /// connection back with [`release`](AttributedConnection::release),
    /// [`commit`](AttributedConnection::commit), or
    /// [`rollback`](AttributedConnection::rollback).
    ///
    /// Each call constructs a fresh wrapper around the raw handle coming out
    /// of the pool, so acquire/release cycles can never stack decoration.
    /// Acquisition failures propagate untouched; there is no connection to
    /// wrap.
    pub async fn acquire(&self) -> Result<AttributedConnection<DatabaseTransaction>, DbErr> {
        let txn = self.inner.begin().await?;
        Ok(AttributedConnection {
            inner: txn,
            config: self.config.clone(),
        })
    }
}

impl AttributedConnection<DatabaseTransaction> {
    /// Commit and return the connection to the pool.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.inner.commit().await
    }

    /// Roll back and return the connection to the pool.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.inner.rollback().await
    }

    /// Return the connection to the pool, committing any pending work.
    pub async fn release(self) -> Result<(), DbErr> {
        self.inner.commit().await
    }
}

impl<C> From<C> for AttributedConnection<C> {
    fn from(connection: C) -> Self {
        Self::wrap(connection)
    }
}

impl<C> AsRef<C> for AttributedConnection<C> {
    fn as_ref(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: ConnectionTrait> ConnectionTrait for AttributedConnection<C> {
    fn get_database_backend(&self) -> DbBackend {
        self.inner.get_database_backend()
    }

    async fn execute(&self, stmt: Statement) -> Result<ExecResult, DbErr> {
        self.inner.execute(self.attribute(stmt)).await
    }

    async fn execute_unprepared(&self, sql: &str) -> Result<ExecResult, DbErr> {
        match self.attributed_sql(sql) {
            Some(decorated) => self.inner.execute_unprepared(&decorated).await,
            None => self.inner.execute_unprepared(sql).await,
        }
    }

    async fn query_one(&self, stmt: Statement) -> Result<Option<QueryResult>, DbErr> {
        self.inner.query_one(self.attribute(stmt)).await
    }

    async fn query_all(&self, stmt: Statement) -> Result<Vec<QueryResult>, DbErr> {
        self.inner.query_all(self.attribute(stmt)).await
    }

    fn support_returning(&self) -> bool {
        self.inner.support_returning()
    }

    fn is_mock_connection(&self) -> bool {
        self.inner.is_mock_connection()
    }
}

impl<C: StreamTrait> StreamTrait for AttributedConnection<C> {
    type Stream<'a>
        = C::Stream<'a>
    where
        Self: 'a;

    fn stream<'a>(
        &'a self,
        stmt: Statement,
    ) -> Pin<Box<dyn Future<Output = Result<Self::Stream<'a>, DbErr>> + 'a + Send>> {
        // Resolved before the future is built, on the caller's own stack.
        let stmt = self.attribute(stmt);
        Box::pin(async move { self.inner.stream(stmt).await })
    }
}

#[async_trait]
impl<C: TransactionTrait + Sync> TransactionTrait for AttributedConnection<C> {
    async fn begin(&self) -> Result<DatabaseTransaction, DbErr> {
        self.inner.begin().await
    }

    async fn begin_with_config(
        &self,
        isolation_level: Option<IsolationLevel>,
        access_mode: Option<AccessMode>,
    ) -> Result<DatabaseTransaction, DbErr> {
        self.inner.begin_with_config(isolation_level, access_mode).await
    }

    async fn transaction<F, T, E>(&self, callback: F) -> Result<T, TransactionError<E>>
    where
        F: for<'c> FnOnce(
                &'c DatabaseTransaction,
            ) -> Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'c>>
            + Send,
        T: Send,
        E: std::fmt::Display + std::fmt::Debug + Send,
    {
        self.inner.transaction(callback).await
    }

    async fn transaction_with_config<F, T, E>(
        &self,
        callback: F,
        isolation_level: Option<IsolationLevel>,
        access_mode: Option<AccessMode>,
    ) -> Result<T, TransactionError<E>>
    where
        F: for<'c> FnOnce(
                &'c DatabaseTransaction,
            ) -> Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'c>>
            + Send,
        T: Send,
        E: std::fmt::Display + std::fmt::Debug + Send,
    {
        self.inner
            .transaction_with_config(callback, isolation_level, access_mode)
            .await
    }
}

/// Extension trait for fluent wrapping of connections.
pub trait CallsiteExt: Sized {
    /// Wrap this connection with call-site attribution.
    fn with_callsite(self) -> AttributedConnection<Self>;

    /// Wrap this connection with a custom attribution configuration.
    fn with_callsite_config(self, config: AttributionConfig) -> AttributedConnection<Self>;
}

impl<C: ConnectionTrait> CallsiteExt for C {
    fn with_callsite(self) -> AttributedConnection<C> {
        AttributedConnection::wrap(self)
    }

    fn with_callsite_config(self, config: AttributionConfig) -> AttributedConnection<C> {
        AttributedConnection::new(self, config)
    }
}
