//! Request-wide transactional session.
//!
//! A [`TransactionalSession`] wraps one open transaction for the duration of
//! a request. Repository functions accept any `PgExecutor`, so handlers pass
//! `&mut *session` and every statement lands in the same transaction.
//!
//! - [`commit`](TransactionalSession::commit) is a no-op. Code written for a
//!   plain connection may call it without ending the request transaction.
//! - [`commit_manually`](TransactionalSession::commit_manually) forces a real
//!   commit and continues in a fresh transaction. Work committed this way is
//!   not undone by a later rollback.
//! - [`finish`](TransactionalSession::finish) commits at the end of the
//!   request.
//! - Dropping the session without `finish` rolls everything back, which is
//!   what happens when a handler returns early with an error.

use std::ops::{Deref, DerefMut};

use sqlx::{PgConnection, PgPool, Postgres, Transaction};

pub struct TransactionalSession {
    tx: Transaction<'static, Postgres>,
}

impl TransactionalSession {
    /// Open a transaction on the given pool.
    pub async fn begin(pool: &PgPool) -> Result<Self, sqlx::Error> {
        let tx = pool.begin().await?;
        Ok(Self { tx })
    }

    /// Does nothing. The request transaction is committed by
    /// [`finish`](Self::finish).
    pub async fn commit(&mut self) -> Result<(), sqlx::Error> {
        Ok(())
    }

    /// Commit everything executed so far and continue in a new transaction.
    ///
    /// `COMMIT AND CHAIN` opens the next transaction on the same connection,
    /// so no second pool connection is held while the first commits.
    pub async fn commit_manually(&mut self) -> Result<(), sqlx::Error> {
        sqlx::query("COMMIT AND CHAIN").execute(&mut *self.tx).await?;
        tracing::debug!("Transactional session committed manually");
        Ok(())
    }

    /// Commit the request transaction.
    pub async fn finish(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }

    /// Explicitly discard the request transaction.
    pub async fn rollback(self) -> Result<(), sqlx::Error> {
        self.tx.rollback().await
    }
}

impl Deref for TransactionalSession {
    type Target = PgConnection;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}

impl DerefMut for TransactionalSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tx
    }
}
