use rusqlite::Transaction;

use super::{ConnectionProvider, Database, DbError};

impl<P: ConnectionProvider> Database<P> {
    /// Run `work` as one unit of work on a fresh connection.
    ///
    /// The transaction is committed only if `work` returns `Ok`. Any error
    /// rolls it back and comes back wrapped in [`DbError::Storage`] tagged
    /// with `operation`. Failing to connect or to begin the transaction is
    /// returned as-is, since there is nothing to roll back. The connection
    /// is closed before this returns on every path.
    pub fn transaction<T, F>(&self, operation: &'static str, work: F) -> Result<T, DbError>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, DbError>,
    {
        let mut conn = self.provider.connect()?;
        let tx = conn.transaction()?;
        tracing::debug!(operation, "Transaction started");

        match work(&tx) {
            Ok(value) => {
                tx.commit().map_err(|e| DbError::Storage {
                    operation,
                    source: Box::new(e.into()),
                })?;
                tracing::debug!(operation, "Transaction committed");
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(operation, error = %err, "Rolling back transaction");
                if let Err(rollback_err) = tx.rollback() {
                    tracing::error!(operation, error = %rollback_err, "Rollback failed");
                }
                Err(DbError::Storage {
                    operation,
                    source: Box::new(err),
                })
            }
        }
    }
}
