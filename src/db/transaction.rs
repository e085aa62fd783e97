/*!
 * Scoped transaction helper.
 *
 * Every store mutation acquires one transaction at its start; the transaction is
 * committed when the body returns `Ok` and rolled back on `Err` (or if the body
 * panics and the transaction is dropped).
 */

use crate::errors::ServiceError;
pub use futures::future::BoxFuture;
use metrics::{counter, histogram};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionError, TransactionTrait};
use std::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

/// Execute a function within a database transaction
///
/// # Example
///
/// ```rust,ignore
/// let code = with_transaction(&conn, "vendor.create", |txn| {
///     Box::pin(async move {
///         let model = active.insert(txn).await?;
///         Ok(model.vendor_code)
///     })
/// })
/// .await?;
/// ```
pub async fn with_transaction<F, T>(
    db: &DatabaseConnection,
    operation: &'static str,
    f: F,
) -> Result<T, ServiceError>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, Result<T, ServiceError>> + Send,
    T: Send,
{
    let transaction_id = Uuid::new_v4();
    let start = Instant::now();
    debug!(transaction_id = %transaction_id, operation, "Starting database transaction");

    let result = db.transaction::<_, T, ServiceError>(f).await;

    histogram!("vendor_po_db.transaction.duration", start.elapsed(), "operation" => operation);
    match &result {
        Ok(_) => {
            counter!("vendor_po_db.transaction.committed", 1, "operation" => operation);
            debug!(transaction_id = %transaction_id, operation, "Transaction committed");
        }
        Err(err) => {
            counter!("vendor_po_db.transaction.rolled_back", 1, "operation" => operation);
            warn!(transaction_id = %transaction_id, operation, error = %err, "Transaction rolled back");
        }
    }

    result.map_err(|e| match e {
        TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
        TransactionError::Transaction(service_err) => service_err,
    })
}
