//! Transaction ledger repository and service traits.

use async_trait::async_trait;

use super::transactions_model::{NewTransaction, Transaction};
use crate::errors::Result;
use crate::investments::Investment;

/// Derives an investment's stored position from its full transaction history.
pub type PositionFold = dyn Fn(&Investment, &[Transaction]) -> Result<Investment> + Send + Sync;

/// Trait defining the contract for ledger storage.
///
/// Ledger writes and the position they imply are stored together: the
/// investment is read, folded and saved in the same atomic step that inserts
/// or removes the transaction. Implementations must reject a transaction
/// whose investment does not exist.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Lists every transaction in insertion order.
    fn list(&self) -> Result<Vec<Transaction>>;

    /// Lists the transactions referencing one investment.
    fn list_for_investment(&self, investment_id: &str) -> Result<Vec<Transaction>>;

    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction>;

    /// Inserts a transaction and saves the position `fold` derives from the
    /// investment's history including it.
    async fn insert_and_fold(
        &self,
        transaction: Transaction,
        fold: &PositionFold,
    ) -> Result<(Transaction, Investment)>;

    /// Deletes a transaction and saves the position `fold` derives from the
    /// remaining history. Returns the removed record.
    async fn delete_and_fold(
        &self,
        transaction_id: &str,
        fold: &PositionFold,
    ) -> Result<(Transaction, Investment)>;
}

/// Trait defining the contract for ledger operations.
///
/// Every mutation re-derives the owning investment's position from its full
/// transaction history.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;

    async fn delete_transaction(&self, transaction_id: &str) -> Result<Transaction>;

    fn get_transactions(&self) -> Result<Vec<Transaction>>;

    fn get_transactions_for_investment(&self, investment_id: &str) -> Result<Vec<Transaction>>;
}
