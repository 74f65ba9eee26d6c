use fieldhost_domain::{DomainError, InventoryTab, ItemUid};

use crate::infrastructure::ports::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Invalid slot {slot}")]
    InvalidSlot { slot: i16 },

    #[error("Inventory tab {0} is not active")]
    NotActiveTab(InventoryTab),

    #[error("Item {0} not found")]
    ItemNotFound(ItemUid),

    #[error("Invalid amount {amount} for item {uid}")]
    InvalidAmount { uid: ItemUid, amount: i32 },

    #[error("Inventory tab {0} is full")]
    InventoryFull(InventoryTab),

    #[error("Item {0} has not been persisted")]
    UnsavedItem(i32),

    #[error("Not enough currency: need {required}, have {available}")]
    NotEnoughCurrency { required: i64, available: i64 },

    #[error("Inventory tab {0} cannot be expanded further")]
    ExpandLimit(InventoryTab),

    #[error(transparent)]
    Collection(#[from] DomainError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}
