use crate::domain::model::{
    Address, Basket, DeliveryMethod, Entity, PaymentMethod, Product, SessionId,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// The per-request view of the user's session.
#[async_trait]
pub trait Session: Send + Sync {
    fn id(&self) -> &SessionId;
    async fn get(&self, key: &str) -> Result<Option<Basket>>;
    async fn set(&self, key: &str, basket: &Basket) -> Result<()>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync + Debug {
    /// Product type code this repository serves.
    fn code(&self) -> &str;
    async fn find(&self, product_id: u64) -> Result<Option<Product>>;
}

#[async_trait]
pub trait ProductPool: Send + Sync + Debug {
    async fn get_repository(&self, product_code: &str) -> Result<Arc<dyn ProductRepository>>;
}

#[async_trait]
pub trait AddressManager: Send + Sync {
    async fn find_by_customer(&self, customer_id: u64) -> Result<Vec<Address>>;
}

/// Generic lookup by entity name and numeric id.
#[async_trait]
pub trait EntityManager: Send + Sync {
    async fn find(&self, entity: &str, id: u64) -> Result<Option<Entity>>;
}

#[async_trait]
pub trait PaymentPool: Send + Sync {
    async fn get_method(&self, code: &str) -> Result<PaymentMethod>;
}

#[async_trait]
pub trait DeliveryPool: Send + Sync {
    async fn get_method(&self, code: &str) -> Result<DeliveryMethod>;
}
