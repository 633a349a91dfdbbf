pub mod loader;
pub mod registry;
pub mod rehydrate;

pub use crate::domain::model::{Basket, BasketElement};
pub use crate::domain::ports::{
    AddressManager, DeliveryPool, EntityManager, PaymentPool, ProductPool, ProductRepository,
    Session,
};
pub use crate::utils::error::Result;
