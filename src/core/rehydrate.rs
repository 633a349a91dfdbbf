use crate::domain::model::{Address, Basket, Customer, Entity, PaymentMethod};
use crate::domain::ports::{EntityManager, PaymentPool, ProductPool};
use crate::utils::error::RehydrationError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ADDRESS_ENTITY: &str = "Application\\Sonata\\CustomerBundle\\Entity\\Address";
pub const DEFAULT_CUSTOMER_ENTITY: &str = "Application\\Sonata\\CustomerBundle\\Entity\\Customer";

/// Entity names handed to the entity manager for address and customer lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityNames {
    #[serde(default = "default_address_entity")]
    pub address: String,
    #[serde(default = "default_customer_entity")]
    pub customer: String,
}

fn default_address_entity() -> String {
    DEFAULT_ADDRESS_ENTITY.to_string()
}

fn default_customer_entity() -> String {
    DEFAULT_CUSTOMER_ENTITY.to_string()
}

impl Default for EntityNames {
    fn default() -> Self {
        Self {
            address: default_address_entity(),
            customer: default_customer_entity(),
        }
    }
}

/// Id 0 is never stored for a real entity and counts as unset.
fn is_set(id: &u64) -> bool {
    *id != 0
}

/// Every failure met while rebuilding a basket's relations.
#[derive(Debug, Default)]
pub struct RehydrationReport {
    errors: Vec<RehydrationError>,
}

impl RehydrationReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[RehydrationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<RehydrationError> {
        self.errors
    }

    fn record<T>(&mut self, step: Result<T, RehydrationError>) -> Option<T> {
        match step {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::debug!("Rehydration step failed: {}", error);
                self.errors.push(error);
                None
            }
        }
    }
}

/// Rebuilds the transient references of a deserialized basket. Each step
/// stands alone; `rehydrate` runs all of them and collects the failures.
pub struct Rehydrator<'a> {
    product_pool: &'a dyn ProductPool,
    entity_manager: &'a dyn EntityManager,
    payment_pool: &'a dyn PaymentPool,
    entities: &'a EntityNames,
}

impl<'a> Rehydrator<'a> {
    pub fn new(
        product_pool: &'a dyn ProductPool,
        entity_manager: &'a dyn EntityManager,
        payment_pool: &'a dyn PaymentPool,
        entities: &'a EntityNames,
    ) -> Self {
        Self {
            product_pool,
            entity_manager,
            payment_pool,
            entities,
        }
    }

    pub async fn rehydrate(&self, basket: &mut Basket) -> RehydrationReport {
        let mut report = RehydrationReport::default();

        for error in self.attach_product_repositories(basket).await {
            report.record::<()>(Err(error));
        }

        if let Some(id) = basket.delivery_address_id().filter(is_set) {
            if let Some(address) = report.record(self.resolve_address(id).await) {
                basket.set_delivery_address(address);
            }
        }

        if let Some(id) = basket.payment_address_id().filter(is_set) {
            if let Some(address) = report.record(self.resolve_address(id).await) {
                basket.set_payment_address(address);
            }
        }

        if let Some(code) = basket.payment_method_code().map(str::to_string) {
            if let Some(method) = report.record(self.resolve_payment_method(&code).await) {
                basket.set_payment_method(method);
            }
        }

        if let Some(id) = basket.customer_id().filter(is_set) {
            if let Some(customer) = report.record(self.resolve_customer(id).await) {
                basket.set_customer(customer);
            }
        }

        report
    }

    /// Attaches a product repository to every element whose product is not
    /// loaded yet.
    pub async fn attach_product_repositories(&self, basket: &mut Basket) -> Vec<RehydrationError> {
        let mut errors = Vec::new();

        for (position, element) in basket.elements_mut().iter_mut().enumerate() {
            if element.product().is_some() {
                continue;
            }

            if element.product_code.is_empty() {
                errors.push(RehydrationError::EmptyProductCode { position });
                continue;
            }

            match self.product_pool.get_repository(&element.product_code).await {
                Ok(repository) => {
                    tracing::debug!(
                        "Attached repository {} to element #{}",
                        repository.code(),
                        position
                    );
                    element.set_product_repository(repository);
                }
                Err(source) => errors.push(RehydrationError::ProductRepository {
                    code: element.product_code.clone(),
                    source,
                }),
            }
        }

        errors
    }

    pub async fn resolve_address(&self, id: u64) -> Result<Address, RehydrationError> {
        match self.find(&self.entities.address, id).await? {
            Entity::Address(address) => Ok(address),
            _ => Err(RehydrationError::UnexpectedEntity {
                entity: self.entities.address.clone(),
                id,
            }),
        }
    }

    pub async fn resolve_customer(&self, id: u64) -> Result<Customer, RehydrationError> {
        match self.find(&self.entities.customer, id).await? {
            Entity::Customer(customer) => Ok(customer),
            _ => Err(RehydrationError::UnexpectedEntity {
                entity: self.entities.customer.clone(),
                id,
            }),
        }
    }

    pub async fn resolve_payment_method(
        &self,
        code: &str,
    ) -> Result<PaymentMethod, RehydrationError> {
        self.payment_pool
            .get_method(code)
            .await
            .map_err(|source| RehydrationError::PaymentMethod {
                code: code.to_string(),
                source,
            })
    }

    async fn find(&self, entity: &str, id: u64) -> Result<Entity, RehydrationError> {
        tracing::debug!("Looking up {}#{}", entity, id);

        self.entity_manager
            .find(entity, id)
            .await
            .map_err(|source| RehydrationError::Lookup {
                entity: entity.to_string(),
                id,
                source,
            })?
            .ok_or_else(|| RehydrationError::EntityNotFound {
                entity: entity.to_string(),
                id,
            })
    }
}
