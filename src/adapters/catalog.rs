use crate::config::CatalogConfig;
use crate::core::rehydrate::EntityNames;
use crate::domain::model::{Address, Customer, DeliveryMethod, Entity, PaymentMethod, Product};
use crate::domain::ports::{
    AddressManager, DeliveryPool, EntityManager, PaymentPool, ProductPool, ProductRepository,
};
use crate::utils::error::{BasketError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct InMemoryProductRepository {
    code: String,
    products: HashMap<u64, Product>,
}

impl InMemoryProductRepository {
    pub fn new(code: impl Into<String>, products: Vec<Product>) -> Self {
        Self {
            code: code.into(),
            products: products.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    fn code(&self) -> &str {
        &self.code
    }

    async fn find(&self, product_id: u64) -> Result<Option<Product>> {
        Ok(self.products.get(&product_id).cloned())
    }
}

/// Product repositories registered by product code.
#[derive(Debug, Clone, Default)]
pub struct StaticProductPool {
    repositories: HashMap<String, Arc<dyn ProductRepository>>,
}

impl StaticProductPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_repository(&mut self, repository: Arc<dyn ProductRepository>) {
        self.repositories
            .insert(repository.code().to_string(), repository);
    }
}

#[async_trait]
impl ProductPool for StaticProductPool {
    async fn get_repository(&self, product_code: &str) -> Result<Arc<dyn ProductRepository>> {
        self.repositories
            .get(product_code)
            .cloned()
            .ok_or_else(|| BasketError::ProductRepositoryNotFound {
                code: product_code.to_string(),
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentPool {
    methods: HashMap<String, PaymentMethod>,
}

impl InMemoryPaymentPool {
    pub fn new(methods: Vec<PaymentMethod>) -> Self {
        Self {
            methods: methods.into_iter().map(|m| (m.code.clone(), m)).collect(),
        }
    }
}

#[async_trait]
impl PaymentPool for InMemoryPaymentPool {
    async fn get_method(&self, code: &str) -> Result<PaymentMethod> {
        self.methods
            .get(code)
            .cloned()
            .ok_or_else(|| BasketError::PaymentMethodNotFound {
                code: code.to_string(),
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDeliveryPool {
    methods: HashMap<String, DeliveryMethod>,
}

impl InMemoryDeliveryPool {
    pub fn new(methods: Vec<DeliveryMethod>) -> Self {
        Self {
            methods: methods.into_iter().map(|m| (m.code.clone(), m)).collect(),
        }
    }
}

#[async_trait]
impl DeliveryPool for InMemoryDeliveryPool {
    async fn get_method(&self, code: &str) -> Result<DeliveryMethod> {
        self.methods
            .get(code)
            .cloned()
            .ok_or_else(|| BasketError::DeliveryMethodNotFound {
                code: code.to_string(),
            })
    }
}

/// Entities keyed by `(entity name, id)`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntityManager {
    names: EntityNames,
    entities: HashMap<(String, u64), Entity>,
}

impl InMemoryEntityManager {
    pub fn new(names: EntityNames) -> Self {
        Self {
            names,
            entities: HashMap::new(),
        }
    }

    pub fn insert(&mut self, entity: impl Into<String>, id: u64, value: Entity) {
        self.entities.insert((entity.into(), id), value);
    }

    pub fn insert_address(&mut self, address: Address) {
        let name = self.names.address.clone();
        self.insert(name, address.id, Entity::Address(address));
    }

    pub fn insert_customer(&mut self, customer: Customer) {
        let name = self.names.customer.clone();
        self.insert(name, customer.id, Entity::Customer(customer));
    }
}

#[async_trait]
impl EntityManager for InMemoryEntityManager {
    async fn find(&self, entity: &str, id: u64) -> Result<Option<Entity>> {
        Ok(self.entities.get(&(entity.to_string(), id)).cloned())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryAddressManager {
    addresses: Vec<Address>,
}

impl InMemoryAddressManager {
    pub fn new(addresses: Vec<Address>) -> Self {
        Self { addresses }
    }
}

#[async_trait]
impl AddressManager for InMemoryAddressManager {
    async fn find_by_customer(&self, customer_id: u64) -> Result<Vec<Address>> {
        Ok(self
            .addresses
            .iter()
            .filter(|a| a.customer_id == Some(customer_id))
            .cloned()
            .collect())
    }
}

/// Every in-memory collaborator built from the `[catalog]` section.
pub struct Catalog {
    pub product_pool: Arc<StaticProductPool>,
    pub payment_pool: Arc<InMemoryPaymentPool>,
    pub delivery_pool: Arc<InMemoryDeliveryPool>,
    pub entity_manager: Arc<InMemoryEntityManager>,
    pub address_manager: Arc<InMemoryAddressManager>,
}

impl Catalog {
    pub fn from_config(config: &CatalogConfig, names: &EntityNames) -> Self {
        let mut product_pool = StaticProductPool::new();
        for repository in &config.repositories {
            product_pool.add_repository(Arc::new(InMemoryProductRepository::new(
                repository.code.clone(),
                repository.products.clone(),
            )));
        }

        let mut entity_manager = InMemoryEntityManager::new(names.clone());
        for address in &config.addresses {
            entity_manager.insert_address(address.clone());
        }
        for customer in &config.customers {
            entity_manager.insert_customer(customer.clone());
        }

        tracing::debug!(
            "Catalog: {} repositories, {} payment methods, {} delivery methods, {} addresses, {} customers",
            config.repositories.len(),
            config.payment_methods.len(),
            config.delivery_methods.len(),
            config.addresses.len(),
            config.customers.len()
        );

        Self {
            product_pool: Arc::new(product_pool),
            payment_pool: Arc::new(InMemoryPaymentPool::new(config.payment_methods.clone())),
            delivery_pool: Arc::new(InMemoryDeliveryPool::new(config.delivery_methods.clone())),
            entity_manager: Arc::new(entity_manager),
            address_manager: Arc::new(InMemoryAddressManager::new(config.addresses.clone())),
        }
    }
}
