use crate::core::registry::BasketClass;
use crate::core::rehydrate::{EntityNames, Rehydrator};
use crate::domain::model::Basket;
use crate::domain::ports::{
    AddressManager, DeliveryPool, EntityManager, PaymentPool, ProductPool, Session,
};
use crate::utils::error::{BasketError, RehydrationError, Result};
use std::sync::Arc;

pub const BASKET_SESSION_KEY: &str = "sonata/basket";

/// How the cached basket came to be.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Read back from the session and fully rehydrated.
    Restored,
    /// Nothing in the session; built from the configured class.
    Created,
    /// Rehydration failed and the basket was emptied.
    Reset { errors: Vec<RehydrationError> },
}

impl LoadOutcome {
    pub fn is_reset(&self) -> bool {
        matches!(self, LoadOutcome::Reset { .. })
    }
}

/// Loads the basket of one session, once.
///
/// The first `get_basket` call reads the session, rehydrates the basket's
/// relations (resetting it if any of them cannot be rebuilt) and writes it
/// back. Later calls return the cached basket without touching the session
/// or any collaborator.
pub struct BasketLoader {
    basket_class: BasketClass,
    session: Arc<dyn Session>,
    product_pool: Arc<dyn ProductPool>,
    address_manager: Arc<dyn AddressManager>,
    delivery_pool: Arc<dyn DeliveryPool>,
    payment_pool: Arc<dyn PaymentPool>,
    entity_manager: Arc<dyn EntityManager>,
    session_key: String,
    entities: EntityNames,
    basket: Option<Basket>,
    outcome: Option<LoadOutcome>,
}

impl BasketLoader {
    pub fn new(
        basket_class: BasketClass,
        session: Arc<dyn Session>,
        product_pool: Arc<dyn ProductPool>,
        address_manager: Arc<dyn AddressManager>,
        delivery_pool: Arc<dyn DeliveryPool>,
        payment_pool: Arc<dyn PaymentPool>,
        entity_manager: Arc<dyn EntityManager>,
    ) -> Self {
        Self {
            basket_class,
            session,
            product_pool,
            address_manager,
            delivery_pool,
            payment_pool,
            entity_manager,
            session_key: BASKET_SESSION_KEY.to_string(),
            entities: EntityNames::default(),
            basket: None,
            outcome: None,
        }
    }

    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }

    pub fn with_entity_names(mut self, entities: EntityNames) -> Self {
        self.entities = entities;
        self
    }

    pub async fn get_basket(&mut self) -> Result<&mut Basket> {
        let basket = match self.basket.take() {
            Some(basket) => basket,
            None => self.load().await?,
        };
        Ok(self.basket.insert(basket))
    }

    async fn load(&mut self) -> Result<Basket> {
        let stored = match self.session.get(&self.session_key).await {
            Ok(stored) => stored,
            Err(BasketError::SerializationError(e)) => {
                tracing::warn!(
                    "Discarding undecodable basket in session {}: {}",
                    self.session.id(),
                    e
                );
                None
            }
            Err(e) => return Err(e),
        };

        let (mut basket, restored) = match stored {
            Some(basket) => (basket, true),
            None => (self.basket_class.instantiate()?, false),
        };

        basket.set_product_pool(Arc::clone(&self.product_pool));

        let report = Rehydrator::new(
            self.product_pool.as_ref(),
            self.entity_manager.as_ref(),
            self.payment_pool.as_ref(),
            &self.entities,
        )
        .rehydrate(&mut basket)
        .await;

        let outcome = if report.is_clean() {
            if restored {
                tracing::info!(
                    "Restored basket with {} element(s) for session {}",
                    basket.elements().len(),
                    self.session.id()
                );
                LoadOutcome::Restored
            } else {
                tracing::info!(
                    "Created new {} basket for session {}",
                    self.basket_class.name(),
                    self.session.id()
                );
                LoadOutcome::Created
            }
        } else {
            tracing::warn!(
                "Resetting basket for session {}: {} rehydration error(s)",
                self.session.id(),
                report.errors().len()
            );
            basket.reset();
            LoadOutcome::Reset {
                errors: report.into_errors(),
            }
        };

        self.session.set(&self.session_key, &basket).await?;
        self.outcome = Some(outcome);

        Ok(basket)
    }

    /// `None` until the first successful `get_basket`.
    pub fn outcome(&self) -> Option<&LoadOutcome> {
        self.outcome.as_ref()
    }

    pub fn basket_class(&self) -> &str {
        self.basket_class.name()
    }

    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    pub fn product_pool(&self) -> &Arc<dyn ProductPool> {
        &self.product_pool
    }

    pub fn address_manager(&self) -> &Arc<dyn AddressManager> {
        &self.address_manager
    }

    pub fn delivery_pool(&self) -> &Arc<dyn DeliveryPool> {
        &self.delivery_pool
    }

    pub fn payment_pool(&self) -> &Arc<dyn PaymentPool> {
        &self.payment_pool
    }

    pub fn entity_manager(&self) -> &Arc<dyn EntityManager> {
        &self.entity_manager
    }

    pub fn entity_names(&self) -> &EntityNames {
        &self.entities
    }
}
