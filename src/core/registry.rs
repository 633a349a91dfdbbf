use crate::domain::model::Basket;
use crate::utils::error::{BasketError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type BasketFactory = Arc<dyn Fn() -> Basket + Send + Sync>;

/// Maps a configured basket class name to the function that builds it.
pub struct BasketRegistry {
    factories: HashMap<String, BasketFactory>,
}

impl BasketRegistry {
    pub const DEFAULT_CLASS: &'static str = "default";

    /// A registry without any class, not even the default one.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    pub fn register<F>(&mut self, class: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Basket + Send + Sync + 'static,
    {
        self.factories.insert(class.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, class: &str) -> bool {
        self.factories.contains_key(class)
    }

    pub fn resolve(&self, class: &str) -> Result<BasketFactory> {
        self.factories
            .get(class)
            .cloned()
            .ok_or_else(|| BasketError::UnknownBasketClass {
                class: class.to_string(),
            })
    }

    /// Looks the class up once. An unknown name is kept so the loader can
    /// report it when it actually needs a new basket.
    pub fn class(&self, class: &str) -> BasketClass {
        BasketClass {
            name: class.to_string(),
            factory: self.factories.get(class).cloned(),
        }
    }
}

impl Default for BasketRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Self::DEFAULT_CLASS, Basket::new);
        registry
    }
}

/// A basket class name together with its factory, if one is registered.
#[derive(Clone)]
pub struct BasketClass {
    name: String,
    factory: Option<BasketFactory>,
}

impl BasketClass {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_resolved(&self) -> bool {
        self.factory.is_some()
    }

    pub fn instantiate(&self) -> Result<Basket> {
        match &self.factory {
            Some(factory) => Ok(factory()),
            None => Err(BasketError::UnknownBasketClass {
                class: self.name.clone(),
            }),
        }
    }
}

impl fmt::Debug for BasketClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasketClass")
            .field("name", &self.name)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::BasketElement;

    #[test]
    fn test_default_registry_knows_the_default_class() {
        let registry = BasketRegistry::default();
        assert!(registry.contains(BasketRegistry::DEFAULT_CLASS));

        let basket = registry.class("default").instantiate().unwrap();
        assert!(basket.is_empty());
    }

    #[test]
    fn test_custom_factory() {
        let mut registry = BasketRegistry::empty();
        registry.register("prefilled", || {
            let mut basket = Basket::new();
            basket.add_element(BasketElement::new("gift-card", None, 1));
            basket
        });

        let basket = (registry.resolve("prefilled").unwrap())();
        assert_eq!(basket.elements().len(), 1);
    }

    #[test]
    fn test_unknown_class() {
        let registry = BasketRegistry::default();
        let class = registry.class("Application\\Basket");

        assert!(!class.is_resolved());
        assert!(matches!(
            class.instantiate(),
            Err(BasketError::UnknownBasketClass { class }) if class == "Application\\Basket"
        ));
        assert!(registry.resolve("Application\\Basket").is_err());
    }
}
