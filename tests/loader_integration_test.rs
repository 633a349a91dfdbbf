use basket_loader::domain::model::{Address, Customer};
use basket_loader::domain::ports::Session;
use basket_loader::{
    Basket, BasketElement, BasketError, BasketLoader, BasketRegistry, Catalog, FileSessionStore,
    LoadOutcome, LoaderConfig, MemorySessionStore, SessionId, BASKET_SESSION_KEY,
};
use std::sync::Arc;
use tempfile::TempDir;

const CONFIG: &str = r#"
[basket]
class = "default"

[[catalog.repositories]]
code = "book"
products = [
    { id = 1, sku = "B-1", name = "Dune" },
    { id = 2, sku = "B-2", name = "Hyperion" },
]

[[catalog.payment_methods]]
code = "check"
name = "Check"

[[catalog.delivery_methods]]
code = "free"
name = "Free delivery"

[[catalog.addresses]]
id = 42
customer_id = 7
firstname = "Ada"
lastname = "Lovelace"
address1 = "12 St James's Square"
postcode = "SW1Y 4JH"
city = "London"
country_code = "GB"

[[catalog.customers]]
id = 7
email = "ada@example.com"
firstname = "Ada"
lastname = "Lovelace"
"#;

fn loader_for(config: &LoaderConfig, session: Arc<dyn Session>) -> BasketLoader {
    let catalog = Catalog::from_config(&config.catalog, &config.entities);
    BasketLoader::new(
        BasketRegistry::default().class(&config.basket.class),
        session,
        catalog.product_pool,
        catalog.address_manager,
        catalog.delivery_pool,
        catalog.payment_pool,
        catalog.entity_manager,
    )
    .with_session_key(config.basket.session_key.clone())
    .with_entity_names(config.entities.clone())
}

fn full_basket() -> Basket {
    let mut basket = Basket::new();
    basket.add_element(BasketElement::new("book", Some(1), 1));
    basket.add_element(BasketElement::new("book", Some(2), 3));
    basket.set_delivery_address_id(Some(42));
    basket.set_payment_address_id(Some(42));
    basket.set_payment_method_code(Some("check".to_string()));
    basket.set_customer_id(Some(7));
    basket
}

#[tokio::test]
async fn test_end_to_end_with_file_sessions() {
    let temp_dir = TempDir::new().unwrap();
    let config = LoaderConfig::from_toml_str(CONFIG).unwrap();
    let store = FileSessionStore::new(temp_dir.path());
    let session_id = SessionId::new("f00dcafe").unwrap();

    store
        .session(session_id.clone())
        .set(BASKET_SESSION_KEY, &full_basket())
        .await
        .unwrap();

    let mut loader = loader_for(&config, Arc::new(store.session(session_id.clone())));
    let basket = loader.get_basket().await.unwrap();

    assert_eq!(basket.elements().len(), 2);
    assert_eq!(
        basket.delivery_address().map(|a: &Address| a.city.as_str()),
        Some("London")
    );
    assert_eq!(basket.payment_address().map(|a| a.id), Some(42));
    assert_eq!(basket.payment_method().map(|m| m.name.as_str()), Some("Check"));
    assert_eq!(
        basket.customer().map(|c: &Customer| c.email.as_str()),
        Some("ada@example.com")
    );

    let name = basket.elements_mut()[1]
        .load_product()
        .await
        .unwrap()
        .map(|p| p.name.clone());
    assert_eq!(name, Some("Hyperion".to_string()));
    assert!(matches!(loader.outcome(), Some(LoadOutcome::Restored)));

    // the loader writes back on the first call
    assert!(temp_dir
        .path()
        .join("f00dcafe")
        .join("sonata/basket.json")
        .exists());
}

#[tokio::test]
async fn test_stale_customer_resets_the_stored_basket() {
    let config = LoaderConfig::from_toml_str(CONFIG).unwrap();
    let store = MemorySessionStore::new();
    let session_id = SessionId::new("stale").unwrap();

    let mut stored = full_basket();
    stored.set_customer_id(Some(404));
    store
        .session(session_id.clone())
        .set(BASKET_SESSION_KEY, &stored)
        .await
        .unwrap();

    let mut loader = loader_for(&config, Arc::new(store.session(session_id.clone())));
    let basket = loader.get_basket().await.unwrap();

    assert!(basket.is_empty());
    assert!(basket.customer().is_none());
    assert!(basket.product_pool().is_some());

    match loader.outcome() {
        Some(LoadOutcome::Reset { errors }) => assert_eq!(errors.len(), 1),
        other => panic!("expected a reset, got {:?}", other),
    }

    let persisted = store
        .session(session_id)
        .get(BASKET_SESSION_KEY)
        .await
        .unwrap()
        .unwrap();
    assert!(persisted.is_empty());
    assert_eq!(persisted.customer_id(), None);
}

#[tokio::test]
async fn test_undecodable_session_payload_starts_a_new_basket() {
    let config = LoaderConfig::from_toml_str(CONFIG).unwrap();
    let store = MemorySessionStore::new();
    let session_id = SessionId::new("garbled").unwrap();
    store
        .insert_raw(&session_id, BASKET_SESSION_KEY, "O:6:\"Basket\":0:{}")
        .await;

    let mut loader = loader_for(&config, Arc::new(store.session(session_id.clone())));
    let basket = loader.get_basket().await.unwrap();

    assert!(basket.is_empty());
    assert!(matches!(loader.outcome(), Some(LoadOutcome::Created)));

    // the garbage has been replaced with a decodable basket
    assert!(store
        .session(session_id)
        .get(BASKET_SESSION_KEY)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_custom_basket_class_and_session_key() {
    let config = LoaderConfig::from_toml_str(
        r#"
[basket]
class = "gift"
session_key = "shop/basket"
"#,
    )
    .unwrap();

    let mut registry = BasketRegistry::default();
    registry.register("gift", || {
        let mut basket = Basket::new();
        basket.set_payment_method_code(Some(String::new()));
        basket
    });

    let store = MemorySessionStore::new();
    let session_id = SessionId::new("gift-1").unwrap();
    let catalog = Catalog::from_config(&config.catalog, &config.entities);

    let mut loader = BasketLoader::new(
        registry.class(&config.basket.class),
        Arc::new(store.session(session_id.clone())),
        catalog.product_pool,
        catalog.address_manager,
        catalog.delivery_pool,
        catalog.payment_pool,
        catalog.entity_manager,
    )
    .with_session_key(config.basket.session_key.clone());

    loader.get_basket().await.unwrap();

    assert!(matches!(loader.outcome(), Some(LoadOutcome::Created)));
    assert!(store.contains(&session_id, "shop/basket").await);
    assert!(!store.contains(&session_id, BASKET_SESSION_KEY).await);
}

#[tokio::test]
async fn test_each_loader_loads_once() {
    let config = LoaderConfig::from_toml_str(CONFIG).unwrap();
    let store = MemorySessionStore::new();
    let session_id = SessionId::new("twice").unwrap();

    let mut first = loader_for(&config, Arc::new(store.session(session_id.clone())));
    first
        .get_basket()
        .await
        .unwrap()
        .add_element(BasketElement::new("book", Some(1), 1));

    // changes made after the load are not written back by the loader itself
    let mut second = loader_for(&config, Arc::new(store.session(session_id.clone())));
    assert!(second.get_basket().await.unwrap().is_empty());

    let session = store.session(session_id);
    let basket = first.get_basket().await.unwrap();
    session.set(BASKET_SESSION_KEY, basket).await.unwrap();

    let mut third = loader_for(&config, Arc::new(store.session(session.id().clone())));
    assert_eq!(third.get_basket().await.unwrap().elements().len(), 1);
}

#[tokio::test]
async fn test_session_key_cannot_reach_another_session() {
    let temp_dir = TempDir::new().unwrap();
    let config = LoaderConfig::from_toml_str(CONFIG).unwrap();
    let store = FileSessionStore::new(temp_dir.path());

    let mut loader = loader_for(
        &config,
        Arc::new(store.session(SessionId::new("attacker").unwrap())),
    )
    .with_session_key("../victim/sonata/basket");

    let result = loader.get_basket().await;

    assert!(matches!(
        result,
        Err(BasketError::InvalidConfigValueError { .. })
    ));
    assert!(!temp_dir.path().join("victim").exists());
}
