use anyhow::Context;
use basket_loader::utils::{logger, validation::Validate};
use basket_loader::{
    BasketLoader, BasketRegistry, Catalog, CliConfig, FileSessionStore, LoadOutcome, LoaderConfig,
    SessionId,
};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    let mut config = LoaderConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    if args.json_logs || config.logging.json {
        let level = if args.verbose {
            "debug"
        } else {
            config.logging.level.as_str()
        };
        logger::init_json_logger(level);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Loading configuration from: {}", args.config);

    if let Some(path) = &args.session_path {
        tracing::info!("Session path overridden to: {}", path);
        config.session.path = path.clone();
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        return Err(e.into());
    }

    let session_id = SessionId::new(args.session.clone())?;
    let store = FileSessionStore::new(&config.session.path);
    let catalog = Catalog::from_config(&config.catalog, &config.entities);
    let registry = BasketRegistry::default();

    let mut loader = BasketLoader::new(
        registry.class(&config.basket.class),
        Arc::new(store.session(session_id)),
        catalog.product_pool,
        catalog.address_manager,
        catalog.delivery_pool,
        catalog.payment_pool,
        catalog.entity_manager,
    )
    .with_session_key(config.basket.session_key.clone())
    .with_entity_names(config.entities.clone());

    let basket = match loader.get_basket().await {
        Ok(basket) => basket,
        Err(e) => {
            tracing::error!(
                "Basket could not be loaded: {} (Category: {:?})",
                e,
                e.category()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string_pretty(&*basket)?);

    match loader.outcome() {
        Some(LoadOutcome::Reset { errors }) => {
            eprintln!("Basket was reset:");
            for error in errors {
                eprintln!("  - {}", error);
            }
        }
        Some(outcome) => tracing::info!("Load outcome: {:?}", outcome),
        None => {}
    }

    Ok(())
}
