pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::catalog::Catalog;
pub use crate::adapters::session::{FileSessionStore, MemorySessionStore};
pub use crate::config::LoaderConfig;
pub use crate::core::loader::{BasketLoader, LoadOutcome, BASKET_SESSION_KEY};
pub use crate::core::registry::{BasketClass, BasketRegistry};
pub use crate::core::rehydrate::{EntityNames, Rehydrator};
pub use crate::domain::model::{Basket, BasketElement, SessionId};
pub use crate::utils::error::{BasketError, RehydrationError, Result};
