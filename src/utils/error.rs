use thiserror::Error;

#[derive(Error, Debug)]
pub enum BasketError {
    #[error("Unable to load the basket class {class}")]
    UnknownBasketClass { class: String },

    #[error("Session error: {message}")]
    SessionError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Product repository not found for code {code}")]
    ProductRepositoryNotFound { code: String },

    #[error("Payment method not found: {code}")]
    PaymentMethodNotFound { code: String },

    #[error("Delivery method not found: {code}")]
    DeliveryMethodNotFound { code: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Session,
    Collaborator,
}

impl BasketError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BasketError::UnknownBasketClass { .. }
            | BasketError::ConfigValidationError { .. }
            | BasketError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            BasketError::SessionError { .. }
            | BasketError::IoError(_)
            | BasketError::SerializationError(_) => ErrorCategory::Session,
            BasketError::ProductRepositoryNotFound { .. }
            | BasketError::PaymentMethodNotFound { .. }
            | BasketError::DeliveryMethodNotFound { .. } => ErrorCategory::Collaborator,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the [basket] and [entities] sections of the configuration file"
            }
            ErrorCategory::Session => "Check that the session directory exists and is writable",
            ErrorCategory::Collaborator => "Check the catalog fixtures referenced by the basket",
        }
    }
}

/// Failure of one rehydration step. Never leaves the loader: any of these
/// resets the basket.
#[derive(Error, Debug)]
pub enum RehydrationError {
    #[error("the product code is empty (element #{position})")]
    EmptyProductCode { position: usize },

    #[error("no product repository for {code}: {source}")]
    ProductRepository {
        code: String,
        #[source]
        source: BasketError,
    },

    #[error("{entity}#{id} not found")]
    EntityNotFound { entity: String, id: u64 },

    #[error("{entity}#{id} resolved to an unexpected entity type")]
    UnexpectedEntity { entity: String, id: u64 },

    #[error("payment method {code} could not be resolved: {source}")]
    PaymentMethod {
        code: String,
        #[source]
        source: BasketError,
    },

    #[error("lookup of {entity}#{id} failed: {source}")]
    Lookup {
        entity: String,
        id: u64,
        #[source]
        source: BasketError,
    },
}

pub type Result<T> = std::result::Result<T, BasketError>;
