use crate::domain::ports::{ProductPool, ProductRepository};
use crate::utils::error::Result;
use crate::utils::validation::validate_session_id;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        validate_session_id(&value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub sku: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: u64,
    #[serde(default)]
    pub customer_id: Option<u64>,
    pub firstname: String,
    pub lastname: String,
    pub address1: String,
    pub postcode: String,
    pub city: String,
    pub country_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u64,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryMethod {
    pub code: String,
    pub name: String,
}

/// What the entity manager hands back for a `find(entity_name, id)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Address(Address),
    Customer(Customer),
}

/// A basket line. Only the codes and ids survive serialization; the product
/// and its repository are reattached by the loader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasketElement {
    pub product_code: String,
    #[serde(default)]
    pub product_id: Option<u64>,
    pub quantity: u32,
    #[serde(default)]
    pub name: String,
    #[serde(skip)]
    product: Option<Product>,
    #[serde(skip)]
    product_repository: Option<Arc<dyn ProductRepository>>,
}

impl BasketElement {
    pub fn new(product_code: impl Into<String>, product_id: Option<u64>, quantity: u32) -> Self {
        Self {
            product_code: product_code.into(),
            product_id,
            quantity,
            ..Default::default()
        }
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.name = product.name.clone();
        self.product_id = Some(product.id);
        self.product = Some(product);
        self
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn product_repository(&self) -> Option<&Arc<dyn ProductRepository>> {
        self.product_repository.as_ref()
    }

    pub fn set_product_repository(&mut self, repository: Arc<dyn ProductRepository>) {
        self.product_repository = Some(repository);
    }

    /// Fetches the product through the attached repository when it is not
    /// resolved yet. Returns `None` without a repository or product id.
    pub async fn load_product(&mut self) -> Result<Option<&Product>> {
        if self.product.is_none() {
            if let (Some(repository), Some(product_id)) = (&self.product_repository, self.product_id)
            {
                self.product = repository.find(product_id).await?;
            }
        }
        Ok(self.product.as_ref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Basket {
    elements: Vec<BasketElement>,
    #[serde(default)]
    delivery_address_id: Option<u64>,
    #[serde(default)]
    payment_address_id: Option<u64>,
    #[serde(default)]
    payment_method_code: Option<String>,
    #[serde(default)]
    customer_id: Option<u64>,
    #[serde(skip)]
    delivery_address: Option<Address>,
    #[serde(skip)]
    payment_address: Option<Address>,
    #[serde(skip)]
    payment_method: Option<PaymentMethod>,
    #[serde(skip)]
    customer: Option<Customer>,
    #[serde(skip)]
    product_pool: Option<Arc<dyn ProductPool>>,
}

impl Basket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[BasketElement] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [BasketElement] {
        &mut self.elements
    }

    pub fn add_element(&mut self, element: BasketElement) {
        self.elements.push(element);
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn product_pool(&self) -> Option<&Arc<dyn ProductPool>> {
        self.product_pool.as_ref()
    }

    pub fn set_product_pool(&mut self, pool: Arc<dyn ProductPool>) {
        self.product_pool = Some(pool);
    }

    pub fn delivery_address_id(&self) -> Option<u64> {
        self.delivery_address_id
    }

    pub fn set_delivery_address_id(&mut self, id: Option<u64>) {
        self.delivery_address_id = id;
    }

    pub fn delivery_address(&self) -> Option<&Address> {
        self.delivery_address.as_ref()
    }

    pub fn set_delivery_address(&mut self, address: Address) {
        self.delivery_address_id = Some(address.id);
        self.delivery_address = Some(address);
    }

    pub fn payment_address_id(&self) -> Option<u64> {
        self.payment_address_id
    }

    pub fn set_payment_address_id(&mut self, id: Option<u64>) {
        self.payment_address_id = id;
    }

    pub fn payment_address(&self) -> Option<&Address> {
        self.payment_address.as_ref()
    }

    pub fn set_payment_address(&mut self, address: Address) {
        self.payment_address_id = Some(address.id);
        self.payment_address = Some(address);
    }

    /// Empty codes count as unset.
    pub fn payment_method_code(&self) -> Option<&str> {
        self.payment_method_code.as_deref().filter(|code| !code.is_empty())
    }

    pub fn set_payment_method_code(&mut self, code: Option<String>) {
        self.payment_method_code = code;
    }

    pub fn payment_method(&self) -> Option<&PaymentMethod> {
        self.payment_method.as_ref()
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method_code = Some(method.code.clone());
        self.payment_method = Some(method);
    }

    pub fn customer_id(&self) -> Option<u64> {
        self.customer_id
    }

    pub fn set_customer_id(&mut self, id: Option<u64>) {
        self.customer_id = id;
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn set_customer(&mut self, customer: Customer) {
        self.customer_id = Some(customer.id);
        self.customer = Some(customer);
    }

    /// Back to the empty state. The product pool stays attached.
    pub fn reset(&mut self) {
        let product_pool = self.product_pool.take();
        *self = Self {
            product_pool,
            ..Self::default()
        };
    }
}
