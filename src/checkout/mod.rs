//! The three-stage checkout wizard.
//!
//! Stages run shipping, payment, review. Moving between them is purely local
//! apart from refreshing the shipping methods; the only other request is the
//! final order creation.
//!
//! ```text
//!  Shipping --next()--> Payment --next()--> Review --submit()--> confirmation
//!     ^                    |                  |
//!     +------back()--------+-----back()-------+
//! ```
//!
//! A failed submission leaves the wizard on the review stage with the
//! server's message in [`CheckoutWizard::last_error`], and the cart intact.
//! A successful one empties the cart and returns an [`OrderConfirmation`],
//! which callers use to show the confirmation view.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_sdk::checkout::CheckoutWizard;
//!
//! let mut wizard = CheckoutWizard::open(client.clone(), notifier.clone(), &config, &cart, &session)?;
//! wizard.refresh_shipping_methods().await;
//! wizard.form_mut().street = "1 Main St".into();
//! wizard.next()?;
//! wizard.next()?;
//!
//! let confirmation = wizard.submit(&mut cart, &session).await?;
//! println!("Order {} placed", confirmation.order.short_id());
//! ```

mod errors;
mod form;
mod summary;

pub use errors::CheckoutError;
pub use form::{FieldErrors, ShippingForm};
pub use summary::{CheckoutData, OrderSummary};

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::api;
use crate::auth::AuthRealm;
use crate::cart::Cart;
use crate::clients::HttpError;
use crate::config::StorefrontConfig;
use crate::models::{NewOrder, NewOrderItem, Order, PaymentMethod, ShippingMethod};
use crate::notify::Notifier;
use crate::{HttpClient, UserSession};

/// A stage of the wizard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CheckoutStage {
    /// Contact and address details.
    #[default]
    Shipping,
    /// Payment method.
    Payment,
    /// Final check before placing the order.
    Review,
}

impl CheckoutStage {
    /// Returns the 1-based step number.
    #[must_use]
    pub const fn step(self) -> u8 {
        match self {
            Self::Shipping => 1,
            Self::Payment => 2,
            Self::Review => 3,
        }
    }
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Shipping => "shipping",
            Self::Payment => "payment",
            Self::Review => "review",
        })
    }
}

/// What a successful checkout hands to the confirmation view.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    /// The order as created by the backend.
    pub order: Order,
    /// The totals the customer agreed to.
    pub summary: OrderSummary,
    /// Shipping method chosen.
    pub shipping_method: ShippingMethod,
}

/// Drives one checkout from shipping details to a placed order.
#[derive(Debug)]
pub struct CheckoutWizard {
    client: Arc<HttpClient>,
    notifier: Arc<dyn Notifier>,
    tax_rate: Decimal,
    stage: CheckoutStage,
    form: ShippingForm,
    field_errors: FieldErrors,
    payment_method: PaymentMethod,
    shipping_methods: Vec<ShippingMethod>,
    selected_shipping: usize,
    handoff: Option<CheckoutData>,
    submitting: bool,
    placed: Option<Order>,
    last_error: Option<String>,
}

impl CheckoutWizard {
    /// Starts checkout for `cart`.
    ///
    /// The shipping form is pre-filled from the signed-in customer, if any,
    /// and the cart view's hand-off is picked up when present.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart is empty; the caller
    /// should send the customer back to the cart.
    pub fn open(
        client: Arc<HttpClient>,
        notifier: Arc<dyn Notifier>,
        config: &StorefrontConfig,
        cart: &Cart,
        session: &UserSession,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            notifier.error("Your cart is empty");
            return Err(CheckoutError::EmptyCart);
        }

        let form = session.user().map(ShippingForm::from_user).unwrap_or_default();
        let handoff = CheckoutData::load(client.store().as_ref());

        Ok(Self {
            client,
            notifier,
            tax_rate: config.tax_rate(),
            stage: CheckoutStage::Shipping,
            form,
            field_errors: FieldErrors::new(),
            payment_method: PaymentMethod::Card,
            shipping_methods: ShippingMethod::defaults(),
            selected_shipping: 0,
            handoff,
            submitting: false,
            placed: None,
            last_error: None,
        })
    }

    /// Returns the current stage.
    #[must_use]
    pub const fn stage(&self) -> CheckoutStage {
        self.stage
    }

    /// Returns the shipping form.
    #[must_use]
    pub const fn form(&self) -> &ShippingForm {
        &self.form
    }

    /// Returns the shipping form for editing.
    pub fn form_mut(&mut self) -> &mut ShippingForm {
        &mut self.form
    }

    /// Returns the messages for invalid form fields.
    #[must_use]
    pub const fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    /// Returns the cart view's hand-off, if one was stored.
    #[must_use]
    pub const fn handoff(&self) -> Option<&CheckoutData> {
        self.handoff.as_ref()
    }

    /// Returns the error from the last failed submission.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns `true` while the order request is in flight, for a loading
    /// indicator. `submit` borrows the wizard mutably, so no second call can
    /// start meanwhile.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Returns the chosen payment method.
    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Chooses the payment method.
    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// Returns the shipping methods on offer.
    #[must_use]
    pub fn shipping_methods(&self) -> &[ShippingMethod] {
        &self.shipping_methods
    }

    /// Returns the selected shipping method.
    #[must_use]
    pub fn selected_shipping(&self) -> &ShippingMethod {
        &self.shipping_methods[self.selected_shipping]
    }

    /// Selects a shipping method by id.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::UnknownShippingMethod`] if no method has that
    /// id; the selection is unchanged.
    pub fn select_shipping(&mut self, id: &str) -> Result<(), CheckoutError> {
        let index = self
            .shipping_methods
            .iter()
            .position(|method| method.id == id)
            .ok_or_else(|| CheckoutError::UnknownShippingMethod { id: id.to_string() })?;
        self.selected_shipping = index;
        Ok(())
    }

    /// Replaces the built-in shipping methods with the backend's.
    ///
    /// On failure, or when the backend has none, the current methods stay.
    /// The selection is kept when the selected id is still offered.
    pub async fn refresh_shipping_methods(&mut self) {
        match api::admin::shipping_methods(&self.client).await {
            Ok(methods) if !methods.is_empty() => {
                let selected = self.selected_shipping().id.clone();
                self.selected_shipping = methods
                    .iter()
                    .position(|method| method.id == selected)
                    .unwrap_or(0);
                self.shipping_methods = methods;
            }
            Ok(_) => tracing::debug!("No shipping methods configured, keeping defaults"),
            Err(err) => {
                tracing::warn!(error = %err, "Could not load shipping methods, keeping defaults");
            }
        }
    }

    /// Advances one stage.
    ///
    /// Leaving the shipping stage validates the form.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidForm`] if the form has invalid fields;
    /// they are also available from [`field_errors`](Self::field_errors).
    pub fn next(&mut self) -> Result<CheckoutStage, CheckoutError> {
        self.stage = match self.stage {
            CheckoutStage::Shipping => {
                if let Err(fields) = self.form.validate() {
                    self.field_errors.clone_from(&fields);
                    return Err(CheckoutError::InvalidForm { fields });
                }
                self.field_errors.clear();
                CheckoutStage::Payment
            }
            CheckoutStage::Payment | CheckoutStage::Review => CheckoutStage::Review,
        };
        Ok(self.stage)
    }

    /// Goes back one stage.
    pub fn back(&mut self) -> CheckoutStage {
        self.stage = match self.stage {
            CheckoutStage::Shipping | CheckoutStage::Payment => CheckoutStage::Shipping,
            CheckoutStage::Review => CheckoutStage::Payment,
        };
        self.stage
    }

    /// Returns the price breakdown for `cart` with the selected shipping
    /// method.
    #[must_use]
    pub fn summary(&self, cart: &Cart) -> OrderSummary {
        OrderSummary::compute(cart.total(), self.selected_shipping().charge(), self.tax_rate)
    }

    /// Places the order.
    ///
    /// On success the cart and the hand-off are cleared. On failure the wizard
    /// stays on the review stage, the cart is untouched and the message is
    /// kept in [`last_error`](Self::last_error). Server field errors are
    /// merged into [`field_errors`](Self::field_errors).
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotReady`] outside the review stage,
    /// [`CheckoutError::AlreadySubmitted`] once an order has been placed,
    /// [`CheckoutError::EmptyCart`] if the cart was emptied meanwhile and
    /// [`CheckoutError::Http`] if the backend rejects the order.
    pub async fn submit(
        &mut self,
        cart: &mut Cart,
        session: &UserSession,
    ) -> Result<OrderConfirmation, CheckoutError> {
        if self.stage != CheckoutStage::Review {
            return Err(CheckoutError::NotReady { stage: self.stage });
        }
        if self.placed.is_some() {
            return Err(CheckoutError::AlreadySubmitted);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let summary = self.summary(cart);
        let order = self.new_order(cart, session, &summary);

        self.submitting = true;
        self.last_error = None;
        let result = api::orders::create(&self.client, &order, AuthRealm::User).await;
        self.submitting = false;

        match result {
            Ok(created) => {
                tracing::debug!(order = %created.id, total = %summary.total, "Order placed");
                self.placed = Some(created.clone());
                cart.complete_order().await;
                self.handoff = None;
                self.notifier.success("Order placed successfully!");
                Ok(OrderConfirmation {
                    order: created,
                    summary,
                    shipping_method: self.selected_shipping().clone(),
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, "Order creation failed");
                if let HttpError::Validation { fields, .. } = &err {
                    for (field, messages) in fields {
                        if let Some((key, message)) = Self::known_field(field).zip(messages.first()) {
                            self.field_errors.insert(key, message.clone());
                        }
                    }
                }
                let message = err.user_message();
                self.notifier.error(&message);
                self.last_error = Some(message);
                Err(err.into())
            }
        }
    }

    fn new_order(&self, cart: &Cart, session: &UserSession, summary: &OrderSummary) -> NewOrder {
        let order_items = cart
            .entries()
            .iter()
            .map(|entry| NewOrderItem {
                product: entry.product_id().to_string(),
                quantity: entry.quantity,
                price: entry.unit_price(),
                size: entry.size.clone(),
            })
            .collect();

        NewOrder {
            order_items,
            shipping_address: self.form.address(),
            payment_method: self.payment_method,
            shipping_method: Some(self.selected_shipping().id.clone()),
            items_price: summary.subtotal,
            tax_price: summary.tax,
            shipping_price: summary.shipping,
            total_price: summary.total,
            customer_name: self.form.full_name(),
            customer_email: self.form.email.trim().to_string(),
            customer_phone: self.form.phone.trim().to_string(),
            user_id: session.user().map(|user| user.id.clone()),
        }
    }

    fn known_field(field: &str) -> Option<&'static str> {
        let field = field.rsplit('.').next().unwrap_or(field);
        match field {
            "firstName" => Some("firstName"),
            "lastName" => Some("lastName"),
            "email" | "customerEmail" => Some("email"),
            "phone" | "customerPhone" => Some("phone"),
            "street" | "address" => Some("street"),
            "city" => Some("city"),
            "state" => Some("state"),
            "postalCode" | "zipCode" => Some("postalCode"),
            "country" => Some("country"),
            _ => None,
        }
    }
}
