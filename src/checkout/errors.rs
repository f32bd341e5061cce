use thiserror::Error;

use super::{CheckoutStage, FieldErrors};
use crate::clients::HttpError;

/// Errors returned by [`CheckoutWizard`](super::CheckoutWizard).
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was opened or submitted with nothing in the cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// The shipping form has invalid fields.
    #[error("Please correct the highlighted fields")]
    InvalidForm {
        /// One message per invalid field.
        fields: FieldErrors,
    },

    /// The selected shipping method is not on offer.
    #[error("Unknown shipping method '{id}'")]
    UnknownShippingMethod {
        /// The rejected method id.
        id: String,
    },

    /// The order can only be submitted from the review stage.
    #[error("Cannot place the order from the {stage} stage")]
    NotReady {
        /// The stage the wizard is in.
        stage: CheckoutStage,
    },

    /// This order was already submitted.
    #[error("This order has already been submitted")]
    AlreadySubmitted,

    /// The order-creation request failed.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl CheckoutError {
    /// Returns the text to show the user for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
