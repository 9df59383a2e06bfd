//! Checkout flow.
//!
//! ```text
//! Idle ─► CartReview ─┬─► EmptyCart
//!                     ├─► RequireLogin
//!                     └─► Form ─► Submitting ─┬─► Idle   (order placed)
//!                                             └─► Form   (rejected / failed)
//! ```
//!
//! Each submission gets a [`SubmissionTicket`]. Only one can be in flight, and
//! a completion presenting any other ticket is dropped.

use paw_paradise_core::api::{OrderRequest, OrderResponse};
use paw_paradise_core::validation::{CardDetails, ShippingDetails, ValidationError};
use paw_paradise_core::{OrderId, PaymentMethod, Price};
use tracing::{debug, error, info, instrument, warn};

use crate::error::{ApiError, ClientError};
use crate::notice::Notice;

pub const EMPTY_CART: &str = "Your cart is empty!";
pub const LOGIN_TO_CHECKOUT: &str = "Please login to proceed with checkout";
pub const ALREADY_SUBMITTING: &str = "Your order is already being placed";
pub const ORDER_FAILED: &str = "Order failed. Please try again.";

/// Identifies one order submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionTicket(u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutStage {
    #[default]
    Idle,
    CartReview,
    EmptyCart,
    RequireLogin,
    Form,
    Submitting {
        ticket: SubmissionTicket,
        total: Price,
        method: PaymentMethod,
    },
}

/// Why checkout could not be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Blocked {
    #[error("Your cart is empty!")]
    EmptyCart,
    #[error("Please login to proceed with checkout")]
    LoginRequired,
}

/// Why a submission was refused before reaching the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("Checkout is not open")]
    NotOpen,
    #[error("Your order is already being placed")]
    InFlight,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Shipping fields and cardholder name submitted with the order.
///
/// The cardholder is ignored for cash on delivery. Number, expiry and CVV
/// come from [`CardInput`], the same state the form displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub shipping: ShippingDetails,
    pub cardholder: String,
}

/// Card fields as currently typed, already reformatted for display.
///
/// Never logged and never sent to the server.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CardInput {
    pub number: String,
    pub expiry: String,
    pub cvv: String,
}

impl CardInput {
    /// Pair the typed fields with `holder` for validation.
    #[must_use]
    pub fn details(&self, holder: &str) -> CardDetails {
        CardDetails {
            number: self.number.clone(),
            holder: holder.to_owned(),
            expiry: self.expiry.clone(),
            cvv: self.cvv.clone(),
        }
    }
}

/// A validated order ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub ticket: SubmissionTicket,
    pub request: OrderRequest,
    /// Normalized card number. Checked here and never sent.
    pub card_number: Option<String>,
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Placed {
        order_id: Option<OrderId>,
        method: PaymentMethod,
        total: Price,
    },
    /// The server has no session for us; the shopper must log in again.
    LoginRequired(String),
    Rejected(String),
    Failed,
}

impl Outcome {
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::Placed {
                order_id: Some(id),
                method: PaymentMethod::Card,
                ..
            } => Notice::success(format!("Payment successful! Order #{id}")),
            Self::Placed {
                order_id: None,
                method: PaymentMethod::Card,
                ..
            } => Notice::success("Payment successful!"),
            Self::Placed {
                method: PaymentMethod::Cod,
                total,
                ..
            } => Notice::success(format!("Order placed! Pay {total} on delivery")),
            Self::LoginRequired(message) | Self::Rejected(message) => {
                Notice::error(message.clone())
            }
            Self::Failed => Notice::error(ORDER_FAILED),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CheckoutOrchestrator {
    stage: CheckoutStage,
    payment_method: PaymentMethod,
    issued: u64,
}

impl CheckoutOrchestrator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn stage(&self) -> CheckoutStage {
        self.stage
    }

    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.stage, CheckoutStage::Submitting { .. })
    }

    /// The shopper is looking at the cart.
    pub fn review(&mut self) {
        if !self.is_submitting() {
            self.stage = CheckoutStage::CartReview;
        }
    }

    /// Leave checkout. An in-flight submission keeps its ticket so the
    /// result still lands.
    pub fn close(&mut self) {
        if !self.is_submitting() {
            self.stage = CheckoutStage::Idle;
        }
    }

    /// Forget any in-flight submission; its completion will be ignored.
    pub fn abandon(&mut self) {
        if let CheckoutStage::Submitting { ticket, .. } = self.stage {
            warn!(?ticket, "Abandoning in-flight order submission");
        }
        self.stage = CheckoutStage::Idle;
    }

    /// Try to open the checkout form.
    ///
    /// # Errors
    ///
    /// Returns [`Blocked`] when the cart is empty or nobody is logged in.
    pub fn begin(&mut self, cart_is_empty: bool, authenticated: bool) -> Result<(), Blocked> {
        if self.is_submitting() {
            return Ok(());
        }
        if cart_is_empty {
            self.stage = CheckoutStage::EmptyCart;
            return Err(Blocked::EmptyCart);
        }
        if !authenticated {
            self.stage = CheckoutStage::RequireLogin;
            return Err(Blocked::LoginRequired);
        }
        self.stage = CheckoutStage::Form;
        Ok(())
    }

    pub fn select_payment(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// Validate `form` (and `card` when paying by card) and issue a ticket.
    ///
    /// # Errors
    ///
    /// `InFlight` while another submission is pending, `NotOpen` outside the
    /// form, or the first failing field.
    #[instrument(skip(self, form, card), fields(method = %self.payment_method))]
    pub fn submit(
        &mut self,
        form: &CheckoutForm,
        card: &CardInput,
        total: Price,
    ) -> Result<Submission, SubmitError> {
        match self.stage {
            CheckoutStage::Submitting { .. } => return Err(SubmitError::InFlight),
            CheckoutStage::Form => {}
            _ => return Err(SubmitError::NotOpen),
        }

        let shipping = form.shipping.trimmed();
        shipping.validate()?;
        let card_number = match self.payment_method {
            PaymentMethod::Card => Some(card.details(&form.cardholder).validate()?),
            PaymentMethod::Cod => None,
        };

        self.issued += 1;
        let ticket = SubmissionTicket(self.issued);
        self.stage = CheckoutStage::Submitting {
            ticket,
            total,
            method: self.payment_method,
        };
        debug!(?ticket, "Order submission issued");

        Ok(Submission {
            ticket,
            request: OrderRequest {
                name: shipping.name,
                phone: shipping.phone,
                address: shipping.address,
                total,
                payment_method: self.payment_method,
            },
            card_number,
        })
    }

    /// Apply the server's answer to submission `ticket`.
    ///
    /// Returns `None` if `ticket` is not the one in flight.
    pub fn complete(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<OrderResponse, ApiError>,
    ) -> Option<Outcome> {
        let CheckoutStage::Submitting {
            ticket: current,
            total,
            method,
        } = self.stage
        else {
            debug!(?ticket, "Ignoring completion with nothing in flight");
            return None;
        };
        if current != ticket {
            debug!(?ticket, ?current, "Ignoring stale order completion");
            return None;
        }

        let outcome = match result {
            Ok(response) if response.success => {
                info!(order_id = ?response.order_id, %total, "Order placed");
                Outcome::Placed {
                    order_id: response.order_id,
                    method,
                    total,
                }
            }
            Ok(response) if response.require_login => Outcome::LoginRequired(response.message),
            Ok(response) => Outcome::Rejected(response.message),
            Err(ApiError::Rejected {
                message,
                require_login: true,
                ..
            }) => Outcome::LoginRequired(message),
            Err(e) => match ClientError::from(e) {
                ClientError::Network(e) => {
                    error!(error = %e, "Order submission failed");
                    Outcome::Failed
                }
                other => Outcome::Rejected(other.notice_text(ORDER_FAILED)),
            },
        };

        self.stage = match outcome {
            Outcome::Placed { .. } | Outcome::LoginRequired(_) => CheckoutStage::Idle,
            Outcome::Rejected(_) | Outcome::Failed => CheckoutStage::Form,
        };
        Some(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use paw_paradise_core::validation::messages;

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            name: "Jane Doe".to_owned(),
            phone: "1234567890".to_owned(),
            address: "12 Bark Street".to_owned(),
        }
    }

    fn card_form() -> CheckoutForm {
        CheckoutForm {
            shipping: shipping(),
            cardholder: "Jane Doe".to_owned(),
        }
    }

    fn typed_card() -> CardInput {
        CardInput {
            number: "4111 1111 1111 1111".to_owned(),
            expiry: "12/25".to_owned(),
            cvv: "123".to_owned(),
        }
    }

    fn open() -> CheckoutOrchestrator {
        let mut checkout = CheckoutOrchestrator::new();
        checkout.begin(false, true).unwrap();
        checkout
    }

    #[test]
    fn test_begin_blocks_empty_cart_first() {
        let mut checkout = CheckoutOrchestrator::new();
        assert_eq!(checkout.begin(true, false), Err(Blocked::EmptyCart));
        assert_eq!(checkout.stage(), CheckoutStage::EmptyCart);
        assert_eq!(Blocked::EmptyCart.to_string(), EMPTY_CART);
    }

    #[test]
    fn test_begin_requires_login() {
        let mut checkout = CheckoutOrchestrator::new();
        assert_eq!(checkout.begin(false, false), Err(Blocked::LoginRequired));
        assert_eq!(checkout.stage(), CheckoutStage::RequireLogin);
        assert_eq!(Blocked::LoginRequired.to_string(), LOGIN_TO_CHECKOUT);
    }

    #[test]
    fn test_card_submission_normalizes_number() {
        let mut checkout = open();
        checkout.select_payment(PaymentMethod::Card);
        let submission = checkout
            .submit(&card_form(), &typed_card(), Price::from_cents(2550))
            .unwrap();
        assert_eq!(submission.card_number.as_deref(), Some("4111111111111111"));
        assert_eq!(submission.request.payment_method, PaymentMethod::Card);
        assert!(checkout.is_submitting());
    }

    #[test]
    fn test_cod_ignores_card_fields() {
        let mut checkout = open();
        let form = CheckoutForm {
            shipping: shipping(),
            cardholder: String::new(),
        };
        let submission = checkout
            .submit(&form, &CardInput::default(), Price::from_cents(1000))
            .unwrap();
        assert_eq!(submission.card_number, None);
    }

    #[test]
    fn test_invalid_shipping_stays_in_form() {
        let mut checkout = open();
        let mut form = card_form();
        form.shipping.phone = "12-34".to_owned();
        let err = checkout
            .submit(&form, &CardInput::default(), Price::from_cents(1000))
            .unwrap_err();
        assert_eq!(err.to_string(), messages::INVALID_PHONE);
        assert_eq!(checkout.stage(), CheckoutStage::Form);
    }

    #[test]
    fn test_second_submit_is_refused_while_in_flight() {
        let mut checkout = open();
        let form = card_form();
        checkout
            .submit(&form, &CardInput::default(), Price::from_cents(1000))
            .unwrap();
        assert_eq!(
            checkout.submit(&form, &CardInput::default(), Price::from_cents(1000)),
            Err(SubmitError::InFlight)
        );
        assert_eq!(SubmitError::InFlight.to_string(), ALREADY_SUBMITTING);
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut checkout = open();
        let form = CheckoutForm {
            shipping: shipping(),
            cardholder: String::new(),
        };
        let first = checkout
            .submit(&form, &CardInput::default(), Price::from_cents(1000))
            .unwrap();
        checkout.abandon();
        checkout.begin(false, true).unwrap();
        let second = checkout
            .submit(&form, &CardInput::default(), Price::from_cents(1000))
            .unwrap();

        let late = checkout.complete(first.ticket, Ok(OrderResponse::placed(OrderId::new(1))));
        assert_eq!(late, None);
        assert!(checkout.is_submitting());

        let outcome = checkout
            .complete(second.ticket, Ok(OrderResponse::placed(OrderId::new(2))))
            .unwrap();
        assert_eq!(
            outcome.notice().message,
            "Order placed! Pay $10.00 on delivery"
        );
        assert_eq!(checkout.stage(), CheckoutStage::Idle);
    }

    #[test]
    fn test_card_success_notice_has_order_id() {
        let mut checkout = open();
        checkout.select_payment(PaymentMethod::Card);
        let submission = checkout
            .submit(&card_form(), &typed_card(), Price::from_cents(500))
            .unwrap();
        let outcome = checkout
            .complete(submission.ticket, Ok(OrderResponse::placed(OrderId::new(42))))
            .unwrap();
        assert_eq!(outcome.notice().message, "Payment successful! Order #42");
    }

    #[test]
    fn test_network_failure_returns_to_form() {
        let mut checkout = open();
        let submission = checkout
            .submit(&card_form(), &typed_card(), Price::from_cents(500))
            .unwrap();
        let outcome = checkout
            .complete(
                submission.ticket,
                Err(ApiError::Unreachable("down".to_owned())),
            )
            .unwrap();
        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(outcome.notice().message, ORDER_FAILED);
        assert_eq!(checkout.stage(), CheckoutStage::Form);
    }

    #[test]
    fn test_require_login_closes_checkout() {
        let mut checkout = open();
        let submission = checkout
            .submit(&card_form(), &typed_card(), Price::from_cents(500))
            .unwrap();
        let outcome = checkout
            .complete(
                submission.ticket,
                Err(ApiError::Rejected {
                    status: 401,
                    message: "Please login to place an order".to_owned(),
                    require_login: true,
                }),
            )
            .unwrap();
        assert!(matches!(outcome, Outcome::LoginRequired(_)));
        assert_eq!(checkout.stage(), CheckoutStage::Idle);
    }

    #[test]
    fn test_server_rejection_keeps_form() {
        let mut checkout = open();
        let submission = checkout
            .submit(&card_form(), &typed_card(), Price::from_cents(500))
            .unwrap();
        let outcome = checkout
            .complete(
                submission.ticket,
                Err(ApiError::Rejected {
                    status: 400,
                    message: messages::INVALID_TOTAL.to_owned(),
                    require_login: false,
                }),
            )
            .unwrap();
        assert_eq!(outcome, Outcome::Rejected(messages::INVALID_TOTAL.to_owned()));
        assert_eq!(checkout.stage(), CheckoutStage::Form);
    }

    #[test]
    fn test_card_fields_come_from_typed_input() {
        let mut checkout = open();
        checkout.select_payment(PaymentMethod::Card);
        let typed = CardInput {
            number: "4111 1111 11".to_owned(),
            ..typed_card()
        };
        let err = checkout
            .submit(&card_form(), &typed, Price::from_cents(500))
            .unwrap_err();
        assert_eq!(err.to_string(), messages::INVALID_CARD_NUMBER);
        assert_eq!(checkout.stage(), CheckoutStage::Form);
    }

    #[test]
    fn test_cardholder_is_checked_with_typed_card() {
        let mut checkout = open();
        checkout.select_payment(PaymentMethod::Card);
        let form = CheckoutForm {
            cardholder: " ".to_owned(),
            ..card_form()
        };
        let err = checkout
            .submit(&form, &typed_card(), Price::from_cents(500))
            .unwrap_err();
        assert_eq!(err.to_string(), messages::MISSING_CARDHOLDER);
    }

    #[test]
    fn test_submit_outside_form_is_refused() {
        let mut checkout = CheckoutOrchestrator::new();
        assert_eq!(
            checkout.submit(&card_form(), &typed_card(), Price::from_cents(500)),
            Err(SubmitError::NotOpen)
        );
    }
}
