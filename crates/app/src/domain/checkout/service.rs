//! Checkout orchestration.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    auth::UserUuid,
    domain::{
        carts::{CartsService, models::CartUuid},
        checkout::{
            CheckoutPolicy,
            attempts::CheckoutAttempts,
            errors::CheckoutServiceError,
            models::{CheckoutAttempt, CheckoutState},
        },
        orders::{
            OrdersService, OrdersServiceError,
            models::{NewOrder, Order, OrderLineItem, OrderUuid, ShippingAddress},
        },
    },
    payments::{
        PaymentGateway, PaymentGatewayError, PaymentReference,
        models::{ChargeMetadata, ChargeRequest, ChargeVerification, ClientHandoff},
    },
};

const PAYMENT_CANCELLED_MESSAGE: &str = "payment window closed before completion";

/// Drives a cart through payment into an order.
#[derive(Clone)]
pub struct Checkout {
    carts: Arc<dyn CartsService>,
    orders: Arc<dyn OrdersService>,
    gateway: Arc<dyn PaymentGateway>,
    attempts: Arc<dyn CheckoutAttempts>,
    policy: CheckoutPolicy,
}

impl Checkout {
    #[must_use]
    pub fn new(
        carts: Arc<dyn CartsService>,
        orders: Arc<dyn OrdersService>,
        gateway: Arc<dyn PaymentGateway>,
        attempts: Arc<dyn CheckoutAttempts>,
        policy: CheckoutPolicy,
    ) -> Self {
        Self {
            carts,
            orders,
            gateway,
            attempts,
            policy,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &CheckoutPolicy {
        &self.policy
    }

    async fn load_owned(
        &self,
        user: UserUuid,
        reference: &PaymentReference,
    ) -> Result<CheckoutAttempt, CheckoutServiceError> {
        match self.attempts.get(reference).await? {
            Some(attempt) if attempt.user_uuid == user => Ok(attempt),
            Some(_) | None => Err(CheckoutServiceError::NotFound),
        }
    }

    /// Move the attempt to `next` and persist it, unless another request
    /// moved it out of its loaded state first.
    async fn transition(
        &self,
        attempt: &mut CheckoutAttempt,
        next: CheckoutState,
    ) -> Result<(), CheckoutServiceError> {
        let expected = attempt.state;

        attempt.state = next;
        attempt.updated_at = Timestamp::now();

        self.attempts.save(attempt, expected).await
    }

    /// Ask the gateway about the charge and move the attempt accordingly.
    ///
    /// An abandoned attempt is still checked, so a charge captured after the
    /// shopper gave up turns into an order. It stays failed otherwise.
    async fn verify(
        &self,
        attempt: &mut CheckoutAttempt,
        cancel: CancellationToken,
    ) -> Result<(), CheckoutServiceError> {
        let unpaid = match attempt.state {
            CheckoutState::Failed => CheckoutState::Failed,
            _ => CheckoutState::AwaitingPayment,
        };

        self.transition(attempt, CheckoutState::VerifyingPayment)
            .await?;

        let outcome = self
            .gateway
            .verify_charge(&attempt.reference, cancel)
            .await;

        let failure = match outcome {
            Ok(verification) => match verification_problem(attempt, &verification) {
                None => {
                    attempt.payment_verified = true;
                    attempt.last_error = None;

                    self.transition(attempt, CheckoutState::CreatingOrder)
                        .await?;

                    info!(reference = %attempt.reference, "payment verified");

                    return Ok(());
                }
                Some(message) => CheckoutServiceError::PaymentNotVerified(message),
            },
            Err(PaymentGatewayError::Rejected(message)) => {
                CheckoutServiceError::PaymentNotVerified(message)
            }
            Err(error) => CheckoutServiceError::Gateway(error),
        };

        warn!(reference = %attempt.reference, "payment verification failed: {failure}");

        attempt.last_error = Some(failure.to_string());

        self.transition(attempt, unpaid).await?;

        Err(failure)
    }

    /// Create the order for a verified attempt and complete it.
    async fn complete(
        &self,
        attempt: &mut CheckoutAttempt,
    ) -> Result<Order, CheckoutServiceError> {
        let new_order = NewOrder {
            uuid: OrderUuid::new(),
            user_uuid: attempt.user_uuid,
            items: attempt.items.clone(),
            totals: attempt.totals.clone(),
            shipping_address: attempt.shipping_address.clone(),
            payment_reference: attempt.reference.clone(),
        };

        let creation = match self.orders.create_for_payment(new_order).await {
            Ok(creation) => creation,
            Err(OrdersServiceError::Sql(failure)) => {
                error!(
                    reference = %attempt.reference,
                    "order creation failed after verified payment: {failure}"
                );

                attempt.last_error = Some(failure.to_string());

                self.transition(attempt, CheckoutState::CreatingOrder)
                    .await?;

                return Err(CheckoutServiceError::OrderPending {
                    reference: attempt.reference.clone(),
                });
            }
            Err(failure) => {
                error!(
                    reference = %attempt.reference,
                    "order rejected after verified payment: {failure}"
                );

                return Err(failure.into());
            }
        };

        if let Err(failure) = self
            .carts
            .clear_cart(attempt.user_uuid, attempt.cart_uuid)
            .await
        {
            warn!(cart_uuid = %attempt.cart_uuid, "failed to clear cart after order: {failure}");
        }

        attempt.order_uuid = Some(creation.order.uuid);
        attempt.last_error = None;

        match self.transition(attempt, CheckoutState::Completed).await {
            // A concurrent confirmation completed it with the same order.
            Ok(()) | Err(CheckoutServiceError::Conflict) => {}
            Err(failure) => return Err(failure),
        }

        info!(
            reference = %attempt.reference,
            order_uuid = %creation.order.uuid,
            "checkout completed"
        );

        Ok(creation.order)
    }
}

impl fmt::Debug for Checkout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkout")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Why a gateway verification doesn't settle the attempt, if it doesn't.
fn verification_problem(
    attempt: &CheckoutAttempt,
    verification: &ChargeVerification,
) -> Option<String> {
    if !verification.verified {
        return Some(
            verification
                .message
                .clone()
                .unwrap_or_else(|| "payment was not successful".to_string()),
        );
    }

    if verification.reference != attempt.reference {
        return Some(format!(
            "gateway verified reference {} instead of {}",
            verification.reference, attempt.reference
        ));
    }

    if verification.amount != attempt.totals.total
        || !verification
            .currency
            .eq_ignore_ascii_case(&attempt.totals.currency)
    {
        return Some(format!(
            "paid {} {} but order total is {} {}",
            verification.amount,
            verification.currency,
            attempt.totals.total,
            attempt.totals.currency
        ));
    }

    None
}

#[async_trait]
impl CheckoutService for Checkout {
    #[tracing::instrument(
        name = "checkout.service.start",
        skip(self, shipping),
        fields(reference = tracing::field::Empty),
        err
    )]
    async fn start(
        &self,
        user: UserUuid,
        cart: CartUuid,
        shipping: ShippingAddress,
    ) -> Result<CheckoutAttempt, CheckoutServiceError> {
        let missing = shipping.missing_required_fields();

        if !missing.is_empty() {
            return Err(CheckoutServiceError::Validation {
                fields: missing.into_vec(),
            });
        }

        let cart = self.carts.get_cart(user, cart).await?;

        if cart.is_empty() {
            return Err(CheckoutServiceError::EmptyCart);
        }

        let now = Timestamp::now();

        let attempt = CheckoutAttempt {
            reference: PaymentReference::generate(),
            user_uuid: user,
            cart_uuid: cart.uuid,
            state: CheckoutState::AwaitingPayment,
            shipping_address: shipping,
            items: cart.items.iter().map(OrderLineItem::from).collect(),
            totals: self.policy.quote(cart.subtotal()),
            payment_verified: false,
            order_uuid: None,
            last_error: None,
            created_at: now,
            updated_at: now,
        };

        self.attempts.insert(&attempt).await?;

        tracing::Span::current().record("reference", tracing::field::display(&attempt.reference));

        info!(total = attempt.totals.total, "checkout started");

        Ok(attempt)
    }

    #[tracing::instrument(name = "checkout.service.initiate_payment", skip(self, cancel), err)]
    async fn initiate_payment(
        &self,
        user: UserUuid,
        reference: PaymentReference,
        cancel: CancellationToken,
    ) -> Result<ClientHandoff, CheckoutServiceError> {
        let mut attempt = self.load_owned(user, &reference).await?;

        if attempt.state != CheckoutState::AwaitingPayment {
            return Err(CheckoutServiceError::InvalidState(attempt.state));
        }

        let shipping = &attempt.shipping_address;

        let request = ChargeRequest {
            reference: attempt.reference.clone(),
            amount: attempt.totals.total,
            currency: attempt.totals.currency.clone(),
            email: shipping.email.clone(),
            metadata: ChargeMetadata {
                name: shipping.full_name(),
                phone: shipping.phone.clone(),
                address: shipping.one_line(),
            },
        };

        let state = attempt.state;

        match self.gateway.initiate_charge(request, cancel).await {
            Ok(handoff) => {
                if attempt.last_error.take().is_some() {
                    self.transition(&mut attempt, state).await?;
                }

                Ok(handoff)
            }
            Err(failure) => {
                attempt.last_error = Some(failure.to_string());

                self.transition(&mut attempt, state).await?;

                Err(failure.into())
            }
        }
    }

    #[tracing::instrument(name = "checkout.service.cancel_payment", skip(self), err)]
    async fn cancel_payment(
        &self,
        user: UserUuid,
        reference: PaymentReference,
    ) -> Result<CheckoutAttempt, CheckoutServiceError> {
        let mut attempt = self.load_owned(user, &reference).await?;

        match attempt.state {
            CheckoutState::AwaitingPayment | CheckoutState::VerifyingPayment => {
                attempt.last_error = Some(PAYMENT_CANCELLED_MESSAGE.to_string());

                self.transition(&mut attempt, CheckoutState::AwaitingPayment)
                    .await?;

                Ok(attempt)
            }
            state => Err(CheckoutServiceError::InvalidState(state)),
        }
    }

    #[tracing::instrument(name = "checkout.service.confirm_payment", skip(self, cancel), err)]
    async fn confirm_payment(
        &self,
        user: UserUuid,
        reference: PaymentReference,
        cancel: CancellationToken,
    ) -> Result<Order, CheckoutServiceError> {
        let mut attempt = self.load_owned(user, &reference).await?;

        match attempt.state {
            CheckoutState::Completed => {
                let order = attempt
                    .order_uuid
                    .ok_or(CheckoutServiceError::InvalidState(attempt.state))?;

                return Ok(self.orders.get_order(order).await?);
            }
            CheckoutState::AwaitingPayment
            | CheckoutState::VerifyingPayment
            | CheckoutState::Failed => {
                self.verify(&mut attempt, cancel).await?;
            }
            CheckoutState::CreatingOrder => {}
            CheckoutState::CollectingShipping => {
                return Err(CheckoutServiceError::InvalidState(attempt.state));
            }
        }

        self.complete(&mut attempt).await
    }

    #[tracing::instrument(name = "checkout.service.abandon", skip(self), err)]
    async fn abandon(
        &self,
        user: UserUuid,
        reference: PaymentReference,
    ) -> Result<CheckoutAttempt, CheckoutServiceError> {
        let mut attempt = self.load_owned(user, &reference).await?;

        if attempt.payment_verified {
            return Err(CheckoutServiceError::AlreadyPaid);
        }

        if attempt.state != CheckoutState::Failed {
            self.transition(&mut attempt, CheckoutState::Failed).await?;
        }

        Ok(attempt)
    }

    async fn get_attempt(
        &self,
        user: UserUuid,
        reference: PaymentReference,
    ) -> Result<CheckoutAttempt, CheckoutServiceError> {
        self.load_owned(user, &reference).await
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Validate shipping, price the cart and open a payment attempt.
    async fn start(
        &self,
        user: UserUuid,
        cart: CartUuid,
        shipping: ShippingAddress,
    ) -> Result<CheckoutAttempt, CheckoutServiceError>;

    /// Start the gateway charge for an attempt awaiting payment.
    async fn initiate_payment(
        &self,
        user: UserUuid,
        reference: PaymentReference,
        cancel: CancellationToken,
    ) -> Result<ClientHandoff, CheckoutServiceError>;

    /// The shopper closed the gateway; keep the attempt open for a retry.
    async fn cancel_payment(
        &self,
        user: UserUuid,
        reference: PaymentReference,
    ) -> Result<CheckoutAttempt, CheckoutServiceError>;

    /// Verify the payment, then create the order. Works on abandoned attempts
    /// too, so a late charge is never stranded.
    async fn confirm_payment(
        &self,
        user: UserUuid,
        reference: PaymentReference,
        cancel: CancellationToken,
    ) -> Result<Order, CheckoutServiceError>;

    /// Give up on an unpaid attempt. The payment reference stays confirmable.
    async fn abandon(
        &self,
        user: UserUuid,
        reference: PaymentReference,
    ) -> Result<CheckoutAttempt, CheckoutServiceError>;

    async fn get_attempt(
        &self,
        user: UserUuid,
        reference: PaymentReference,
    ) -> Result<CheckoutAttempt, CheckoutServiceError>;
}
