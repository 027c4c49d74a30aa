//! HTTP payment gateway adapter.
//!
//! Talks to a Paystack-style REST API: `POST /transaction/initialize` and
//! `GET /transaction/verify/{reference}`, both answering with a
//! `{status, message, data}` envelope.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use zeroize::Zeroize;

use crate::payments::{
    PaymentGateway, PaymentGatewayError, PaymentReference,
    models::{ChargeMetadata, ChargeRequest, ChargeVerification, ClientHandoff},
};

/// Gateway secret key, wiped from memory on drop.
#[derive(Clone)]
pub struct GatewaySecretKey(String);

impl GatewaySecretKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for GatewaySecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GatewaySecretKey(**redacted**)")
    }
}

impl Drop for GatewaySecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Configuration for [`HttpPaymentGateway`].
#[derive(Debug, Clone)]
pub struct HttpPaymentGatewayConfig {
    /// Base URL, e.g. `"https://api.paystack.co"`.
    pub base_url: String,

    pub secret_key: GatewaySecretKey,

    /// Upper bound on each gateway round trip.
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    base_url: String,
    secret_key: GatewaySecretKey,
    http: Client,
}

impl HttpPaymentGateway {
    /// Build a gateway client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: HttpPaymentGatewayConfig) -> Result<Self, PaymentGatewayError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key,
            http,
        })
    }

    async fn send_initialize(
        &self,
        request: &ChargeRequest,
    ) -> Result<ClientHandoff, PaymentGatewayError> {
        let url = format!("{}/transaction/initialize", self.base_url);

        let body = InitializeBody {
            email: &request.email,
            amount: request.amount,
            currency: &request.currency,
            reference: request.reference.as_str(),
            metadata: &request.metadata,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.secret_key.expose())
            .json(&body)
            .send()
            .await?;

        let data: InitializeData = decode_envelope(response).await?;

        if data.reference != request.reference.as_str() {
            return Err(PaymentGatewayError::UnexpectedResponse(format!(
                "initialize answered for reference {} instead of {}",
                data.reference, request.reference
            )));
        }

        Ok(ClientHandoff {
            reference: request.reference.clone(),
            authorization_url: data.authorization_url,
            access_code: data.access_code,
        })
    }

    async fn send_verify(
        &self,
        reference: &PaymentReference,
    ) -> Result<ChargeVerification, PaymentGatewayError> {
        let url = format!("{}/transaction/verify/{reference}", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.secret_key.expose())
            .send()
            .await?;

        let data: VerifyData = decode_envelope(response).await?;

        Ok(ChargeVerification {
            reference: data.reference.into(),
            verified: data.status == "success",
            amount: data.amount,
            currency: data.currency,
            message: data.gateway_response,
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn initiate_charge(
        &self,
        request: ChargeRequest,
        cancel: CancellationToken,
    ) -> Result<ClientHandoff, PaymentGatewayError> {
        debug!(reference = %request.reference, amount = request.amount, "initiating charge");

        tokio::select! {
            biased;

            () = cancel.cancelled() => Err(PaymentGatewayError::Cancelled),
            result = self.send_initialize(&request) => result,
        }
    }

    async fn verify_charge(
        &self,
        reference: &PaymentReference,
        cancel: CancellationToken,
    ) -> Result<ChargeVerification, PaymentGatewayError> {
        debug!(%reference, "verifying charge");

        tokio::select! {
            biased;

            () = cancel.cancelled() => Err(PaymentGatewayError::Cancelled),
            result = self.send_verify(reference) => result,
        }
    }
}

#[derive(Debug, Serialize)]
struct InitializeBody<'a> {
    email: &'a str,
    amount: u64,
    currency: &'a str,
    reference: &'a str,
    metadata: &'a ChargeMetadata,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: bool,
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct InitializeData {
    authorization_url: String,
    access_code: String,
    reference: String,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    status: String,
    reference: String,
    amount: u64,
    currency: String,
    gateway_response: Option<String>,
}

async fn decode_envelope<T: DeserializeOwned>(
    response: Response,
) -> Result<T, PaymentGatewayError> {
    let status = response.status();
    let text = response.text().await?;

    let envelope: Envelope<T> = serde_json::from_str(&text).map_err(|error| {
        warn!(%status, "undecodable payment gateway response: {error}");

        PaymentGatewayError::UnexpectedResponse(format!("status {status}: {error}"))
    })?;

    if !status.is_success() || !envelope.status {
        return Err(PaymentGatewayError::Rejected(envelope.message));
    }

    envelope.data.ok_or_else(|| {
        PaymentGatewayError::UnexpectedResponse("response envelope has no data".to_string())
    })
}
