//! HTTP client for the Alfabank REST gateway

use crate::config::ClientConfig;
use crate::messages::{Language, MessageKind};
use crate::types::*;
use crate::{AlfabankError, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Client forwarding operations to the Alfabank REST gateway
///
/// Configuration is immutable after construction, so a single client can be
/// cloned and shared between tasks.
#[derive(Debug, Clone)]
pub struct AlfabankClient {
    /// Underlying HTTP client
    http: Client,
    /// Endpoint, language and credentials
    config: Arc<ClientConfig>,
}

impl AlfabankClient {
    /// Create a client for the default endpoint
    pub fn new(credentials: Credentials, language: Language) -> Result<Self> {
        Self::with_config(ClientConfig::new(credentials, language))
    }

    /// Create a client from a full configuration
    pub fn with_config(mut config: ClientConfig) -> Result<Self> {
        config.credentials = config.credentials.normalized();
        config.validate()?;

        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let http = client_builder
            .build()
            .map_err(|e| AlfabankError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// Create a client configured from `ALFABANK_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Language of the messages produced by this client
    pub fn language(&self) -> Language {
        self.config.language
    }

    /// Full URL of an operation
    pub fn operation_url(&self, operation: Operation) -> String {
        self.config.operation_url(operation.as_str())
    }

    /// Execute an operation
    ///
    /// `params` must serialize to a flat JSON object. Credentials are added to
    /// the parameters, which are sent as the query string of a `POST` with an
    /// empty body. A response with a truthy `errorCode` is returned as
    /// [`AlfabankError::Gateway`] carrying the whole response.
    pub async fn execute<P: Serialize>(
        &self,
        operation: Operation,
        params: P,
    ) -> Result<GatewayResponse> {
        let params = to_parameters(params, self.language())?;
        self.dispatch(operation, params).await
    }

    /// Execute an operation given by its wire name
    ///
    /// The parameters are checked before the name, so malformed parameters win
    /// over an unknown operation.
    pub async fn execute_named<P: Serialize>(
        &self,
        operation: &str,
        params: P,
    ) -> Result<GatewayResponse> {
        let params = to_parameters(params, self.language())?;
        let operation: Operation = operation.parse().map_err(|_| {
            AlfabankError::validation(MessageKind::OperationError, self.language())
        })?;
        self.dispatch(operation, params).await
    }

    /// Execute an operation and report the outcome through a callback
    ///
    /// The callback is invoked exactly once, with `(Some(error), None)` on
    /// failure or `(None, Some(response))` on success.
    pub async fn execute_with_callback<P, F>(&self, operation: Operation, params: P, callback: F)
    where
        P: Serialize,
        F: FnOnce(Option<AlfabankError>, Option<GatewayResponse>),
    {
        match self.execute(operation, params).await {
            Ok(response) => callback(None, Some(response)),
            Err(error) => callback(Some(error), None),
        }
    }

    /// Send validated parameters to the gateway
    pub(crate) async fn dispatch(
        &self,
        operation: Operation,
        mut params: Parameters,
    ) -> Result<GatewayResponse> {
        self.config.credentials.apply(&mut params);

        let url = self.operation_url(operation);
        debug!(%operation, %url, params = params.len(), "Dispatching gateway operation");

        let query: Vec<(&str, String)> = params
            .iter()
            .map(|(key, value)| (key.as_str(), value.to_string()))
            .collect();

        let response = self
            .http
            .post(&url)
            .query(&query)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                warn!(%operation, error = %e, "Gateway request failed");
                AlfabankError::from(e)
            })?;

        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        let response = GatewayResponse::try_from(body)?;

        if response.has_error() {
            warn!(
                %operation,
                error_code = %response.error_code_display(),
                "Gateway rejected operation"
            );
            return Err(AlfabankError::Gateway(response));
        }

        debug!(%operation, "Gateway operation succeeded");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_URL_PREFIX, DEFAULT_URL_SUFFIX};

    #[test]
    fn test_client_creation() {
        let client = AlfabankClient::new(Credentials::token("secret"), Language::En).unwrap();
        assert_eq!(client.config().url_prefix, DEFAULT_URL_PREFIX);
        assert_eq!(client.config().url_suffix, DEFAULT_URL_SUFFIX);
        assert_eq!(client.language(), Language::En);
        assert_eq!(
            client.operation_url(Operation::GetOrderStatus),
            "https://web.rbsuat.com/ab/rest/getOrderStatus.do"
        );
    }

    #[test]
    fn test_client_requires_credentials() {
        let error = AlfabankClient::new(Credentials::default(), Language::En).unwrap_err();
        assert_eq!(error.message_kind(), Some(MessageKind::AuthInvalid));
        assert_eq!(error.to_string(), MessageKind::AuthInvalid.text(Language::En));

        let error =
            AlfabankClient::new(Credentials::login("merchant-api", ""), Language::Ru).unwrap_err();
        assert_eq!(error.to_string(), MessageKind::AuthInvalid.text(Language::Ru));
    }

    #[test]
    fn test_client_with_config() {
        let config = ClientConfig::new(Credentials::login("merchant-api", "pass"), Language::Ru)
            .with_url_prefix("https://pay.alfabank.ru/payment/rest/");
        let client = AlfabankClient::with_config(config).unwrap();
        assert_eq!(
            client.operation_url(Operation::Refund),
            "https://pay.alfabank.ru/payment/rest/refund.do"
        );
    }

    #[test]
    fn test_client_debug_hides_secrets() {
        let client = AlfabankClient::new(Credentials::token("top-secret"), Language::En).unwrap();
        assert!(!format!("{client:?}").contains("top-secret"));
    }
}
