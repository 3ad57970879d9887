//! Shopify Customer Account API client.
//!
//! The Customer Account API provides access to customer authentication and
//! customer-owned data. Uses OAuth 2.0 for authentication.
//!
//! # OAuth Flow
//!
//! 1. Generate authorization URL with `authorization_url()`
//! 2. Redirect customer to Shopify's login page
//! 3. Shopify redirects back with authorization code
//! 4. Exchange code for tokens with `exchange_code()`
//! 5. Use access token for customer-scoped API calls
//!
//! # Example
//!
//! ```rust,ignore
//! use shelf_storefront::shopify::CustomerClient;
//!
//! let client = CustomerClient::new(&config.shopify);
//!
//! let auth_url = client.authorization_url("https://example.com/callback", &state, &nonce);
//! let token = client.exchange_code(&code, "https://example.com/callback").await?;
//!
//! let field = client.get_metafield(&token.access_token, "custom", "wishlist").await?;
//! ```

mod types;

pub use types::*;

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::config::ShopifyCustomerConfig;
use crate::shopify::{GraphQLError, ShopifyError};

// ─────────────────────────────────────────────────────────────────────────────
// GraphQL Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

impl<T> GraphQLResponse<T> {
    fn into_result(self) -> Result<T, ShopifyError> {
        if let Some(errors) = self.errors
            && !errors.is_empty()
        {
            return Err(ShopifyError::GraphQL(errors));
        }

        self.data.ok_or_else(|| ShopifyError::GraphQL(Vec::new()))
    }
}

fn user_error_message(errors: &[CustomerUserError]) -> Option<String> {
    if errors.is_empty() {
        return None;
    }
    Some(
        errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Customer Account Client
// ─────────────────────────────────────────────────────────────────────────────

/// Client for the Shopify Customer Account API.
///
/// This client handles OAuth authentication and reads/writes customer
/// metafields.
#[derive(Clone)]
pub struct CustomerClient {
    inner: Arc<CustomerClientInner>,
}

struct CustomerClientInner {
    client: reqwest::Client,
    api_base: String,
    store_id: String,
    api_version: String,
    client_id: String,
    client_secret: SecretString,
}

impl CustomerClient {
    /// Create a new Customer Account API client.
    #[must_use]
    pub fn new(config: &ShopifyCustomerConfig) -> Self {
        Self {
            inner: Arc::new(CustomerClientInner {
                client: reqwest::Client::new(),
                api_base: config.api_base.clone(),
                store_id: config.customer_shop_id.clone(),
                api_version: config.api_version.clone(),
                client_id: config.customer_client_id.clone(),
                client_secret: config.customer_client_secret.clone(),
            }),
        }
    }

    /// Get the OAuth client ID (safe to expose in frontend).
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.inner.client_id
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{path}", self.inner.api_base, self.inner.store_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // OAuth Flow
    // ─────────────────────────────────────────────────────────────────────────

    /// Generate the authorization URL for customer login.
    ///
    /// # Arguments
    ///
    /// * `redirect_uri` - The callback URL to redirect to after authentication
    /// * `state` - A random string stored in the session to prevent CSRF attacks
    /// * `nonce` - A random string for `OpenID` Connect replay protection
    #[must_use]
    pub fn authorization_url(&self, redirect_uri: &str, state: &str, nonce: &str) -> String {
        format!(
            "{}?\
            client_id={}&\
            response_type=code&\
            redirect_uri={}&\
            scope=openid%20email%20customer-account-api:full&\
            state={}&\
            nonce={}",
            self.endpoint("auth/oauth/authorize"),
            urlencoding::encode(&self.inner.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(state),
            urlencoding::encode(nonce)
        )
    }

    /// Generate the logout URL.
    #[must_use]
    pub fn logout_url(&self, id_token: &str, post_logout_redirect_uri: &str) -> String {
        format!(
            "{}?id_token_hint={}&post_logout_redirect_uri={}",
            self.endpoint("auth/oauth/logout"),
            urlencoding::encode(id_token),
            urlencoding::encode(post_logout_redirect_uri)
        )
    }

    /// Exchange an authorization code for access tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the token exchange fails.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<CustomerAccessToken, ShopifyError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.inner.client_id.as_str()),
            ("client_secret", self.inner.client_secret.expose_secret()),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .inner
            .client
            .post(self.endpoint("auth/oauth/token"))
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ShopifyError::OAuth(format!(
                "Token exchange failed: {text}"
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.into())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // GraphQL Execution
    // ─────────────────────────────────────────────────────────────────────────

    /// Execute a GraphQL query against the Customer Account API.
    async fn query<T: DeserializeOwned>(
        &self,
        access_token: &str,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> Result<T, ShopifyError> {
        let url = self.endpoint(&format!(
            "account/customer/api/{}/graphql",
            self.inner.api_version
        ));

        let response = self
            .inner
            .client
            .post(&url)
            .header("Authorization", access_token)
            .header("Content-Type", "application/json")
            .header("User-Agent", "Shelf/1.0")
            .json(&GraphQLRequest { query, variables })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ShopifyError::Status { status, body });
        }

        let gql_response: GraphQLResponse<T> = response.json().await?;
        gql_response.into_result()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Metafield Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Read a metafield of the current customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_metafield(
        &self,
        access_token: &str,
        namespace: &str,
        key: &str,
    ) -> Result<CustomerMetafield, ShopifyError> {
        #[derive(Deserialize)]
        struct Response {
            customer: CustomerNode,
        }

        #[derive(Deserialize)]
        struct CustomerNode {
            id: String,
            metafield: Option<MetafieldNode>,
        }

        #[derive(Deserialize)]
        struct MetafieldNode {
            value: Option<String>,
        }

        const QUERY: &str = r"
            query customerMetafield($namespace: String!, $key: String!) {
                customer {
                    id
                    metafield(namespace: $namespace, key: $key) {
                        value
                    }
                }
            }
        ";

        let variables = serde_json::json!({ "namespace": namespace, "key": key });
        let response: Response = self.query(access_token, QUERY, Some(variables)).await?;

        Ok(CustomerMetafield {
            customer_id: response.customer.id,
            value: response.customer.metafield.and_then(|m| m.value),
        })
    }

    /// Write one metafield on a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or if the mutation reports
    /// user errors.
    pub async fn set_metafield(
        &self,
        access_token: &str,
        input: MetafieldsSetInput,
    ) -> Result<(), ShopifyError> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(rename = "metafieldsSet")]
            metafields_set: MetafieldsSetResult,
        }

        #[derive(Deserialize)]
        struct MetafieldsSetResult {
            #[serde(rename = "userErrors")]
            user_errors: Vec<CustomerUserError>,
        }

        const QUERY: &str = r"
            mutation metafieldsSet($metafields: [MetafieldsSetInput!]!) {
                metafieldsSet(metafields: $metafields) {
                    metafields {
                        key
                        namespace
                    }
                    userErrors {
                        field
                        message
                        code
                    }
                }
            }
        ";

        let variables = serde_json::json!({ "metafields": [input] });
        let response: Response = self.query(access_token, QUERY, Some(variables)).await?;

        if let Some(message) = user_error_message(&response.metafields_set.user_errors) {
            return Err(ShopifyError::UserError(message));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> CustomerClient {
        CustomerClient::new(&ShopifyCustomerConfig {
            store: "test.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            api_base: "https://shopify.com".to_string(),
            customer_shop_id: "123".to_string(),
            customer_client_id: "client id".to_string(),
            customer_client_secret: SecretString::from("s3cr3t"),
        })
    }

    #[test]
    fn test_authorization_url_encodes_parameters() {
        let url = client().authorization_url("https://shop.test/cb", "st ate", "n");
        assert!(url.starts_with("https://shopify.com/123/auth/oauth/authorize?"));
        assert!(url.contains("client_id=client%20id"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fshop.test%2Fcb"));
        assert!(url.contains("state=st%20ate"));
    }

    #[test]
    fn test_logout_url() {
        let url = client().logout_url("tok", "https://shop.test/");
        assert_eq!(
            url,
            "https://shopify.com/123/auth/oauth/logout?id_token_hint=tok&post_logout_redirect_uri=https%3A%2F%2Fshop.test%2F"
        );
    }

    #[test]
    fn test_graphql_response_errors_take_precedence() {
        let response: GraphQLResponse<serde_json::Value> = serde_json::from_value(
            serde_json::json!({ "data": null, "errors": [{ "message": "Access denied" }] }),
        )
        .unwrap();
        let err = response.into_result().unwrap_err();
        assert_eq!(err.to_string(), "GraphQL errors: Access denied");
    }

    #[test]
    fn test_user_error_message_joins() {
        let errors = vec![
            CustomerUserError {
                field: None,
                message: "Value is invalid".to_string(),
                code: None,
            },
            CustomerUserError {
                field: None,
                message: "Too long".to_string(),
                code: None,
            },
        ];
        assert_eq!(
            user_error_message(&errors).as_deref(),
            Some("Value is invalid, Too long")
        );
        assert_eq!(user_error_message(&[]), None);
    }
}
