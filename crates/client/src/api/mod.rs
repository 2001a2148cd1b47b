//! HTTP transport and per-resource service calls.
//!
//! [`ApiClient`] owns one `reqwest::Client` with the blanket timeout, the base
//! URL, and the [`Session`] whose token it attaches to every request. The
//! submodules add one `impl ApiClient` block per backend resource; each method
//! is a single HTTP call that returns the parsed body.

mod admin;
mod analytics;
mod auth;
mod cart;
mod categories;
mod orders;
mod products;
mod staff;
mod users;
mod wishlist;

pub use admin::ADMIN_PAGE_LIMIT;

use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::Session;

/// Query-string pairs. Values are owned so callers can format numbers inline.
pub type Query<'a> = &'a [(&'a str, String)];

/// Typed client for the emarket REST gateway.
///
/// Cheap to clone; clones share the connection pool and the session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    session: Session,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client for `config`, attaching tokens from `session`.
    ///
    /// A token in the config seeds the session if it has none yet.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        if let Some(token) = &config.token
            && session.token().is_none()
        {
            session.set_token(token.clone());
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url.clone(),
                session,
            }),
        })
    }

    /// The session whose token is attached to requests.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Base URL every path is joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an endpoint path (with or without a leading `/`) and query.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the path doesn't join.
    pub fn url(&self, path: &str, query: Query<'_>) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.join(path.trim_start_matches('/'))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Perform a request and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for a non-2xx answer, `ApiError::Decode` if
    /// the body isn't the expected shape, `ApiError::Transport` on network
    /// failure or timeout.
    #[instrument(skip(self, query, body))]
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        query: Query<'_>,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut builder = self.builder(method, path, query)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = self.send(builder).await?;
        decode(response).await
    }

    /// `GET path`.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, &[], None).await
    }

    /// `GET path?query`.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
    ) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, query, None).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    /// `PATCH path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, &[], Some(body)).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::DELETE, path, &[], None).await
    }

    /// `POST path` with a URL-encoded form body.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    #[instrument(skip(self, fields))]
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let builder = self.builder(Method::POST, path, &[])?.form(fields);
        let response = self.send(builder).await?;
        decode(response).await
    }

    /// `POST path` with a multipart body.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    #[instrument(skip(self, form))]
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let builder = self.builder(Method::POST, path, &[])?.multipart(form);
        let response = self.send(builder).await?;
        decode(response).await
    }

    /// Perform a request whose response body is ignored.
    ///
    /// # Errors
    ///
    /// `ApiError::Status` for a non-2xx answer, `ApiError::Transport` on
    /// network failure.
    #[instrument(skip(self, query, body))]
    pub async fn send_empty<B>(
        &self,
        method: Method,
        path: &str,
        query: Query<'_>,
        body: Option<&B>,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.builder(method, path, query)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(builder).await.map(drop)
    }

    fn builder(&self, method: Method, path: &str, query: Query<'_>) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path, query)?;
        let builder = self.inner.http.request(method, url);

        // Read at send time so a login on another clone is picked up.
        Ok(match self.inner.session.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        })
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(url = %response.url(), %status, "response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status, &body);
        warn!(%status, error = %err, "request rejected");
        Err(err)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Percent-encode one path segment.
pub(crate) fn segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        let config = ClientConfig::new(base).unwrap();
        ApiClient::new(&config, Session::new()).unwrap()
    }

    #[test]
    fn test_url_keeps_base_path() {
        let api = client("http://localhost:8000/api/v1");
        assert_eq!(
            api.url("/products/5", &[]).unwrap().as_str(),
            "http://localhost:8000/api/v1/products/5"
        );
        assert_eq!(
            api.url("cart", &[]).unwrap().as_str(),
            "http://localhost:8000/api/v1/cart"
        );
    }

    #[test]
    fn test_url_encodes_query() {
        let api = client("http://localhost:8000/api/v1/");
        let url = api
            .url("products/search", &[("q", "áo thun".to_string())])
            .unwrap();
        assert_eq!(url.query(), Some("q=%C3%A1o+thun"));
    }

    #[test]
    fn test_segment_escapes_slashes() {
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_config_token_seeds_empty_session() {
        let config = ClientConfig::new("http://localhost:8000")
            .unwrap()
            .with_token(secrecy::SecretString::from("seed"));
        let session = Session::new();
        let _api = ApiClient::new(&config, session.clone()).unwrap();
        assert!(session.is_authenticated());
    }
}
