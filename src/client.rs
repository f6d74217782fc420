// File: src/client.rs
pub mod tls;

use crate::error::ServiceError;
use crate::model::{DeliveryStatus, EventPage, EventQuery, UserProfile};

use futures::future::BoxFuture;
use http::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use http::{Method, Request, Uri};
use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::Deserialize;
use tower::ServiceExt;
use tower::util::Either;
use tower_http::auth::AddAuthorization;
use url::Url;

/// The remote event API as seen by the controllers.
pub trait EventService: Send + Sync {
    fn get_events<'a>(
        &'a self,
        query: &'a EventQuery,
    ) -> BoxFuture<'a, Result<EventPage, ServiceError>>;

    fn change_delivery_status<'a>(
        &'a self,
        event_id: &'a str,
        status: &'a DeliveryStatus,
    ) -> BoxFuture<'a, Result<(), ServiceError>>;

    fn get_user_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<UserProfile, ServiceError>>;
}

type BaseClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, String>;
type ApiClient = Either<AddAuthorization<BaseClient>, BaseClient>;

#[derive(Clone, Debug)]
pub struct HttpEventService {
    // Both None in offline mode (no api_url configured)
    base: Option<Url>,
    client: Option<ApiClient>,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: UserProfile,
}

impl HttpEventService {
    pub fn new(base_url: &str, token: Option<&str>, insecure: bool) -> Result<Self, ServiceError> {
        if base_url.trim().is_empty() {
            return Ok(Self {
                base: None,
                client: None,
            });
        }
        let base = Url::parse(base_url).map_err(|e| ServiceError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ServiceError::InvalidUrl(base_url.to_string()));
        }

        let connector = tls::build_connector(insecure)?;
        let http_client: BaseClient = Client::builder(TokioExecutor::new()).build(connector);

        let client = match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => {
                // AddAuthorization panics on invalid header values, so check first.
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| ServiceError::InvalidToken)?;
                Either::Left(AddAuthorization::bearer(http_client, token))
            }
            None => Either::Right(http_client),
        };

        Ok(Self {
            base: Some(base),
            client: Some(client),
        })
    }

    pub fn is_offline(&self) -> bool {
        self.client.is_none()
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base.clone().ok_or(ServiceError::Offline)?;
        match url.path_segments_mut() {
            Ok(mut path) => {
                path.pop_if_empty().extend(segments);
            }
            Err(()) => return Err(ServiceError::InvalidUrl("base url cannot carry a path".into())),
        }
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<Vec<u8>, ServiceError> {
        let client = self.client.clone().ok_or(ServiceError::Offline)?;
        let uri: Uri = url
            .as_str()
            .parse()
            .map_err(|e: http::uri::InvalidUri| ServiceError::InvalidUrl(e.to_string()))?;

        tracing::debug!(%method, %uri, "api request");

        let mut builder = Request::builder()
            .method(method.clone())
            .uri(uri.clone())
            .header(ACCEPT, "application/json");
        if body.is_some() {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        let request = builder
            .body(body.unwrap_or_default())
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let response = client.oneshot(request).await.map_err(|e| {
            tracing::warn!(%method, %uri, "request failed: {}", e);
            ServiceError::Transport(e.to_string())
        })?;

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?
            .to_bytes();

        if !status.is_success() {
            let detail = error_detail(&bytes);
            tracing::warn!(%method, %uri, status = status.as_u16(), ?detail, "api error");
            return Err(ServiceError::Api {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(bytes.to_vec())
    }

    pub async fn fetch_events(&self, query: &EventQuery) -> Result<EventPage, ServiceError> {
        let mut url = self.endpoint(&["events"])?;
        url.query_pairs_mut()
            .append_pair("page", &query.page.to_string())
            .append_pair("page_size", &query.page_size.to_string())
            .append_pair("search", &query.search)
            .append_pair("sort", query.sort.as_param());

        let bytes = self.send(Method::GET, url, None).await?;
        serde_json::from_slice(&bytes).map_err(|e| ServiceError::Decode(e.to_string()))
    }

    pub async fn update_delivery_status(
        &self,
        event_id: &str,
        status: &DeliveryStatus,
    ) -> Result<(), ServiceError> {
        let url = self.endpoint(&["events", event_id, "delivery-status"])?;
        let body = serde_json::json!({ "delivery_status": status }).to_string();
        self.send(Method::PATCH, url, Some(body)).await?;
        Ok(())
    }

    pub async fn find_user(&self, email: &str) -> Result<UserProfile, ServiceError> {
        let mut url = self.endpoint(&["users", "by-email"])?;
        url.query_pairs_mut().append_pair("email", email);

        let bytes = self.send(Method::GET, url, None).await?;
        let envelope: UserEnvelope =
            serde_json::from_slice(&bytes).map_err(|e| ServiceError::Decode(e.to_string()))?;
        Ok(envelope.user)
    }
}

impl EventService for HttpEventService {
    fn get_events<'a>(
        &'a self,
        query: &'a EventQuery,
    ) -> BoxFuture<'a, Result<EventPage, ServiceError>> {
        Box::pin(self.fetch_events(query))
    }

    fn change_delivery_status<'a>(
        &'a self,
        event_id: &'a str,
        status: &'a DeliveryStatus,
    ) -> BoxFuture<'a, Result<(), ServiceError>> {
        Box::pin(self.update_delivery_status(event_id, status))
    }

    fn get_user_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<UserProfile, ServiceError>> {
        Box::pin(self.find_user(email))
    }
}

fn error_detail(bytes: &[u8]) -> Option<String> {
    let body: ErrorBody = serde_json::from_slice(bytes).ok()?;
    body.detail.or(body.message).or(body.error)
}
