//! HTTP implementation of the `AccountApi` trait.
//!
//! Talks JSON to the account API over `reqwest`. Every call returns the
//! status and a best-effort JSON body; only failures to get a response at all
//! are reported as `AdapterError`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Method, RequestBuilder, Url};
use serde::Serialize;

use crate::errors::AdapterError;
use crate::models::{
    AgeRoute, AgeUpdateRequest, ApiResponse, AvatarFile, Endpoint, LoginRequest,
    RegisterRequest,
};
use crate::AccountApi;

/// HTTP client for the account API
#[derive(Clone)]
pub struct HttpAccountApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpAccountApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AdapterError> {
        let invalid = |reason: String| AdapterError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let mut parsed = Url::parse(base_url).map_err(|err| invalid(err.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".to_string()));
        }
        // Relative asset paths resolve below the base path, not beside it.
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AdapterError::ClientBuild(err.to_string()))?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint.path()
        )
    }

    fn request(&self, method: Method, endpoint: Endpoint, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(endpoint));
        match token {
            Some(token) => builder.header("Authorization", format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: Endpoint,
        token: Option<&str>,
        body: &T,
    ) -> Result<ApiResponse, AdapterError> {
        let builder = self.request(method, endpoint, token).json(body);
        self.execute(endpoint, builder).await
    }

    async fn execute(
        &self,
        endpoint: Endpoint,
        builder: RequestBuilder,
    ) -> Result<ApiResponse, AdapterError> {
        let response = builder
            .send()
            .await
            .map_err(|err| AdapterError::transport(endpoint.path(), err))?;

        let status = response.status().as_u16();
        // An unreadable body is treated like a missing one.
        let bytes = response.bytes().await.unwrap_or_default();
        tracing::debug!(endpoint = endpoint.path(), status, "API response");

        Ok(ApiResponse::from_bytes(status, &bytes))
    }
}

#[async_trait]
impl AccountApi for HttpAccountApi {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    async fn register(&self, request: &RegisterRequest) -> Result<ApiResponse, AdapterError> {
        self.send_json(Method::POST, Endpoint::Register, None, request)
            .await
    }

    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    async fn login(&self, request: &LoginRequest) -> Result<ApiResponse, AdapterError> {
        self.send_json(Method::POST, Endpoint::Login, None, request)
            .await
    }

    #[tracing::instrument(skip(self, token))]
    async fn fetch_profile(&self, token: &str) -> Result<ApiResponse, AdapterError> {
        let builder = self.request(Method::GET, Endpoint::Profile, Some(token));
        self.execute(Endpoint::Profile, builder).await
    }

    #[tracing::instrument(skip(self, token))]
    async fn update_age(
        &self,
        token: &str,
        route: AgeRoute,
        request: &AgeUpdateRequest,
    ) -> Result<ApiResponse, AdapterError> {
        self.send_json(Method::PUT, route.endpoint(), Some(token), request)
            .await
    }

    #[tracing::instrument(skip(self, token, file), fields(file_name = %file.file_name, size = file.bytes.len()))]
    async fn upload_avatar(
        &self,
        token: &str,
        file: &AvatarFile,
    ) -> Result<ApiResponse, AdapterError> {
        let endpoint = Endpoint::UploadAvatar;
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|err| AdapterError::transport(endpoint.path(), err))?;
        let form = multipart::Form::new().part("avatar", part);

        let builder = self
            .request(Method::POST, endpoint, Some(token))
            .multipart(form);
        self.execute(endpoint, builder).await
    }
}
