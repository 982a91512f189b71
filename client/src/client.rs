//! Blocking PetFriends client.
//!
//! # Design
//! `PetFriends` is the host half of the host-does-IO split: it asks
//! `PetFriendsApi` for a request, executes it with a `ureq` agent and hands
//! the response back for parsing. The agent is configured not to treat 4xx/5xx
//! statuses as errors, so they come back as `ApiResponse` data.

use std::path::Path;

use petfriends_core::{
    ApiError, ApiResponse, AuthKey, Credentials, HttpMethod, HttpRequest, HttpResponse, Pet,
    PetFilter, PetFriendsApi, PetInfo, PetList, PhotoUpload,
};
use ureq::typestate::WithBody;
use ureq::RequestBuilder;

use crate::config::Settings;

/// Cap on a response body. Pet lists embed every photo as base64, so they
/// outgrow ureq's 10 MiB default.
const MAX_RESPONSE_BYTES: u64 = 512 * 1024 * 1024;

/// Synchronous client for the PetFriends API. One instance may be reused for
/// any number of calls.
#[derive(Clone)]
pub struct PetFriends {
    api: PetFriendsApi,
    agent: ureq::Agent,
}

impl std::fmt::Debug for PetFriends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PetFriends")
            .field("base_url", &self.api.base_url())
            .finish_non_exhaustive()
    }
}

impl Default for PetFriends {
    fn default() -> Self {
        Self::with_api(PetFriendsApi::default())
    }
}

impl PetFriends {
    pub fn new(base_url: &str) -> Self {
        Self::with_api(PetFriendsApi::new(base_url))
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.base_url())
    }

    fn with_api(api: PetFriendsApi) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { api, agent }
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    pub fn get_api_key(&self, credentials: &Credentials) -> Result<ApiResponse<AuthKey>, ApiError> {
        let request = self.api.build_get_api_key(credentials);
        self.api.parse_get_api_key(self.execute(request)?)
    }

    pub fn get_list_of_pets(
        &self,
        auth: &AuthKey,
        filter: impl Into<PetFilter>,
    ) -> Result<ApiResponse<PetList>, ApiError> {
        let request = self.api.build_get_list_of_pets(auth, &filter.into())?;
        self.api.parse_get_list_of_pets(self.execute(request)?)
    }

    /// Create a pet with a photo read from `photo_path`.
    ///
    /// The credential is checked first, then the photo is loaded; either
    /// failure returns before anything is sent.
    pub fn add_new_pet(
        &self,
        auth: &AuthKey,
        pet: &PetInfo,
        photo_path: impl AsRef<Path>,
    ) -> Result<ApiResponse<Pet>, ApiError> {
        auth.key()?;
        let photo = PhotoUpload::load(photo_path)?;
        let request = self.api.build_add_new_pet(auth, pet, &photo)?;
        self.api.parse_pet(self.execute(request)?)
    }

    pub fn add_new_pet_without_photo(
        &self,
        auth: &AuthKey,
        pet: &PetInfo,
    ) -> Result<ApiResponse<Pet>, ApiError> {
        let request = self.api.build_add_new_pet_without_photo(auth, pet)?;
        self.api.parse_pet(self.execute(request)?)
    }

    /// Replace the photo of an existing pet. Same precondition order as
    /// [`PetFriends::add_new_pet`].
    pub fn add_photo_of_pet(
        &self,
        auth: &AuthKey,
        pet_id: &str,
        photo_path: impl AsRef<Path>,
    ) -> Result<ApiResponse<Pet>, ApiError> {
        auth.key()?;
        let photo = PhotoUpload::load(photo_path)?;
        let request = self.api.build_add_photo_of_pet(auth, pet_id, &photo)?;
        self.api.parse_pet(self.execute(request)?)
    }

    pub fn update_pet_info(
        &self,
        auth: &AuthKey,
        pet_id: &str,
        pet: &PetInfo,
    ) -> Result<ApiResponse<Pet>, ApiError> {
        let request = self.api.build_update_pet_info(auth, pet_id, pet)?;
        self.api.parse_pet(self.execute(request)?)
    }

    pub fn delete_pet(&self, auth: &AuthKey, pet_id: &str) -> Result<ApiResponse<()>, ApiError> {
        let request = self.api.build_delete_pet(auth, pet_id)?;
        Ok(self.api.parse_delete_pet(self.execute(request)?))
    }

    /// Execute an `HttpRequest` and return an `HttpResponse`.
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;
        tracing::debug!(method = method.as_str(), %url, "sending request");

        let result = match method {
            HttpMethod::Get => with_headers(self.agent.get(&url), &headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&url), &headers).call(),
            HttpMethod::Post => send(with_headers(self.agent.post(&url), &headers), body),
            HttpMethod::Put => send(with_headers(self.agent.put(&url), &headers), body),
        };
        let mut response = result.map_err(|err| {
            tracing::warn!(method = method.as_str(), %url, error = %err, "request failed");
            ApiError::Transport(err.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_RESPONSE_BYTES)
            .read_to_string()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        tracing::debug!(status, %url, "response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    headers
        .iter()
        .fold(builder, |builder, (name, value)| {
            builder.header(name.as_str(), value.as_str())
        })
}

fn send(
    builder: RequestBuilder<WithBody>,
    body: Option<Vec<u8>>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.send(&bytes[..]),
        None => builder.send_empty(),
    }
}
