//! Stateless HTTP request builder and response parser for the PetFriends API.
//!
//! # Design
//! `PetFriendsApi` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round-trip.
//!
//! Client-side preconditions (a present auth token, a readable photo) are
//! checked inside `build_*`, so a failing precondition means no request value
//! ever exists to be sent.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::photo::PhotoUpload;
use crate::response::ApiResponse;
use crate::types::{AuthKey, Credentials, Pet, PetFilter, PetInfo, PetList};

pub const DEFAULT_BASE_URL: &str = "https://petfriends.skillfactory.ru";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Synchronous, stateless client for the PetFriends API.
#[derive(Debug, Clone)]
pub struct PetFriendsApi {
    base_url: String,
}

impl Default for PetFriendsApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl PetFriendsApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_get_api_key(&self, credentials: &Credentials) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/api/key", self.base_url),
            headers: vec![
                ("email".to_string(), credentials.email.clone()),
                ("password".to_string(), credentials.password.clone()),
            ],
            body: None,
        }
    }

    pub fn build_get_list_of_pets(
        &self,
        auth: &AuthKey,
        filter: &PetFilter,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: format!(
                "{}/api/pets?filter={}",
                self.base_url,
                urlencoding::encode(filter.as_str())
            ),
            headers: vec![auth_header(auth)?],
            body: None,
        })
    }

    pub fn build_add_new_pet(
        &self,
        auth: &AuthKey,
        pet: &PetInfo,
        photo: &PhotoUpload,
    ) -> Result<HttpRequest, ApiError> {
        let auth = auth_header(auth)?;
        let form = pet
            .form_fields()
            .into_iter()
            .fold(MultipartForm::new(), |form, (name, value)| form.text(name, value))
            .file("pet_photo", photo);
        Ok(self.multipart_request("/api/pets".to_string(), auth, form))
    }

    pub fn build_add_new_pet_without_photo(
        &self,
        auth: &AuthKey,
        pet: &PetInfo,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/api/create_pet_simple", self.base_url),
            headers: vec![
                auth_header(auth)?,
                ("content-type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ],
            body: Some(encode_form(&pet.form_fields()).into_bytes()),
        })
    }

    pub fn build_add_photo_of_pet(
        &self,
        auth: &AuthKey,
        pet_id: &str,
        photo: &PhotoUpload,
    ) -> Result<HttpRequest, ApiError> {
        let auth = auth_header(auth)?;
        let form = MultipartForm::new().file("pet_photo", photo);
        let path = format!("/api/pets/set_photo/{}", urlencoding::encode(pet_id));
        Ok(self.multipart_request(path, auth, form))
    }

    pub fn build_update_pet_info(
        &self,
        auth: &AuthKey,
        pet_id: &str,
        pet: &PetInfo,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: self.pet_url(pet_id),
            headers: vec![
                auth_header(auth)?,
                ("content-type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ],
            body: Some(encode_form(&pet.form_fields()).into_bytes()),
        })
    }

    pub fn build_delete_pet(&self, auth: &AuthKey, pet_id: &str) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            url: self.pet_url(pet_id),
            headers: vec![auth_header(auth)?],
            body: None,
        })
    }

    pub fn parse_get_api_key(
        &self,
        response: HttpResponse,
    ) -> Result<ApiResponse<AuthKey>, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_list_of_pets(
        &self,
        response: HttpResponse,
    ) -> Result<ApiResponse<PetList>, ApiError> {
        parse_json(response)
    }

    /// Parses the pet record returned by every create, update and photo call.
    pub fn parse_pet(&self, response: HttpResponse) -> Result<ApiResponse<Pet>, ApiError> {
        parse_json(response)
    }

    /// The service answers a successful delete with an empty body, so any 200
    /// counts as success regardless of content.
    pub fn parse_delete_pet(&self, response: HttpResponse) -> ApiResponse<()> {
        if response.status == 200 {
            ApiResponse::parsed(response.status, ())
        } else {
            ApiResponse::raw(response.status, response.body)
        }
    }

    fn pet_url(&self, pet_id: &str) -> String {
        format!("{}/api/pets/{}", self.base_url, urlencoding::encode(pet_id))
    }

    fn multipart_request(
        &self,
        path: String,
        auth: (String, String),
        form: MultipartForm,
    ) -> HttpRequest {
        let (content_type, body) = form.finish();
        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{path}", self.base_url),
            headers: vec![auth, ("content-type".to_string(), content_type)],
            body: Some(body),
        }
    }
}

fn auth_header(auth: &AuthKey) -> Result<(String, String), ApiError> {
    Ok(("auth_key".to_string(), auth.key()?.to_string()))
}

fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Decode a 200 body as `T`; keep any other body as raw text.
fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<ApiResponse<T>, ApiError> {
    if response.status != 200 {
        return Ok(ApiResponse::raw(response.status, response.body));
    }
    let value = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;
    Ok(ApiResponse::parsed(response.status, value))
}
