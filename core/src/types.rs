//! Domain DTOs for the PetFriends API.
//!
//! # Design
//! These types mirror the service's JSON schema but are defined independently
//! from the mock-server crate. Integration tests catch any schema drift
//! between the two.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_string_from_number;

use crate::error::ApiError;

/// Account credentials exchanged for an auth key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Token issued by `POST /api/key`, sent as the `auth_key` header.
///
/// Deserializes straight from the key-issuance body (`{"key": "..."}`). A
/// body without `key` yields a missing token, and every authenticated
/// operation then fails with [`ApiError::MissingCredential`].
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,
}

impl AuthKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
        }
    }

    /// An auth key without a token.
    pub fn missing() -> Self {
        Self::default()
    }

    /// The token, or `MissingCredential` when absent or blank.
    pub fn key(&self) -> Result<&str, ApiError> {
        match self.key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ApiError::MissingCredential),
        }
    }

    pub fn is_present(&self) -> bool {
        self.key().is_ok()
    }
}

impl fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.is_present() { "<redacted>" } else { "<missing>" };
        f.debug_struct("AuthKey").field("key", &key).finish()
    }
}

/// A pet record as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    #[serde(deserialize_with = "deserialize_string_from_number")]
    pub age: String,
    /// `data:<mime>;base64,...` URL, empty when the pet has no photo.
    #[serde(default)]
    pub pet_photo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body of `GET /api/pets`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

impl PetList {
    pub fn contains_id(&self, id: &str) -> bool {
        self.pets.iter().any(|pet| pet.id == id)
    }

    pub fn find(&self, id: &str) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.id == id)
    }
}

/// Client-supplied pet attributes for create and update calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetInfo {
    pub name: String,
    pub animal_type: String,
    pub age: String,
}

impl PetInfo {
    pub fn new(
        name: impl Into<String>,
        animal_type: impl Into<String>,
        age: impl fmt::Display,
    ) -> Self {
        Self {
            name: name.into(),
            animal_type: animal_type.into(),
            age: age.to_string(),
        }
    }

    pub(crate) fn form_fields(&self) -> [(&'static str, &str); 3] {
        [
            ("name", self.name.as_str()),
            ("animal_type", self.animal_type.as_str()),
            ("age", self.age.as_str()),
        ]
    }
}

/// Value of the `filter` query parameter of `GET /api/pets`.
///
/// The client does not validate filters: `Other` is sent as-is and the
/// service answers it with a 500.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PetFilter {
    #[default]
    All,
    MyPets,
    Other(String),
}

impl PetFilter {
    pub fn as_str(&self) -> &str {
        match self {
            PetFilter::All => "",
            PetFilter::MyPets => "my_pets",
            PetFilter::Other(value) => value,
        }
    }
}

impl From<&str> for PetFilter {
    fn from(value: &str) -> Self {
        match value {
            "" => PetFilter::All,
            "my_pets" => PetFilter::MyPets,
            other => PetFilter::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PetFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
