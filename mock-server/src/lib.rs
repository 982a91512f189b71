use std::{
    collections::HashMap,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

mod error;

pub use error::ServiceError;

/// Upper bound on a request body. Photos are stored whole, so this caps a
/// single upload.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    pub pet_photo: String,
    pub user_id: String,
    pub created_at: String,
}

#[derive(Serialize, Deserialize)]
pub struct KeyResponse {
    pub key: String,
}

#[derive(Serialize, Deserialize)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: String,
}

struct Account {
    email: String,
    password: String,
    user_id: String,
    auth_key: String,
}

#[derive(Default)]
struct Store {
    accounts: Vec<Account>,
    /// Newest first.
    pets: Vec<Pet>,
}

impl Store {
    fn user_for_key(&self, key: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.auth_key == key)
    }

    fn owned_pet_mut(&mut self, user_id: &str, pet_id: &str) -> Option<&mut Pet> {
        self.pets
            .iter_mut()
            .find(|pet| pet.id == pet_id && pet.user_id == user_id)
    }
}

/// Shared in-memory state: registered accounts and every pet they own.
#[derive(Clone, Default)]
pub struct AppState {
    store: Arc<RwLock<Store>>,
}

impl AppState {
    /// State with one account per `(email, password)` pair. Each account gets
    /// a fixed auth key for its lifetime.
    pub fn with_accounts<I, E, P>(accounts: I) -> Self
    where
        I: IntoIterator<Item = (E, P)>,
        E: Into<String>,
        P: Into<String>,
    {
        let accounts = accounts
            .into_iter()
            .map(|(email, password)| Account {
                email: email.into(),
                password: password.into(),
                user_id: Uuid::new_v4().simple().to_string(),
                auth_key: format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple()),
            })
            .collect();
        Self {
            store: Arc::new(RwLock::new(Store {
                accounts,
                pets: Vec::new(),
            })),
        }
    }

    pub async fn pet_count(&self) -> usize {
        self.store.read().await.pets.len()
    }

    async fn authenticate(&self, headers: &HeaderMap) -> Result<String, ServiceError> {
        let key = header(headers, "auth_key").ok_or(ServiceError::MissingAuthKey)?;
        let store = self.store.read().await;
        store
            .user_for_key(key)
            .map(|account| account.user_id.clone())
            .ok_or(ServiceError::InvalidAuthKey)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/key", get(get_api_key).post(get_api_key))
        .route("/api/pets", get(list_pets).post(create_pet))
        .route("/api/create_pet_simple", post(create_pet_simple))
        .route("/api/pets/set_photo/{pet_id}", post(set_photo))
        .route("/api/pets/{pet_id}", put(update_pet).delete(delete_pet))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, router(state)).await
}

async fn get_api_key(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<KeyResponse>, ServiceError> {
    let email = header(&headers, "email").unwrap_or_default();
    let password = header(&headers, "password").unwrap_or_default();
    let store = state.store.read().await;
    let account = store
        .accounts
        .iter()
        .find(|account| account.email == email && account.password == password)
        .ok_or(ServiceError::UnknownUser)?;
    tracing::info!(email = %email, "auth key issued");
    Ok(Json(KeyResponse {
        key: account.auth_key.clone(),
    }))
}

async fn list_pets(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<PetList>, ServiceError> {
    let user_id = state.authenticate(&headers).await?;
    let store = state.store.read().await;
    let pets = match query.filter.as_str() {
        "" => store.pets.clone(),
        "my_pets" => store
            .pets
            .iter()
            .filter(|pet| pet.user_id == user_id)
            .cloned()
            .collect(),
        other => return Err(ServiceError::BadFilter(other.to_string())),
    };
    Ok(Json(PetList { pets }))
}

async fn create_pet(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Pet>, ServiceError> {
    let user_id = state.authenticate(&headers).await?;
    let mut upload = read_upload(multipart).await?;
    let fields = PetFields::required(&mut upload.fields)?;
    let photo = upload
        .photo
        .ok_or_else(|| ServiceError::BadRequest("pet_photo is required".to_string()))?;
    let pet = insert_pet(&state, user_id, fields, photo.data_url()).await;
    Ok(Json(pet))
}

async fn create_pet_simple(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(mut form): Form<HashMap<String, String>>,
) -> Result<Json<Pet>, ServiceError> {
    let user_id = state.authenticate(&headers).await?;
    let fields = PetFields::required(&mut form)?;
    let pet = insert_pet(&state, user_id, fields, String::new()).await;
    Ok(Json(pet))
}

async fn set_photo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(pet_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Pet>, ServiceError> {
    let user_id = state.authenticate(&headers).await?;
    let upload = read_upload(multipart).await?;
    let photo = upload
        .photo
        .ok_or_else(|| ServiceError::BadRequest("pet_photo is required".to_string()))?;
    let mut store = state.store.write().await;
    let pet = store
        .owned_pet_mut(&user_id, &pet_id)
        .ok_or(ServiceError::PetNotFound)?;
    pet.pet_photo = photo.data_url();
    tracing::info!(pet_id = %pet_id, "pet photo set");
    Ok(Json(pet.clone()))
}

async fn update_pet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(pet_id): Path<String>,
    Form(mut form): Form<HashMap<String, String>>,
) -> Result<Json<Pet>, ServiceError> {
    let user_id = state.authenticate(&headers).await?;
    let age = form.remove("age").map(validate_age).transpose()?;
    let mut store = state.store.write().await;
    let pet = store
        .owned_pet_mut(&user_id, &pet_id)
        .ok_or(ServiceError::PetNotFound)?;
    if let Some(name) = form.remove("name") {
        pet.name = name;
    }
    if let Some(animal_type) = form.remove("animal_type") {
        pet.animal_type = animal_type;
    }
    if let Some(age) = age {
        pet.age = age;
    }
    tracing::info!(pet_id = %pet_id, "pet updated");
    Ok(Json(pet.clone()))
}

async fn delete_pet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(pet_id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let user_id = state.authenticate(&headers).await?;
    let mut store = state.store.write().await;
    let index = store
        .pets
        .iter()
        .position(|pet| pet.id == pet_id && pet.user_id == user_id)
        .ok_or(ServiceError::PetNotFound)?;
    store.pets.remove(index);
    tracing::info!(pet_id = %pet_id, "pet deleted");
    Ok(StatusCode::OK)
}

struct PetFields {
    name: String,
    animal_type: String,
    age: String,
}

impl PetFields {
    fn required(form: &mut HashMap<String, String>) -> Result<Self, ServiceError> {
        let mut take = |name: &str| {
            form.remove(name)
                .ok_or_else(|| ServiceError::BadRequest(format!("{name} is required")))
        };
        let name = take("name")?;
        let animal_type = take("animal_type")?;
        let age = validate_age(take("age")?)?;
        Ok(Self {
            name,
            animal_type,
            age,
        })
    }
}

fn validate_age(age: String) -> Result<String, ServiceError> {
    age.trim()
        .parse::<u32>()
        .map(|age| age.to_string())
        .map_err(|_| {
            ServiceError::BadRequest(format!("age must be a non-negative integer, got '{age}'"))
        })
}

struct Photo {
    content_type: String,
    bytes: Vec<u8>,
}

impl Photo {
    fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

#[derive(Default)]
struct Upload {
    fields: HashMap<String, String>,
    photo: Option<Photo>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ServiceError> {
    let mut upload = Upload::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "pet_photo" {
            let content_type = field.content_type().unwrap_or_default().to_string();
            if content_type != "image/jpeg" && content_type != "image/png" {
                return Err(ServiceError::BadRequest(format!(
                    "pet_photo must be a JPEG or PNG image, got '{content_type}'"
                )));
            }
            let bytes = field.bytes().await?.to_vec();
            upload.photo = Some(Photo {
                content_type,
                bytes,
            });
        } else {
            let value = field.text().await?;
            upload.fields.insert(name, value);
        }
    }
    Ok(upload)
}

async fn insert_pet(
    state: &AppState,
    user_id: String,
    fields: PetFields,
    pet_photo: String,
) -> Pet {
    let pet = Pet {
        id: Uuid::new_v4().simple().to_string(),
        name: fields.name,
        animal_type: fields.animal_type,
        age: fields.age,
        pet_photo,
        user_id,
        created_at: timestamp(),
    };
    state.store.write().await.pets.insert(0, pet.clone());
    tracing::info!(pet_id = %pet.id, name = %pet.name, "pet created");
    pet
}

fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{:.3}", now.as_secs_f64())
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
