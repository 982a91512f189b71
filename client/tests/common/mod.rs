//! Shared harness for the PetFriends suite.
//!
//! Each test builds its own `Harness`. Without a configured live target
//! (`PETFRIENDS_BASE_URL` plus credentials) the harness starts a fresh
//! service double on a random port, so tests never see each other's pets.
//! Pets a test needs come from `PetFixture`, which deletes them on drop.

#![allow(dead_code)]

use std::path::PathBuf;

use mock_server::AppState;
use petfriends_client::{AuthKey, Credentials, Pet, PetFriends, PetInfo, Settings};
use tracing_subscriber::EnvFilter;

const MOCK_EMAIL: &str = "tester@petfriends.local";
const MOCK_PASSWORD: &str = "correct-horse";

pub struct Harness {
    pub client: PetFriends,
    pub settings: Settings,
    service: Option<ServiceDouble>,
}

struct ServiceDouble {
    runtime: tokio::runtime::Runtime,
    state: AppState,
}

pub fn harness() -> Harness {
    let mut settings = Settings::load().expect("load settings");
    init_tracing(&settings.log_level);

    if let Some(url) = settings.live_target() {
        tracing::info!(url, "running against live service");
        return Harness {
            client: PetFriends::new(url),
            settings,
            service: None,
        };
    }

    if settings.valid_email.is_empty() || settings.valid_password.is_empty() {
        settings.valid_email = MOCK_EMAIL.to_string();
        settings.valid_password = MOCK_PASSWORD.to_string();
    }
    let state = AppState::with_accounts([(
        settings.valid_email.clone(),
        settings.valid_password.clone(),
    )]);

    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();
    let server_state = state.clone();
    runtime.spawn(async move {
        let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
        mock_server::run(listener, server_state).await
    });

    let base_url = format!("http://{addr}");
    settings.base_url = Some(base_url.clone());
    Harness {
        client: PetFriends::new(&base_url),
        settings,
        service: Some(ServiceDouble { runtime, state }),
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

impl Harness {
    pub fn credentials(&self) -> Credentials {
        self.settings.credentials()
    }

    /// Fresh auth key for the configured account.
    pub fn auth_key(&self) -> AuthKey {
        self.client
            .get_api_key(&self.credentials())
            .expect("request auth key")
            .into_parsed()
            .expect("valid credentials accepted")
    }

    /// Number of pets stored by the service double. `None` against a live
    /// service.
    pub fn stored_pet_count(&self) -> Option<usize> {
        self.service
            .as_ref()
            .map(|service| service.runtime.block_on(service.state.pet_count()))
    }
}

pub fn photo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("images")
        .join(name)
}

/// A path guaranteed not to exist, inside a temporary directory that lives as
/// long as the returned guard.
pub fn missing_photo(name: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    (dir, path)
}

/// An address nothing listens on: the port was bound, then released.
pub fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// A pet owned by the test account, deleted when the fixture drops.
pub struct PetFixture<'a> {
    client: &'a PetFriends,
    auth: AuthKey,
    pub pet: Pet,
}

impl<'a> PetFixture<'a> {
    pub fn create(client: &'a PetFriends, auth: &AuthKey, info: &PetInfo) -> Self {
        let pet = client
            .add_new_pet(auth, info, photo("cat1.jpg"))
            .expect("create fixture pet")
            .into_parsed()
            .expect("fixture pet accepted");
        Self::adopt(client, auth, pet)
    }

    /// Take ownership of a pet created elsewhere so it is cleaned up.
    pub fn adopt(client: &'a PetFriends, auth: &AuthKey, pet: Pet) -> Self {
        Self {
            client,
            auth: auth.clone(),
            pet,
        }
    }

    pub fn id(&self) -> &str {
        &self.pet.id
    }
}

impl Drop for PetFixture<'_> {
    fn drop(&mut self) {
        match self.client.delete_pet(&self.auth, &self.pet.id) {
            Ok(response) if response.is_success() => {
                tracing::debug!(pet_id = %self.pet.id, "fixture pet deleted");
            }
            Ok(response) => {
                tracing::debug!(
                    pet_id = %self.pet.id,
                    status = response.status,
                    "fixture pet already gone"
                );
            }
            Err(err) => {
                tracing::warn!(pet_id = %self.pet.id, error = %err, "fixture cleanup failed");
            }
        }
    }
}
