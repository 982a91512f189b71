//! Blocking PetFriends API client.
//!
//! Wraps `petfriends-core` with a `ureq` agent and layered configuration.
//! Every call returns the HTTP status with either the decoded body or the raw
//! error text; `Err` is reserved for client-side precondition failures and
//! transport failures.

pub mod client;
pub mod config;

pub use client::PetFriends;
pub use config::{ConfigError, Settings};
pub use petfriends_core::{
    ApiError, ApiResponse, AuthKey, Credentials, Pet, PetFilter, PetInfo, PetList, ResponseBody,
};
