//! Synchronous API client core for the PetFriends pet-management service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip.
//!
//! # Design
//! - `PetFriendsApi` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Every parse yields an `ApiResponse`: the HTTP status plus either the
//!   decoded body (200) or the raw text (anything else).
//! - Missing credentials and missing photo files are typed errors raised
//!   before a request exists.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
mod multipart;
pub mod photo;
pub mod response;
pub mod types;

pub use client::{PetFriendsApi, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use photo::PhotoUpload;
pub use response::{ApiResponse, ResponseBody};
pub use types::{AuthKey, Credentials, Pet, PetFilter, PetInfo, PetList};
