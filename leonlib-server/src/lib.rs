//! # Leonlib Server
//!
//! Server-rendered book library built on axum:
//!
//! - **Pages**: landing page, author index, search results and book details
//!   rendered from templates
//! - **API**: catalog listing and counts, likes and like status as JSON
//! - **Sign-in**: Google or Auth0 authorization-code flow with the user id
//!   kept in a signed, PostgreSQL-backed session
//! - **Administration**: bulk catalog load from TOML plus cover images

pub mod auth;
pub mod handlers;
pub mod infra;
pub mod routes;
pub mod views;

pub use infra::app_state::AppState;
