//! Domain types and rules for the Logicton site backend.
//!
//! Everything here is storage- and transport-agnostic except the small
//! filesystem helpers for uploads ([`upload::ImageStore`]) and the JSON
//! content directory ([`content::ContentDir`]).

pub mod contact;
pub mod content;
pub mod content_path;
pub mod error;
pub mod locale;
pub mod naming;
pub mod rate_limit;
pub mod roles;
pub mod service;
pub mod types;
pub mod upload;
