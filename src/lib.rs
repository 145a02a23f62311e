//! Lounge - feed tooling for the HR stories & lounge community.
//!
//! This crate provides the client-side pieces of the community site that carry
//! their own policy: a deduplicating, windowed image preload queue, the list
//! filter/sort rules, and HTML preview helpers for post cards.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing services and use cases.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "lounge";
