//! Post board library.
//!
//! Lists the first page of a remote JSON post collection and lets a user
//! create, edit and delete posts. Each mutation is one remote call, and the
//! rendered list is patched in place once that call succeeds.
//!
//! - [`client`]: the remote collection (`PostsApi`, `PostsClient`)
//! - [`view`]: the rendered list (`ViewState`) and its control wiring
//! - [`controller`]: user actions, the editing area and notices
//! - [`web`]: the HTML surface served with axum

pub mod client;
pub mod components;
pub mod config;
pub mod controller;
pub mod model;
pub mod view;
pub mod web;
