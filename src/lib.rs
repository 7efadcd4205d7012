//! Client core for the research paper assistant.
//!
//! Everything outside the `native` feature compiles for `wasm32` and is shared
//! with the Leptos frontend. The `native` feature adds a reqwest client and an
//! in-memory development API.

pub mod api;
pub mod config;
pub mod errors;
pub mod group_form;
pub mod models;
pub mod session;
pub mod upload;

#[cfg(feature = "native")]
pub mod http;
#[cfg(feature = "native")]
pub mod server;

pub use api::{PaperUpload, ResearchApi, UploadFile};
pub use config::ClientConfig;
pub use errors::{ClientError, ValidationError};
pub use session::{Focus, LocalStore, Session, SessionState, StateStore};
