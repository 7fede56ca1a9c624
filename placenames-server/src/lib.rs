//! HTTP autosuggest server over the place-name prefix index.

pub mod api;
pub mod regen;

pub use api::create_router;
pub use api::handlers::AppState;
