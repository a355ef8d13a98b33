//! Chat session state.

mod store;

pub use store::SessionStore;
