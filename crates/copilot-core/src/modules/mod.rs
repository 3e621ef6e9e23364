//! Persistence modules.

pub mod credential_store;
