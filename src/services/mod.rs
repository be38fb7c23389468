//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence concerns so route
//! handlers can stay focused on request parsing, auth plumbing, and status
//! mapping.

pub mod auth;
pub mod checklist;
pub mod journal;
pub mod oauth;
pub mod profile;
pub mod session;

#[cfg(all(test, feature = "live-db-tests"))]
pub(crate) mod test_db;
