//! Authentication module
//!
//! JWT issuing and validation plus the request extractor:
//! - [`JwtService`] - token service (HS256, iss/aud checked)
//! - [`CurrentUser`] - caller context injected into handlers

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
