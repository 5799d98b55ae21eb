//! Login, token refresh and bearer-token authentication.

pub mod ports;
pub mod service;
