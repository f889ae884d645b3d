//! REST surface for the ad engine: the unauthenticated visitor endpoints
//! (match, impression, click) and the operator-facing admin API. The two
//! surfaces live behind separate routers so visitor write load never shares
//! handler state with the admin paths.

pub mod admin;
pub mod auth;
pub mod public;
pub mod server;

pub use server::ApiServer;
