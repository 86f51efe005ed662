//! `api` crate — the outbound HTTP layer for the movie API.
//!
//! [`ReqwestRequester`] implements [`nodes::HttpRequester`] on top of a
//! shared `reqwest::Client`. Nodes never see reqwest types.

pub mod client;

pub use client::ReqwestRequester;
