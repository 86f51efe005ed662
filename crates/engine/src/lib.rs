//! `engine` crate — request building and the json2video node itself.
//!
//! Parameters are resolved into typed configs ([`params`]), validated
//! ([`validation`]), turned into elements ([`elements`], [`shared`]) and
//! assembled into a request document by an operation builder ([`builders`]).
//! [`executor::Json2VideoNode`] drives this per input item and sends the
//! result to the API.

pub mod builders;
pub mod credentials;
pub mod elements;
pub mod error;
pub mod executor;
pub mod fields;
pub mod models;
pub mod params;
pub mod request;
pub mod shared;
pub mod validation;

pub use credentials::{Json2VideoCredentials, CREDENTIALS_NAME};
pub use elements::{Element, ElementKind};
pub use error::{ElementError, EngineError, ValidationGroup};
pub use executor::{Json2VideoNode, NodeConfig};
pub use models::{Operation, RequestBody, RequestDocument, Scene, Transition};
pub use request::{build_request_body, is_advanced_mode};

#[cfg(test)]
mod builder_tests;
