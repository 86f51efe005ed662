//! `nodes` crate — the host-runtime contract a node is written against.
//!
//! Every node implements [`ExecutableNode`]. It reads its configuration
//! through a [`ParameterSource`] and reaches the network through an
//! [`HttpRequester`], both supplied by the host via [`ExecutionContext`].

pub mod error;
pub mod execution;
pub mod http;
pub mod mock;
pub mod params;
pub mod traits;

pub use error::{FieldMissing, HttpError, NodeError};
pub use execution::{construct_execution_meta_data, return_json_array, ExecutionItem, PairedItem};
pub use http::{HttpMethod, HttpRequest};
pub use params::JsonParameters;
pub use traits::{ExecutableNode, ExecutionContext, HttpRequester, ParameterSource};
