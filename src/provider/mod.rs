//! Concrete model gateway backed by rig-core.
//!
//! [`Provider`] wraps one rig-core client per [`ProviderKind`] and implements
//! [`ModelGateway`](crate::gateway::ModelGateway) with a single completion
//! request per call. The orchestration loop owns tool execution; rig is only
//! asked for the next assistant message.

mod client;
mod convert;
mod kind;
mod resolve;

pub use client::Provider;
pub use kind::ProviderKind;
pub use resolve::{resolve_model, ModelSelection};
