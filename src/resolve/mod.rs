//! Turning the raw tokens a parser hands over into [`Value`](crate::value::Value)s.
//!
//! Variable lookup itself belongs to the host template engine and is reached
//! through the [`Resolver`] callback.

pub mod context;
pub mod token_resolver;

pub use context::{EmptyContext, FnResolver, Resolver};
pub use token_resolver::{RawValue, TokenResolver};
