use crate::value::Value;
use std::collections::HashMap;

/// Render-context lookup supplied by the host template engine
pub trait Resolver {
    /// Value of the variable `token`, or `None` if it cannot be resolved
    fn resolve(&self, token: &str) -> Option<Value>;
}

impl Resolver for HashMap<String, Value> {
    fn resolve(&self, token: &str) -> Option<Value> {
        self.get(token).cloned()
    }
}

impl<R: Resolver + ?Sized> Resolver for &R {
    fn resolve(&self, token: &str) -> Option<Value> {
        (**self).resolve(token)
    }
}

/// A context with no variables
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyContext;

impl Resolver for EmptyContext {
    fn resolve(&self, _token: &str) -> Option<Value> {
        None
    }
}

/// Adapts a closure into a [`Resolver`]
pub struct FnResolver<F>(pub F);

impl<F> Resolver for FnResolver<F>
where
    F: Fn(&str) -> Option<Value>,
{
    fn resolve(&self, token: &str) -> Option<Value> {
        (self.0)(token)
    }
}
