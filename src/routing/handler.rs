//! Handler entries.
//!
//! A route chain is a sequence of [`HandlerEntry`] values. Middleware entries
//! run unconditionally; verb-bound entries run only when the request method
//! matches their [`Verb`].

use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::dispatch::Context;

/// A shared request callable.
///
/// Handlers are `Arc`'d because one middleware may be spliced into many routes.
pub type Handler = Arc<dyn Fn(&mut Context) + Send + Sync + 'static>;

/// Wraps a closure into a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// The method binding of a verb-bound entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    /// Matches every request method (`"*"`).
    Any,
    /// Matches exactly one request method.
    Exact(Method),
}

impl Verb {
    /// Parse a verb token. `"*"` means any method.
    pub fn parse(token: &str) -> Option<Self> {
        if token == "*" {
            return Some(Verb::Any);
        }
        if token.is_empty() {
            return None;
        }
        Method::from_bytes(token.as_bytes()).ok().map(Verb::Exact)
    }

    /// Returns true if a request with `method` satisfies this verb.
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            Verb::Any => true,
            Verb::Exact(expected) => expected == method,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verb::Any => f.write_str("*"),
            Verb::Exact(method) => f.write_str(method.as_str()),
        }
    }
}

/// One unit of a route chain.
#[derive(Clone)]
pub enum HandlerEntry {
    /// Middleware: always runs.
    Unconditional(Handler),
    /// Route handler: runs only when the verb matches.
    BoundToVerb(Verb, Handler),
}

impl HandlerEntry {
    /// The handler to run for `method`, if this entry is eligible.
    pub fn eligible(&self, method: &Method) -> Option<&Handler> {
        match self {
            HandlerEntry::Unconditional(h) => Some(h),
            HandlerEntry::BoundToVerb(verb, h) if verb.matches(method) => Some(h),
            HandlerEntry::BoundToVerb(..) => None,
        }
    }

    /// Returns true if this is a verb-bound entry matching `method`.
    ///
    /// Only these entries resolve a request; middleware alone never does.
    pub fn resolves(&self, method: &Method) -> bool {
        matches!(self, HandlerEntry::BoundToVerb(verb, _) if verb.matches(method))
    }
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerEntry::Unconditional(_) => f.write_str("Unconditional"),
            HandlerEntry::BoundToVerb(verb, _) => write!(f, "BoundToVerb({verb})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Handler {
        handler(|_ctx| {})
    }

    #[test]
    fn test_verb_parse() {
        assert_eq!(Verb::parse("*"), Some(Verb::Any));
        assert_eq!(Verb::parse("GET"), Some(Verb::Exact(Method::GET)));
        assert_eq!(
            Verb::parse("PURGE"),
            Some(Verb::Exact(Method::from_bytes(b"PURGE").unwrap()))
        );
        assert_eq!(Verb::parse(""), None);
        assert_eq!(Verb::parse("BAD VERB"), None);
    }

    #[test]
    fn test_verb_matches() {
        assert!(Verb::Any.matches(&Method::DELETE));
        assert!(Verb::Exact(Method::GET).matches(&Method::GET));
        assert!(!Verb::Exact(Method::GET).matches(&Method::HEAD));
    }

    #[test]
    fn test_entry_eligibility() {
        let mw = HandlerEntry::Unconditional(noop());
        let get = HandlerEntry::BoundToVerb(Verb::Exact(Method::GET), noop());
        let any = HandlerEntry::BoundToVerb(Verb::Any, noop());

        assert!(mw.eligible(&Method::POST).is_some());
        assert!(!mw.resolves(&Method::POST));

        assert!(get.eligible(&Method::GET).is_some());
        assert!(get.eligible(&Method::POST).is_none());
        assert!(get.resolves(&Method::GET));

        assert!(any.resolves(&Method::PATCH));
    }
}
