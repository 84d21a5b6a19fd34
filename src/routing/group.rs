//! Path-prefix groups.

use crate::routing::router::{Registrar, Router};

/// A registration view that prepends a fixed prefix to every path.
///
/// Groups hold nothing but the accumulated prefix and a borrow of the root
/// router. The prefix is used verbatim: empty prefixes and doubled slashes
/// are passed through, well-formed paths are the caller's job.
///
/// ```rust
/// use static_router::{Registrar, Router};
///
/// let mut router = Router::new();
/// let mut api = router.group("/api");
/// api.use_middleware(|ctx| ctx.set_content_type("application/json"));
/// api.group("/v1").get("/users", |ctx| ctx.set_body("[]"));
/// assert_eq!(router.route_count(), 1);
/// ```
pub struct Group<'r> {
    prefix: String,
    router: &'r mut Router,
}

impl<'r> Group<'r> {
    pub(crate) fn new(prefix: String, router: &'r mut Router) -> Self {
        Self { prefix, router }
    }
}

impl Registrar for Group<'_> {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn router_mut(&mut self) -> &mut Router {
        self.router
    }
}
