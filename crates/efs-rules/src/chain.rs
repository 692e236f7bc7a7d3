//! Short-circuiting chain of rules sharing one request cache.

use std::sync::Arc;

use tracing::debug;

use crate::context::RequestResourceCache;
use crate::specification::{BoxedSpec, Specification};

/// An ordered conjunction of rules evaluated against one
/// [`RequestResourceCache`].
///
/// Links run in the order they were appended. The first link that is not
/// satisfied ends the evaluation, so later links (and the lookups they would
/// trigger) never run. An empty chain is satisfied.
pub struct AuthorizationChain<'c> {
    cache: &'c RequestResourceCache,
    links: Vec<BoxedSpec<RequestResourceCache>>,
}

impl<'c> AuthorizationChain<'c> {
    pub fn new(cache: &'c RequestResourceCache) -> Self {
        Self {
            cache,
            links: Vec::new(),
        }
    }

    /// Add a link at the tail of the chain.
    pub fn append<S>(&mut self, link: S) -> &mut Self
    where
        S: Specification<RequestResourceCache> + 'static,
    {
        self.links.push(Arc::new(link));
        self
    }

    /// Add an already boxed link at the tail of the chain.
    pub fn append_boxed(&mut self, link: BoxedSpec<RequestResourceCache>) -> &mut Self {
        self.links.push(link);
        self
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Link names in evaluation order.
    pub fn link_names(&self) -> Vec<&'static str> {
        self.links.iter().map(|link| link.name()).collect()
    }

    /// Evaluate every link in order, stopping at the first that fails.
    pub async fn evaluate(&self) -> bool {
        for link in &self.links {
            if !link.is_satisfied_by(self.cache).await {
                debug!(link = link.name(), "Authorization chain stopped");
                return false;
            }
        }
        true
    }
}
