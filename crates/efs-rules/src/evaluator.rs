//! Entry point used by the HTTP boundary.

use std::collections::HashSet;
use std::sync::Arc;

use efs_common::TopLevelCategory;
use tracing::debug;

use crate::auth_rules::{
    AllowListBypass, FormAuthRequirement, RequestClassifier, UserAuthorizationCheck,
    ALLOW_LIST_CATEGORIES,
};
use crate::chain::AuthorizationChain;
use crate::context::{RequestInput, RequestResourceCache};
use crate::lookup::Collaborators;

/// Decides whether a request must be redirected for company authorization.
///
/// Holds only collaborators and settings; every call builds a fresh cache and
/// chain, so one evaluator can be shared by all requests.
#[derive(Debug, Clone)]
pub struct CompanyAuthEvaluator {
    collaborators: Collaborators,
    allow_list_categories: HashSet<TopLevelCategory>,
}

impl CompanyAuthEvaluator {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            allow_list_categories: ALLOW_LIST_CATEGORIES.iter().copied().collect(),
        }
    }

    /// Replace the set of allow-list-eligible top-level categories.
    pub fn with_allow_list_categories(
        mut self,
        categories: impl IntoIterator<Item = TopLevelCategory>,
    ) -> Self {
        self.allow_list_categories = categories.into_iter().collect();
        self
    }

    pub fn allow_list_categories(&self) -> &HashSet<TopLevelCategory> {
        &self.allow_list_categories
    }

    /// `RequestClassifier -> FormAuthRequirement -> UserAuthorizationCheck`
    pub fn build_chain<'c>(&self, cache: &'c RequestResourceCache) -> AuthorizationChain<'c> {
        let bypass = AllowListBypass::new(
            self.collaborators.allow_list.clone(),
            self.collaborators.categories.clone(),
            self.allow_list_categories.iter().copied(),
        );

        let mut chain = AuthorizationChain::new(cache);
        chain
            .append(RequestClassifier)
            .append(FormAuthRequirement)
            .append(UserAuthorizationCheck::new(bypass));
        chain
    }

    /// True when the user must authorize for the URL's company before
    /// continuing.
    pub async fn requires_redirect(&self, request: Arc<RequestInput>) -> bool {
        let mut cache = RequestResourceCache::new(&self.collaborators);
        cache.set_input(request);

        let decision = self.build_chain(&cache).evaluate().await;

        let stats = cache.lookup_stats();
        debug!(
            path = %cache.input().map(|input| input.path.as_str()).unwrap_or_default(),
            company_number = cache.get_company_number().unwrap_or_default(),
            requires_redirect = decision,
            submission_lookups = stats.submission_lookups,
            form_lookups = stats.form_lookups,
            sign_in_lookups = stats.sign_in_lookups,
            "Company authorization evaluated"
        );

        decision
    }
}
