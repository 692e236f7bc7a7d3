//! Company-authorization rules.
//!
//! Each rule is a [`Specification`] over the per-request
//! [`RequestResourceCache`]. Together they answer "must this request be sent
//! to the identity provider for company authorization first?".

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use efs_common::TopLevelCategory;
use http::Method;
use regex::Regex;
use tracing::{debug, warn};

use crate::context::{match_company_path, RequestResourceCache};
use crate::lookup::{AllowListLookup, CategoryHierarchyLookup};
use crate::operators::Spec;
use crate::specification::{Not, Or, Specification};

/// Categories whose forms can be unlocked by the email allow-list.
pub const ALLOW_LIST_CATEGORIES: &[TopLevelCategory] = &[TopLevelCategory::Insolvency];

/// A scope token ending in `/company/<number>`.
static COMPANY_SCOPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^.*/company/(?P<company_number>[^/]+)$")
        .expect("company scope pattern is valid")
});

/// Does the space-delimited `scope` grant access to `company_number`?
///
/// Only tokens that end exactly in `/company/<number>` count; the number is
/// compared case-insensitively.
pub fn scope_grants_company(scope: &str, company_number: &str) -> bool {
    scope
        .split_whitespace()
        .filter_map(|token| COMPANY_SCOPE.captures(token))
        .filter_map(|caps| caps.name("company_number"))
        .any(|granted| granted.as_str().eq_ignore_ascii_case(company_number))
}

// =============================================================================
// Request shape
// =============================================================================

/// A GET to a submission+company URL.
///
/// Anything else is either an API call the backend handles directly or a page
/// that is not company scoped, so it can never need company authorization.
pub struct RequestClassifier;

#[async_trait]
impl Specification<RequestResourceCache> for RequestClassifier {
    async fn is_satisfied_by(&self, cache: &RequestResourceCache) -> bool {
        let Some(input) = cache.input() else {
            return false;
        };
        input.method == Method::GET && match_company_path(&input.path).is_some()
    }

    fn name(&self) -> &'static str {
        "RequestClassifier"
    }
}

// =============================================================================
// Form
// =============================================================================

/// The submission's form template requires authentication.
///
/// No form yet means the user has not reached form selection, so there is
/// nothing to protect.
pub struct FormAuthRequirement;

#[async_trait]
impl Specification<RequestResourceCache> for FormAuthRequirement {
    async fn is_satisfied_by(&self, cache: &RequestResourceCache) -> bool {
        cache
            .get_form()
            .await
            .map(|form| form.authentication_required)
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "FormAuthRequirement"
    }
}

// =============================================================================
// User
// =============================================================================

/// The form belongs to an allow-list-eligible category and the signed-in
/// user's email is on the allow-list.
///
/// The allow-list is only queried once the category is known to be eligible
/// and an email is available.
pub struct AllowListBypass {
    allow_list: Arc<dyn AllowListLookup>,
    categories: Arc<dyn CategoryHierarchyLookup>,
    eligible: HashSet<TopLevelCategory>,
}

impl AllowListBypass {
    pub fn new(
        allow_list: Arc<dyn AllowListLookup>,
        categories: Arc<dyn CategoryHierarchyLookup>,
        eligible: impl IntoIterator<Item = TopLevelCategory>,
    ) -> Self {
        Self {
            allow_list,
            categories,
            eligible: eligible.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Specification<RequestResourceCache> for AllowListBypass {
    async fn is_satisfied_by(&self, cache: &RequestResourceCache) -> bool {
        let Some(form) = cache.get_form().await else {
            return false;
        };

        let category = self.categories.top_level_category(&form.category).await;
        if !self.eligible.contains(&category) {
            debug!(category = %category, form_type = %form.form_type, "Category not allow-list eligible");
            return false;
        }

        let Some(email) = cache.get_sign_in_info().await.and_then(|info| info.email()) else {
            return false;
        };

        match self.allow_list.is_on_allow_list(email).await {
            Ok(allowed) => allowed,
            Err(e) => {
                warn!(code = e.error_code(), error = %e, "Allow-list lookup failed");
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "AllowListBypass"
    }
}

/// The signed-in user's scope carries a grant for the URL's company.
pub struct CompanyScopeGrant;

#[async_trait]
impl Specification<RequestResourceCache> for CompanyScopeGrant {
    async fn is_satisfied_by(&self, cache: &RequestResourceCache) -> bool {
        let Some(company_number) = cache.get_company_number() else {
            return false;
        };
        let Some(scope) = cache.get_sign_in_info().await.and_then(|info| info.scope()) else {
            return false;
        };
        scope_grants_company(scope, company_number)
    }

    fn name(&self) -> &'static str {
        "CompanyScopeGrant"
    }
}

/// The user is not yet authorized for the company: neither the allow-list
/// bypass nor a company scope grant applies.
pub struct UserAuthorizationCheck {
    rule: Spec<Not<Or<AllowListBypass, CompanyScopeGrant>>>,
}

impl UserAuthorizationCheck {
    pub fn new(allow_list_bypass: AllowListBypass) -> Self {
        Self {
            rule: !(Spec(allow_list_bypass) | Spec(CompanyScopeGrant)),
        }
    }
}

#[async_trait]
impl Specification<RequestResourceCache> for UserAuthorizationCheck {
    async fn is_satisfied_by(&self, cache: &RequestResourceCache) -> bool {
        self.rule.is_satisfied_by(cache).await
    }

    fn name(&self) -> &'static str {
        "UserAuthorizationCheck"
    }
}
