//! Collaborator interfaces consumed by the evaluator.
//!
//! Concrete implementations live at the boundary (REST backend, session
//! store); the evaluator only sees these traits.

use std::sync::Arc;

use async_trait::async_trait;
use efs_common::{FormTemplate, LookupResult, SignInInfo, Submission, TopLevelCategory};

use crate::context::RequestInput;

/// Fetches a submission by the ID taken from the request URL.
#[async_trait]
pub trait SubmissionLookup: Send + Sync {
    async fn get_submission(&self, submission_id: &str) -> LookupResult<Submission>;
}

/// Fetches a form template by form type code.
#[async_trait]
pub trait FormTemplateLookup: Send + Sync {
    async fn get_form_template(&self, form_type: &str) -> LookupResult<FormTemplate>;
}

/// Remote email allow-list for allow-list-eligible categories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AllowListLookup: Send + Sync {
    async fn is_on_allow_list(&self, email: &str) -> LookupResult<bool>;
}

/// Resolves a category code to the root of its category hierarchy.
///
/// Infallible by contract: implementations that cannot resolve a code should
/// answer [`TopLevelCategory::Other`], which is never allow-list eligible.
#[async_trait]
pub trait CategoryHierarchyLookup: Send + Sync {
    async fn top_level_category(&self, category_code: &str) -> TopLevelCategory;
}

/// Reads the sign-in info from the session attached to a request.
#[async_trait]
pub trait SessionAccessor: Send + Sync {
    async fn sign_in_info(&self, request: &RequestInput) -> Option<SignInInfo>;
}

/// The full set of collaborators the evaluator needs.
#[derive(Clone)]
pub struct Collaborators {
    pub submissions: Arc<dyn SubmissionLookup>,
    pub forms: Arc<dyn FormTemplateLookup>,
    pub sessions: Arc<dyn SessionAccessor>,
    pub allow_list: Arc<dyn AllowListLookup>,
    pub categories: Arc<dyn CategoryHierarchyLookup>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
