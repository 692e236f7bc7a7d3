//! Company-authorization requirement evaluator.
//!
//! Decides, per inbound request, whether the user has to be sent to the
//! identity provider to authorize for a company before continuing a filing.
//! The decision is a short-circuiting chain of async specifications over a
//! request-scoped resource cache:
//!
//! ```ignore
//! use efs_rules::prelude::*;
//!
//! let evaluator = CompanyAuthEvaluator::new(collaborators);
//! if evaluator.requires_redirect(Arc::new(RequestInput::from_parts(&parts))).await {
//!     // send the user to the authorise endpoint
//! }
//! ```
//!
//! The chain is `RequestClassifier -> FormAuthRequirement -> UserAuthorizationCheck`;
//! later links only run (and only hit the backend) when earlier ones pass.

pub mod auth_rules;
pub mod chain;
pub mod context;
pub mod evaluator;
pub mod lookup;
pub mod operators;
pub mod specification;

#[cfg(test)]
mod test_utils;

/// Prelude module - import everything you need with `use efs_rules::prelude::*`
pub mod prelude {
    pub use crate::auth_rules::{
        scope_grants_company, AllowListBypass, CompanyScopeGrant, FormAuthRequirement,
        RequestClassifier, UserAuthorizationCheck, ALLOW_LIST_CATEGORIES,
    };
    pub use crate::chain::AuthorizationChain;
    pub use crate::context::{match_company_path, LookupStats, RequestInput, RequestResourceCache};
    pub use crate::evaluator::CompanyAuthEvaluator;
    pub use crate::lookup::{
        AllowListLookup, CategoryHierarchyLookup, Collaborators, FormTemplateLookup,
        SessionAccessor, SubmissionLookup,
    };
    pub use crate::operators::Spec;
    pub use crate::specification::{AlwaysFalse, AlwaysTrue, And, BoxedSpec, Not, Or, Specification};
}
