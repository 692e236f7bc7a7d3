//! Test utilities for gateway tests.
//!
//! Provides configuration fixtures, mocked collaborators and an
//! [`AppState`] wired to them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use efs_common::{
    FormTemplate, LookupError, LookupResult, SignInInfo, Submission, SubmissionForm,
    TopLevelCategory, UserProfile,
};
use efs_rules::prelude::{
    AllowListLookup, CategoryHierarchyLookup, Collaborators, CompanyAuthEvaluator,
    FormTemplateLookup, RequestInput, SessionAccessor, SubmissionLookup,
};
use mockall::mock;

use crate::config::{
    create_http_client, create_redis_pool, AllowListConfig, BackendConfig, Config, OAuth2Config,
    ServerConfig, SessionConfig,
};
use crate::state::AppState;

pub const SUBMISSION_ID: &str = "abc123";
pub const COMPANY_NUMBER: &str = "12345678";

/// Nothing listens here; pool checkouts fail fast.
pub const UNREACHABLE_REDIS_URL: &str = "redis://127.0.0.1:1";

mock! {
    pub Submissions {}

    #[async_trait]
    impl SubmissionLookup for Submissions {
        async fn get_submission(&self, submission_id: &str) -> LookupResult<Submission>;
    }
}

mock! {
    pub Forms {}

    #[async_trait]
    impl FormTemplateLookup for Forms {
        async fn get_form_template(&self, form_type: &str) -> LookupResult<FormTemplate>;
    }
}

mock! {
    pub Sessions {}

    #[async_trait]
    impl SessionAccessor for Sessions {
        async fn sign_in_info(&self, request: &RequestInput) -> Option<SignInInfo>;
    }
}

mock! {
    pub AllowList {}

    #[async_trait]
    impl AllowListLookup for AllowList {
        async fn is_on_allow_list(&self, email: &str) -> LookupResult<bool>;
    }
}

mock! {
    pub Categories {}

    #[async_trait]
    impl CategoryHierarchyLookup for Categories {
        async fn top_level_category(&self, category_code: &str) -> TopLevelCategory;
    }
}

pub fn server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        rust_log: "efs_gateway=debug".to_string(),
    }
}

pub fn session_config() -> SessionConfig {
    SessionConfig {
        redis_url: UNREACHABLE_REDIS_URL.to_string(),
        cookie_name: "__SID".to_string(),
        key_prefix: "session:".to_string(),
        signin_attribute: "signin_info".to_string(),
    }
}

pub fn oauth2_config() -> OAuth2Config {
    OAuth2Config {
        authorise_uri: "https://account.example.test/oauth2/authorise".to_string(),
        client_id: "efs-web".to_string(),
        redirect_uri: "https://efs.example.test/oauth2/user/callback".to_string(),
        company_scope_base: "https://api.example.test".to_string(),
        state_secret: "test-state-secret".to_string(),
        state_expiry_secs: 600,
    }
}

pub fn test_config(upstream_url: &str) -> Config {
    Config {
        server: server_config(),
        backend: BackendConfig {
            api_url: "http://backend.example.test".to_string(),
            upstream_url: upstream_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(5),
        },
        session: session_config(),
        oauth2: oauth2_config(),
        allow_list: AllowListConfig {
            categories: vec![TopLevelCategory::Insolvency],
        },
    }
}

pub fn signed_in(email: &str, scope: &str) -> SignInInfo {
    SignInInfo {
        signed_in: 1,
        user_profile: Some(UserProfile {
            email: Some(email.to_string()),
            scope: Some(scope.to_string()),
        }),
    }
}

/// How the mocked backend and session store answer.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub authentication_required: bool,
    pub category: TopLevelCategory,
    pub sign_in: Option<SignInInfo>,
    pub allow_listed: bool,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            authentication_required: true,
            category: TopLevelCategory::Insolvency,
            sign_in: None,
            allow_listed: false,
        }
    }
}

impl Scenario {
    pub fn collaborators(&self) -> Collaborators {
        let mut submissions = MockSubmissions::new();
        submissions.expect_get_submission().returning(|id| {
            if id == SUBMISSION_ID {
                Ok(Submission {
                    id: id.to_string(),
                    company_number: Some(COMPANY_NUMBER.to_string()),
                    status: Some("OPEN".to_string()),
                    submission_form: Some(SubmissionForm {
                        form_type: Some("LIQ01".to_string()),
                    }),
                })
            } else {
                Err(LookupError::NotFound(id.to_string()))
            }
        });

        let authentication_required = self.authentication_required;
        let category = self.category;
        let mut forms = MockForms::new();
        forms.expect_get_form_template().returning(move |form_type| {
            Ok(FormTemplate {
                form_type: form_type.to_string(),
                form_name: None,
                authentication_required,
                category: category.to_string(),
            })
        });

        let sign_in = self.sign_in.clone();
        let mut sessions = MockSessions::new();
        sessions
            .expect_sign_in_info()
            .returning(move |_| sign_in.clone());

        let allow_listed = self.allow_listed;
        let mut allow_list = MockAllowList::new();
        allow_list
            .expect_is_on_allow_list()
            .returning(move |_| Ok(allow_listed));

        let mut categories = MockCategories::new();
        categories
            .expect_top_level_category()
            .returning(|code| TopLevelCategory::from_code(code));

        Collaborators {
            submissions: Arc::new(submissions),
            forms: Arc::new(forms),
            sessions: Arc::new(sessions),
            allow_list: Arc::new(allow_list),
            categories: Arc::new(categories),
        }
    }

    /// Application state backed by this scenario, forwarding to `upstream_url`.
    pub fn state(&self, upstream_url: &str) -> AppState {
        let config = test_config(upstream_url);
        let evaluator = CompanyAuthEvaluator::new(self.collaborators())
            .with_allow_list_categories(config.allow_list.categories.iter().copied());
        let http = create_http_client(&config.backend).unwrap();
        let redis = create_redis_pool(UNREACHABLE_REDIS_URL).unwrap();
        AppState::new(evaluator, http, redis, config)
    }
}

/// `GET /efs-submission/{SUBMISSION_ID}/company/{company_number}/document-upload`
pub fn company_page_path(company_number: &str) -> String {
    format!("/efs-submission/{SUBMISSION_ID}/company/{company_number}/document-upload")
}
