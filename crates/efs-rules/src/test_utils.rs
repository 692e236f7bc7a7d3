//! In-memory collaborators with call counters for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use efs_common::{
    FormTemplate, LookupError, LookupResult, SignInInfo, Submission, SubmissionForm,
    TopLevelCategory,
};

use crate::context::RequestInput;
use crate::lookup::{
    AllowListLookup, CategoryHierarchyLookup, Collaborators, FormTemplateLookup,
    SessionAccessor, SubmissionLookup,
};

pub fn submission_with_form(id: &str, form_type: &str) -> Submission {
    Submission {
        id: id.to_string(),
        company_number: None,
        status: Some("OPEN".to_string()),
        submission_form: Some(SubmissionForm {
            form_type: Some(form_type.to_string()),
        }),
    }
}

pub mod fixtures {
    use efs_common::{FormTemplate, SignInInfo, UserProfile};
    use http::Method;

    use crate::context::RequestInput;

    pub const SUBMISSION_ID: &str = "abc123";
    pub const COMPANY_NUMBER: &str = "12345678";
    pub const INSOLVENCY_CATEGORY: &str = "INSOLVENCY";
    pub const ARTICLES_CATEGORY: &str = "ARTICLES";

    pub fn company_page_request() -> RequestInput {
        company_page_request_for(COMPANY_NUMBER)
    }

    pub fn company_page_request_for(company_number: &str) -> RequestInput {
        RequestInput::new(
            Method::GET,
            format!("/efs-submission/{SUBMISSION_ID}/company/{company_number}/document-upload"),
        )
    }

    pub fn insolvency_form(form_type: &str, authentication_required: bool) -> FormTemplate {
        form(form_type, INSOLVENCY_CATEGORY, authentication_required)
    }

    pub fn form(form_type: &str, category: &str, authentication_required: bool) -> FormTemplate {
        FormTemplate {
            form_type: form_type.to_string(),
            form_name: None,
            authentication_required,
            category: category.to_string(),
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
}

#[derive(Default)]
pub struct FakeSubmissions {
    items: Mutex<HashMap<String, Submission>>,
    calls: AtomicUsize,
}

impl FakeSubmissions {
    pub fn insert(&self, submission: Submission) {
        self.items
            .lock()
            .unwrap()
            .insert(submission.id.clone(), submission);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionLookup for FakeSubmissions {
    async fn get_submission(&self, submission_id: &str) -> LookupResult<Submission> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.items
            .lock()
            .unwrap()
            .get(submission_id)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(submission_id.to_string()))
    }
}

#[derive(Default)]
pub struct FakeForms {
    items: Mutex<HashMap<String, FormTemplate>>,
    calls: AtomicUsize,
}

impl FakeForms {
    pub fn insert(&self, form: FormTemplate) {
        self.items
            .lock()
            .unwrap()
            .insert(form.form_type.clone(), form);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FormTemplateLookup for FakeForms {
    async fn get_form_template(&self, form_type: &str) -> LookupResult<FormTemplate> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.items
            .lock()
            .unwrap()
            .get(form_type)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(form_type.to_string()))
    }
}

#[derive(Default)]
pub struct FakeSessions {
    sign_in: Mutex<Option<SignInInfo>>,
    calls: AtomicUsize,
}

impl FakeSessions {
    pub fn set(&self, info: SignInInfo) {
        *self.sign_in.lock().unwrap() = Some(info);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionAccessor for FakeSessions {
    async fn sign_in_info(&self, _request: &RequestInput) -> Option<SignInInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sign_in.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub struct FakeAllowList {
    emails: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl FakeAllowList {
    pub fn allow(&self, email: &str) {
        self.emails.lock().unwrap().push(email.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AllowListLookup for FakeAllowList {
    async fn is_on_allow_list(&self, email: &str) -> LookupResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.emails.lock().unwrap().iter().any(|e| e == email))
    }
}

/// Category codes map onto the top-level category of the same name.
pub struct FakeCategories;

#[async_trait]
impl CategoryHierarchyLookup for FakeCategories {
    async fn top_level_category(&self, category_code: &str) -> TopLevelCategory {
        TopLevelCategory::from_code(category_code)
    }
}

/// Bundle of fakes that hands out [`Collaborators`] sharing its counters.
pub struct Fakes {
    pub submissions: Arc<FakeSubmissions>,
    pub forms: Arc<FakeForms>,
    pub sessions: Arc<FakeSessions>,
    pub allow_list: Arc<FakeAllowList>,
}

impl Fakes {
    pub fn new() -> Self {
        Self {
            submissions: Arc::new(FakeSubmissions::default()),
            forms: Arc::new(FakeForms::default()),
            sessions: Arc::new(FakeSessions::default()),
            allow_list: Arc::new(FakeAllowList::default()),
        }
    }

    pub fn with_submission(self, submission: Submission) -> Self {
        self.submissions.insert(submission);
        self
    }

    pub fn with_form(self, form: FormTemplate) -> Self {
        self.forms.insert(form);
        self
    }

    pub fn with_sign_in(self, info: SignInInfo) -> Self {
        self.sessions.set(info);
        self
    }

    pub fn with_allow_listed(self, email: &str) -> Self {
        self.allow_list.allow(email);
        self
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            submissions: self.submissions.clone(),
            forms: self.forms.clone(),
            sessions: self.sessions.clone(),
            allow_list: self.allow_list.clone(),
            categories: Arc::new(FakeCategories),
        }
    }

    /// Same collaborators, with the allow-list swapped out.
    pub fn collaborators_with_allow_list(
        &self,
        allow_list: Arc<dyn AllowListLookup>,
    ) -> Collaborators {
        Collaborators {
            allow_list,
            ..self.collaborators()
        }
    }
}
