//! Per-request evaluation context.
//!
//! [`RequestResourceCache`] is the single source of truth for what the
//! current request implies. It fetches the submission, its form template and
//! the session's sign-in info on demand, at most once each per request.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};

use efs_common::{FormTemplate, SignInInfo, Submission};
use http::{HeaderMap, Method};
use regex::Regex;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::lookup::{Collaborators, FormTemplateLookup, SessionAccessor, SubmissionLookup};

/// `[/{prefix}...]/{submission_id}/company/{company_number}[/...]`
///
/// Any number of mount segments may precede the submission ID; the lazy
/// prefix binds to the first `/company/` segment.
static SUBMISSION_COMPANY_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:/[^/]+)*?/(?P<submission_id>[A-Za-z0-9]+)/company/(?P<company_number>[A-Za-z0-9]+)(?:/.*)?$",
    )
    .expect("submission company path pattern is valid")
});

/// Identifiers captured from a submission+company URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyPath<'a> {
    pub submission_id: &'a str,
    pub company_number: &'a str,
}

/// Match a request path against the submission+company URL shape.
pub fn match_company_path(path: &str) -> Option<CompanyPath<'_>> {
    let caps = SUBMISSION_COMPANY_PATH.captures(path)?;
    Some(CompanyPath {
        submission_id: caps.name("submission_id")?.as_str(),
        company_number: caps.name("company_number")?.as_str(),
    })
}

/// The parts of an inbound request the evaluator looks at.
#[derive(Debug, Clone)]
pub struct RequestInput {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
}

impl RequestInput {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Build from the head of an HTTP request.
    pub fn from_parts(parts: &http::request::Parts) -> Self {
        Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            headers: parts.headers.clone(),
        }
    }
}

/// Snapshot of backend calls made through one cache binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupStats {
    pub submission_lookups: usize,
    pub form_lookups: usize,
    pub sign_in_lookups: usize,
}

#[derive(Debug, Default)]
struct LookupCounters {
    submission: AtomicUsize,
    form: AtomicUsize,
    sign_in: AtomicUsize,
}

/// Marker for a resource that could not be resolved; never cached.
struct Unresolved;

/// Lazily resolved, request-scoped resources.
///
/// One instance per inbound request. Each slot is a [`OnceCell`], so a
/// resource is fetched once even when several chain links (or concurrent
/// futures) ask for it; a failed fetch leaves the slot empty and a later call
/// tries again. Rebinding with [`set_input`](Self::set_input) needs `&mut self`
/// and clears every slot when the request changes.
pub struct RequestResourceCache {
    input: Option<Arc<RequestInput>>,
    submissions: Arc<dyn SubmissionLookup>,
    forms: Arc<dyn FormTemplateLookup>,
    sessions: Arc<dyn SessionAccessor>,
    submission: OnceCell<Submission>,
    form: OnceCell<FormTemplate>,
    sign_in_info: OnceCell<SignInInfo>,
    counters: LookupCounters,
}

impl std::fmt::Debug for RequestResourceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestResourceCache")
            .field("input", &self.input)
            .field("submission", &self.submission.get())
            .field("form", &self.form.get())
            .field("sign_in_info", &self.sign_in_info.get())
            .finish()
    }
}

impl RequestResourceCache {
    /// Create an unbound cache. Every getter answers `None` until
    /// [`set_input`](Self::set_input) is called.
    pub fn new(collaborators: &Collaborators) -> Self {
        Self {
            input: None,
            submissions: collaborators.submissions.clone(),
            forms: collaborators.forms.clone(),
            sessions: collaborators.sessions.clone(),
            submission: OnceCell::new(),
            form: OnceCell::new(),
            sign_in_info: OnceCell::new(),
            counters: LookupCounters::default(),
        }
    }

    /// Bind the cache to a request.
    ///
    /// Binding a different request instance (compared by identity, not by
    /// value) drops every cached resource and resets the lookup counters.
    /// Binding the instance already bound keeps them.
    pub fn set_input(&mut self, input: Arc<RequestInput>) {
        let same_request = self
            .input
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &input));

        if !same_request {
            self.submission.take();
            self.form.take();
            self.sign_in_info.take();
            self.counters = LookupCounters::default();
        }
        self.input = Some(input);
    }

    /// The request this cache is bound to.
    pub fn input(&self) -> Option<&RequestInput> {
        self.input.as_deref()
    }

    fn company_path(&self) -> Option<CompanyPath<'_>> {
        self.input().and_then(|input| match_company_path(&input.path))
    }

    /// Company number from the URL. Recomputed from the path on every call.
    pub fn get_company_number(&self) -> Option<&str> {
        self.company_path().map(|path| path.company_number)
    }

    /// The submission named in the URL, fetched on first use.
    pub async fn get_submission(&self) -> Option<&Submission> {
        self.submission
            .get_or_try_init(|| self.fetch_submission())
            .await
            .ok()
    }

    /// The form template of the submission, fetched on first use.
    ///
    /// `None` when there is no submission or the user has not chosen a form yet.
    pub async fn get_form(&self) -> Option<&FormTemplate> {
        self.form.get_or_try_init(|| self.fetch_form()).await.ok()
    }

    /// Sign-in info from the request's session, read on first use.
    pub async fn get_sign_in_info(&self) -> Option<&SignInInfo> {
        self.sign_in_info
            .get_or_try_init(|| self.fetch_sign_in_info())
            .await
            .ok()
    }

    /// Backend calls made since the cache was last bound to a new request.
    pub fn lookup_stats(&self) -> LookupStats {
        LookupStats {
            submission_lookups: self.counters.submission.load(Ordering::Relaxed),
            form_lookups: self.counters.form.load(Ordering::Relaxed),
            sign_in_lookups: self.counters.sign_in.load(Ordering::Relaxed),
        }
    }

    async fn fetch_submission(&self) -> Result<Submission, Unresolved> {
        let Some(path) = self.company_path() else {
            return Err(Unresolved);
        };

        self.counters.submission.fetch_add(1, Ordering::Relaxed);
        match self.submissions.get_submission(path.submission_id).await {
            Ok(submission) => {
                debug!(submission_id = %path.submission_id, "Submission resolved");
                Ok(submission)
            }
            Err(e) if e.is_not_found() => {
                debug!(submission_id = %path.submission_id, "Submission not found");
                Err(Unresolved)
            }
            Err(e) => {
                warn!(
                    submission_id = %path.submission_id,
                    code = e.error_code(),
                    error = %e,
                    "Submission lookup failed"
                );
                Err(Unresolved)
            }
        }
    }

    async fn fetch_form(&self) -> Result<FormTemplate, Unresolved> {
        let Some(form_type) = self.get_submission().await.and_then(|s| s.form_type()) else {
            return Err(Unresolved);
        };

        self.counters.form.fetch_add(1, Ordering::Relaxed);
        match self.forms.get_form_template(form_type).await {
            Ok(form) => {
                debug!(form_type = %form_type, "Form template resolved");
                Ok(form)
            }
            Err(e) => {
                warn!(
                    form_type = %form_type,
                    code = e.error_code(),
                    error = %e,
                    "Form template lookup failed"
                );
                Err(Unresolved)
            }
        }
    }

    async fn fetch_sign_in_info(&self) -> Result<SignInInfo, Unresolved> {
        let Some(input) = self.input() else {
            return Err(Unresolved);
        };

        self.counters.sign_in.fetch_add(1, Ordering::Relaxed);
        self.sessions.sign_in_info(input).await.ok_or(Unresolved)
    }
}
