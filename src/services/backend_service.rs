//! REST client for the filing backend.
//!
//! Implements the submission, form template, allow-list and category
//! hierarchy lookups the company-authorization evaluator consumes.

use async_trait::async_trait;
use efs_common::{
    CategoryTemplate, FormTemplate, LookupError, LookupResult, Submission, TopLevelCategory,
};
use efs_rules::prelude::{
    AllowListLookup, CategoryHierarchyLookup, FormTemplateLookup, SubmissionLookup,
};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::constants::MAX_CATEGORY_DEPTH;

/// Filing backend service
#[derive(Debug, Clone)]
pub struct BackendService {
    client: Client,
    api_url: Url,
}

impl BackendService {
    pub fn new(client: Client, api_url: &str) -> anyhow::Result<Self> {
        let api_url = Url::parse(api_url)
            .map_err(|e| anyhow::anyhow!("Invalid backend URL {}: {}", api_url, e))?;
        if api_url.cannot_be_a_base() {
            anyhow::bail!("Backend URL {} cannot be used as a base", api_url);
        }
        Ok(Self { client, api_url })
    }

    /// Build `{api_url}/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> LookupResult<T> {
        let url = self.endpoint(segments);
        debug!(url = %url, "Backend lookup");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| LookupError::Backend(format!("GET {}: {}", url.path(), e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(url.path().to_string()));
        }
        if !status.is_success() {
            return Err(LookupError::Backend(format!(
                "GET {} returned {}",
                url.path(),
                status
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| LookupError::Decode(format!("GET {}: {}", url.path(), e)))
    }

    /// Follow `parent` links from `category_code` up to its top-level node.
    pub async fn resolve_top_level(&self, category_code: &str) -> LookupResult<TopLevelCategory> {
        let mut current = category_code.to_string();

        for _ in 0..MAX_CATEGORY_DEPTH {
            let node: CategoryTemplate = self.get_json(&["category-templates", &current]).await?;
            match node.parent_code() {
                Some(parent) => current = parent.to_string(),
                None => return Ok(TopLevelCategory::from_code(&node.category_type)),
            }
        }

        Err(LookupError::Backend(format!(
            "category hierarchy above {} deeper than {} levels",
            category_code, MAX_CATEGORY_DEPTH
        )))
    }
}

#[async_trait]
impl SubmissionLookup for BackendService {
    async fn get_submission(&self, submission_id: &str) -> LookupResult<Submission> {
        self.get_json(&["submissions", submission_id]).await
    }
}

#[async_trait]
impl FormTemplateLookup for BackendService {
    async fn get_form_template(&self, form_type: &str) -> LookupResult<FormTemplate> {
        self.get_json(&["form-templates", form_type]).await
    }
}

#[async_trait]
impl AllowListLookup for BackendService {
    async fn is_on_allow_list(&self, email: &str) -> LookupResult<bool> {
        self.get_json(&["company-authentication", "allow-list", email])
            .await
    }
}

#[async_trait]
impl CategoryHierarchyLookup for BackendService {
    async fn top_level_category(&self, category_code: &str) -> TopLevelCategory {
        match self.resolve_top_level(category_code).await {
            Ok(category) => category,
            Err(e) => {
                warn!(
                    category = %category_code,
                    code = e.error_code(),
                    error = %e,
                    "Category hierarchy lookup failed"
                );
                TopLevelCategory::Other
            }
        }
    }
}
