//! Domain types read by the company-authorization evaluator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque submission identifier taken from the request URL
pub type SubmissionId = String;

/// Companies House company number taken from the request URL
pub type CompanyNumber = String;

/// A single in-progress filing, as returned by the submission service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    #[serde(default)]
    pub company_number: Option<CompanyNumber>,
    #[serde(default)]
    pub status: Option<String>,
    /// Absent until the user has picked a form in the journey
    #[serde(default)]
    pub submission_form: Option<SubmissionForm>,
}

impl Submission {
    /// Form type chosen for this submission, if the user got that far.
    pub fn form_type(&self) -> Option<&str> {
        self.submission_form
            .as_ref()
            .and_then(|form| form.form_type.as_deref())
    }
}

/// The form attached to a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionForm {
    #[serde(default)]
    pub form_type: Option<String>,
}

/// Metadata for a filing form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTemplate {
    pub form_type: String,
    #[serde(default)]
    pub form_name: Option<String>,
    #[serde(default)]
    pub authentication_required: bool,
    /// Category code; resolve with the category hierarchy to get its root
    #[serde(default)]
    pub category: String,
}

/// One node of the form category hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTemplate {
    pub category_type: String,
    #[serde(default)]
    pub category_name: Option<String>,
    /// Parent category code; empty or `ROOT` at a top-level node
    #[serde(default)]
    pub parent: Option<String>,
}

impl CategoryTemplate {
    /// Parent code, unless this node sits directly under the hierarchy root.
    pub fn parent_code(&self) -> Option<&str> {
        self.parent
            .as_deref()
            .map(str::trim)
            .filter(|parent| !parent.is_empty() && !parent.eq_ignore_ascii_case("ROOT"))
    }
}

/// Sign-in data stored on the user's session by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInInfo {
    #[serde(default)]
    pub signed_in: i32,
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
}

impl SignInInfo {
    pub fn is_signed_in(&self) -> bool {
        self.signed_in == 1
    }

    pub fn email(&self) -> Option<&str> {
        self.user_profile
            .as_ref()
            .and_then(|profile| profile.email.as_deref())
    }

    /// Raw space-delimited scope grant string
    pub fn scope(&self) -> Option<&str> {
        self.user_profile
            .as_ref()
            .and_then(|profile| profile.scope.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Root ancestor of a category in the form category hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TopLevelCategory {
    Root,
    Resolutions,
    ChangeOfConstitution,
    Articles,
    Insolvency,
    Other,
}

impl TopLevelCategory {
    /// Map a backend category code onto a top-level category.
    /// Unrecognised codes are `Other`.
    pub fn from_code(code: &str) -> Self {
        code.parse().unwrap_or(TopLevelCategory::Other)
    }
}

impl fmt::Display for TopLevelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopLevelCategory::Root => write!(f, "ROOT"),
            TopLevelCategory::Resolutions => write!(f, "RESOLUTIONS"),
            TopLevelCategory::ChangeOfConstitution => write!(f, "CHANGE_OF_CONSTITUTION"),
            TopLevelCategory::Articles => write!(f, "ARTICLES"),
            TopLevelCategory::Insolvency => write!(f, "INSOLVENCY"),
            TopLevelCategory::Other => write!(f, "OTHER"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown top-level category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for TopLevelCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ROOT" => Ok(TopLevelCategory::Root),
            "RESOLUTIONS" => Ok(TopLevelCategory::Resolutions),
            "CHANGE_OF_CONSTITUTION" => Ok(TopLevelCategory::ChangeOfConstitution),
            "ARTICLES" => Ok(TopLevelCategory::Articles),
            "INSOLVENCY" => Ok(TopLevelCategory::Insolvency),
            "OTHER" => Ok(TopLevelCategory::Other),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}
