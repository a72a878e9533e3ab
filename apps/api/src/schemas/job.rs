//! Structured job posting: the single-shot extraction target for job descriptions.

use std::sync::OnceLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::extraction::{SchemaDescriptor, Validate, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Internship,
    Temporary,
    #[serde(rename = "Not Specified")]
    NotSpecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteStatus {
    #[serde(rename = "Fully Remote")]
    FullyRemote,
    Hybrid,
    #[serde(rename = "On-site")]
    OnSite,
    #[serde(rename = "Not Specified")]
    NotSpecified,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub company_name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobLocation {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub remote_status: RemoteStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qualifications {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub preferred: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompensationAndBenefits {
    pub salary_range: Option<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInfo {
    pub how_to_apply: Option<String>,
    pub apply_link: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredJob {
    pub job_title: String,
    pub company_profile: Option<CompanyProfile>,
    pub location: Option<JobLocation>,
    pub date_posted: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub job_summary: String,
    #[serde(default)]
    pub key_responsibilities: Vec<String>,
    pub qualifications: Option<Qualifications>,
    pub compensation_and_benefits: Option<CompensationAndBenefits>,
    pub application_info: Option<ApplicationInfo>,
    #[serde(default)]
    pub extracted_keywords: Vec<String>,
}

impl Validate for StructuredJob {
    fn check(&self, errors: &mut ValidationErrors) {
        errors.require_non_blank("jobTitle", &self.job_title);
        errors.require_non_blank("jobSummary", &self.job_summary);
        errors.require_min_items("extractedKeywords", &self.extracted_keywords, 1);

        if let Some(date) = self.date_posted.as_deref().filter(|d| !d.is_empty()) {
            if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                errors.push("datePosted", format!("must be YYYY-MM-DD, found {date:?}"));
            }
        }
        if let Some(company) = &self.company_profile {
            errors.require_non_blank("companyProfile.companyName", &company.company_name);
        }
    }
}

pub fn descriptor() -> &'static SchemaDescriptor {
    static DESCRIPTOR: OnceLock<SchemaDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| SchemaDescriptor {
        name: "structured_job",
        version: 1,
        example: json!({
            "jobTitle": "string",
            "companyProfile": {
                "companyName": "string",
                "industry": "Optional[string]",
                "website": "Optional[string]",
                "description": "Optional[string]"
            },
            "location": {
                "city": "Optional[string]",
                "state": "Optional[string]",
                "country": "Optional[string]",
                "remoteStatus": "Fully Remote | Hybrid | On-site | Not Specified"
            },
            "datePosted": "Optional[YYYY-MM-DD]",
            "employmentType": "Full-time | Part-time | Contract | Internship | Temporary | Not Specified",
            "jobSummary": "string",
            "keyResponsibilities": ["string", "..."],
            "qualifications": {
                "required": ["string", "..."],
                "preferred": ["string", "..."]
            },
            "compensationAndBenefits": {
                "salaryRange": "Optional[string]",
                "benefits": ["string", "..."]
            },
            "applicationInfo": {
                "howToApply": "Optional[string]",
                "applyLink": "Optional[string]",
                "contactEmail": "Optional[string]"
            },
            "extractedKeywords": ["string", "..."]
        }),
        wrapper_keys: &["job", "job_posting", "structured_job", "structuredJob"],
    })
}
