//! Structured résumé: the single-shot extraction target for uploaded résumés.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::extraction::{SchemaDescriptor, Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeLocation {
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalData {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
    pub location: Option<ResumeLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub job_title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub technologies_used: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub technologies_used: Vec<String>,
    pub link: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub category: Option<String>,
    pub skill_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub institution: String,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub grade: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredResume {
    pub personal_data: PersonalData,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub extracted_keywords: Vec<String>,
}

impl Validate for StructuredResume {
    fn check(&self, errors: &mut ValidationErrors) {
        errors.require_min_items("extractedKeywords", &self.extracted_keywords, 1);
        for (i, exp) in self.experiences.iter().enumerate() {
            errors.require_non_blank(&format!("experiences[{i}].jobTitle"), &exp.job_title);
            errors.require_non_blank(&format!("experiences[{i}].company"), &exp.company);
        }
        for (i, skill) in self.skills.iter().enumerate() {
            errors.require_non_blank(&format!("skills[{i}].skillName"), &skill.skill_name);
        }
        for (i, edu) in self.education.iter().enumerate() {
            errors.require_non_blank(&format!("education[{i}].institution"), &edu.institution);
        }
    }
}

pub fn descriptor() -> &'static SchemaDescriptor {
    static DESCRIPTOR: OnceLock<SchemaDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| SchemaDescriptor {
        name: "structured_resume",
        version: 1,
        example: json!({
            "personalData": {
                "firstName": "string",
                "lastName": "Optional[string]",
                "email": "Optional[string]",
                "phone": "Optional[string]",
                "linkedin": "Optional[string]",
                "portfolio": "Optional[string]",
                "location": {
                    "city": "Optional[string]",
                    "country": "Optional[string]"
                }
            },
            "experiences": [{
                "jobTitle": "string",
                "company": "string",
                "location": "Optional[string]",
                "startDate": "Optional[YYYY-MM-DD]",
                "endDate": "Optional[YYYY-MM-DD | Present]",
                "description": ["string", "..."],
                "technologiesUsed": ["string", "..."]
            }],
            "projects": [{
                "projectName": "string",
                "description": "Optional[string]",
                "technologiesUsed": ["string", "..."],
                "link": "Optional[string]",
                "startDate": "Optional[YYYY-MM-DD]",
                "endDate": "Optional[YYYY-MM-DD | Present]"
            }],
            "skills": [{
                "category": "Optional[string]",
                "skillName": "string"
            }],
            "education": [{
                "institution": "string",
                "degree": "Optional[string]",
                "fieldOfStudy": "Optional[string]",
                "startDate": "Optional[YYYY-MM-DD]",
                "endDate": "Optional[YYYY-MM-DD | Present]",
                "grade": "Optional[string]",
                "description": "Optional[string]"
            }],
            "achievements": ["string", "..."],
            "extractedKeywords": ["string", "..."]
        }),
        wrapper_keys: &["resume", "structured_resume", "structuredResume"],
    })
}
