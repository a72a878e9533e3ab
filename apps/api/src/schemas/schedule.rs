//! Learning schedule: the retry-loop target.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::extraction::{SchemaDescriptor, Validate, ValidationErrors};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    #[default]
    Weekly,
    Monthly,
}

impl ScheduleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleType::Weekly => "weekly",
            ScheduleType::Monthly => "monthly",
        }
    }

    /// Label prefix the model must use for each period ("Week 1", "Month 1").
    pub fn period_label(&self) -> &'static str {
        match self {
            ScheduleType::Weekly => "Week",
            ScheduleType::Monthly => "Month",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityType {
    Course,
    Tutorial,
    #[serde(rename = "Practice Project")]
    PracticeProject,
    Reading,
    Certification,
    #[serde(rename = "Hands-on Practice")]
    HandsOnPractice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
    Platform,
    Documentation,
    Book,
    Video,
    Article,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub activity_type: ActivityType,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
    pub estimated_hours: u32,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePeriod {
    pub period: String,
    pub focus: String,
    #[serde(default)]
    pub learning_goals: Vec<String>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub milestones: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    #[serde(default)]
    pub skills_to_learn: Vec<String>,
    #[serde(default)]
    pub skills_to_improve: Vec<String>,
    pub estimated_time_per_week: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub name: String,
    pub provider: String,
    pub relevance: String,
    pub estimated_time_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecommendation {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub skills_applied: Vec<String>,
    pub complexity: Complexity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub projects: Vec<ProjectRecommendation>,
    #[serde(default)]
    pub networking: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressTracking {
    #[serde(default)]
    pub weekly_checkpoints: Vec<String>,
    #[serde(default)]
    pub success_metrics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningSchedule {
    pub schedule_type: ScheduleType,
    pub total_duration_weeks: u32,
    pub overview: Overview,
    #[serde(default)]
    pub schedule: Vec<SchedulePeriod>,
    pub recommendations: Recommendations,
    pub progress_tracking: ProgressTracking,
}

impl Validate for LearningSchedule {
    fn check(&self, errors: &mut ValidationErrors) {
        errors.require_at_least("totalDurationWeeks", self.total_duration_weeks.into(), 1);
        errors.require_non_blank(
            "overview.estimatedTimePerWeek",
            &self.overview.estimated_time_per_week,
        );
        errors.require_min_items("schedule", &self.schedule, 1);

        for (i, period) in self.schedule.iter().enumerate() {
            errors.require_non_blank(&format!("schedule[{i}].period"), &period.period);
            errors.require_min_items(&format!("schedule[{i}].activities"), &period.activities, 1);
            for (j, activity) in period.activities.iter().enumerate() {
                errors.require_at_least(
                    &format!("schedule[{i}].activities[{j}].estimatedHours"),
                    activity.estimated_hours.into(),
                    1,
                );
            }
        }

        for (i, cert) in self.recommendations.certifications.iter().enumerate() {
            errors.require_at_least(
                &format!("recommendations.certifications[{i}].estimatedTimeMonths"),
                cert.estimated_time_months.into(),
                1,
            );
        }
    }
}

pub fn descriptor() -> &'static SchemaDescriptor {
    static DESCRIPTOR: OnceLock<SchemaDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| SchemaDescriptor {
        name: "learning_schedule",
        version: 1,
        example: json!({
            "scheduleType": "weekly | monthly",
            "totalDurationWeeks": "integer",
            "overview": {
                "skillsToLearn": ["string", "..."],
                "skillsToImprove": ["string", "..."],
                "estimatedTimePerWeek": "string"
            },
            "schedule": [{
                "period": "Week 1 | Month 1",
                "focus": "string",
                "learningGoals": ["string", "..."],
                "activities": [{
                    "activityType": "Course | Tutorial | Practice Project | Reading | Certification | Hands-on Practice",
                    "title": "string",
                    "description": "string",
                    "resources": [{
                        "name": "string",
                        "type": "Platform | Documentation | Book | Video | Article",
                        "url": "Optional[string]"
                    }],
                    "estimatedHours": "integer",
                    "priority": "High | Medium | Low"
                }],
                "milestones": ["string", "..."]
            }],
            "recommendations": {
                "certifications": [{
                    "name": "string",
                    "provider": "string",
                    "relevance": "string",
                    "estimatedTimeMonths": "integer"
                }],
                "projects": [{
                    "title": "string",
                    "description": "string",
                    "skillsApplied": ["string", "..."],
                    "complexity": "Beginner | Intermediate | Advanced"
                }],
                "networking": ["string", "..."]
            },
            "progressTracking": {
                "weeklyCheckpoints": ["string", "..."],
                "successMetrics": ["string", "..."]
            }
        }),
        wrapper_keys: &["learning_schedule", "learningSchedule"],
    })
}
