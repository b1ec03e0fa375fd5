use serde::{Deserialize, Serialize};

use crate::error::{ApiError, FieldError};
use crate::jobs::repo::{Job, JobStatus};

/// Create body. There are deliberately no owner or date fields here:
/// the owner comes from the bearer token and the date from the database,
/// so any client-supplied values for them are dropped during parsing.
#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub status: JobStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    pub notes: Option<String>,
}

fn check_required(company: &str, position: &str) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if company.trim().is_empty() {
        errors.push(FieldError {
            field: "company",
            message: "Company is required",
        });
    }
    if position.trim().is_empty() {
        errors.push(FieldError {
            field: "position",
            message: "Position is required",
        });
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

impl CreateJobRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_required(&self.company, &self.position)
    }
}

impl UpdateJobRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_required(&self.company, &self.position)
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteJobResponse {
    pub message: &'static str,
    pub deleted_job: Job,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_defaults_status_to_applied() {
        let req: CreateJobRequest =
            serde_json::from_str(r#"{"company":"Acme","position":"Eng"}"#).unwrap();
        assert_eq!(req.status, JobStatus::Applied);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn create_ignores_client_supplied_owner_and_date() {
        // Unknown fields are dropped by serde, so they cannot influence
        // attribution or the applied timestamp.
        let req: CreateJobRequest = serde_json::from_str(
            r#"{
                "company": "Acme",
                "position": "Eng",
                "owner_id": "11111111-1111-1111-1111-111111111111",
                "date_applied": "2020-01-01T00:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(req.company, "Acme");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn create_reports_all_missing_fields() {
        let req: CreateJobRequest =
            serde_json::from_str(r#"{"company":"","position":"  "}"#).unwrap();
        let err = req.validate().unwrap_err();
        let ApiError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["company", "position"]);
    }

    #[test]
    fn update_requires_an_explicit_status() {
        let missing: Result<UpdateJobRequest, _> =
            serde_json::from_str(r#"{"company":"Acme","position":"Eng"}"#);
        assert!(missing.is_err());

        let req: UpdateJobRequest = serde_json::from_str(
            r#"{"company":"Acme","position":"Eng","status":"Interview","notes":"onsite"}"#,
        )
        .unwrap();
        assert_eq!(req.status, JobStatus::Interview);
        assert!(req.validate().is_ok());
    }
}
