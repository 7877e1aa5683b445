//! Reporting record entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{CompletionRecord, CompletionStatus};

/// Database row mapping for the reporting_records table.
///
/// The denormalized projection of live enrolment/completion data. Rows are
/// never hard-deleted by sync; orphans carry `is_deleted = true`.
#[derive(Debug, Clone, FromRow)]
pub struct ReportingRecordEntity {
    pub id: i64,
    pub company_id: Uuid,
    pub user_id: i64,
    pub course_id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub department: Option<String>,
    pub course_fullname: String,
    pub course_shortname: String,
    pub status: String,
    pub time_enrolled: Option<DateTime<Utc>>,
    pub time_started: Option<DateTime<Utc>>,
    pub time_completed: Option<DateTime<Utc>>,
    pub final_grade: Option<f64>,
    pub time_created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub is_deleted: bool,
}

impl ReportingRecordEntity {
    /// Converts the row into the domain record.
    ///
    /// An unparseable stored status falls back to `Enrolled` rather than
    /// failing the whole page.
    pub fn into_domain(self) -> CompletionRecord {
        let status = self
            .status
            .parse::<CompletionStatus>()
            .unwrap_or(CompletionStatus::Enrolled);
        CompletionRecord {
            id: self.id,
            user_id: self.user_id,
            course_id: self.course_id,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            department: self.department,
            course_fullname: self.course_fullname,
            course_shortname: self.course_shortname,
            status,
            time_enrolled: self.time_enrolled,
            time_started: self.time_started,
            time_completed: self.time_completed,
            final_grade: self.final_grade,
            is_deleted: self.is_deleted,
            last_updated: self.last_updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entity(status: &str) -> ReportingRecordEntity {
        ReportingRecordEntity {
            id: 1,
            company_id: Uuid::new_v4(),
            user_id: 42,
            course_id: 7,
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            department: None,
            course_fullname: "Workplace Safety".to_string(),
            course_shortname: "safety101".to_string(),
            status: status.to_string(),
            time_enrolled: None,
            time_started: None,
            time_completed: None,
            final_grade: None,
            time_created: Utc::now(),
            last_updated: Utc::now(),
            is_deleted: false,
        }
    }

    #[test]
    fn test_into_domain_parses_status() {
        let record = sample_entity("completed").into_domain();
        assert_eq!(record.status, CompletionStatus::Completed);
        assert_eq!(record.user_id, 42);
    }

    #[test]
    fn test_into_domain_bad_status_falls_back() {
        let record = sample_entity("corrupted").into_domain();
        assert_eq!(record.status, CompletionStatus::Enrolled);
    }
}
