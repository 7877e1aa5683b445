//! Live LMS projection row.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::CompletionStatus;

/// One joined row from the live LMS tables, as consumed by the sync engine.
///
/// `completion_id` is present when a course_completions row exists for the
/// enrolment; its absence means completion tracking has not begun.
#[derive(Debug, Clone, FromRow)]
pub struct LiveCompletionRow {
    pub user_id: i64,
    pub course_id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub department: Option<String>,
    pub course_fullname: String,
    pub course_shortname: String,
    pub completion_id: Option<i64>,
    pub time_enrolled: Option<DateTime<Utc>>,
    pub time_started: Option<DateTime<Utc>>,
    pub time_completed: Option<DateTime<Utc>>,
    pub final_grade: Option<f64>,
}

impl LiveCompletionRow {
    /// Completion status implied by this row.
    pub fn status(&self) -> CompletionStatus {
        CompletionStatus::derive(
            self.completion_id.is_some(),
            self.time_started,
            self.time_completed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        completion_id: Option<i64>,
        time_started: Option<DateTime<Utc>>,
        time_completed: Option<DateTime<Utc>>,
    ) -> LiveCompletionRow {
        LiveCompletionRow {
            user_id: 1,
            course_id: 2,
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            department: None,
            course_fullname: "Safety".to_string(),
            course_shortname: "safety".to_string(),
            completion_id,
            time_enrolled: None,
            time_started,
            time_completed,
            final_grade: None,
        }
    }

    #[test]
    fn test_status_enrolled_without_completion_row() {
        assert_eq!(row(None, None, None).status(), CompletionStatus::Enrolled);
    }

    #[test]
    fn test_status_not_started_with_completion_row() {
        assert_eq!(
            row(Some(5), None, None).status(),
            CompletionStatus::NotStarted
        );
    }

    #[test]
    fn test_status_completed() {
        let now = Some(Utc::now());
        assert_eq!(
            row(Some(5), now, now).status(),
            CompletionStatus::Completed
        );
    }
}
