//! Student and course pickers for the enrollment and attendance dialogs

use tracing::debug;

use az_client::{ApiError, CourseFilter, CoursesApi, StudentFilter, StudentsApi};
use az_common::PageRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOption {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupLists {
    pub students: Vec<LookupOption>,
    pub courses: Vec<LookupOption>,
}

impl LookupLists {
    pub fn student_label(&self, id: i64) -> Option<&str> {
        label_of(&self.students, id)
    }

    pub fn course_label(&self, id: i64) -> Option<&str> {
        label_of(&self.courses, id)
    }
}

fn label_of(options: &[LookupOption], id: i64) -> Option<&str> {
    options.iter().find(|o| o.id == id).map(|o| o.label.as_str())
}

/// Unfiltered first page of students and courses, `size` rows each
#[derive(Clone)]
pub struct Lookups {
    students: StudentsApi,
    courses: CoursesApi,
    size: u32,
}

impl Lookups {
    pub fn new(students: StudentsApi, courses: CoursesApi, size: u32) -> Self {
        Self { students, courses, size }
    }

    pub async fn students(&self) -> Result<Vec<LookupOption>, ApiError> {
        let page = self
            .students
            .list(&StudentFilter::default(), PageRequest::new(0, self.size))
            .await?;
        Ok(page
            .data
            .iter()
            .map(|s| LookupOption { id: s.id, label: s.full_name() })
            .collect())
    }

    pub async fn courses(&self) -> Result<Vec<LookupOption>, ApiError> {
        let page = self
            .courses
            .list(&CourseFilter::default(), PageRequest::new(0, self.size))
            .await?;
        Ok(page
            .data
            .into_iter()
            .map(|c| LookupOption { id: c.id, label: c.denumire })
            .collect())
    }

    /// Both lists, fetched concurrently
    pub async fn load(&self) -> Result<LookupLists, ApiError> {
        let (students, courses) = tokio::try_join!(self.students(), self.courses())?;
        debug!(students = students.len(), courses = courses.len(), "Lookups loaded");
        Ok(LookupLists { students, courses })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_by_id() {
        let lists = LookupLists {
            students: vec![LookupOption { id: 3, label: "Pop Ana".into() }],
            courses: vec![LookupOption { id: 7, label: "Baze de date".into() }],
        };
        assert_eq!(lists.student_label(3), Some("Pop Ana"));
        assert_eq!(lists.course_label(7), Some("Baze de date"));
        assert_eq!(lists.course_label(3), None);
    }
}
