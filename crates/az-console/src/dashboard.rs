//! Dashboard counters

use tracing::warn;

use az_client::{AdminZoneApi, CourseFilter, StudentFilter};
use az_common::PageRequest;

/// Totals per resource; `None` when that count could not be loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardCounts {
    pub students: Option<u64>,
    pub courses: Option<u64>,
    pub enrollments: Option<u64>,
    pub attendance: Option<u64>,
}

/// One-row list requests; only `totalElements` is read
const PROBE_PAGE: PageRequest = PageRequest { page: 0, size: 1 };

fn total<T, E: std::fmt::Display>(
    resource: &str,
    result: Result<az_common::PageResponse<T>, E>,
) -> Option<u64> {
    match result {
        Ok(page) => Some(page.total_elements),
        Err(e) => {
            warn!(resource, error = %e, "Dashboard count failed");
            None
        }
    }
}

pub async fn load_counts(api: &AdminZoneApi) -> DashboardCounts {
    let student_filter = StudentFilter::default();
    let course_filter = CourseFilter::default();
    let (students, courses, enrollments, attendance) = futures::join!(
        api.students.list(&student_filter, PROBE_PAGE),
        api.courses.list(&course_filter, PROBE_PAGE),
        api.enrollments.list(PROBE_PAGE),
        api.attendance.list(PROBE_PAGE),
    );

    DashboardCounts {
        students: total("students", students),
        courses: total("courses", courses),
        enrollments: total("enrollments", enrollments),
        attendance: total("attendance", attendance),
    }
}
