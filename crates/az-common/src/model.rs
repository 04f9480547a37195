//! Domain entities
//!
//! Transient client copies of server-owned records, plus the request bodies
//! the console submits. Field names follow the backend's camelCase JSON.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::role::{deserialize_role_set, Role, RoleSet};

// ============================================================================
// Students
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub nume: String,
    pub prenume: String,
    pub email: String,
    #[serde(default)]
    pub telefon: Option<String>,
    pub an_studiu: u8,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nume, self.prenume)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRequest {
    pub nume: String,
    pub prenume: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefon: Option<String>,
    pub an_studiu: u8,
}

impl Default for StudentRequest {
    fn default() -> Self {
        Self {
            nume: String::new(),
            prenume: String::new(),
            email: String::new(),
            telefon: None,
            an_studiu: 1,
        }
    }
}

impl From<&Student> for StudentRequest {
    fn from(student: &Student) -> Self {
        Self {
            nume: student.nume.clone(),
            prenume: student.prenume.clone(),
            email: student.email.clone(),
            telefon: student.telefon.clone(),
            an_studiu: student.an_studiu,
        }
    }
}

// ============================================================================
// Courses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub denumire: String,
    pub profesor_titular: String,
    pub nr_credite: u8,
    pub semester: u8,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRequest {
    pub denumire: String,
    pub profesor_titular: String,
    pub nr_credite: u8,
    pub semester: u8,
}

impl Default for CourseRequest {
    fn default() -> Self {
        Self {
            denumire: String::new(),
            profesor_titular: String::new(),
            nr_credite: 5,
            semester: 1,
        }
    }
}

impl From<&Course> for CourseRequest {
    fn from(course: &Course) -> Self {
        Self {
            denumire: course.denumire.clone(),
            profesor_titular: course.profesor_titular.clone(),
            nr_credite: course.nr_credite,
            semester: course.semester,
        }
    }
}

// ============================================================================
// Enrollments
// ============================================================================

/// Composite identity of an enrollment; there is no surrogate id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnrollmentKey {
    pub student_id: i64,
    pub course_id: i64,
}

impl EnrollmentKey {
    pub fn new(student_id: i64, course_id: i64) -> Self {
        Self { student_id, course_id }
    }
}

/// Renders the synthesized table row id, `"{studentId}-{courseId}"`
impl fmt::Display for EnrollmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.student_id, self.course_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub student_id: i64,
    #[serde(default)]
    pub student_name: String,
    pub course_id: i64,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub nota_finala: Option<f64>,
}

impl Enrollment {
    pub fn key(&self) -> EnrollmentKey {
        EnrollmentKey::new(self.student_id, self.course_id)
    }

    pub fn row_id(&self) -> String {
        self.key().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    pub student_id: i64,
    pub course_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nota_finala: Option<f64>,
}

impl From<&Enrollment> for EnrollmentRequest {
    fn from(enrollment: &Enrollment) -> Self {
        Self {
            student_id: enrollment.student_id,
            course_id: enrollment.course_id,
            nota_finala: enrollment.nota_finala,
        }
    }
}

// ============================================================================
// Attendance
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Prezent,
    Absent,
    Motivat,
}

impl AttendanceStatus {
    pub const VALUES: [&'static str; 3] = ["prezent", "absent", "motivat"];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Prezent => "prezent",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Motivat => "motivat",
        }
    }
}

impl Default for AttendanceStatus {
    fn default() -> Self {
        Self::Prezent
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: i64,
    pub student_id: i64,
    #[serde(default)]
    pub student_name: String,
    pub course_id: i64,
    #[serde(default)]
    pub course_name: String,
    pub data: NaiveDate,
    pub semester: u8,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    pub student_id: i64,
    pub course_id: i64,
    pub data: NaiveDate,
    pub semester: u8,
    pub status: AttendanceStatus,
}

impl AttendanceRequest {
    /// Blank form: nothing picked, dated today, first semester, present
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            student_id: 0,
            course_id: 0,
            data: today,
            semester: 1,
            status: AttendanceStatus::Prezent,
        }
    }
}

impl From<&Attendance> for AttendanceRequest {
    fn from(attendance: &Attendance) -> Self {
        Self {
            student_id: attendance.student_id,
            course_id: attendance.course_id,
            data: attendance.data,
            semester: attendance.semester,
            status: attendance.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub student_id: i64,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub semester1_count: u64,
    #[serde(default)]
    pub semester2_count: u64,
}

/// Filters accepted by the attendance search endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceSearch {
    pub student: Option<String>,
    pub course: Option<String>,
    pub semester: Option<u8>,
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, deserialize_with = "deserialize_role_set")]
    pub roles: RoleSet,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    pub roles: Vec<Role>,
}

impl Default for UserRequest {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: None,
            enabled: Some(true),
            roles: vec![Role::Professor],
        }
    }
}

impl From<&User> for UserRequest {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            password: None,
            enabled: Some(user.enabled),
            roles: user.roles.iter().copied().collect(),
        }
    }
}

// ============================================================================
// Audit
// ============================================================================

/// Audit trail entry, generated by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub ip: String,
    pub action: String,
    pub entity: String,
    #[serde(default)]
    pub entity_id: Option<i64>,
    #[serde(default)]
    pub payload_json: Option<String>,
    pub timestamp: NaiveDateTime,
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Credentials as typed into the login form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// ============================================================================
// Export
// ============================================================================

/// Resource types the CSV export endpoint knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    Students,
    Courses,
    Attendance,
    Enrollments,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Students => "students",
            ExportKind::Courses => "courses",
            ExportKind::Attendance => "attendance",
            ExportKind::Enrollments => "enrollments",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.as_str())
    }
}
