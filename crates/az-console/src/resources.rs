//! Resource descriptors
//!
//! One [`ListSource`]/[`EditableSource`] per backend resource. Filter names
//! in the query key match the backend's query parameter names.

use async_trait::async_trait;
use chrono::Local;

use az_client::{
    ApiError, AttendanceApi, AuditApi, CourseFilter, CoursesApi, EnrollmentsApi, StudentFilter,
    StudentsApi, UsersApi,
};
use az_common::{
    Attendance, AttendanceRequest, AuditLog, Course, CourseRequest, Enrollment, EnrollmentKey,
    EnrollmentRequest, Page, Student, StudentRequest, User, UserRequest,
};

use crate::classify::{BusinessRuleClassifier, ErrorClassifier, StandardClassifier, STANDARD_CLASSIFIER};
use crate::query::{ListSource, QueryKey};
use crate::view::{EditableSource, ResourceMessages};

fn small(value: Option<i64>) -> Option<u8> {
    value.and_then(|v| u8::try_from(v).ok())
}

// ============================================================================
// Students
// ============================================================================

pub struct StudentSource {
    api: StudentsApi,
}

impl StudentSource {
    pub const FILTER_QUERY: &'static str = "q";
    pub const FILTER_YEAR: &'static str = "anStudiu";

    pub fn new(api: StudentsApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ListSource for StudentSource {
    type Row = Student;

    fn name(&self) -> &'static str {
        "students"
    }

    async fn fetch(&self, key: &QueryKey) -> Result<Page<Student>, ApiError> {
        let filter = StudentFilter {
            q: key.text_filter(Self::FILTER_QUERY).map(String::from),
            an_studiu: small(key.int_filter(Self::FILTER_YEAR)),
        };
        Ok(self.api.list(&filter, key.page_request()).await?.into())
    }
}

#[async_trait]
impl EditableSource for StudentSource {
    type Key = i64;
    type Input = StudentRequest;

    fn row_key(&self, row: &Student) -> i64 {
        row.id
    }

    fn edit_input(&self, row: &Student) -> StudentRequest {
        StudentRequest::from(row)
    }

    fn blank_input(&self) -> StudentRequest {
        StudentRequest::default()
    }

    fn describe(&self, row: &Student) -> String {
        format!("studentul {} {}", row.nume, row.prenume)
    }

    fn messages(&self) -> ResourceMessages {
        ResourceMessages {
            created: "Student creat cu succes",
            updated: "Student actualizat",
            deleted: "Student șters",
        }
    }

    async fn create(&self, input: &StudentRequest) -> Result<(), ApiError> {
        self.api.create(input).await.map(|_| ())
    }

    async fn update(&self, key: &i64, input: &StudentRequest) -> Result<(), ApiError> {
        self.api.update(*key, input).await.map(|_| ())
    }

    async fn delete(&self, key: &i64) -> Result<(), ApiError> {
        self.api.delete(*key).await
    }
}

// ============================================================================
// Courses
// ============================================================================

pub struct CourseSource {
    api: CoursesApi,
}

impl CourseSource {
    pub const FILTER_QUERY: &'static str = "q";
    pub const FILTER_SEMESTER: &'static str = "semester";

    pub fn new(api: CoursesApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ListSource for CourseSource {
    type Row = Course;

    fn name(&self) -> &'static str {
        "courses"
    }

    async fn fetch(&self, key: &QueryKey) -> Result<Page<Course>, ApiError> {
        let filter = CourseFilter {
            q: key.text_filter(Self::FILTER_QUERY).map(String::from),
            semester: small(key.int_filter(Self::FILTER_SEMESTER)),
        };
        Ok(self.api.list(&filter, key.page_request()).await?.into())
    }
}

#[async_trait]
impl EditableSource for CourseSource {
    type Key = i64;
    type Input = CourseRequest;

    fn row_key(&self, row: &Course) -> i64 {
        row.id
    }

    fn edit_input(&self, row: &Course) -> CourseRequest {
        CourseRequest::from(row)
    }

    fn blank_input(&self) -> CourseRequest {
        CourseRequest::default()
    }

    fn describe(&self, row: &Course) -> String {
        format!("cursul {}", row.denumire)
    }

    fn messages(&self) -> ResourceMessages {
        ResourceMessages {
            created: "Curs creat cu succes",
            updated: "Curs actualizat",
            deleted: "Curs șters",
        }
    }

    async fn create(&self, input: &CourseRequest) -> Result<(), ApiError> {
        self.api.create(input).await.map(|_| ())
    }

    async fn update(&self, key: &i64, input: &CourseRequest) -> Result<(), ApiError> {
        self.api.update(*key, input).await.map(|_| ())
    }

    async fn delete(&self, key: &i64) -> Result<(), ApiError> {
        self.api.delete(*key).await
    }
}

// ============================================================================
// Enrollments
// ============================================================================

pub struct EnrollmentSource {
    api: EnrollmentsApi,
    classifier: StandardClassifier,
}

impl EnrollmentSource {
    pub fn new(api: EnrollmentsApi) -> Self {
        Self {
            api,
            // Most unexplained enrollment failures are duplicate pairs
            classifier: StandardClassifier::with_fallback("Eroare - posibil duplicat"),
        }
    }
}

#[async_trait]
impl ListSource for EnrollmentSource {
    type Row = Enrollment;

    fn name(&self) -> &'static str {
        "enrollments"
    }

    async fn fetch(&self, key: &QueryKey) -> Result<Page<Enrollment>, ApiError> {
        Ok(self.api.list(key.page_request()).await?.into())
    }
}

#[async_trait]
impl EditableSource for EnrollmentSource {
    type Key = EnrollmentKey;
    type Input = EnrollmentRequest;

    fn row_key(&self, row: &Enrollment) -> EnrollmentKey {
        row.key()
    }

    fn edit_input(&self, row: &Enrollment) -> EnrollmentRequest {
        EnrollmentRequest::from(row)
    }

    fn blank_input(&self) -> EnrollmentRequest {
        EnrollmentRequest::default()
    }

    fn describe(&self, row: &Enrollment) -> String {
        format!(
            "înscrierea {} la {} ({})",
            row.student_name,
            row.course_name,
            row.row_id()
        )
    }

    fn messages(&self) -> ResourceMessages {
        ResourceMessages {
            created: "Înscriere creată",
            updated: "Înscriere actualizată",
            deleted: "Înscriere ștearsă",
        }
    }

    fn classifier(&self) -> &dyn ErrorClassifier {
        &self.classifier
    }

    /// Deletes never collide on the pair
    fn delete_classifier(&self) -> &dyn ErrorClassifier {
        &STANDARD_CLASSIFIER
    }

    async fn create(&self, input: &EnrollmentRequest) -> Result<(), ApiError> {
        self.api.create(input).await.map(|_| ())
    }

    async fn update(&self, key: &EnrollmentKey, input: &EnrollmentRequest) -> Result<(), ApiError> {
        self.api.update(*key, input).await.map(|_| ())
    }

    async fn delete(&self, key: &EnrollmentKey) -> Result<(), ApiError> {
        self.api.delete(*key).await
    }
}

// ============================================================================
// Attendance
// ============================================================================

pub struct AttendanceSource {
    api: AttendanceApi,
    classifier: BusinessRuleClassifier,
}

impl AttendanceSource {
    pub fn new(api: AttendanceApi) -> Self {
        Self {
            api,
            classifier: BusinessRuleClassifier::default(),
        }
    }
}

#[async_trait]
impl ListSource for AttendanceSource {
    type Row = Attendance;

    fn name(&self) -> &'static str {
        "attendance"
    }

    async fn fetch(&self, key: &QueryKey) -> Result<Page<Attendance>, ApiError> {
        Ok(self.api.list(key.page_request()).await?.into())
    }
}

#[async_trait]
impl EditableSource for AttendanceSource {
    type Key = i64;
    type Input = AttendanceRequest;

    fn row_key(&self, row: &Attendance) -> i64 {
        row.id
    }

    fn edit_input(&self, row: &Attendance) -> AttendanceRequest {
        AttendanceRequest::from(row)
    }

    fn blank_input(&self) -> AttendanceRequest {
        AttendanceRequest::blank(Local::now().date_naive())
    }

    fn describe(&self, row: &Attendance) -> String {
        format!(
            "prezența din {} ({} la {})",
            row.data, row.student_name, row.course_name
        )
    }

    fn messages(&self) -> ResourceMessages {
        ResourceMessages {
            created: "Prezență adăugată",
            updated: "Prezență actualizată",
            deleted: "Prezență ștearsă",
        }
    }

    /// 422 means the per-semester attendance ceiling was reached
    fn classifier(&self) -> &dyn ErrorClassifier {
        &self.classifier
    }

    async fn create(&self, input: &AttendanceRequest) -> Result<(), ApiError> {
        self.api.create(input).await.map(|_| ())
    }

    async fn update(&self, key: &i64, input: &AttendanceRequest) -> Result<(), ApiError> {
        self.api.update(*key, input).await.map(|_| ())
    }

    async fn delete(&self, key: &i64) -> Result<(), ApiError> {
        self.api.delete(*key).await
    }
}

// ============================================================================
// Users
// ============================================================================

pub struct UserSource {
    api: UsersApi,
}

impl UserSource {
    pub fn new(api: UsersApi) -> Self {
        Self { api }
    }
}

/// A blank password on edit means "keep the current one"
fn without_blank_password(input: &UserRequest) -> UserRequest {
    let mut request = input.clone();
    if request.password.as_deref().map(str::is_empty).unwrap_or(false) {
        request.password = None;
    }
    request
}

#[async_trait]
impl ListSource for UserSource {
    type Row = User;

    fn name(&self) -> &'static str {
        "users"
    }

    /// The users endpoint is not paginated; pages are cut client-side
    async fn fetch(&self, key: &QueryKey) -> Result<Page<User>, ApiError> {
        Ok(Page::paginate(self.api.list().await?, key.page_request()))
    }
}

#[async_trait]
impl EditableSource for UserSource {
    type Key = String;
    type Input = UserRequest;

    fn row_key(&self, row: &User) -> String {
        row.username.clone()
    }

    fn edit_input(&self, row: &User) -> UserRequest {
        UserRequest::from(row)
    }

    fn blank_input(&self) -> UserRequest {
        UserRequest::default()
    }

    fn describe(&self, row: &User) -> String {
        format!("utilizatorul {}", row.username)
    }

    fn messages(&self) -> ResourceMessages {
        ResourceMessages {
            created: "Utilizator creat",
            updated: "Utilizator actualizat",
            deleted: "Utilizator șters",
        }
    }

    async fn create(&self, input: &UserRequest) -> Result<(), ApiError> {
        self.api.create(input).await.map(|_| ())
    }

    async fn update(&self, key: &String, input: &UserRequest) -> Result<(), ApiError> {
        self.api.update(key, &without_blank_password(input)).await.map(|_| ())
    }

    async fn delete(&self, key: &String) -> Result<(), ApiError> {
        self.api.delete(key).await
    }
}

// ============================================================================
// Audit
// ============================================================================

/// Read-only audit trail; a username filter narrows it to one user
pub struct AuditSource {
    api: AuditApi,
}

impl AuditSource {
    pub const FILTER_USERNAME: &'static str = "username";

    pub fn new(api: AuditApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ListSource for AuditSource {
    type Row = AuditLog;

    fn name(&self) -> &'static str {
        "audit"
    }

    async fn fetch(&self, key: &QueryKey) -> Result<Page<AuditLog>, ApiError> {
        let response = match key
            .text_filter(Self::FILTER_USERNAME)
            .map(str::trim)
            .filter(|u| !u.is_empty())
        {
            Some(username) => self.api.list_by_username(username, key.page_request()).await?,
            None => self.api.list(key.page_request()).await?,
        };
        Ok(response.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use az_common::Role;

    #[test]
    fn test_blank_password_dropped_on_edit() {
        let input = UserRequest {
            username: "ion".into(),
            password: Some(String::new()),
            enabled: Some(true),
            roles: vec![Role::Professor],
        };
        assert_eq!(without_blank_password(&input).password, None);

        let changed = UserRequest { password: Some("parola-noua".into()), ..input };
        assert_eq!(without_blank_password(&changed).password.as_deref(), Some("parola-noua"));
    }

    #[test]
    fn test_small_filter_values() {
        assert_eq!(small(Some(2)), Some(2));
        assert_eq!(small(Some(-1)), None);
        assert_eq!(small(Some(300)), None);
        assert_eq!(small(None), None);
    }
}
