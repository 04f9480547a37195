//! Per-entity constraint tables

use crate::model::{
    AttendanceRequest, AttendanceStatus, CourseRequest, EnrollmentRequest, LoginForm,
    StudentRequest, UserRequest,
};
use crate::validation::{FieldConstraint, FieldValue, FormKind, Rule, Validate, ValidationContext};

fn text(value: &str) -> FieldValue<'_> {
    FieldValue::Text(value)
}

fn opt_text(value: &Option<String>) -> FieldValue<'_> {
    value.as_deref().map(FieldValue::Text).unwrap_or(FieldValue::Missing)
}

/// Ids of picked records; zero means nothing was picked
fn id(value: i64) -> FieldValue<'static> {
    if value > 0 {
        FieldValue::Integer(value)
    } else {
        FieldValue::Missing
    }
}

impl Validate for StudentRequest {
    fn constraints(ctx: &ValidationContext) -> Vec<FieldConstraint> {
        let mut table = vec![
            FieldConstraint::required("nume", Rule::Length { min: 2, max: 100 }, "Numele trebuie să aibă între 2 și 100 caractere"),
            FieldConstraint::required("prenume", Rule::Length { min: 2, max: 100 }, "Prenumele trebuie să aibă între 2 și 100 caractere"),
            FieldConstraint::required("email", Rule::Email, "Email invalid"),
        ];
        // Strict mode makes the phone mandatory as well as ten digits
        if ctx.strict_phone {
            table.push(FieldConstraint::required(
                "telefon",
                Rule::Digits { len: 10 },
                "Telefonul trebuie să aibă exact 10 cifre",
            ));
        }
        table.push(FieldConstraint::optional(
            "telefon",
            Rule::Length { min: 0, max: 20 },
            "Telefonul nu poate depăși 20 caractere",
        ));
        table.push(FieldConstraint::required(
            "anStudiu",
            Rule::IntRange { min: 1, max: 6 },
            "Anul de studiu trebuie să fie între 1 și 6",
        ));
        table
    }

    fn field(&self, field: &str) -> FieldValue<'_> {
        match field {
            "nume" => text(&self.nume),
            "prenume" => text(&self.prenume),
            "email" => text(&self.email),
            "telefon" => opt_text(&self.telefon),
            "anStudiu" => FieldValue::Integer(self.an_studiu as i64),
            _ => FieldValue::Missing,
        }
    }
}

impl Validate for CourseRequest {
    fn constraints(_ctx: &ValidationContext) -> Vec<FieldConstraint> {
        vec![
            FieldConstraint::required("denumire", Rule::Length { min: 3, max: 255 }, "Denumirea trebuie să aibă între 3 și 255 caractere"),
            FieldConstraint::required("profesorTitular", Rule::Length { min: 3, max: 255 }, "Numele profesorului trebuie să aibă între 3 și 255 caractere"),
            FieldConstraint::required("nrCredite", Rule::IntRange { min: 1, max: 30 }, "Numărul de credite trebuie să fie între 1 și 30"),
            FieldConstraint::required("semester", Rule::IntRange { min: 1, max: 2 }, "Semestrul trebuie să fie 1 sau 2"),
        ]
    }

    fn field(&self, field: &str) -> FieldValue<'_> {
        match field {
            "denumire" => text(&self.denumire),
            "profesorTitular" => text(&self.profesor_titular),
            "nrCredite" => FieldValue::Integer(self.nr_credite as i64),
            "semester" => FieldValue::Integer(self.semester as i64),
            _ => FieldValue::Missing,
        }
    }
}

impl Validate for EnrollmentRequest {
    fn constraints(_ctx: &ValidationContext) -> Vec<FieldConstraint> {
        vec![
            FieldConstraint::required("studentId", Rule::Present, "Selectați un student"),
            FieldConstraint::required("courseId", Rule::Present, "Selectați un curs"),
            FieldConstraint::optional("notaFinala", Rule::DecimalRange { min: 1.0, max: 10.0 }, "Nota trebuie să fie între 1 și 10"),
        ]
    }

    fn field(&self, field: &str) -> FieldValue<'_> {
        match field {
            "studentId" => id(self.student_id),
            "courseId" => id(self.course_id),
            "notaFinala" => self.nota_finala.map(FieldValue::Decimal).unwrap_or(FieldValue::Missing),
            _ => FieldValue::Missing,
        }
    }
}

impl Validate for AttendanceRequest {
    fn constraints(_ctx: &ValidationContext) -> Vec<FieldConstraint> {
        vec![
            FieldConstraint::required("studentId", Rule::Present, "Selectați un student"),
            FieldConstraint::required("courseId", Rule::Present, "Selectați un curs"),
            FieldConstraint::required("data", Rule::Present, "Data este obligatorie"),
            FieldConstraint::required("semester", Rule::IntRange { min: 1, max: 2 }, "Semestrul trebuie să fie 1 sau 2"),
            FieldConstraint::required("status", Rule::OneOf(&AttendanceStatus::VALUES), "Statusul trebuie să fie: prezent, absent sau motivat"),
        ]
    }

    fn field(&self, field: &str) -> FieldValue<'_> {
        match field {
            "studentId" => id(self.student_id),
            "courseId" => id(self.course_id),
            "data" => FieldValue::Date(self.data),
            "semester" => FieldValue::Integer(self.semester as i64),
            "status" => FieldValue::Text(self.status.as_str()),
            _ => FieldValue::Missing,
        }
    }
}

impl Validate for UserRequest {
    fn constraints(ctx: &ValidationContext) -> Vec<FieldConstraint> {
        let password = if ctx.kind == FormKind::Create {
            FieldConstraint::required("password", Rule::Length { min: 6, max: usize::MAX }, "Parola trebuie să aibă minim 6 caractere")
        } else {
            FieldConstraint::optional("password", Rule::Length { min: 6, max: usize::MAX }, "Parola trebuie să aibă minim 6 caractere")
        };
        vec![
            FieldConstraint::required("username", Rule::Length { min: 3, max: 50 }, "Username-ul trebuie să aibă între 3 și 50 caractere"),
            password,
            FieldConstraint::required("roles", Rule::MinItems(1), "Cel puțin un rol este obligatoriu"),
        ]
    }

    fn field(&self, field: &str) -> FieldValue<'_> {
        match field {
            "username" => text(&self.username),
            "password" => opt_text(&self.password),
            "roles" => FieldValue::List(self.roles.len()),
            _ => FieldValue::Missing,
        }
    }
}

impl Validate for LoginForm {
    fn constraints(_ctx: &ValidationContext) -> Vec<FieldConstraint> {
        vec![
            FieldConstraint::required("username", Rule::Present, "Username-ul este obligatoriu"),
            FieldConstraint::required("password", Rule::Present, "Parola este obligatorie"),
        ]
    }

    fn field(&self, field: &str) -> FieldValue<'_> {
        match field {
            "username" => text(&self.username),
            "password" => text(&self.password),
            _ => FieldValue::Missing,
        }
    }
}
