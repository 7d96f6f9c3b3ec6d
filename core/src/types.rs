//! Domain DTOs for the student records API.
//!
//! # Design
//! These types mirror the mock server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.
//!
//! `Draft` is the only type that can lack an id: it is the form state of the
//! view, and its id alone decides whether a submit creates or updates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub i64);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StudentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(StudentId)
    }
}

/// A single student record returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub course: String,
}

/// Request payload for creating or replacing a student.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentInput {
    pub name: String,
    pub email: String,
    pub course: String,
}

impl From<&Student> for StudentInput {
    fn from(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            email: student.email.clone(),
            course: student.course.clone(),
        }
    }
}

/// One editable field of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Course,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Course];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Course => "course",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Field::Name),
            "email" => Ok(Field::Email),
            "course" => Ok(Field::Course),
            other => Err(format!("unknown field `{other}` (expected name, email or course)")),
        }
    }
}

/// The record bound to the form: blank in create mode, a copy of a listed
/// record in edit mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub id: Option<StudentId>,
    pub name: String,
    pub email: String,
    pub course: String,
}

impl Draft {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        *self == Self::blank()
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Course => &self.course,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Course => self.course = value,
        }
    }

    /// First field left empty, in form order.
    pub fn missing_field(&self) -> Option<Field> {
        Field::ALL.into_iter().find(|f| self.get(*f).is_empty())
    }

    pub fn to_input(&self) -> StudentInput {
        StudentInput {
            name: self.name.clone(),
            email: self.email.clone(),
            course: self.course.clone(),
        }
    }
}

impl From<&Student> for Draft {
    fn from(student: &Student) -> Self {
        Self {
            id: Some(student.id),
            name: student.name.clone(),
            email: student.email.clone(),
            course: student.course.clone(),
        }
    }
}
