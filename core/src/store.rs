//! The four record-store operations over a caller-supplied transport.

use tracing::debug;

use crate::client::StudentClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{Student, StudentId, StudentInput};

/// `StudentClient` bound to a `Transport`.
///
/// No retries, no batching: each call is exactly one round-trip.
#[derive(Debug)]
pub struct RecordStore<T> {
    client: StudentClient,
    transport: T,
}

impl<T: Transport> RecordStore<T> {
    pub fn new(client: StudentClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &StudentClient {
        &self.client
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    pub fn list_students(&mut self) -> Result<Vec<Student>, ApiError> {
        let request = self.client.build_list_students();
        let response = self.transport.execute(&request)?;
        let students = self.client.parse_list_students(response)?;
        debug!(count = students.len(), "listed students");
        Ok(students)
    }

    pub fn create_student(&mut self, input: &StudentInput) -> Result<Student, ApiError> {
        let request = self.client.build_create_student(input)?;
        let response = self.transport.execute(&request)?;
        let student = self.client.parse_create_student(response)?;
        debug!(id = %student.id, "created student");
        Ok(student)
    }

    pub fn update_student(
        &mut self,
        id: StudentId,
        input: &StudentInput,
    ) -> Result<Student, ApiError> {
        let request = self.client.build_update_student(id, input)?;
        let response = self.transport.execute(&request)?;
        self.client.parse_update_student(response)
    }

    pub fn delete_student(&mut self, id: StudentId) -> Result<(), ApiError> {
        let request = self.client.build_delete_student(id);
        let response = self.transport.execute(&request)?;
        self.client.parse_delete_student(response)
    }
}
