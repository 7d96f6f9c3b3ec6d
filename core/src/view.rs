//! View controller for the student form and list.
//!
//! # Design
//! `StudentView` owns the whole view state: the list last fetched from the
//! server, the draft bound to the form, the error banner, and one request
//! state per action. It follows the same host-does-IO split as
//! `StudentClient`: `begin_*` methods return a `PendingRequest` and the host
//! hands the response back through `complete`.
//!
//! Invariants:
//! - The list is only ever replaced wholesale by a list response; mutations
//!   never patch it locally. A successful mutation completes with
//!   `Completion::Refresh` carrying the follow-up list request.
//! - Only the newest refresh ticket is applied; older list responses are
//!   discarded.
//! - Every ticket is stamped with the view's lifetime epoch. `unmount`
//!   advances the epoch, so responses to requests issued before teardown are
//!   dropped instead of mutating state.
//! - At most one submit and one delete are pending at a time.

use std::fmt;

use tracing::{debug, error};

use crate::client::StudentClient;
use crate::error::{ApiError, ViewError};
use crate::http::{HttpRequest, HttpResponse, TransportError};
use crate::types::{Draft, Field, Student, StudentId};

const CREATE_FALLBACK: &str = "Error adding student.";
const UPDATE_FALLBACK: &str = "Error updating student.";

/// Whether a submit will create a record or update the one being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit(StudentId),
}

impl Mode {
    pub fn submit_label(self) -> &'static str {
        match self {
            Mode::Create => "Add Student",
            Mode::Edit(_) => "Update Student",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// The three kinds of request a view issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Refresh,
    Submit,
    Delete,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionKind::Refresh => "refresh",
            ActionKind::Submit => "submit",
            ActionKind::Delete => "delete",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Refresh,
    Submit(Mode),
    Delete(StudentId),
}

impl Action {
    fn kind(self) -> ActionKind {
        match self {
            Action::Refresh => ActionKind::Refresh,
            Action::Submit(_) => ActionKind::Submit,
            Action::Delete(_) => ActionKind::Delete,
        }
    }
}

/// Ties a response back to the action and view lifetime that issued it.
///
/// Deliberately not `Clone`: a ticket is spent by `StudentView::complete`.
#[derive(Debug, PartialEq, Eq)]
pub struct Ticket {
    action: Action,
    seq: u64,
    epoch: u64,
}

impl Ticket {
    pub fn kind(&self) -> ActionKind {
        self.action.kind()
    }
}

/// A request the host must execute, and the ticket to complete it with.
#[derive(Debug)]
pub struct PendingRequest {
    pub ticket: Ticket,
    pub request: HttpRequest,
}

/// What happened when a response was handed back to the view.
#[derive(Debug)]
pub enum Completion {
    /// The mutation succeeded; execute this list request to resynchronize.
    Refresh(PendingRequest),
    /// The response was applied and nothing further is needed.
    Done,
    /// The request failed; the view's state records the failure.
    Failed,
    /// The response was stale (superseded or issued before teardown) and was
    /// ignored.
    Discarded,
}

#[derive(Debug)]
pub struct StudentView {
    client: StudentClient,
    students: Vec<Student>,
    draft: Draft,
    error_message: Option<String>,
    refresh_state: RequestState,
    submit_state: RequestState,
    delete_state: RequestState,
    latest_refresh: Option<u64>,
    next_seq: u64,
    epoch: u64,
    mounted: bool,
}

impl StudentView {
    pub fn new(client: StudentClient) -> Self {
        Self {
            client,
            students: Vec::new(),
            draft: Draft::blank(),
            error_message: None,
            refresh_state: RequestState::Idle,
            submit_state: RequestState::Idle,
            delete_state: RequestState::Idle,
            latest_refresh: None,
            next_seq: 0,
            epoch: 0,
            mounted: false,
        }
    }

    // --- state accessors ---

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn mode(&self) -> Mode {
        match self.draft.id {
            Some(id) => Mode::Edit(id),
            None => Mode::Create,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn request_state(&self, kind: ActionKind) -> RequestState {
        match kind {
            ActionKind::Refresh => self.refresh_state,
            ActionKind::Submit => self.submit_state,
            ActionKind::Delete => self.delete_state,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // --- lifetime ---

    /// Enter create mode with a blank draft and start the initial list fetch.
    pub fn mount(&mut self) -> PendingRequest {
        self.mounted = true;
        self.draft = Draft::blank();
        self.error_message = None;
        self.issue_refresh()
    }

    /// Tear the view down. Responses to requests issued before this call
    /// are discarded when completed.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.epoch += 1;
        self.latest_refresh = None;
        self.refresh_state = RequestState::Idle;
        self.submit_state = RequestState::Idle;
        self.delete_state = RequestState::Idle;
    }

    // --- local edits ---

    /// Put `student` in the form and switch to edit mode.
    pub fn edit(&mut self, student: &Student) {
        self.draft = Draft::from(student);
    }

    /// Edit the listed student with `id`.
    pub fn edit_by_id(&mut self, id: StudentId) -> Result<(), ViewError> {
        let student = self
            .students
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(ViewError::UnknownStudent(id))?;
        self.edit(&student);
        Ok(())
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value.into());
    }

    /// Blank the form and return to create mode.
    pub fn reset(&mut self) {
        self.draft = Draft::blank();
    }

    // --- requests ---

    pub fn begin_refresh(&mut self) -> Result<PendingRequest, ViewError> {
        self.ensure_mounted()?;
        Ok(self.issue_refresh())
    }

    /// Create or update depending on the draft's id.
    pub fn begin_submit(&mut self) -> Result<PendingRequest, ViewError> {
        self.ensure_mounted()?;
        if self.submit_state == RequestState::Pending {
            return Err(ViewError::InFlight(ActionKind::Submit));
        }
        if let Some(field) = self.draft.missing_field() {
            return Err(ViewError::MissingField(field));
        }

        let mode = self.mode();
        let input = self.draft.to_input();
        let request = match mode {
            Mode::Create => self.client.build_create_student(&input),
            Mode::Edit(id) => self.client.build_update_student(id, &input),
        }
        .map_err(|e| ViewError::Request(e.to_string()))?;

        self.error_message = None;
        self.submit_state = RequestState::Pending;
        Ok(self.issue(Action::Submit(mode), request))
    }

    pub fn begin_delete(&mut self, id: StudentId) -> Result<PendingRequest, ViewError> {
        self.ensure_mounted()?;
        if self.delete_state == RequestState::Pending {
            return Err(ViewError::InFlight(ActionKind::Delete));
        }
        let request = self.client.build_delete_student(id);
        self.delete_state = RequestState::Pending;
        Ok(self.issue(Action::Delete(id), request))
    }

    /// Apply the outcome of the request identified by `ticket`.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        response: Result<HttpResponse, TransportError>,
    ) -> Completion {
        if !self.mounted || ticket.epoch != self.epoch {
            debug!(action = %ticket.kind(), "discarding response for a torn-down view");
            return Completion::Discarded;
        }
        let response = response.map_err(ApiError::from);
        match ticket.action {
            Action::Refresh => self.complete_refresh(ticket.seq, response),
            Action::Submit(mode) => self.complete_submit(mode, response),
            Action::Delete(id) => self.complete_delete(id, response),
        }
    }

    fn complete_refresh(&mut self, seq: u64, response: Result<HttpResponse, ApiError>) -> Completion {
        if self.latest_refresh != Some(seq) {
            debug!(seq, "discarding superseded list response");
            return Completion::Discarded;
        }
        self.latest_refresh = None;
        match response.and_then(|r| self.client.parse_list_students(r)) {
            Ok(students) => {
                self.students = students;
                self.refresh_state = RequestState::Succeeded;
                Completion::Done
            }
            Err(err) => {
                error!("error fetching students: {err}");
                self.refresh_state = RequestState::Failed;
                Completion::Failed
            }
        }
    }

    fn complete_submit(&mut self, mode: Mode, response: Result<HttpResponse, ApiError>) -> Completion {
        let result = response.and_then(|r| match mode {
            Mode::Create => self.client.parse_create_student(r),
            Mode::Edit(_) => self.client.parse_update_student(r),
        });
        match result {
            Ok(student) => {
                debug!(id = %student.id, ?mode, "submit succeeded");
                self.draft = Draft::blank();
                self.submit_state = RequestState::Succeeded;
                Completion::Refresh(self.issue_refresh())
            }
            Err(err) => {
                let fallback = match mode {
                    Mode::Create => CREATE_FALLBACK,
                    Mode::Edit(_) => UPDATE_FALLBACK,
                };
                error!(?mode, "error submitting student: {err}");
                self.error_message = Some(err.server_message().unwrap_or_else(|| fallback.to_string()));
                self.submit_state = RequestState::Failed;
                Completion::Failed
            }
        }
    }

    fn complete_delete(&mut self, id: StudentId, response: Result<HttpResponse, ApiError>) -> Completion {
        match response.and_then(|r| self.client.parse_delete_student(r)) {
            Ok(()) => {
                self.delete_state = RequestState::Succeeded;
                Completion::Refresh(self.issue_refresh())
            }
            Err(err) => {
                error!(%id, "error deleting student: {err}");
                self.delete_state = RequestState::Failed;
                Completion::Failed
            }
        }
    }

    fn ensure_mounted(&self) -> Result<(), ViewError> {
        if self.mounted {
            Ok(())
        } else {
            Err(ViewError::Unmounted)
        }
    }

    fn issue_refresh(&mut self) -> PendingRequest {
        let request = self.client.build_list_students();
        self.refresh_state = RequestState::Pending;
        let pending = self.issue(Action::Refresh, request);
        self.latest_refresh = Some(pending.ticket.seq);
        pending
    }

    fn issue(&mut self, action: Action, request: HttpRequest) -> PendingRequest {
        let seq = self.next_seq;
        self.next_seq += 1;
        PendingRequest {
            ticket: Ticket {
                action,
                seq,
                epoch: self.epoch,
            },
            request,
        }
    }
}
