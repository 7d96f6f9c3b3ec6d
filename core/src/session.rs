//! Synchronous driver that runs a `StudentView` over a `Transport`.
//!
//! Each user action executes its request, completes it on the view, and
//! follows any `Completion::Refresh` with the list fetch before returning.
//! Requests are strictly sequential.

use crate::client::StudentClient;
use crate::error::ViewError;
use crate::http::Transport;
use crate::types::{Field, StudentId};
use crate::view::{ActionKind, Completion, PendingRequest, RequestState, StudentView};

#[derive(Debug)]
pub struct Session<T> {
    view: StudentView,
    transport: T,
}

impl<T: Transport> Session<T> {
    pub fn new(client: StudentClient, transport: T) -> Self {
        Self {
            view: StudentView::new(client),
            transport,
        }
    }

    pub fn view(&self) -> &StudentView {
        &self.view
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mount the view and run the initial list fetch.
    pub fn mount(&mut self) -> RequestState {
        let pending = self.view.mount();
        self.drive(pending);
        self.view.request_state(ActionKind::Refresh)
    }

    pub fn refresh(&mut self) -> Result<RequestState, ViewError> {
        let pending = self.view.begin_refresh()?;
        self.drive(pending);
        Ok(self.view.request_state(ActionKind::Refresh))
    }

    pub fn edit(&mut self, id: StudentId) -> Result<(), ViewError> {
        self.view.edit_by_id(id)
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.view.set_field(field, value);
    }

    pub fn reset(&mut self) {
        self.view.reset();
    }

    /// Submit the draft, then resynchronize the list if the server accepted
    /// it. Returns the final state of the submit.
    pub fn submit(&mut self) -> Result<RequestState, ViewError> {
        let pending = self.view.begin_submit()?;
        self.drive(pending);
        Ok(self.view.request_state(ActionKind::Submit))
    }

    pub fn delete(&mut self, id: StudentId) -> Result<RequestState, ViewError> {
        let pending = self.view.begin_delete(id)?;
        self.drive(pending);
        Ok(self.view.request_state(ActionKind::Delete))
    }

    pub fn unmount(&mut self) {
        self.view.unmount();
    }

    pub fn into_parts(self) -> (StudentView, T) {
        (self.view, self.transport)
    }

    fn drive(&mut self, mut pending: PendingRequest) {
        loop {
            let response = self.transport.execute(&pending.request);
            match self.view.complete(pending.ticket, response) {
                Completion::Refresh(next) => pending = next,
                Completion::Done | Completion::Failed | Completion::Discarded => break,
            }
        }
    }
}
