// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::OffsetDateTime;

use crate::{
    BackendUnreachable, FormField, FormState, Outcome, PredictRequest, RequestId, ResultPayload,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Recommend,
}

/// What the result area shows. A result and an error can never be shown
/// together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Idle,
    Success(ResultPayload),
    Failure(BackendUnreachable),
}

impl ViewState {
    pub fn result(&self) -> Option<&ResultPayload> {
        match self {
            Self::Success(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<BackendUnreachable> {
        match self {
            Self::Failure(error) => Some(*error),
            _ => None,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Success(_) => "success",
            Self::Failure(_) => "failure",
        }
    }
}

impl From<Outcome> for ViewState {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Ok(payload) => Self::Success(payload),
            Err(error) => Self::Failure(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub screen: Screen,
    pub form: FormState,
    pub focus: FormField,
    pub view: ViewState,
    /// Id of the newest submission still waiting for its response.
    pub pending: Option<RequestId>,
    pub next_request: RequestId,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            screen: Screen::Home,
            form: FormState::default(),
            focus: FormField::Symptoms,
            view: ViewState::Idle,
            pending: None,
            next_request: RequestId::FIRST,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    OpenForm,
    NavigateBack,
    FocusNext,
    FocusPrev,
    Insert(char),
    Backspace,
    Submit,
    Resolve {
        request_id: RequestId,
        outcome: Outcome,
        at: OffsetDateTime,
    },
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ScreenChanged(Screen),
    NavigatedBack,
    FocusChanged(FormField),
    FieldEdited(FormField),
    ViewCleared,
    SubmitRequested {
        request_id: RequestId,
        request: PredictRequest,
    },
    SubmitRejected(String),
    ViewResolved {
        request_id: RequestId,
        succeeded: bool,
    },
    StaleResponseDiscarded {
        request_id: RequestId,
        pending: Option<RequestId>,
    },
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::OpenForm => {
                self.screen = Screen::Recommend;
                vec![AppEvent::ScreenChanged(self.screen)]
            }
            AppCommand::NavigateBack => {
                self.screen = Screen::Home;
                vec![AppEvent::ScreenChanged(self.screen), AppEvent::NavigatedBack]
            }
            AppCommand::FocusNext => self.rotate_focus(1),
            AppCommand::FocusPrev => self.rotate_focus(-1),
            AppCommand::Insert(ch) => {
                self.form.insert_char(self.focus, ch);
                vec![AppEvent::FieldEdited(self.focus)]
            }
            AppCommand::Backspace => {
                if self.form.delete_char(self.focus) {
                    vec![AppEvent::FieldEdited(self.focus)]
                } else {
                    Vec::new()
                }
            }
            AppCommand::Submit => self.submit(),
            AppCommand::Resolve {
                request_id,
                outcome,
                at,
            } => self.resolve(request_id, outcome, at),
            AppCommand::SetStatus(message) => vec![self.set_status(message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_focus(&mut self, delta: isize) -> Vec<AppEvent> {
        self.focus = self.focus.rotate(delta);
        vec![AppEvent::FocusChanged(self.focus)]
    }

    fn submit(&mut self) -> Vec<AppEvent> {
        if let Err(error) = self.form.validate() {
            let message = error.to_string();
            return vec![
                AppEvent::SubmitRejected(message.clone()),
                self.set_status(message),
            ];
        }

        // Cleared before the request goes out so a stale result or error is
        // never shown next to a newer submission.
        self.view = ViewState::Idle;
        let request_id = self.next_request;
        self.next_request = request_id.next();
        self.pending = Some(request_id);

        vec![
            AppEvent::ViewCleared,
            AppEvent::SubmitRequested {
                request_id,
                request: self.form.to_request(),
            },
            self.set_status(format!("request {request_id} sent")),
        ]
    }

    fn resolve(
        &mut self,
        request_id: RequestId,
        outcome: Outcome,
        at: OffsetDateTime,
    ) -> Vec<AppEvent> {
        if self.pending != Some(request_id) {
            return vec![AppEvent::StaleResponseDiscarded {
                request_id,
                pending: self.pending,
            }];
        }

        self.pending = None;
        let succeeded = outcome.is_ok();
        self.view = ViewState::from(outcome);
        let verb = if succeeded { "answered" } else { "failed" };
        vec![
            AppEvent::ViewResolved {
                request_id,
                succeeded,
            },
            self.set_status(format!("request {request_id} {verb} at {}", format_clock(at))),
        ]
    }

    fn set_status(&mut self, message: impl Into<String>) -> AppEvent {
        let message = message.into();
        self.status_line = Some(message.clone());
        AppEvent::StatusUpdated(message)
    }
}

fn format_clock(at: OffsetDateTime) -> String {
    at.format(&time::macros::format_description!(
        "[hour]:[minute]:[second] UTC"
    ))
    .unwrap_or_else(|_| at.time().to_string())
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState, Screen, ViewState};
    use crate::{BackendUnreachable, FormField, FormState, RequestId, ResultPayload};
    use time::OffsetDateTime;

    fn filled_state() -> AppState {
        AppState {
            screen: Screen::Recommend,
            form: FormState {
                symptoms: "fever, cough".to_owned(),
                pincode: "560001".to_owned(),
            },
            ..AppState::default()
        }
    }

    fn sample_payload() -> ResultPayload {
        ResultPayload {
            disease: Some("Common Cold".to_owned()),
            ..ResultPayload::default()
        }
    }

    fn resolve(request_id: RequestId, outcome: crate::Outcome) -> AppCommand {
        AppCommand::Resolve {
            request_id,
            outcome,
            at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn submit_clears_prior_result_synchronously() {
        let mut state = filled_state();
        state.view = ViewState::Success(sample_payload());

        let events = state.dispatch(AppCommand::Submit);
        assert_eq!(state.view, ViewState::Idle);
        assert_eq!(events[0], AppEvent::ViewCleared);
        assert_eq!(
            events[1],
            AppEvent::SubmitRequested {
                request_id: RequestId::FIRST,
                request: state.form.to_request(),
            }
        );
        assert_eq!(state.pending, Some(RequestId::FIRST));
    }

    #[test]
    fn submit_clears_prior_error_synchronously() {
        let mut state = filled_state();
        state.view = ViewState::Failure(BackendUnreachable);

        state.dispatch(AppCommand::Submit);
        assert!(state.view.error().is_none());
        assert!(state.view.result().is_none());
    }

    #[test]
    fn submit_with_missing_field_sends_nothing() {
        let mut state = AppState::default();
        state.view = ViewState::Success(sample_payload());

        let events = state.dispatch(AppCommand::Submit);
        assert!(matches!(events[0], AppEvent::SubmitRejected(_)));
        assert!(
            !events
                .iter()
                .any(|event| matches!(event, AppEvent::SubmitRequested { .. }))
        );
        assert_eq!(state.pending, None);
        assert_eq!(state.view, ViewState::Success(sample_payload()));
    }

    #[test]
    fn failure_shows_error_without_result() {
        let mut state = filled_state();
        state.dispatch(AppCommand::Submit);

        let events = state.dispatch(resolve(RequestId::FIRST, Err(BackendUnreachable)));
        assert_eq!(state.view, ViewState::Failure(BackendUnreachable));
        assert!(state.view.result().is_none());
        assert_eq!(
            events[0],
            AppEvent::ViewResolved {
                request_id: RequestId::FIRST,
                succeeded: false,
            }
        );
        assert_eq!(state.pending, None);
    }

    #[test]
    fn success_shows_result_without_error() {
        let mut state = filled_state();
        state.dispatch(AppCommand::Submit);
        state.dispatch(resolve(RequestId::FIRST, Ok(sample_payload())));

        assert_eq!(state.view.result(), Some(&sample_payload()));
        assert!(state.view.error().is_none());
        assert_eq!(
            state.status_line.as_deref(),
            Some("request #1 answered at 00:00:00 UTC")
        );
    }

    #[test]
    fn response_for_superseded_request_is_discarded() {
        let mut state = filled_state();
        state.dispatch(AppCommand::Submit);
        state.dispatch(AppCommand::Submit);
        let second = RequestId::FIRST.next();

        state.dispatch(resolve(second, Ok(sample_payload())));
        let events = state.dispatch(resolve(RequestId::FIRST, Err(BackendUnreachable)));

        assert_eq!(
            events,
            vec![AppEvent::StaleResponseDiscarded {
                request_id: RequestId::FIRST,
                pending: None,
            }]
        );
        assert_eq!(state.view, ViewState::Success(sample_payload()));
    }

    #[test]
    fn stale_response_does_not_end_the_wait_for_newer_one() {
        let mut state = filled_state();
        state.dispatch(AppCommand::Submit);
        state.dispatch(AppCommand::Submit);
        let second = RequestId::FIRST.next();

        state.dispatch(resolve(RequestId::FIRST, Ok(sample_payload())));
        assert_eq!(state.view, ViewState::Idle);
        assert_eq!(state.pending, Some(second));
    }

    #[test]
    fn form_stays_editable_while_request_is_pending() {
        let mut state = filled_state();
        state.dispatch(AppCommand::Submit);

        state.dispatch(AppCommand::FocusNext);
        assert_eq!(state.focus, FormField::Pincode);
        let events = state.dispatch(AppCommand::Insert('9'));
        assert_eq!(events, vec![AppEvent::FieldEdited(FormField::Pincode)]);
        assert_eq!(state.form.pincode, "5600019");
    }

    #[test]
    fn backspace_on_empty_field_emits_nothing() {
        let mut state = AppState::default();
        assert!(state.dispatch(AppCommand::Backspace).is_empty());
    }

    #[test]
    fn navigate_back_returns_home_and_keeps_state() {
        let mut state = filled_state();
        state.dispatch(AppCommand::Submit);
        state.dispatch(resolve(RequestId::FIRST, Ok(sample_payload())));

        let events = state.dispatch(AppCommand::NavigateBack);
        assert_eq!(state.screen, Screen::Home);
        assert_eq!(
            events,
            vec![AppEvent::ScreenChanged(Screen::Home), AppEvent::NavigatedBack]
        );
        assert_eq!(state.form.pincode, "560001");
        assert_eq!(state.view.label(), "success");

        state.dispatch(AppCommand::OpenForm);
        assert_eq!(state.screen, Screen::Recommend);
    }

    #[test]
    fn clear_status_removes_line() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::SetStatus("hello".to_owned()));
        assert_eq!(state.status_line.as_deref(), Some("hello"));
        let events = state.dispatch(AppCommand::ClearStatus);
        assert_eq!(events, vec![AppEvent::StatusCleared]);
        assert!(state.status_line.is_none());
    }
}
