pub mod common;
pub mod nav_bar;
pub mod profile_form;
pub mod profile_page;

use dioxus::prelude::*;
use crate::backend::profile::{SessionRecord, UserProfile};
use crate::backend::{AppEvent, SubmissionId};

/// Where the edit modal's current submission stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting(SubmissionId),
    Failed { status: String, message: String },
    Succeeded(Option<String>),
}

impl SubmissionState {
    pub fn submitting(&self) -> Option<SubmissionId> {
        match self {
            SubmissionState::Submitting(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.submitting().is_some()
    }

    /// Next state for `event`, or `None` if the event belongs to a submission nobody is waiting on.
    pub fn after(&self, event: &AppEvent) -> Option<SubmissionState> {
        let current = self.submitting()?;
        match event {
            AppEvent::UpdateSucceeded { submission, message } if *submission == current => {
                Some(SubmissionState::Succeeded(message.clone()))
            }
            AppEvent::UpdateFailed { submission, status, message } if *submission == current => {
                Some(SubmissionState::Failed { status: status.clone(), message: message.clone() })
            }
            // Already logged by the backend; the form just stops loading.
            AppEvent::UpdateErrored { submission, .. } if *submission == current => Some(SubmissionState::Idle),
            AppEvent::UpdateCancelled { submission } if *submission == current => Some(SubmissionState::Idle),
            _ => None,
        }
    }
}

#[derive(Clone, Copy)]
pub struct AppState {
    pub user: Signal<Option<UserProfile>>,
    pub session: Signal<Option<SessionRecord>>,
    pub restored: Signal<bool>,
    pub submission: Signal<SubmissionState>,
    pub last_submission: Signal<SubmissionId>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            user: use_signal(|| None),
            session: use_signal(|| None),
            restored: use_signal(|| false),
            submission: use_signal(SubmissionState::default),
            last_submission: use_signal(|| 0),
        }
    }

    /// Applies a backend event. The only place backend results reach the signals.
    pub fn apply(&mut self, event: AppEvent) {
        let next = self.submission.peek().after(&event);
        if let Some(next) = next {
            self.submission.set(next);
        }

        match event {
            AppEvent::SessionRestored(session) => {
                self.user.set(session.as_ref().map(|s| s.user().clone()));
                self.session.set(session);
                self.restored.set(true);
            }
            AppEvent::UserUpdated(user) => self.user.set(Some(user)),
            AppEvent::LoggedIn(session) => {
                self.user.set(Some(session.user().clone()));
                self.session.set(Some(session));
            }
            AppEvent::LoggedOut => {
                self.user.set(None);
                self.session.set(None);
                self.submission.set(SubmissionState::Idle);
            }
            _ => {}
        }
    }

    pub fn begin_submission(&mut self) -> SubmissionId {
        let id = *self.last_submission.peek() + 1;
        self.last_submission.set(id);
        self.submission.set(SubmissionState::Submitting(id));
        id
    }
}

/// Full reload so every page re-reads the stored session. No-op off the web, where the signals already hold it.
pub fn reload_page() {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            if window.location().reload().is_err() {
                tracing::warn!("Page reload was refused");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_outcomes_end_the_submission() {
        let state = SubmissionState::Submitting(3);

        let ok = AppEvent::UpdateSucceeded { submission: 3, message: Some("done".into()) };
        assert_eq!(state.after(&ok), Some(SubmissionState::Succeeded(Some("done".into()))));

        let failed = AppEvent::UpdateFailed { submission: 3, status: "failed".into(), message: "X".into() };
        assert_eq!(
            state.after(&failed),
            Some(SubmissionState::Failed { status: "failed".into(), message: "X".into() })
        );

        let errored = AppEvent::UpdateErrored { submission: 3, message: "User _id is undefined".into() };
        assert_eq!(state.after(&errored), Some(SubmissionState::Idle));
        assert!(!state.after(&errored).unwrap().is_loading());
    }

    #[test]
    fn test_stale_submissions_are_ignored() {
        let state = SubmissionState::Submitting(4);
        let old = AppEvent::UpdateSucceeded { submission: 3, message: None };
        assert_eq!(state.after(&old), None);

        // Modal was closed: nothing is being waited on.
        let late = AppEvent::UpdateSucceeded { submission: 4, message: None };
        assert_eq!(SubmissionState::Idle.after(&late), None);
    }

    #[test]
    fn test_session_events_do_not_touch_submission() {
        let state = SubmissionState::Submitting(1);
        assert_eq!(state.after(&AppEvent::UserUpdated(UserProfile::default())), None);
        assert_eq!(state.after(&AppEvent::SessionRestored(None)), None);
        assert!(state.is_loading());
        assert_eq!(state.submitting(), Some(1));
    }
}
