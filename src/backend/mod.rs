pub mod api;
pub mod error;
pub mod profile;
pub mod store;
pub mod upload;

#[cfg(test)]
mod test_server;

use api::{HttpApi, ProfileApi};
use error::ProfileError;
use futures::future::{AbortHandle, Abortable, Aborted, FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use profile::{SessionRecord, SubmissionOutcome, UpdatePayload, UserProfile, ValidForm};
use std::collections::HashMap;
use std::rc::Rc;
use store::Store;
use tokio::sync::mpsc;
use upload::{CloudinaryUploader, ImageFile, ImageUploader};

use crate::config::Config;

/// Identifies one press of the submit button. Chosen by the UI, strictly increasing.
pub type SubmissionId = u64;

#[derive(Debug)]
pub enum AppCmd {
    Init,
    UpdateProfile {
        submission: SubmissionId,
        user: UserProfile,
        form: ValidForm,
        image: Option<ImageFile>,
    },
    CancelUpdate { submission: SubmissionId },
    Logout,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    SessionRestored(Option<SessionRecord>),
    /// Raw profile returned by the server.
    UserUpdated(UserProfile),
    /// Profile merged with the refreshed token.
    LoggedIn(SessionRecord),
    UpdateSucceeded { submission: SubmissionId, message: Option<String> },
    UpdateFailed { submission: SubmissionId, status: String, message: String },
    UpdateErrored { submission: SubmissionId, message: String },
    UpdateCancelled { submission: SubmissionId },
    LoggedOut,
}

type UpdateResult = (SubmissionId, Result<Result<SubmissionOutcome, ProfileError>, Aborted>);

struct InFlight {
    handle: AbortHandle,
    token: Option<String>,
}

pub struct Backend {
    api: Rc<dyn ProfileApi>,
    uploader: Rc<dyn ImageUploader>,
    store: Store,
    cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    in_flight: HashMap<SubmissionId, InFlight>,
    pending: FuturesUnordered<LocalBoxFuture<'static, UpdateResult>>,
}

impl Backend {
    pub fn new(
        api: Rc<dyn ProfileApi>,
        uploader: Rc<dyn ImageUploader>,
        store: Store,
        cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            api,
            uploader,
            store,
            cmd_rx,
            event_tx,
            in_flight: HashMap::new(),
            pending: FuturesUnordered::new(),
        }
    }

    pub async fn run(&mut self) {
        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd),
                        None => {
                            tracing::info!("Command channel closed, backend stopping");
                            break;
                        }
                    }
                }
                Some((submission, result)) = self.pending.next(), if !self.pending.is_empty() => {
                    self.finish_update(submission, result);
                }
            }
        }
    }

    fn emit(&self, event: AppEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::debug!("No UI listening for backend events");
        }
    }

    fn handle_command(&mut self, cmd: AppCmd) {
        match cmd {
            AppCmd::Init => {
                let session = match self.store.load_session().map_err(ProfileError::from) {
                    Ok(session) => session,
                    Err(e) => {
                        tracing::error!("Failed to load stored session: {}", e);
                        None
                    }
                };
                tracing::info!("Backend initialized, session present: {}", session.is_some());
                self.emit(AppEvent::SessionRestored(session));
            }
            AppCmd::UpdateProfile { submission, user, form, image } => {
                self.start_update(submission, user, form, image);
            }
            AppCmd::CancelUpdate { submission } => {
                // The aborted future still resolves and is reported from finish_update.
                if let Some(flight) = self.in_flight.get(&submission) {
                    tracing::info!("Cancelling submission {}", submission);
                    flight.handle.abort();
                }
            }
            AppCmd::Logout => {
                for flight in self.in_flight.values() {
                    flight.handle.abort();
                }
                if let Err(e) = self.store.clear_session().map_err(ProfileError::from) {
                    tracing::error!("Failed to clear stored session: {}", e);
                }
                self.emit(AppEvent::LoggedOut);
            }
        }
    }

    fn start_update(
        &mut self,
        submission: SubmissionId,
        user: UserProfile,
        form: ValidForm,
        image: Option<ImageFile>,
    ) {
        if self.in_flight.contains_key(&submission) {
            tracing::warn!("Submission {} already in flight, ignoring", submission);
            return;
        }

        let (handle, registration) = AbortHandle::new_pair();
        let token = user.token.clone();
        let update = Abortable::new(
            submit_update(self.api.clone(), self.uploader.clone(), user, form, image),
            registration,
        );
        self.in_flight.insert(submission, InFlight { handle, token });
        self.pending.push(async move { (submission, update.await) }.boxed_local());
    }

    fn finish_update(
        &mut self,
        submission: SubmissionId,
        result: Result<Result<SubmissionOutcome, ProfileError>, Aborted>,
    ) {
        let previous_token = self.in_flight.remove(&submission).and_then(|f| f.token);

        let event = match result {
            Err(Aborted) => {
                tracing::info!("Submission {} cancelled before completion", submission);
                AppEvent::UpdateCancelled { submission }
            }
            Ok(Err(e)) => {
                tracing::error!("Error: {}", e);
                AppEvent::UpdateErrored { submission, message: e.to_string() }
            }
            Ok(Ok(SubmissionOutcome::Failed { status, message })) => {
                tracing::warn!("Profile update rejected ({}): {}", status, message);
                AppEvent::UpdateFailed { submission, status, message }
            }
            Ok(Ok(SubmissionOutcome::Success { user, token, message })) => {
                let record = SessionRecord::merge(user.clone(), token.or(previous_token));
                if record.token().is_none() {
                    tracing::warn!("Submission {} left the session without a token", submission);
                }
                self.emit(AppEvent::UserUpdated(user));
                self.emit(AppEvent::LoggedIn(record.clone()));
                if let Err(e) = self.store.save_session(&record).map_err(ProfileError::from) {
                    tracing::error!("Failed to persist session: {}", e);
                }
                tracing::info!("Profile updated for submission {}", submission);
                AppEvent::UpdateSucceeded { submission, message }
            }
        };
        self.emit(event);
    }
}

/// Upload (if any) then update. The identifier is checked first so a broken session costs no traffic.
async fn submit_update(
    api: Rc<dyn ProfileApi>,
    uploader: Rc<dyn ImageUploader>,
    user: UserProfile,
    form: ValidForm,
    image: Option<ImageFile>,
) -> Result<SubmissionOutcome, ProfileError> {
    if user.id.is_none() {
        return Err(ProfileError::MissingIdentifier);
    }

    let uploaded = match image {
        Some(file) => Some(uploader.upload(file).await?),
        None => None,
    };

    let payload = UpdatePayload::build(form, uploaded, &user)?;
    let response = api.update_user(user.token.as_deref(), &payload).await?;
    Ok(response.into_outcome())
}

pub async fn init(
    config: Config,
    cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) {
    let store = match Store::new(&config.store_path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!("Failed to open store at {}: {:?}, session will not persist", config.store_path, e);
            match Store::new_in_memory() {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!("Failed to create in-memory store: {:?}", e);
                    return;
                }
            }
        }
    };

    let api = Rc::new(HttpApi::new(config.api_base.clone()));
    let uploader = Rc::new(CloudinaryUploader::new(config.upload_url.clone(), config.upload_preset.clone()));

    let mut backend = Backend::new(api, uploader, store, cmd_rx, event_tx);
    backend.run().await
}
