use dioxus::prelude::*;
use dioxus::core::Task;
use crate::backend::AppCmd;
use crate::backend::profile::{FieldErrors, FormField, ProfileForm};
use crate::backend::upload::ImageFile;
use crate::components::common::{CustomButton, Loading, Modal, TextInput};
use crate::components::{reload_page, AppState, SubmissionState};
use crate::config::Config;

const FILE_INPUT_ID: &str = "profile-image-input";

/// The one task reading the file picker. The input remounts on every open, so the old reader is dropped first.
#[derive(Clone, Copy)]
struct FileWatch {
    task: Signal<Option<Task>>,
}

impl FileWatch {
    fn replace(mut self, next: Task) {
        if let Some(old) = self.task.write().replace(next) {
            old.cancel();
        }
    }

    fn stop(mut self) {
        if let Some(old) = self.task.write().take() {
            old.cancel();
        }
    }
}

/// One validated text field bound to the form signals.
#[component]
fn FieldInput(field: FormField, form: Signal<ProfileForm>, errors: Signal<FieldErrors>) -> Element {
    let value = form.read().value(field).to_string();
    let error = errors.read().get(field).unwrap_or_default().to_string();

    rsx! {
        TextInput {
            name: format!("{:?}", field),
            label: field.label().to_string(),
            placeholder: field.placeholder().to_string(),
            value,
            error,
            multiline: field == FormField::About,
            oninput: move |v: String| {
                let mut form = form;
                let mut errors = errors;
                form.write().set(field, v);
                let msg = form.read().validate_field(field);
                errors.write().set(field, msg);
            },
        }
    }
}

#[component]
pub fn ProfileEditForm(open: Signal<bool>) -> Element {
    let mut app_state = use_context::<AppState>();
    let cmd_tx = use_context::<tokio::sync::mpsc::UnboundedSender<AppCmd>>();
    let config = use_context::<Config>();
    let mut open = open;

    let mut form = use_signal(ProfileForm::default);
    let mut errors = use_signal(FieldErrors::default);
    let mut image = use_signal(|| None::<ImageFile>);
    let mut was_open = use_signal(|| false);
    let file_watch = FileWatch { task: use_signal(|| None) };

    // Seed a fresh copy of the profile every time the modal opens
    let is_open = open();
    if is_open != *was_open.peek() {
        was_open.set(is_open);
        if is_open {
            let user = app_state.user.peek().clone().unwrap_or_default();
            form.set(ProfileForm::from_profile(&user));
            errors.set(FieldErrors::default());
            image.set(None);
            app_state.submission.set(SubmissionState::Idle);
        } else {
            file_watch.stop();
        }
    }

    // After a successful save, leave the message up briefly, then close and reload.
    let reload_delay = config.reload_delay;
    use_effect(move || {
        if let SubmissionState::Succeeded(_) = &*app_state.submission.read() {
            spawn(async move {
                #[cfg(not(target_arch = "wasm32"))]
                tokio::time::sleep(reload_delay).await;
                #[cfg(target_arch = "wasm32")]
                gloo_timers::future::sleep(reload_delay).await;

                app_state.submission.set(SubmissionState::Idle);
                open.set(false);
                reload_page();
            });
        }
    });

    let cmd_tx_close = cmd_tx.clone();
    let close_modal = use_callback(move |_: ()| {
        // Whatever is still in flight belongs to edits the user just discarded.
        if let Some(submission) = app_state.submission.peek().submitting() {
            if let Err(e) = cmd_tx_close.send(AppCmd::CancelUpdate { submission }) {
                tracing::error!("Failed to send CancelUpdate command: {:?}", e);
            }
        }
        app_state.submission.set(SubmissionState::Idle);
        open.set(false);
    });

    let cmd_tx_submit = cmd_tx.clone();
    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if app_state.submission.peek().is_loading() {
            return;
        }

        let valid = match form.peek().clone().validate() {
            Ok(valid) => valid,
            Err(field_errors) => {
                tracing::debug!("Submit blocked, {} field(s) invalid", field_errors.len());
                errors.set(field_errors);
                return;
            }
        };
        errors.set(FieldErrors::default());

        let user = app_state.user.peek().clone().unwrap_or_default();
        let submission = app_state.begin_submission();
        let cmd = AppCmd::UpdateProfile {
            submission,
            user,
            form: valid,
            image: image.peek().clone(),
        };
        if let Err(e) = cmd_tx_submit.send(cmd) {
            tracing::error!("Failed to send UpdateProfile command: {:?}", e);
            app_state.submission.set(SubmissionState::Idle);
        }
    };

    // Reads the picked file in the page and hands it back as base64.
    let watch_file_input = move |_| {
        let mut eval = document::eval(&format!(
            r#"
            const input = document.getElementById('{id}');
            if (input) {{
                input.addEventListener('change', (e) => {{
                    const file = e.target.files[0];
                    if (!file) return;

                    const reader = new FileReader();
                    reader.onload = (evt) => {{
                        const b64 = evt.target.result.split(',')[1];
                        dioxus.send({{ name: file.name, mime: file.type, data: b64 }});
                    }};
                    reader.readAsDataURL(file);
                }});
            }}
            "#,
            id = FILE_INPUT_ID
        ));

        let reader = spawn(async move {
            while let Ok(msg) = eval.recv::<serde_json::Value>().await {
                let name = msg.get("name").and_then(|v| v.as_str()).unwrap_or("upload");
                let mime = msg.get("mime").and_then(|v| v.as_str()).unwrap_or_default();
                let Some(data_b64) = msg.get("data").and_then(|v| v.as_str()) else {
                    continue;
                };
                use base64::{Engine as _, engine::general_purpose::STANDARD};
                match STANDARD.decode(data_b64) {
                    Ok(bytes) => image.set(Some(ImageFile {
                        name: name.to_string(),
                        mime: mime.to_string(),
                        bytes,
                    })),
                    Err(e) => tracing::warn!("Could not decode picked file {}: {}", name, e),
                }
            }
        });
        file_watch.replace(reader);
    };

    if !is_open {
        return rsx! {};
    }

    let submission = app_state.submission.read().clone();
    let loading = submission.is_loading();
    let picked_name = image.read().as_ref().map(|f| f.name.clone());

    rsx! {
        Modal { title: "Edit Profile".to_string(), on_close: move |_| close_modal.call(()),
            form { class: "w-full mt-2 flex flex-col gap-5", onsubmit: on_submit,
                div { class: "w-full flex gap-2",
                    div { class: "w-1/2", FieldInput { field: FormField::FirstName, form, errors } }
                    div { class: "w-1/2", FieldInput { field: FormField::LastName, form, errors } }
                }
                div { class: "w-full flex gap-2",
                    div { class: "w-1/2", FieldInput { field: FormField::Contact, form, errors } }
                    div { class: "w-1/2", FieldInput { field: FormField::Location, form, errors } }
                }
                FieldInput { field: FormField::JobTitle, form, errors }

                div { class: "w-full flex gap-2 text-sm",
                    div { class: "w-1/2",
                        label { class: "text-gray-600 text-sm mb-1", r#for: FILE_INPUT_ID, "Profile Picture" }
                        input {
                            id: FILE_INPUT_ID,
                            r#type: "file",
                            accept: "image/*",
                            onmounted: watch_file_input,
                        }
                        if let Some(name) = picked_name {
                            p { class: "text-xs text-gray-500 mt-1", "{name}" }
                        }
                    }
                }

                FieldInput { field: FormField::About, form, errors }

                match submission {
                    SubmissionState::Failed { message, .. } => rsx! {
                        span { role: "alert", class: "text-sm text-red-500", "{message}" }
                    },
                    SubmissionState::Succeeded(Some(message)) => rsx! {
                        span { role: "status", class: "text-sm text-green-600", "{message}" }
                    },
                    _ => rsx! {}
                }

                div { class: "mt-4",
                    if loading {
                        Loading {}
                    } else {
                        CustomButton {
                            title: "Submit".to_string(),
                            button_type: "submit".to_string(),
                            class: "inline-flex justify-center rounded-md border border-transparent bg-blue-600 px-8 py-2 text-sm font-medium text-white hover:bg-[#1d4fd846] hover:text-[#1d4fd8] focus:outline-none".to_string(),
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dioxus::dioxus_core::VirtualDom;
    use std::cell::Cell;

    thread_local! {
        static DROPPED: Cell<usize> = const { Cell::new(0) };
    }

    struct DropCount;

    impl Drop for DropCount {
        fn drop(&mut self) {
            DROPPED.with(|d| d.set(d.get() + 1));
        }
    }

    fn reader() -> Task {
        let guard = DropCount;
        spawn(async move {
            let _guard = guard;
            futures::future::pending::<()>().await;
        })
    }

    fn reopened_three_times() -> Element {
        let watch = FileWatch { task: use_signal(|| None) };
        use_hook(|| {
            watch.replace(reader());
            watch.replace(reader());
            watch.replace(reader());
        });
        rsx! {}
    }

    fn closed() -> Element {
        let watch = FileWatch { task: use_signal(|| None) };
        use_hook(|| {
            watch.replace(reader());
            watch.stop();
            watch.stop();
        });
        rsx! {}
    }

    #[test]
    fn test_remount_drops_the_previous_reader() {
        DROPPED.with(|d| d.set(0));
        let mut dom = VirtualDom::new(reopened_three_times);
        dom.rebuild_in_place();
        // Two replaced readers are gone; the live one is still held.
        assert_eq!(DROPPED.with(|d| d.get()), 2);
    }

    #[test]
    fn test_closing_drops_the_reader() {
        DROPPED.with(|d| d.set(0));
        let mut dom = VirtualDom::new(closed);
        dom.rebuild_in_place();
        assert_eq!(DROPPED.with(|d| d.get()), 1);
    }
}
