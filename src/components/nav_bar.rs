use dioxus::prelude::*;
use crate::Route;
use crate::backend::AppCmd;

#[component]
pub fn NavComponent() -> Element {
    let app_state = use_context::<crate::components::AppState>();
    let cmd_tx = use_context::<tokio::sync::mpsc::UnboundedSender<AppCmd>>();

    let signed_in = app_state.session.read().is_some();
    let first_name = app_state
        .user
        .read()
        .as_ref()
        .and_then(|u| u.first_name.clone())
        .unwrap_or_default();

    let on_logout = move |_| {
        if let Err(e) = cmd_tx.send(AppCmd::Logout) {
            tracing::error!("Failed to send Logout command: {:?}", e);
        }
    };

    rsx! {
        div { class: "min-h-screen flex flex-col",
            nav { class: "nav-bar",
                div { class: "page-container",
                    // Logo section
                    div { class: "nav-logo",
                        div { class: "logo-icon" }
                        span { class: "logo-text", "Job", span { class: "text-blue-600", "Finder" } }
                    }

                    // Navigation links
                    div { class: "nav-links",
                        Link {
                            to: Route::ProfileComponent {},
                            class: "nav-link",
                            active_class: "active",
                            "Profile"
                        }
                        if signed_in {
                            span { class: "nav-user", "{first_name}" }
                            button { class: "btn btn-secondary", onclick: on_logout, "Log Out" }
                        }
                    }
                }
            }

            div { class: "fixed-header-spacer" }

            div { class: "flex-1",
                Outlet::<Route> {}
            }
        }
    }
}
