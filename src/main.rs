mod backend;
mod components;
mod config;

use backend::{AppCmd, AppEvent};
use components::nav_bar::NavComponent;
use components::profile_page::ProfileComponent;
use components::AppState;
use config::Config;

use dioxus::prelude::*;
use tokio::sync::mpsc;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[layout(NavComponent)]
    #[route("/")]
    ProfileComponent {},
}

fn main() {
    // On the web dioxus installs its own console logger.
    #[cfg(not(target_arch = "wasm32"))]
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let config = use_context_provider(Config::from_env);
    let app_state = AppState::new();
    use_context_provider(|| app_state);

    let cmd_tx = use_hook(|| {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<AppCmd>();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

        spawn(backend::init(config.clone(), cmd_rx, event_tx));

        let mut state = app_state;
        spawn(async move {
            while let Some(event) = event_rx.recv().await {
                state.apply(event);
            }
        });

        if let Err(e) = cmd_tx.send(AppCmd::Init) {
            tracing::error!("Failed to send Init command: {:?}", e);
        }
        cmd_tx
    });
    use_context_provider(|| cmd_tx);

    rsx! {
        document::Stylesheet { href: asset!("/assets/main.css") }
        Router::<Route> {}
    }
}
