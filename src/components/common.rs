use dioxus::prelude::*;

#[component]
pub fn TextInput(
    name: String,
    label: String,
    placeholder: String,
    value: String,
    error: String,
    oninput: EventHandler<String>,
    #[props(default)] multiline: bool,
) -> Element {
    let has_error = !error.is_empty();
    let invalid = if has_error { "true" } else { "false" };
    let border = if has_error { "border-red-500" } else { "border-gray-400" };

    rsx! {
        div { class: "flex flex-col",
            label { class: "text-gray-600 text-sm mb-1", r#for: "{name}", "{label}" }
            if multiline {
                textarea {
                    id: "{name}",
                    name: "{name}",
                    class: "rounded border {border} focus:outline-none focus:border-blue-500 focus:ring-1 focus:ring-blue-500 text-base px-4 py-2 resize-none",
                    rows: "4",
                    cols: "6",
                    aria_invalid: invalid,
                    value: "{value}",
                    oninput: move |e| oninput.call(e.value()),
                }
            } else {
                input {
                    id: "{name}",
                    name: "{name}",
                    r#type: "text",
                    class: "rounded border {border} focus:outline-none focus:border-blue-500 focus:ring-1 focus:ring-blue-500 text-base px-4 py-2",
                    placeholder: "{placeholder}",
                    aria_invalid: invalid,
                    value: "{value}",
                    oninput: move |e| oninput.call(e.value()),
                }
            }
            if has_error {
                span { role: "alert", class: "text-xs text-red-500 mt-0.5", "{error}" }
            }
        }
    }
}

#[component]
pub fn Loading() -> Element {
    rsx! {
        div { class: "w-full flex items-center justify-center py-2",
            div { class: "h-6 w-6 rounded-full border-2 border-blue-600 border-t-transparent animate-spin" }
        }
    }
}

#[component]
pub fn CustomButton(title: String, button_type: String, class: Option<String>) -> Element {
    let extra_class = class.unwrap_or_default();
    rsx! {
        button { r#type: "{button_type}", class: "{extra_class}", "{title}" }
    }
}

/// Keys that dismiss a dialog.
pub fn dismisses(key: &Key) -> bool {
    *key == Key::Escape
}

/// Centered dialog over a dimmed backdrop. Clicking the backdrop or pressing Escape closes it.
#[component]
pub fn Modal(title: String, on_close: EventHandler<()>, children: Element) -> Element {
    rsx! {
        div {
            class: "fixed inset-0 z-10 bg-black/25 flex min-h-full items-center justify-center p-4 animate-fade-in",
            tabindex: "-1",
            onclick: move |_| on_close.call(()),
            onkeydown: move |e: KeyboardEvent| {
                if dismisses(&e.key()) {
                    on_close.call(());
                }
            },

            div {
                class: "w-full max-w-md overflow-hidden rounded-2xl bg-white p-6 text-left align-middle shadow-xl animate-scale-in",
                role: "dialog",
                onclick: move |e| e.stop_propagation(),

                div { class: "flex items-center justify-between",
                    h3 { class: "text-lg font-semibold leading-6 text-gray-900", "{title}" }
                    button {
                        r#type: "button",
                        class: "w-8 h-8 rounded-full hover:bg-gray-100 text-gray-500",
                        onclick: move |_| on_close.call(()),
                        "✕"
                    }
                }
                {children}
            }
        }
    }
}
