use dioxus::prelude::*;
use crate::backend::profile::UserProfile;
use crate::components::profile_form::ProfileEditForm;

const NO_PROFILE: Asset = asset!("/assets/no_profile.svg");

/// Display strings for the profile card, with the placeholders for anything missing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSummary {
    pub full_name: String,
    pub job_title: String,
    pub location: String,
    pub email: String,
    pub contact: String,
    pub about: String,
    pub avatar: Option<String>,
    pub avatar_alt: String,
}

impl ProfileSummary {
    pub fn from_profile(profile: Option<&UserProfile>) -> Self {
        let p = profile.cloned().unwrap_or_default();
        // Job title and avatar also fall back when blank; the rest only when absent.
        let non_blank = |v: Option<String>| v.filter(|s| !s.is_empty());

        let first = p.first_name.unwrap_or_default();
        let last = p.last_name.unwrap_or_default();

        Self {
            full_name: format!("{} {}", first, last).trim().to_string(),
            job_title: non_blank(p.job_title).unwrap_or_else(|| "Add Job Title".to_string()),
            location: p.location.unwrap_or_else(|| "No Location".to_string()),
            email: p.email.unwrap_or_else(|| "No Email".to_string()),
            contact: p.contact.unwrap_or_else(|| "No Contact".to_string()),
            about: p.about.unwrap_or_else(|| "No About Found".to_string()),
            avatar: non_blank(p.profile_url),
            avatar_alt: first,
        }
    }
}

#[component]
pub fn ProfileComponent() -> Element {
    let app_state = use_context::<crate::components::AppState>();
    let mut open = use_signal(|| false);

    let summary = ProfileSummary::from_profile(app_state.user.read().as_ref());
    let restored = *app_state.restored.read();

    rsx! {
        div { class: "page-container mx-auto flex flex-col items-center justify-center py-10 px-10 animate-fade-in",
            div { class: "w-full 2xl:w-2/4 bg-white shadow-lg p-10 pb-20 rounded-lg",

                // Header
                div { class: "flex flex-col items-center justify-center mb-4",
                    h1 { class: "text-4xl font-semibold text-slate-600", "{summary.full_name}" }
                    h5 { class: "text-blue-700 text-base font-bold", "{summary.job_title}" }

                    div { class: "w-full flex flex-wrap lg:flex-row justify-between mt-8 text-sm",
                        p { class: "profile-chip", span { class: "chip-icon", "📍" } "{summary.location}" }
                        p { class: "profile-chip", span { class: "chip-icon", "✉" } "{summary.email}" }
                        p { class: "profile-chip", span { class: "chip-icon", "📞" } "{summary.contact}" }
                    }
                }

                hr {}

                div { class: "w-full flex flex-col-reverse md:flex-row gap-8 py-10 px-10",
                    // About
                    div { class: "w-full md:w-2/3 flex flex-col gap-4 text-lg text-slate-600 mt-20 md:mt-0",
                        p { class: "text-[#0536e7] font-semibold text-2xl flex flex-col items-center md:items-start", "ABOUT" }
                        span { class: "text-base text-justify leading-7", "{summary.about}" }
                    }

                    // Avatar
                    div { class: "w-full md:w-1/3 h-44 flex flex-col items-center justify-center",
                        if let Some(url) = summary.avatar.clone() {
                            img { src: "{url}", alt: "{summary.avatar_alt}", class: "w-full object-contain rounded-lg h-48" }
                        } else {
                            img { src: NO_PROFILE, alt: "{summary.avatar_alt}", class: "w-full object-contain rounded-lg h-48" }
                        }
                        button {
                            class: "w-fit px-6 bg-blue-600 text-white mt-4 py-2 rounded disabled:opacity-50",
                            disabled: !restored,
                            onclick: move |_| open.set(true),
                            "Edit Profile"
                        }
                    }
                }
            }

            ProfileEditForm { open }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_missing_field_gets_its_placeholder() {
        let summary = ProfileSummary::from_profile(Some(&UserProfile::default()));
        assert_eq!(summary.job_title, "Add Job Title");
        assert_eq!(summary.location, "No Location");
        assert_eq!(summary.email, "No Email");
        assert_eq!(summary.contact, "No Contact");
        assert_eq!(summary.about, "No About Found");
        assert_eq!(summary.avatar, None);
        assert_eq!(summary.full_name, "");
    }

    #[test]
    fn test_placeholders_apply_independently() {
        let profile = UserProfile {
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            email: Some("ada@example.com".into()),
            about: Some("Engines".into()),
            ..Default::default()
        };
        let summary = ProfileSummary::from_profile(Some(&profile));
        assert_eq!(summary.full_name, "Ada Lovelace");
        assert_eq!(summary.email, "ada@example.com");
        assert_eq!(summary.about, "Engines");
        assert_eq!(summary.location, "No Location");
        assert_eq!(summary.contact, "No Contact");
        assert_eq!(summary.avatar_alt, "Ada");
    }

    #[test]
    fn test_blank_job_title_and_avatar_fall_back() {
        let profile = UserProfile {
            job_title: Some(String::new()),
            profile_url: Some(String::new()),
            location: Some(String::new()),
            ..Default::default()
        };
        let summary = ProfileSummary::from_profile(Some(&profile));
        assert_eq!(summary.job_title, "Add Job Title");
        assert_eq!(summary.avatar, None);
        // Location only falls back when absent.
        assert_eq!(summary.location, "");

        let with_avatar = UserProfile { profile_url: Some("https://cdn.example/a.png".into()), ..Default::default() };
        assert_eq!(
            ProfileSummary::from_profile(Some(&with_avatar)).avatar.as_deref(),
            Some("https://cdn.example/a.png")
        );
    }

    #[test]
    fn test_no_user_renders_placeholders() {
        let summary = ProfileSummary::from_profile(None);
        assert_eq!(summary.location, "No Location");
        assert_eq!(summary.avatar_alt, "");
    }
}
