use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::backend::error::ProfileError;

/// Server-side identifier. The API has shipped it both as a string and as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Text(String),
    Number(i64),
}

impl UserId {
    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Text(s) => f.write_str(s),
            UserId::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    // Fields the portal sends that this screen doesn't edit (accountType, createdAt, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    FirstName,
    LastName,
    Contact,
    Location,
    JobTitle,
    About,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::FirstName,
        FormField::LastName,
        FormField::Contact,
        FormField::Location,
        FormField::JobTitle,
        FormField::About,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::FirstName => "First Name",
            FormField::LastName => "Last Name",
            FormField::Contact => "Contact",
            FormField::Location => "Location",
            FormField::JobTitle => "Job Title",
            FormField::About => "About",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::FirstName => "James",
            FormField::LastName => "Wagonner",
            FormField::Contact => "Phone Number",
            FormField::Location => "Location",
            FormField::JobTitle => "Software Engineer",
            FormField::About => "",
        }
    }

    pub fn required_message(self) -> &'static str {
        match self {
            FormField::FirstName => "First Name is required",
            FormField::LastName => "Last Name is required",
            FormField::Contact => "Contact is required!",
            FormField::Location => "Location is required",
            FormField::JobTitle => "Job Title is required",
            FormField::About => "Write a little bit about yourself and your projects",
        }
    }
}

/// Editable copy of the profile held by the modal until it is submitted or dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub contact: String,
    pub location: String,
    pub job_title: String,
    pub about: String,
}

impl ProfileForm {
    pub fn from_profile(profile: &UserProfile) -> Self {
        let seed = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            first_name: seed(&profile.first_name),
            last_name: seed(&profile.last_name),
            contact: seed(&profile.contact),
            location: seed(&profile.location),
            job_title: seed(&profile.job_title),
            about: seed(&profile.about),
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::Contact => &self.contact,
            FormField::Location => &self.location,
            FormField::JobTitle => &self.job_title,
            FormField::About => &self.about,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        let slot = match field {
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
            FormField::Contact => &mut self.contact,
            FormField::Location => &mut self.location,
            FormField::JobTitle => &mut self.job_title,
            FormField::About => &mut self.about,
        };
        *slot = value;
    }

    pub fn validate_field(&self, field: FormField) -> Option<&'static str> {
        if self.value(field).trim().is_empty() {
            Some(field.required_message())
        } else {
            None
        }
    }

    /// Checks every field and reports all failures at once.
    pub fn validate(self) -> Result<ValidForm, FieldErrors> {
        let mut errors = FieldErrors::default();
        for field in FormField::ALL {
            if let Some(msg) = self.validate_field(field) {
                errors.0.insert(field, msg);
            }
        }
        if errors.is_empty() {
            Ok(ValidForm(self))
        } else {
            Err(errors)
        }
    }
}

/// A form that passed validation. Only obtainable through `ProfileForm::validate`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidForm(ProfileForm);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<FormField, &'static str>);

impl FieldErrors {
    pub fn get(&self, field: FormField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn set(&mut self, field: FormField, message: Option<&'static str>) {
        match message {
            Some(msg) => {
                self.0.insert(field, msg);
            }
            None => {
                self.0.remove(&field);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Body of `PUT /user/update-user`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayload {
    pub first_name: String,
    pub last_name: String,
    pub contact: String,
    pub location: String,
    pub job_title: String,
    pub about: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(rename = "_id")]
    pub id: String,
}

impl UpdatePayload {
    pub fn build(
        form: ValidForm,
        profile_url: Option<String>,
        user: &UserProfile,
    ) -> Result<Self, ProfileError> {
        let id = user
            .id
            .as_ref()
            .ok_or(ProfileError::MissingIdentifier)?
            .as_string();
        let ProfileForm {
            first_name,
            last_name,
            contact,
            location,
            job_title,
            about,
        } = form.0;
        Ok(Self {
            first_name,
            last_name,
            contact,
            location,
            job_title,
            about,
            profile_url,
            id,
        })
    }
}

/// Who is logged in and with what credential. Stored as a flat profile object with `token`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionRecord {
    user: UserProfile,
}

impl SessionRecord {
    pub fn merge(mut user: UserProfile, token: Option<String>) -> Self {
        if token.is_some() {
            user.token = token;
        }
        Self { user }
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    pub fn token(&self) -> Option<&str> {
        self.user.token.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Success {
        user: UserProfile,
        token: Option<String>,
        message: Option<String>,
    },
    Failed {
        status: String,
        message: String,
    },
}

impl UpdateResponse {
    pub fn into_outcome(self) -> SubmissionOutcome {
        let status = self.status.unwrap_or_default();
        if status == "failed" {
            return SubmissionOutcome::Failed {
                status,
                message: self.message.unwrap_or_default(),
            };
        }
        match self.user {
            Some(user) => SubmissionOutcome::Success {
                user,
                token: self.token,
                message: self.message,
            },
            // Auth middleware answers with a bare {message} and no status.
            None => SubmissionOutcome::Failed {
                status: "failed".to_string(),
                message: self
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Malformed update response".to_string()),
            },
        }
    }
}
