// File: src/controller/lookup.rs
use crate::error::{LOOKUP_USER_FALLBACK, ServiceError};
use crate::model::UserProfile;
use tokio::process::Command;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UserInfoDialog {
    #[default]
    Closed,
    Loading {
        email: String,
    },
    Loaded(UserProfile),
    Error(String),
}

impl UserInfoDialog {
    pub fn is_open(&self) -> bool {
        !matches!(self, UserInfoDialog::Closed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactAction {
    pub label: &'static str,
    pub uri: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserLookupController {
    dialog: UserInfoDialog,
}

impl UserLookupController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialog(&self) -> &UserInfoDialog {
        &self.dialog
    }

    pub fn open(&mut self, email: &str) -> LookupTicket {
        self.dialog = UserInfoDialog::Loading {
            email: email.to_string(),
        };
        LookupTicket {
            email: email.to_string(),
        }
    }

    /// Results are applied whenever they arrive, even if the dialog was
    /// closed or reopened for someone else in the meantime.
    pub fn apply(&mut self, ticket: &LookupTicket, result: Result<UserProfile, ServiceError>) {
        if !matches!(&self.dialog, UserInfoDialog::Loading { email } if *email == ticket.email) {
            tracing::debug!(email = %ticket.email, "applying lookup result to a changed dialog");
        }
        self.dialog = match result {
            Ok(profile) => UserInfoDialog::Loaded(profile),
            Err(e) => {
                tracing::warn!(email = %ticket.email, "user lookup failed: {}", e);
                UserInfoDialog::Error(e.user_message(LOOKUP_USER_FALLBACK))
            }
        };
    }

    pub fn close(&mut self) {
        self.dialog = UserInfoDialog::Closed;
    }

    pub fn contact_actions(&self) -> Vec<ContactAction> {
        match &self.dialog {
            UserInfoDialog::Loaded(profile) => contact_actions(profile),
            _ => Vec::new(),
        }
    }
}

pub fn contact_actions(profile: &UserProfile) -> Vec<ContactAction> {
    let mut actions = vec![ContactAction {
        label: "Send Email",
        uri: format!("mailto:{}", profile.email),
    }];
    if let Some(phone) = profile
        .phone_number
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        actions.push(ContactAction {
            label: "Call",
            uri: format!("tel:{}", phone.replace(' ', "")),
        });
    }
    actions
}

/// Hand a mailto:/tel: link to the desktop's URL opener.
/// Must be called from inside the tokio runtime.
pub fn launch(uri: &str) -> std::io::Result<()> {
    let program = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    };
    spawn_opener(program, uri).map(|_| ())
}

/// Starts `program uri` and waits on it in the background so it is reaped.
fn spawn_opener(program: &str, uri: &str) -> std::io::Result<JoinHandle<()>> {
    let mut child = Command::new(program).arg(uri).spawn()?;
    let uri = uri.to_string();
    Ok(tokio::spawn(async move {
        match child.wait().await {
            Ok(status) if !status.success() => {
                tracing::warn!(%uri, %status, "opener exited with failure")
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(%uri, "could not wait on opener: {}", e),
        }
    }))
}
