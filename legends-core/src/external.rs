//! Matching users of external apps against the user directory.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::users::{UserDirectory, UserId};

/// A user record as reported by one of the external apps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "app", rename_all = "kebab-case")]
pub enum ExternalUser {
    AppA {
        id: String,
        username: String,
        email: String,
    },
    AppB {
        uid: String,
        name: String,
        avatar: String,
    },
}

impl ExternalUser {
    pub fn display_name(&self) -> &str {
        match self {
            ExternalUser::AppA { username, .. } => username,
            ExternalUser::AppB { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub success: bool,
    pub user_ids: Vec<UserId>,
    pub error: Option<String>,
}

impl SyncResult {
    pub fn failed(error: impl Into<String>) -> Self {
        SyncResult {
            success: false,
            user_ids: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Ids of directory users whose name exactly matches a name reported by
/// any external app, in directory order.
pub fn match_external_users(directory: &UserDirectory, external: &[ExternalUser]) -> SyncResult {
    let names: BTreeSet<&str> = external.iter().map(ExternalUser::display_name).collect();

    let user_ids: Vec<UserId> = directory
        .iter()
        .filter(|u| names.contains(u.name.as_str()))
        .map(|u| u.id.clone())
        .collect();

    tracing::debug!(external = external.len(), matched = user_ids.len(), "matched external users");

    SyncResult {
        success: true,
        user_ids,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ExternalUser> {
        vec![
            ExternalUser::AppA {
                id: "abc123".into(),
                username: "Jia".into(),
                email: "jia@example.com".into(),
            },
            ExternalUser::AppA {
                id: "def456".into(),
                username: "Rio".into(),
                email: "rio@example.com".into(),
            },
            ExternalUser::AppB {
                uid: "789xyz".into(),
                name: "Rio".into(),
                avatar: "https://example.com/avatar1.jpg".into(),
            },
            ExternalUser::AppB {
                uid: "999zzz".into(),
                name: "Stranger".into(),
                avatar: "https://example.com/avatar2.jpg".into(),
            },
        ]
    }

    #[test]
    fn test_match_external_users() {
        let result = match_external_users(&UserDirectory::builtin(), &sample());

        assert!(result.success);
        assert_eq!(result.user_ids, vec![UserId::from("0"), UserId::from("3")]);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let external = vec![ExternalUser::AppB {
            uid: "1".into(),
            name: "jia".into(),
            avatar: String::new(),
        }];
        assert!(match_external_users(&UserDirectory::builtin(), &external).user_ids.is_empty());
    }

    #[test]
    fn test_failed_result() {
        let result = SyncResult::failed("Failed to sync external users");
        assert!(!result.success);
        assert!(result.user_ids.is_empty());
    }
}
