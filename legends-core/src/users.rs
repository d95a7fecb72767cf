//! User identities and the read-only user directory.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LegendsError, LegendsResult};
use crate::range::RangeOwner;

pub const DEFAULT_EMOJI: &str = "🙂";
pub const DEFAULT_AVATAR: &str = "👤";

/// Stable identifier of a participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        UserId(s)
    }
}

impl Borrow<str> for UserId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub emoji: String,
    pub avatar: String,
}

impl UserProfile {
    pub fn new(id: &str, name: &str, emoji: &str) -> Self {
        UserProfile {
            id: UserId::from(id),
            name: name.to_string(),
            emoji: emoji.to_string(),
            avatar: DEFAULT_AVATAR.to_string(),
        }
    }

    /// Metadata used to annotate stored ranges.
    pub fn owner(&self) -> RangeOwner {
        RangeOwner {
            name: self.name.clone(),
            emoji: self.emoji.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

impl fmt::Display for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji, self.name)
    }
}

/// Ordered list of known users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserDirectory {
    users: Vec<UserProfile>,
}

impl UserDirectory {
    pub fn new(users: Vec<UserProfile>) -> Self {
        UserDirectory { users }
    }

    /// The six founding legends.
    pub fn builtin() -> Self {
        UserDirectory::new(vec![
            UserProfile::new("0", "Jia", "🎯"),
            UserProfile::new("1", "Iheb", "😄"),
            UserProfile::new("2", "Himanshu", "😢"),
            UserProfile::new("3", "Rio", "😂"),
            UserProfile::new("4", "Kevin", "😎"),
            UserProfile::new("5", "Nuel", "😇"),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&UserProfile> {
        self.users.iter().find(|u| u.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Look up a profile, failing with [`LegendsError::UnknownUser`].
    pub fn require(&self, id: &str) -> LegendsResult<&UserProfile> {
        self.get(id)
            .ok_or_else(|| LegendsError::UnknownUser(id.to_string()))
    }

    /// Case-insensitive name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<&UserProfile> {
        let needle = name.trim().to_lowercase();
        self.users.iter().find(|u| u.name.to_lowercase() == needle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserProfile> {
        self.users.iter()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Add a new legend and return its profile.
    pub fn create_legend(&mut self, name: &str) -> LegendsResult<UserProfile> {
        let name = validate_legend_name(self, name)?;
        let profile = UserProfile {
            id: self.unique_id_for(&name),
            name,
            emoji: DEFAULT_EMOJI.to_string(),
            avatar: DEFAULT_AVATAR.to_string(),
        };

        tracing::info!(id = %profile.id, name = %profile.name, "created legend");
        self.users.push(profile.clone());
        Ok(profile)
    }

    /// Slug of the name, suffixed with -2, -3, ... on collision.
    fn unique_id_for(&self, name: &str) -> UserId {
        let mut base = slug::slugify(name);
        if base.is_empty() {
            base = "legend".to_string();
        }

        if !self.contains(&base) {
            return UserId::new(base);
        }

        (2..)
            .map(|n| format!("{}-{}", base, n))
            .find(|candidate| !self.contains(candidate))
            .map(UserId::new)
            .unwrap_or_else(|| UserId::new(base))
    }
}

/// Trim a proposed legend name and check it is non-empty and not taken.
pub fn validate_legend_name(directory: &UserDirectory, name: &str) -> LegendsResult<String> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(LegendsError::InvalidLegendName("Please enter a name".into()));
    }

    if directory.find_by_name(trimmed).is_some() {
        return Err(LegendsError::InvalidLegendName("This name already exists".into()));
    }

    Ok(trimmed.to_string())
}
