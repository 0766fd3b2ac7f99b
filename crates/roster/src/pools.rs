//! Pools file loading.
//!
//! The pools file holds already-fetched hosting API data:
//!
//! ```json
//! {
//!   "contributors": [{ "login": "octocat", "avatar_url": "...", "type": "User" }],
//!   "collaborators": [],
//!   "bots": [],
//!   "sponsors": [{ "login": "acme", "name": "Acme", "avatarUrl": "..." }]
//! }
//! ```
//!
//! Contributors and collaborators are classified here: bot accounts are moved
//! into the bot pool before anything reaches the merger.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use roster_core::{Entity, EntityKind, PoolSet};
use serde::Deserialize;

/// Account type the hosting API reports for bot accounts.
const BOT_ACCOUNT_TYPE: &str = "Bot";

/// Login fragment of the built-in automation account.
const ACTIONS_USER: &str = "actions-user";

/// Error loading the pools file.
#[derive(Debug, thiserror::Error)]
pub(crate) enum PoolsError {
    #[error("Pools file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read pools file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse pools file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PoolsFile {
    contributors: Vec<UserRecord>,
    collaborators: Vec<UserRecord>,
    bots: Vec<UserRecord>,
    sponsors: Vec<UserRecord>,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    login: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "avatarUrl")]
    avatar_url: Option<String>,
    #[serde(default, rename = "type")]
    account_type: Option<String>,
}

impl UserRecord {
    fn is_bot(&self) -> bool {
        self.account_type.as_deref() == Some(BOT_ACCOUNT_TYPE) || self.login.contains(ACTIONS_USER)
    }

    fn into_entity(self) -> Entity {
        Entity {
            login: self.login,
            name: self.name,
            avatar_url: self.avatar_url,
            kind: EntityKind::Person,
        }
    }

    /// Bots display their login as their name.
    fn into_bot(self) -> Entity {
        Entity {
            name: Some(self.login.clone()),
            login: self.login,
            avatar_url: self.avatar_url,
            kind: EntityKind::Bot,
        }
    }
}

/// Load and classify the pools file at `path`.
pub(crate) fn load_pools(path: &Path) -> Result<PoolSet, PoolsError> {
    if !path.exists() {
        return Err(PoolsError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| PoolsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: PoolsFile = serde_json::from_str(&content).map_err(|source| PoolsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let pools = classify(file);
    tracing::info!(
        contributors = pools.contributors.len(),
        collaborators = pools.collaborators.len(),
        bots = pools.bots.len(),
        sponsors = pools.sponsors.len(),
        "Loaded pools"
    );
    Ok(pools)
}

/// Split bot accounts out of contributors and collaborators.
///
/// Explicit bots come first, followed by bots found among contributors and
/// then collaborators. A bot login appears in the bot pool only once.
fn classify(file: PoolsFile) -> PoolSet {
    let (contributor_bots, contributors): (Vec<_>, Vec<_>) =
        file.contributors.into_iter().partition(UserRecord::is_bot);
    let (collaborator_bots, collaborators): (Vec<_>, Vec<_>) =
        file.collaborators.into_iter().partition(UserRecord::is_bot);

    let mut seen = HashSet::new();
    let explicit_bots = file.bots.into_iter().map(|record| Entity {
        kind: EntityKind::Bot,
        ..record.into_entity()
    });
    let detected_bots = contributor_bots
        .into_iter()
        .chain(collaborator_bots)
        .map(UserRecord::into_bot);
    let bots = explicit_bots
        .chain(detected_bots)
        .filter(|bot| seen.insert(bot.login.clone()))
        .collect();

    PoolSet {
        contributors: contributors.into_iter().map(UserRecord::into_entity).collect(),
        collaborators: collaborators.into_iter().map(UserRecord::into_entity).collect(),
        bots,
        sponsors: file.sponsors.into_iter().map(UserRecord::into_entity).collect(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(json: &str) -> PoolSet {
        classify(serde_json::from_str(json).unwrap())
    }

    fn logins(entities: &[Entity]) -> Vec<&str> {
        entities.iter().map(|e| e.login.as_str()).collect()
    }

    #[test]
    fn test_empty_file() {
        assert_eq!(parse("{}"), PoolSet::default());
    }

    #[test]
    fn test_bots_split_from_contributors() {
        let pools = parse(
            r#"{
                "contributors": [
                    {"login": "alice", "avatar_url": "https://example.com/a.png", "type": "User"},
                    {"login": "dependabot[bot]", "avatar_url": "https://example.com/d.png", "type": "Bot"},
                    {"login": "github-actions-user", "type": "User"},
                    {"login": "bob"}
                ]
            }"#,
        );

        assert_eq!(logins(&pools.contributors), vec!["alice", "bob"]);
        assert_eq!(
            logins(&pools.bots),
            vec!["dependabot[bot]", "github-actions-user"]
        );
        assert_eq!(pools.bots[0].kind, EntityKind::Bot);
        assert_eq!(pools.bots[0].name.as_deref(), Some("dependabot[bot]"));
        assert_eq!(
            pools.bots[0].avatar_url.as_deref(),
            Some("https://example.com/d.png")
        );
    }

    #[test]
    fn test_bots_deduplicated_across_sources() {
        let pools = parse(
            r#"{
                "contributors": [{"login": "renovate[bot]", "type": "Bot"}],
                "collaborators": [{"login": "renovate[bot]", "type": "Bot"}, {"login": "carol"}],
                "bots": [{"login": "ci-bot"}]
            }"#,
        );

        assert_eq!(logins(&pools.bots), vec!["ci-bot", "renovate[bot]"]);
        assert_eq!(logins(&pools.collaborators), vec!["carol"]);
    }

    #[test]
    fn test_sponsor_camel_case_avatar() {
        let pools = parse(
            r#"{"sponsors": [{"login": "acme", "name": "Acme Inc", "avatarUrl": "https://example.com/acme.png"}]}"#,
        );

        assert_eq!(
            pools.sponsors,
            vec![
                Entity::new("acme")
                    .with_name("Acme Inc")
                    .with_avatar_url("https://example.com/acme.png")
            ]
        );
    }

    #[test]
    fn test_load_pools_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_pools(&dir.path().join("pools.json")).unwrap_err();
        assert!(matches!(err, PoolsError::NotFound(_)));
    }

    #[test]
    fn test_load_pools_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pools.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_pools(&path).unwrap_err();
        assert!(matches!(err, PoolsError::Parse { .. }));
        assert!(err.to_string().contains("pools.json"));
    }

    #[test]
    fn test_load_pools_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pools.json");
        std::fs::write(&path, r#"{"contributors": [{"login": "a"}, {"login": "b"}]}"#).unwrap();

        let pools = load_pools(&path).unwrap();
        assert_eq!(logins(&pools.contributors), vec!["a", "b"]);
    }
}
