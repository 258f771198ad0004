//! Client-side persistent state.
//!
//! A single JSON document holding the three keys the client remembers between runs:
//! - `votes`: which way this machine voted on each song (only used to stop repeat votes)
//! - `admin_token`: the bearer token for the admin endpoints
//! - `has_visited`: whether the welcome message was already shown
//!
//! None of this is authoritative, the server is the source of truth for vote counts.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use riffshare_api::AdminToken;
use riffshare_types::{SongId, VoteDirection};
use serde::{Deserialize, Serialize};

use crate::errors::LocalStoreError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct LocalData {
    #[serde(default)]
    votes: BTreeMap<SongId, VoteDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    admin_token: Option<AdminToken>,
    #[serde(default)]
    has_visited: bool,
}

/// The local store, backed by a file.
#[derive(Clone, Debug)]
pub struct LocalStore {
    path: PathBuf,
    data: LocalData,
}

impl LocalStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store. A corrupt file is also treated as empty (and logged),
    /// the same way a browser drops unparsable local storage.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but can't be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LocalStoreError> {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!("ignoring unreadable local store at {}: {e}", path.display());
                LocalData::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => LocalData::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, data })
    }

    /// An empty store that will be written to `path` on [`LocalStore::save`].
    #[must_use]
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: LocalData::default(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the store back to disk, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Fails if the file can't be written.
    pub fn save(&self) -> Result<(), LocalStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&self.path, contents)?;
        debug!("saved local store to {}", self.path.display());
        Ok(())
    }

    //------------------------------------------------------------------------------------ votes

    #[must_use]
    pub fn has_voted(&self, id: &SongId) -> bool {
        self.data.votes.contains_key(id)
    }

    #[must_use]
    pub fn vote_for(&self, id: &SongId) -> Option<VoteDirection> {
        self.data.votes.get(id).copied()
    }

    pub fn record_vote(&mut self, id: SongId, direction: VoteDirection) {
        self.data.votes.insert(id, direction);
    }

    pub fn votes(&self) -> impl Iterator<Item = (&SongId, VoteDirection)> {
        self.data.votes.iter().map(|(id, direction)| (id, *direction))
    }

    //------------------------------------------------------------------------------------ admin token

    #[must_use]
    pub const fn admin_token(&self) -> Option<&AdminToken> {
        self.data.admin_token.as_ref()
    }

    pub fn set_admin_token(&mut self, token: AdminToken) {
        self.data.admin_token = Some(token);
    }

    /// Remove the admin token, returning whether there was one.
    pub fn clear_admin_token(&mut self) -> bool {
        self.data.admin_token.take().is_some()
    }

    //------------------------------------------------------------------------------------ welcome

    #[must_use]
    pub const fn is_first_visit(&self) -> bool {
        !self.data.has_visited
    }

    pub fn mark_visited(&mut self) {
        self.data.has_visited = true;
    }
}
