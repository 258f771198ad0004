//! The workflows behind the song list buttons and the admin page.
//!
//! Each one ties a [`SongStore`] mutation to the local store or to the outside world
//! (opening a link), and turns the outcome into something a frontend can report.

use log::{info, warn};
use riffshare_api::{AdminToken, SongsApi};
use riffshare_types::{Song, SongChangeSet, SongId, VoteDirection};

use crate::{
    errors::{AdminError, StoreError},
    local::LocalStore,
    state::{PageView, Paginator, SongStore, view::matches_search},
};

//---------------------------------------------------------------------------------------------------- voting

/// What happened when a vote was requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The server counted the vote and answered with the updated song.
    Counted(Song),
    /// This machine already voted on the song, nothing was sent.
    AlreadyVoted(VoteDirection),
}

/// Vote on a song, at most once per song from this machine.
///
/// The local record is only updated after the server confirms the vote. Failing to persist the
/// local record is logged but not reported, the vote itself went through.
///
/// # Errors
///
/// Fails if the server rejects the vote.
pub async fn vote<A: SongsApi>(
    store: &mut SongStore<A>,
    local: &mut LocalStore,
    id: &SongId,
    direction: VoteDirection,
) -> Result<VoteOutcome, StoreError> {
    if let Some(previous) = local.vote_for(id) {
        info!("already voted on song {id}, not sending");
        return Ok(VoteOutcome::AlreadyVoted(previous));
    }

    let song = store.vote_song(id, direction).await?;
    local.record_vote(id.clone(), direction);
    if let Err(e) = local.save() {
        warn!("vote on song {id} was counted but could not be remembered: {e}");
    }
    Ok(VoteOutcome::Counted(song))
}

//---------------------------------------------------------------------------------------------------- downloads

/// Something that can hand a link to the user, e.g. the system browser.
pub trait LinkOpener {
    /// Open `link`.
    ///
    /// # Errors
    ///
    /// Fails if the link could not be handed off.
    fn open(&self, link: &str) -> std::io::Result<()>;
}

/// What happened when a download was requested.
///
/// The two halves are independent, a failed count does not stop the link from opening.
#[derive(Debug)]
pub struct DownloadOutcome {
    pub link: String,
    /// the updated download count, or why it wasn't counted
    pub counted: Result<u64, StoreError>,
    pub opened: std::io::Result<()>,
}

/// Count a download of a song and open its link.
///
/// # Errors
///
/// Fails only if the song isn't in the list, there is then no link to open.
pub async fn download<A: SongsApi, O: LinkOpener>(
    store: &mut SongStore<A>,
    opener: &O,
    id: &SongId,
) -> Result<DownloadOutcome, StoreError> {
    let link = store
        .get(id)
        .map(|song| song.link.clone())
        .ok_or_else(|| StoreError::NotFound(id.clone()))?;

    let counted = store
        .increment_download(id)
        .await
        .map(|song| song.downloads);
    let opened = opener
        .open(&link)
        .inspect_err(|e| warn!("failed to open {link}: {e}"));

    Ok(DownloadOutcome {
        link,
        counted,
        opened,
    })
}

//---------------------------------------------------------------------------------------------------- admin

/// A message for the user after an admin action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

impl Notification {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Error(message) => message,
        }
    }
}

/// An open admin page.
///
/// Only exists while an admin token is stored. The token is not checked here, the server
/// rejects a bad one when it is used.
#[derive(Debug)]
pub struct AdminSession {
    token: AdminToken,
}

impl AdminSession {
    /// Open the admin page with the stored token.
    ///
    /// # Errors
    ///
    /// [`AdminError::AccessRequired`] if no token is stored.
    pub fn from_local(local: &LocalStore) -> Result<Self, AdminError> {
        local
            .admin_token()
            .cloned()
            .map(|token| Self { token })
            .ok_or(AdminError::AccessRequired)
    }

    /// Store `token` and open the admin page with it.
    ///
    /// # Errors
    ///
    /// Fails if the token is blank or the local store can't be written.
    pub fn login(local: &mut LocalStore, token: &str) -> Result<Self, AdminError> {
        let token = AdminToken::new(token).ok_or(AdminError::BlankToken)?;
        local.set_admin_token(token.clone());
        local.save()?;
        info!("admin token stored");
        Ok(Self { token })
    }

    /// Forget the stored token, returning whether there was one.
    ///
    /// # Errors
    ///
    /// Fails if the local store can't be written.
    pub fn logout(local: &mut LocalStore) -> Result<bool, AdminError> {
        let removed = local.clear_admin_token();
        if removed {
            local.save()?;
            info!("admin token removed");
        }
        Ok(removed)
    }

    #[must_use]
    pub const fn token(&self) -> &AdminToken {
        &self.token
    }

    /// One page of the admin table: the songs whose title, artist, or author match `search`,
    /// in collection order.
    #[must_use]
    pub fn page(&self, songs: &[Song], search: &str, page: usize, page_size: usize) -> PageView {
        let matched: Vec<Song> = songs
            .iter()
            .filter(|song| matches_search(song, search))
            .cloned()
            .collect();
        let mut paginator = Paginator::new(page_size);
        paginator.go_to(page, matched.len());
        PageView {
            songs: paginator.page(&matched).to_vec(),
            page: paginator.current(),
            total_pages: paginator.total_pages(matched.len()),
            total_matches: matched.len(),
        }
    }

    /// Edit a song, then reload the collection.
    pub async fn edit<A: SongsApi>(
        &self,
        store: &mut SongStore<A>,
        id: &SongId,
        changes: &SongChangeSet,
    ) -> Notification {
        match store.edit_song(id, changes, &self.token).await {
            Ok(_) => {
                refresh(store).await;
                Notification::Success("Song updated successfully!".into())
            }
            Err(e) => Notification::Error(format!("Error updating song: {e}")),
        }
    }

    /// Delete a song, then reload the collection.
    pub async fn delete<A: SongsApi>(&self, store: &mut SongStore<A>, id: &SongId) -> Notification {
        match store.delete_song(id, &self.token).await {
            Ok(_) => {
                refresh(store).await;
                Notification::Success("Song deleted successfully!".into())
            }
            Err(e) => Notification::Error(format!("Error deleting song: {e}")),
        }
    }
}

/// Reload after an admin change. The change already went through, so a failed reload is only logged.
async fn refresh<A: SongsApi>(store: &mut SongStore<A>) {
    if let Err(e) = store.fetch_songs().await {
        warn!("failed to reload songs after admin change: {e}");
    }
}
