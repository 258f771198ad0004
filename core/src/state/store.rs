//! The in-memory copy of the song collection, kept in sync with the songs service.

use log::{debug, info, warn};
use riffshare_api::{AdminToken, SongsApi};
use riffshare_types::{NewSong, Song, SongChangeSet, SongId, VoteDirection};

use super::view::ViewParams;
use crate::errors::StoreError;

/// The client's copy of every song, plus the load status of the last fetch.
///
/// The store only changes after the server confirms a mutation, and always takes the server's
/// copy of the record it answered with.
#[derive(Debug)]
pub struct SongStore<A> {
    api: A,
    songs: Vec<Song>,
    loading: bool,
    error: Option<String>,
    /// bumped every time the collection changes
    version: u64,
}

impl<A: SongsApi> SongStore<A> {
    #[must_use]
    pub const fn new(api: A) -> Self {
        Self {
            api,
            songs: Vec::new(),
            loading: false,
            error: None,
            version: 0,
        }
    }

    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// The songs in the order the server returned them (new submissions first).
    #[must_use]
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    #[must_use]
    pub fn get(&self, id: &SongId) -> Option<&Song> {
        self.songs.iter().find(|song| &song.id == id)
    }

    /// Whether a fetch is in flight.
    ///
    /// Callers can't observe a running fetch through `&mut self`, so in practice this reports a
    /// fetch that was started but never finished (e.g. abandoned on a timeout), which stays
    /// loading until the next fetch completes.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The message from the last failed fetch, cleared by the next successful one.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// The filtered and sorted copy of the collection.
    #[must_use]
    pub fn view(&self, params: &ViewParams) -> Vec<Song> {
        params.apply(&self.songs)
    }

    /// Replace the collection with the server's, returning how many songs were loaded.
    ///
    /// # Errors
    ///
    /// On failure the previous collection is kept and the message is also kept in [`SongStore::error`].
    pub async fn fetch_songs(&mut self) -> Result<usize, StoreError> {
        self.loading = true;
        let result = self.api.list_songs().await;
        self.loading = false;

        match result {
            Ok(songs) => {
                info!("loaded {} songs", songs.len());
                self.songs = songs;
                self.error = None;
                self.version += 1;
                Ok(self.songs.len())
            }
            Err(e) => {
                warn!("failed to load songs: {e}");
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Submit a new song, it goes to the front of the collection once created.
    ///
    /// # Errors
    ///
    /// Fails if the server rejects the submission, the collection is left untouched.
    pub async fn add_song(&mut self, song: &NewSong) -> Result<Song, StoreError> {
        let created = self.api.create_song(song).await.inspect_err(|e| {
            warn!("failed to add \"{}\" by {}: {e}", song.title, song.artist);
        })?;
        info!("added song {}", created.id);
        self.songs.insert(0, created.clone());
        self.version += 1;
        Ok(created)
    }

    /// Cast a vote, the stored song is replaced with the server's updated copy.
    ///
    /// # Errors
    ///
    /// Fails if the server rejects the vote, the collection is left untouched.
    pub async fn vote_song(
        &mut self,
        id: &SongId,
        direction: VoteDirection,
    ) -> Result<Song, StoreError> {
        let updated = self
            .api
            .vote(id, direction)
            .await
            .inspect_err(|e| warn!("failed to {direction} song {id}: {e}"))?;
        self.replace(updated.clone());
        Ok(updated)
    }

    /// Count a download, the stored song is replaced with the server's updated copy.
    ///
    /// # Errors
    ///
    /// Fails if the server rejects the increment, the collection is left untouched.
    pub async fn increment_download(&mut self, id: &SongId) -> Result<Song, StoreError> {
        let updated = self
            .api
            .record_download(id)
            .await
            .inspect_err(|e| warn!("failed to count download of song {id}: {e}"))?;
        self.replace(updated.clone());
        Ok(updated)
    }

    /// Apply `changes` to a song and send the full edited record to the admin endpoint.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the song isn't in the collection
    /// - [`StoreError::EmptyChangeSet`] if `changes` changes nothing
    /// - [`StoreError::Api`] if the server rejects the edit (e.g. a bad token)
    pub async fn edit_song(
        &mut self,
        id: &SongId,
        changes: &SongChangeSet,
        token: &AdminToken,
    ) -> Result<Song, StoreError> {
        if changes.is_empty() {
            return Err(StoreError::EmptyChangeSet);
        }
        let current = self
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let edited = changes.apply(current);

        let updated = self
            .api
            .update_song(&edited, token)
            .await
            .inspect_err(|e| warn!("failed to edit song {id}: {e}"))?;
        info!("edited song {id}");
        self.replace(updated.clone());
        Ok(updated)
    }

    /// Delete a song through the admin endpoint, returning the removed record.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the song isn't in the collection
    /// - [`StoreError::Api`] if the server rejects the deletion
    pub async fn delete_song(
        &mut self,
        id: &SongId,
        token: &AdminToken,
    ) -> Result<Song, StoreError> {
        let index = self
            .songs
            .iter()
            .position(|song| &song.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        self.api
            .delete_song(id, token)
            .await
            .inspect_err(|e| warn!("failed to delete song {id}: {e}"))?;
        info!("deleted song {id}");
        self.version += 1;
        Ok(self.songs.remove(index))
    }

    /// Swap in the server's copy of a song. Songs that were never loaded are ignored.
    fn replace(&mut self, updated: Song) {
        if let Some(song) = self.songs.iter_mut().find(|song| song.id == updated.id) {
            *song = updated;
            self.version += 1;
        } else {
            debug!("song {} is not loaded, not caching the server's copy", updated.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockApi, new_song, numbered_songs};
    use pretty_assertions::assert_eq;
    use riffshare_api::ApiError;
    use rstest::{fixture, rstest};

    #[fixture]
    fn token() -> AdminToken {
        AdminToken::new("secret").unwrap()
    }

    async fn loaded_store(count: usize) -> SongStore<MockApi> {
        let mut store = SongStore::new(MockApi::with_songs(numbered_songs(count)));
        store.fetch_songs().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_fetch_songs() {
        let mut store = SongStore::new(MockApi::with_songs(numbered_songs(3)));
        assert!(store.songs().is_empty());
        assert_eq!(store.version(), 0);

        assert_eq!(store.fetch_songs().await.unwrap(), 3);
        assert_eq!(store.songs().len(), 3);
        assert!(!store.is_loading());
        assert!(store.error().is_none());
        assert_eq!(store.version(), 1);
    }

    /// A service that never answers.
    struct StalledApi;

    impl SongsApi for StalledApi {
        async fn list_songs(&self) -> Result<Vec<Song>, ApiError> {
            std::future::pending().await
        }
        async fn create_song(&self, _: &NewSong) -> Result<Song, ApiError> {
            std::future::pending().await
        }
        async fn vote(&self, _: &SongId, _: VoteDirection) -> Result<Song, ApiError> {
            std::future::pending().await
        }
        async fn record_download(&self, _: &SongId) -> Result<Song, ApiError> {
            std::future::pending().await
        }
        async fn update_song(&self, _: &Song, _: &AdminToken) -> Result<Song, ApiError> {
            std::future::pending().await
        }
        async fn delete_song(&self, _: &SongId, _: &AdminToken) -> Result<(), ApiError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_abandoned_fetch_stays_loading() {
        let mut store = SongStore::new(StalledApi);
        assert!(!store.is_loading());

        let fetch = tokio::time::timeout(std::time::Duration::from_millis(20), store.fetch_songs());
        assert!(fetch.await.is_err());

        assert!(store.is_loading());
        assert!(store.error().is_none());
        assert!(store.songs().is_empty());
        assert_eq!(store.version(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_songs() {
        let mut store = loaded_store(3).await;
        store.api().fail_with(ApiError::from_status(500, r#"{"message":"Error loading songs"}"#));

        let err = store.fetch_songs().await.unwrap_err();
        assert_eq!(err.to_string(), "Error loading songs");
        assert_eq!(store.error(), Some("Error loading songs"));
        assert_eq!(store.songs().len(), 3);
        assert!(!store.is_loading());

        store.api().recover();
        store.fetch_songs().await.unwrap();
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_add_song_prepends() {
        let mut store = loaded_store(2).await;
        let created = store.add_song(&new_song("Tool", "Lateralus")).await.unwrap();

        assert_eq!(store.songs().len(), 3);
        assert_eq!(store.songs()[0], created);
        assert_eq!(created.title, "Lateralus");
        assert_eq!((created.upvotes, created.downvotes, created.downloads), (0, 0, 0));
    }

    #[tokio::test]
    async fn test_add_song_failure_leaves_list() {
        let mut store = loaded_store(2).await;
        store.api().fail_with(ApiError::from_status(400, r#"{"message":"Invalid validation code"}"#));

        let err = store.add_song(&new_song("Tool", "Lateralus")).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid validation code");
        assert_eq!(store.songs().len(), 2);
    }

    #[rstest]
    #[case(VoteDirection::Up, (1, 0))]
    #[case(VoteDirection::Down, (0, 1))]
    #[tokio::test]
    async fn test_vote_song(#[case] direction: VoteDirection, #[case] expected: (u64, u64)) {
        let mut store = loaded_store(3).await;
        let id = store.songs()[1].id.clone();

        let updated = store.vote_song(&id, direction).await.unwrap();
        assert_eq!((updated.upvotes, updated.downvotes), expected);
        assert_eq!(store.get(&id), Some(&updated));
        // other songs untouched
        assert_eq!(store.songs()[0].upvotes + store.songs()[0].downvotes, 0);
        assert_eq!(store.api().calls().votes, 1);
    }

    #[tokio::test]
    async fn test_vote_failure_changes_nothing() {
        let mut store = loaded_store(1).await;
        let id = store.songs()[0].id.clone();
        let before = store.songs().to_vec();
        store.api().fail_with(ApiError::from_status(404, ""));

        assert!(store.vote_song(&id, VoteDirection::Up).await.is_err());
        assert_eq!(store.songs(), before.as_slice());
    }

    #[tokio::test]
    async fn test_increment_download() {
        let mut store = loaded_store(2).await;
        let id = store.songs()[0].id.clone();

        store.increment_download(&id).await.unwrap();
        let updated = store.increment_download(&id).await.unwrap();
        assert_eq!(updated.downloads, 2);
        assert_eq!(store.get(&id).map(|s| s.downloads), Some(2));
    }

    #[rstest]
    #[tokio::test]
    async fn test_edit_song(token: AdminToken) {
        let mut store = loaded_store(2).await;
        let id = store.songs()[0].id.clone();
        let changes = SongChangeSet {
            title: Some("Renamed".into()),
            ..Default::default()
        };

        let updated = store.edit_song(&id, &changes, &token).await.unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(store.get(&id).map(|s| s.title.as_str()), Some("Renamed"));
        assert_eq!(store.api().last_token().as_deref(), Some("secret"));
    }

    #[rstest]
    #[tokio::test]
    async fn test_edit_song_errors(token: AdminToken) {
        let mut store = loaded_store(1).await;
        let id = store.songs()[0].id.clone();

        let err = store
            .edit_song(&id, &SongChangeSet::default(), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::EmptyChangeSet));

        let changes = SongChangeSet {
            artist: Some("x".into()),
            ..Default::default()
        };
        let err = store
            .edit_song(&SongId::new("missing"), &changes, &token)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.api().calls().updates, 0);

        store.api().fail_with(ApiError::from_status(401, r#"{"message":"Unauthorized"}"#));
        let err = store.edit_song(&id, &changes, &token).await.unwrap_err();
        assert!(matches!(err, StoreError::Api(ref e) if e.is_unauthorized()));
        assert_eq!(store.songs()[0].artist, "Artist 0");
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_song(token: AdminToken) {
        let mut store = loaded_store(3).await;
        let id = store.songs()[1].id.clone();

        let removed = store.delete_song(&id, &token).await.unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(store.songs().len(), 2);
        assert!(store.get(&id).is_none());

        let err = store.delete_song(&id, &token).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_view_does_not_reorder_store() {
        let store = loaded_store(5).await;
        let before = store.songs().to_vec();
        let view = store.view(&ViewParams::new(riffshare_types::SongSort::Title));
        assert_eq!(view.len(), 5);
        assert_eq!(store.songs(), before.as_slice());
    }
}
