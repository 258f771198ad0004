//! Test helpers: an in-memory songs service and song builders.

use std::sync::{
    Mutex, MutexGuard,
    atomic::{AtomicUsize, Ordering},
};

use chrono::{DateTime, TimeZone, Utc};
use riffshare_api::{AdminToken, ApiError, SongsApi};
use riffshare_types::{NewSong, Song, SongId, VoteDirection};

use crate::actions::LinkOpener;

/// How many times each endpoint of a [`MockApi`] was called.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Calls {
    pub lists: usize,
    pub creates: usize,
    pub votes: usize,
    pub downloads: usize,
    pub updates: usize,
    pub deletes: usize,
}

/// An in-memory songs service.
///
/// Mutations behave like the real server: they change the stored collection and answer with the
/// updated record. Calls are counted even when they fail.
#[derive(Debug, Default)]
pub struct MockApi {
    songs: Mutex<Vec<Song>>,
    /// status and message every call fails with while set
    failure: Mutex<Option<(u16, String)>>,
    calls: Mutex<Calls>,
    last_token: Mutex<Option<String>>,
    next_id: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl MockApi {
    #[must_use]
    pub fn with_songs(songs: Vec<Song>) -> Self {
        Self {
            songs: Mutex::new(songs),
            ..Self::default()
        }
    }

    /// Make every following call fail the way `error` describes, until [`MockApi::recover`].
    pub fn fail_with(&self, error: ApiError) {
        let status = error.status().unwrap_or(500);
        *lock(&self.failure) = Some((status, error.to_string()));
    }

    pub fn recover(&self) {
        *lock(&self.failure) = None;
    }

    #[must_use]
    pub fn calls(&self) -> Calls {
        *lock(&self.calls)
    }

    /// The token sent with the last admin call.
    #[must_use]
    pub fn last_token(&self) -> Option<String> {
        lock(&self.last_token).clone()
    }

    /// The server-side collection.
    #[must_use]
    pub fn songs(&self) -> Vec<Song> {
        lock(&self.songs).clone()
    }

    fn check(&self, count: impl FnOnce(&mut Calls)) -> Result<(), ApiError> {
        count(&mut lock(&self.calls));
        match lock(&self.failure).as_ref() {
            Some((status, message)) => Err(ApiError::Status {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::from_status(404, r#"{"message":"Song not found"}"#)
    }

    fn update(&self, id: &SongId, change: impl FnOnce(&mut Song)) -> Result<Song, ApiError> {
        let mut songs = lock(&self.songs);
        let song = songs
            .iter_mut()
            .find(|song| &song.id == id)
            .ok_or_else(Self::not_found)?;
        change(song);
        Ok(song.clone())
    }
}

impl SongsApi for MockApi {
    async fn list_songs(&self) -> Result<Vec<Song>, ApiError> {
        self.check(|c| c.lists += 1)?;
        Ok(self.songs())
    }

    async fn create_song(&self, song: &NewSong) -> Result<Song, ApiError> {
        self.check(|c| c.creates += 1)?;
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        let created = Song {
            id: SongId::new(format!("new-{n}")),
            artist: song.artist.clone(),
            title: song.title.clone(),
            song_type: song.song_type.clone(),
            tuning: song.tuning.clone(),
            link: song.link.clone(),
            author: song.author.clone(),
            upvotes: 0,
            downvotes: 0,
            downloads: 0,
            created_at: Utc::now(),
        };
        lock(&self.songs).insert(0, created.clone());
        Ok(created)
    }

    async fn vote(&self, id: &SongId, direction: VoteDirection) -> Result<Song, ApiError> {
        self.check(|c| c.votes += 1)?;
        self.update(id, |song| match direction {
            VoteDirection::Up => song.upvotes += 1,
            VoteDirection::Down => song.downvotes += 1,
        })
    }

    async fn record_download(&self, id: &SongId) -> Result<Song, ApiError> {
        self.check(|c| c.downloads += 1)?;
        self.update(id, |song| song.downloads += 1)
    }

    async fn update_song(&self, song: &Song, token: &AdminToken) -> Result<Song, ApiError> {
        self.check(|c| c.updates += 1)?;
        *lock(&self.last_token) = Some(token.expose().to_owned());
        let edited = song.clone();
        self.update(&song.id, move |stored| *stored = edited)
    }

    async fn delete_song(&self, id: &SongId, token: &AdminToken) -> Result<(), ApiError> {
        self.check(|c| c.deletes += 1)?;
        *lock(&self.last_token) = Some(token.expose().to_owned());
        let mut songs = lock(&self.songs);
        let index = songs
            .iter()
            .position(|song| &song.id == id)
            .ok_or_else(Self::not_found)?;
        songs.remove(index);
        Ok(())
    }
}

/// A [`LinkOpener`] that remembers what it was asked to open instead of opening it.
#[derive(Debug, Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingOpener {
    /// An opener whose every attempt fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn opened(&self) -> Vec<String> {
        lock(&self.opened).clone()
    }
}

impl LinkOpener for RecordingOpener {
    fn open(&self, link: &str) -> std::io::Result<()> {
        lock(&self.opened).push(link.to_owned());
        if self.fail {
            Err(std::io::Error::other("no browser available"))
        } else {
            Ok(())
        }
    }
}

/// A song created on day `day` of January 2024.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn song(
    id: &str,
    artist: &str,
    title: &str,
    song_type: &str,
    tuning: &str,
    author: &str,
    (upvotes, downvotes): (u64, u64),
    downloads: u64,
    day: u32,
) -> Song {
    Song {
        id: SongId::new(id),
        artist: artist.into(),
        title: title.into(),
        song_type: song_type.into(),
        tuning: tuning.into(),
        link: format!("https://example.com/charts/{id}"),
        author: author.into(),
        upvotes,
        downvotes,
        downloads,
        created_at: Utc
            .with_ymd_and_hms(2024, 1, day, 0, 0, 0)
            .single()
            .unwrap_or_default(),
    }
}

/// `count` plain songs with no votes or downloads.
///
/// Song `i` has artist `Artist {i}`, title `Song {i:02}`, and author `user{i}`. Later songs are
/// newer, and the collection is in the order the server would return it (oldest first).
#[must_use]
pub fn numbered_songs(count: usize) -> Vec<Song> {
    (0..count)
        .map(|i| Song {
            id: SongId::new(format!("{i:04}")),
            artist: format!("Artist {i}"),
            title: format!("Song {i:02}"),
            song_type: "Lead".into(),
            tuning: "E Standard".into(),
            link: format!("https://example.com/charts/{i}"),
            author: format!("user{i}"),
            upvotes: 0,
            downvotes: 0,
            downloads: 0,
            created_at: DateTime::from_timestamp(1_700_000_000 + i64::try_from(i).unwrap_or(0) * 60, 0)
                .unwrap_or_default(),
        })
        .collect()
}

/// A valid submission.
#[must_use]
pub fn new_song(artist: &str, title: &str) -> NewSong {
    NewSong {
        artist: artist.into(),
        title: title.into(),
        song_type: "lead".into(),
        tuning: "E Standard".into(),
        link: "https://example.com/charts/new".into(),
        author: "tester".into(),
        validation_code: None,
    }
}

#[cfg(test)]
pub use strategies::arb_songs;
