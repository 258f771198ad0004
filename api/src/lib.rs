//! Client for the remote songs service.
//!
//! [`SongsApi`] describes the service as the rest of riffshare consumes it,
//! [`HttpClient`] is the implementation that talks JSON over HTTP.

pub mod auth;
pub mod client;
pub mod errors;

pub use auth::AdminToken;
pub use client::{HttpClient, MutationMethod};
pub use errors::ApiError;

use riffshare_types::{NewSong, Song, SongId, VoteDirection};

/// The operations the songs service offers.
///
/// Every mutating call answers with the server's copy of the affected record,
/// which callers should prefer over any local bookkeeping.
#[allow(async_fn_in_trait)]
pub trait SongsApi {
    /// `GET /songs`
    async fn list_songs(&self) -> Result<Vec<Song>, ApiError>;

    /// `POST /songs`
    async fn create_song(&self, song: &NewSong) -> Result<Song, ApiError>;

    /// `POST|PATCH /songs/:id/vote`
    async fn vote(&self, id: &SongId, direction: VoteDirection) -> Result<Song, ApiError>;

    /// `POST|PATCH /songs/:id/download`
    async fn record_download(&self, id: &SongId) -> Result<Song, ApiError>;

    /// `PUT /admin/songs/:id`, sends the full edited record.
    async fn update_song(&self, song: &Song, token: &AdminToken) -> Result<Song, ApiError>;

    /// `DELETE /admin/songs/:id`
    async fn delete_song(&self, id: &SongId, token: &AdminToken) -> Result<(), ApiError>;
}
