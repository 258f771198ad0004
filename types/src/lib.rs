//! The data model shared by the riffshare API client, core library, and frontends.

pub mod song;
pub mod sort;
pub mod vote;

pub use song::{NewSong, Song, SongChangeSet, SongId, SongType, Tuning};
pub use sort::{SongSort, SortOrder, ValueFilter};
pub use vote::{VoteDirection, VoteRequest};
