//! Client-side state: the song collection and the views over it.

pub mod pagination;
pub mod store;
pub mod view;

pub use pagination::{PageMarker, PageView, Paginator, SongListState, page_window};
pub use store::SongStore;
pub use view::{ViewParams, unique_tunings};
