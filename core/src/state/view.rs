//! The filtered and sorted view over the song collection.
//!
//! Everything here works on copies, the stored collection is never reordered.

use std::{cmp::Ordering, collections::BTreeSet};

use icu_collator::{Collator, CollatorOptions, Strength};
use log::warn;
use riffshare_types::{Song, SongSort, SortOrder, ValueFilter};

/// Search, filter, and sort inputs for a song list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewParams {
    /// case-insensitive substring of the artist, title, or author
    pub search: String,
    pub sort: SongSort,
    pub order: SortOrder,
    /// a tag that must appear in the song's type list
    pub type_filter: ValueFilter,
    /// the exact tuning (ignoring case)
    pub tuning_filter: ValueFilter,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self::new(SongSort::default())
    }
}

impl ViewParams {
    /// No search or filters, sorted by `sort` in its default direction.
    #[must_use]
    pub fn new(sort: SongSort) -> Self {
        Self {
            search: String::new(),
            sort,
            order: sort.default_order(),
            type_filter: ValueFilter::All,
            tuning_filter: ValueFilter::All,
        }
    }

    /// Check if `song` passes the search and both filters.
    #[must_use]
    pub fn matches(&self, song: &Song) -> bool {
        matches_search(song, &self.search)
            && self.type_filter.value().is_none_or(|tag| song.has_tag(tag))
            && self
                .tuning_filter
                .value()
                .is_none_or(|tuning| song.tuning.to_lowercase() == tuning.trim().to_lowercase())
    }

    /// Sort `songs` in place by the selected key and direction.
    ///
    /// The sort is stable, songs that compare equal keep their relative order.
    pub fn sort(&self, songs: &mut [Song]) {
        songs.sort_by(|a, b| self.order.apply(compare(self.sort, a, b)));
    }

    /// The filtered and sorted copy of `songs`.
    #[must_use]
    pub fn apply(&self, songs: &[Song]) -> Vec<Song> {
        let mut filtered: Vec<Song> = songs
            .iter()
            .filter(|song| self.matches(song))
            .cloned()
            .collect();
        self.sort(&mut filtered);
        filtered
    }
}

/// Check if the artist, title, or author of `song` contains `term`, ignoring case.
///
/// An empty (or all whitespace) term matches everything.
#[must_use]
pub fn matches_search(song: &Song, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    term.is_empty()
        || song.artist.to_lowercase().contains(&term)
        || song.title.to_lowercase().contains(&term)
        || song.author.to_lowercase().contains(&term)
}

/// Compare two songs by `sort`, ascending.
#[must_use]
pub fn compare(sort: SongSort, a: &Song, b: &Song) -> Ordering {
    match sort {
        SongSort::Recent => a.created_at.cmp(&b.created_at),
        SongSort::Popular => a.score().cmp(&b.score()),
        SongSort::Downloads => a.downloads.cmp(&b.downloads),
        SongSort::Title => collate(&a.title, &b.title),
        SongSort::Artist => collate(&a.artist, &b.artist),
        SongSort::Type => collate(&a.song_type, &b.song_type),
        SongSort::Tuning => collate(&a.tuning, &b.tuning),
        SongSort::Author => collate(&a.author, &b.author),
    }
}

thread_local! {
    /// Root-locale collator that tells letters and accents apart, but not case.
    static COLLATOR: Option<Collator> = {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Secondary);
        Collator::try_new(&Default::default(), options)
            .inspect_err(|e| warn!("no collation data, sorting by case-folded text: {e}"))
            .ok()
    };
}

/// Compare strings the way a reader would: by letter ignoring case, so "Émilie" sorts with the
/// E's, then by raw text to break ties.
#[must_use]
pub fn collate(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| match collator {
            Some(collator) => collator.compare(a, b),
            None => a
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase)),
        })
        .then_with(|| a.cmp(b))
}

/// Every distinct tuning in `songs`, sorted.
#[must_use]
pub fn unique_tunings(songs: &[Song]) -> Vec<String> {
    songs
        .iter()
        .map(|song| song.tuning.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(ToOwned::to_owned)
        .collect()
}
