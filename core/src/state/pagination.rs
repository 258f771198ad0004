//! Paging through a (filtered and sorted) song list.

use std::num::NonZeroUsize;

use riffshare_types::{Song, SongSort, SortOrder, ValueFilter};

use super::view::ViewParams;
use crate::config::default_page_size;

/// Tracks the current page of a list with a fixed page size.
///
/// Pages are 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paginator {
    page_size: NonZeroUsize,
    current: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(default_page_size())
    }
}

impl Paginator {
    /// A paginator on page 1. A page size of 0 falls back to the default.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        let page_size = NonZeroUsize::new(page_size)
            .or_else(|| NonZeroUsize::new(default_page_size()))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            page_size,
            current: 1,
        }
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size.get()
    }

    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// How many pages `len` items span. An empty list has 0 pages.
    #[must_use]
    pub const fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size.get())
    }

    /// The current page, clamped to the pages `len` items actually span.
    #[must_use]
    pub fn effective_page(&self, len: usize) -> usize {
        self.current.clamp(1, self.total_pages(len).max(1))
    }

    /// The slice of `items` on the current page.
    #[must_use]
    pub fn page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.effective_page(items.len()) - 1) * self.page_size();
        let end = (start + self.page_size()).min(items.len());
        items.get(start..end).unwrap_or_default()
    }

    /// Jump to `page`, clamped to the pages `len` items span. Returns the page landed on.
    pub fn go_to(&mut self, page: usize, len: usize) -> usize {
        self.current = page.clamp(1, self.total_pages(len).max(1));
        self.current
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }
}

/// One entry in the list of page links.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

/// The page links to show for `current` out of `total` pages.
///
/// The first and last page are always shown, as are the two pages on either side of the current
/// one. A gap beyond that window is marked with a single [`PageMarker::Ellipsis`] on each side.
#[must_use]
pub fn page_window(current: usize, total: usize) -> Vec<PageMarker> {
    let mut markers = Vec::new();
    for page in 1..=total {
        if page == 1 || page == total || page.abs_diff(current) <= 2 {
            markers.push(PageMarker::Page(page));
        } else if page.abs_diff(current) == 3 {
            markers.push(PageMarker::Ellipsis);
        }
    }
    markers
}

/// One rendered page of a song list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageView {
    /// The songs on this page, in display order
    pub songs: Vec<Song>,
    /// 1-based page number
    pub page: usize,
    pub total_pages: usize,
    /// How many songs matched the search and filters, across all pages
    pub total_matches: usize,
}

impl PageView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_matches == 0
    }

    #[must_use]
    pub fn window(&self) -> Vec<PageMarker> {
        page_window(self.page, self.total_pages)
    }
}

/// The browsing state of a song list: search, filters, sort, and page.
///
/// Changing the search, a filter, or the sort sends the list back to page 1.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SongListState {
    params: ViewParams,
    paginator: Paginator,
}

impl SongListState {
    #[must_use]
    pub fn new(page_size: usize, sort: SongSort) -> Self {
        Self {
            params: ViewParams::new(sort),
            paginator: Paginator::new(page_size),
        }
    }

    #[must_use]
    pub const fn params(&self) -> &ViewParams {
        &self.params
    }

    #[must_use]
    pub const fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.params.search = search.into();
        self.paginator.reset();
    }

    /// Sort by `sort`, in that key's default direction.
    pub fn set_sort(&mut self, sort: SongSort) {
        self.params.sort = sort;
        self.params.order = sort.default_order();
        self.paginator.reset();
    }

    pub fn set_order(&mut self, order: SortOrder) {
        self.params.order = order;
        self.paginator.reset();
    }

    pub fn toggle_order(&mut self) {
        self.set_order(self.params.order.toggle());
    }

    pub fn set_type_filter(&mut self, filter: ValueFilter) {
        self.params.type_filter = filter;
        self.paginator.reset();
    }

    pub fn set_tuning_filter(&mut self, filter: ValueFilter) {
        self.params.tuning_filter = filter;
        self.paginator.reset();
    }

    /// Jump to `page` of the view over `songs`, returns the page landed on.
    pub fn go_to_page(&mut self, page: usize, songs: &[Song]) -> usize {
        let len = songs.iter().filter(|song| self.params.matches(song)).count();
        self.paginator.go_to(page, len)
    }

    /// Filter, sort, and page `songs`.
    #[must_use]
    pub fn view(&self, songs: &[Song]) -> PageView {
        let matched = self.params.apply(songs);
        PageView {
            songs: self.paginator.page(&matched).to_vec(),
            page: self.paginator.effective_page(matched.len()),
            total_pages: self.paginator.total_pages(matched.len()),
            total_matches: matched.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{arb_songs, numbered_songs};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    use PageMarker::{Ellipsis, Page};

    #[rstest]
    #[case(0, 20, 0)]
    #[case(1, 20, 1)]
    #[case(20, 20, 1)]
    #[case(21, 20, 2)]
    #[case(45, 20, 3)]
    #[case(45, 0, 3)]
    #[case(7, 3, 3)]
    fn test_total_pages(#[case] len: usize, #[case] page_size: usize, #[case] expected: usize) {
        assert_eq!(Paginator::new(page_size).total_pages(len), expected);
    }

    #[test]
    fn test_forty_five_songs() {
        let songs = numbered_songs(45);
        let mut paginator = Paginator::new(20);

        assert_eq!(paginator.page(&songs).len(), 20);
        assert_eq!(paginator.go_to(2, songs.len()), 2);
        assert_eq!(paginator.page(&songs).len(), 20);
        assert_eq!(paginator.go_to(3, songs.len()), 3);
        assert_eq!(paginator.page(&songs).len(), 5);
        assert_eq!(paginator.total_pages(songs.len()), 3);

        assert_eq!(paginator.go_to(99, songs.len()), 3);
        assert_eq!(paginator.go_to(0, songs.len()), 1);
    }

    #[test]
    fn test_empty_list() {
        let mut paginator = Paginator::new(20);
        let empty: [Song; 0] = [];
        assert!(paginator.page(&empty).is_empty());
        assert_eq!(paginator.total_pages(0), 0);
        assert_eq!(paginator.go_to(5, 0), 1);
    }

    #[rstest]
    #[case(1, 1, vec![Page(1)])]
    #[case(1, 3, vec![Page(1), Page(2), Page(3)])]
    #[case(1, 10, vec![Page(1), Page(2), Page(3), Ellipsis, Page(10)])]
    #[case(5, 10, vec![Page(1), Ellipsis, Page(3), Page(4), Page(5), Page(6), Page(7), Ellipsis, Page(10)])]
    #[case(4, 10, vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6), Ellipsis, Page(10)])]
    #[case(10, 10, vec![Page(1), Ellipsis, Page(8), Page(9), Page(10)])]
    #[case(1, 0, vec![])]
    fn test_page_window(
        #[case] current: usize,
        #[case] total: usize,
        #[case] expected: Vec<PageMarker>,
    ) {
        assert_eq!(page_window(current, total), expected);
    }

    #[test]
    fn test_list_state_resets_page() {
        let songs = numbered_songs(45);
        let mut state = SongListState::new(20, SongSort::Recent);

        state.go_to_page(3, &songs);
        assert_eq!(state.paginator().current(), 3);
        state.set_search("song");
        assert_eq!(state.paginator().current(), 1);

        state.go_to_page(2, &songs);
        state.set_sort(SongSort::Title);
        assert_eq!(state.paginator().current(), 1);
        assert_eq!(state.params().order, SortOrder::Ascending);

        state.go_to_page(2, &songs);
        state.toggle_order();
        assert_eq!(state.paginator().current(), 1);
        assert_eq!(state.params().order, SortOrder::Descending);

        state.go_to_page(2, &songs);
        state.set_type_filter(ValueFilter::only("lead"));
        assert_eq!(state.paginator().current(), 1);

        state.go_to_page(2, &songs);
        state.set_tuning_filter(ValueFilter::All);
        assert_eq!(state.paginator().current(), 1);
    }

    #[test]
    fn test_view_reports_totals() {
        let songs = numbered_songs(45);
        let mut state = SongListState::new(20, SongSort::Recent);
        state.go_to_page(3, &songs);

        let view = state.view(&songs);
        assert_eq!(view.page, 3);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.total_matches, 45);
        assert_eq!(view.songs.len(), 5);
        assert!(!view.is_empty());

        state.set_search("no such song");
        let view = state.view(&songs);
        assert!(view.is_empty());
        assert_eq!(view.total_pages, 0);
        assert_eq!(view.page, 1);
    }

    #[test]
    fn test_title_pages() {
        let songs = numbered_songs(45);
        let mut state = SongListState::new(20, SongSort::Recent);
        state.set_sort(SongSort::Title);

        let titles = |view: PageView| view.songs.into_iter().map(|s| s.title).collect::<Vec<_>>();

        let first = titles(state.view(&songs));
        assert_eq!(first.len(), 20);
        assert_eq!(first.first().map(String::as_str), Some("Song 00"));
        assert_eq!(first.last().map(String::as_str), Some("Song 19"));

        state.go_to_page(3, &songs);
        let last = titles(state.view(&songs));
        assert_eq!(last, vec!["Song 40", "Song 41", "Song 42", "Song 43", "Song 44"]);
    }

    #[test]
    fn test_view_clamps_after_list_shrinks() {
        let mut state = SongListState::new(20, SongSort::Recent);
        state.go_to_page(3, &numbered_songs(45));

        let view = state.view(&numbered_songs(10));
        assert_eq!(view.page, 1);
        assert_eq!(view.songs.len(), 10);
    }

    proptest! {
        #[test]
        fn pages_concatenate_to_the_view(songs in arb_songs(0..60), page_size in 1usize..15) {
            let state = SongListState::new(page_size, SongSort::Popular);
            let full = state.params().apply(&songs);

            let mut paginator = Paginator::new(page_size);
            let mut joined = Vec::new();
            for page in 1..=paginator.total_pages(full.len()).max(1) {
                paginator.go_to(page, full.len());
                joined.extend_from_slice(paginator.page(&full));
            }
            prop_assert_eq!(joined, full);
        }

        #[test]
        fn window_always_has_the_ends(total in 1usize..50, current in 1usize..50) {
            let current = current.min(total);
            let window = page_window(current, total);
            prop_assert_eq!(window.first(), Some(&Page(1)));
            prop_assert_eq!(window.last(), Some(&Page(total)));
            prop_assert!(window.contains(&Page(current)));
        }
    }
}
