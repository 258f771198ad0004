//! Sort keys, sort directions, and value filters for lists of songs.

use std::{fmt, str::FromStr};

use strum::{Display, EnumIter, EnumString};

/// What to sort a song list by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SongSort {
    /// Creation time
    #[default]
    Recent,
    /// Score (upvotes minus downvotes)
    Popular,
    Downloads,
    Title,
    Artist,
    Type,
    Tuning,
    Author,
}

impl SongSort {
    /// The direction a list is sorted in when this key is first selected.
    ///
    /// Numeric and temporal keys show the biggest/newest first, text keys go A to Z.
    #[must_use]
    pub const fn default_order(self) -> SortOrder {
        if self.is_numeric() {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Recent | Self::Popular | Self::Downloads)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(ascii_case_insensitive)]
pub enum SortOrder {
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "asc"))]
    #[strum(to_string = "ascending", serialize = "asc")]
    Ascending,
    #[cfg_attr(feature = "serde", serde(alias = "desc"))]
    #[strum(to_string = "descending", serialize = "desc")]
    Descending,
}

impl SortOrder {
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Apply this direction to an ascending ordering.
    #[must_use]
    pub const fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// A filter that either lets everything through or requires a specific value.
///
/// Parses `"all"` (any case) or an empty string as [`ValueFilter::All`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ValueFilter {
    #[default]
    All,
    Only(String),
}

impl ValueFilter {
    #[must_use]
    pub fn only(value: impl Into<String>) -> Self {
        Self::Only(value.into())
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(value),
        }
    }
}

impl fmt::Display for ValueFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(value) => write!(f, "{value}"),
        }
    }
}

impl FromStr for ValueFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Only(s.to_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(SongSort::Recent, SortOrder::Descending)]
    #[case(SongSort::Popular, SortOrder::Descending)]
    #[case(SongSort::Downloads, SortOrder::Descending)]
    #[case(SongSort::Title, SortOrder::Ascending)]
    #[case(SongSort::Author, SortOrder::Ascending)]
    fn test_default_order(#[case] sort: SongSort, #[case] expected: SortOrder) {
        assert_eq!(sort.default_order(), expected);
    }

    #[rstest]
    #[case("popular", SongSort::Popular)]
    #[case("TITLE", SongSort::Title)]
    #[case("type", SongSort::Type)]
    fn test_parse_sort(#[case] input: &str, #[case] expected: SongSort) {
        assert_eq!(input.parse::<SongSort>().unwrap(), expected);
    }

    #[rstest]
    #[case("asc", SortOrder::Ascending)]
    #[case("Descending", SortOrder::Descending)]
    #[case("DESC", SortOrder::Descending)]
    fn test_parse_order(#[case] input: &str, #[case] expected: SortOrder) {
        assert_eq!(input.parse::<SortOrder>().unwrap(), expected);
    }

    #[rstest]
    #[case("all", ValueFilter::All)]
    #[case("ALL", ValueFilter::All)]
    #[case("  ", ValueFilter::All)]
    #[case("Drop D", ValueFilter::only("Drop D"))]
    fn test_parse_filter(#[case] input: &str, #[case] expected: ValueFilter) {
        assert_eq!(input.parse::<ValueFilter>().unwrap(), expected);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(SortOrder::Ascending.toggle(), SortOrder::Descending);
        assert_eq!(
            SortOrder::Descending.apply(std::cmp::Ordering::Less),
            std::cmp::Ordering::Greater
        );
    }
}
