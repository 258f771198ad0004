#![allow(clippy::module_name_repetitions)]
//----------------------------------------------------------------------------------------- std lib
use std::fmt;
use std::str::FromStr;
//--------------------------------------------------------------------------------- other libraries
use chrono::{DateTime, Utc};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// The server-assigned identifier of a [`Song`].
///
/// Opaque to the client, it is only ever compared for equality and echoed back in request paths.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SongId(String);

impl SongId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SongId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            Err("song id cannot be empty")
        } else {
            Ok(Self(s.to_owned()))
        }
    }
}

impl From<&str> for SongId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for SongId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// This struct holds all the metadata about a custom [`Song`] chart.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Song {
    /// The unique identifier for this [`Song`], assigned by the server.
    #[cfg_attr(feature = "serde", serde(rename = "_id", alias = "id"))]
    pub id: SongId,
    /// Artist of the original track.
    pub artist: String,
    /// Title of the original track.
    pub title: String,
    /// Comma separated list of parts this chart covers, e.g. "Lead, Rhythm".
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub song_type: String,
    /// Tuning the chart is written for.
    pub tuning: String,
    /// External download link.
    pub link: String,
    /// Who made the chart.
    pub author: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub upvotes: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub downvotes: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub downloads: u64,
    /// When the server created this record.
    #[cfg_attr(feature = "serde", serde(default))]
    pub created_at: DateTime<Utc>,
}

impl Song {
    /// upvotes minus downvotes
    #[must_use]
    pub fn score(&self) -> i64 {
        saturating_i64(self.upvotes) - saturating_i64(self.downvotes)
    }

    /// The lowercased, trimmed entries of the comma separated type list.
    pub fn tags(&self) -> impl Iterator<Item = String> + '_ {
        self.song_type
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_lowercase)
    }

    /// Check if this song's type list contains `tag`, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim().to_lowercase();
        self.tags().any(|t| t == tag)
    }
}

fn saturating_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// The parts a chart can be submitted for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SongType {
    Lead,
    Rhythm,
    Bass,
    Ukulele,
    Other,
}

impl SongType {
    /// Join a selection of types into the wire representation, e.g. "lead, bass".
    #[must_use]
    pub fn join(types: &[Self]) -> String {
        types
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Tuning presets offered when submitting a chart.
///
/// [`Tuning::Custom`] means the submitter provides their own tuning name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Tuning {
    #[default]
    #[strum(serialize = "E Standard")]
    EStandard,
    #[strum(serialize = "Drop D")]
    DropD,
    #[strum(serialize = "Drop C")]
    DropC,
    #[strum(serialize = "Drop C#")]
    DropCSharp,
    #[strum(serialize = "Drop B")]
    DropB,
    #[strum(serialize = "D Standard")]
    DStandard,
    #[strum(serialize = "C# Standard")]
    CSharpStandard,
    #[strum(serialize = "C Standard")]
    CStandard,
    #[strum(serialize = "B Standard")]
    BStandard,
    #[strum(to_string = "Custom", serialize = "other")]
    Custom,
}

impl Tuning {
    /// Every tuning except [`Tuning::Custom`].
    pub fn presets() -> impl Iterator<Item = Self> {
        Self::iter().filter(|t| *t != Self::Custom)
    }
}

/// The payload used to submit a new [`Song`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct NewSong {
    pub artist: String,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub song_type: String,
    pub tuning: String,
    pub link: String,
    pub author: String,
    /// Submission code handed out by the community, forwarded so the server can check it.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub validation_code: Option<String>,
}

/// The fields an administrator may change on an existing [`Song`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SongChangeSet {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub artist: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub title: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "type", skip_serializing_if = "Option::is_none")
    )]
    pub song_type: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub tuning: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub link: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub author: Option<String>,
}

impl SongChangeSet {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.artist.is_none()
            && self.title.is_none()
            && self.song_type.is_none()
            && self.tuning.is_none()
            && self.link.is_none()
            && self.author.is_none()
    }

    /// create the edited copy of `song`, fields not present in the changeset are kept as is
    #[must_use]
    pub fn apply(&self, song: &Song) -> Song {
        let pick = |change: &Option<String>, current: &String| {
            change.clone().unwrap_or_else(|| current.clone())
        };

        Song {
            id: song.id.clone(),
            artist: pick(&self.artist, &song.artist),
            title: pick(&self.title, &song.title),
            song_type: pick(&self.song_type, &song.song_type),
            tuning: pick(&self.tuning, &song.tuning),
            link: pick(&self.link, &song.link),
            author: pick(&self.author, &song.author),
            upvotes: song.upvotes,
            downvotes: song.downvotes,
            downloads: song.downloads,
            created_at: song.created_at,
        }
    }
}
