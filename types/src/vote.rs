//! Up/down votes on a [`crate::Song`].

use strum::{Display, EnumIter, EnumString};

/// The direction of a vote.
///
/// On the wire (and in the local vote record) these are `"upvote"` and `"downvote"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(ascii_case_insensitive)]
pub enum VoteDirection {
    #[cfg_attr(feature = "serde", serde(rename = "upvote", alias = "up"))]
    #[strum(to_string = "upvote", serialize = "up", serialize = "+")]
    Up,
    #[cfg_attr(feature = "serde", serde(rename = "downvote", alias = "down"))]
    #[strum(to_string = "downvote", serialize = "down", serialize = "-")]
    Down,
}

/// Body of a vote request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VoteRequest {
    pub vote_type: VoteDirection,
}

impl VoteRequest {
    #[must_use]
    pub const fn new(vote_type: VoteDirection) -> Self {
        Self { vote_type }
    }
}
