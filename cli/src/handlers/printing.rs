//! Handles displaying the output of the commands in a human readable format.

use std::fmt::Write;

use riffshare_core::{
    local::LocalStore,
    state::{PageMarker, PageView, ViewParams},
};
use riffshare_types::{Song, SongId, Tuning, VoteDirection};

pub const WELCOME: &str = "\
Welcome!
Welcome to the ultimate spot to find and master your favorite songs!
Here you can browse the community-created library. If you can't find a song you're looking for,
ask for it on the community channel.
For our creators, thank you for contributing! Use `riffshare add` to share your custom songs.
Let's rock!";

fn vote_marker(vote: Option<VoteDirection>) -> &'static str {
    match vote {
        Some(VoteDirection::Up) => " [you voted up]",
        Some(VoteDirection::Down) => " [you voted down]",
        None => "",
    }
}

/// A single song on one line.
pub fn song_line(song: &Song, vote: Option<VoteDirection>) -> String {
    format!(
        "{}: \"{}\" by {} [{} | {}] score {:+} (+{}/-{}), {} downloads, by {}{}",
        song.id,
        song.title,
        song.artist,
        song.song_type,
        song.tuning,
        song.score(),
        song.upvotes,
        song.downvotes,
        song.downloads,
        song.author,
        vote_marker(vote),
    )
}

/// The page links, with the current page in brackets.
pub fn page_links(view: &PageView) -> String {
    view.window()
        .into_iter()
        .map(|marker| match marker {
            PageMarker::Page(page) if page == view.page => format!("[{page}]"),
            PageMarker::Page(page) => page.to_string(),
            PageMarker::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A page of the song list, with its header and page links.
pub fn song_page(
    prefix: &str,
    view: &PageView,
    params: Option<&ViewParams>,
    local: &LocalStore,
) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    if view.is_empty() {
        writeln!(output, "No songs found")?;
        return Ok(output);
    }

    write!(
        output,
        "{prefix} ({} found) - Page {} of {}",
        view.total_matches, view.page, view.total_pages
    )?;
    if let Some(params) = params {
        write!(output, ", sorted by {} ({})", params.sort, params.order)?;
    }
    writeln!(output, ":")?;

    for song in &view.songs {
        writeln!(output, "\t{}", song_line(song, local.vote_for(&song.id)))?;
    }

    if view.total_pages > 1 {
        writeln!(output, "Pages: {}", page_links(view))?;
    }

    Ok(output)
}

/// Everything about one song.
pub fn song_details(song: &Song, vote: Option<VoteDirection>) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "Song:")?;
    writeln!(output, "\tId: {}", song.id)?;
    writeln!(output, "\tTitle: {}", song.title)?;
    writeln!(output, "\tArtist: {}", song.artist)?;
    writeln!(output, "\tType: {}", song.song_type)?;
    writeln!(output, "\tTuning: {}", song.tuning)?;
    writeln!(output, "\tLink: {}", song.link)?;
    writeln!(output, "\tAuthor: {}", song.author)?;
    writeln!(
        output,
        "\tVotes: {:+} (+{}/-{})",
        song.score(),
        song.upvotes,
        song.downvotes
    )?;
    writeln!(output, "\tDownloads: {}", song.downloads)?;
    writeln!(output, "\tAdded: {}", song.created_at.format("%Y-%m-%d"))?;
    match vote {
        Some(direction) => writeln!(output, "\tYour vote: {direction}")?,
        None => writeln!(output, "\tYour vote: none")?,
    }

    Ok(output)
}

/// The tunings in use, followed by the presets `riffshare add` accepts.
pub fn tuning_list(tunings: &[String]) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "Tunings:")?;
    for tuning in tunings {
        writeln!(output, "\t{tuning}")?;
    }
    let presets: Vec<String> = Tuning::presets().map(|t| t.to_string()).collect();
    writeln!(
        output,
        "Presets for `add --tuning`: {}, or {} with --custom-tuning",
        presets.join(", "),
        Tuning::Custom
    )?;

    Ok(output)
}

/// The songs this machine voted on, looked up in `songs` when present.
pub fn vote_list(local: &LocalStore, songs: &[Song]) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    let votes: Vec<(&SongId, VoteDirection)> = local.votes().collect();
    if votes.is_empty() {
        writeln!(output, "You haven't voted on any songs yet")?;
        return Ok(output);
    }

    writeln!(output, "Your votes:")?;
    for (id, direction) in votes {
        match songs.iter().find(|song| &song.id == id) {
            Some(song) => writeln!(
                output,
                "\t{direction}: {id}: \"{}\" by {}",
                song.title, song.artist
            )?,
            None => writeln!(output, "\t{direction}: {id} (no longer listed)")?,
        }
    }

    Ok(output)
}
