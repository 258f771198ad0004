pub mod implementations;
pub mod printing;
pub mod utils;


use clap::{Args, Subcommand};
use riffshare_api::SongsApi;
use riffshare_core::{actions::LinkOpener, config::Settings, local::LocalStore, state::SongStore};
use riffshare_types::{SongId, SongSort, SongType, SortOrder, Tuning, ValueFilter, VoteDirection};

/// Everything a command needs: the song collection, the local store, and the settings.
pub struct Context<'a, A, O> {
    pub store: SongStore<A>,
    pub local: LocalStore,
    pub settings: &'a Settings,
    pub opener: O,
}

impl<'a, A: SongsApi, O: LinkOpener> Context<'a, A, O> {
    pub const fn new(api: A, local: LocalStore, settings: &'a Settings, opener: O) -> Self {
        Self {
            store: SongStore::new(api),
            local,
            settings,
            opener,
        }
    }
}

pub trait CommandHandler {
    type Output;

    async fn handle<A, O, W1, W2, S>(
        &self,
        ctx: &mut Context<'_, A, O>,
        stdout: &mut W1,
        stderr: &mut W2,
        stdin: &S,
    ) -> Self::Output
    where
        A: SongsApi,
        O: LinkOpener,
        W1: std::fmt::Write,
        W2: std::fmt::Write,
        S: utils::StdIn;
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Browse the song list
    #[clap(alias = "ls")]
    List(ListArgs),
    /// List every tuning used in the song list
    Tunings,
    /// Show everything about one song
    Show {
        /// The id of the song
        id: SongId,
    },
    /// Submit a new song
    Add(AddArgs),
    /// Vote on a song (once per song)
    Vote {
        /// The id of the song
        id: SongId,
        /// "up" or "down"
        direction: VoteDirection,
    },
    /// Count a download and open the song's link
    Download {
        /// The id of the song
        id: SongId,
    },
    /// List the songs you voted on
    Votes,
    /// Moderation commands
    Admin {
        #[clap(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Debug, Default, PartialEq, Eq, Args)]
pub struct ListArgs {
    /// Only songs whose artist, title, or author contain this
    #[clap(long, short)]
    pub search: Option<String>,
    /// Sort key (defaults to the configured sort)
    #[clap(long)]
    pub sort: Option<SongSort>,
    /// "asc" or "desc" (defaults to the sort key's natural direction)
    #[clap(long)]
    pub order: Option<SortOrder>,
    /// Only songs covering this part, e.g. "lead" ("all" for no filter)
    #[clap(long = "type", short = 't', default_value = "all")]
    pub song_type: ValueFilter,
    /// Only songs in this tuning ("all" for no filter)
    #[clap(long, default_value = "all")]
    pub tuning: ValueFilter,
    /// Page to show, starting at 1
    #[clap(long, short, default_value = "1")]
    pub page: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Args)]
pub struct AddArgs {
    /// Artist of the original track
    #[clap(long)]
    pub artist: String,
    /// Title of the original track
    #[clap(long)]
    pub title: String,
    /// Parts the chart covers, comma separated or repeated
    #[clap(long = "type", short = 't', value_delimiter = ',', required = true)]
    pub types: Vec<SongType>,
    /// Tuning preset, or "Custom" together with --custom-tuning
    #[clap(long, default_value = "E Standard")]
    pub tuning: Tuning,
    /// Tuning name when --tuning is "Custom"
    #[clap(long)]
    pub custom_tuning: Option<String>,
    /// Download link (http or https)
    #[clap(long, value_hint = clap::ValueHint::Url)]
    pub link: String,
    /// Your name
    #[clap(long)]
    pub author: String,
    /// Submission code from the community channel
    #[clap(long)]
    pub code: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum AdminCommand {
    /// Store an admin token for the moderation commands
    Login {
        /// The bearer token issued by the songs service
        token: String,
    },
    /// Forget the stored admin token
    #[clap(alias = "exit")]
    Logout,
    /// Browse the full song list as a moderator
    List {
        /// Only songs whose title, artist, or author contain this
        #[clap(long, short)]
        search: Option<String>,
        /// Page to show, starting at 1
        #[clap(long, short, default_value = "1")]
        page: usize,
    },
    /// Change fields of a song
    Edit {
        /// The id of the song
        id: SongId,
        #[clap(flatten)]
        changes: EditArgs,
    },
    /// Delete a song
    Delete {
        /// The id of the song
        id: SongId,
        /// Skip the confirmation prompt
        #[clap(long, short)]
        yes: bool,
    },
}

#[derive(Debug, Default, PartialEq, Eq, Args)]
pub struct EditArgs {
    #[clap(long)]
    pub artist: Option<String>,
    #[clap(long)]
    pub title: Option<String>,
    /// Comma separated parts, e.g. "Lead, Bass"
    #[clap(long = "type")]
    pub song_type: Option<String>,
    #[clap(long)]
    pub tuning: Option<String>,
    #[clap(long, value_hint = clap::ValueHint::Url)]
    pub link: Option<String>,
    #[clap(long)]
    pub author: Option<String>,
}
