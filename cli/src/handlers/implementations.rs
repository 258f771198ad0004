use std::fmt::Write;

use crate::handlers::{printing, utils};

use super::{AddArgs, AdminCommand, Command, CommandHandler, Context, EditArgs, ListArgs};

use log::warn;
use riffshare_api::SongsApi;
use riffshare_core::{
    actions::{self, AdminSession, LinkOpener, Notification, VoteOutcome},
    errors::AdminError,
    form::{EditForm, SongForm},
    local::LocalStore,
    state::{SongListState, unique_tunings},
};

/// Show the welcome message on the first run, then remember that it was shown.
pub fn show_welcome<W: Write>(local: &mut LocalStore, out: &mut W) -> std::fmt::Result {
    if local.is_first_visit() {
        writeln!(out, "{}\n", printing::WELCOME)?;
        local.mark_visited();
        if let Err(e) = local.save() {
            warn!("could not remember the first visit: {e}");
        }
    }
    Ok(())
}

/// Load the song list, reporting a failure on `stderr`. Returns whether the list was loaded.
async fn load<A: SongsApi, O: LinkOpener, W: Write>(
    ctx: &mut Context<'_, A, O>,
    stderr: &mut W,
) -> Result<bool, std::fmt::Error> {
    match ctx.store.fetch_songs().await {
        Ok(_) => Ok(true),
        Err(e) => {
            writeln!(stderr, "Error: {e}")?;
            Ok(false)
        }
    }
}

fn notify<W1: Write, W2: Write>(
    notification: &Notification,
    stdout: &mut W1,
    stderr: &mut W2,
) -> std::fmt::Result {
    match notification {
        Notification::Success(message) => writeln!(stdout, "{message}"),
        Notification::Error(message) => writeln!(stderr, "{message}"),
    }
}

impl CommandHandler for Command {
    type Output = anyhow::Result<()>;

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
        W1: Write,
        W2: Write,
        S: utils::StdIn,
    {
        match self {
            Self::List(args) => {
                if load(ctx, stderr).await? {
                    let state = list_state(ctx, args);
                    let view = state.view(ctx.store.songs());
                    write!(
                        stdout,
                        "{}",
                        printing::song_page("Songs", &view, Some(state.params()), &ctx.local)?
                    )?;
                }
                Ok(())
            }
            Self::Tunings => {
                if load(ctx, stderr).await? {
                    let tunings = unique_tunings(ctx.store.songs());
                    write!(stdout, "{}", printing::tuning_list(&tunings)?)?;
                }
                Ok(())
            }
            Self::Show { id } => {
                if load(ctx, stderr).await? {
                    match ctx.store.get(id) {
                        Some(song) => write!(
                            stdout,
                            "{}",
                            printing::song_details(song, ctx.local.vote_for(id))?
                        )?,
                        None => writeln!(stderr, "Song {id} is not in the list")?,
                    }
                }
                Ok(())
            }
            Self::Add(args) => add(ctx, args, stdout, stderr).await,
            Self::Vote { id, direction } => {
                match actions::vote(&mut ctx.store, &mut ctx.local, id, *direction).await {
                    Ok(VoteOutcome::Counted(song)) => writeln!(
                        stdout,
                        "Vote counted!\n\t{}",
                        printing::song_line(&song, Some(*direction))
                    )?,
                    Ok(VoteOutcome::AlreadyVoted(previous)) => writeln!(
                        stderr,
                        "You already voted on this song ({previous})"
                    )?,
                    Err(e) => writeln!(stderr, "Error voting: {e}")?,
                }
                Ok(())
            }
            Self::Download { id } => {
                if !load(ctx, stderr).await? {
                    return Ok(());
                }
                let outcome = match actions::download(&mut ctx.store, &ctx.opener, id).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        writeln!(stderr, "{e}")?;
                        return Ok(());
                    }
                };
                match outcome.counted {
                    Ok(downloads) => writeln!(stdout, "Downloads: {downloads}")?,
                    Err(e) => writeln!(stderr, "Could not count the download: {e}")?,
                }
                match outcome.opened {
                    Ok(()) => writeln!(stdout, "Opened {}", outcome.link)?,
                    Err(e) => writeln!(
                        stderr,
                        "Could not open the link ({e}), open it yourself: {}",
                        outcome.link
                    )?,
                }
                Ok(())
            }
            Self::Votes => {
                // still list what we know if the song list can't be loaded
                load(ctx, stderr).await?;
                write!(
                    stdout,
                    "{}",
                    printing::vote_list(&ctx.local, ctx.store.songs())?
                )?;
                Ok(())
            }
            Self::Admin { command } => command.handle(ctx, stdout, stderr, stdin).await,
        }
    }
}

/// The list state described by `args`, on the requested page of the loaded songs.
fn list_state<A: SongsApi, O>(ctx: &Context<'_, A, O>, args: &ListArgs) -> SongListState {
    let display = &ctx.settings.display;
    let mut state = SongListState::new(display.page_size, args.sort.unwrap_or(display.default_sort));
    if let Some(order) = args.order {
        state.set_order(order);
    }
    if let Some(search) = &args.search {
        state.set_search(search.as_str());
    }
    state.set_type_filter(args.song_type.clone());
    state.set_tuning_filter(args.tuning.clone());
    state.go_to_page(args.page, ctx.store.songs());
    state
}

async fn add<A: SongsApi, O: LinkOpener, W1: Write, W2: Write>(
    ctx: &mut Context<'_, A, O>,
    args: &AddArgs,
    stdout: &mut W1,
    stderr: &mut W2,
) -> anyhow::Result<()> {
    let form = SongForm {
        artist: args.artist.clone(),
        title: args.title.clone(),
        types: args.types.clone(),
        tuning: args.tuning,
        custom_tuning: args.custom_tuning.clone().unwrap_or_default(),
        link: args.link.clone(),
        author: args.author.clone(),
        validation_code: args.code.clone().unwrap_or_default(),
    };

    let song = match form.validate(ctx.settings.submission.validation_code.as_deref()) {
        Ok(song) => song,
        Err(errors) => {
            writeln!(stderr, "{errors}")?;
            return Ok(());
        }
    };

    match ctx.store.add_song(&song).await {
        Ok(created) => writeln!(
            stdout,
            "Song added successfully!\n\t{}",
            printing::song_line(&created, None)
        )?,
        Err(e) => writeln!(stderr, "Error adding song: {e}")?,
    }
    Ok(())
}

impl From<&EditArgs> for EditForm {
    fn from(args: &EditArgs) -> Self {
        Self {
            artist: args.artist.clone(),
            title: args.title.clone(),
            song_type: args.song_type.clone(),
            tuning: args.tuning.clone(),
            link: args.link.clone(),
            author: args.author.clone(),
        }
    }
}

/// Open the admin page, or explain on `stderr` why it can't be.
fn open_session<W: Write>(
    local: &LocalStore,
    stderr: &mut W,
) -> Result<Option<AdminSession>, std::fmt::Error> {
    match AdminSession::from_local(local) {
        Ok(session) => Ok(Some(session)),
        Err(e) => {
            writeln!(stderr, "{e}")?;
            Ok(None)
        }
    }
}

impl CommandHandler for AdminCommand {
    type Output = anyhow::Result<()>;

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
        W1: Write,
        W2: Write,
        S: utils::StdIn,
    {
        match self {
            Self::Login { token } => match AdminSession::login(&mut ctx.local, token) {
                Ok(_) => writeln!(stdout, "Admin token stored")?,
                Err(AdminError::LocalStore(e)) => return Err(e.into()),
                Err(e) => writeln!(stderr, "{e}")?,
            },
            Self::Logout => {
                if AdminSession::logout(&mut ctx.local)? {
                    writeln!(stdout, "Admin token removed")?;
                } else {
                    writeln!(stdout, "No admin token was stored")?;
                }
            }
            Self::List { search, page } => {
                let Some(session) = open_session(&ctx.local, stderr)? else {
                    return Ok(());
                };
                if load(ctx, stderr).await? {
                    let view = session.page(
                        ctx.store.songs(),
                        search.as_deref().unwrap_or_default(),
                        *page,
                        ctx.settings.display.page_size,
                    );
                    write!(
                        stdout,
                        "{}",
                        printing::song_page("Manage the Library", &view, None, &ctx.local)?
                    )?;
                }
            }
            Self::Edit { id, changes } => {
                let Some(session) = open_session(&ctx.local, stderr)? else {
                    return Ok(());
                };
                let changes = match EditForm::from(changes).validate() {
                    Ok(changes) => changes,
                    Err(errors) => {
                        writeln!(stderr, "{errors}")?;
                        return Ok(());
                    }
                };
                if load(ctx, stderr).await? {
                    let notification = session.edit(&mut ctx.store, id, &changes).await;
                    notify(&notification, stdout, stderr)?;
                }
            }
            Self::Delete { id, yes } => {
                let Some(session) = open_session(&ctx.local, stderr)? else {
                    return Ok(());
                };
                if !load(ctx, stderr).await? {
                    return Ok(());
                }
                let Some(song) = ctx.store.get(id) else {
                    writeln!(stderr, "Song {id} is not in the list")?;
                    return Ok(());
                };
                if !*yes {
                    if stdin.is_terminal() {
                        write!(
                            stderr,
                            "Delete \"{}\" by {}? This cannot be undone. [y/N] ",
                            song.title, song.artist
                        )?;
                    }
                    if !utils::confirm(stdin) {
                        writeln!(stdout, "Cancelled")?;
                        return Ok(());
                    }
                }
                let notification = session.delete(&mut ctx.store, id).await;
                notify(&notification, stdout, stderr)?;
            }
        }

        Ok(())
    }
}
