//! watch command - Re-emit the graph whenever the repository changes
//!
//! Polls the repository fingerprint and runs a synchronization pass only
//! when it moves. The session (and with it the vertex registry) lives
//! for the whole watch, so each pass is incremental; the store is
//! reopened per tick so a pass always sees fresh on-disk state.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context as _, Result};
use chrono::Local;

use crate::cli::args::EmitArgs;
use crate::cli::Context;
use crate::core::config::Config;
use crate::core::types::Fingerprint;
use crate::dot;
use crate::session::Session;
use crate::store::GitStore;
use crate::ui::output;

/// Watch a repository, re-emitting the graph on every change.
pub fn watch(ctx: &Context, args: &EmitArgs, interval_ms: Option<u64>) -> Result<()> {
    let store = super::open_store(ctx, args.path.as_deref())?;
    let config = Config::load(Some(store.git_dir()))?;
    let settings = super::resolve_settings(&config, args);
    let interval = Duration::from_millis(interval_ms.unwrap_or_else(|| config.watch_interval_ms()));

    // Reopen from the git dir each tick; the initial open just located it
    let git_dir = store.git_dir().to_path_buf();
    drop(store);

    let mut session = Session::new(settings.session.clone());
    let mut last: Option<Fingerprint> = None;

    output::status(
        format!("watching {} every {}ms", git_dir.display(), interval.as_millis()),
        ctx.verbosity,
    );

    loop {
        if let Err(err) = tick(ctx, args, &settings, &git_dir, &mut session, &mut last) {
            // A tick can fail transiently (e.g. git rewriting refs
            // mid-poll); keep watching
            output::warn(format!("watch tick failed: {:#}", err), ctx.verbosity);
        }
        std::thread::sleep(interval);
    }
}

/// One poll: compare fingerprints and run a pass when the state moved.
fn tick(
    ctx: &Context,
    args: &EmitArgs,
    settings: &super::EmitSettings,
    git_dir: &Path,
    session: &mut Session,
    last: &mut Option<Fingerprint>,
) -> Result<()> {
    let store = GitStore::open(git_dir)?;
    let fingerprint = store.fingerprint()?;
    if last.as_ref() == Some(&fingerprint) {
        return Ok(());
    }

    let stats = session
        .sync(&store)
        .context("synchronization pass failed")?;
    let dot_text = dot::serialize(session.graph(), &settings.dot);
    super::emit(ctx, args, settings, &dot_text)?;
    *last = Some(fingerprint);

    output::status(
        format!(
            "{} synced: {} vertices (+{}/-{}), {} edges",
            Local::now().format("%H:%M:%S"),
            stats.vertices,
            stats.created,
            stats.pruned,
            stats.edges
        ),
        ctx.verbosity,
    );
    output::debug(super::describe_pass(&stats), ctx.verbosity);
    Ok(())
}
