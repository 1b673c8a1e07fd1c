//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves paths and configuration (defaults < global < repo < flags)
//! 2. Drives a [`Session`](crate::session::Session) or the store layer
//! 3. Writes the result to the selected sink
//!
//! The shared plumbing for the graph-emitting commands (store opening,
//! option resolution, output sinks) lives at the bottom of this module.

mod completion;
mod graph_cmd;
mod repos;
mod watch;

pub use completion::completion;
pub use graph_cmd::graph;
pub use repos::repos;
pub use watch::watch;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::args::{Command, EmitArgs};
use crate::cli::Context;
use crate::core::config::Config;
use crate::dot::DotOptions;
use crate::graph::LabelStyle;
use crate::render;
use crate::session::SessionOptions;
use crate::store::GitStore;
use crate::ui::output;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Graph { args } => graph(ctx, &args),
        Command::Watch { args, interval_ms } => watch(ctx, &args, interval_ms),
        Command::Repos { root, json } => repos(ctx, &root, json),
        Command::Completion { shell } => completion(shell),
    }
}

/// Resolve a user-supplied path against `--cwd`.
pub(crate) fn resolve_path(ctx: &Context, path: Option<&Path>) -> Result<PathBuf> {
    let base = match &ctx.cwd {
        Some(cwd) => cwd.clone(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    Ok(match path {
        // `join` keeps absolute paths as-is
        Some(p) => base.join(p),
        None => base,
    })
}

/// Open the repository a command targets.
pub(crate) fn open_store(ctx: &Context, path: Option<&Path>) -> Result<GitStore> {
    let target = resolve_path(ctx, path)?;
    let store = GitStore::open(&target)?;
    Ok(store)
}

/// Everything a graph-emitting command needs, with precedence applied.
#[derive(Debug, Clone)]
pub(crate) struct EmitSettings {
    pub session: SessionOptions,
    pub dot: DotOptions,
    pub render_program: String,
    pub render_format: String,
}

/// Merge config and CLI flags into one settings bundle.
///
/// Flags only override in the direction they express: `--no-blobs`
/// forces blobs off, but its absence defers to the config files.
pub(crate) fn resolve_settings(config: &Config, args: &EmitArgs) -> EmitSettings {
    EmitSettings {
        session: SessionOptions {
            include_blobs: !args.no_blobs && config.include_blobs(),
            include_index: !args.no_index && config.include_index(),
            style: LabelStyle {
                blob_content_limit: config.blob_content_limit(),
            },
        },
        dot: DotOptions {
            fontname: config.fontname().to_string(),
            fontsize: config.fontsize(),
        },
        render_program: args
            .renderer
            .clone()
            .unwrap_or_else(|| config.render_program().to_string()),
        render_format: args
            .render_format
            .clone()
            .unwrap_or_else(|| config.render_format().to_string()),
    }
}

/// Deliver serialized DOT text to the selected sink, optionally piping
/// it through the renderer first.
pub(crate) fn emit(
    ctx: &Context,
    args: &EmitArgs,
    settings: &EmitSettings,
    dot_text: &str,
) -> Result<()> {
    let bytes = if args.render {
        let rendered =
            render::pipe_through(dot_text, &settings.render_program, &settings.render_format)?;
        // The renderer's exit status is reported, never interpreted
        if let Some(status) = rendered.status.filter(|&s| s != 0) {
            output::debug(
                format!("renderer '{}' exited with status {}", settings.render_program, status),
                ctx.verbosity,
            );
        }
        rendered.bytes
    } else {
        dot_text.as_bytes().to_vec()
    };

    match &args.output {
        Some(path) => {
            let target = resolve_path(ctx, Some(path))?;
            std::fs::write(&target, &bytes)
                .with_context(|| format!("failed to write {}", target.display()))?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// One-line pass summary for debug output.
pub(crate) fn describe_pass(stats: &crate::session::PassStats) -> String {
    format!(
        "{} vertices ({} new, {} pruned), {} edges, {} refs ({} dangling), {} staged, {} missing",
        stats.vertices,
        stats.created,
        stats.pruned,
        stats.edges,
        stats.refs,
        stats.dangling_refs,
        stats.index_entries,
        stats.missing_objects
    )
}
