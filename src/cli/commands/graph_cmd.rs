//! graph command - Emit the object graph once

use anyhow::{Context as _, Result};

use crate::cli::args::EmitArgs;
use crate::cli::Context;
use crate::core::config::Config;
use crate::dot;
use crate::session::Session;
use crate::ui::output;

/// Run one synchronization pass and emit the serialized graph.
pub fn graph(ctx: &Context, args: &EmitArgs) -> Result<()> {
    let store = super::open_store(ctx, args.path.as_deref())?;
    let config = Config::load(Some(store.git_dir()))?;
    let settings = super::resolve_settings(&config, args);

    let mut session = Session::new(settings.session.clone());
    let stats = session
        .sync(&store)
        .context("synchronization pass failed")?;
    output::debug(super::describe_pass(&stats), ctx.verbosity);

    let dot_text = dot::serialize(session.graph(), &settings.dot);
    super::emit(ctx, args, &settings, &dot_text)
}
