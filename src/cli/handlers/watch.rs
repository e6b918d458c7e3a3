use std::thread;
use std::time::{Duration, Instant};

use crate::cli::output::{ActiveJson, render_active};
use crate::io::watcher::StoreWatcher;
use crate::model::collection::Collection;
use crate::model::task::format_date;
use crate::ops::archive::{self, DateWatch};

use super::{CmdResult, Context};

const TICK: Duration = Duration::from_secs(1);

/// Render the active list the way `list` does; JSON is kept to one line per
/// refresh so consumers can read the stream line by line.
fn render_list(ctx: &Context, collection: &Collection) -> Result<String, serde_json::Error> {
    let today = ctx.today();
    let active = archive::partition(collection).active;
    if ctx.json {
        return serde_json::to_string(&ActiveJson {
            today: format_date(today),
            tasks: &active,
        });
    }
    Ok(render_active(today, &active))
}

fn refresh(ctx: &Context) -> CmdResult {
    let opened = ctx.store.open(ctx.today());
    println!("{}", render_list(ctx, &opened.collection)?);
    if !ctx.json {
        println!();
    }
    Ok(())
}

/// Stay resident: redraw when the task file changes on disk or the calendar
/// date moves on. The date is re-checked every `watch.poll_secs` seconds.
pub(crate) fn cmd_watch(ctx: &Context) -> CmdResult {
    let watcher = match StoreWatcher::start(ctx.store.path()) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "file watching unavailable, only date changes will refresh");
            None
        }
    };
    let poll_every = Duration::from_secs(ctx.config.watch.poll_secs.max(1));
    let mut dates = DateWatch::new(ctx.today());
    let mut last_poll = Instant::now();

    refresh(ctx)?;
    loop {
        thread::sleep(TICK);

        let file_changed = watcher.as_ref().is_some_and(|w| w.poll());
        let mut rolled_over = false;
        if last_poll.elapsed() >= poll_every {
            last_poll = Instant::now();
            if let Some(previous) = dates.poll(ctx.today()) {
                tracing::info!(from = %previous, to = %dates.shown(), "date changed");
                rolled_over = true;
            }
        }

        if file_changed || rolled_over {
            tracing::debug!(file_changed, rolled_over, "refreshing");
            refresh(ctx)?;
        }
    }
}
