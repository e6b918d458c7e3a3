mod watch;

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::paths;
use crate::io::store::{Store, Updated};
use crate::model::config::Config;
use crate::model::task::{Task, format_date, parse_date};
use crate::ops::{about, archive, bucket, task_ops};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Environment variable that pins today's date (`YYYY-MM-DD`)
pub const TODAY_ENV: &str = "TRAYTODO_TODAY";

/// Everything a command needs, resolved once per invocation
pub(crate) struct Context {
    pub data_dir: PathBuf,
    pub config: Config,
    pub store: Store,
    pub json: bool,
    today_override: Option<NaiveDate>,
}

impl Context {
    fn from_cli(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let override_dir = cli.data_dir.as_deref().map(PathBuf::from);
        let data_dir = paths::data_dir(override_dir.as_deref())
            .map_err(|e| format!("cannot locate data directory: {}", e))?;
        let config = config_io::read_config(&data_dir)?;
        let store = Store::new(data_dir.join(&config.store.file));
        let today_override = match std::env::var(TODAY_ENV) {
            Ok(s) if !s.is_empty() => Some(parse_date(&s).ok_or_else(|| {
                format!("invalid date '{}' in {}, expected YYYY-MM-DD", s, TODAY_ENV)
            })?),
            _ => None,
        };
        tracing::debug!(data_dir = %data_dir.display(), store = %store.path().display(), "resolved paths");
        Ok(Context {
            data_dir,
            config,
            store,
            json: cli.json,
            today_override,
        })
    }

    /// Today's date, re-read from the clock on every call
    pub fn today(&self) -> NaiveDate {
        self.today_override
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let ctx = Context::from_cli(&cli)?;

    match cli.command.unwrap_or(Commands::List) {
        Commands::List => cmd_list(&ctx),
        Commands::Add(args) => cmd_add(&ctx, args),
        Commands::Check(args) => cmd_set_checked(&ctx, args, true),
        Commands::Uncheck(args) => cmd_set_checked(&ctx, args, false),
        Commands::Edit(args) => cmd_edit(&ctx, args),
        Commands::Important(args) => cmd_important(&ctx, args),
        Commands::Delete(args) => cmd_delete(&ctx, args),
        Commands::Archive(args) => cmd_archive(&ctx, args),
        Commands::About => cmd_about(&ctx),
        Commands::Watch => watch::cmd_watch(&ctx),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the task a command changed, as JSON or a one-line confirmation
fn report_task(ctx: &Context, verb: &str, task: &Task) -> CmdResult {
    if ctx.json {
        return print_json(task);
    }
    println!("{} {} {}", verb, task.short_id(), task.text);
    Ok(())
}

fn warn_unsaved<T>(updated: &Updated<T>) {
    if updated.changed && !updated.saved {
        eprintln!("warning: changes could not be saved");
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context) -> CmdResult {
    let opened = ctx.store.open(ctx.today());
    let parts = archive::partition(&opened.collection);
    if ctx.json {
        return print_json(&ActiveJson {
            today: format_date(ctx.today()),
            tasks: &parts.active,
        });
    }
    println!("{}", render_active(ctx.today(), &parts.active));
    Ok(())
}

fn cmd_add(ctx: &Context, args: AddArgs) -> CmdResult {
    let text = args.text.join(" ");
    let today = ctx.today();
    let updated = ctx
        .store
        .update(today, |c| Ok::<_, task_ops::TaskError>(task_ops::add_task(c, &text, today)))?;
    warn_unsaved(&updated);
    match &updated.value {
        Some(task) => report_task(ctx, "added", task),
        None => {
            tracing::debug!("blank task text ignored");
            if ctx.json {
                println!("null");
            }
            Ok(())
        }
    }
}

fn cmd_set_checked(ctx: &Context, args: IdArg, checked: bool) -> CmdResult {
    let today = ctx.today();
    let updated = ctx
        .store
        .update(today, |c| task_ops::set_checked(c, &args.id, checked, today))?;
    warn_unsaved(&updated);
    let verb = if checked { "checked" } else { "unchecked" };
    report_task(ctx, verb, &updated.value)
}

fn cmd_edit(ctx: &Context, args: EditArgs) -> CmdResult {
    let text = args.text.join(" ");
    let updated = ctx
        .store
        .update(ctx.today(), |c| task_ops::edit_text(c, &args.id, &text))?;
    warn_unsaved(&updated);
    match &updated.value {
        Some(task) => report_task(ctx, "edited", task),
        None => {
            if ctx.json {
                println!("null");
            }
            Ok(())
        }
    }
}

fn cmd_important(ctx: &Context, args: IdArg) -> CmdResult {
    let updated = ctx
        .store
        .update(ctx.today(), |c| task_ops::toggle_important(c, &args.id))?;
    warn_unsaved(&updated);
    let task = &updated.value;
    let verb = if task.important { "marked important" } else { "unmarked important" };
    report_task(ctx, verb, task)
}

fn cmd_delete(ctx: &Context, args: DeleteArgs) -> CmdResult {
    let updated = ctx.store.update(ctx.today(), |c| {
        args.ids
            .iter()
            .map(|id| task_ops::delete_task(c, id))
            .collect::<Result<Vec<Task>, _>>()
    })?;
    warn_unsaved(&updated);
    if ctx.json {
        return print_json(&updated.value);
    }
    for task in &updated.value {
        println!("deleted {} {}", task.short_id(), task.text);
    }
    Ok(())
}

fn cmd_archive(ctx: &Context, args: ArchiveCmd) -> CmdResult {
    match args.action {
        None => cmd_archive_show(ctx),
        Some(ArchiveAction::Done) => cmd_archive_done(ctx),
        Some(ArchiveAction::Delete(id)) => cmd_archive_delete(ctx, id),
        Some(ArchiveAction::Group(args)) => cmd_archive_group(ctx, args),
    }
}

fn cmd_archive_show(ctx: &Context) -> CmdResult {
    let today = ctx.today();
    let opened = ctx.store.open(today);
    let collection = &opened.collection;
    let archived = archive::partition(collection).archived;
    let scheme = ctx.config.archive.scheme;

    if collection.group_by_period {
        let groups = bucket::group(&archived, today, scheme);
        if ctx.json {
            return print_json(&ArchiveJson {
                group_by_period: true,
                groups: Some(groups_to_json(&groups)),
                tasks: None,
            });
        }
        println!("{}", render_archive_grouped(&groups));
    } else {
        let tasks = bucket::recent_first(&archived);
        if ctx.json {
            return print_json(&ArchiveJson {
                group_by_period: false,
                groups: None,
                tasks: Some(tasks),
            });
        }
        println!("{}", render_archive_flat(&tasks));
    }
    Ok(())
}

fn cmd_archive_done(ctx: &Context) -> CmdResult {
    let today = ctx.today();
    let updated = ctx.store.update(today, |c| {
        Ok::<_, task_ops::TaskError>(archive::archive_done(c, today))
    })?;
    warn_unsaved(&updated);
    if ctx.json {
        return print_json(&ArchivedJson {
            archived: &updated.value,
        });
    }
    println!("{}", render_archived(&updated.value));
    Ok(())
}

fn cmd_archive_delete(ctx: &Context, args: IdArg) -> CmdResult {
    let updated = ctx
        .store
        .update(ctx.today(), |c| task_ops::delete_archived(c, &args.id))?;
    warn_unsaved(&updated);
    report_task(ctx, "deleted", &updated.value)
}

fn cmd_archive_group(ctx: &Context, args: GroupArgs) -> CmdResult {
    let updated = ctx.store.update(ctx.today(), |c| {
        let value = match args.mode {
            Some(GroupMode::On) => true,
            Some(GroupMode::Off) => false,
            None => !c.group_by_period,
        };
        c.set_group_by_period(value);
        Ok::<_, task_ops::TaskError>(value)
    })?;
    warn_unsaved(&updated);
    if ctx.json {
        return print_json(&serde_json::json!({ "group_by_period": updated.value }));
    }
    let state = if updated.value { "on" } else { "off" };
    println!("group by period: {}", state);
    Ok(())
}

fn cmd_about(ctx: &Context) -> CmdResult {
    let path = ctx.data_dir.join(&ctx.config.about.file);
    let text = about::read_about(&path);
    let lines = about::render_about(&about::parse_about(&text), ctx.config.about.width);
    if ctx.json {
        return print_json(&serde_json::json!({ "lines": lines }));
    }
    println!("{}", lines.join("\n"));
    Ok(())
}
