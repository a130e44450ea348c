use agenda_core::client::AgendaApi;
use agenda_core::dialog::{AutoConfirm, ConfirmDialog, Confirmation};
use agenda_core::tasks::{DateChange, TaskBoard, TaskEdit};
use agenda_core::{CalendarDay, Task};
use anyhow::Result;
use owo_colors::OwoColorize;

use super::Context;
use crate::render::Render;
use crate::utils::tui::{TerminalConfirm, with_spinner};

pub async fn list(ctx: &Context, date: Option<CalendarDay>, json: bool) -> Result<()> {
    ctx.require_login()?;

    if let Some(day) = date {
        let tasks = with_spinner("Loading tasks...", ctx.client.list_tasks(Some(day))).await?;
        let tasks: Vec<&Task> = tasks.iter().collect();
        if json {
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        } else if tasks.is_empty() {
            println!("{}", format!("No tasks on {}", day).dimmed());
        } else {
            print_tasks(&tasks);
        }
        return Ok(());
    }

    let mut board = TaskBoard::new(&ctx.client);
    with_spinner("Loading tasks...", board.load()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(board.tasks())?);
        return Ok(());
    }

    let dated = board.dated();
    let undated = board.undated();
    if dated.is_empty() && undated.is_empty() {
        println!("{}", "No tasks found".dimmed());
        return Ok(());
    }

    if !dated.is_empty() {
        println!("{}", "Dated".bold());
        print_tasks(&dated);
    }
    if !undated.is_empty() {
        if !dated.is_empty() {
            println!();
        }
        println!("{}", "Undated".bold());
        print_tasks(&undated);
    }
    Ok(())
}

pub(crate) fn print_tasks(tasks: &[&Task]) {
    for task in tasks {
        println!("  {}", task.render());
    }
}

pub async fn new(ctx: &Context, title: &str, date: Option<CalendarDay>) -> Result<()> {
    ctx.require_login()?;
    let mut board = TaskBoard::new(&ctx.client);

    let task = with_spinner("Saving...", board.create(title, date)).await?;

    println!("{} {}", "+".green(), task.render());
    Ok(())
}

pub async fn edit(
    ctx: &Context,
    id: i64,
    title: Option<String>,
    date: Option<CalendarDay>,
    clear_date: bool,
) -> Result<()> {
    ctx.require_login()?;
    let mut board = TaskBoard::new(&ctx.client);
    with_spinner("Loading tasks...", board.load()).await?;

    let date = match (date, clear_date) {
        (_, true) => DateChange::Clear,
        (Some(day), false) => DateChange::Set(day),
        (None, false) => DateChange::Keep,
    };

    let task = with_spinner("Saving...", board.edit(id, TaskEdit { title, date })).await?;

    println!("{} {}", "~".yellow(), task.render());
    Ok(())
}

pub async fn toggle(ctx: &Context, id: i64) -> Result<()> {
    ctx.require_login()?;
    let mut board = TaskBoard::new(&ctx.client);
    with_spinner("Loading tasks...", board.load()).await?;

    let task = with_spinner("Saving...", board.toggle(id)).await?;

    println!("{}", task.render());
    Ok(())
}

pub async fn delete(ctx: &Context, id: i64, yes: bool) -> Result<()> {
    ctx.require_login()?;
    let mut board = TaskBoard::new(&ctx.client);
    with_spinner("Loading tasks...", board.load()).await?;

    let dialog: Box<dyn ConfirmDialog> = if yes {
        Box::new(AutoConfirm::yes())
    } else {
        Box::new(TerminalConfirm)
    };

    match board.delete(id, dialog.as_ref()).await? {
        Confirmation::Confirmed => println!("{} Deleted task {}", "-".red(), id),
        Confirmation::Cancelled => println!("{}", "Cancelled".dimmed()),
    }
    Ok(())
}
