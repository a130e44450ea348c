use agenda_core::calendar::{days_between, group_by_day, load_feed};
use agenda_core::tasks::TaskBoard;
use agenda_core::{AgendaError, CalendarDay, FeedRange};
use anyhow::{Result, bail};
use chrono::{Local, TimeDelta};
use owo_colors::OwoColorize;
use serde_json::json;

use super::Context;
use super::tasks::print_tasks;
use crate::render::{Render, day_label};
use crate::utils::tui::with_spinner;

/// Default window: `from` (or this week's Monday) plus six days.
fn window(
    from: Option<CalendarDay>,
    to: Option<CalendarDay>,
    today: CalendarDay,
) -> (CalendarDay, CalendarDay) {
    let from = from.unwrap_or_else(|| today.week_start());
    let to = to.unwrap_or_else(|| CalendarDay::new(from.date() + TimeDelta::days(6)));
    (from, to)
}

pub async fn run(
    ctx: &Context,
    from: Option<CalendarDay>,
    to: Option<CalendarDay>,
    json: bool,
) -> Result<()> {
    ctx.require_login()?;

    let today = CalendarDay::of(Local::now().naive_local());
    let (from, to) = window(from, to, today);
    if to < from {
        bail!("--to ({}) is before --from ({})", to, from);
    }

    let range = FeedRange::new(Some(from), Some(to));
    let mut board = TaskBoard::new(&ctx.client);
    let items = with_spinner("Loading calendar...", async {
        board.load().await?;
        let items = load_feed(&ctx.client, range).await?;
        Ok::<_, AgendaError>(items)
    })
    .await?;

    let undated = board.undated();

    if json {
        let out = json!({ "items": items, "undated": undated });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let days = days_between(from, to);
    for (i, day) in group_by_day(&items, &days).iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", day_label(day.day, today).bold());
        if day.is_empty() {
            println!("  {}", "Nothing scheduled".dimmed());
        }
        for item in &day.items {
            println!("  {}", item.render());
        }
    }

    if !undated.is_empty() {
        println!();
        println!("{}", "Undated".bold());
        print_tasks(&undated);
    }

    Ok(())
}
