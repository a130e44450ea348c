use agenda_core::agenda::{EventBoard, EventDraft};
use agenda_core::dialog::{AutoConfirm, ConfirmDialog, Confirmation};
use agenda_core::{CalendarDay, Event, SlotSelection, TimeOfDay};
use anyhow::{Result, bail};
use chrono::Local;
use owo_colors::OwoColorize;

use super::Context;
use crate::render::{Render, day_label};
use crate::utils::tui::{TerminalConfirm, with_spinner};

/// Which events `agenda events` lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    All,
    Today,
    Week,
}

/// Event fields given on the command line. `None` keeps the default (new)
/// or the current value (edit).
#[derive(Debug, Clone, Default)]
pub struct EventArgs {
    pub title: Option<String>,
    pub start: Option<TimeOfDay>,
    pub end: Option<TimeOfDay>,
    pub color: Option<String>,
    pub notes: Option<String>,
}

impl EventArgs {
    fn apply(self, mut draft: EventDraft) -> EventDraft {
        if let Some(title) = self.title {
            draft.title = title;
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) => draft = draft.with_times(start, end),
            (Some(start), None) => draft = draft.with_times(start, one_hour_after(start)),
            (None, Some(end)) => draft.end_time = end,
            (None, None) => {}
        }
        if let Some(color) = self.color {
            draft.color = color;
        }
        if let Some(notes) = self.notes {
            draft.notes = notes;
        }
        draft
    }
}

fn one_hour_after(start: TimeOfDay) -> TimeOfDay {
    TimeOfDay::new(start.hour() + 1, start.minute())
        .or_else(|| TimeOfDay::new(23, 59))
        .unwrap_or(start)
}

pub async fn list(ctx: &Context, window: Window, json: bool) -> Result<()> {
    ctx.require_login()?;
    let mut board = EventBoard::new(&ctx.client);
    with_spinner("Loading events...", board.load()).await?;

    let now = Local::now().naive_local();
    let events: Vec<&Event> = match window {
        Window::All => board.events().iter().collect(),
        Window::Today => board.today(now),
        Window::Week => board.this_week(now),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    let today = CalendarDay::of(now);
    let mut current: Option<CalendarDay> = None;
    for event in events {
        let day = event.day();
        if current != Some(day) {
            if current.is_some() {
                println!();
            }
            println!("{}", day_label(day, today).bold());
            current = Some(day);
        }
        println!("  {}", event.render());
    }

    Ok(())
}

pub async fn new(
    ctx: &Context,
    from: CalendarDay,
    to: Option<CalendarDay>,
    args: EventArgs,
) -> Result<()> {
    ctx.require_login()?;

    let selection = match to {
        Some(to) if to < from => bail!("--to ({}) is before --from ({})", to, from),
        Some(to) => SlotSelection::whole_days(from, to),
        None => SlotSelection::click(from.midnight()),
    };
    let days = selection.days();
    let draft = args.apply(EventDraft::from_config(&ctx.config));

    if days.len() > 1 {
        println!(
            "Creating {} events, one per day from {} to {}",
            days.len(),
            from,
            to.unwrap_or(from)
        );
    }

    let mut board = EventBoard::new(&ctx.client);
    let created = with_spinner("Saving...", board.create_events(&days, &draft)).await?;

    for event in &created {
        println!("{} {} {}", "+".green(), event.day(), event.render());
    }
    Ok(())
}

pub async fn edit(ctx: &Context, id: i64, args: EventArgs) -> Result<()> {
    ctx.require_login()?;
    let mut board = EventBoard::new(&ctx.client);
    with_spinner("Loading events...", board.load()).await?;

    let Some(event) = board.find(id) else {
        bail!("Event {} not found", id);
    };
    let draft = args.apply(EventDraft::from_event(event));

    let updated = with_spinner("Saving...", board.edit_event(id, &draft)).await?;

    println!("{} {} {}", "~".yellow(), updated.day(), updated.render());
    Ok(())
}

pub async fn delete(ctx: &Context, id: i64, yes: bool) -> Result<()> {
    ctx.require_login()?;
    let mut board = EventBoard::new(&ctx.client);
    with_spinner("Loading events...", board.load()).await?;

    let dialog: Box<dyn ConfirmDialog> = if yes {
        Box::new(AutoConfirm::yes())
    } else {
        Box::new(TerminalConfirm)
    };

    match board.delete_event(id, dialog.as_ref()).await? {
        Confirmation::Confirmed => println!("{} Deleted event {}", "-".red(), id),
        Confirmation::Cancelled => println!("{}", "Cancelled".dimmed()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    #[test]
    fn start_alone_gets_an_hour() {
        let args = EventArgs {
            start: Some(time("07:30")),
            ..Default::default()
        };
        let draft = args.apply(EventDraft::new("Run"));
        assert_eq!(draft.start_time, time("07:30"));
        assert_eq!(draft.end_time, time("08:30"));
    }

    #[test]
    fn late_start_is_capped_before_midnight() {
        assert_eq!(one_hour_after(time("23:15")), time("23:59"));
    }

    #[test]
    fn unset_fields_keep_the_draft() {
        let draft = EventDraft::new("Lunch");
        let applied = EventArgs::default().apply(draft.clone());
        assert_eq!(applied, draft);
    }

    #[test]
    fn overrides_replace_fields() {
        let args = EventArgs {
            title: Some("Dinner".into()),
            end: Some(time("14:00")),
            color: Some("#ff0000".into()),
            notes: Some("table for two".into()),
            ..Default::default()
        };
        let draft = args.apply(EventDraft::new("Lunch"));
        assert_eq!(draft.title, "Dinner");
        assert_eq!(draft.start_time, time("12:00"));
        assert_eq!(draft.end_time, time("14:00"));
        assert_eq!(draft.color, "#ff0000");
        assert_eq!(draft.notes, "table for two");
    }
}
