//! Terminal rendering for agenda types.

use agenda_core::{CalendarDay, CalendarItem, CalendarTask, Event, Task};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let time = if self.all_day {
            format!("{:>13}", "all-day")
        } else {
            format!("{} - {}", self.start.format("%H:%M"), self.end.format("%H:%M"))
        };
        let id = format!("#{}", self.id);
        format!(
            "{} {} {} {}",
            swatch(self.color_or_default()),
            time,
            self.title,
            id.dimmed()
        )
    }
}

impl Render for Task {
    fn render(&self) -> String {
        let date = self
            .date
            .map(|d| format!(" ({})", d))
            .unwrap_or_default();
        let id = format!("#{}", self.id);
        format!(
            "{} {}{} {}",
            checkbox(self.done),
            title_for(&self.title, self.done),
            date.dimmed(),
            id.dimmed()
        )
    }
}

impl Render for CalendarTask {
    fn render(&self) -> String {
        let id = format!("#{}", self.id);
        format!(
            "{} {} {}",
            checkbox(self.done),
            title_for(&self.title, self.done),
            id.dimmed()
        )
    }
}

impl Render for CalendarItem {
    fn render(&self) -> String {
        match self {
            CalendarItem::Event(e) => e.render(),
            CalendarItem::Task(t) => t.render(),
        }
    }
}

fn checkbox(done: bool) -> String {
    if done {
        "[x]".green().to_string()
    } else {
        "[ ]".to_string()
    }
}

fn title_for(title: &str, done: bool) -> String {
    if done {
        title.strikethrough().dimmed().to_string()
    } else {
        title.to_string()
    }
}

/// A block in the event's colour, or a plain bullet when the colour is not
/// a `#rrggbb` hex string.
fn swatch(color: &str) -> String {
    match parse_hex(color) {
        Some((r, g, b)) => "■".truecolor(r, g, b).to_string(),
        None => "•".to_string(),
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Heading for a day, e.g. "Today", "Tomorrow", "Wed Feb 25".
pub fn day_label(day: CalendarDay, today: CalendarDay) -> String {
    match (day.date() - today.date()).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => day.date().format("%a %b %-d").to_string(),
    }
}
