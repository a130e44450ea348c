//! Combined calendar feed of events and dated tasks.

use crate::client::AgendaApi;
use crate::error::AgendaResult;
use crate::model::{CalendarItem, FeedRange};
use crate::slot::{CalendarDay, SlotSelection};

/// Items falling on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayItems<'a> {
    pub day: CalendarDay,
    pub items: Vec<&'a CalendarItem>,
}

impl DayItems<'_> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Fetch the feed for `range`.
pub async fn load_feed<A: AgendaApi + ?Sized>(
    api: &A,
    range: FeedRange,
) -> AgendaResult<Vec<CalendarItem>> {
    api.calendar_feed(range).await
}

/// Days shown for an inclusive `first..=last` window.
pub fn days_between(first: CalendarDay, last: CalendarDay) -> Vec<CalendarDay> {
    SlotSelection::whole_days(first, last).days()
}

/// Bucket items under each of `days`. Within a day, events come first in
/// start order, then tasks.
pub fn group_by_day<'a>(items: &'a [CalendarItem], days: &[CalendarDay]) -> Vec<DayItems<'a>> {
    days.iter()
        .map(|day| {
            let mut on_day: Vec<&CalendarItem> =
                items.iter().filter(|item| item.day() == *day).collect();
            on_day.sort_by_key(|item| match item {
                CalendarItem::Event(e) => (0, Some(e.start), e.id),
                CalendarItem::Task(t) => (1, None, t.id),
            });
            DayItems {
                day: *day,
                items: on_day,
            }
        })
        .collect()
}
