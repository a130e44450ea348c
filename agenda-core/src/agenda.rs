//! Event board: the event list shown on the calendar and the flows that
//! create, edit and delete events.
//!
//! The board never patches its list in place. After every successful
//! mutation the whole list is fetched again; after a failure it is left as
//! it was.

use chrono::{NaiveDateTime, TimeDelta};
use futures::future::join_all;
use tracing::{info, warn};

use crate::client::AgendaApi;
use crate::config::AgendaConfig;
use crate::dialog::{ConfirmDialog, Confirmation, delete_prompt};
use crate::error::{AgendaError, AgendaResult, ValidationError};
use crate::model::{DEFAULT_EVENT_COLOR, Event, EventUpdate, NewEvent};
use crate::slot::{CalendarDay, DEFAULT_END_TIME, DEFAULT_TIME, EventSpan, TimeOfDay};

/// Form values for creating or editing an event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub color: String,
    pub notes: String,
}

impl Default for EventDraft {
    fn default() -> Self {
        EventDraft {
            title: String::new(),
            start_time: DEFAULT_TIME,
            end_time: DEFAULT_END_TIME,
            color: DEFAULT_EVENT_COLOR.to_string(),
            notes: String::new(),
        }
    }
}

impl EventDraft {
    pub fn new(title: impl Into<String>) -> Self {
        EventDraft {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Blank draft using the configured defaults.
    pub fn from_config(config: &AgendaConfig) -> Self {
        EventDraft {
            title: String::new(),
            start_time: config.default_start_time,
            end_time: config.default_end_time,
            color: config.default_color.clone(),
            notes: String::new(),
        }
    }

    /// Draft pre-filled from an existing event for editing.
    pub fn from_event(event: &Event) -> Self {
        EventDraft {
            title: event.title.clone(),
            start_time: TimeOfDay::of(event.start),
            end_time: TimeOfDay::of(event.end),
            color: event.color_or_default().to_string(),
            notes: event.notes.clone().unwrap_or_default(),
        }
    }

    pub fn with_times(mut self, start: TimeOfDay, end: TimeOfDay) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    /// Check the form and return the trimmed title.
    pub fn validate(&self) -> Result<&str, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.end_time <= self.start_time {
            return Err(ValidationError::EndNotAfterStart);
        }
        Ok(title)
    }

    pub fn span_on(&self, day: CalendarDay) -> Result<EventSpan, ValidationError> {
        EventSpan::on_day(day, self.start_time, self.end_time)
    }
}

pub struct EventBoard<'a, A: AgendaApi + ?Sized> {
    api: &'a A,
    events: Vec<Event>,
}

impl<'a, A: AgendaApi + ?Sized> EventBoard<'a, A> {
    pub fn new(api: &'a A) -> Self {
        EventBoard {
            api,
            events: Vec::new(),
        }
    }

    /// Replace the list with what the backend holds.
    pub async fn load(&mut self) -> AgendaResult<&[Event]> {
        let mut events = self.api.list_events().await?;
        events.sort_by_key(|e| e.start);
        self.events = events;
        Ok(&self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn find(&self, id: i64) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Create one event per day, all with the same times, title and colour.
    ///
    /// Requests run concurrently; the list is reloaded only once all of them
    /// succeeded.
    pub async fn create_events(
        &mut self,
        days: &[CalendarDay],
        draft: &EventDraft,
    ) -> AgendaResult<Vec<Event>> {
        let title = draft.validate()?;
        if days.is_empty() {
            return Err(ValidationError::EmptySelection.into());
        }

        let requests = days
            .iter()
            .map(|day| {
                let span = draft.span_on(*day)?;
                Ok(NewEvent {
                    title: title.to_string(),
                    start: span.start(),
                    end: span.end(),
                    all_day: false,
                    color: draft.color.clone(),
                    notes: draft.notes.clone(),
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        let results = join_all(requests.iter().map(|req| self.api.create_event(req))).await;

        let mut created = Vec::with_capacity(results.len());
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(event) => created.push(event),
                Err(e) => {
                    warn!("Creating event failed: {}", e);
                    errors.push(e);
                }
            }
        }

        if !errors.is_empty() {
            let pos = errors
                .iter()
                .position(|e| matches!(e, AgendaError::Unauthorized))
                .unwrap_or(0);
            return Err(errors.swap_remove(pos));
        }

        info!("Created {} event(s) '{}'", created.len(), title);
        self.load().await?;
        Ok(created)
    }

    /// Save a draft over an existing event, keeping the event's day.
    pub async fn edit_event(&mut self, id: i64, draft: &EventDraft) -> AgendaResult<Event> {
        let event = self.require(id)?;
        let title = draft.validate()?;
        let span = draft.span_on(event.day())?;

        let update = EventUpdate {
            title: title.to_string(),
            start: span.start(),
            end: span.end(),
            color: draft.color.clone(),
            notes: draft.notes.clone(),
        };

        let updated = self.api.update_event(id, &update).await?;
        info!("Updated event {}", id);
        self.load().await?;
        Ok(updated)
    }

    /// Delete after confirmation. Nothing is sent when cancelled.
    pub async fn delete_event(
        &mut self,
        id: i64,
        dialog: &dyn ConfirmDialog,
    ) -> AgendaResult<Confirmation> {
        let event = self.require(id)?;
        let answer = dialog.confirm(&delete_prompt(&event.title))?;
        if !answer.is_confirmed() {
            return Ok(answer);
        }

        self.api.delete_event(id).await?;
        info!("Deleted event {}", id);
        self.load().await?;
        Ok(answer)
    }

    /// Events starting on `day`, by start time.
    pub fn events_on(&self, day: CalendarDay) -> Vec<&Event> {
        self.events.iter().filter(|e| day.contains(e.start)).collect()
    }

    pub fn today(&self, now: NaiveDateTime) -> Vec<&Event> {
        self.events_on(CalendarDay::of(now))
    }

    /// Events starting in the Monday-based week containing `now`.
    pub fn this_week(&self, now: NaiveDateTime) -> Vec<&Event> {
        let from = CalendarDay::of(now).week_start().midnight();
        let to = from + TimeDelta::days(7);
        self.events
            .iter()
            .filter(|e| e.start >= from && e.start < to)
            .collect()
    }

    fn require(&self, id: i64) -> AgendaResult<Event> {
        self.find(id)
            .cloned()
            .ok_or_else(|| AgendaError::NotFound(format!("Event {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::AutoConfirm;
    use crate::error::ErrorCategory;
    use crate::slot::SlotSelection;
    use crate::testing::FakeApi;
    use chrono::{NaiveDate, Timelike};

    fn day(y: i32, m: u32, d: u32) -> CalendarDay {
        CalendarDay::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn time(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn event(id: i64, title: &str, start: NaiveDateTime, minutes: i64) -> Event {
        Event {
            id,
            title: title.to_string(),
            start,
            end: start + TimeDelta::minutes(minutes),
            all_day: false,
            color: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn three_day_selection_creates_three_matching_events() {
        let api = FakeApi::new();
        let mut board = EventBoard::new(&api);

        // Mon 17 .. Wed 19, reported with an exclusive midnight end
        let days = SlotSelection::whole_days(day(2025, 3, 17), day(2025, 3, 19)).days();
        let mut draft = EventDraft::new("  Gym  ").with_times(time("07:00"), time("08:30"));
        draft.color = "#00ff00".into();

        let created = board.create_events(&days, &draft).await.unwrap();

        assert_eq!(created.len(), 3);
        let mut starts: Vec<_> = created.iter().map(|e| e.start).collect();
        starts.sort();
        assert_eq!(starts[0], time("07:00").on(day(2025, 3, 17)));
        assert_eq!(starts[2], time("07:00").on(day(2025, 3, 19)));
        for e in &created {
            assert_eq!(e.title, "Gym");
            assert_eq!((e.start.hour(), e.start.minute()), (7, 0));
            assert_eq!((e.end.hour(), e.end.minute()), (8, 30));
            assert_eq!(e.color.as_deref(), Some("#00ff00"));
        }
        assert_eq!(board.events().len(), 3);
    }

    #[tokio::test]
    async fn equal_times_are_rejected_before_any_request() {
        let api = FakeApi::new();
        let mut board = EventBoard::new(&api);
        let draft = EventDraft::new("Call").with_times(time("10:00"), time("10:00"));

        let err = board
            .create_events(&[day(2025, 3, 17)], &draft)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AgendaError::Validation(ValidationError::EndNotAfterStart)
        ));
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn increasing_times_are_accepted() {
        let api = FakeApi::new();
        let mut board = EventBoard::new(&api);
        let draft = EventDraft::new("Call").with_times(time("09:00"), time("10:00"));

        let created = board
            .create_events(&[day(2025, 3, 17)], &draft)
            .await
            .unwrap();
        assert_eq!(created.len(), 1);
    }

    #[tokio::test]
    async fn blank_title_and_empty_selection_are_rejected() {
        let api = FakeApi::new();
        let mut board = EventBoard::new(&api);

        let err = board
            .create_events(&[day(2025, 3, 17)], &EventDraft::new("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, AgendaError::Validation(ValidationError::EmptyTitle)));

        let err = board
            .create_events(&[], &EventDraft::new("Call"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AgendaError::Validation(ValidationError::EmptySelection)
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_batch_leaves_view_unchanged() {
        let existing = event(1, "Existing", time("09:00").on(day(2025, 3, 10)), 60);
        let api = FakeApi::failing_on(day(2025, 3, 18)).with_events(vec![existing.clone()]);
        let mut board = EventBoard::new(&api);
        board.load().await.unwrap();

        let days = SlotSelection::whole_days(day(2025, 3, 17), day(2025, 3, 19)).days();
        let err = board
            .create_events(&days, &EventDraft::new("Trip"))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(board.events(), &[existing]);
    }

    #[tokio::test]
    async fn unauthorized_wins_over_other_failures() {
        let api = FakeApi::unauthorized();
        let mut board = EventBoard::new(&api);

        let err = board
            .create_events(&[day(2025, 3, 17), day(2025, 3, 18)], &EventDraft::new("X"))
            .await
            .unwrap_err();
        assert!(matches!(err, AgendaError::Unauthorized));
    }

    #[tokio::test]
    async fn edit_keeps_the_event_day() {
        let original = event(5, "Lunch", time("12:00").on(day(2025, 3, 20)), 60);
        let api = FakeApi::new().with_events(vec![original.clone()]);
        let mut board = EventBoard::new(&api);
        board.load().await.unwrap();

        let mut draft = EventDraft::from_event(&original);
        assert_eq!(draft.start_time.to_string(), "12:00");
        assert_eq!(draft.end_time.to_string(), "13:00");
        draft.title = "Long lunch".into();
        draft.end_time = time("14:15");

        let updated = board.edit_event(5, &draft).await.unwrap();
        assert_eq!(updated.title, "Long lunch");
        assert_eq!(updated.start, time("12:00").on(day(2025, 3, 20)));
        assert_eq!(updated.end, time("14:15").on(day(2025, 3, 20)));
        assert_eq!(board.find(5).unwrap().title, "Long lunch");
    }

    #[tokio::test]
    async fn edit_rejects_end_before_start() {
        let original = event(5, "Lunch", time("12:00").on(day(2025, 3, 20)), 60);
        let api = FakeApi::new().with_events(vec![original.clone()]);
        let mut board = EventBoard::new(&api);
        board.load().await.unwrap();

        let draft = EventDraft::from_event(&original).with_times(time("12:00"), time("11:00"));
        assert!(board.edit_event(5, &draft).await.is_err());
        assert_eq!(api.calls(), vec!["GET /api/events".to_string()]);
    }

    #[tokio::test]
    async fn cancelled_delete_sends_nothing() {
        let original = event(3, "Dentist", time("10:00").on(day(2025, 3, 20)), 30);
        let api = FakeApi::new().with_events(vec![original]);
        let mut board = EventBoard::new(&api);
        board.load().await.unwrap();

        let dialog = AutoConfirm::no();
        let answer = board.delete_event(3, &dialog).await.unwrap();

        assert_eq!(answer, Confirmation::Cancelled);
        assert_eq!(dialog.prompts(), vec!["Delete \"Dentist\"?".to_string()]);
        assert_eq!(board.events().len(), 1);
        assert_eq!(api.calls(), vec!["GET /api/events".to_string()]);
    }

    #[tokio::test]
    async fn confirmed_delete_reloads() {
        let original = event(3, "Dentist", time("10:00").on(day(2025, 3, 20)), 30);
        let api = FakeApi::new().with_events(vec![original]);
        let mut board = EventBoard::new(&api);
        board.load().await.unwrap();

        let answer = board.delete_event(3, &AutoConfirm::yes()).await.unwrap();
        assert_eq!(answer, Confirmation::Confirmed);
        assert!(board.events().is_empty());
        assert!(api.stored_events().is_empty());
    }

    #[tokio::test]
    async fn unknown_event_is_not_found() {
        let api = FakeApi::new();
        let mut board = EventBoard::new(&api);
        let err = board
            .delete_event(99, &AutoConfirm::yes())
            .await
            .unwrap_err();
        assert!(matches!(err, AgendaError::NotFound(_)));
    }

    #[tokio::test]
    async fn today_and_week_panels() {
        // 2025-03-20 is a Thursday; its week runs Mon 17 .. Sun 23
        let api = FakeApi::new().with_events(vec![
            event(1, "Sunday before", time("10:00").on(day(2025, 3, 16)), 30),
            event(2, "Monday", time("08:00").on(day(2025, 3, 17)), 30),
            event(3, "Today", time("09:00").on(day(2025, 3, 20)), 30),
            event(4, "Sunday", time("23:00").on(day(2025, 3, 23)), 30),
            event(5, "Next Monday", time("00:00").on(day(2025, 3, 24)), 30),
        ]);
        let mut board = EventBoard::new(&api);
        board.load().await.unwrap();

        let now = time("15:00").on(day(2025, 3, 20));
        let today: Vec<_> = board.today(now).iter().map(|e| e.id).collect();
        assert_eq!(today, vec![3]);

        let week: Vec<_> = board.this_week(now).iter().map(|e| e.id).collect();
        assert_eq!(week, vec![2, 3, 4]);
    }

    #[test]
    fn draft_from_config_uses_configured_defaults() {
        let mut config = AgendaConfig::default();
        config.default_start_time = time("08:00");
        config.default_color = "#123456".into();

        let draft = EventDraft::from_config(&config);
        assert_eq!(draft.start_time, time("08:00"));
        assert_eq!(draft.end_time, DEFAULT_END_TIME);
        assert_eq!(draft.color, "#123456");
    }
}
