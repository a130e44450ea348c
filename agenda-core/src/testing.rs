//! In-memory backend used by the board tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::AgendaApi;
use crate::error::{AgendaError, AgendaResult};
use crate::model::{
    CalendarItem, CalendarTask, Event, EventUpdate, FeedRange, NewEvent, NewTask, Task, TaskUpdate,
};
use crate::slot::CalendarDay;

#[derive(Default)]
struct State {
    events: Vec<Event>,
    tasks: Vec<Task>,
    next_id: i64,
    calls: Vec<String>,
}

#[derive(Default)]
pub struct FakeApi {
    state: Mutex<State>,
    fail_creates_on: Option<CalendarDay>,
    unauthorized: bool,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every create for an event starting on `day` fails with a 500.
    pub fn failing_on(day: CalendarDay) -> Self {
        FakeApi {
            fail_creates_on: Some(day),
            ..Self::default()
        }
    }

    /// Every call answers 401.
    pub fn unauthorized() -> Self {
        FakeApi {
            unauthorized: true,
            ..Self::default()
        }
    }

    pub fn with_events(self, events: Vec<Event>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_id = state.next_id.max(events.iter().map(|e| e.id).max().unwrap_or(0));
            state.events = events;
        }
        self
    }

    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_id = state.next_id.max(tasks.iter().map(|t| t.id).max().unwrap_or(0));
            state.tasks = tasks;
        }
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn stored_events(&self) -> Vec<Event> {
        self.state.lock().unwrap().events.clone()
    }

    fn record(&self, call: String) -> AgendaResult<()> {
        self.state.lock().unwrap().calls.push(call);
        if self.unauthorized {
            return Err(AgendaError::Unauthorized);
        }
        Ok(())
    }

    fn not_found(what: &str) -> AgendaError {
        AgendaError::NotFound(format!("{} not found", what))
    }
}

#[async_trait]
impl AgendaApi for FakeApi {
    async fn list_events(&self) -> AgendaResult<Vec<Event>> {
        self.record("GET /api/events".into())?;
        let mut events = self.state.lock().unwrap().events.clone();
        events.sort_by_key(|e| e.start);
        Ok(events)
    }

    async fn create_event(&self, event: &NewEvent) -> AgendaResult<Event> {
        self.record(format!("POST /api/events {}", event.start))?;
        if self.fail_creates_on == Some(CalendarDay::of(event.start)) {
            return Err(AgendaError::Http {
                status: 500,
                message: String::new(),
            });
        }
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let created = Event {
            id: state.next_id,
            title: event.title.clone(),
            start: event.start,
            end: event.end,
            all_day: event.all_day,
            color: Some(event.color.clone()),
            notes: Some(event.notes.clone()),
        };
        state.events.push(created.clone());
        Ok(created)
    }

    async fn update_event(&self, id: i64, update: &EventUpdate) -> AgendaResult<Event> {
        self.record(format!("PUT /api/events/{}", id))?;
        let mut state = self.state.lock().unwrap();
        let event = state
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Self::not_found("Event"))?;
        event.title = update.title.clone();
        event.start = update.start;
        event.end = update.end;
        event.color = Some(update.color.clone());
        event.notes = Some(update.notes.clone());
        Ok(event.clone())
    }

    async fn delete_event(&self, id: i64) -> AgendaResult<()> {
        self.record(format!("DELETE /api/events/{}", id))?;
        let mut state = self.state.lock().unwrap();
        let before = state.events.len();
        state.events.retain(|e| e.id != id);
        if state.events.len() == before {
            return Err(Self::not_found("Event"));
        }
        Ok(())
    }

    async fn list_tasks(&self, date: Option<CalendarDay>) -> AgendaResult<Vec<Task>> {
        self.record("GET /api/tasks".into())?;
        let mut tasks: Vec<Task> = self
            .state
            .lock()
            .unwrap()
            .tasks
            .iter()
            .filter(|t| date.is_none() || t.date == date)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| std::cmp::Reverse(t.id));
        Ok(tasks)
    }

    async fn create_task(&self, task: &NewTask) -> AgendaResult<Task> {
        self.record("POST /api/tasks".into())?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let created = Task {
            id: state.next_id,
            title: task.title.clone(),
            done: false,
            date: task.date,
        };
        state.tasks.push(created.clone());
        Ok(created)
    }

    async fn update_task(&self, id: i64, update: &TaskUpdate) -> AgendaResult<Task> {
        self.record(format!("PUT /api/tasks/{}", id))?;
        let mut state = self.state.lock().unwrap();
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Self::not_found("Task"))?;
        if let Some(title) = &update.title {
            task.title = title.clone();
        }
        if let Some(date) = update.date {
            task.date = date;
        }
        Ok(task.clone())
    }

    async fn toggle_task(&self, id: i64) -> AgendaResult<Task> {
        self.record(format!("POST /api/tasks/{}/toggle", id))?;
        let mut state = self.state.lock().unwrap();
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Self::not_found("Task"))?;
        task.done = !task.done;
        Ok(task.clone())
    }

    async fn delete_task(&self, id: i64) -> AgendaResult<()> {
        self.record(format!("DELETE /api/tasks/{}", id))?;
        let mut state = self.state.lock().unwrap();
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != id);
        if state.tasks.len() == before {
            return Err(Self::not_found("Task"));
        }
        Ok(())
    }

    async fn calendar_feed(&self, range: FeedRange) -> AgendaResult<Vec<CalendarItem>> {
        self.record("GET /api/calendar".into())?;
        let state = self.state.lock().unwrap();
        let events = state
            .events
            .iter()
            .filter(|e| range.contains(e.day()))
            .cloned()
            .map(CalendarItem::Event);
        let tasks = state
            .tasks
            .iter()
            .filter_map(|t| {
                let day = t.date?;
                range.contains(day).then(|| {
                    CalendarItem::Task(CalendarTask {
                        id: t.id,
                        title: t.title.clone(),
                        day,
                        done: t.done,
                    })
                })
            });
        Ok(events.chain(tasks).collect())
    }
}
