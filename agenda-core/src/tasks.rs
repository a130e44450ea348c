//! Task board: dated and undated to-do lists.

use tracing::info;

use crate::client::AgendaApi;
use crate::dialog::{ConfirmDialog, Confirmation, delete_prompt};
use crate::error::{AgendaError, AgendaResult, ValidationError};
use crate::model::{NewTask, Task, TaskUpdate};
use crate::slot::CalendarDay;

/// What to do with a task's date when editing it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateChange {
    #[default]
    Keep,
    Clear,
    Set(CalendarDay),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub date: DateChange,
}

impl TaskEdit {
    fn into_update(self) -> Result<TaskUpdate, ValidationError> {
        let title = match self.title {
            Some(t) => Some(non_empty_title(&t)?.to_string()),
            None => None,
        };
        let date = match self.date {
            DateChange::Keep => None,
            DateChange::Clear => Some(None),
            DateChange::Set(day) => Some(Some(day)),
        };
        Ok(TaskUpdate { title, date })
    }
}

fn non_empty_title(title: &str) -> Result<&str, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(title)
}

pub struct TaskBoard<'a, A: AgendaApi + ?Sized> {
    api: &'a A,
    tasks: Vec<Task>,
}

impl<'a, A: AgendaApi + ?Sized> TaskBoard<'a, A> {
    pub fn new(api: &'a A) -> Self {
        TaskBoard {
            api,
            tasks: Vec::new(),
        }
    }

    pub async fn load(&mut self) -> AgendaResult<&[Task]> {
        self.tasks = self.api.list_tasks(None).await?;
        Ok(&self.tasks)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn dated(&self) -> Vec<&Task> {
        let mut dated: Vec<&Task> = self.tasks.iter().filter(|t| !t.is_undated()).collect();
        dated.sort_by_key(|t| t.date);
        dated
    }

    /// Tasks with no date; these never show on the calendar.
    pub fn undated(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.is_undated()).collect()
    }

    pub fn on_day(&self, day: CalendarDay) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.date == Some(day)).collect()
    }

    pub async fn create(&mut self, title: &str, date: Option<CalendarDay>) -> AgendaResult<Task> {
        let title = non_empty_title(title)?;
        let task = self
            .api
            .create_task(&NewTask {
                title: title.to_string(),
                date,
            })
            .await?;
        info!("Created task {}", task.id);
        self.load().await?;
        Ok(task)
    }

    pub async fn edit(&mut self, id: i64, edit: TaskEdit) -> AgendaResult<Task> {
        self.require(id)?;
        let update = edit.into_update()?;
        let task = self.api.update_task(id, &update).await?;
        info!("Updated task {}", id);
        self.load().await?;
        Ok(task)
    }

    /// Flip done/pending.
    pub async fn toggle(&mut self, id: i64) -> AgendaResult<Task> {
        self.require(id)?;
        let task = self.api.toggle_task(id).await?;
        self.load().await?;
        Ok(task)
    }

    pub async fn delete(
        &mut self,
        id: i64,
        dialog: &dyn ConfirmDialog,
    ) -> AgendaResult<Confirmation> {
        let task = self.require(id)?;
        let answer = dialog.confirm(&delete_prompt(&task.title))?;
        if !answer.is_confirmed() {
            return Ok(answer);
        }

        self.api.delete_task(id).await?;
        info!("Deleted task {}", id);
        self.load().await?;
        Ok(answer)
    }

    fn require(&self, id: i64) -> AgendaResult<Task> {
        self.find(id)
            .cloned()
            .ok_or_else(|| AgendaError::NotFound(format!("Task {} not found", id)))
    }
}
