use std::time::Duration;

pub type TaskId = usize;

#[derive(Debug, Clone)]
struct Task<J> {
    id: TaskId,
    job: J,
    due: Duration,
    every: Option<Duration>,
}

/// Virtual clock with cancellable one-shot and repeating tasks.
///
/// Nothing runs on its own: the owner moves time forward with
/// [`Scheduler::pop_due`] and runs the returned jobs itself, so a tick always
/// completes before the next one is handed out.
#[derive(Debug, Clone)]
pub struct Scheduler<J: Clone> {
    now: Duration,
    next_id: TaskId,
    tasks: Vec<Task<J>>,
}

impl<J: Clone> Default for Scheduler<J> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            tasks: Vec::new(),
        }
    }
}

impl<J: Clone> Scheduler<J> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn schedule_once(&mut self, delay: Duration, job: J) -> TaskId {
        self.push(delay, None, job)
    }

    /// Runs `job` every `every`, first after one period. Periods below one
    /// millisecond are raised to one millisecond.
    pub fn schedule_repeating(&mut self, every: Duration, job: J) -> TaskId {
        let every = every.max(Duration::from_millis(1));
        self.push(every, Some(every), job)
    }

    /// Returns whether a task was removed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    /// Hands out the earliest task due at or before `until` and moves the
    /// clock to its due time. Ties go to the task scheduled first. Repeating
    /// tasks are rescheduled one period later.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TaskId, J)> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due <= until)
            .min_by_key(|(_, task)| (task.due, task.id))
            .map(|(index, _)| index)?;

        let task = &self.tasks[index];
        let (due, every) = (task.due, task.every);
        let result = (task.id, task.job.clone());
        self.now = self.now.max(due);
        match every {
            Some(every) => self.tasks[index].due += every,
            None => {
                self.tasks.remove(index);
            }
        }
        Some(result)
    }

    /// Moves the clock forward without running anything due before `until`.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    fn push(&mut self, delay: Duration, every: Option<Duration>, job: J) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            job,
            due: self.now + delay,
            every,
        });
        id
    }
}
