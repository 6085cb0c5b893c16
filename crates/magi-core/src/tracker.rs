//! The state-owning tracker service.
//!
//! [`Tracker`] owns a storage backend and an identity provider. Reads come
//! from a cached snapshot of the signed-in user's data. Every successful
//! mutation drops the cache and the next read refetches it from the
//! backend; a failed mutation leaves the cache as it was.
//!
//! Without a signed-in user every read sees empty collections and every
//! mutation fails with [`CoreError::NotSignedIn`] before touching storage.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::engine::{
    self, current_by_date_range, CalendarDay, CompletionLog, DailyCompletion, Dashboard,
    HabitStatus, MoodSummary, ReadingSummary, WeeklyCompletion, DEFAULT_HORIZON_DAYS,
};
use crate::error::{CoreError, Result, StoreError};
use crate::identity::{Identity, User};
use crate::model::{
    AppState, Book, Completion, Exercise, ExercisePhase, Goal, Habit, Milestone,
    MonthlyTracking, MoodLog, WorkoutLog,
};
use crate::storage::{Backend, NaturalKey, Record};

pub struct Tracker<B, I> {
    backend: B,
    identity: I,
    cache: Option<AppState>,
    horizon_days: u32,
}

impl<B: Backend, I: Identity> Tracker<B, I> {
    pub fn new(backend: B, identity: I) -> Self {
        Self {
            backend,
            identity,
            cache: None,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }

    /// Bound on how far back streaks are walked.
    pub fn with_horizon(mut self, horizon_days: u32) -> Self {
        self.horizon_days = horizon_days.max(1);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }

    // --- identity -------------------------------------------------------

    pub fn current_user(&self) -> Option<&User> {
        self.identity.current_user()
    }

    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<User> {
        let user = self.identity.sign_in(email, password)?;
        self.invalidate();
        Ok(user)
    }

    pub fn sign_up(&mut self, email: &str, password: &str, username: &str) -> Result<User> {
        let user = self.identity.sign_up(email, password, username)?;
        self.invalidate();
        Ok(user)
    }

    pub fn sign_out(&mut self) -> Result<()> {
        let result = self.identity.sign_out();
        self.invalidate();
        result
    }

    pub fn reset_password(&mut self, email: &str) -> Result<()> {
        self.identity.reset_password(email)
    }

    // --- snapshot -------------------------------------------------------

    /// Current snapshot, refetched if a mutation invalidated it.
    pub fn state(&mut self) -> Result<&AppState> {
        if self.cache.is_none() {
            let state = match self.identity.current_user() {
                Some(user) => {
                    debug!(owner = %user.id, "refetching snapshot");
                    self.backend.load_state(&user.id)?
                }
                None => AppState::default(),
            };
            self.cache = Some(state);
        }
        Ok(self.cache.get_or_insert_with(AppState::default))
    }

    /// Drop the cached snapshot.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    fn owner(&self) -> Result<String> {
        self.identity
            .current_user()
            .map(|u| u.id.clone())
            .ok_or(CoreError::NotSignedIn)
    }

    /// Run one backend write as the current user, then invalidate.
    fn mutate<T, F>(&mut self, what: &str, op: F) -> Result<T>
    where
        F: FnOnce(&mut B, &str) -> std::result::Result<T, StoreError>,
    {
        let owner = self.owner()?;
        match op(&mut self.backend, &owner) {
            Ok(value) => {
                info!(%what, "mutation applied");
                self.invalidate();
                Ok(value)
            }
            Err(e) => {
                warn!(%what, error = %e, "mutation failed");
                Err(e.into())
            }
        }
    }

    fn find<R: Record>(&mut self, id: &str) -> Result<R> {
        self.owner()?;
        R::rows(self.state()?)
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                collection: R::COLLECTION.table(),
                id: id.to_string(),
            })
    }

    fn insert<R: Record>(&mut self, record: R) -> Result<R> {
        self.mutate("insert", |backend, owner| backend.insert(owner, &record))?;
        Ok(record)
    }

    fn update<R: Record>(&mut self, record: R) -> Result<R> {
        self.find::<R>(record.id())?;
        self.mutate("update", |backend, owner| backend.update(owner, &record))?;
        Ok(record)
    }

    fn delete<R: Record>(&mut self, id: &str) -> Result<()> {
        self.find::<R>(id)?;
        self.mutate("delete", |backend, owner| backend.delete::<R>(owner, id))
    }

    /// Upsert on the natural key, keeping the id of the row it replaces.
    fn upsert<R: Record>(&mut self, mut record: R) -> Result<R> {
        self.owner()?;
        if let Some(key) = record.natural_key() {
            let existing = R::rows(self.state()?)
                .iter()
                .find(|r| r.natural_key().as_ref() == Some(&key))
                .map(|r| r.id().to_string());
            if let Some(id) = existing {
                record.set_id(id);
            }
        }
        self.mutate("upsert", |backend, owner| backend.upsert(owner, &record))?;
        Ok(record)
    }

    // --- habits ---------------------------------------------------------

    pub fn add_habit(&mut self, habit: Habit) -> Result<Habit> {
        self.insert(habit)
    }

    /// Look up one habit, `NotFound` if it is not in the snapshot.
    pub fn habit(&mut self, id: &str) -> Result<Habit> {
        self.find::<Habit>(id)
    }

    /// Replace an existing habit (rename, recategorize, change recurrence).
    pub fn update_habit(&mut self, habit: Habit) -> Result<Habit> {
        self.update(habit)
    }

    /// Soft-deactivate or reactivate.
    pub fn set_habit_active(&mut self, id: &str, active: bool) -> Result<Habit> {
        let mut habit = self.find::<Habit>(id)?;
        habit.active = active;
        self.update(habit)
    }

    /// Delete a habit and its completion records.
    pub fn delete_habit(&mut self, id: &str) -> Result<()> {
        self.find::<Habit>(id)?;
        let completion_ids: Vec<String> = self
            .state()?
            .completions
            .iter()
            .filter(|c| c.habit_id == id)
            .map(|c| c.id.clone())
            .collect();
        for completion_id in completion_ids {
            self.mutate("delete completion", |backend, owner| {
                backend.delete::<Completion>(owner, &completion_id)
            })?;
        }
        self.delete::<Habit>(id)
    }

    /// Record or clear the completion of `habit_id` on `date`.
    pub fn set_completion(&mut self, habit_id: &str, date: NaiveDate, done: bool) -> Result<()> {
        self.find::<Habit>(habit_id)?;
        if done {
            self.upsert(Completion::new(habit_id, date))?;
            Ok(())
        } else {
            let key = NaturalKey::completion(habit_id, date);
            self.mutate("clear completion", |backend, owner| {
                backend.delete_by_key::<Completion>(owner, &key)
            })
        }
    }

    /// Flip the completion of `habit_id` on `date`; returns the new state.
    pub fn toggle_completion(&mut self, habit_id: &str, date: NaiveDate) -> Result<bool> {
        self.find::<Habit>(habit_id)?;
        let done = self
            .state()?
            .completions
            .iter()
            .any(|c| c.habit_id == habit_id && c.date == date && c.completed);
        self.set_completion(habit_id, date, !done)?;
        Ok(!done)
    }

    // --- reading --------------------------------------------------------

    pub fn add_book(&mut self, book: Book) -> Result<Book> {
        self.insert(book)
    }

    pub fn update_book(&mut self, book: Book) -> Result<Book> {
        self.update(book)
    }

    pub fn delete_book(&mut self, id: &str) -> Result<()> {
        self.delete::<Book>(id)
    }

    pub fn toggle_book(&mut self, id: &str, today: NaiveDate) -> Result<Book> {
        let mut book = self.find::<Book>(id)?;
        book.toggle_completed(today);
        self.update(book)
    }

    pub fn rate_book(&mut self, id: &str, rating: Option<u8>) -> Result<Book> {
        let mut book = self.find::<Book>(id)?;
        book.set_rating(rating)?;
        self.update(book)
    }

    pub fn set_book_progress(&mut self, id: &str, current_page: u32) -> Result<Book> {
        let mut book = self.find::<Book>(id)?;
        if let Some(pages) = book.pages {
            if current_page > pages {
                return Err(crate::error::ValidationError::OutOfRange {
                    field: "current_page",
                    min: 0,
                    max: i64::from(pages),
                    value: i64::from(current_page),
                }
                .into());
            }
        }
        book.current_page = current_page;
        self.update(book)
    }

    pub fn set_book_notes(&mut self, id: &str, notes: Option<String>) -> Result<Book> {
        let mut book = self.find::<Book>(id)?;
        book.notes = notes;
        self.update(book)
    }

    // --- exercise -------------------------------------------------------

    pub fn add_exercise(&mut self, exercise: Exercise) -> Result<Exercise> {
        self.insert(exercise)
    }

    pub fn add_phase(&mut self, phase: ExercisePhase) -> Result<ExercisePhase> {
        self.insert(phase)
    }

    pub fn log_workout(&mut self, log: WorkoutLog) -> Result<WorkoutLog> {
        log.validate()?;
        self.insert(log)
    }

    pub fn delete_workout(&mut self, id: &str) -> Result<()> {
        self.delete::<WorkoutLog>(id)
    }

    // --- goals ----------------------------------------------------------

    pub fn add_goal(&mut self, goal: Goal) -> Result<Goal> {
        self.insert(goal)
    }

    pub fn update_goal(&mut self, goal: Goal) -> Result<Goal> {
        self.update(goal)
    }

    /// Delete a goal with its milestones and monthly entries.
    pub fn delete_goal(&mut self, id: &str) -> Result<()> {
        self.find::<Goal>(id)?;
        let state = self.state()?;
        let milestones: Vec<String> = state
            .milestones
            .iter()
            .filter(|m| m.goal_id == id)
            .map(|m| m.id.clone())
            .collect();
        let months: Vec<String> = state
            .monthly_tracking
            .iter()
            .filter(|m| m.goal_id == id)
            .map(|m| m.id.clone())
            .collect();
        for milestone in milestones {
            self.mutate("delete milestone", |backend, owner| {
                backend.delete::<Milestone>(owner, &milestone)
            })?;
        }
        for month in months {
            self.mutate("delete monthly entry", |backend, owner| {
                backend.delete::<MonthlyTracking>(owner, &month)
            })?;
        }
        self.delete::<Goal>(id)
    }

    pub fn set_goal_progress(&mut self, id: &str, progress: u8, today: NaiveDate) -> Result<Goal> {
        let mut goal = self.find::<Goal>(id)?;
        goal.set_progress(progress, today)?;
        self.update(goal)
    }

    pub fn add_milestone(&mut self, goal_id: &str, title: &str, today: NaiveDate) -> Result<Milestone> {
        self.find::<Goal>(goal_id)?;
        if title.trim().is_empty() {
            return Err(crate::error::ValidationError::Empty("title").into());
        }
        let milestone = self.insert(Milestone::new(goal_id, title.trim()))?;
        self.sync_goal(goal_id, today)?;
        Ok(milestone)
    }

    /// Flip a milestone and recompute its goal's progress.
    pub fn toggle_milestone(&mut self, id: &str, today: NaiveDate) -> Result<Goal> {
        let mut milestone = self.find::<Milestone>(id)?;
        milestone.toggle(today);
        let goal_id = milestone.goal_id.clone();
        self.update(milestone)?;
        self.sync_goal(&goal_id, today)
    }

    fn sync_goal(&mut self, goal_id: &str, today: NaiveDate) -> Result<Goal> {
        let mut goal = self.find::<Goal>(goal_id)?;
        let before = (goal.progress, goal.status);
        goal.sync_with_milestones(&self.state()?.milestones, today);
        if (goal.progress, goal.status) == before {
            return Ok(goal);
        }
        self.update(goal)
    }

    /// Set one month of a monthly-tracked goal, replacing any earlier entry.
    pub fn track_month(
        &mut self,
        goal_id: &str,
        month: u32,
        completed: bool,
        value: Option<String>,
    ) -> Result<MonthlyTracking> {
        let mut entry = MonthlyTracking::new(goal_id, month, completed)?;
        entry.value = value;
        self.find::<Goal>(goal_id)?;
        self.upsert(entry)
    }

    // --- mood -----------------------------------------------------------

    /// Store the day's mood, replacing an earlier log for the same date.
    pub fn log_mood(&mut self, log: MoodLog) -> Result<MoodLog> {
        self.upsert(log)
    }

    // --- import ---------------------------------------------------------

    /// Replace all of the current user's data with `state`.
    pub fn import_state(&mut self, state: &AppState) -> Result<()> {
        self.mutate("import", |backend, owner| backend.replace_all(owner, state))
    }

    // --- views ----------------------------------------------------------

    fn log(&mut self) -> Result<CompletionLog> {
        Ok(CompletionLog::from_completions(&self.state()?.completions))
    }

    pub fn today_completion(&mut self, today: NaiveDate) -> Result<DailyCompletion> {
        let log = self.log()?;
        Ok(engine::today_completion(&self.state()?.habits, &log, today))
    }

    pub fn weekly_completion(&mut self, week_of: NaiveDate) -> Result<WeeklyCompletion> {
        let log = self.log()?;
        Ok(engine::weekly_completion(&self.state()?.habits, &log, week_of))
    }

    pub fn habit_report(&mut self, today: NaiveDate) -> Result<Vec<HabitStatus>> {
        let horizon = self.horizon_days;
        let log = self.log()?;
        Ok(engine::habit_report(&self.state()?.habits, &log, today, horizon))
    }

    pub fn streak(&mut self, habit_id: &str, as_of: NaiveDate) -> Result<u32> {
        let horizon = self.horizon_days;
        let log = self.log()?;
        if self.state()?.habit(habit_id).is_none() {
            return Err(CoreError::NotFound {
                collection: Habit::COLLECTION.table(),
                id: habit_id.to_string(),
            });
        }
        Ok(engine::compute_streak_within(log.dates(habit_id), as_of, horizon))
    }

    pub fn reading_summary(&mut self) -> Result<ReadingSummary> {
        Ok(engine::reading_summary(&self.state()?.books))
    }

    pub fn current_book(&mut self, today: NaiveDate) -> Result<Option<Book>> {
        Ok(current_by_date_range(&self.state()?.books, today).cloned())
    }

    pub fn current_phase(&mut self, today: NaiveDate) -> Result<Option<ExercisePhase>> {
        Ok(current_by_date_range(&self.state()?.phases, today).cloned())
    }

    pub fn mood_summary(&mut self, today: NaiveDate) -> Result<MoodSummary> {
        Ok(engine::mood_summary(&self.state()?.moods, today))
    }

    pub fn month_calendar(&mut self, year: i32, month: u32) -> Result<Vec<CalendarDay>> {
        Ok(engine::month_calendar(self.state()?, year, month))
    }

    pub fn dashboard(&mut self, today: NaiveDate) -> Result<Dashboard> {
        let horizon = self.horizon_days;
        Ok(engine::dashboard(self.state()?, today, horizon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::LocalIdentity;
    use crate::model::{GoalCategory, GoalStatus, HabitCategory, Recurrence};
    use crate::storage::SnapshotStore;
    use std::cell::Cell;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    /// Snapshot backend that counts refetches and can be told to fail writes.
    struct Probe {
        inner: SnapshotStore,
        loads: Cell<u32>,
        fail_writes: bool,
    }

    impl Probe {
        fn new() -> Self {
            Self {
                inner: SnapshotStore::in_memory(),
                loads: Cell::new(0),
                fail_writes: false,
            }
        }

        fn check(&self) -> std::result::Result<(), StoreError> {
            if self.fail_writes {
                Err(StoreError::Transport("connection reset".into()))
            } else {
                Ok(())
            }
        }
    }

    impl Backend for Probe {
        fn list<R: Record>(&self, owner: &str) -> std::result::Result<Vec<R>, StoreError> {
            self.inner.list(owner)
        }
        fn insert<R: Record>(&mut self, owner: &str, record: &R) -> std::result::Result<(), StoreError> {
            self.check()?;
            self.inner.insert(owner, record)
        }
        fn update<R: Record>(&mut self, owner: &str, record: &R) -> std::result::Result<(), StoreError> {
            self.check()?;
            self.inner.update(owner, record)
        }
        fn delete<R: Record>(&mut self, owner: &str, id: &str) -> std::result::Result<(), StoreError> {
            self.check()?;
            self.inner.delete::<R>(owner, id)
        }
        fn upsert<R: Record>(&mut self, owner: &str, record: &R) -> std::result::Result<(), StoreError> {
            self.check()?;
            self.inner.upsert(owner, record)
        }
        fn delete_by_key<R: Record>(
            &mut self,
            owner: &str,
            key: &NaturalKey,
        ) -> std::result::Result<(), StoreError> {
            self.check()?;
            self.inner.delete_by_key::<R>(owner, key)
        }
        fn load_state(&self, owner: &str) -> std::result::Result<AppState, StoreError> {
            self.loads.set(self.loads.get() + 1);
            self.inner.load_state(owner)
        }
    }

    fn tracker() -> Tracker<Probe, LocalIdentity> {
        Tracker::new(Probe::new(), LocalIdentity::new())
    }

    fn daily(name: &str) -> Habit {
        Habit::new(name, HabitCategory::Reading, Recurrence::Daily).unwrap()
    }

    #[test]
    fn mutations_without_user_fail_before_backend() {
        let mut t = Tracker::new(Probe::new(), LocalIdentity::signed_out());
        let err = t.add_habit(daily("Leer")).unwrap_err();
        assert!(matches!(err, CoreError::NotSignedIn));
        assert!(matches!(
            t.toggle_completion("h1", date("2026-01-07")),
            Err(CoreError::NotSignedIn)
        ));
        assert!(t.backend().inner.state().is_empty());
        // Reads are simply empty and never hit the backend.
        assert!(t.state().unwrap().habits.is_empty());
        assert_eq!(t.backend().loads.get(), 0);
    }

    #[test]
    fn reads_are_cached_until_a_mutation() {
        let mut t = tracker();
        t.state().unwrap();
        t.state().unwrap();
        assert_eq!(t.backend().loads.get(), 1);

        t.add_habit(daily("Leer")).unwrap();
        assert_eq!(t.state().unwrap().habits.len(), 1);
        assert_eq!(t.backend().loads.get(), 2);
    }

    #[test]
    fn failed_mutation_keeps_cache() {
        let mut t = tracker();
        let habit = t.add_habit(daily("Leer")).unwrap();
        t.state().unwrap();
        let loads = t.backend().loads.get();

        t.backend.fail_writes = true;
        let err = t.toggle_completion(&habit.id, date("2026-01-07")).unwrap_err();
        assert!(matches!(err, CoreError::Store(StoreError::Transport(_))));
        assert!(t.state().unwrap().completions.is_empty());
        assert_eq!(t.backend().loads.get(), loads);
    }

    #[test]
    fn toggling_twice_restores_state() {
        let mut t = tracker();
        let habit = t.add_habit(daily("Leer")).unwrap();
        let before = t.state().unwrap().clone();

        assert!(t.toggle_completion(&habit.id, date("2026-01-07")).unwrap());
        assert_eq!(t.state().unwrap().completions.len(), 1);
        assert!(!t.toggle_completion(&habit.id, date("2026-01-07")).unwrap());
        assert_eq!(t.state().unwrap(), &before);
    }

    #[test]
    fn repeated_completion_never_duplicates() {
        let mut t = tracker();
        let habit = t.add_habit(daily("Leer")).unwrap();
        for _ in 0..3 {
            t.set_completion(&habit.id, date("2026-01-07"), true).unwrap();
        }
        assert_eq!(t.state().unwrap().completions.len(), 1);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut t = tracker();
        assert!(matches!(
            t.toggle_completion("missing", date("2026-01-07")),
            Err(CoreError::NotFound { collection: "habits", .. })
        ));
        assert!(matches!(
            t.toggle_book("missing", date("2026-01-07")),
            Err(CoreError::NotFound { collection: "books", .. })
        ));
    }

    #[test]
    fn streak_scenario_through_service() {
        let mut t = tracker();
        let habit = t.add_habit(daily("Lectura diaria")).unwrap();
        for d in ["2026-01-05", "2026-01-06", "2026-01-07"] {
            t.toggle_completion(&habit.id, date(d)).unwrap();
        }
        assert_eq!(t.streak(&habit.id, date("2026-01-07")).unwrap(), 3);
        assert_eq!(t.today_completion(date("2026-01-07")).unwrap().percentage, 100);
    }

    #[test]
    fn horizon_is_configurable() {
        let mut t = tracker().with_horizon(2);
        let habit = t.add_habit(daily("Leer")).unwrap();
        for d in ["2026-01-05", "2026-01-06", "2026-01-07"] {
            t.set_completion(&habit.id, date(d), true).unwrap();
        }
        assert_eq!(t.streak(&habit.id, date("2026-01-07")).unwrap(), 2);
    }

    #[test]
    fn milestones_drive_goal_progress() {
        let today = date("2026-04-01");
        let mut t = tracker();
        let goal = t.add_goal(Goal::new("Maratón", GoalCategory::Principal).unwrap()).unwrap();
        let first = t.add_milestone(&goal.id, "10K", today).unwrap();
        t.add_milestone(&goal.id, "21K", today).unwrap();

        let goal = t.toggle_milestone(&first.id, today).unwrap();
        assert_eq!(goal.progress, 50);
        assert_eq!(goal.status, GoalStatus::InProgress);
        assert_eq!(t.state().unwrap().goal(&goal.id).unwrap().progress, 50);
    }

    #[test]
    fn monthly_tracking_and_mood_upsert_in_place() {
        let mut t = tracker();
        let goal = t.add_goal(Goal::new("Ahorro", GoalCategory::General).unwrap()).unwrap();
        let first = t.track_month(&goal.id, 2, false, None).unwrap();
        let second = t.track_month(&goal.id, 2, true, Some("300€".into())).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(t.state().unwrap().monthly_tracking.len(), 1);

        t.log_mood(MoodLog::new(date("2026-02-01"), 5, None, None).unwrap()).unwrap();
        t.log_mood(MoodLog::new(date("2026-02-01"), 8, Some(7), None).unwrap()).unwrap();
        let moods = &t.state().unwrap().moods;
        assert_eq!(moods.len(), 1);
        assert_eq!(moods[0].mood_score, 8);
    }

    #[test]
    fn deleting_a_habit_removes_its_completions() {
        let mut t = tracker();
        let keep = t.add_habit(daily("Italiano")).unwrap();
        let gone = t.add_habit(daily("Leer")).unwrap();
        t.set_completion(&keep.id, date("2026-01-07"), true).unwrap();
        t.set_completion(&gone.id, date("2026-01-07"), true).unwrap();

        t.delete_habit(&gone.id).unwrap();
        let state = t.state().unwrap();
        assert_eq!(state.habits.len(), 1);
        assert_eq!(state.completions.len(), 1);
        assert_eq!(state.completions[0].habit_id, keep.id);
    }

    #[test]
    fn sign_out_empties_reads() {
        let mut t = tracker();
        t.add_habit(daily("Leer")).unwrap();
        t.sign_out().unwrap();
        assert!(t.state().unwrap().habits.is_empty());
        t.sign_in("tu@email.com", "abcd").unwrap();
        assert_eq!(t.state().unwrap().habits.len(), 1);
    }

    #[test]
    fn editing_recurrence_changes_schedule() {
        let monday = date("2026-01-05");
        let wednesday = date("2026-01-07");
        let mut t = tracker();
        let habit = t.add_habit(daily("Running")).unwrap();
        assert_eq!(t.weekly_completion(monday).unwrap().total, 7);

        let mut edited = t.habit(&habit.id).unwrap();
        edited.rename("Running 5K").unwrap();
        edited.category = HabitCategory::Exercise;
        edited.recurrence = Recurrence::weekly([3, 6]).unwrap();
        t.update_habit(edited).unwrap();

        let stored = t.habit(&habit.id).unwrap();
        assert_eq!(stored.name, "Running 5K");
        assert!(engine::is_due(&stored, wednesday));
        assert!(!engine::is_due(&stored, monday));
        assert_eq!(t.weekly_completion(monday).unwrap().total, 2);
        assert_eq!(t.today_completion(wednesday).unwrap().total, 0);
        assert_eq!(t.state().unwrap().habits.len(), 1);
    }

    #[test]
    fn updating_unknown_habit_is_not_found() {
        let mut t = tracker();
        let ghost = daily("Fantasma");
        assert!(matches!(
            t.update_habit(ghost),
            Err(CoreError::NotFound { collection: "habits", .. })
        ));
        assert!(t.state().unwrap().habits.is_empty());
    }

    #[test]
    fn book_progress_cannot_pass_page_count() {
        let mut t = tracker();
        let mut book = Book::new("Siddhartha").unwrap();
        book.pages = Some(160);
        let book = t.add_book(book).unwrap();
        assert!(t.set_book_progress(&book.id, 200).is_err());
        assert_eq!(t.set_book_progress(&book.id, 80).unwrap().current_page, 80);
    }
}
