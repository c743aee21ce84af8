//! Week windows and per-day task buckets.
//!
//! A task's calendar day is never stored; it is decoded from the task id,
//! which holds the millisecond timestamp of local midnight of that day.

use crate::models::{ChartPoint, Task};
use chrono::{Datelike, Duration, Local, NaiveDate, TimeZone, Utc};

pub const WEEK_LEN: usize = 7;

pub type Week = [NaiveDate; WEEK_LEN];

#[derive(Debug)]
pub struct DayBucket<'a> {
    pub date: NaiveDate,
    pub tasks: Vec<&'a Task>,
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn compute_week(offset: i64) -> Option<Week> {
    compute_week_at(today(), offset)
}

/// `None` when the offset leaves chrono's date range.
pub fn compute_week_at(today: NaiveDate, offset: i64) -> Option<Week> {
    let start = week_start(today).checked_add_signed(Duration::try_weeks(offset)?)?;
    let mut week = [start; WEEK_LEN];
    for (day, slot) in week.iter_mut().enumerate() {
        *slot = start.checked_add_signed(Duration::days(day as i64))?;
    }
    Some(week)
}

/// Id prefix for tasks created on `date`: milliseconds since the epoch at
/// the first valid local instant of that day.
pub fn day_id_in<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> f64 {
    (0..24)
        .find_map(|hour| tz.from_local_datetime(&date.and_hms_opt(hour, 0, 0)?).earliest())
        .map(|start| start.timestamp_millis())
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis()) as f64
}

pub fn day_id(date: NaiveDate) -> f64 {
    day_id_in(&Local, date)
}

pub fn now_id() -> f64 {
    Utc::now().timestamp_millis() as f64
}

/// Day key of a task id. The fractional part is dropped before decoding.
pub fn day_of_in<Tz: TimeZone>(tz: &Tz, id: f64) -> Option<NaiveDate> {
    if !id.is_finite() {
        return None;
    }
    tz.timestamp_millis_opt(id.floor() as i64)
        .single()
        .map(|instant| instant.date_naive())
}

pub fn bucket_tasks_by_day_in<'a, Tz: TimeZone>(tz: &Tz, tasks: &'a [Task], week: &[NaiveDate]) -> Vec<DayBucket<'a>> {
    week.iter()
        .map(|&date| DayBucket {
            date,
            tasks: tasks_on_in(tz, tasks, date),
        })
        .collect()
}

pub fn bucket_tasks_by_day<'a>(tasks: &'a [Task], week: &[NaiveDate]) -> Vec<DayBucket<'a>> {
    bucket_tasks_by_day_in(&Local, tasks, week)
}

pub fn tasks_on_in<'a, Tz: TimeZone>(tz: &Tz, tasks: &'a [Task], date: NaiveDate) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| day_of_in(tz, task.id) == Some(date))
        .collect()
}

/// Percentage of done tasks, rounded to the nearest whole percent.
pub fn compute_progress(tasks: &[&Task]) -> u8 {
    if tasks.is_empty() {
        return 0;
    }
    let done = tasks.iter().filter(|task| task.done).count();
    (done as f64 / tasks.len() as f64 * 100.0).round() as u8
}

/// Keeps `selected` when it lies inside `week`, otherwise the week's first day.
pub fn reconcile_selection(selected: NaiveDate, week: &Week) -> NaiveDate {
    if week.contains(&selected) {
        selected
    } else {
        week[0]
    }
}

pub fn completed_per_day_in<Tz: TimeZone>(tz: &Tz, tasks: &[Task], week: &[NaiveDate]) -> Vec<ChartPoint> {
    bucket_tasks_by_day_in(tz, tasks, week)
        .into_iter()
        .map(|bucket| ChartPoint {
            name: short_day_name(bucket.date),
            date: bucket.date.to_string(),
            completed: bucket.tasks.iter().filter(|task| task.done).count(),
        })
        .collect()
}

pub fn completed_per_day(tasks: &[Task], week: &[NaiveDate]) -> Vec<ChartPoint> {
    completed_per_day_in(&Local, tasks, week)
}

pub fn short_day_name(date: NaiveDate) -> String {
    date.format("%a").to_string()
}

/// "3 Mar - 9 Mar"
pub fn week_label(week: &Week) -> String {
    format!("{} - {}", week[0].format("%-d %b"), week[WEEK_LEN - 1].format("%-d %b"))
}
