use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: f64,
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewTaskRequest {
    pub title: String,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditTaskRequest {
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct WeekQuery {
    pub offset: Option<i64>,
    pub selected: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DayView {
    pub date: String,
    pub name: String,
    pub tasks: Vec<Task>,
    pub done_count: usize,
    pub progress: u8,
}

#[derive(Debug, Serialize)]
pub struct WeekResponse {
    pub offset: i64,
    pub label: String,
    pub start_date: String,
    pub end_date: String,
    pub selected: String,
    pub selected_progress: u8,
    pub days: Vec<DayView>,
}

#[derive(Debug, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub date: String,
    pub completed: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DarkModePayload {
    pub dark_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub seen: bool,
}
