//! Fitness Progress WASM Module
//!
//! Browser bindings for the progress calculations, so the client can show
//! streaks, weekly stats and the training plan for unsaved edits without a
//! round trip. Structured values cross the boundary as JSON strings; times
//! are RFC 3339 and their offset sets the calendar-day boundaries.

use chrono::{DateTime, FixedOffset, NaiveDate};
use fitness_progress_shared::health_metrics::bmi_for_display;
use fitness_progress_shared::{schedule, stats, streak, ActivityRecord, StreakState};
use wasm_bindgen::prelude::*;

fn parse_now(now: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(now).map_err(|e| format!("Invalid time '{}': {}", now, e))
}

fn parse_records(records_json: &str) -> Result<Vec<ActivityRecord>, String> {
    serde_json::from_str(records_json).map_err(|e| format!("Invalid activity records: {}", e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn training_day(date: &str, days_per_week: i32) -> Result<bool, String> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {}", date, e))?;
    Ok(schedule::is_training_day(date, days_per_week))
}

fn streak_json(records_json: &str, previous_json: &str, now: &str) -> Result<String, String> {
    let records = parse_records(records_json)?;
    let previous: StreakState = serde_json::from_str(previous_json)
        .map_err(|e| format!("Invalid streak state: {}", e))?;
    to_json(&streak::compute_streak(&records, &previous, parse_now(now)?))
}

fn stats_json(records_json: &str, weekly_goal: u32, now: &str) -> Result<String, String> {
    let records = parse_records(records_json)?;
    to_json(&stats::compute_stats(&records, weekly_goal, parse_now(now)?))
}

fn schedule_json(records_json: &str, days_per_week: i32, now: &str) -> Result<String, String> {
    let records = parse_records(records_json)?;
    to_json(&schedule::week_schedule(&records, days_per_week, parse_now(now)?))
}

/// Whether a `YYYY-MM-DD` date is a planned training day
#[wasm_bindgen(js_name = isTrainingDay)]
pub fn is_training_day(date: &str, days_per_week: i32) -> Result<bool, JsValue> {
    training_day(date, days_per_week).map_err(|e| JsValue::from_str(&e))
}

/// Recompute streak state from a JSON array of activity records
#[wasm_bindgen(js_name = computeStreak)]
pub fn compute_streak(records_json: &str, previous_json: &str, now: &str) -> Result<String, JsValue> {
    streak_json(records_json, previous_json, now).map_err(|e| JsValue::from_str(&e))
}

/// Recompute workout stats from a JSON array of activity records
#[wasm_bindgen(js_name = computeStats)]
pub fn compute_stats(records_json: &str, weekly_goal: u32, now: &str) -> Result<String, JsValue> {
    stats_json(records_json, weekly_goal, now).map_err(|e| JsValue::from_str(&e))
}

/// Sunday-to-Saturday plan for the week containing `now`
#[wasm_bindgen(js_name = weekSchedule)]
pub fn week_schedule(records_json: &str, days_per_week: i32, now: &str) -> Result<String, JsValue> {
    schedule_json(records_json, days_per_week, now).map_err(|e| JsValue::from_str(&e))
}

/// BMI rounded to one decimal, or 0 when either input is not positive
#[wasm_bindgen(js_name = calculateBmi)]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    bmi_for_display(Some(weight_kg), Some(height_cm))
        .map(|bmi| bmi.value)
        .unwrap_or(0.0)
}

/// BMI category label, if BMI can be computed
#[wasm_bindgen(js_name = bmiCategory)]
pub fn bmi_category(weight_kg: f64, height_cm: f64) -> Option<String> {
    bmi_for_display(Some(weight_kg), Some(height_cm))
        .map(|bmi| bmi.category.description().to_string())
}
