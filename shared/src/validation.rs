//! Input validation functions
//!
//! Each check returns a user-facing message on failure. Mutation payloads
//! are validated in full before any stored state is touched.

use crate::models::WorkoutType;
use crate::types::{LogBodyMetricsRequest, LogWorkoutRequest};

/// Longest workout accepted, in minutes (24 hours)
pub const MAX_DURATION_MINUTES: f64 = 1440.0;

/// Longest note accepted, in characters
pub const MAX_NOTES_LEN: usize = 2000;

fn check_finite(name: &str, value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err(format!("{} must be a valid number", name));
    }
    Ok(())
}

/// Validate duration in minutes
pub fn validate_duration_minutes(minutes: f64) -> Result<(), String> {
    check_finite("Duration", minutes)?;
    if minutes <= 0.0 {
        return Err("Duration must be positive".to_string());
    }
    if minutes > MAX_DURATION_MINUTES {
        return Err("Duration cannot exceed 24 hours".to_string());
    }
    Ok(())
}

/// Validate calorie value
pub fn validate_calories(calories: f64) -> Result<(), String> {
    check_finite("Calories", calories)?;
    if calories < 0.0 {
        return Err("Calories cannot be negative".to_string());
    }
    Ok(())
}

/// Validate free-text notes
pub fn validate_notes(notes: &str) -> Result<(), String> {
    if notes.chars().count() > MAX_NOTES_LEN {
        return Err(format!("Notes cannot exceed {} characters", MAX_NOTES_LEN));
    }
    Ok(())
}

/// Parse an optional workout type, defaulting to mixed
pub fn parse_workout_type(value: Option<&str>) -> Result<WorkoutType, String> {
    match value {
        None => Ok(WorkoutType::default()),
        Some(s) => s.parse::<WorkoutType>().map_err(|e| match e {
            crate::errors::ProgressError::Validation(msg) => msg,
            other => other.to_string(),
        }),
    }
}

/// Validate a strictly positive measurement
pub fn validate_positive(name: &str, value: f64) -> Result<(), String> {
    check_finite(name, value)?;
    if value <= 0.0 {
        return Err(format!("{} must be positive", name));
    }
    Ok(())
}

/// Validate percentage value (0-100)
pub fn validate_percentage(name: &str, value: f64) -> Result<(), String> {
    check_finite(name, value)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(format!("{} must be between 0 and 100", name));
    }
    Ok(())
}

/// Validate a workout payload, returning the resolved workout type
pub fn validate_workout(request: &LogWorkoutRequest) -> Result<WorkoutType, String> {
    if let Some(minutes) = request.duration_minutes {
        validate_duration_minutes(minutes)?;
    }
    if let Some(calories) = request.calories_burned {
        validate_calories(calories)?;
    }
    if let Some(notes) = &request.notes {
        validate_notes(notes)?;
    }
    parse_workout_type(request.workout_type.as_deref())
}

/// Validate a body-metrics payload
pub fn validate_body_metrics(request: &LogBodyMetricsRequest) -> Result<(), String> {
    if let Some(weight) = request.weight {
        validate_positive("Weight", weight)?;
    }
    if let Some(body_fat) = request.body_fat_percent {
        validate_percentage("Body fat", body_fat)?;
    }
    if let Some(muscle) = request.muscle_mass {
        validate_positive("Muscle mass", muscle)?;
    }
    if let Some(height) = request.height {
        validate_positive("Height", height)?;
    }
    for (name, value) in request.measurements.present() {
        validate_positive(name, value)?;
    }
    Ok(())
}
