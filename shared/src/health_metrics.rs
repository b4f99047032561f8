//! Body-mass index for progress display

use serde::{Deserialize, Serialize};

/// BMI category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Human-readable label
    pub fn description(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// BMI value with its category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    /// Rounded to one decimal
    pub value: f64,
    pub category: BmiCategory,
}

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Classify BMI into category
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// BMI for display, absent unless both inputs are present and positive
pub fn bmi_for_display(weight_kg: Option<f64>, height_cm: Option<f64>) -> Option<BmiResult> {
    match (weight_kg, height_cm) {
        (Some(weight), Some(height)) if weight > 0.0 && height > 0.0 => {
            let bmi = calculate_bmi(weight, height);
            Some(BmiResult {
                value: (bmi * 10.0).round() / 10.0,
                category: classify_bmi(bmi),
            })
        }
        _ => None,
    }
}
