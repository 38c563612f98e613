//! Feedback Model

use serde::{Deserialize, Serialize};

/// Create feedback payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackCreate {
    pub session_id: Option<i64>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

/// Aggregate over all feedback rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub total_feedback: i64,
    pub avg_rating: f64,
    pub five_star: i64,
    pub four_star: i64,
    pub three_star: i64,
    pub low_rating: i64,
}
