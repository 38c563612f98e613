//! Order Model

use serde::{Deserialize, Serialize};

/// Create order payload (order time is stamped by the server)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCreate {
    pub session_id: Option<i64>,
    pub staff_id: Option<i64>,
}

/// Query string of `GET /api/orders`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListQuery {
    /// `YYYY-MM-DD`; restricts to orders placed on that day
    pub date: Option<String>,
}
