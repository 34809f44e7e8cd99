use std::fmt;

use serde::{Deserialize, Serialize};

/// One instruction in a project, ordered by `step_order`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub step_id: i64,
    pub project_id: i64,
    pub step_text: String,
    pub step_order: i32,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID={}, stepOrder={}, stepText={}",
            self.step_id, self.step_order, self.step_text
        )
    }
}
