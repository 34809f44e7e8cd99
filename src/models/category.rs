use std::fmt;

use serde::{Deserialize, Serialize};

/// A label shared between projects.
///
/// The link to projects lives in the `project_category` join table, so a
/// category carries no project ID of its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID={}, categoryName={}", self.category_id, self.category_name)
    }
}
