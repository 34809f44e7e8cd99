use std::fmt;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::project::display_opt;

/// A material needed by one project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub material_id: i64,
    pub project_id: i64,
    pub material_name: String,
    pub num_required: Option<i32>,
    /// Unit cost, two fractional digits.
    pub cost: Option<BigDecimal>,
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID={}, materialName={}, numRequired={}, cost={}",
            self.material_id,
            self.material_name,
            display_opt(&self.num_required),
            display_opt(&self.cost)
        )
    }
}
