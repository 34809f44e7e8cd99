use std::fmt;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::{Category, Material, Step};

/// A persisted project row.
///
/// `project_id` is assigned by the database on insert and never changes.
/// Hours are fixed-point decimals with exactly two fractional digits.
/// Difficulty is 1-5 by convention; nothing below the shell checks it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: i64,
    pub project_name: String,
    pub estimated_hours: Option<BigDecimal>,
    pub actual_hours: Option<BigDecimal>,
    pub difficulty: Option<i32>,
    pub notes: Option<String>,
}

/// Input for creating a project, or for replacing every scalar field of an
/// existing one.
///
/// Updates are full overwrites: a `None` here clears the stored value.
/// Callers that only want to change some fields must copy the rest from a
/// previously fetched [`Project`] (see [`ProjectInput::from`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectInput {
    pub project_name: String,
    pub estimated_hours: Option<BigDecimal>,
    pub actual_hours: Option<BigDecimal>,
    pub difficulty: Option<i32>,
    pub notes: Option<String>,
}

impl From<&Project> for ProjectInput {
    fn from(project: &Project) -> Self {
        Self {
            project_name: project.project_name.clone(),
            estimated_hours: project.estimated_hours.clone(),
            actual_hours: project.actual_hours.clone(),
            difficulty: project.difficulty,
            notes: project.notes.clone(),
        }
    }
}

/// A project with all of its materials, steps and categories.
///
/// Only ever built inside one transaction, so the three collections are
/// always complete for the moment the project was read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,
    pub materials: Vec<Material>,
    pub steps: Vec<Step>,
    pub categories: Vec<Category>,
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   ID={}", self.project_id)?;
        writeln!(f, "   name={}", self.project_name)?;
        writeln!(f, "   estimatedHours={}", display_opt(&self.estimated_hours))?;
        writeln!(f, "   actualHours={}", display_opt(&self.actual_hours))?;
        writeln!(f, "   difficulty={}", display_opt(&self.difficulty))?;
        write!(f, "   notes={}", display_opt(&self.notes))
    }
}

impl fmt::Display for ProjectDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.project)?;

        writeln!(f, "   Materials:")?;
        for material in &self.materials {
            writeln!(f, "      {material}")?;
        }

        writeln!(f, "   Steps:")?;
        for step in &self.steps {
            writeln!(f, "      {step}")?;
        }

        write!(f, "   Categories:")?;
        for category in &self.categories {
            write!(f, "\n      {category}")?;
        }
        Ok(())
    }
}

pub(crate) fn display_opt<T: fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "null".to_string())
}
