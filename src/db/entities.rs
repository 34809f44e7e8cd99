//! Column descriptor tables for every record read from the database.

use crate::models::{Category, Material, Project, Step};

use super::extract::{Column, Entity};
use super::params::{SemanticType, SqlScalar};

impl Entity for Project {
    const NAME: &'static str = "project";
    const COLUMNS: &'static [Column<Self>] = &[
        Column {
            name: "project_id",
            kind: SemanticType::Integer,
            assign: |project, value| {
                project.project_id = SqlScalar::from_column(value)?;
                Ok(())
            },
        },
        Column {
            name: "project_name",
            kind: SemanticType::Text,
            assign: |project, value| {
                project.project_name = SqlScalar::from_column(value)?;
                Ok(())
            },
        },
        Column {
            name: "estimated_hours",
            kind: SemanticType::Decimal,
            assign: |project, value| {
                project.estimated_hours = SqlScalar::from_column(value)?;
                Ok(())
            },
        },
        Column {
            name: "actual_hours",
            kind: SemanticType::Decimal,
            assign: |project, value| {
                project.actual_hours = SqlScalar::from_column(value)?;
                Ok(())
            },
        },
        Column {
            name: "difficulty",
            kind: SemanticType::Integer,
            assign: |project, value| {
                project.difficulty = SqlScalar::from_column(value)?;
                Ok(())
            },
        },
        Column {
            name: "notes",
            kind: SemanticType::Text,
            assign: |project, value| {
                project.notes = SqlScalar::from_column(value)?;
                Ok(())
            },
        },
    ];
}

impl Entity for Material {
    const NAME: &'static str = "material";
    const COLUMNS: &'static [Column<Self>] = &[
        Column {
            name: "material_id",
            kind: SemanticType::Integer,
            assign: |material, value| {
                material.material_id = SqlScalar::from_column(value)?;
                Ok(())
            },
        },
        Column {
            name: "project_id",
            kind: SemanticType::Integer,
            assign: |material, value| {
                material.project_id = SqlScalar::from_column(value)?;
                Ok(())
            },
        },
        Column {
            name: "material_name",
            kind: SemanticType::Text,
            assign: |material, value| {
                material.material_name = SqlScalar::from_column(value)?;
                Ok(())
            },
        },
        Column {
            name: "num_required",
            kind: SemanticType::Integer,
            assign: |material, value| {
                material.num_required = SqlScalar::from_column(value)?;
                Ok(())
            },
        },
        Column {
            name: "cost",
            kind: SemanticType::Decimal,
            assign: |material, value| {
                material.cost = SqlScalar::from_column(value)?;
                Ok(())
            },
        },
    ];
}

impl Entity for Step {
    const NAME: &'static str = "step";
    const COLUMNS: &'static [Column<Self>] = &[
        Column {
            name: "step_id",
            kind: SemanticType::Integer,
            assign: |step, value| {
                step.step_id = SqlScalar::from_column(value)?;
                Ok(())
            },
        },
        Column {
            name: "project_id",
            kind: SemanticType::Integer,
            assign: |step, value| {
                step.project_id = SqlScalar::from_column(value)?;
                Ok(())
            },
        },
        Column {
            name: "step_text",
            kind: SemanticType::Text,
            assign: |step, value| {
                step.step_text = SqlScalar::from_column(value)?;
                Ok(())
            },
        },
        Column {
            name: "step_order",
            kind: SemanticType::Integer,
            assign: |step, value| {
                step.step_order = SqlScalar::from_column(value)?;
                Ok(())
            },
        },
    ];
}

impl Entity for Category {
    const NAME: &'static str = "category";
    const COLUMNS: &'static [Column<Self>] = &[
        Column {
            name: "category_id",
            kind: SemanticType::Integer,
            assign: |category, value| {
                category.category_id = SqlScalar::from_column(value)?;
                Ok(())
            },
        },
        Column {
            name: "category_name",
            kind: SemanticType::Text,
            assign: |category, value| {
                category.category_name = SqlScalar::from_column(value)?;
                Ok(())
            },
        },
    ];
}
