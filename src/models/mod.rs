//! Domain models for the project tracker.
//!
//! # Core Concepts
//!
//! - [`Project`]: A DIY project with estimated/actual hours, a difficulty
//!   rating and free-form notes. This is the only record the application
//!   creates, updates or deletes.
//! - [`ProjectDetails`]: A project together with everything attached to it,
//!   assembled in a single transaction.
//!
//! ## Attached Records
//!
//! These are read-only from the application's point of view and are only
//! loaded as part of [`ProjectDetails`]:
//!
//! - [`Material`]: Something that must be bought or gathered, owned by one project.
//! - [`Step`]: An ordered instruction, owned by one project.
//! - [`Category`]: A shared label linked to projects through `project_category`.

mod category;
mod material;
mod project;
mod step;

pub use category::*;
pub use material::*;
pub use project::*;
pub use step::*;

pub(crate) use project::display_opt;
