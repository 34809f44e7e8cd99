//! Interactive menu over the project repository.
//!
//! The shell reads one line per prompt and treats a blank line as "no
//! value". The project being worked on is an `Option<ProjectDetails>`
//! threaded through the loop: set by create and select, refreshed by
//! update, cleared when that project is deleted.

use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use bigdecimal::BigDecimal;

use crate::db::{parse_decimal, parse_integer, ConnectionProvider, Database};
use crate::models::{display_opt, ProjectDetails, ProjectInput};

const OPERATIONS: &[&str] = &[
    "1) Add a project",
    "2) List projects",
    "3) Select a project",
    "4) Update project details",
    "5) Delete a project",
];

enum Flow {
    Continue,
    Exit,
}

pub struct Shell<'a, P, R, W> {
    db: &'a Database<P>,
    input: R,
    output: W,
}

impl<'a, P, R, W> Shell<'a, P, R, W>
where
    P: ConnectionProvider,
    R: BufRead,
    W: Write,
{
    pub fn new(db: &'a Database<P>, input: R, output: W) -> Self {
        Self { db, input, output }
    }

    /// Run until the user enters a blank selection or input ends.
    ///
    /// Errors from an operation are printed and the menu is shown again.
    /// Only I/O failures on the terminal itself end the loop early.
    pub fn run(&mut self) -> Result<()> {
        let mut current: Option<ProjectDetails> = None;

        loop {
            match self.process_selection(&mut current) {
                Ok(Flow::Exit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(err) if err.is::<std::io::Error>() => return Err(err),
                Err(err) => {
                    tracing::debug!(error = %err, "Menu operation failed");
                    writeln!(self.output, "\nError: {err} Try again.")?;
                }
            }
        }
    }

    fn process_selection(&mut self, current: &mut Option<ProjectDetails>) -> Result<Flow> {
        self.print_operations(current.as_ref())?;

        let selection = self.get_int_input("\nEnter a menu selection")?;
        match selection {
            None => {
                writeln!(self.output, "Exiting the menu.")?;
                return Ok(Flow::Exit);
            }
            Some(1) => self.create_project(current)?,
            Some(2) => self.list_projects()?,
            Some(3) => self.select_project(current)?,
            Some(4) => self.update_project_details(current)?,
            Some(5) => self.delete_project(current)?,
            Some(other) => {
                writeln!(self.output, "\n{other} is not a valid selection. Try again.")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn create_project(&mut self, current: &mut Option<ProjectDetails>) -> Result<()> {
        let Some(project_name) = self.get_string_input("Enter the project name")? else {
            bail!("A project name is required.");
        };
        let estimated_hours = self.get_decimal_input("Enter the estimated hours")?;
        let actual_hours = self.get_decimal_input("Enter the actual hours")?;
        let difficulty = self.get_int_input("Enter the project difficulty (1-5)")?;
        let notes = self.get_string_input("Enter the project notes")?;

        let project = self.db.create_project(&ProjectInput {
            project_name,
            estimated_hours,
            actual_hours,
            difficulty,
            notes,
        })?;
        writeln!(
            self.output,
            "You have successfully created project:\n{project}"
        )?;

        *current = Some(self.fetch_project(project.project_id)?);
        Ok(())
    }

    fn list_projects(&mut self) -> Result<()> {
        let projects = self.db.get_all_projects()?;

        writeln!(self.output, "\nProjects:")?;
        for project in &projects {
            writeln!(
                self.output,
                "   {}: {}",
                project.project_id, project.project_name
            )?;
        }
        Ok(())
    }

    fn select_project(&mut self, current: &mut Option<ProjectDetails>) -> Result<()> {
        self.list_projects()?;
        let project_id = self.require_project_id("Enter a project ID to select a project")?;

        *current = None;
        *current = Some(self.fetch_project(project_id)?);
        Ok(())
    }

    fn update_project_details(&mut self, current: &mut Option<ProjectDetails>) -> Result<()> {
        let Some(details) = current.as_ref() else {
            writeln!(self.output, "\nPlease select a project.")?;
            return Ok(());
        };
        let existing = details.project.clone();

        let project_name = self.get_string_input(&format!(
            "Enter the project name [{}]",
            existing.project_name
        ))?;
        let estimated_hours = self.get_decimal_input(&format!(
            "Enter the estimated hours [{}]",
            display_opt(&existing.estimated_hours)
        ))?;
        let actual_hours = self.get_decimal_input(&format!(
            "Enter the actual hours [{}]",
            display_opt(&existing.actual_hours)
        ))?;
        let difficulty = self.get_int_input(&format!(
            "Enter the difficulty (1-5) [{}]",
            display_opt(&existing.difficulty)
        ))?;
        let notes = self.get_string_input(&format!(
            "Enter the notes [{}]",
            display_opt(&existing.notes)
        ))?;

        // Updates overwrite every column, so blank answers keep the current value.
        let input = ProjectInput {
            project_name: project_name.unwrap_or(existing.project_name),
            estimated_hours: estimated_hours.or(existing.estimated_hours),
            actual_hours: actual_hours.or(existing.actual_hours),
            difficulty: difficulty.or(existing.difficulty),
            notes: notes.or(existing.notes),
        };

        if !self.db.update_project(existing.project_id, &input)? {
            bail!("Project with ID={} does not exist.", existing.project_id);
        }

        *current = Some(self.fetch_project(existing.project_id)?);
        Ok(())
    }

    fn delete_project(&mut self, current: &mut Option<ProjectDetails>) -> Result<()> {
        self.list_projects()?;
        let project_id = self.require_project_id("Enter a project ID to delete a project")?;

        if !self.db.delete_project(project_id)? {
            bail!("Project with ID={project_id} does not exist.");
        }
        writeln!(
            self.output,
            "Project {project_id} was successfully deleted!"
        )?;

        if current
            .as_ref()
            .is_some_and(|details| details.project.project_id == project_id)
        {
            *current = None;
        }
        Ok(())
    }

    fn fetch_project(&self, project_id: i64) -> Result<ProjectDetails> {
        match self.db.get_project(project_id)? {
            Some(details) => Ok(details),
            None => bail!("Project with ID={project_id} does not exist."),
        }
    }

    fn print_operations(&mut self, current: Option<&ProjectDetails>) -> Result<()> {
        writeln!(
            self.output,
            "\nThese are the available selections. Press the Enter key to quit:"
        )?;
        for line in OPERATIONS {
            writeln!(self.output, "   {line}")?;
        }

        match current {
            None => writeln!(self.output, "\nYou are not working with a project.")?,
            Some(details) => writeln!(self.output, "\nYou are working in project:\n{details}")?,
        }
        Ok(())
    }

    // ============================================================
    // Prompts
    // ============================================================

    fn require_project_id(&mut self, prompt: &str) -> Result<i64> {
        match self.get_string_input(prompt)? {
            Some(input) => Ok(parse_integer::<i64>(&input)?),
            None => bail!("A project ID is required."),
        }
    }

    fn get_decimal_input(&mut self, prompt: &str) -> Result<Option<BigDecimal>> {
        match self.get_string_input(prompt)? {
            Some(input) => Ok(Some(parse_decimal(&input)?)),
            None => Ok(None),
        }
    }

    fn get_int_input(&mut self, prompt: &str) -> Result<Option<i32>> {
        match self.get_string_input(prompt)? {
            Some(input) => Ok(Some(parse_integer::<i32>(&input)?)),
            None => Ok(None),
        }
    }

    /// Lowest-level prompt: `None` for a blank line or end of input.
    fn get_string_input(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;

        let line = line.trim();
        Ok((!line.is_empty()).then(|| line.to_string()))
    }
}
