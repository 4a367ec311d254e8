//! The Task Hub layout: titles, target schemas, seed rows and dashboard content.

use crate::schema::{NumberFormat, PropertyDefinition, Schema};
use crate::types::{Block, DatabaseSpec, Handle, PageSpec, PropertyValue, RowSpec};

pub const DASHBOARD_TITLE: &str = "🧭 Task Hub";
pub const PROJECTS_TITLE: &str = "📁 Projects";
pub const TASKS_TITLE: &str = "✅ Master Tasks";

/// Name of the tasks → projects relation property.
pub const PROJECT_RELATION: &str = "Project";

pub const PROJECT_AREAS: [&str; 3] = ["Work", "Personal", "Side Project"];
pub const TASK_PRIORITIES: [&str; 3] = ["High", "Medium", "Low"];

/// A sample project row.
#[derive(Debug, Clone, Copy)]
pub struct SampleProject {
    pub name: &'static str,
    pub area: &'static str,
    pub status: &'static str,
}

/// A sample task row; `project` indexes into the seeded projects.
#[derive(Debug, Clone, Copy)]
pub struct SampleTask {
    pub name: &'static str,
    pub priority: &'static str,
    pub status: &'static str,
    pub due: Option<&'static str>,
    pub project: usize,
}

pub const SAMPLE_PROJECTS: [SampleProject; 3] = [
    SampleProject {
        name: "Personal Systems",
        area: "Side Project",
        status: "In progress",
    },
    SampleProject {
        name: "Career & Learning",
        area: "Personal",
        status: "Not started",
    },
    SampleProject {
        name: "Household Ops",
        area: "Personal",
        status: "In progress",
    },
];

pub const SAMPLE_TASKS: [SampleTask; 3] = [
    SampleTask {
        name: "Set up weekly review",
        priority: "High",
        status: "In progress",
        due: None,
        project: 0,
    },
    SampleTask {
        name: "Draft Q1 goals",
        priority: "Medium",
        status: "Not started",
        due: None,
        project: 1,
    },
    SampleTask {
        name: "Clean inbox to zero",
        priority: "Low",
        status: "Not started",
        due: None,
        project: 2,
    },
];

#[must_use]
pub fn dashboard_spec() -> PageSpec {
    PageSpec::new(DASHBOARD_TITLE)
}

/// Target schema of the projects store.
#[must_use]
pub fn projects_schema() -> Schema {
    Schema::new()
        .with("Name", PropertyDefinition::Title)
        .with("Status", PropertyDefinition::Status)
        .with("Area", PropertyDefinition::select(PROJECT_AREAS))
        .with("Notes", PropertyDefinition::Text)
}

/// Target schema of the tasks store, with the relation bound to `projects`.
#[must_use]
pub fn tasks_schema(projects: &Handle) -> Schema {
    Schema::new()
        .with("Name", PropertyDefinition::Title)
        .with("Status", PropertyDefinition::Status)
        .with("Due", PropertyDefinition::Date)
        .with("Priority", PropertyDefinition::select(TASK_PRIORITIES))
        .with(PROJECT_RELATION, PropertyDefinition::relation(&projects.id))
        .with("Estimate (hrs)", PropertyDefinition::number(NumberFormat::Number))
        .with("Notes", PropertyDefinition::Text)
        .with("Source Page ID", PropertyDefinition::Text)
}

#[must_use]
pub fn projects_spec() -> DatabaseSpec {
    DatabaseSpec::new(PROJECTS_TITLE, projects_schema())
}

/// Creation spec of the tasks store. The relation target is fixed here and
/// never changed afterwards.
#[must_use]
pub fn tasks_spec(projects: &Handle) -> DatabaseSpec {
    DatabaseSpec::new(TASKS_TITLE, tasks_schema(projects))
}

#[must_use]
pub fn project_rows() -> Vec<RowSpec> {
    SAMPLE_PROJECTS
        .iter()
        .map(|p| {
            RowSpec::new()
                .with("Name", PropertyValue::Title(p.name.to_string()))
                .with("Area", PropertyValue::Select(p.area.to_string()))
                .with("Status", PropertyValue::Status(p.status.to_string()))
        })
        .collect()
}

/// Sample task rows linked to `projects` by position.
///
/// A task whose project index has no row is created without a relation.
#[must_use]
pub fn task_rows(projects: &[Handle]) -> Vec<RowSpec> {
    SAMPLE_TASKS
        .iter()
        .map(|t| {
            RowSpec::new()
                .with("Name", PropertyValue::Title(t.name.to_string()))
                .with("Priority", PropertyValue::Select(t.priority.to_string()))
                .with("Status", PropertyValue::Status(t.status.to_string()))
                .with_opt(
                    PROJECT_RELATION,
                    projects
                        .get(t.project)
                        .map(|p| PropertyValue::Relation(vec![p.id.clone()])),
                )
                .with_opt("Due", t.due.map(|d| PropertyValue::Date(d.to_string())))
        })
        .collect()
}

/// Dashboard content linking both stores.
#[must_use]
pub fn info_blocks(projects: &Handle, tasks: &Handle) -> Vec<Block> {
    vec![
        Block::Heading2("Your Databases".to_string()),
        Block::Paragraph(
            "Open the databases below and add your preferred views (Board grouped by Status, \
             Table filtered to \"Status is not Done\", etc.)."
                .to_string(),
        ),
        Block::LinkToDatabase(tasks.id.clone()),
        Block::LinkToDatabase(projects.id.clone()),
        Block::Heading3("Tips".to_string()),
        Block::BulletedListItem(
            "In Master Tasks, group a Board view by Project and filter Status != Done."
                .to_string(),
        ),
        Block::BulletedListItem(
            "Add a Table view sorted by Due asc; add a filter for next 7 days to create a \
             \"This Week\" view."
                .to_string(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_have_expected_shape() {
        assert_eq!(projects_schema().len(), 4);

        let projects = Handle::database("proj-db");
        let tasks = tasks_schema(&projects);
        assert_eq!(tasks.len(), 8);
        assert_eq!(
            tasks.get(PROJECT_RELATION),
            Some(&PropertyDefinition::relation("proj-db"))
        );
        assert_eq!(
            tasks.get("Estimate (hrs)"),
            Some(&PropertyDefinition::number(NumberFormat::Number))
        );
    }

    #[test]
    fn test_task_rows_link_by_position() {
        let projects = vec![Handle::row("p0"), Handle::row("p1"), Handle::row("p2")];
        let rows = task_rows(&projects);
        assert_eq!(rows.len(), 3);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(
                row.get(PROJECT_RELATION),
                Some(&PropertyValue::Relation(vec![format!("p{i}")]))
            );
            assert!(row.get("Due").is_none());
        }
    }

    #[test]
    fn test_task_rows_without_enough_projects() {
        let rows = task_rows(&[Handle::row("only")]);
        assert!(rows[0].get(PROJECT_RELATION).is_some());
        assert!(rows[1].get(PROJECT_RELATION).is_none());
        assert!(rows[2].get(PROJECT_RELATION).is_none());
    }

    #[test]
    fn test_info_blocks_link_both_stores() {
        let blocks = info_blocks(&Handle::database("p"), &Handle::database("t"));
        assert_eq!(blocks.len(), 7);
        assert_eq!(blocks[2], Block::LinkToDatabase("t".into()));
        assert_eq!(blocks[3], Block::LinkToDatabase("p".into()));
    }
}
