use colored::Colorize;
use tabled::builder::Builder;
use tabled::settings::Style;
use taskhub_core::reconcile::{Provisioned, SeedOutcome};
use taskhub_core::{BootstrapReport, PlanReport, ResourcePlan, SchemaDiff};

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

fn print_step(label: &str, detail: &str) {
    println!("  {:<10} {}", label.cyan(), detail);
}

fn provisioned(title: &str, p: &Provisioned) -> String {
    format!("{title} {} ({})", p.outcome, p.handle.id)
}

fn schema(diff: &SchemaDiff) -> String {
    if diff.is_empty() {
        "up to date".to_string()
    } else {
        let names: Vec<&str> = diff.names().collect();
        format!("updated {}", names.join(", "))
    }
}

fn seed(outcome: Option<&SeedOutcome>) -> String {
    match outcome {
        Some(SeedOutcome::Created(rows)) => format!("seeded {} rows", rows.len()),
        Some(SeedOutcome::Existing(_)) => "already has rows".to_string(),
        None => "skipped (no project rows to link)".to_string(),
    }
}

pub fn print_bootstrap_report(report: &BootstrapReport) {
    use taskhub_core::blueprint::{DASHBOARD_TITLE, PROJECTS_TITLE, TASKS_TITLE};

    print_step("Dashboard", &provisioned(DASHBOARD_TITLE, &report.dashboard));
    print_step("Projects", &provisioned(PROJECTS_TITLE, &report.projects));
    print_step("", &format!("schema {}", schema(&report.projects_schema)));
    print_step("", &seed(Some(&report.projects_seed)));
    print_step("Tasks", &provisioned(TASKS_TITLE, &report.tasks));
    print_step("", &format!("schema {}", schema(&report.tasks_schema)));
    print_step("", &seed(report.tasks_seed.as_ref()));
    print_step(
        "Links",
        if report.links_appended {
            "appended to dashboard"
        } else {
            "skipped"
        },
    );
}

fn plan_row(plan: &ResourcePlan) -> [String; 5] {
    let changes = if plan.schema.is_empty() {
        "-".to_string()
    } else {
        plan.schema.names().collect::<Vec<_>>().join(", ")
    };
    let rows = plan.rows.map_or_else(|| "-".to_string(), |n| n.to_string());
    let seed = if plan.will_seed { "yes" } else { "no" };
    [
        plan.title.to_string(),
        plan.action.to_string(),
        changes,
        rows,
        seed.to_string(),
    ]
}

pub fn plan_table(report: &PlanReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Resource", "Action", "Schema changes", "Rows", "Seed"]);
    for plan in report.resources() {
        builder.push_record(plan_row(plan));
    }
    builder.build().with(Style::rounded()).to_string()
}

pub fn print_plan(report: &PlanReport) {
    println!("{}", plan_table(report));
    if report.appends_links {
        println!("Dashboard links and tips would be appended (again).");
    }
    if report.is_converged() {
        print_success("Task Hub is up to date");
    }
}
