use std::path::Path;

use anyhow::Result;
use brancher_app::App;
use brancher_core::doctor::DoctorReport;
use brancher_tui::{BranchLoader, UiExit};
use comfy_table::{Cell, ContentArrangement, Table};

use crate::cli::{Cli, Command};

pub fn run_with_deps(
    cli: Cli,
    app: &App<'_>,
    loader: &dyn BranchLoader,
    cwd: &Path,
) -> Result<()> {
    match cli.command {
        Some(Command::Doctor) => run_doctor_command(app, cwd),
        None => run_root_command(app, loader, cwd),
    }
}

fn run_root_command(app: &App<'_>, loader: &dyn BranchLoader, cwd: &Path) -> Result<()> {
    let categories = app.load_categories()?;
    tracing::debug!(count = categories.len(), "category registry ready");

    match brancher_tui::run(app, loader, cwd, categories)? {
        UiExit::Created(name) => println!("Created and switched to branch: {name}"),
        UiExit::Canceled => tracing::info!("selection canceled by user"),
    }

    Ok(())
}

fn run_doctor_command(app: &App<'_>, cwd: &Path) -> Result<()> {
    let report = app.doctor(cwd);
    print_doctor_report(&report);
    Ok(())
}

fn print_doctor_report(report: &DoctorReport) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Check", "Status", "Details"]);

    for check in &report.checks {
        table.add_row(vec![
            Cell::new(check.name.as_str()),
            Cell::new(check.state),
            Cell::new(check.details.as_str()),
        ]);
    }

    println!("{table}");
    println!("{}", report.summary());
}
