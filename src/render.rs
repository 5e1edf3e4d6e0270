//! Terminal rendering of the list and detail screens.

use crate::actors::{DashboardView, DetailView, SectionStatus};
use crate::types::{Issue, RepositoryDetail, RepositoryRef};
use colored::*;

pub fn repository_entry(repository: &RepositoryRef) -> String {
    let mut out = format!(
        "{}  {}\n",
        repository.full_name.bold(),
        repository.route().dimmed()
    );
    if !repository.description.is_empty() {
        out.push_str(&format!("    {}\n", repository.description));
    }
    out.push_str(&format!(
        "    {} {}\n",
        repository.owner.login.cyan(),
        repository.owner.avatar_url.dimmed()
    ));
    out
}

pub fn dashboard(view: &DashboardView) -> String {
    let mut out = String::new();
    if let Some(error) = &view.error {
        out.push_str(&format!("{}\n\n", error.red()));
    }
    if let Some(diagnostic) = &view.diagnostic {
        out.push_str(&format!("{}\n\n", diagnostic.yellow()));
    }
    if view.repositories.is_empty() {
        out.push_str(&format!("{}\n", "No repositories yet".dimmed()));
    }
    for repository in &view.repositories {
        out.push_str(&repository_entry(repository));
    }
    out
}

pub fn repository_header(detail: &RepositoryDetail) -> String {
    let repository = &detail.repository;
    let mut out = format!("{}\n", repository.full_name.bold().green());
    if !repository.description.is_empty() {
        out.push_str(&format!("{}\n", repository.description));
    }
    out.push_str(&format!(
        "{} {}\n\n",
        repository.owner.login.cyan(),
        repository.owner.avatar_url.dimmed()
    ));
    out.push_str(&format!(
        "  {} Stars   {} Forks   {} Open issues\n",
        detail.stargazers_count.to_string().bold(),
        detail.forks_count.to_string().bold(),
        detail.open_issues_count.to_string().bold()
    ));
    out
}

pub fn issues(issues: &[Issue]) -> String {
    if issues.is_empty() {
        return format!("{}\n", "No open issues".dimmed());
    }

    issues
        .iter()
        .map(|issue| {
            format!(
                "{}\n    {}  {}\n",
                issue.title.bold(),
                issue.user.login.cyan(),
                issue.html_url.dimmed()
            )
        })
        .collect()
}

/// Sections of `view` that became visible since `previous`.
pub fn detail_changes(previous: &DetailView, view: &DetailView) -> String {
    let mut out = String::new();
    if view.repository_status != previous.repository_status {
        match (&view.repository, view.repository_status) {
            (Some(detail), SectionStatus::Loaded) => {
                out.push_str(&repository_header(detail));
                out.push('\n');
            }
            (_, SectionStatus::Failed) => {
                out.push_str(&format!("{}\n\n", "Repository details unavailable".dimmed()))
            }
            _ => {}
        }
    }
    if view.issues_status != previous.issues_status {
        match view.issues_status {
            SectionStatus::Loaded => out.push_str(&issues(&view.issues)),
            SectionStatus::Failed => out.push_str(&format!("{}\n", "Issues unavailable".dimmed())),
            _ => {}
        }
    }
    out
}
