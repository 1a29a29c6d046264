// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Report renderings: JSON, Markdown and console text.

use super::{types_by_count, Report};
use crate::commit::CommitMessage;
use crate::config::{CommitType, OutputFormat};
use crate::error::{LensError, Result};
use console::style;
use handlebars::Handlebars;
use serde::Serialize;

const MARKDOWN_TEMPLATE: &str = r#"# Change analysis: {{range}}

{{#if suggested}}
## Suggested commit

```
{{suggested}}
```

{{/if}}
{{#unless complete}}
> Analysis was cancelled after: {{stages}}

{{/unless}}
## Summary

- Files analyzed: {{filesAnalyzed}}
- Primary type: `{{primaryType}}`
- Breaking changes: {{#if breaking}}yes{{else}}no{{/if}}
{{#each summary}}
- `{{this.type}}`: {{this.count}}
{{/each}}
{{#if changes}}

## Changes

| File | Type | Score | Breaking | Description |
|------|------|-------|----------|-------------|
{{#each changes}}
| `{{this.path}}` | {{this.type}}{{#if this.scope}}({{this.scope}}){{/if}} | {{this.score}} | {{#if this.breaking}}yes{{/if}} | {{this.description}} |
{{/each}}
{{/if}}
{{#if warnings}}

## Warnings

{{#each warnings}}
- **{{this.level}}** `{{this.path}}` ({{this.stage}}, {{this.kind}}): {{this.message}}
{{/each}}
{{/if}}
"#;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkdownView {
    range: String,
    suggested: Option<String>,
    complete: bool,
    stages: String,
    files_analyzed: usize,
    primary_type: CommitType,
    breaking: bool,
    summary: Vec<TypeCount>,
    changes: Vec<ChangeRow>,
    warnings: Vec<WarningRow>,
}

#[derive(Serialize)]
struct TypeCount {
    #[serde(rename = "type")]
    commit_type: CommitType,
    count: usize,
}

#[derive(Serialize)]
struct ChangeRow {
    path: String,
    #[serde(rename = "type")]
    commit_type: CommitType,
    scope: Option<String>,
    score: String,
    breaking: bool,
    description: String,
}

#[derive(Serialize)]
struct WarningRow {
    level: String,
    path: String,
    stage: String,
    kind: String,
    message: String,
}

/// Render a report in the requested format.
pub fn render(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(report),
        OutputFormat::Markdown => render_markdown(report),
        OutputFormat::Text => Ok(render_text(report)),
    }
}

/// Pretty-printed JSON of the whole report.
pub fn render_json(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| LensError::Render(e.to_string()))
}

/// Markdown summary with change table and warnings section.
pub fn render_markdown(report: &Report) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(false);
    handlebars
        .register_template_string("report", MARKDOWN_TEMPLATE)
        .map_err(|e| LensError::Render(e.to_string()))?;

    handlebars
        .render("report", &markdown_view(report))
        .map_err(|e| LensError::Render(e.to_string()))
}

fn markdown_view(report: &Report) -> MarkdownView {
    MarkdownView {
        range: range(report),
        suggested: report.commit_message(),
        complete: report.complete,
        stages: report
            .stages_completed
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        files_analyzed: report.files_analyzed.len(),
        primary_type: report.primary_type,
        breaking: report.has_breaking_changes,
        summary: types_by_count(report)
            .into_iter()
            .map(|(commit_type, count)| TypeCount { commit_type, count })
            .collect(),
        changes: report
            .files_analyzed
            .iter()
            .map(|c| ChangeRow {
                path: table_cell(c.path()),
                commit_type: c.classified.commit_type,
                scope: c.classified.commit_scope.clone(),
                score: format!("{:.2}", c.score),
                breaking: c.classified.breaking,
                description: table_cell(&c.classified.description),
            })
            .collect(),
        warnings: report
            .warnings
            .iter()
            .map(|w| WarningRow {
                level: w.level().to_string(),
                path: w.path.clone(),
                stage: w.stage.to_string(),
                kind: w.kind.to_string(),
                message: w.message.clone(),
            })
            .collect(),
    }
}

/// Pipes would end a Markdown table cell early.
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn range(report: &Report) -> String {
    let base = if report.base.is_empty() { "(empty tree)" } else { &report.base };
    let head = if report.head.is_empty() { "(working tree)" } else { &report.head };
    format!("{}..{}", base, head)
}

/// Console rendering with type colors.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();

    out.push_str(&format!("{} {}\n", style("Analyzing").bold(), style(range(report)).dim()));

    if !report.complete {
        let stages: Vec<String> = report.stages_completed.iter().map(|s| s.to_string()).collect();
        out.push_str(&format!(
            "{} cancelled after: {}\n",
            style("!").yellow().bold(),
            if stages.is_empty() { "nothing".to_string() } else { stages.join(", ") }
        ));
        return out;
    }

    out.push_str(&format!(
        "\n{} files analyzed, primary type {}\n",
        report.files_analyzed.len(),
        type_style(report.primary_type, report.primary_type.as_str())
    ));
    for (commit_type, count) in types_by_count(report) {
        out.push_str(&format!("  {:<10} {}\n", type_style(commit_type, commit_type.as_str()), count));
    }

    if !report.files_analyzed.is_empty() {
        out.push_str(&format!("\n{}\n", style("Changes").bold().underlined()));
        for change in &report.files_analyzed {
            let c = &change.classified;
            out.push_str(&format!(
                "  {:>5.2}  {:<10} {}{}\n          {}\n",
                change.score,
                type_style(c.commit_type, c.commit_type.as_str()),
                change.path(),
                if c.breaking { format!(" {}", style("BREAKING").red().bold()) } else { String::new() },
                style(&c.description).dim()
            ));
        }
    }

    if !report.warnings.is_empty() {
        out.push_str(&format!("\n{}\n", style("Warnings").yellow().bold()));
        for warning in &report.warnings {
            out.push_str(&format!("  {} {}\n", style("⚠").yellow(), warning));
        }
    }

    if let Some(commit) = &report.suggested_commit {
        out.push_str(&format!("\n{}\n", style("Suggested commit").bold().underlined()));
        out.push_str(&format!("  {}\n", format_header(commit)));
        for line in commit
            .body
            .iter()
            .chain(commit.footer.iter())
            .flat_map(|part| std::iter::once("").chain(part.lines()))
        {
            out.push_str(&format!("  {}\n", line));
        }
    }

    out
}

fn type_style(commit_type: CommitType, text: &str) -> console::StyledObject<String> {
    let styled = style(text.to_string());
    match commit_type {
        CommitType::Feat => styled.green().bold(),
        CommitType::Fix => styled.red().bold(),
        CommitType::Docs => styled.blue().bold(),
        CommitType::Refactor => styled.yellow().bold(),
        CommitType::Test => styled.white().bold(),
        CommitType::Chore => styled.dim(),
    }
}

fn format_header(commit: &CommitMessage) -> String {
    let mut header = type_style(commit.commit_type, commit.commit_type.as_str()).to_string();
    if let Some(scope) = &commit.scope {
        header.push_str(&format!("({})", style(scope).cyan()));
    }
    if commit.breaking {
        header.push_str(&style("!").red().bold().to_string());
    }
    header.push_str(": ");
    header.push_str(&commit.subject);
    header
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Stage;
    use crate::report::tests::scored;
    use crate::report::{ReportOptions, Reporter};

    fn empty_report() -> Report {
        Reporter::new().generate_report(
            vec![],
            &ReportOptions {
                base: "main".to_string(),
                head: String::new(),
                max_body_items: 5,
            },
        )
    }

    #[test]
    fn test_render_json() {
        let json = render(&empty_report(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["primaryType"], "chore");
        assert_eq!(value["filesAnalyzed"], serde_json::json!([]));
        assert_eq!(value["suggestedCommit"]["subject"], "no changes");
    }

    #[test]
    fn test_render_markdown() {
        let markdown = render_markdown(&empty_report()).unwrap();
        assert!(markdown.starts_with("# Change analysis: main..(working tree)"));
        assert!(markdown.contains("chore: no changes"));
        assert!(markdown.contains("- Primary type: `chore`"));
        assert!(!markdown.contains("## Warnings"));
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        let change = scored("docs/a|b.md", CommitType::Docs, 1.0, "update a|b.md");
        let report = Reporter::new().generate_report(vec![change], &ReportOptions::default());
        let markdown = render_markdown(&report).unwrap();
        assert!(markdown.contains("| `docs/a\\|b.md` | docs |"), "{}", markdown);
        assert!(markdown.contains("| update a\\|b.md |"));
        assert!(markdown.contains("- Files analyzed: 1"));
    }

    #[test]
    fn test_render_markdown_partial() {
        let report = Report::partial("main", "HEAD", vec![Stage::Detect]);
        let markdown = render_markdown(&report).unwrap();
        assert!(markdown.contains("> Analysis was cancelled after: detect"));
        assert!(!markdown.contains("## Suggested commit"));
    }

    #[test]
    fn test_render_text() {
        console::set_colors_enabled(false);
        let text = render_text(&empty_report());
        assert!(text.contains("0 files analyzed, primary type chore"));
        assert!(text.contains("chore: no changes"));

        let partial = render_text(&Report::partial("", "", vec![]));
        assert!(partial.contains("cancelled after: nothing"));
    }
}
