use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{PackageLicense, ProjectAttribution};

/// Number of extra/missing words shown per license file in verbose mode.
const SHOWN_WORDS: usize = 5;

/// Render a colored terminal report.
///
/// `details`, when present, adds a per-file table with the matched template
/// and the words that differ from it.
pub fn render(
    attributions: &[ProjectAttribution],
    errors: &[ProjectAttribution],
    details: Option<&[PackageLicense<'_>]>,
    quiet: bool,
) -> Result<()> {
    let license_count: usize = attributions.iter().map(|a| a.licenses.len()).sum();

    if quiet {
        println!(
            "Projects: {}  Licenses: {}  Attention: {}",
            attributions.len().to_string().green(),
            license_count,
            errors.len().to_string().red(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}\n",
        "license-bom".bold(),
        env!("CARGO_PKG_VERSION")
    );

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(
        " │  {:<48} │",
        format!("Projects attributed : {}", attributions.len())
    );
    println!(
        " │  {:<48} │",
        format!("Licenses detected   : {}", license_count)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Need attention   : {:>4}", "✗".red(), errors.len())
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if !attributions.is_empty() {
        println!(" {} Attributed projects:\n", "[OK]".green().bold());
        render_attributions(attributions);
        println!();
    }

    if !errors.is_empty() {
        println!(" {} Projects requiring attention:\n", "[ERROR]".red().bold());
        render_errors(errors);
        println!();
    }

    if let Some(details) = details {
        println!(" {} License file matches:\n", "[DETAIL]".cyan().bold());
        render_details(details);
        println!();
    }

    Ok(())
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|n| Cell::new(n).add_attribute(Attribute::Bold))
        .collect()
}

fn new_table(columns: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(columns));
    table
}

fn confidence_color(confidence: f64) -> Color {
    if confidence >= 0.9 {
        Color::Green
    } else if confidence >= 0.75 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn render_attributions(attributions: &[ProjectAttribution]) {
    let mut table = new_table(&["Project", "License", "Confidence"]);
    for attribution in attributions {
        for (i, license) in attribution.licenses.iter().enumerate() {
            let project = if i == 0 { attribution.project.as_str() } else { "" };
            table.add_row(vec![
                Cell::new(project),
                Cell::new(&license.name),
                Cell::new(format!("{:.1}%", license.confidence * 100.0))
                    .fg(confidence_color(license.confidence))
                    .set_alignment(CellAlignment::Right),
            ]);
        }
    }
    println!("{}", table);
}

fn render_errors(errors: &[ProjectAttribution]) {
    let mut table = new_table(&["Project", "Error"]);
    for entry in errors {
        table.add_row(vec![
            Cell::new(&entry.project),
            Cell::new(entry.error.as_deref().unwrap_or("")).fg(Color::Red),
        ]);
    }
    println!("{}", table);
}

fn render_details(details: &[PackageLicense<'_>]) {
    let mut table = new_table(&["Package", "File", "Template", "Score", "Extra", "Missing"]);
    for license in details {
        for info in &license.infos {
            let file = info
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string());
            let template = match info.result.template {
                Some(t) if !t.nickname.is_empty() => format!("{} ({})", t.title, t.nickname),
                Some(t) => t.title.clone(),
                None => "-".to_string(),
            };
            table.add_row(vec![
                Cell::new(&license.package),
                Cell::new(file),
                Cell::new(template),
                Cell::new(format!("{:.3}", info.result.score)).set_alignment(CellAlignment::Right),
                Cell::new(preview(&info.result.extra_words)),
                Cell::new(preview(&info.result.missing_words)),
            ]);
        }
    }
    println!("{}", table);
}

/// `N: first words …` summary of a diagnostic word list.
fn preview(words: &[String]) -> String {
    if words.is_empty() {
        return String::new();
    }
    let shown: Vec<&str> = words.iter().take(SHOWN_WORDS).map(String::as_str).collect();
    let ellipsis = if words.len() > SHOWN_WORDS { " …" } else { "" };
    format!("{}: {}{}", words.len(), shown.join(" "), ellipsis)
}
