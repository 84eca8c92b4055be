use colored::Colorize;
use medview_core::{DisplayField, FieldGroup, Profile, ViewState};
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

pub fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Everything currently on screen, as text. Pure: reads only `state`.
pub fn render(state: &ViewState) -> String {
    let mut out = Vec::new();

    if state.is_loading() {
        out.push("Loading...".dimmed().to_string());
    }

    if let Some(status) = state.status() {
        let line = if status.success {
            format!("{} {}", "✓".green(), status.text.green())
        } else {
            format!("{} {}", "✗".red(), status.text.red())
        };
        out.push(line);
    }

    if let Some(error) = state.error() {
        out.push(error.user_message());
    }

    if let Some(content) = state.content() {
        match &content.normalized.profile {
            Profile::Groups(groups) => {
                for group in groups {
                    out.push(render_group(group));
                }
            }
            Profile::RawDump(fields) => {
                out.push(format!(
                    "{} {}",
                    "Raw Record".cyan().bold(),
                    "(no known profile fields)".dimmed()
                ));
                out.push(render_fields(["Field", "Value"], fields));
            }
            Profile::NoData => {
                out.push(format!("{} {}", "⚠".yellow(), "No patient data found".red()));
            }
        }
        let discarded = content.normalized.discarded_records;
        if discarded > 0 {
            out.push(
                format!("{discarded} more record(s) in the response were not shown")
                    .yellow()
                    .to_string(),
            );
        }
    }

    out.join("\n")
}

fn render_group(group: &FieldGroup) -> String {
    format!(
        "{}\n{}",
        group.title.cyan().bold(),
        render_fields(["Field", "Value"], &group.fields)
    )
}

fn render_fields(header: [&str; 2], fields: &[DisplayField]) -> String {
    let mut builder = Builder::default();
    builder.push_record(header);
    for field in fields {
        builder.push_record([field.label.as_str(), field.value.as_str()]);
    }
    builder.build().with(Style::rounded()).to_string()
}
