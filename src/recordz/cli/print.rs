use chrono::{DateTime, Utc};
use super::styles::Palette;
use colored::Colorize;
use recordz::aggregate::Summary;
use recordz::api::{CmdMessage, CollectionInfo, MessageLevel};
use recordz::commands::headline;
use recordz::model::Record;
use recordz::schema::Schema;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const ID_WIDTH: usize = 18;
const BAR_WIDTH: usize = 20;
const BADGE_SEPARATOR: &str = " · ";

pub(super) fn print_messages(palette: &Palette, messages: &[CmdMessage]) {
    for message in messages {
        let content = message.content.as_str();
        match message.level {
            MessageLevel::Info => println!("{}", palette.muted(content)),
            MessageLevel::Success => println!("{}", palette.success(content)),
            MessageLevel::Warning => println!("{}", palette.warning(content)),
            MessageLevel::Error => println!("{}", palette.error(content)),
        }
    }
}

/// One line per record: id, headline, filterable values, age.
pub(super) fn print_records(palette: &Palette, schema: &Schema, records: &[Record]) {
    if records.is_empty() {
        println!("No records found.");
        return;
    }

    for record in records {
        let id_str = format!("{:<width$}", record.id.to_string(), width = ID_WIDTH);

        let badges = schema
            .filterable_fields()
            .filter_map(|spec| record.get(spec.name))
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(BADGE_SEPARATOR);
        let badges = if badges.is_empty() {
            badges
        } else {
            format!("{} ", badges)
        };

        let fixed_width = ID_WIDTH + TIME_WIDTH + badges.width();
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let title_display = truncate_to_width(&headline(schema, record), available);
        let padding = available.saturating_sub(title_display.width());

        println!(
            "{}{}{}{}{}",
            palette.id(&id_str),
            title_display,
            " ".repeat(padding),
            palette.badge(&badges),
            palette.muted(&format_time_ago(record.created_at))
        );
    }
}

/// Every field of each record.
pub(super) fn print_full_records(palette: &Palette, schema: &Schema, records: &[Record]) {
    let label_width = schema
        .field_names()
        .chain(["created", "updated"])
        .map(|name| name.width())
        .max()
        .unwrap_or(0);

    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        println!(
            "{} {}",
            palette.id(record.id.as_str()),
            headline(schema, record).bold()
        );
        println!("--------------------------------");
        for name in schema.field_names() {
            let value = record.display(name);
            if value.is_empty() {
                continue;
            }
            println!("{:<width$}  {}", palette.muted(name), value, width = label_width);
        }
        println!(
            "{:<width$}  {}",
            palette.muted("created"),
            record.created_at.format("%Y-%m-%d %H:%M"),
            width = label_width
        );
        if record.updated_at != record.created_at {
            println!(
                "{:<width$}  {}",
                palette.muted("updated"),
                record.updated_at.format("%Y-%m-%d %H:%M"),
                width = label_width
            );
        }
    }
}

pub(super) fn print_summary(palette: &Palette, summary: &Summary) {
    println!(
        "{} {}",
        summary.collection.bold(),
        palette.muted(&format!("({} records)", summary.total))
    );

    for counts in &summary.counts {
        if counts.entries.is_empty() {
            continue;
        }
        println!("\n{}", counts.field.bold());
        let width = counts
            .entries
            .iter()
            .map(|(category, _)| category.width())
            .max()
            .unwrap_or(0);
        for (category, n) in &counts.entries {
            println!("  {:<width$}  {}", category, n, width = width);
        }
    }

    if !summary.sums.is_empty() {
        match &summary.scope {
            Some(scope) => println!(
                "\n{} {}",
                "totals".bold(),
                palette.muted(&format!("({})", scope.date))
            ),
            None => println!("\n{}", "totals".bold()),
        }
        let width = summary
            .sums
            .iter()
            .map(|s| s.field.width())
            .max()
            .unwrap_or(0);
        for sum in &summary.sums {
            println!(
                "  {:<width$}  {}",
                sum.field,
                format_number(sum.total),
                width = width
            );
        }
    }

    for goal in &summary.goals {
        println!(
            "\n{} {} / {}",
            format!("{} goal", goal.field).bold(),
            format_number(goal.consumed),
            format_number(goal.goal)
        );
        println!("  {} {}%", progress_bar(palette, goal.percent), goal.percent);
    }
}

pub(super) fn print_collections(palette: &Palette, collections: &[CollectionInfo]) {
    let width = collections
        .iter()
        .map(|c| c.name.width())
        .max()
        .unwrap_or(0);
    for c in collections {
        let marker = if c.active { "*" } else { " " };
        let count = if c.stored {
            format!("{:>4} records", c.records)
        } else {
            format!("{:>4} samples", c.records)
        };
        println!(
            "{} {:<width$}  {}  {}",
            palette.success(marker),
            c.name,
            palette.muted(&count),
            c.about,
            width = width
        );
    }
}

fn progress_bar(palette: &Palette, percent: u32) -> String {
    let filled = (percent.min(100) as usize * BAR_WIDTH) / 100;
    format!(
        "[{}{}]",
        palette.bar(&"#".repeat(filled)),
        palette.muted(&"-".repeat(BAR_WIDTH - filled))
    )
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{:.2}", n)
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let c = if c == '\n' { ' ' } else { c };
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(timestamp);

    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
