//! Built-in collections.
//!
//! Each schema mirrors one of the record-keeping apps recordz grew out of:
//! a task board, a food log, invoices, a product inventory and lesson plans.

use crate::error::{RecordzError, Result};
use crate::schema::{FieldKind, FieldSpec, Schema};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

const TASK_STATUS: &[&str] = &["To Do", "In Progress", "Done"];
const PRIORITY: &[&str] = &["Low", "Medium", "High"];
const MEALS: &[&str] = &["Breakfast", "Lunch", "Dinner", "Snack"];
const INVOICE_STATUS: &[&str] = &["Draft", "Sent", "Paid", "Overdue"];

pub static TASKS: Schema = Schema {
    name: "tasks",
    about: "Task board with status, priority and due dates",
    title_field: "title",
    fields: &[
        FieldSpec::new("title", FieldKind::Text)
            .required()
            .searchable()
            .example("Write quarterly report"),
        FieldSpec::new("description", FieldKind::Text)
            .searchable()
            .example("Summarize Q3 numbers for the team"),
        FieldSpec::new("status", FieldKind::Choice(TASK_STATUS))
            .filterable()
            .default_value("To Do")
            .example("In Progress"),
        FieldSpec::new("priority", FieldKind::Choice(PRIORITY))
            .filterable()
            .default_value("Medium")
            .example("High"),
        FieldSpec::new("category", FieldKind::Text)
            .filterable()
            .searchable()
            .example("Work"),
        FieldSpec::new("due_date", FieldKind::Date).example("2026-11-01"),
    ],
    seed: &[
        &[
            ("title", "Set up project board"),
            ("description", "Create columns and invite the team"),
            ("status", "Done"),
            ("priority", "High"),
            ("category", "Work"),
        ],
        &[
            ("title", "Plan weekly groceries"),
            ("status", "To Do"),
            ("priority", "Low"),
            ("category", "Personal"),
        ],
        &[
            ("title", "Review pull requests"),
            ("description", "Two open reviews from yesterday"),
            ("status", "In Progress"),
            ("priority", "Medium"),
            ("category", "Work"),
        ],
    ],
};

pub static FOOD: Schema = Schema {
    name: "food",
    about: "Food log with calories and macros per meal",
    title_field: "name",
    fields: &[
        FieldSpec::new("name", FieldKind::Text)
            .required()
            .searchable()
            .example("Oatmeal with berries"),
        FieldSpec::new("calories", FieldKind::Number)
            .required()
            .summable()
            .example("320"),
        FieldSpec::new("protein", FieldKind::Number)
            .summable()
            .default_value("0")
            .example("11"),
        FieldSpec::new("carbs", FieldKind::Number)
            .summable()
            .default_value("0")
            .example("54"),
        FieldSpec::new("fat", FieldKind::Number)
            .summable()
            .default_value("0")
            .example("6.5"),
        FieldSpec::new("meal", FieldKind::Choice(MEALS))
            .filterable()
            .default_value("Snack")
            .example("Breakfast"),
        FieldSpec::new("date", FieldKind::Date)
            .required()
            .example("2026-10-16"),
    ],
    seed: &[
        &[
            ("name", "Greek yogurt"),
            ("calories", "150"),
            ("protein", "15"),
            ("carbs", "8"),
            ("fat", "4"),
            ("meal", "Breakfast"),
            ("date", "2026-01-05"),
        ],
        &[
            ("name", "Chicken salad"),
            ("calories", "420"),
            ("protein", "35"),
            ("carbs", "12"),
            ("fat", "24"),
            ("meal", "Lunch"),
            ("date", "2026-01-05"),
        ],
    ],
};

pub static INVOICES: Schema = Schema {
    name: "invoices",
    about: "Invoices with client, amount and payment status",
    title_field: "number",
    fields: &[
        FieldSpec::new("number", FieldKind::Text)
            .required()
            .searchable()
            .example("INV-0042"),
        FieldSpec::new("client", FieldKind::Text)
            .required()
            .searchable()
            .filterable()
            .example("Acme Corp"),
        FieldSpec::new("amount", FieldKind::Number)
            .required()
            .summable()
            .example("1250.00"),
        FieldSpec::new("status", FieldKind::Choice(INVOICE_STATUS))
            .filterable()
            .default_value("Draft")
            .example("Sent"),
        FieldSpec::new("issue_date", FieldKind::Date).example("2026-10-01"),
        FieldSpec::new("due_date", FieldKind::Date).example("2026-10-31"),
        FieldSpec::new("notes", FieldKind::Text)
            .searchable()
            .example("Net 30"),
    ],
    seed: &[
        &[
            ("number", "INV-0001"),
            ("client", "Acme Corp"),
            ("amount", "1200"),
            ("status", "Paid"),
            ("issue_date", "2026-01-02"),
            ("due_date", "2026-02-01"),
        ],
        &[
            ("number", "INV-0002"),
            ("client", "Globex"),
            ("amount", "860.50"),
            ("status", "Sent"),
            ("issue_date", "2026-01-10"),
            ("due_date", "2026-02-09"),
        ],
    ],
};

pub static PRODUCTS: Schema = Schema {
    name: "products",
    about: "Product inventory with price and stock",
    title_field: "name",
    fields: &[
        FieldSpec::new("name", FieldKind::Text)
            .required()
            .searchable()
            .example("Desk lamp"),
        FieldSpec::new("sku", FieldKind::Text)
            .searchable()
            .example("LMP-100"),
        FieldSpec::new("category", FieldKind::Text)
            .filterable()
            .searchable()
            .example("Lighting"),
        FieldSpec::new("price", FieldKind::Number)
            .required()
            .example("39.90"),
        FieldSpec::new("stock", FieldKind::Integer)
            .summable()
            .default_value("0")
            .example("25"),
        FieldSpec::new("active", FieldKind::Bool)
            .filterable()
            .default_value("true")
            .example("true"),
    ],
    seed: &[
        &[
            ("name", "Notebook"),
            ("sku", "NB-001"),
            ("category", "Stationery"),
            ("price", "4.50"),
            ("stock", "120"),
        ],
        &[
            ("name", "Fountain pen"),
            ("sku", "FP-010"),
            ("category", "Stationery"),
            ("price", "24"),
            ("stock", "15"),
        ],
    ],
};

pub static LESSONS: Schema = Schema {
    name: "lessons",
    about: "Lesson plans by subject, grade and date",
    title_field: "title",
    fields: &[
        FieldSpec::new("title", FieldKind::Text)
            .required()
            .searchable()
            .example("Introduction to fractions"),
        FieldSpec::new("subject", FieldKind::Text)
            .required()
            .filterable()
            .searchable()
            .example("Math"),
        FieldSpec::new("grade", FieldKind::Text)
            .filterable()
            .example("4"),
        FieldSpec::new("date", FieldKind::Date).example("2026-10-20"),
        FieldSpec::new("duration", FieldKind::Integer)
            .summable()
            .default_value("45")
            .example("45"),
        FieldSpec::new("objectives", FieldKind::Text)
            .searchable()
            .example("Compare fractions with like denominators"),
    ],
    seed: &[&[
        ("title", "Warm-up games"),
        ("subject", "PE"),
        ("grade", "3"),
        ("date", "2026-01-07"),
        ("duration", "30"),
        ("objectives", "Coordination and teamwork"),
    ]],
};

static REGISTRY: Lazy<BTreeMap<&'static str, &'static Schema>> = Lazy::new(|| {
    [&TASKS, &FOOD, &INVOICES, &PRODUCTS, &LESSONS]
        .into_iter()
        .map(|schema| (schema.name, schema))
        .collect()
});

/// All built-in schemas, ordered by name.
pub fn all() -> impl Iterator<Item = &'static Schema> {
    REGISTRY.values().copied()
}

pub fn lookup(name: &str) -> Result<&'static Schema> {
    REGISTRY
        .get(name.trim().to_lowercase().as_str())
        .copied()
        .ok_or_else(|| RecordzError::UnknownCollection(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup("Tasks").unwrap().name, "tasks");
        assert!(matches!(
            lookup("recipes"),
            Err(RecordzError::UnknownCollection(_))
        ));
    }

    #[test]
    fn title_fields_exist() {
        for schema in all() {
            assert!(schema.field(schema.title_field).is_some(), "{}", schema.name);
        }
    }
}
