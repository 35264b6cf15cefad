//! Field and schema specifications.
//!
//! A [`Schema`] is the typed description of one record kind: which fields
//! exist, what values they hold, and how the query, aggregate and CSV layers
//! should treat them.

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text
    Text,
    /// Whole number (e.g. `stock`, `duration`)
    Integer,
    /// Decimal number (e.g. `price`, `calories`)
    Number,
    /// true / false
    Bool,
    /// Calendar date stored as `YYYY-MM-DD`
    Date,
    /// Closed set of values with a meaningful order (e.g. Low / Medium / High)
    Choice(&'static [&'static str]),
}

impl FieldKind {
    pub fn describe(&self) -> String {
        match self {
            FieldKind::Text => "text".to_string(),
            FieldKind::Integer => "integer".to_string(),
            FieldKind::Number => "number".to_string(),
            FieldKind::Bool => "bool".to_string(),
            FieldKind::Date => "date (YYYY-MM-DD)".to_string(),
            FieldKind::Choice(choices) => format!("one of: {}", choices.join(", ")),
        }
    }
}

/// Specification for a single field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,

    /// Must be present (and non-empty) on every record
    pub required: bool,

    /// Looked at by free-text search
    pub searchable: bool,

    /// Offered as an exact-match filter and counted in stats
    pub filterable: bool,

    /// Summed in stats
    pub summable: bool,

    /// Raw value applied when the field is absent on create / import
    pub default: Option<&'static str>,

    /// Sample value for the CSV template
    pub example: &'static str,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            searchable: false,
            filterable: false,
            summable: false,
            default: None,
            example: "",
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub const fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub const fn summable(mut self) -> Self {
        self.summable = true;
        self
    }

    pub const fn default_value(mut self, raw: &'static str) -> Self {
        self.default = Some(raw);
        self
    }

    pub const fn example(mut self, raw: &'static str) -> Self {
        self.example = raw;
        self
    }
}

/// Sample record used to seed an empty collection: `(field, raw value)` pairs.
pub type SeedRow = &'static [(&'static str, &'static str)];

/// The typed description of one record kind.
#[derive(Debug)]
pub struct Schema {
    /// Collection name, also the storage key
    pub name: &'static str,

    /// One-line description shown by `recordz collections`
    pub about: &'static str,

    /// Field shown as the record's headline in listings
    pub title_field: &'static str,

    pub fields: &'static [FieldSpec],

    pub seed: &'static [SeedRow],
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|f| f.name)
    }

    pub fn searchable_fields(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().filter(|f| f.searchable).map(|f| f.name)
    }

    pub fn filterable_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|f| f.filterable)
    }

    pub fn summable_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|f| f.summable)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    /// First date field, used to scope "today" sums.
    pub fn date_field(&self) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.kind == FieldKind::Date)
    }
}
