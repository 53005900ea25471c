use crate::iban::normalize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Column order of the book file; matches the field order of `IbanRecord`.
pub const CSV_HEADERS: [&str; 7] = [
    "id",
    "iban",
    "name",
    "description",
    "category",
    "created_at",
    "updated_at",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Category {
    #[default]
    Personal,
    Business,
    Family,
    Savings,
    Investment,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Personal,
        Category::Business,
        Category::Family,
        Category::Savings,
        Category::Investment,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Personal => "Personal",
            Category::Business => "Business",
            Category::Family => "Family",
            Category::Savings => "Savings",
            Category::Investment => "Investment",
            Category::Other => "Other",
        }
    }

    /// Case-insensitive; blank text is the default category, anything else unknown is `Other`.
    pub fn parse(value: &str) -> Category {
        let value = value.trim();
        if value.is_empty() {
            return Category::default();
        }
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value))
            .unwrap_or(Category::Other)
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::parse(&value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IbanRecord {
    pub id: Uuid,
    pub iban: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IbanRecord {
    pub fn new(iban: &str, name: &str, description: &str, category: Category) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            iban: normalize(iban),
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            category,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn was_updated(&self) -> bool {
        self.updated_at != self.created_at
    }
}
