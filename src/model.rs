use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Unique, case-sensitive key
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub method: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ingredient {
    pub description: String,
    /// Free-form amount, usually numeric
    #[serde(default)]
    pub quantity: String,
}

impl Ingredient {
    /// Render the ingredient for `persons` servings.
    ///
    /// A quantity that does not parse as a number is shown as written.
    pub fn scaled(&self, persons: u32) -> String {
        let quantity = self.quantity.trim();
        let amount = match quantity.parse::<f64>() {
            Ok(value) => (value * f64::from(persons)).to_string(),
            Err(_) => quantity.to_string(),
        };

        if amount.is_empty() {
            self.description.clone()
        } else {
            format!("{} {}", amount, self.description)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub image_url: String,
}

/// Position of the next page to request; the offset of its first item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cursor(pub u32);

impl Cursor {
    pub const START: Cursor = Cursor(0);
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Cursor,
    pub is_last: bool,
}

/// Number of persons picked on a `[0, 1]` serving slider.
pub fn persons_from_slider(value: f32) -> u32 {
    if value <= 0.1 {
        1
    } else {
        (value * 10.0) as u32
    }
}
