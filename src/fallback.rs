use crate::model::{Ingredients, Recipe};

/// Build the deterministic recipe served when generation fails.
pub fn fallback_recipe(ingredients: &Ingredients) -> Recipe {
    let first = ingredients.first();
    let all = ingredients.as_slice();

    Recipe {
        id: None,
        title: format!("Simple {} Dish", title_case(first)),
        description: format!("A quick and easy recipe using {}", all.join(", ")),
        ingredients: as_needed(all),
        instructions: vec![
            "Wash and prepare all ingredients".to_string(),
            "Heat oil in a pan over medium heat".to_string(),
            format!("Add {} to the pan and cook for 3-5 minutes", first),
            "Add remaining ingredients and cook until tender".to_string(),
            "Season with salt and pepper to taste".to_string(),
            "Serve hot and enjoy!".to_string(),
        ],
    }
}

/// One "<ingredient> - as needed" phrase per ingredient
pub fn as_needed(ingredients: &[String]) -> Vec<String> {
    ingredients
        .iter()
        .map(|i| format!("{} - as needed", i))
        .collect()
}

/// Upper-case the first letter of every word and lower-case the rest.
/// A word starts after any uncased character (digits, punctuation, CJK).
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if in_word {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        in_word = c.is_lowercase() || c.is_uppercase();
    }
    out
}
