//! Turns free-form model output into a [`Recipe`].
//!
//! The expected layout is the one requested by the prompt:
//!
//! ```text
//! **Title:** Crispy Tofu
//! **Description:** A quick weeknight dish.
//! **Ingredients List:**
//! - 200g tofu
//! **Instructions:**
//! 1. Press the tofu.
//! ```
//!
//! Parsing never fails. Lines that match nothing are skipped, and anything the
//! text did not provide is filled with defaults.

use log::debug;

use crate::fallback::as_needed;
use crate::model::Recipe;

const TITLE_MARKER: &str = "**Title:**";
const DESCRIPTION_MARKER: &str = "**Description:**";
const INGREDIENTS_MARKER: &str = "**Ingredients List:**";
const INSTRUCTIONS_MARKER: &str = "**Instructions:**";

pub const DEFAULT_TITLE: &str = "AI-Generated Recipe";
pub const DEFAULT_DESCRIPTION: &str = "A delicious recipe created just for you!";

/// Section the scanner is currently inside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    None,
    Ingredients,
    Instructions,
}

/// Classification of a single non-empty, trimmed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Title(String),
    Description(String),
    IngredientsHeader,
    InstructionsHeader,
    Bullet(&'a str),
    Numbered(&'a str),
    Other,
}

impl<'a> Line<'a> {
    /// Classify a trimmed line. Markers take precedence over list items.
    pub fn classify(line: &'a str) -> Self {
        if line.contains(TITLE_MARKER) {
            Line::Title(strip_marker(line, TITLE_MARKER))
        } else if line.contains(DESCRIPTION_MARKER) {
            Line::Description(strip_marker(line, DESCRIPTION_MARKER))
        } else if line.contains(INGREDIENTS_MARKER) {
            Line::IngredientsHeader
        } else if line.contains(INSTRUCTIONS_MARKER) {
            Line::InstructionsHeader
        } else if let Some(rest) = line.strip_prefix('-') {
            Line::Bullet(rest.trim())
        } else if line.starts_with(char::is_numeric) {
            let step = match line.split_once('.') {
                Some((_, rest)) => rest.trim(),
                None => line,
            };
            Line::Numbered(step)
        } else {
            Line::Other
        }
    }
}

fn strip_marker(line: &str, marker: &str) -> String {
    line.replace(marker, "").replace("**", "").trim().to_string()
}

/// Accumulates recipe fields while scanning lines
#[derive(Debug)]
pub struct RecipeScanner {
    section: Section,
    title: Option<String>,
    description: Option<String>,
    ingredients: Vec<String>,
    instructions: Vec<String>,
}

impl Default for RecipeScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeScanner {
    pub fn new() -> Self {
        RecipeScanner {
            section: Section::None,
            title: None,
            description: None,
            ingredients: Vec::new(),
            instructions: Vec::new(),
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    /// Feed one raw line of text
    pub fn feed(&mut self, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }

        match (self.section, Line::classify(line)) {
            (_, Line::Title(title)) => {
                // an empty title keeps the default
                if !title.is_empty() {
                    self.title = Some(title);
                }
            }
            (_, Line::Description(description)) => self.description = Some(description),
            (_, Line::IngredientsHeader) => self.section = Section::Ingredients,
            (_, Line::InstructionsHeader) => self.section = Section::Instructions,
            (Section::Ingredients, Line::Bullet(item)) => self.ingredients.push(item.to_string()),
            (Section::Instructions, Line::Numbered(step)) => {
                self.instructions.push(step.to_string())
            }
            (section, other) => debug!("Skipping line in {:?}: {:?}", section, other),
        }
    }

    /// Apply defaults and build the recipe
    pub fn finish(self, original_ingredients: &[String]) -> Recipe {
        let ingredients = if self.ingredients.is_empty() {
            as_needed(original_ingredients)
        } else {
            self.ingredients
        };

        let instructions = if self.instructions.is_empty() {
            default_instructions()
        } else {
            self.instructions
        };

        Recipe {
            id: None,
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: self
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            ingredients,
            instructions,
        }
    }
}

fn default_instructions() -> Vec<String> {
    [
        "Prepare all ingredients",
        "Combine ingredients as appropriate",
        "Cook until done",
        "Season to taste and serve",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Parse model output into a recipe, falling back to the requested
/// ingredients and a generic method for anything missing.
pub fn parse_recipe_text(text: &str, original_ingredients: &[String]) -> Recipe {
    let mut scanner = RecipeScanner::new();
    for line in text.lines() {
        scanner.feed(line);
    }
    scanner.finish(original_ingredients)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "**Title:** Crispy Soy Tofu

**Description:** Golden tofu glazed with soy sauce.

**Ingredients List:**
- 400g firm tofu
- 3 tbsp soy sauce
- 1 tbsp oil

**Instructions:**
1. Press and cube the tofu.
2. Fry the tofu in oil until golden.
3. Toss with soy sauce and serve.
";

    fn originals() -> Vec<String> {
        vec!["tofu".to_string(), "soy sauce".to_string()]
    }

    #[test]
    fn test_parse_well_formed() {
        let recipe = parse_recipe_text(WELL_FORMED, &originals());

        assert_eq!(recipe.id, None);
        assert_eq!(recipe.title, "Crispy Soy Tofu");
        assert_eq!(recipe.description, "Golden tofu glazed with soy sauce.");
        assert_eq!(
            recipe.ingredients,
            vec!["400g firm tofu", "3 tbsp soy sauce", "1 tbsp oil"]
        );
        assert_eq!(
            recipe.instructions,
            vec![
                "Press and cube the tofu.",
                "Fry the tofu in oil until golden.",
                "Toss with soy sauce and serve."
            ]
        );
    }

    #[test]
    fn test_parse_empty_text_uses_defaults() {
        let recipe = parse_recipe_text("", &originals());

        assert_eq!(recipe.title, DEFAULT_TITLE);
        assert_eq!(recipe.description, DEFAULT_DESCRIPTION);
        assert_eq!(
            recipe.ingredients,
            vec!["tofu - as needed", "soy sauce - as needed"]
        );
        assert_eq!(recipe.instructions, default_instructions());
    }

    #[test]
    fn test_parse_garbage_never_panics() {
        let inputs = [
            "\u{0}\u{1}\u{fffd}\u{7f}",
            "- dangling bullet\n1. dangling step",
            "1\n2\n3",
            "**Instructions:**\n7\n8.\n9",
            "**Ingredients List:**\n-\n--\n- ",
            "****\n**Title:****\n**",
            "\r\n\r\n\t",
        ];
        for text in inputs {
            let recipe = parse_recipe_text(text, &originals());
            assert!(!recipe.title.is_empty());
            assert!(!recipe.ingredients.is_empty());
            assert!(!recipe.instructions.is_empty());
        }
    }

    #[test]
    fn test_items_outside_sections_are_ignored() {
        let text = "- 1 cup rice\n1. Boil water.\n**Title:** Rice";
        let recipe = parse_recipe_text(text, &originals());
        assert_eq!(recipe.title, "Rice");
        assert_eq!(recipe.ingredients, as_needed(&originals()));
        assert_eq!(recipe.instructions, default_instructions());
    }

    #[test]
    fn test_bullets_ignored_in_instructions_section() {
        let text = "**Instructions:**\n- not a step\n1. Real step.";
        let recipe = parse_recipe_text(text, &originals());
        assert_eq!(recipe.instructions, vec!["Real step."]);
        assert_eq!(recipe.ingredients, as_needed(&originals()));
    }

    #[test]
    fn test_numbered_line_without_period_is_kept_verbatim() {
        let text = "**Instructions:**\n1) Heat the pan\n2";
        let recipe = parse_recipe_text(text, &originals());
        assert_eq!(recipe.instructions, vec!["1) Heat the pan", "2"]);
    }

    #[test]
    fn test_numbered_line_splits_on_first_period() {
        let text = "**Instructions:**\n10. Bake at 180C. Then rest.";
        let recipe = parse_recipe_text(text, &originals());
        assert_eq!(recipe.instructions, vec!["Bake at 180C. Then rest."]);
    }

    #[test]
    fn test_markers_stripped_with_stray_bold() {
        let text = "**Title:** **Smoky Beans**\n  **Description:**   Hearty and warm  ";
        let recipe = parse_recipe_text(text, &originals());
        assert_eq!(recipe.title, "Smoky Beans");
        assert_eq!(recipe.description, "Hearty and warm");
    }

    #[test]
    fn test_empty_title_keeps_default() {
        let recipe = parse_recipe_text("**Title:**", &originals());
        assert_eq!(recipe.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_later_section_header_switches_section() {
        let mut scanner = RecipeScanner::new();
        assert_eq!(scanner.section(), Section::None);
        scanner.feed("**Ingredients List:**");
        assert_eq!(scanner.section(), Section::Ingredients);
        scanner.feed("   ");
        assert_eq!(scanner.section(), Section::Ingredients);
        scanner.feed("**Instructions:**");
        assert_eq!(scanner.section(), Section::Instructions);
    }

    #[test]
    fn test_classify() {
        assert_eq!(Line::classify("- 2 eggs"), Line::Bullet("2 eggs"));
        assert_eq!(Line::classify("3. Stir"), Line::Numbered("Stir"));
        assert_eq!(Line::classify("١. Stir"), Line::Numbered("Stir"));
        assert_eq!(Line::classify("Enjoy!"), Line::Other);
        assert_eq!(
            Line::classify("**Ingredients List:** below"),
            Line::IngredientsHeader
        );
        assert_eq!(
            Line::classify("**Title:** Pancakes"),
            Line::Title("Pancakes".to_string())
        );
    }
}
