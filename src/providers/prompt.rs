/// System message sent with every generation request.
pub const SYSTEM_PROMPT: &str = "You are a helpful culinary assistant.";

/// The user prompt asking for a recipe in the four-section layout the
/// parser understands. `{ingredients}` is replaced with the ingredient list.
///
/// The prompt is loaded from `prompt.txt` at compile time using the
/// `include_str!` macro, making it easy to edit without dealing with
/// Rust string syntax.
pub const RECIPE_PROMPT_TEMPLATE: &str = include_str!("prompt.txt");

/// Build the recipe prompt for the given ingredients.
pub fn build_recipe_prompt(ingredients: &[String]) -> String {
    RECIPE_PROMPT_TEMPLATE.replace("{ingredients}", &ingredients.join(", "))
}
