/// Lower-case and trim every ingredient, keeping order and duplicates.
pub fn normalize_ingredients(raw: &[String]) -> Vec<String> {
    raw.iter().map(|i| i.trim().to_lowercase()).collect()
}
