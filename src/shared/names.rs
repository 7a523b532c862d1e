pub const MAX_PLAYER_NAME_LENGTH: usize = 20;
pub const DEFAULT_PLAYER_NAME: &str = "Player";

pub fn sanitize_player_name(name: &str, fallback: &str) -> String {
    let cleaned = name
        .split_whitespace()
        .map(|word| word.chars().filter(|ch| !ch.is_control()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if cleaned.is_empty() {
        return fallback.to_string();
    }
    cleaned.chars().take(MAX_PLAYER_NAME_LENGTH).collect()
}

pub fn player_name(name: Option<&str>) -> String {
    sanitize_player_name(name.unwrap_or_default(), DEFAULT_PLAYER_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_and_truncates() {
        assert_eq!(sanitize_player_name("  ana \t  bo ", "x"), "ana bo");
        let long = "a".repeat(50);
        assert_eq!(sanitize_player_name(&long, "x").len(), MAX_PLAYER_NAME_LENGTH);
    }

    #[test]
    fn empty_or_missing_names_fall_back() {
        assert_eq!(player_name(None), DEFAULT_PLAYER_NAME);
        assert_eq!(player_name(Some("   ")), DEFAULT_PLAYER_NAME);
        assert_eq!(player_name(Some("\u{7}")), DEFAULT_PLAYER_NAME);
    }
}
