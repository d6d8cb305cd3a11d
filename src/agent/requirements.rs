/// Bullet prefixes the model uses when summarizing what the bot should do.
const BULLET_PREFIXES: &[&str] = &["- ", "• ", "* ", "✅ "];

/// Lines this short are not worth recording.
const MIN_LINE_LEN: usize = 11;

/// Appends requirement lines found in `reply` to `existing`, skipping
/// duplicates and anything `max_len` characters or longer. Returns how many
/// were added.
pub fn extract_requirements(reply: &str, existing: &mut Vec<String>, max_len: usize) -> usize {
    let before = existing.len();
    for line in reply.lines() {
        let stripped = line.trim();
        if !BULLET_PREFIXES.iter().any(|p| stripped.starts_with(p))
            || stripped.chars().count() < MIN_LINE_LEN
        {
            continue;
        }
        let requirement = stripped
            .trim_start_matches(|c| matches!(c, '-' | '•' | '*' | ' ' | '✅'))
            .trim();
        if requirement.is_empty() || requirement.chars().count() >= max_len {
            continue;
        }
        if !existing.iter().any(|r| r == requirement) {
            existing.push(requirement.to_string());
        }
    }
    existing.len() - before
}
