pub const CHAT_SYSTEM: &str = include_str!("../data/prompts/chat_system.txt");
pub const INTENT_SYSTEM: &str = include_str!("../data/prompts/intent_system.txt");
pub const INTENT_USER: &str = include_str!("../data/prompts/intent_user.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}
