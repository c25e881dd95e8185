// Prompt templates for LLM interactions
//
// System prompts give every board member its persona. The moderator brief
// is the only user-side template: it carries the idea and the condensed
// expert reports.

use std::collections::HashMap;

use super::types::Role;

/// Character budget for each expert report inside the moderator brief
pub const EXPERT_BRIEF_CHARS: usize = 200;

/// Appended to an expert report that was cut to fit the brief
pub const TRUNCATION_MARKER: &str = "... [текст сокращен]";

/// User-side prompt with `{{name}}` placeholders
pub struct PromptTemplate {
    pub user_template: String,
}

impl PromptTemplate {
    /// Render the user template, replacing `{{name}}` placeholders.
    ///
    /// Substitution is single-pass: text coming from a variable is never
    /// scanned again, so a user idea containing `{{analyst}}` stays verbatim.
    /// Unknown placeholders are kept as written.
    pub fn render(&self, variables: &HashMap<String, String>) -> String {
        let mut out = String::with_capacity(self.user_template.len());
        let mut rest = self.user_template.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => {
                    let key = after[..end].trim();
                    match variables.get(key) {
                        Some(value) => out.push_str(value),
                        None => out.push_str(&rest[start..start + 2 + end + 2]),
                    }
                    rest = &after[end + 2..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Cut `text` to at most `max_chars` characters, appending
/// [`TRUNCATION_MARKER`] when anything was removed.
pub fn limit_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
    }
}

/// Text stored in an expert's slot when its call fails
pub fn expert_placeholder(role: Role) -> &'static str {
    match role {
        Role::Strategist => "Ошибка анализа стратега",
        Role::Financier => "Ошибка финансового анализа",
        Role::Auditor => "Ошибка аудита",
        Role::Analyst => "Ошибка анализа рынка",
        Role::Moderator => "Ошибка модератора",
    }
}

pub mod library {
    use super::PromptTemplate;
    use crate::agents::types::Role;

    /// Persona for each board member
    pub fn system_prompt(role: Role) -> &'static str {
        match role {
            Role::Strategist => {
                "Ты — стратег-оптимист в совете директоров. Оцени бизнес-идею с точки зрения \
                 возможностей: рынок, позиционирование, конкурентные преимущества, пути роста. \
                 Отвечай по-русски, кратко, 3-5 пунктов."
            }
            Role::Financier => {
                "Ты — финансовый директор. Оцени бизнес-идею с точки зрения денег: модель \
                 монетизации, стартовые вложения, юнит-экономика, срок окупаемости. \
                 Отвечай по-русски, кратко, 3-5 пунктов с ориентировочными цифрами."
            }
            Role::Auditor => {
                "Ты — аудитор-скептик. Найди слабые места бизнес-идеи: риски, юридические \
                 ограничения, операционные сложности, причины провала. \
                 Отвечай по-русски, кратко, 3-5 пунктов."
            }
            Role::Analyst => {
                "Ты — рыночный аналитик. Опиши целевую аудиторию, размер рынка, ключевых \
                 конкурентов и тренды, относящиеся к бизнес-идее. \
                 Отвечай по-русски, кратко, 3-5 пунктов."
            }
            Role::Moderator => {
                "Ты — председатель совета директоров. Тебе дана бизнес-идея и краткие отчеты \
                 экспертов. Взвесь их мнения и вынеси итоговый вердикт: запускать, \
                 доработать или отказаться, с обоснованием и тремя конкретными \
                 следующими шагами. Отвечай по-русски."
            }
        }
    }

    /// Brief handed to the moderator after the experts have spoken
    pub fn moderator_brief() -> PromptTemplate {
        PromptTemplate {
            user_template: "🏁 ФИНАЛЬНЫЙ ВЕРДИКТ\n\n\
                            💡 ИДЕЯ: {{idea}}\n\n\
                            📋 КРАТКИЕ ОТЧЕТЫ ЭКСПЕРТОВ:\n\
                            🔹 Стратег: {{strategist}}\n\
                            🔹 Финансист: {{financier}}\n\
                            🔹 Аудитор: {{auditor}}\n\
                            🔹 Аналитик: {{analyst}}"
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_text_keeps_short_text_unmodified() {
        let text = "a".repeat(EXPERT_BRIEF_CHARS);
        assert_eq!(limit_text(&text, EXPERT_BRIEF_CHARS), text);
        assert_eq!(limit_text("", EXPERT_BRIEF_CHARS), "");
    }

    #[test]
    fn limit_text_cuts_long_text_and_appends_marker() {
        let text = "b".repeat(EXPERT_BRIEF_CHARS + 1);
        let limited = limit_text(&text, EXPERT_BRIEF_CHARS);

        assert_eq!(
            limited,
            format!("{}{}", "b".repeat(EXPERT_BRIEF_CHARS), TRUNCATION_MARKER)
        );
    }

    #[test]
    fn limit_text_counts_characters_not_bytes() {
        let text = "ж".repeat(150);
        assert_eq!(limit_text(&text, EXPERT_BRIEF_CHARS), text);

        let long = "ж".repeat(250);
        let limited = limit_text(&long, EXPERT_BRIEF_CHARS);
        assert!(limited.starts_with(&"ж".repeat(EXPERT_BRIEF_CHARS)));
        assert!(limited.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn render_substitutes_variables_once() {
        let template = library::moderator_brief();
        let vars: HashMap<String, String> = [
            ("idea", "sell {{analyst}}"),
            ("strategist", "s"),
            ("financier", "f"),
            ("auditor", "a"),
            ("analyst", "n"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let rendered = template.render(&vars);

        assert!(rendered.contains("💡 ИДЕЯ: sell {{analyst}}"));
        assert!(rendered.contains("🔹 Аналитик: n"));
        assert!(!rendered.contains("{{strategist}}"));
    }

    #[test]
    fn render_keeps_unknown_and_unterminated_placeholders() {
        let template = PromptTemplate {
            user_template: "{{known}} {{unknown}} {{open".to_string(),
        };
        let vars = HashMap::from([("known".to_string(), "yes".to_string())]);

        assert_eq!(template.render(&vars), "yes {{unknown}} {{open");
    }

    #[test]
    fn every_expert_has_distinct_placeholder() {
        let placeholders: std::collections::HashSet<_> =
            Role::EXPERTS.iter().map(|r| expert_placeholder(*r)).collect();
        assert_eq!(placeholders.len(), Role::EXPERTS.len());
    }
}
