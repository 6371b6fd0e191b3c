//! 导出服务 - 业务能力层
//!
//! 把累积的题目渲染成文本：普通预览、闪卡格式、JSON

use crate::i18n::{Language, Msg};
use crate::models::{FormatSettings, OutputFormat, ScrapedQuestion};
use anyhow::Result;

/// 按指定格式渲染题目列表，空列表得到空字符串
pub fn render(
    questions: &[ScrapedQuestion],
    format: OutputFormat,
    settings: &FormatSettings,
    lang: Language,
) -> Result<String> {
    if questions.is_empty() {
        return Ok(String::new());
    }
    let text = match format {
        OutputFormat::Normal => render_normal(questions, lang),
        OutputFormat::Formatted => render_flashcards(questions, settings, lang),
        OutputFormat::Json => serde_json::to_string_pretty(questions)?,
    };
    Ok(text)
}

fn incorrect_marker(question: &ScrapedQuestion, lang: Language) -> String {
    if question.answered_correctly {
        String::new()
    } else {
        format!(" ({})", Msg::Incorrect.render(lang))
    }
}

fn render_normal(questions: &[ScrapedQuestion], lang: Language) -> String {
    let mut output = String::new();
    for (i, q) in questions.iter().enumerate() {
        output.push_str(&format!(
            "Q{}: {}{}\n",
            i + 1,
            q.question_text,
            incorrect_marker(q, lang)
        ));
        for choice in &q.choices {
            let mark = if choice.selected { " (x)" } else { "" };
            output.push_str(&format!(" • {}{}\n", choice.text, mark));
        }
        output.push('\n');
    }
    output
}

fn render_flashcards(
    questions: &[ScrapedQuestion],
    settings: &FormatSettings,
    lang: Language,
) -> String {
    questions
        .iter()
        .map(|q| {
            let choices = q
                .choices
                .iter()
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>()
                .join(&settings.choice_separator);
            format!(
                "{}{}{}\n{}{}{}{}",
                q.question_text,
                settings.question_separator,
                choices,
                settings.answer_prefix,
                q.selected_text(),
                incorrect_marker(q, lang),
                settings.answer_suffix
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Choice;

    fn sample() -> Vec<ScrapedQuestion> {
        vec![
            ScrapedQuestion {
                question_number: "1".into(),
                question_text: "2 + 2?".into(),
                choices: vec![
                    Choice { text: "3".into(), selected: false },
                    Choice { text: "4".into(), selected: true },
                ],
                answered_correctly: true,
            },
            ScrapedQuestion {
                question_number: "2".into(),
                question_text: "Capital of France?".into(),
                choices: vec![
                    Choice { text: "Lyon".into(), selected: true },
                    Choice { text: "Paris".into(), selected: false },
                ],
                answered_correctly: false,
            },
        ]
    }

    #[test]
    fn normal_format_marks_selection_and_mistakes() {
        let text = render(
            &sample(),
            OutputFormat::Normal,
            &FormatSettings::default(),
            Language::En,
        )
        .unwrap();
        assert!(text.starts_with("Q1: 2 + 2?\n • 3\n • 4 (x)\n\n"));
        assert!(text.contains("Q2: Capital of France? (Incorrect)\n • Lyon (x)\n"));
    }

    #[test]
    fn flashcards_use_configured_separators() {
        let text = render(
            &sample()[..1],
            OutputFormat::Formatted,
            &FormatSettings::default(),
            Language::En,
        )
        .unwrap();
        assert_eq!(text, "2 + 2?\n\n3\n4\n/4;");
    }

    #[test]
    fn flashcards_localize_incorrect_marker() {
        let text = render(
            &sample()[1..],
            OutputFormat::Formatted,
            &FormatSettings::default(),
            Language::Vi,
        )
        .unwrap();
        assert!(text.ends_with("/Lyon (Sai);"));
    }

    #[test]
    fn empty_list_renders_nothing() {
        for format in [OutputFormat::Normal, OutputFormat::Formatted, OutputFormat::Json] {
            let text = render(&[], format, &FormatSettings::default(), Language::En).unwrap();
            assert!(text.is_empty());
        }
    }
}
