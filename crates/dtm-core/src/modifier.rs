//! Modifier attachment.
//!
//! Widens spans to absorb an adjacent modifier word in front of them
//! ("before", "after", "since", "around") and, for date periods, a trailing
//! year qualifier ("2012 or later").

use regex::Regex;

use crate::category::SpanCategory;
use crate::patterns::{MergePatterns, ModifierRule};
use crate::span::{Span, slice};

/// Attaches modifiers to every span. Text is re-sliced after each widening.
pub fn attach_modifiers(mut spans: Vec<Span>, patterns: &MergePatterns, text: &str) -> Vec<Span> {
    for span in &mut spans {
        if let Some(rule) = patterns
            .modifiers()
            .iter()
            .find(|rule| attach_leading(span, rule, text))
        {
            tracing::trace!(modifier = rule.kind.as_str(), text = %span.text, "attached modifier");
        }

        if span.category == SpanCategory::DatePeriod {
            if let Some(year_after) = &patterns.year_after {
                attach_year_after(span, year_after, text);
            }
        }
    }
    spans
}

/// Extends `span` backward over a modifier that ends right before it.
///
/// Whitespace between the modifier and the span is absorbed too. The modifier
/// pattern only matches at the end of the trimmed prefix, so with repeated
/// modifiers in one sentence each span binds to its nearest one.
fn attach_leading(span: &mut Span, rule: &ModifierRule, text: &str) -> bool {
    let Some(before) = text.get(..span.start) else {
        return false;
    };
    let Some(found) = rule.trailing.find(before.trim_end()) else {
        return false;
    };
    if found.is_empty() {
        return false;
    }

    let start = found.start();
    let length = span.length + (before.len() - start);
    match slice(text, start, length) {
        Ok(widened) => {
            span.text = widened.to_string();
            span.start = start;
            span.length = length;
            true
        }
        Err(_) => false,
    }
}

/// Extends a date period forward over a qualifier that makes up the whole
/// remainder of the text ("2012 or after").
fn attach_year_after(span: &mut Span, year_after: &Regex, text: &str) {
    let Some(after) = text.get(span.end()..) else {
        return;
    };
    let leading = after.trim_start();
    let qualifier = leading.trim_end();
    if qualifier.is_empty() || !year_after.is_match(qualifier) {
        return;
    }

    let length = span.length + (after.len() - leading.len()) + qualifier.len();
    if let Ok(widened) = slice(text, span.start, length) {
        span.text = widened.to_string();
        span.length = length;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternTable;

    fn patterns() -> MergePatterns {
        MergePatterns::compile(&PatternTable {
            before: Some(r"\b(before|earlier than|no later than)".to_string()),
            after: Some(r"\b(after|later than)".to_string()),
            since: Some(r"\bsince".to_string()),
            around: Some(r"\b(around|about)".to_string()),
            year_after: Some(r"^or\s+(after|above|later)\b".to_string()),
            ..PatternTable::default()
        })
        .unwrap()
    }

    fn span(text: &str, fragment: &str, category: SpanCategory) -> Span {
        let start = text.rfind(fragment).expect("fragment in text");
        Span::new(text, start, fragment.len(), category).unwrap()
    }

    #[test]
    fn absorbs_adjacent_modifier() {
        let text = "meeting after 3pm";
        let spans = attach_modifiers(vec![span(text, "3pm", SpanCategory::Time)], &patterns(), text);
        assert_eq!(spans[0].text, "after 3pm");
        assert_eq!(spans[0].start, 8);
        assert_eq!(spans[0].length, 9);
    }

    #[test]
    fn each_span_binds_to_its_nearest_modifier() {
        let text = "sales after 2010 and before 2018 or before 2000";
        let spans = vec![
            span(text, "2010", SpanCategory::DatePeriod),
            span(text, "2018", SpanCategory::DatePeriod),
            span(text, "2000", SpanCategory::Date),
        ];
        let spans = attach_modifiers(spans, &patterns(), text);
        let texts: Vec<_> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["after 2010", "before 2018", "before 2000"]);
        assert_eq!(spans[2].start, 36);
    }

    #[test]
    fn modifier_must_be_adjacent() {
        let text = "before lunch at 3pm";
        let spans = attach_modifiers(vec![span(text, "3pm", SpanCategory::Time)], &patterns(), text);
        assert_eq!(spans[0].text, "3pm");
    }

    #[test]
    fn modifier_match_ignores_case_of_source() {
        let text = "Since Monday";
        let spans = attach_modifiers(
            vec![span(text, "Monday", SpanCategory::Date)],
            &patterns(),
            text,
        );
        assert_eq!(spans[0].text, "Since Monday");
        assert_eq!(spans[0].start, 0);
    }

    #[test]
    fn before_wins_over_later_priorities() {
        // Both "around" and the multi-word before phrase end at the span, and
        // before is tried first.
        let text = "around no later than noon";
        let spans = attach_modifiers(vec![span(text, "noon", SpanCategory::Time)], &patterns(), text);
        assert_eq!(spans[0].text, "no later than noon");
    }

    #[test]
    fn trailing_whitespace_is_absorbed() {
        let text = "about   5pm";
        let spans = attach_modifiers(vec![span(text, "5pm", SpanCategory::Time)], &patterns(), text);
        assert_eq!(spans[0].text, "about   5pm");
        assert_eq!(spans[0].length, text.len());
    }

    #[test]
    fn year_after_extends_date_period_to_end_of_text() {
        let text = "cars from 2012 or after ";
        let spans = attach_modifiers(
            vec![span(text, "2012", SpanCategory::DatePeriod)],
            &patterns(),
            text,
        );
        assert_eq!(spans[0].text, "2012 or after");
    }

    #[test]
    fn year_after_requires_whole_remainder() {
        let text = "cars from 2012 or after that";
        let spans = attach_modifiers(
            vec![span(text, "2012", SpanCategory::DatePeriod)],
            &patterns(),
            text,
        );
        assert_eq!(spans[0].text, "2012");
    }

    #[test]
    fn year_after_matches_longest_alternative_covering_remainder() {
        let patterns = MergePatterns::compile(&PatternTable {
            year_after: Some(r"or (later|later on)".to_string()),
            ..PatternTable::default()
        })
        .unwrap();
        let text = "cars 2012 or later on";
        let spans = attach_modifiers(
            vec![span(text, "2012", SpanCategory::DatePeriod)],
            &patterns,
            text,
        );
        assert_eq!(spans[0].text, "2012 or later on");
        assert_eq!(spans[0].start, 5);
    }

    #[test]
    fn empty_modifier_match_does_not_widen() {
        let patterns = MergePatterns::compile(&PatternTable {
            around: Some(r"\b(around|about)?".to_string()),
            ..PatternTable::default()
        })
        .unwrap();
        let text = "meeting   3pm";
        let spans = attach_modifiers(vec![span(text, "3pm", SpanCategory::Time)], &patterns, text);
        assert_eq!(spans[0].text, "3pm");
        assert_eq!(spans[0].start, 10);

        let text = "meeting about 3pm";
        let spans = attach_modifiers(vec![span(text, "3pm", SpanCategory::Time)], &patterns, text);
        assert_eq!(spans[0].text, "about 3pm");
    }

    #[test]
    fn year_after_only_applies_to_date_periods() {
        let text = "cars from 2012 or after";
        let spans = attach_modifiers(vec![span(text, "2012", SpanCategory::Date)], &patterns(), text);
        assert_eq!(spans[0].text, "2012");
    }

    #[test]
    fn leading_and_trailing_modifiers_combine() {
        let text = "since 2012 or later";
        let spans = attach_modifiers(
            vec![span(text, "2012", SpanCategory::DatePeriod)],
            &patterns(),
            text,
        );
        assert_eq!(spans[0].text, text);
    }

    #[test]
    fn spans_past_the_text_are_left_alone() {
        let text = "after 3pm";
        let mut stray = span(text, "3pm", SpanCategory::Time);
        stray.start = 40;
        let spans = attach_modifiers(vec![stray], &patterns(), text);
        assert_eq!(spans[0].start, 40);
    }
}
