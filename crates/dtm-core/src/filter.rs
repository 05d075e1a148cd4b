//! Post-merge filters and final ordering.

use regex::Regex;

use crate::patterns::AmbiguityRule;
use crate::span::Span;

/// Removes vague date-period scaffolding ("this period", "the time").
pub fn filter_unspecific_periods(mut spans: Vec<Span>, pattern: Option<&Regex>) -> Vec<Span> {
    if let Some(re) = pattern {
        spans.retain(|span| !re.is_match(&span.text));
    }
    spans
}

/// Removes spans overlapping the suppress matches of every rule whose trigger
/// matches somewhere in `text`. Rules apply cumulatively.
pub fn filter_ambiguity(mut spans: Vec<Span>, rules: &[AmbiguityRule], text: &str) -> Vec<Span> {
    for rule in rules {
        if !rule.trigger.is_match(text) {
            continue;
        }
        let suppressed: Vec<(usize, usize)> = rule
            .suppress
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect();
        let before = spans.len();
        spans.retain(|span| {
            !suppressed
                .iter()
                .any(|&(start, end)| start < span.end() && end > span.start)
        });
        tracing::debug!(
            trigger = rule.trigger.as_str(),
            removed = before - spans.len(),
            "applied ambiguity rule"
        );
    }
    spans
}

/// Removes spans whose text matches any calendar filter word.
pub fn filter_calendar_words(mut spans: Vec<Span>, filters: &[Regex]) -> Vec<Span> {
    spans.retain(|span| !filters.iter().any(|re| re.is_match(&span.text)));
    spans
}

/// Stable sort ascending by start offset.
pub fn order(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by_key(|span| span.start);
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::SpanCategory;

    fn span(text: &str, fragment: &str, category: SpanCategory) -> Span {
        let start = text.find(fragment).expect("fragment in text");
        Span::new(text, start, fragment.len(), category).unwrap()
    }

    #[test]
    fn unspecific_periods_are_removed() {
        let text = "sometime this period or next week";
        let spans = vec![
            span(text, "this period", SpanCategory::DatePeriod),
            span(text, "next week", SpanCategory::DatePeriod),
        ];
        let re = Regex::new(r"^(this|that|the) (period|time)$").unwrap();
        let spans = filter_unspecific_periods(spans, Some(&re));
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "next week");
    }

    #[test]
    fn unspecific_period_filter_is_noop_without_pattern() {
        let text = "this period";
        let spans = vec![span(text, "this period", SpanCategory::DatePeriod)];
        assert_eq!(filter_unspecific_periods(spans, None).len(), 1);
    }

    fn may_rule() -> AmbiguityRule {
        AmbiguityRule {
            trigger: Regex::new(r"(?i)\bmay\b.*\b(said|told|asked)\b").unwrap(),
            suppress: Regex::new(r"(?i)\bmay\b").unwrap(),
        }
    }

    #[test]
    fn ambiguity_rule_removes_overlapping_span_when_triggered() {
        let text = "May said she would call on friday";
        let spans = vec![
            span(text, "May", SpanCategory::DatePeriod),
            span(text, "friday", SpanCategory::Date),
        ];
        let spans = filter_ambiguity(spans, &[may_rule()], text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "friday");
    }

    #[test]
    fn ambiguity_rule_keeps_spans_when_trigger_is_absent() {
        let text = "see you in May on friday";
        let spans = vec![
            span(text, "May", SpanCategory::DatePeriod),
            span(text, "friday", SpanCategory::Date),
        ];
        let spans = filter_ambiguity(spans, &[may_rule()], text);
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn ambiguity_rules_apply_cumulatively() {
        let text = "April and May said hi";
        let spans = vec![
            span(text, "April", SpanCategory::DatePeriod),
            span(text, "May", SpanCategory::DatePeriod),
        ];
        let april = AmbiguityRule {
            trigger: Regex::new(r"April and").unwrap(),
            suppress: Regex::new(r"April").unwrap(),
        };
        let spans = filter_ambiguity(spans, &[april, may_rule()], text);
        assert!(spans.is_empty());
    }

    #[test]
    fn ambiguity_overlap_is_positional() {
        // The suppress match touches the span boundary without overlapping it.
        let text = "mayday at noon";
        let spans = vec![span(text, "noon", SpanCategory::Time)];
        let rule = AmbiguityRule {
            trigger: Regex::new("mayday").unwrap(),
            suppress: Regex::new("mayday at ").unwrap(),
        };
        assert_eq!(filter_ambiguity(spans, &[rule], text).len(), 1);
    }

    #[test]
    fn calendar_words_remove_matching_spans() {
        let text = "watch this week's episode by sunday";
        let spans = vec![
            span(text, "this week's episode", SpanCategory::DatePeriod),
            span(text, "sunday", SpanCategory::Date),
        ];
        let filters = vec![Regex::new(r"\bepisodes?\b").unwrap()];
        let spans = filter_calendar_words(spans, &filters);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "sunday");
    }

    #[test]
    fn order_is_stable_on_ties() {
        let text = "noon";
        let a = span(text, "noon", SpanCategory::Time);
        let b = span(text, "noon", SpanCategory::TimePeriod);
        let c = span(text, "no", SpanCategory::Date);
        let ordered = order(vec![a, b, c]);
        let categories: Vec<_> = ordered.iter().map(|s| s.category).collect();
        assert_eq!(
            categories,
            vec![SpanCategory::Time, SpanCategory::TimePeriod, SpanCategory::Date]
        );
    }

    #[test]
    fn order_sorts_ascending_by_start() {
        let text = "at 5pm on monday, then 9am";
        let spans = vec![
            span(text, "9am", SpanCategory::Time),
            span(text, "monday", SpanCategory::Date),
            span(text, "5pm", SpanCategory::Time),
        ];
        let starts: Vec<_> = order(spans).iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![3, 10, 23]);
    }
}
