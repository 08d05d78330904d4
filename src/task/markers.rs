//! Inline marker vocabulary.
//!
//! A task's text can carry any mix of these markers, in any order:
//!
//! | Marker      | Syntax                           | Field          |
//! |-------------|----------------------------------|----------------|
//! | linked note | `[[Name]]`, `[[Name\|Alias]]`    | `linked_notes` |
//! | start date  | `🛫 2024-01-15`                  | `start_date`   |
//! | scheduled   | `⏰ 2024-01-15`                  | `scheduled_date` |
//! | due date    | `📅 2024-01-15`                  | `due_date`     |
//! | priority    | `🔺` / `🔼` / `🔽`, optional label | `priority`   |
//! | tag         | `#word-or-hyphen`                | `tags`         |
//!
//! All markers are recognized by one regex built from [`MARKERS`], so a line
//! is scanned once, left to right, and a `#` inside a link is part of the
//! link rather than a tag. A date marker is recognized by its text shape
//! alone; an impossible calendar date such as `2024-02-30` is still a marker,
//! it just leaves the field empty. Emission walks [`EMIT_ORDER`].

use std::ops::Range;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use super::{parse_date, DateField, Priority};

// ============================================================================
// Marker Table
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Link,
    Date(DateField),
    Priority(Priority),
    Tag,
}

/// One row of the marker table: the outer capture group name, the field it
/// feeds, the pattern, and the inner group holding the value (if any).
struct MarkerSpec {
    group: &'static str,
    kind: MarkerKind,
    pattern: &'static str,
    value: Option<&'static str>,
}

/// Alternation order matters only when two patterns can start at the same
/// position; none of these can, so the order is documentation.
const MARKERS: &[MarkerSpec] = &[
    MarkerSpec {
        group: "link",
        kind: MarkerKind::Link,
        pattern: r"\[\[(?P<link_name>[^\[\]|]+)(?:\|[^\]]+)?\]\]",
        value: Some("link_name"),
    },
    MarkerSpec {
        group: "start",
        kind: MarkerKind::Date(DateField::Start),
        pattern: r"🛫\s*(?P<start_value>[0-9]{4}-[0-9]{2}-[0-9]{2})",
        value: Some("start_value"),
    },
    MarkerSpec {
        group: "scheduled",
        kind: MarkerKind::Date(DateField::Scheduled),
        pattern: r"⏰\s*(?P<scheduled_value>[0-9]{4}-[0-9]{2}-[0-9]{2})",
        value: Some("scheduled_value"),
    },
    MarkerSpec {
        group: "due",
        kind: MarkerKind::Date(DateField::Due),
        pattern: r"📅\s*(?P<due_value>[0-9]{4}-[0-9]{2}-[0-9]{2})",
        value: Some("due_value"),
    },
    MarkerSpec {
        group: "high",
        kind: MarkerKind::Priority(Priority::High),
        pattern: r"🔺(?:\s*High\b)?",
        value: None,
    },
    MarkerSpec {
        group: "medium",
        kind: MarkerKind::Priority(Priority::Medium),
        pattern: r"🔼(?:\s*Medium\b)?",
        value: None,
    },
    MarkerSpec {
        group: "low",
        kind: MarkerKind::Priority(Priority::Low),
        pattern: r"🔽(?:\s*Low\b)?",
        value: None,
    },
    MarkerSpec {
        group: "tag",
        kind: MarkerKind::Tag,
        pattern: r"#(?P<tag_name>[\w-]+)",
        value: Some("tag_name"),
    },
];

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = MARKERS
        .iter()
        .map(|m| format!("(?P<{}>{})", m.group, m.pattern))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).expect("marker table compiles")
});

/// Characters a tag cannot carry.
static NON_TAG_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w-]+").expect("tag character regex compiles"));

/// Groups appended after the description on emission, in order.
#[derive(Debug, Clone, Copy)]
enum EmitGroup {
    Links,
    Date(DateField),
    Priority,
    Tags,
}

const EMIT_ORDER: [EmitGroup; 6] = [
    EmitGroup::Links,
    EmitGroup::Date(DateField::Start),
    EmitGroup::Date(DateField::Scheduled),
    EmitGroup::Date(DateField::Due),
    EmitGroup::Priority,
    EmitGroup::Tags,
];

// ============================================================================
// Tokens and Fields
// ============================================================================

/// A recognized marker and its decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// Linked note name, alias discarded (may be empty for `[[ ]]`)
    Link(String),
    /// `None` when the date has the right shape but is not a calendar date
    Date(DateField, Option<NaiveDate>),
    Priority(Priority),
    /// Tag name without the `#`
    Tag(String),
}

/// A marker together with its byte span in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerToken {
    pub span: Range<usize>,
    pub marker: Marker,
}

/// Structured fields carried by markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerFields {
    pub tags: Vec<String>,
    pub linked_notes: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub scheduled_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
}

impl MarkerFields {
    fn date_mut(&mut self, field: DateField) -> &mut Option<NaiveDate> {
        match field {
            DateField::Start => &mut self.start_date,
            DateField::Scheduled => &mut self.scheduled_date,
            DateField::Due => &mut self.due_date,
        }
    }

    #[must_use]
    pub fn date(&self, field: DateField) -> Option<NaiveDate> {
        match field {
            DateField::Start => self.start_date,
            DateField::Scheduled => self.scheduled_date,
            DateField::Due => self.due_date,
        }
    }

    /// Fold one marker into the fields.
    ///
    /// When several priority symbols share a line the most urgent one wins.
    fn absorb(&mut self, marker: &Marker) {
        match marker {
            Marker::Link(name) => {
                if !name.is_empty() {
                    self.linked_notes.push(name.clone());
                }
            }
            Marker::Date(field, date) => *self.date_mut(*field) = *date,
            Marker::Priority(priority) => {
                if self.priority.is_none_or(|p| priority.rank() > p.rank()) {
                    self.priority = Some(*priority);
                }
            }
            Marker::Tag(tag) => self.tags.push(tag.clone()),
        }
    }
}

/// Result of decoding a task's text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedText {
    pub fields: MarkerFields,
    pub clean_text: String,
}

// ============================================================================
// Scanning
// ============================================================================

fn token_from(caps: &Captures<'_>) -> Option<MarkerToken> {
    let entry = MARKERS.iter().find(|m| caps.name(m.group).is_some())?;
    let whole = caps.name(entry.group)?;
    let value = entry.value.and_then(|v| caps.name(v)).map(|m| m.as_str());

    let marker = match entry.kind {
        MarkerKind::Link => Marker::Link(value.unwrap_or_default().trim().to_string()),
        MarkerKind::Date(field) => Marker::Date(field, parse_date(field, value?).ok()),
        MarkerKind::Priority(priority) => Marker::Priority(priority),
        MarkerKind::Tag => Marker::Tag(value?.to_string()),
    };

    Some(MarkerToken {
        span: whole.range(),
        marker,
    })
}

/// Scan `text` once and return every recognized marker, left to right.
///
/// # Example
///
/// ```
/// use taskboard::task::{scan_markers, Marker};
///
/// let tokens = scan_markers("Call client [[Client Notes|notes]] #work");
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[0].marker, Marker::Link("Client Notes".into()));
/// assert_eq!(tokens[1].marker, Marker::Tag("work".into()));
/// ```
#[must_use]
pub fn scan_markers(text: &str) -> Vec<MarkerToken> {
    MARKER_RE
        .captures_iter(text)
        .filter_map(|caps| token_from(&caps))
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replace every token span with a space, then collapse whitespace.
///
/// Replacing with a space keeps the text on either side of a marker from
/// fusing into a new marker.
fn strip_tokens(text: &str, tokens: &[MarkerToken]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for token in tokens {
        out.push_str(&text[last..token.span.start]);
        out.push(' ');
        last = token.span.end;
    }
    out.push_str(&text[last..]);
    collapse_whitespace(&out)
}

/// Derive the clean description: markers removed, whitespace collapsed.
///
/// The result is a fixed point: `clean_text(&clean_text(s)) == clean_text(s)`.
#[must_use]
pub fn clean_text(text: &str) -> String {
    let mut current = strip_tokens(text, &scan_markers(text));
    loop {
        let tokens = scan_markers(&current);
        if tokens.is_empty() {
            return current;
        }
        current = strip_tokens(&current, &tokens);
    }
}

/// Decode all marker fields and the clean description from a task's text.
///
/// The first date marker of each kind claims its field, even when its date
/// is impossible and the field stays empty.
///
/// # Example
///
/// ```
/// use taskboard::task::{parse_markers, Priority};
///
/// let parsed = parse_markers("Call client [[Client Notes]] 🔼");
/// assert_eq!(parsed.clean_text, "Call client");
/// assert_eq!(parsed.fields.linked_notes, vec!["Client Notes".to_string()]);
/// assert_eq!(parsed.fields.priority, Some(Priority::Medium));
/// ```
#[must_use]
pub fn parse_markers(text: &str) -> ParsedText {
    let mut fields = MarkerFields::default();
    let mut claimed: Vec<DateField> = Vec::new();
    for token in scan_markers(text) {
        if let Marker::Date(field, _) = token.marker {
            if claimed.contains(&field) {
                continue;
            }
            claimed.push(field);
        }
        fields.absorb(&token.marker);
    }
    ParsedText {
        fields,
        clean_text: clean_text(text),
    }
}

// ============================================================================
// Emission
// ============================================================================

/// A link name as it can be written between `[[` and `]]`.
fn link_name(name: &str) -> String {
    collapse_whitespace(&name.replace(['[', ']', '|'], " "))
}

/// A tag name reduced to the characters the tag marker accepts.
fn tag_name(tag: &str) -> String {
    NON_TAG_CHARS_RE.replace_all(tag, "").into_owned()
}

fn render_group(group: EmitGroup, fields: &MarkerFields) -> Option<String> {
    let joined = |items: Vec<String>| (!items.is_empty()).then(|| items.join(" "));
    match group {
        EmitGroup::Links => joined(
            fields
                .linked_notes
                .iter()
                .map(|n| link_name(n))
                .filter(|n| !n.is_empty())
                .map(|n| format!("[[{}]]", n))
                .collect(),
        ),
        EmitGroup::Date(field) => fields
            .date(field)
            .map(|d| format!("{} {}", field.symbol(), d.format("%Y-%m-%d"))),
        EmitGroup::Priority => fields.priority.map(|p| p.symbol().to_string()),
        EmitGroup::Tags => joined(
            fields
                .tags
                .iter()
                .map(|t| tag_name(t))
                .filter(|t| !t.is_empty())
                .map(|t| format!("#{}", t))
                .collect(),
        ),
    }
}

/// Build a task's text from a description and its marker fields.
///
/// Groups are appended after the description in a fixed order: linked notes,
/// start, scheduled and due dates, priority symbol, tags. Empty groups are
/// omitted and everything is separated by single spaces. The result is always
/// a single line: whitespace runs in the description collapse to one space,
/// and link and tag values drop characters their markers cannot hold.
///
/// # Example
///
/// ```
/// use taskboard::task::{emit_task_text, MarkerFields};
///
/// let fields = MarkerFields {
///     tags: vec!["work".into()],
///     linked_notes: vec!["Plan".into()],
///     ..Default::default()
/// };
/// assert_eq!(emit_task_text("Write report", &fields), "Write report [[Plan]] #work");
/// ```
#[must_use]
pub fn emit_task_text(clean_text: &str, fields: &MarkerFields) -> String {
    let description = collapse_whitespace(clean_text);
    let mut parts: Vec<String> = Vec::new();
    if !description.is_empty() {
        parts.push(description);
    }
    parts.extend(EMIT_ORDER.iter().filter_map(|g| render_group(*g, fields)));
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_marker_table_compiles() {
        assert!(MARKER_RE.captures_len() > MARKERS.len());
    }

    #[test]
    fn test_tags_left_to_right() {
        let parsed = parse_markers("Plan #work trip #travel-2024 and #a_b");
        assert_eq!(parsed.fields.tags, vec!["work", "travel-2024", "a_b"]);
        assert_eq!(parsed.clean_text, "Plan trip and");
    }

    #[test]
    fn test_linked_note_alias_discarded() {
        let parsed = parse_markers("See [[ Meeting Notes |the meeting]] and [[Plan]]");
        assert_eq!(parsed.fields.linked_notes, vec!["Meeting Notes", "Plan"]);
        assert_eq!(parsed.clean_text, "See and");
    }

    #[test]
    fn test_blank_link_is_stripped_but_not_kept() {
        let parsed = parse_markers("Odd [[ ]] link");
        assert!(parsed.fields.linked_notes.is_empty());
        assert_eq!(parsed.clean_text, "Odd link");
    }

    #[test]
    fn test_hash_inside_link_is_not_a_tag() {
        let parsed = parse_markers("Read [[C# Notes]] #dev");
        assert_eq!(parsed.fields.linked_notes, vec!["C# Notes"]);
        assert_eq!(parsed.fields.tags, vec!["dev"]);
    }

    #[test]
    fn test_all_three_dates() {
        let parsed = parse_markers("Ship 🛫 2024-01-02 ⏰2024-01-05 📅 2024-01-10");
        assert_eq!(parsed.fields.start_date, Some(date("2024-01-02")));
        assert_eq!(parsed.fields.scheduled_date, Some(date("2024-01-05")));
        assert_eq!(parsed.fields.due_date, Some(date("2024-01-10")));
        assert_eq!(parsed.clean_text, "Ship");
    }

    #[test]
    fn test_first_date_of_a_kind_wins() {
        let parsed = parse_markers("Pay 📅 2024-05-01 📅 2024-06-01");
        assert_eq!(parsed.fields.due_date, Some(date("2024-05-01")));
        assert_eq!(parsed.clean_text, "Pay");
    }

    #[test]
    fn test_malformed_date_left_in_text() {
        let parsed = parse_markers("Pay 📅 2024-5-1");
        assert_eq!(parsed.fields.due_date, None);
        assert_eq!(parsed.clean_text, "Pay 📅 2024-5-1");
    }

    #[test]
    fn test_impossible_calendar_date_claims_the_field() {
        let parsed = parse_markers("Pay 📅 2024-02-30 📅 2024-03-01");
        assert_eq!(parsed.fields.due_date, None);
        assert_eq!(parsed.clean_text, "Pay");

        let tokens = scan_markers("Pay 📅 2024-02-30");
        assert_eq!(tokens[0].marker, Marker::Date(DateField::Due, None));
        assert_eq!(clean_text("Pay 📅 2024-02-30"), "Pay");
    }

    #[test]
    fn test_impossible_date_does_not_block_other_kinds() {
        let parsed = parse_markers("Trip 🛫 2024-13-01 📅 2024-04-01");
        assert_eq!(parsed.fields.start_date, None);
        assert_eq!(parsed.fields.due_date, Some(date("2024-04-01")));
        assert_eq!(parsed.clean_text, "Trip");
    }

    #[test]
    fn test_priority_with_and_without_label() {
        assert_eq!(
            parse_markers("Fix 🔺 High now").fields.priority,
            Some(Priority::High)
        );
        assert_eq!(parse_markers("Fix 🔺 High now").clean_text, "Fix now");
        assert_eq!(parse_markers("Fix 🔽").fields.priority, Some(Priority::Low));
        assert_eq!(parse_markers("Fix").fields.priority, None);
    }

    #[test]
    fn test_priority_label_needs_word_boundary() {
        let parsed = parse_markers("Cook 🔼 Mediumrare steak");
        assert_eq!(parsed.fields.priority, Some(Priority::Medium));
        assert_eq!(parsed.clean_text, "Cook Mediumrare steak");
    }

    #[test]
    fn test_conflicting_priorities_most_urgent_wins() {
        let parsed = parse_markers("Mixed 🔽 🔺 🔼");
        assert_eq!(parsed.fields.priority, Some(Priority::High));
        assert_eq!(parsed.clean_text, "Mixed");
    }

    #[test]
    fn test_clean_text_never_fuses_markers() {
        // Removing the link must not glue '#' and 'tag' together.
        let once = clean_text("odd #[[x]]tag here");
        assert_eq!(once, "odd # tag here");
        assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn test_clean_text_is_idempotent() {
        let samples = [
            "Write report #work 📅 2024-03-01",
            "  spaced   out\ttext  ",
            "📅[[a]] 2024-01-01 tail",
            "Call client [[Client Notes]] 🔼",
            "# heading-ish #tag",
        ];
        for sample in samples {
            let once = clean_text(sample);
            assert_eq!(clean_text(&once), once, "not a fixed point: {:?}", sample);
            assert!(scan_markers(&once).is_empty(), "markers left in {:?}", once);
        }
    }

    #[test]
    fn test_emit_fixed_order() {
        let fields = MarkerFields {
            tags: vec!["work".into(), "#urgent".into()],
            linked_notes: vec!["A".into(), "B".into()],
            start_date: Some(date("2024-01-01")),
            scheduled_date: Some(date("2024-01-02")),
            due_date: Some(date("2024-01-03")),
            priority: Some(Priority::High),
        };
        assert_eq!(
            emit_task_text("Do it", &fields),
            "Do it [[A]] [[B]] 🛫 2024-01-01 ⏰ 2024-01-02 📅 2024-01-03 🔺 #work #urgent"
        );
    }

    #[test]
    fn test_emit_omits_empty_groups() {
        assert_eq!(emit_task_text("  Just text ", &MarkerFields::default()), "Just text");
        let fields = MarkerFields {
            tags: vec!["solo".into()],
            ..Default::default()
        };
        assert_eq!(emit_task_text("", &fields), "#solo");
    }

    #[test]
    fn test_emit_keeps_description_on_one_line() {
        let fields = MarkerFields {
            tags: vec!["work".into()],
            ..Default::default()
        };
        assert_eq!(
            emit_task_text("first\nsecond\r\n  third", &fields),
            "first second third #work"
        );
    }

    #[test]
    fn test_emit_sanitizes_link_and_tag_values() {
        let fields = MarkerFields {
            tags: vec!["#two words".into(), "ok-tag".into(), "!!".into()],
            linked_notes: vec!["A]]b|c".into(), "[[Plan".into()],
            ..Default::default()
        };
        let text = emit_task_text("Read [[", &fields);
        assert_eq!(text, "Read [[ [[A b c]] [[Plan]] #twowords #ok-tag");

        let parsed = parse_markers(&text);
        assert_eq!(parsed.fields.linked_notes, vec!["A b c", "Plan"]);
        assert_eq!(parsed.fields.tags, vec!["twowords", "ok-tag"]);
    }

    #[test]
    fn test_unclosed_brackets_do_not_swallow_a_link() {
        let parsed = parse_markers("Odd [[ [[A]] text");
        assert_eq!(parsed.fields.linked_notes, vec!["A"]);
        assert_eq!(parsed.clean_text, "Odd [[ text");
    }

    #[test]
    fn test_emit_then_parse_recovers_fields() {
        let fields = MarkerFields {
            tags: vec!["home".into()],
            linked_notes: vec!["Groceries".into()],
            due_date: Some(date("2025-12-24")),
            priority: Some(Priority::Low),
            ..Default::default()
        };
        let parsed = parse_markers(&emit_task_text("Buy milk", &fields));
        assert_eq!(parsed.fields, fields);
        assert_eq!(parsed.clean_text, "Buy milk");
    }
}
