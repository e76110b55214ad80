//! Bounded text layout
//!
//! `TextLayout` collects styled spans and breaks, and `finalize` turns them
//! into at most `max_lines` lines of at most `width_px` pixels each. Fonts
//! have a fixed advance per kind, so a fragment's visual width is its
//! character count times the advance. Content that does not fit is dropped
//! and the last visible line ends in `"..."`.
//!
//! Vertical positions are counted in half lines: a text line occupies two
//! units, `half_line_break` adds one.

pub mod truncate;

use crate::constants::{BOLD_ADVANCE, MONO_ADVANCE, NORMAL_ADVANCE, TEXT_MAX_LINES, WIDTH};

pub use truncate::{Truncation, break_path_to_lines, chunks, truncate, truncate_hex};

const ELLIPSIS: &str = "...";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Normal,
    Bold,
    Mono,
}

/// A run of text rendered in one font
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextSpan {
    pub kind: SpanKind,
    pub text: String,
    /// Font used for rendering instead of the one implied by `kind`
    pub font_override: Option<SpanKind>,
}

impl TextSpan {
    #[must_use]
    pub fn new(kind: SpanKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            font_override: None,
        }
    }

    #[must_use]
    pub fn with_font_override(mut self, font: SpanKind) -> Self {
        self.font_override = Some(font);
        self
    }

    /// The font this span is drawn with
    pub fn font(&self) -> SpanKind {
        self.font_override.unwrap_or(self.kind)
    }

    pub fn visual_width(&self, metrics: &LayoutMetrics) -> u32 {
        char_count(&self.text) * metrics.advance(self.font())
    }

    fn same_style(&self, other: &Self) -> bool {
        self.kind == other.kind && self.font_override == other.font_override
    }
}

/// Line budget and glyph advances of a text area
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutMetrics {
    pub max_lines: usize,
    pub width_px: u32,
    pub normal_advance: u32,
    pub bold_advance: u32,
    pub mono_advance: u32,
}

impl LayoutMetrics {
    /// Full-width text area of the 128x64 display
    pub const T1: Self = Self {
        max_lines: TEXT_MAX_LINES,
        width_px: WIDTH,
        normal_advance: NORMAL_ADVANCE,
        bold_advance: BOLD_ADVANCE,
        mono_advance: MONO_ADVANCE,
    };

    #[must_use]
    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    pub fn advance(&self, font: SpanKind) -> u32 {
        match font {
            SpanKind::Normal => self.normal_advance,
            SpanKind::Bold => self.bold_advance,
            SpanKind::Mono => self.mono_advance,
        }
    }

    /// Characters of `font` that fit on one line (W)
    pub fn chars_per_line(&self, font: SpanKind) -> usize {
        (self.width_px / self.advance(font).max(1)) as usize
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::T1
    }
}

/// One laid-out line of text
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<TextSpan>,
    /// Distance from the top of the text area in half lines
    pub offset: usize,
}

impl Line {
    pub fn width(&self, metrics: &LayoutMetrics) -> u32 {
        self.spans.iter().map(|span| span.visual_width(metrics)).sum()
    }

    /// Plain text of the line without styling
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Result of `TextLayout::finalize`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    pub lines: Vec<Line>,
    /// Content was dropped to stay within the line budget
    pub truncated: bool,
}

impl Layout {
    pub fn read_content(&self) -> Vec<String> {
        self.lines.iter().map(Line::text).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Item {
    Span(TextSpan),
    RawLine(String),
    /// Start a fresh line unless the current one is empty
    NewLine,
    Break,
    HalfBreak,
}

/// Accumulates spans in append order until `finalize`
#[derive(Clone, Debug)]
pub struct TextLayout {
    items: Vec<Item>,
    new_lines: bool,
    metrics: LayoutMetrics,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayout {
    /// Layout where every appended span starts on a fresh line
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            new_lines: true,
            metrics: LayoutMetrics::T1,
        }
    }

    /// Spans continue on the current line instead of starting a new one
    #[must_use]
    pub fn inline(mut self) -> Self {
        self.new_lines = false;
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: LayoutMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub fn append(&mut self, kind: SpanKind, text: &str) -> &mut Self {
        self.items.push(Item::Span(TextSpan::new(kind, text)));
        self
    }

    pub fn normal(&mut self, text: &str) -> &mut Self {
        self.append(SpanKind::Normal, text)
    }

    pub fn bold(&mut self, text: &str) -> &mut Self {
        self.append(SpanKind::Bold, text)
    }

    pub fn mono(&mut self, text: &str) -> &mut Self {
        self.append(SpanKind::Mono, text)
    }

    /// Append `template` with its first `{}` replaced by `param` drawn in
    /// `param_font`. A template without placeholder is appended unchanged.
    pub fn append_parametrized(
        &mut self,
        template: &str,
        param: &str,
        param_font: SpanKind,
    ) -> &mut Self {
        let Some((before, after)) = template.split_once("{}") else {
            return self.normal(template);
        };
        let new_lines = std::mem::replace(&mut self.new_lines, false);
        if new_lines {
            self.items.push(Item::NewLine);
        }
        self.normal(before);
        self.items.push(Item::Span(
            TextSpan::new(SpanKind::Normal, param).with_font_override(param_font),
        ));
        self.normal(after);
        self.new_lines = new_lines;
        self
    }

    /// Append pre-split lines (hex or address chunks), one per line
    pub fn append_raw_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> &mut Self {
        self.items.extend(
            lines
                .iter()
                .map(|line| Item::RawLine(line.as_ref().to_string())),
        );
        self
    }

    pub fn line_break(&mut self) -> &mut Self {
        self.items.push(Item::Break);
        self
    }

    pub fn half_line_break(&mut self) -> &mut Self {
        self.items.push(Item::HalfBreak);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn finalize(&self) -> Layout {
        self.finalize_with(&self.metrics)
    }

    /// Lay out with `metrics` in place of the builder's own
    pub fn finalize_with(&self, metrics: &LayoutMetrics) -> Layout {
        let mut cursor = Cursor::new(metrics, metrics.max_lines.saturating_mul(2));
        let mut truncated = false;

        for item in &self.items {
            let placed = match item {
                Item::Span(span) => {
                    if self.new_lines {
                        cursor.wrap();
                    }
                    cursor.place_span(span)
                }
                Item::RawLine(line) => {
                    cursor.wrap();
                    let placed = cursor.place_word(&TextSpan::new(SpanKind::Mono, line.as_str()));
                    cursor.wrap();
                    placed
                }
                Item::NewLine => {
                    cursor.wrap();
                    Ok(())
                }
                Item::Break => {
                    cursor.line_break();
                    Ok(())
                }
                Item::HalfBreak => {
                    cursor.half_line_break();
                    Ok(())
                }
            };
            if placed.is_err() {
                truncated = true;
                break;
            }
        }

        cursor.wrap();
        let mut lines = cursor.lines;
        if truncated {
            log::debug!("text truncated after {} lines", lines.len());
            append_ellipsis(&mut lines, metrics);
        }
        Layout { lines, truncated }
    }

    /// Rows a single span occupies when the line budget is unlimited
    pub fn count_lines(kind: SpanKind, text: &str, metrics: &LayoutMetrics) -> usize {
        let mut cursor = Cursor::new(metrics, usize::MAX);
        // Unlimited budget: placement cannot overflow
        let _ = cursor.place_span(&TextSpan::new(kind, text));
        cursor.wrap();
        cursor.y.div_ceil(2)
    }
}

/// Next row would exceed the line budget
#[derive(Debug)]
struct Overflow;

struct Cursor<'m> {
    metrics: &'m LayoutMetrics,
    lines: Vec<Line>,
    current: Line,
    x: u32,
    y: usize,
    budget: usize,
}

impl<'m> Cursor<'m> {
    fn new(metrics: &'m LayoutMetrics, budget: usize) -> Self {
        Self {
            metrics,
            lines: Vec::new(),
            current: Line::default(),
            x: 0,
            y: 0,
            budget,
        }
    }

    /// Finish the current line if it has content
    fn wrap(&mut self) {
        trim_trailing_spaces(&mut self.current);
        if !self.current.is_empty() {
            let mut line = std::mem::take(&mut self.current);
            line.offset = self.y;
            self.lines.push(line);
            self.y = self.y.saturating_add(2);
        }
        self.x = 0;
    }

    fn line_break(&mut self) {
        if self.current.is_empty() {
            self.y = self.y.saturating_add(2);
        } else {
            self.wrap();
        }
    }

    fn half_line_break(&mut self) {
        self.wrap();
        self.y = self.y.saturating_add(1);
    }

    fn place_span(&mut self, span: &TextSpan) -> Result<(), Overflow> {
        for (i, segment) in span.text.split('\n').enumerate() {
            if i > 0 {
                self.line_break();
            }
            for (j, word) in segment.split(' ').enumerate() {
                let word = TextSpan {
                    text: word.to_string(),
                    ..span.clone()
                };
                if j == 0 {
                    self.place_word(&word)?;
                } else {
                    self.place_spaced_word(&word)?;
                }
            }
        }
        Ok(())
    }

    /// Place a word that was preceded by a space in the source text
    fn place_spaced_word(&mut self, word: &TextSpan) -> Result<(), Overflow> {
        let advance = self.metrics.advance(word.font());
        let space = TextSpan {
            text: " ".to_string(),
            ..word.clone()
        };
        if self.x == 0 {
            return self.place_word(word);
        }
        if self.x + advance + word.visual_width(self.metrics) <= self.metrics.width_px {
            self.emit(&space)?;
            return self.emit(word);
        }
        if word.text.is_empty() {
            // Trailing space that no longer fits is swallowed by the wrap
            if self.x + advance <= self.metrics.width_px {
                self.emit(&space)?;
            }
            return Ok(());
        }
        // The separating space is not dropped: the word goes to the next line
        self.wrap();
        self.place_word(word)
    }

    fn place_word(&mut self, word: &TextSpan) -> Result<(), Overflow> {
        if word.text.is_empty() {
            return Ok(());
        }
        let width = word.visual_width(self.metrics);
        if self.x + width <= self.metrics.width_px {
            return self.emit(word);
        }
        if width <= self.metrics.width_px {
            self.wrap();
            return self.emit(word);
        }

        // Wider than a whole line: split at character boundaries
        let advance = self.metrics.advance(word.font()).max(1);
        let mut rest = word.text.as_str();
        while !rest.is_empty() {
            let mut room = (self.metrics.width_px.saturating_sub(self.x) / advance) as usize;
            if room == 0 {
                if self.x > 0 {
                    self.wrap();
                    continue;
                }
                room = 1;
            }
            let split = rest
                .char_indices()
                .nth(room)
                .map_or(rest.len(), |(index, _)| index);
            let (head, tail) = rest.split_at(split);
            self.emit(&TextSpan {
                text: head.to_string(),
                ..word.clone()
            })?;
            rest = tail;
        }
        Ok(())
    }

    fn emit(&mut self, fragment: &TextSpan) -> Result<(), Overflow> {
        if self.current.is_empty() && self.y.saturating_add(2) > self.budget {
            return Err(Overflow);
        }
        self.x += fragment.visual_width(self.metrics);
        match self.current.spans.last_mut() {
            Some(last) if last.same_style(fragment) => last.text.push_str(&fragment.text),
            _ => self.current.spans.push(fragment.clone()),
        }
        Ok(())
    }
}

fn append_ellipsis(lines: &mut [Line], metrics: &LayoutMetrics) {
    let Some(last) = lines.last_mut() else {
        return;
    };
    let template = last
        .spans
        .last()
        .cloned()
        .unwrap_or_else(|| TextSpan::new(SpanKind::Normal, ""));
    let needed = char_count(ELLIPSIS) * metrics.advance(template.font());

    while last.width(metrics) + needed > metrics.width_px {
        let Some(span) = last.spans.last_mut() else {
            break;
        };
        span.text.pop();
        if span.text.is_empty() {
            last.spans.pop();
        }
    }

    match last.spans.last_mut() {
        Some(span) if span.same_style(&template) => span.text.push_str(ELLIPSIS),
        _ => last.spans.push(TextSpan {
            text: ELLIPSIS.to_string(),
            ..template
        }),
    }
}

fn trim_trailing_spaces(line: &mut Line) {
    while let Some(span) = line.spans.last_mut() {
        let kept = span.text.trim_end_matches(' ').len();
        if kept > 0 {
            span.text.truncate(kept);
            break;
        }
        line.spans.pop();
    }
}

fn char_count(text: &str) -> u32 {
    u32::try_from(text.chars().count()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn texts(layout: &Layout) -> Vec<String> {
        layout.read_content()
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let mut text = TextLayout::new();
        text.normal("You should back up your new wallet right now.");
        let layout = text.finalize();

        assert!(!layout.truncated);
        assert_eq!(
            texts(&layout),
            vec!["You should back up", "your new wallet right", "now."]
        );
        for line in &layout.lines {
            assert!(line.width(&LayoutMetrics::T1) <= WIDTH);
        }
    }

    #[test]
    fn word_that_fits_only_without_its_space_wraps() {
        // 17 + 4 characters fill the 21 columns exactly, the space does not fit
        let mut text = TextLayout::new();
        text.normal("aaaaaaaaaaaaaaaaa bbbb");
        let layout = text.finalize();

        assert_eq!(texts(&layout), vec!["aaaaaaaaaaaaaaaaa", "bbbb"]);
    }

    #[test]
    fn wrapping_never_joins_words() {
        let mut text = TextLayout::new();
        text.normal("the funds held in this account");
        let joined = texts(&text.finalize()).join(" ");

        assert_eq!(joined, "the funds held in this account");
    }

    #[test]
    fn splits_words_longer_than_a_line() {
        let mut text = TextLayout::new();
        text.normal("abcdefghijklmnopqrstuvwxyz");
        let layout = text.finalize();

        assert_eq!(texts(&layout), vec!["abcdefghijklmnopqrstu", "vwxyz"]);
    }

    #[test]
    fn overflow_drops_content_and_marks_last_line() {
        let mut text = TextLayout::new();
        for i in 0..6 {
            text.normal(&format!("line number {i}"));
        }
        let layout = text.finalize();

        assert!(layout.truncated);
        assert_eq!(layout.lines.len(), TEXT_MAX_LINES);
        assert_eq!(layout.lines[3].text(), "line number 3...");
    }

    #[test]
    fn ellipsis_trims_a_full_last_line() {
        let mut text = TextLayout::new();
        let chunk = "0123456789abcdef01";
        text.append_raw_lines(&[chunk, chunk, chunk, chunk, chunk]);
        let layout = text.finalize();

        assert!(layout.truncated);
        let last = layout.lines.last().unwrap();
        assert_eq!(last.text(), "0123456789abcde...");
        assert!(last.width(&LayoutMetrics::T1) <= WIDTH);
    }

    #[test]
    fn content_that_fits_is_not_truncated() {
        let mut text = TextLayout::new();
        text.normal("one").normal("two").normal("three").normal("four");
        let layout = text.finalize();

        assert!(!layout.truncated);
        assert_eq!(texts(&layout), vec!["one", "two", "three", "four"]);
        let offsets: Vec<usize> = layout.lines.iter().map(|line| line.offset).collect();
        assert_eq!(offsets, vec![0, 2, 4, 6]);
    }

    #[test]
    fn half_break_after_break_keeps_its_own_gap() {
        let mut text = TextLayout::new().inline();
        text.bold("New wallet");
        text.line_break();
        text.half_line_break();
        text.normal("Back it up");
        let layout = text.finalize();

        assert_eq!(layout.lines[0].offset, 0);
        assert_eq!(layout.lines[1].offset, 3);
    }

    #[test]
    fn half_breaks_consume_budget() {
        let mut text = TextLayout::new();
        text.normal("a");
        text.half_line_break();
        text.half_line_break();
        text.normal("b");
        text.normal("c");
        text.normal("d");
        let layout = text.finalize();

        assert!(layout.truncated);
        assert_eq!(texts(&layout), vec!["a", "b", "c..."]);
    }

    #[test]
    fn repeated_breaks_leave_blank_rows() {
        let mut text = TextLayout::new().inline();
        text.normal("top");
        text.line_break();
        text.line_break();
        text.normal("bottom");
        let layout = text.finalize();

        assert_eq!(layout.lines[1].offset, 4);
    }

    #[test]
    fn inline_spans_share_a_line() {
        let mut text = TextLayout::new().inline();
        text.normal("to ");
        text.bold("trezor.io/tos");
        let layout = text.finalize();

        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.lines[0].text(), "to trezor.io/tos");
        assert_eq!(layout.lines[0].spans.len(), 2);
        assert_eq!(layout.lines[0].spans[1].kind, SpanKind::Bold);
    }

    #[test]
    fn parametrized_param_uses_its_font() {
        let mut text = TextLayout::new().inline();
        text.append_parametrized("Send {} now", "1 BTC", SpanKind::Bold);
        let layout = text.finalize();

        let line = &layout.lines[0];
        assert_eq!(line.text(), "Send 1 BTC now");
        assert_eq!(line.spans[1].font(), SpanKind::Bold);
        assert_eq!(line.spans[1].kind, SpanKind::Normal);
    }

    #[test]
    fn empty_parameter_substitutes_nothing() {
        let mut text = TextLayout::new();
        text.append_parametrized("Fee: {}", "", SpanKind::Bold);
        let layout = text.finalize();

        assert_eq!(texts(&layout), vec!["Fee:"]);
    }

    #[test]
    fn template_without_placeholder_is_kept() {
        let mut text = TextLayout::new();
        text.append_parametrized("Really?", "ignored", SpanKind::Bold);
        assert_eq!(texts(&text.finalize()), vec!["Really?"]);
    }

    #[test]
    fn empty_input_produces_no_lines() {
        let layout = TextLayout::new().finalize();
        assert!(layout.lines.is_empty());
        assert!(!layout.truncated);

        let mut text = TextLayout::new();
        text.normal("");
        assert!(text.finalize().lines.is_empty());
    }

    #[test]
    fn newline_in_text_breaks_the_line() {
        let mut text = TextLayout::new();
        text.normal("first\nsecond");
        assert_eq!(texts(&text.finalize()), vec!["first", "second"]);
    }

    #[test]
    fn count_lines_reports_wrapped_rows() {
        let metrics = LayoutMetrics::T1;
        assert_eq!(TextLayout::count_lines(SpanKind::Normal, "", &metrics), 0);
        assert_eq!(TextLayout::count_lines(SpanKind::Normal, "short", &metrics), 1);
        assert_eq!(
            TextLayout::count_lines(
                SpanKind::Normal,
                "You should back up your new wallet right now.",
                &metrics
            ),
            3
        );
    }

    #[test]
    fn mono_lines_respect_mono_width() {
        let mut text = TextLayout::new();
        text.mono("bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq");
        let layout = text.finalize();

        for line in &layout.lines {
            assert!(line.text().chars().count() <= MONO_ADVANCE_CHARS);
        }
    }

    const MONO_ADVANCE_CHARS: usize = (WIDTH / MONO_ADVANCE) as usize;

    proptest! {
        #[test]
        fn wrapped_lines_rejoin_to_input(words in prop::collection::vec("[a-z]{1,21}", 1..30)) {
            let input = words.join(" ");
            let mut text = TextLayout::new().with_metrics(LayoutMetrics::T1.with_max_lines(usize::MAX / 4));
            text.normal(&input);
            let layout = text.finalize();

            prop_assert!(!layout.truncated);
            prop_assert_eq!(texts(&layout).join(" "), input);
            for line in &layout.lines {
                prop_assert!(line.width(&LayoutMetrics::T1) <= WIDTH);
            }
        }
    }
}
