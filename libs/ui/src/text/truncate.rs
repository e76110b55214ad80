//! Fixed-width splitting and ellipsis truncation
//!
//! Lengths are counted in characters. Data that fits into `lines * width`
//! characters is never touched.

use std::borrow::Cow;

use super::ELLIPSIS;

/// Which part of an over-long value survives truncation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Truncation {
    /// Keep the beginning
    #[default]
    Tail,
    /// Keep the beginning and the end, drop the middle
    Middle,
}

/// Truncation was asked to keep a negative number of characters
#[derive(Debug)]
struct LayoutOverflow {
    budget: usize,
}

/// Split `s` into pieces of `width` characters; the last one may be shorter
pub fn chunks(s: &str, width: usize) -> Vec<&str> {
    let width = width.max(1);
    let mut pieces = Vec::new();
    let mut rest = s;
    while !rest.is_empty() {
        let (head, tail) = rest.split_at(char_boundary(rest, width));
        pieces.push(head);
        rest = tail;
    }
    pieces
}

/// Shorten `data` to at most `lines * width` characters
pub fn truncate(data: &str, lines: usize, width: usize, mode: Truncation) -> Cow<'_, str> {
    let budget = lines.saturating_mul(width);
    let len = data.chars().count();
    // Exactly filling the area still fits: 72 hex characters on 4 lines of 18
    if len <= budget {
        return Cow::Borrowed(data);
    }

    let shortened = match mode {
        Truncation::Tail => tail_bounds(budget)
            .map(|head| format!("{}{ELLIPSIS}", &data[..char_boundary(data, head)])),
        Truncation::Middle => middle_bounds(budget).map(|(head, tail)| {
            let prefix = &data[..char_boundary(data, head)];
            let suffix = &data[char_boundary(data, len - tail)..];
            format!("{prefix}{ELLIPSIS}{suffix}")
        }),
    };

    match shortened {
        Ok(shortened) => Cow::Owned(shortened),
        Err(overflow) => {
            log::warn!("{len} characters do not fit a {overflow:?} area, showing ellipsis only");
            Cow::Owned(ELLIPSIS.chars().take(budget).collect())
        }
    }
}

/// Truncate and split into display lines
pub fn truncate_hex(data: &str, lines: usize, width: usize, mode: Truncation) -> Vec<String> {
    chunks(&truncate(data, lines, width, mode), width)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Split a derivation path at `/` so that no line exceeds `per_line`
/// characters. Separators start the following line.
pub fn break_path_to_lines(path: &str, per_line: usize) -> Vec<String> {
    let per_line = per_line.max(1);
    let mut lines = Vec::new();
    let mut rest = path;
    while rest.chars().count() > per_line {
        let limit = char_boundary(rest, per_line);
        let split = match rest[..limit].rfind('/') {
            Some(index) if index > 0 => index,
            _ => limit,
        };
        lines.push(rest[..split].to_string());
        rest = &rest[split..];
    }
    lines.push(rest.to_string());
    lines
}

fn tail_bounds(budget: usize) -> Result<usize, LayoutOverflow> {
    budget
        .checked_sub(ELLIPSIS.len())
        .ok_or(LayoutOverflow { budget })
}

/// Characters kept before and after the ellipsis
fn middle_bounds(budget: usize) -> Result<(usize, usize), LayoutOverflow> {
    let head = (budget / 2).checked_sub(1);
    let tail = budget.div_ceil(2).checked_sub(2);
    head.zip(tail).ok_or(LayoutOverflow { budget })
}

/// Byte index after the first `count` characters
fn char_boundary(s: &str, count: usize) -> usize {
    s.char_indices().nth(count).map_or(s.len(), |(index, _)| index)
}
