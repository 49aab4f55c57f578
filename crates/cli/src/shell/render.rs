//! Drawing the input line and shell output.

use std::io::Write;

use cmdtree_core::completion::Completion;
use cmdtree_core::error::Result;
use cmdtree_core::resolver::{Category, CharClass};
use crossterm::style::{Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use itertools::Itertools;

use super::colors::Theme;

/// A run of characters sharing one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub category: Category,
    pub text: String,
}

/// Splits `line` into runs of equally classified characters.
pub fn segments(line: &str, characters: &[CharClass]) -> Vec<Segment> {
    let runs = characters
        .iter()
        .filter(|class| class.display_length > 0)
        .chunk_by(|class| class.category);

    runs.into_iter()
        .map(|(category, run)| Segment {
            category,
            text: run
                .filter_map(|class| line[class.offset..].chars().next())
                .collect(),
        })
        .collect()
}

/// Redraws the prompt and the colored line, and places the cursor.
pub fn draw_line<W: Write>(
    out: &mut W,
    prompt: &str,
    segments: &[Segment],
    theme: &Theme,
    display_cursor: usize,
) -> Result<()> {
    queue!(
        out,
        cursor::MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    for segment in segments {
        queue!(
            out,
            SetForegroundColor(theme.color(segment.category)),
            Print(&segment.text)
        )?;
    }

    let column = prompt.chars().count() + display_cursor;
    queue!(
        out,
        ResetColor,
        cursor::MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX))
    )?;
    out.flush()?;
    Ok(())
}

/// Prints `text` below the input line, one terminal line per text line.
pub fn print_lines<W: Write>(out: &mut W, text: &str) -> Result<()> {
    for line in text.lines() {
        queue!(out, cursor::MoveToNextLine(1), Print(line))?;
    }
    queue!(out, cursor::MoveToNextLine(1))?;
    Ok(())
}

/// Candidate lines, each the typed stem followed by the continuation. An
/// empty continuation is shown as `<cr>`.
pub fn candidate_lines(completion: &Completion) -> Vec<(String, String)> {
    completion
        .candidates
        .iter()
        .map(|candidate| {
            let continuation = if candidate.is_empty() {
                "<cr>".to_string()
            } else {
                candidate.clone()
            };
            (completion.stem.clone(), continuation)
        })
        .collect()
}

pub fn print_candidates<W: Write>(out: &mut W, completion: &Completion, theme: &Theme) -> Result<()> {
    for (stem, continuation) in candidate_lines(completion) {
        queue!(
            out,
            cursor::MoveToNextLine(1),
            Print(stem),
            SetForegroundColor(theme.color(Category::Completion)),
            Print(continuation),
            ResetColor
        )?;
    }
    queue!(out, cursor::MoveToNextLine(1))?;
    Ok(())
}
