//! Interactive shell over a [`Resolver`].
//!
//! The line is re-resolved after every key press and redrawn with one color
//! per character category.
//!
//! # Key Features
//!
//! - Tab completes the word being typed or lists the alternatives
//! - `?` at the end of the line lists the parameters of the typed command,
//!   or matching commands
//! - Enter reports the bound command, or suggests the closest one
//! - Ctrl-C, or Ctrl-D on an empty line, leaves the shell

use std::io::{stdout, Write};

use crossterm::event::{self, Event, KeyEvent};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::debug;

use cmdtree_core::dictionary::Mask;
use cmdtree_core::error::Result;
use cmdtree_core::resolver::Resolver;

pub mod colors;
pub mod editor;
pub mod render;
pub mod report;

use colors::Theme;
use editor::{Action, LineEditor};

struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Shell session state besides the terminal.
pub struct Session<'a> {
    resolver: &'a mut Resolver,
    editor: LineEditor,
    mask: Mask,
    prompt: String,
    theme: Theme,
}

impl<'a> Session<'a> {
    pub fn new(resolver: &'a mut Resolver, mask: Mask, prompt: &str, theme: Theme) -> Self {
        Self {
            resolver,
            editor: LineEditor::new(),
            mask,
            prompt: prompt.to_string(),
            theme,
        }
    }

    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    pub fn handle_key(&mut self, key_event: KeyEvent) -> Action {
        self.editor.handle_key(key_event)
    }

    fn sync(&mut self) -> Result<()> {
        self.resolver
            .set_line_with_cursor(self.editor.line(), self.editor.cursor());
        self.resolver.resolve(self.mask)?;
        Ok(())
    }

    /// Applies one editor action. Returns `false` once the session ends.
    pub fn apply<W: Write>(&mut self, out: &mut W, action: Action) -> Result<bool> {
        match action {
            Action::Edited | Action::Ignored => {}
            Action::Complete => {
                self.sync()?;
                let completion = self.resolver.complete(self.mask)?;
                self.editor.set(self.resolver.line(), self.resolver.cursor());
                if !completion.candidates.is_empty() {
                    render::print_candidates(out, &completion, &self.theme)?;
                }
            }
            Action::Help if self.editor.cursor() < self.editor.line().len() => {}
            Action::Help => {
                self.sync()?;
                render::print_lines(out, &self.resolver.help().to_string())?;
            }
            Action::Submit(line) => {
                self.resolver.set_line(&line);
                self.resolver.resolve(self.mask)?;
                debug!("Submitted `{}`: {}", line, self.resolver.status());
                render::print_lines(out, &report::report(self.resolver, self.mask))?;
            }
            Action::Terminate => {
                render::print_lines(out, "")?;
                out.flush()?;
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Redraws the input line from the editor state.
    pub fn redraw<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.sync()?;
        let segments = render::segments(self.resolver.line(), self.resolver.characters());
        render::draw_line(
            out,
            &self.prompt,
            &segments,
            &self.theme,
            self.editor.display_cursor(),
        )
    }
}

/// Runs the shell until the user leaves it.
///
/// # Errors
///
/// Returns an error if the terminal cannot be driven or a resolution fails.
pub fn run(resolver: &mut Resolver, mask: Mask, prompt: &str, theme: Theme) -> Result<()> {
    let mut stdout = stdout();
    enable_raw_mode()?;
    let _raw_mode_guard = RawModeGuard;

    let mut session = Session::new(resolver, mask, prompt, theme);
    session.redraw(&mut stdout)?;

    loop {
        let action = match event::read()? {
            Event::Key(key_event) => session.handle_key(key_event),
            Event::Resize(_, _) => Action::Edited,
            _ => continue,
        };
        if action == Action::Ignored {
            continue;
        }
        if !session.apply(&mut stdout, action)? {
            return Ok(());
        }
        session.redraw(&mut stdout)?;
    }
}
