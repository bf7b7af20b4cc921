use anyhow::Context;
use std::io::{BufRead, Write};

use crate::loader::{Item, LoadOutcome};
use crate::render;
use crate::session::{Phase, SessionState};

const QUIT: &str = "q";
const RESTART: &str = "r";
const NEXT: &str = "s";

/// Drives one quiz session over a line-based input until it ends or the user
/// quits. Returns the session as it was left.
pub fn run<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    outcome: &LoadOutcome,
) -> anyhow::Result<SessionState> {
    let items = outcome.items.as_slice();
    let mut state = SessionState::new();

    write!(output, "{}", render::header())?;
    if outcome.used_fallback() {
        write!(output, "{}", render::load_warning(&outcome.diagnostics))?;
    }
    show_current(output, &state, items)?;

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        let command = line.trim();

        if command.eq_ignore_ascii_case(QUIT) {
            break;
        }
        if command.eq_ignore_ascii_case(RESTART) {
            state.reset();
            show_current(output, &state, items)?;
            continue;
        }

        match state.phase(items) {
            Phase::Answering => answer(output, &mut state, items, command)?,
            Phase::Answered => {
                if command.is_empty() || command.eq_ignore_ascii_case(NEXT) {
                    state.advance(items)?;
                    show_current(output, &state, items)?;
                } else {
                    write!(output, "Presiona Enter para continuar: ")?;
                }
            }
            Phase::Finished => show_current(output, &state, items)?,
        }
        output.flush()?;
    }

    writeln!(output)?;
    Ok(state)
}

fn answer<W: Write>(
    output: &mut W,
    state: &mut SessionState,
    items: &[Item],
    command: &str,
) -> anyhow::Result<()> {
    let Some(item) = state.current_item(items) else {
        return Ok(());
    };
    let choice = selected_option(item, command);

    match state.submit_answer(items, choice) {
        Ok(feedback) => {
            let is_last = state.current_index + 1 == items.len();
            write!(output, "{}", render::feedback(&feedback, is_last))?;
        }
        Err(e) if e.is_user_input() => {
            write!(output, "{}", render::prompt_for_selection(item.options.len()))?;
        }
        Err(e) => writeln!(output, "{}", e)?,
    }
    Ok(())
}

/// Option numbers are 1-based on screen; typing the option text also works.
fn selected_option<'a>(item: &'a Item, command: &'a str) -> Option<&'a str> {
    if command.is_empty() {
        return None;
    }
    match command.parse::<usize>() {
        Ok(n) if (1..=item.options.len()).contains(&n) => Some(item.options[n - 1].as_str()),
        _ => Some(command),
    }
}

fn show_current<W: Write>(
    output: &mut W,
    state: &SessionState,
    items: &[Item],
) -> anyhow::Result<()> {
    match state.phase(items) {
        Phase::Answering => {
            if let Some(item) = state.current_item(items) {
                write!(output, "{}", render::question(item, state.current_index, items.len()))?;
            }
        }
        Phase::Answered => {}
        Phase::Finished => {
            if let Some(summary) = state.summary(items) {
                write!(output, "{}", render::summary(&summary))?;
            }
        }
    }
    output.flush()?;
    Ok(())
}
