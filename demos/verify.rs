//! Verify Example - A four-digit code entry in the terminal
//!
//! This example demonstrates:
//! - Mounting an OTP field with terminal "cells" as focus handles
//! - Routing crossterm key and bracketed-paste events to the field
//! - Drawing each cell from its resolved `CellVisual`
//! - Watching completion with an effect
//!
//! Type digits, Backspace to delete, arrows to move, paste a code to fill.
//! Press Esc or Ctrl+C to exit.
//!
//! Run with: cargo run --example verify

use std::cell::Cell;
use std::io::{stdout, Write};
use std::rc::Rc;
use std::time::Duration;

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{cursor, queue};
use spark_otp::state::input::{disable_bracketed_paste, enable_bracketed_paste, poll_event};
use spark_otp::{otp_field, InputEvent, OtpField, OtpProps, Rgba};
use spark_signals::effect;

const CELLS: usize = 4;

fn to_color(color: Rgba) -> Color {
    if color.is_terminal_default() {
        Color::Reset
    } else if color.is_ansi() {
        Color::AnsiValue(color.g as u8)
    } else {
        Color::Rgb {
            r: color.r as u8,
            g: color.g as u8,
            b: color.b as u8,
        }
    }
}

fn draw(field: &OtpField, status: &str) -> std::io::Result<()> {
    let mut out = stdout();
    queue!(out, cursor::MoveTo(0, 0), Clear(ClearType::All))?;
    queue!(out, Print("Enter the code we sent you"))?;

    let mut x = 0u16;
    for index in 0..field.cell_count() {
        let visual = field.cell_visual(index);
        let style = visual.style;
        let border_style = style.border.unwrap_or_default();
        let width = style.width.unwrap_or(5);
        let inner = width.saturating_sub(2 * border_style.width()) as usize;
        let (h, v, tl, tr, br, bl) = border_style.chars();
        let border = to_color(style.border_color.unwrap_or(Rgba::TERMINAL_DEFAULT));
        let text = format!("{:^inner$}", visual.text);

        queue!(out, SetForegroundColor(border))?;
        queue!(out, cursor::MoveTo(x, 2), Print(format!("{tl}{}{tr}", h.repeat(inner))))?;
        queue!(out, cursor::MoveTo(x, 3), Print(v))?;
        queue!(out, SetForegroundColor(to_color(style.fg.unwrap_or(Rgba::TERMINAL_DEFAULT))))?;
        queue!(out, Print(text))?;
        queue!(out, SetForegroundColor(border), Print(v))?;
        queue!(out, cursor::MoveTo(x, 4), Print(format!("{bl}{}{br}", h.repeat(inner))))?;
        queue!(out, ResetColor)?;

        x += width + style.margin_right.unwrap_or(0);
    }

    queue!(out, cursor::MoveTo(0, 6), Print(status))?;
    out.flush()
}

fn run(field: &OtpField, done: &Rc<Cell<bool>>) -> std::io::Result<()> {
    draw(field, "")?;
    loop {
        let Some(event) = poll_event(Duration::from_millis(50))? else {
            continue;
        };

        if let InputEvent::Key(ref key) = event {
            let ctrl_c = key.modifiers.ctrl && key.key == "c";
            if key.key == "Escape" || ctrl_c {
                return Ok(());
            }
        }

        if field.route_event(&event) {
            let status = if done.get() {
                format!("Verifying {}...", field.code())
            } else {
                String::new()
            };
            draw(field, &status)?;
        }
    }
}

fn main() -> std::io::Result<()> {
    let field = otp_field(OtpProps {
        active_border_color: Some(Rgba::BLUE.into()),
        inactive_border_color: Some(Rgba::GRAY.into()),
        ..OtpProps::from_initial(vec![String::new(); CELLS], CELLS)
    });

    // Terminal cells can't hold focus themselves: a focus request is
    // reported straight back as gained.
    let mut cleanups = Vec::new();
    for index in 0..CELLS {
        let host = field.clone();
        cleanups.push(field.register_cell(index, Rc::new(move || host.on_focus_gained(index))));
    }
    field.mount();

    let done = Rc::new(Cell::new(false));
    let done_clone = done.clone();
    let watched = field.clone();
    let _stop = effect(move || done_clone.set(watched.is_complete()));

    terminal::enable_raw_mode()?;
    enable_bracketed_paste()?;
    queue!(stdout(), cursor::Hide)?;

    let result = run(&field, &done);

    queue!(stdout(), cursor::Show, cursor::MoveTo(0, 8))?;
    disable_bracketed_paste()?;
    terminal::disable_raw_mode()?;
    for cleanup in cleanups {
        cleanup();
    }

    result?;
    println!("Code: {}", field.code());
    Ok(())
}
