use std::collections::VecDeque;
use std::io::BufRead;

use crate::selection::domain::selection::SelectionEvent;
use crate::selection::domain::selection_input::SelectionInput;

/// Reads selection events as text commands, one per line.
///
/// ```text
/// press X Y | drag X Y | release X Y
/// rect X1 Y1 X2 Y2        press, drag and release in one go
/// confirm | enter
/// reset | r
/// cancel | q
/// ```
///
/// Blank lines are skipped and malformed ones are logged and skipped.
/// End of input reads as `None`, which callers treat as a closed surface.
pub struct LineSelectionInput<R> {
    reader: R,
    pending: VecDeque<SelectionEvent>,
}

impl<R: BufRead + Send> LineSelectionInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }
}

impl<R: BufRead + Send> SelectionInput for LineSelectionInput<R> {
    fn next_event(&mut self) -> Option<SelectionEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    log::warn!("Selection input failed: {e}");
                    return None;
                }
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_command(line) {
                Ok(events) => self.pending.extend(events),
                Err(reason) => log::warn!("Ignoring selection command {line:?}: {reason}"),
            }
        }
    }
}

fn parse_command(line: &str) -> Result<Vec<SelectionEvent>, String> {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default().to_ascii_lowercase();
    let args = parts
        .map(|p| p.parse::<i32>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    let expect_args = |n: usize| {
        if args.len() == n {
            Ok(())
        } else {
            Err(format!("{command} takes {n} arguments, got {}", args.len()))
        }
    };

    match command.as_str() {
        "press" | "drag" | "release" => {
            expect_args(2)?;
            let (x, y) = (args[0], args[1]);
            Ok(vec![match command.as_str() {
                "press" => SelectionEvent::Press { x, y },
                "drag" => SelectionEvent::Drag { x, y },
                _ => SelectionEvent::Release { x, y },
            }])
        }
        "rect" => {
            expect_args(4)?;
            Ok(vec![
                SelectionEvent::Press {
                    x: args[0],
                    y: args[1],
                },
                SelectionEvent::Drag {
                    x: args[2],
                    y: args[3],
                },
                SelectionEvent::Release {
                    x: args[2],
                    y: args[3],
                },
            ])
        }
        "confirm" | "enter" => expect_args(0).map(|_| vec![SelectionEvent::Confirm]),
        "reset" | "r" => expect_args(0).map(|_| vec![SelectionEvent::Reset]),
        "cancel" | "q" => expect_args(0).map(|_| vec![SelectionEvent::Cancel]),
        other => Err(format!("unknown command {other:?}")),
    }
}
