//! Color pickers for the command line.

use inkrecolor_core::{BoxFuture, ColorPicker, InkColor};
use std::io::{self, BufRead, Write};
use std::sync::Mutex;

/// Always answers with the color given on the command line.
pub struct FixedPicker(pub InkColor);

impl ColorPicker for FixedPicker {
    fn pick(&self, _suggested: InkColor) -> BoxFuture<'_, Option<InkColor>> {
        let color = self.0;
        Box::pin(async move { Some(color) })
    }
}

/// Asks on the terminal. An empty answer or end of input cancels; an
/// unparsable answer asks again.
pub struct PromptPicker<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl PromptPicker<io::BufReader<io::Stdin>, io::Stderr> {
    pub fn terminal() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R: BufRead + Send, W: Write + Send> PromptPicker<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    fn ask(&self, suggested: InkColor) -> io::Result<Option<InkColor>> {
        let mut input = self.input.lock().map_err(|_| io::Error::other("input poisoned"))?;
        let mut output = self.output.lock().map_err(|_| io::Error::other("output poisoned"))?;
        loop {
            write!(output, "Current color is {}. New color (empty to cancel): ", suggested)?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let answer = line.trim();
            if answer.is_empty() {
                return Ok(None);
            }
            match answer.parse() {
                Ok(color) => return Ok(Some(color)),
                Err(e) => writeln!(output, "{}", e)?,
            }
        }
    }
}

impl<R: BufRead + Send, W: Write + Send> ColorPicker for PromptPicker<R, W> {
    fn pick(&self, suggested: InkColor) -> BoxFuture<'_, Option<InkColor>> {
        Box::pin(async move {
            self.ask(suggested).unwrap_or_else(|e| {
                log::warn!("color prompt failed: {}", e);
                None
            })
        })
    }
}
