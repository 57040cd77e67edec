use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};

/// Line-oriented question/answer helper over any buffered input stream.
///
/// The binary feeds it a locked stdin; tests feed it a `Cursor`.
pub struct Prompter<R> {
    reader: R,
}

impl<R: BufRead> Prompter<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Yes/no question defaulting to no. Only a trimmed `y` or `Y` counts
    /// as yes; anything else, including an empty line, is no.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        print!("{prompt} (y/N): ");
        let line = self.flush_and_read()?;
        let answer = line.trim();
        Ok(answer == "y" || answer == "Y")
    }

    /// Free-text question. A non-empty default is shown in brackets and
    /// returned when the operator submits an empty or all-whitespace line.
    pub fn input(&mut self, prompt: &str, default: &str) -> Result<String> {
        if default.is_empty() {
            print!("{prompt}: ");
        } else {
            print!("{prompt} [{default}]: ");
        }
        let line = self.flush_and_read()?;
        let answer = line.trim();
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer.to_string())
        }
    }

    fn flush_and_read(&mut self) -> Result<String> {
        std::io::stdout().flush().context("cannot write console")?;
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("cannot read console")?;
        if read == 0 {
            bail!("cannot read console: unexpected end of input");
        }
        Ok(line)
    }
}
