//! Interactive number prompts.

use std::io::{BufRead, Write};

use anyhow::{Result, bail};
use owo_colors::OwoColorize;

/// Ask `question` until the answer parses as a finite number.
///
/// Invalid answers get a short complaint and the question again. Running out
/// of input before a valid answer is an error.
pub fn ask_f64<R: BufRead, W: Write>(
    question: &str,
    input: &mut R,
    output: &mut W,
) -> Result<f64> {
    loop {
        write!(output, "{} ", question.bold())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("no answer to \"{question}\": input closed");
        }

        match line.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => return Ok(value),
            _ => writeln!(
                output,
                "{}",
                format!("'{}' is not a number, try again.", line.trim()).red()
            )?,
        }
    }
}
