//! Interactive input from the terminal

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use ai_core::{InputSource, InvocationError};

/// Input source that prompts on a writer and reads answers line by line
///
/// Each question is shown as `Please input {label} [{default}]: `. The
/// answer is returned trimmed; an empty line selects the default. End of
/// input is answered like an empty line.
#[derive(Debug)]
pub struct StdinInputSource<R = BufReader<Stdin>, W = Stdout> {
    reader: R,
    writer: W,
}

impl StdinInputSource {
    /// Prompt on stdout, read from stdin
    pub fn new() -> Self {
        Self::with_io(BufReader::new(io::stdin()), io::stdout())
    }
}

impl Default for StdinInputSource {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead, W: Write> StdinInputSource<R, W> {
    pub const fn with_io(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Show a free-form prompt and read one trimmed line
    ///
    /// Returns `None` at end of input.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>, InvocationError> {
        write!(self.writer, "{prompt}").map_err(input_error)?;
        self.writer.flush().map_err(input_error)?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line).map_err(input_error)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Give back the writer, e.g. to inspect captured prompts
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn input_error(err: io::Error) -> InvocationError {
    InvocationError::Input(err.to_string())
}

impl<R, W> InputSource for StdinInputSource<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn get(&mut self, label: &str, default: &str) -> Result<String, InvocationError> {
        let answer = self.read_line(&format!("Please input {label} [{default}]: "))?;
        Ok(answer.unwrap_or_default())
    }
}
