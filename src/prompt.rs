//! Interactive prompts.

use std::io::{self, BufRead, Write};

/// Line-oriented prompts over any reader/writer pair
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the terminal
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Create a prompter
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Read one trimmed line; `None` at end of input
    fn read_answer(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask for the version to release; empty input keeps `current`
    pub fn ask_version(&mut self, current: &str) -> io::Result<String> {
        write!(
            self.output,
            "Enter new version (current: {}, press Enter to keep): ",
            current
        )?;
        self.output.flush()?;

        Ok(match self.read_answer()? {
            Some(answer) if !answer.is_empty() => answer,
            _ => current.to_string(),
        })
    }

    /// Yes/no question that defaults to no
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.output, "{} [y/N]: ", question)?;
        self.output.flush()?;

        let answer = self.read_answer()?.unwrap_or_default().to_lowercase();
        Ok(matches!(answer.as_str(), "y" | "yes"))
    }

    /// Consume the prompter, returning the output sink
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn version_answer_is_trimmed() {
        let mut p = prompter("  1.0.1 \n");
        assert_eq!(p.ask_version("1.0.0").unwrap(), "1.0.1");
        let shown = String::from_utf8(p.into_output()).unwrap();
        assert!(shown.contains("current: 1.0.0"));
    }

    #[test]
    fn empty_or_eof_keeps_current_version() {
        assert_eq!(prompter("\n").ask_version("2.1.0").unwrap(), "2.1.0");
        assert_eq!(prompter("").ask_version("2.1.0").unwrap(), "2.1.0");
    }

    #[test]
    fn confirmation_defaults_to_no() {
        for (input, expected) in [
            ("y\n", true),
            ("YES\n", true),
            (" Yes \n", true),
            ("\n", false),
            ("n\n", false),
            ("sure\n", false),
            ("", false),
        ] {
            assert_eq!(prompter(input).confirm("Upload?").unwrap(), expected, "{input:?}");
        }
    }

    #[test]
    fn answers_are_consumed_in_order() {
        let mut p = prompter("1.2.0\ny\nn\n");
        assert_eq!(p.ask_version("1.1.0").unwrap(), "1.2.0");
        assert!(p.confirm("Upload?").unwrap());
        assert!(!p.confirm("Commit?").unwrap());
    }
}
