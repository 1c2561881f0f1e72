use crate::repo::SelectionPolicy;
use console::style;
use log::debug;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Numbered menu on `output`, answers read line by line from `input`.
/// Keeps asking until it gets a number in range; gives up only when
/// `input` runs dry.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl Prompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn show(&mut self, candidates: &[PathBuf], prompt: &str) -> io::Result<()> {
        writeln!(self.output, "{}", style(prompt).bold())?;
        for (i, candidate) in candidates.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, candidate.display())?;
        }
        self.output.flush()
    }

    fn ask(&mut self, count: usize) -> io::Result<Option<usize>> {
        let mut line = String::new();
        loop {
            write!(self.output, "Enter a number [1-{count}]: ")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match line.trim().parse::<usize>() {
                Ok(n) if (1..=count).contains(&n) => return Ok(Some(n - 1)),
                _ => writeln!(
                    self.output,
                    "{} is not a choice between 1 and {count}",
                    style(line.trim()).yellow()
                )?,
            }
        }
    }
}

impl<R: BufRead, W: Write> SelectionPolicy for Prompt<R, W> {
    fn select(&mut self, candidates: &[PathBuf], prompt: &str) -> io::Result<Option<usize>> {
        if candidates.is_empty() {
            return Ok(None);
        }
        self.show(candidates, prompt)?;
        let choice = self.ask(candidates.len())?;
        if choice.is_none() {
            debug!("input closed before a repository was chosen");
        }
        Ok(choice)
    }
}
