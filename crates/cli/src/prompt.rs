//! Validated console input.

use std::io::{self, BufRead, Write};

use satchel_inventory::{Category, InventoryStore};

/// Input the session workflow asks the player for.
///
/// Every method keeps asking until it gets a valid answer; errors are IO failures only,
/// including the input ending.
pub trait Prompter {
    fn integer(&mut self, message: &str) -> io::Result<i64>;

    /// An integer in `low..=high`.
    fn ranged_integer(&mut self, message: &str, low: i64, high: i64) -> io::Result<i64>;

    fn yes_no(&mut self, message: &str) -> io::Result<bool>;

    /// Trimmed, non-empty text.
    fn non_empty_text(&mut self, message: &str) -> io::Result<String>;

    /// One of `allowed` (compared case-insensitively), returned uppercased.
    fn menu_choice(&mut self, message: &str, allowed: &[char]) -> io::Result<char>;
}

/// [`Prompter`] over a line reader and a writer for prompts and complaints.
#[derive(Debug)]
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, message: &str) -> io::Result<String> {
        write!(self.output, "{message}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn integer(&mut self, message: &str) -> io::Result<i64> {
        loop {
            let answer = self.ask(message)?;
            match answer.parse() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "You must enter a valid integer, not: {answer}")?,
            }
        }
    }

    fn ranged_integer(&mut self, message: &str, low: i64, high: i64) -> io::Result<i64> {
        let message = format!("{message} [{low} - {high}]");
        loop {
            let value = self.integer(&message)?;
            if (low..=high).contains(&value) {
                return Ok(value);
            }
            writeln!(self.output, "The value must be between {low} and {high}, not: {value}")?;
        }
    }

    fn yes_no(&mut self, message: &str) -> io::Result<bool> {
        let message = format!("{message} [Y/N]");
        loop {
            let answer = self.ask(&message)?;
            match answer.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer Y or N, not: {answer}")?,
            }
        }
    }

    fn non_empty_text(&mut self, message: &str) -> io::Result<String> {
        loop {
            let answer = self.ask(message)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            writeln!(self.output, "You must enter at least one character.")?;
        }
    }

    fn menu_choice(&mut self, message: &str, allowed: &[char]) -> io::Result<char> {
        loop {
            let answer = self.ask(message)?;
            let mut chars = answer.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                let c = c.to_ascii_uppercase();
                if allowed.iter().any(|a| a.to_ascii_uppercase() == c) {
                    return Ok(c);
                }
            }
            let options: String = allowed.iter().collect();
            writeln!(self.output, "Please enter one of {options}, not: {answer}")?;
        }
    }
}

/// List the store's categories and ask for one by number.
pub fn select_category<P: Prompter, W: Write>(
    prompter: &mut P,
    out: &mut W,
    store: &InventoryStore,
) -> io::Result<Category> {
    let categories = store.categories();
    writeln!(out, "\nSelect a Category:")?;
    for (i, category) in categories.iter().enumerate() {
        writeln!(out, "{}. {category}", i + 1)?;
    }
    let choice = prompter.ranged_integer("Enter category number", 1, categories.len() as i64)?;
    Ok(categories[(choice - 1) as usize].clone())
}

/// Boxed title used for menus.
pub fn write_banner<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    const WIDTH: usize = 60;
    let border = "*".repeat(WIDTH);
    let inner = WIDTH - 6;
    writeln!(out, "{border}")?;
    writeln!(out, "***{title:^inner$}***")?;
    writeln!(out, "{border}")
}
