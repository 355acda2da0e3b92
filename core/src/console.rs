use comfy_table::{presets::ASCII_FULL, Table};
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::io::{self, BufRead, Write};

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("console input closed while waiting for: {0}")]
    EndOfInput(String),
    #[error("failed to render object: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Console front end shared by every scenario. Writes go through interior
/// mutability since scenarios only ever see `&ScenarioContext`.
pub struct ConsoleHelper {
    input: RefCell<Box<dyn BufRead>>,
    output: RefCell<Box<dyn Write>>,
    progress: RefCell<Option<String>>,
}

impl ConsoleHelper {
    pub fn new(input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
            progress: RefCell::new(None),
        }
    }

    pub fn stdio() -> Self {
        Self::new(
            Box::new(io::BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )
    }

    pub fn header(&self, title: &str) -> Result<(), ConsoleError> {
        let mut out = self.output.borrow_mut();
        writeln!(out)?;
        writeln!(out, "{title}")?;
        writeln!(out, "{}", "=".repeat(title.chars().count()))?;
        Ok(())
    }

    pub fn start_progress(&self, message: &str) -> Result<(), ConsoleError> {
        self.stop_progress()?;
        let mut out = self.output.borrow_mut();
        write!(out, "{message}... ")?;
        out.flush()?;
        *self.progress.borrow_mut() = Some(message.to_string());
        Ok(())
    }

    pub fn stop_progress(&self) -> Result<(), ConsoleError> {
        if self.progress.borrow_mut().take().is_some() {
            writeln!(self.output.borrow_mut(), "done")?;
        }
        Ok(())
    }

    pub fn write_line(&self, message: &str) -> Result<(), ConsoleError> {
        self.stop_progress()?;
        writeln!(self.output.borrow_mut(), "{message}")?;
        Ok(())
    }

    pub fn success(&self, message: &str) -> Result<(), ConsoleError> {
        self.write_line(&format!("[ok] {message}"))
    }

    pub fn warning(&self, message: &str) -> Result<(), ConsoleError> {
        self.write_line(&format!("[warn] {message}"))
    }

    pub fn error(&self, message: &str) -> Result<(), ConsoleError> {
        self.write_line(&format!("[error] {message}"))
    }

    /// Renders any serializable value as a two-column property table.
    pub fn write_object<T>(&self, object: &T, title: Option<&str>) -> Result<(), ConsoleError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(object)?;
        self.stop_progress()?;

        let mut out = self.output.borrow_mut();
        if let Some(title) = title {
            writeln!(out, "{title}:")?;
        }

        if let Value::String(text) = &value {
            writeln!(out, "  {text}")?;
            return Ok(());
        }

        let mut rows = Vec::new();
        flatten_value("", &value, &mut rows);
        let mut table = Table::new();
        table.load_preset(ASCII_FULL);
        table.set_header(vec!["Property", "Value"]);
        for (key, cell) in rows {
            table.add_row(vec![key, cell]);
        }
        writeln!(out, "{table}")?;
        Ok(())
    }

    /// Prompts until a non-blank line is entered.
    pub fn read_non_empty_string(&self, prompt: &str) -> Result<String, ConsoleError> {
        self.stop_progress()?;
        loop {
            {
                let mut out = self.output.borrow_mut();
                write!(out, "{prompt}: ")?;
                out.flush()?;
            }

            let mut line = String::new();
            let read = self.input.borrow_mut().read_line(&mut line)?;
            if read == 0 {
                return Err(ConsoleError::EndOfInput(prompt.to_string()));
            }
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(trimmed.to_string());
            }
            writeln!(self.output.borrow_mut(), "A value is required.")?;
        }
    }
}

fn flatten_value(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            if map.is_empty() && !prefix.is_empty() {
                rows.push((prefix.to_string(), "{}".to_string()));
            }
            for (key, nested) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_value(&path, nested, rows);
            }
        }
        Value::Array(items) if items.iter().all(is_scalar) => {
            let joined: Vec<String> = items.iter().map(scalar_to_string).collect();
            rows.push((prefix.to_string(), joined.join(", ")));
        }
        Value::Array(items) => {
            for (idx, nested) in items.iter().enumerate() {
                flatten_value(&format!("{prefix}[{idx}]"), nested, rows);
            }
        }
        scalar => rows.push((prefix.to_string(), scalar_to_string(scalar))),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => "<none>".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
