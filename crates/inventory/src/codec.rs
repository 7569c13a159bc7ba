//! Text file format for a character inventory.
//!
//! One record per line:
//!
//! ```text
//! Category;ItemName;Quantity[;Description]
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. The description is everything
//! after the third `;` and is only kept for description-eligible categories. Bad lines are
//! reported as [`ParseWarning`]s and skipped; they never abort a load.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, SecondsFormat};
use thiserror::Error;

use crate::category::Category;
use crate::item::Item;
use crate::store::InventoryStore;

pub const FIELD_DELIMITER: char = ';';
pub const COMMENT_PREFIX: char = '#';
pub const FORMAT_LINE: &str = "# Format: Category;ItemName;Quantity[;Description]";

/// A skipped or noteworthy line encountered while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarning {
    #[error("line {line}: malformed record, skipped: {text}")]
    Malformed { line: usize, text: String },

    #[error("line {line}: invalid quantity '{quantity}', skipped: {text}")]
    InvalidQuantity {
        line: usize,
        quantity: String,
        text: String,
    },

    #[error("line {line}: category '{category}' is not predefined, added it")]
    UnknownCategory { line: usize, category: String },
}

impl ParseWarning {
    pub fn line(&self) -> usize {
        match self {
            ParseWarning::Malformed { line, .. }
            | ParseWarning::InvalidQuantity { line, .. }
            | ParseWarning::UnknownCategory { line, .. } => *line,
        }
    }

    /// Whether the line was dropped (as opposed to loaded with a note).
    pub fn skipped_line(&self) -> bool {
        !matches!(self, ParseWarning::UnknownCategory { .. })
    }
}

/// Summary of one decode pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records applied to the store (duplicates count each time).
    pub records: usize,
    pub warnings: Vec<ParseWarning>,
    /// `false` when the file did not exist and the store was left empty.
    pub file_found: bool,
}

impl LoadReport {
    pub fn skipped_lines(&self) -> usize {
        self.warnings.iter().filter(|w| w.skipped_line()).count()
    }
}

/// A store freshly read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    pub store: InventoryStore,
    pub report: LoadReport,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read inventory file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to write inventory file {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to replace inventory file {}", path.display())]
    Replace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Header lines written before the records. Ignored when loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveHeader {
    pub character: String,
    pub saved_at: DateTime<Local>,
}

impl SaveHeader {
    pub fn now(character: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            saved_at: Local::now(),
        }
    }
}

enum LineOutcome {
    Blank,
    Record {
        category: Category,
        item: Item,
    },
    Skipped(ParseWarning),
}

fn parse_line(line_no: usize, raw: &str) -> LineOutcome {
    let line = raw.trim();
    if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
        return LineOutcome::Blank;
    }

    let fields: Vec<&str> = line.splitn(4, FIELD_DELIMITER).collect();
    let (category, name, quantity) = match fields.as_slice() {
        [category, name, quantity, ..] if !category.trim().is_empty() && !name.trim().is_empty() => {
            (Category::new(category.trim()), name.trim(), *quantity)
        }
        _ => {
            return LineOutcome::Skipped(ParseWarning::Malformed {
                line: line_no,
                text: line.to_string(),
            });
        }
    };

    let quantity: i64 = match quantity.parse() {
        Ok(q) => q,
        Err(_) => {
            return LineOutcome::Skipped(ParseWarning::InvalidQuantity {
                line: line_no,
                quantity: quantity.to_string(),
                text: line.to_string(),
            });
        }
    };

    let description = match fields.get(3) {
        Some(text) if category.is_description_eligible() => *text,
        _ => "",
    };

    LineOutcome::Record {
        item: Item::new(name, quantity, description),
        category,
    }
}

/// Apply one raw line to `store`, recording any warning in `report`.
fn apply_line(store: &mut InventoryStore, report: &mut LoadReport, line_no: usize, raw: &str) {
    match parse_line(line_no, raw) {
        LineOutcome::Blank => {}
        LineOutcome::Skipped(warning) => {
            tracing::warn!(line = line_no, "{warning}");
            report.warnings.push(warning);
        }
        LineOutcome::Record { category, item } => {
            if !store.contains_category(&category) {
                store.add_dynamic_category(category.as_str());
                let warning = ParseWarning::UnknownCategory {
                    line: line_no,
                    category: category.to_string(),
                };
                tracing::warn!(line = line_no, "{warning}");
                report.warnings.push(warning);
            }
            store.put_record(&category, item);
            report.records += 1;
        }
    }
}

fn found_report() -> LoadReport {
    LoadReport {
        file_found: true,
        ..LoadReport::default()
    }
}

/// Read records from `reader` into `store`, which is reset first.
///
/// Lines are decoded lossily so a stray invalid byte costs at most one record. An IO
/// error aborts the read and resets `store` again before being returned.
pub fn decode_into<R: BufRead>(mut reader: R, store: &mut InventoryStore) -> io::Result<LoadReport> {
    store.initialize();
    let mut report = found_report();

    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                store.initialize();
                return Err(err);
            }
        }
        line_no += 1;
        apply_line(store, &mut report, line_no, &String::from_utf8_lossy(&buf));
    }

    Ok(report)
}

/// Decode an in-memory document.
pub fn decode(text: &str) -> Loaded {
    let mut store = InventoryStore::new();
    let mut report = found_report();
    for (idx, raw) in text.lines().enumerate() {
        apply_line(&mut store, &mut report, idx + 1, raw);
    }
    Loaded { store, report }
}

/// Load `path` into `store`.
///
/// A missing file is not an error: `store` is left empty and the report says
/// `file_found: false`. On a read failure `store` is reset to empty.
pub fn load_into(path: &Path, store: &mut InventoryStore) -> Result<LoadReport, LoadError> {
    store.initialize();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "inventory file not found; starting empty");
            return Ok(LoadReport::default());
        }
        Err(source) => {
            return Err(LoadError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let report = decode_into(BufReader::new(file), store).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        records = report.records,
        warnings = report.warnings.len(),
        "inventory loaded"
    );
    Ok(report)
}

pub fn load(path: &Path) -> Result<Loaded, LoadError> {
    let mut store = InventoryStore::new();
    let report = load_into(path, &mut store)?;
    Ok(Loaded { store, report })
}

/// Write the records of `store`: known categories in order, items sorted
/// case-insensitively, descriptions only where eligible and non-empty.
pub fn write_records<W: Write>(out: &mut W, store: &InventoryStore) -> io::Result<()> {
    for category in store.categories() {
        let eligible = category.is_description_eligible();
        for item in store.list_category_items(category) {
            write!(
                out,
                "{category}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
                item.name(),
                item.quantity()
            )?;
            if eligible && item.has_description() {
                write!(out, "{FIELD_DELIMITER}{}", item.description())?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

pub fn write_header<W: Write>(out: &mut W, header: &SaveHeader) -> io::Result<()> {
    writeln!(out, "# Inventory Data for: {}", header.character)?;
    writeln!(
        out,
        "# Saved on: {}",
        header.saved_at.to_rfc3339_opts(SecondsFormat::Secs, false)
    )?;
    writeln!(out, "{FORMAT_LINE}")
}

/// Render a complete document.
pub fn encode(store: &InventoryStore, header: &SaveHeader) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_header(&mut out, header).and_then(|()| write_records(&mut out, store));
    String::from_utf8_lossy(&out).into_owned()
}

/// Save `store` to `path`.
///
/// The document is written to a sibling temporary file which then replaces `path`, so a
/// failed save leaves any previous file untouched.
pub fn save(path: &Path, store: &InventoryStore, header: &SaveHeader) -> Result<(), SaveError> {
    let temp_path = temp_path_for(path);

    let written = File::create(&temp_path).and_then(|file| {
        let mut out = BufWriter::new(file);
        write_header(&mut out, header)?;
        write_records(&mut out, store)?;
        out.into_inner().map_err(io::IntoInnerError::into_error)?.sync_all()
    });
    if let Err(source) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(SaveError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    if let Err(source) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(SaveError::Replace {
            path: path.to_path_buf(),
            source,
        });
    }

    tracing::info!(path = %path.display(), items = store.item_count(), "inventory saved");
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
