//! Rendering batch outcomes for the CLI and other non-HTTP callers.
//!
//! Three shapes:
//! - `locations`: the JSON array of strings the HTTP endpoint returns
//! - `json`: an array of full entry reports
//! - `jsonl`: one entry report per line, as they appear in the outcome

use std::io::{self, Write};

use crate::types::BatchOutcome;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Array of location strings, empty for skipped entries
    Locations,
    /// Array of entry reports
    Json,
    /// One entry report per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "locations" | "paths" => Some(Self::Locations),
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Serializes batch outcomes to a writer.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects the array formats.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write one batch outcome in the configured format.
    pub fn write_batch(&mut self, outcome: &BatchOutcome) -> io::Result<()> {
        match self.format {
            OutputFormat::Locations => self.write_value(&outcome.locations())?,
            OutputFormat::Json => self.write_value(&outcome.entries)?,
            OutputFormat::JsonLines => {
                for entry in &outcome.entries {
                    serde_json::to_writer(&mut self.writer, entry).map_err(io::Error::other)?;
                    writeln!(self.writer)?;
                }
            }
        }
        self.writer.flush()
    }

    fn write_value<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, value).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, value).map_err(io::Error::other)?;
        }
        writeln!(self.writer)
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntryOutcome, EntryStatus};

    fn sample() -> BatchOutcome {
        BatchOutcome {
            entries: vec![
                EntryOutcome {
                    index: 1,
                    name: Some("b.png".into()),
                    status: EntryStatus::Saved {
                        location: "images/1.png".into(),
                    },
                },
                EntryOutcome {
                    index: 0,
                    name: Some("a.txt".into()),
                    status: EntryStatus::NotImage,
                },
            ],
        }
    }

    #[test]
    fn test_write_locations() {
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::Locations, false);
        writer.write_batch(&sample()).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(output.trim(), r#"["images/1.png",""]"#);
    }

    #[test]
    fn test_write_json_array() {
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::Json, true);
        writer.write_batch(&sample()).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let parsed: Vec<EntryOutcome> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, sample().entries);
    }

    #[test]
    fn test_write_jsonl() {
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::JsonLines, true);
        writer.write_batch(&sample()).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("\"not_image\""));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("JSONL"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("locations"), Some(OutputFormat::Locations));
        assert_eq!(OutputFormat::parse("invalid"), None);
    }
}
