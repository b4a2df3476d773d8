//! Reading and writing line-oriented text documents.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Cursor, Read, Write},
    path::Path,
};

use crate::error::Error;

/// A document that is read from and written to plain text verbatim.
///
/// # Example
///
/// ```rust,no_run
/// use lingopatch::{LanguageFile, traits::TextDocument};
/// let file = LanguageFile::read_from("data/language/de-DE.txt")?;
/// file.write_to("de-DE.copy.txt")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait TextDocument {
    /// Build from already decoded text.
    fn from_text(text: String) -> Self
    where
        Self: Sized;

    /// The full text, exactly as it will be written.
    fn as_text(&self) -> &str;

    /// Parse from any reader. Input must be UTF-8.
    fn from_reader<R: Read>(mut reader: R) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self::from_text(text))
    }

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        writer.write_all(self.as_text().as_bytes()).map_err(Error::Io)
    }

    /// Write to file path.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush().map_err(Error::Io)
    }
}
