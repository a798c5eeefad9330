use std::fs::File;
use std::io::{self, BufWriter, Write};

use crate::array::DynamicArray;
use crate::config::Config;

/// Write the `[a,b,c]` rendering followed by a newline
pub fn write_array<W: Write, T: AsRef<[u8]>>(
    writer: &mut W,
    array: &DynamicArray<T>,
) -> io::Result<()> {
    writeln!(writer, "{}", array)
}

/// Write a single element's raw bytes followed by a newline
pub fn write_element<W: Write>(writer: &mut W, element: &[u8]) -> io::Result<()> {
    writer.write_all(element)?;
    writer.write_all(b"\n")
}

/// Write `count capacity`
pub fn write_len<W: Write, T>(writer: &mut W, array: &DynamicArray<T>) -> io::Result<()> {
    writeln!(writer, "{} {}", array.len(), array.capacity())
}

/// Open output file or return stdout, buffered
pub fn open_output(config: &Config) -> io::Result<BufWriter<Box<dyn Write>>> {
    let inner: Box<dyn Write> = match &config.output_file {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };
    Ok(BufWriter::new(inner))
}
