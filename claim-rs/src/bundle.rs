//! All-sizes ZIP bundles

use std::io::{Cursor, Write};
use std::path::PathBuf;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::catalog::file_stem;
use crate::error::Result;

const README: &str = "\
Thank you for downloading!

This archive contains every available size of the artwork as a PNG file.

Mac: double-click the .zip file, then open the extracted folder.
Windows: right-click the .zip file, choose \"Extract All...\", then open the folder.
";

/// Build an in-memory ZIP with one PNG per size plus a README
pub fn build_bundle(title: &str, assets: &[(String, PathBuf)]) -> Result<Vec<u8>> {
    let stem = file_stem(title);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (size_id, path) in assets {
        let content = std::fs::read(path)?;
        zip.start_file(format!("{}-{}.png", stem, size_id), options)?;
        zip.write_all(&content)?;
    }

    zip.start_file("README.txt", options)?;
    zip.write_all(README.as_bytes())?;

    Ok(zip.finish()?.into_inner())
}
