//! Compressed MusicXML (`.mxl`) containers.
//!
//! An `.mxl` file is a zip archive. `META-INF/container.xml` lists the
//! archive's root files; the first one is the score.

use crate::codec::tree::parse_document;
use crate::error::{Error, Result};
use std::io::{Cursor, Read};
use std::path::PathBuf;
use zip::result::ZipError;
use zip::ZipArchive;

/// Path of the manifest inside the archive.
pub const CONTAINER_MANIFEST: &str = "META-INF/container.xml";

/// Locate the score inside a compressed container and return its text.
pub fn unzip_container(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let manifest = read_entry(&mut archive, CONTAINER_MANIFEST)?;
    let root = parse_document(&manifest)?;
    let path = root
        .find("rootfiles")
        .and_then(|files| files.find("rootfile"))
        .and_then(|file| file.attribute("full-path"))
        .ok_or(Error::NoRootFile)?
        .to_string();

    log::debug!("Container root file: {}", path);
    read_entry(&mut archive, &path)
}

fn read_entry(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<String> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Err(Error::FileNotFound(PathBuf::from(name))),
        Err(e) => return Err(e.into()),
    };
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(content)
}
