use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Archive layouts `extract_data` knows how to unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Tar,
    TarGz,
    Zip,
}

impl ArchiveKind {
    /// Picks the layout from the file name (`.tar`, `.tar.gz`, `.tgz`, `.zip`).
    pub fn from_path(path: &Path) -> Option<ArchiveKind> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveKind::TarGz)
        } else if name.ends_with(".tar") {
            Some(ArchiveKind::Tar)
        } else if name.ends_with(".zip") {
            Some(ArchiveKind::Zip)
        } else {
            None
        }
    }
}

/// Unpacks `archive` into the current working directory.
///
/// Returns the number of entries written.
pub fn extract_data(archive: impl AsRef<Path>) -> Result<usize> {
    extract_data_to(archive, ".")
}

/// Unpacks `archive` into `dest`, creating `dest` if needed.
///
/// Entries whose paths would escape `dest` are skipped. Missing or corrupt tar
/// archives surface as the underlying I/O error, corrupt zips as `Error::Zip`.
pub fn extract_data_to(archive: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<usize> {
    let archive = archive.as_ref();
    let dest = dest.as_ref();

    let kind = ArchiveKind::from_path(archive)
        .ok_or_else(|| Error::UnsupportedArchive(archive.to_path_buf()))?;

    let file = File::open(archive)?;
    std::fs::create_dir_all(dest)?;

    let count = match kind {
        ArchiveKind::Tar => unpack_entries(Archive::new(file), dest)?,
        ArchiveKind::TarGz => unpack_entries(Archive::new(GzDecoder::new(file)), dest)?,
        ArchiveKind::Zip => unpack_zip(file, dest)?,
    };

    log::info!("extracted {} entries from {:?} into {:?}", count, archive, dest);
    Ok(count)
}

fn unpack_entries<R: Read>(mut archive: Archive<R>, dest: &Path) -> Result<usize> {
    let mut count = 0;
    for entry in archive.entries()? {
        let mut entry = entry?;
        if entry.unpack_in(dest)? {
            count += 1;
        } else {
            log::warn!("skipped archive entry outside of {:?}: {:?}", dest, entry.path()?);
        }
    }
    Ok(count)
}

fn unpack_zip(file: File, dest: &Path) -> Result<usize> {
    let mut archive = ZipArchive::new(file)?;
    let mut count = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let target = match entry.enclosed_name() {
            Some(rel) => dest.join(rel),
            None => {
                log::warn!("skipped archive entry outside of {:?}: {:?}", dest, entry.name());
                continue;
            }
        };
        if entry.is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&target)?;
            std::io::copy(&mut entry, &mut out)?;
        }
        count += 1;
    }
    Ok(count)
}
