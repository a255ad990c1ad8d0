use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// File and sub-directory counts for one directory visited by `parse_data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirSummary {
    pub path: PathBuf,
    pub files: usize,
    pub dirs: usize,
}

impl std::fmt::Display for DirSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "There are {} files and {} directories in {}",
            self.files,
            self.dirs,
            self.path.display()
        )
    }
}

/// Walks `folder` top-down and prints one summary line per directory.
///
/// The folder itself is reported first, then each sub-directory in name
/// order, depth first. The summaries are also returned.
pub fn parse_data(folder: impl AsRef<Path>) -> Result<Vec<DirSummary>> {
    let summaries = walk_dirs(folder.as_ref())?;
    for summary in &summaries {
        println!("{}", summary);
    }
    Ok(summaries)
}

/// Same walk as `parse_data` without printing.
pub fn walk_dirs(folder: &Path) -> Result<Vec<DirSummary>> {
    let mut out = Vec::new();
    visit(folder, &mut out)?;
    Ok(out)
}

fn visit(dir: &Path, out: &mut Vec<DirSummary>) -> Result<()> {
    let mut subdirs: Vec<PathBuf> = Vec::new();
    let mut files = 0usize;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        // Symlinked directories count as directories but are not followed.
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else {
            files += 1;
        }
    }
    subdirs.sort();

    out.push(DirSummary { path: dir.to_path_buf(), files, dirs: subdirs.len() });

    for sub in &subdirs {
        if entry_is_symlink(sub) {
            log::debug!("not following symlink {:?}", sub);
            continue;
        }
        visit(sub, out)?;
    }
    Ok(())
}

fn entry_is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ScratchDir;

    #[test]
    fn reports_every_directory_top_down() {
        let dir = ScratchDir::new("walk");
        let root = dir.join("train");
        fs::create_dir_all(root.join("cat")).unwrap();
        fs::create_dir_all(root.join("dog/puppies")).unwrap();
        fs::write(root.join("labels.csv"), "x").unwrap();
        fs::write(root.join("cat/1.jpg"), "x").unwrap();
        fs::write(root.join("cat/2.jpg"), "x").unwrap();
        fs::write(root.join("dog/puppies/1.jpg"), "x").unwrap();

        let summaries = walk_dirs(&root).unwrap();
        let got: Vec<(PathBuf, usize, usize)> = summaries
            .into_iter()
            .map(|s| (s.path, s.files, s.dirs))
            .collect();

        assert_eq!(got, vec![
            (root.clone(), 1, 2),
            (root.join("cat"), 2, 0),
            (root.join("dog"), 0, 1),
            (root.join("dog/puppies"), 1, 0),
        ]);
    }

    #[test]
    fn summary_line_wording() {
        let s = DirSummary { path: PathBuf::from("data/cat"), files: 3, dirs: 0 };
        assert_eq!(s.to_string(), "There are 3 files and 0 directories in data/cat");
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = ScratchDir::new("walk_missing");
        assert!(parse_data(dir.join("absent")).is_err());
    }
}
