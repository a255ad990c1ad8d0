use std::fs;
use std::path::Path;

use crate::error::Result;

/// Lists the immediate children of `folder` as class names.
///
/// Every child is included, files as well as directories, sorted by name.
/// The names are printed in the bracketed form `[cat dog]` and returned.
/// Use `list_class_dirs` to keep directories only.
pub fn list_classes(folder: impl AsRef<Path>) -> Result<Vec<String>> {
    let names = child_names(folder.as_ref(), false)?;
    println!("{}", format_names(&names));
    Ok(names)
}

/// Like `list_classes`, but skips anything that is not a directory. Nothing is printed.
pub fn list_class_dirs(folder: impl AsRef<Path>) -> Result<Vec<String>> {
    child_names(folder.as_ref(), true)
}

fn child_names(folder: &Path, dirs_only: bool) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        if dirs_only && !entry.path().is_dir() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

fn format_names(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{}'", n)).collect();
    format!("[{}]", quoted.join(" "))
}
