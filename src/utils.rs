use std::path::{Component, PathBuf};

/// Resolves `.` and `..` lexically so config entries like `./trees/../x.json`
/// point where they read.
pub fn normalize_path(source: &str) -> PathBuf {
    let input = PathBuf::from(source);

    let mut new_path = PathBuf::new();

    for component in input.components() {
        match component {
            Component::CurDir => {}

            Component::ParentDir => {
                new_path.pop();
            }

            other => new_path.push(other.as_os_str()),
        }
    }

    new_path
}

/// Splits an on-disk file name into `(filename, extension)` at the last dot.
///
/// Dotfiles such as `.env` and names without a dot are extensionless, and so
/// is a trailing dot (`notes.`), which stays part of the filename.
pub fn split_file_name(name: &str) -> (String, String) {
    match name.rfind('.') {
        Some(index) if index > 0 && index + 1 < name.len() => {
            (name[..index].to_string(), name[index + 1..].to_string())
        }
        _ => (name.to_string(), String::new()),
    }
}
