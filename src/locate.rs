use std::{
    cmp::Ordering,
    ffi::OsStr,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::error::{FramegifError, FramegifResult};

/// How located frames are ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameOrder {
    /// Ascending by the first number in the file name; files without one come last, by name.
    #[default]
    Numeric,
    /// Ascending by file name.
    Lexicographic,
}

/// One input file selected for the animation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageReference {
    pub path: PathBuf,
    /// First run of ASCII digits in the file name, if any.
    pub sort_key: Option<u64>,
}

impl ImageReference {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let sort_key = path
            .file_name()
            .and_then(OsStr::to_str)
            .and_then(extract_sort_key);
        Self { path, sort_key }
    }

    pub fn file_name(&self) -> &OsStr {
        self.path.file_name().unwrap_or(self.path.as_os_str())
    }

    /// Lower-cased extension of the referenced file, empty when there is none.
    pub fn extension_lowercase(&self) -> String {
        self.path
            .extension()
            .and_then(OsStr::to_str)
            .unwrap_or_default()
            .to_ascii_lowercase()
    }
}

/// Parse the first run of consecutive ASCII digits in `name`.
///
/// Runs that do not fit a `u64` saturate to `u64::MAX`; ordering among those falls back to the
/// file name.
pub fn extract_sort_key(name: &str) -> Option<u64> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let digits = &name[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    Some(digits[..end].parse::<u64>().unwrap_or(u64::MAX))
}

fn matches_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

fn compare(a: &ImageReference, b: &ImageReference, order: FrameOrder) -> Ordering {
    match order {
        FrameOrder::Lexicographic => a.file_name().cmp(b.file_name()),
        FrameOrder::Numeric => match (a.sort_key, b.sort_key) {
            (Some(ka), Some(kb)) => ka.cmp(&kb).then_with(|| a.file_name().cmp(b.file_name())),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.file_name().cmp(b.file_name()),
        },
    }
}

/// Collect the files in `directory` whose extension matches `extension` (ASCII
/// case-insensitive, leading `.` ignored) and order them according to `order`.
///
/// Sub-directories are not descended into. Fails with [`FramegifError::EmptyInput`] when nothing
/// matches.
pub fn locate_frames(
    directory: &Path,
    extension: &str,
    order: FrameOrder,
) -> FramegifResult<Vec<ImageReference>> {
    let extension = extension.trim_start_matches('.');

    let rd = std::fs::read_dir(directory)
        .with_context(|| format!("read input directory '{}'", directory.display()))?;

    let mut refs = Vec::new();
    for entry in rd {
        let entry = entry
            .with_context(|| format!("list input directory '{}'", directory.display()))?;
        let path = entry.path();
        if !path.is_file() || !matches_extension(&path, extension) {
            continue;
        }
        refs.push(ImageReference::new(path));
    }

    if refs.is_empty() {
        return Err(FramegifError::empty_input(format!(
            "no {} files found in '{}'",
            extension.to_ascii_uppercase(),
            directory.display()
        )));
    }

    refs.sort_by(|a, b| compare(a, b, order));

    tracing::info!(
        count = refs.len(),
        extension = %extension.to_ascii_uppercase(),
        "found and sorted input files"
    );

    Ok(refs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(refs: &[ImageReference]) -> Vec<String> {
        refs.iter()
            .map(|r| r.file_name().to_string_lossy().into_owned())
            .collect()
    }

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn sort_key_is_first_digit_run() {
        assert_eq!(extract_sort_key("image_10.svg"), Some(10));
        assert_eq!(extract_sort_key("a12b34.png"), Some(12));
        assert_eq!(extract_sort_key("007.svg"), Some(7));
        assert_eq!(extract_sort_key("frame.svg"), None);
        assert_eq!(
            extract_sort_key("f_99999999999999999999999.svg"),
            Some(u64::MAX)
        );
    }

    #[test]
    fn numeric_order_is_not_lexicographic() {
        let dir = tempfile::tempdir().unwrap();
        for n in ["image_2.svg", "image_10.svg", "image_1.svg"] {
            touch(dir.path(), n);
        }

        let refs = locate_frames(dir.path(), "svg", FrameOrder::Numeric).unwrap();
        assert_eq!(names(&refs), ["image_1.svg", "image_2.svg", "image_10.svg"]);
        assert_eq!(
            refs.iter().map(|r| r.sort_key).collect::<Vec<_>>(),
            [Some(1), Some(2), Some(10)]
        );
    }

    #[test]
    fn unkeyed_files_follow_keyed_files_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for n in ["zeta.svg", "b_3.svg", "alpha.svg", "a_3.svg", "c_1.svg"] {
            touch(dir.path(), n);
        }

        let refs = locate_frames(dir.path(), "svg", FrameOrder::Numeric).unwrap();
        assert_eq!(
            names(&refs),
            ["c_1.svg", "a_3.svg", "b_3.svg", "alpha.svg", "zeta.svg"]
        );
    }

    #[test]
    fn lexicographic_order_ignores_numbers() {
        let dir = tempfile::tempdir().unwrap();
        for n in ["image_2.svg", "image_10.svg", "image_1.svg"] {
            touch(dir.path(), n);
        }

        let refs = locate_frames(dir.path(), "svg", FrameOrder::Lexicographic).unwrap();
        assert_eq!(names(&refs), ["image_1.svg", "image_10.svg", "image_2.svg"]);
    }

    #[test]
    fn extension_filter_is_case_insensitive_and_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a_1.SVG");
        touch(dir.path(), "a_2.svg");
        touch(dir.path(), "a_3.png");
        touch(dir.path(), "svg");
        std::fs::create_dir(dir.path().join("nested_4.svg")).unwrap();

        let refs = locate_frames(dir.path(), ".svg", FrameOrder::Numeric).unwrap();
        assert_eq!(names(&refs), ["a_1.SVG", "a_2.svg"]);
    }

    #[test]
    fn no_matches_is_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a_1.png");

        let err = locate_frames(dir.path(), "svg", FrameOrder::Numeric).unwrap_err();
        assert!(matches!(err, FramegifError::EmptyInput(_)), "{err}");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = locate_frames(&dir.path().join("nope"), "svg", FrameOrder::Numeric).unwrap_err();
        assert!(matches!(err, FramegifError::Other(_)), "{err}");
    }

    #[test]
    fn order_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        for n in ["b.svg", "c.svg", "a.svg", "d.svg"] {
            touch(dir.path(), n);
        }

        let first = locate_frames(dir.path(), "svg", FrameOrder::Numeric).unwrap();
        let second = locate_frames(dir.path(), "svg", FrameOrder::Numeric).unwrap();
        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
        assert_eq!(names(&first), ["a.svg", "b.svg", "c.svg", "d.svg"]);
    }
}
