use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

pub fn downloads_root() -> Result<PathBuf> {
    let home = dirs::home_dir().context("unable to resolve home directory")?;
    Ok(home.join("Downloads"))
}

/// Lesson folders are keyed by lesson number only, so the same lesson in a
/// later quarter reuses the folder.
pub fn lesson_folder(root: &Path, lesson: u32) -> Result<PathBuf> {
    let dir = root.join(format!("Lesson_{lesson}"));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create lesson directory {}", dir.display()))?;
    Ok(dir)
}

pub fn ledger_path(folder: &Path, lesson: u32) -> PathBuf {
    folder.join(format!("downloaded_videos_lesson_{lesson}.txt"))
}

pub fn audio_file_name(day: NaiveDate) -> String {
    format!("{}.mp3", day.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_folder_is_created_on_first_access() {
        let root = tempfile::tempdir().expect("temp dir");
        let folder = lesson_folder(root.path(), 7).expect("folder should be created");
        assert!(folder.is_dir());
        assert!(folder.ends_with("Lesson_7"));

        let again = lesson_folder(root.path(), 7).expect("existing folder is fine");
        assert_eq!(folder, again);
    }

    #[test]
    fn ledger_and_audio_names_follow_fixed_layout() {
        let folder = Path::new("/tmp/Lesson_3");
        assert_eq!(
            ledger_path(folder, 3),
            PathBuf::from("/tmp/Lesson_3/downloaded_videos_lesson_3.txt")
        );
        let day = NaiveDate::from_ymd_opt(2024, 5, 4).expect("valid date");
        assert_eq!(audio_file_name(day), "2024-05-04.mp3");
    }
}
