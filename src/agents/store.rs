use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::story::UserStories;

/// `user_stories_<YYYYMMDD_HHMMSS>.json`, local time.
pub fn file_name_for(now: chrono::DateTime<chrono::Local>) -> String {
    format!("user_stories_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Write stories as pretty JSON into `dir`, creating it if needed.
///
/// Two saves within the same second target the same file and the later one wins.
pub fn save_user_stories(dir: &Path, stories: &UserStories) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    let path = dir.join(file_name_for(chrono::Local::now()));
    let json = serde_json::to_string_pretty(stories)?;
    std::fs::write(&path, json).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

pub fn load_user_stories(path: &Path) -> Result<UserStories> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_str(&contents)?)
}
