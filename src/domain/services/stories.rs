#[cfg(test)]
#[path = "stories_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use chrono::DateTime;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::now_rfc3339;
use crate::domain::models::Story;
use crate::domain::models::StoryError;
use crate::domain::models::StoryRecord;

/// Saved stories, one pretty printed JSON file each.
pub struct Stories {
    pub stories_dir: path::PathBuf,
}

impl Default for Stories {
    fn default() -> Stories {
        return Stories::new(path::PathBuf::from(Config::get(ConfigKey::StoriesDir)));
    }
}

impl Stories {
    pub fn new(stories_dir: path::PathBuf) -> Stories {
        return Stories { stories_dir };
    }

    /// File name safe version of a title.
    pub fn slug(title: &str) -> String {
        return title
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == ' ' || c == '_' || c == '-' {
                    return c;
                }
                return '_';
            })
            .collect();
    }

    fn get_file_path(&self, id: &str) -> path::PathBuf {
        return self.stories_dir.join(format!("{id}.json"));
    }

    pub async fn save(
        &self,
        story: &Story,
        session_id: &str,
        timestamp: &str,
    ) -> Result<path::PathBuf, StoryError> {
        return self
            .write(story, session_id, timestamp)
            .await
            .map_err(|err| return StoryError::Persistence(err.to_string()));
    }

    async fn write(
        &self,
        story: &Story,
        session_id: &str,
        timestamp: &str,
    ) -> Result<path::PathBuf> {
        let mut metadata = story.metadata.clone();
        metadata.saved_at = Some(now_rfc3339());

        let record = StoryRecord {
            title: story.title.to_string(),
            content: story.content.to_string(),
            timestamp: timestamp.to_string(),
            metadata,
            file_path: path::PathBuf::new(),
        };
        let payload = serde_json::to_string_pretty(&record)?;

        if !self.stories_dir.exists() {
            fs::create_dir_all(&self.stories_dir).await?;
        }

        let file_path =
            self.get_file_path(&format!("{}_{session_id}", Stories::slug(&story.title)));
        let mut file = fs::File::create(&file_path).await?;
        file.write_all(payload.as_bytes()).await?;

        tracing::debug!(path = ?file_path, "Saved story");

        return Ok(file_path);
    }

    async fn read(&self, file_path: path::PathBuf) -> Result<StoryRecord> {
        let payload = fs::read_to_string(&file_path).await?;
        let mut record: StoryRecord = serde_json::from_str(&payload)?;
        record.file_path = file_path;

        return Ok(record);
    }

    /// Every readable story, newest first. Files that fail to parse are
    /// skipped.
    pub async fn list(&self) -> Result<Vec<StoryRecord>> {
        let mut records: Vec<StoryRecord> = vec![];
        if !self.stories_dir.exists() {
            return Ok(records);
        }

        let mut dir = fs::read_dir(&self.stories_dir).await?;
        while let Some(file) = dir.next_entry().await? {
            let file_path = file.path();
            if file_path.extension().and_then(|ext| return ext.to_str()) != Some("json") {
                continue;
            }

            match self.read(file_path.clone()).await {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!(path = ?file_path, error = %err, "Skipping unreadable story");
                }
            }
        }

        records.sort_by_cached_key(|record| {
            return DateTime::parse_from_rfc3339(&record.timestamp).ok();
        });
        records.reverse();

        return Ok(records);
    }

    pub async fn load(&self, id: &str) -> Result<StoryRecord> {
        let file_path = self.get_file_path(id);
        if !file_path.exists() {
            bail!(format!("No story found for id {id}"));
        }

        return self.read(file_path).await;
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let file_path = self.get_file_path(id);
        if !file_path.exists() {
            return Ok(());
        }

        fs::remove_file(file_path).await?;
        return Ok(());
    }

    pub async fn delete_all(&self) -> Result<()> {
        if !self.stories_dir.exists() {
            return Ok(());
        }

        fs::remove_dir_all(&self.stories_dir).await?;
        return Ok(());
    }
}
