use std::path;

use anyhow::Result;

use super::Story;
use super::StoryMetadata;
use super::StoryRecord;

fn story(content: &str) -> Story {
    return Story {
        title: "The Lighthouse".to_string(),
        content: content.to_string(),
        metadata: StoryMetadata::default(),
    };
}

#[test]
fn it_previews_long_content() {
    let res = story("Mara kept the lamp burning for eleven winters.").preview(9);
    assert_eq!(res, "Mara kept...");
}

#[test]
fn it_previews_short_content_without_ellipsis() {
    let res = story("Mara waited.").preview(200);
    assert_eq!(res, "Mara waited.");
}

#[test]
fn it_previews_on_char_boundaries() {
    let res = story("Café au lait").preview(4);
    assert_eq!(res, "Café...");
}

#[test]
fn it_counts_words() {
    assert_eq!(story("one two\n\nthree   four").word_count(), 4);
    assert_eq!(story("").word_count(), 0);
}

#[test]
fn it_loads_records_with_missing_metadata() -> Result<()> {
    let record: StoryRecord =
        serde_json::from_str(r#"{"title": "Old", "content": "Once upon a time"}"#)?;

    assert_eq!(record.title, "Old");
    assert_eq!(record.timestamp, "");
    assert_eq!(record.metadata, StoryMetadata::default());

    return Ok(());
}

#[test]
fn it_skips_empty_optional_metadata() -> Result<()> {
    let json = serde_json::to_string(&StoryMetadata::default())?;
    assert!(!json.contains("last_revised_at"));
    assert!(!json.contains("saved_at"));
    assert!(json.contains("\"theme\":null"));

    return Ok(());
}

#[test]
fn it_derives_record_id_from_file_name() {
    let record = StoryRecord {
        title: "The Lighthouse".to_string(),
        content: "".to_string(),
        timestamp: "".to_string(),
        metadata: StoryMetadata::default(),
        file_path: path::PathBuf::from("/tmp/stories/The Lighthouse_3f2a-91bc.json"),
    };

    assert_eq!(record.id(), "The Lighthouse_3f2a-91bc");
    assert_eq!(record.into_story().title, "The Lighthouse");
}
