#[cfg(test)]
#[path = "model_settings_test.rs"]
mod tests;

use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::StoryError;
use crate::configuration::Config;
use crate::configuration::ConfigKey;

pub const MIN_TEMPERATURE: f32 = 0.0;
pub const MAX_TEMPERATURE: f32 = 1.0;
pub const MIN_WORD_COUNT: u32 = 300;
pub const MAX_WORD_COUNT: u32 = 2000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub model: String,
    temperature: f32,
    word_count: u32,
}

fn check_temperature(temperature: f32) -> Result<f32, StoryError> {
    if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
        return Err(StoryError::InvalidSettings(format!(
            "temperature must be between {MIN_TEMPERATURE:.1} and {MAX_TEMPERATURE:.1}, got {temperature}"
        )));
    }

    return Ok(temperature);
}

fn check_word_count(word_count: u32) -> Result<u32, StoryError> {
    if !(MIN_WORD_COUNT..=MAX_WORD_COUNT).contains(&word_count) {
        return Err(StoryError::InvalidSettings(format!(
            "word count must be between {MIN_WORD_COUNT} and {MAX_WORD_COUNT}, got {word_count}"
        )));
    }

    return Ok(word_count);
}

impl ModelSettings {
    pub fn new(model: &str, temperature: f32, word_count: u32) -> Result<ModelSettings, StoryError> {
        return Ok(ModelSettings {
            model: model.to_string(),
            temperature: check_temperature(temperature)?,
            word_count: check_word_count(word_count)?,
        });
    }

    pub fn from_config() -> Result<ModelSettings> {
        let temperature = Config::get(ConfigKey::Temperature).parse::<f32>()?;
        let word_count = Config::get(ConfigKey::WordCount).parse::<u32>()?;
        let settings = ModelSettings::new(&Config::get(ConfigKey::Model), temperature, word_count)?;

        return Ok(settings);
    }

    pub fn temperature(&self) -> f32 {
        return self.temperature;
    }

    pub fn word_count(&self) -> u32 {
        return self.word_count;
    }

    pub fn set_temperature(&mut self, temperature: f32) -> Result<(), StoryError> {
        self.temperature = check_temperature(temperature)?;
        return Ok(());
    }

    pub fn set_word_count(&mut self, word_count: u32) -> Result<(), StoryError> {
        self.word_count = check_word_count(word_count)?;
        return Ok(());
    }

    pub fn describe(&self) -> String {
        return format!(
            "Model: {}\nCreativity (temperature): {:.1}\nStory length: ~{} words",
            self.model, self.temperature, self.word_count
        );
    }
}
