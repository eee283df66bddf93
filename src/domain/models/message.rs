#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Author;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Normal,
    Error,
}

/// A single entry of the chat history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub author: Author,
    pub text: String,
    mtype: MessageType,
}

impl Message {
    pub fn new(author: Author, text: &str) -> Message {
        return Message {
            author,
            text: text.to_string().replace('\t', "  "),
            mtype: MessageType::Normal,
        };
    }

    pub fn new_with_type(author: Author, mtype: MessageType, text: &str) -> Message {
        return Message {
            author,
            text: text.to_string().replace('\t', "  "),
            mtype,
        };
    }

    pub fn message_type(&self) -> MessageType {
        return self.mtype;
    }

    pub fn as_string_lines(&self, line_max_width: usize) -> Vec<String> {
        return wrap_text(&self.text, line_max_width);
    }
}

/// Word wraps `text` so no line exceeds `line_max_width` characters, unless a
/// single word is longer than that. Blank lines are kept as a single space.
pub fn wrap_text(text: &str, line_max_width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for full_line in text.split('\n') {
        if full_line.trim().is_empty() {
            lines.push(" ".to_string());
            continue;
        }

        let mut char_count = 0;
        let mut current_words: Vec<&str> = vec![];

        for word in full_line.split(' ') {
            let word_len = word.chars().count();
            if !current_words.is_empty() && word_len + char_count > line_max_width {
                lines.push(current_words.join(" ").trim_end().to_string());
                current_words = vec![word];
                char_count = word_len + 1;
            } else {
                current_words.push(word);
                char_count += word_len + 1;
            }
        }
        if !current_words.is_empty() {
            lines.push(current_words.join(" ").trim_end().to_string());
        }
    }

    return lines;
}
