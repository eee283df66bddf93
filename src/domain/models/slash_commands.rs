#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

use std::fmt;

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let mut args = text
            .split_whitespace()
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();
        if args.is_empty() {
            return None;
        }

        let prefix = args.remove(0).to_lowercase();
        let cmd = SlashCommand {
            command: prefix,
            args,
        };
        if cmd.is_quit()
            || cmd.is_help()
            || cmd.is_model_list()
            || cmd.is_model_set()
            || cmd.is_temperature()
            || cmd.is_word_count()
            || cmd.is_key()
            || cmd.is_settings()
            || cmd.is_stories()
        {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }

    pub fn is_model_list(&self) -> bool {
        return ["/ml", "/modellist", "/modelist"].contains(&self.command.as_str());
    }

    pub fn is_model_set(&self) -> bool {
        return ["/m", "/model"].contains(&self.command.as_str());
    }

    pub fn is_temperature(&self) -> bool {
        return ["/t", "/temperature", "/creativity"].contains(&self.command.as_str());
    }

    pub fn is_word_count(&self) -> bool {
        return ["/l", "/length", "/words"].contains(&self.command.as_str());
    }

    pub fn is_key(&self) -> bool {
        return ["/key", "/apikey"].contains(&self.command.as_str());
    }

    pub fn is_settings(&self) -> bool {
        return ["/s", "/settings"].contains(&self.command.as_str());
    }

    pub fn is_stories(&self) -> bool {
        return ["/stories", "/saved"].contains(&self.command.as_str());
    }

    /// First argument, if one was passed.
    pub fn arg(&self) -> Option<&str> {
        return self.args.first().map(|e| return e.as_str());
    }
}

impl fmt::Display for SlashCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            return write!(f, "{}", self.command);
        }

        return write!(f, "{} {}", self.command, self.args.join(" "));
    }
}
