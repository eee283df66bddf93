use std::io;
use std::path;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgGroup;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BackendName;
use crate::domain::models::StoryRecord;
use crate::domain::services::help_text;
use crate::domain::services::Stories;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

pub fn log_path() -> path::PathBuf {
    if let Ok(dir) = std::env::var("STORYCHAT_LOG_DIR") {
        return path::PathBuf::from(dir).join("debug.log");
    }

    return dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("storychat/debug.log");
}

fn format_story(record: &StoryRecord) -> String {
    let mut res = format!("- (ID: {}) {}", record.id(), record.title);

    if !record.metadata.genre.is_empty() {
        res = format!("{res}, Genre: {}", record.metadata.genre);
    }

    if !record.timestamp.is_empty() {
        res = format!("{res}, {}", record.timestamp);
    }

    return res;
}

async fn print_stories_list() -> Result<()> {
    let stories = Stories::default()
        .list()
        .await?
        .iter()
        .map(format_story)
        .collect::<Vec<String>>();

    if stories.is_empty() {
        println!("There are no saved stories yet. You should write your first one!");
    } else {
        println!("{}", stories.join("\n"));
    }

    return Ok(());
}

async fn print_story(id: &str) -> Result<()> {
    let record = Stories::default().load(id).await?;
    println!(
        "{}\n\n{}",
        Paint::new(&record.title).bold(),
        record.content
    );

    return Ok(());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    let parent = config_file_path
        .parent()
        .ok_or_else(|| return anyhow!("Invalid config file path {config_file_path_str}"))?;
    if !parent.exists() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

async fn load_config_from_story(id: &str) -> Result<()> {
    // Fail before the UI starts if the story can't be read.
    Stories::default().load(id).await?;
    Config::set(ConfigKey::StoryFile, id);

    return Ok(());
}

/// Returns false when the user backs out of the selection.
async fn load_config_from_story_interactive() -> Result<bool> {
    let stories = Stories::default().list().await?;
    if stories.is_empty() {
        println!("There are no saved stories yet. You should write your first one!");
        return Ok(false);
    }

    let story_options = stories.iter().map(format_story).collect::<Vec<String>>();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Which story would you like to open?")
        .default(0)
        .items(&story_options)
        .interact_opt()?;

    if let Some(idx) = selection {
        load_config_from_story(&stories[idx].id()).await?;
        return Ok(true);
    }

    return Ok(false);
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for StoryChat")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running StoryChat with environment variable RUST_LOG=storychat")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn arg_story_id() -> Arg {
    return Arg::new("story-id")
        .short('i')
        .long("id")
        .help("Story ID, as printed by `stories list`")
        .num_args(1);
}

fn subcommand_stories_delete() -> Command {
    return Command::new("delete")
        .about("Delete one or all saved stories.")
        .arg(arg_story_id())
        .arg(
            clap::Arg::new("all")
                .long("all")
                .help("Delete all stories.")
                .action(ArgAction::SetTrue),
        )
        .group(
            ArgGroup::new("delete-args")
                .args(["story-id", "all"])
                .required(true),
        );
}

fn subcommand_stories() -> Command {
    return Command::new("stories")
        .about("Manage saved stories.")
        .arg_required_else_help(true)
        .subcommand(Command::new("dir").about("Print the stories directory path."))
        .subcommand(Command::new("list").about("List all saved stories, newest first."))
        .subcommand(
            Command::new("show")
                .about("Print a saved story to stdout.")
                .arg(arg_story_id().required(true)),
        )
        .subcommand(
            Command::new("open")
                .about("Open a saved story to keep working on it. Omit the story ID to pick one interactively.")
                .arg(arg_story_id().required(false)),
        )
        .subcommand(subcommand_stories_delete());
}

fn arg_backend() -> Arg {
    return Arg::new(ConfigKey::Backend.to_string())
        .short('b')
        .long(ConfigKey::Backend.to_string())
        .env("STORYCHAT_BACKEND")
        .num_args(1)
        .help(format!(
            "The backend hosting the model that writes stories. [default: {}]",
            Config::default(ConfigKey::Backend)
        ))
        .value_parser(PossibleValuesParser::new(BackendName::VARIANTS))
        .global(true);
}

fn arg_model() -> Arg {
    return Arg::new(ConfigKey::Model.to_string())
        .short('m')
        .long(ConfigKey::Model.to_string())
        .env("STORYCHAT_MODEL")
        .num_args(1)
        .help(format!(
            "The model used to write and revise stories. [default: {}]",
            Config::default(ConfigKey::Model)
        ))
        .global(true);
}

fn arg_temperature() -> Arg {
    return Arg::new(ConfigKey::Temperature.to_string())
        .short('t')
        .long(ConfigKey::Temperature.to_string())
        .env("STORYCHAT_TEMPERATURE")
        .num_args(1)
        .help(format!(
            "Creativity of the model, between 0.0 and 1.0. [default: {}]",
            Config::default(ConfigKey::Temperature)
        ))
        .global(true);
}

fn arg_word_count() -> Arg {
    return Arg::new(ConfigKey::WordCount.to_string())
        .short('w')
        .long(ConfigKey::WordCount.to_string())
        .env("STORYCHAT_WORD_COUNT")
        .num_args(1)
        .help(format!(
            "Approximate length of new stories in words, between 300 and 2000. [default: {}]",
            Config::default(ConfigKey::WordCount)
        ))
        .global(true);
}

fn subcommand_chat() -> Command {
    return Command::new("chat").about("Start writing a new story.");
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:")
                || line.starts_with("STORY COMMANDS:")
                || line.starts_with("HOTKEYS:")
            {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("storychat")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_chat())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(subcommand_stories())
        .arg(arg_backend())
        .arg(arg_model())
        .arg(arg_temperature())
        .arg(arg_word_count())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("STORYCHAT_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::StoriesDir.to_string())
                .long(ConfigKey::StoriesDir.to_string())
                .env("STORYCHAT_STORIES_DIR")
                .num_args(1)
                .help(format!("Directory saved stories are written to. [default: {}]", Config::default(ConfigKey::StoriesDir)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::Username.to_string())
                .long(ConfigKey::Username.to_string())
                .env("STORYCHAT_USERNAME")
                .num_args(1)
                .help("Your name displayed above your chat messages. Defaults to the USER environment variable.")
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::GroqURL.to_string())
                .long(ConfigKey::GroqURL.to_string())
                .env("STORYCHAT_GROQ_URL")
                .num_args(1)
                .help(format!("Groq API URL when using the Groq backend. [default: {}]", Config::default(ConfigKey::GroqURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::GroqToken.to_string())
                .long(ConfigKey::GroqToken.to_string())
                .env("GROQ_API_KEY")
                .hide_env_values(true)
                .num_args(1)
                .help("Groq API key when using the Groq backend.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::OpenaiURL.to_string())
                .long(ConfigKey::OpenaiURL.to_string())
                .env("STORYCHAT_OPENAI_URL")
                .num_args(1)
                .help(format!("OpenAI API URL when using the OpenAI backend. Can be swapped to a compatible proxy. [default: {}]", Config::default(ConfigKey::OpenaiURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::OpenaiToken.to_string())
                .long(ConfigKey::OpenaiToken.to_string())
                .env("OPENAI_API_KEY")
                .hide_env_values(true)
                .num_args(1)
                .help("OpenAI API token when using the OpenAI backend.")
                .global(true),
        );
}

async fn handle_stories(matches: &ArgMatches, subcmd_matches: &ArgMatches) -> Result<bool> {
    Config::load(build(), vec![matches, subcmd_matches]).await?;

    match subcmd_matches.subcommand() {
        Some(("dir", _)) => {
            let dir = Stories::default().stories_dir.to_string_lossy().to_string();
            println!("{dir}");
        }
        Some(("list", _)) => {
            print_stories_list().await?;
        }
        Some(("show", show_matches)) => {
            if let Some(id) = show_matches.get_one::<String>("story-id") {
                print_story(id).await?;
            }
        }
        Some(("open", open_matches)) => {
            if let Some(id) = open_matches.get_one::<String>("story-id") {
                load_config_from_story(id).await?;
                return Ok(true);
            }

            return load_config_from_story_interactive().await;
        }
        Some(("delete", delete_matches)) => {
            if let Some(id) = delete_matches.get_one::<String>("story-id") {
                Stories::default().delete(id).await?;
                println!("Deleted story {id}");
            } else if delete_matches.get_flag("all") {
                Stories::default().delete_all().await?;
                println!("Deleted all stories");
            } else {
                subcommand_stories_delete().print_long_help()?;
            }
        }
        _ => {
            subcommand_stories().print_long_help()?;
        }
    }

    return Ok(false);
}

/// Parses arguments and loads config. Returns true when the chat UI should
/// start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    println!("{}", log_path().to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("stories", subcmd_matches)) => {
            return handle_stories(&matches, subcmd_matches).await;
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
