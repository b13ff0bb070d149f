use super::{RuleCommands, TaskCommands, ValidateCommands};
use arthur_console::api::RuleStatus;
use arthur_console::filters::{PageSize, parse_date_bound};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::str::FromStr;

/// `arthur-console` - terminal administration console for the Arthur GenAI Engine.
#[derive(Parser, Debug)]
#[command(name = "arthur-console")]
#[command(version)]
#[command(
    about = "Browse inferences and manage tasks on an Arthur GenAI Engine.",
    long_about = None
)]
pub struct Cli {
    /// API key (overrides ARTHUR_API_KEY and the config file)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Engine base URL (overrides ARTHUR_BASE_URL and the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// More logging: -v for debug, -vv for trace
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List inferences with their rule results
    Inferences(InferencesArgs),

    /// Manage tasks
    Task {
        #[command(subcommand)]
        task_command: TaskCommands,
    },

    /// Manage task rules
    Rule {
        #[command(subcommand)]
        rule_command: RuleCommands,
    },

    /// Validate a prompt or response against a task
    Validate {
        #[command(subcommand)]
        validate_command: ValidateCommands,
    },

    /// Check an API key against the engine
    Connect {
        /// Store the key in config.toml once it works
        #[arg(long)]
        save: bool,
    },

    /// Show configuration status
    Status,

    /// Open the interactive inference browser
    #[cfg(feature = "tui")]
    Tui,
}

impl Commands {
    /// Whether the command takes over the whole terminal.
    pub fn is_full_screen(&self) -> bool {
        #[cfg(feature = "tui")]
        if matches!(self, Self::Tui) {
            return true;
        }
        false
    }
}

#[derive(Args, Debug, Clone)]
pub struct InferencesArgs {
    /// Filter by task name
    #[arg(long)]
    pub task_name: Option<String>,

    /// Filter by user ID
    #[arg(long)]
    pub user_id: Option<String>,

    /// Filter by rule status (pass, fail, skipped, unavailable,
    /// partially-unavailable, model-not-available)
    #[arg(long, value_parser = <RuleStatus as FromStr>::from_str)]
    pub status: Option<RuleStatus>,

    /// Earliest creation time (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_date_bound)]
    pub from: Option<DateTime<Utc>>,

    /// Latest creation time (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_date_bound)]
    pub to: Option<DateTime<Utc>>,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Rows per page (10, 25, 50 or 100)
    #[arg(long)]
    pub page_size: Option<PageSize>,

    /// Show the detail panel for an inference (ID or ID prefix, repeatable)
    #[arg(long)]
    pub expand: Vec<String>,

    /// Show the detail panel for every inference
    #[arg(long, conflicts_with = "expand")]
    pub expand_all: bool,

    /// Print the raw page as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_has_no_flag_conflicts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn inferences_flags_parse() {
        let cli = Cli::try_parse_from([
            "arthur-console",
            "-vv",
            "inferences",
            "--status",
            "partially-unavailable",
            "--from",
            "2024-01-01",
            "--page",
            "3",
            "--page-size",
            "25",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Inferences(args) = cli.command else {
            panic!("expected inferences command");
        };
        assert_eq!(args.status, Some(RuleStatus::PartiallyUnavailable));
        assert_eq!(args.page, 3);
        assert_eq!(args.page_size.map(PageSize::get), Some(25));
        assert!(args.from.is_some());
    }

    #[test]
    fn status_flag_maps_to_wire_spelling() {
        use arthur_console::filters::{FilterEdit, InferenceFilters};

        let cli =
            Cli::try_parse_from(["arthur-console", "inferences", "--status", "fail"]).unwrap();
        let Commands::Inferences(args) = cli.command else {
            panic!("expected inferences command");
        };
        assert_eq!(args.status, Some(RuleStatus::Fail));

        let query = InferenceFilters::default()
            .edited(FilterEdit::RuleStatus(args.status))
            .to_query_params()
            .to_query_string();
        assert!(query.contains("rule_statuses=Fail"), "{query}");
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(
            Cli::try_parse_from(["arthur-console", "inferences", "--status", "maybe"]).is_err()
        );
    }

    #[test]
    fn invalid_page_size_is_rejected() {
        assert!(
            Cli::try_parse_from(["arthur-console", "inferences", "--page-size", "7"]).is_err()
        );
        assert!(Cli::try_parse_from(["arthur-console", "inferences", "--page", "0"]).is_err());
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from([
            "arthur-console",
            "task",
            "search",
            "--api-key",
            "k",
            "--base-url",
            "https://engine.example.com",
        ])
        .unwrap();
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        assert!(matches!(
            cli.command,
            Commands::Task {
                task_command: TaskCommands::Search { term: None }
            }
        ));
    }
}
