use super::output::{task_detail, task_line, validation_lines};
use crate::cli::commands::{Cli, Commands, InferencesArgs};
use crate::cli::{RuleCommands, TaskCommands, ValidateCommands};
use anyhow::{Context, Result, bail};
use arthur_console::Config;
use arthur_console::actions::{
    self, Credential, PromptValidationForm, ResponseValidationForm, RuleForm, RuleToggleForm,
    Session, TaskForm, resolve_credential, test_credentials,
};
use arthur_console::filters::{FilterEdit, FilterState};
use arthur_console::fetch::{FetchState, InferencesQuery};
use arthur_console::ui::style;
use arthur_console::view::{ExpandedRows, TablePage, TableView, error_message, render_table};
use dialoguer::Password;
use std::time::Duration;
use tracing::info;

pub async fn dispatch(cli: Cli, mut config: Config) -> Result<()> {
    if let Some(base_url) = cli.base_url.as_deref() {
        config.base_url = Some(base_url.trim().to_string());
        config.validate()?;
    }
    let credential = resolve_credential(cli.api_key.as_deref(), &config);

    match cli.command {
        Commands::Status => {
            println!("{}", super::status::render_status(&config, credential.as_ref()));
            Ok(())
        }

        Commands::Connect { save } => connect(&mut config, credential, save).await,

        #[cfg(feature = "tui")]
        Commands::Tui => arthur_console::tui::run(config, credential).await,

        Commands::Inferences(args) => {
            let session = Session::require(&config, credential)?;
            list_inferences(&session, &config, args).await
        }

        Commands::Task { task_command } => {
            let session = Session::require(&config, credential)?;
            run_task(&session, task_command).await
        }

        Commands::Rule { rule_command } => {
            let session = Session::require(&config, credential)?;
            run_rule(&session, rule_command).await
        }

        Commands::Validate { validate_command } => {
            let session = Session::require(&config, credential)?;
            run_validate(&session, validate_command).await
        }
    }
}

async fn connect(config: &mut Config, credential: Option<Credential>, save: bool) -> Result<()> {
    let base_url = config.require_base_url()?.to_string();
    let raw_key = match credential {
        Some(credential) => credential.expose().to_string(),
        None => Password::new()
            .with_prompt(t!("connect.prompt"))
            .interact()
            .context("Failed to read API key")?,
    };

    println!("{}", style::dim(t!("connect.checking", url = &base_url)));
    let check = test_credentials(Some(&base_url), &raw_key, &config.http).await;
    if !check.success {
        bail!(
            "{}",
            check
                .error
                .unwrap_or_else(|| "Failed to connect with the provided API key".into())
        );
    }
    println!("{}", style::success(t!("connect.connected", url = &base_url)));

    if save {
        config.api_key = Credential::new(&raw_key).map(|c| c.expose().to_string());
        config.save()?;
        println!(
            "{}",
            style::dim(t!(
                "connect.saved",
                path = config.config_path.display().to_string()
            ))
        );
    }
    Ok(())
}

async fn list_inferences(
    session: &Session,
    config: &Config,
    args: InferencesArgs,
) -> Result<()> {
    let mut filters = FilterState::new(args.page_size.unwrap_or(config.ui.default_page_size));
    filters.edit_draft(FilterEdit::TaskName(args.task_name));
    filters.edit_draft(FilterEdit::UserId(args.user_id));
    filters.edit_draft(FilterEdit::RuleStatus(args.status));
    filters.edit_draft(FilterEdit::DateRange {
        from: args.from,
        to: args.to,
    });
    filters.apply();
    filters.set_page(args.page.saturating_sub(1));

    let stale_after = Duration::from_secs(config.cache.stale_after_secs);
    let query = InferencesQuery::with_stale_after(stale_after);
    let state = query.fetch(Some(session), &filters.applied).await;

    let page = match &state {
        FetchState::Failed(message) => bail!("{}", error_message(message)),
        FetchState::Loaded(page) => Some(page),
        FetchState::Idle | FetchState::Loading => None,
    };

    if args.json {
        if let Some(page) = page {
            println!("{}", serde_json::to_string_pretty(page.as_ref())?);
        }
        return Ok(());
    }

    let mut expanded = ExpandedRows::default();
    if let Some(page) = page {
        let ids = page.inferences.iter().map(|inference| inference.id.as_str());
        if args.expand_all {
            expanded.expand_all(ids);
        } else {
            expanded.expand_all(ids.filter(|id| {
                args.expand.iter().any(|wanted| id.starts_with(wanted.as_str()))
            }));
        }
    }

    let view = TableView::new(&state, || {
        let (inferences, count) = page.map_or((&[][..], 0), |p| (&p.inferences[..], p.count));
        TablePage::build(
            inferences,
            count,
            filters.applied.page(),
            filters.applied.page_size().get(),
            &expanded,
        )
    });
    for line in render_table(&view, config.ui.message_width) {
        println!("{line}");
    }
    Ok(())
}

async fn run_task(session: &Session, command: TaskCommands) -> Result<()> {
    match command {
        TaskCommands::Create { name } => {
            let request = TaskForm { name }.build()?;
            let task = actions::create_task(session, &request).await?;
            info!(task_id = %task.id, "task created");
            println!("{}", style::success(t!("tasks.created", name = &task.name)));
            println!("{}", task_line(&task));
        }
        TaskCommands::Get { task_id } => {
            let task = actions::get_task(session, &task_id).await?;
            for line in task_detail(&task) {
                println!("{line}");
            }
        }
        TaskCommands::Search { term } => {
            let tasks = actions::search_tasks(session, term.as_deref()).await?;
            if tasks.is_empty() {
                println!("{}", style::dim(t!("tasks.none")));
            }
            for task in &tasks {
                println!("{}", task_line(task));
            }
        }
        TaskCommands::Archive { task_id } => {
            actions::archive_task(session, &task_id).await?;
            println!("{}", style::success(t!("tasks.archived", id = task_id)));
        }
    }
    Ok(())
}

async fn run_rule(session: &Session, command: RuleCommands) -> Result<()> {
    match command {
        RuleCommands::Create(args) => {
            let form = RuleForm {
                task_id: args.task_id,
                name: args.name,
                rule_type: args.rule_type,
                apply_to_prompt: args.prompt,
                apply_to_response: args.response,
                keywords: args.keywords,
                regex_patterns: args.regex,
                threshold: args.threshold,
                confidence_threshold: args.confidence_threshold,
                disabled_pii_entities: args.disabled_entities,
                allow_list: args.allow_list,
                hint: args.hint,
                examples_json: args.examples,
            };
            let (task_id, request) = form.build()?;
            let rule = actions::create_task_rule(session, &task_id, &request).await?;
            info!(rule_id = %rule.id, %task_id, "rule created");
            println!("{}", style::success(t!("rules.created", name = &rule.name)));
            println!("{}", super::output::rule_line(&rule));
        }
        RuleCommands::Enable { task_id, rule_id } => {
            toggle_rule(session, task_id, rule_id, true).await?;
        }
        RuleCommands::Disable { task_id, rule_id } => {
            toggle_rule(session, task_id, rule_id, false).await?;
        }
        RuleCommands::Archive { task_id, rule_id } => {
            if task_id.is_empty() || rule_id.is_empty() {
                bail!("Task ID and Rule ID are required");
            }
            actions::archive_task_rule(session, &task_id, &rule_id).await?;
            println!("{}", style::success(t!("rules.archived", id = rule_id)));
        }
    }
    Ok(())
}

async fn toggle_rule(
    session: &Session,
    task_id: String,
    rule_id: String,
    enabled: bool,
) -> Result<()> {
    let (task_id, rule_id, request) = RuleToggleForm {
        task_id,
        rule_id,
        enabled,
    }
    .build()?;
    actions::update_task_rule(session, &task_id, &rule_id, &request).await?;
    let message = if enabled {
        t!("rules.enabled", id = rule_id)
    } else {
        t!("rules.disabled", id = rule_id)
    };
    println!("{}", style::success(message));
    Ok(())
}

async fn run_validate(session: &Session, command: ValidateCommands) -> Result<()> {
    let result = match command {
        ValidateCommands::Prompt {
            task_id,
            prompt,
            conversation_id,
            user_id,
        } => {
            let (task_id, request) = PromptValidationForm {
                task_id,
                prompt,
                conversation_id,
                user_id,
            }
            .build()?;
            actions::validate_prompt(session, &task_id, &request).await?
        }
        ValidateCommands::Response {
            task_id,
            inference_id,
            response,
            context,
        } => {
            let (task_id, inference_id, request) = ResponseValidationForm {
                task_id,
                inference_id,
                response,
                context,
            }
            .build()?;
            actions::validate_response(session, &task_id, &inference_id, &request).await?
        }
    };
    for line in validation_lines(&result) {
        println!("{line}");
    }
    Ok(())
}
