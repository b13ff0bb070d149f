use clap::{Args, Subcommand};

/// Task management subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TaskCommands {
    /// Create a new task
    Create {
        /// Task name
        name: String,
    },
    /// Show one task and its rules
    Get {
        /// Task ID
        task_id: String,
    },
    /// List tasks, optionally filtered by name
    Search {
        /// Search term
        term: Option<String>,
    },
    /// Archive a task
    Archive {
        /// Task ID
        task_id: String,
    },
}

/// Rule management subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RuleCommands {
    /// Add a rule to a task
    Create(RuleCreateArgs),
    /// Enable a task rule
    Enable {
        task_id: String,
        rule_id: String,
    },
    /// Disable a task rule
    Disable {
        task_id: String,
        rule_id: String,
    },
    /// Archive a task rule
    Archive {
        task_id: String,
        rule_id: String,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RuleCreateArgs {
    /// Task ID
    pub task_id: String,

    /// Rule name
    #[arg(long)]
    pub name: String,

    /// KeywordRule, RegexRule, ToxicityRule, PIIDataRule,
    /// ModelSensitiveDataRule, ModelHallucinationRuleV2 or PromptInjectionRule
    #[arg(long = "type")]
    pub rule_type: String,

    /// Apply the rule to prompts
    #[arg(long)]
    pub prompt: bool,

    /// Apply the rule to responses
    #[arg(long)]
    pub response: bool,

    /// Comma-separated keywords (KeywordRule)
    #[arg(long)]
    pub keywords: Option<String>,

    /// Comma-separated patterns (RegexRule)
    #[arg(long)]
    pub regex: Option<String>,

    /// Toxicity threshold between 0 and 1 (ToxicityRule)
    #[arg(long)]
    pub threshold: Option<String>,

    /// Minimum entity confidence (PIIDataRule)
    #[arg(long)]
    pub confidence_threshold: Option<String>,

    /// Comma-separated entity types to ignore (PIIDataRule)
    #[arg(long)]
    pub disabled_entities: Option<String>,

    /// Comma-separated values never reported (PIIDataRule)
    #[arg(long)]
    pub allow_list: Option<String>,

    /// Hint for the classifier (ModelSensitiveDataRule)
    #[arg(long)]
    pub hint: Option<String>,

    /// JSON array of {"example": "...", "result": true|false} (ModelSensitiveDataRule)
    #[arg(long)]
    pub examples: Option<String>,
}

/// Ad-hoc validation subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ValidateCommands {
    /// Run a task's prompt rules against a prompt
    Prompt {
        task_id: String,
        prompt: String,
        #[arg(long)]
        conversation_id: Option<String>,
        #[arg(long)]
        user_id: Option<String>,
    },
    /// Run a task's response rules against a response
    Response {
        task_id: String,
        /// Inference ID returned by `validate prompt`
        inference_id: String,
        response: String,
        /// Retrieved context the response should be grounded in
        #[arg(long)]
        context: Option<String>,
    },
}
