use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use herald_domain::{DateWindow, Environment, Stage};
use herald_infra::{
    AnthropicProvider, CredentialFile, GmailTransport, InstalledAppAuthorizer, export_secrets,
    init_tracing, load_environment, load_goals,
};
use herald_services::{
    CoachingJob, ContentGenerator, CredentialStore, Dispatcher, NewsletterJob, Pipeline,
    TemplateEngine, stage,
};

use crate::{Cli, Command};

type Credentials = CredentialStore<CredentialFile, InstalledAppAuthorizer>;
type LivePipeline = Pipeline<CredentialFile, InstalledAppAuthorizer, AnthropicProvider, GmailTransport>;

/// Entry point shared by every binary.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = match cli.cwd {
        Some(cwd) => cwd,
        None => std::env::current_dir()?,
    };
    let env = load_environment(&cwd)?;

    match cli.command {
        Command::Coaching { date } => coaching(&env, date.unwrap_or_else(today)).await,
        Command::Newsletter { date } => newsletter(&env, date.unwrap_or_else(today)).await,
        Command::Auth { no_browser } => authorize(&env, no_browser).await,
        Command::Secrets => secrets(&env).await,
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

async fn coaching(env: &Environment, today: NaiveDate) -> anyhow::Result<()> {
    let _guard = init_tracing(&env.log_dir, "coaching.log")?;

    let (job, pipeline) = stage(Stage::Configure, async {
        let goals = load_goals(&env.goals_path).await?;
        let job = CoachingJob::new(goals, env.coachee_name.clone(), today)
            .goals_file(file_name(&env.goals_path));
        Ok((job, pipeline(env)?))
    })
    .await?;

    let summary = pipeline.run(&job).await?;
    tracing::info!(subject = %summary.subject, "Coaching e-mail sent");
    Ok(())
}

async fn newsletter(env: &Environment, today: NaiveDate) -> anyhow::Result<()> {
    let _guard = init_tracing(&env.log_dir, "newsletter.log")?;

    let pipeline = stage(Stage::Configure, async { pipeline(env) }).await?;
    let job = NewsletterJob::new(DateWindow::previous_week(today), env.max_search_uses);

    let summary = pipeline.run(&job).await?;
    tracing::info!(subject = %summary.subject, "Newsletter sent");
    Ok(())
}

async fn authorize(env: &Environment, no_browser: bool) -> anyhow::Result<()> {
    let _guard = init_tracing(&env.log_dir, "auth.log")?;
    tracing::info!("=== Authorization started ===");

    let credentials = stage(Stage::Configure, async { credentials(env, no_browser) }).await?;
    stage(Stage::Credential, credentials.authorize()).await?;

    tracing::info!(path = %env.token_path.display(), "=== Authorization complete ===");
    println!("Credential saved to {}", env.token_path.display());
    Ok(())
}

async fn secrets(env: &Environment) -> anyhow::Result<()> {
    let exports = export_secrets(&env.token_path, &env.client_secret_path).await?;

    println!("\n── CI secret values ──\n");
    for export in exports {
        match export.value {
            Some(value) => {
                println!("Secret name : {}", export.name);
                println!("Secret value: {value}\n");
            }
            None => println!(
                "[MISSING] {} not found, skipping {}\n",
                export.path.display(),
                export.name
            ),
        }
    }
    println!("Also add these secrets manually:");
    println!("  ANTHROPIC_API_KEY   the generation API key");
    println!("  RECIPIENT_EMAIL     the address that receives the e-mails");
    Ok(())
}

fn credentials(env: &Environment, headless: bool) -> anyhow::Result<Credentials> {
    let mut authorizer = InstalledAppAuthorizer::new(env.client_secret_path.clone())?;
    if headless {
        authorizer = authorizer.headless();
    }
    Ok(CredentialStore::new(
        Arc::new(CredentialFile::new(env.token_path.clone())),
        Arc::new(authorizer),
        env.scopes(),
    ))
}

fn pipeline(env: &Environment) -> anyhow::Result<LivePipeline> {
    let provider = AnthropicProvider::new(env.anthropic_url.clone(), env.api_key()?.clone());
    let transport = GmailTransport::new(env.gmail_url.clone());

    Ok(Pipeline::new(
        credentials(env, false)?,
        ContentGenerator::new(Arc::new(provider), env.model.clone(), env.max_tool_rounds),
        Dispatcher::new(Arc::new(transport)),
        Arc::new(TemplateEngine::new()?),
        env.sender()?.clone(),
        env.recipient()?.clone(),
    ))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
