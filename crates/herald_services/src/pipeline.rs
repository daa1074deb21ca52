use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use herald_domain::{
    Authorizer, ChatProvider, CredentialRepository, EmailAddress, MailTransport, OutgoingMessage,
    Stage,
};

use crate::{ContentGenerator, CredentialStore, Dispatcher, Job, Renderer, TemplateEngine};

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub subject: String,
    pub characters: usize,
}

/// Runs one job end to end: credential, generation, rendering, dispatch.
/// Stages run strictly in sequence and the first failure aborts the run.
pub struct Pipeline<R, A, P, T> {
    credentials: CredentialStore<R, A>,
    generator: ContentGenerator<P>,
    renderer: Renderer,
    dispatcher: Dispatcher<T>,
    templates: Arc<TemplateEngine>,
    sender: EmailAddress,
    recipient: EmailAddress,
}

impl<R, A, P, T> Pipeline<R, A, P, T>
where
    R: CredentialRepository,
    A: Authorizer,
    P: ChatProvider,
    T: MailTransport,
{
    pub fn new(
        credentials: CredentialStore<R, A>,
        generator: ContentGenerator<P>,
        dispatcher: Dispatcher<T>,
        templates: Arc<TemplateEngine>,
        sender: EmailAddress,
        recipient: EmailAddress,
    ) -> Self {
        Self {
            credentials,
            generator,
            renderer: Renderer::new(templates.clone()),
            dispatcher,
            templates,
            sender,
            recipient,
        }
    }

    pub async fn run(&self, job: &dyn Job) -> anyhow::Result<RunSummary> {
        tracing::info!("=== {} run started: {} ===", job.name(), job.describe());

        let plan = stage(Stage::Configure, async { job.plan(&self.templates) }).await?;

        let credential = stage(Stage::Credential, self.credentials.acquire()).await?;
        tracing::info!("Credential acquired");

        let document = stage(
            Stage::Generate,
            self.generator.generate(plan.prompt, plan.max_tokens, plan.tools),
        )
        .await?;
        tracing::info!(characters = document.char_count(), "Document generated");

        let body = stage(Stage::Render, async {
            self.renderer.render(&document, &plan.subject, &plan.layout)
        })
        .await?;

        let message = OutgoingMessage::new(
            self.sender.clone(),
            self.recipient.clone(),
            plan.subject.clone(),
            body.plain,
            body.html,
        );
        stage(Stage::Dispatch, self.dispatcher.send(&credential, &message)).await?;

        tracing::info!("=== {} run complete ===", job.name());
        Ok(RunSummary { subject: plan.subject, characters: document.char_count() })
    }
}

/// Logs a failed stage with its full error chain before handing the error on.
pub async fn stage<T>(
    stage: Stage,
    future: impl Future<Output = anyhow::Result<T>>,
) -> anyhow::Result<T> {
    future
        .await
        .inspect_err(|error| tracing::error!(stage = %stage, error = ?error, "Stage failed"))
        .with_context(|| format!("{stage} stage failed"))
}
