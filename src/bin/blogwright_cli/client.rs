#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::sync::Arc;

use blogwright::application::auth::{AuthError, AuthService};
use blogwright::application::backend::CollectionPath;
use blogwright::application::content::{ContentError, ContentService, ContentTargets};
use blogwright::config::{self, BackendSettings, LoadError, Settings};
use blogwright::domain::slug::SlugError;
use blogwright::infra::appwrite::AppwriteClient;
use blogwright::infra::error::InfraError;
use blogwright_api_types::Session;
use thiserror::Error;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("credentials are required (use --email with --password-file or BLOGWRIGHT_PASSWORD)")]
    MissingCredentials,
    #[error("failed to read password file: {0}")]
    PasswordFile(std::io::Error),
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("invalid slug: {0}")]
    Slug(#[from] SlugError),
    #[error("{what} `{id}` was not deleted")]
    NotDeleted { what: &'static str, id: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to render output: {0}")]
    Output(String),
}

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Services wired against one backend client, plus the identity to act as.
#[derive(Clone)]
pub struct Ctx {
    pub settings: Settings,
    pub auth: AuthService,
    pub content: ContentService,
    credentials: Option<Credentials>,
}

impl Ctx {
    pub fn new(settings: Settings, credentials: Option<Credentials>) -> Result<Self, CliError> {
        let client = Arc::new(AppwriteClient::new(&settings.backend)?);
        let auth = AuthService::new(client.clone());
        let content = ContentService::new(
            client.clone(),
            client,
            content_targets(&settings.backend),
        );
        Ok(Self {
            settings,
            auth,
            content,
            credentials,
        })
    }

    pub fn credentials(&self) -> Result<&Credentials, CliError> {
        self.credentials.as_ref().ok_or(CliError::MissingCredentials)
    }

    /// Open a session for the configured credentials.
    pub async fn sign_in(&self) -> Result<Session, CliError> {
        let credentials = self.credentials()?;
        Ok(self
            .auth
            .login(&credentials.email, &credentials.password)
            .await?)
    }
}

pub fn content_targets(backend: &BackendSettings) -> ContentTargets {
    ContentTargets {
        posts: CollectionPath::new(&backend.database_id, &backend.collection_id),
        bucket_id: backend.bucket_id.clone(),
    }
}

pub fn build_ctx_from_cli(cli: &Cli) -> Result<Ctx, CliError> {
    let settings = config::load(cli.config_file.as_deref(), &cli.overrides)?;
    let credentials = read_credentials(cli)?;
    Ctx::new(settings, credentials)
}

fn read_credentials(cli: &Cli) -> Result<Option<Credentials>, CliError> {
    let Some(email) = cli.email.clone() else {
        return Ok(None);
    };
    let password = if let Some(path) = &cli.password_file {
        fs::read_to_string(path)
            .map_err(CliError::PasswordFile)?
            .trim_end_matches(['\r', '\n'])
            .to_string()
    } else if let Some(password) = cli.password_env.clone() {
        password
    } else {
        return Ok(None);
    };
    Ok(Some(Credentials { email, password }))
}
