//! Wiring of adapters and use cases, and command execution.

use std::io::{BufRead, IsTerminal};
use std::sync::Arc;

use hireloop_application::{
    ApplyToJob, ApplyToJobInput, AreaAccess, ClearSession, CloseJob, EnterArea, FetchJob,
    HttpTokenRefresher, ListApplicants, ListApplications, Login, LoginInput, Logout, LogoutReason,
    SessionClient, SessionStatus, SessionStore,
};
use hireloop_domain::{ApplyOutcome, UserType};
use hireloop_infrastructure::{ClientConfig, FileSessionStore, ReqwestHttpClient, TokioFileSystem};
use serde::Serialize;

use crate::cli::{Command, JobCommand, LoginArgs};
use crate::error::CliError;

/// Everything a command needs, built once per invocation.
pub struct Context {
    config: ClientConfig,
    http: Arc<ReqwestHttpClient>,
    store: Arc<dyn SessionStore>,
    unauthorized: Arc<ClearSession>,
    client: Arc<SessionClient<ReqwestHttpClient>>,
}

impl Context {
    /// Builds the adapters described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub async fn build(config: ClientConfig) -> Result<Self, CliError> {
        let http = Arc::new(ReqwestHttpClient::new(
            config.api_base_url.clone(),
            &config.user_agent,
            config.request_timeout(),
        )?);
        let store: Arc<dyn SessionStore> =
            Arc::new(FileSessionStore::open(TokioFileSystem::new(), &config.session_file).await);
        let refresher = Arc::new(HttpTokenRefresher::new(
            http.clone(),
            store.clone(),
            config.endpoints.refresh.clone(),
        ));
        let unauthorized = Arc::new(ClearSession::new(store.clone()));
        let client = Arc::new(
            SessionClient::new(http.clone(), store.clone(), refresher, unauthorized.clone())
                .with_second_unauthorized(config.second_unauthorized),
        );

        tracing::debug!(
            api = %config.api_base_url,
            session_file = %config.session_file.display(),
            "client ready"
        );

        Ok(Self {
            config,
            http,
            store,
            unauthorized,
            client,
        })
    }

    /// Runs one command.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the command.
    pub async fn run(&self, command: Command) -> Result<(), CliError> {
        match command {
            Command::Login(args) => self.login(args).await,
            Command::Logout => {
                let endpoint = self.config.endpoints.logout.clone();
                Logout::new(self.http.clone(), self.store.clone(), endpoint)
                    .execute()
                    .await?;
                println!("Logged out");
                Ok(())
            }
            Command::Whoami => {
                let status = SessionStatus::of(&self.store.read().await);
                println!("{}", status.display_message());
                Ok(())
            }
            Command::Job { command } => self.job(command).await,
            Command::Applications => {
                self.enter(UserType::User).await?;
                let endpoint = self.config.endpoints.my_applications.clone();
                let applications = ListApplications::new(self.client.clone(), endpoint)
                    .execute()
                    .await?;
                print_json(&applications)
            }
        }
    }

    async fn login(&self, args: LoginArgs) -> Result<(), CliError> {
        let password = match args.password {
            Some(password) => password,
            None => read_password()?,
        };
        let endpoint = self.config.endpoints.login.clone();
        let identity = Login::new(self.http.clone(), self.store.clone(), endpoint)
            .execute(&LoginInput {
                email: args.email,
                password,
            })
            .await?;
        match identity {
            Some(identity) => println!("Logged in as {} ({})", identity.email, identity.user_type),
            None => println!("Logged in"),
        }
        Ok(())
    }

    async fn job(&self, command: JobCommand) -> Result<(), CliError> {
        let fetch = FetchJob::new(self.client.clone(), self.config.endpoints.clone());
        match command {
            JobCommand::Show { job_id } => {
                let job = fetch.execute(&job_id).await?;
                let actions = self
                    .store
                    .read()
                    .await
                    .identity()
                    .map(|identity| job.actions_for(identity.actor()))
                    .unwrap_or_default();
                print_json(&job)?;
                let actions: Vec<String> = actions.iter().map(ToString::to_string).collect();
                if actions.is_empty() {
                    println!("No actions available");
                } else {
                    println!("Available actions: {}", actions.join(", "));
                }
                Ok(())
            }
            JobCommand::Apply { job_id, resume } => {
                self.enter(UserType::User).await?;
                let job = fetch.execute(&job_id).await?;
                let outcome = ApplyToJob::new(self.client.clone(), self.config.endpoints.clone())
                    .execute(&ApplyToJobInput {
                        job,
                        resume_url: resume,
                    })
                    .await?;
                match outcome {
                    ApplyOutcome::Applied => println!("Applied to job {job_id}"),
                    ApplyOutcome::AlreadyRegistered => {
                        println!("Already applied to job {job_id}");
                    }
                }
                Ok(())
            }
            JobCommand::Close { job_id } => {
                self.enter(UserType::Organization).await?;
                let job = fetch.execute(&job_id).await?;
                let closed = CloseJob::new(self.client.clone(), self.config.endpoints.clone())
                    .execute(&job)
                    .await?;
                println!("Job {} is now {}", closed.job_id, closed.status);
                Ok(())
            }
            JobCommand::Applicants { job_id } => {
                self.enter(UserType::Organization).await?;
                let applicants =
                    ListApplicants::new(self.client.clone(), self.config.endpoints.clone())
                        .execute(&job_id)
                        .await?;
                print_json(&applicants)
            }
        }
    }

    /// Runs the area guard for commands restricted to one account kind.
    async fn enter(&self, area: UserType) -> Result<(), CliError> {
        let access = EnterArea::new(self.store.clone(), self.unauthorized.clone())
            .execute(area)
            .await;
        match access {
            AreaAccess::Granted => Ok(()),
            AreaAccess::Denied => Err(CliError::AreaDenied(area)),
        }
    }

    /// The forced logout recorded during this invocation, if any.
    pub fn forced_logout(&self) -> Option<LogoutReason> {
        self.unauthorized.last_reason()
    }
}

/// Prompts for the password on stdin. Input is echoed, so interactive
/// users are pointed at `HIRELOOP_PASSWORD` first.
fn read_password() -> Result<String, CliError> {
    if std::io::stdin().is_terminal() {
        eprintln!("warning: the password will be visible; set HIRELOOP_PASSWORD to avoid this");
    }
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
