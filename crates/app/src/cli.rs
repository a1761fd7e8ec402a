//! Command line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hireloop_domain::JobId;

#[derive(Parser, Debug)]
#[command(
    name = "hireloop",
    about = "Command line client for the Hireloop recruitment platform",
    version
)]
pub struct Cli {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session
    Login(LoginArgs),
    /// Revoke the session and forget it locally
    Logout,
    /// Show who is logged in
    Whoami,
    /// Work with job postings
    Job {
        #[command(subcommand)]
        command: JobCommand,
    },
    /// List your own applications (candidates)
    Applications,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,
    /// Account password. Falls back to `HIRELOOP_PASSWORD`, then to a
    /// prompt on stdin; the prompt does not hide what is typed
    #[arg(long, env = "HIRELOOP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum JobCommand {
    /// Show a job posting and the actions available to you
    Show {
        /// Job id
        job_id: JobId,
    },
    /// Apply to an open job (candidates)
    Apply {
        /// Job id
        job_id: JobId,
        /// URL of the resume to submit
        #[arg(long)]
        resume: Option<String>,
    },
    /// Close an ongoing job (organization owners)
    Close {
        /// Job id
        job_id: JobId,
    },
    /// List the applicants of a job (organizations)
    Applicants {
        /// Job id
        job_id: JobId,
    },
}
