//! Miette-based error diagnostics for CLI error presentation.
//!
//! Config parse failures point at the offending span of the file;
//! transaction failures carry the same title and description the workflow
//! shows in its error state.

use std::path::Path;

use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use thiserror::Error;

use crate::domain::describe;
use crate::error::{ConfigError, Error, WorkflowError};

/// Configuration error with source location context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(stakegate::config))]
pub struct ConfigDiagnostic {
    pub message: String,

    #[source_code]
    pub src: NamedSource<String>,

    #[label("here")]
    pub span: Option<SourceSpan>,

    #[help]
    pub help: Option<String>,
}

/// Configuration error without a location in the file.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(stakegate::config))]
pub struct SettingDiagnostic {
    pub message: String,

    #[help]
    pub help: Option<String>,
}

/// Failure of a wallet, chain or backend request.
#[derive(Debug, Error, Diagnostic)]
#[error("{title}")]
#[diagnostic(code(stakegate::transaction))]
pub struct TransactionDiagnostic {
    pub title: String,

    #[help]
    pub description: String,
}

/// Request the workflow refused.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(stakegate::workflow))]
pub struct WorkflowDiagnostic {
    pub message: String,

    #[help]
    pub help: Option<String>,
}

fn workflow_help(error: &WorkflowError) -> Option<String> {
    match error {
        WorkflowError::NoAccount => Some(
            "set WALLET_PRIVATE_KEY, or [wallet] account for read-only commands".to_string(),
        ),
        WorkflowError::StakeNotEnabled => {
            Some("approve the token first with `stakegate approve --level <id>`".to_string())
        }
        WorkflowError::UnknownLevel(_) | WorkflowError::NotStakeable(_) => {
            Some("list levels with `stakegate levels`".to_string())
        }
        WorkflowError::NotOpen | WorkflowError::InvalidAmount { .. } => None,
    }
}

/// Turn a crate error into a rendered diagnostic.
///
/// `config_path` is re-read to show parse errors in context.
#[must_use]
pub fn report(error: Error, config_path: &Path) -> Report {
    match error {
        Error::Config(ConfigError::Parse(parse)) => {
            let content = std::fs::read_to_string(config_path).unwrap_or_default();
            Report::new(ConfigDiagnostic {
                message: format!("invalid configuration: {}", parse.message()),
                src: NamedSource::new(config_path.display().to_string(), content),
                span: parse.span().map(SourceSpan::from),
                help: None,
            })
        }
        Error::Config(ConfigError::ReadFile(io)) => Report::new(SettingDiagnostic {
            message: format!("cannot read {}: {io}", config_path.display()),
            help: Some("pass the config file with --config <path>".to_string()),
        }),
        Error::Config(other) => Report::new(SettingDiagnostic {
            message: other.to_string(),
            help: Some(format!("check {}", config_path.display())),
        }),
        Error::Transaction(tx) => {
            let info = describe(&tx);
            Report::new(TransactionDiagnostic {
                title: info.title,
                description: info.description,
            })
        }
        Error::Workflow(workflow) => Report::new(WorkflowDiagnostic {
            message: workflow.to_string(),
            help: workflow_help(&workflow),
        }),
        other => miette::miette!("{other}"),
    }
}
