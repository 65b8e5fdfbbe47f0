//! Wallet, chain and backend failures held by the workflow sub-machines.
//!
//! The workflow does not branch on the failure kind: every kind lands in the
//! same `error` state and is retried through the trigger that caused it. The
//! kind only selects the message shown to the user (see [`describe`]).

use serde::Serialize;
use thiserror::Error;

/// Failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TxErrorKind {
    /// The user declined the request in their wallet.
    UserRejected,
    /// Wallet, RPC or network transport failure.
    Transport,
    /// The transaction was mined but reverted.
    Reverted,
    /// The community backend failed or returned a non-success status.
    Backend,
}

/// A failure reported by a wallet, contract or backend collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct TxError {
    pub kind: TxErrorKind,
    pub message: String,
}

pub type TxResult<T> = std::result::Result<T, TxError>;

impl TxError {
    pub fn new(kind: TxErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn user_rejected(message: impl Into<String>) -> Self {
        Self::new(TxErrorKind::UserRejected, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(TxErrorKind::Transport, message)
    }

    pub fn reverted(message: impl Into<String>) -> Self {
        Self::new(TxErrorKind::Reverted, message)
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(TxErrorKind::Backend, message)
    }

    /// Classify a raw provider or wallet error message.
    ///
    /// EIP-1193 wallets report rejections with code 4001; nodes report
    /// reverts with "execution reverted".
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let kind = if lower.contains("user rejected")
            || lower.contains("user denied")
            || lower.contains("4001")
        {
            TxErrorKind::UserRejected
        } else if lower.contains("revert") {
            TxErrorKind::Reverted
        } else {
            TxErrorKind::Transport
        };
        Self { kind, message }
    }
}

/// Title and description for presenting a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub title: String,
    pub description: String,
}

/// Produce a user-facing title and description for a failure.
#[must_use]
pub fn describe(error: &TxError) -> ErrorInfo {
    let (title, fallback) = match error.kind {
        TxErrorKind::UserRejected => ("Action rejected", "The request was rejected in the wallet"),
        TxErrorKind::Transport => ("Network error", "Unable to reach the wallet or network"),
        TxErrorKind::Reverted => ("Transaction failed", "The transaction was reverted on-chain"),
        TxErrorKind::Backend => ("Backend error", "The backend couldn't handle the request"),
    };
    let description = if error.message.trim().is_empty() {
        fallback.to_string()
    } else {
        error.message.clone()
    };
    ErrorInfo {
        title: title.to_string(),
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_metamask_rejection() {
        let err = TxError::classify("MetaMask Tx Signature: User denied transaction signature.");
        assert_eq!(err.kind, TxErrorKind::UserRejected);
    }

    #[test]
    fn classify_rejection_code() {
        let err = TxError::classify("code 4001: request rejected");
        assert_eq!(err.kind, TxErrorKind::UserRejected);
    }

    #[test]
    fn classify_revert() {
        let err = TxError::classify("server returned an error: execution reverted: ERC20: insufficient balance");
        assert_eq!(err.kind, TxErrorKind::Reverted);
    }

    #[test]
    fn classify_defaults_to_transport() {
        let err = TxError::classify("connection reset by peer");
        assert_eq!(err.kind, TxErrorKind::Transport);
        assert_eq!(err.to_string(), "connection reset by peer");
    }

    #[test]
    fn describe_uses_kind_title() {
        let info = describe(&TxError::backend("HTTP 500"));
        assert_eq!(info.title, "Backend error");
        assert_eq!(info.description, "HTTP 500");
    }

    #[test]
    fn describe_falls_back_for_empty_message() {
        let info = describe(&TxError::user_rejected(""));
        assert_eq!(info.title, "Action rejected");
        assert_eq!(info.description, "The request was rejected in the wallet");
    }
}
