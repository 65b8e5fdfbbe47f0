//! `stakegate join --platform <name>`.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::application::join::JoinState;
use crate::domain::describe;
use crate::error::{Error, Result};
use crate::infrastructure::bootstrap::Runtime;

/// Sign the join message and print the invite link the backend returns.
pub async fn execute(runtime: &Runtime, platform: &str, user: Option<String>) -> Result<()> {
    let workflow = runtime.join_workflow(platform, user)?;
    let mut updates = workflow.subscribe();

    let pb = output::spinner("Signing join message...");
    workflow.sign();
    let state = loop {
        let state = updates.borrow_and_update().clone();
        match &state {
            JoinState::Signing => pb.set_message("Signing join message..."),
            JoinState::Fetching => pb.set_message("Requesting invite..."),
            JoinState::Success(_) | JoinState::Error(_) | JoinState::Disabled => break state,
            JoinState::Idle => {}
        }
        if updates.changed().await.is_err() {
            break workflow.state();
        }
    };

    let invite = match state {
        JoinState::Success(invite) => {
            output::spinner_success(&pb, "Invite ready");
            invite
        }
        JoinState::Error(error) => {
            output::spinner_fail(&pb, &describe(&error).title);
            return Err(Error::Transaction(error));
        }
        _ => {
            output::spinner_fail(&pb, "Join cancelled");
            return Ok(());
        }
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "join",
            "platform": platform,
            "invite": invite.invite_link,
            "already_joined": invite.already_joined,
        }));
        return Ok(());
    }

    if invite.already_joined {
        output::success("Already a member");
    }
    output::field("Invite", output::highlight(&invite.invite_link));
    Ok(())
}
