use log::info;
use picontrol_logic::{Credentials, ServoCommand, SyncError};
use reqwest::StatusCode;

use crate::{
    RemoteClient,
    server::{LOGIN_PATH, REGISTER_PATH, SET_SERVO_PATH},
    wire::{MessageReply, StatusReply},
};

impl RemoteClient {
    /// Log in, returns the server's greeting to show the user
    pub async fn login(&self, credentials: &Credentials) -> Result<String, SyncError> {
        let (status, reply) = self
            .post_json::<MessageReply>(LOGIN_PATH, credentials)
            .await?;
        if status.is_success() {
            info!("Logged in as {}", credentials.username);
            Ok(reply
                .message
                .unwrap_or_else(|| "Login successful.".to_string()))
        } else {
            Err(SyncError::RemoteRejected(reply.error.unwrap_or_else(|| {
                "Incorrect username or password.".to_string()
            })))
        }
    }

    /// Create an account, only the status code of the answer matters
    pub async fn register(&self, credentials: &Credentials) -> Result<(), SyncError> {
        let (status, _) = self.post(REGISTER_PATH, credentials).await?;
        match status {
            s if s.is_success() => {
                info!("Registered {}", credentials.username);
                Ok(())
            }
            StatusCode::BAD_REQUEST => Err(SyncError::RemoteRejected(
                "Username or password already taken.".to_string(),
            )),
            _ => Err(SyncError::RemoteRejected(
                "An unknown error occurred.".to_string(),
            )),
        }
    }

    pub async fn set_servo(&self, command: &ServoCommand) -> Result<(), SyncError> {
        let (status, reply) = self
            .post_json::<StatusReply>(SET_SERVO_PATH, command)
            .await?;
        reply.into_result(status)?;
        info!("Servo {} set to {}", command.servo, command.angle);
        Ok(())
    }
}
