use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_SERVO_ANGLE: u8 = 180;
/// Servos mounted on the rig
pub const SERVO_IDS: [u8; 2] = [1, 2];

/// Input problems caught before anything is sent to the server
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Username and password can't be empty.")]
    MissingCredentials,

    #[error("All fields must be filled in.")]
    MissingFields,

    #[error("Password must be at least {} characters.", MIN_PASSWORD_LEN)]
    PasswordTooShort,

    #[error("Passwords don't match.")]
    PasswordMismatch,

    #[error("Please enter a valid angle between 0 and {}.", MAX_SERVO_ANGLE)]
    InvalidAngle,

    #[error("Unknown servo {0}, expected one of {ids:?}.", ids = SERVO_IDS)]
    UnknownServo(u8),
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Validated username / password pair, body of `/login` and `/register`
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn for_login(username: &str, password: &str) -> Result<Self, FormError> {
        if is_blank(username) || is_blank(password) {
            return Err(FormError::MissingCredentials);
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn for_registration(
        username: &str,
        password: &str,
        confirm: &str,
    ) -> Result<Self, FormError> {
        if is_blank(username) || is_blank(password) || is_blank(confirm) {
            Err(FormError::MissingFields)
        } else if password.chars().count() < MIN_PASSWORD_LEN {
            Err(FormError::PasswordTooShort)
        } else if password != confirm {
            Err(FormError::PasswordMismatch)
        } else {
            Ok(Self {
                username: username.to_string(),
                password: password.to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Body of `/set_servo`
pub struct ServoCommand {
    pub servo: u8,
    pub angle: u8,
}

impl ServoCommand {
    /// Validate a servo id and the user's raw angle text
    pub fn parse(servo: u8, raw_angle: &str) -> Result<Self, FormError> {
        if !SERVO_IDS.contains(&servo) {
            return Err(FormError::UnknownServo(servo));
        }
        let angle = raw_angle
            .trim()
            .parse::<i64>()
            .map_err(|_| FormError::InvalidAngle)?;
        let angle = u8::try_from(angle)
            .ok()
            .filter(|a| *a <= MAX_SERVO_ANGLE)
            .ok_or(FormError::InvalidAngle)?;
        Ok(Self { servo, angle })
    }
}
