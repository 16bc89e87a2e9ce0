//! Forms Module
//!
//! Client-side validation for the login, registration, and parcel forms.
//! A form that fails validation never reaches the network layer; the
//! resulting message is shown inline by the owning view.

use serde::Deserialize;

use crate::models::{LoginRequest, ParcelRequest, ParcelStatus, RegisterRequest};

/// Validation failures, worded as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Email and password are required.")]
    MissingCredentials,

    #[error("First Name is required for registration.")]
    MissingFirstName,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters long.")]
    PasswordTooShort,

    #[error("{0} is required.")]
    Required(&'static str),

    #[error("{0} must be a positive number.")]
    NotPositive(&'static str),
}

/// Login form input
#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, FormError> {
        let email = self.email.trim();
        let password = self.password.trim();
        if email.is_empty() || password.is_empty() {
            return Err(FormError::MissingCredentials);
        }

        Ok(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

/// Self-registration form input; the role is always USER
#[derive(Debug, Default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<RegisterRequest, FormError> {
        let email = self.email.trim();
        let password = self.password.trim();
        if email.is_empty() || password.is_empty() {
            return Err(FormError::MissingCredentials);
        }
        if self.first_name.trim().is_empty() {
            return Err(FormError::MissingFirstName);
        }
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        if password.len() < 6 {
            return Err(FormError::PasswordTooShort);
        }

        Ok(RegisterRequest {
            first_name: self.first_name.trim().to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: "USER".to_string(),
        })
    }
}

/// Admin parcel create/update form input
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParcelForm {
    pub id: Option<i64>,
    pub sender_id: Option<i64>,
    pub recipient_id: Option<i64>,
    pub sender_address: String,
    pub recipient_address: String,
    pub sender_phone: String,
    pub recipient_phone: String,
    pub description: String,
    pub weight: Option<f64>,
    pub dimensions_length: Option<f64>,
    pub dimensions_width: Option<f64>,
    pub dimensions_height: Option<f64>,
    pub status: Option<ParcelStatus>,
    pub estimated_delivery_date: Option<chrono::NaiveDateTime>,
    pub actual_delivery_date: Option<chrono::NaiveDateTime>,
    pub current_location: String,
    pub current_city: String,
    pub current_country: String,
}

impl ParcelForm {
    pub fn validate(&self) -> Result<ParcelRequest, FormError> {
        let sender_id = self.sender_id.ok_or(FormError::Required("Sender ID"))?;
        let recipient_id = self.recipient_id.ok_or(FormError::Required("Recipient ID"))?;

        let required = [
            ("Sender address", &self.sender_address),
            ("Recipient address", &self.recipient_address),
            ("Sender phone", &self.sender_phone),
            ("Recipient phone", &self.recipient_phone),
            ("Description", &self.description),
            ("Current location", &self.current_location),
            ("Current city", &self.current_city),
            ("Current country", &self.current_country),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(FormError::Required(field));
            }
        }

        let positive = [
            ("Weight", self.weight),
            ("Length", self.dimensions_length),
            ("Width", self.dimensions_width),
            ("Height", self.dimensions_height),
        ];
        for (field, value) in positive {
            match value {
                Some(v) if v > 0.0 => {}
                _ => return Err(FormError::NotPositive(field)),
            }
        }

        Ok(ParcelRequest {
            id: self.id,
            sender_id,
            recipient_id,
            sender_address: self.sender_address.trim().to_string(),
            recipient_address: self.recipient_address.trim().to_string(),
            sender_phone: self.sender_phone.trim().to_string(),
            recipient_phone: self.recipient_phone.trim().to_string(),
            description: self.description.trim().to_string(),
            weight: self.weight.unwrap_or_default(),
            dimensions_length: self.dimensions_length.unwrap_or_default(),
            dimensions_width: self.dimensions_width.unwrap_or_default(),
            dimensions_height: self.dimensions_height.unwrap_or_default(),
            status: self.status,
            estimated_delivery_date: self.estimated_delivery_date,
            actual_delivery_date: self.actual_delivery_date,
            current_location: self.current_location.trim().to_string(),
            current_city: self.current_city.trim().to_string(),
            current_country: self.current_country.trim().to_string(),
        })
    }
}
