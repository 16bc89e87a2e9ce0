//! Wire Types Module
//!
//! Request and response bodies exchanged with the RouteGenius backend.
//! The backend owns these entities; the client treats them as given and
//! only deserializes the fields it renders.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Successful response from `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: i64,
    pub first_name: String,
    pub email: String,
    pub roles: Vec<String>,
    pub token: String,
}

/// Body for `POST /auth/login`
#[derive(Debug, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body for `POST /auth/register` and the admin user endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// User record as returned by the admin user endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub email: String,
    pub role: String,
}

/// Delivery status of a parcel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParcelStatus {
    Pending,
    Dispatched,
    InTransit,
    Delivered,
    Exception,
    Returned,
    Cancelled,
}

impl ParcelStatus {
    /// Parse an uppercase status name, as typed by an operator.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "DISPATCHED" => Some(Self::Dispatched),
            "IN_TRANSIT" => Some(Self::InTransit),
            "DELIVERED" => Some(Self::Delivered),
            "EXCEPTION" => Some(Self::Exception),
            "RETURNED" => Some(Self::Returned),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pending => "PENDING",
            Self::Dispatched => "DISPATCHED",
            Self::InTransit => "IN_TRANSIT",
            Self::Delivered => "DELIVERED",
            Self::Exception => "EXCEPTION",
            Self::Returned => "RETURNED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{}", name)
    }
}

/// Parcel record as returned by the parcel endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parcel {
    pub id: i64,
    pub tracking_id: String,
    pub sender_id: i64,
    pub sender_first_name: Option<String>,
    pub sender_email: Option<String>,
    pub sender_address: String,
    pub sender_phone: String,
    pub recipient_id: i64,
    pub recipient_first_name: Option<String>,
    pub recipient_email: Option<String>,
    pub recipient_address: String,
    pub recipient_phone: String,
    pub description: String,
    pub weight: f64,
    pub dimensions_length: f64,
    pub dimensions_width: f64,
    pub dimensions_height: f64,
    pub status: ParcelStatus,
    pub estimated_delivery_date: Option<NaiveDateTime>,
    pub actual_delivery_date: Option<NaiveDateTime>,
    pub current_location: String,
    pub current_city: String,
    pub current_country: String,
    pub created_at: Option<NaiveDateTime>,
    pub last_updated_at: Option<NaiveDateTime>,
}

/// Body for creating or updating a parcel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub sender_address: String,
    pub recipient_address: String,
    pub sender_phone: String,
    pub recipient_phone: String,
    pub description: String,
    pub weight: f64,
    pub dimensions_length: f64,
    pub dimensions_width: f64,
    pub dimensions_height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ParcelStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_delivery_date: Option<NaiveDateTime>,
    pub current_location: String,
    pub current_city: String,
    pub current_country: String,
}

/// Inbox notification tied to a parcel status change
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub parcel_id: i64,
    pub message: String,
    pub related_status: ParcelStatus,
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub read: bool,
}
