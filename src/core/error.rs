// Centralized error handling for the parking gate

use crate::models::requests::SpotResponse;
use crate::models::spot::SpotId;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
};
use thiserror::Error;

/// Failures talking to the parking controller
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Device unreachable: {0}")]
    Unreachable(String),

    #[error("Device returned status {0}")]
    Status(u16),

    #[error("Malformed device payload: {0}")]
    MalformedPayload(String),
}

impl GatewayError {
    /// Message shown to the user. A device that answered with an error
    /// reads differently from one that could not be reached at all.
    pub fn user_message(&self) -> &'static str {
        match self {
            GatewayError::Status(_) => "Failed to communicate with the device.",
            GatewayError::Unreachable(_) | GatewayError::MalformedPayload(_) => {
                "Error communicating with the device."
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Username already taken")]
    DuplicateUsername,

    #[error("RFID card already registered to another user")]
    DuplicateRfid,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials, please try again.")]
    InvalidCredentials,

    #[error("Login required")]
    Unauthenticated,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
            }
            AuthError::Unauthenticated => Redirect::to("/login").into_response(),
            AuthError::Store(e) => PageError::Store(e).into_response(),
        }
    }
}

/// Errors raised by the reserve/release endpoints, rendered as JSON
#[derive(Error, Debug)]
pub enum SpotError {
    #[error("Invalid spot: {0}")]
    InvalidSpotId(String),

    #[error("{0} is not available for reservation.")]
    NotReservable(SpotId),

    #[error("{0} is not reserved.")]
    NotReserved(SpotId),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl SpotError {
    pub fn user_message(&self) -> String {
        match self {
            SpotError::InvalidSpotId(_) => "Invalid spot.".to_string(),
            SpotError::NotReservable(_) | SpotError::NotReserved(_) => self.to_string(),
            SpotError::Gateway(e) => e.user_message().to_string(),
        }
    }
}

impl IntoResponse for SpotError {
    fn into_response(self) -> Response {
        let status = match &self {
            SpotError::InvalidSpotId(_) => StatusCode::BAD_REQUEST,
            SpotError::NotReservable(_) => StatusCode::CONFLICT,
            SpotError::NotReserved(_) => StatusCode::CONFLICT,
            SpotError::Gateway(_) => StatusCode::BAD_GATEWAY,
        };

        (
            status,
            Json(SpotResponse {
                success: false,
                message: self.user_message(),
            }),
        )
            .into_response()
    }
}

/// Internal failures on HTML routes
#[derive(Error, Debug)]
pub enum PageError {
    #[error("Internal server error")]
    Store(#[from] StoreError),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match &self {
            PageError::Store(e) => tracing::error!(error = %e, "Store failure while rendering page"),
        }

        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
