//! Device position acquisition.
//!
//! Punch-in is gated on a current position. The platform capability that
//! supplies it is modelled as an asynchronous [`PositionProvider`]; the
//! engine bounds every request with a timeout and never retries on its own.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::GeoPoint;

/// Why a position could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationFailure {
    /// The user or platform refused location access.
    PermissionDenied,
    /// The device could not determine its position.
    PositionUnavailable,
    /// No position arrived before the deadline.
    Timeout,
}

impl fmt::Display for LocationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LocationFailure::PermissionDenied => "location permission denied",
            LocationFailure::PositionUnavailable => "position unavailable",
            LocationFailure::Timeout => "timed out waiting for a position fix",
        };
        f.write_str(text)
    }
}

/// A source of the device's current position.
#[async_trait]
pub trait PositionProvider: Send + Sync {
    /// Returns the current position or the reason it is unavailable.
    async fn current_position(&self) -> Result<GeoPoint, LocationFailure>;
}

/// A provider that always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub GeoPoint);

#[async_trait]
impl PositionProvider for FixedPosition {
    async fn current_position(&self) -> Result<GeoPoint, LocationFailure> {
        Ok(self.0)
    }
}

/// A position (or failure) reported by a remote client.
///
/// The HTTP layer receives the device's fix in the request body; this
/// adapts it to the provider interface.
#[derive(Debug, Clone, Copy)]
pub struct ReportedPosition(pub Result<GeoPoint, LocationFailure>);

impl ReportedPosition {
    /// Builds a reported position from optional request fields.
    ///
    /// A missing position with no explicit failure counts as unavailable.
    pub fn from_parts(position: Option<GeoPoint>, failure: Option<LocationFailure>) -> Self {
        match (position, failure) {
            (_, Some(failure)) => Self(Err(failure)),
            (Some(point), None) => Self(Ok(point)),
            (None, None) => Self(Err(LocationFailure::PositionUnavailable)),
        }
    }
}

#[async_trait]
impl PositionProvider for ReportedPosition {
    async fn current_position(&self) -> Result<GeoPoint, LocationFailure> {
        self.0
    }
}

/// Requests a position from `provider`, failing with
/// [`EngineError::LocationUnavailable`] if it errors or exceeds `timeout`.
pub async fn acquire_position(
    provider: &dyn PositionProvider,
    timeout: Duration,
) -> EngineResult<GeoPoint> {
    let outcome = tokio::time::timeout(timeout, provider.current_position())
        .await
        .unwrap_or(Err(LocationFailure::Timeout));

    match outcome {
        Ok(point) => {
            debug!(
                latitude = point.latitude,
                longitude = point.longitude,
                "Position acquired"
            );
            Ok(point)
        }
        Err(cause) => Err(EngineError::LocationUnavailable { cause }),
    }
}
