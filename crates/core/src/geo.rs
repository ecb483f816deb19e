//! Geographic position handling for the walker position relay.
//!
//! Axis order is a deliberate, tested boundary concern: clients submit and
//! receive `[lat, lng]` pairs, while storage (and the job's own geo point)
//! uses the standard geographic `lng, lat` order. All conversion happens
//! here; nothing else in the workspace reorders coordinates.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A validated geographic position.
///
/// Both components are guaranteed finite. Construct via
/// [`Position::from_pair`] (client `[lat, lng]` input) or
/// [`Position::from_stored`] (database `lng, lat` columns).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    /// Parse a client-supplied `[lat, lng]` pair.
    ///
    /// Fails with `InvalidArgument` unless the slice has exactly two
    /// finite numeric elements.
    pub fn from_pair(pair: &[f64]) -> Result<Self, CoreError> {
        let [lat, lng] = pair else {
            return Err(CoreError::InvalidArgument(format!(
                "position must be a [lat, lng] pair, got {} element(s)",
                pair.len()
            )));
        };
        if !lat.is_finite() || !lng.is_finite() {
            return Err(CoreError::InvalidArgument(
                "position components must be finite numbers".into(),
            ));
        }
        Ok(Self {
            lat: *lat,
            lng: *lng,
        })
    }

    /// Rebuild a position from its stored `lng, lat` columns.
    pub fn from_stored(lng: f64, lat: f64) -> Self {
        Self { lat, lng }
    }

    /// The client-facing `[lat, lng]` representation.
    pub fn to_pair(self) -> [f64; 2] {
        [self.lat, self.lng]
    }

    /// The storage-order `(lng, lat)` representation.
    pub fn to_stored(self) -> (f64, f64) {
        (self.lng, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_pair_parses() {
        let pos = Position::from_pair(&[12.9716, 77.5946]).unwrap();
        assert_eq!(pos.lat, 12.9716);
        assert_eq!(pos.lng, 77.5946);
    }

    #[test]
    fn wrong_arity_is_invalid_argument() {
        for bad in [&[][..], &[1.0][..], &[1.0, 2.0, 3.0][..]] {
            let err = Position::from_pair(bad).unwrap_err();
            assert!(matches!(err, CoreError::InvalidArgument(_)), "{bad:?}");
        }
    }

    #[test]
    fn non_finite_components_are_invalid_argument() {
        for bad in [
            [f64::NAN, 77.0],
            [12.0, f64::INFINITY],
            [f64::NEG_INFINITY, 77.0],
        ] {
            let err = Position::from_pair(&bad).unwrap_err();
            assert!(matches!(err, CoreError::InvalidArgument(_)));
        }
    }

    #[test]
    fn pair_round_trips_through_storage_order() {
        let submitted = [12.9716, 77.5946];
        let pos = Position::from_pair(&submitted).unwrap();

        let (lng, lat) = pos.to_stored();
        assert_eq!((lng, lat), (77.5946, 12.9716));

        let read_back = Position::from_stored(lng, lat);
        assert_eq!(read_back.to_pair(), submitted);
    }
}
