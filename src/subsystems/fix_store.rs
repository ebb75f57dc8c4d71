//! Last-known-fix storage and coordinate conversion
//!
//! Converts the decoder's degree/minute/hemisphere triples into signed
//! decimal degrees and retains the most recent pair that converted
//! cleanly.
//!
//! A degrees component of zero is read as "fix not yet acquired" rather
//! than a true equator or prime-meridian coordinate. Receivers report
//! all-zero fields until first acquisition and this controller keeps
//! that convention; an asset parked exactly on the equator would be
//! misread as unfixed.

use crate::devices::gps::RawCoordinate;

/// One retained latitude/longitude pair, signed decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
}

/// Convert one axis to signed decimal degrees at 6-decimal precision
///
/// Returns `None` when the degrees component is zero (no fix yet).
pub fn convert(coordinate: &RawCoordinate) -> Option<f64> {
    if coordinate.degrees == 0 {
        return None;
    }

    let mut decimal = coordinate.degrees as f64 + coordinate.minutes / 60.0;
    if coordinate.hemisphere.is_negative() {
        decimal = -decimal;
    }

    Some(libm::round(decimal * 1_000_000.0) / 1_000_000.0)
}

/// Holder of the last valid fix
///
/// The pair is committed atomically: if either axis fails to convert,
/// the previously stored fix is retained unchanged. Readers only ever
/// get a copy, so a concurrent-looking caller can never observe a torn
/// pair.
#[derive(Debug, Default)]
pub struct FixStore {
    fix: Option<Fix>,
}

impl FixStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self { fix: None }
    }

    /// Try to commit a freshly decoded pair
    ///
    /// Returns `true` when the pair was stored. A pair with only one
    /// convertible axis leaves the store untouched.
    pub fn update(&mut self, latitude: &RawCoordinate, longitude: &RawCoordinate) -> bool {
        match (convert(latitude), convert(longitude)) {
            (Some(latitude), Some(longitude)) => {
                self.fix = Some(Fix {
                    latitude,
                    longitude,
                });
                true
            }
            _ => false,
        }
    }

    /// Copy of the stored fix, if any
    pub fn snapshot(&self) -> Option<Fix> {
        self.fix
    }

    /// True while an undelivered fix is retained
    pub fn has_fix(&self) -> bool {
        self.fix.is_some()
    }

    /// Forget the stored fix (after it has been delivered)
    pub fn clear(&mut self) {
        self.fix = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::gps::Hemisphere;

    fn raw(degrees: u16, minutes: f64, hemisphere: Hemisphere) -> RawCoordinate {
        RawCoordinate {
            degrees,
            minutes,
            hemisphere,
        }
    }

    #[test]
    fn test_convert_sign_by_hemisphere() {
        assert_eq!(convert(&raw(45, 30.0, Hemisphere::North)), Some(45.5));
        assert_eq!(convert(&raw(45, 30.0, Hemisphere::South)), Some(-45.5));
        assert_eq!(convert(&raw(45, 30.0, Hemisphere::East)), Some(45.5));
        assert_eq!(convert(&raw(45, 30.0, Hemisphere::West)), Some(-45.5));
    }

    #[test]
    fn test_convert_monotonic_in_minutes() {
        let mut previous = convert(&raw(10, 0.0, Hemisphere::North)).unwrap();
        for step in 1..=59 {
            let value = convert(&raw(10, step as f64, Hemisphere::North)).unwrap();
            assert!(value > previous);
            previous = value;
        }
    }

    #[test]
    fn test_convert_zero_degrees_means_no_fix() {
        assert_eq!(convert(&raw(0, 0.0, Hemisphere::North)), None);
        assert_eq!(convert(&raw(0, 59.9, Hemisphere::South)), None);
        assert_eq!(convert(&raw(0, 12.34, Hemisphere::West)), None);
    }

    #[test]
    fn test_convert_rounds_to_six_decimals() {
        assert_eq!(
            convert(&raw(45, 7.40736, Hemisphere::North)),
            Some(45.123456)
        );
        assert_eq!(
            convert(&raw(13, 39.25926, Hemisphere::West)),
            Some(-13.654321)
        );
    }

    #[test]
    fn test_update_commits_both_axes() {
        let mut store = FixStore::new();
        assert!(!store.has_fix());

        let committed = store.update(
            &raw(45, 7.40736, Hemisphere::North),
            &raw(13, 39.25926, Hemisphere::West),
        );
        assert!(committed);
        assert_eq!(
            store.snapshot(),
            Some(Fix {
                latitude: 45.123456,
                longitude: -13.654321,
            })
        );
    }

    #[test]
    fn test_update_is_atomic_across_axes() {
        let mut store = FixStore::new();
        store.update(
            &raw(45, 7.40736, Hemisphere::North),
            &raw(13, 39.25926, Hemisphere::West),
        );
        let before = store.snapshot();

        // longitude unconverted: latitude must not move either
        let committed = store.update(
            &raw(46, 0.0, Hemisphere::North),
            &raw(0, 30.0, Hemisphere::West),
        );
        assert!(!committed);
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_update_with_no_fix_on_empty_store() {
        let mut store = FixStore::new();
        let committed = store.update(
            &raw(0, 0.0, Hemisphere::North),
            &raw(0, 0.0, Hemisphere::East),
        );
        assert!(!committed);
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn test_clear_forgets_fix() {
        let mut store = FixStore::new();
        store.update(
            &raw(45, 7.40736, Hemisphere::North),
            &raw(13, 39.25926, Hemisphere::West),
        );
        store.clear();
        assert!(!store.has_fix());
        assert!(store.snapshot().is_none());
    }
}
