//! Legacy driver message types.
//!
//! A vendor driver reports everything through a single notification
//! callback. This module models the messages it delivers: acquisition
//! feedback, errors, enrollment progress, authentication results, and the
//! paged results of template enumeration and removal.

use serde::{Deserialize, Serialize};

/// Offset at which vendor-specific codes start in the legacy numbering.
pub const VENDOR_CODE_BASE: i32 = 1000;

/// A finger template as identified by the driver.
///
/// `gid` is the group (user) id and `fid` the finger id. A `fid` of zero in
/// an authentication result means "no match".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Finger {
    pub gid: u32,
    pub fid: u32,
}

impl Finger {
    pub fn new(gid: u32, fid: u32) -> Self {
        Self { gid, fid }
    }

    /// Whether this finger identifies an enrolled template.
    pub fn is_match(&self) -> bool {
        self.fid != 0
    }
}

/// Error codes reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DriverErrorCode {
    HwUnavailable,
    UnableToProcess,
    Timeout,
    NoSpace,
    Canceled,
    UnableToRemove,
    Lockout,
    /// Vendor-specific code, relative to [`VENDOR_CODE_BASE`].
    Vendor(i32),
    /// Code outside the known legacy range.
    Unknown(i32),
}

impl DriverErrorCode {
    /// Decode a raw legacy error code.
    ///
    /// # Examples
    ///
    /// ```
    /// use fingerbridge_hal::types::DriverErrorCode;
    ///
    /// assert_eq!(DriverErrorCode::from_raw(3), DriverErrorCode::Timeout);
    /// assert_eq!(DriverErrorCode::from_raw(1002), DriverErrorCode::Vendor(2));
    /// ```
    pub fn from_raw(code: i32) -> Self {
        match code {
            1 => Self::HwUnavailable,
            2 => Self::UnableToProcess,
            3 => Self::Timeout,
            4 => Self::NoSpace,
            5 => Self::Canceled,
            6 => Self::UnableToRemove,
            7 => Self::Lockout,
            c if c >= VENDOR_CODE_BASE => Self::Vendor(c - VENDOR_CODE_BASE),
            c => Self::Unknown(c),
        }
    }

    /// Encode back to the raw legacy code.
    pub fn raw(&self) -> i32 {
        match self {
            Self::HwUnavailable => 1,
            Self::UnableToProcess => 2,
            Self::Timeout => 3,
            Self::NoSpace => 4,
            Self::Canceled => 5,
            Self::UnableToRemove => 6,
            Self::Lockout => 7,
            Self::Vendor(c) => VENDOR_CODE_BASE + c,
            Self::Unknown(c) => *c,
        }
    }
}

/// Acquisition feedback reported while a finger is on the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AcquiredInfo {
    Good,
    Partial,
    Insufficient,
    ImagerDirty,
    TooSlow,
    TooFast,
    /// Vendor-specific code, relative to [`VENDOR_CODE_BASE`].
    Vendor(i32),
    Unknown(i32),
}

impl AcquiredInfo {
    /// Decode a raw legacy acquisition code.
    pub fn from_raw(code: i32) -> Self {
        match code {
            0 => Self::Good,
            1 => Self::Partial,
            2 => Self::Insufficient,
            3 => Self::ImagerDirty,
            4 => Self::TooSlow,
            5 => Self::TooFast,
            c if c >= VENDOR_CODE_BASE => Self::Vendor(c - VENDOR_CODE_BASE),
            c => Self::Unknown(c),
        }
    }

    /// Encode back to the raw legacy code.
    pub fn raw(&self) -> i32 {
        match self {
            Self::Good => 0,
            Self::Partial => 1,
            Self::Insufficient => 2,
            Self::ImagerDirty => 3,
            Self::TooSlow => 4,
            Self::TooFast => 5,
            Self::Vendor(c) => VENDOR_CODE_BASE + c,
            Self::Unknown(c) => *c,
        }
    }
}

/// Notification delivered by the driver through its callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FingerprintMsg {
    /// The current operation failed.
    Error(DriverErrorCode),

    /// Sensor feedback during capture.
    Acquired(AcquiredInfo),

    /// One enrollment sample was accepted.
    TemplateEnrolling {
        finger: Finger,
        samples_remaining: u32,
    },

    /// One template was removed; more may follow.
    TemplateRemoved {
        finger: Finger,
        remaining_templates: u32,
    },

    /// Authentication finished. `finger.fid == 0` means rejected.
    Authenticated {
        finger: Finger,
        /// Hardware auth token, empty on rejection.
        hat: Vec<u8>,
    },

    /// One enumerated template; more may follow.
    TemplateEnumerating {
        finger: Finger,
        remaining_templates: u32,
    },
}

impl FingerprintMsg {
    /// Short name of the message kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Error(_) => "error",
            Self::Acquired(_) => "acquired",
            Self::TemplateEnrolling { .. } => "template_enrolling",
            Self::TemplateRemoved { .. } => "template_removed",
            Self::Authenticated { .. } => "authenticated",
            Self::TemplateEnumerating { .. } => "template_enumerating",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, DriverErrorCode::HwUnavailable)]
    #[case(5, DriverErrorCode::Canceled)]
    #[case(7, DriverErrorCode::Lockout)]
    #[case(1000, DriverErrorCode::Vendor(0))]
    #[case(1012, DriverErrorCode::Vendor(12))]
    #[case(42, DriverErrorCode::Unknown(42))]
    #[case(-1, DriverErrorCode::Unknown(-1))]
    fn test_error_code_from_raw(#[case] raw: i32, #[case] expected: DriverErrorCode) {
        let code = DriverErrorCode::from_raw(raw);
        assert_eq!(code, expected);
        assert_eq!(code.raw(), raw);
    }

    #[rstest]
    #[case(0, AcquiredInfo::Good)]
    #[case(3, AcquiredInfo::ImagerDirty)]
    #[case(1001, AcquiredInfo::Vendor(1))]
    #[case(9, AcquiredInfo::Unknown(9))]
    fn test_acquired_info_from_raw(#[case] raw: i32, #[case] expected: AcquiredInfo) {
        let info = AcquiredInfo::from_raw(raw);
        assert_eq!(info, expected);
        assert_eq!(info.raw(), raw);
    }

    #[test]
    fn test_finger_is_match() {
        assert!(Finger::new(10, 3).is_match());
        assert!(!Finger::new(10, 0).is_match());
    }

    #[test]
    fn test_message_kind() {
        let msg = FingerprintMsg::Authenticated {
            finger: Finger::new(0, 1),
            hat: vec![0xAA],
        };
        assert_eq!(msg.kind(), "authenticated");
        assert_eq!(FingerprintMsg::Acquired(AcquiredInfo::Good).kind(), "acquired");
    }

    #[test]
    fn test_message_serialization() {
        let msg = FingerprintMsg::TemplateEnrolling {
            finger: Finger::new(10, 2),
            samples_remaining: 4,
        };
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: FingerprintMsg = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }
}
