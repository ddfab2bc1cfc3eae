//! NTSTATUS codes returned by the file information calls, and the one
//! mapping from a code to what it means for case sensitivity.

use std::fmt;

/// `FILE_INFORMATION_CLASS::FileCaseSensitiveInformation`
pub const FILE_CASE_SENSITIVE_INFORMATION_CLASS: i32 = 71;

/// Raw status of an `NtQueryInformationFile` / `NtSetInformationFile` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NtStatus(pub u32);

impl NtStatus {
    pub const SUCCESS: NtStatus = NtStatus(0x0000_0000);
    pub const NOT_IMPLEMENTED: NtStatus = NtStatus(0xC000_0002);
    pub const INVALID_INFO_CLASS: NtStatus = NtStatus(0xC000_0003);
    pub const INVALID_PARAMETER: NtStatus = NtStatus(0xC000_000D);
    pub const ACCESS_DENIED: NtStatus = NtStatus(0xC000_0022);
    pub const NOT_SUPPORTED: NtStatus = NtStatus(0xC000_00BB);
    pub const DIRECTORY_NOT_EMPTY: NtStatus = NtStatus(0xC000_0101);

    /// Classify this status. Query and set share this mapping.
    pub fn classify(self) -> StatusClass {
        match self {
            NtStatus::SUCCESS => StatusClass::Success,
            // What older Windows builds (and filesystems without the
            // feature) answer for this information class.
            NtStatus::NOT_IMPLEMENTED
            | NtStatus::INVALID_INFO_CLASS
            | NtStatus::INVALID_PARAMETER
            | NtStatus::NOT_SUPPORTED => StatusClass::Unsupported,
            NtStatus::DIRECTORY_NOT_EMPTY => StatusClass::DirectoryNotEmpty,
            other => StatusClass::Unknown(other),
        }
    }
}

impl From<i32> for NtStatus {
    fn from(raw: i32) -> Self {
        NtStatus(raw as u32)
    }
}

impl fmt::Display for NtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// What a status means for a case sensitivity request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    /// The OS or filesystem does not implement the information class
    Unsupported,
    /// The directory holds entries that collide case-insensitively
    DirectoryNotEmpty,
    Unknown(NtStatus),
}

bitflags::bitflags! {
    /// `FILE_CASE_SENSITIVE_INFORMATION.Flags`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CaseSensitiveFlags: u32 {
        const CASE_SENSITIVE_DIR = 0x0000_0001;

        const _ = !0;
    }
}

impl CaseSensitiveFlags {
    pub fn for_enabled(enable: bool) -> Self {
        if enable {
            CaseSensitiveFlags::CASE_SENSITIVE_DIR
        } else {
            CaseSensitiveFlags::empty()
        }
    }

    pub fn is_case_sensitive(self) -> bool {
        self.contains(CaseSensitiveFlags::CASE_SENSITIVE_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_codes() {
        for status in [
            NtStatus::NOT_IMPLEMENTED,
            NtStatus::INVALID_INFO_CLASS,
            NtStatus::INVALID_PARAMETER,
            NtStatus::NOT_SUPPORTED,
        ] {
            assert_eq!(status.classify(), StatusClass::Unsupported, "{status}");
        }
    }

    #[test]
    fn test_known_and_unknown_codes() {
        assert_eq!(NtStatus::SUCCESS.classify(), StatusClass::Success);
        assert_eq!(
            NtStatus::DIRECTORY_NOT_EMPTY.classify(),
            StatusClass::DirectoryNotEmpty
        );
        assert_eq!(
            NtStatus::ACCESS_DENIED.classify(),
            StatusClass::Unknown(NtStatus::ACCESS_DENIED)
        );
        assert_eq!(
            NtStatus(0xC000_0034).classify(),
            StatusClass::Unknown(NtStatus(0xC000_0034))
        );
    }

    #[test]
    fn test_status_from_signed() {
        assert_eq!(NtStatus::from(0xC000_0101_u32 as i32), NtStatus::DIRECTORY_NOT_EMPTY);
        assert_eq!(NtStatus::from(0), NtStatus::SUCCESS);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(NtStatus::NOT_SUPPORTED.to_string(), "0xC00000BB");
        assert_eq!(NtStatus::SUCCESS.to_string(), "0x00000000");
    }

    #[test]
    fn test_flags() {
        assert!(CaseSensitiveFlags::for_enabled(true).is_case_sensitive());
        assert!(!CaseSensitiveFlags::for_enabled(false).is_case_sensitive());
        assert_eq!(CaseSensitiveFlags::for_enabled(false).bits(), 0);
        // Reserved bits survive a round trip through the raw block
        let raw = CaseSensitiveFlags::from_bits_retain(0x8000_0001);
        assert!(raw.is_case_sensitive());
        assert_eq!(raw.bits(), 0x8000_0001);
    }
}
