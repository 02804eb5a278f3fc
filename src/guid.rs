#[cfg(windows)]
use windows::core::GUID;
use std::{
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};

/// An opaque 128-bit device class identifier
///
/// Stored in the same big-endian field order as a textual GUID, so that
/// `0x4d36e96e_e325_11ce_bfc1_08002be10318` displays as
/// `{4d36e96e-e325-11ce-bfc1-08002be10318}`.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
#[doc(alias = "GUID")]
pub struct ClassId {
    value: u128,
}

impl ClassId {
    /// The [monitor device setup class][monitor]
    ///
    /// [monitor]: https://learn.microsoft.com/en-us/windows-hardware/drivers/install/system-defined-device-setup-classes-available-to-vendors
    #[doc(alias = "GUID_DEVCLASS_MONITOR")]
    pub const MONITOR: Self = Self::from_u128(0x4d36e96e_e325_11ce_bfc1_08002be10318);

    /// The display adapter device setup class
    #[doc(alias = "GUID_DEVCLASS_DISPLAY")]
    pub const DISPLAY: Self = Self::from_u128(0x4d36e968_e325_11ce_bfc1_08002be10318);

    #[allow(missing_docs)]
    pub const fn from_u128(value: u128) -> Self {
        Self { value }
    }

    #[allow(missing_docs)]
    pub const fn to_u128(&self) -> u128 {
        self.value
    }

    fn fields(&self) -> (u32, u16, u16, [u8; 8]) {
        let v = self.value;
        ((v >> 96) as u32, (v >> 80) as u16, (v >> 64) as u16, (v as u64).to_be_bytes())
    }
}

#[allow(missing_docs)]
#[cfg(windows)]
#[cfg_attr(feature = "doc", doc(cfg(feature = "win32")))]
#[cfg_attr(not(feature = "win32"), doc(hidden))]
impl ClassId {
    pub fn from_win32(guid: GUID) -> Self {
        Self::from_u128(guid.to_u128())
    }

    pub fn to_win32(&self) -> GUID {
        GUID::from_u128(self.value)
    }
}

impl Display for ClassId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let (data1, data2, data3, [d0, d1, d2, d3, d4, d5, d6, d7]) = self.fields();
        write!(
            f,
            "{{{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}}}",
            data1, data2, data3, d0, d1, d2, d3, d4, d5, d6, d7
        )
    }
}

impl Debug for ClassId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_tuple("ClassId").field(&format_args!("{}", self)).finish()
    }
}

/// Returned when parsing a malformed [`ClassId`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid class identifier {0:?}")]
pub struct ParseClassIdError(String);

impl FromStr for ClassId {
    type Err = ParseClassIdError;

    /// Accepts `{xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx}` with or without the braces
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseClassIdError(s.to_owned());
        let inner = s.strip_prefix('{').and_then(|s| s.strip_suffix('}')).unwrap_or(s);
        let groups: Vec<&str> = inner.split('-').collect();
        match groups.iter().map(|g| g.len()).collect::<Vec<_>>()[..] {
            [8, 4, 4, 4, 12] => (),
            _ => return Err(err()),
        }
        if !groups.iter().all(|g| g.bytes().all(|b| b.is_ascii_hexdigit())) {
            return Err(err())
        }
        u128::from_str_radix(&groups.concat(), 16)
            .map(Self::from_u128)
            .map_err(|_| err())
    }
}

impl From<u128> for ClassId {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl From<ClassId> for u128 {
    fn from(id: ClassId) -> Self {
        id.to_u128()
    }
}

#[cfg(windows)]
impl From<GUID> for ClassId {
    fn from(guid: GUID) -> Self {
        Self::from_win32(guid)
    }
}

#[cfg(windows)]
impl From<ClassId> for GUID {
    fn from(id: ClassId) -> Self {
        id.to_win32()
    }
}
