use {
    crate::{
        query::{sized_query, QueryError},
        Backend, DeviceHandle, Error,
    },
    log::{trace, warn},
    std::fmt::{self, Debug, Formatter},
    widestring::U16Str,
};

/// The registry value holding a monitor's EDID
pub const EDID_VALUE: &str = "EDID";

/// The initial buffer guess for [`DeviceKey::read_value`]; one EDID base block
pub const DEFAULT_GUESS: usize = 128;

impl<'s, B: Backend> DeviceHandle<'s, B> {
    /// Open the device's hardware configuration key for reading
    ///
    /// The key is closed when the returned [`DeviceKey`] is dropped.
    #[doc(alias = "SetupDiOpenDevRegKey")]
    pub fn open_key(&self) -> Result<DeviceKey<'s, B>, Error> {
        let session = self.session();
        session
            .backend()
            .open_key(session.inner(), self.inner())
            .map(|key| DeviceKey {
                backend: session.backend(),
                index: self.index(),
                key,
            })
            .map_err(|e| {
                warn!("unable to open the key of device #{}: {e}", self.index());
                Error::KeyOpenFailed {
                    index: self.index(),
                    source: e.into(),
                }
            })
    }

    /// Read a binary value from the device's configuration key
    ///
    /// Shorthand for [`open_key`](Self::open_key) followed by
    /// [`DeviceKey::read_value`].
    pub fn read_value(&self, name: &str, guess: usize) -> Result<Vec<u8>, Error> {
        self.open_key()?.read_value(name, guess)
    }

    /// Read the device's [EDID](EDID_VALUE)
    pub fn edid(&self) -> Result<Vec<u8>, Error> {
        self.read_value(EDID_VALUE, DEFAULT_GUESS)
    }
}

/// An open configuration key of one device
pub struct DeviceKey<'s, B: Backend> {
    backend: &'s B,
    index: u32,
    key: B::Key,
}

impl<'s, B: Backend> DeviceKey<'s, B> {
    /// Read the binary value `name`
    ///
    /// The first read uses a buffer of `guess` bytes; if the value is larger,
    /// it is read again with a buffer of exactly its size. The result is
    /// truncated to the length the source reported.
    #[doc(alias = "RegQueryValueExW")]
    pub fn read_value(&self, name: &str, guess: usize) -> Result<Vec<u8>, Error> {
        let res = sized_query(guess, |buf: &mut [u8]| self.backend.query_value(&self.key, name, buf));
        match res {
            Ok(data) => {
                trace!("device #{} value {name:?}: {} bytes", self.index, data.len());
                Ok(data)
            },
            Err(QueryError::SizeMismatch { allocated, required }) => Err(Error::SizeProbeMismatch {
                what: "registry value",
                device: Some(self.index),
                allocated,
                required,
            }),
            Err(QueryError::Probe(e) | QueryError::Fetch(e)) => {
                warn!("value {name:?} unavailable on device #{}: {e}", self.index);
                Err(Error::PropertyUnavailable {
                    index: self.index,
                    value: name.to_owned(),
                    source: e.into(),
                })
            },
        }
    }

    /// The canonical path of this key, such as
    /// `\REGISTRY\MACHINE\SYSTEM\ControlSet001\Enum\DISPLAY\...\Device Parameters`
    ///
    /// This is a diagnostic accessor: it queries the `KEY_NAME_INFORMATION`
    /// of the key through the two-phase protocol, starting from an empty buffer.
    #[doc(alias = "NtQueryKey")]
    pub fn path(&self) -> Result<String, QueryError<B::Error>> {
        sized_query(0, |buf: &mut [u16]| self.backend.key_name_information(&self.key, buf))
            .map(|info| key_path_from_name_information(&info))
    }

    /// The enumeration index of the device this key belongs to
    pub fn index(&self) -> u32 {
        self.index
    }

    #[allow(missing_docs)]
    #[cfg_attr(feature = "doc", doc(cfg(feature = "win32")))]
    #[cfg_attr(not(feature = "win32"), doc(hidden))]
    pub fn inner(&self) -> &B::Key {
        &self.key
    }
}

impl<'s, B: Backend> Debug for DeviceKey<'s, B> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("DeviceKey").field("index", &self.index).finish_non_exhaustive()
    }
}

/// Decode a `KEY_NAME_INFORMATION` record read as UTF-16 units
///
/// The record starts with a 32-bit byte length, occupying the first two
/// units, followed by the name. The name is cut to that length and stripped
/// of trailing NULs.
pub fn key_path_from_name_information(info: &[u16]) -> String {
    let (declared, name) = match info {
        [lo, hi, name @ ..] => ((*lo as usize | (*hi as usize) << 16) / 2, name),
        _ => return String::new(),
    };
    let name = &name[..declared.min(name.len())];
    let end = name.iter().rposition(|&c| c != 0).map_or(0, |i| i + 1);
    U16Str::from_slice(&name[..end]).to_string_lossy()
}
