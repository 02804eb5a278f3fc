//! [SetupApi][si]: [Device Information][di]
//!
//! The registry-backed acquisition path: device setup classes are resolved by
//! name, monitors are enumerated from a device information set, and the cached
//! EDID is read from each monitor's hardware registry key.
//!
//! [si]: https://learn.microsoft.com/en-us/windows-hardware/drivers/install/setupapi
//! [di]: https://learn.microsoft.com/en-us/windows-hardware/drivers/install/using-device-installation-functions#device-information-functions

// NOTE: relevant info can be found online if you know where to look:
// https://www.winvistatips.com/threads/how-to-read-monitors-edid-information.181727/

pub use self::{info::Info, set::InfoSet};
use {
    crate::{
        query::Probe, registry, win32::win32_error, Backend, ClassId, DeviceHandle, EnumerateFlags, Error,
        EDID_VALUE,
    },
    widestring::WideCString,
    windows::{
        core::{Error as WinError, Result as WinResult, GUID, PCWSTR},
        Win32::{
            Devices::DeviceAndDriverInstallation::SetupDiClassGuidsFromNameW,
            Foundation::{ERROR_INSUFFICIENT_BUFFER, ERROR_INVALID_DATA},
            System::Registry::REG_BINARY,
        },
    },
};

mod info;
mod set;

/// Retrieve the GUIDs registered for a device setup class name
///
/// One call of the sized [`SetupDiClassGuidsFromNameW`][wraps] operation.
///
/// [wraps]: https://learn.microsoft.com/en-us/windows/win32/api/setupapi/nf-setupapi-setupdiclassguidsfromnamew
#[doc(alias = "SetupDiClassGuidsFromNameW")]
pub fn class_ids_from_name(name: &str, buffer: &mut [ClassId]) -> Result<usize, Probe<WinError>> {
    let name = wide(name).map_err(Probe::Failed)?;
    let mut guids = vec![GUID::zeroed(); buffer.len()];
    let mut required = 0u32;
    let res = unsafe { SetupDiClassGuidsFromNameW(PCWSTR(name.as_ptr()), &mut guids, &mut required).ok() };
    let required = required as usize;
    match res {
        Ok(()) if required > guids.len() => Err(Probe::InsufficientBuffer { required }),
        Ok(()) => {
            for (id, guid) in buffer.iter_mut().zip(&guids[..required]) {
                *id = ClassId::from_win32(*guid);
            }
            Ok(required)
        },
        Err(e) if e.code() == ERROR_INSUFFICIENT_BUFFER.to_hresult() => Err(Probe::InsufficientBuffer { required }),
        Err(e) => Err(Probe::Failed(e)),
    }
}

fn wide(s: &str) -> WinResult<WideCString> {
    WideCString::from_str(s).map_err(|e| win32_error(ERROR_INVALID_DATA, &format_args!("{e:?}")))
}

/// Acquires EDID through SetupAPI and the device registry keys
///
/// Fully synchronous: every step blocks on its Win32 call.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistryBackend {
    _private: (),
}

impl RegistryBackend {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for RegistryBackend {
    type Session = InfoSet;
    type Device = Info;
    type Key = registry::Key;
    type Error = WinError;

    fn class_ids(&self, name: &str, buffer: &mut [ClassId]) -> Result<usize, Probe<WinError>> {
        class_ids_from_name(name, buffer)
    }

    fn open_session(&self, class: &ClassId, flags: EnumerateFlags) -> WinResult<InfoSet> {
        InfoSet::new(class, flags)
    }

    fn device(&self, session: &InfoSet, index: u32) -> WinResult<Option<Info>> {
        session.get(index)
    }

    fn open_key(&self, session: &InfoSet, device: &Info) -> WinResult<registry::Key> {
        device.open_registry_key(session)
    }

    fn query_value(&self, key: &registry::Key, name: &str, buffer: &mut [u8]) -> Result<usize, Probe<WinError>> {
        let name_w = wide(name).map_err(Probe::Failed)?;
        match key.win32_query_value(&name_w, buffer)? {
            (ty, len) if ty == REG_BINARY => Ok(len),
            (ty, _) => Err(Probe::Failed(win32_error(
                ERROR_INVALID_DATA,
                &format_args!("value {name:?} has type {} rather than REG_BINARY", ty.0),
            ))),
        }
    }

    fn key_name_information(&self, key: &registry::Key, buffer: &mut [u16]) -> Result<usize, Probe<WinError>> {
        key.win32_name_information(buffer)
    }
}

/// Offset reads over the device's EDID value
impl<'s> ddc::Edid for DeviceHandle<'s, RegistryBackend> {
    type EdidError = Error;

    fn read_edid(&mut self, offset: u8, data: &mut [u8]) -> Result<usize, Error> {
        let edid = self.edid()?;

        let edid = edid.get(offset as usize..).ok_or_else(|| Error::PropertyUnavailable {
            index: self.index(),
            value: EDID_VALUE.into(),
            source: win32_error(ERROR_INVALID_DATA, &format_args!("read_edid offset={offset} out of range")).into(),
        })?;
        let len = data.len().min(edid.len());
        data[..len].copy_from_slice(&edid[..len]);
        Ok(len)
    }
}
