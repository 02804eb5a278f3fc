//! [`Windows.Devices.Display`][display] acquisition path
//!
//! Monitors are discovered through the display monitor device selector, and
//! their descriptors are read from the [`DisplayMonitor`] objects rather than
//! the registry. Requires Windows 10.
//!
//! [display]: https://learn.microsoft.com/en-us/uwp/api/windows.devices.display

use {
    crate::{
        device::class_ids_from_name, query::Probe, win32::win32_error, Backend, ClassId, DeviceDescriptor,
        EnumerateFlags, EDID_VALUE,
    },
    log::{debug, trace},
    std::fmt::{self, Debug, Formatter},
    windows::{
        core::{Error as WinError, Result as WinResult},
        Devices::{
            Display::{DisplayMonitor, DisplayMonitorDescriptorKind},
            Enumeration::DeviceInformation,
        },
        Win32::Foundation::{ERROR_FILE_NOT_FOUND, ERROR_NOT_SUPPORTED},
    },
};

/// The descriptor value name for the DisplayID block
pub const DISPLAY_ID_VALUE: &str = "DisplayId";

/// Acquires EDID through WinRT device selectors
///
/// Only the [`Monitor`](ClassId::MONITOR) class can be enumerated. Sessions
/// always hold the monitors that are currently present, so [`EnumerateFlags`]
/// have no effect.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelectorBackend {
    _private: (),
}

impl SelectorBackend {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }
}

/// The completed discovery of every display monitor interface
#[derive(Clone)]
pub struct SelectorSession {
    devices: Vec<DeviceInformation>,
}

impl Debug for SelectorSession {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("SelectorSession").field("devices", &self.devices.len()).finish()
    }
}

/// A discovered interface and the monitor it resolved to
#[derive(Clone)]
pub struct SelectorDevice {
    info: DeviceInformation,
    monitor: DisplayMonitor,
}

impl Backend for SelectorBackend {
    type Session = SelectorSession;
    type Device = SelectorDevice;
    type Key = DisplayMonitor;
    type Error = WinError;

    fn class_ids(&self, name: &str, buffer: &mut [ClassId]) -> Result<usize, Probe<WinError>> {
        class_ids_from_name(name, buffer)
    }

    fn open_session(&self, class: &ClassId, flags: EnumerateFlags) -> WinResult<SelectorSession> {
        if *class != ClassId::MONITOR {
            return Err(win32_error(
                ERROR_NOT_SUPPORTED,
                &format_args!("device selectors cannot enumerate class {class}"),
            ))
        }
        trace!("enumerating display monitor interfaces, ignoring {flags:?}");

        let selector = DisplayMonitor::GetDeviceSelector()?;
        let devices: Vec<_> = DeviceInformation::FindAllAsyncAqsFilter(&selector)?.get()?.into_iter().collect();
        debug!("device selector found {} display monitors", devices.len());
        Ok(SelectorSession { devices })
    }

    fn device(&self, session: &SelectorSession, index: u32) -> WinResult<Option<SelectorDevice>> {
        let info = match session.devices.get(index as usize) {
            Some(info) => info.clone(),
            None => return Ok(None),
        };
        let monitor = DisplayMonitor::FromInterfaceIdAsync(&info.Id()?)?.get()?;
        Ok(Some(SelectorDevice { info, monitor }))
    }

    fn descriptor(&self, _session: &SelectorSession, device: &SelectorDevice) -> Option<DeviceDescriptor> {
        Some(DeviceDescriptor {
            name: device.info.Name().ok()?.to_string_lossy(),
            id: device.info.Id().ok()?.to_string_lossy(),
        })
    }

    fn open_key(&self, _session: &SelectorSession, device: &SelectorDevice) -> WinResult<DisplayMonitor> {
        Ok(device.monitor.clone())
    }

    fn query_value(&self, key: &DisplayMonitor, name: &str, buffer: &mut [u8]) -> Result<usize, Probe<WinError>> {
        let kind = match name {
            EDID_VALUE => DisplayMonitorDescriptorKind::Edid,
            DISPLAY_ID_VALUE => DisplayMonitorDescriptorKind::DisplayId,
            _ =>
                return Err(Probe::Failed(win32_error(
                    ERROR_FILE_NOT_FOUND,
                    &format_args!("display monitors have no {name:?} descriptor"),
                ))),
        };
        let data = key.GetDescriptor(kind).map_err(Probe::Failed)?;
        match buffer.get_mut(..data.len()) {
            Some(buffer) => {
                buffer.copy_from_slice(&data);
                Ok(data.len())
            },
            None => Err(Probe::InsufficientBuffer { required: data.len() }),
        }
    }

    fn key_name_information(&self, _key: &DisplayMonitor, _buffer: &mut [u16]) -> Result<usize, Probe<WinError>> {
        Err(Probe::Failed(win32_error(
            ERROR_NOT_SUPPORTED,
            &"display monitors are not registry keys",
        )))
    }
}
