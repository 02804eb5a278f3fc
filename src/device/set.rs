use {
    super::Info,
    crate::{win32::win32_enum_, ClassId, EnumerateFlags},
    std::{
        fmt::{self, Debug, Formatter},
        mem,
    },
    windows::{
        core::Result as WinResult,
        Win32::Devices::DeviceAndDriverInstallation::{
            SetupDiDestroyDeviceInfoList, SetupDiEnumDeviceInfo, SetupDiGetClassDevsExW, HDEVINFO, SP_DEVINFO_DATA,
        },
    },
};

/// A [device information set][devinfo] collects information about device setup classes.
///
/// This is a wrapper around a
/// [`HDEVINFO`](windows::Win32::Devices::DeviceAndDriverInstallation::HDEVINFO) handle,
/// destroyed on drop.
///
/// [devinfo]: https://learn.microsoft.com/en-us/windows-hardware/drivers/install/device-information-sets
#[derive(PartialEq, Eq)]
#[repr(transparent)]
#[doc(alias = "HDEVINFO")]
pub struct InfoSet {
    handle: HDEVINFO,
}

impl InfoSet {
    /// Create a new handle that contains requested device information elements
    ///
    /// This is a wrapper around [`SetupDiGetClassDevsExW`][setupdigetclassdevsexw].
    ///
    /// [setupdigetclassdevsexw]: https://learn.microsoft.com/en-us/windows/win32/api/setupapi/nf-setupapi-setupdigetclassdevsexw
    #[doc(alias = "SetupDiGetClassDevsExW")]
    pub fn new(class: &ClassId, flags: EnumerateFlags) -> WinResult<Self> {
        let class = class.to_win32();
        unsafe {
            SetupDiGetClassDevsExW(Some(&class), None, None, flags.bits(), None, None, None)
                .map(|handle| Self::from_win32(handle))
        }
    }

    /// Retrieve the device at `index`, or `None` past the last device
    ///
    /// This is a wrapper around [`SetupDiEnumDeviceInfo`][setupdienumdeviceinfo].
    ///
    /// [setupdienumdeviceinfo]: https://learn.microsoft.com/en-us/windows/win32/api/setupapi/nf-setupapi-setupdienumdeviceinfo
    #[doc(alias = "SetupDiEnumDeviceInfo")]
    pub fn get(&self, index: u32) -> WinResult<Option<Info>> {
        win32_enum_(index, |i| self.win32_enum(i)).map(|info| info.map(Info::from_win32))
    }
}

#[allow(missing_docs)]
#[cfg_attr(feature = "doc", doc(cfg(feature = "win32")))]
#[cfg_attr(not(feature = "win32"), doc(hidden))]
impl InfoSet {
    pub unsafe fn from_win32(handle: HDEVINFO) -> Self {
        Self { handle }
    }

    pub const fn win32_handle(&self) -> HDEVINFO {
        self.handle
    }

    #[doc(alias = "SetupDiEnumDeviceInfo")]
    pub fn win32_enum(&self, index: u32) -> WinResult<SP_DEVINFO_DATA> {
        let mut info = SP_DEVINFO_DATA::default();
        info.cbSize = mem::size_of::<SP_DEVINFO_DATA>() as _;
        unsafe { SetupDiEnumDeviceInfo(self.win32_handle(), index, &mut info).ok() }.map(|()| info)
    }
}

impl Drop for InfoSet {
    #[doc(alias = "SetupDiDestroyDeviceInfoList")]
    fn drop(&mut self) {
        let _ = unsafe { SetupDiDestroyDeviceInfoList(self.win32_handle()) };
    }
}

impl Debug for InfoSet {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_tuple("InfoSet").field(&self.handle).finish()
    }
}

impl AsRef<HDEVINFO> for InfoSet {
    fn as_ref(&self) -> &HDEVINFO {
        &self.handle
    }
}
