use {
    super::InfoSet,
    crate::{registry, ClassId},
    std::fmt::{self, Debug, Formatter},
    windows::{
        core::Result as WinResult,
        Win32::{
            Devices::DeviceAndDriverInstallation::{SetupDiOpenDevRegKey, SP_DEVINFO_DATA},
            System::Registry::{HKEY, KEY_READ, REG_SAM_FLAGS},
        },
    },
};

/// [SetupAPI device info][sp_devinfo_data]
///
/// This is usually constructed via [`InfoSet::get`], and is only meaningful
/// together with the set that produced it.
///
/// This is a wrapper around [`SP_DEVINFO_DATA`](SP_DEVINFO_DATA).
///
/// [sp_devinfo_data]: https://learn.microsoft.com/en-us/windows/win32/api/setupapi/ns-setupapi-sp_devinfo_data
#[derive(Clone, PartialEq, Eq)]
#[doc(alias = "SP_DEVINFO_DATA")]
pub struct Info {
    info: SP_DEVINFO_DATA,
}

impl Info {
    /// The GUID of the device's setup class.
    pub fn class(&self) -> ClassId {
        ClassId::from_win32(self.info.ClassGuid)
    }

    /// An opaque handle to the device instance (also known as a handle to the [devnode][devnode]).
    ///
    /// [devnode]: https://learn.microsoft.com/en-us/windows-hardware/drivers/
    pub fn instance(&self) -> u32 {
        self.info.DevInst
    }

    /// Open the device's global hardware key (`DIREG_DEV`) for reading
    ///
    /// This is where the `EDID` value of a monitor lives, under
    /// `...\Enum\DISPLAY\<model>\<instance>\Device Parameters`.
    #[doc(alias = "SetupDiOpenDevRegKey")]
    pub fn open_registry_key(&self, set: &InfoSet) -> WinResult<registry::Key> {
        self.win32_open_registry_key(set, true, 0, true, KEY_READ)
            .map(|reg| unsafe { registry::Key::from_win32(reg) })
    }
}

#[allow(missing_docs)]
#[cfg_attr(feature = "doc", doc(cfg(feature = "win32")))]
#[cfg_attr(not(feature = "win32"), doc(hidden))]
impl Info {
    pub fn from_win32(info: SP_DEVINFO_DATA) -> Self {
        Self { info }
    }

    pub fn into_win32(self) -> SP_DEVINFO_DATA {
        self.info
    }

    #[doc(alias = "SetupDiOpenDevRegKey")]
    pub fn win32_open_registry_key(
        &self,
        set: &InfoSet,
        global_scope: bool,
        hardware_profile: u32,
        hardware_key: bool,
        access: REG_SAM_FLAGS,
    ) -> WinResult<HKEY> {
        use windows::Win32::Devices::DeviceAndDriverInstallation::{
            DICS_FLAG_CONFIGSPECIFIC, DICS_FLAG_GLOBAL, DIREG_DEV, DIREG_DRV,
        };
        let scope = match global_scope {
            true => DICS_FLAG_GLOBAL,
            false => DICS_FLAG_CONFIGSPECIFIC,
        };
        let key_type = match hardware_key {
            true => DIREG_DEV,
            false => DIREG_DRV,
        };
        unsafe {
            SetupDiOpenDevRegKey(
                set.win32_handle(),
                &self.info,
                scope,
                hardware_profile,
                key_type,
                access.0,
            )
        }
    }
}

impl Debug for Info {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("DeviceInfo")
            .field("class", &self.class())
            .field("instance", &self.instance())
            .finish()
    }
}

impl From<SP_DEVINFO_DATA> for Info {
    fn from(info: SP_DEVINFO_DATA) -> Self {
        Self::from_win32(info)
    }
}

impl From<Info> for SP_DEVINFO_DATA {
    fn from(info: Info) -> Self {
        info.into_win32()
    }
}

impl AsRef<SP_DEVINFO_DATA> for Info {
    fn as_ref(&self) -> &SP_DEVINFO_DATA {
        &self.info
    }
}
