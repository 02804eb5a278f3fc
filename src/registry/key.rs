use {
    crate::{query::Probe, win32::win32_error},
    std::{
        ffi::c_void,
        fmt::{self, Debug, Formatter},
        mem, ptr,
    },
    widestring::{widecstr, WideCStr},
    windows::{
        core::{Error, Result as WinResult, PCSTR, PCWSTR},
        Win32::{
            Foundation::{ERROR_MORE_DATA, ERROR_PROC_NOT_FOUND, NTSTATUS},
            System::{
                LibraryLoader::{GetModuleHandleW, GetProcAddress},
                Registry::{self, RegCloseKey, RegQueryValueExW, HKEY, REG_VALUE_TYPE},
            },
        },
    },
};

#[doc(alias = "KeyNameInformation")]
const KEY_NAME_INFORMATION: i32 = 3;
const STATUS_BUFFER_TOO_SMALL: NTSTATUS = NTSTATUS(0xc000_0023_u32 as i32);
const STATUS_BUFFER_OVERFLOW: NTSTATUS = NTSTATUS(0x8000_0005_u32 as i32);

type NtQueryKey = unsafe extern "system" fn(HKEY, i32, *mut c_void, u32, *mut u32) -> NTSTATUS;

/// An open registry key, closed on drop
#[doc(alias = "HKEY")]
#[repr(transparent)]
#[derive(PartialEq, Eq)]
pub struct Key {
    handle: HKEY,
}

impl Key {
    pub const fn win32_handle(&self) -> HKEY {
        self.handle
    }

    pub unsafe fn from_win32(handle: HKEY) -> Self {
        Self { handle }
    }

    /// One call of the sized `RegQueryValueExW` operation
    ///
    /// An empty `buffer` is a pure size probe: the value's length is reported
    /// as [`Probe::InsufficientBuffer`] unless the value is itself empty.
    #[doc(alias = "RegQueryValueExW")]
    pub fn win32_query_value(&self, name: &WideCStr, buffer: &mut [u8]) -> Result<(REG_VALUE_TYPE, usize), Probe<Error>> {
        let mut ty = REG_VALUE_TYPE::default();
        let mut len = buffer.len() as u32;
        let data = match buffer.is_empty() {
            true => None,
            false => Some(buffer.as_mut_ptr()),
        };
        let res = unsafe {
            RegQueryValueExW(
                self.win32_handle(),
                PCWSTR(name.as_ptr()),
                None,
                Some(&mut ty),
                data,
                Some(&mut len),
            )
            .ok()
        };
        match res {
            Ok(()) if data.is_none() && len > 0 => Err(Probe::InsufficientBuffer { required: len as usize }),
            Ok(()) => Ok((ty, len as usize)),
            Err(e) if e.code() == ERROR_MORE_DATA.to_hresult() => Err(Probe::InsufficientBuffer {
                required: len as usize,
            }),
            Err(e) => Err(Probe::Failed(e)),
        }
    }

    /// One call of the sized `NtQueryKey(KeyNameInformation)` operation
    ///
    /// Fills `buffer` with a `KEY_NAME_INFORMATION` record in UTF-16 units:
    /// a 32-bit byte length followed by the key's full path.
    #[doc(alias = "NtQueryKey")]
    pub fn win32_name_information(&self, buffer: &mut [u16]) -> Result<usize, Probe<Error>> {
        let query = nt_query_key().map_err(Probe::Failed)?;
        let data = match buffer.is_empty() {
            true => ptr::null_mut(),
            false => buffer.as_mut_ptr() as *mut c_void,
        };
        let mut size = 0u32;
        let status = unsafe {
            query(
                self.win32_handle(),
                KEY_NAME_INFORMATION,
                data,
                (buffer.len() * mem::size_of::<u16>()) as u32,
                &mut size,
            )
        };
        let units = (size as usize + 1) / mem::size_of::<u16>();
        if status == STATUS_BUFFER_TOO_SMALL || status == STATUS_BUFFER_OVERFLOW {
            return Err(Probe::InsufficientBuffer { required: units })
        }
        status.ok().map(|()| units.min(buffer.len())).map_err(Probe::Failed)
    }
}

/// `NtQueryKey` has no import library outside the WDK, so it is looked up in
/// the already loaded `ntdll.dll`
fn nt_query_key() -> WinResult<NtQueryKey> {
    let ntdll = unsafe { GetModuleHandleW(PCWSTR(widecstr!("ntdll.dll").as_ptr())) }?;
    match unsafe { GetProcAddress(ntdll, PCSTR(b"NtQueryKey\0".as_ptr())) } {
        Some(f) => Ok(unsafe { mem::transmute::<unsafe extern "system" fn() -> isize, NtQueryKey>(f) }),
        None => Err(win32_error(ERROR_PROC_NOT_FOUND, &"ntdll.dll does not export NtQueryKey")),
    }
}

impl Drop for Key {
    #[doc(alias = "RegCloseKey")]
    fn drop(&mut self) {
        let _ = unsafe { RegCloseKey(self.win32_handle()) };
    }
}

impl Debug for Key {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut debug = f.debug_tuple("Key");
        match self.handle {
            Registry::HKEY_CLASSES_ROOT => debug.field(&"HKEY_CLASSES_ROOT"),
            Registry::HKEY_CURRENT_CONFIG => debug.field(&"HKEY_CURRENT_CONFIG"),
            Registry::HKEY_CURRENT_USER => debug.field(&"HKEY_CURRENT_USER"),
            Registry::HKEY_LOCAL_MACHINE => debug.field(&"HKEY_LOCAL_MACHINE"),
            Registry::HKEY_USERS => debug.field(&"HKEY_USERS"),
            _ => debug.field(&self.handle),
        }
        .finish()
    }
}

impl AsRef<HKEY> for Key {
    fn as_ref(&self) -> &HKEY {
        &self.handle
    }
}
