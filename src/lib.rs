#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/edid-winapi/0.1.0/")]
#![cfg_attr(feature = "doc", feature(doc_cfg))]

//! Retrieval of raw monitor EDID blocks on Windows.
//!
//! A run resolves the `Monitor` device setup class, enumerates the monitors
//! currently present, and reads the `EDID` value from each one's hardware
//! configuration key. Two interchangeable [backends](Backend) exist:
//! [`RegistryBackend`] uses SetupAPI and the registry, [`SelectorBackend`]
//! uses WinRT device selectors.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(windows)]
//! # fn main() -> Result<(), edid_winapi::Error> {
//! use edid_winapi::{Config, RegistryBackend};
//!
//! let report = edid_winapi::run(&RegistryBackend::new(), &Config::default())?;
//! for device in &report.devices {
//!     match &device.outcome {
//!         Ok(edid) => println!("#{}: {}", device.index, edid_winapi::HexBytes(edid)),
//!         Err(e) => println!("#{}: {e}", device.index),
//!     }
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(windows))]
//! # fn main() {}
//! ```

#[cfg(windows)]
pub use self::{device::RegistryBackend, winrt::SelectorBackend};
pub use self::{
    backend::{Backend, DeviceDescriptor, EnumerateFlags},
    enumerate::{DeviceHandle, Devices, Session},
    error::{Error, OsError},
    format::HexBytes,
    guid::{ClassId, ParseClassIdError},
    pipeline::{run, run_each, Config, DeviceReport, Report, MONITOR_CLASS},
    property::{DeviceKey, DEFAULT_GUESS, EDID_VALUE},
    resolve::resolve_class,
};

mod backend;
#[cfg(windows)]
pub mod device;
mod enumerate;
mod error;
mod format;
mod guid;
#[cfg(test)]
mod mock;
mod pipeline;
pub mod property;
pub mod query;
#[cfg(windows)]
#[doc(hidden)]
pub mod registry;
mod resolve;
#[cfg(windows)]
pub mod winrt;

#[cfg(windows)]
#[cfg_attr(feature = "doc", doc(cfg(feature = "win32")))]
pub mod win32 {
    //! [`windows`] API re-exports

    #[allow(missing_docs)]
    #[cfg_attr(feature = "doc", doc(cfg(feature = "win32")))]
    #[cfg_attr(not(feature = "win32"), doc(hidden))]
    #[doc(no_inline)]
    pub use windows::{
        core::{GUID, HRESULT},
        Win32::{
            Devices::DeviceAndDriverInstallation::{HDEVINFO, SP_DEVINFO_DATA},
            Foundation::{NTSTATUS, WIN32_ERROR},
            System::Registry::{HKEY, REG_VALUE_TYPE},
        },
    };
    pub use {
        widestring::{self, WideCStr, WideCString, WideStr, WideString},
        windows::{self, core, Win32},
    };
    use {
        std::fmt::{Display, Write},
        windows::core::{Error, Result as WinResult, HSTRING},
    };

    /// Treats `ERROR_NO_MORE_ITEMS` as the end of an index-based enumeration
    pub(crate) fn win32_enum_<R, F: FnOnce(u32) -> WinResult<R>>(index: u32, f: F) -> WinResult<Option<R>> {
        use windows::Win32::Foundation::ERROR_NO_MORE_ITEMS;

        match f(index) {
            Ok(v) => Ok(Some(v)),
            Err(e) => match e {
                e if e.code() == ERROR_NO_MORE_ITEMS.to_hresult() => Ok(None),
                err => Err(err),
            },
        }
    }

    pub(crate) fn win32_error(code: WIN32_ERROR, f: &dyn Display) -> Error {
        let mut str = widestring::Utf16String::new();
        let _res = write!(str, "{f}");
        debug_assert!(_res.is_ok());
        Error::new(code.to_hresult(), HSTRING::from_wide(str.as_ref()))
    }
}
