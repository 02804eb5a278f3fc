use crate::{query::Probe, ClassId};

/// The operating system layer an acquisition run is built on
///
/// This is the single abstract capability {resolve class, enumerate devices,
/// read property}. On Windows it is implemented by
/// [`RegistryBackend`](crate::RegistryBackend) (SetupAPI and the registry) and
/// [`SelectorBackend`](crate::SelectorBackend) (WinRT device selectors). A run
/// uses exactly one backend.
///
/// The sized operations follow the [two-phase protocol](crate::query): they
/// write into the provided buffer and return the element count written, or
/// report the count they need with [`Probe::InsufficientBuffer`].
pub trait Backend {
    /// An enumeration session; released when dropped
    type Session;
    /// The per-index device data produced by a session
    type Device;
    /// An open configuration key; released when dropped
    type Key;
    /// The platform error type
    type Error: std::error::Error + Send + Sync + 'static;

    /// Resolve the identifiers registered for a device class name
    #[doc(alias = "SetupDiClassGuidsFromNameW")]
    fn class_ids(&self, name: &str, buffer: &mut [ClassId]) -> Result<usize, Probe<Self::Error>>;

    /// Acquire the set of devices of `class` matching `flags`
    fn open_session(&self, class: &ClassId, flags: EnumerateFlags) -> Result<Self::Session, Self::Error>;

    /// Request the device at `index`
    ///
    /// `Ok(None)` means there is no such index, which ends enumeration normally.
    fn device(&self, session: &Self::Session, index: u32) -> Result<Option<Self::Device>, Self::Error>;

    /// The logical identity of a device, where the backend has one
    fn descriptor(&self, session: &Self::Session, device: &Self::Device) -> Option<DeviceDescriptor> {
        let _ = (session, device);
        None
    }

    /// Open the device's hardware configuration key for reading
    fn open_key(&self, session: &Self::Session, device: &Self::Device) -> Result<Self::Key, Self::Error>;

    /// Read the binary value `name` from an open key
    fn query_value(&self, key: &Self::Key, name: &str, buffer: &mut [u8]) -> Result<usize, Probe<Self::Error>>;

    /// Read the canonical path of an open key as a `KEY_NAME_INFORMATION`
    /// record, in UTF-16 units
    ///
    /// See [`key_path_from_name_information`](crate::property::key_path_from_name_information).
    #[doc(alias = "NtQueryKey")]
    fn key_name_information(&self, key: &Self::Key, buffer: &mut [u16]) -> Result<usize, Probe<Self::Error>>;
}

/// The logical identity of a device: its display name and interface id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceDescriptor {
    /// Human-readable device name
    pub name: String,
    /// Unique interface or instance identifier
    pub id: String,
}

bitflags::bitflags! {
    /// Flags used to filter the devices of [a session](Backend::open_session)
    ///
    /// These carry the values of the SetupAPI `DIGCF_*` flags.
    #[derive(Default)]
    pub struct EnumerateFlags: u32 {
        /// [Only the device that is associated with the system default device interface][digcf_default]
        ///
        /// [digcf_default]: https://learn.microsoft.com/en-us/windows/win32/api/setupapi/nf-setupapi-setupdigetclassdevsa#digcf_default
        #[doc(alias = "DIGCF_DEFAULT")]
        const DEFAULT = 0x0000_0001;

        /// [Only devices that are currently present in a system][digcf_present]
        ///
        /// [digcf_present]: https://learn.microsoft.com/en-us/windows/win32/api/setupapi/nf-setupapi-setupdigetclassdevsa#digcf_present
        #[doc(alias = "DIGCF_PRESENT")]
        const PRESENT = 0x0000_0002;

        /// [Installed devices for all device setup classes][digcf_allclasses]
        ///
        /// [digcf_allclasses]: https://learn.microsoft.com/en-us/windows/win32/api/setupapi/nf-setupapi-setupdigetclassdevsa#digcf_allclasses
        #[doc(alias = "DIGCF_ALLCLASSES")]
        const ALLCLASSES = 0x0000_0004;

        /// [Only devices that are a part of the current hardware profile][digcf_profile]
        ///
        /// [digcf_profile]: https://learn.microsoft.com/en-us/windows/win32/api/setupapi/nf-setupapi-setupdigetclassdevsa#digcf_profile
        #[doc(alias = "DIGCF_PROFILE")]
        const PROFILE = 0x0000_0008;
    }
}
