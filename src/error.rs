use {crate::ClassId, thiserror::Error};

/// The boxed platform error behind a failure
pub type OsError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures of an EDID acquisition run
///
/// Errors for which [`is_fatal`](Error::is_fatal) returns `true` end the run;
/// the rest belong to a single device and are recorded in its report.
#[derive(Debug, Error)]
pub enum Error {
    /// The class name resolved to no identifiers at all
    #[error("no device class is registered under the name {name:?}")]
    ClassNotFound {
        #[allow(missing_docs)]
        name: String,
    },

    /// Resolving the class name failed for a reason other than buffer sizing
    #[error("unable to retrieve the identifiers of device class {name:?}")]
    ClassResolutionFailed {
        #[allow(missing_docs)]
        name: String,
        #[allow(missing_docs)]
        #[source]
        source: OsError,
    },

    /// The set of present devices for a class could not be acquired
    #[error("failed to retrieve device information of class {class}")]
    #[doc(alias = "SetupDiGetClassDevsExW")]
    DeviceSetUnavailable {
        #[allow(missing_docs)]
        class: ClassId,
        #[allow(missing_docs)]
        #[source]
        source: OsError,
    },

    /// Requesting a device by index failed with something other than
    /// "no more items"
    #[error("failed to enumerate device #{index} of class {class}")]
    EnumerationFailed {
        #[allow(missing_docs)]
        class: ClassId,
        #[allow(missing_docs)]
        index: u32,
        #[allow(missing_docs)]
        #[source]
        source: OsError,
    },

    /// The configuration key of a device could not be opened
    #[error("unable to open the hardware key of device #{index}")]
    #[doc(alias = "SetupDiOpenDevRegKey")]
    KeyOpenFailed {
        #[allow(missing_docs)]
        index: u32,
        #[allow(missing_docs)]
        #[source]
        source: OsError,
    },

    /// The value is absent, has the wrong type, or could not be read
    #[error("value {value:?} is unavailable on device #{index}")]
    PropertyUnavailable {
        #[allow(missing_docs)]
        index: u32,
        #[allow(missing_docs)]
        value: String,
        #[allow(missing_docs)]
        #[source]
        source: OsError,
    },

    /// The second call of a sized query still reported an insufficient buffer
    ///
    /// `device` is `None` when the query was not tied to one device, such as
    /// during class resolution, in which case the error ends the run.
    #[error("{what} demanded {required} elements after its probe sized the buffer to {allocated}")]
    SizeProbeMismatch {
        /// What was being queried
        what: &'static str,
        #[allow(missing_docs)]
        device: Option<u32>,
        #[allow(missing_docs)]
        allocated: usize,
        #[allow(missing_docs)]
        required: usize,
    },
}

impl Error {
    /// Whether this error aborts the whole run rather than a single device
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::ClassNotFound { .. }
            | Error::ClassResolutionFailed { .. }
            | Error::DeviceSetUnavailable { .. }
            | Error::EnumerationFailed { .. } => true,
            Error::SizeProbeMismatch { device, .. } => device.is_none(),
            Error::KeyOpenFailed { .. } | Error::PropertyUnavailable { .. } => false,
        }
    }

    /// The enumeration index of the device a per-device error belongs to
    pub fn device_index(&self) -> Option<u32> {
        match *self {
            Error::KeyOpenFailed { index, .. } | Error::PropertyUnavailable { index, .. } => Some(index),
            Error::SizeProbeMismatch { device, .. } => device,
            _ => None,
        }
    }
}
