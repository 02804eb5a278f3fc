use {
    crate::{Backend, ClassId, DeviceDescriptor, EnumerateFlags, Error},
    log::{debug, trace},
    std::{
        fmt::{self, Debug, Formatter},
        iter::FusedIterator,
    },
};

/// An enumeration session over the devices of one class
///
/// Wraps the backend's device set (a `HDEVINFO` for the registry backend),
/// which is released when the session is dropped. [Device handles](DeviceHandle)
/// borrow the session and cannot outlive it.
pub struct Session<'b, B: Backend> {
    backend: &'b B,
    class: ClassId,
    inner: B::Session,
}

impl<'b, B: Backend> Session<'b, B> {
    /// Acquire the devices of `class` matching `flags`
    #[doc(alias = "SetupDiGetClassDevsExW")]
    pub fn open(backend: &'b B, class: ClassId, flags: EnumerateFlags) -> Result<Self, Error> {
        let inner = backend
            .open_session(&class, flags)
            .map_err(|e| Error::DeviceSetUnavailable {
                class,
                source: e.into(),
            })?;
        debug!("opened device session for class {class} ({flags:?})");
        Ok(Self { backend, class, inner })
    }

    /// The class this session enumerates
    pub fn class(&self) -> ClassId {
        self.class
    }

    /// The backend that produced this session
    pub fn backend(&self) -> &'b B {
        self.backend
    }

    /// Lazily enumerate the devices of this session in index order
    ///
    /// Enumeration requests index 0, 1, 2... and ends when the backend reports
    /// there is no such index. Any other failure is yielded once as
    /// [`Error::EnumerationFailed`], after which the iterator is exhausted.
    #[doc(alias = "SetupDiEnumDeviceInfo")]
    pub fn devices(&self) -> Devices<'_, B> {
        Devices {
            session: self,
            next: 0,
            done: false,
        }
    }

    #[allow(missing_docs)]
    #[cfg_attr(feature = "doc", doc(cfg(feature = "win32")))]
    #[cfg_attr(not(feature = "win32"), doc(hidden))]
    pub fn inner(&self) -> &B::Session {
        &self.inner
    }
}

impl<'b, B: Backend> Debug for Session<'b, B> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Session").field("class", &self.class).finish_non_exhaustive()
    }
}

/// The iterator returned by [`Session::devices`]
pub struct Devices<'s, B: Backend> {
    session: &'s Session<'s, B>,
    next: u32,
    done: bool,
}

impl<'s, B: Backend> Iterator for Devices<'s, B> {
    type Item = Result<DeviceHandle<'s, B>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None
        }

        let index = self.next;
        let session = self.session;
        match session.backend.device(&session.inner, index) {
            Ok(Some(device)) => {
                trace!("device #{index} of class {}", session.class);
                self.next += 1;
                Some(Ok(DeviceHandle { session, index, device }))
            },
            Ok(None) => {
                debug!("class {} has {index} devices", session.class);
                self.done = true;
                None
            },
            Err(e) => {
                self.done = true;
                Some(Err(Error::EnumerationFailed {
                    class: session.class,
                    index,
                    source: e.into(),
                }))
            },
        }
    }
}

impl<'s, B: Backend> FusedIterator for Devices<'s, B> {}

/// One enumerated device, valid for the lifetime of its [`Session`]
pub struct DeviceHandle<'s, B: Backend> {
    session: &'s Session<'s, B>,
    index: u32,
    device: B::Device,
}

impl<'s, B: Backend> DeviceHandle<'s, B> {
    /// The position of this device in its session's enumeration order
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The session this device belongs to
    pub fn session(&self) -> &'s Session<'s, B> {
        self.session
    }

    /// The device's name and interface id, if the backend has them
    pub fn descriptor(&self) -> Option<DeviceDescriptor> {
        self.session.backend.descriptor(&self.session.inner, &self.device)
    }

    #[allow(missing_docs)]
    #[cfg_attr(feature = "doc", doc(cfg(feature = "win32")))]
    #[cfg_attr(not(feature = "win32"), doc(hidden))]
    pub fn inner(&self) -> &B::Device {
        &self.device
    }
}

impl<'s, B: Backend> Debug for DeviceHandle<'s, B> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("class", &self.session.class)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::mock::{MockBackend, MockDevice, MockError},
    };

    #[test]
    fn yields_every_index_then_stops() {
        for count in 0..5u32 {
            let backend = MockBackend::monitors((0..count).map(|_| MockDevice::edid(&[0x00])).collect());
            let session = Session::open(&backend, ClassId::MONITOR, EnumerateFlags::PRESENT).unwrap();
            let indices: Vec<u32> = session.devices().map(|d| d.unwrap().index()).collect();
            assert_eq!(indices, (0..count).collect::<Vec<_>>());
            // the terminating probe is the only one past the end
            assert_eq!(backend.device_probes(), count as usize + 1);
        }
    }

    #[test]
    fn failure_ends_enumeration() {
        let backend = MockBackend::monitors(vec![MockDevice::edid(&[1]), MockDevice::edid(&[2]), MockDevice::edid(&[3])])
            .fail_enumeration_at(1, MockError("device set corrupted"));
        let session = Session::open(&backend, ClassId::MONITOR, EnumerateFlags::PRESENT).unwrap();
        let mut devices = session.devices();
        let first = devices.next().unwrap().unwrap();
        match devices.next() {
            Some(Err(Error::EnumerationFailed { index: 1, .. })) => (),
            res => panic!("unexpected {res:?}"),
        }
        assert!(devices.next().is_none());
        // handles yielded before the failure stay usable
        assert_eq!(first.index(), 0);
    }

    #[test]
    fn unavailable_set_is_fatal() {
        let backend = MockBackend::monitors(vec![]).fail_session(MockError("invalid handle"));
        let err = Session::open(&backend, ClassId::MONITOR, EnumerateFlags::PRESENT).unwrap_err();
        assert!(matches!(err, Error::DeviceSetUnavailable { class: ClassId::MONITOR, .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn sessions_are_released() {
        let backend = MockBackend::monitors(vec![MockDevice::edid(&[1])]);
        {
            let session = Session::open(&backend, ClassId::MONITOR, EnumerateFlags::PRESENT).unwrap();
            assert_eq!(backend.open_sessions(), 1);
            assert_eq!(session.devices().count(), 1);
        }
        assert_eq!(backend.open_sessions(), 0);
    }
}
