//! A scripted [`Backend`] for exercising the pipeline off Windows

use {
    crate::{query::Probe, Backend, ClassId, DeviceDescriptor, EnumerateFlags},
    std::{
        cell::Cell,
        collections::HashMap,
        fmt::{self, Display, Formatter},
        rc::Rc,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError(pub &'static str);

impl Display for MockError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for MockError {}

#[derive(Debug, Clone, Default)]
pub struct MockDevice {
    values: HashMap<String, Vec<u8>>,
    key_error: Option<MockError>,
    key_path: Option<String>,
    descriptor: Option<DeviceDescriptor>,
    growing: bool,
}

impl MockDevice {
    /// A device without any values
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn edid(data: &[u8]) -> Self {
        Self::empty().with_value("EDID", data)
    }

    pub fn with_value(mut self, name: &str, data: &[u8]) -> Self {
        self.values.insert(name.to_owned(), data.to_vec());
        self
    }

    pub fn without_key(mut self, err: MockError) -> Self {
        self.key_error = Some(err);
        self
    }

    pub fn with_key_path(mut self, path: &str) -> Self {
        self.key_path = Some(path.to_owned());
        self
    }

    pub fn with_descriptor(mut self, name: &str, id: &str) -> Self {
        self.descriptor = Some(DeviceDescriptor {
            name: name.to_owned(),
            id: id.to_owned(),
        });
        self
    }

    /// Values double in size every time they are queried
    pub fn growing(mut self) -> Self {
        self.growing = true;
        self
    }
}

#[derive(Debug, Default)]
pub struct MockBackend {
    classes: Vec<(String, Vec<ClassId>)>,
    devices: HashMap<ClassId, Vec<MockDevice>>,
    class_error: Option<MockError>,
    session_error: Option<MockError>,
    enumeration_error: Option<(u32, MockError)>,
    class_probes: Cell<usize>,
    device_probes: Cell<usize>,
    value_probes: Cell<usize>,
    sessions_opened: Cell<usize>,
    open_sessions: Rc<Cell<usize>>,
    open_keys: Rc<Cell<usize>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `Monitor` class with a single identifier and the given devices
    pub fn monitors(devices: Vec<MockDevice>) -> Self {
        let mut backend = Self::new().with_class("Monitor", vec![ClassId::MONITOR]);
        backend.devices.insert(ClassId::MONITOR, devices);
        backend
    }

    pub fn with_class(mut self, name: &str, ids: Vec<ClassId>) -> Self {
        self.classes.push((name.to_owned(), ids));
        self
    }

    pub fn fail_class_probe(mut self, err: MockError) -> Self {
        self.class_error = Some(err);
        self
    }

    pub fn fail_session(mut self, err: MockError) -> Self {
        self.session_error = Some(err);
        self
    }

    pub fn fail_enumeration_at(mut self, index: u32, err: MockError) -> Self {
        self.enumeration_error = Some((index, err));
        self
    }

    pub fn class_probes(&self) -> usize {
        self.class_probes.get()
    }

    pub fn device_probes(&self) -> usize {
        self.device_probes.get()
    }

    pub fn value_probes(&self) -> usize {
        self.value_probes.get()
    }

    pub fn sessions_opened(&self) -> usize {
        self.sessions_opened.get()
    }

    pub fn open_sessions(&self) -> usize {
        self.open_sessions.get()
    }

    pub fn open_keys(&self) -> usize {
        self.open_keys.get()
    }
}

/// Decrements a live-resource counter when dropped
#[derive(Debug)]
pub struct Guard(Rc<Cell<usize>>);

impl Guard {
    fn acquire(counter: &Rc<Cell<usize>>) -> Self {
        counter.set(counter.get() + 1);
        Self(counter.clone())
    }
}

impl Drop for Guard {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

#[derive(Debug)]
pub struct MockSession {
    devices: Vec<MockDevice>,
    _guard: Guard,
}

#[derive(Debug)]
pub struct MockKey {
    device: MockDevice,
    growth: Cell<usize>,
    _guard: Guard,
}

fn copy_sized<T: Copy>(data: &[T], buffer: &mut [T]) -> Result<usize, Probe<MockError>> {
    match buffer.len() < data.len() {
        true => Err(Probe::InsufficientBuffer { required: data.len() }),
        false => {
            buffer[..data.len()].copy_from_slice(data);
            Ok(data.len())
        },
    }
}

impl Backend for MockBackend {
    type Session = MockSession;
    type Device = MockDevice;
    type Key = MockKey;
    type Error = MockError;

    fn class_ids(&self, name: &str, buffer: &mut [ClassId]) -> Result<usize, Probe<MockError>> {
        self.class_probes.set(self.class_probes.get() + 1);
        if let Some(err) = self.class_error {
            return Err(Probe::Failed(err))
        }
        let ids = self
            .classes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, ids)| &ids[..])
            .unwrap_or(&[]);
        copy_sized(ids, buffer)
    }

    fn open_session(&self, class: &ClassId, flags: EnumerateFlags) -> Result<MockSession, MockError> {
        assert!(flags.contains(EnumerateFlags::PRESENT));
        self.sessions_opened.set(self.sessions_opened.get() + 1);
        if let Some(err) = self.session_error {
            return Err(err)
        }
        Ok(MockSession {
            devices: self.devices.get(class).cloned().unwrap_or_default(),
            _guard: Guard::acquire(&self.open_sessions),
        })
    }

    fn device(&self, session: &MockSession, index: u32) -> Result<Option<MockDevice>, MockError> {
        self.device_probes.set(self.device_probes.get() + 1);
        match self.enumeration_error {
            Some((at, err)) if at == index => Err(err),
            _ => Ok(session.devices.get(index as usize).cloned()),
        }
    }

    fn descriptor(&self, _session: &MockSession, device: &MockDevice) -> Option<DeviceDescriptor> {
        device.descriptor.clone()
    }

    fn open_key(&self, _session: &MockSession, device: &MockDevice) -> Result<MockKey, MockError> {
        if let Some(err) = device.key_error {
            return Err(err)
        }
        Ok(MockKey {
            device: device.clone(),
            growth: Cell::new(1),
            _guard: Guard::acquire(&self.open_keys),
        })
    }

    fn query_value(&self, key: &MockKey, name: &str, buffer: &mut [u8]) -> Result<usize, Probe<MockError>> {
        self.value_probes.set(self.value_probes.get() + 1);
        let value = key
            .device
            .values
            .get(name)
            .ok_or(Probe::Failed(MockError("the system cannot find the file specified")))?;
        match key.device.growing {
            true => {
                let len = value.len() * key.growth.get();
                key.growth.set(key.growth.get() * 2);
                match buffer.len() < len {
                    true => Err(Probe::InsufficientBuffer { required: len }),
                    false => Ok(len),
                }
            },
            false => copy_sized(value, buffer),
        }
    }

    fn key_name_information(&self, key: &MockKey, buffer: &mut [u16]) -> Result<usize, Probe<MockError>> {
        let path = key
            .device
            .key_path
            .as_ref()
            .ok_or(Probe::Failed(MockError("key name unavailable")))?;
        let name: Vec<u16> = path.encode_utf16().collect();
        let bytes = (name.len() * 2) as u32;
        let mut info = vec![bytes as u16, (bytes >> 16) as u16];
        info.extend(name);
        copy_sized(&info, buffer)
    }
}
