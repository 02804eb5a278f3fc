use {
    crate::{
        property::{DEFAULT_GUESS, EDID_VALUE},
        resolve_class, Backend, ClassId, DeviceDescriptor, DeviceHandle, EnumerateFlags, Error, Session,
    },
    log::{debug, info},
};

/// The class name of display monitors
pub const MONITOR_CLASS: &str = "Monitor";

/// Parameters of an acquisition [`run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    class_name: String,
    value_name: String,
    flags: EnumerateFlags,
    guess: usize,
    key_paths: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            class_name: MONITOR_CLASS.into(),
            value_name: EDID_VALUE.into(),
            flags: EnumerateFlags::PRESENT,
            guess: DEFAULT_GUESS,
            key_paths: false,
        }
    }
}

impl Config {
    /// The device class to enumerate, `"Monitor"` by default
    pub fn class_name<S: Into<String>>(mut self, name: S) -> Self {
        self.class_name = name.into();
        self
    }

    /// The binary value to read from each device, `"EDID"` by default
    pub fn value_name<S: Into<String>>(mut self, name: S) -> Self {
        self.value_name = name.into();
        self
    }

    /// Device filter flags, [`PRESENT`](EnumerateFlags::PRESENT) by default
    pub fn flags(mut self, flags: EnumerateFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Size of the first value read, 128 bytes by default
    pub fn initial_guess(mut self, guess: usize) -> Self {
        self.guess = guess;
        self
    }

    /// Whether to record the path of each device's configuration key
    pub fn key_paths(mut self, enabled: bool) -> Self {
        self.key_paths = enabled;
        self
    }

    #[allow(missing_docs)]
    pub fn get_class_name(&self) -> &str {
        &self.class_name
    }

    #[allow(missing_docs)]
    pub fn get_value_name(&self) -> &str {
        &self.value_name
    }
}

/// What a run learned about one device
#[derive(Debug)]
pub struct DeviceReport {
    /// The class the device was enumerated under
    pub class: ClassId,
    /// Enumeration index within its session
    pub index: u32,
    /// Name and id, for backends that have them
    pub descriptor: Option<DeviceDescriptor>,
    /// Configuration key path, when [requested](Config::key_paths) and available
    pub key_path: Option<String>,
    /// The value bytes, or the per-device failure
    pub outcome: Result<Vec<u8>, Error>,
}

/// The device reports of one run, in enumeration order
#[derive(Debug, Default)]
pub struct Report {
    #[allow(missing_docs)]
    pub devices: Vec<DeviceReport>,
}

/// Resolve the configured class, enumerate its devices and read the configured
/// value from each, collecting the results
///
/// Run-level failures (see [`Error::is_fatal`]) are returned as `Err`; device
/// failures are recorded in the device's report.
pub fn run<B: Backend>(backend: &B, config: &Config) -> Result<Report, Error> {
    let mut report = Report::default();
    run_each(backend, config, |device| report.devices.push(device))?;
    Ok(report)
}

/// Like [`run`], but hands each device report to `f` as soon as it is read
///
/// Reports emitted before a run-level failure have already been delivered
/// when the error is returned. Returns the number of devices processed.
pub fn run_each<B: Backend, F: FnMut(DeviceReport)>(backend: &B, config: &Config, mut f: F) -> Result<usize, Error> {
    let classes = resolve_class(backend, &config.class_name)?;
    let mut count = 0;
    for class in classes {
        let session = Session::open(backend, class, config.flags)?;
        for device in session.devices() {
            f(read_device(&device?, config));
            count += 1;
        }
    }
    info!("read {:?} from {count} {:?} devices", config.value_name, config.class_name);
    Ok(count)
}

fn read_device<B: Backend>(device: &DeviceHandle<B>, config: &Config) -> DeviceReport {
    let (key_path, outcome) = match device.open_key() {
        Ok(key) => {
            let key_path = match config.key_paths {
                true => key
                    .path()
                    .map_err(|e| debug!("no key path for device #{}: {e}", device.index()))
                    .ok(),
                false => None,
            };
            (key_path, key.read_value(&config.value_name, config.guess))
        },
        Err(e) => (None, Err(e)),
    };

    DeviceReport {
        class: device.session().class(),
        index: device.index(),
        descriptor: device.descriptor(),
        key_path,
        outcome,
    }
}
