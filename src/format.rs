use {
    crate::{DeviceReport, Report},
    std::fmt::{self, Display, Formatter},
};

/// Displays bytes as lowercase hex octets separated by single spaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexBytes<'a>(pub &'a [u8]);

impl<'a> Display for HexBytes<'a> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut bytes = self.0.iter();
        if let Some(first) = bytes.next() {
            write!(f, "{first:02x}")?;
            for b in bytes {
                write!(f, " {b:02x}")?;
            }
        }
        Ok(())
    }
}

/// One device block: an optional `Name : Id` header, an optional
/// `Registry Key: "<path>"` line, then the hex line or an `ERROR!` marker
impl Display for DeviceReport {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if let Some(descriptor) = &self.descriptor {
            writeln!(f, "{} : {}", descriptor.name, descriptor.id)?;
        }
        if let Some(path) = &self.key_path {
            writeln!(f, "Registry Key: \"{path}\"")?;
        }
        match &self.outcome {
            Ok(data) => writeln!(f, "{}", HexBytes(data)),
            Err(e) => writeln!(f, "ERROR! {e}"),
        }
    }
}

/// Device blocks separated by blank lines
impl Display for Report {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (i, device) in self.devices.iter().enumerate() {
            if i != 0 {
                writeln!(f)?;
            }
            write!(f, "{device}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{ClassId, DeviceDescriptor, Error},
    };

    fn block(index: u32, outcome: Result<Vec<u8>, Error>) -> DeviceReport {
        DeviceReport {
            class: ClassId::MONITOR,
            index,
            descriptor: None,
            key_path: None,
            outcome,
        }
    }

    #[test]
    fn hex_octets() {
        assert_eq!(HexBytes(&[0xaa, 0x00, 0xff]).to_string(), "aa 00 ff");
        assert_eq!(HexBytes(&[0x0a]).to_string(), "0a");
        assert_eq!(HexBytes(&[]).to_string(), "");
    }

    #[test]
    fn device_block_with_header() {
        let mut device = block(0, Ok(vec![0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00]));
        device.descriptor = Some(DeviceDescriptor {
            name: "Generic PnP Monitor".into(),
            id: r"\\?\DISPLAY#GSM5B7F#4&2a5e8c9b&0&UID8388688#{e6f07b5f-ee97-4a90-b076-33f57bf4eaa7}".into(),
        });
        assert_eq!(
            device.to_string(),
            "Generic PnP Monitor : \\\\?\\DISPLAY#GSM5B7F#4&2a5e8c9b&0&UID8388688#{e6f07b5f-ee97-4a90-b076-33f57bf4eaa7}\n\
             00 ff ff ff ff ff ff 00\n"
        );
    }

    #[test]
    fn device_block_with_key_path() {
        let mut device = block(0, Ok(vec![0x01]));
        device.key_path = Some(r"\REGISTRY\MACHINE\SYSTEM".into());
        assert_eq!(device.to_string(), "Registry Key: \"\\REGISTRY\\MACHINE\\SYSTEM\"\n01\n");
    }

    #[test]
    fn blocks_are_separated() {
        let report = Report {
            devices: vec![
                block(0, Ok(vec![0x12])),
                block(1, Err(Error::PropertyUnavailable {
                    index: 1,
                    value: "EDID".into(),
                    source: "not found".into(),
                })),
            ],
        };
        assert_eq!(report.to_string(), "12\n\nERROR! value \"EDID\" is unavailable on device #1\n");
    }
}
