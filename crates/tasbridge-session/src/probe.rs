use tasbridge_channel::ByteChannel;
use tasbridge_frame::{DeviceProfile, LOG_TERMINATOR};
use tracing::{debug, info};

use crate::error::Result;

/// Identity reported by an idle device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub description: String,
    pub version: String,
}

/// Ask an idle device what it is.
///
/// Only valid before a console has been selected; once a session is
/// running the query bytes would be taken as protocol data.
pub fn probe<C: ByteChannel + ?Sized>(
    channel: &mut C,
    profile: &DeviceProfile,
) -> Result<DeviceInfo> {
    let description = query(channel, profile.describe_query)?;
    let version = query(channel, profile.version_query)?;
    info!(%description, %version, "device identified");
    Ok(DeviceInfo {
        description,
        version,
    })
}

fn query<C: ByteChannel + ?Sized>(channel: &mut C, request: u8) -> Result<String> {
    channel.write_all(&[request])?;
    let line = channel.read_until(LOG_TERMINATOR)?;
    debug!(request = %char::from(request), bytes = line.len(), "probe reply");
    Ok(String::from_utf8_lossy(&line).trim().to_string())
}

#[cfg(test)]
mod tests {
    use tasbridge_channel::ChannelError;

    use super::*;
    use crate::error::SessionError;
    use crate::testing::{device, written};

    #[test]
    fn reads_description_and_version() {
        let mut channel = device(b"Open TAS Controller\n0.2.1\r\n");

        let info = probe(&mut channel, &DeviceProfile::n64()).unwrap();

        assert_eq!(info.description, "Open TAS Controller");
        assert_eq!(info.version, "0.2.1");
        assert_eq!(written(&channel), b"dv");
    }

    #[test]
    fn silent_device_fails() {
        let mut channel = device(b"Open TAS Controller\n");

        let err = probe(&mut channel, &DeviceProfile::n64()).unwrap_err();

        assert!(matches!(err, SessionError::Channel(ChannelError::Closed)));
    }
}
