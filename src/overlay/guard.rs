use tracing::debug;

use super::host::{TerminalHost, ViewZone};

/// Owns a view zone for the length of one session.
///
/// The zone is disposed and focus returned to the terminal exactly once,
/// by [`ZoneGuard::finish`] or on drop, whichever comes first. Drop covers
/// early returns, panics and a cancelled session future.
pub struct ZoneGuard<'h, H: TerminalHost> {
    host: &'h mut H,
    zone: H::Zone,
    released: bool,
}

impl<'h, H: TerminalHost> ZoneGuard<'h, H> {
    pub fn new(host: &'h mut H, zone: H::Zone) -> Self {
        Self {
            host,
            zone,
            released: false,
        }
    }

    pub fn zone_mut(&mut self) -> &mut H::Zone {
        &mut self.zone
    }

    pub fn finish(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.zone.dispose();
        self.host.focus();
        debug!(terminal = self.host.id().get(), "view zone released");
    }
}

impl<H: TerminalHost> Drop for ZoneGuard<'_, H> {
    fn drop(&mut self) {
        self.release();
    }
}
