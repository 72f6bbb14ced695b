use nix::sys::signal::signal;
use nix::sys::signal::sigprocmask;
use nix::sys::signal::SigHandler;
use nix::sys::signal::SigSet;
use nix::sys::signal::SigmaskHow;
use nix::sys::signal::Signal;

use std::hash::BuildHasher;
use std::hash::Hasher;
use std::io;
use std::os::unix::process::CommandExt;
use std::process::Command;
use std::process::Stdio;

/// Window ids are already well distributed, so hashing can be skipped.
#[derive(Default)]
pub struct IdHasher {
    state: u64,
}

impl Hasher for IdHasher {
    #[inline]
    fn write(
        &mut self,
        bytes: &[u8],
    ) {
        for &byte in bytes {
            self.state = self.state.rotate_left(8) ^ u64::from(byte);
        }
    }

    #[inline]
    fn write_u32(
        &mut self,
        value: u32,
    ) {
        self.state = u64::from(value);
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }
}

#[derive(Debug, Default, Clone)]
pub struct BuildIdHasher;

impl BuildHasher for BuildIdHasher {
    type Hasher = IdHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        Self::Hasher {
            state: 0,
        }
    }
}

pub struct Util;

impl Util {
    /// Runs `cmd` through `sh -c` without waiting for it. The child does not
    /// inherit our standard streams. It gets the default SIGCHLD disposition
    /// and an empty signal mask back, since the window manager ignores
    /// SIGCHLD and blocks SIGHUP.
    pub fn spawn_shell(cmd: &str) -> io::Result<()> {
        let mut command = Command::new("sh");

        command
            .arg("-c")
            .arg(cmd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        unsafe {
            command.pre_exec(|| {
                signal(Signal::SIGCHLD, SigHandler::SigDfl)?;
                sigprocmask(SigmaskHow::SIG_SETMASK, Some(&SigSet::empty()), None)?;
                Ok(())
            });
        }

        command.spawn().map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::hash::Hash;

    #[test]
    fn id_hasher_passes_window_ids_through() {
        let mut hasher = BuildIdHasher.build_hasher();
        0x0040_0002u32.hash(&mut hasher);

        assert_eq!(hasher.finish(), 0x0040_0002);
    }

    #[test]
    fn spawn_shell_does_not_wait() {
        assert!(Util::spawn_shell("exit 0").is_ok());
    }
}
