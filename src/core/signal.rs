use nix::libc::c_int;
use nix::sys::signal::sigaction;
use nix::sys::signal::sigprocmask;
use nix::sys::signal::SaFlags;
use nix::sys::signal::SigAction;
use nix::sys::signal::SigHandler;
use nix::sys::signal::SigSet;
use nix::sys::signal::SigmaskHow;
use nix::sys::signal::Signal;

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

/// Set from the SIGHUP handler, consumed by the event loop.
pub static RELOAD_REQUESTED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_sighup(_: c_int) {
    RELOAD_REQUESTED.store(true, Ordering::SeqCst);
}

/// SIGHUP requests a configuration reload. SIGCHLD is ignored so that
/// spawned commands are reaped by the kernel.
///
/// SIGHUP stays blocked outside the display wait, which lets it through
/// atomically. A request therefore always interrupts the wait, even one
/// that arrives just before the event loop starts blocking.
pub fn install() -> nix::Result<()> {
    let reload = SigAction::new(
        SigHandler::Handler(on_sighup),
        SaFlags::empty(),
        SigSet::empty(),
    );

    let reap = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());

    unsafe {
        sigaction(Signal::SIGHUP, &reload)?;
        sigaction(Signal::SIGCHLD, &reap)?;
    }

    let mut deferred = SigSet::empty();
    deferred.add(Signal::SIGHUP);

    sigprocmask(SigmaskHow::SIG_BLOCK, Some(&deferred), None)
}

/// Clears `flag`, returning whether it was set.
#[inline]
pub fn take_request(flag: &AtomicBool) -> bool {
    flag.swap(false, Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    use nix::sys::signal::raise;

    #[test]
    fn sighup_is_held_until_unblocked() {
        install().unwrap();
        raise(Signal::SIGHUP).unwrap();

        assert!(!take_request(&RELOAD_REQUESTED));

        let mut pending = SigSet::empty();
        pending.add(Signal::SIGHUP);
        sigprocmask(SigmaskHow::SIG_UNBLOCK, Some(&pending), None).unwrap();

        assert!(take_request(&RELOAD_REQUESTED));
        assert!(!take_request(&RELOAD_REQUESTED));
    }
}
