use std::{
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

#[derive(Debug, Default)]
struct Flags {
    paused: bool,
    stopped: bool,
}

/// Pause and stop signals shared between a training loop and whoever hosts it
///
/// Cloning yields another handle to the same signals. The loop consults them between
/// steps, so a stop takes effect after at most one step and its pacing delay, and never
/// touches the agent or environment.
#[derive(Debug, Clone, Default)]
pub struct Control {
    inner: Arc<(Mutex<Flags>, Condvar)>,
}

impl Control {
    pub fn new() -> Self {
        Self::default()
    }

    fn flags(&self) -> MutexGuard<'_, Flags> {
        self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, f: impl FnOnce(&mut Flags)) {
        f(&mut *self.flags());
        self.inner.1.notify_all();
    }

    pub fn pause(&self) {
        self.update(|flags| flags.paused = true);
    }

    pub fn resume(&self) {
        self.update(|flags| flags.paused = false);
    }

    /// Flip the pause flag. **Returns** whether training is now paused
    pub fn toggle_pause(&self) -> bool {
        let mut paused = false;
        self.update(|flags| {
            flags.paused = !flags.paused;
            paused = flags.paused;
        });
        paused
    }

    /// Ask the loop to wind down; also releases a paused loop
    pub fn stop(&self) {
        self.update(|flags| flags.stopped = true);
    }

    /// Clear both flags so the handle can drive another run
    pub fn reset(&self) {
        self.update(|flags| *flags = Flags::default());
    }

    pub fn is_paused(&self) -> bool {
        self.flags().paused
    }

    pub fn is_stopped(&self) -> bool {
        self.flags().stopped
    }

    /// Block while paused
    ///
    /// **Returns** `false` if training was stopped, `true` if it should carry on
    pub fn wait_while_paused(&self) -> bool {
        let (lock, cvar) = &*self.inner;
        let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let guard = cvar
            .wait_while(guard, |flags| flags.paused && !flags.stopped)
            .unwrap_or_else(PoisonError::into_inner);
        !guard.stopped
    }

    /// Wait out a pacing delay, waking early on stop
    ///
    /// **Returns** `false` if training was stopped, `true` if it should carry on
    pub fn sleep(&self, delay: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        if delay.is_zero() {
            return !guard.stopped;
        }
        let (guard, _) = cvar
            .wait_timeout_while(guard, delay, |flags| !flags.stopped)
            .unwrap_or_else(PoisonError::into_inner);
        !guard.stopped
    }
}

#[cfg(test)]
mod tests {
    use std::{
        thread,
        time::{Duration, Instant},
    };

    use super::*;

    #[test]
    fn flags_toggle() {
        let control = Control::new();
        assert!(!control.is_paused() && !control.is_stopped(), "starts running");
        assert!(control.toggle_pause(), "toggled to paused");
        assert!(!control.toggle_pause(), "toggled back");

        control.pause();
        control.stop();
        assert!(control.is_paused() && control.is_stopped());
        control.reset();
        assert!(!control.is_paused() && !control.is_stopped(), "reset clears both");
    }

    #[test]
    fn sleep_runs_full_delay_and_wakes_on_stop() {
        let control = Control::new();
        let t = Instant::now();
        assert!(control.sleep(Duration::from_millis(20)), "not stopped");
        assert!(t.elapsed() >= Duration::from_millis(20), "waited out delay");

        let handle = control.clone();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            handle.stop();
        });
        let t = Instant::now();
        assert!(!control.sleep(Duration::from_secs(30)), "stop reported");
        assert!(t.elapsed() < Duration::from_secs(10), "woke early");
        stopper.join().unwrap();
    }

    #[test]
    fn pause_blocks_until_resume() {
        let control = Control::new();
        control.pause();

        let handle = control.clone();
        let waiter = thread::spawn(move || handle.wait_while_paused());
        thread::sleep(Duration::from_millis(30));
        assert!(!waiter.is_finished(), "still blocked while paused");

        control.resume();
        assert!(waiter.join().unwrap(), "resumed, carry on");
    }

    #[test]
    fn stop_releases_paused_loop() {
        let control = Control::new();
        control.pause();

        let handle = control.clone();
        let waiter = thread::spawn(move || handle.wait_while_paused());
        thread::sleep(Duration::from_millis(20));
        control.stop();
        assert!(!waiter.join().unwrap(), "stopped while paused");
    }
}
