//! Sequencer contract and exit completion handles.
//!
//! # Invariants
//! - An `ExitSignal` fires at most once; `complete` consumes it.
//! - An `ExitCompletion` resolves exactly once, either finished or abandoned.
//! - A dropped signal resolves its completion as abandoned, never hangs it.

use super::profile::{AnimationProfile, AnimationTarget};
use futures::channel::oneshot;
use log::{debug, trace};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// How an exit animation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The visual transition ran to its end.
    Finished,
    /// The sequencer gave up without signalling (signal dropped).
    Abandoned,
}

/// Sequencer side of one exit animation.
#[derive(Debug)]
pub struct ExitSignal {
    tx: oneshot::Sender<()>,
}

impl ExitSignal {
    /// Reports that the exit transition finished.
    pub fn complete(self) {
        // Receiver may already be gone if the dispatcher was dropped.
        let _ = self.tx.send(());
    }
}

/// Dispatcher side of one exit animation; resolves when it ends.
#[derive(Debug)]
#[must_use = "an exit completion does nothing unless awaited"]
pub struct ExitCompletion {
    rx: Option<oneshot::Receiver<()>>,
}

impl ExitCompletion {
    /// Creates a linked signal/completion pair.
    pub fn pair() -> (ExitSignal, ExitCompletion) {
        let (tx, rx) = oneshot::channel();
        (ExitSignal { tx }, ExitCompletion { rx: Some(rx) })
    }

    /// Completion that is already finished.
    pub fn immediate() -> Self {
        Self { rx: None }
    }
}

impl Future for ExitCompletion {
    type Output = ExitStatus;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(rx) = self.rx.as_mut() else {
            return Poll::Ready(ExitStatus::Finished);
        };
        let status = match Pin::new(rx).poll(cx) {
            Poll::Ready(Ok(())) => ExitStatus::Finished,
            Poll::Ready(Err(oneshot::Canceled)) => ExitStatus::Abandoned,
            Poll::Pending => return Poll::Pending,
        };
        self.rx = None;
        Poll::Ready(status)
    }
}

/// Plays visual transitions on behalf of the dispatcher.
///
/// Entrance and emphasis animations are fire-and-forget. Exit animations hand
/// back an `ExitCompletion` that gates the matching state mutation.
pub trait AnimationSequencer {
    fn play_entrance(&self, target: &AnimationTarget, profile: &AnimationProfile);

    /// Non-gating effect on an element that stays (pulse, switch slide).
    fn play_emphasis(&self, target: &AnimationTarget, profile: &AnimationProfile) {
        let _ = (target, profile);
    }

    fn play_exit(&self, target: &AnimationTarget, profile: &AnimationProfile) -> ExitCompletion;

    /// Layout changed after a removal; viewport-based triggers should re-measure.
    fn notify_layout_changed(&self) {}
}

/// Sequencer that renders nothing and finishes every exit at once.
///
/// Used for reduced-motion sessions and headless hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateSequencer;

impl AnimationSequencer for ImmediateSequencer {
    fn play_entrance(&self, target: &AnimationTarget, profile: &AnimationProfile) {
        trace!(
            "event=animation_entrance module=animation status=skip target={target} easing={} duration_ms={}",
            profile.easing.as_str(),
            profile.total_duration(1).as_millis()
        );
    }

    fn play_emphasis(&self, target: &AnimationTarget, profile: &AnimationProfile) {
        trace!(
            "event=animation_emphasis module=animation status=skip target={target} easing={} duration_ms={}",
            profile.easing.as_str(),
            profile.total_duration(1).as_millis()
        );
    }

    fn play_exit(&self, target: &AnimationTarget, profile: &AnimationProfile) -> ExitCompletion {
        debug!(
            "event=animation_exit module=animation status=skip target={target} easing={} duration_ms={}",
            profile.easing.as_str(),
            profile.total_duration(1).as_millis()
        );
        ExitCompletion::immediate()
    }
}

#[cfg(test)]
mod tests {
    use super::{ExitCompletion, ExitStatus};
    use futures::executor::block_on;
    use futures::FutureExt;

    #[test]
    fn completion_is_pending_until_signalled() {
        let (signal, mut completion) = ExitCompletion::pair();
        assert!((&mut completion).now_or_never().is_none());

        signal.complete();
        assert_eq!(block_on(completion), ExitStatus::Finished);
    }

    #[test]
    fn dropped_signal_resolves_as_abandoned() {
        let (signal, completion) = ExitCompletion::pair();
        drop(signal);
        assert_eq!(block_on(completion), ExitStatus::Abandoned);
    }

    #[test]
    fn immediate_completion_is_ready() {
        let status = ExitCompletion::immediate().now_or_never();
        assert_eq!(status, Some(ExitStatus::Finished));
    }
}
