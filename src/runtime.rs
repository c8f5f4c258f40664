use crate::config::MeasurementPlan;
use crate::measurement::{FinalResult, SpeedTest};
use crate::probe::{Probe, ProbeError, ProbeEvent};
use crossbeam_channel::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// A probe run in progress on its own worker thread.
///
/// Dropping the handle detaches the worker; events it still produces are
/// discarded because nothing receives them.
pub struct RunHandle {
    pub events: Receiver<ProbeEvent>,
    pub join: Option<JoinHandle<()>>,
}

impl RunHandle {
    pub fn finish(mut self) {
        if let Some(join) = self.join.take()
            && join.join().is_err()
        {
            warn!("probe worker panicked");
        }
    }
}

/// Builds a probe on a worker thread and runs `plan` with it.
///
/// Construction and run failures are reported as `ProbeEvent::Failed`
/// rather than returned, so the receiving side has one place to look.
pub fn spawn_probe_run<F>(factory: F, plan: MeasurementPlan) -> RunHandle
where
    F: FnOnce() -> Result<Box<dyn Probe>, ProbeError> + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::unbounded();
    let join = thread::spawn(move || run_worker(factory, plan, tx));
    RunHandle {
        events: rx,
        join: Some(join),
    }
}

fn run_worker<F>(factory: F, plan: MeasurementPlan, event_tx: Sender<ProbeEvent>)
where
    F: FnOnce() -> Result<Box<dyn Probe>, ProbeError>,
{
    let mut probe = match factory() {
        Ok(probe) => probe,
        Err(err) => {
            let _ = event_tx.send(ProbeEvent::Failed(err));
            return;
        }
    };

    let result = probe.run(&plan, &mut |event| {
        if event_tx.send(event).is_err() {
            debug!("probe event dropped, run receiver is gone");
        }
    });
    if let Err(err) = result {
        let _ = event_tx.send(ProbeEvent::Failed(err));
    }
}

/// Applies every event of `handle` to `test` until the worker is done.
///
/// `on_update` sees the test after each applied event. Returns the final
/// result, `None` if the probe finished without one, or the probe error.
pub fn drain_run(
    test: &mut SpeedTest,
    handle: RunHandle,
    mut on_update: impl FnMut(&SpeedTest),
) -> Result<Option<FinalResult>, ProbeError> {
    let mut failure = None;
    for event in handle.events.iter() {
        if let ProbeEvent::Failed(err) = &event {
            failure = Some(err.clone());
        }
        test.apply(event);
        on_update(test);
        if failure.is_some() {
            break;
        }
    }
    handle.finish();

    match failure {
        Some(err) => Err(err),
        None => Ok(test.results().copied()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanStep;
    use crate::measurement::TestPhase;
    use crate::probe::ProbeErrorKind;
    use crate::probe_engine::ScriptedProbe;

    fn scripted(
        probe: ScriptedProbe,
    ) -> impl FnOnce() -> Result<Box<dyn Probe>, ProbeError> + Send + 'static {
        move || {
            let probe: Box<dyn Probe> = Box::new(probe);
            Ok(probe)
        }
    }

    fn plan() -> MeasurementPlan {
        MeasurementPlan {
            steps: vec![
                PlanStep::latency(3),
                PlanStep::download(1_000_000, 4),
                PlanStep::upload(1_000_000, 2),
            ],
        }
    }

    #[test]
    fn scripted_run_drains_to_final_result() {
        let plan = plan();
        let mut test = SpeedTest::new(&plan);
        test.start().expect("start");

        let handle = spawn_probe_run(
            scripted(ScriptedProbe::steady(200_000_000.0, 40_000_000.0, 9.0, 1.2)),
            plan,
        );
        let mut progress_seen = Vec::new();
        let result = drain_run(&mut test, handle, |test| progress_seen.push(test.progress()))
            .expect("run")
            .expect("final result");

        assert_eq!(result.download_mbps, 200.0);
        assert_eq!(result.upload_mbps, 40.0);
        assert_eq!(result.latency_ms, 9.0);
        assert_eq!(result.jitter_ms, 1.0);
        assert_eq!(result.sample_count, 9);
        assert_eq!(test.phase(), TestPhase::Complete);
        assert!(progress_seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(progress_seen.last().copied(), Some(100.0));
    }

    #[test]
    fn factory_failure_reports_init_error() {
        let plan = plan();
        let mut test = SpeedTest::new(&plan);
        test.start().expect("start");

        let handle = spawn_probe_run(
            || Err(ProbeError::new(ProbeErrorKind::Init, "no handle")),
            plan,
        );
        let err = drain_run(&mut test, handle, |_| {}).expect_err("should fail");

        assert_eq!(err.kind, ProbeErrorKind::Init);
        assert_eq!(test.phase(), TestPhase::Idle);
        assert!(test.results().is_none());
    }

    #[test]
    fn mid_run_failure_resets_to_idle() {
        let plan = plan();
        let mut test = SpeedTest::new(&plan);
        test.start().expect("start");

        let handle = spawn_probe_run(
            scripted(ScriptedProbe::default().failing_after(5)),
            plan,
        );
        let mut phases = Vec::new();
        let err = drain_run(&mut test, handle, |test| phases.push(test.phase()))
            .expect_err("should fail");

        assert_eq!(err.kind, ProbeErrorKind::Io);
        assert!(phases.contains(&TestPhase::Download));
        assert_eq!(test.phase(), TestPhase::Idle);
        assert_eq!(test.progress(), 0.0);
    }
}
