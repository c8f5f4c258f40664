use super::{SpeedTest, SpeedTestError, phase_progress};
use crate::config::{MeasurementPlan, PlanStep};
use crate::features::measurement::TestPhase;
use crate::probe::{MeasurementKind, ProbeError, ProbeErrorKind, ProbeEvent, ProbeSummary};

fn small_plan() -> MeasurementPlan {
    MeasurementPlan {
        steps: vec![
            PlanStep::latency(2),
            PlanStep::download(1_000_000, 4),
            PlanStep::upload(1_000_000, 2),
        ],
    }
}

fn download_summary(mbps: f64) -> ProbeSummary {
    ProbeSummary {
        download: Some(mbps * 1_000_000.0),
        latency: Some(15.0),
        jitter: Some(2.0),
        upload: None,
    }
}

fn results(kind: MeasurementKind, summary: ProbeSummary) -> ProbeEvent {
    ProbeEvent::ResultsChange { kind, summary }
}

fn started(plan: &MeasurementPlan) -> SpeedTest {
    let mut test = SpeedTest::new(plan);
    test.start().expect("start from idle");
    test
}

#[test]
fn start_moves_idle_to_latency() {
    let mut test = SpeedTest::new(&small_plan());
    assert_eq!(test.phase(), TestPhase::Idle);
    test.start().expect("start");
    assert_eq!(test.phase(), TestPhase::Latency);
    assert_eq!(test.progress(), 0.0);
}

#[test]
fn start_rejected_while_running_or_complete() {
    let mut test = started(&small_plan());
    assert_eq!(
        test.start(),
        Err(SpeedTestError::NotIdle {
            phase: TestPhase::Latency
        })
    );

    test.apply(ProbeEvent::Finish(download_summary(100.0)));
    assert_eq!(
        test.start(),
        Err(SpeedTestError::NotIdle {
            phase: TestPhase::Complete
        })
    );
}

#[test]
fn latency_event_jumps_progress_to_ten_percent() {
    let mut test = started(&small_plan());
    test.apply(results(
        MeasurementKind::Latency,
        ProbeSummary {
            latency: Some(12.0),
            ..ProbeSummary::default()
        },
    ));
    assert_eq!(test.phase(), TestPhase::Latency);
    assert_eq!(test.progress(), 10.0);
    assert_eq!(test.current_speed(), 0.0);
}

#[test]
fn download_and_upload_samples_fill_progress_linearly() {
    let mut test = started(&small_plan());
    test.apply(results(MeasurementKind::Latency, ProbeSummary::default()));

    test.apply(results(MeasurementKind::Download, download_summary(100.0)));
    assert_eq!(test.phase(), TestPhase::Download);
    assert!((test.progress() - 22.5).abs() < 1e-9);

    for _ in 0..3 {
        test.apply(results(MeasurementKind::Download, download_summary(100.0)));
    }
    assert!((test.progress() - 60.0).abs() < 1e-9);

    let upload = ProbeSummary {
        upload: Some(20_000_000.0),
        ..download_summary(100.0)
    };
    test.apply(results(MeasurementKind::Upload, upload));
    assert_eq!(test.phase(), TestPhase::Upload);
    assert!((test.progress() - 77.5).abs() < 1e-9);
    assert_eq!(test.current_speed(), 20.0);

    test.apply(results(MeasurementKind::Upload, upload));
    assert!((test.progress() - 95.0).abs() < 1e-9);

    test.apply(ProbeEvent::Finish(upload));
    assert_eq!(test.progress(), 100.0);
}

#[test]
fn progress_stays_bounded_and_monotonic_with_extra_samples() {
    let mut test = started(&small_plan());
    let mut previous = test.progress();
    let mut events = vec![results(MeasurementKind::Latency, ProbeSummary::default())];
    for _ in 0..10 {
        events.push(results(MeasurementKind::Download, download_summary(50.0)));
    }
    for _ in 0..10 {
        events.push(results(
            MeasurementKind::Upload,
            ProbeSummary {
                upload: Some(5_000_000.0),
                ..ProbeSummary::default()
            },
        ));
    }
    events.push(ProbeEvent::Finish(download_summary(50.0)));
    events.push(ProbeEvent::RunningChange(false));

    for event in events {
        test.apply(event);
        let progress = test.progress();
        assert!((0.0..=100.0).contains(&progress));
        assert!(progress >= previous, "{progress} < {previous}");
        previous = progress;
    }
}

#[test]
fn empty_phase_totals_do_not_divide_by_zero() {
    assert_eq!(phase_progress(10.0, 60.0, 1, 0), 60.0);
    assert_eq!(phase_progress(10.0, 60.0, 5, 4), 60.0);
}

#[test]
fn peak_download_is_monotonic_and_current_speed_follows_latest() {
    let mut test = started(&small_plan());
    let mut previous_peak = 0.0;
    for mbps in [80.0, 140.0, 95.0, 130.0] {
        test.apply(results(MeasurementKind::Download, download_summary(mbps)));
        assert!(test.stats().peak_download_mbps >= previous_peak);
        previous_peak = test.stats().peak_download_mbps;
        assert_eq!(test.current_speed(), mbps);
    }
    assert_eq!(test.stats().peak_download_mbps, 140.0);
}

#[test]
fn variance_is_population_stddev_of_download_samples() {
    let mut test = started(&small_plan());
    for mbps in [100.0, 120.0, 80.0, 100.0] {
        test.apply(results(MeasurementKind::Download, download_summary(mbps)));
    }
    assert!((test.stats().variance - 14.14).abs() < 0.01);
    assert_eq!(test.stats().sample_history.len(), 4);
}

#[test]
fn download_event_without_throughput_still_counts_towards_progress() {
    let mut test = started(&small_plan());
    test.apply(results(MeasurementKind::Download, ProbeSummary::default()));
    assert_eq!(test.current_speed(), 0.0);
    assert!(test.stats().sample_history.is_empty());
    assert_eq!(test.stats().sample_count, 1);
    assert!((test.progress() - 22.5).abs() < 1e-9);
}

#[test]
fn finish_uses_probe_summary_not_local_peak() {
    let mut test = started(&small_plan());
    test.apply(results(MeasurementKind::Download, download_summary(300.0)));
    test.apply(results(MeasurementKind::Download, download_summary(150.0)));

    let summary = ProbeSummary {
        download: Some(123_456_789.0),
        upload: Some(20_040_000.0),
        latency: Some(14.4),
        jitter: Some(3.6),
    };
    test.apply(ProbeEvent::Finish(summary));
    test.apply(ProbeEvent::RunningChange(false));

    let result = test.results().expect("final result");
    assert_eq!(test.phase(), TestPhase::Complete);
    assert_eq!(result.download_mbps, 123.5);
    assert_eq!(result.upload_mbps, 20.0);
    assert_eq!(result.latency_ms, 14.0);
    assert_eq!(result.jitter_ms, 4.0);
    assert_eq!(result.peak_download_mbps, 300.0);
    assert_eq!(result.sample_count, 2);
}

#[test]
fn running_false_completes_an_active_run() {
    let mut test = started(&small_plan());
    test.apply(ProbeEvent::RunningChange(true));
    assert_eq!(test.phase(), TestPhase::Latency);
    test.apply(ProbeEvent::RunningChange(false));
    assert_eq!(test.phase(), TestPhase::Complete);
    assert_eq!(test.progress(), 100.0);
    assert!(test.results().is_none());
}

#[test]
fn failure_resets_to_idle_without_partial_result() {
    let mut test = started(&small_plan());
    test.apply(results(MeasurementKind::Download, download_summary(90.0)));
    test.apply(ProbeEvent::Failed(ProbeError::new(
        ProbeErrorKind::Init,
        "module failed to load",
    )));

    assert_eq!(test.phase(), TestPhase::Idle);
    assert_eq!(test.progress(), 0.0);
    assert_eq!(test.current_speed(), 0.0);
    assert!(test.results().is_none());
    assert_eq!(test.stats().sample_count, 0);
}

#[test]
fn reset_from_complete_clears_state_and_next_run_starts_clean() {
    let mut test = started(&small_plan());
    test.apply(results(MeasurementKind::Download, download_summary(250.0)));
    test.apply(ProbeEvent::Finish(download_summary(250.0)));
    assert!(test.results().is_some());

    test.reset();
    assert_eq!(test.phase(), TestPhase::Idle);
    assert!(test.results().is_none());
    assert_eq!(test.current_speed(), 0.0);
    assert_eq!(test.progress(), 0.0);

    test.reset();
    assert_eq!(test.phase(), TestPhase::Idle);

    test.start().expect("restart");
    assert_eq!(test.stats().peak_download_mbps, 0.0);
    assert!(test.stats().sample_history.is_empty());
    test.apply(results(MeasurementKind::Download, download_summary(40.0)));
    assert_eq!(test.stats().peak_download_mbps, 40.0);
    assert!((test.progress() - 22.5).abs() < 1e-9);
}

#[test]
fn events_after_reset_are_ignored() {
    let mut test = SpeedTest::new(&small_plan());
    test.apply(results(MeasurementKind::Download, download_summary(100.0)));
    test.apply(ProbeEvent::Finish(download_summary(100.0)));
    test.apply(ProbeEvent::RunningChange(false));

    assert_eq!(test.phase(), TestPhase::Idle);
    assert!(test.results().is_none());
    assert_eq!(test.progress(), 0.0);
}
