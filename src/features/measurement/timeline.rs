use super::TestPhase;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StepStatus {
    Done,
    Active,
    Pending,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimelineStep {
    pub phase: TestPhase,
    pub status: StepStatus,
}

const STEPS: [TestPhase; 4] = [
    TestPhase::Latency,
    TestPhase::Download,
    TestPhase::Upload,
    TestPhase::Complete,
];

/// Ping, Download, Upload, Done with their status relative to `current`.
/// Everything is pending while idle; `Complete` marks every step done.
pub fn phase_timeline(current: TestPhase) -> [TimelineStep; 4] {
    let current_index = STEPS.iter().position(|phase| *phase == current);
    std::array::from_fn(|index| {
        let phase = STEPS[index];
        let status = match current_index {
            None => StepStatus::Pending,
            Some(_) if current == TestPhase::Complete => StepStatus::Done,
            Some(active) if index < active => StepStatus::Done,
            Some(active) if index == active => StepStatus::Active,
            Some(_) => StepStatus::Pending,
        };
        TimelineStep { phase, status }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(phase: TestPhase) -> Vec<StepStatus> {
        phase_timeline(phase).iter().map(|step| step.status).collect()
    }

    #[test]
    fn idle_timeline_is_all_pending() {
        assert!(statuses(TestPhase::Idle)
            .iter()
            .all(|status| *status == StepStatus::Pending));
    }

    #[test]
    fn active_phase_splits_done_and_pending() {
        assert_eq!(
            statuses(TestPhase::Download),
            vec![
                StepStatus::Done,
                StepStatus::Active,
                StepStatus::Pending,
                StepStatus::Pending
            ]
        );
    }

    #[test]
    fn complete_marks_everything_done() {
        assert!(statuses(TestPhase::Complete)
            .iter()
            .all(|status| *status == StepStatus::Done));
    }
}
