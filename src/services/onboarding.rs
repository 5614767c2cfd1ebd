//! Scripted walkthrough of the Telegram export and upload procedure.

use crate::i18n::Text;
use std::time::Duration;
use tokio::sync::watch;

/// One step of the walkthrough
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuideStep {
    pub number: usize,
    pub title: Text,
    pub description: Text,
    /// How long the step stays active before the next one starts
    pub duration: Duration,
}

/// Display state of a step relative to the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Active,
    Completed,
}

/// How a run of the guide ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideOutcome {
    Finished,
    Paused,
}

pub const STEPS: [GuideStep; 4] = [
    GuideStep {
        number: 1,
        title: Text::Step1,
        description: Text::Step1Desc,
        duration: Duration::from_millis(800),
    },
    GuideStep {
        number: 2,
        title: Text::Step2,
        description: Text::Step2Desc,
        duration: Duration::from_millis(600),
    },
    GuideStep {
        number: 3,
        title: Text::Step3,
        description: Text::Step3Desc,
        duration: Duration::from_millis(600),
    },
    GuideStep {
        number: 4,
        title: Text::Step4,
        description: Text::Step4Desc,
        duration: Duration::from_millis(1000),
    },
];

/// Four-step onboarding animation with play, pause and replay
#[derive(Debug, Clone)]
pub struct OnboardingGuide {
    steps: Vec<GuideStep>,
    current: usize,
    playing: bool,
    finished: bool,
}

impl OnboardingGuide {
    pub fn new() -> Self {
        Self::with_steps(STEPS.to_vec())
    }

    pub fn with_steps(steps: Vec<GuideStep>) -> Self {
        Self {
            steps,
            current: 1,
            playing: false,
            finished: false,
        }
    }

    pub fn steps(&self) -> &[GuideStep] {
        &self.steps
    }

    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Status of step `number`: completed below the current step, active at it
    pub fn status(&self, number: usize) -> StepStatus {
        if self.finished || number < self.current {
            StepStatus::Completed
        } else if number == self.current {
            StepStatus::Active
        } else {
            StepStatus::Pending
        }
    }

    pub fn set_step(&mut self, number: usize) {
        self.current = number.clamp(1, self.steps.len().max(1));
    }

    pub fn play(&mut self) {
        if self.finished {
            self.reset();
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Start again from the first step
    pub fn replay(&mut self) {
        self.reset();
        self.playing = true;
    }

    /// Move past the current step. Returns false once the guide has finished.
    pub fn advance(&mut self) -> bool {
        if self.finished {
            return false;
        }
        if self.current >= self.steps.len() {
            self.finished = true;
            self.playing = false;
            return false;
        }
        self.current += 1;
        true
    }

    fn reset(&mut self) {
        self.current = 1;
        self.finished = false;
        self.playing = false;
    }

    /// Play the remaining steps, waiting out each step's duration
    ///
    /// `on_step` is called whenever the displayed state changes. The run stops early with
    /// [`GuideOutcome::Paused`] when `true` is sent on `pause_rx`.
    pub async fn run<F>(&mut self, mut pause_rx: watch::Receiver<bool>, mut on_step: F) -> GuideOutcome
    where
        F: FnMut(&OnboardingGuide),
    {
        self.play();
        on_step(self);

        loop {
            if *pause_rx.borrow() {
                self.pause();
                return GuideOutcome::Paused;
            }

            let Some(duration) = self
                .steps
                .get(self.current.saturating_sub(1))
                .map(|step| step.duration)
            else {
                self.finished = true;
                self.playing = false;
                return GuideOutcome::Finished;
            };
            tokio::select! {
                _ = tokio::time::sleep(duration) => {}
                changed = pause_rx.changed() => {
                    if changed.is_err() || *pause_rx.borrow() {
                        tracing::debug!("Onboarding guide paused at step {}", self.current);
                        self.pause();
                        return GuideOutcome::Paused;
                    }
                }
            }

            let more = self.advance();
            on_step(self);
            if !more {
                tracing::debug!("Onboarding guide finished");
                return GuideOutcome::Finished;
            }
        }
    }
}

impl Default for OnboardingGuide {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant_steps() -> Vec<GuideStep> {
        STEPS
            .iter()
            .map(|step| GuideStep {
                duration: Duration::ZERO,
                ..*step
            })
            .collect()
    }

    #[test]
    fn test_step_statuses() {
        let mut guide = OnboardingGuide::new();
        guide.set_step(3);

        assert_eq!(guide.status(1), StepStatus::Completed);
        assert_eq!(guide.status(2), StepStatus::Completed);
        assert_eq!(guide.status(3), StepStatus::Active);
        assert_eq!(guide.status(4), StepStatus::Pending);
    }

    #[test]
    fn test_all_steps_completed_after_last() {
        let mut guide = OnboardingGuide::new();
        guide.play();
        while guide.advance() {}

        assert!(guide.is_finished());
        assert!(!guide.is_playing());
        assert!((1..=4).all(|n| guide.status(n) == StepStatus::Completed));
    }

    #[test]
    fn test_replay_resets() {
        let mut guide = OnboardingGuide::new();
        while guide.advance() {}

        guide.replay();
        assert!(guide.is_playing());
        assert_eq!(guide.current_step(), 1);
        assert_eq!(guide.status(1), StepStatus::Active);
    }

    #[tokio::test]
    async fn test_run_to_completion() {
        let mut guide = OnboardingGuide::with_steps(instant_steps());
        let (_pause_tx, pause_rx) = watch::channel(false);
        let mut seen = Vec::new();

        let outcome = guide.run(pause_rx, |g| seen.push(g.current_step())).await;

        assert_eq!(outcome, GuideOutcome::Finished);
        assert_eq!(seen, vec![1, 2, 3, 4, 4]);
        assert!(guide.is_finished());
    }

    #[tokio::test]
    async fn test_run_paused_before_start() {
        let mut guide = OnboardingGuide::with_steps(instant_steps());
        let (pause_tx, pause_rx) = watch::channel(false);
        pause_tx.send(true).unwrap();

        let outcome = guide.run(pause_rx, |_| {}).await;

        assert_eq!(outcome, GuideOutcome::Paused);
        assert_eq!(guide.current_step(), 1);
        assert!(!guide.is_playing());
    }

    #[tokio::test]
    async fn test_run_without_steps_finishes() {
        let mut guide = OnboardingGuide::with_steps(Vec::new());
        let (_pause_tx, pause_rx) = watch::channel(false);

        let outcome = guide.run(pause_rx, |_| {}).await;

        assert_eq!(outcome, GuideOutcome::Finished);
        assert!(guide.is_finished());
        assert!(!guide.is_playing());
    }
}
