//! Typewriter Text Reveal
//!
//! Plays a script back character by character. Spans written as
//! `{keys|target}` are typed out as phonetic keys first and then committed to
//! the target symbols, like an input-method editor.

use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

use crate::resources::RevealSettings;
use crate::utils::cancel::CancelToken;

/// One piece of a reveal script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealSegment {
    /// Text typed as-is.
    Literal(String),
    /// Keys typed out, then replaced by `target`.
    Marked { keys: String, target: String },
}

/// Splits a script into literal runs and `{keys|target}` spans.
///
/// A `{` without a matching `}` or a span with no `|` stays literal text.
/// Adjacent literal runs are merged.
pub fn segment(source: &str) -> Vec<RevealSegment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = source;

    while let Some(open) = rest.find('{') {
        literal.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let span = after_open
            .find('}')
            .filter(|&close| !after_open[..close].contains('{'))
            .and_then(|close| {
                after_open[..close]
                    .split_once('|')
                    .map(|(keys, target)| (keys, target, close))
            });

        match span {
            Some((keys, target, close)) => {
                if !literal.is_empty() {
                    segments.push(RevealSegment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(RevealSegment::Marked {
                    keys: keys.to_string(),
                    target: target.to_string(),
                });
                rest = &after_open[close + 1..];
            }
            None => {
                literal.push('{');
                rest = after_open;
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(RevealSegment::Literal(literal));
    }
    segments
}

/// A single unit of playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealStep {
    /// Append one character.
    Type(char),
    /// Remove the last `erase` characters and append `target`.
    Commit { erase: usize, target: String },
    /// Suspend for a while.
    Pause(Duration),
}

/// Compiles segments into a step list. Literal pacing is drawn from `rng`.
pub fn plan(
    segments: &[RevealSegment],
    timing: &RevealSettings,
    rng: &mut impl Rng,
) -> Vec<RevealStep> {
    let [lo, hi] = timing.literal_delay_ms;
    let mut steps = Vec::new();

    for segment in segments {
        match segment {
            RevealSegment::Literal(text) => {
                for c in text.chars() {
                    steps.push(RevealStep::Type(c));
                    let ms = if hi > lo { rng.gen_range(lo..=hi) } else { lo };
                    steps.push(RevealStep::Pause(Duration::from_millis(ms)));
                }
            }
            RevealSegment::Marked { keys, target } => {
                for c in keys.chars() {
                    steps.push(RevealStep::Type(c));
                    steps.push(RevealStep::Pause(Duration::from_millis(timing.key_delay_ms)));
                }
                steps.push(RevealStep::Pause(Duration::from_millis(timing.settle_ms)));
                steps.push(RevealStep::Commit {
                    erase: keys.chars().count(),
                    target: target.clone(),
                });
                steps.push(RevealStep::Pause(Duration::from_millis(timing.commit_ms)));
            }
        }
    }
    steps
}

/// Where a run stands after an `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStatus {
    /// Suspended inside a pause.
    Running,
    /// Every step has been played.
    Finished,
    /// The token was cancelled; nothing more will be written.
    Cancelled,
}

/// One playback of a script.
///
/// The run owns no output. The caller lends the accumulated string on every
/// `advance`, so a run that has been superseded can be handed the same buffer
/// and still never touch it: the token is checked before each mutation and
/// before each pause is entered.
#[derive(Debug, Clone)]
pub struct RevealRun {
    steps: Vec<RevealStep>,
    cursor: usize,
    /// Time carried into the current pause.
    banked: Duration,
    token: CancelToken,
}

impl RevealRun {
    pub fn new(steps: Vec<RevealStep>, token: CancelToken) -> Self {
        Self {
            steps,
            cursor: 0,
            banked: Duration::ZERO,
            token,
        }
    }

    /// Plays as many steps as `delta` allows.
    ///
    /// `on_change` sees the output after every mutation.
    pub fn advance(
        &mut self,
        delta: Duration,
        output: &mut String,
        mut on_change: impl FnMut(&str),
    ) -> RevealStatus {
        self.banked += delta;

        while let Some(step) = self.steps.get(self.cursor) {
            if self.token.is_cancelled() {
                return RevealStatus::Cancelled;
            }
            match step {
                RevealStep::Pause(wait) => {
                    if self.banked < *wait {
                        return RevealStatus::Running;
                    }
                    self.banked -= *wait;
                }
                RevealStep::Type(c) => {
                    output.push(*c);
                    on_change(output);
                }
                RevealStep::Commit { erase, target } => {
                    for _ in 0..*erase {
                        output.pop();
                    }
                    output.push_str(target);
                    on_change(output);
                }
            }
            self.cursor += 1;
        }

        if self.token.is_cancelled() {
            RevealStatus::Cancelled
        } else {
            RevealStatus::Finished
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }
}

/// Component that reveals a script into a display string.
///
/// Only one run is live at a time. Starting a new source cancels the
/// previous run and clears the output; dropping the component cancels
/// whatever is in flight.
#[derive(Component, Debug)]
pub struct TextRevealer {
    source: String,
    output: String,
    run: Option<RevealRun>,
    timing: RevealSettings,
}

impl TextRevealer {
    pub fn new(timing: RevealSettings) -> Self {
        Self {
            source: String::new(),
            output: String::new(),
            run: None,
            timing,
        }
    }

    /// Restarts playback from an empty output with `source`.
    /// Returns the token of the new run.
    pub fn start(&mut self, source: impl Into<String>, rng: &mut impl Rng) -> CancelToken {
        self.cancel();
        self.source = source.into();
        self.output.clear();

        let token = CancelToken::new();
        let steps = plan(&segment(&self.source), &self.timing, rng);
        debug!("Reveal started: {} steps for {:?}", steps.len(), self.source);
        self.run = Some(RevealRun::new(steps, token.clone()));
        token
    }

    /// Cancels the in-flight run, leaving the output as it is.
    pub fn cancel(&mut self) {
        if let Some(run) = self.run.take() {
            if !run.is_finished() {
                debug!("Reveal cancelled at step {}", run.cursor);
            }
            run.token.cancel();
        }
    }

    /// Advances the live run. `on_change` sees every intermediate output.
    pub fn tick(&mut self, delta: Duration, on_change: impl FnMut(&str)) -> RevealStatus {
        let Some(run) = self.run.as_mut() else {
            return RevealStatus::Finished;
        };
        let status = run.advance(delta, &mut self.output, on_change);
        if status != RevealStatus::Running {
            self.run = None;
        }
        status
    }

    /// Accumulated display text, without a caret.
    pub fn visible_text(&self) -> &str {
        &self.output
    }

    /// Accumulated text with a caret that blinks at `period`.
    pub fn text_with_caret(&self, elapsed: Duration, period: Duration) -> String {
        let mut text = self.output.clone();
        if caret_visible(elapsed, period) {
            text.push('_');
        }
        text
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Character count of the text once the whole script has played.
    pub fn final_len(&self) -> usize {
        final_text(&self.source).chars().count()
    }

    /// Returns true if no run is in flight.
    pub fn is_complete(&self) -> bool {
        self.run.is_none()
    }

    /// Output of the live run mutated directly, used by tests of stale runs.
    #[cfg(test)]
    fn output_mut(&mut self) -> &mut String {
        &mut self.output
    }
}

impl Drop for TextRevealer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Text a script settles on: literals as written, marked spans as their
/// targets.
pub fn final_text(source: &str) -> String {
    segment(source)
        .into_iter()
        .map(|segment| match segment {
            RevealSegment::Literal(text) => text,
            RevealSegment::Marked { target, .. } => target,
        })
        .collect()
}

/// Caret is on for the first half of each period.
pub fn caret_visible(elapsed: Duration, period: Duration) -> bool {
    if period.is_zero() {
        return true;
    }
    (elapsed.as_millis() % period.as_millis()) < period.as_millis() / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    /// Runs to completion in 1 ms slices, recording every observed output.
    fn play_all(run: &mut RevealRun, output: &mut String) -> Vec<String> {
        let mut seen = Vec::new();
        for _ in 0..10_000 {
            let status =
                run.advance(Duration::from_millis(1), output, |s| seen.push(s.to_string()));
            if status != RevealStatus::Running {
                break;
            }
        }
        seen
    }

    #[test]
    fn test_segment_marked_span() {
        assert_eq!(
            segment("AB{py|中}CD"),
            vec![
                RevealSegment::Literal("AB".into()),
                RevealSegment::Marked {
                    keys: "py".into(),
                    target: "中".into()
                },
                RevealSegment::Literal("CD".into()),
            ]
        );
    }

    #[test]
    fn test_final_text_drops_markup() {
        assert_eq!(final_text("AB{py|中}CD"), "AB中CD");
        assert_eq!(final_text("a{b}c"), "a{b}c");

        let mut revealer = TextRevealer::new(RevealSettings::default());
        revealer.start("AB{py|中}CD", &mut StdRng::seed_from_u64(1));
        assert_eq!(revealer.final_len(), 5);
    }

    #[test]
    fn test_segment_edge_cases() {
        assert!(segment("").is_empty());
        assert_eq!(segment("plain"), vec![RevealSegment::Literal("plain".into())]);
        assert_eq!(segment("a{b"), vec![RevealSegment::Literal("a{b".into())]);
        assert_eq!(segment("a{b}c"), vec![RevealSegment::Literal("a{b}c".into())]);
        assert_eq!(
            segment("{ni|你}{hao|好}"),
            vec![
                RevealSegment::Marked {
                    keys: "ni".into(),
                    target: "你".into(),
                },
                RevealSegment::Marked {
                    keys: "hao".into(),
                    target: "好".into(),
                },
            ]
        );
        assert_eq!(
            segment("x{{k|t}"),
            vec![
                RevealSegment::Literal("x{".into()),
                RevealSegment::Marked {
                    keys: "k".into(),
                    target: "t".into(),
                },
            ]
        );
    }

    #[test]
    fn test_plan_timing() {
        let timing = RevealSettings::default();
        let steps = plan(&segment("A{py|中}"), &timing, &mut rng());

        assert_eq!(steps[0], RevealStep::Type('A'));
        match steps[1] {
            RevealStep::Pause(d) => {
                assert!(d >= Duration::from_millis(20) && d <= Duration::from_millis(50))
            }
            ref other => panic!("expected pause, got {:?}", other),
        }
        assert_eq!(
            &steps[2..],
            &[
                RevealStep::Type('p'),
                RevealStep::Pause(Duration::from_millis(30)),
                RevealStep::Type('y'),
                RevealStep::Pause(Duration::from_millis(30)),
                RevealStep::Pause(Duration::from_millis(100)),
                RevealStep::Commit { erase: 2, target: "中".into() },
                RevealStep::Pause(Duration::from_millis(120)),
            ]
        );
    }

    #[test]
    fn test_ime_trace() {
        let steps = plan(&segment("AB{py|中}CD"), &RevealSettings::default(), &mut rng());
        let mut run = RevealRun::new(steps, CancelToken::new());
        let mut output = String::new();

        let seen = play_all(&mut run, &mut output);
        assert_eq!(seen, vec!["A", "AB", "ABp", "ABpy", "AB中", "AB中C", "AB中CD"]);
        assert_eq!(output, "AB中CD");
        assert!(run.is_finished());

        // Keys and target never coexist.
        assert!(seen.iter().all(|s| !(s.contains("py") && s.contains('中'))));
    }

    #[test]
    fn test_first_character_is_immediate() {
        let steps = plan(&segment("Hi"), &RevealSettings::default(), &mut rng());
        let mut run = RevealRun::new(steps, CancelToken::new());
        let mut output = String::new();
        assert_eq!(run.advance(Duration::ZERO, &mut output, |_| {}), RevealStatus::Running);
        assert_eq!(output, "H");
    }

    #[test]
    fn test_cancel_mid_flight_stops_output() {
        let steps = plan(&segment("ABCDEFG"), &RevealSettings::default(), &mut rng());
        let token = CancelToken::new();
        let mut run = RevealRun::new(steps, token.clone());
        let mut output = String::new();

        let mut mutations = 0;
        while mutations < 3 {
            run.advance(Duration::from_millis(1), &mut output, |_| mutations += 1);
        }
        assert_eq!(output, "ABC");

        token.cancel();
        let mut late = 0;
        let status = run.advance(Duration::from_secs(10), &mut output, |_| late += 1);
        assert_eq!(status, RevealStatus::Cancelled);
        assert_eq!(late, 0);
        assert_eq!(output, "ABC");
    }

    #[test]
    fn test_restart_supersedes_stale_run() {
        let timing = RevealSettings::default();
        let mut revealer = TextRevealer::new(timing.clone());
        let mut rng = rng();

        revealer.start("first run", &mut rng);
        revealer.tick(Duration::from_millis(60), |_| {});
        assert!(!revealer.visible_text().is_empty());

        // Keep a handle on a stale run sharing the first token.
        let stale_token = revealer.run.as_ref().unwrap().token().clone();
        let mut stale = revealer.run.clone().unwrap();

        revealer.start("second", &mut rng);
        assert!(stale_token.is_cancelled());
        assert_eq!(revealer.visible_text(), "");

        for _ in 0..2000 {
            // Interleave the stale run against the same output buffer.
            stale.advance(Duration::from_millis(1), revealer.output_mut(), |_| {});
            if revealer.tick(Duration::from_millis(1), |_| {}) == RevealStatus::Finished {
                break;
            }
        }
        stale.advance(Duration::from_secs(5), revealer.output_mut(), |_| {});

        assert_eq!(revealer.visible_text(), "second");
        assert!(revealer.is_complete());
    }

    #[test]
    fn test_drop_cancels_in_flight_run() {
        let mut revealer = TextRevealer::new(RevealSettings::default());
        let token = revealer.start("never finished", &mut rng());
        assert!(token.is_live());
        drop(revealer);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_tick_without_run() {
        let mut revealer = TextRevealer::new(RevealSettings::default());
        assert_eq!(revealer.tick(Duration::from_secs(1), |_| {}), RevealStatus::Finished);
        assert!(revealer.is_complete());
    }

    #[test]
    fn test_caret_blink() {
        let period = Duration::from_millis(530);
        assert!(caret_visible(Duration::ZERO, period));
        assert!(!caret_visible(Duration::from_millis(300), period));
        assert!(caret_visible(Duration::from_millis(530), period));
        assert!(caret_visible(Duration::from_secs(1), Duration::ZERO));

        let mut revealer = TextRevealer::new(RevealSettings::default());
        revealer.start("ok", &mut rng());
        revealer.tick(Duration::ZERO, |_| {});
        assert_eq!(revealer.text_with_caret(Duration::ZERO, period), "o_");
        assert_eq!(revealer.text_with_caret(Duration::from_millis(300), period), "o");
    }
}
