/// Debounced pattern tester state.
///
/// Keeps the rendered match list consistent with the *current*
/// pattern/subject pair despite slow, asynchronous evaluation calls. Every
/// edit re-arms a single deadline; only when the quiet period elapses with no
/// further edits does `take_due` release an evaluation request. Re-arming is
/// the cancellation: an edit inside the window means the previously scheduled
/// evaluation is simply never issued.
///
/// Each issued request carries a monotonically increasing generation number
/// and `apply` discards results from any generation but the latest, so a slow
/// in-flight response can never overwrite the outcome of a newer request.
///
/// Instants are passed in as parameters, which keeps the timing contract
/// testable without sleeping.
use std::time::{Duration, Instant};

/// Quiet period after the last edit before an evaluation is issued.
pub const QUIET_PERIOD: Duration = Duration::from_millis(300);

/// One match of the pattern against the subject. Offsets are byte positions
/// into the subject string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
    /// Capture groups, in order. Non-participating groups are empty.
    pub groups: Vec<String>,
}

pub struct RegexLab {
    pattern: String,
    subject: String,
    matches: Vec<MatchSpan>,
    error: Option<String>,
    /// Armed while an edit is waiting out the quiet period.
    deadline: Option<Instant>,
    /// Generation of the most recently issued evaluation.
    issued: u64,
    /// True from issue until the matching result is applied.
    in_flight: bool,
}

impl Default for RegexLab {
    fn default() -> Self {
        Self::new()
    }
}

impl RegexLab {
    /// Starts with a sample pattern/subject pair and nothing scheduled; the
    /// panel calls `arm` when it opens so the sample evaluates on first view.
    pub fn new() -> Self {
        Self {
            pattern: r"\b\w+\b".to_string(),
            subject: "The quick brown fox jumps over 13 lazy dogs.".to_string(),
            matches: Vec::new(),
            error: None,
            deadline: None,
            issued: 0,
            in_flight: false,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn matches(&self) -> &[MatchSpan] {
        &self.matches
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while an evaluation is scheduled or awaiting its result.
    pub fn busy(&self) -> bool {
        self.deadline.is_some() || self.in_flight
    }

    /// Schedule an evaluation of the current pair (used when the panel
    /// opens). A no-op for an empty pattern.
    pub fn arm(&mut self, now: Instant) {
        if !self.pattern.is_empty() {
            self.deadline = Some(now + QUIET_PERIOD);
        }
    }

    pub fn set_pattern(&mut self, pattern: &str, now: Instant) {
        if pattern != self.pattern {
            self.pattern = pattern.to_string();
            self.touch(now);
        }
    }

    pub fn set_subject(&mut self, subject: &str, now: Instant) {
        if subject != self.subject {
            self.subject = subject.to_string();
            self.touch(now);
        }
    }

    /// An edit happened: re-arm the deadline, cancelling whatever was
    /// scheduled. An empty pattern short-circuits locally — matches are
    /// cleared and no evaluation will be issued for it.
    fn touch(&mut self, now: Instant) {
        if self.pattern.is_empty() {
            self.matches.clear();
            self.error = None;
            self.deadline = None;
        } else {
            self.deadline = Some(now + QUIET_PERIOD);
        }
    }

    /// Release the scheduled evaluation once the quiet period has elapsed.
    /// Returns the request to issue: (generation, pattern, subject). At most
    /// one request is released per armed deadline.
    pub fn take_due(&mut self, now: Instant) -> Option<(u64, String, String)> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        self.issued += 1;
        self.in_flight = true;
        Some((self.issued, self.pattern.clone(), self.subject.clone()))
    }

    /// Apply an evaluation result. Results from any generation other than the
    /// most recently issued one are stale and dropped.
    pub fn apply(&mut self, generation: u64, result: Result<Vec<MatchSpan>, String>) {
        if generation != self.issued {
            return;
        }
        self.in_flight = false;
        match result {
            Ok(matches) => {
                self.matches = matches;
                self.error = None;
            }
            Err(message) => {
                self.matches.clear();
                self.error = Some(message);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize, text: &str) -> MatchSpan {
        MatchSpan {
            start,
            end,
            text: text.to_string(),
            groups: Vec::new(),
        }
    }

    #[test]
    fn nothing_is_scheduled_until_armed_or_edited() {
        let mut lab = RegexLab::new();
        assert!(!lab.busy());
        assert_eq!(lab.take_due(Instant::now() + Duration::from_secs(60)), None);
    }

    #[test]
    fn rapid_edits_coalesce_into_one_evaluation() {
        let t0 = Instant::now();
        let mut lab = RegexLab::new();

        lab.set_pattern("a", t0);
        lab.set_pattern("ab", t0 + Duration::from_millis(100));
        lab.set_pattern("abc", t0 + Duration::from_millis(200));

        // 200ms after the last edit: still inside the quiet window.
        assert_eq!(lab.take_due(t0 + Duration::from_millis(400)), None);

        // 300ms after the last edit: exactly one request, with the final text.
        let (generation, pattern, _) = lab
            .take_due(t0 + Duration::from_millis(500))
            .expect("evaluation due");
        assert_eq!(generation, 1);
        assert_eq!(pattern, "abc");

        // Nothing further until another edit.
        assert_eq!(lab.take_due(t0 + Duration::from_millis(900)), None);
    }

    #[test]
    fn arming_evaluates_the_sample_pair() {
        let t0 = Instant::now();
        let mut lab = RegexLab::new();
        lab.arm(t0);
        let (_, pattern, subject) = lab.take_due(t0 + QUIET_PERIOD).unwrap();
        assert_eq!(pattern, r"\b\w+\b");
        assert!(!subject.is_empty());
    }

    #[test]
    fn empty_pattern_clears_and_issues_nothing() {
        let t0 = Instant::now();
        let mut lab = RegexLab::new();
        lab.arm(t0);
        let (generation, ..) = lab.take_due(t0 + QUIET_PERIOD).unwrap();
        lab.apply(generation, Ok(vec![span(0, 3, "The")]));
        assert!(!lab.matches().is_empty());

        lab.set_pattern("", t0 + Duration::from_millis(400));
        assert!(lab.matches().is_empty());
        assert!(lab.error().is_none());
        assert_eq!(lab.take_due(t0 + Duration::from_secs(10)), None);
    }

    #[test]
    fn clearing_pattern_cancels_a_pending_evaluation() {
        let t0 = Instant::now();
        let mut lab = RegexLab::new();

        lab.set_pattern("ab", t0);
        lab.set_pattern("", t0 + Duration::from_millis(100));
        // The "ab" window would have elapsed by now — but it was cancelled.
        assert_eq!(lab.take_due(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn stale_generation_is_discarded() {
        let t0 = Instant::now();
        let mut lab = RegexLab::new();
        lab.set_pattern("first", t0);
        let (gen1, ..) = lab.take_due(t0 + QUIET_PERIOD).unwrap();

        lab.set_pattern("second", t0 + Duration::from_millis(400));
        let (gen2, ..) = lab
            .take_due(t0 + Duration::from_millis(400) + QUIET_PERIOD)
            .unwrap();

        // gen2's result lands first, then gen1's slow response trails in.
        lab.apply(gen2, Ok(vec![span(0, 6, "second")]));
        lab.apply(gen1, Ok(vec![span(0, 5, "first")]));

        assert_eq!(lab.matches(), &[span(0, 6, "second")]);
    }

    #[test]
    fn failure_clears_matches_and_sets_error() {
        let t0 = Instant::now();
        let mut lab = RegexLab::new();
        lab.arm(t0);
        let (generation, ..) = lab.take_due(t0 + QUIET_PERIOD).unwrap();
        lab.apply(generation, Ok(vec![span(0, 3, "The")]));

        lab.set_pattern("(unclosed", t0 + Duration::from_secs(1));
        let (generation, ..) = lab
            .take_due(t0 + Duration::from_secs(1) + QUIET_PERIOD)
            .unwrap();
        lab.apply(generation, Err("unclosed group".to_string()));

        assert!(lab.matches().is_empty());
        assert_eq!(lab.error(), Some("unclosed group"));

        // The next success clears the error again.
        lab.set_pattern("ok", t0 + Duration::from_secs(2));
        let (generation, ..) = lab
            .take_due(t0 + Duration::from_secs(2) + QUIET_PERIOD)
            .unwrap();
        lab.apply(generation, Ok(Vec::new()));
        assert!(lab.error().is_none());
    }

    #[test]
    fn subject_edits_also_debounce() {
        let t0 = Instant::now();
        let mut lab = RegexLab::new();

        lab.set_subject("hay", t0 + Duration::from_secs(1));
        assert_eq!(lab.take_due(t0 + Duration::from_secs(1)), None);
        let (_, _, subject) = lab
            .take_due(t0 + Duration::from_secs(1) + QUIET_PERIOD)
            .unwrap();
        assert_eq!(subject, "hay");
    }
}
