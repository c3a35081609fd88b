//! Session controller
//!
//! This module contains the client-side state machine that mirrors a quiz
//! session held by the server. It owns the current and next question, the
//! per-question timer and the guards that keep a question from being
//! submitted twice.
//!
//! The controller never renders anything; see [`crate::view`] for the pure
//! mapping from controller state to a screen description.

use std::{mem, time::Duration};

use derive_where::derive_where;
use itertools::Itertools;

use crate::{
    AlarmMessage,
    api::QuizApi,
    clock::{Clock, SystemClock},
    config::ClientConfig,
    constants::player::DEFAULT_SUBJECT,
    error::{ApiError, StartError},
    feedback::Feedback,
    form::PlayerForm,
    model::{
        AnswerResponse, AnswerSubmission, Outcome, Question, ScoreboardEntry, SessionId, Stats,
        SubjectInfo, Summary,
    },
    timer::{self, QuestionTimer, TickOutcome},
};

/// Message shown when a failed submission carries no text of its own
const SUBMIT_FAILED: &str = "Failed to submit answer.";
/// Message shown when booting fails without a usable message
const BOOT_FAILED: &str = "Could not load game resources.";

/// The question being played together with its session
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    session_id: SessionId,
    stats: Stats,
    question: Question,
}

impl Round {
    /// Session the question belongs to
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Latest statistics received from the server
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// The question on screen
    pub fn question(&self) -> &Question {
        &self.question
    }
}

/// The five states of the controller
///
/// Fields are only readable from outside; every transition goes through a
/// [`Controller`] operation so the guards cannot be bypassed.
#[derive(Debug, Clone, PartialEq)]
pub enum State {
    /// No session
    Idle,
    /// A question is shown and the player may answer
    AwaitingAnswer(Round),
    /// An answer is in flight and the timer is stopped
    Submitting(Round),
    /// Feedback is shown and the next question waits for the player
    AwaitingNext {
        /// The question that was just answered
        round: Round,
        /// The question to show on advancement
        next: Option<Question>,
    },
    /// The session ended and its summary is shown
    Finished {
        /// Session that ended
        session_id: SessionId,
        /// Final statistics
        stats: Stats,
        /// Terminal report
        summary: Summary,
    },
}

/// Name of a [`State`] without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// See [`State::Idle`]
    Idle,
    /// See [`State::AwaitingAnswer`]
    AwaitingAnswer,
    /// See [`State::Submitting`]
    Submitting,
    /// See [`State::AwaitingNext`]
    AwaitingNext,
    /// See [`State::Finished`]
    Finished,
}

impl State {
    /// Name of this state
    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::AwaitingAnswer(_) => Phase::AwaitingAnswer,
            Self::Submitting(_) => Phase::Submitting,
            Self::AwaitingNext { .. } => Phase::AwaitingNext,
            Self::Finished { .. } => Phase::Finished,
        }
    }

    /// The round in play, if any
    pub fn round(&self) -> Option<&Round> {
        match self {
            Self::AwaitingAnswer(round) | Self::Submitting(round) | Self::AwaitingNext { round, .. } => {
                Some(round)
            }
            Self::Idle | Self::Finished { .. } => None,
        }
    }

    /// Latest statistics, if a session exists
    pub fn stats(&self) -> Option<&Stats> {
        match self {
            Self::Finished { stats, .. } => Some(stats),
            _ => self.round().map(Round::stats),
        }
    }

    /// Identifier of the active or finished session
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            Self::Finished { session_id, .. } => Some(session_id),
            _ => self.round().map(Round::session_id),
        }
    }
}

/// An answer that has been taken out of the controller for sending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    /// Session to post to
    pub session_id: SessionId,
    /// Request body
    pub submission: AnswerSubmission,
}

/// Result of a submission attempt
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The guard rejected the call; nothing was sent
    Ignored,
    /// The answer was judged and a next question may follow
    Answered(Outcome),
    /// The answer was judged and the session ended
    ///
    /// Reported exactly once per session.
    Finished {
        /// Verdict on the last answer
        outcome: Outcome,
        /// Terminal report
        summary: Summary,
    },
    /// The request failed; the same question stays active
    Failed(ApiError),
}

/// Result of feeding a tick to [`Controller::tick`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickResult {
    /// Stale tick, or no question is being answered
    Ignored,
    /// Countdown updated to this many seconds
    Running(u64),
    /// The ceiling was reached; the automatic submission must be sent
    Expired(PendingSubmission),
}

/// Result of delivering an alarm through [`Controller::receive_alarm`]
#[derive(Debug)]
pub enum AlarmOutcome {
    /// Nothing changed
    Ignored,
    /// Countdown updated to this many seconds
    Ticked(u64),
    /// The question timed out and was submitted automatically
    TimedOut(SubmitOutcome),
}

/// Client-side controller for one player
///
/// `A` is the API used to reach the server and `C` the clock the timer reads.
#[derive_where(Debug)]
pub struct Controller<A, C = SystemClock> {
    #[derive_where(skip)]
    api: A,
    #[derive_where(skip)]
    clock: C,
    config: ClientConfig,
    state: State,
    timer: QuestionTimer,
    feedback: Option<Feedback>,
    start_error: Option<String>,
    subjects: Vec<SubjectInfo>,
    scoreboard: Vec<ScoreboardEntry>,
}

impl<A: QuizApi> Controller<A, SystemClock> {
    /// Creates a controller reading the platform clock
    pub fn new(api: A, config: ClientConfig) -> Self {
        Self::with_clock(api, SystemClock, config)
    }
}

impl<A: QuizApi, C: Clock> Controller<A, C> {
    /// Creates a controller reading time from `clock`
    pub fn with_clock(api: A, clock: C, config: ClientConfig) -> Self {
        let timer = QuestionTimer::new(config.question_ceiling, config.tick_interval);
        Self {
            api,
            clock,
            config,
            state: State::Idle,
            timer,
            feedback: None,
            start_error: None,
            subjects: Vec::new(),
            scoreboard: Vec::new(),
        }
    }

    fn take_state(&mut self) -> State {
        mem::replace(&mut self.state, State::Idle)
    }

    /// Loads the subject catalogue and the scoreboard for the start screen
    ///
    /// A failure is also recorded as the start screen error.
    ///
    /// # Errors
    ///
    /// Returns the first [`ApiError`] encountered.
    pub async fn boot(&mut self) -> Result<(), ApiError> {
        let loaded = match self.load_subjects().await {
            Ok(()) => self.load_scoreboard().await,
            Err(error) => Err(error),
        };

        if let Err(error) = &loaded {
            let message = error.to_string();
            self.start_error = Some(if message.is_empty() {
                BOOT_FAILED.to_owned()
            } else {
                message
            });
        }
        loaded
    }

    /// Fetches the subject catalogue
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the server; the old catalogue is kept.
    pub async fn load_subjects(&mut self) -> Result<(), ApiError> {
        self.subjects = self.api.subjects().await?;
        log::debug!("loaded {} subjects", self.subjects.len());
        Ok(())
    }

    /// Fetches the leaderboard shown on the start screen
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the server; the old rows are kept.
    pub async fn load_scoreboard(&mut self) -> Result<(), ApiError> {
        self.scoreboard = self.api.scoreboard(self.config.scoreboard_limit).await?;
        log::debug!("loaded {} scoreboard rows", self.scoreboard.len());
        Ok(())
    }

    /// Subject keys ticked by default on the start screen
    ///
    /// The first subject of the catalogue and the default subject when
    /// offered, in catalogue order.
    pub fn default_selection(&self) -> Vec<String> {
        self.subjects
            .iter()
            .enumerate()
            .filter(|(index, subject)| *index == 0 || subject.key == DEFAULT_SUBJECT)
            .map(|(_, subject)| subject.key.clone())
            .unique()
            .collect_vec()
    }

    /// Starts a new session from the start form
    ///
    /// On success all local state is replaced, the first question is shown
    /// and the timer starts from zero. On failure the message is recorded as
    /// the start error and nothing else changes.
    ///
    /// # Errors
    ///
    /// Returns [`StartError::Form`] for input rejected locally and
    /// [`StartError::Api`] when the server refuses.
    pub async fn start_session<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        form: &PlayerForm,
        schedule_message: S,
    ) -> Result<(), StartError> {
        self.start_error = None;

        let request = match form.to_request(&self.subjects) {
            Ok(request) => request,
            Err(error) => {
                self.start_error = Some(error.to_string());
                return Err(error.into());
            }
        };

        let response = match self.api.start_session(&request).await {
            Ok(response) => response,
            Err(error) => {
                log::warn!("could not start session: {error}");
                self.start_error = Some(error.to_string());
                return Err(error.into());
            }
        };

        self.reset();
        log::info!(
            "session {} started with {} questions",
            response.session_id,
            response.stats.total_questions
        );
        self.timer.start(self.clock.now(), schedule_message);
        self.state = State::AwaitingAnswer(Round {
            session_id: response.session_id,
            stats: response.stats,
            question: response.question,
        });
        Ok(())
    }

    /// Submits an answer for the question on screen
    ///
    /// Only honoured while a question awaits an answer; any other call is a
    /// no-op that sends nothing.
    pub async fn submit_answer(&mut self, answer: &str, forced_by_timeout: bool) -> SubmitOutcome {
        match self.begin_submission(answer, forced_by_timeout) {
            Some(pending) => self.dispatch(pending).await,
            None => SubmitOutcome::Ignored,
        }
    }

    async fn dispatch(&mut self, pending: PendingSubmission) -> SubmitOutcome {
        log::debug!(
            "submitting answer for question {} after {}s",
            pending.submission.question_id,
            pending.submission.elapsed_seconds
        );
        let result = self
            .api
            .submit_answer(&pending.session_id, &pending.submission)
            .await;
        let outcome = self.complete_submission(result);

        if matches!(outcome, SubmitOutcome::Finished { .. }) {
            if let Err(error) = self.load_scoreboard().await {
                log::warn!("could not refresh scoreboard: {error}");
            }
        }
        outcome
    }

    /// Takes the answer out of the controller and moves to `Submitting`
    ///
    /// The timer is stopped before this returns, so no tick can issue a
    /// second submission while the first is in flight. Returns `None` when
    /// no question awaits an answer.
    pub fn begin_submission(
        &mut self,
        answer: &str,
        forced_by_timeout: bool,
    ) -> Option<PendingSubmission> {
        match self.take_state() {
            State::AwaitingAnswer(round) => {
                Some(self.submit_round(round, answer, forced_by_timeout))
            }
            other => {
                log::debug!("ignoring submission while {:?}", other.phase());
                self.state = other;
                None
            }
        }
    }

    fn submit_round(
        &mut self,
        round: Round,
        answer: &str,
        forced_by_timeout: bool,
    ) -> PendingSubmission {
        self.timer.stop();
        let elapsed_seconds = if forced_by_timeout {
            self.timer.ceiling().as_secs()
        } else {
            self.timer.elapsed_seconds(self.clock.now())
        };

        let pending = PendingSubmission {
            session_id: round.session_id.clone(),
            submission: AnswerSubmission {
                question_id: round.question.id.clone(),
                answer: answer.trim().to_owned(),
                elapsed_seconds,
            },
        };
        self.state = State::Submitting(round);
        pending
    }

    /// Applies the server's reply to the submission in flight
    ///
    /// A failure keeps the same question active without restarting the
    /// timer; the player retries deliberately.
    pub fn complete_submission(
        &mut self,
        result: Result<AnswerResponse, ApiError>,
    ) -> SubmitOutcome {
        let mut round = match self.take_state() {
            State::Submitting(round) => round,
            other => {
                log::warn!("discarding answer reply received while {:?}", other.phase());
                self.state = other;
                return SubmitOutcome::Ignored;
            }
        };

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                log::warn!("answer submission failed: {error}");
                let message = error.to_string();
                self.feedback = Some(Feedback::Error(if message.is_empty() {
                    SUBMIT_FAILED.to_owned()
                } else {
                    message
                }));
                self.state = State::AwaitingAnswer(round);
                return SubmitOutcome::Failed(error);
            }
        };

        let AnswerResponse {
            finished,
            outcome,
            stats,
            next_question,
            summary,
        } = response;
        round.stats = stats;
        self.feedback = Some(Feedback::Outcome(outcome.clone()));

        if finished {
            let summary = summary.unwrap_or_else(|| Summary::from_stats(&round.stats));
            log::info!(
                "session {} finished with {}/{}",
                round.session_id,
                summary.score,
                summary.total_questions
            );
            self.state = State::Finished {
                session_id: round.session_id,
                stats: round.stats,
                summary: summary.clone(),
            };
            return SubmitOutcome::Finished { outcome, summary };
        }

        self.state = State::AwaitingNext {
            round,
            next: next_question,
        };
        SubmitOutcome::Answered(outcome)
    }

    /// Shows the stored next question and restarts the timer
    ///
    /// Returns `false` without changing anything when no next question is
    /// waiting.
    pub fn advance_to_next<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        schedule_message: S,
    ) -> bool {
        match self.take_state() {
            State::AwaitingNext {
                mut round,
                next: Some(next),
            } => {
                log::info!("advancing to question {}", next.id);
                round.question = next;
                self.feedback = None;
                self.timer.start(self.clock.now(), schedule_message);
                self.state = State::AwaitingAnswer(round);
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Feeds a timer tick to the controller
    ///
    /// When the ceiling is reached the automatic submission is taken out of
    /// the controller and returned for sending.
    pub fn tick<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        generation: u64,
        schedule_message: S,
    ) -> TickResult {
        let round = match self.take_state() {
            State::AwaitingAnswer(round) => round,
            other => {
                log::debug!("ignoring tick {generation} while {:?}", other.phase());
                self.state = other;
                return TickResult::Ignored;
            }
        };

        match self
            .timer
            .tick(generation, self.clock.now(), schedule_message)
        {
            TickOutcome::Stale => {
                log::warn!("ignoring stale tick {generation}");
                self.state = State::AwaitingAnswer(round);
                TickResult::Ignored
            }
            TickOutcome::Running(seconds) => {
                self.state = State::AwaitingAnswer(round);
                TickResult::Running(seconds)
            }
            TickOutcome::Expired => {
                log::info!("question timed out");
                TickResult::Expired(self.submit_round(round, "", true))
            }
        }
    }

    /// Delivers an alarm scheduled earlier through `schedule_message`
    ///
    /// A tick at the ceiling sends the empty timeout answer right away.
    pub async fn receive_alarm<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        message: AlarmMessage,
        schedule_message: S,
    ) -> AlarmOutcome {
        match message {
            AlarmMessage::Timer(timer::AlarmMessage::Tick { generation }) => {
                match self.tick(generation, schedule_message) {
                    TickResult::Ignored => AlarmOutcome::Ignored,
                    TickResult::Running(seconds) => AlarmOutcome::Ticked(seconds),
                    TickResult::Expired(pending) => {
                        AlarmOutcome::TimedOut(self.dispatch(pending).await)
                    }
                }
            }
        }
    }

    /// Forgets the session and returns to the start screen
    ///
    /// The subject catalogue and the scoreboard are kept.
    pub fn reset(&mut self) {
        if let Some(session_id) = self.state.session_id() {
            log::info!("leaving session {session_id}");
        }
        self.timer.clear();
        self.state = State::Idle;
        self.feedback = None;
        self.start_error = None;
    }

    /// Current state
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Name of the current state
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Feedback for the last submission
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Error shown on the start screen
    pub fn start_error(&self) -> Option<&str> {
        self.start_error.as_deref()
    }

    /// Loaded subject catalogue
    pub fn subjects(&self) -> &[SubjectInfo] {
        &self.subjects
    }

    /// Loaded start screen leaderboard
    pub fn scoreboard(&self) -> &[ScoreboardEntry] {
        &self.scoreboard
    }

    /// Seconds shown on the countdown
    pub fn timer_seconds(&self) -> u64 {
        self.timer.displayed_seconds()
    }

    /// Whether the countdown is honouring ticks
    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// The configuration in use
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The API the controller talks to
    pub fn api(&self) -> &A {
        &self.api
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::{Cell, RefCell};

    use async_trait::async_trait;

    use super::*;
    use crate::{
        clock::ManualClock,
        model::{QuestionId, StartSessionRequest, StartSessionResponse},
    };

    mod mocks {
        use super::*;

        pub fn question(id: &str) -> Question {
            Question {
                id: QuestionId::from(id.to_owned()),
                subject: "maths".to_owned(),
                prompt: format!("prompt {id}"),
                diagram_html: None,
            }
        }

        pub fn stats(current_question: u32, score: u32) -> Stats {
            Stats {
                score,
                lives: 3,
                current_question,
                total_questions: 3,
                mistakes: 0,
                average_time_seconds: 0.,
            }
        }

        pub fn outcome(correct: bool) -> Outcome {
            Outcome {
                correct,
                timed_out: false,
                your_answer: String::new(),
                correct_answer: "4".to_owned(),
                explanation: "2 + 2 = 4".to_owned(),
            }
        }

        /// Scripted API answering every submission with `next`
        #[derive(Default)]
        pub struct ScriptedApi {
            pub submissions: RefCell<Vec<AnswerSubmission>>,
            pub fail_next_submit: Cell<bool>,
            pub finish_next_submit: Cell<bool>,
            pub reject_start: Cell<bool>,
        }

        #[async_trait(?Send)]
        impl QuizApi for ScriptedApi {
            async fn subjects(&self) -> Result<Vec<SubjectInfo>, ApiError> {
                Ok(vec![SubjectInfo {
                    key: "maths".to_owned(),
                    label: "Maths".to_owned(),
                }])
            }

            async fn scoreboard(&self, _limit: usize) -> Result<Vec<ScoreboardEntry>, ApiError> {
                Ok(Vec::new())
            }

            async fn start_session(
                &self,
                _request: &StartSessionRequest,
            ) -> Result<StartSessionResponse, ApiError> {
                if self.reject_start.get() {
                    return Err(ApiError::Status {
                        status: reqwest::StatusCode::UNPROCESSABLE_ENTITY,
                        detail: "Age must be between 8 and 99.".to_owned(),
                    });
                }
                Ok(StartSessionResponse {
                    session_id: SessionId::from("s1".to_owned()),
                    stats: stats(1, 0),
                    question: question("q1"),
                    player_name: None,
                    grade: None,
                })
            }

            async fn submit_answer(
                &self,
                _session_id: &SessionId,
                submission: &AnswerSubmission,
            ) -> Result<AnswerResponse, ApiError> {
                self.submissions.borrow_mut().push(submission.clone());
                if self.fail_next_submit.replace(false) {
                    return Err(ApiError::Status {
                        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                        detail: "Server busy.".to_owned(),
                    });
                }
                let count = self.submissions.borrow().len() as u32;
                let finished = self.finish_next_submit.get();
                Ok(AnswerResponse {
                    finished,
                    outcome: outcome(submission.answer == "4"),
                    stats: stats(count + 1, count),
                    next_question: (!finished).then(|| question(&format!("q{}", count + 1))),
                    summary: None,
                })
            }
        }

        pub fn schedule(
            log: &RefCell<Vec<(AlarmMessage, Duration)>>,
        ) -> impl FnMut(AlarmMessage, Duration) + '_ {
            move |message, duration| log.borrow_mut().push((message, duration))
        }
    }

    use mocks::*;

    fn controller() -> (Controller<ScriptedApi, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let controller =
            Controller::with_clock(ScriptedApi::default(), clock.clone(), ClientConfig::default());
        (controller, clock)
    }

    fn last_generation(log: &RefCell<Vec<(AlarmMessage, Duration)>>) -> u64 {
        match log.borrow().last() {
            Some((AlarmMessage::Timer(timer::AlarmMessage::Tick { generation }), _)) => *generation,
            None => panic!("no alarm scheduled"),
        }
    }

    async fn started() -> (
        Controller<ScriptedApi, ManualClock>,
        ManualClock,
        RefCell<Vec<(AlarmMessage, Duration)>>,
    ) {
        let (mut controller, clock) = controller();
        let log = RefCell::new(Vec::new());
        controller
            .start_session(&PlayerForm::new("Ada", "12", ["maths"]), schedule(&log))
            .await
            .unwrap();
        (controller, clock, log)
    }

    #[tokio::test]
    async fn test_start_session_enters_awaiting_answer() {
        let (controller, _clock, log) = started().await;

        assert_eq!(controller.phase(), Phase::AwaitingAnswer);
        assert_eq!(controller.timer_seconds(), 0);
        assert!(controller.is_timer_running());
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(
            controller.state().session_id().map(SessionId::as_str),
            Some("s1")
        );
    }

    #[tokio::test]
    async fn test_start_session_form_error_keeps_idle() {
        let (mut controller, _clock) = controller();
        let log = RefCell::new(Vec::new());

        let result = controller
            .start_session(&PlayerForm::new("", "12", ["maths"]), schedule(&log))
            .await;

        assert!(matches!(result, Err(StartError::Form(_))));
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.start_error(), Some("Please enter a name."));
        assert!(log.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_start_session_server_error_keeps_idle() {
        let (mut controller, _clock) = controller();
        controller.api.reject_start.set(true);
        let log = RefCell::new(Vec::new());

        let result = controller
            .start_session(&PlayerForm::new("Ada", "3", ["maths"]), schedule(&log))
            .await;

        assert!(matches!(result, Err(StartError::Api(_))));
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.start_error(), Some("Age must be between 8 and 99."));
    }

    #[tokio::test]
    async fn test_duplicate_submission_is_guarded() {
        let (mut controller, clock, _log) = started().await;
        clock.advance(Duration::from_secs(10));

        let first = controller.begin_submission("4", false);
        let second = controller.begin_submission("4", false);

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(controller.phase(), Phase::Submitting);
        assert!(!controller.is_timer_running());
        assert_eq!(first.unwrap().submission.elapsed_seconds, 10);
    }

    #[tokio::test]
    async fn test_submission_after_answer_sends_nothing() {
        let (mut controller, _clock, _log) = started().await;

        let first = controller.submit_answer("4", false).await;
        let second = controller.submit_answer("4", false).await;

        assert!(matches!(first, SubmitOutcome::Answered(ref outcome) if outcome.correct));
        assert!(matches!(second, SubmitOutcome::Ignored));
        assert_eq!(controller.api.submissions.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_tick_during_submission_is_ignored() {
        let (mut controller, clock, log) = started().await;
        let generation = last_generation(&log);

        let _pending = controller.begin_submission("4", false).unwrap();
        clock.advance(Duration::from_secs(200));

        assert_eq!(controller.tick(generation, schedule(&log)), TickResult::Ignored);
        assert_eq!(log.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_timeout_auto_submits_empty_answer() {
        let (mut controller, clock, log) = started().await;

        clock.advance(Duration::from_secs(181));
        let generation = last_generation(&log);
        let outcome = controller
            .receive_alarm(
                timer::AlarmMessage::Tick { generation }.into(),
                schedule(&log),
            )
            .await;

        assert!(matches!(outcome, AlarmOutcome::TimedOut(SubmitOutcome::Answered(_))));
        let submissions = controller.api.submissions.borrow();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].answer, "");
        assert_eq!(submissions[0].elapsed_seconds, 180);
        assert_eq!(controller.timer_seconds(), 180);
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_question_without_timer() {
        let (mut controller, clock, log) = started().await;
        controller.api.fail_next_submit.set(true);
        clock.advance(Duration::from_secs(20));

        let outcome = controller.submit_answer("5", false).await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(controller.phase(), Phase::AwaitingAnswer);
        assert!(!controller.is_timer_running());
        assert_eq!(
            controller.feedback(),
            Some(&Feedback::Error("Server busy.".to_owned()))
        );
        assert_eq!(
            controller.state().round().map(|round| round.question().id.as_str()),
            Some("q1")
        );

        // Elapsed time keeps accruing through the failed request
        clock.advance(Duration::from_secs(5));
        let retried = controller.begin_submission("4", false).unwrap();
        assert_eq!(retried.submission.elapsed_seconds, 25);
        assert_eq!(log.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_advance_restarts_timer() {
        let (mut controller, clock, log) = started().await;
        clock.advance(Duration::from_secs(10));
        controller.submit_answer("4", false).await;
        assert_eq!(controller.phase(), Phase::AwaitingNext);
        assert!(!controller.is_timer_running());

        assert!(controller.advance_to_next(schedule(&log)));

        assert_eq!(controller.phase(), Phase::AwaitingAnswer);
        assert_eq!(controller.timer_seconds(), 0);
        assert!(controller.feedback().is_none());
        assert_eq!(log.borrow().len(), 2);
        assert!(!controller.advance_to_next(schedule(&log)));
    }

    #[tokio::test]
    async fn test_finished_session_rejects_further_input() {
        let (mut controller, _clock, log) = started().await;
        controller.api.finish_next_submit.set(true);
        let generation = last_generation(&log);

        let outcome = controller.submit_answer("4", false).await;

        assert!(matches!(outcome, SubmitOutcome::Finished { .. }));
        assert_eq!(controller.phase(), Phase::Finished);
        assert!(matches!(
            controller.submit_answer("4", false).await,
            SubmitOutcome::Ignored
        ));
        assert_eq!(controller.tick(generation, schedule(&log)), TickResult::Ignored);
        assert!(!controller.advance_to_next(schedule(&log)));
        assert_eq!(controller.api.submissions.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let (mut controller, _clock, log) = started().await;
        let generation = last_generation(&log);

        controller.reset();

        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.timer_seconds(), 0);
        assert!(controller.state().session_id().is_none());
        assert_eq!(controller.tick(generation, schedule(&log)), TickResult::Ignored);
    }

    #[tokio::test]
    async fn test_expired_tick_hands_out_timeout_submission() {
        let (mut controller, clock, log) = started().await;
        let generation = last_generation(&log);
        clock.advance(Duration::from_secs(180));

        let result = controller.tick(generation, schedule(&log));

        assert_eq!(
            result,
            TickResult::Expired(PendingSubmission {
                session_id: SessionId::from("s1".to_owned()),
                submission: AnswerSubmission {
                    question_id: QuestionId::from("q1".to_owned()),
                    answer: String::new(),
                    elapsed_seconds: 180,
                },
            })
        );
        assert_eq!(controller.phase(), Phase::Submitting);
        assert_eq!(log.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_running_tick_keeps_question() {
        let (mut controller, clock, log) = started().await;
        let generation = last_generation(&log);
        clock.advance(Duration::from_secs(7));

        assert_eq!(controller.tick(generation, schedule(&log)), TickResult::Running(7));
        assert_eq!(controller.phase(), Phase::AwaitingAnswer);
        assert_eq!(
            controller.tick(generation + 1, schedule(&log)),
            TickResult::Ignored
        );
        assert_eq!(controller.phase(), Phase::AwaitingAnswer);
    }

    #[test]
    fn test_default_selection_ticks_first_and_default_subject() {
        let (mut controller, _clock) = controller();
        let subject = |key: &str| SubjectInfo {
            key: key.to_owned(),
            label: String::new(),
        };

        controller.subjects = vec![subject("history"), subject("maths"), subject("physics")];
        assert_eq!(controller.default_selection(), vec!["history", "maths"]);

        controller.subjects = vec![subject("maths"), subject("physics")];
        assert_eq!(controller.default_selection(), vec!["maths"]);

        controller.subjects = vec![subject("physics"), subject("history")];
        assert_eq!(controller.default_selection(), vec!["physics"]);

        controller.subjects = Vec::new();
        assert!(controller.default_selection().is_empty());
    }

    #[tokio::test]
    async fn test_boot_and_default_selection() {
        let (mut controller, _clock) = controller();

        controller.boot().await.unwrap();

        assert_eq!(controller.subjects().len(), 1);
        assert_eq!(controller.default_selection(), vec!["maths".to_owned()]);
        assert!(controller.start_error().is_none());
    }
}
