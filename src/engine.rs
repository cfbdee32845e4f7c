//! Session - the test loop
//!
//! A session repeatedly draws one argument per generator, evaluates the
//! property on them and counts the outcome, until the property has been
//! satisfied often enough, a counterexample turns up, or too many trials
//! were discarded.

use crate::generators::Generator;
use crate::random::RandomSource;
use crate::stamp::Stamps;
use crate::status::TestStatus;
use crate::value::GeneratedValue;
use std::fmt;
use std::io::{self, Write};

/// The predicate under test.
///
/// Receives the generated arguments in generator order, their count and a
/// fresh label sink. Closures with the matching signature are properties:
///
/// ```
/// use tricheck::{GeneratedValue, Stamps, TestStatus};
///
/// let positive = |args: &[GeneratedValue], _count: usize, stamps: &mut Stamps| {
///     let a = args[0].get::<i32>();
///     if a == 0 {
///         stamps.label("zero");
///     }
///     TestStatus::from(a.checked_mul(a).map_or(true, |square| square >= 0))
/// };
/// # let _ = positive;
/// ```
pub trait Property {
    fn evaluate(&self, arguments: &[GeneratedValue], count: usize, stamps: &mut Stamps) -> TestStatus;
}

impl<F> Property for F
where
    F: Fn(&[GeneratedValue], usize, &mut Stamps) -> TestStatus,
{
    fn evaluate(&self, arguments: &[GeneratedValue], count: usize, stamps: &mut Stamps) -> TestStatus {
        self(arguments, count, stamps)
    }
}

/// Everything one trial produced.
#[derive(Debug)]
pub struct TrialOutcome {
    pub status: TestStatus,
    pub stamps: Stamps,
    pub arguments: Vec<GeneratedValue>,
}

impl TrialOutcome {
    /// Release the arguments and labels of this trial.
    pub fn dispose(self) {
        let TrialOutcome { arguments, stamps, .. } = self;
        for argument in arguments {
            argument.dispose();
        }
        drop(stamps);
    }
}

/// Run a single trial: draw the arguments, then evaluate the property.
pub fn for_all<P>(rng: &mut RandomSource, property: &P, generators: &[&dyn Generator]) -> TrialOutcome
where
    P: Property + ?Sized,
{
    let arguments: Vec<GeneratedValue> = generators.iter().map(|generator| generator.generate(rng)).collect();
    let mut stamps = Stamps::new();
    let status = property.evaluate(&arguments, arguments.len(), &mut stamps);
    TrialOutcome {
        status,
        stamps,
        arguments,
    }
}

/// Configuration for a Session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Satisfied trials needed for success
    pub target_successes: usize,

    /// Discarded trials tolerated before giving up
    pub max_discards: usize,

    /// Seed for the random source; 0 derives one from the clock
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target_successes: 100,
            max_discards: 1000,
            seed: 0,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The property held for the target number of trials
    Success,
    /// A counterexample was found
    Falsified,
    /// Too many trials were discarded
    GaveUp,
}

impl Verdict {
    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Success => 0,
            Verdict::Falsified => 1,
            Verdict::GaveUp => -1,
        }
    }
}

/// Result of a whole session, rendered by its `Display` impl.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub verdict: Verdict,

    pub successes: usize,

    pub discards: usize,

    /// Trials run, including the falsifying one
    pub trials: usize,

    /// Labels of all satisfied trials, most frequent first
    pub stamps: Stamps,

    /// Rendered falsifying arguments, in generator order
    pub counterexample: Vec<String>,
}

impl SessionReport {
    pub fn exit_code(&self) -> i32 {
        self.verdict.exit_code()
    }

    fn write_stamps(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (share, label) in self.stamps.percentages(self.successes) {
            writeln!(f, "{:.2}%\t{}", share, label)?;
        }
        Ok(())
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.verdict {
            Verdict::Success => {
                writeln!(f, "{} test passed ({})!", self.successes, self.discards)?;
                self.write_stamps(f)
            }
            Verdict::Falsified => {
                writeln!(f, "Falsifiable after {} test", self.successes + 1)?;
                for argument in &self.counterexample {
                    writeln!(f, "{}", argument)?;
                }
                Ok(())
            }
            Verdict::GaveUp => {
                writeln!(f, "Gave up after {} tests!", self.successes)?;
                self.write_stamps(f)
            }
        }
    }
}

/// Drives the trials of one property.
#[derive(Debug)]
pub struct Session {
    pub config: SessionConfig,
    rng: RandomSource,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let rng = RandomSource::init(config.seed);
        Self { config, rng }
    }

    /// Use an existing random source; `config.seed` is ignored.
    pub fn with_random_source(config: SessionConfig, rng: RandomSource) -> Self {
        Self { config, rng }
    }

    pub fn random_source(&self) -> &RandomSource {
        &self.rng
    }

    /// Run trials until success, falsification or give-up.
    pub fn check<P>(&mut self, property: &P, generators: &[&dyn Generator]) -> SessionReport
    where
        P: Property + ?Sized,
    {
        let target = self.config.target_successes;
        let max_discards = self.config.max_discards;
        log::info!(
            "Starting session: {} successes wanted, {} discards allowed, {} generators, seed {}",
            target,
            max_discards,
            generators.len(),
            self.rng.seed()
        );
        if target == 0 || max_discards == 0 {
            log::warn!(
                "Degenerate session limits (target_successes={}, max_discards={}), no trial will run",
                target,
                max_discards
            );
        }

        let mut successes = 0;
        let mut discards = 0;
        let mut trials = 0;
        let mut aggregate = Stamps::new();
        let mut falsified = None;

        while successes < target && discards < max_discards {
            trials += 1;
            let outcome = for_all(&mut self.rng, property, generators);
            match outcome.status {
                TestStatus::Falsified => {
                    log::debug!("Trial {} falsified the property", trials);
                    falsified = Some(outcome);
                    break;
                }
                TestStatus::Satisfied => {
                    successes += 1;
                    log::debug!("Trial {} satisfied ({} so far)", trials, successes);
                    aggregate.merge(&outcome.stamps);
                    outcome.dispose();
                }
                TestStatus::Discarded => {
                    discards += 1;
                    log::debug!("Trial {} discarded ({} so far)", trials, discards);
                    outcome.dispose();
                }
            }
        }

        aggregate.sort_descending();
        let mut report = SessionReport {
            verdict: Verdict::GaveUp,
            successes,
            discards,
            trials,
            stamps: aggregate,
            counterexample: Vec::new(),
        };

        if successes == target {
            report.verdict = Verdict::Success;
            log::info!("Property satisfied {} times ({} discarded)", successes, discards);
        } else if let Some(outcome) = falsified {
            report.verdict = Verdict::Falsified;
            report.counterexample = outcome.arguments.iter().map(GeneratedValue::show).collect();
            outcome.dispose();
            log::info!("Property falsified after {} trials", trials);
        } else {
            log::info!("Gave up after {} successes and {} discards", successes, discards);
        }

        report
    }

    /// Run the session and print its report to stdout.
    pub fn run<P>(&mut self, property: &P, generators: &[&dyn Generator]) -> i32
    where
        P: Property + ?Sized,
    {
        let report = self.check(property, generators);
        print!("{}", report);
        report.exit_code()
    }

    /// Run the session and write its report to `out`.
    pub fn run_with_output<P, W>(&mut self, out: &mut W, property: &P, generators: &[&dyn Generator]) -> io::Result<i32>
    where
        P: Property + ?Sized,
        W: Write,
    {
        let report = self.check(property, generators);
        write!(out, "{}", report)?;
        Ok(report.exit_code())
    }
}

/// Run a clock-seeded session, print its report and return the exit code:
/// 0 on success, 1 on falsification, -1 on give-up.
pub fn run_session<P>(target_successes: usize, max_discards: usize, property: &P, generators: &[&dyn Generator]) -> i32
where
    P: Property + ?Sized,
{
    let config = SessionConfig {
        target_successes,
        max_discards,
        ..SessionConfig::default()
    };
    Session::new(config).run(property, generators)
}
