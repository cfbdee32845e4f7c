//! # tricheck
//!
//! A property-based test engine with three-valued outcomes.
//!
//! A property is a predicate over randomly generated arguments. Each trial
//! draws one argument per generator, evaluates the property and classifies
//! the trial as satisfied, falsified or discarded (the precondition did not
//! apply). A session runs trials until the property has been satisfied often
//! enough, a counterexample is found, or too many trials were discarded, and
//! then reports how the labelled inputs were distributed.
//!
//! ```
//! use tricheck::{gen_int, GeneratedValue, Session, SessionConfig, Stamps, TestStatus, Verdict};
//!
//! let commutative = |args: &[GeneratedValue], _count: usize, stamps: &mut Stamps| {
//!     let a = args[0].get::<i32>();
//!     let b = args[1].get::<i32>();
//!     if a < 0 {
//!         stamps.label("a-negative");
//!     }
//!     TestStatus::from(a.wrapping_mul(b) == b.wrapping_mul(a))
//! };
//!
//! let mut session = Session::new(SessionConfig { seed: 7, ..SessionConfig::default() });
//! let report = session.check(&commutative, &[&gen_int(), &gen_int()]);
//! assert_eq!(report.verdict, Verdict::Success);
//! assert_eq!(report.exit_code(), 0);
//! ```

pub mod engine;
pub mod generators;
pub mod primitive;
pub mod random;
pub mod stamp;
pub mod status;
pub mod value;

pub use engine::{for_all, run_session, Property, Session, SessionConfig, SessionReport, TrialOutcome, Verdict};
pub use generators::{
    gen_array_boolean, gen_array_char, gen_array_custom, gen_array_double, gen_array_float, gen_array_half,
    gen_array_int, gen_array_long, gen_array_of, gen_boolean, gen_char, gen_char_r, gen_double, gen_double_r,
    gen_float, gen_float_r, gen_half, gen_half_r, gen_int, gen_int_r, gen_long, gen_long_r, gen_string,
    gen_string_l, gen_string_of, ArrayOf, CustomArrayOf, ElementSource, Generator, RangeError, Scalar, StringOf,
    DEFAULT_MAX_LEN,
};
pub use primitive::Primitive;
pub use random::{init, RandomSource, NATIVE_MAX};
pub use stamp::{StampEntry, Stamps};
pub use status::{imply, TestStatus};
pub use value::{DisposeFn, GeneratedValue, Payload, ShowFn, ValueError};
