//! Three-valued property outcomes.
//!
//! A property either holds (`Satisfied`), fails (`Falsified`), or does not
//! apply to the drawn inputs (`Discarded`). The combinators below are the
//! whole algebra. `Discarded` is sticky through `and` and `xor` but `or`
//! falls through to its second operand.

use std::ops::{BitAnd, BitOr, BitXor, Not};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestStatus {
    Satisfied,
    Falsified,
    Discarded,
}

impl TestStatus {
    pub fn and(self, other: TestStatus) -> TestStatus {
        match self {
            TestStatus::Satisfied => other,
            TestStatus::Falsified => TestStatus::Falsified,
            TestStatus::Discarded => TestStatus::Discarded,
        }
    }

    pub fn or(self, other: TestStatus) -> TestStatus {
        match self {
            TestStatus::Satisfied => TestStatus::Satisfied,
            TestStatus::Falsified | TestStatus::Discarded => other,
        }
    }

    pub fn xor(self, other: TestStatus) -> TestStatus {
        match self {
            TestStatus::Satisfied => !other,
            TestStatus::Falsified => other,
            TestStatus::Discarded => TestStatus::Discarded,
        }
    }

    pub fn is_satisfied(self) -> bool {
        self == TestStatus::Satisfied
    }

    pub fn is_falsified(self) -> bool {
        self == TestStatus::Falsified
    }

    pub fn is_discarded(self) -> bool {
        self == TestStatus::Discarded
    }
}

/// `property` when `precondition` holds, `Discarded` otherwise.
///
/// Only selects: `property` is already evaluated (labels included) by the
/// time this is called. Callers that want labels only for applicable inputs
/// must branch themselves.
pub fn imply(precondition: bool, property: TestStatus) -> TestStatus {
    if precondition {
        property
    } else {
        TestStatus::Discarded
    }
}

impl From<bool> for TestStatus {
    fn from(holds: bool) -> Self {
        if holds {
            TestStatus::Satisfied
        } else {
            TestStatus::Falsified
        }
    }
}

impl Not for TestStatus {
    type Output = TestStatus;

    fn not(self) -> TestStatus {
        match self {
            TestStatus::Satisfied => TestStatus::Falsified,
            TestStatus::Falsified => TestStatus::Satisfied,
            TestStatus::Discarded => TestStatus::Discarded,
        }
    }
}

impl BitAnd for TestStatus {
    type Output = TestStatus;

    fn bitand(self, rhs: TestStatus) -> TestStatus {
        self.and(rhs)
    }
}

impl BitOr for TestStatus {
    type Output = TestStatus;

    fn bitor(self, rhs: TestStatus) -> TestStatus {
        self.or(rhs)
    }
}

impl BitXor for TestStatus {
    type Output = TestStatus;

    fn bitxor(self, rhs: TestStatus) -> TestStatus {
        self.xor(rhs)
    }
}
