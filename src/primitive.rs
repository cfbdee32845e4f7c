//! Per-type behaviour of the scalar element types.
//!
//! Each primitive knows its default range, how to draw a uniform value from
//! a half-open range `[from, to)`, how to render itself within a fixed size
//! and how it is tagged inside a `Payload`.

use crate::random::{RandomSource, NATIVE_MAX};
use crate::value::{bounded, Payload};
use half::f16;
use std::fmt::Debug;

/// Half of the native ceiling; default numeric ranges are `[-HALF, HALF)`.
pub const HALF_NATIVE: u32 = NATIVE_MAX / 2;

pub trait Primitive: Copy + PartialOrd + Debug + 'static {
    const NAME: &'static str;
    const ARRAY_NAME: &'static str;
    /// Longest rendering, in characters.
    const SHOW_LIMIT: usize;

    fn default_range() -> (Self, Self);

    /// Whether `self` can bound a range. Rejects NaN and infinities.
    fn is_finite_bound(self) -> bool {
        true
    }

    /// Uniform draw from `[from, to)`; requires `from < to`.
    fn draw_in(rng: &mut RandomSource, from: Self, to: Self) -> Self;

    /// Unbounded text form.
    fn render(&self) -> String;

    fn show(&self) -> String {
        bounded(self.render(), Self::SHOW_LIMIT)
    }

    fn into_payload(self) -> Payload;
    fn into_array_payload(values: Vec<Self>) -> Payload;
    fn view(raw: &Payload) -> Option<Self>;
    fn view_array(raw: &Payload) -> Option<&[Self]>;
}

macro_rules! tagged {
    ($variant:ident, $array:ident) => {
        fn into_payload(self) -> Payload {
            Payload::$variant(self)
        }

        fn into_array_payload(values: Vec<Self>) -> Payload {
            Payload::$array(values)
        }

        fn view(raw: &Payload) -> Option<Self> {
            match raw {
                Payload::$variant(value) => Some(*value),
                _ => None,
            }
        }

        fn view_array(raw: &Payload) -> Option<&[Self]> {
            match raw {
                Payload::$array(values) => Some(values.as_slice()),
                _ => None,
            }
        }
    };
}

macro_rules! integer_primitive {
    ($ty:ty, $name:literal, $limit:expr, $variant:ident, $array:ident) => {
        impl Primitive for $ty {
            const NAME: &'static str = $name;
            const ARRAY_NAME: &'static str = concat!($name, " array");
            const SHOW_LIMIT: usize = $limit;

            fn default_range() -> (Self, Self) {
                (-(HALF_NATIVE as $ty), HALF_NATIVE as $ty)
            }

            fn draw_in(rng: &mut RandomSource, from: Self, to: Self) -> Self {
                let span = (to as i128 - from as i128) as u128;
                (from as i128 + rng.below(span) as i128) as $ty
            }

            fn render(&self) -> String {
                self.to_string()
            }

            tagged!($variant, $array);
        }
    };
}

integer_primitive!(i64, "long", 21, Long, LongArray);
integer_primitive!(i32, "int", 11, Int, IntArray);

macro_rules! float_primitive {
    ($ty:ty, $name:literal, $variant:ident, $array:ident) => {
        impl Primitive for $ty {
            const NAME: &'static str = $name;
            const ARRAY_NAME: &'static str = concat!($name, " array");
            const SHOW_LIMIT: usize = FLOAT_SHOW_LIMIT;

            fn default_range() -> (Self, Self) {
                (-(HALF_NATIVE as $ty), HALF_NATIVE as $ty)
            }

            fn is_finite_bound(self) -> bool {
                self.is_finite()
            }

            fn draw_in(rng: &mut RandomSource, from: Self, to: Self) -> Self {
                loop {
                    let value = lerp(from as f64, to as f64, rng.unit()) as $ty;
                    if value >= from && value < to {
                        return value;
                    }
                }
            }

            fn render(&self) -> String {
                c_exponent(*self as f64)
            }

            tagged!($variant, $array);
        }
    };
}

const FLOAT_SHOW_LIMIT: usize = 50;

float_primitive!(f64, "double", Double, DoubleArray);
float_primitive!(f32, "float", Float, FloatArray);

impl Primitive for f16 {
    const NAME: &'static str = "half";
    const ARRAY_NAME: &'static str = "half array";
    const SHOW_LIMIT: usize = FLOAT_SHOW_LIMIT;

    fn default_range() -> (Self, Self) {
        (f16::MIN, f16::MAX)
    }

    fn is_finite_bound(self) -> bool {
        self.is_finite()
    }

    fn draw_in(rng: &mut RandomSource, from: Self, to: Self) -> Self {
        loop {
            let value = f16::from_f64(lerp(from.to_f64(), to.to_f64(), rng.unit()));
            if value >= from && value < to {
                return value;
            }
        }
    }

    fn render(&self) -> String {
        c_exponent(self.to_f64())
    }

    tagged!(Half, HalfArray);
}

impl Primitive for bool {
    const NAME: &'static str = "boolean";
    const ARRAY_NAME: &'static str = "boolean array";
    const SHOW_LIMIT: usize = 5;

    fn default_range() -> (Self, Self) {
        (false, true)
    }

    /// Always a fair coin; a boolean range carries no information.
    fn draw_in(rng: &mut RandomSource, _from: Self, _to: Self) -> Self {
        rng.coin()
    }

    fn render(&self) -> String {
        let text = if *self { "TRUE" } else { "FALSE" };
        text.to_string()
    }

    tagged!(Boolean, BooleanArray);
}

impl Primitive for char {
    const NAME: &'static str = "char";
    const ARRAY_NAME: &'static str = "char array";
    const SHOW_LIMIT: usize = 1;

    /// Printable ASCII band, `!` through `}`.
    fn default_range() -> (Self, Self) {
        ('!', '~')
    }

    fn draw_in(rng: &mut RandomSource, from: Self, to: Self) -> Self {
        let span = (to as u32 - from as u32) as u128;
        loop {
            let code = from as u32 + rng.below(span) as u32;
            // surrogate code points are not chars
            if let Some(c) = char::from_u32(code) {
                return c;
            }
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }

    tagged!(Char, CharArray);
}

/// Interpolation that stays finite for any pair of finite bounds.
fn lerp(from: f64, to: f64, u: f64) -> f64 {
    from * (1.0 - u) + to * u
}

/// C `%.12e` rendering: `1.500000000000e+00`.
pub fn c_exponent(value: f64) -> String {
    let formatted = format!("{:.12e}", value);
    if let Some((mantissa, exponent)) = formatted.split_once('e') {
        if let Ok(exp) = exponent.parse::<i32>() {
            let sign = if exp < 0 { '-' } else { '+' };
            return format!("{}e{}{:02}", mantissa, sign, exp.abs());
        }
    }
    formatted
}
