//! Generator library.
//!
//! A generator produces one `GeneratedValue` per call. Scalars draw
//! uniformly from a half-open range `[from, to)`, either the type's default
//! range or one fixed at construction time. Arrays and strings first pick a
//! length uniformly in `[0, max_len)` and then draw every element
//! independently from their element generator.
//!
//! Any `Fn(&mut RandomSource) -> GeneratedValue` is a generator too, which is
//! how callers build their own:
//!
//! ```
//! use tricheck::{gen_int, GeneratedValue, Generator, RandomSource};
//!
//! let small_abs = |rng: &mut RandomSource| {
//!     let v = gen_int().generate(rng).get::<i32>();
//!     GeneratedValue::scalar(v.wrapping_abs() % 11 - 5)
//! };
//! let mut rng = RandomSource::init(1);
//! let v = small_abs.generate(&mut rng).get::<i32>();
//! assert!((-5..=5).contains(&v));
//! ```

use crate::primitive::Primitive;
use crate::random::RandomSource;
use crate::value::GeneratedValue;
use half::f16;
use std::fmt;
use std::marker::PhantomData;

/// Default upper bound (exclusive) on array and string lengths.
pub const DEFAULT_MAX_LEN: usize = 100;

/// Produces one value per trial.
pub trait Generator {
    fn generate(&self, rng: &mut RandomSource) -> GeneratedValue;
}

impl<F> Generator for F
where
    F: Fn(&mut RandomSource) -> GeneratedValue,
{
    fn generate(&self, rng: &mut RandomSource) -> GeneratedValue {
        self(rng)
    }
}

/// Invalid generator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// `from >= to`, or a zero length bound
    Empty,
    /// A floating bound is NaN or infinite
    NonFinite,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::Empty => write!(f, "Empty generator range"),
            RangeError::NonFinite => write!(f, "Generator range bounds must be finite"),
        }
    }
}

impl std::error::Error for RangeError {}

/// Uniform scalar generator over `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scalar<T> {
    from: T,
    to: T,
}

impl<T: Primitive> Scalar<T> {
    /// Generator over the type's default range.
    pub fn full() -> Self {
        let (from, to) = T::default_range();
        Self { from, to }
    }

    pub fn try_new(from: T, to: T) -> Result<Self, RangeError> {
        if !from.is_finite_bound() || !to.is_finite_bound() {
            return Err(RangeError::NonFinite);
        }
        if from >= to {
            return Err(RangeError::Empty);
        }
        Ok(Self { from, to })
    }

    /// # Panics
    ///
    /// Panics when the range is empty or has a non-finite bound.
    pub fn new(from: T, to: T) -> Self {
        match Self::try_new(from, to) {
            Ok(scalar) => scalar,
            Err(err) => panic!("{}: [{:?}, {:?})", err, from, to),
        }
    }

    pub fn bounds(&self) -> (T, T) {
        (self.from, self.to)
    }

    /// Draw one raw element.
    pub fn draw(&self, rng: &mut RandomSource) -> T {
        T::draw_in(rng, self.from, self.to)
    }
}

impl<T: Primitive> Generator for Scalar<T> {
    fn generate(&self, rng: &mut RandomSource) -> GeneratedValue {
        GeneratedValue::scalar(self.draw(rng))
    }
}

fn check_max_len(max_len: usize) {
    assert!(max_len > 0, "{}: length bound must be positive", RangeError::Empty);
}

fn draw_length(rng: &mut RandomSource, max_len: usize) -> usize {
    rng.below(max_len as u128) as usize
}

/// Source of the elements of an array.
///
/// Implemented by `Scalar<T>` and by any `Fn(&mut RandomSource) -> T`, so
/// arrays can hold post-processed draws or caller-defined element types.
pub trait ElementSource<T> {
    fn draw(&self, rng: &mut RandomSource) -> T;
}

impl<T: Primitive> ElementSource<T> for Scalar<T> {
    fn draw(&self, rng: &mut RandomSource) -> T {
        Scalar::draw(self, rng)
    }
}

impl<T, F> ElementSource<T> for F
where
    F: Fn(&mut RandomSource) -> T,
{
    fn draw(&self, rng: &mut RandomSource) -> T {
        self(rng)
    }
}

fn draw_elements<T, G: ElementSource<T>>(element: &G, rng: &mut RandomSource, max_len: usize) -> Vec<T> {
    let length = draw_length(rng, max_len);
    (0..length).map(|_| element.draw(rng)).collect()
}

/// Array of independently drawn elements, length uniform in `[0, max_len)`.
#[derive(Debug, Clone, Copy)]
pub struct ArrayOf<T, G = Scalar<T>> {
    element: G,
    max_len: usize,
    _element_type: PhantomData<fn() -> T>,
}

impl<T, G: ElementSource<T>> ArrayOf<T, G> {
    /// # Panics
    ///
    /// Panics when `max_len` is zero.
    pub fn new(element: G, max_len: usize) -> Self {
        check_max_len(max_len);
        Self {
            element,
            max_len,
            _element_type: PhantomData,
        }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl<T: Primitive, G: ElementSource<T>> Generator for ArrayOf<T, G> {
    fn generate(&self, rng: &mut RandomSource) -> GeneratedValue {
        GeneratedValue::array(draw_elements(&self.element, rng, self.max_len))
    }
}

/// Array of caller-defined elements, rendered through their `Display`.
///
/// Read it back with `get_custom::<Vec<T>>()`.
#[derive(Debug, Clone, Copy)]
pub struct CustomArrayOf<T, G> {
    element: G,
    max_len: usize,
    _element_type: PhantomData<fn() -> T>,
}

impl<T, G: ElementSource<T>> CustomArrayOf<T, G> {
    /// # Panics
    ///
    /// Panics when `max_len` is zero.
    pub fn new(element: G, max_len: usize) -> Self {
        check_max_len(max_len);
        Self {
            element,
            max_len,
            _element_type: PhantomData,
        }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl<T, G> Generator for CustomArrayOf<T, G>
where
    T: fmt::Display + 'static,
    G: ElementSource<T>,
{
    fn generate(&self, rng: &mut RandomSource) -> GeneratedValue {
        GeneratedValue::custom_array(draw_elements(&self.element, rng, self.max_len))
    }
}

/// String of independently drawn chars, length uniform in `[0, max_len)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StringOf {
    element: Scalar<char>,
    max_len: usize,
}

impl StringOf {
    /// # Panics
    ///
    /// Panics when `max_len` is zero.
    pub fn new(element: Scalar<char>, max_len: usize) -> Self {
        check_max_len(max_len);
        Self { element, max_len }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Generator for StringOf {
    fn generate(&self, rng: &mut RandomSource) -> GeneratedValue {
        let value: String = draw_elements::<char, _>(&self.element, rng, self.max_len).into_iter().collect();
        GeneratedValue::string(value)
    }
}

pub fn gen_long() -> Scalar<i64> {
    Scalar::full()
}

pub fn gen_long_r(from: i64, to: i64) -> Scalar<i64> {
    Scalar::new(from, to)
}

pub fn gen_int() -> Scalar<i32> {
    Scalar::full()
}

pub fn gen_int_r(from: i32, to: i32) -> Scalar<i32> {
    Scalar::new(from, to)
}

pub fn gen_double() -> Scalar<f64> {
    Scalar::full()
}

pub fn gen_double_r(from: f64, to: f64) -> Scalar<f64> {
    Scalar::new(from, to)
}

pub fn gen_float() -> Scalar<f32> {
    Scalar::full()
}

pub fn gen_float_r(from: f32, to: f32) -> Scalar<f32> {
    Scalar::new(from, to)
}

pub fn gen_half() -> Scalar<f16> {
    Scalar::full()
}

pub fn gen_half_r(from: f16, to: f16) -> Scalar<f16> {
    Scalar::new(from, to)
}

/// Fair coin.
pub fn gen_boolean() -> Scalar<bool> {
    Scalar::full()
}

/// Printable ASCII, codes 33 through 125.
pub fn gen_char() -> Scalar<char> {
    Scalar::full()
}

pub fn gen_char_r(from: char, to: char) -> Scalar<char> {
    Scalar::new(from, to)
}

/// Array of built-in elements drawn from `element`: a ranged scalar or a
/// closure post-processing one.
pub fn gen_array_of<T: Primitive, G: ElementSource<T>>(element: G, max_len: usize) -> ArrayOf<T, G> {
    ArrayOf::new(element, max_len)
}

pub fn gen_array_custom<T, G>(element: G, max_len: usize) -> CustomArrayOf<T, G>
where
    T: fmt::Display + 'static,
    G: ElementSource<T>,
{
    CustomArrayOf::new(element, max_len)
}

pub fn gen_array_long() -> ArrayOf<i64> {
    gen_array_of(gen_long(), DEFAULT_MAX_LEN)
}

pub fn gen_array_int() -> ArrayOf<i32> {
    gen_array_of(gen_int(), DEFAULT_MAX_LEN)
}

pub fn gen_array_double() -> ArrayOf<f64> {
    gen_array_of(gen_double(), DEFAULT_MAX_LEN)
}

pub fn gen_array_float() -> ArrayOf<f32> {
    gen_array_of(gen_float(), DEFAULT_MAX_LEN)
}

pub fn gen_array_half() -> ArrayOf<f16> {
    gen_array_of(gen_half(), DEFAULT_MAX_LEN)
}

pub fn gen_array_boolean() -> ArrayOf<bool> {
    gen_array_of(gen_boolean(), DEFAULT_MAX_LEN)
}

pub fn gen_array_char() -> ArrayOf<char> {
    gen_array_of(gen_char(), DEFAULT_MAX_LEN)
}

pub fn gen_string() -> StringOf {
    gen_string_l(DEFAULT_MAX_LEN)
}

/// Printable string strictly shorter than `max_len`.
pub fn gen_string_l(max_len: usize) -> StringOf {
    gen_string_of(gen_char(), max_len)
}

pub fn gen_string_of(element: Scalar<char>, max_len: usize) -> StringOf {
    StringOf::new(element, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranged_int_stays_in_range() {
        let mut rng = RandomSource::init(42);
        let gen = gen_int_r(-5, 6);
        let mut seen = [false; 11];
        for _ in 0..10_000 {
            let v = gen.generate(&mut rng).get::<i32>();
            assert!((-5..6).contains(&v), "out of range: {}", v);
            seen[(v + 5) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "every value should appear");
    }

    #[test]
    fn test_wide_ranged_long() {
        let mut rng = RandomSource::init(42);
        let gen = gen_long_r(i64::MIN, i64::MAX);
        for _ in 0..10_000 {
            let v = gen.generate(&mut rng).get::<i64>();
            assert!(v < i64::MAX);
        }
        let narrow = gen_long_r(-3, -1);
        for _ in 0..1_000 {
            let v = narrow.generate(&mut rng).get::<i64>();
            assert!(v == -3 || v == -2);
        }
    }

    #[test]
    fn test_default_int_range() {
        let mut rng = RandomSource::init(1);
        let (from, to) = gen_int().bounds();
        for _ in 0..10_000 {
            let v = gen_int().generate(&mut rng).get::<i32>();
            assert!(v >= from && v < to);
        }
    }

    #[test]
    fn test_ranged_double() {
        let mut rng = RandomSource::init(2);
        let gen = gen_double_r(-0.5, 0.25);
        for _ in 0..10_000 {
            let v = gen.generate(&mut rng).get::<f64>();
            assert!((-0.5..0.25).contains(&v));
        }
        let gen = gen_float_r(1.0, 1.5);
        for _ in 0..10_000 {
            let v = gen.generate(&mut rng).get::<f32>();
            assert!((1.0..1.5).contains(&v));
        }
    }

    #[test]
    fn test_chars_are_printable_ascii() {
        let mut rng = RandomSource::init(3);
        for _ in 0..10_000 {
            let c = gen_char().generate(&mut rng).get::<char>();
            assert!((33..=125).contains(&(c as u32)), "unexpected {:?}", c);
        }
    }

    #[test]
    fn test_boolean_produces_both() {
        let mut rng = RandomSource::init(4);
        let trues = (0..1_000)
            .filter(|_| gen_boolean().generate(&mut rng).get::<bool>())
            .count();
        assert!(trues > 400 && trues < 600, "trues = {}", trues);
    }

    #[test]
    fn test_string_length_bound() {
        let mut rng = RandomSource::init(5);
        for bound in [1usize, 2, 10, 100] {
            let gen = gen_string_l(bound);
            for _ in 0..1_000 {
                let value = gen.generate(&mut rng);
                assert!(value.len() < bound);
                assert_eq!(value.get_str().chars().count(), value.len());
            }
        }
    }

    #[test]
    fn test_array_elements_use_element_range() {
        let mut rng = RandomSource::init(6);
        let gen = gen_array_of(gen_int_r(0, 3), 20);
        let mut longest = 0;
        for _ in 0..1_000 {
            let value = gen.generate(&mut rng);
            let items = value.get_array::<i32>();
            assert_eq!(items.len(), value.len());
            assert!(items.len() < 20);
            assert!(items.iter().all(|&v| (0..3).contains(&v)));
            longest = longest.max(items.len());
        }
        assert_eq!(longest, 19);
    }

    #[test]
    fn test_array_from_closure_elements() {
        let mut rng = RandomSource::init(8);
        let digits = gen_int_r(0, 5);
        let doubled = gen_array_of(move |rng: &mut RandomSource| digits.draw(rng) * 2 + 1, 12);
        for _ in 0..1_000 {
            let value = doubled.generate(&mut rng);
            let items = value.get_array::<i32>();
            assert!(items.len() < 12);
            assert!(items.iter().all(|&v| v % 2 == 1 && (1..10).contains(&v)), "{:?}", items);

            let shown = value.show();
            let expected: Vec<String> = items.iter().map(|v| v.to_string()).collect();
            assert_eq!(shown, format!("[{}]", expected.join(", ")));
        }
    }

    #[test]
    fn test_array_of_custom_elements() {
        struct Point(i32, i32);

        impl fmt::Display for Point {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "({}, {})", self.0, self.1)
            }
        }

        let mut rng = RandomSource::init(9);
        let coordinate = gen_int_r(-3, 3);
        let points = gen_array_custom(
            move |rng: &mut RandomSource| Point(coordinate.draw(rng), coordinate.draw(rng)),
            6,
        );
        let mut nonempty = 0;
        for _ in 0..200 {
            let value = points.generate(&mut rng);
            let items = value.get_custom::<Vec<Point>>();
            assert_eq!(items.len(), value.len());
            assert!(items.iter().all(|p| (-3..3).contains(&p.0) && (-3..3).contains(&p.1)));

            let shown = value.show();
            assert!(shown.starts_with('[') && shown.ends_with(']'));
            if let Some(first) = items.first() {
                nonempty += 1;
                assert!(shown.starts_with(&format!("[{}", first)));
            }
        }
        assert!(nonempty > 0);
    }

    #[test]
    fn test_array_show_uses_element_show() {
        let mut rng = RandomSource::init(7);
        let value = gen_array_boolean().generate(&mut rng);
        let shown = value.show();
        assert!(shown.starts_with('[') && shown.ends_with(']'));
        let inner = &shown[1..shown.len() - 1];
        if !inner.is_empty() {
            assert!(inner.split(", ").all(|s| s == "TRUE" || s == "FALSE"));
        }
    }

    #[test]
    fn test_invalid_ranges() {
        assert_eq!(Scalar::try_new(3i32, 3), Err(RangeError::Empty));
        assert_eq!(Scalar::try_new(5i64, 1), Err(RangeError::Empty));
        assert_eq!(Scalar::try_new(0.0, f64::INFINITY), Err(RangeError::NonFinite));
        assert_eq!(Scalar::try_new(f32::NAN, 1.0), Err(RangeError::NonFinite));
        assert!(Scalar::try_new('a', 'z').is_ok());
    }

    #[test]
    #[should_panic(expected = "Empty generator range")]
    fn test_empty_range_panics() {
        let _ = gen_int_r(1, 1);
    }

    #[test]
    fn test_same_seed_same_values() {
        let generators: [&dyn Generator; 3] = [&gen_long(), &gen_double(), &gen_string()];
        let mut a = RandomSource::init(99);
        let mut b = RandomSource::init(99);
        for generator in generators.iter() {
            assert_eq!(generator.generate(&mut a).show(), generator.generate(&mut b).show());
        }
    }
}
