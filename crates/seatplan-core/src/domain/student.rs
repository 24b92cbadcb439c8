//! Students and register-number ordering.
//!
//! Register numbers are compared "naturally": runs of digits compare by their
//! numeric value, so `"R9"` sorts before `"R10"`. This ordering is the
//! allocation priority of the placement engine, not a display concern.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// One student, identified by the `(register_number, class_name)` pair.
///
/// Duplicate register numbers across classes are not rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Student {
    /// Register (roll) number as printed on the roster, e.g. `"21CS045"`.
    pub register_number: String,
    /// Name of the class group this student belongs to.
    pub class_name: String,
}

impl Student {
    pub fn new(register_number: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            register_number: register_number.into(),
            class_name: class_name.into(),
        }
    }

    /// Returns `true` if both students belong to the same class group.
    pub fn same_class(&self, other: &Student) -> bool {
        self.class_name == other.class_name
    }
}

/// A run of either digits or non-digits inside a register number.
#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits: Option<bool> = None;

    for (idx, ch) in s.char_indices() {
        let is_digit = ch.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != is_digit => {
                out.push(make_chunk(&s[start..idx], prev));
                start = idx;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }
    if let Some(prev) = in_digits {
        out.push(make_chunk(&s[start..], prev));
    }
    out
}

fn make_chunk(text: &str, digits: bool) -> Chunk<'_> {
    if digits {
        Chunk::Digits(text)
    } else {
        Chunk::Text(text)
    }
}

/// Compares two digit runs by numeric value without parsing, so arbitrarily
/// long runs never overflow.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trim = a.trim_start_matches('0');
    let b_trim = b.trim_start_matches('0');
    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
}

fn compare_text_runs(a: &str, b: &str) -> Ordering {
    let a_folded = a.chars().flat_map(char::to_lowercase);
    let b_folded = b.chars().flat_map(char::to_lowercase);
    a_folded.cmp(b_folded)
}

/// Numeric-aware comparison of two register numbers.
///
/// Digit runs compare by value, text runs compare case-insensitively, and a
/// digit run sorts before a text run at the same position. Ties (e.g. `"007"`
/// vs `"7"`, or `"a1"` vs `"A1"`) fall back to plain byte order, so the result
/// is a total order and sorting is deterministic.
///
/// ```
/// use seatplan_core::compare_register_numbers;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_register_numbers("R9", "R10"), Ordering::Less);
/// assert_eq!(compare_register_numbers("R10", "R2"), Ordering::Greater);
/// ```
pub fn compare_register_numbers(a: &str, b: &str) -> Ordering {
    let a_chunks = chunks(a);
    let b_chunks = chunks(b);

    for (ca, cb) in a_chunks.iter().zip(b_chunks.iter()) {
        let ord = match (ca, cb) {
            (Chunk::Digits(x), Chunk::Digits(y)) => compare_digit_runs(x, y),
            (Chunk::Text(x), Chunk::Text(y)) => compare_text_runs(x, y),
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    a_chunks
        .len()
        .cmp(&b_chunks.len())
        .then_with(|| a.cmp(b))
}

/// Sorts students in place by register number (ascending, numeric-aware).
pub fn sort_by_register_number(students: &mut [Student]) {
    students.sort_by(|a, b| {
        compare_register_numbers(&a.register_number, &b.register_number)
            .then_with(|| a.class_name.cmp(&b.class_name))
    });
}
