use std::borrow::Borrow;
use std::collections::BTreeSet;

const SEPARATOR: char = '-';

/// Derive the next candidate name.
///
/// If the last `-`-separated segment is a number it is incremented
/// (`ctx-1` -> `ctx-2`); otherwise a `2` segment is appended (`ctx` -> `ctx-2`).
pub fn generate_name(name: &str) -> String {
	let (head, last) = match name.rsplit_once(SEPARATOR) {
		Some((head, last)) => (Some(head), last),
		None => (None, name),
	};

	match last.parse::<u64>().ok().and_then(|n| n.checked_add(1)) {
		Some(next) => match head {
			Some(head) => format!("{head}{SEPARATOR}{next}"),
			None => next.to_string(),
		},
		None => format!("{name}{SEPARATOR}2"),
	}
}

/// Return `name`, or the first name produced by repeated [`generate_name`]
/// that is not in `taken`.
pub fn ensure_unique<S: Borrow<str> + Ord>(name: &str, taken: &BTreeSet<S>) -> String {
	let mut candidate = name.to_string();
	while taken.contains(candidate.as_str()) {
		candidate = generate_name(&candidate);
	}
	candidate
}
