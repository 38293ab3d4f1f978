//! Generates randomized, arbitrarily nested test records in the same textual form a broker
//! would load from its bulk data file.

use std::collections::{BTreeMap, HashSet};

use kvtrie_api::value::{emit_record, Value};
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;

const ALLOWED_TYPES: [&str; 3] = ["string", "int", "float"];

struct Args {
	key_file: String,
	num_lines: u32,
	max_depth: u32,
	max_string_length: u32,
	max_keys_per_object: u32,
}

fn parse_args() -> Args {
	let raw: Vec<String> = std::env::args().collect();
	if raw.len() != 6 {
		eprintln!(
			"Usage: {} <key-file> <num-lines> <max-depth> <max-string-length> <max-keys-per-object>",
			raw[0]
		);
		std::process::exit(1);
	}

	let parse_positive = |s: &str, name: &str| -> u32 {
		match s.parse::<u32>() {
			Ok(v) if v > 0 => v,
			_ => {
				eprintln!("Error: parameter {} must be positive. Got: {}", name, s);
				std::process::exit(1);
			},
		}
	};
	let parse_non_negative = |s: &str, name: &str| -> u32 {
		match s.parse::<u32>() {
			Ok(v) => v,
			_ => {
				eprintln!("Error: parameter {} must be non-negative. Got: {}", name, s);
				std::process::exit(1);
			},
		}
	};

	Args {
		key_file: raw[1].clone(),
		num_lines: parse_positive(&raw[2], "n"),
		max_depth: parse_non_negative(&raw[3], "d"),
		max_string_length: parse_positive(&raw[4], "l"),
		max_keys_per_object: parse_non_negative(&raw[5], "m"),
	}
}

/// Loads `NAME TYPE` pairs from the key file, one per non-blank line.
fn load_key_file(path: &str) -> Vec<(String, String)> {
	let contents = match std::fs::read_to_string(path) {
		Ok(contents) => contents,
		Err(e) => {
			eprintln!("Error: could not read key file '{}': {}", path, e);
			std::process::exit(1);
		},
	};

	match parse_key_file(&contents) {
		Ok(keys) => keys,
		Err(e) => {
			eprintln!("Error: {}", e);
			std::process::exit(1);
		},
	}
}

/// Parses `NAME TYPE` pairs, one per non-blank line.
///
/// Unlike the line this was supplemented from, an unrecognized `TYPE` is rejected here rather
/// than silently producing a key with no value at generation time.
fn parse_key_file(contents: &str) -> Result<Vec<(String, String)>, String> {
	let mut keys = Vec::new();
	for line in contents.lines() {
		let line = line.trim();
		if line.is_empty() {
			continue;
		}
		let mut fields = line.split_whitespace();
		let (name, data_type) = match (fields.next(), fields.next(), fields.next()) {
			(Some(name), Some(data_type), None) => (name, data_type),
			_ => return Err(format!("invalid key file line, expected 'NAME TYPE': {}", line)),
		};
		if !ALLOWED_TYPES.contains(&data_type) {
			return Err(format!(
				"unknown type '{}' for key '{}'. Expected one of {:?}",
				data_type, name, ALLOWED_TYPES
			));
		}
		keys.push((name.to_string(), data_type.to_string()));
	}

	if keys.is_empty() {
		return Err("no keys specified in key file".to_string());
	}
	Ok(keys)
}

fn generate_random_string(max_length: u32, rng: &mut impl Rng) -> String {
	let length = rng.gen_range(1..=max_length) as usize;
	(0..length).map(|_| rng.sample(Alphanumeric) as char).collect()
}

fn generate_value_by_type(data_type: &str, max_length: u32, rng: &mut impl Rng) -> Value {
	match data_type {
		"string" => Value::String(generate_random_string(max_length, rng)),
		"int" => Value::Int(rng.gen_range(0..=1000)),
		"float" => Value::Float(rng.gen_range(0..100_000i64) as f64 / 100.0),
		_ => unreachable!("load_key_file rejects unknown types"),
	}
}

fn choose_indices(len: usize, k: usize, rng: &mut impl Rng) -> Vec<usize> {
	let mut indices: Vec<usize> = (0..len).collect();
	indices.choose_multiple(rng, k).copied().collect()
}

/// Mirrors the recursive nested-object construction this was supplemented from, swapping
/// hand-formatted strings for a [`Value`] tree that is serialized once at the end via
/// [`emit_record`].
fn generate_nested_value(
	keys: &[(String, String)], current_depth: u32, target_depth: u32, max_keys: u32,
	max_length: u32, rng: &mut impl Rng,
) -> Value {
	if current_depth == target_depth || max_keys == 0 {
		let num_keys = rng.gen_range(0..=max_keys.min(keys.len() as u32)) as usize;
		let mut members = BTreeMap::new();
		for &idx in &choose_indices(keys.len(), num_keys, rng) {
			let (name, data_type) = &keys[idx];
			members.insert(name.clone(), generate_value_by_type(data_type, max_length, rng));
		}
		return Value::Object(members);
	}

	let num_keys = rng.gen_range(1..=max_keys.min(keys.len() as u32)) as usize;
	let selected = choose_indices(keys.len(), num_keys, rng);
	let num_nesting = rng.gen_range(1..=selected.len());
	let nesting: HashSet<usize> =
		selected.choose_multiple(rng, num_nesting).copied().collect();

	let mut members = BTreeMap::new();
	for &idx in &selected {
		let (name, data_type) = &keys[idx];
		let value = if nesting.contains(&idx) {
			generate_nested_value(keys, current_depth + 1, target_depth, max_keys, max_length, rng)
		} else {
			generate_value_by_type(data_type, max_length, rng)
		};
		members.insert(name.clone(), value);
	}
	Value::Object(members)
}

fn generate_data(
	num_lines: u32, keys: &[(String, String)], max_depth: u32, max_length: u32, max_keys: u32,
	rng: &mut impl Rng,
) -> Vec<(String, Value)> {
	(0..num_lines)
		.map(|i| {
			let target_depth = rng.gen_range(0..=max_depth);
			let top_key = format!("key{}", i + 1);
			let value = generate_nested_value(keys, 0, target_depth, max_keys, max_length, rng);
			(top_key, value)
		})
		.collect()
}

fn main() {
	let args = parse_args();
	let keys = load_key_file(&args.key_file);

	let mut rng = rand::thread_rng();
	let records = generate_data(
		args.num_lines,
		&keys,
		args.max_depth,
		args.max_string_length,
		args.max_keys_per_object,
		&mut rng,
	);

	let output_path = "dataToIndex.txt";
	let mut output = String::new();
	for (key, value) in &records {
		output.push_str(&emit_record(key, value));
		output.push('\n');
	}

	if let Err(e) = std::fs::write(output_path, output) {
		eprintln!("Error: failed to write {}: {}", output_path, e);
		std::process::exit(1);
	}

	println!("Data successfully generated and saved to {}", output_path);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_lines_are_ignored() {
		let keys = parse_key_file("name string\n\nage int\n").unwrap();
		assert_eq!(keys, vec![
			("name".to_string(), "string".to_string()),
			("age".to_string(), "int".to_string()),
		]);
	}

	#[test]
	fn unknown_type_is_rejected() {
		assert!(parse_key_file("name uuid\n").is_err());
	}

	#[test]
	fn malformed_line_is_rejected() {
		assert!(parse_key_file("name\n").is_err());
	}

	#[test]
	fn empty_file_is_rejected() {
		assert!(parse_key_file("\n\n").is_err());
	}

	#[test]
	fn generated_records_parse_back_through_the_codec() {
		let keys = vec![
			("name".to_string(), "string".to_string()),
			("age".to_string(), "int".to_string()),
			("score".to_string(), "float".to_string()),
		];
		let mut rng = rand::thread_rng();
		let records = generate_data(5, &keys, 2, 8, 2, &mut rng);
		assert_eq!(records.len(), 5);
		for (key, value) in &records {
			let text = emit_record(key, value);
			let (parsed_key, parsed_value) = kvtrie_api::value::parse_record(&text).unwrap();
			assert_eq!(&parsed_key, key);
			assert_eq!(&parsed_value, value);
		}
	}
}
