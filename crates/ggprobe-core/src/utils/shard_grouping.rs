//! Shard-aware grouping of repository filenames.
//!
//! Filenames following the `<base><sep><NNNNN>-of-<MMMMM>[.gguf]` shard
//! convention are merged into one logical artifact per base name;
//! everything else passes through as a standalone entry.

use std::collections::BTreeMap;

use crate::domain::GroupedFile;

/// Number of digits in the shard index and total fields.
const SHARD_DIGITS: usize = 5;

#[derive(Debug)]
struct ShardName<'a> {
    base: &'a str,
    index: u32,
    total: u32,
}

/// Group a repository's candidate filenames into logical artifacts.
///
/// The input carries no ordering guarantee. Matching is case-insensitive
/// and the separator before the index may be `-` or `_`. When shards of a
/// set declare different totals, the largest one wins. Indices are not
/// validated for contiguity: a partially-listed shard set still groups.
///
/// The combined list is sorted by display name, case-insensitively.
#[must_use]
pub fn group_shard_files(filenames: &[String]) -> Vec<GroupedFile> {
    let mut groups: BTreeMap<String, Vec<(ShardName<'_>, &str)>> = BTreeMap::new();
    let mut result = Vec::new();

    for name in filenames {
        match parse_shard_name(name) {
            Some(shard) => groups
                .entry(shard.base.to_lowercase())
                .or_default()
                .push((shard, name.as_str())),
            None => result.push(GroupedFile::standalone(name.clone())),
        }
    }

    for (_, mut parts) in groups {
        parts.sort_by_key(|(shard, _)| shard.index);
        let part_count = parts.iter().map(|(shard, _)| shard.total).max();
        // Display keeps the casing of the lowest-indexed part's base.
        let display_name = format!("{}.gguf", parts[0].0.base);
        let part_files: Vec<String> = parts.iter().map(|(_, name)| (*name).to_string()).collect();
        result.push(GroupedFile {
            display_name,
            actual_name: part_files[0].clone(),
            part_count,
            part_files,
        });
    }

    result.sort_by(|a, b| {
        a.display_name
            .to_lowercase()
            .cmp(&b.display_name.to_lowercase())
            .then_with(|| a.display_name.cmp(&b.display_name))
    });
    result
}

/// Parse `<base><sep><NNNNN>-of-<MMMMM>[.gguf]`; `<sep>` is `-` or `_`.
fn parse_shard_name(name: &str) -> Option<ShardName<'_>> {
    let stem = strip_gguf_extension(name);
    // <base> + <sep> + NNNNN + "-of-" + MMMMM, with a non-empty base
    if stem.len() < 2 + 2 * SHARD_DIGITS + 4 {
        return None;
    }

    let total = parse_shard_digits(stem.get(stem.len() - SHARD_DIGITS..)?)?;
    let rest = stem.get(..stem.len() - SHARD_DIGITS)?;
    let rest = strip_of_marker(rest)?;
    let index = parse_shard_digits(rest.get(rest.len() - SHARD_DIGITS..)?)?;
    let rest = rest.get(..rest.len() - SHARD_DIGITS)?;

    let sep = rest.bytes().last()?;
    if sep != b'-' && sep != b'_' {
        return None;
    }
    let base = rest.get(..rest.len() - 1)?;
    if base.is_empty() {
        return None;
    }

    Some(ShardName { base, index, total })
}

fn strip_gguf_extension(name: &str) -> &str {
    if name.len() > 5 {
        if let Some(ext) = name.get(name.len() - 5..) {
            if ext.eq_ignore_ascii_case(".gguf") {
                return &name[..name.len() - 5];
            }
        }
    }
    name
}

fn strip_of_marker(s: &str) -> Option<&str> {
    if s.len() < 4 {
        return None;
    }
    let tail = s.get(s.len() - 4..)?;
    if tail.eq_ignore_ascii_case("-of-") {
        s.get(..s.len() - 4)
    } else {
        None
    }
}

fn parse_shard_digits(s: &str) -> Option<u32> {
    if s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_groups_complete_shard_set() {
        let grouped = group_shard_files(&names(&[
            "m-00001-of-00003.gguf",
            "m-00002-of-00003.gguf",
            "m-00003-of-00003.gguf",
        ]));

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].display_name, "m.gguf");
        assert_eq!(grouped[0].part_count, Some(3));
        assert_eq!(grouped[0].actual_name, "m-00001-of-00003.gguf");
        assert_eq!(grouped[0].part_files.len(), 3);
        assert!(grouped[0].is_sharded());
    }

    #[test]
    fn test_standalone_file_passes_through() {
        let grouped = group_shard_files(&names(&["solo.gguf"]));

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].part_files, vec!["solo.gguf".to_string()]);
        assert!(grouped[0].part_count.is_none());
    }

    #[test]
    fn test_underscore_separator() {
        let grouped = group_shard_files(&names(&[
            "model_00001-of-00002.gguf",
            "model_00002-of-00002.gguf",
        ]));

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].display_name, "model.gguf");
        assert_eq!(grouped[0].part_count, Some(2));
    }

    #[test]
    fn test_case_insensitive_matching() {
        let grouped = group_shard_files(&names(&[
            "Llama-00002-OF-00002.GGUF",
            "llama-00001-of-00002.gguf",
        ]));

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].actual_name, "llama-00001-of-00002.gguf");
        assert_eq!(grouped[0].display_name, "llama.gguf");
        assert_eq!(grouped[0].part_count, Some(2));
    }

    #[test]
    fn test_disagreeing_totals_take_the_larger() {
        let grouped = group_shard_files(&names(&[
            "m-00001-of-00002.gguf",
            "m-00002-of-00005.gguf",
        ]));

        assert_eq!(grouped[0].part_count, Some(5));
    }

    #[test]
    fn test_parts_sorted_by_index_not_input_order() {
        let grouped = group_shard_files(&names(&[
            "m-00003-of-00003.gguf",
            "m-00001-of-00003.gguf",
            "m-00002-of-00003.gguf",
        ]));

        assert_eq!(grouped[0].actual_name, "m-00001-of-00003.gguf");
        assert_eq!(
            grouped[0].part_files,
            names(&[
                "m-00001-of-00003.gguf",
                "m-00002-of-00003.gguf",
                "m-00003-of-00003.gguf",
            ])
        );
    }

    #[test]
    fn test_gaps_are_not_validated() {
        // A partially-listed shard set still groups; contiguity is not
        // checked here.
        let grouped = group_shard_files(&names(&[
            "m-00001-of-00003.gguf",
            "m-00003-of-00003.gguf",
        ]));

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].part_count, Some(3));
        assert_eq!(grouped[0].part_files.len(), 2);
    }

    #[test]
    fn test_non_shard_patterns_stay_standalone() {
        let grouped = group_shard_files(&names(&[
            "model-1-of-3.gguf",          // not 5 digits
            "model-00001-of-00003.bin",   // different extension keeps the tail
            "model-of-something.gguf",    // no digits at all
            "00001-of-00003.gguf",        // empty base
        ]));

        assert_eq!(grouped.len(), 4);
        assert!(grouped.iter().all(|g| g.part_count.is_none()));
    }

    #[test]
    fn test_shard_suffix_without_extension_matches() {
        let grouped = group_shard_files(&names(&[
            "weights-00001-of-00002",
            "weights-00002-of-00002",
        ]));

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].display_name, "weights.gguf");
    }

    #[test]
    fn test_mixed_list_sorted_by_display_name() {
        let grouped = group_shard_files(&names(&[
            "zeta.gguf",
            "alpha-00001-of-00002.gguf",
            "alpha-00002-of-00002.gguf",
            "Beta.gguf",
        ]));

        let display: Vec<&str> = grouped.iter().map(|g| g.display_name.as_str()).collect();
        assert_eq!(display, vec!["alpha.gguf", "Beta.gguf", "zeta.gguf"]);
    }

    #[test]
    fn test_two_distinct_shard_sets() {
        let grouped = group_shard_files(&names(&[
            "a-00001-of-00002.gguf",
            "b-00001-of-00002.gguf",
            "a-00002-of-00002.gguf",
            "b-00002-of-00002.gguf",
        ]));

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].display_name, "a.gguf");
        assert_eq!(grouped[1].display_name, "b.gguf");
    }
}
