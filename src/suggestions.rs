//! # Error Suggestions
//!
//! Errors shown by the CLI should say what went wrong and how to fix it.
//! [`explain`] turns library errors into `anyhow` errors with `hint:` lines;
//! the remaining helpers cover failures that only exist at the CLI level.

use std::path::Path;

use crate::error::Error;

/// Attach hints to a library error where a fix is known.
pub fn explain(error: Error, aliases: &[&str]) -> anyhow::Error {
    match error {
        Error::AmbiguousSkeleton { name, repositories } => ambiguous_skeleton(&name, &repositories),
        Error::UnknownRepository { alias } => unknown_repository(&alias, aliases),
        Error::CycleDetected { reference } => cycle_detected(&reference),
        Error::SkeletonNotFound { name, repository } => skeleton_not_found(&name, &repository),
        other => anyhow::Error::new(other),
    }
}

/// An unqualified skeleton name exists in several repositories.
pub fn ambiguous_skeleton(name: &str, repositories: &[String]) -> anyhow::Error {
    let qualified: Vec<String> = repositories
        .iter()
        .map(|alias| format!("{alias}:{name}"))
        .collect();

    anyhow::anyhow!(
        "Skeleton '{name}' exists in several repositories: {repos}\n\n\
         hint: Qualify the name with the repository alias, e.g. {examples}",
        repos = repositories.join(", "),
        examples = qualified.join(" or ")
    )
}

/// A qualified name or command referenced an alias that is not configured.
pub fn unknown_repository(alias: &str, configured: &[&str]) -> anyhow::Error {
    let did_you_mean = find_similar(alias, configured)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();
    let known = if configured.is_empty() {
        "hint: No repositories are configured yet".to_string()
    } else {
        format!("Configured repositories: {}", configured.join(", "))
    };

    anyhow::anyhow!(
        "Unknown repository alias: {alias}{did_you_mean}\n\n\
         {known}\n\
         hint: Add it with 'kickoff repository add {alias} <LOCATION>'"
    )
}

/// A skeleton could not be found.
pub fn skeleton_not_found(name: &str, repository: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Skeleton '{name}' not found in {repository}\n\n\
         hint: Run 'kickoff skeleton list' to see the available skeletons\n\
         hint: A skeleton directory must contain a .kickoff.yaml file"
    )
}

/// A skeleton's parent chain loops back on itself.
pub fn cycle_detected(reference: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Cycle detected in skeleton parents: {reference} was already visited\n\n\
         hint: Remove or change the 'parent' entry of one skeleton in the chain\n\
         hint: Run 'kickoff skeleton show <NAME>' on each skeleton to inspect its parents"
    )
}

/// No repository is configured, so there is nothing to look skeletons up in.
pub fn no_repositories(config_path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "No skeleton repositories are configured in {path}\n\n\
         hint: Add one with 'kickoff repository add <ALIAS> <LOCATION>'\n\
         hint: Use --config or KICKOFF_CONFIG to point at another configuration file",
        path = config_path.display()
    )
}

/// The output directory already contains files.
pub fn output_not_empty(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Output directory is not empty: {path}\n\n\
         hint: Choose a new directory\n\
         hint: Use --force to write into it anyway, existing files may be overwritten",
        path = path.display()
    )
}

/// A `--set` argument is not of the form `key.path=value`.
pub fn invalid_value_override(raw: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Invalid value override: {raw}\n\n\
         hint: Use --set key=value or --set nested.key=value\n\
         hint: Values are parsed as YAML, e.g. --set port=8080 or --set 'tags=[a, b]'"
    )
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0usize; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}
