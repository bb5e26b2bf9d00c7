//! Interactive repository selection
use std::{cmp::Ordering, collections::BTreeSet};

use log::debug;

use crate::{
    errors::{GitMoverError, GitMoverErrorKind},
    repo::Repo,
    utils::input,
};

/// Sort own repositories first, then by owner and name, ignoring case
pub fn sort_repositories(mut repos: Vec<Repo>, username: &str) -> Vec<Repo> {
    repos.sort_by(|a, b| {
        let own = (b.owner == username).cmp(&(a.owner == username));
        if own != Ordering::Equal {
            return own;
        }
        a.owner
            .to_lowercase()
            .cmp(&b.owner.to_lowercase())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    repos
}

/// Parse a selection line over `count` entries.
///
/// `Ok(None)` keeps the default selection, indices are 0-based, sorted and unique.
/// # Errors
/// Message describing the invalid part
pub fn parse_selection(line: &str, count: usize) -> Result<Option<Vec<usize>>, String> {
    let line = line.trim().to_lowercase();
    match line.as_str() {
        "" => return Ok(None),
        "all" => return Ok(Some((0..count).collect())),
        "none" => return Ok(Some(Vec::new())),
        _ => {}
    }
    let mut selected = BTreeSet::new();
    for part in line.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (parse_number(start, count)?, parse_number(end, count)?),
            None => {
                let n = parse_number(part, count)?;
                (n, n)
            }
        };
        if start > end {
            return Err(format!("Invalid range '{part}'"));
        }
        selected.extend(start - 1..end);
    }
    Ok(Some(selected.into_iter().collect()))
}

/// 1-based number within `1..=count`
fn parse_number(text: &str, count: usize) -> Result<usize, String> {
    let text = text.trim();
    match text.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Ok(n),
        Ok(n) => Err(format!("{n} is not between 1 and {count}")),
        Err(_) => Err(format!("'{text}' is not a number")),
    }
}

/// Cancellation error
fn cancelled() -> GitMoverError {
    GitMoverError::new(GitMoverErrorKind::Cancelled).with_text("Migration cancelled")
}

/// Print the numbered list
fn print_repositories(repos: &[Repo], selected: &BTreeSet<usize>) {
    for (i, repo) in repos.iter().enumerate() {
        let mark = if selected.contains(&i) { "x" } else { " " };
        let visibility = if repo.private { "private" } else { "public" };
        if repo.description.is_empty() {
            println!("[{mark}] {:>3}. {} ({visibility})", i + 1, repo.full_name());
        } else {
            println!(
                "[{mark}] {:>3}. {} ({visibility}) - {}",
                i + 1,
                repo.full_name(),
                repo.description
            );
        }
    }
}

/// Ask the user which repositories to migrate, then offer to rename them
/// # Errors
/// Cancelled error on `q` or end of input
pub fn select_repositories(repos: Vec<Repo>, username: &str) -> Result<Vec<Repo>, GitMoverError> {
    select_with(repos, username, input)
}

/// [`select_repositories`] reading lines from `read`
pub(crate) fn select_with(
    repos: Vec<Repo>,
    username: &str,
    mut read: impl FnMut() -> Result<String, GitMoverError>,
) -> Result<Vec<Repo>, GitMoverError> {
    let repos = sort_repositories(repos, username);
    let mut selected: BTreeSet<usize> = repos
        .iter()
        .enumerate()
        .filter(|(_, repo)| repo.owner == username)
        .map(|(i, _)| i)
        .collect();
    loop {
        print_repositories(&repos, &selected);
        println!("Select repositories (ENTER keeps [x], 'all', 'none', e.g. 1,3,5-7, 'q' to quit):");
        let line = read()?;
        if matches!(line.trim().to_lowercase().as_str(), "q" | "quit") {
            return Err(cancelled());
        }
        match parse_selection(&line, repos.len()) {
            Ok(None) => break,
            Ok(Some(indices)) => {
                selected = indices.into_iter().collect();
                break;
            }
            Err(message) => println!("{message}"),
        }
    }
    debug!("Selected {} of {} repositories", selected.len(), repos.len());
    let chosen: Vec<Repo> = repos
        .into_iter()
        .enumerate()
        .filter(|(i, _)| selected.contains(i))
        .map(|(_, repo)| repo)
        .collect();
    if chosen.is_empty() {
        return Ok(chosen);
    }
    println!("Rename repositories on the destination? [y/N]");
    let answer = read()?;
    if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
        return Ok(chosen);
    }
    let mut renamed = Vec::with_capacity(chosen.len());
    for repo in chosen {
        println!("New name for {} [{}]:", repo.full_name(), repo.name);
        let line = read()?;
        let repo = repo.renamed(&line);
        if !line.trim().is_empty() && repo.rename_target.is_none() && line.trim() != repo.name {
            println!("Invalid name '{}', keeping '{}'", line.trim(), repo.name);
        }
        renamed.push(repo);
    }
    Ok(renamed)
}
