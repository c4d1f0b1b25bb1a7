//! Optional world-record lookup against the Euclidea "Numbers" service
//! (`api/tchisla.py`'s `singleRecord`/`numberRecords`/`batchRecords`
//! endpoints), used only when `--check-wr`/`--try-wr` is passed. A network
//! failure here is never fatal: the driver falls back to an unbounded
//! `max_depth` and proceeds as if no record were known.

use serde::Deserialize;

const API_BASE: &str = "http://www.euclidea.xyz/api/v1/game/numbers";

#[derive(Debug, Deserialize)]
struct RecordResponse {
    depth: Option<usize>,
}

/// Looks up the best known digit count for `(n, target)`, if any.
///
/// Returns `None` on any failure (network error, non-200, malformed body,
/// or no record on file) — logged at `warn` level rather than surfaced as
/// an error, per the "no fatal errors outside parsing" rule.
pub fn best_known_depth(n: u8, target: &str) -> Option<usize> {
    let url = format!("{API_BASE}/{n}/{target}");
    let response = match reqwest::blocking::get(&url) {
        Ok(resp) => resp,
        Err(err) => {
            log::warn!("world-record lookup for {target}#{n} failed: {err}");
            return None;
        }
    };
    if !response.status().is_success() {
        log::warn!("world-record lookup for {target}#{n} returned {}", response.status());
        return None;
    }
    match response.json::<RecordResponse>() {
        Ok(body) => body.depth,
        Err(err) => {
            log::warn!("world-record response for {target}#{n} was unparseable: {err}");
            None
        }
    }
}

/// Looks up the best known depths for every target reachable with `digit`
/// (`numberRecords`), used for batch `--check-wr` runs over a target range.
pub fn best_known_depths_for_digit(n: u8) -> Vec<(String, usize)> {
    let url = format!("{API_BASE}/{n}");
    let response = match reqwest::blocking::get(&url) {
        Ok(resp) => resp,
        Err(err) => {
            log::warn!("world-record batch lookup for digit {n} failed: {err}");
            return Vec::new();
        }
    };
    if !response.status().is_success() {
        return Vec::new();
    }
    match response.json::<std::collections::HashMap<String, usize>>() {
        Ok(body) => body.into_iter().collect(),
        Err(err) => {
            log::warn!("world-record batch response for digit {n} was unparseable: {err}");
            Vec::new()
        }
    }
}
