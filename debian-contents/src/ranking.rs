// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Ranking packages by the number of files they install. */

use crate::repository::contents::ContentsFile;

/// Default number of rows emitted by [render()].
pub const DEFAULT_LIMIT: usize = 10;

/// A package and the number of files it installs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RankedEntry {
    pub package: String,
    pub file_count: usize,
}

/// Rank all packages in a [ContentsFile] by file count, descending.
///
/// The sort is stable: packages having the same file count retain the order
/// they were first seen in the `Contents` file.
pub fn rank(contents: &ContentsFile) -> Vec<RankedEntry> {
    let mut entries = contents
        .iter()
        .map(|(package, paths)| RankedEntry {
            package: package.to_string(),
            file_count: paths.len(),
        })
        .collect::<Vec<_>>();

    entries.sort_by(|a, b| b.file_count.cmp(&a.file_count));

    entries
}

/// Render ranked entries as a text table.
///
/// At most `limit` rows are emitted, numbered from 1. A header precedes the rows.
/// If no rows would be emitted, the empty string is returned.
pub fn render(entries: &[RankedEntry], limit: usize) -> String {
    if entries.is_empty() || limit == 0 {
        return String::new();
    }

    let mut res = format!("{:<10}\t{:<40}\tFile Count\n", "No.", "Package Name");

    for (i, entry) in entries.iter().take(limit).enumerate() {
        res.push_str(&format!(
            "{:<10}\t{:<40}\t{}\n",
            i + 1,
            entry.package,
            entry.file_count
        ));
    }

    res
}
