/*
   Copyright 2021 JFrog Ltd

   Licensed under the Apache License, Version 2.0 (the "License");
   you may not use this file except in compliance with the License.
   You may obtain a copy of the License at

       http://www.apache.org/licenses/LICENSE-2.0

   Unless required by applicable law or agreed to in writing, software
   distributed under the License is distributed on an "AS IS" BASIS,
   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
   See the License for the specific language governing permissions and
   limitations under the License.
*/

use semver::{Version, VersionReq};

/// A parsed search query version. The mode is selected by the shape of the
/// query string: `1.2.3` is an exact match, `1.2.3-2.1.0` a bounded range
/// exclusive on both ends, `^1.2.3` and `~1.2.3` are semver constraints.
#[derive(Clone, Debug, PartialEq)]
pub enum VersionQuery {
    Any,
    Exact(Version),
    Bounded { lower: Version, upper: Version },
    Constraint(VersionReq),
}

impl VersionQuery {
    /// Parses a query version string. An empty string matches every version.
    /// Returns `None` for strings that fit none of the query modes.
    pub fn parse(query: &str) -> Option<VersionQuery> {
        let query = query.trim();
        if query.is_empty() {
            return Some(VersionQuery::Any);
        }

        if query.starts_with('^') || query.starts_with('~') {
            return VersionReq::parse(query).ok().map(VersionQuery::Constraint);
        }
        if let Some((lower, upper)) = query.split_once('-') {
            let lower = Version::parse(lower).ok()?;
            let upper = Version::parse(upper).ok()?;
            return Some(VersionQuery::Bounded { lower, upper });
        }

        Version::parse(query).ok().map(VersionQuery::Exact)
    }

    pub fn matches(&self, version: &str) -> bool {
        let version = match Version::parse(version) {
            Ok(version) => version,
            Err(_) => return false,
        };

        match self {
            VersionQuery::Any => true,
            VersionQuery::Exact(exact) => *exact == version,
            VersionQuery::Bounded { lower, upper } => version > *lower && version < *upper,
            VersionQuery::Constraint(req) => req.matches(&version),
        }
    }
}
