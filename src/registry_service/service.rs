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

use crate::node_api::model::packages::{
    ActionEntry, HistoryUser, Package, PackageAction, PackageData, PackageMetadata, PackageQuery,
    Review,
};
use crate::registry_service::content;
use crate::registry_service::version::VersionQuery;
use log::{debug, info};
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RegistryServiceError {
    #[error("package with id {package_id} not found")]
    PackageNotFound { package_id: String },
    #[error("no packages found with name {package_name}")]
    PackageNameNotFound { package_name: String },
    #[error("package {name} version {version} already exists")]
    DuplicatePackage { name: String, version: String },
    #[error("invalid package data: {0}")]
    InvalidPackageData(String),
    #[error("invalid regular expression: {0}")]
    InvalidRegex(#[from] regex::Error),
    #[error("no review by {user_name} for package {package_name}")]
    ReviewNotFound {
        user_name: String,
        package_name: String,
    },
    #[error("invalid star rating {stars}, must be an integer between 0 and 5")]
    InvalidStarRating { stars: String },
    #[error("package ingestion blocked: {0}")]
    IngestionBlocked(String),
}

/// The in-memory package registry. Owns the stored packages, the audit
/// history and the package reviews; the node API shares one instance behind
/// an `Arc<Mutex<…>>`.
#[derive(Debug, Default)]
pub struct RegistryService {
    packages: HashMap<String, Package>,
    history: Vec<ActionEntry>,
    reviews: Vec<Review>,
}

impl RegistryService {
    pub fn new() -> Self {
        RegistryService::default()
    }

    /// Stores a new package. The upload must carry exactly one of an inline
    /// base64 zip or a repository URL. For the content method, the metadata
    /// comes from the archive's package.json. The URL method needs the
    /// repository scoring pipeline to decide ingestibility, which this node
    /// does not run, so it is always refused.
    pub fn create_package(&mut self, data: PackageData) -> Result<Package, RegistryServiceError> {
        let metadata = match (&data.content, &data.url) {
            (Some(package_content), None) => content::extract_metadata(package_content)?,
            (None, Some(url)) => {
                return Err(RegistryServiceError::IngestionBlocked(format!(
                    "ingestion of {} requires repository scoring, which this node does not provide",
                    url
                )));
            }
            _ => {
                return Err(RegistryServiceError::InvalidPackageData(
                    "exactly one of Content and URL must be set".to_string(),
                ));
            }
        };

        if self.find_by_name_and_version(&metadata.name, &metadata.version).is_some() {
            return Err(RegistryServiceError::DuplicatePackage {
                name: metadata.name,
                version: metadata.version,
            });
        }

        let package = Package {
            metadata: PackageMetadata {
                id: Uuid::new_v4().to_string(),
                ..metadata
            },
            data,
        };

        info!(
            "Created package {} {} with id {}",
            package.metadata.name, package.metadata.version, package.metadata.id
        );
        self.record_action(PackageAction::Create, &package.metadata);
        self.packages
            .insert(package.metadata.id.clone(), package.clone());

        Ok(package)
    }

    /// Returns the full package for a download and records the access in the
    /// package history.
    pub fn get_package(&mut self, package_id: &str) -> Result<Package, RegistryServiceError> {
        let package = self
            .packages
            .get(package_id)
            .cloned()
            .ok_or_else(|| RegistryServiceError::PackageNotFound {
                package_id: package_id.to_string(),
            })?;

        self.record_action(PackageAction::Download, &package.metadata);
        Ok(package)
    }

    /// Replaces a stored package. The name and version of the update must
    /// match the stored entry; only the data and id binding stay fixed.
    pub fn update_package(
        &mut self,
        package_id: &str,
        package: Package,
    ) -> Result<(), RegistryServiceError> {
        validate_package_data(&package.data)?;

        let existing = self.packages.get(package_id).ok_or_else(|| {
            RegistryServiceError::PackageNotFound {
                package_id: package_id.to_string(),
            }
        })?;

        if existing.metadata.name != package.metadata.name
            || existing.metadata.version != package.metadata.version
        {
            return Err(RegistryServiceError::PackageNotFound {
                package_id: package_id.to_string(),
            });
        }

        let updated = Package {
            metadata: PackageMetadata {
                id: package_id.to_string(),
                ..package.metadata
            },
            data: package.data,
        };
        self.record_action(PackageAction::Update, &updated.metadata);
        self.packages.insert(package_id.to_string(), updated);

        Ok(())
    }

    pub fn remove_package(&mut self, package_id: &str) -> Result<(), RegistryServiceError> {
        self.packages.remove(package_id).map(|_| ()).ok_or_else(|| {
            RegistryServiceError::PackageNotFound {
                package_id: package_id.to_string(),
            }
        })
    }

    /// Evaluates the search queries against the stored packages and returns
    /// one page of matching metadata. Results are ordered by name and
    /// version so pagination is stable.
    pub fn search_packages(
        &self,
        queries: &[PackageQuery],
        offset: usize,
        limit: usize,
    ) -> Vec<PackageMetadata> {
        let mut matches: Vec<PackageMetadata> = self
            .packages
            .values()
            .filter(|package| queries.iter().any(|query| query_matches(query, package)))
            .map(|package| package.metadata.clone())
            .collect();

        matches.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.version.cmp(&b.version)));
        debug!(
            "Search matched {} packages, returning at most {} from offset {}",
            matches.len(),
            limit,
            offset
        );

        matches.into_iter().skip(offset).take(limit).collect()
    }

    /// Returns the audit trail of every version that carried the given name.
    pub fn package_history(
        &self,
        package_name: &str,
    ) -> Result<Vec<ActionEntry>, RegistryServiceError> {
        let entries: Vec<ActionEntry> = self
            .history
            .iter()
            .filter(|entry| entry.metadata.name == package_name)
            .cloned()
            .collect();

        if entries.is_empty() {
            return Err(RegistryServiceError::PackageNameNotFound {
                package_name: package_name.to_string(),
            });
        }
        Ok(entries)
    }

    /// Deletes every stored version with the given name and returns how many
    /// packages were removed.
    pub fn remove_packages_by_name(
        &mut self,
        package_name: &str,
    ) -> Result<usize, RegistryServiceError> {
        let ids: Vec<String> = self
            .packages
            .values()
            .filter(|package| package.metadata.name == package_name)
            .map(|package| package.metadata.id.clone())
            .collect();

        if ids.is_empty() {
            return Err(RegistryServiceError::PackageNameNotFound {
                package_name: package_name.to_string(),
            });
        }

        for id in &ids {
            self.packages.remove(id);
        }
        info!("Removed {} packages named {}", ids.len(), package_name);
        Ok(ids.len())
    }

    /// Matches the pattern against package names and, failing that, against
    /// the readme stored in the package content.
    pub fn search_by_regex(
        &self,
        pattern: &str,
    ) -> Result<Vec<PackageQuery>, RegistryServiceError> {
        let regex = Regex::new(pattern)?;

        let mut matches = Vec::new();
        for package in self.packages.values() {
            let matched = if regex.is_match(&package.metadata.name) {
                true
            } else {
                match &package.data.content {
                    Some(package_content) => content::extract_readme(package_content)?
                        .map(|readme| regex.is_match(&readme))
                        .unwrap_or(false),
                    None => false,
                }
            };

            if matched {
                matches.push(PackageQuery {
                    name: package.metadata.name.clone(),
                    version: package.metadata.version.clone(),
                });
            }
        }

        if matches.is_empty() {
            return Err(RegistryServiceError::PackageNameNotFound {
                package_name: pattern.to_string(),
            });
        }

        matches.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.version.cmp(&b.version)));
        Ok(matches)
    }

    /// Records a star review for a known package. The star rating arrives as
    /// a string on the wire and must be an integer between 0 and 5.
    pub fn add_review(
        &mut self,
        user_name: &str,
        package_name: &str,
        stars: &str,
        review: &str,
    ) -> Result<Review, RegistryServiceError> {
        let star_count: u8 = stars
            .parse()
            .ok()
            .filter(|stars| *stars <= 5)
            .ok_or_else(|| RegistryServiceError::InvalidStarRating {
                stars: stars.to_string(),
            })?;

        if !self
            .packages
            .values()
            .any(|package| package.metadata.name == package_name)
        {
            return Err(RegistryServiceError::PackageNameNotFound {
                package_name: package_name.to_string(),
            });
        }

        // One review per user and package; a resubmission replaces it.
        self.reviews.retain(|review| {
            !(review.user_name == user_name && review.package_name == package_name)
        });
        let review = Review {
            user_name: user_name.to_string(),
            package_name: package_name.to_string(),
            stars: star_count,
            review: review.to_string(),
        };
        self.reviews.push(review.clone());

        Ok(review)
    }

    pub fn remove_review(
        &mut self,
        user_name: &str,
        package_name: &str,
    ) -> Result<(), RegistryServiceError> {
        let before = self.reviews.len();
        self.reviews.retain(|review| {
            !(review.user_name == user_name && review.package_name == package_name)
        });

        if self.reviews.len() == before {
            return Err(RegistryServiceError::ReviewNotFound {
                user_name: user_name.to_string(),
                package_name: package_name.to_string(),
            });
        }
        Ok(())
    }

    /// Restores the registry to its initial empty state.
    pub fn reset(&mut self) {
        info!(
            "Resetting registry, dropping {} packages and {} history entries",
            self.packages.len(),
            self.history.len()
        );
        self.packages.clear();
        self.history.clear();
        self.reviews.clear();
    }

    pub fn contains_package(&self, package_id: &str) -> bool {
        self.packages.contains_key(package_id)
    }

    fn find_by_name_and_version(&self, name: &str, version: &str) -> Option<&Package> {
        self.packages
            .values()
            .find(|package| package.metadata.name == name && package.metadata.version == version)
    }

    fn record_action(&mut self, action: PackageAction, metadata: &PackageMetadata) {
        let date = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .expect("RFC 3339 formatting of the current time cannot fail");
        self.history.push(ActionEntry {
            user: HistoryUser::default(),
            date,
            metadata: metadata.clone(),
            action,
        });
    }
}

fn query_matches(query: &PackageQuery, package: &Package) -> bool {
    if query.name != "*" && query.name != package.metadata.name {
        return false;
    }

    match VersionQuery::parse(&query.version) {
        Some(version_query) => version_query.matches(&package.metadata.version),
        None => false,
    }
}

fn validate_package_data(data: &PackageData) -> Result<(), RegistryServiceError> {
    match (&data.content, &data.url) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        _ => Err(RegistryServiceError::InvalidPackageData(
            "exactly one of Content and URL must be set".to_string(),
        )),
    }
}
