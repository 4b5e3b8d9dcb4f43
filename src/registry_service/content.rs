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

use crate::node_api::model::packages::PackageMetadata;
use crate::registry_service::service::RegistryServiceError;
use log::debug;
use serde_json::Value;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Reads the `package.json` of a base64-encoded zip upload and returns the
/// package metadata found in it. The manifest is accepted at the top level of
/// the archive or one directory deep, which is how npm pack and GitHub
/// archives lay out their content.
pub fn extract_metadata(content: &str) -> Result<PackageMetadata, RegistryServiceError> {
    let manifest = read_zip_entry(content, "package.json")?.ok_or_else(|| {
        RegistryServiceError::InvalidPackageData("no package.json found in content".to_string())
    })?;

    let manifest: Value = serde_json::from_str(&manifest).map_err(|e| {
        RegistryServiceError::InvalidPackageData(format!("malformed package.json: {}", e))
    })?;

    let name = manifest["name"].as_str().ok_or_else(|| {
        RegistryServiceError::InvalidPackageData("package.json has no name".to_string())
    })?;
    let version = manifest["version"].as_str().ok_or_else(|| {
        RegistryServiceError::InvalidPackageData("package.json has no version".to_string())
    })?;

    debug!("Extracted metadata for {} {} from content", name, version);
    Ok(PackageMetadata {
        name: name.to_string(),
        version: version.to_string(),
        id: String::new(),
    })
}

/// Returns the readme of a base64-encoded zip upload, if the archive carries
/// one. Used by the regex search to match on package documentation.
pub fn extract_readme(content: &str) -> Result<Option<String>, RegistryServiceError> {
    read_zip_entry(content, "readme.md")
}

fn read_zip_entry(
    content: &str,
    wanted_file_name: &str,
) -> Result<Option<String>, RegistryServiceError> {
    let zip_data = base64::decode(content).map_err(|e| {
        RegistryServiceError::InvalidPackageData(format!("content is not valid base64: {}", e))
    })?;

    let mut archive = ZipArchive::new(Cursor::new(zip_data)).map_err(|e| {
        RegistryServiceError::InvalidPackageData(format!("content is not a valid zip: {}", e))
    })?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| {
            RegistryServiceError::InvalidPackageData(format!("unreadable zip entry: {}", e))
        })?;
        if entry.is_dir() {
            continue;
        }

        let entry_name = entry.name().to_string();
        let mut parts = entry_name.rsplitn(2, '/');
        let file_name = parts.next().unwrap_or_default();
        let depth = parts.next().map_or(0, |dir| dir.matches('/').count() + 1);

        if depth <= 1 && file_name.eq_ignore_ascii_case(wanted_file_name) {
            let mut body = String::new();
            entry.read_to_string(&mut body).map_err(|e| {
                RegistryServiceError::InvalidPackageData(format!(
                    "unreadable zip entry {}: {}",
                    entry_name, e
                ))
            })?;
            return Ok(Some(body));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_util;

    #[test]
    fn metadata_comes_from_the_package_manifest() {
        let content = test_util::tests::make_package_content("express", "4.18.2", None);

        let metadata = extract_metadata(&content).unwrap();
        assert_eq!(metadata.name, "express");
        assert_eq!(metadata.version, "4.18.2");
    }

    #[test]
    fn metadata_is_found_one_directory_deep() {
        let content =
            test_util::tests::make_nested_package_content("lodash", "4.17.21", "lodash-main");

        let metadata = extract_metadata(&content).unwrap();
        assert_eq!(metadata.name, "lodash");
        assert_eq!(metadata.version, "4.17.21");
    }

    #[test]
    fn missing_manifest_is_invalid_data() {
        let content = test_util::tests::make_zip_content(&[("index.js", "module.exports = {}")]);

        let result = extract_metadata(&content);
        assert!(matches!(
            result,
            Err(RegistryServiceError::InvalidPackageData(_))
        ));
    }

    #[test]
    fn manifest_without_version_is_invalid_data() {
        let content =
            test_util::tests::make_zip_content(&[("package.json", r#"{"name":"express"}"#)]);

        let result = extract_metadata(&content);
        assert!(matches!(
            result,
            Err(RegistryServiceError::InvalidPackageData(_))
        ));
    }

    #[test]
    fn not_base64_is_invalid_data() {
        let result = extract_metadata("this is not base64!!!");
        assert!(matches!(
            result,
            Err(RegistryServiceError::InvalidPackageData(_))
        ));
    }

    #[test]
    fn readme_is_extracted_when_present() {
        let content = test_util::tests::make_package_content(
            "express",
            "4.18.2",
            Some("Fast, unopinionated web framework"),
        );

        let readme = extract_readme(&content).unwrap();
        assert_eq!(
            readme.as_deref(),
            Some("Fast, unopinionated web framework")
        );
    }

    #[test]
    fn missing_readme_is_not_an_error() {
        let content = test_util::tests::make_package_content("express", "4.18.2", None);

        let readme = extract_readme(&content).unwrap();
        assert_eq!(readme, None);
    }
}
