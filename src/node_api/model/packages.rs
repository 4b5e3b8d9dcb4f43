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

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifying metadata of a stored package. The field names follow the
/// registry wire format.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PackageMetadata {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "ID", default)]
    pub id: String,
}

/// The payload of a package: either an inline base64-encoded zip or a
/// repository URL, never both.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PackageData {
    #[serde(rename = "Content", default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "URL", default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        rename = "JSProgram",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub js_program: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Package {
    pub metadata: PackageMetadata,
    pub data: PackageData,
}

/// A single search query as sent to `POST /packages`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PackageQuery {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Version", default)]
    pub version: String,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum PackageAction {
    #[serde(rename = "CREATE")]
    Create,
    #[serde(rename = "DOWNLOAD")]
    Download,
    #[serde(rename = "UPDATE")]
    Update,
}

impl fmt::Display for PackageAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match self {
            PackageAction::Create => "CREATE",
            PackageAction::Download => "DOWNLOAD",
            PackageAction::Update => "UPDATE",
        };
        write!(f, "{}", printable)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct HistoryUser {
    pub name: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

impl Default for HistoryUser {
    fn default() -> Self {
        HistoryUser {
            name: "default user".to_string(),
            is_admin: false,
        }
    }
}

/// One entry in the audit trail of a package.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ActionEntry {
    #[serde(rename = "User", default)]
    pub user: HistoryUser,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "PackageMetadata")]
    pub metadata: PackageMetadata,
    #[serde(rename = "Action")]
    pub action: PackageAction,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct RegexQuery {
    #[serde(rename = "RegEx")]
    pub regex: String,
}

/// Review submission as received on the wire. The star rating arrives as a
/// string and is validated by the registry service.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ReviewRequest {
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "packageName")]
    pub package_name: String,
    pub stars: String,
    #[serde(default)]
    pub review: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ReviewRemovalRequest {
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "packageName")]
    pub package_name: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Review {
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "packageName")]
    pub package_name: String,
    pub stars: u8,
    #[serde(default)]
    pub review: String,
}
