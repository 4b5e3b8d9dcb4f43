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

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::node_api::model::packages::{
    ActionEntry, Package, PackageData, PackageMetadata, PackageQuery, RegexQuery, Review,
    ReviewRemovalRequest, ReviewRequest,
};

use super::config::get_config;

/// An empty query still answers with an empty page, which makes it a cheap
/// liveness probe for the node.
pub async fn ping() -> Result<String> {
    let queries: Vec<PackageQuery> = Vec::new();
    let client = reqwest::Client::new();
    client
        .post(get_url("/packages"))
        .json(&queries)
        .send()
        .await?
        .text_or_error_with_body()
        .await
}

/// Queries the registry and returns one page of matches together with the
/// page number to request next, taken from the `offset` response header.
pub async fn search_packages(
    queries: &[PackageQuery],
    page: usize,
) -> Result<(Vec<PackageMetadata>, Option<String>)> {
    let client = reqwest::Client::new();
    let response = client
        .post(get_url(&format!("/packages?offset={}", page)))
        .json(&queries)
        .send()
        .await?
        .error_for_status_with_body()
        .await?;

    let next_page = response
        .headers()
        .get("offset")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let packages = response.json::<Vec<PackageMetadata>>().await?;
    Ok((packages, next_page))
}

pub async fn create_package(data: PackageData) -> Result<Package> {
    let client = reqwest::Client::new();
    client
        .post(get_url("/package"))
        .json(&data)
        .send()
        .await?
        .object_or_error_with_body::<Package>()
        .await
}

pub async fn download_package(package_id: &str) -> Result<Package> {
    let client = reqwest::Client::new();
    client
        .get(get_url(&format!("/package/{}", package_id)))
        .send()
        .await?
        .object_or_error_with_body::<Package>()
        .await
}

pub async fn update_package(package_id: &str, package: Package) -> Result<()> {
    let client = reqwest::Client::new();
    client
        .put(get_url(&format!("/package/{}", package_id)))
        .json(&package)
        .send()
        .await?
        .error_for_status_with_body()
        .await
        .map(|_| ())
}

pub async fn delete_package(package_id: &str) -> Result<()> {
    let client = reqwest::Client::new();
    client
        .delete(get_url(&format!("/package/{}", package_id)))
        .send()
        .await?
        .error_for_status_with_body()
        .await
        .map(|_| ())
}

pub async fn delete_packages_by_name(package_name: &str) -> Result<()> {
    let client = reqwest::Client::new();
    client
        .delete(get_url(&format!("/package/byName/{}", package_name)))
        .send()
        .await?
        .error_for_status_with_body()
        .await
        .map(|_| ())
}

pub async fn package_history(package_name: &str) -> Result<Vec<ActionEntry>> {
    let client = reqwest::Client::new();
    client
        .get(get_url(&format!("/package/byName/{}", package_name)))
        .send()
        .await?
        .object_or_error_with_body::<Vec<ActionEntry>>()
        .await
}

pub async fn search_by_regex(regex: &str) -> Result<Vec<PackageQuery>> {
    let client = reqwest::Client::new();
    client
        .post(get_url("/package/byRegEx"))
        .json(&RegexQuery {
            regex: regex.to_string(),
        })
        .send()
        .await?
        .object_or_error_with_body::<Vec<PackageQuery>>()
        .await
}

pub async fn rate_package(package_id: &str) -> Result<String> {
    let client = reqwest::Client::new();
    client
        .get(get_url(&format!("/package/{}/rate", package_id)))
        .send()
        .await?
        .text_or_error_with_body()
        .await
}

pub async fn add_review(request: ReviewRequest) -> Result<Review> {
    let client = reqwest::Client::new();
    client
        .post(get_url("/package/review"))
        .json(&request)
        .send()
        .await?
        .object_or_error_with_body::<Review>()
        .await
}

pub async fn remove_review(request: ReviewRemovalRequest) -> Result<()> {
    let client = reqwest::Client::new();
    client
        .delete(get_url("/package/review"))
        .json(&request)
        .send()
        .await?
        .error_for_status_with_body()
        .await
        .map(|_| ())
}

pub async fn reset_registry() -> Result<()> {
    let client = reqwest::Client::new();
    client
        .delete(get_url("/reset"))
        .send()
        .await?
        .error_for_status_with_body()
        .await
        .map(|_| ())
}

pub fn get_url(path: &str) -> String {
    let result = get_config();
    let mut host = String::new();
    let mut port = String::new();
    match result {
        Ok(data) => {
            host = data.host;
            port = data.port;
        }
        Err(error) => {
            println!("Error: {}", error);
        }
    };

    format!("http://{}:{}{}", host, port, path)
}

#[async_trait]
trait ErrorResponseWithBody {
    async fn text_or_error_with_body(self) -> Result<String>;
    async fn object_or_error_with_body<R>(self) -> Result<R>
    where
        R: DeserializeOwned;
    async fn error_for_status_with_body(self) -> Result<Response>;
}

#[async_trait]
impl ErrorResponseWithBody for Response {
    async fn text_or_error_with_body(self) -> Result<String> {
        match self.error_for_status_with_body().await {
            Ok(r) => Ok(r.text().await?),
            Err(e) => Err(e),
        }
    }

    async fn object_or_error_with_body<R>(self) -> Result<R>
    where
        R: DeserializeOwned,
    {
        match self.error_for_status_with_body().await {
            Ok(r) => Ok(r.json::<R>().await?),
            Err(e) => Err(e),
        }
    }

    async fn error_for_status_with_body(self) -> Result<Response> {
        let http_status = self.status();
        let requested_url = self.url().to_string();
        if http_status.is_client_error() || http_status.is_server_error() {
            let parsed_error: Value = serde_json::from_str(self.text().await?.as_str())?;
            return Err(anyhow!(
                "HTTP status error ({}) for url ({}): {}",
                http_status,
                requested_url,
                parsed_error["errors"][0]["message"]
            ));
        }
        Ok(self)
    }
}
