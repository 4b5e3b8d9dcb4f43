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

use crate::node_api::error_util::{RegistryError, RegistryErrorCode};
use crate::node_api::model::packages::{
    Package, PackageData, PackageQuery, RegexQuery, ReviewRemovalRequest, ReviewRequest,
};
use crate::registry_service::service::RegistryService;
use log::debug;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Rejection, Reply};

/// Results of `POST /packages` come in pages of at most this many entries.
pub const MAX_PER_PAGE: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub offset: Option<String>,
}

/// Handles `POST /packages`. The `offset` query parameter is a 1-based page
/// number; the response carries the page number to request next in an
/// `offset` header, unchanged when the requested page was empty.
pub async fn handle_search_packages(
    params: SearchParams,
    queries: Vec<PackageQuery>,
    registry_service: Arc<Mutex<RegistryService>>,
) -> Result<impl Reply, Rejection> {
    let page = params
        .offset
        .as_deref()
        .and_then(|offset| offset.parse::<usize>().ok())
        .filter(|page| *page > 0)
        .unwrap_or(1);
    debug!("Searching with {} queries, page {}", queries.len(), page);

    let packages = registry_service
        .lock()
        .await
        .search_packages(&queries, (page - 1) * MAX_PER_PAGE, MAX_PER_PAGE);

    let next_page = if packages.is_empty() { page } else { page + 1 };
    let body = serde_json::to_string(&packages).map_err(RegistryError::from)?;

    Ok(warp::http::response::Builder::new()
        .header("Content-Type", "application/json")
        .header("offset", next_page.to_string())
        .status(StatusCode::OK)
        .body(body)
        .unwrap())
}

/// Handles `POST /package`, the create/upload endpoint.
pub async fn handle_create_package(
    data: PackageData,
    registry_service: Arc<Mutex<RegistryService>>,
) -> Result<impl Reply, Rejection> {
    debug!(
        "Creating package, content: {}, url: {:?}",
        data.content.is_some(),
        data.url
    );
    let package = registry_service
        .lock()
        .await
        .create_package(data)
        .map_err(RegistryError::from)?;

    let body = serde_json::to_string(&package).map_err(RegistryError::from)?;
    Ok(warp::http::response::Builder::new()
        .header("Content-Type", "application/json")
        .status(StatusCode::CREATED)
        .body(body)
        .unwrap())
}

/// Handles `GET /package/{id}`, the download endpoint.
pub async fn handle_download_package(
    package_id: String,
    registry_service: Arc<Mutex<RegistryService>>,
) -> Result<impl Reply, Rejection> {
    debug!("Downloading package {}", package_id);
    let package = registry_service
        .lock()
        .await
        .get_package(&package_id)
        .map_err(RegistryError::from)?;

    Ok(warp::reply::json(&package))
}

/// Handles `PUT /package/{id}`.
pub async fn handle_update_package(
    package_id: String,
    package: Package,
    registry_service: Arc<Mutex<RegistryService>>,
) -> Result<impl Reply, Rejection> {
    debug!("Updating package {}", package_id);
    registry_service
        .lock()
        .await
        .update_package(&package_id, package)
        .map_err(RegistryError::from)?;

    Ok(warp::reply::with_status("", StatusCode::OK))
}

/// Handles `DELETE /package/{id}`.
pub async fn handle_delete_package(
    package_id: String,
    registry_service: Arc<Mutex<RegistryService>>,
) -> Result<impl Reply, Rejection> {
    debug!("Deleting package {}", package_id);
    registry_service
        .lock()
        .await
        .remove_package(&package_id)
        .map_err(RegistryError::from)?;

    Ok(warp::reply::with_status("", StatusCode::OK))
}

/// Handles `GET /package/{id}/rate`. The repository scoring pipeline is not
/// part of this node, so a known package answers 501.
pub async fn handle_rate_package(
    package_id: String,
    registry_service: Arc<Mutex<RegistryService>>,
) -> Result<Response, Rejection> {
    if !registry_service.lock().await.contains_package(&package_id) {
        return Err(warp::reject::custom(RegistryError {
            code: RegistryErrorCode::PackageUnknown,
        }));
    }

    Err(warp::reject::custom(RegistryError {
        code: RegistryErrorCode::NotImplemented(
            "package rating requires the repository scoring pipeline".to_string(),
        ),
    }))
}

/// Handles `GET /package/byName/{name}`, the package history endpoint.
pub async fn handle_package_history(
    package_name: String,
    registry_service: Arc<Mutex<RegistryService>>,
) -> Result<impl Reply, Rejection> {
    debug!("Fetching history for {}", package_name);
    let history = registry_service
        .lock()
        .await
        .package_history(&package_name)
        .map_err(RegistryError::from)?;

    Ok(warp::reply::json(&history))
}

/// Handles `DELETE /package/byName/{name}`.
pub async fn handle_delete_packages_by_name(
    package_name: String,
    registry_service: Arc<Mutex<RegistryService>>,
) -> Result<impl Reply, Rejection> {
    debug!("Deleting all versions of {}", package_name);
    registry_service
        .lock()
        .await
        .remove_packages_by_name(&package_name)
        .map_err(RegistryError::from)?;

    Ok(warp::reply::with_status("", StatusCode::OK))
}

/// Handles `POST /package/byRegEx`.
pub async fn handle_search_by_regex(
    query: RegexQuery,
    registry_service: Arc<Mutex<RegistryService>>,
) -> Result<impl Reply, Rejection> {
    debug!("Regex search for {}", query.regex);
    let matches = registry_service
        .lock()
        .await
        .search_by_regex(&query.regex)
        .map_err(RegistryError::from)?;

    Ok(warp::reply::json(&matches))
}

/// Handles `POST /package/review`.
pub async fn handle_create_review(
    request: ReviewRequest,
    registry_service: Arc<Mutex<RegistryService>>,
) -> Result<impl Reply, Rejection> {
    let review = registry_service
        .lock()
        .await
        .add_review(
            &request.user_name,
            &request.package_name,
            &request.stars,
            &request.review,
        )
        .map_err(RegistryError::from)?;

    let body = serde_json::to_string(&review).map_err(RegistryError::from)?;
    Ok(warp::http::response::Builder::new()
        .header("Content-Type", "application/json")
        .status(StatusCode::CREATED)
        .body(body)
        .unwrap())
}

/// Handles `DELETE /package/review`.
pub async fn handle_delete_review(
    request: ReviewRemovalRequest,
    registry_service: Arc<Mutex<RegistryService>>,
) -> Result<impl Reply, Rejection> {
    registry_service
        .lock()
        .await
        .remove_review(&request.user_name, &request.package_name)
        .map_err(RegistryError::from)?;

    Ok(warp::reply::with_status("", StatusCode::OK))
}

/// Handles `DELETE /reset`.
pub async fn handle_reset(
    registry_service: Arc<Mutex<RegistryService>>,
) -> Result<impl Reply, Rejection> {
    registry_service.lock().await.reset();
    Ok(warp::reply::with_status("", StatusCode::OK))
}

/// Handles `PUT /authenticate`. This node does not implement access control.
pub async fn handle_authenticate() -> Result<Response, Rejection> {
    Err(warp::reject::custom(RegistryError {
        code: RegistryErrorCode::NotImplemented(
            "this registry does not implement authentication".to_string(),
        ),
    }))
}
