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

use super::handlers::packages::*;
use super::model::packages::{
    Package, PackageData, PackageQuery, RegexQuery, ReviewRemovalRequest, ReviewRequest,
};
use crate::registry_service::service::RegistryService;
use std::sync::Arc;
use tokio::sync::Mutex;
use warp::Filter;

// Uploaded package content is an inline base64 zip, so create and update
// bodies are allowed to be substantially larger than the query bodies.
const QUERY_BODY_LIMIT: u64 = 1024 * 8;
const PACKAGE_BODY_LIMIT: u64 = 1024 * 1024 * 64;

pub fn make_node_routes(
    registry_service: Arc<Mutex<RegistryService>>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let registry_service_filter = warp::any().map(move || registry_service.clone());

    let search_packages = warp::path!("packages")
        .and(warp::post())
        .and(warp::query::<SearchParams>())
        .and(warp::body::content_length_limit(QUERY_BODY_LIMIT))
        .and(warp::body::json::<Vec<PackageQuery>>())
        .and(registry_service_filter.clone())
        .and_then(handle_search_packages);

    let reset = warp::path!("reset")
        .and(warp::delete())
        .and(registry_service_filter.clone())
        .and_then(handle_reset);

    let create_package = warp::path!("package")
        .and(warp::post())
        .and(warp::body::content_length_limit(PACKAGE_BODY_LIMIT))
        .and(warp::body::json::<PackageData>())
        .and(registry_service_filter.clone())
        .and_then(handle_create_package);

    let rate_package = warp::path!("package" / String / "rate")
        .and(warp::get())
        .and(registry_service_filter.clone())
        .and_then(handle_rate_package);

    let package_history = warp::path!("package" / "byName" / String)
        .and(warp::get())
        .and(registry_service_filter.clone())
        .and_then(handle_package_history);

    let delete_packages_by_name = warp::path!("package" / "byName" / String)
        .and(warp::delete())
        .and(registry_service_filter.clone())
        .and_then(handle_delete_packages_by_name);

    let search_by_regex = warp::path!("package" / "byRegEx")
        .and(warp::post())
        .and(warp::body::content_length_limit(QUERY_BODY_LIMIT))
        .and(warp::body::json::<RegexQuery>())
        .and(registry_service_filter.clone())
        .and_then(handle_search_by_regex);

    let create_review = warp::path!("package" / "review")
        .and(warp::post())
        .and(warp::body::content_length_limit(QUERY_BODY_LIMIT))
        .and(warp::body::json::<ReviewRequest>())
        .and(registry_service_filter.clone())
        .and_then(handle_create_review);

    let delete_review = warp::path!("package" / "review")
        .and(warp::delete())
        .and(warp::body::content_length_limit(QUERY_BODY_LIMIT))
        .and(warp::body::json::<ReviewRemovalRequest>())
        .and(registry_service_filter.clone())
        .and_then(handle_delete_review);

    let download_package = warp::path!("package" / String)
        .and(warp::get())
        .and(registry_service_filter.clone())
        .and_then(handle_download_package);

    let update_package = warp::path!("package" / String)
        .and(warp::put())
        .and(warp::body::content_length_limit(PACKAGE_BODY_LIMIT))
        .and(warp::body::json::<Package>())
        .and(registry_service_filter.clone())
        .and_then(handle_update_package);

    let delete_package = warp::path!("package" / String)
        .and(warp::delete())
        .and(registry_service_filter)
        .and_then(handle_delete_package);

    let authenticate = warp::path!("authenticate")
        .and(warp::put())
        .and_then(handle_authenticate);

    warp::any().and(
        search_packages
            .or(reset)
            .or(create_package)
            .or(rate_package)
            .or(package_history)
            .or(delete_packages_by_name)
            .or(search_by_regex)
            .or(create_review)
            .or(delete_review)
            .or(download_package)
            .or(update_package)
            .or(delete_package)
            .or(authenticate),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_api::error_util::custom_recover;
    use crate::node_api::model::packages::{ActionEntry, PackageMetadata};
    use crate::util::test_util;

    fn test_service() -> Arc<Mutex<RegistryService>> {
        Arc::new(Mutex::new(RegistryService::new()))
    }

    async fn seed_package(
        registry_service: &Arc<Mutex<RegistryService>>,
        name: &str,
        version: &str,
    ) -> Package {
        let content = test_util::tests::make_package_content(name, version, None);
        registry_service
            .lock()
            .await
            .create_package(PackageData {
                content: Some(content),
                ..Default::default()
            })
            .expect("seeding the test package failed")
    }

    #[tokio::test]
    async fn create_package_returns_the_stored_package() {
        let registry_service = test_service();
        let filter = make_node_routes(registry_service).recover(custom_recover);

        let data = PackageData {
            content: Some(test_util::tests::make_package_content(
                "express", "4.18.2", None,
            )),
            ..Default::default()
        };
        let response = warp::test::request()
            .method("POST")
            .path("/package")
            .json(&data)
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 201);

        let package: Package = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(package.metadata.name, "express");
        assert_eq!(package.metadata.version, "4.18.2");
        assert!(!package.metadata.id.is_empty());
    }

    #[tokio::test]
    async fn create_duplicate_package_conflicts() {
        let registry_service = test_service();
        seed_package(&registry_service, "express", "4.18.2").await;
        let filter = make_node_routes(registry_service).recover(custom_recover);

        let data = PackageData {
            content: Some(test_util::tests::make_package_content(
                "express", "4.18.2", None,
            )),
            ..Default::default()
        };
        let response = warp::test::request()
            .method("POST")
            .path("/package")
            .json(&data)
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 409);
    }

    #[tokio::test]
    async fn create_with_content_and_url_is_a_bad_request() {
        let filter = make_node_routes(test_service()).recover(custom_recover);

        let data = PackageData {
            content: Some("aGk=".to_string()),
            url: Some("https://github.com/expressjs/express".to_string()),
            ..Default::default()
        };
        let response = warp::test::request()
            .method("POST")
            .path("/package")
            .json(&data)
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn create_by_url_fails_as_dependency() {
        let filter = make_node_routes(test_service()).recover(custom_recover);

        let data = PackageData {
            url: Some("https://github.com/expressjs/express".to_string()),
            ..Default::default()
        };
        let response = warp::test::request()
            .method("POST")
            .path("/package")
            .json(&data)
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 424);
    }

    #[tokio::test]
    async fn search_returns_the_requested_page_and_next_offset() {
        let registry_service = test_service();
        for minor in 0..12 {
            seed_package(&registry_service, "express", &format!("4.{}.0", minor)).await;
        }
        let filter = make_node_routes(registry_service).recover(custom_recover);

        let queries = vec![PackageQuery {
            name: "express".to_string(),
            version: String::new(),
        }];
        let response = warp::test::request()
            .method("POST")
            .path("/packages?offset=1")
            .json(&queries)
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["offset"], "2");
        let page: Vec<PackageMetadata> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(page.len(), 10);

        let response = warp::test::request()
            .method("POST")
            .path("/packages?offset=2")
            .json(&queries)
            .reply(&filter)
            .await;
        let page: Vec<PackageMetadata> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(page.len(), 2);

        // Past the last page the offset header stops advancing.
        let response = warp::test::request()
            .method("POST")
            .path("/packages?offset=5")
            .json(&queries)
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["offset"], "5");
        let page: Vec<PackageMetadata> = serde_json::from_slice(response.body()).unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn search_with_semver_queries() {
        let registry_service = test_service();
        seed_package(&registry_service, "express", "4.18.2").await;
        seed_package(&registry_service, "express", "4.19.0").await;
        seed_package(&registry_service, "lodash", "4.17.21").await;
        let filter = make_node_routes(registry_service).recover(custom_recover);

        let queries = vec![PackageQuery {
            name: "express".to_string(),
            version: "~4.18.2".to_string(),
        }];
        let response = warp::test::request()
            .method("POST")
            .path("/packages")
            .json(&queries)
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 200);
        let page: Vec<PackageMetadata> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].version, "4.18.2");
    }

    #[tokio::test]
    async fn search_with_a_malformed_body_is_a_bad_request() {
        let filter = make_node_routes(test_service()).recover(custom_recover);

        let response = warp::test::request()
            .method("POST")
            .path("/packages")
            .body("{\"not\": \"an array\"}")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn download_returns_the_content_and_unknown_id_is_not_found() {
        let registry_service = test_service();
        let package = seed_package(&registry_service, "express", "4.18.2").await;
        let filter = make_node_routes(registry_service).recover(custom_recover);

        let response = warp::test::request()
            .path(&format!("/package/{}", package.metadata.id))
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 200);
        let downloaded: Package = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(downloaded.metadata, package.metadata);
        assert!(downloaded.data.content.is_some());

        let response = warp::test::request()
            .path("/package/no-such-id")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn update_checks_the_stored_name_and_version() {
        let registry_service = test_service();
        let package = seed_package(&registry_service, "express", "4.18.2").await;
        let filter = make_node_routes(registry_service).recover(custom_recover);

        let mut renamed = package.clone();
        renamed.metadata.name = "not-express".to_string();
        let response = warp::test::request()
            .method("PUT")
            .path(&format!("/package/{}", package.metadata.id))
            .json(&renamed)
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 404);

        let mut update = package.clone();
        update.data.js_program = Some("process.exit(0)".to_string());
        let response = warp::test::request()
            .method("PUT")
            .path(&format!("/package/{}", package.metadata.id))
            .json(&update)
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn delete_package_then_download_is_not_found() {
        let registry_service = test_service();
        let package = seed_package(&registry_service, "express", "4.18.2").await;
        let filter = make_node_routes(registry_service).recover(custom_recover);

        let response = warp::test::request()
            .method("DELETE")
            .path(&format!("/package/{}", package.metadata.id))
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 200);

        let response = warp::test::request()
            .path(&format!("/package/{}", package.metadata.id))
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn history_records_creates_and_downloads() {
        let registry_service = test_service();
        let package = seed_package(&registry_service, "express", "4.18.2").await;
        let filter = make_node_routes(registry_service).recover(custom_recover);

        warp::test::request()
            .path(&format!("/package/{}", package.metadata.id))
            .reply(&filter)
            .await;

        let response = warp::test::request()
            .path("/package/byName/express")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 200);
        let history: Vec<ActionEntry> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(history.len(), 2);

        let response = warp::test::request()
            .path("/package/byName/no-such-package")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn delete_by_name_removes_every_version() {
        let registry_service = test_service();
        seed_package(&registry_service, "express", "4.18.2").await;
        seed_package(&registry_service, "express", "4.19.0").await;
        let filter = make_node_routes(registry_service).recover(custom_recover);

        let response = warp::test::request()
            .method("DELETE")
            .path("/package/byName/express")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 200);

        let response = warp::test::request()
            .method("DELETE")
            .path("/package/byName/express")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn regex_search_finds_packages_by_name() {
        let registry_service = test_service();
        seed_package(&registry_service, "express", "4.18.2").await;
        let filter = make_node_routes(registry_service).recover(custom_recover);

        let response = warp::test::request()
            .method("POST")
            .path("/package/byRegEx")
            .json(&RegexQuery {
                regex: "^exp.*".to_string(),
            })
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 200);
        let matches: Vec<PackageQuery> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "express");

        let response = warp::test::request()
            .method("POST")
            .path("/package/byRegEx")
            .json(&RegexQuery {
                regex: "^no-match$".to_string(),
            })
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 404);

        let response = warp::test::request()
            .method("POST")
            .path("/package/byRegEx")
            .json(&RegexQuery {
                regex: "[".to_string(),
            })
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn reviews_can_be_added_and_removed() {
        let registry_service = test_service();
        seed_package(&registry_service, "express", "4.18.2").await;
        let filter = make_node_routes(registry_service).recover(custom_recover);

        let response = warp::test::request()
            .method("POST")
            .path("/package/review")
            .json(&ReviewRequest {
                user_name: "alice".to_string(),
                package_name: "express".to_string(),
                stars: "4".to_string(),
                review: "does what it says".to_string(),
            })
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 201);

        let response = warp::test::request()
            .method("POST")
            .path("/package/review")
            .json(&ReviewRequest {
                user_name: "alice".to_string(),
                package_name: "express".to_string(),
                stars: "11".to_string(),
                review: "".to_string(),
            })
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 400);

        let response = warp::test::request()
            .method("DELETE")
            .path("/package/review")
            .json(&ReviewRemovalRequest {
                user_name: "alice".to_string(),
                package_name: "express".to_string(),
            })
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 200);

        let response = warp::test::request()
            .method("DELETE")
            .path("/package/review")
            .json(&ReviewRemovalRequest {
                user_name: "alice".to_string(),
                package_name: "express".to_string(),
            })
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn rate_is_not_implemented_for_a_known_package() {
        let registry_service = test_service();
        let package = seed_package(&registry_service, "express", "4.18.2").await;
        let filter = make_node_routes(registry_service).recover(custom_recover);

        let response = warp::test::request()
            .path(&format!("/package/{}/rate", package.metadata.id))
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 501);

        let response = warp::test::request()
            .path("/package/no-such-id/rate")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn authenticate_is_not_implemented() {
        let filter = make_node_routes(test_service()).recover(custom_recover);

        let response = warp::test::request()
            .method("PUT")
            .path("/authenticate")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 501);
    }

    #[tokio::test]
    async fn reset_empties_the_registry() {
        let registry_service = test_service();
        seed_package(&registry_service, "express", "4.18.2").await;
        let filter = make_node_routes(registry_service).recover(custom_recover);

        let response = warp::test::request()
            .method("DELETE")
            .path("/reset")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 200);

        let queries = vec![PackageQuery {
            name: "*".to_string(),
            version: String::new(),
        }];
        let response = warp::test::request()
            .method("POST")
            .path("/packages")
            .json(&queries)
            .reply(&filter)
            .await;
        let page: Vec<PackageMetadata> = serde_json::from_slice(response.body()).unwrap();
        assert!(page.is_empty());
    }
}
