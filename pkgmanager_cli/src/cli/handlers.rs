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

use pkgmanager::cli_commands::config;
use pkgmanager::cli_commands::node;
use pkgmanager::node_api::model::packages::{
    PackageData, PackageQuery, ReviewRemovalRequest, ReviewRequest,
};
use std::fs;
use std::io;
use std::io::BufRead;

pub fn config_add() {
    println!("Enter host: ");
    let mut new_cfg = config::CliConfig {
        host: io::stdin().lock().lines().next().unwrap().unwrap(),
        ..Default::default()
    };

    println!("Enter port: ");
    new_cfg.port = io::stdin().lock().lines().next().unwrap().unwrap();

    let result = config::add_config(new_cfg);
    match result {
        Ok(_result) => {
            println!("Node configuration Saved !!");
        }
        Err(error) => {
            println!("Error Saving Node Configuration:       {}", error);
        }
    };
}

pub fn config_show() {
    let result = config::get_config();
    match result {
        Ok(config) => {
            println!("{}", config)
        }
        Err(error) => {
            println!("No Node Configured:       {}", error);
        }
    };
}

pub fn config_remove() {
    match config::config_remove() {
        Ok(()) => {
            println!("Node configuration removed");
        }
        Err(error) => {
            println!("Error Removing Node Configuration:       {}", error);
        }
    };
}

pub async fn node_ping() {
    let result = node::ping().await;
    match result {
        Ok(_resp) => {
            println!("Connection Successful !!")
        }
        Err(error) => {
            println!("Error: {}", error);
        }
    };
}

pub async fn search_packages(name: &str, version: Option<&str>, page: Option<&str>) {
    let page = page.and_then(|page| page.parse::<usize>().ok()).unwrap_or(1);
    let queries = vec![PackageQuery {
        name: name.to_owned(),
        version: version.unwrap_or_default().to_owned(),
    }];

    match node::search_packages(&queries, page).await {
        Ok((packages, next_page)) => {
            if packages.is_empty() {
                println!("No matching packages on page {}", page);
            } else {
                for package in packages {
                    println!("{} {} ({})", package.name, package.version, package.id);
                }
            }
            if let Some(next_page) = next_page {
                println!("Next page: {}", next_page);
            }
        }
        Err(error) => {
            println!("Error: {}", error);
        }
    }
}

pub async fn upload_package(file: &str) {
    let content = match fs::read(file) {
        Ok(bytes) => base64::encode(bytes),
        Err(error) => {
            println!("Error reading {}: {}", file, error);
            return;
        }
    };

    match node::create_package(PackageData {
        content: Some(content),
        ..Default::default()
    })
    .await
    {
        Ok(package) => {
            println!(
                "Uploaded {} {} with id {}",
                package.metadata.name, package.metadata.version, package.metadata.id
            );
        }
        Err(error) => {
            println!("Error: {}", error);
        }
    }
}

pub async fn create_package_from_url(url: &str) {
    match node::create_package(PackageData {
        url: Some(url.to_owned()),
        ..Default::default()
    })
    .await
    {
        Ok(package) => {
            println!(
                "Created {} {} with id {}",
                package.metadata.name, package.metadata.version, package.metadata.id
            );
        }
        Err(error) => {
            println!("Error: {}", error);
        }
    }
}

pub async fn download_package(package_id: &str, file: Option<&str>) {
    let package = match node::download_package(package_id).await {
        Ok(package) => package,
        Err(error) => {
            println!("Error: {}", error);
            return;
        }
    };

    println!(
        "Downloaded {} {} ({})",
        package.metadata.name, package.metadata.version, package.metadata.id
    );

    if let Some(file) = file {
        let content = match package.data.content {
            Some(content) => content,
            None => {
                println!("The package has no stored content");
                return;
            }
        };
        match base64::decode(content) {
            Ok(bytes) => match fs::write(file, bytes) {
                Ok(()) => println!("Saved package content to {}", file),
                Err(error) => println!("Error writing {}: {}", file, error),
            },
            Err(error) => println!("Error decoding package content: {}", error),
        }
    }
}

pub async fn update_package(package_id: &str, file: &str) {
    let content = match fs::read(file) {
        Ok(bytes) => base64::encode(bytes),
        Err(error) => {
            println!("Error reading {}: {}", file, error);
            return;
        }
    };

    // The registry checks the uploaded name and version against the stored
    // package, so fetch it first and only swap the content.
    let mut package = match node::download_package(package_id).await {
        Ok(package) => package,
        Err(error) => {
            println!("Error: {}", error);
            return;
        }
    };
    package.data = PackageData {
        content: Some(content),
        ..Default::default()
    };

    match node::update_package(package_id, package).await {
        Ok(()) => {
            println!("Package {} updated", package_id);
        }
        Err(error) => {
            println!("Error: {}", error);
        }
    }
}

pub async fn delete_package(package_id: &str) {
    match node::delete_package(package_id).await {
        Ok(()) => {
            println!("Package {} deleted", package_id);
        }
        Err(error) => {
            println!("Error: {}", error);
        }
    }
}

pub async fn delete_packages_by_name(package_name: &str) {
    match node::delete_packages_by_name(package_name).await {
        Ok(()) => {
            println!("Every version of {} deleted", package_name);
        }
        Err(error) => {
            println!("Error: {}", error);
        }
    }
}

pub async fn rate_package(package_id: &str) {
    match node::rate_package(package_id).await {
        Ok(rating) => {
            println!("{}", rating);
        }
        Err(error) => {
            println!("Error: {}", error);
        }
    }
}

pub async fn package_history(package_name: &str) {
    match node::package_history(package_name).await {
        Ok(history) => {
            for entry in history {
                println!(
                    "{} {} {} {} by {}",
                    entry.date,
                    entry.action,
                    entry.metadata.name,
                    entry.metadata.version,
                    entry.user.name
                );
            }
        }
        Err(error) => {
            println!("Error: {}", error);
        }
    }
}

pub async fn search_by_regex(regex: &str) {
    match node::search_by_regex(regex).await {
        Ok(matches) => {
            for package in matches {
                println!("{} {}", package.name, package.version);
            }
        }
        Err(error) => {
            println!("Error: {}", error);
        }
    }
}

pub async fn add_review(user: &str, package: &str, stars: &str, text: Option<&str>) {
    match node::add_review(ReviewRequest {
        user_name: user.to_owned(),
        package_name: package.to_owned(),
        stars: stars.to_owned(),
        review: text.unwrap_or_default().to_owned(),
    })
    .await
    {
        Ok(review) => {
            println!(
                "Saved {} star review of {} by {}",
                review.stars, review.package_name, review.user_name
            );
        }
        Err(error) => {
            println!("Error: {}", error);
        }
    }
}

pub async fn remove_review(user: &str, package: &str) {
    match node::remove_review(ReviewRemovalRequest {
        user_name: user.to_owned(),
        package_name: package.to_owned(),
    })
    .await
    {
        Ok(()) => {
            println!("Review of {} by {} removed", package, user);
        }
        Err(error) => {
            println!("Error: {}", error);
        }
    }
}

pub async fn reset_registry() {
    match node::reset_registry().await {
        Ok(()) => {
            println!("Registry reset");
        }
        Err(error) => {
            println!("Error: {}", error);
        }
    }
}
