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

pub mod cli;

use clap::{command, ErrorKind};
use cli::handlers::*;
use cli::parser::*;

#[tokio::main]
async fn main() {
    let matches = cli_parser();

    match matches.subcommand() {
        Some(("config", config_matches)) => {
            if config_matches.is_present("add") || config_matches.is_present("edit") {
                config_add();
            }
            if config_matches.is_present("show") {
                config_show();
            }
            if config_matches.is_present("remove") {
                config_remove();
            }
        }

        Some(("search", search_matches)) => {
            search_packages(
                search_matches.value_of("name").unwrap_or_default(),
                search_matches.value_of("version"),
                search_matches.value_of("page"),
            )
            .await;
        }

        Some(("upload", upload_matches)) => {
            upload_package(upload_matches.value_of("file").unwrap_or_default()).await;
        }

        Some(("create", create_matches)) => {
            create_package_from_url(create_matches.value_of("url").unwrap_or_default()).await;
        }

        Some(("download", download_matches)) => {
            download_package(
                download_matches.value_of("id").unwrap_or_default(),
                download_matches.value_of("file"),
            )
            .await;
        }

        Some(("update", update_matches)) => {
            update_package(
                update_matches.value_of("id").unwrap_or_default(),
                update_matches.value_of("file").unwrap_or_default(),
            )
            .await;
        }

        Some(("delete", delete_matches)) => {
            match (delete_matches.value_of("id"), delete_matches.value_of("name")) {
                (Some(package_id), None) => delete_package(package_id).await,
                (None, Some(package_name)) => delete_packages_by_name(package_name).await,
                _ => {
                    command!()
                        .error(
                            ErrorKind::ArgumentConflict,
                            "Pass exactly one of --id and --name",
                        )
                        .exit();
                }
            }
        }

        Some(("rate", rate_matches)) => {
            rate_package(rate_matches.value_of("id").unwrap_or_default()).await;
        }

        Some(("history", history_matches)) => {
            package_history(history_matches.value_of("name").unwrap_or_default()).await;
        }

        Some(("regex", regex_matches)) => {
            search_by_regex(regex_matches.value_of("query").unwrap_or_default()).await;
        }

        Some(("review", review_matches)) => match review_matches.subcommand() {
            Some(("add", add_matches)) => {
                add_review(
                    add_matches.value_of("user").unwrap_or_default(),
                    add_matches.value_of("package").unwrap_or_default(),
                    add_matches.value_of("stars").unwrap_or_default(),
                    add_matches.value_of("text"),
                )
                .await;
            }
            Some(("remove", remove_matches)) => {
                remove_review(
                    remove_matches.value_of("user").unwrap_or_default(),
                    remove_matches.value_of("package").unwrap_or_default(),
                )
                .await;
            }
            _ => unreachable!(),
        },

        Some(("reset", _)) => {
            reset_registry().await;
        }

        Some(("ping", _)) => {
            node_ping().await;
        }

        None => {
            command!()
                .error(ErrorKind::MissingSubcommand, "A subcommand is required")
                .exit();
        }

        _ => unreachable!(),
    }
}
